// ABOUTME: User-facing property descriptions for the Execute Query operation
// ABOUTME: Declares the query field, its SQL editor hints, and the options collection shown by the host
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{messages, parameters};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Property type shown in the node editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    /// Free text
    String,
    /// True / false toggle
    Boolean,
    /// Group of optional named properties
    Collection,
}

/// Editor settings for a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOptions {
    /// Editor widget
    pub editor: String,
    /// SQL dialect used for highlighting
    pub sql_dialect: String,
}

/// Conditions under which a property is shown, e.g. `resource = database`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Parameter name to accepted values
    pub show: BTreeMap<String, Vec<String>>,
}

/// One configurable property of the operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    /// Label shown to the user
    pub display_name: String,
    /// Parameter name
    pub name: String,
    /// Property type
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    /// Default value
    pub default: Value,
    /// Input placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Whether expressions over item data are disallowed in the field itself
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_data_expression: bool,
    /// Whether a value is required
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Help text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Editor settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_options: Option<TypeOptions>,
    /// Hint shown below the field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Visibility conditions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_options: Option<DisplayOptions>,
    /// Nested properties of a collection
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<NodeProperty>,
}

impl NodeProperty {
    fn new(
        display_name: &str,
        name: &str,
        property_type: PropertyType,
        default: Value,
    ) -> Self {
        Self {
            display_name: display_name.to_owned(),
            name: name.to_owned(),
            property_type,
            default,
            placeholder: None,
            no_data_expression: false,
            required: false,
            description: None,
            type_options: None,
            hint: None,
            display_options: None,
            options: Vec::new(),
        }
    }

    fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }
}

/// Properties of the Execute Query operation, shown for `resource = database`, `operation = executeQuery`
#[must_use]
pub fn description() -> Vec<NodeProperty> {
    let display_options = DisplayOptions {
        show: BTreeMap::from([
            ("resource".to_owned(), vec!["database".to_owned()]),
            ("operation".to_owned(), vec!["executeQuery".to_owned()]),
        ]),
    };

    let mut query = NodeProperty::new("Query", parameters::QUERY, PropertyType::String, json!(""))
        .described(messages::QUERY_DESCRIPTION);
    query.placeholder = Some(messages::QUERY_PLACEHOLDER.to_owned());
    query.no_data_expression = true;
    query.required = true;
    query.type_options = Some(TypeOptions {
        editor: "sqlEditor".to_owned(),
        sql_dialect: "PostgreSQL".to_owned(),
    });
    query.hint = Some(messages::QUERY_HINT.to_owned());

    let mut options = NodeProperty::new(
        "Options",
        parameters::OPTIONS,
        PropertyType::Collection,
        json!({}),
    );
    options.options = vec![
        NodeProperty::new(
            "Query Parameters",
            parameters::QUERY_REPLACEMENT,
            PropertyType::String,
            json!(""),
        )
        .described("Comma-separated list of the values you want to use as query parameters"),
        NodeProperty::new(
            "Replace Empty Strings with NULL",
            "replaceEmptyStrings",
            PropertyType::Boolean,
            json!(false),
        )
        .described("Whether to replace empty strings with NULL in input"),
        NodeProperty::new(
            "Treat query parameters in single quotes as text",
            "treatQueryParametersInSingleQuotesAsText",
            PropertyType::Boolean,
            json!(false),
        )
        .described("Whether to treat query parameters enclosed in single quotes as text e.g. '$1'"),
    ];

    [query, options]
        .into_iter()
        .map(|mut property| {
            property.display_options = Some(display_options.clone());
            property
        })
        .collect()
}
