//! Query predicates for document listings.
//!
//! On the wire each predicate is a JSON object passed as a repeated
//! `queries[]` parameter, e.g. `{"method":"limit","values":[20]}`.

use serde::Serialize;
use serde_json::Value;

/// A single listing predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Attribute equals any of the values
    Equal { attribute: String, values: Vec<Value> },
    /// Full-text search on an attribute
    Search { attribute: String, term: String },
    OrderAsc(String),
    OrderDesc(String),
    Limit(u32),
    Offset(u32),
}

#[derive(Serialize)]
struct WireQuery<'a> {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    values: Vec<Value>,
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equal {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    pub fn search(attribute: impl Into<String>, term: impl Into<String>) -> Self {
        Self::Search {
            attribute: attribute.into(),
            term: term.into(),
        }
    }

    pub fn order_asc(attribute: impl Into<String>) -> Self {
        Self::OrderAsc(attribute.into())
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Self::OrderDesc(attribute.into())
    }

    pub fn limit(limit: u32) -> Self {
        Self::Limit(limit)
    }

    pub fn offset(offset: u32) -> Self {
        Self::Offset(offset)
    }

    fn method(&self) -> &'static str {
        match self {
            Self::Equal { .. } => "equal",
            Self::Search { .. } => "search",
            Self::OrderAsc(_) => "orderAsc",
            Self::OrderDesc(_) => "orderDesc",
            Self::Limit(_) => "limit",
            Self::Offset(_) => "offset",
        }
    }

    /// Encode as the JSON string sent in `queries[]`
    pub fn to_wire(&self) -> Result<String, serde_json::Error> {
        let (attribute, values) = match self {
            Self::Equal { attribute, values } => (Some(attribute.as_str()), values.clone()),
            Self::Search { attribute, term } => {
                (Some(attribute.as_str()), vec![Value::String(term.clone())])
            }
            Self::OrderAsc(attribute) | Self::OrderDesc(attribute) => {
                (Some(attribute.as_str()), Vec::new())
            }
            Self::Limit(n) | Self::Offset(n) => (None, vec![Value::from(*n)]),
        };

        serde_json::to_string(&WireQuery {
            method: self.method(),
            attribute,
            values,
        })
    }
}
