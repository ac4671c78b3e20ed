//! Value and payload types shared by the builder and the client.
//!
//! # Design
//! Manipulation values and macro arguments are either integers or text.
//! `Value` keeps that distinction explicit while rendering both the same way
//! on the wire, so `w_100` comes out identical whether the width was given as
//! `100` or `"100"`. The serde representation is untagged so JSON numbers and
//! strings map directly onto the two variants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A manipulation value or macro argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Text(s) => s.parse().ok(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// A processed image returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_and_text_render_identically() {
        assert_eq!(Value::from(100).to_string(), "100");
        assert_eq!(Value::from("100").to_string(), "100");
        assert_eq!(Value::from("max").to_string(), "max");
    }

    #[test]
    fn deserializes_untagged() {
        let values: Vec<Value> = serde_json::from_str(r#"[50, "top"]"#).unwrap();
        assert_eq!(values, vec![Value::Int(50), Value::Text("top".to_string())]);
    }

    #[test]
    fn as_int_parses_numeric_text() {
        assert_eq!(Value::from("200").as_int(), Some(200));
        assert_eq!(Value::from("big").as_int(), None);
        assert_eq!(Value::from(7).as_str(), None);
    }
}
