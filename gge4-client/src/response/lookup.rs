//! Field lookup over the parsed response tree.

use std::borrow::Cow;

use serde_json::Value;

use crate::codes::{self, Classification, ResponseCodeEntry};

/// Finds the first value stored under `key` anywhere in `tree`.
///
/// Walks depth-first in pre-order: object entries in document order, each
/// entry's key checked before its value is descended into; array elements in
/// index order. Array indices are never matched as keys.
///
/// A present `null`, `false` or `""` is returned as found.
///
/// # Examples
///
/// ```
/// use gge4_client::response::lookup::lookup;
/// use serde_json::json;
///
/// let tree = json!({"a": {"b": [{"c": 7}]}});
/// assert_eq!(lookup(&tree, "c"), Some(&json!(7)));
/// assert_eq!(lookup(&tree, "missing"), None);
/// ```
#[must_use]
pub fn lookup<'a>(tree: &'a Value, key: &str) -> Option<&'a Value> {
    match tree {
        Value::Object(map) => map.iter().find_map(|(k, v)| {
            if k == key { Some(v) } else { lookup(v, key) }
        }),
        Value::Array(items) => items.iter().find_map(|v| lookup(v, key)),
        _ => None,
    }
}

/// Reads a non-negative integer from a JSON number or numeric string.
#[must_use]
pub fn as_unsigned(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a scalar as text. Numbers and booleans are rendered.
#[must_use]
pub fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads a gateway boolean: `true`, a non-zero number, `"1"` or `"true"`.
#[must_use]
pub fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim() {
            "1" | "true" | "TRUE" | "True" => Some(true),
            "0" | "false" | "FALSE" | "False" | "" => Some(false),
            _ => None,
        },
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Typed view over a response tree.
#[derive(Debug, Clone, Copy)]
pub struct FieldAccessor<'a> {
    tree: &'a Value,
}

impl<'a> FieldAccessor<'a> {
    /// Wraps a parsed response tree.
    #[must_use]
    pub const fn new(tree: &'a Value) -> Self {
        Self { tree }
    }

    /// Raw lookup of any key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        lookup(self.tree, key)
    }

    fn text(&self, key: &str) -> Option<Cow<'a, str>> {
        self.get(key).and_then(as_text)
    }

    fn code(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(as_unsigned).and_then(|n| u32::try_from(n).ok())
    }

    /// `transaction_approved`.
    #[must_use]
    pub fn is_approved(&self) -> Option<bool> {
        self.get("transaction_approved").and_then(as_flag)
    }

    /// `transaction_tag`.
    #[must_use]
    pub fn transaction_tag(&self) -> Option<u64> {
        self.get("transaction_tag").and_then(as_unsigned)
    }

    /// `ctr`, the printable transaction record.
    #[must_use]
    pub fn transaction_record(&self) -> Option<Cow<'a, str>> {
        self.text("ctr")
    }

    /// `authorization_num`.
    #[must_use]
    pub fn authorization_number(&self) -> Option<Cow<'a, str>> {
        self.text("authorization_num")
    }

    /// `transarmor_token`.
    #[must_use]
    pub fn transarmor_token(&self) -> Option<Cow<'a, str>> {
        self.text("transarmor_token")
    }

    /// `bank_resp_code`.
    #[must_use]
    pub fn bank_response_code(&self) -> Option<u32> {
        self.code("bank_resp_code")
    }

    /// `bank_message`.
    #[must_use]
    pub fn bank_response_message(&self) -> Option<Cow<'a, str>> {
        self.text("bank_message")
    }

    /// `exact_resp_code`.
    #[must_use]
    pub fn exact_response_code(&self) -> Option<u32> {
        self.code("exact_resp_code")
    }

    /// `exact_message`.
    #[must_use]
    pub fn exact_response_message(&self) -> Option<Cow<'a, str>> {
        self.text("exact_message")
    }

    /// `avs`, the address verification result.
    #[must_use]
    pub fn avs(&self) -> Option<Cow<'a, str>> {
        self.text("avs")
    }

    /// `cavv`.
    #[must_use]
    pub fn cavv(&self) -> Option<Cow<'a, str>> {
        self.text("cavv")
    }

    /// Table entry for the bank response code, if the code is known.
    #[must_use]
    pub fn bank_response_entry(&self) -> Option<&'static ResponseCodeEntry> {
        self.bank_response_code().and_then(codes::lookup)
    }

    /// Classification of the bank response code.
    #[must_use]
    pub fn bank_response_type(&self) -> Option<Classification> {
        self.bank_response_entry().map(|e| e.classification)
    }

    /// Table comments for the bank response code.
    #[must_use]
    pub fn bank_response_comments(&self) -> Option<&'static str> {
        self.bank_response_entry().map(|e| e.comments)
    }

    /// Recommended action for the bank response code.
    #[must_use]
    pub fn bank_response_action(&self) -> Option<&'static str> {
        self.bank_response_entry().map(|e| e.action)
    }
}
