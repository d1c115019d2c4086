//! Common types used throughout the customer console
//!
//! This module contains shared type definitions used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Backoff Type
// ============================================================================

/// Backoff strategy for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Customer
// ============================================================================

/// Placeholder shown when a customer has no first name
pub const FIRST_NAME_PLACEHOLDER: &str = "John";

/// Placeholder shown when a customer has no last name
pub const LAST_NAME_PLACEHOLDER: &str = "Doe";

/// A customer record as returned by the collection endpoint
///
/// Only `id` is guaranteed. The remaining fields are optional and the
/// `display_*` accessors substitute placeholder text when they are missing
/// or empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Record identifier (`_id` is accepted on input)
    #[serde(alias = "_id", deserialize_with = "id_from_any")]
    pub id: String,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// First name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Customer {
    /// Create a customer with only an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            first_name: None,
            last_name: None,
        }
    }

    /// Set the email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set first and last name
    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Email, or an empty string
    pub fn display_email(&self) -> &str {
        non_empty(self.email.as_deref()).unwrap_or("")
    }

    /// First name, or the placeholder
    pub fn display_first_name(&self) -> &str {
        non_empty(self.first_name.as_deref()).unwrap_or(FIRST_NAME_PLACEHOLDER)
    }

    /// Last name, or the placeholder
    pub fn display_last_name(&self) -> &str {
        non_empty(self.last_name.as_deref()).unwrap_or(LAST_NAME_PLACEHOLDER)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Accept string or numeric identifiers
fn id_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}
