use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Identity attributes as returned by the identity verifier (transport-agnostic).
///
/// Every field is optional: the verifier vouches for what is present but the
/// claim schema is owned by the identity provider. Normalisation into a usable
/// shape happens in [`crate::ContextBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityAttributes {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    /// Years as member. Custom claims usually arrive as strings, so both
    /// `5` and `"5"` are accepted.
    #[serde(default, rename = "yearsAsMember")]
    pub years_as_member: Option<JsonValue>,
}

impl IdentityAttributes {
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            role: Some(role.into()),
            years_as_member: None,
        }
    }

    pub fn with_years_as_member(mut self, years: impl Into<JsonValue>) -> Self {
        self.years_as_member = Some(years.into());
        self
    }

    /// Membership tenure in whole years, if the claim holds a usable value.
    ///
    /// `"Unknown"`, negative, fractional or otherwise non-numeric values are
    /// all treated as absent.
    pub fn membership_tenure(&self) -> Option<u32> {
        match self.years_as_member.as_ref()? {
            JsonValue::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            JsonValue::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        }
    }
}
