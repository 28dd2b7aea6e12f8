use serde::{Deserialize, Serialize};

/// Storefront role.
///
/// The set is open: a role string the storefront does not recognise is kept
/// verbatim in [`Role::Other`] so it still reaches the decision service as the
/// principal's role edge. A missing role is [`Role::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Customer,
    Publisher,
    Admin,
    Other(String),
    Unknown,
}

impl Role {
    pub const UNKNOWN: &'static str = "Unknown";

    /// Normalise a raw role claim. Matching is case-sensitive.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(Self::UNKNOWN) => Self::Unknown,
            Some("Customer") => Self::Customer,
            Some("Publisher") => Self::Publisher,
            Some("Admin") => Self::Admin,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Customer => "Customer",
            Self::Publisher => "Publisher",
            Self::Admin => "Admin",
            Self::Other(raw) => raw,
            Self::Unknown => Self::UNKNOWN,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::parse(Some(&value))
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
