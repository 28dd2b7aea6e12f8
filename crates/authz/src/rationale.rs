//! Rationale table: maps the human-readable descriptions of determining rules
//! to the closed set of rationales the interpreter branches on.
//!
//! The policy store only tells us *which* rule fired; its description is the
//! discriminator. Keeping every known description in this one table means a
//! wording change in the policy store is fixed here and nowhere else.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const PUBLISHER_OWN_WORKS: &str = "Allows the publisher to see the books he has published";
pub const CUSTOMER_TENURE_PREMIUM_DENY: &str =
    "Denies customer with specific yearsAsMember attribute to see premium offers";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rationale {
    /// A publisher may see the works they published.
    PublisherOwnWorks,
    /// A customer is denied premium offers because of their tenure.
    CustomerTenurePremiumDeny,
    /// No special rationale matched.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationaleTable {
    entries: HashMap<String, Rationale>,
}

impl RationaleTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_entry(mut self, description: impl Into<String>, rationale: Rationale) -> Self {
        self.entries.insert(description.into().trim().to_string(), rationale);
        self
    }

    /// Exact match (ignoring surrounding whitespace); anything unknown is [`Rationale::Other`].
    pub fn classify(&self, description: &str) -> Rationale {
        self.entries
            .get(description.trim())
            .copied()
            .unwrap_or(Rationale::Other)
    }
}

impl Default for RationaleTable {
    fn default() -> Self {
        Self::empty()
            .with_entry(PUBLISHER_OWN_WORKS, Rationale::PublisherOwnWorks)
            .with_entry(CUSTOMER_TENURE_PREMIUM_DENY, Rationale::CustomerTenurePremiumDeny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_descriptions_classify() {
        let table = RationaleTable::default();
        assert_eq!(table.classify(PUBLISHER_OWN_WORKS), Rationale::PublisherOwnWorks);
        assert_eq!(
            table.classify(&format!("  {CUSTOMER_TENURE_PREMIUM_DENY}\n")),
            Rationale::CustomerTenurePremiumDeny
        );
    }

    #[test]
    fn unknown_or_reworded_descriptions_are_other() {
        let table = RationaleTable::default();
        assert_eq!(table.classify(""), Rationale::Other);
        assert_eq!(
            table.classify("Allows the publisher to see the books they have published"),
            Rationale::Other
        );
        assert_eq!(
            table.classify("allows the publisher to see the books he has published"),
            Rationale::Other
        );
    }

    #[test]
    fn entries_can_be_added_for_reworded_policies() {
        let table = RationaleTable::default().with_entry(
            "Allows the publisher to see the books they have published",
            Rationale::PublisherOwnWorks,
        );
        assert_eq!(
            table.classify("Allows the publisher to see the books they have published"),
            Rationale::PublisherOwnWorks
        );
    }
}
