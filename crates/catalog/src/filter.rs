//! Catalog filter: turns an interpreted authorization decision into the
//! visible product list.

use serde::Serialize;

use bookstore_core::Username;

use crate::Product;

/// Discriminant of a [`FilterOutcome`], used for logging and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    ShowAll,
    ShowPublisherOwn,
    ShowExcludingPremium,
    ShowNone,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::ShowAll => "SHOW_ALL",
            Verdict::ShowPublisherOwn => "SHOW_PUBLISHER_OWN",
            Verdict::ShowExcludingPremium => "SHOW_EXCLUDING_PREMIUM",
            Verdict::ShowNone => "SHOW_NONE",
        }
    }
}

impl core::fmt::Display for Verdict {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller may see. Ephemeral: produced per request and consumed by [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Unrestricted, premium offers included.
    ShowAll,
    /// Only works published by `actor`.
    ShowPublisherOwn { actor: Username },
    /// Everything except premium offers.
    ShowExcludingPremium,
    ShowNone,
}

impl FilterOutcome {
    pub fn verdict(&self) -> Verdict {
        match self {
            FilterOutcome::ShowAll => Verdict::ShowAll,
            FilterOutcome::ShowPublisherOwn { .. } => Verdict::ShowPublisherOwn,
            FilterOutcome::ShowExcludingPremium => Verdict::ShowExcludingPremium,
            FilterOutcome::ShowNone => Verdict::ShowNone,
        }
    }
}

/// Apply `outcome` to `catalog`.
///
/// - No IO
/// - Deterministic and order-preserving (filters, never reorders)
pub fn apply(outcome: &FilterOutcome, catalog: &[Product]) -> Vec<Product> {
    match outcome {
        FilterOutcome::ShowAll => catalog.to_vec(),
        FilterOutcome::ShowPublisherOwn { actor } => catalog
            .iter()
            .filter(|p| p.is_published_by(actor.as_str()))
            .cloned()
            .collect(),
        FilterOutcome::ShowExcludingPremium => catalog.iter().filter(|p| !p.premium_offer).cloned().collect(),
        FilterOutcome::ShowNone => Vec::new(),
    }
}
