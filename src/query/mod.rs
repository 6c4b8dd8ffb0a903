//! Search and filter over the card collection.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Card, Rarity};

/// Active predicates for a collection view. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
    /// Case-insensitive substring of the card name
    pub term: String,
    pub rarity: Option<Rarity>,
    pub set: Option<String>,
}

impl CardFilter {
    /// Whether any predicate narrows the collection.
    pub fn is_active(&self) -> bool {
        !self.term.is_empty() || self.rarity.is_some() || self.set.is_some()
    }

    pub fn matches(&self, card: &Card) -> bool {
        let term_matches =
            self.term.is_empty() || card.name.to_lowercase().contains(&self.term.to_lowercase());
        term_matches
            && self.rarity.map_or(true, |r| card.rarity == r)
            && self.set.as_deref().map_or(true, |s| card.set == s)
    }
}

/// Outcome of filtering: matching cards, or an explicit empty result.
#[derive(Debug, Clone, PartialEq)]
pub enum Filtered<'a> {
    Matches(Vec<&'a Card>),
    NoMatches,
}

impl<'a> Filtered<'a> {
    pub fn cards(&self) -> &[&'a Card] {
        match self {
            Filtered::Matches(cards) => cards,
            Filtered::NoMatches => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Filtered::NoMatches)
    }
}

/// Cards matching every active predicate, in collection order.
pub fn filter_cards<'a>(cards: &'a [Card], filter: &CardFilter) -> Filtered<'a> {
    let matched: Vec<&Card> = cards.iter().filter(|card| filter.matches(card)).collect();

    if matched.is_empty() {
        Filtered::NoMatches
    } else {
        Filtered::Matches(matched)
    }
}

/// Filter parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub set: Option<String>,
}

impl TryFrom<FilterParams> for CardFilter {
    type Error = AppError;

    fn try_from(params: FilterParams) -> Result<Self, Self::Error> {
        let rarity = match params.rarity.as_deref().filter(|r| !r.is_empty()) {
            None => None,
            Some(raw) => Some(
                Rarity::parse(raw)
                    .ok_or_else(|| AppError::Validation(format!("Unknown rarity filter: {}", raw)))?,
            ),
        };

        Ok(CardFilter {
            term: params.q.unwrap_or_default(),
            rarity,
            set: params.set.filter(|s| !s.is_empty()),
        })
    }
}
