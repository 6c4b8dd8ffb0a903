//! Reference artwork lookup against the remote species catalog.
//!
//! Lookups never block card CRUD: list failures surface as lookup errors, detail and
//! image failures degrade to the placeholder image.

mod client;
mod selection;
mod service;

pub use client::*;
pub use selection::*;
pub use service::*;

use serde::Serialize;

/// An entry of the remote catalog that a card can be based on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        let name = name.into();
        Self {
            display_name: display_name(&name),
            name,
            url,
        }
    }
}

/// Artwork found for a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDetail {
    pub name: String,
    pub artwork_url: String,
}

/// Catalog names are lowercase; cards use the capitalized form.
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Case-insensitive substring search over an already fetched candidate list.
///
/// An empty term returns the first `limit` candidates.
pub fn search_candidates(term: &str, candidates: &[Candidate], limit: usize) -> Vec<Candidate> {
    let term = term.trim().to_lowercase();
    candidates
        .iter()
        .filter(|c| term.is_empty() || c.name.to_lowercase().contains(&term))
        .take(limit)
        .cloned()
        .collect()
}
