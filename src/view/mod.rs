//! View models for the collection list and card detail screens.
//!
//! Rendering is pure: cards and filter state in, serializable view out.

use serde::Serialize;

use crate::models::{Card, Condition, Rarity};
use crate::query::{filter_cards, CardFilter};

/// Shown when the filters leave nothing to display.
pub const EMPTY_STATE_MESSAGE: &str = "No cards found. Try adjusting your filters.";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_NOTES: &str = "No notes added";

/// Embedded placeholder card art, served as the fixed fallback image.
pub const PLACEHOLDER_SVG: &str = r##"<svg width="240" height="336" xmlns="http://www.w3.org/2000/svg">
  <rect x="0" y="0" width="240" height="336" rx="12" fill="#f0f0f0" stroke="#d0d0d0" stroke-width="2"/>
  <circle cx="120" cy="120" r="80" fill="#f0f0f0" stroke="#d0d0d0" stroke-width="2"/>
  <path d="M120,40 a80,80 0 0,1 0,160 a80,80 0 0,1 0,-160" fill="#f84c4c"/>
  <path d="M120,120 h-80 a80,80 0 0,0 80,80 a80,80 0 0,0 80,-80 h-80" fill="#f0f0f0"/>
  <circle cx="120" cy="120" r="20" fill="#f0f0f0" stroke="#d0d0d0" stroke-width="4"/>
  <circle cx="120" cy="120" r="12" fill="#d0d0d0"/>
  <rect x="40" y="220" width="160" height="20" rx="4" fill="#d0d0d0"/>
  <rect x="60" y="250" width="120" height="16" rx="4" fill="#d0d0d0"/>
  <rect x="80" y="276" width="80" height="16" rx="4" fill="#d0d0d0"/>
  <rect x="90" y="302" width="60" height="16" rx="4" fill="#d0d0d0"/>
</svg>
"##;

/// One tile of the collection list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub id: String,
    pub name: String,
    /// `"{set} - {number}"`
    pub subtitle: String,
    pub condition: String,
    pub rarity: String,
    pub rarity_class: String,
    pub image_url: String,
}

/// Current filter selections echoed back for the filter controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub term: String,
    pub rarity: Option<String>,
    pub set: Option<String>,
    pub active: bool,
}

/// The filterable list screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionView {
    pub cards: Vec<CardSummary>,
    pub total: usize,
    /// Set when the filter matched nothing
    pub empty_message: Option<String>,
    pub filter: FilterState,
    pub set_options: Vec<String>,
    pub rarity_options: Vec<String>,
    pub condition_options: Vec<String>,
}

/// The detail screen of a single card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetailView {
    pub id: String,
    pub name: String,
    pub set: String,
    pub number: String,
    pub rarity: String,
    pub condition: String,
    pub image_url: String,
    pub purchase_date: String,
    pub purchase_price: String,
    pub notes: String,
}

pub fn image_or_placeholder(card: &Card, placeholder: &str) -> String {
    card.image
        .as_deref()
        .filter(|u| !u.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

pub fn render_summary(card: &Card, placeholder: &str) -> CardSummary {
    CardSummary {
        id: card.id.clone(),
        name: card.name.clone(),
        subtitle: format!("{} - {}", card.set, card.number),
        condition: card.condition.as_str().to_string(),
        rarity: card.rarity.as_str().to_string(),
        rarity_class: card.rarity.css_class(),
        image_url: image_or_placeholder(card, placeholder),
    }
}

/// Render the list screen for `cards` under `filter`.
pub fn render_collection<'a, I>(
    cards: &[Card],
    filter: &CardFilter,
    sets: I,
    placeholder: &str,
) -> CollectionView
where
    I: IntoIterator<Item = &'a String>,
{
    let filtered = filter_cards(cards, filter);
    let empty_message = filtered
        .is_empty()
        .then(|| EMPTY_STATE_MESSAGE.to_string());

    CollectionView {
        cards: filtered
            .cards()
            .iter()
            .map(|c| render_summary(c, placeholder))
            .collect(),
        total: cards.len(),
        empty_message,
        filter: FilterState {
            term: filter.term.clone(),
            rarity: filter.rarity.map(|r| r.as_str().to_string()),
            set: filter.set.clone(),
            active: filter.is_active(),
        },
        set_options: sets.into_iter().cloned().collect(),
        rarity_options: Rarity::ALL.iter().map(|r| r.as_str().to_string()).collect(),
        condition_options: Condition::ALL
            .iter()
            .map(|c| c.as_str().to_string())
            .collect(),
    }
}

pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${:.2}", p),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn render_detail(card: &Card, placeholder: &str) -> CardDetailView {
    CardDetailView {
        id: card.id.clone(),
        name: card.name.clone(),
        set: card.set.clone(),
        number: card.number.clone(),
        rarity: card.rarity.as_str().to_string(),
        condition: card.condition.as_str().to_string(),
        image_url: image_or_placeholder(card, placeholder),
        purchase_date: card
            .purchase_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        purchase_price: format_price(card.purchase_price),
        notes: card
            .notes
            .clone()
            .unwrap_or_else(|| NO_NOTES.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use std::collections::BTreeSet;

    const PLACEHOLDER: &str = "/assets/card-placeholder.svg";

    fn card(name: &str, set: &str, rarity: Rarity) -> Card {
        Card {
            id: format!("id-{}", name),
            name: name.to_string(),
            set: set.to_string(),
            number: "25/102".to_string(),
            rarity,
            condition: Condition::Excellent,
            image: None,
            purchase_date: None,
            purchase_price: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_summary_fields() {
        let mut pikachu = card("Pikachu", "Base", Rarity::RareHolo);
        let summary = render_summary(&pikachu, PLACEHOLDER);
        assert_eq!(summary.subtitle, "Base - 25/102");
        assert_eq!(summary.rarity_class, "rare-holo");
        assert_eq!(summary.image_url, PLACEHOLDER);

        pikachu.image = Some("https://img/25.png".to_string());
        assert_eq!(
            render_summary(&pikachu, PLACEHOLDER).image_url,
            "https://img/25.png"
        );
    }

    #[test]
    fn test_collection_view_empty_state() {
        let cards = vec![card("Pikachu", "Base", Rarity::Rare)];
        let sets: BTreeSet<String> = cards.iter().map(|c| c.set.clone()).collect();
        let filter = CardFilter {
            term: "zzz".to_string(),
            ..Default::default()
        };

        let view = render_collection(&cards, &filter, &sets, PLACEHOLDER);
        assert!(view.cards.is_empty());
        assert_eq!(view.empty_message.as_deref(), Some(EMPTY_STATE_MESSAGE));
        assert!(view.filter.active);
        assert_eq!(view.total, 1);
        assert_eq!(view.set_options, vec!["Base"]);
        assert_eq!(view.rarity_options.len(), 6);
        assert_eq!(view.condition_options.len(), 5);
    }

    #[test]
    fn test_collection_view_lists_matches() {
        let cards = vec![
            card("Pikachu", "Base", Rarity::Rare),
            card("Charmander", "Jungle", Rarity::Common),
        ];
        let sets: BTreeSet<String> = cards.iter().map(|c| c.set.clone()).collect();
        let view = render_collection(&cards, &CardFilter::default(), &sets, PLACEHOLDER);

        assert_eq!(view.empty_message, None);
        assert!(!view.filter.active);
        let names: Vec<&str> = view.cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Pikachu", "Charmander"]);
        assert_eq!(view.set_options, vec!["Base", "Jungle"]);
    }

    #[test]
    fn test_detail_defaults() {
        let view = render_detail(&card("Eevee", "Jungle", Rarity::Common), PLACEHOLDER);
        assert_eq!(view.purchase_date, NOT_AVAILABLE);
        assert_eq!(view.purchase_price, NOT_AVAILABLE);
        assert_eq!(view.notes, NO_NOTES);
        assert_eq!(view.image_url, PLACEHOLDER);
    }

    #[test]
    fn test_detail_formats_purchase_metadata() {
        let mut eevee = card("Eevee", "Jungle", Rarity::Common);
        eevee.purchase_date = NaiveDate::from_ymd_opt(2022, 12, 3);
        eevee.purchase_price = Some(7.5);
        eevee.notes = Some("from a booster".to_string());

        let view = render_detail(&eevee, PLACEHOLDER);
        assert_eq!(view.purchase_date, "2022-12-03");
        assert_eq!(view.purchase_price, "$7.50");
        assert_eq!(view.notes, "from a booster");
    }
}
