//! In-memory card collection with write-through persistence.
//!
//! Every mutation runs validate, mutate, persist, reindex in that order. A failed
//! write-through is reported to the caller but never rolls the in-memory state back.

use std::collections::BTreeSet;

use chrono::Utc;

use crate::db::SlotStorage;
use crate::errors::AppError;
use crate::models::{Card, CreateCardRequest, UpdateCardRequest};

/// Owns the card collection and the derived set index.
pub struct CardStore {
    cards: Vec<Card>,
    sets: BTreeSet<String>,
    storage: SlotStorage,
    /// Why the slot could not be read at startup, until a save replaces it
    load_error: Option<AppError>,
}

impl CardStore {
    /// Open the store, loading whatever the slot currently holds.
    ///
    /// A malformed slot yields an empty store that remembers the load error.
    pub async fn open(storage: SlotStorage) -> Self {
        match storage.load().await {
            Ok(cards) => Self::with_cards(storage, cards, None),
            Err(e) => {
                tracing::error!("Failed to load card collection: {}", e);
                Self::with_cards(storage, Vec::new(), Some(e))
            }
        }
    }

    fn with_cards(storage: SlotStorage, cards: Vec<Card>, load_error: Option<AppError>) -> Self {
        let mut store = Self {
            cards,
            sets: BTreeSet::new(),
            storage,
            load_error,
        };
        store.reindex();
        store
    }

    /// The startup load failure, cleared by the first successful save.
    pub fn load_error(&self) -> Option<&AppError> {
        self.load_error.as_ref()
    }

    /// All cards in insertion order.
    pub fn list(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Distinct set names, sorted.
    pub fn sets(&self) -> &BTreeSet<String> {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Create a card and append it to the collection.
    pub async fn create(&mut self, request: &CreateCardRequest) -> Result<Card, AppError> {
        let fields = request.validate()?;

        let id = self.fresh_id();
        let card = Card {
            id,
            name: fields.name,
            set: fields.set,
            number: fields.number,
            rarity: fields.rarity,
            condition: fields.condition,
            image: fields.image,
            purchase_date: fields.purchase_date,
            purchase_price: fields.purchase_price,
            notes: fields.notes,
            created_at: Utc::now(),
            updated_at: None,
        };

        self.cards.push(card.clone());
        tracing::info!("Added card {} ({})", card.id, card.name);

        self.write_through().await?;
        Ok(card)
    }

    /// Replace the supplied fields of an existing card.
    pub async fn update(&mut self, id: &str, request: &UpdateCardRequest) -> Result<Card, AppError> {
        let index = self
            .position(id)
            .ok_or_else(|| AppError::NotFound(format!("Card {} not found", id)))?;

        let fields = request.merge(self.cards[index].fields())?;

        let card = &mut self.cards[index];
        card.apply(fields);
        card.updated_at = Some(Utc::now());
        let card = card.clone();
        tracing::info!("Updated card {} ({})", card.id, card.name);

        self.write_through().await?;
        Ok(card)
    }

    /// Remove a card from the collection.
    pub async fn delete(&mut self, id: &str) -> Result<Card, AppError> {
        let index = self
            .position(id)
            .ok_or_else(|| AppError::NotFound(format!("Card {} not found", id)))?;

        let removed = self.cards.remove(index);
        tracing::info!("Deleted card {} ({})", removed.id, removed.name);

        self.write_through().await?;
        Ok(removed)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    /// A v4 UUID not already present in the collection.
    fn fresh_id(&self) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    /// Persist the current collection, then rebuild the set index regardless of outcome.
    async fn write_through(&mut self) -> Result<(), AppError> {
        let saved = self.storage.save(&self.cards).await;
        self.reindex();
        match &saved {
            Ok(()) => {
                if self.load_error.take().is_some() {
                    tracing::info!("Unreadable collection replaced in slot {}", self.storage.key());
                }
            }
            Err(e) => tracing::warn!(
                "Collection changed in memory but was not persisted: {}",
                e
            ),
        }
        saved
    }

    fn reindex(&mut self) {
        self.sets = self.cards.iter().map(|c| c.set.clone()).collect();
    }
}
