//! Transient "selected reference" slot consumed when a card is created.

use serde::Serialize;

/// The reference a new card will take its name and image from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedReference {
    pub name: String,
    pub display_name: String,
    /// Artwork that passed preloading, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork_url: Option<String>,
    /// What to show: the artwork, or the placeholder
    pub image_url: String,
}

/// Proof of which selection a pending lookup belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTicket {
    generation: u64,
}

/// Most-recent-wins slot. Each selection or clear starts a new generation and
/// results for older generations are dropped.
#[derive(Debug, Default)]
pub struct SelectionSlot {
    generation: u64,
    current: Option<SelectedReference>,
}

impl SelectionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new selection, discarding the current one.
    pub fn begin(&mut self) -> SelectionTicket {
        self.generation += 1;
        self.current = None;
        SelectionTicket {
            generation: self.generation,
        }
    }

    /// Apply a lookup result if its ticket is still current. Returns whether it was applied.
    pub fn complete(
        &mut self,
        ticket: &SelectionTicket,
        result: Option<SelectedReference>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale reference lookup (generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.current = result;
        true
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.current = None;
    }

    pub fn current(&self) -> Option<&SelectedReference> {
        self.current.as_ref()
    }

    /// Consume the selection. Lookups still in flight for it are invalidated.
    ///
    /// The returned ticket lets the caller `restore` it if the card it was
    /// taken for is rejected.
    pub fn take(&mut self) -> Option<(SelectionTicket, SelectedReference)> {
        self.generation += 1;
        let reference = self.current.take()?;
        Some((
            SelectionTicket {
                generation: self.generation,
            },
            reference,
        ))
    }

    /// Put a taken selection back unless something newer was selected or cleared since.
    pub fn restore(&mut self, ticket: &SelectionTicket, reference: SelectedReference) -> bool {
        self.complete(ticket, Some(reference))
    }
}
