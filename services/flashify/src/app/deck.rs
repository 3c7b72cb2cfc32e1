//! services/flashify/src/app/deck.rs
//!
//! The flashcard screen for one folder: the card grid, the selected card and
//! its two-sided flip.

use flashify_core::{Flashcard, FlashcardService, NewFlashcard, PortError, Session};
use std::sync::Arc;
use tracing::error;

use crate::app::{alert::AlertBridge, screen::ScreenScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Question,
    Answer,
}

pub struct FlashcardDeck {
    flashcard_service: Arc<dyn FlashcardService>,
    session: Session,
    alerts: AlertBridge,
    scope: ScreenScope,
    folder_id: String,
    cards: Vec<Flashcard>,
    selected: Option<usize>,
    face: Face,
}

impl FlashcardDeck {
    pub fn new(
        flashcard_service: Arc<dyn FlashcardService>,
        session: Session,
        alerts: AlertBridge,
        folder_id: impl Into<String>,
    ) -> Self {
        Self {
            flashcard_service,
            session,
            alerts,
            scope: ScreenScope::new(),
            folder_id: folder_id.into(),
            cards: Vec::new(),
            selected: None,
            face: Face::Question,
        }
    }

    pub fn scope(&self) -> &ScreenScope {
        &self.scope
    }

    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub async fn load(&mut self) {
        let result = self
            .scope
            .run(
                self.flashcard_service
                    .list_flashcards(&self.folder_id, &self.session),
            )
            .await;

        match result {
            Ok(cards) => {
                self.cards = cards;
                self.selected = None;
                self.face = Face::Question;
            }
            Err(PortError::Cancelled) => {}
            Err(e) => {
                error!(folder_id = %self.folder_id, "Failed to fetch flashcards: {e}");
                self.alerts.notify("Error", e.to_string(), None);
            }
        }
    }

    /// Opens a card question side up. Out-of-range indexes are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.cards.len() {
            return false;
        }
        self.selected = Some(index);
        self.face = Face::Question;
        true
    }

    pub fn close(&mut self) {
        self.selected = None;
        self.face = Face::Question;
    }

    pub fn selected(&self) -> Option<&Flashcard> {
        self.selected.and_then(|index| self.cards.get(index))
    }

    pub fn face(&self) -> Face {
        self.face
    }

    /// Turns the open card over. Does nothing when no card is open.
    pub fn flip(&mut self) -> Face {
        if self.selected.is_some() {
            self.face = match self.face {
                Face::Question => Face::Answer,
                Face::Answer => Face::Question,
            };
        }
        self.face
    }

    /// The text currently showing on the open card.
    pub fn visible_text(&self) -> Option<&str> {
        self.selected().map(|card| match self.face {
            Face::Question => card.question.as_str(),
            Face::Answer => card.answer.as_str(),
        })
    }

    pub async fn add_card(&mut self, question: &str, answer: &str) {
        if question.trim().is_empty() || answer.trim().is_empty() {
            return;
        }

        let card = NewFlashcard {
            question: question.to_string(),
            answer: answer.to_string(),
        };
        let result = self
            .scope
            .run(
                self.flashcard_service
                    .create_flashcard(&self.folder_id, &card, &self.session),
            )
            .await;

        match result {
            Ok(created) => self.cards.push(created),
            Err(PortError::Cancelled) => {}
            Err(e) => {
                error!(folder_id = %self.folder_id, "Failed to create flashcard: {e}");
                self.alerts.notify("Unsuccessful", e.to_string(), None);
            }
        }
    }

    /// Deletes the card at `index` on the server, then locally.
    pub async fn remove_card(&mut self, index: usize) {
        let Some(card_id) = self.cards.get(index).map(|card| card.id.clone()) else {
            return;
        };

        let result = self
            .scope
            .run(
                self.flashcard_service
                    .delete_flashcard(&card_id, &self.session),
            )
            .await;

        match result {
            Ok(()) => {
                self.cards.remove(index);
                match self.selected {
                    Some(selected) if selected == index => self.close(),
                    Some(selected) if selected > index => self.selected = Some(selected - 1),
                    _ => {}
                }
            }
            Err(PortError::Cancelled) => {}
            Err(e) => {
                error!(card_id = %card_id, "Failed to delete flashcard: {e}");
                self.alerts.notify("Unsuccessful", e.to_string(), None);
            }
        }
    }
}
