use serde::{Deserialize, Serialize};

use crate::utils::errors::GameError;

/// Which part of a deck list a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckSection {
    Main,
    Side,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub name: String,
    pub amount: u32,
}

/// Swaps one copy of `card_name` between the two sections before the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideboardMove {
    pub card_name: String,
    pub from: DeckSection,
    pub to: DeckSection,
}

/// A validated deck list, as handed over by the deck-loading collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    #[serde(default)]
    pub main: Vec<DeckEntry>,
    #[serde(default)]
    pub side: Vec<DeckEntry>,
    #[serde(default)]
    pub sideboard_plan: Vec<SideboardMove>,
}

impl DeckList {
    /// Parses the JSON body of a deck submission.
    pub fn from_json(body: &str) -> Result<Self, GameError> {
        serde_json::from_str(body).map_err(|e| GameError::invalid(format!("deck list ({e})")))
    }

    pub fn section(&self, section: DeckSection) -> &[DeckEntry] {
        match section {
            DeckSection::Main => &self.main,
            DeckSection::Side => &self.side,
        }
    }

    pub fn card_count(&self, section: DeckSection) -> usize {
        self.section(section)
            .iter()
            .map(|entry| entry.amount as usize)
            .sum()
    }
}
