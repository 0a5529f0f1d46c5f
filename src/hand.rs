//! The player's hand of hero cards

use crate::core::{CardDefinition, CardId};
use serde::{Deserialize, Serialize};

/// Ordered collection of hero cards available for placement
///
/// Entries are full card records, not ids: a hero returned from the
/// playfield comes back as a snapshot carrying its damaged HP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<CardDefinition>,
}

impl Hand {
    pub fn new() -> Self {
        Hand { cards: Vec::new() }
    }

    pub fn from_cards(cards: impl IntoIterator<Item = CardDefinition>) -> Self {
        Hand {
            cards: cards.into_iter().collect(),
        }
    }

    /// Append a card to the end of the hand
    pub fn push(&mut self, card: CardDefinition) {
        self.cards.push(card);
    }

    /// Remove the first entry with this id
    pub fn remove_first(&mut self, id: &CardId) -> Option<CardDefinition> {
        // remove() keeps order; autopilot choices iterate the hand in order
        let pos = self.cards.iter().position(|c| &c.id == id)?;
        Some(self.cards.remove(pos))
    }

    /// Remove the entry at `index`
    pub fn pop_at(&mut self, index: usize) -> Option<CardDefinition> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&CardDefinition> {
        self.cards.get(index)
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.iter().any(|c| &c.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardDefinition> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl<'a> IntoIterator for &'a Hand {
    type Item = &'a CardDefinition;
    type IntoIter = std::slice::Iter<'a, CardDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> CardDefinition {
        CardDefinition::new(id, id, 10)
    }

    #[test]
    fn test_remove_first_only_removes_one() {
        let mut hand = Hand::from_cards([card("aria"), card("brer"), card("aria")]);
        let removed = hand.remove_first(&CardId::new("aria"));
        assert_eq!(removed.map(|c| c.id), Some(CardId::new("aria")));
        assert_eq!(hand.len(), 2);
        assert_eq!(hand.get(0).map(|c| c.id.as_str()), Some("brer"));
        assert!(hand.contains(&CardId::new("aria")));
    }

    #[test]
    fn test_remove_missing() {
        let mut hand = Hand::from_cards([card("aria")]);
        assert!(hand.remove_first(&CardId::new("kiefer")).is_none());
        assert_eq!(hand.len(), 1);
    }

    #[test]
    fn test_pop_at() {
        let mut hand = Hand::from_cards([card("aria"), card("brer")]);
        assert_eq!(hand.pop_at(1).map(|c| c.id), Some(CardId::new("brer")));
        assert!(hand.pop_at(5).is_none());
        hand.push(card("willis"));
        let ids: Vec<&str> = hand.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["aria", "willis"]);
    }
}
