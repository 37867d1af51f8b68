pub mod parser;

pub use parser::{parse_deck, DeckLineError, ParsedDeck, DEFAULT_DECK_SIZE, MAX_DECK_SIZE};

use crate::card::{Effect, UNKNOWN_CARD};
use serde::Serialize;

/// A deck normalized to an exact size: a multiset of card labels stored as
/// a sequence with repetition, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deck {
    cards: Vec<String>,
}

impl Deck {
    /// Expand `(label, copies)` entries in order and normalize to `total`
    /// cards: pad with `UNKNOWN CARD`, or drop surplus cards from the end.
    pub fn normalized<I, S>(entries: I, total: usize) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut cards = Vec::with_capacity(total.min(MAX_DECK_SIZE));

        for (label, copies) in entries {
            let label = label.into();
            let room = total - cards.len();
            if room == 0 {
                break;
            }
            for _ in 0..copies.min(room) {
                cards.push(label.clone());
            }
        }

        while cards.len() < total {
            cards.push(UNKNOWN_CARD.to_string());
        }

        Deck { cards }
    }

    pub fn cards(&self) -> &[String] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of copies of `label` in the deck
    pub fn count_of(&self, label: &str) -> usize {
        self.cards.iter().filter(|c| c.as_str() == label).count()
    }

    /// Distinct labels with their counts, in order of first appearance
    pub fn composition(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = Vec::new();
        for card in &self.cards {
            match entries.iter_mut().find(|(label, _)| *label == card.as_str()) {
                Some((_, count)) => *count += 1,
                None => entries.push((card.as_str(), 1)),
            }
        }
        entries
    }

    /// Whether any card in the deck is a reserved effect label
    pub fn has_effects(&self) -> bool {
        self.cards.iter().any(|c| Effect::from_label(c).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pads_with_unknown_cards() {
        let deck = Deck::normalized(vec![("Foo", 3)], 5);
        assert_eq!(deck.len(), 5);
        assert_eq!(deck.count_of("Foo"), 3);
        assert_eq!(deck.count_of(UNKNOWN_CARD), 2);
    }

    #[test]
    fn test_truncates_later_entries_first() {
        let deck = Deck::normalized(vec![("Foo", 3), ("Bar", 3)], 4);
        assert_eq!(deck.cards(), &["Foo", "Foo", "Foo", "Bar"]);
    }

    #[test]
    fn test_zero_total_is_empty() {
        let deck = Deck::normalized(vec![("Foo", 3)], 0);
        assert!(deck.is_empty());
    }

    #[test]
    fn test_composition_keeps_first_appearance_order() {
        let deck = Deck::normalized(vec![("Bar", 1), ("Foo", 2), ("Bar", 1)], 5);
        assert_eq!(
            deck.composition(),
            vec![("Bar", 2), ("Foo", 2), (UNKNOWN_CARD, 1)]
        );
    }

    #[test]
    fn test_has_effects() {
        assert!(!Deck::normalized(vec![("Foo", 3)], 10).has_effects());
        assert!(Deck::normalized(vec![("pickfrom6", 1)], 10).has_effects());
    }
}
