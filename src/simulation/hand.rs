use crate::card::Effect;
use crate::combo::{Locality, TrialView};
use crate::deck::Deck;
use crate::rng::GameRng;
use std::collections::VecDeque;

/// The resolved state of one simulated opening: final hand and the cards
/// still in the deck, front of the deck first. Borrows labels from the deck
/// it was dealt from and never modifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial<'a> {
    pub hand: Vec<&'a str>,
    pub remaining: VecDeque<&'a str>,
}

impl<'a> Trial<'a> {
    /// Shuffle a private copy of the deck and deal `hand_size` cards
    /// (the whole deck if it is smaller)
    pub fn deal(deck: &'a Deck, hand_size: usize, rng: &mut GameRng) -> Self {
        let mut library: Vec<&'a str> = deck.cards().iter().map(String::as_str).collect();
        rng.shuffle(&mut library);
        Trial::from_order(library, hand_size)
    }

    /// Deal from an already ordered library
    pub fn from_order(mut library: Vec<&'a str>, hand_size: usize) -> Self {
        let remaining: VecDeque<&'a str> = library.split_off(hand_size.min(library.len())).into();
        Trial { hand: library, remaining }
    }

    /// Resolve effect cards in the dealt hand, scanning it once in dealt order.
    /// Cards drawn by an effect never trigger further effects.
    ///
    /// `draw2`: with at least two cards left, every `draw2` leaves the hand and
    /// the top two cards are drawn. This happens once per hand however many
    /// copies were dealt.
    ///
    /// `pickfromN`: with at least N cards left, one copy leaves the hand, the
    /// top N cards are revealed, one is kept at random and the other N-1 go
    /// to the bottom in revealed order. Each dealt copy resolves on its own.
    pub fn resolve_effects(&mut self, rng: &mut GameRng) {
        let dealt = self.hand.clone();
        let mut drew_two = false;

        for card in dealt {
            match Effect::from_label(card) {
                Some(Effect::DrawTwo) if !drew_two && self.remaining.len() >= 2 => {
                    self.hand.retain(|c| Effect::from_label(c) != Some(Effect::DrawTwo));
                    self.hand.extend(self.remaining.drain(..2));
                    drew_two = true;
                }
                Some(Effect::PickFrom(n)) if self.remaining.len() >= n => {
                    if let Some(pos) = self.hand.iter().position(|c| *c == card) {
                        self.hand.remove(pos);
                    }
                    let mut options: Vec<&'a str> = self.remaining.drain(..n).collect();
                    let chosen = options.remove(rng.random_range(n));
                    self.hand.push(chosen);
                    self.remaining.extend(options);
                }
                _ => {}
            }
        }
    }

    pub fn count_in_hand(&self, card: &str) -> usize {
        self.hand.iter().filter(|c| **c == card).count()
    }

    pub fn count_in_remaining(&self, card: &str) -> usize {
        self.remaining.iter().filter(|c| **c == card).count()
    }
}

impl TrialView for Trial<'_> {
    fn count_in(&self, locality: Locality, card: &str) -> usize {
        match locality {
            Locality::Hand => self.count_in_hand(card),
            Locality::RemainingDeck => self.count_in_remaining(card),
        }
    }
}

/// Run one trial: shuffle, deal, resolve effects
pub fn simulate_hand<'a>(deck: &'a Deck, hand_size: usize, rng: &mut GameRng) -> Trial<'a> {
    let mut trial = Trial::deal(deck, hand_size, rng);
    trial.resolve_effects(rng);
    trial
}
