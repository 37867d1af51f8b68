use std::fmt;

/// Placeholder label used to pad a deck up to its declared total
pub const UNKNOWN_CARD: &str = "UNKNOWN CARD";

/// Reserved label that draws two cards when it appears in the opening hand
pub const DRAW_TWO: &str = "draw2";

/// Prefix of the reserved `pickfromN` label family
pub const PICK_FROM_PREFIX: &str = "pickfrom";

/// Effect carried by a reserved card label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Remove every `draw2` from the hand and draw the top two cards
    DrawTwo,
    /// Reveal the top N cards, keep one at random, put the rest on the bottom
    PickFrom(usize),
}

impl Effect {
    /// Classify a card label. Labels are case-sensitive; anything that is not
    /// exactly `draw2` or `pickfrom` followed by a positive integer is an
    /// ordinary card.
    pub fn from_label(label: &str) -> Option<Effect> {
        if label == DRAW_TWO {
            return Some(Effect::DrawTwo);
        }

        let suffix = label.strip_prefix(PICK_FROM_PREFIX)?;
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        match suffix.parse::<usize>() {
            Ok(n) if n > 0 => Some(Effect::PickFrom(n)),
            _ => None,
        }
    }

    /// Minimum number of cards the remaining deck must hold for the effect to resolve
    pub fn cards_needed(&self) -> usize {
        match self {
            Effect::DrawTwo => 2,
            Effect::PickFrom(n) => *n,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::DrawTwo => write!(f, "{}", DRAW_TWO),
            Effect::PickFrom(n) => write!(f, "{}{}", PICK_FROM_PREFIX, n),
        }
    }
}

/// Whether a label is one of the reserved effect keywords
pub fn is_effect(label: &str) -> bool {
    Effect::from_label(label).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_two_label() {
        assert_eq!(Effect::from_label("draw2"), Some(Effect::DrawTwo));
        assert_eq!(Effect::from_label("Draw2"), None, "labels are case-sensitive");
        assert_eq!(Effect::from_label("draw3"), None);
    }

    #[test]
    fn test_pick_from_labels() {
        assert_eq!(Effect::from_label("pickfrom6"), Some(Effect::PickFrom(6)));
        assert_eq!(Effect::from_label("pickfrom12"), Some(Effect::PickFrom(12)));
        assert_eq!(Effect::from_label("pickfrom0"), None);
        assert_eq!(Effect::from_label("pickfrom"), None);
        assert_eq!(Effect::from_label("pickfromX"), None);
        assert_eq!(Effect::from_label("pickfrom-1"), None);
        assert_eq!(Effect::from_label("pickfrom 6"), None);
    }

    #[test]
    fn test_display_round_trips_label() {
        assert_eq!(Effect::PickFrom(6).to_string(), "pickfrom6");
        assert_eq!(Effect::DrawTwo.to_string(), "draw2");
    }

    #[test]
    fn test_ordinary_cards() {
        assert!(!is_effect("card a"));
        assert!(!is_effect(UNKNOWN_CARD));
        assert!(is_effect("pickfrom3"));
    }
}
