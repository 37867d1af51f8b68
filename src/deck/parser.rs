use super::Deck;
use crate::card::Effect;
use thiserror::Error;
use tracing::{debug, warn};

/// Deck size used when the text has no `<N> total` line
pub const DEFAULT_DECK_SIZE: usize = 40;

/// Largest `<N> total` accepted; bigger values are reported as an invalid count
pub const MAX_DECK_SIZE: usize = 100_000;

/// A recoverable problem with one line of deck text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckLineError {
    #[error("Invalid line: \"{text}\"")]
    InvalidLine { line: usize, text: String },
    #[error("Invalid count in: \"{text}\"")]
    InvalidCount { line: usize, text: String },
}

impl DeckLineError {
    /// 1-based line number in the source text
    pub fn line(&self) -> usize {
        match self {
            DeckLineError::InvalidLine { line, .. } | DeckLineError::InvalidCount { line, .. } => {
                *line
            }
        }
    }
}

/// Result of parsing deck text: the normalized deck plus every line error found
#[derive(Debug, Clone)]
pub struct ParsedDeck {
    pub deck: Deck,
    pub errors: Vec<DeckLineError>,
}

impl ParsedDeck {
    /// The declared (or default) deck size the deck was normalized to
    pub fn total(&self) -> usize {
        self.deck.len()
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

enum DeckLine<'a> {
    Total(usize),
    Cards(&'a str, usize),
}

/// Parse deck text.
/// Format: "3 Card Name" per line, "40 total" sets the deck size (last one
/// wins), blank lines and lines starting with # are skipped. Bad lines are
/// collected as errors and parsing moves on.
pub fn parse_deck(text: &str) -> ParsedDeck {
    let mut entries: Vec<(&str, usize)> = Vec::new();
    let mut errors = Vec::new();
    let mut total = DEFAULT_DECK_SIZE;

    for (line_num, line) in text.lines().enumerate() {
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(trimmed, line_num + 1) {
            Ok(DeckLine::Total(n)) => total = n,
            Ok(DeckLine::Cards(name, count)) => entries.push((name, count)),
            Err(e) => errors.push(e),
        }
    }

    let declared = entries.iter().fold(0usize, |sum, (_, count)| sum.saturating_add(*count));
    if declared > total {
        warn!(
            declared,
            total, "deck lists more cards than its total, dropping cards from the end"
        );
    }

    let deck = Deck::normalized(entries, total);

    let draw_twos = deck
        .cards()
        .iter()
        .filter(|c| Effect::from_label(c) == Some(Effect::DrawTwo))
        .count();
    if draw_twos > 1 {
        warn!(copies = draw_twos, "multiple draw2 copies resolve only once per hand, not two cards per copy");
    }

    debug!(total, cards = deck.len(), errors = errors.len(), "parsed deck");
    ParsedDeck { deck, errors }
}

fn parse_line(line: &str, line_num: usize) -> Result<DeckLine<'_>, DeckLineError> {
    let invalid_line = || DeckLineError::InvalidLine {
        line: line_num,
        text: line.to_string(),
    };
    let invalid_count = || DeckLineError::InvalidCount {
        line: line_num,
        text: line.to_string(),
    };

    // Parse "N Card Name" format
    let (count_str, rest) = line.split_once(char::is_whitespace).ok_or_else(invalid_line)?;
    let name = rest.trim();
    if name.is_empty() || count_str.is_empty() || !count_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_line());
    }

    let count: usize = count_str.parse().map_err(|_| invalid_count())?;

    if name.eq_ignore_ascii_case("total") {
        if count > MAX_DECK_SIZE {
            return Err(invalid_count());
        }
        return Ok(DeckLine::Total(count));
    }

    if count < 1 {
        return Err(invalid_count());
    }

    Ok(DeckLine::Cards(name, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::UNKNOWN_CARD;

    #[test]
    fn test_normalizes_to_declared_total() {
        let parsed = parse_deck("3 Foo\n2 Bar\n40 total");
        assert!(parsed.is_ok());
        assert_eq!(parsed.deck.len(), 40);
        assert_eq!(parsed.deck.count_of("Foo"), 3);
        assert_eq!(parsed.deck.count_of("Bar"), 2);
        assert_eq!(parsed.deck.count_of(UNKNOWN_CARD), 35);
    }

    #[test]
    fn test_default_total_is_forty() {
        let parsed = parse_deck("3 Foo");
        assert_eq!(parsed.total(), DEFAULT_DECK_SIZE);
    }

    #[test]
    fn test_last_total_wins() {
        let parsed = parse_deck("60 total\n3 Foo\n20 TOTAL");
        assert_eq!(parsed.total(), 20);
    }

    #[test]
    fn test_surplus_truncated_from_end() {
        let parsed = parse_deck("4 total\n3 Foo\n3 Bar");
        assert_eq!(parsed.deck.cards(), &["Foo", "Foo", "Foo", "Bar"]);
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let parsed = parse_deck("# my deck\n\n   \n  # indented comment\n2 Foo\n");
        assert!(parsed.is_ok());
        assert_eq!(parsed.deck.count_of("Foo"), 2);
    }

    #[test]
    fn test_card_names_keep_inner_spaces_and_case() {
        let parsed = parse_deck("2   Blue-Eyes White Dragon  \n1 blue-eyes white dragon");
        assert_eq!(parsed.deck.count_of("Blue-Eyes White Dragon"), 2);
        assert_eq!(parsed.deck.count_of("blue-eyes white dragon"), 1);
    }

    #[test]
    fn test_errors_accumulate_and_parsing_continues() {
        let parsed = parse_deck("Foo\n2 Bar\n0 Baz\nthree Qux\n1 Quux");
        assert_eq!(parsed.errors.len(), 3);
        assert_eq!(
            parsed.errors[0],
            DeckLineError::InvalidLine { line: 1, text: "Foo".to_string() }
        );
        assert_eq!(
            parsed.errors[1],
            DeckLineError::InvalidCount { line: 3, text: "0 Baz".to_string() }
        );
        assert_eq!(parsed.errors[2].line(), 4);
        assert_eq!(parsed.deck.count_of("Bar"), 2);
        assert_eq!(parsed.deck.count_of("Quux"), 1);
    }

    #[test]
    fn test_error_messages() {
        let parsed = parse_deck("-1 Foo\n0 Bar");
        let messages: Vec<String> = parsed.errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(messages, vec!["Invalid line: \"-1 Foo\"", "Invalid count in: \"0 Bar\""]);
    }

    #[test]
    fn test_count_without_name_is_invalid() {
        let parsed = parse_deck("3");
        assert!(matches!(parsed.errors[0], DeckLineError::InvalidLine { .. }));
    }

    #[test]
    fn test_zero_total_yields_empty_deck() {
        let parsed = parse_deck("0 total");
        assert!(parsed.is_ok());
        assert!(parsed.deck.is_empty());
    }

    #[test]
    fn test_overflowing_count_is_invalid_count() {
        let parsed = parse_deck("99999999999999999999999 Foo");
        assert!(matches!(parsed.errors[0], DeckLineError::InvalidCount { .. }));
    }

    #[test]
    fn test_huge_counts_do_not_overflow() {
        let parsed = parse_deck("18446744073709551615 Foo\n1 Bar");
        assert!(parsed.is_ok());
        assert_eq!(parsed.total(), DEFAULT_DECK_SIZE);
        assert_eq!(parsed.deck.count_of("Foo"), DEFAULT_DECK_SIZE);
        assert_eq!(parsed.deck.count_of("Bar"), 0);
    }

    #[test]
    fn test_total_above_max_is_invalid_count() {
        let parsed = parse_deck("18446744073709551615 total\n3 Foo\n100000000000000 total");
        assert_eq!(parsed.errors.len(), 2);
        assert!(matches!(parsed.errors[0], DeckLineError::InvalidCount { line: 1, .. }));
        assert!(matches!(parsed.errors[1], DeckLineError::InvalidCount { line: 3, .. }));
        assert_eq!(parsed.total(), DEFAULT_DECK_SIZE);
        assert_eq!(parsed.deck.count_of("Foo"), 3);
    }

    #[test]
    fn test_total_at_max_is_accepted() {
        let parsed = parse_deck(&format!("{} total\n3 Foo", MAX_DECK_SIZE));
        assert!(parsed.is_ok());
        assert_eq!(parsed.total(), MAX_DECK_SIZE);
    }
}
