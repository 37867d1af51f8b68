use super::{ComboSpec, Condition, Line, Requirement};
use thiserror::Error;
use tracing::debug;

/// Why a combo line could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComboSyntaxError {
    #[error("empty requirement")]
    EmptyRequirement,
    #[error("missing card name after count {0}")]
    MissingCardName(String),
    #[error("count must be at least 1")]
    ZeroCount,
    #[error("count '{0}' is too large")]
    CountOverflow(String),
    #[error("group '{0}' is missing a closing ')'")]
    UnclosedGroup(String),
    #[error("nested parentheses are not supported in '{0}'")]
    NestedGroup(String),
    #[error("'|' is only allowed inside parentheses in '{0}'")]
    BarOutsideGroup(String),
}

/// A combo line that failed to parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error parsing: \"{text}\" - {reason}")]
pub struct ComboParseError {
    /// 1-based line number in the source text
    pub line: usize,
    pub text: String,
    pub reason: ComboSyntaxError,
}

/// Result of parsing combo text: every well-formed line plus every error found
#[derive(Debug, Clone, Default)]
pub struct ParsedCombo {
    pub combo: ComboSpec,
    pub errors: Vec<ComboParseError>,
}

impl ParsedCombo {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse combo text, one line per alternative.
///
/// ```text
/// requirement := ['-'] [INT] cardName
/// orGroup     := '(' requirement ('|' requirement)* ')' | requirement
/// line        := orGroup ('+' orGroup)*
/// ```
///
/// A leading `-` checks the remaining deck instead of the hand. Blank lines
/// and `#` comments are skipped; a malformed line is recorded as an error and
/// the remaining lines are still parsed.
pub fn parse_combo(text: &str) -> ParsedCombo {
    let mut parsed = ParsedCombo::default();

    for (line_num, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(trimmed) {
            Ok(line) => parsed.combo.lines.push(line),
            Err(reason) => parsed.errors.push(ComboParseError {
                line: line_num + 1,
                text: trimmed.to_string(),
                reason,
            }),
        }
    }

    debug!(
        lines = parsed.combo.lines.len(),
        errors = parsed.errors.len(),
        "parsed combo"
    );
    parsed
}

fn parse_line(line: &str) -> Result<Line, ComboSyntaxError> {
    let all_of = line
        .split('+')
        .map(|part| parse_group(part.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Line { all_of })
}

fn parse_group(group: &str) -> Result<Condition, ComboSyntaxError> {
    if let Some(open) = group.strip_prefix('(') {
        let inner = open
            .strip_suffix(')')
            .ok_or_else(|| ComboSyntaxError::UnclosedGroup(group.to_string()))?;
        if inner.contains('(') || inner.contains(')') {
            return Err(ComboSyntaxError::NestedGroup(group.to_string()));
        }
        let any_of = inner
            .split('|')
            .map(|part| parse_requirement(part.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Condition { any_of });
    }

    if group.contains('|') {
        return Err(ComboSyntaxError::BarOutsideGroup(group.to_string()));
    }

    Ok(Condition { any_of: vec![parse_requirement(group)?] })
}

fn parse_requirement(text: &str) -> Result<Requirement, ComboSyntaxError> {
    let (in_deck, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    if body.is_empty() {
        return Err(ComboSyntaxError::EmptyRequirement);
    }

    let digits = body.bytes().take_while(|b| b.is_ascii_digit()).count();
    let rest = &body[digits..];

    let (count, card) = if digits > 0 && (rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        let count_str = &body[..digits];
        let card = rest.trim();
        if card.is_empty() {
            return Err(ComboSyntaxError::MissingCardName(count_str.to_string()));
        }
        let count: usize = count_str
            .parse()
            .map_err(|_| ComboSyntaxError::CountOverflow(count_str.to_string()))?;
        if count == 0 {
            return Err(ComboSyntaxError::ZeroCount);
        }
        (count, card)
    } else {
        // No count: the whole text is the card name
        (1, body)
    };

    Ok(if in_deck {
        Requirement::in_deck(card, count)
    } else {
        Requirement::in_hand(card, count)
    })
}
