//! Built-in deck and combo texts

/// Sample 40-card list with both kinds of effect cards
pub const DEFAULT_DECK: &str = "# Add your deck here
40 total
3 card a
3 card b
3 card c
3 card d
3 card e
3 card f
1 card g
2 draw2
3 pickfrom6";

/// Combo lines that go with `DEFAULT_DECK`
pub const DEFAULT_COMBO: &str = "# Add your combo requirements here
card a
card b + (card c | card d)
card b + 2 card e
card b + card f + -1 card g";

/// Starting point for a new deck
pub const NEW_DECK: &str = "# New Deck\n40 total\n\n# Add your cards here";

/// Starting point for a new combo
pub const NEW_COMBO: &str = "# New Combo\n\n# Add your combo requirements here";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// The sample deck/combo
    Default,
    /// An empty template
    New,
}

impl Preset {
    pub fn deck(&self) -> &'static str {
        match self {
            Preset::Default => DEFAULT_DECK,
            Preset::New => NEW_DECK,
        }
    }

    pub fn combo(&self) -> &'static str {
        match self {
            Preset::Default => DEFAULT_COMBO,
            Preset::New => NEW_COMBO,
        }
    }
}
