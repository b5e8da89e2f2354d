use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardParseError {
    #[error("card name is empty")]
    Empty,
    #[error("card name too long: {0} bytes")]
    TooLong(usize),
}

/// A draftable card, identified only by its name.
///
/// The draft never looks inside a card; two cards are the same card when
/// their names are equal.
///
/// ```
/// use booster_draft::cards::Card;
///
/// let bolt: Card = "Lightning Bolt".parse().unwrap();
/// assert_eq!(bolt, Card::new("Lightning Bolt"));
/// assert_eq!(bolt.to_string(), "Lightning Bolt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(String);

impl Card {
    pub const MAX_NAME_LEN: usize = 256;

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(CardParseError::Empty);
        }
        if name.len() > Self::MAX_NAME_LEN {
            return Err(CardParseError::TooLong(name.len()));
        }
        Ok(Self(name.to_string()))
    }
}

impl From<&str> for Card {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Card {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Parse a list of card names separated by commas, semicolons or newlines.
///
/// Names may contain spaces, so whitespace alone never splits two cards.
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardParseError> {
    input
        .split(|c: char| c == ',' || c == ';' || c == '\n')
        .filter(|s| !s.trim().is_empty())
        .map(Card::from_str)
        .collect()
}

/// `count` cards named `"Card 0"`, `"Card 1"`, ... in order.
pub fn numbered_cards(count: usize) -> Vec<Card> {
    (0..count).map(|i| Card(format!("Card {i}"))).collect()
}
