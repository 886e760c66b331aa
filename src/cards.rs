use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static CARD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(10|[AKQJT2-9])([shdc])").expect("card pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    const ALL: [(Suit, char, &'static str); 4] = [
        (Suit::Clubs, 'c', "♣"),
        (Suit::Diamonds, 'd', "♦"),
        (Suit::Hearts, 'h', "♥"),
        (Suit::Spades, 's', "♠"),
    ];

    fn entry(self) -> (Suit, char, &'static str) {
        Self::ALL[self as usize]
    }

    pub fn symbol(self) -> &'static str {
        self.entry().2
    }

    pub fn letter(self) -> char {
        self.entry().1
    }
}

impl FromStr for Suit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .iter()
            .find(|(_, letter, symbol)| lower == letter.to_string() || lower == *symbol)
            .map(|(suit, _, _)| *suit)
            .ok_or_else(|| format!("Invalid suit '{s}'"))
    }
}

/// Card rank, stored as its dataset character (`T` for ten).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rank(char);

impl Rank {
    const LABELS: &'static str = "23456789TJQKA";

    pub fn short_label(self) -> char {
        self.0
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        let mut chars = upper.chars();
        let label = match (chars.next(), chars.next(), chars.next()) {
            (Some('1'), Some('0'), None) => 'T',
            (Some(label), None, None) if Self::LABELS.contains(label) => label,
            _ => return Err(format!("Invalid rank '{s}'")),
        };
        Ok(Rank(label))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Dataset notation, e.g. `Ah` or `Td`.
    pub fn label(&self) -> String {
        format!("{}{}", self.rank.short_label(), self.suit.letter())
    }

    pub fn notation(&self) -> String {
        format!("{}{}", self.rank.short_label(), self.suit.symbol())
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.notation())
    }
}

impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .char_indices()
            .last()
            .map(|(idx, _)| idx)
            .ok_or_else(|| "Empty card".to_string())?;
        if split == 0 {
            return Err(format!("Invalid card '{s}'"));
        }
        let (rank, suit) = s.split_at(split);
        Ok(Card::new(rank.parse()?, suit.parse()?))
    }
}

/// Splits a concatenated card string such as `Ah7h2d` or `10hJc` into
/// individual card labels.
///
/// Whitespace and commas between cards are ignored. Tokens that do not form
/// a valid card are kept verbatim (two characters at a time) so a malformed
/// board still renders something.
pub fn split_cards(s: &str) -> Vec<String> {
    let chars: Vec<char> = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    let mut cards = Vec::with_capacity(chars.len() / 2);
    let mut idx = 0;
    while idx < chars.len() {
        let width = if chars[idx] == '1' && chars.get(idx + 1) == Some(&'0') {
            3
        } else {
            2
        };
        let end = (idx + width).min(chars.len());
        let token: String = chars[idx..end].iter().collect();
        match token.parse::<Card>() {
            Ok(card) => cards.push(card.label()),
            Err(_) => cards.push(token),
        }
        idx = end;
    }
    cards
}

/// Replaces suit letters with suit symbols wherever a rank+suit pair appears,
/// leaving the rest of the text untouched.
pub fn render_cards(text: &str) -> String {
    CARD_PATTERN
        .replace_all(text, |caps: &Captures<'_>| {
            let card = format!("{}{}", &caps[1], &caps[2]);
            card.parse::<Card>()
                .map(|c| c.notation())
                .unwrap_or(card)
        })
        .into_owned()
}
