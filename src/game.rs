use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::seat::Seat;

/// Forced blinds in big-blind units (SB 0.5 + BB 1.0).
pub const BLINDS_BB: f64 = 1.5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }
}

/// A lower-case move label as used by the datasets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum Move {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
    Other(String),
}

impl Move {
    pub const DEFAULT_CHOICES: [Move; 3] = [Move::Fold, Move::Call, Move::Raise];

    pub fn from_label(s: &str) -> Self {
        let label = s.trim().to_lowercase();
        match label.as_str() {
            "fold" | "folds" => Move::Fold,
            "check" | "checks" => Move::Check,
            "call" | "calls" => Move::Call,
            "bet" | "bets" => Move::Bet,
            "raise" | "raises" => Move::Raise,
            "allin" | "all-in" | "all_in" | "jam" => Move::AllIn,
            _ => Move::Other(label),
        }
    }

    pub fn is_fold(&self) -> bool {
        matches!(self, Move::Fold)
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Fold => f.write_str("fold"),
            Move::Check => f.write_str("check"),
            Move::Call => f.write_str("call"),
            Move::Bet => f.write_str("bet"),
            Move::Raise => f.write_str("raise"),
            Move::AllIn => f.write_str("allin"),
            Move::Other(label) => f.write_str(label),
        }
    }
}

impl FromStr for Move {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Move::from_label(s))
    }
}

/// Parses the dataset encoding of the legal moves, e.g. `['fold', 'call']`.
///
/// Both single- and double-quoted lists are accepted.
pub fn parse_available_moves(raw: &str) -> Result<Vec<Move>, serde_json::Error> {
    let labels: Vec<String> = serde_json::from_str(&raw.replace('\'', "\""))?;
    Ok(labels.iter().map(|label| Move::from_label(label)).collect())
}

/// Like [`parse_available_moves`] but falls back to fold/call/raise.
pub fn available_moves_or_default(raw: &str) -> Vec<Move> {
    parse_available_moves(raw).unwrap_or_else(|_| Move::DEFAULT_CHOICES.to_vec())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    pub player: Seat,
    pub action: Move,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub pot_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetEvent {
    pub street: Street,
    /// Cards revealed at this boundary only.
    pub board: Vec<String>,
    pub pot_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Action(ActionEvent),
    Street(StreetEvent),
}

impl Event {
    pub fn pot_size(&self) -> f64 {
        match self {
            Event::Action(action) => action.pot_size,
            Event::Street(street) => street.pot_size,
        }
    }
}

/// Something in the source row that the parser had to paper over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandFlag {
    UnknownPreflopActor { label: String },
    MissingPreflopMove { seat: Seat },
    FallbackMatchup,
    Multiway { seats: Vec<Seat> },
    UnknownHeroPosition { label: String },
    HeroNotInHand { hero: Seat },
    MalformedPostflopToken { token: String },
    UnknownPostflopActor { label: String },
    MissingBoardCard { street: Street },
    StreetOverflow,
    DefaultAvailableMoves,
}

/// Structured replay of one dataset row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedHand {
    pub players: Vec<Seat>,
    pub hero_id: Seat,
    pub villain_id: Seat,
    pub hero_in_position: bool,
    pub hand: String,
    pub actions: Vec<Event>,
    pub available_moves: Vec<Move>,
    pub correct_decision: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<HandFlag>,
}

impl ParsedHand {
    /// Every board card visible once `street` has been dealt.
    pub fn board_through(&self, street: Street) -> Vec<String> {
        let mut board = Vec::new();
        for event in &self.actions {
            if let Event::Street(reveal) = event {
                if reveal.street > street {
                    break;
                }
                board.extend(reveal.board.iter().cloned());
            }
        }
        board
    }

    pub fn final_pot(&self) -> f64 {
        self.actions.last().map(Event::pot_size).unwrap_or(BLINDS_BB)
    }

    pub fn street_events(&self) -> impl Iterator<Item = &StreetEvent> {
        self.actions.iter().filter_map(|event| match event {
            Event::Street(street) => Some(street),
            Event::Action(_) => None,
        })
    }

    pub fn has_flag(&self, predicate: impl Fn(&HandFlag) -> bool) -> bool {
        self.flags.iter().any(predicate)
    }
}
