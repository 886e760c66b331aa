use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the six seats at a full-ring-lite table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Seat {
    Utg,
    Hj,
    Co,
    Btn,
    Sb,
    Bb,
}

impl Seat {
    /// Preflop acting order, also the order seats are listed for display.
    pub const TABLE_ORDER: [Seat; 6] =
        [Seat::Utg, Seat::Hj, Seat::Co, Seat::Btn, Seat::Sb, Seat::Bb];

    pub fn label(self) -> &'static str {
        match self {
            Seat::Utg => "UTG",
            Seat::Hj => "HJ",
            Seat::Co => "CO",
            Seat::Btn => "BTN",
            Seat::Sb => "SB",
            Seat::Bb => "BB",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Seat::Utg => "Under the Gun",
            Seat::Hj => "Hijack",
            Seat::Co => "Cut-Off",
            Seat::Btn => "Button",
            Seat::Sb => "Small Blind",
            Seat::Bb => "Big Blind",
        }
    }

    /// Postflop acting order: the blinds act first on every street.
    pub fn postflop_index(self) -> usize {
        match self {
            Seat::Sb => 0,
            Seat::Bb => 1,
            Seat::Utg => 2,
            Seat::Hj => 3,
            Seat::Co => 4,
            Seat::Btn => 5,
        }
    }
}

impl Display for Seat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Seat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UTG" => Ok(Seat::Utg),
            "HJ" => Ok(Seat::Hj),
            "CO" => Ok(Seat::Co),
            "BTN" | "BU" => Ok(Seat::Btn),
            "SB" => Ok(Seat::Sb),
            "BB" => Ok(Seat::Bb),
            _ => Err(format!("Invalid seat '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelativePosition {
    #[serde(rename = "IP")]
    InPosition,
    #[serde(rename = "OOP")]
    OutOfPosition,
}

impl RelativePosition {
    pub fn label(self) -> &'static str {
        match self {
            RelativePosition::InPosition => "IP",
            RelativePosition::OutOfPosition => "OOP",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            RelativePosition::InPosition => "In Position",
            RelativePosition::OutOfPosition => "Out of Position",
        }
    }
}

impl FromStr for RelativePosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ip" | "in position" => Ok(RelativePosition::InPosition),
            "oop" | "out of position" => Ok(RelativePosition::OutOfPosition),
            _ => Err(format!("Invalid relative position '{s}'")),
        }
    }
}

/// Hero position as found in the datasets: older rows name the seat, newer
/// rows only say whether hero is in or out of position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroPosition {
    Seat(Seat),
    Relative(RelativePosition),
}

impl HeroPosition {
    pub fn label(self) -> &'static str {
        match self {
            HeroPosition::Seat(seat) => seat.label(),
            HeroPosition::Relative(rel) => rel.label(),
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            HeroPosition::Seat(seat) => seat.full_name(),
            HeroPosition::Relative(rel) => rel.full_name(),
        }
    }
}

impl FromStr for HeroPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Seat>()
            .map(HeroPosition::Seat)
            .or_else(|_| s.parse::<RelativePosition>().map(HeroPosition::Relative))
            .map_err(|_| format!("Invalid hero position '{s}'"))
    }
}

/// The two seats contesting a postflop pot, ordered by who acts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matchup {
    pub oop: Seat,
    pub ip: Seat,
}

impl Matchup {
    pub fn new(a: Seat, b: Seat) -> Self {
        if a.postflop_index() <= b.postflop_index() {
            Self { oop: a, ip: b }
        } else {
            Self { oop: b, ip: a }
        }
    }

    pub fn seat(&self, position: RelativePosition) -> Seat {
        match position {
            RelativePosition::InPosition => self.ip,
            RelativePosition::OutOfPosition => self.oop,
        }
    }

    pub fn position_of(&self, seat: Seat) -> Option<RelativePosition> {
        if seat == self.ip {
            Some(RelativePosition::InPosition)
        } else if seat == self.oop {
            Some(RelativePosition::OutOfPosition)
        } else {
            None
        }
    }

    pub fn contains(&self, seat: Seat) -> bool {
        self.position_of(seat).is_some()
    }

    pub fn opponent(&self, seat: Seat) -> Seat {
        if seat == self.ip { self.oop } else { self.ip }
    }
}

impl Default for Matchup {
    fn default() -> Self {
        Self::new(Seat::Utg, Seat::Bb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blinds_are_out_of_position() {
        let matchup = Matchup::new(Seat::Btn, Seat::Bb);
        assert_eq!(matchup.oop, Seat::Bb);
        assert_eq!(matchup.ip, Seat::Btn);

        let matchup = Matchup::new(Seat::Co, Seat::Hj);
        assert_eq!(matchup.oop, Seat::Hj);
        assert_eq!(matchup.ip, Seat::Co);
    }

    #[test]
    fn hero_position_accepts_both_encodings() {
        assert_eq!("btn".parse::<HeroPosition>(), Ok(HeroPosition::Seat(Seat::Btn)));
        assert_eq!(
            "IP".parse::<HeroPosition>(),
            Ok(HeroPosition::Relative(RelativePosition::InPosition))
        );
        assert_eq!(
            "Out of Position".parse::<HeroPosition>(),
            Ok(HeroPosition::Relative(RelativePosition::OutOfPosition))
        );
        assert!("dealer".parse::<HeroPosition>().is_err());
    }
}
