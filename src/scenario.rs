use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::render_cards;
use crate::dataset::{PostflopRecord, PreflopRecord};
use crate::game::{Event, Move, ParsedHand, Street, available_moves_or_default};
use crate::history::PreflopLine;
use crate::seat::HeroPosition;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Preflop,
    Postflop,
}

/// Which pool(s) to sample from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioFilter {
    Preflop,
    Postflop,
    #[default]
    Mixed,
}

impl ScenarioFilter {
    pub fn includes(self, kind: ScenarioKind) -> bool {
        matches!(
            (self, kind),
            (ScenarioFilter::Mixed, _)
                | (ScenarioFilter::Preflop, ScenarioKind::Preflop)
                | (ScenarioFilter::Postflop, ScenarioKind::Postflop)
        )
    }
}

impl Display for ScenarioFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ScenarioFilter::Preflop => "preflop",
            ScenarioFilter::Postflop => "postflop",
            ScenarioFilter::Mixed => "mixed",
        })
    }
}

impl FromStr for ScenarioFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preflop" => Ok(ScenarioFilter::Preflop),
            "postflop" => Ok(ScenarioFilter::Postflop),
            "mixed" | "" => Ok(ScenarioFilter::Mixed),
            _ => Err(format!("Invalid scenario type '{s}'")),
        }
    }
}

/// A single quiz question with display-ready strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    #[serde(rename = "type")]
    pub kind: ScenarioKind,
    pub position: String,
    pub hand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preflop_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postflop_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_players: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_bets: Option<String>,
    pub pot_size: String,
    pub available_moves: Vec<Move>,
    pub output: String,
}

impl Scenario {
    pub fn from_preflop(record: &PreflopRecord) -> Self {
        Self {
            kind: ScenarioKind::Preflop,
            position: describe_position(&record.hero_pos),
            hand: render_cards(&record.hero_holding),
            preflop_history: Some(describe_preflop(&record.prev_line)),
            board: None,
            postflop_action: None,
            num_players: non_empty(&record.num_players),
            num_bets: non_empty(&record.num_bets),
            pot_size: format_pot(&record.pot_size, None),
            available_moves: available_moves_or_default(&record.available_moves),
            output: record.correct_decision.trim().to_string(),
        }
    }

    pub fn from_postflop(record: &PostflopRecord, hand: &ParsedHand) -> Self {
        let board = [&record.board_flop, &record.board_turn, &record.board_river]
            .iter()
            .map(|cards| cards.trim())
            .filter(|cards| !cards.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let mut steps = Vec::new();
        let mut after_flop = false;
        for event in &hand.actions {
            match event {
                Event::Street(reveal) if reveal.street == Street::Flop => after_flop = true,
                Event::Street(reveal) => {
                    let cards = render_cards(&reveal.board.join(" "));
                    let name = if reveal.street == Street::Turn { "turn" } else { "river" };
                    steps.push(format!("{name} {cards}").trim_end().to_string());
                }
                Event::Action(action) if after_flop => {
                    let who = if action.player == hand.hero_id {
                        "Hero"
                    } else {
                        "Villain"
                    };
                    steps.push(format!(
                        "{who} {}",
                        describe_move(&action.action, action.amount.filter(|a| *a > 0.0))
                    ));
                }
                Event::Action(_) => {}
            }
        }

        Self {
            kind: ScenarioKind::Postflop,
            position: describe_position(&record.hero_position),
            hand: render_cards(&record.holding),
            preflop_history: Some(describe_preflop(&record.preflop_action)),
            board: Some(render_cards(&board)),
            postflop_action: Some(steps.join(", ")),
            num_players: None,
            num_bets: None,
            pot_size: format_pot(&record.pot_size, Some(hand.final_pot())),
            available_moves: hand.available_moves.clone(),
            output: record.correct_decision.trim().to_string(),
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

fn describe_position(raw: &str) -> String {
    raw.parse::<HeroPosition>()
        .map(|position| position.full_name().to_string())
        .unwrap_or_else(|_| raw.trim().to_string())
}

fn format_pot(raw: &str, computed: Option<f64>) -> String {
    match (non_empty(raw), computed) {
        (Some(raw), _) => format!("{raw}bb"),
        (None, Some(pot)) => format!("{pot}bb"),
        (None, None) => "0bb".to_string(),
    }
}

/// Sentence fragment for one move, e.g. `raises to 2.5bb`.
pub fn describe_move(action: &Move, amount: Option<f64>) -> String {
    match (action, amount) {
        (Move::Raise, Some(amount)) => format!("raises to {amount}bb"),
        (Move::Bet, Some(amount)) => format!("bets {amount}bb"),
        (Move::Call, Some(amount)) => format!("calls {amount}bb"),
        (Move::AllIn, _) => "goes all-in".to_string(),
        (Move::Other(label), Some(amount)) => format!("{label} {amount}bb"),
        (Move::Other(label), None) => label.clone(),
        (action, _) => format!("{action}s"),
    }
}

/// Renders an encoded preflop line as a readable sentence.
pub fn describe_preflop(raw: &str) -> String {
    let mut ignored = Vec::new();
    let line = PreflopLine::parse(raw, &mut ignored);
    if line.steps.is_empty() {
        return "Action folds to you.".to_string();
    }
    line.steps
        .iter()
        .map(|step| {
            format!("{} {}", step.seat, describe_move(&step.action, step.amount))
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(", ")
}
