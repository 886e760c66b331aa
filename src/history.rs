//! Hand-history reconstruction.
//!
//! A postflop dataset row stores the hand as two compact strings:
//!
//! * `preflop_action`: `actor/move/actor/move/...`, e.g. `UTG/raise2.5bb/BB/call`
//! * `postflop_action`: `/`-separated tokens that are either `dealcards` or
//!   `{actor}_{move}[_{amount}]`, e.g. `OOP_CHECK/IP_BET_6/dealcards/OOP_CHECK`
//!
//! [`parse_hand_history`] turns these into an ordered list of [`Event`]s with
//! a running pot. It never fails; anything it cannot make sense of is
//! recorded as a [`HandFlag`] on the result.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use tracing::debug;

use crate::cards::split_cards;
use crate::dataset::PostflopRecord;
use crate::game::{
    ActionEvent, BLINDS_BB, Event, HandFlag, Move, ParsedHand, Street, StreetEvent,
    parse_available_moves,
};
use crate::seat::{HeroPosition, Matchup, RelativePosition, Seat};

const DEAL_MARKER: &str = "dealcards";

static MOVE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_-]*)\s*([0-9]*\.?[0-9]+)?").expect("move pattern is valid")
});

static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*\.?[0-9]+$").expect("amount pattern is valid"));

/// One `actor/move` pair of the preflop line.
#[derive(Debug, Clone, PartialEq)]
pub struct PreflopStep {
    pub seat: Seat,
    pub action: Move,
    pub amount: Option<f64>,
}

/// The decoded preflop line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreflopLine {
    pub steps: Vec<PreflopStep>,
}

impl PreflopLine {
    /// Decodes `actor/move/...` pairwise by position. Pairs with an empty
    /// actor and a dangling actor are skipped; pairs whose actor is not a
    /// seat are skipped and flagged. An empty move is kept as an empty
    /// `Other` move and flagged.
    pub fn parse(raw: &str, flags: &mut Vec<HandFlag>) -> Self {
        let steps = raw
            .split('/')
            .map(str::trim)
            .tuples::<(&str, &str)>()
            .filter(|(actor, _)| !actor.is_empty())
            .filter_map(|(actor, token)| match actor.parse::<Seat>() {
                Ok(seat) if token.is_empty() => {
                    flags.push(HandFlag::MissingPreflopMove { seat });
                    Some(PreflopStep {
                        seat,
                        action: Move::Other(String::new()),
                        amount: None,
                    })
                }
                Ok(seat) => {
                    let (action, amount) = split_move_token(token);
                    Some(PreflopStep {
                        seat,
                        action,
                        amount,
                    })
                }
                Err(_) => {
                    flags.push(HandFlag::UnknownPreflopActor {
                        label: actor.to_string(),
                    });
                    None
                }
            })
            .collect();
        Self { steps }
    }

    /// The first actor and the last actor who did not fold are assumed to be
    /// the two players who see the flop.
    pub fn participants(&self) -> Option<(Seat, Seat)> {
        let first = self.steps.first()?.seat;
        let last = self
            .steps
            .iter()
            .rev()
            .find(|step| !step.action.is_fold())?
            .seat;
        (first != last).then_some((first, last))
    }

    /// Seats that put in a voluntary non-fold action, in table order.
    pub fn contesting_seats(&self) -> Vec<Seat> {
        Seat::TABLE_ORDER
            .into_iter()
            .filter(|seat| {
                self.steps
                    .iter()
                    .any(|step| step.seat == *seat && !step.action.is_fold())
            })
            .collect()
    }

    /// The last seat to bet or raise preflop.
    pub fn aggressor(&self) -> Option<Seat> {
        self.steps
            .iter()
            .rev()
            .find(|step| matches!(step.action, Move::Raise | Move::Bet | Move::AllIn))
            .map(|step| step.seat)
    }
}

/// Splits a preflop move token such as `raise2.5bb` into the move and the
/// embedded amount. A bare size (`2.5bb`) is read as a raise.
pub fn split_move_token(token: &str) -> (Move, Option<f64>) {
    let Some(caps) = MOVE_TOKEN.captures(token) else {
        return (Move::from_label(token), None);
    };
    let amount = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<f64>().ok());
    let verb = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

    let action = match (verb.is_empty(), amount) {
        (true, Some(_)) => Move::Raise,
        (true, None) => Move::from_label(token),
        (false, _) => Move::from_label(verb),
    };
    (action, amount)
}

/// Running pot plus the events emitted so far.
struct Replay {
    pot: f64,
    events: Vec<Event>,
}

impl Replay {
    fn new() -> Self {
        Self {
            pot: BLINDS_BB,
            events: Vec::new(),
        }
    }

    fn action(&mut self, player: Seat, action: Move, amount: Option<f64>) {
        self.pot += amount.unwrap_or(0.0);
        self.events.push(Event::Action(ActionEvent {
            player,
            action,
            amount,
            pot_size: round_pot(self.pot),
        }));
    }

    fn reveal(&mut self, street: Street, board: Vec<String>) {
        self.events.push(Event::Street(StreetEvent {
            street,
            board,
            pot_size: round_pot(self.pot),
        }));
    }
}

/// Plain decimal amount (`6`, `15.5`, `.5`); anything else counts as 0.
fn parse_amount(raw: &str) -> f64 {
    let raw = raw.trim();
    if !AMOUNT.is_match(raw) {
        return 0.0;
    }
    raw.parse::<f64>().unwrap_or(0.0)
}

fn round_pot(pot: f64) -> f64 {
    (pot * 100.0).round() / 100.0
}

/// Resolves hero to an absolute seat, possibly correcting the matchup when
/// the row names a seat the preflop heuristic did not pick.
fn resolve_hero(
    raw: &str,
    line: &PreflopLine,
    matchup: &mut Matchup,
    flags: &mut Vec<HandFlag>,
) -> Seat {
    match raw.parse::<HeroPosition>() {
        Ok(HeroPosition::Relative(position)) => matchup.seat(position),
        Ok(HeroPosition::Seat(seat)) => {
            if !matchup.contains(seat) {
                flags.push(HandFlag::HeroNotInHand { hero: seat });
                let partner = match line.participants() {
                    Some((_, last)) if last != seat => last,
                    Some((first, _)) => first,
                    None => matchup.opponent(seat),
                };
                if partner != seat {
                    *matchup = Matchup::new(seat, partner);
                }
            }
            seat
        }
        Err(_) => {
            flags.push(HandFlag::UnknownHeroPosition {
                label: raw.to_string(),
            });
            matchup.oop
        }
    }
}

fn resolve_actor(
    label: &str,
    matchup: &Matchup,
    aggressor: Option<Seat>,
    flags: &mut Vec<HandFlag>,
) -> Seat {
    if let Ok(position) = label.parse::<RelativePosition>() {
        return matchup.seat(position);
    }
    if let Ok(seat) = label.parse::<Seat>()
        && matchup.contains(seat)
    {
        return seat;
    }
    let aggressor = aggressor.filter(|seat| matchup.contains(*seat));
    match (label.to_ascii_uppercase().as_str(), aggressor) {
        ("PFR" | "AGG" | "AGGRESSOR", Some(seat)) => seat,
        ("PFC" | "CALLER" | "DEFENDER", Some(seat)) => matchup.opponent(seat),
        _ => {
            flags.push(HandFlag::UnknownPostflopActor {
                label: label.to_string(),
            });
            matchup.oop
        }
    }
}

fn board_for(record: &PostflopRecord, street: Street) -> &str {
    match street {
        Street::Turn => &record.board_turn,
        Street::River => &record.board_river,
        Street::Preflop | Street::Flop => &record.board_flop,
    }
}

/// Rebuilds the full action sequence of a postflop dataset row.
pub fn parse_hand_history(record: &PostflopRecord) -> ParsedHand {
    let mut flags = Vec::new();

    let line = PreflopLine::parse(&record.preflop_action, &mut flags);
    let mut matchup = match line.participants() {
        Some((first, last)) => Matchup::new(first, last),
        None => {
            flags.push(HandFlag::FallbackMatchup);
            Matchup::default()
        }
    };

    let contesting = line.contesting_seats();
    if contesting.len() > 2 {
        flags.push(HandFlag::Multiway { seats: contesting });
    }

    let hero = resolve_hero(&record.hero_position, &line, &mut matchup, &mut flags);
    let aggressor = line.aggressor();

    let mut replay = Replay::new();
    for step in &line.steps {
        replay.action(step.seat, step.action.clone(), step.amount);
    }

    replay.reveal(Street::Flop, split_cards(&record.board_flop));

    let mut street = Street::Flop;
    for token in record
        .postflop_action
        .split('/')
        .map(str::trim)
        .filter(|token| !token.is_empty())
    {
        if token.eq_ignore_ascii_case(DEAL_MARKER) {
            let Some(next) = street.next() else {
                flags.push(HandFlag::StreetOverflow);
                continue;
            };
            street = next;
            let board = split_cards(board_for(record, street));
            if board.is_empty() {
                flags.push(HandFlag::MissingBoardCard { street });
            }
            replay.reveal(street, board);
            continue;
        }

        let parts: Vec<&str> = token.split('_').collect();
        if parts.len() < 2 {
            flags.push(HandFlag::MalformedPostflopToken {
                token: token.to_string(),
            });
            continue;
        }

        let player = resolve_actor(parts[0], &matchup, aggressor, &mut flags);
        let amount = parts.get(2).map_or(0.0, |raw| parse_amount(raw));
        replay.action(player, Move::from_label(parts[1]), Some(amount));
    }

    let available_moves = match parse_available_moves(&record.available_moves) {
        Ok(moves) => moves,
        Err(_) => {
            flags.push(HandFlag::DefaultAvailableMoves);
            Move::DEFAULT_CHOICES.to_vec()
        }
    };

    if !flags.is_empty() {
        debug!(?flags, preflop = %record.preflop_action, "hand history parsed with anomalies");
    }

    ParsedHand {
        players: Seat::TABLE_ORDER.to_vec(),
        hero_id: hero,
        villain_id: matchup.opponent(hero),
        hero_in_position: matchup.position_of(hero) == Some(RelativePosition::InPosition),
        hand: record.holding.trim().to_string(),
        actions: replay.events,
        available_moves,
        correct_decision: record.correct_decision.clone(),
        flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_token_with_embedded_size() {
        assert_eq!(split_move_token("raise2.5bb"), (Move::Raise, Some(2.5)));
        assert_eq!(split_move_token("2.5bb"), (Move::Raise, Some(2.5)));
        assert_eq!(split_move_token("call"), (Move::Call, None));
        assert_eq!(split_move_token("raise10"), (Move::Raise, Some(10.0)));
        assert_eq!(split_move_token("FOLD"), (Move::Fold, None));
    }

    #[test]
    fn preflop_line_skips_dangling_actor_and_trailing_slash() {
        let mut flags = Vec::new();
        let line = PreflopLine::parse("UTG/raise2.5bb/BB/call/SB", &mut flags);
        assert_eq!(line.steps.len(), 2);
        let line = PreflopLine::parse("UTG/raise2.5bb/BB/call/", &mut flags);
        assert_eq!(line.steps.len(), 2);
        let line = PreflopLine::parse("UTG/raise2.5bb///BB/call", &mut flags);
        assert_eq!(line.steps.len(), 2);
        assert!(flags.is_empty());
    }

    #[test]
    fn empty_preflop_move_keeps_pairing() {
        let mut flags = Vec::new();
        let line = PreflopLine::parse("UTG//BB/call", &mut flags);
        assert_eq!(
            line.steps,
            vec![
                PreflopStep {
                    seat: Seat::Utg,
                    action: Move::Other(String::new()),
                    amount: None,
                },
                PreflopStep {
                    seat: Seat::Bb,
                    action: Move::Call,
                    amount: None,
                },
            ]
        );
        assert_eq!(line.participants(), Some((Seat::Utg, Seat::Bb)));
        assert_eq!(flags, vec![HandFlag::MissingPreflopMove { seat: Seat::Utg }]);
    }

    #[test]
    fn postflop_amount_accepts_plain_decimals_only() {
        assert_eq!(parse_amount("6"), 6.0);
        assert_eq!(parse_amount(" 15.5 "), 15.5);
        assert_eq!(parse_amount(".5"), 0.5);
        for raw in ["nan", "NaN", "inf", "-inf", "infinity", "1e3", "-4", "lots", ""] {
            assert_eq!(parse_amount(raw), 0.0, "{raw}");
        }
    }

    #[test]
    fn preflop_line_flags_unknown_actor() {
        let mut flags = Vec::new();
        let line = PreflopLine::parse("UTG/raise2.5bb/XX/call/BB/call", &mut flags);
        assert_eq!(line.steps.len(), 2);
        assert_eq!(
            flags,
            vec![HandFlag::UnknownPreflopActor { label: "XX".into() }]
        );
    }

    #[test]
    fn participants_ignore_trailing_folds() {
        let mut flags = Vec::new();
        let line = PreflopLine::parse("CO/raise2.5bb/BTN/call/SB/fold/BB/fold", &mut flags);
        assert_eq!(line.participants(), Some((Seat::Co, Seat::Btn)));
        assert_eq!(line.aggressor(), Some(Seat::Co));
    }

    #[test]
    fn pot_is_rounded_to_cents() {
        assert_eq!(round_pot(1.5 + 0.1 + 0.2), 1.8);
    }
}
