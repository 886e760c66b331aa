use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::dataset::{DEFAULT_POSTFLOP_CSV, DEFAULT_PREFLOP_CSV, Dataset};
use crate::game::{Event, ParsedHand};
use crate::scenario::{Scenario, ScenarioFilter, describe_move};
use crate::session::{IssuedScenario, Session, SessionStats};
use crate::state::TrainerState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    pub rounds: u32,
    pub seed: Option<u64>,
    #[serde(default)]
    pub filter: ScenarioFilter,
    #[serde(default)]
    pub no_color: bool,
    pub preflop_csv: PathBuf,
    pub postflop_csv: PathBuf,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            rounds: 1,
            seed: None,
            filter: ScenarioFilter::Mixed,
            no_color: false,
            preflop_csv: PathBuf::from(DEFAULT_PREFLOP_CSV),
            postflop_csv: PathBuf::from(DEFAULT_POSTFLOP_CSV),
        }
    }
}

impl TrainerConfig {
    pub fn load_state(&self) -> TrainerState {
        TrainerState::new(Dataset::load(&self.preflop_csv, &self.postflop_csv))
    }
}

/// Console front end: asks scenarios one by one and keeps score.
pub struct Trainer {
    config: TrainerConfig,
    state: TrainerState,
    session: Session,
    rng: StdRng,
}

impl Trainer {
    pub fn new(config: TrainerConfig, state: TrainerState) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            state,
            session: Session::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut input = String::new();

        for round in 1..=self.config.rounds {
            let issued = self.next_scenario()?;
            self.print_scenario(round, &issued.scenario);

            loop {
                input.clear();
                print!("Your decision (h=help, q=quit): ");
                io::stdout().flush()?;
                if io::stdin().read_line(&mut input)? == 0 {
                    self.print_summary(&self.session.stats());
                    return Ok(());
                }
                let trimmed = input.trim().to_lowercase();

                match trimmed.as_str() {
                    "q" => {
                        self.print_summary(&self.session.stats());
                        return Ok(());
                    }
                    "h" => self.print_help(&issued.scenario),
                    "" => println!("Type one of the available moves."),
                    answer => {
                        let outcome = self
                            .session
                            .check_answer(Some(issued.scenario_id), answer)?;
                        self.print_verdict(outcome.correct, &outcome.correct_answer);
                        break;
                    }
                }
            }
        }

        self.print_summary(&self.session.stats());
        Ok(())
    }

    /// Answers every round with the stored decision.
    pub fn autoplay(&mut self) -> Result<SessionStats> {
        for _ in 0..self.config.rounds {
            let issued = self.next_scenario()?;
            let answer = issued.scenario.output.clone();
            self.session
                .check_answer(Some(issued.scenario_id), &answer)?;
        }
        Ok(self.session.stats())
    }

    pub fn stats(&self) -> SessionStats {
        self.session.stats()
    }

    /// Draws a random postflop hand and prints its replay.
    pub fn replay(&mut self) -> Result<ParsedHand> {
        let hand = self.state.draw_hand(&mut self.rng)?;
        self.print_hand(&hand);
        Ok(hand)
    }

    fn next_scenario(&mut self) -> Result<IssuedScenario> {
        let scenario = self.state.draw(self.config.filter, &mut self.rng)?;
        Ok(self.session.issue(scenario))
    }

    fn print_scenario(&self, round: u32, scenario: &Scenario) {
        let mut lines = vec![
            format!("Position: {}", scenario.position),
            format!("Hand: {}", scenario.hand),
        ];
        if let Some(history) = &scenario.preflop_history {
            lines.push(format!("Preflop: {history}"));
        }
        if let Some(board) = &scenario.board {
            lines.push(format!("Board: {board}"));
        }
        if let Some(action) = scenario.postflop_action.as_ref().filter(|a| !a.is_empty()) {
            lines.push(format!("Postflop: {action}"));
        }
        lines.push(format!("Pot: {}", scenario.pot_size));

        let header = format!("Round {round}/{}", self.config.rounds);
        if self.config.no_color {
            println!("{header}");
        } else {
            println!("{}", header.bold().cyan());
        }
        for line in lines {
            println!("  {line}");
        }
    }

    fn print_help(&self, scenario: &Scenario) {
        let moves = scenario
            .available_moves
            .iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("Available moves: {moves}");
        println!("Type a move, 'h' to view this help, or 'q' to quit.");
    }

    fn print_verdict(&self, correct: bool, correct_answer: &str) {
        match (correct, self.config.no_color) {
            (true, true) => println!("Correct!"),
            (true, false) => println!("{}", "Correct!".bold().green()),
            (false, true) => println!("Incorrect, the answer was {correct_answer}"),
            (false, false) => println!(
                "{} the answer was {}",
                "Incorrect,".bold().red(),
                correct_answer.bold().yellow()
            ),
        }
    }

    pub fn print_summary(&self, stats: &SessionStats) {
        if self.config.no_color {
            println!(
                "Summary: correct={}, total={}, accuracy={:.1}%",
                stats.correct,
                stats.total,
                stats.accuracy()
            );
        } else {
            println!(
                "{} {} {}/{} {} {:.1}%",
                "Summary".bold().magenta(),
                "Correct".bold().white(),
                stats.correct,
                stats.total,
                "Accuracy".bold().white(),
                stats.accuracy()
            );
        }
    }

    pub fn print_hand(&self, hand: &ParsedHand) {
        let hero = format!("Hero {} holding {}", hand.hero_id, hand.hand);
        if self.config.no_color {
            println!("{hero}");
        } else {
            println!("{}", hero.bold().yellow());
        }

        for event in &hand.actions {
            match event {
                Event::Street(reveal) => {
                    let line = format!(
                        "-- {:?} {} (pot {}bb)",
                        reveal.street,
                        reveal.board.join(" "),
                        reveal.pot_size
                    );
                    if self.config.no_color {
                        println!("{line}");
                    } else {
                        println!("{}", line.bold().blue());
                    }
                }
                Event::Action(action) => println!(
                    "   {} {} (pot {}bb)",
                    action.player,
                    describe_move(&action.action, action.amount.filter(|a| *a > 0.0)),
                    action.pot_size
                ),
            }
        }

        println!(
            "Decision: {} (correct: {})",
            hand.available_moves
                .iter()
                .map(|mv| mv.to_string())
                .collect::<Vec<_>>()
                .join("/"),
            hand.correct_decision
        );
    }
}
