use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::game::ParsedHand;
use crate::history::parse_hand_history;
use crate::scenario::Scenario;

pub const DEFAULT_PREFLOP_CSV: &str = "preflop_60k_train_set_game_scenario_information.csv";
pub const DEFAULT_POSTFLOP_CSV: &str = "postflop_500k_train_set_game_scenario_information.csv";

pub const PREFLOP_REQUIRED_COLUMNS: [&str; 8] = [
    "hero_pos",
    "hero_holding",
    "prev_line",
    "correct_decision",
    "num_players",
    "num_bets",
    "available_moves",
    "pot_size",
];

pub const POSTFLOP_REQUIRED_COLUMNS: [&str; 10] = [
    "hero_position",
    "holding",
    "preflop_action",
    "postflop_action",
    "board_flop",
    "board_turn",
    "board_river",
    "available_moves",
    "pot_size",
    "correct_decision",
];

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset file {} not found", .0.display())]
    Missing(PathBuf),
    #[error("failed to read dataset {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("dataset {} is missing required columns: {}", .path.display(), .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },
}

/// One row of the preflop dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreflopRecord {
    pub hero_pos: String,
    pub hero_holding: String,
    pub prev_line: String,
    pub correct_decision: String,
    pub num_players: String,
    pub num_bets: String,
    pub available_moves: String,
    pub pot_size: String,
}

/// One row of the postflop dataset, the input of the hand replayer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostflopRecord {
    pub hero_position: String,
    pub holding: String,
    pub preflop_action: String,
    pub postflop_action: String,
    pub board_flop: String,
    pub board_turn: String,
    pub board_river: String,
    pub available_moves: String,
    pub pot_size: String,
    pub correct_decision: String,
}

/// Reads every row of a CSV file after checking that the header carries
/// `required` columns. Rows that fail to deserialize are skipped.
pub fn read_records<T: DeserializeOwned>(
    path: &Path,
    required: &[&str],
) -> Result<Vec<T>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::Missing(path.to_path_buf()));
    }

    let csv_error = |source: csv::Error| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers = reader.headers().map_err(csv_error)?.clone();
    let missing: Vec<String> = required
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<T>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(err) => warn!(path = %path.display(), line = line + 2, %err, "skipping row"),
        }
    }
    info!(
        path = %path.display(),
        columns = ?headers.iter().collect::<Vec<_>>(),
        rows = records.len(),
        "loaded dataset"
    );
    Ok(records)
}

fn load_or_fallback<T: DeserializeOwned>(
    path: &Path,
    required: &[&str],
    fallback: fn() -> Vec<T>,
) -> Vec<T> {
    match read_records(path, required) {
        Ok(records) => records,
        Err(err) => {
            warn!(%err, "dataset unavailable, using built-in sample data");
            fallback()
        }
    }
}

pub fn sample_preflop_records() -> Vec<PreflopRecord> {
    vec![
        PreflopRecord {
            hero_pos: "BB".into(),
            hero_holding: "AhAs".into(),
            prev_line: "BTN/raise2.5bb/SB/fold".into(),
            correct_decision: "raise".into(),
            num_players: "3".into(),
            num_bets: "1".into(),
            available_moves: "['fold', 'call', 'raise']".into(),
            pot_size: "4".into(),
        },
        PreflopRecord {
            hero_pos: "CO".into(),
            hero_holding: "7h2d".into(),
            prev_line: "UTG/fold/HJ/fold".into(),
            correct_decision: "fold".into(),
            num_players: "6".into(),
            num_bets: "0".into(),
            available_moves: "['fold', 'raise']".into(),
            pot_size: "1.5".into(),
        },
    ]
}

pub fn sample_postflop_records() -> Vec<PostflopRecord> {
    vec![
        PostflopRecord {
            hero_position: "IP".into(),
            holding: "AsKd".into(),
            preflop_action: "UTG/raise2.5bb/BB/call".into(),
            postflop_action: "OOP_CHECK/IP_BET_6/OOP_CALL/dealcards/OOP_CHECK".into(),
            board_flop: "Ah7h2d".into(),
            board_turn: "Ks".into(),
            board_river: "".into(),
            available_moves: "['check', 'bet']".into(),
            pot_size: "16".into(),
            correct_decision: "bet".into(),
        },
        PostflopRecord {
            hero_position: "OOP".into(),
            holding: "8h8c".into(),
            preflop_action: "CO/raise2.5bb/BB/call".into(),
            postflop_action: "OOP_CHECK/IP_BET_2/OOP_CALL/dealcards/OOP_CHECK/IP_BET_5".into(),
            board_flop: "Ks7h2d".into(),
            board_turn: "3c".into(),
            board_river: "".into(),
            available_moves: "['fold', 'call', 'raise']".into(),
            pot_size: "15".into(),
            correct_decision: "call".into(),
        },
    ]
}

/// Counts of scenarios per pool.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetStats {
    pub preflop_scenarios: usize,
    pub postflop_scenarios: usize,
    pub total_scenarios: usize,
}

/// Counts plus how often each correct decision occurs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetAnalysis {
    pub total_scenarios: usize,
    pub preflop_count: usize,
    pub postflop_count: usize,
    pub preflop_decisions: BTreeMap<String, usize>,
    pub postflop_decisions: BTreeMap<String, usize>,
}

/// The loaded scenario pools. Built once at startup and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub preflop: Vec<Scenario>,
    pub postflop: Vec<Scenario>,
    /// Replays of the postflop rows, parsed once at load time and aligned
    /// with `postflop`.
    pub hands: Vec<ParsedHand>,
    preflop_decisions: BTreeMap<String, usize>,
    postflop_decisions: BTreeMap<String, usize>,
}

impl Dataset {
    /// Loads both datasets, substituting the built-in samples for any file
    /// that is missing or lacks required columns.
    pub fn load(preflop_path: &Path, postflop_path: &Path) -> Self {
        let preflop = load_or_fallback(
            preflop_path,
            &PREFLOP_REQUIRED_COLUMNS,
            sample_preflop_records,
        );
        let postflop = load_or_fallback(
            postflop_path,
            &POSTFLOP_REQUIRED_COLUMNS,
            sample_postflop_records,
        );
        Self::from_records(preflop, postflop)
    }

    pub fn sample() -> Self {
        Self::from_records(sample_preflop_records(), sample_postflop_records())
    }

    pub fn from_records(preflop: Vec<PreflopRecord>, postflop: Vec<PostflopRecord>) -> Self {
        let hands: Vec<ParsedHand> = postflop.iter().map(parse_hand_history).collect();
        Self {
            preflop: preflop.iter().map(Scenario::from_preflop).collect(),
            postflop: postflop
                .iter()
                .zip(&hands)
                .map(|(record, hand)| Scenario::from_postflop(record, hand))
                .collect(),
            preflop_decisions: count_decisions(preflop.iter().map(|r| r.correct_decision.as_str())),
            postflop_decisions: count_decisions(
                postflop.iter().map(|r| r.correct_decision.as_str()),
            ),
            hands,
        }
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            preflop_scenarios: self.preflop.len(),
            postflop_scenarios: self.postflop.len(),
            total_scenarios: self.preflop.len() + self.postflop.len(),
        }
    }

    pub fn analysis(&self) -> DatasetAnalysis {
        let stats = self.stats();
        DatasetAnalysis {
            total_scenarios: stats.total_scenarios,
            preflop_count: stats.preflop_scenarios,
            postflop_count: stats.postflop_scenarios,
            preflop_decisions: self.preflop_decisions.clone(),
            postflop_decisions: self.postflop_decisions.clone(),
        }
    }
}

fn count_decisions<'a>(decisions: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for decision in decisions.map(str::trim).filter(|d| !d.is_empty()) {
        *counts.entry(decision.to_string()).or_insert(0) += 1;
    }
    counts
}
