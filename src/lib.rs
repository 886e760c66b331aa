pub mod cards;
pub mod dataset;
pub mod game;
pub mod history;
pub mod scenario;
pub mod seat;
pub mod session;
pub mod state;
pub mod trainer;
pub mod web;

pub use game::ParsedHand;
pub use history::parse_hand_history;
pub use state::{TrainerError, TrainerState};
pub use trainer::{Trainer, TrainerConfig};
