use poker_drills::dataset::Dataset;
use poker_drills::scenario::ScenarioFilter;
use poker_drills::{Trainer, TrainerConfig, TrainerState};

#[test]
fn autoplay_answers_every_round_correctly() {
    let config = TrainerConfig {
        rounds: 5,
        seed: Some(1234),
        filter: ScenarioFilter::Mixed,
        no_color: true,
        ..TrainerConfig::default()
    };

    let mut trainer = Trainer::new(config, TrainerState::new(Dataset::sample()));
    let stats = trainer.autoplay().expect("autoplay succeeds");

    assert_eq!(stats.total, 5);
    assert_eq!(stats.correct, 5);
    assert_eq!(stats.accuracy(), 100.0);
    assert_eq!(trainer.stats(), stats);
}

#[test]
fn autoplay_fails_on_empty_pool() {
    let config = TrainerConfig {
        rounds: 1,
        seed: Some(1),
        filter: ScenarioFilter::Preflop,
        no_color: true,
        ..TrainerConfig::default()
    };

    let mut trainer = Trainer::new(config, TrainerState::new(Dataset::default()));
    assert!(trainer.autoplay().is_err());
    assert_eq!(trainer.stats().total, 0);
}

#[test]
fn replay_returns_the_printed_hand() {
    let config = TrainerConfig {
        seed: Some(5),
        no_color: true,
        ..TrainerConfig::default()
    };
    let mut trainer = Trainer::new(config, TrainerState::new(Dataset::sample()));
    let hand = trainer.replay().expect("replay");
    assert!(!hand.actions.is_empty());
}
