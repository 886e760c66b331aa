use std::collections::HashSet;

use poker_drills::dataset::{Dataset, sample_postflop_records};
use poker_drills::scenario::{ScenarioFilter, ScenarioKind};
use poker_drills::{TrainerError, TrainerState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn filters_draw_from_their_pool_only() {
    let state = TrainerState::new(Dataset::sample());
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..50 {
        let pre = state.draw(ScenarioFilter::Preflop, &mut rng).expect("preflop");
        assert_eq!(pre.kind, ScenarioKind::Preflop);
        assert!(pre.board.is_none());

        let post = state.draw(ScenarioFilter::Postflop, &mut rng).expect("postflop");
        assert_eq!(post.kind, ScenarioKind::Postflop);
        assert!(post.board.is_some());
    }
}

#[test]
fn mixed_draws_cover_both_pools() {
    let state = TrainerState::new(Dataset::sample());
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    let kinds: HashSet<ScenarioKind> = (0..200)
        .map(|_| state.draw(ScenarioFilter::Mixed, &mut rng).expect("draw").kind)
        .collect();
    assert_eq!(kinds.len(), 2);
}

#[test]
fn same_seed_same_sequence() {
    let state = TrainerState::new(Dataset::sample());
    let mut a = ChaCha8Rng::seed_from_u64(3);
    let mut b = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..20 {
        assert_eq!(
            state.draw(ScenarioFilter::Mixed, &mut a).expect("draw"),
            state.draw(ScenarioFilter::Mixed, &mut b).expect("draw")
        );
    }
}

#[test]
fn empty_pools_report_no_scenarios() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let empty = TrainerState::new(Dataset::default());
    for filter in [ScenarioFilter::Preflop, ScenarioFilter::Postflop, ScenarioFilter::Mixed] {
        assert_eq!(
            empty.draw(filter, &mut rng),
            Err(TrainerError::NoScenariosAvailable)
        );
    }
    assert_eq!(
        empty.draw_hand(&mut rng),
        Err(TrainerError::NoScenariosAvailable)
    );

    let postflop_only = TrainerState::new(Dataset::from_records(Vec::new(), sample_postflop_records()));
    assert_eq!(
        postflop_only.draw(ScenarioFilter::Preflop, &mut rng),
        Err(TrainerError::NoScenariosAvailable)
    );
    let drawn = postflop_only
        .draw(ScenarioFilter::Mixed, &mut rng)
        .expect("postflop pool is not empty");
    assert_eq!(drawn.kind, ScenarioKind::Postflop);
}

#[test]
fn drawn_hand_comes_from_the_postflop_rows() {
    let state = TrainerState::new(Dataset::sample());
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let holdings: HashSet<String> = sample_postflop_records()
        .into_iter()
        .map(|row| row.holding)
        .collect();

    for _ in 0..10 {
        let hand = state.draw_hand(&mut rng).expect("hand");
        assert!(holdings.contains(&hand.hand));
        assert_ne!(hand.hero_id, hand.villain_id);
    }
}
