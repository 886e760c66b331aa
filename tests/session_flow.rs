use std::thread::sleep;
use std::time::Duration;

use poker_drills::dataset::Dataset;
use poker_drills::session::{InMemorySessionStore, Session, SessionError, SessionStore};
use uuid::Uuid;

#[test]
fn answers_ignore_case_and_whitespace() {
    let dataset = Dataset::sample();
    let scenario = &dataset.preflop[0];
    assert_eq!(scenario.output, "raise");

    let mut session = Session::new();
    let issued = session.issue(scenario);
    let outcome = session
        .check_answer(Some(issued.scenario_id), "  Raise ")
        .expect("answer accepted");

    assert!(outcome.correct);
    assert_eq!(outcome.correct_answer, "raise");
    assert_eq!(outcome.stats.correct, 1);
    assert_eq!(outcome.stats.total, 1);
    assert_eq!(outcome.stats.accuracy, 100.0);
    assert_eq!(session.pending_scenario(), None);
}

#[test]
fn stale_scenario_is_rejected_without_side_effects() {
    let dataset = Dataset::sample();
    let mut session = Session::new();
    let first = session.issue(&dataset.preflop[0]);
    let second = session.issue(&dataset.preflop[1]);

    let err = session
        .check_answer(Some(first.scenario_id), "raise")
        .expect_err("replaced scenario is stale");
    assert_eq!(err, SessionError::StaleScenario);
    assert_eq!(session.check_answer(None, "fold"), Err(SessionError::StaleScenario));
    assert_eq!(session.stats().total, 0);
    assert_eq!(session.pending_scenario(), Some(second.scenario_id));

    let outcome = session
        .check_answer(Some(second.scenario_id), "call")
        .expect("current scenario answered");
    assert!(!outcome.correct);
    assert_eq!(outcome.correct_answer, "fold");
    assert_eq!(outcome.stats.accuracy, 0.0);

    // the id is consumed by the first answer
    assert_eq!(
        session.check_answer(Some(second.scenario_id), "fold"),
        Err(SessionError::StaleScenario)
    );
    assert_eq!(session.stats().total, 1);
}

#[test]
fn accuracy_rounds_to_one_decimal_and_resets() {
    let dataset = Dataset::sample();
    let mut session = Session::new();
    for answer in ["raise", "fold", "fold"] {
        let issued = session.issue(&dataset.preflop[0]);
        session
            .check_answer(Some(issued.scenario_id), answer)
            .expect("answered");
    }

    let stats = session.stats();
    assert_eq!((stats.correct, stats.total), (1, 3));
    assert_eq!(stats.accuracy(), 33.3);

    session.reset_stats();
    let report = session.stats().report();
    assert_eq!((report.correct, report.total), (0, 0));
    assert_eq!(report.accuracy, 0.0);
}

#[test]
fn store_tracks_sessions_independently() {
    let dataset = Dataset::sample();
    let store = InMemorySessionStore::new();
    let a = store.create();
    let b = store.create();
    assert_eq!(store.len(), 2);

    let a_id = a.lock().id();
    let issued = a.lock().issue(&dataset.postflop[0]);
    let answer = issued.scenario.output.clone();
    a.lock()
        .check_answer(Some(issued.scenario_id), &answer)
        .expect("answered");

    assert_eq!(a.lock().stats().correct, 1);
    assert_eq!(b.lock().stats().total, 0);

    let fetched = store.get(&a_id).expect("session exists");
    assert_eq!(fetched.lock().stats().correct, 1);

    assert!(store.remove(&a_id));
    assert!(!store.remove(&a_id));
    assert!(store.get(&Uuid::new_v4()).is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn idle_sessions_expire() {
    let store = InMemorySessionStore::with_idle_timeout(Duration::from_millis(10));
    let stale_id = store.create().lock().id();
    sleep(Duration::from_millis(30));

    assert!(store.get(&stale_id).is_none());
    assert!(store.is_empty());

    let first = store.create().lock().id();
    sleep(Duration::from_millis(30));
    let second = store.create().lock().id();

    assert_eq!(store.len(), 1);
    assert!(store.get(&first).is_none());
    assert!(store.get(&second).is_some());
}

#[test]
fn default_store_keeps_recent_sessions() {
    let store = InMemorySessionStore::new();
    let ids: Vec<Uuid> = (0..3).map(|_| store.create().lock().id()).collect();
    assert_eq!(store.prune_idle(), 0);
    assert!(ids.iter().all(|id| store.get(id).is_some()));
}
