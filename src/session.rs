use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::scenario::Scenario;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid or stale scenario. Please refresh.")]
    StaleScenario,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub correct: u32,
    pub total: u32,
}

impl SessionStats {
    /// Percentage of correct answers rounded to one decimal, 0 when nothing
    /// has been answered yet.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let pct = f64::from(self.correct) / f64::from(self.total) * 100.0;
        (pct * 10.0).round() / 10.0
    }

    pub fn report(&self) -> StatsReport {
        StatsReport {
            correct: self.correct,
            total: self.total,
            accuracy: self.accuracy(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StatsReport {
    pub correct: u32,
    pub total: u32,
    pub accuracy: f64,
}

/// A scenario as handed to a client, tagged with the id it must answer with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssuedScenario {
    pub scenario_id: Uuid,
    #[serde(flatten)]
    pub scenario: Scenario,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub stats: StatsReport,
}

#[derive(Debug, Clone)]
struct Pending {
    scenario_id: Uuid,
    correct_answer: String,
}

/// One trainee's quiz state.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    pending: Option<Pending>,
    stats: SessionStats,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            pending: None,
            stats: SessionStats::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn pending_scenario(&self) -> Option<Uuid> {
        self.pending.as_ref().map(|pending| pending.scenario_id)
    }

    /// Records `scenario` as the one awaiting an answer, replacing any
    /// previously issued scenario.
    pub fn issue(&mut self, scenario: &Scenario) -> IssuedScenario {
        let scenario_id = Uuid::new_v4();
        self.pending = Some(Pending {
            scenario_id,
            correct_answer: scenario.output.clone(),
        });
        debug!(session = %self.id, %scenario_id, "issued scenario");
        IssuedScenario {
            scenario_id,
            scenario: scenario.clone(),
        }
    }

    /// Judges `answer` against the pending scenario. The comparison ignores
    /// case and surrounding whitespace. A missing or mismatched id leaves the
    /// session untouched.
    pub fn check_answer(
        &mut self,
        scenario_id: Option<Uuid>,
        answer: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        let pending = match (self.pending.take(), scenario_id) {
            (Some(pending), Some(id)) if pending.scenario_id == id => pending,
            (pending, _) => {
                self.pending = pending;
                return Err(SessionError::StaleScenario);
            }
        };

        let correct_answer = pending.correct_answer.trim().to_lowercase();
        let correct = answer.trim().to_lowercase() == correct_answer;
        self.stats.total += 1;
        if correct {
            self.stats.correct += 1;
        }
        debug!(session = %self.id, correct, total = self.stats.total, "answer checked");

        Ok(AnswerOutcome {
            correct,
            correct_answer,
            stats: self.stats.report(),
        })
    }

    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }
}

/// Where sessions live between requests.
pub trait SessionStore: Send + Sync {
    fn create(&self) -> Arc<Mutex<Session>>;
    fn get(&self, id: &Uuid) -> Option<Arc<Mutex<Session>>>;
    fn remove(&self, id: &Uuid) -> bool;
}

/// Sessions idle for longer than this are dropped on the next `create`.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug)]
struct StoredSession {
    session: Arc<Mutex<Session>>,
    last_seen: Instant,
}

/// Process-local store. Sessions expire after `idle_timeout` without a
/// lookup; expired entries are pruned whenever a session is created.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
    idle_timeout: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_timeout,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Drops every session idle for longer than the timeout and returns how
    /// many were removed.
    pub fn prune_idle(&self) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, stored| stored.last_seen.elapsed() <= self.idle_timeout);
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!(pruned, remaining = sessions.len(), "expired idle sessions");
        }
        pruned
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self) -> Arc<Mutex<Session>> {
        self.prune_idle();
        let session = Session::new();
        let id = session.id();
        let entry = Arc::new(Mutex::new(session));
        self.sessions.write().insert(
            id,
            StoredSession {
                session: entry.clone(),
                last_seen: Instant::now(),
            },
        );
        debug!(session = %id, "session created");
        entry
    }

    fn get(&self, id: &Uuid) -> Option<Arc<Mutex<Session>>> {
        let mut sessions = self.sessions.write();
        let stored = sessions.get_mut(id)?;
        if stored.last_seen.elapsed() > self.idle_timeout {
            sessions.remove(id);
            debug!(session = %id, "session expired");
            return None;
        }
        stored.last_seen = Instant::now();
        Some(stored.session.clone())
    }

    fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().remove(id).is_some()
    }
}
