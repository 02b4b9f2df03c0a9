use dashmap::DashMap;
use fc_calc::PositionSide;
use fc_calc::TradeReport;
use fc_calc::TradeSetup;

use crate::state::FormState;

/// Per-user form progress and collected values
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: u64,
    pub state: FormState,
    pub pair: Option<String>,
    pub side: Option<PositionSide>,
    pub entry_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub risk_amount: Option<f64>,
    pub take_profit: Option<f64>,
    pub last_report: Option<TradeReport>,
}

impl Session {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            state: FormState::Idle,
            pair: None,
            side: None,
            entry_price: None,
            stop_loss: None,
            risk_amount: None,
            take_profit: None,
            last_report: None,
        }
    }

    /// Drop collected values and go back to idle; the last report is kept
    pub fn reset(&mut self) {
        *self = Self { last_report: self.last_report.take(), ..Self::new(self.user_id) };
    }

    /// Start a fresh form at the first step
    pub fn begin(&mut self) {
        self.reset();
        self.state = FormState::SelectPair;
    }

    /// All six values, if every one has been collected
    pub fn to_setup(&self) -> Option<TradeSetup> {
        Some(TradeSetup {
            pair: self.pair.clone()?,
            side: self.side?,
            entry_price: self.entry_price?,
            stop_loss: self.stop_loss?,
            risk_amount: self.risk_amount?,
            take_profit: self.take_profit?,
        })
    }
}

/// In-memory sessions keyed by user id, living as long as the process
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<u64, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self { sessions: DashMap::new() }
    }

    /// Run `f` against the user's session, creating it on first use.
    ///
    /// The shard lock is held while `f` runs, so `f` must not touch the store.
    pub fn with_session<R>(&self, user_id: u64, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut entry = self.sessions.entry(user_id).or_insert_with(|| Session::new(user_id));
        f(entry.value_mut())
    }

    /// Current state without creating a session
    pub fn state(&self, user_id: u64) -> FormState {
        self.sessions.get(&user_id).map(|session| session.state).unwrap_or_default()
    }

    /// Snapshot of the user's session
    pub fn get(&self, user_id: u64) -> Option<Session> {
        self.sessions.get(&user_id).map(|session| session.value().clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
