//! One interactive caller's search session.
//!
//! The session enforces the ordering guarantee: results always correspond
//! to the most recently issued query. Each new `search` cancels the token
//! of the previous one; a superseded search resolves to
//! [`QueryError::Superseded`] instead of rendering stale rows.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::search::{Phase, QueryError, QueryResolver, QueryResult};
use crate::types::ResultRow;

/// Session state machine: `Idle → Fetching → Matching → Rendered`, back to
/// `Fetching` on new input, back to `Idle` (with `last_error` set) when a
/// bucket fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Fetching,
    Matching,
    Rendered,
}

pub struct SearchSession {
    resolver: Arc<QueryResolver>,
    current: Mutex<Option<CancellationToken>>,
    state: Arc<Mutex<SessionState>>,
    last_error: Mutex<Option<String>>,
}

impl SearchSession {
    pub fn new(resolver: Arc<QueryResolver>) -> Self {
        Self {
            resolver,
            current: Mutex::new(None),
            state: Arc::new(Mutex::new(SessionState::Idle)),
            last_error: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Error indicator from the last failed search, cleared on new input.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    /// Cancel any in-flight search and go idle.
    pub fn cancel(&self) {
        if let Some(token) = self.current.lock().take() {
            token.cancel();
        }
        *self.state.lock() = SessionState::Idle;
    }

    /// Run a search for `query`, superseding any search still in flight.
    ///
    /// The superseded call resolves to `Err(Superseded)`; only the call
    /// whose token is still current can reach `Rendered` and return rows.
    pub async fn search(&self, query: &str) -> QueryResult<Vec<ResultRow>> {
        let token = self.supersede();
        *self.last_error.lock() = None;
        *self.state.lock() = SessionState::Fetching;

        let state = Arc::clone(&self.state);
        let observer_token = token.clone();
        let result = self
            .resolver
            .search_observed(query, &token, &move |phase| {
                // A superseded search no longer owns the state machine.
                if observer_token.is_cancelled() {
                    return;
                }
                *state.lock() = match phase {
                    Phase::Fetching => SessionState::Fetching,
                    Phase::Matching => SessionState::Matching,
                };
            })
            .await;

        match result {
            Ok(rows) => {
                if token.is_cancelled() {
                    return Err(QueryError::Superseded);
                }
                *self.state.lock() = SessionState::Rendered;
                Ok(rows)
            }
            Err(QueryError::Superseded) => Err(QueryError::Superseded),
            Err(err) => {
                if !token.is_cancelled() {
                    // Transient: shown as an error indicator, retried on
                    // the caller's next input.
                    *self.state.lock() = SessionState::Idle;
                    *self.last_error.lock() = Some(err.to_string());
                }
                Err(err)
            }
        }
    }

    fn supersede(&self) -> CancellationToken {
        let mut current = self.current.lock();
        if let Some(previous) = current.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        *current = Some(token.clone());
        token
    }
}
