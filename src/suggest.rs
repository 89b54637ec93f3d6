//! Debounced, cancelable city autocomplete
//!
//! As the user types, the engine waits for the input to settle, then queries
//! the geocoder for suggestions. Every keystroke restarts the debounce window
//! and invalidates prior pending work via a monotonically increasing request
//! token; a timer or in-flight query whose token has been superseded is
//! ignored when it resolves (last query wins). Cancellation is cooperative
//! only, nothing is forcibly terminated.

use crate::config::SkycastConfig;
use crate::geocode::{Geocoder, MIN_QUERY_LEN};
use crate::models::Place;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Phase of the suggestion state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestionPhase {
    /// No pending work, dropdown hidden
    #[default]
    Closed,
    /// Input received, debounce timer pending
    Debouncing,
    /// Suggestion query in flight
    Querying,
    /// Suggestion list populated (possibly empty)
    Open,
}

/// Ephemeral autocomplete state, owned exclusively by the engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSession {
    /// Current input text, verbatim
    pub query: String,
    /// Suggestion list from the latest committed query
    pub suggestions: Vec<Place>,
    /// Whether the dropdown is visible
    pub is_open: bool,
    /// Current machine phase
    pub phase: SuggestionPhase,
}

impl SearchSession {
    /// Whether a suggestion query is currently in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == SuggestionPhase::Querying
    }
}

/// Debounced autocomplete over a [`Geocoder`]
pub struct SuggestionEngine {
    geocoder: Arc<dyn Geocoder>,
    session: Arc<Mutex<SearchSession>>,
    token: Arc<AtomicU64>,
    debounce: Duration,
    count: u32,
}

impl SuggestionEngine {
    /// Create a new engine
    #[must_use]
    pub fn new(geocoder: Arc<dyn Geocoder>, config: &SkycastConfig) -> Self {
        Self {
            geocoder,
            session: Arc::new(Mutex::new(SearchSession::default())),
            token: Arc::new(AtomicU64::new(0)),
            debounce: config.debounce_window(),
            count: config.search.suggestion_count,
        }
    }

    /// Snapshot of the current session state
    #[must_use]
    pub fn session(&self) -> SearchSession {
        self.session.lock().unwrap().clone()
    }

    /// Handle a text change
    ///
    /// Inputs shorter than two trimmed characters clear the session and
    /// invalidate pending work without issuing a query. Longer inputs start
    /// (or restart) the debounce window; the returned handle resolves when
    /// the scheduled work has settled, which drivers may await or drop.
    pub fn on_input(&self, text: &str) -> Option<JoinHandle<()>> {
        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            // Invalidate any pending timer or in-flight query result
            self.token.fetch_add(1, Ordering::SeqCst);
            let mut session = self.session.lock().unwrap();
            session.query = text.to_string();
            session.suggestions.clear();
            session.is_open = false;
            session.phase = SuggestionPhase::Closed;
            return None;
        }

        let token = self.token.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut session = self.session.lock().unwrap();
            session.query = text.to_string();
            session.phase = SuggestionPhase::Debouncing;
        }

        let geocoder = Arc::clone(&self.geocoder);
        let state = Arc::clone(&self.session);
        let latest = Arc::clone(&self.token);
        let query = trimmed.to_string();
        let debounce = self.debounce;
        let count = self.count;

        Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if latest.load(Ordering::SeqCst) != token {
                // Superseded while the timer was pending
                return;
            }
            {
                let mut session = state.lock().unwrap();
                session.phase = SuggestionPhase::Querying;
                session.is_open = true;
            }

            // Query failures never block the search flow; show an empty list
            let suggestions = match geocoder.search(&query, count).await {
                Ok(places) => places,
                Err(e) => {
                    warn!("Suggestion query for '{}' failed: {}", query, e);
                    Vec::new()
                }
            };

            let mut session = state.lock().unwrap();
            if latest.load(Ordering::SeqCst) != token {
                debug!("Discarding stale suggestion response for '{}'", query);
                return;
            }
            session.suggestions = suggestions;
            session.phase = SuggestionPhase::Open;
        }))
    }

    /// Dismiss the dropdown (Escape key or outside pointer interaction)
    ///
    /// Content is preserved so a refocus can reopen the same list.
    pub fn dismiss(&self) {
        let mut session = self.session.lock().unwrap();
        session.is_open = false;
        if session.phase == SuggestionPhase::Open {
            session.phase = SuggestionPhase::Closed;
        }
    }

    /// Reopen the dropdown on refocus when the input text is non-empty
    pub fn on_focus(&self) {
        let mut session = self.session.lock().unwrap();
        if !session.query.trim().is_empty() {
            session.is_open = true;
            if session.phase == SuggestionPhase::Closed && !session.suggestions.is_empty() {
                session.phase = SuggestionPhase::Open;
            }
        }
    }

    /// Take the suggestion at `index`, resetting the session
    pub fn select(&self, index: usize) -> Option<Place> {
        let mut session = self.session.lock().unwrap();
        let place = session.suggestions.get(index).cloned()?;
        self.token.fetch_add(1, Ordering::SeqCst);
        session.query.clear();
        session.suggestions.clear();
        session.is_open = false;
        session.phase = SuggestionPhase::Closed;
        Some(place)
    }

    /// Take the raw query text for submission, resetting the session
    ///
    /// Returns `None` when the trimmed text is shorter than two characters.
    pub fn submit(&self) -> Option<String> {
        let mut session = self.session.lock().unwrap();
        let trimmed = session.query.trim().to_string();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return None;
        }
        self.token.fetch_add(1, Ordering::SeqCst);
        session.query.clear();
        session.suggestions.clear();
        session.is_open = false;
        session.phase = SuggestionPhase::Closed;
        Some(trimmed)
    }
}
