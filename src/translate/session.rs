//! Per-language translation sessions
//!
//! Process-wide shared state: one session per target-language code,
//! initialized lazily on first use and retained for the process lifetime.
//! A single lock around the map makes concurrent first-use resolve to
//! exactly one session per language — no duplicate loads, no torn state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

/// Resolved backend state for one target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSession {
    /// Target language code (e.g. "id")
    pub lang: String,
    /// Backend model identifier resolved from the language code
    pub model: String,
}

impl LanguageSession {
    fn new(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            model: format!("opus-mt-en-{lang}"),
        }
    }
}

/// Lazy, initialize-once cache of [`LanguageSession`]s.
///
/// Shared read-after-init state: safe for reuse across concurrent jobs
/// requesting the same language.
#[derive(Default)]
pub struct SessionCache {
    inner: Mutex<HashMap<String, Arc<LanguageSession>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for `lang`, initializing it on first use.
    pub fn get_or_init(&self, lang: &str) -> Arc<LanguageSession> {
        let mut sessions = self.inner.lock();
        if let Some(session) = sessions.get(lang) {
            return Arc::clone(session);
        }

        debug!(lang, "initializing translation session");
        let session = Arc::new(LanguageSession::new(lang));
        sessions.insert(lang.to_string(), Arc::clone(&session));
        session
    }

    /// Number of initialized sessions.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
