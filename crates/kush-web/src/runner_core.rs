#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping `StepProgram<PageModel<_>>`.
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.

use core::time::Duration;

use kush_core::StorageBackend;
use kush_runtime::{ConfigError, Effect, PageModel, StepProgram, StoreConfig};

use crate::input_parser::parse_page_event;

/// Storage chosen by the host at construction time.
pub type DynStorage = Box<dyn StorageBackend>;

/// Outcome of one [`RunnerCore::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerStep {
    pub processed: usize,
    pub effects: Vec<Effect>,
}

impl RunnerStep {
    /// Effects as a JSON array for the browser glue.
    #[must_use]
    pub fn effects_json(&self) -> String {
        serde_json::to_string(&self.effects).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Platform-independent page runner.
pub struct RunnerCore {
    inner: StepProgram<PageModel<DynStorage>>,
    /// Host-facing log lines (rejected events, model logs).
    cached_logs: Vec<String>,
}

impl RunnerCore {
    /// Create a runner with an explicit configuration.
    pub fn new(config: StoreConfig, storage: DynStorage) -> Self {
        Self {
            inner: StepProgram::new(PageModel::new(config, storage)),
            cached_logs: Vec::new(),
        }
    }

    /// Create a runner from a JSON configuration document; `None` uses the
    /// defaults.
    pub fn from_config_json(config: Option<&str>, storage: DynStorage) -> Result<Self, ConfigError> {
        let config = match config {
            Some(json) if !json.trim().is_empty() => StoreConfig::from_json_str(json)?.validated()?,
            _ => StoreConfig::default(),
        };
        Ok(Self::new(config, storage))
    }

    /// Initialize the model. Later calls are no-ops.
    pub fn init(&mut self) {
        let result = self.inner.init();
        self.cached_logs.extend(result.logs);
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        // Host input can be noisy (NaN/inf/negative spikes).
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        let duration = Duration::try_from_secs_f64(dt_ms / 1000.0).unwrap_or(Duration::MAX);
        self.inner.advance_time(duration);
    }

    /// Set the deterministic clock to absolute milliseconds (e.g.
    /// `performance.now()`).
    pub fn set_time_ms(&mut self, ts_ms: f64) {
        let duration = if !ts_ms.is_finite() || ts_ms <= 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64(ts_ms / 1000.0).unwrap_or(Duration::MAX)
        };
        self.inner.set_time(duration);
    }

    /// Parse a JSON-encoded page event and queue it.
    ///
    /// Returns `true` if the event was accepted, `false` if it was
    /// malformed or had no page meaning.
    pub fn push_event_json(&mut self, json: &str) -> bool {
        match parse_page_event(json) {
            Ok(Some(event)) => {
                self.inner.push_event(event);
                true
            }
            Ok(None) => false,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "rejected page event");
                self.cached_logs.push(format!("page_event_rejected: {err}"));
                false
            }
        }
    }

    /// Deliver due timers and queued events.
    pub fn step(&mut self) -> RunnerStep {
        let result = self.inner.step();
        self.cached_logs.extend(result.logs);
        RunnerStep {
            processed: result.processed,
            effects: result.effects,
        }
    }

    /// Milliseconds until the next timer is due, relative to the clock.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        let deadline = self.inner.next_deadline()?;
        Some(deadline.saturating_sub(self.inner.now()).as_secs_f64() * 1000.0)
    }

    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.cached_logs)
    }

    #[must_use]
    pub fn model(&self) -> &PageModel<DynStorage> {
        self.inner.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kush_core::prefs::{LIKES_KEY, Theme};
    use kush_core::{MemoryStorage, StorageBackend, StorageError, StorageResult};
    use kush_runtime::NoticeKind;
    use pretty_assertions::assert_eq;

    const LOADED: &str = r##"{"kind":"loaded","prefers_dark":false,"csrf_token":"tok","page":{
        "cards":[{"title":"Red Dress","labels":["Model A"]},{"title":"Blue Top","labels":["Model B"]}],
        "categories":[{"name":"Silk Collection"}],
        "items":[{"id":7,"name":"Silk Scarf"}],
        "nav":[{"href":"#home"},{"href":"#faq"}],
        "anchors":[{"id":"home","offset":0},{"id":"faq","offset":900}],
        "header_height":60}}"##;

    fn runner() -> RunnerCore {
        let mut core = RunnerCore::new(StoreConfig::default(), Box::new(MemoryStorage::new()));
        core.init();
        assert!(core.push_event_json(LOADED));
        core.step();
        core
    }

    #[test]
    fn step_auto_initializes() {
        let mut core = RunnerCore::new(StoreConfig::default(), Box::new(MemoryStorage::new()));
        assert!(core.push_event_json(r#"{"kind":"theme_toggle"}"#));
        let step = core.step();
        assert_eq!(step.processed, 1);
        assert_eq!(step.effects, vec![Effect::ApplyTheme { theme: Theme::Dark }]);
    }

    #[test]
    fn load_applies_state() {
        let mut core = RunnerCore::new(StoreConfig::default(), Box::new(MemoryStorage::new()));
        core.push_event_json(LOADED);
        let step = core.step();
        assert_eq!(
            step.effects,
            vec![
                Effect::ApplyTheme { theme: Theme::Light },
                Effect::SetActiveNav {
                    active: vec![true, false],
                },
            ]
        );
    }

    #[test]
    fn effects_json_is_tagged() {
        let mut core = runner();
        core.push_event_json(r#"{"kind":"filter","query":"dress"}"#);
        let step = core.step();
        assert_eq!(
            step.effects_json(),
            r#"[{"effect":"set_card_visibility","cards":["visible","hidden"]}]"#
        );
    }

    #[test]
    fn malformed_input_is_logged_and_rejected() {
        let mut core = runner();
        assert!(!core.push_event_json("not json"));
        assert!(!core.push_event_json(r#"{"kind":"preloader_hidden"}"#));
        let logs = core.take_logs();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].starts_with("page_event_rejected: JSON parse error"));
        assert!(core.take_logs().is_empty());
    }

    #[test]
    fn notice_expires_with_host_time() {
        let mut core = runner();
        core.push_event_json(r#"{"kind":"search","query":"nothing here"}"#);
        let step = core.step();
        let Some(Effect::ShowNotice { notice }) = step.effects.first() else {
            panic!("expected notice, got {:?}", step.effects);
        };
        assert_eq!(notice.kind, NoticeKind::Info);
        assert_eq!(core.next_deadline_ms(), Some(3000.0));

        core.advance_time_ms(f64::NAN);
        core.advance_time_ms(-5.0);
        core.advance_time_ms(1000.0);
        assert_eq!(core.next_deadline_ms(), Some(2000.0));
        assert!(core.step().effects.is_empty());

        core.set_time_ms(3000.0);
        assert_eq!(
            core.step().effects,
            vec![Effect::DismissNotice { id: notice.id }]
        );
        assert_eq!(core.next_deadline_ms(), None);
    }

    #[test]
    fn votes_reach_storage() {
        let mut core = runner();
        core.push_event_json(r#"{"kind":"vote","product":"Model A","vote":"like"}"#);
        core.step();
        assert_eq!(core.model().preferences().likes.get("Model A").likes, 1);
        let stored = core.model().storage().load(LIKES_KEY).unwrap();
        assert_eq!(stored.as_deref(), Some(r#"{"Model A":{"likes":1,"dislikes":0}}"#));
    }

    /// Storage that refuses every write, like a full `localStorage`.
    struct Full;

    impl StorageBackend for Full {
        fn load(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn store(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("QuotaExceededError".into()))
        }

        fn remove(&mut self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn storage_failures_reach_host_logs() {
        let mut core = RunnerCore::new(StoreConfig::default(), Box::new(Full));
        core.push_event_json(r#"{"kind":"vote","product":"Model A","vote":"like"}"#);
        let step = core.step();
        assert_eq!(
            step.effects,
            vec![Effect::ShowLikeCounts {
                product: "Model A".into(),
                tally: kush_core::Tally { likes: 1, dislikes: 0 },
            }]
        );
        assert_eq!(
            core.take_logs(),
            vec!["failed to persist likes: storage unavailable: QuotaExceededError".to_string()]
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let storage: DynStorage = Box::new(MemoryStorage::new());
        assert!(matches!(
            RunnerCore::from_config_json(Some(r#"{"timing":{"notice_ms":0}}"#), storage),
            Err(ConfigError::Validation(_))
        ));
        let storage: DynStorage = Box::new(MemoryStorage::new());
        assert!(RunnerCore::from_config_json(None, storage).is_ok());
    }
}
