#![forbid(unsafe_code)]

//! A native page session: the CLI plays the host.
//!
//! Events go through the same [`PageModel`] the browser runs. Request
//! effects are performed synchronously with [`Transport`] and their
//! completions fed straight back, so one [`Session::dispatch`] returns every
//! effect the event caused, including the follow-up notices.

use kush_core::{PageSnapshot, StorageBackend};
use kush_runtime::{Effect, PageEvent, PageModel, StepProgram, StoreConfig};

use crate::transport::Transport;

pub struct Session<S: StorageBackend> {
    program: StepProgram<PageModel<S>>,
    transport: Transport,
}

impl<S: StorageBackend> Session<S> {
    pub fn new(config: StoreConfig, storage: S, transport: Transport) -> Self {
        Self {
            program: StepProgram::new(PageModel::new(config, storage)),
            transport,
        }
    }

    /// Deliver the page-load event.
    pub fn load(&mut self, page: PageSnapshot, prefers_dark: bool, csrf_token: Option<String>) -> Vec<Effect> {
        self.dispatch(PageEvent::Loaded {
            page,
            prefers_dark,
            csrf_token,
        })
    }

    pub fn dispatch(&mut self, event: PageEvent) -> Vec<Effect> {
        tracing::debug!(target: "kush.cli", event = event.name(), "dispatch");
        self.program.push_event(event);
        self.run()
    }

    /// Fire every pending timer in deadline order, advancing the clock to
    /// each deadline in turn.
    pub fn settle(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(deadline) = self.program.next_deadline() {
            self.program.set_time(deadline);
            effects.extend(self.run());
        }
        effects
    }

    fn run(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        loop {
            let result = self.program.step();
            let completions: Vec<PageEvent> = result
                .effects
                .iter()
                .filter_map(|effect| match effect {
                    Effect::Http { id, request } => Some(PageEvent::HttpCompleted {
                        id: *id,
                        result: self.transport.execute(request),
                    }),
                    _ => None,
                })
                .collect();
            effects.extend(result.effects);

            if completions.is_empty() && self.program.pending_events() == 0 {
                return effects;
            }
            for completion in completions {
                self.program.push_event(completion);
            }
        }
    }

    pub fn model(&self) -> &PageModel<S> {
        self.program.model()
    }

    pub fn into_model(self) -> PageModel<S> {
        self.program.into_model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kush_core::prefs::Theme;
    use kush_core::{ContactForm, MemoryStorage};
    use kush_runtime::{Control, NoticeKind};

    fn session(config: StoreConfig) -> Session<MemoryStorage> {
        Session::new(config, MemoryStorage::new(), Transport::new(None).expect("transport"))
    }

    #[test]
    fn load_then_toggle() {
        let mut session = session(StoreConfig::default());
        let effects = session.load(PageSnapshot::default(), false, None);
        assert_eq!(effects.first(), Some(&Effect::ApplyTheme { theme: Theme::Light }));
        let effects = session.dispatch(PageEvent::ThemeToggled);
        assert_eq!(effects, vec![Effect::ApplyTheme { theme: Theme::Dark }]);
    }

    #[test]
    fn failed_request_completes_in_the_same_dispatch() {
        let mut config = StoreConfig::default();
        config.contact.endpoint = Some("/contact/".into());
        let mut session = session(config);
        session.load(PageSnapshot::default(), false, None);

        // No base URL: the transport fails before touching the network.
        let effects = session.dispatch(PageEvent::ContactSubmitted {
            form: ContactForm {
                name: "Ama".into(),
                email: "ama@example.com".into(),
                phone: "0788".into(),
                message: "Hello".into(),
            },
        });
        assert!(effects.contains(&Effect::SetControlEnabled {
            control: Control::ContactSubmit,
            enabled: true,
        }));
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::ShowNotice { notice } if notice.kind == NoticeKind::Error
        )));
        assert!(!session.model().is_busy(Control::ContactSubmit));
    }

    #[test]
    fn settle_expires_notices() {
        let mut session = session(StoreConfig::default());
        session.load(PageSnapshot::default(), false, None);
        let effects = session.dispatch(PageEvent::SearchRequested { query: "  ".into() });
        let Some(Effect::ShowNotice { notice }) = effects.first() else {
            panic!("expected notice, got {effects:?}");
        };
        assert_eq!(session.settle(), vec![Effect::DismissNotice { id: notice.id }]);
        assert!(session.settle().is_empty());
    }
}
