#![forbid(unsafe_code)]

//! The storefront page model.
//!
//! [`PageModel`] owns everything the page script used to keep in globals:
//! the extracted page content, scroll position, persisted preferences, and
//! the requests currently in flight. Each [`PageEvent`] goes through one
//! `update` dispatch that calls into `kush_core` and answers with effects.
//!
//! Persistence is write-through: every theme toggle and vote is stored
//! immediately, and [`PageEvent::Unloading`] flushes both keys once more.
//! Votes re-read the stored ledger first, so tallies written by another
//! page of the same store survive. Storage failures are logged, reported to
//! the host as log lines, and never surface as page errors.

use std::collections::{BTreeMap, BTreeSet};

use kush_core::contact::ContactReply;
use kush_core::order::OrderDetails;
use kush_core::search::SearchOutcome;
use kush_core::storage::StorageResult;
use kush_core::tracker::{active_entries, current_index, scroll_target_with_offset};
use kush_core::{PageSnapshot, Preferences, Section, StorageBackend, filter_cards, resolve_anchor, search};
use serde::Deserialize;

use crate::config::StoreConfig;
use crate::effect::{Control, Effect, FocusTarget, Notice, NoticeId, NoticeKind};
use crate::event::PageEvent;
use crate::http::{HttpFailure, HttpRequest, HttpResponse, RequestId};
use crate::program::{Cmd, Model};

type PageCmd = Cmd<PageEvent, Effect>;

const NETWORK_ERROR_TEXT: &str = "Network error. Please try again later.";
const LIKE_FAILED_TEXT: &str = "Could not record your like. Please try again.";

/// Body of a successful like request.
#[derive(Debug, Deserialize)]
struct LikeReply {
    likes: u64,
}

/// Storefront page state and event dispatch.
#[derive(Debug)]
pub struct PageModel<S> {
    config: StoreConfig,
    storage: S,
    prefs: Preferences,
    page: PageSnapshot,
    scroll_y: f64,
    csrf_token: Option<String>,
    /// Last active-nav flags sent to the host.
    active_nav: Option<Vec<bool>>,
    active_section: Option<usize>,
    in_flight: BTreeMap<RequestId, Control>,
    next_request: u64,
    live_notices: BTreeSet<NoticeId>,
    next_notice: u64,
    highlight: Option<(FocusTarget, u64)>,
    highlight_generation: u64,
}

impl<S: StorageBackend> PageModel<S> {
    /// Create a model over `storage`. Preferences are read immediately and
    /// read again on [`PageEvent::Loaded`], once the system colour scheme is
    /// known.
    pub fn new(config: StoreConfig, storage: S) -> Self {
        let prefs = Preferences::load(&storage, config.storage.clone(), false);
        Self {
            config,
            storage,
            prefs,
            page: PageSnapshot::default(),
            scroll_y: 0.0,
            csrf_token: None,
            active_nav: None,
            active_section: None,
            in_flight: BTreeMap::new(),
            next_request: 1,
            live_notices: BTreeSet::new(),
            next_notice: 1,
            highlight: None,
            highlight_generation: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    #[must_use]
    pub fn page(&self) -> &PageSnapshot {
        &self.page
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Section the nav currently marks as active.
    #[must_use]
    pub fn active_section(&self) -> Option<&Section> {
        self.active_section.and_then(|i| self.page.sections.get(i))
    }

    /// Whether `control` has a request in flight.
    #[must_use]
    pub fn is_busy(&self, control: Control) -> bool {
        self.in_flight.values().any(|c| *c == control)
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn on_loaded(&mut self, page: PageSnapshot, prefers_dark: bool, csrf_token: Option<String>) -> PageCmd {
        self.prefs = Preferences::load(&self.storage, self.config.storage.clone(), prefers_dark);
        self.csrf_token = csrf_token.filter(|t| !t.trim().is_empty());
        self.page = page;
        self.active_nav = None;

        tracing::debug!(
            target: "kush.page",
            cards = self.page.cards.len(),
            categories = self.page.categories.len(),
            items = self.page.items.len(),
            sections = self.page.sections.len(),
            theme = self.prefs.theme.as_str(),
            "page loaded"
        );

        let theme = self.prefs.theme;
        let persisted = self.prefs.persist_theme(&mut self.storage);

        let mut cmds = vec![log_storage("theme", persisted), Cmd::effect(Effect::ApplyTheme { theme })];
        cmds.extend(self.prefs.likes.iter().map(|(product, tally)| {
            Cmd::effect(Effect::ShowLikeCounts {
                product: product.to_string(),
                tally,
            })
        }));
        cmds.push(self.recompute_active_nav());
        Cmd::batch(cmds)
    }

    /// Re-run the tracker; emits only when the active flags change.
    fn recompute_active_nav(&mut self) -> PageCmd {
        let sections = &self.page.sections;
        let index = current_index(
            self.scroll_y,
            self.page.header_height,
            self.config.tracker.margin,
            sections,
        );
        let active = active_entries(&self.page.nav, index.and_then(|i| sections.get(i)));
        self.active_section = index;

        if self.active_nav.as_ref() == Some(&active) {
            return Cmd::none();
        }
        tracing::trace!(
            target: "kush.page",
            scroll_y = self.scroll_y,
            section = ?index.and_then(|i| sections.get(i)).map(|s| s.identifier.as_str()),
            "active section changed"
        );
        self.active_nav = Some(active.clone());
        Cmd::effect(Effect::SetActiveNav { active })
    }

    fn on_filter(&self, query: &str) -> PageCmd {
        let cards = filter_cards(query, &self.page.cards);
        tracing::debug!(
            target: "kush.page",
            query,
            visible = kush_core::filter::visible_count(&cards),
            total = cards.len(),
            "cards filtered"
        );
        Cmd::effect(Effect::SetCardVisibility { cards })
    }

    fn on_search(&mut self, query: &str) -> PageCmd {
        let outcome = search(query, &self.page.categories, &self.page.items);
        let message = outcome.message();
        tracing::debug!(target: "kush.page", query, matches = outcome.count(), "search");

        match &outcome {
            SearchOutcome::NoQuery => self.notice(NoticeKind::Warning, message),
            SearchOutcome::NotFound { .. } => self.notice(NoticeKind::Info, message),
            SearchOutcome::Found { matches, .. } => {
                let focus = matches.focus_target();
                let target = FocusTarget {
                    kind: focus.kind,
                    index: focus.index,
                };
                let mut cmds = Vec::with_capacity(6);
                if let Some((previous, _)) = self.highlight.take() {
                    cmds.push(Cmd::effect(Effect::ClearHighlight { target: previous }));
                }
                self.highlight_generation += 1;
                let generation = self.highlight_generation;
                self.highlight = Some((target, generation));

                cmds.push(Cmd::effect(Effect::ScrollIntoView { target }));
                cmds.push(Cmd::effect(Effect::Highlight { target }));
                cmds.push(Cmd::after(
                    self.config.timing.highlight(),
                    PageEvent::HighlightExpired { target, generation },
                ));
                cmds.push(self.notice(NoticeKind::Success, message));
                cmds.push(Cmd::effect(Effect::ClearSearchInput));
                Cmd::batch(cmds)
            }
        }
    }

    fn on_nav_click(&self, href: &str) -> PageCmd {
        // Links to other pages are left to the browser.
        if !href.starts_with('#') {
            return Cmd::none();
        }
        let Some(section) = resolve_anchor(href).and_then(|anchor| self.page.section(anchor)) else {
            return Cmd::none();
        };
        let top = scroll_target_with_offset(
            section,
            self.page.header_height,
            self.config.tracker.click_offset,
        );
        Cmd::effect(Effect::ScrollTo { top })
    }

    fn on_order(&self, mut details: OrderDetails) -> PageCmd {
        // Fill in what the page already knows about the item.
        if let Some(item) = details
            .product
            .as_deref()
            .and_then(|name| self.page.items.iter().find(|item| item.name == name))
        {
            if details.status.is_none() {
                details.status = item.status;
            }
            if details.anchor.is_none() {
                details.anchor = item.anchor.clone();
            }
            if details.category.is_none() {
                details.category = item.category.clone();
            }
        }
        let link = self.config.order_links().build(&details);
        tracing::debug!(target: "kush.page", url = %link.url, "order link built");
        Cmd::effect(Effect::OpenOrder { link })
    }

    fn on_contact(&mut self, form: &kush_core::ContactForm) -> PageCmd {
        if self.is_busy(Control::ContactSubmit) {
            tracing::debug!(target: "kush.page", "contact submit ignored while in flight");
            return Cmd::none();
        }
        let valid = match form.validate() {
            Ok(valid) => valid,
            Err(err) => return self.notice(NoticeKind::Warning, err.to_string()),
        };
        match self.config.contact.endpoint.clone() {
            None => Cmd::effect(Effect::Navigate {
                url: valid.mailto(&self.config.contact.mail_recipient),
            }),
            Some(endpoint) => {
                let request = self.with_csrf(HttpRequest::post(endpoint)).form(valid.form_body());
                self.start_request(Control::ContactSubmit, request)
            }
        }
    }

    fn on_remote_like(&mut self, product_id: u64) -> PageCmd {
        let control = Control::Like(product_id);
        if self.is_busy(control) {
            tracing::debug!(target: "kush.page", product_id, "like ignored while in flight");
            return Cmd::none();
        }
        let request = self.with_csrf(HttpRequest::post(self.config.likes.endpoint_for(product_id)));
        self.start_request(control, request)
    }

    fn with_csrf(&self, request: HttpRequest) -> HttpRequest {
        match &self.csrf_token {
            Some(token) => request.header(self.config.contact.csrf_header.clone(), token.clone()),
            None => request,
        }
    }

    fn start_request(&mut self, control: Control, request: HttpRequest) -> PageCmd {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        self.in_flight.insert(id, control);
        tracing::debug!(
            target: "kush.page",
            request_id = id.0,
            control = ?control,
            url = %request.url,
            "request started"
        );
        Cmd::batch(vec![
            Cmd::effect(Effect::SetControlEnabled {
                control,
                enabled: false,
            }),
            Cmd::effect(Effect::Http { id, request }),
        ])
    }

    fn on_http_completed(&mut self, id: RequestId, result: Result<HttpResponse, HttpFailure>) -> PageCmd {
        let Some(control) = self.in_flight.remove(&id) else {
            tracing::warn!(target: "kush.page", request_id = id.0, "completion for unknown request");
            return Cmd::log(format!("completion for unknown request {}", id.0));
        };
        match &result {
            Ok(response) => tracing::debug!(
                target: "kush.page",
                request_id = id.0,
                status = response.status,
                "request completed"
            ),
            Err(failure) => tracing::warn!(
                target: "kush.page",
                request_id = id.0,
                error = %failure,
                "request failed"
            ),
        }

        let enable = Cmd::effect(Effect::SetControlEnabled {
            control,
            enabled: true,
        });
        let outcome = match control {
            Control::ContactSubmit => self.contact_completed(result),
            Control::Like(product_id) => self.like_completed(product_id, result),
        };
        Cmd::batch(vec![enable, outcome])
    }

    fn contact_completed(&mut self, result: Result<HttpResponse, HttpFailure>) -> PageCmd {
        let response = match result {
            Ok(response) => response,
            Err(_) => return self.notice(NoticeKind::Error, NETWORK_ERROR_TEXT),
        };
        match ContactReply::from_json(&response.body) {
            Ok(reply) if reply.success && response.is_success() => Cmd::batch(vec![
                self.notice(NoticeKind::Success, reply.notice_text()),
                Cmd::effect(Effect::ResetContactForm),
            ]),
            Ok(reply) if !reply.success => self.notice(NoticeKind::Error, reply.notice_text()),
            Ok(_) => self.notice(NoticeKind::Error, ContactReply::default().notice_text()),
            Err(err) => {
                tracing::warn!(target: "kush.page", status = response.status, error = %err, "unreadable contact reply");
                self.notice(NoticeKind::Error, ContactReply::default().notice_text())
            }
        }
    }

    fn like_completed(&mut self, product_id: u64, result: Result<HttpResponse, HttpFailure>) -> PageCmd {
        let reply = match result {
            Ok(response) if response.is_success() => serde_json::from_str::<LikeReply>(&response.body)
                .map_err(|err| {
                    tracing::warn!(target: "kush.page", product_id, error = %err, "unreadable like reply");
                }),
            _ => Err(()),
        };
        match reply {
            Ok(LikeReply { likes }) => Cmd::effect(Effect::ShowRemoteLikes { product_id, likes }),
            Err(()) => self.notice(NoticeKind::Error, LIKE_FAILED_TEXT),
        }
    }

    fn notice(&mut self, kind: NoticeKind, text: impl Into<String>) -> PageCmd {
        let id = NoticeId(self.next_notice);
        self.next_notice += 1;
        self.live_notices.insert(id);
        let timing = self.config.timing;
        Cmd::batch(vec![
            Cmd::effect(Effect::ShowNotice {
                notice: Notice {
                    id,
                    kind,
                    text: text.into(),
                    ttl_ms: timing.notice_ms,
                    dismissable: true,
                },
            }),
            Cmd::after(timing.notice(), PageEvent::NoticeExpired { id }),
        ])
    }

    fn dismiss(&mut self, id: NoticeId) -> PageCmd {
        if self.live_notices.remove(&id) {
            Cmd::effect(Effect::DismissNotice { id })
        } else {
            Cmd::none()
        }
    }
}

impl<S: StorageBackend> Model for PageModel<S> {
    type Message = PageEvent;
    type Effect = Effect;

    fn update(&mut self, msg: PageEvent) -> PageCmd {
        if !msg.is_internal() {
            tracing::trace!(target: "kush.page", event = msg.name(), "event");
        }
        match msg {
            PageEvent::Loaded {
                page,
                prefers_dark,
                csrf_token,
            } => self.on_loaded(page, prefers_dark, csrf_token),
            PageEvent::ContentChanged { page } => {
                self.page = page;
                self.recompute_active_nav()
            }
            PageEvent::Scrolled { scroll_y } => {
                if !scroll_y.is_finite() {
                    return Cmd::none();
                }
                self.scroll_y = scroll_y;
                self.recompute_active_nav()
            }
            PageEvent::HeaderResized { height } => {
                if !height.is_finite() || height < 0.0 {
                    return Cmd::none();
                }
                self.page.header_height = height;
                self.recompute_active_nav()
            }
            PageEvent::FilterRequested { query } => self.on_filter(&query),
            PageEvent::SearchRequested { query } => self.on_search(&query),
            PageEvent::NavClicked { href } => self.on_nav_click(&href),
            PageEvent::ThemeToggled => {
                let theme = self.prefs.toggle_theme();
                let persisted = self.prefs.persist_theme(&mut self.storage);
                Cmd::batch(vec![log_storage("theme", persisted), Cmd::effect(Effect::ApplyTheme { theme })])
            }
            PageEvent::Voted { product, vote } => {
                let (tally, persisted) = self.prefs.vote_persisted(&mut self.storage, &product, vote);
                Cmd::batch(vec![
                    log_storage("likes", persisted),
                    Cmd::effect(Effect::ShowLikeCounts { product, tally }),
                ])
            }
            PageEvent::RemoteLikeClicked { product_id } => self.on_remote_like(product_id),
            PageEvent::OrderClicked { details } => self.on_order(details),
            PageEvent::ContactSubmitted { form } => self.on_contact(&form),
            PageEvent::HttpCompleted { id, result } => self.on_http_completed(id, result),
            PageEvent::NoticeDismissed { id } | PageEvent::NoticeExpired { id } => self.dismiss(id),
            PageEvent::HighlightExpired { target, generation } => {
                if self.highlight != Some((target, generation)) {
                    return Cmd::none();
                }
                self.highlight = None;
                Cmd::effect(Effect::ClearHighlight { target })
            }
            PageEvent::Unloading => {
                let saved = self.prefs.save(&mut self.storage);
                log_storage("preferences", saved)
            }
        }
    }
}

fn log_storage(what: &'static str, result: StorageResult<()>) -> PageCmd {
    match result {
        Ok(()) => Cmd::none(),
        Err(err) => {
            tracing::warn!(target: "kush.page", what, error = %err, "failed to persist");
            Cmd::log(format!("failed to persist {what}: {err}"))
        }
    }
}
