#![forbid(unsafe_code)]

//! Top-level view transition choreographer.
//!
//! A [`Choreographer`] is owned by the root view. It ties together the
//! [`TransitionMachine`], the [`EntranceSequencer`], header snapshot capture
//! and the browser history:
//!
//! - clicks on list cards and browser back/forward become navigation
//!   intents for the machine;
//! - destination content errors abort the forward path;
//! - detail headers are measured and stored once their layout settles;
//! - reverse navigations survive a full page load through session storage.
//!
//! The host feeds in events and elapsed time, reads styles back out, and
//! applies the [`HistoryCommand`]s it collects with
//! [`take_history`](Choreographer::take_history).

use std::time::Duration;

use segue_core::content::{ContentKind, ContentRef};
use segue_core::geometry::Viewport;
use segue_core::measure::MeasurementProvider;
use segue_core::morph::{MorphPlan, MorphPolicy};

use crate::config::ChoreographyConfig;
use crate::entrance::{EntranceContent, EntranceCue, EntranceSequencer, EntranceState, SkipReason};
use crate::error::{ContentError, RouteError};
use crate::navigation::{HistoryCommand, Location, Route};
use crate::scheduler::Scheduler;
use crate::snapshot::{self, SnapshotPolicy};
use crate::storage::{ReverseAnimationActive, ReverseAnimationSlug, SessionStorage, SessionStore};
use crate::transition::{
    Admission, IgnoreReason, ItemStyle, NavigationIntent, NavigationPhase, PhaseChange,
    TransitionMachine,
};

/// Something observable that happened during [`Choreographer::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChoreographyEvent {
    /// The navigation phase changed.
    Phase(PhaseChange),
    /// An entrance cue fired.
    Entrance(EntranceCue),
    /// A detail header capture ran.
    Snapshot {
        content: ContentRef,
        /// Whether a snapshot was stored.
        saved: bool,
        at: Duration,
    },
}

/// Drives every transition of one app instance.
#[derive(Debug)]
pub struct Choreographer<S, M> {
    morph_policy: MorphPolicy,
    snapshot_policy: SnapshotPolicy,
    reduced_motion: bool,
    store: SessionStore<S>,
    layout: M,
    viewport: Viewport,
    home: EntranceContent,
    machine: TransitionMachine,
    entrance: EntranceSequencer,
    captures: Scheduler<ContentRef>,
    location: Option<Location>,
    list_items: Vec<ContentRef>,
    history: Vec<HistoryCommand>,
    push_on_return: bool,
}

impl<S: SessionStorage, M: MeasurementProvider> Choreographer<S, M> {
    /// Create a choreographer with nothing mounted.
    pub fn new(config: &ChoreographyConfig, storage: S, layout: M) -> Self {
        Self {
            morph_policy: config.to_morph_policy(),
            snapshot_policy: config.to_snapshot_policy(),
            reduced_motion: config.motion.reduced_motion,
            store: SessionStore::new(storage),
            layout,
            viewport: Viewport::default(),
            home: EntranceContent::default(),
            machine: TransitionMachine::new(config.to_transition_timing()),
            entrance: EntranceSequencer::new(config.to_entrance_timing()),
            captures: Scheduler::new(),
            location: None,
            list_items: Vec::new(),
            history: Vec::new(),
            push_on_return: false,
        }
    }

    /// Set what the home view shows (builder pattern).
    #[must_use]
    pub fn with_home(mut self, home: EntranceContent) -> Self {
        self.home = home;
        self
    }

    /// Set the viewport size (builder pattern).
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    // -- host inputs --------------------------------------------------------

    /// Full page load of `url`.
    ///
    /// A list page loaded while a reverse navigation is recorded in session
    /// storage resumes that navigation at `RevealingHome`.
    pub fn load(&mut self, url: &str) -> Result<(), RouteError> {
        let location = Location::parse(url)?;
        tracing::debug!(target: "segue.nav", href = %location, "page load");
        self.enter(location, true);
        Ok(())
    }

    /// Items currently rendered as cards on the list view.
    pub fn set_list_items(&mut self, items: Vec<ContentRef>) {
        self.list_items = items;
    }

    /// Update the viewport size.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Toggle reduced motion (the media query can change at any time).
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// A card on the current list was clicked.
    pub fn click(&mut self, content: ContentRef) -> Admission {
        self.start_forward(content, true)
    }

    /// The in-app back link on a detail view was clicked.
    pub fn back(&mut self) -> Admission {
        self.start_back(true)
    }

    /// In-app navigation to `url` (navigation tabs, header links).
    ///
    /// Navigating to a detail page from its list is the same as clicking
    /// its card.
    pub fn navigate(&mut self, url: &str) -> Result<Admission, RouteError> {
        let location = Location::parse(url)?;
        if let Route::Detail(content) = &location.route {
            if self.is_on_list_of(content.kind) {
                return Ok(self.start_forward(content.clone(), true));
            }
        }
        if self.machine.is_busy() {
            return Ok(self.ignore_nav(&location, IgnoreReason::Busy(self.machine.phase())));
        }
        self.history.push(HistoryCommand::Push(location.href()));
        self.enter(location, false);
        Ok(Admission::Accepted)
    }

    /// Leave a section page for home, signalling the return in the query.
    pub fn go_home(&mut self) -> Admission {
        if self.machine.is_busy() {
            return Admission::Ignored(IgnoreReason::Busy(self.machine.phase()));
        }
        let location = match self.location.as_ref().and_then(|l| l.route.section_name()) {
            Some(section) => Location::home_returning_from(section),
            None => Location::new(Route::Home),
        };
        self.history.push(HistoryCommand::Push(location.href()));
        self.enter(location, false);
        Admission::Accepted
    }

    /// The browser moved through history to `url`.
    ///
    /// Back to a list from a settled detail view runs the reverse path;
    /// forward to a detail view from its list runs the forward path. Pop
    /// states that arrive while a transition is in flight are ignored.
    /// No history commands are emitted.
    pub fn pop_state(&mut self, url: &str) -> Result<Admission, RouteError> {
        let location = Location::parse(url)?;
        if self.machine.is_busy() {
            return Ok(self.ignore_nav(&location, IgnoreReason::Busy(self.machine.phase())));
        }

        let current = self.location.as_ref().map(|l| l.route.clone());
        let admission = match (current, location.route.clone()) {
            (Some(Route::Detail(from)), Route::List(kind)) if from.kind == kind => {
                let admission = self.start_back(false);
                if admission.is_accepted() {
                    self.location = Some(location);
                }
                admission
            }
            (Some(Route::List(kind)), Route::Detail(to)) if to.kind == kind => {
                self.start_forward(to, false)
            }
            _ => {
                self.enter(location, false);
                Admission::Accepted
            }
        };
        Ok(admission)
    }

    /// The destination's content failed to load.
    ///
    /// Aborts an in-flight forward transition for that item and points the
    /// address back at its list. The error stays available to the detail
    /// view either way.
    pub fn content_failed(&mut self, error: ContentError) -> Option<PhaseChange> {
        let concerns_active = self
            .machine
            .active_content()
            .is_some_and(|c| c.slug == error.slug());
        if !concerns_active {
            tracing::debug!(target: "segue.nav", slug = error.slug(), "stale content error ignored");
            return None;
        }
        let kind = self.machine.active_content().map(|c| c.kind);
        let change = self.machine.abort(error)?;
        self.captures.cancel_all();
        if let Some(kind) = kind {
            let list = Location::new(Route::List(kind));
            self.history.push(HistoryCommand::Replace(list.href()));
            self.location = Some(list);
        }
        Some(change)
    }

    /// Advance time, returning everything that happened, phase changes first.
    pub fn advance(&mut self, dt: Duration) -> Vec<ChoreographyEvent> {
        let base = self.captures.now();
        let until = base.saturating_add(dt);
        let mut events = Vec::new();

        for change in self.machine.advance(dt) {
            self.on_phase_change(&change, base);
            events.push(ChoreographyEvent::Phase(change));
        }

        events.extend(
            self.entrance
                .advance(dt, &mut self.store)
                .into_iter()
                .map(ChoreographyEvent::Entrance),
        );

        while let Some(content) = self.captures.pop_due(until) {
            let at = self.captures.now();
            let saved = self.capture_header(&content);
            events.push(ChoreographyEvent::Snapshot { content, saved, at });
        }
        self.captures.settle(until);
        events
    }

    /// Tear the view tree down, cancelling every pending timer.
    ///
    /// Returns how many timers were cancelled.
    pub fn unmount(&mut self) -> usize {
        let cancelled =
            self.machine.unmount() + self.entrance.unmount() + self.captures.cancel_all();
        self.push_on_return = false;
        tracing::debug!(target: "segue.nav", cancelled, "choreographer unmounted");
        cancelled
    }

    // -- host outputs -------------------------------------------------------

    /// Drain the history commands emitted since the last call.
    pub fn take_history(&mut self) -> Vec<HistoryCommand> {
        std::mem::take(&mut self.history)
    }

    /// Current navigation phase.
    #[must_use]
    pub fn phase(&self) -> NavigationPhase {
        self.machine.phase()
    }

    /// The busy guard.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.machine.is_busy()
    }

    /// Current address.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Style overrides for a list card.
    #[must_use]
    pub fn item_style(&self, item: &ContentRef) -> ItemStyle {
        self.machine.item_style(item)
    }

    /// Every card that currently carries an override.
    #[must_use]
    pub fn overrides(&self) -> Vec<(ContentRef, ItemStyle)> {
        self.machine.overrides()
    }

    /// Opacity of the detail view body.
    #[must_use]
    pub fn destination_opacity(&self) -> f32 {
        self.machine.destination_opacity()
    }

    /// Error the destination view should render, if its load failed.
    #[must_use]
    pub fn destination_error(&self) -> Option<&ContentError> {
        self.machine.destination_error()
    }

    /// The underlying state machine.
    #[must_use]
    pub fn machine(&self) -> &TransitionMachine {
        &self.machine
    }

    /// Home view state.
    #[must_use]
    pub fn entrance_state(&self) -> &EntranceState {
        self.entrance.state()
    }

    /// The entrance sequencer.
    #[must_use]
    pub fn entrance(&self) -> &EntranceSequencer {
        &self.entrance
    }

    /// Pending timers across every subsystem.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.machine.pending_timers() + self.entrance.pending_timers() + self.captures.pending_count()
    }

    /// Session storage.
    #[must_use]
    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    /// Current layout measurements.
    #[must_use]
    pub fn layout(&self) -> &M {
        &self.layout
    }

    /// Mutable access to layout measurements, for hosts that update them in
    /// place.
    pub fn layout_mut(&mut self) -> &mut M {
        &mut self.layout
    }

    // -- internals ----------------------------------------------------------

    fn is_on_list_of(&self, kind: ContentKind) -> bool {
        matches!(
            self.location.as_ref().map(|l| &l.route),
            Some(Route::List(k)) if *k == kind
        )
    }

    fn ignore_nav(&self, location: &Location, reason: IgnoreReason) -> Admission {
        tracing::debug!(target: "segue.nav", href = %location, reason = %reason, "navigation ignored");
        Admission::Ignored(reason)
    }

    fn plan_for(&self, content: &ContentRef) -> Option<MorphPlan> {
        let snapshot = self.store.load_snapshot(content);
        let plan = self
            .morph_policy
            .measure_and_plan(&self.layout, content, snapshot.as_ref(), self.viewport);
        if plan.is_none() {
            tracing::warn!(target: "segue.morph", content = %content, "card not measurable, morph skipped");
        }
        plan
    }

    fn start_forward(&mut self, content: ContentRef, push: bool) -> Admission {
        if self.machine.is_busy() {
            return Admission::Ignored(IgnoreReason::Busy(self.machine.phase()));
        }
        if !self.is_on_list_of(content.kind) {
            return Admission::Ignored(IgnoreReason::NotListed);
        }

        let admission = if self.reduced_motion {
            let admission = self.machine.settle_static(content.clone());
            if admission.is_accepted() {
                self.schedule_capture(content.clone(), Duration::ZERO);
            }
            admission
        } else {
            let plan = self.plan_for(&content);
            self.machine.begin(
                NavigationIntent::from_card(content.clone()),
                self.list_items.clone(),
                plan,
            )
        };

        if admission.is_accepted() {
            let location = Location::new(Route::Detail(content));
            if push {
                self.history.push(HistoryCommand::Push(location.href()));
            }
            self.location = Some(location);
        }
        admission
    }

    fn start_back(&mut self, push: bool) -> Admission {
        let Some(Route::Detail(content)) = self.location.as_ref().map(|l| l.route.clone()) else {
            return Admission::Ignored(IgnoreReason::WrongPhase(self.machine.phase()));
        };
        let list = Location::new(Route::List(content.kind));

        if self.reduced_motion {
            let admission = self.machine.return_static();
            if admission.is_accepted() {
                self.captures.cancel_all();
                if push {
                    self.history.push(HistoryCommand::Push(list.href()));
                }
                self.location = Some(list);
            }
            return admission;
        }

        let admission = self.machine.begin_back(self.list_items.clone(), None);
        if admission.is_accepted() {
            self.captures.cancel_all();
            self.store.set(&ReverseAnimationSlug, &content.slug);
            self.store.set(&ReverseAnimationActive, &true);
            self.push_on_return = push;
        }
        admission
    }

    fn on_phase_change(&mut self, change: &PhaseChange, base: Duration) {
        match (change.from, change.to) {
            (_, NavigationPhase::Settled) => {
                if let Some(content) = change.content.clone() {
                    self.schedule_capture(content, change.at.saturating_sub(base));
                }
            }
            (NavigationPhase::MorphingBack, NavigationPhase::RevealingHome) => {
                if let Some(content) = &change.content {
                    let list = Location::new(Route::List(content.kind));
                    if std::mem::take(&mut self.push_on_return) {
                        self.history.push(HistoryCommand::Push(list.href()));
                    }
                    self.location = Some(list);
                }
            }
            (NavigationPhase::RevealingHome, NavigationPhase::Idle) => self.clear_reverse_flags(),
            _ => {}
        }
    }

    fn schedule_capture(&mut self, content: ContentRef, after: Duration) {
        self.captures.cancel_all();
        self.captures
            .schedule(after + self.snapshot_policy.capture_debounce, content);
    }

    fn capture_header(&mut self, content: &ContentRef) -> bool {
        match snapshot::capture(&self.layout, content.kind) {
            Ok(snap) => self.store.save_snapshot(content, snap),
            Err(miss) => {
                tracing::warn!(target: "segue.snapshot", content = %content, miss = ?miss, "header capture skipped");
                false
            }
        }
    }

    fn clear_reverse_flags(&mut self) {
        self.store.remove(&ReverseAnimationActive);
        self.store.remove(&ReverseAnimationSlug);
    }

    fn enter(&mut self, location: Location, fresh_load: bool) {
        self.machine.unmount();
        self.entrance.unmount();
        self.captures.cancel_all();
        self.push_on_return = false;

        match &location.route {
            Route::Home => {
                let returning = location.params.returning;
                let skip = if self.reduced_motion {
                    Some(SkipReason::ReducedMotion)
                } else if returning {
                    Some(SkipReason::Returning)
                } else {
                    None
                };
                self.entrance.mount(&self.store, &self.home, skip);
                if returning && !self.reduced_motion {
                    self.machine.resume_reverse(None, Vec::new());
                }
            }
            Route::List(kind) => {
                if fresh_load {
                    self.resume_reverse_from_storage(*kind);
                }
            }
            Route::Detail(content) => {
                self.machine.settle_static(content.clone());
                self.schedule_capture(content.clone(), Duration::ZERO);
            }
            Route::Section(_) => {}
        }
        self.location = Some(location);
    }

    fn resume_reverse_from_storage(&mut self, kind: ContentKind) {
        if !self.store.get(&ReverseAnimationActive).unwrap_or(false) {
            return;
        }
        let slug = self.store.get(&ReverseAnimationSlug);
        self.clear_reverse_flags();
        if self.reduced_motion {
            return;
        }
        let content = slug.map(|slug| ContentRef::new(kind, slug));
        tracing::debug!(
            target: "segue.nav",
            slug = content.as_ref().map_or("", |c| c.slug.as_str()),
            "resuming reverse navigation after reload"
        );
        self.machine.resume_reverse(content, self.list_items.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use segue_core::geometry::Rect;
    use segue_core::measure::{ElementHandle, LayoutMap};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn choreographer() -> Choreographer<MemoryStorage, LayoutMap> {
        let layout = LayoutMap::new().with(
            ElementHandle::card(&ContentRef::project("a")),
            Rect::new(300.0, 200.0, 600.0, 120.0),
        );
        let mut c = Choreographer::new(&ChoreographyConfig::default(), MemoryStorage::new(), layout);
        c.load("/projects").unwrap();
        c.set_list_items(vec![ContentRef::project("a"), ContentRef::project("b")]);
        c
    }

    #[test]
    fn click_pushes_detail_path() {
        let mut c = choreographer();
        assert!(c.click(ContentRef::project("a")).is_accepted());
        assert_eq!(c.take_history(), vec![HistoryCommand::Push("/projects/a".into())]);
        assert_eq!(c.phase(), NavigationPhase::FadingOut);
        assert!(c.take_history().is_empty());
    }

    #[test]
    fn click_from_another_kind_is_not_listed() {
        let mut c = choreographer();
        assert_eq!(
            c.click(ContentRef::blog("a")),
            Admission::Ignored(IgnoreReason::NotListed)
        );
        assert!(c.take_history().is_empty());
    }

    #[test]
    fn capture_follows_settle() {
        let mut c = choreographer();
        c.click(ContentRef::project("a"));
        c.layout_mut().set(
            ElementHandle::DetailHeader(ContentKind::Project),
            Rect::new(84.0, 192.0, 896.0, 60.0),
        );
        let events = c.advance(ms(1800));
        assert!(!events.iter().any(|e| matches!(e, ChoreographyEvent::Snapshot { .. })));
        let events = c.advance(ms(200));
        assert!(events.iter().any(|e| matches!(
            e,
            ChoreographyEvent::Snapshot { saved: true, at, .. } if *at == ms(2000)
        )));
        assert!(c.store().load_snapshot(&ContentRef::project("a")).is_some());
    }

    #[test]
    fn stale_error_is_ignored() {
        let mut c = choreographer();
        c.click(ContentRef::project("a"));
        assert!(c.content_failed(ContentError::NotFound { slug: "zzz".into() }).is_none());
        assert!(c.is_busy());
    }

    #[test]
    fn go_home_from_section_marks_return() {
        let mut c = choreographer();
        c.navigate("/resume").unwrap();
        c.take_history();
        assert!(c.go_home().is_accepted());
        assert_eq!(
            c.take_history(),
            vec![HistoryCommand::Push("/?returning=true&from=resume&fromDirect=true".into())]
        );
        assert_eq!(c.phase(), NavigationPhase::RevealingHome);
        assert!(c.entrance_state().content_visible);
    }

    #[test]
    fn unmount_cancels_all_subsystems() {
        let mut c = choreographer();
        c.click(ContentRef::project("a"));
        assert!(c.pending_timers() > 0);
        assert!(c.unmount() > 0);
        assert_eq!(c.pending_timers(), 0);
        assert_eq!(c.phase(), NavigationPhase::Idle);
    }
}
