#![forbid(unsafe_code)]

//! Transition state machine.
//!
//! One [`TransitionMachine`] owns the navigation phase for a view tree.
//! Phase changes are time-driven: [`begin`](TransitionMachine::begin) queues
//! the fixed sequence of phase entries on a [`Scheduler`], and
//! [`advance`](TransitionMachine::advance) walks it as time passes. Nothing
//! waits on render callbacks, so a headless caller that advances by the
//! documented durations observes exactly the documented phases.
//!
//! ```text
//! forward:  Idle ─click─▶ FadingOut ─▶ Morphing ─▶ RevealingDestination ─▶ Settled
//! reverse:  Settled ─back─▶ FadingBack ─▶ MorphingBack ─▶ RevealingHome ─▶ Idle
//! abort:    FadingOut | Morphing | RevealingDestination ─error─▶ Idle
//! ```
//!
//! # Invariants
//!
//! 1. At most one navigation is in flight. While the phase is neither
//!    `Idle` nor `Settled`, new intents are [`Admission::Ignored`] and the
//!    machine is left untouched.
//! 2. Phases are entered strictly in order; none is skipped or repeated.
//! 3. `Settled` and `Idle` carry no per-item style overrides.
//! 4. An abort or unmount cancels every queued phase entry.

use std::fmt;
use std::time::Duration;

use segue_core::animation::{Animation, Easing, MORPH_EASING, Tween};
use segue_core::content::ContentRef;
use segue_core::measure::ElementHandle;
use segue_core::morph::{MorphPlan, MorphTarget, Transform};
use segue_core::typography::HeaderTypography;

use crate::error::ContentError;
use crate::scheduler::Scheduler;

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// Where a navigation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavigationPhase {
    /// List view at rest.
    #[default]
    Idle,
    /// Siblings of the selected item fade away.
    FadingOut,
    /// The selected item moves and grows into the header position.
    Morphing,
    /// The destination body fades in under the morphed header.
    RevealingDestination,
    /// Detail view at rest.
    Settled,
    /// The destination body fades away before going back.
    FadingBack,
    /// The header shrinks back into its card position.
    MorphingBack,
    /// List items fade back in.
    RevealingHome,
}

impl NavigationPhase {
    /// Every phase, forward path first.
    pub const ALL: [NavigationPhase; 8] = [
        Self::Idle,
        Self::FadingOut,
        Self::Morphing,
        Self::RevealingDestination,
        Self::Settled,
        Self::FadingBack,
        Self::MorphingBack,
        Self::RevealingHome,
    ];

    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FadingOut => "fading_out",
            Self::Morphing => "morphing",
            Self::RevealingDestination => "revealing_destination",
            Self::Settled => "settled",
            Self::FadingBack => "fading_back",
            Self::MorphingBack => "morphing_back",
            Self::RevealingHome => "revealing_home",
        }
    }

    /// Whether a navigation is in flight.
    #[must_use]
    pub const fn is_busy(self) -> bool {
        !matches!(self, Self::Idle | Self::Settled)
    }

    /// Whether this phase belongs to the back path.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::FadingBack | Self::MorphingBack | Self::RevealingHome)
    }

    /// Whether an error from the content provider can interrupt this phase.
    #[must_use]
    pub const fn is_abortable(self) -> bool {
        matches!(
            self,
            Self::FadingOut | Self::Morphing | Self::RevealingDestination
        )
    }
}

impl fmt::Display for NavigationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs that move the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseSignal {
    /// A navigation intent toward a detail view.
    Begin,
    /// A back navigation from a detail view.
    BeginBack,
    /// The current phase's duration has elapsed.
    Elapsed,
    /// The destination failed to load.
    Abort,
    /// The view tree was torn down.
    Reset,
}

/// Pure transition function.
///
/// Returns `None` when `signal` does not apply in `phase`; the caller keeps
/// the current phase in that case.
#[must_use]
pub const fn next_phase(phase: NavigationPhase, signal: PhaseSignal) -> Option<NavigationPhase> {
    use NavigationPhase::*;
    match (phase, signal) {
        (_, PhaseSignal::Reset) => Some(Idle),
        (Idle, PhaseSignal::Begin) => Some(FadingOut),
        (FadingOut, PhaseSignal::Elapsed) => Some(Morphing),
        (Morphing, PhaseSignal::Elapsed) => Some(RevealingDestination),
        (RevealingDestination, PhaseSignal::Elapsed) => Some(Settled),
        (Settled, PhaseSignal::BeginBack) => Some(FadingBack),
        (FadingBack, PhaseSignal::Elapsed) => Some(MorphingBack),
        (MorphingBack, PhaseSignal::Elapsed) => Some(RevealingHome),
        (RevealingHome, PhaseSignal::Elapsed) => Some(Idle),
        (FadingOut | Morphing | RevealingDestination, PhaseSignal::Abort) => Some(Idle),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Fixed timing contract every UI layer honours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    /// Sibling (or destination body) fade duration.
    pub fade_out: Duration,
    /// Delay from click to morph start; the fade runs inside it.
    pub morph_delay: Duration,
    /// Morph duration.
    pub morph: Duration,
    /// Wait after the morph before the destination body fades in.
    pub reveal_delay: Duration,
    /// Destination body fade-in duration.
    pub reveal: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            fade_out: Duration::from_millis(300),
            morph_delay: Duration::from_millis(500),
            morph: Duration::from_millis(800),
            reveal_delay: Duration::from_millis(200),
            reveal: Duration::from_millis(300),
        }
    }
}

impl TransitionTiming {
    /// How long the machine stays in `phase` before moving on.
    ///
    /// Resting phases have no duration.
    #[must_use]
    pub fn phase_duration(&self, phase: NavigationPhase) -> Duration {
        use NavigationPhase::*;
        match phase {
            Idle | Settled => Duration::ZERO,
            FadingOut | FadingBack => self.morph_delay,
            Morphing | MorphingBack => self.morph,
            RevealingDestination | RevealingHome => self.reveal_delay + self.reveal,
        }
    }

    /// Total time from click to `Settled`.
    #[must_use]
    pub fn forward_total(&self) -> Duration {
        self.phase_duration(NavigationPhase::FadingOut)
            + self.phase_duration(NavigationPhase::Morphing)
            + self.phase_duration(NavigationPhase::RevealingDestination)
    }

    /// Total time from back click to `Idle`.
    #[must_use]
    pub fn reverse_total(&self) -> Duration {
        self.phase_duration(NavigationPhase::FadingBack)
            + self.phase_duration(NavigationPhase::MorphingBack)
            + self.phase_duration(NavigationPhase::RevealingHome)
    }
}

// ---------------------------------------------------------------------------
// Intents, admission, changes
// ---------------------------------------------------------------------------

/// A request to navigate to a detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationIntent {
    /// Item being opened.
    pub destination: ContentRef,
    /// Element the navigation started from (the clicked card).
    pub origin: ElementHandle,
}

impl NavigationIntent {
    /// Intent for a click on `destination`'s card.
    #[must_use]
    pub fn from_card(destination: ContentRef) -> Self {
        let origin = ElementHandle::card(&destination);
        Self {
            destination,
            origin,
        }
    }
}

/// Why a request left the machine untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A navigation is already in flight.
    Busy(NavigationPhase),
    /// The request does not apply from this resting phase (back from the
    /// list, forward from a detail view).
    WrongPhase(NavigationPhase),
    /// The current view has no card for the requested item.
    NotListed,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy(phase) => write!(f, "busy in {phase}"),
            Self::WrongPhase(phase) => write!(f, "not applicable in {phase}"),
            Self::NotListed => write!(f, "item not on the current list"),
        }
    }
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request started a navigation.
    Accepted,
    /// The request was a no-op.
    Ignored(IgnoreReason),
}

impl Admission {
    /// Whether the request was accepted.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// One observed phase change.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseChange {
    pub from: NavigationPhase,
    pub to: NavigationPhase,
    /// Machine time of the change.
    pub at: Duration,
    /// Item the navigation concerns, if any.
    pub content: Option<ContentRef>,
}

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

/// Transient style overrides for one list item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemStyle {
    pub opacity: f32,
    pub transform: Option<Transform>,
    pub typography: Option<HeaderTypography>,
}

impl ItemStyle {
    /// Normal in-flow rendering.
    pub const NORMAL: Self = Self {
        opacity: 1.0,
        transform: None,
        typography: None,
    };

    /// Whether anything differs from normal rendering.
    #[must_use]
    pub fn has_overrides(&self) -> bool {
        *self != Self::NORMAL
    }
}

impl Default for ItemStyle {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[derive(Debug, Clone)]
struct ActiveItem {
    content: Option<ContentRef>,
    siblings: Vec<ContentRef>,
    plan: Option<MorphPlan>,
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// The navigation state machine for one view tree.
#[derive(Debug)]
pub struct TransitionMachine {
    timing: TransitionTiming,
    phase: NavigationPhase,
    phase_started: Duration,
    scheduler: Scheduler<NavigationPhase>,
    active: Option<ActiveItem>,
    destination_error: Option<ContentError>,
}

impl TransitionMachine {
    /// Create an idle machine.
    #[must_use]
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            timing,
            phase: NavigationPhase::Idle,
            phase_started: Duration::ZERO,
            scheduler: Scheduler::new(),
            active: None,
            destination_error: None,
        }
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> NavigationPhase {
        self.phase
    }

    /// The busy guard.
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    /// Timing contract in use.
    #[must_use]
    pub fn timing(&self) -> &TransitionTiming {
        &self.timing
    }

    /// Machine time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Item the current or last navigation concerns.
    #[must_use]
    pub fn active_content(&self) -> Option<&ContentRef> {
        self.active.as_ref().and_then(|a| a.content.as_ref())
    }

    /// Morph of the selected item, if one was planned.
    #[must_use]
    pub fn morph_target(&self) -> Option<MorphTarget> {
        self.active.as_ref().and_then(|a| a.plan).map(|p| p.morph)
    }

    /// Error recorded by the last abort.
    #[must_use]
    pub fn destination_error(&self) -> Option<&ContentError> {
        self.destination_error.as_ref()
    }

    /// Number of queued phase entries.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Start the forward path for `intent`.
    ///
    /// `siblings` are the other items currently shown in the list; `plan`
    /// is the selected card's morph (`None` skips the movement but keeps
    /// the timing).
    pub fn begin(
        &mut self,
        intent: NavigationIntent,
        siblings: Vec<ContentRef>,
        plan: Option<MorphPlan>,
    ) -> Admission {
        if let Err(reason) = self.guard(NavigationPhase::Idle) {
            tracing::debug!(
                target: "segue.transition",
                content = %intent.destination,
                reason = %reason,
                "navigation intent ignored"
            );
            return Admission::Ignored(reason);
        }

        let siblings = siblings
            .into_iter()
            .filter(|s| *s != intent.destination)
            .collect();
        self.destination_error = None;
        self.active = Some(ActiveItem {
            content: Some(intent.destination),
            siblings,
            plan,
        });
        self.enter(PhaseSignal::Begin);
        self.queue_path(&[
            NavigationPhase::FadingOut,
            NavigationPhase::Morphing,
            NavigationPhase::RevealingDestination,
        ]);
        Admission::Accepted
    }

    /// Start the reverse path from `Settled`.
    ///
    /// `siblings` are the list items to fade back in. A `plan` overrides the
    /// one kept from the forward navigation.
    pub fn begin_back(&mut self, siblings: Vec<ContentRef>, plan: Option<MorphPlan>) -> Admission {
        if let Err(reason) = self.guard(NavigationPhase::Settled) {
            tracing::debug!(
                target: "segue.transition",
                reason = %reason,
                "back navigation ignored"
            );
            return Admission::Ignored(reason);
        }

        if let Some(active) = self.active.as_mut() {
            active.siblings = siblings
                .into_iter()
                .filter(|s| Some(s) != active.content.as_ref())
                .collect();
            if plan.is_some() {
                active.plan = plan;
            }
        }
        self.enter(PhaseSignal::BeginBack);
        self.queue_path(&[
            NavigationPhase::FadingBack,
            NavigationPhase::MorphingBack,
            NavigationPhase::RevealingHome,
        ]);
        Admission::Accepted
    }

    /// Interrupt the forward path because the destination failed to load.
    ///
    /// Returns the change to `Idle`, or `None` if the phase is not
    /// abortable (the error is still recorded).
    pub fn abort(&mut self, error: ContentError) -> Option<PhaseChange> {
        let change = if self.phase.is_abortable() {
            let cancelled = self.scheduler.cancel_all();
            tracing::warn!(
                target: "segue.transition",
                phase = self.phase.as_str(),
                error = %error,
                cancelled,
                "transition aborted"
            );
            let change = self.enter(PhaseSignal::Abort);
            self.active = None;
            Some(change)
        } else {
            None
        };
        self.destination_error = Some(error);
        change
    }

    /// Show `content` as a settled detail view without animating.
    ///
    /// Used for direct loads and reduced motion.
    pub fn settle_static(&mut self, content: ContentRef) -> Admission {
        if self.phase.is_busy() {
            return Admission::Ignored(IgnoreReason::Busy(self.phase));
        }
        self.destination_error = None;
        self.active = Some(ActiveItem {
            content: Some(content),
            siblings: Vec::new(),
            plan: None,
        });
        self.jump(NavigationPhase::Settled);
        Admission::Accepted
    }

    /// Return to the list without animating.
    pub fn return_static(&mut self) -> Admission {
        if self.phase.is_busy() {
            return Admission::Ignored(IgnoreReason::Busy(self.phase));
        }
        self.jump(NavigationPhase::Idle);
        self.active = None;
        Admission::Accepted
    }

    /// Run only the final reverse stage for a list that was loaded fresh
    /// while a back navigation was in flight.
    ///
    /// `content` is the item being returned from; `None` when returning to
    /// a page with no matching card (home).
    pub fn resume_reverse(&mut self, content: Option<ContentRef>, siblings: Vec<ContentRef>) -> Admission {
        if self.phase.is_busy() {
            return Admission::Ignored(IgnoreReason::Busy(self.phase));
        }
        let siblings = match &content {
            Some(c) => siblings.into_iter().filter(|s| s != c).collect(),
            None => siblings,
        };
        self.active = Some(ActiveItem {
            content,
            siblings,
            plan: None,
        });
        self.jump(NavigationPhase::RevealingHome);
        self.scheduler.schedule(
            self.timing.phase_duration(NavigationPhase::RevealingHome),
            NavigationPhase::Idle,
        );
        Admission::Accepted
    }

    /// Advance machine time, returning every phase change in order.
    pub fn advance(&mut self, dt: Duration) -> Vec<PhaseChange> {
        let until = self.scheduler.now().saturating_add(dt);
        let mut changes = Vec::new();
        while let Some(target) = self.scheduler.pop_due(until) {
            if next_phase(self.phase, PhaseSignal::Elapsed) != Some(target) {
                tracing::warn!(
                    target: "segue.transition",
                    phase = self.phase.as_str(),
                    expected = target.as_str(),
                    "stale phase timer dropped"
                );
                continue;
            }
            changes.push(self.enter(PhaseSignal::Elapsed));
        }
        self.scheduler.settle(until);
        if self.phase == NavigationPhase::Idle && !changes.is_empty() {
            self.active = None;
        }
        changes
    }

    /// Tear down: cancel every timer and drop to `Idle`.
    ///
    /// Returns how many queued phase entries were cancelled.
    pub fn unmount(&mut self) -> usize {
        let cancelled = self.scheduler.cancel_all();
        if self.phase != NavigationPhase::Idle {
            self.enter(PhaseSignal::Reset);
        }
        self.active = None;
        if cancelled > 0 {
            tracing::debug!(target: "segue.transition", cancelled, "transition timers cancelled");
        }
        cancelled
    }

    // -- styles -------------------------------------------------------------

    /// Style overrides for a list item in the current phase.
    #[must_use]
    pub fn item_style(&self, item: &ContentRef) -> ItemStyle {
        let Some(active) = &self.active else {
            return ItemStyle::NORMAL;
        };
        let elapsed = self.phase_elapsed();
        let selected = active.content.as_ref() == Some(item);

        use NavigationPhase::*;
        match self.phase {
            Idle | Settled => ItemStyle::NORMAL,
            FadingOut if !selected => ItemStyle {
                opacity: 1.0 - ratio(elapsed, self.timing.fade_out),
                ..ItemStyle::NORMAL
            },
            FadingOut => ItemStyle::NORMAL,
            Morphing if selected => {
                let t = self.morph_progress(elapsed);
                ItemStyle {
                    opacity: 1.0,
                    transform: active.plan.map(|p| p.morph.at(p.source.width, t)),
                    typography: Some(HeaderTypography::LIST_CARD.lerp(&HeaderTypography::DETAIL_HEADER, t)),
                }
            }
            RevealingDestination | FadingBack if selected => ItemStyle {
                opacity: 1.0,
                transform: active.plan.map(|p| p.morph.at(p.source.width, 1.0)),
                typography: Some(HeaderTypography::DETAIL_HEADER),
            },
            MorphingBack if selected => {
                let t = self.morph_progress(elapsed);
                ItemStyle {
                    opacity: 1.0,
                    transform: active.plan.map(|p| p.morph.at(p.source.width, 1.0 - t)),
                    typography: Some(HeaderTypography::DETAIL_HEADER.lerp(&HeaderTypography::LIST_CARD, t)),
                }
            }
            RevealingHome if selected => ItemStyle::NORMAL,
            RevealingHome => ItemStyle {
                opacity: ratio(elapsed.saturating_sub(self.timing.reveal_delay), self.timing.reveal),
                ..ItemStyle::NORMAL
            },
            Morphing | RevealingDestination | FadingBack | MorphingBack => ItemStyle {
                opacity: 0.0,
                ..ItemStyle::NORMAL
            },
        }
    }

    /// Every list item that currently carries an override.
    #[must_use]
    pub fn overrides(&self) -> Vec<(ContentRef, ItemStyle)> {
        let Some(active) = &self.active else {
            return Vec::new();
        };
        active
            .content
            .iter()
            .chain(active.siblings.iter())
            .map(|c| (c.clone(), self.item_style(c)))
            .filter(|(_, style)| style.has_overrides())
            .collect()
    }

    /// Opacity of the destination page body (everything below the header).
    #[must_use]
    pub fn destination_opacity(&self) -> f32 {
        let elapsed = self.phase_elapsed();
        use NavigationPhase::*;
        match self.phase {
            Settled => 1.0,
            RevealingDestination => {
                ratio(elapsed.saturating_sub(self.timing.reveal_delay), self.timing.reveal)
            }
            FadingBack => 1.0 - ratio(elapsed, self.timing.fade_out),
            Idle | FadingOut | Morphing | MorphingBack | RevealingHome => 0.0,
        }
    }

    /// Time spent in the current phase.
    #[must_use]
    pub fn phase_elapsed(&self) -> Duration {
        self.scheduler.now().saturating_sub(self.phase_started)
    }

    // -- internals ----------------------------------------------------------

    fn guard(&self, resting: NavigationPhase) -> Result<(), IgnoreReason> {
        if self.phase.is_busy() {
            Err(IgnoreReason::Busy(self.phase))
        } else if self.phase != resting {
            Err(IgnoreReason::WrongPhase(self.phase))
        } else {
            Ok(())
        }
    }

    fn queue_path(&mut self, path: &[NavigationPhase]) {
        let mut offset = Duration::ZERO;
        for phase in path {
            offset += self.timing.phase_duration(*phase);
            if let Some(next) = next_phase(*phase, PhaseSignal::Elapsed) {
                self.scheduler.schedule(offset, next);
            }
        }
    }

    fn morph_progress(&self, elapsed: Duration) -> f32 {
        let mut tween = Tween::new(self.timing.morph).easing(Easing::Bezier(MORPH_EASING));
        tween.seek(elapsed);
        tween.value()
    }

    fn enter(&mut self, signal: PhaseSignal) -> PhaseChange {
        let from = self.phase;
        let to = next_phase(from, signal).unwrap_or(from);
        self.jump(to)
    }

    fn jump(&mut self, to: NavigationPhase) -> PhaseChange {
        let from = self.phase;
        let content = self.active.as_ref().and_then(|a| a.content.clone());
        let slug = content.as_ref().map_or("", |c| c.slug.as_str());
        let _span = tracing::debug_span!(
            target: "segue.transition",
            "transition.phase",
            from = from.as_str(),
            to = to.as_str(),
            slug
        )
        .entered();
        self.phase = to;
        self.phase_started = self.scheduler.now();
        tracing::debug!(target: "segue.transition", at_ms = self.phase_started.as_millis() as u64, "phase changed");
        PhaseChange {
            from,
            to,
            at: self.phase_started,
            content,
        }
    }
}

impl Default for TransitionMachine {
    fn default() -> Self {
        Self::new(TransitionTiming::default())
    }
}

fn ratio(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0) as f32
}
