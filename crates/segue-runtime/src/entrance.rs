#![forbid(unsafe_code)]

//! One-shot entrance sequence for the home view.
//!
//! On the first visit of a session the home view plays a staged reveal:
//! indicator dots pop in one by one, turn active, bounce on a "key press",
//! burst into confetti and drop away; a separator line then expands to fill
//! the screen; finally the content appears, the title types itself out and
//! the secondary links and navigation tabs reveal in a stagger.
//!
//! The whole sequence is a [`Timeline`] of [`EntranceCue`]s handed to a
//! [`Scheduler`] at mount. When the session's "seen" flag is already set the
//! sequencer never schedules anything: the very first observable state is
//! the settled one.

use std::time::Duration;

use segue_core::animation::{Animation, Easing, MORPH_EASING, Timeline, Tween};

use crate::scheduler::Scheduler;
use crate::storage::{AnimationSeen, SessionStorage, SessionStore};

/// Cue offsets, all measured from mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntranceTiming {
    pub first_dot_delay: Duration,
    pub dot_interval: Duration,
    pub dot_count: usize,
    pub dots_activate: Duration,
    pub key_press: Duration,
    pub confetti: Duration,
    pub dot_drop: Duration,
    pub line_expand: Duration,
    /// Duration of the line expansion itself.
    pub line_duration: Duration,
    /// Content appears; the "seen" flag is written here.
    pub content_reveal: Duration,
    /// One title character per interval.
    pub typing_char: Duration,
    /// Secondary links start this long after typing finishes.
    pub secondary_delay: Duration,
    pub secondary_stagger: Duration,
    /// Navigation tabs start this long after typing finishes.
    pub nav_delay: Duration,
    pub nav_stagger: Duration,
}

impl Default for EntranceTiming {
    fn default() -> Self {
        Self {
            first_dot_delay: Duration::from_millis(300),
            dot_interval: Duration::from_millis(345),
            dot_count: 5,
            dots_activate: Duration::from_millis(2025),
            key_press: Duration::from_millis(2370),
            confetti: Duration::from_millis(2658),
            dot_drop: Duration::from_millis(2945),
            line_expand: Duration::from_millis(3520),
            line_duration: Duration::from_millis(2000),
            content_reveal: Duration::from_millis(5820),
            typing_char: Duration::from_millis(100),
            secondary_delay: Duration::from_millis(500),
            secondary_stagger: Duration::from_millis(100),
            nav_delay: Duration::from_millis(1500),
            nav_stagger: Duration::from_millis(150),
        }
    }
}

/// What the home view shows once the sequence is over.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntranceContent {
    /// Title typed out character by character.
    pub title: String,
    /// Number of secondary links (social icons).
    pub secondary_count: usize,
    /// Number of navigation tabs.
    pub nav_count: usize,
}

impl EntranceContent {
    /// Content with the given title and element counts.
    pub fn new(title: impl Into<String>, secondary_count: usize, nav_count: usize) -> Self {
        Self {
            title: title.into(),
            secondary_count,
            nav_count,
        }
    }

    fn title_len(&self) -> usize {
        self.title.chars().count()
    }
}

/// One step of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntranceCue {
    /// Dot `n` (zero-based) pops in.
    ShowDot(usize),
    ActivateDots,
    KeyPress,
    Confetti,
    DropDots,
    ExpandLine,
    /// The line overlay goes away and the content appears.
    RevealContent,
    /// The first `n` title characters are visible.
    TypeChars(usize),
    TypingDone,
    /// Secondary link `n` (zero-based) appears.
    RevealSecondary(usize),
    /// Navigation tab `n` (zero-based) appears.
    RevealNav(usize),
    Complete,
}

impl EntranceCue {
    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ShowDot(_) => "show_dot",
            Self::ActivateDots => "activate_dots",
            Self::KeyPress => "key_press",
            Self::Confetti => "confetti",
            Self::DropDots => "drop_dots",
            Self::ExpandLine => "expand_line",
            Self::RevealContent => "reveal_content",
            Self::TypeChars(_) => "type_chars",
            Self::TypingDone => "typing_done",
            Self::RevealSecondary(_) => "reveal_secondary",
            Self::RevealNav(_) => "reveal_nav",
            Self::Complete => "complete",
        }
    }
}

/// Observable state of the home view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntranceState {
    pub visible_dots: usize,
    pub dots_active: bool,
    pub key_pressed: bool,
    pub confetti: bool,
    pub dots_dropped: bool,
    pub line_expanding: bool,
    /// The full-screen line overlay is shown.
    pub line_visible: bool,
    pub content_visible: bool,
    pub typed_chars: usize,
    pub typing_done: bool,
    pub secondary_revealed: usize,
    pub nav_revealed: usize,
    pub complete: bool,
}

impl EntranceState {
    /// State before any cue has fired.
    fn initial() -> Self {
        Self {
            line_visible: true,
            ..Self::default()
        }
    }

    /// State with everything revealed.
    fn settled(content: &EntranceContent) -> Self {
        Self {
            line_visible: false,
            content_visible: true,
            typed_chars: content.title_len(),
            typing_done: true,
            secondary_revealed: content.secondary_count,
            nav_revealed: content.nav_count,
            complete: true,
            ..Self::default()
        }
    }

    /// Whether links and tabs accept input.
    #[must_use]
    pub fn interactive(&self) -> bool {
        self.typing_done
    }

    fn apply(&mut self, cue: EntranceCue) {
        match cue {
            EntranceCue::ShowDot(n) => self.visible_dots = self.visible_dots.max(n + 1),
            EntranceCue::ActivateDots => self.dots_active = true,
            EntranceCue::KeyPress => self.key_pressed = true,
            EntranceCue::Confetti => self.confetti = true,
            EntranceCue::DropDots => {
                self.dots_dropped = true;
                self.confetti = false;
            }
            EntranceCue::ExpandLine => self.line_expanding = true,
            EntranceCue::RevealContent => {
                self.line_visible = false;
                self.content_visible = true;
            }
            EntranceCue::TypeChars(n) => self.typed_chars = n,
            EntranceCue::TypingDone => self.typing_done = true,
            EntranceCue::RevealSecondary(n) => {
                self.secondary_revealed = self.secondary_revealed.max(n + 1);
            }
            EntranceCue::RevealNav(n) => self.nav_revealed = self.nav_revealed.max(n + 1),
            EntranceCue::Complete => self.complete = true,
        }
    }
}

/// Why the sequence did not play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Already played this session.
    AlreadySeen,
    /// The user prefers reduced motion.
    ReducedMotion,
    /// The visitor is returning from a section page.
    Returning,
}

/// Result of mounting the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntranceMount {
    /// Timers scheduled; the sequence is running.
    Playing,
    /// Nothing scheduled; content is visible immediately.
    Skipped(SkipReason),
}

/// Build the full cue timeline for `content`.
#[must_use]
pub fn entrance_timeline(timing: &EntranceTiming, content: &EntranceContent) -> Timeline<EntranceCue> {
    let len = content.title_len();
    let typed = timing.content_reveal + timing.typing_char * len as u32;
    let secondary_start = typed + timing.secondary_delay;
    let nav_start = typed + timing.nav_delay;

    let mut timeline = Timeline::new()
        .stagger(timing.first_dot_delay, timing.dot_interval, timing.dot_count, EntranceCue::ShowDot)
        .add(timing.dots_activate, EntranceCue::ActivateDots)
        .add(timing.key_press, EntranceCue::KeyPress)
        .add(timing.confetti, EntranceCue::Confetti)
        .add(timing.dot_drop, EntranceCue::DropDots)
        .add(timing.line_expand, EntranceCue::ExpandLine)
        .add(timing.content_reveal, EntranceCue::RevealContent)
        .stagger(
            timing.content_reveal + timing.typing_char,
            timing.typing_char,
            len,
            |i| EntranceCue::TypeChars(i + 1),
        )
        .add(typed, EntranceCue::TypingDone)
        .stagger(secondary_start, timing.secondary_stagger, content.secondary_count, EntranceCue::RevealSecondary)
        .stagger(nav_start, timing.nav_stagger, content.nav_count, EntranceCue::RevealNav);

    let last = timeline.duration();
    timeline.push(last, EntranceCue::Complete);
    timeline
}

/// Drives the entrance sequence of one home view.
#[derive(Debug)]
pub struct EntranceSequencer {
    timing: EntranceTiming,
    scheduler: Scheduler<EntranceCue>,
    state: EntranceState,
    line_started: Option<Duration>,
}

impl EntranceSequencer {
    /// Create an unmounted sequencer.
    #[must_use]
    pub fn new(timing: EntranceTiming) -> Self {
        Self {
            timing,
            scheduler: Scheduler::new(),
            state: EntranceState::initial(),
            line_started: None,
        }
    }

    /// Mount the home view.
    ///
    /// Plays the sequence unless the session has already seen it or a
    /// `skip` reason is given. When skipped, no timer is ever scheduled.
    pub fn mount<S: SessionStorage>(
        &mut self,
        store: &SessionStore<S>,
        content: &EntranceContent,
        skip: Option<SkipReason>,
    ) -> EntranceMount {
        self.scheduler.cancel_all();
        self.line_started = None;

        let skip = skip.or_else(|| {
            store
                .get(&AnimationSeen)
                .unwrap_or(false)
                .then_some(SkipReason::AlreadySeen)
        });
        if let Some(reason) = skip {
            self.state = EntranceState::settled(content);
            tracing::debug!(target: "segue.entrance", reason = ?reason, "entrance skipped");
            return EntranceMount::Skipped(reason);
        }

        self.state = EntranceState::initial();
        let timeline = entrance_timeline(&self.timing, content);
        let total = timeline.duration();
        let cues = self.scheduler.schedule_timeline(timeline).len();
        tracing::debug!(
            target: "segue.entrance",
            cues,
            total_ms = total.as_millis() as u64,
            "entrance scheduled"
        );
        EntranceMount::Playing
    }

    /// Advance time, applying and returning every cue that fired.
    ///
    /// The "seen" flag is written to `store` when the content is revealed.
    pub fn advance<S: SessionStorage>(
        &mut self,
        dt: Duration,
        store: &mut SessionStore<S>,
    ) -> Vec<EntranceCue> {
        let until = self.scheduler.now().saturating_add(dt);
        let mut fired = Vec::new();
        while let Some(cue) = self.scheduler.pop_due(until) {
            tracing::debug!(target: "segue.entrance", cue = cue.as_str(), at_ms = self.scheduler.now().as_millis() as u64, "entrance cue");
            match cue {
                EntranceCue::ExpandLine => self.line_started = Some(self.scheduler.now()),
                EntranceCue::RevealContent => {
                    store.set(&AnimationSeen, &true);
                }
                _ => {}
            }
            self.state.apply(cue);
            fired.push(cue);
        }
        self.scheduler.settle(until);
        fired
    }

    /// Cancel every pending cue. Returns how many were dropped.
    pub fn unmount(&mut self) -> usize {
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            tracing::debug!(target: "segue.entrance", cancelled, "entrance cancelled");
        }
        cancelled
    }

    /// Current observable state.
    #[must_use]
    pub fn state(&self) -> &EntranceState {
        &self.state
    }

    /// Number of cues still waiting.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Whether the sequence is still running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        !self.scheduler.is_idle()
    }

    /// Eased expansion of the separator line, `0.0` until it starts.
    #[must_use]
    pub fn line_progress(&self) -> f32 {
        let Some(started) = self.line_started else {
            return 0.0;
        };
        let mut tween = Tween::new(self.timing.line_duration).easing(Easing::Bezier(MORPH_EASING));
        tween.seek(self.scheduler.now().saturating_sub(started));
        tween.value()
    }

    /// Visible part of `title` in the current state.
    #[must_use]
    pub fn visible_title<'a>(&self, title: &'a str) -> &'a str {
        match title.char_indices().nth(self.state.typed_chars) {
            Some((idx, _)) => &title[..idx],
            None => title,
        }
    }
}

impl Default for EntranceSequencer {
    fn default() -> Self {
        Self::new(EntranceTiming::default())
    }
}
