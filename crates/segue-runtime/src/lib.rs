#![forbid(unsafe_code)]

//! segue runtime
//!
//! Deterministic machinery that drives view transitions between a list of
//! content cards and their detail pages.
//!
//! # Key Components
//!
//! - [`Choreographer`] - Owns every subsystem; the host feeds it clicks,
//!   history events and elapsed time
//! - [`TransitionMachine`] - The navigation phase state machine with its busy guard
//! - [`EntranceSequencer`] - The first-visit home entrance timeline
//! - [`Scheduler`] - Cancellable timers on a virtual clock
//! - [`SessionStore`] - Typed, failure-tolerant session storage
//! - [`ChoreographyConfig`] - Policy-as-data timing and morph configuration
//!
//! # How it fits in the system
//! `segue-core` supplies geometry, easing and morph math. This crate turns
//! those pure values into time: it decides which phase is active, what
//! every card looks like at a given instant, and which history entries the
//! host should write. Nothing here touches a real DOM or a real timer;
//! hosts drive it through [`Choreographer::advance`].

pub mod choreographer;
pub mod clock;
pub mod config;
pub mod entrance;
pub mod error;
pub mod navigation;
pub mod scheduler;
pub mod snapshot;
pub mod storage;
pub mod transition;

pub use choreographer::{ChoreographyEvent, Choreographer};
pub use clock::{Clock, DeterministicClock, FrameStepper, SystemClock};
pub use config::{ChoreographyConfig, ConfigError};
pub use entrance::{
    EntranceContent, EntranceCue, EntranceMount, EntranceSequencer, EntranceState, EntranceTiming,
    SkipReason, entrance_timeline,
};
pub use error::{ContentError, RouteError, StorageError};
pub use navigation::{HistoryCommand, Location, ReturnParams, Route, Section};
pub use scheduler::{Scheduler, TimerId};
pub use snapshot::{CaptureMiss, SnapshotPolicy};
pub use storage::{MemoryStorage, SessionStorage, SessionStore, StorageKey, UnavailableStorage};
pub use transition::{
    Admission, IgnoreReason, ItemStyle, NavigationIntent, NavigationPhase, PhaseChange,
    PhaseSignal, TransitionMachine, TransitionTiming, next_phase,
};
