#![forbid(unsafe_code)]

//! segue public facade crate.
//!
//! Re-exports the types a host needs to wire view transitions into an app,
//! a unified [`Error`], and a prelude for day-to-day usage.
//!
//! ```ignore
//! use segue::prelude::*;
//!
//! let config = ChoreographyConfig::default();
//! let mut choreographer = Choreographer::new(&config, MemoryStorage::new(), LayoutMap::new());
//! choreographer.load("/projects")?;
//! choreographer.click(ContentRef::project("nba-90ers"));
//! for event in choreographer.advance(std::time::Duration::from_millis(16)) {
//!     // apply styles, history commands...
//! }
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use segue_core::animation::{Animation, CubicBezier, Easing, MORPH_EASING, Timeline, Tween};
pub use segue_core::content::{ContentKind, ContentRef};
pub use segue_core::geometry::{GeometrySnapshot, Offset, Rect, Viewport};
pub use segue_core::measure::{ElementHandle, LayoutMap, MeasurementProvider};
pub use segue_core::morph::{
    FallbackGeometry, MorphPlan, MorphPolicy, MorphTarget, TargetResolution, TargetSource,
    Transform, compute_morph_target,
};
pub use segue_core::typography::HeaderTypography;

#[cfg(feature = "tracing-json")]
pub use segue_core::logging::init_json_subscriber;

// --- Runtime re-exports ----------------------------------------------------

pub use segue_runtime::{
    Admission, ChoreographyConfig, ChoreographyEvent, Choreographer, Clock, ConfigError,
    ContentError, DeterministicClock, EntranceContent, EntranceCue, EntranceState,
    HistoryCommand, IgnoreReason, ItemStyle, Location, MemoryStorage, NavigationPhase,
    PhaseChange, Route, RouteError, SessionStorage, SessionStore, StorageError, SystemClock,
    TransitionMachine,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for segue hosts.
#[derive(Debug)]
pub enum Error {
    /// Session storage failed.
    Storage(StorageError),
    /// Destination content could not be loaded.
    Content(ContentError),
    /// An address could not be parsed.
    Route(RouteError),
    /// Configuration could not be loaded or is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Content(err) => write!(f, "{err}"),
            Self::Route(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Content(err) => Some(err),
            Self::Route(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<ContentError> for Error {
    fn from(err: ContentError) -> Self {
        Self::Content(err)
    }
}

impl From<RouteError> for Error {
    fn from(err: RouteError) -> Self {
        Self::Route(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for segue APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Admission, ChoreographyConfig, ChoreographyEvent, Choreographer, ContentKind, ContentRef,
        EntranceContent, Error, HistoryCommand, ItemStyle, LayoutMap, MeasurementProvider,
        MemoryStorage, NavigationPhase, Rect, Result, SessionStorage, Viewport,
    };

    pub use crate::{core, runtime};
}

pub use segue_core as core;
pub use segue_runtime as runtime;
