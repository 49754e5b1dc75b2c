#![forbid(unsafe_code)]

//! Error types for the runtime.
//!
//! None of these is fatal to a transition. Storage errors degrade to cache
//! misses, content errors abort to `Idle`, route errors leave the current
//! view in place.

use std::fmt;

/// Session storage failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Storage is disabled or inaccessible (private mode, sandboxed frame).
    Unavailable,
    /// The write exceeded the storage quota.
    QuotaExceeded,
    /// A stored value did not match its schema, or a value failed to encode.
    Serialization { key: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "session storage unavailable"),
            Self::QuotaExceeded => write!(f, "session storage quota exceeded"),
            Self::Serialization { key, message } => {
                write!(f, "session storage value for {key:?} is invalid: {message}")
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Destination content failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The provider has no item with this slug.
    NotFound { slug: String },
    /// The fetch failed for another reason.
    Fetch { slug: String, message: String },
}

impl ContentError {
    /// Slug of the item that failed.
    #[must_use]
    pub fn slug(&self) -> &str {
        match self {
            Self::NotFound { slug } | Self::Fetch { slug, .. } => slug,
        }
    }

    /// Message a destination view shows in place of its content.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Not found",
            Self::Fetch { .. } => "Failed to load",
        }
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { slug } => write!(f, "content {slug:?} not found"),
            Self::Fetch { slug, message } => write!(f, "failed to load {slug:?}: {message}"),
        }
    }
}

impl std::error::Error for ContentError {}

/// A URL did not map to a known route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No route matches the path.
    UnknownPath(String),
    /// A detail path with an empty slug segment.
    MissingSlug(String),
    /// A recognised query parameter with an unusable value.
    BadQuery { param: &'static str, value: String },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPath(path) => write!(f, "no route for {path:?}"),
            Self::MissingSlug(path) => write!(f, "missing slug in {path:?}"),
            Self::BadQuery { param, value } => {
                write!(f, "invalid value {value:?} for query parameter {param:?}")
            }
        }
    }
}

impl std::error::Error for RouteError {}
