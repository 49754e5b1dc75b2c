#![forbid(unsafe_code)]

//! Content identity: which kind of item, and which one.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A kind of morphable content with its own list and detail pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ContentKind {
    Project,
    Blog,
}

impl ContentKind {
    /// Every morphable kind.
    pub const ALL: [ContentKind; 2] = [ContentKind::Project, ContentKind::Blog];

    /// URL segment of the list page (`projects`, `blog`).
    #[must_use]
    pub const fn section(self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::Blog => "blog",
        }
    }

    /// Session-storage key holding this kind's header snapshots.
    #[must_use]
    pub const fn header_position_key(self) -> &'static str {
        match self {
            Self::Project => "project-header-position",
            Self::Blog => "blog-header-position",
        }
    }

    /// Path of the list page.
    #[must_use]
    pub fn list_path(self) -> String {
        format!("/{}", self.section())
    }

    /// Resolve a list-page segment back to its kind.
    #[must_use]
    pub fn from_section(section: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.section() == section)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Project => "project",
            Self::Blog => "blog",
        })
    }
}

/// A specific piece of content: kind plus slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContentRef {
    pub kind: ContentKind,
    pub slug: String,
}

impl ContentRef {
    /// Create a reference.
    pub fn new(kind: ContentKind, slug: impl Into<String>) -> Self {
        Self {
            kind,
            slug: slug.into(),
        }
    }

    /// Shorthand for a project.
    pub fn project(slug: impl Into<String>) -> Self {
        Self::new(ContentKind::Project, slug)
    }

    /// Shorthand for a blog post.
    pub fn blog(slug: impl Into<String>) -> Self {
        Self::new(ContentKind::Blog, slug)
    }

    /// Path of this item's detail page.
    #[must_use]
    pub fn detail_path(&self) -> String {
        format!("/{}/{}", self.kind.section(), self.slug)
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.slug)
    }
}
