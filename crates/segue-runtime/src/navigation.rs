#![forbid(unsafe_code)]

//! Addresses, routes and history commands.
//!
//! Maps the app's logical location (home, a list, a detail item, or a plain
//! section page) to a shareable address and back. The return path from a
//! section page to home is carried in the query string:
//!
//! ```text
//! /?returning=true&from=projects&fromDirect=true
//! ```

use std::fmt;

use segue_core::content::{ContentKind, ContentRef};

use crate::error::RouteError;

/// Pages without morphable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Resume,
    Work,
    Shelf,
    Notes,
    About,
}

impl Section {
    /// Every plain section.
    pub const ALL: [Section; 5] = [
        Section::Resume,
        Section::Work,
        Section::Shelf,
        Section::Notes,
        Section::About,
    ];

    /// URL segment.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::Work => "work",
            Self::Shelf => "shelf",
            Self::Notes => "notes",
            Self::About => "about",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.segment() == segment)
    }
}

/// A logical location in the app.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    /// List page of a content kind.
    List(ContentKind),
    /// Detail page of one item.
    Detail(ContentRef),
    Section(Section),
}

impl Route {
    /// Parse a path (no query string).
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return if path.starts_with('/') {
                Ok(Self::Home)
            } else {
                Err(RouteError::UnknownPath(path.to_string()))
            };
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Err(RouteError::UnknownPath(path.to_string()));
        };

        let mut segments = rest.split('/');
        let first = segments.next().unwrap_or_default();
        let second = segments.next();
        if segments.next().is_some() {
            return Err(RouteError::UnknownPath(path.to_string()));
        }

        match (ContentKind::from_section(first), second) {
            (Some(kind), None) => Ok(Self::List(kind)),
            (Some(_), Some(slug)) if slug.trim().is_empty() => {
                Err(RouteError::MissingSlug(path.to_string()))
            }
            (Some(kind), Some(slug)) => Ok(Self::Detail(ContentRef::new(kind, slug))),
            (None, None) => Section::from_segment(first)
                .map(Self::Section)
                .ok_or_else(|| RouteError::UnknownPath(path.to_string())),
            (None, Some(_)) => Err(RouteError::UnknownPath(path.to_string())),
        }
    }

    /// Canonical path.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::List(kind) => kind.list_path(),
            Self::Detail(content) => content.detail_path(),
            Self::Section(section) => format!("/{}", section.segment()),
        }
    }

    /// Section name used in `from=` when leaving this route for home.
    #[must_use]
    pub fn section_name(&self) -> Option<&'static str> {
        match self {
            Self::Home => None,
            Self::List(kind) => Some(kind.section()),
            Self::Detail(content) => Some(content.kind.section()),
            Self::Section(section) => Some(section.segment()),
        }
    }

    /// The list this detail page belongs to.
    #[must_use]
    pub fn parent_list(&self) -> Option<Route> {
        match self {
            Self::Detail(content) => Some(Self::List(content.kind)),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Query parameters signalling a return to home.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReturnParams {
    pub returning: bool,
    /// Section the visitor came back from.
    pub from: Option<String>,
    /// The visitor reached that section directly rather than through the
    /// home animation.
    pub from_direct: bool,
}

impl ReturnParams {
    /// Parameters for returning from `section`.
    #[must_use]
    pub fn from_section(section: &str) -> Self {
        Self {
            returning: true,
            from: Some(section.to_string()),
            from_direct: true,
        }
    }

    /// Parse a query string (with or without the leading `?`).
    ///
    /// Unknown parameters are ignored.
    pub fn parse(query: &str) -> Result<Self, RouteError> {
        let mut params = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "returning" => params.returning = parse_flag("returning", value)?,
                "fromDirect" => params.from_direct = parse_flag("fromDirect", value)?,
                "from" if !value.is_empty() => params.from = Some(value.to_string()),
                _ => {}
            }
        }
        Ok(params)
    }

    /// Render as a query string including the leading `?`, or empty when
    /// nothing is set.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut parts = Vec::new();
        if self.returning {
            parts.push("returning=true".to_string());
        }
        if let Some(from) = &self.from {
            parts.push(format!("from={from}"));
        }
        if self.from_direct {
            parts.push("fromDirect=true".to_string());
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!("?{}", parts.join("&"))
        }
    }
}

fn parse_flag(param: &'static str, value: &str) -> Result<bool, RouteError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(RouteError::BadQuery {
            param,
            value: value.to_string(),
        }),
    }
}

/// A parsed address: route plus return parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: Route,
    pub params: ReturnParams,
}

impl Location {
    /// A location with no query parameters.
    #[must_use]
    pub fn new(route: Route) -> Self {
        Self {
            route,
            params: ReturnParams::default(),
        }
    }

    /// Home, returning from `section`.
    #[must_use]
    pub fn home_returning_from(section: &str) -> Self {
        Self {
            route: Route::Home,
            params: ReturnParams::from_section(section),
        }
    }

    /// Parse `path[?query][#fragment]`.
    pub fn parse(url: &str) -> Result<Self, RouteError> {
        let url = url.split_once('#').map_or(url, |(before, _)| before);
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        Ok(Self {
            route: Route::parse(path)?,
            params: ReturnParams::parse(query)?,
        })
    }

    /// Whether this is home with `returning=true`.
    #[must_use]
    pub fn is_return_home(&self) -> bool {
        self.route == Route::Home && self.params.returning
    }

    /// Full address.
    #[must_use]
    pub fn href(&self) -> String {
        format!("{}{}", self.route.path(), self.params.to_query())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

/// Instruction for the host's history API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryCommand {
    /// Add an entry.
    Push(String),
    /// Rewrite the current entry.
    Replace(String),
}

impl HistoryCommand {
    /// The address carried by the command.
    #[must_use]
    pub fn href(&self) -> &str {
        match self {
            Self::Push(href) | Self::Replace(href) => href,
        }
    }
}
