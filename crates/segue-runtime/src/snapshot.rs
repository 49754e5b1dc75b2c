#![forbid(unsafe_code)]

//! Geometry snapshot store.
//!
//! The detail view records where its header landed so the list view can
//! aim a morph at it next time. Snapshots live in session storage under
//! `<kind>-header-position`, one map per kind keyed by slug.
//!
//! Capture is only meaningful after the destination has painted. Callers
//! schedule it [`SnapshotPolicy::capture_debounce`] after mount and cancel
//! it if the view unmounts first; [`capture`] itself rejects rectangles that
//! are zero-sized or non-finite.

use std::time::Duration;

use segue_core::content::{ContentKind, ContentRef};
use segue_core::geometry::GeometrySnapshot;
use segue_core::measure::{ElementHandle, MeasurementProvider};

use crate::storage::{HeaderPositions, SessionStorage, SessionStore};

/// Default wait between destination mount and capture.
pub const DEFAULT_CAPTURE_DEBOUNCE: Duration = Duration::from_millis(200);

/// When snapshots are taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotPolicy {
    /// Delay after the destination mounts before measuring.
    pub capture_debounce: Duration,
}

impl Default for SnapshotPolicy {
    fn default() -> Self {
        Self {
            capture_debounce: DEFAULT_CAPTURE_DEBOUNCE,
        }
    }
}

/// Why a capture produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMiss {
    /// The header is not rendered.
    HeaderMissing,
    /// The header is rendered but has not been laid out.
    HeaderUnmeasured,
}

/// Measure the detail header of `kind` (and its back anchor) into a
/// snapshot.
///
/// A missing or unmeasured anchor is fine: the snapshot simply carries no
/// anchor offset.
pub fn capture<M: MeasurementProvider>(
    provider: &M,
    kind: ContentKind,
) -> Result<GeometrySnapshot, CaptureMiss> {
    let header = provider
        .measure(&ElementHandle::DetailHeader(kind))
        .ok_or(CaptureMiss::HeaderMissing)?;
    if !header.is_measured() {
        return Err(CaptureMiss::HeaderUnmeasured);
    }
    let anchor = provider
        .measure(&ElementHandle::BackAnchor(kind))
        .filter(|r| r.is_measured());
    Ok(GeometrySnapshot::capture(header, anchor))
}

impl<S: SessionStorage> SessionStore<S> {
    /// Store the header snapshot for `content`.
    ///
    /// Other slugs of the same kind are kept. Returns `false` if the write
    /// was dropped.
    pub fn save_snapshot(&mut self, content: &ContentRef, snapshot: GeometrySnapshot) -> bool {
        let key = HeaderPositions(content.kind);
        let mut all = self.get(&key).unwrap_or_default();
        all.insert(content.slug.clone(), snapshot);
        let saved = self.set(&key, &all);
        if saved {
            tracing::debug!(
                target: "segue.snapshot",
                content = %content,
                top = snapshot.top,
                left = snapshot.left,
                width = snapshot.width,
                anchored = snapshot.offset_from_anchor.is_some(),
                "header snapshot saved"
            );
        }
        saved
    }

    /// Load the header snapshot for `content`, if one was recorded this
    /// session.
    #[must_use]
    pub fn load_snapshot(&self, content: &ContentRef) -> Option<GeometrySnapshot> {
        self.get(&HeaderPositions(content.kind))
            .and_then(|mut all| all.remove(&content.slug))
    }

    /// Forget the snapshot for `content`.
    pub fn forget_snapshot(&mut self, content: &ContentRef) {
        let key = HeaderPositions(content.kind);
        let Some(mut all) = self.get(&key) else {
            return;
        };
        if all.remove(&content.slug).is_some() {
            if all.is_empty() {
                self.remove(&key);
            } else {
                self.set(&key, &all);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, UnavailableStorage};
    use segue_core::geometry::{Offset, Rect};
    use segue_core::measure::LayoutMap;

    fn header() -> Rect {
        Rect::new(84.0, 192.0, 896.0, 60.0)
    }

    fn anchor() -> Rect {
        Rect::new(32.0, 192.0, 64.0, 20.0)
    }

    #[test]
    fn capture_records_anchor_offset() {
        let layout = LayoutMap::new()
            .with(ElementHandle::DetailHeader(ContentKind::Project), header())
            .with(ElementHandle::BackAnchor(ContentKind::Project), anchor());
        let snap = capture(&layout, ContentKind::Project).unwrap();
        assert_eq!(snap.rect(), header());
        assert_eq!(snap.offset_from_anchor, Some(Offset::new(52.0, 0.0)));
    }

    #[test]
    fn capture_without_anchor_has_no_offset() {
        let layout = LayoutMap::new().with(ElementHandle::DetailHeader(ContentKind::Blog), header());
        let snap = capture(&layout, ContentKind::Blog).unwrap();
        assert_eq!(snap.offset_from_anchor, None);
    }

    #[test]
    fn capture_rejects_missing_and_unpainted_headers() {
        assert_eq!(
            capture(&LayoutMap::new(), ContentKind::Project),
            Err(CaptureMiss::HeaderMissing)
        );
        let unpainted = LayoutMap::new().with(
            ElementHandle::DetailHeader(ContentKind::Project),
            Rect::new(0.0, 0.0, 0.0, 0.0),
        );
        assert_eq!(
            capture(&unpainted, ContentKind::Project),
            Err(CaptureMiss::HeaderUnmeasured)
        );
        let garbage = LayoutMap::new().with(
            ElementHandle::DetailHeader(ContentKind::Project),
            Rect::new(f64::NAN, 0.0, 10.0, 10.0),
        );
        assert_eq!(
            capture(&garbage, ContentKind::Project),
            Err(CaptureMiss::HeaderUnmeasured)
        );
    }

    #[test]
    fn save_and_load_per_slug() {
        let mut store = SessionStore::new(MemoryStorage::new());
        let a = ContentRef::project("a");
        let b = ContentRef::project("b");
        let snap_a = GeometrySnapshot::capture(header(), None);
        let snap_b = GeometrySnapshot::capture(header().translate(0.0, 10.0), None);

        assert!(store.save_snapshot(&a, snap_a));
        assert!(store.save_snapshot(&b, snap_b));
        assert_eq!(store.load_snapshot(&a), Some(snap_a));
        assert_eq!(store.load_snapshot(&b), Some(snap_b));
        assert_eq!(store.load_snapshot(&ContentRef::blog("a")), None);
    }

    #[test]
    fn later_save_overwrites() {
        let mut store = SessionStore::new(MemoryStorage::new());
        let a = ContentRef::blog("a");
        store.save_snapshot(&a, GeometrySnapshot::capture(header(), None));
        let moved = GeometrySnapshot::capture(header().translate(5.0, 5.0), None);
        store.save_snapshot(&a, moved);
        assert_eq!(store.load_snapshot(&a), Some(moved));
    }

    #[test]
    fn forget_removes_only_that_slug() {
        let mut store = SessionStore::new(MemoryStorage::new());
        let a = ContentRef::project("a");
        let b = ContentRef::project("b");
        store.save_snapshot(&a, GeometrySnapshot::capture(header(), None));
        store.save_snapshot(&b, GeometrySnapshot::capture(header(), None));
        store.forget_snapshot(&a);
        assert_eq!(store.load_snapshot(&a), None);
        assert!(store.load_snapshot(&b).is_some());
        store.forget_snapshot(&b);
        assert!(store.backend().is_empty());
    }

    #[test]
    fn unavailable_storage_is_a_miss() {
        let mut store = SessionStore::new(UnavailableStorage);
        let a = ContentRef::project("a");
        assert!(!store.save_snapshot(&a, GeometrySnapshot::capture(header(), None)));
        assert_eq!(store.load_snapshot(&a), None);
    }
}
