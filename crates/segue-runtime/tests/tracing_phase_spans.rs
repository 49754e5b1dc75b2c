#![forbid(unsafe_code)]

//! Tracing span tests for phase transitions.
//!
//! Every phase change runs inside a `transition.phase` span carrying the
//! `from`, `to` and `slug` fields; storage and morph diagnostics use their
//! own targets.
//!
//! Run:
//!   cargo test -p segue-runtime --test tracing_phase_spans

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

use segue_core::content::ContentRef;
use segue_core::geometry::Rect;
use segue_core::measure::{ElementHandle, LayoutMap};
use segue_runtime::{ChoreographyConfig, Choreographer, MemoryStorage, UnavailableStorage};

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    target: String,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    message: String,
    parent_span_name: Option<String>,
}

#[derive(Clone, Default)]
struct Capture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl Capture {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            target: attrs.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let message = visitor
            .0
            .iter()
            .find(|(k, _)| k == "message")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        let parent_span_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span| span.name().to_string());
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message,
            parent_span_name,
        });
    }
}

fn with_capture<F: FnOnce()>(f: F) -> Capture {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    capture
}

fn layout() -> LayoutMap {
    LayoutMap::new().with(
        ElementHandle::card(&ContentRef::project("nba-90ers")),
        Rect::new(300.0, 200.0, 600.0, 120.0),
    )
}

#[test]
fn every_phase_change_has_a_span() {
    let capture = with_capture(|| {
        let mut c = Choreographer::new(&ChoreographyConfig::default(), MemoryStorage::new(), layout());
        c.load("/projects").unwrap();
        c.set_list_items(vec![ContentRef::project("nba-90ers")]);
        c.click(ContentRef::project("nba-90ers"));
        c.advance(Duration::from_millis(1800));
    });

    let phase_spans: Vec<_> = capture
        .spans()
        .into_iter()
        .filter(|s| s.name == "transition.phase")
        .collect();
    let edges: Vec<(&str, &str)> = phase_spans
        .iter()
        .map(|s| (s.fields["from"].as_str(), s.fields["to"].as_str()))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("idle", "fading_out"),
            ("fading_out", "morphing"),
            ("morphing", "revealing_destination"),
            ("revealing_destination", "settled"),
        ]
    );
    for span in &phase_spans {
        assert_eq!(span.target, "segue.transition");
        assert_eq!(span.fields["slug"], "nba-90ers");
    }

    let phase_events = capture
        .events()
        .into_iter()
        .filter(|e| e.message == "phase changed")
        .count();
    assert_eq!(phase_events, 4);
    assert!(capture
        .events()
        .iter()
        .filter(|e| e.message == "phase changed")
        .all(|e| e.parent_span_name.as_deref() == Some("transition.phase")));
}

#[test]
fn storage_failures_warn_and_degrade() {
    let capture = with_capture(|| {
        let mut c = Choreographer::new(&ChoreographyConfig::default(), UnavailableStorage, layout());
        c.load("/projects").unwrap();
        c.set_list_items(vec![ContentRef::project("nba-90ers")]);
        assert!(c.click(ContentRef::project("nba-90ers")).is_accepted());
        c.advance(Duration::from_millis(1800));
        assert!(c.back().is_accepted());
    });

    assert!(capture
        .events()
        .iter()
        .any(|e| e.target == "segue.storage" && e.level == tracing::Level::WARN));
    assert!(capture
        .events()
        .iter()
        .all(|e| e.level != tracing::Level::ERROR));
}
