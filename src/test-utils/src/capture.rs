// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber, field, span};
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

/// A span created while the layer was installed.
#[derive(Clone, Debug)]
pub struct CapturedSpan {
    /// The span ID, as assigned by the registry.
    pub id: span::Id,
    /// The span name.
    pub name: String,
    /// The span fields, including any recorded after creation.
    pub attributes: HashMap<String, String>,
}

/// An event emitted while the layer was installed.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    /// The event level.
    pub level: Level,
    /// The name of the span containing the event, if any.
    pub span: Option<String>,
    /// The event fields. The formatted message is under `message`.
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct Log {
    spans: Vec<CapturedSpan>,
    events: Vec<CapturedEvent>,
}

/// Converts every field value to its string representation.
struct Visitor<'a>(&'a mut HashMap<String, String>);

impl field::Visit for Visitor<'_> {
    fn record_str(&mut self, field: &field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_i64(&mut self, field: &field::Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &field::Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &field::Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

/// A tracing layer that records spans and events in memory.
///
/// The layer is installed as the default subscriber for the current thread
/// only, so tests running in parallel do not observe each other. Async tests
/// must use the current-thread runtime (the `#[tokio::test]` default).
///
/// # Example
/// ```
/// use google_cloud_test_utils::capture::CaptureLayer;
///
/// let (capture, _guard) = CaptureLayer::install();
/// tracing::info_span!("my_operation", foo = "bar").in_scope(|| {
///     tracing::warn!("something odd");
/// });
///
/// let spans = capture.spans();
/// assert_eq!(spans.len(), 1);
/// assert_eq!(spans[0].attributes.get("foo").map(String::as_str), Some("bar"));
/// let events = capture.events();
/// assert_eq!(events[0].span.as_deref(), Some("my_operation"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CaptureLayer {
    log: Arc<Mutex<Log>>,
}

impl CaptureLayer {
    /// Installs a new layer for the current thread.
    ///
    /// Capture stops when the returned guard is dropped.
    pub fn install() -> (Self, DefaultGuard) {
        let layer = Self::default();
        let subscriber = Registry::default().with(layer.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (layer, guard)
    }

    /// The spans captured so far, in creation order.
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.log.lock().unwrap().spans.clone()
    }

    /// The events captured so far, in emission order.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.log.lock().unwrap().events.clone()
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, _ctx: Context<'_, S>) {
        let mut attributes = HashMap::new();
        attrs.record(&mut Visitor(&mut attributes));
        self.log.lock().unwrap().spans.push(CapturedSpan {
            id: id.clone(),
            name: attrs.metadata().name().to_string(),
            attributes,
        });
    }

    fn on_record(&self, id: &span::Id, values: &span::Record<'_>, _ctx: Context<'_, S>) {
        let mut log = self.log.lock().unwrap();
        if let Some(span) = log.spans.iter_mut().rev().find(|s| s.id == *id) {
            values.record(&mut Visitor(&mut span.attributes));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut Visitor(&mut fields));
        let span = ctx.event_span(event).map(|s| s.name().to_string());
        self.log.lock().unwrap().events.push(CapturedEvent {
            level: *event.metadata().level(),
            span,
            fields,
        });
    }
}
