//! Event types and sinks for observing catalog runs.
//!
//! [`EventSampler::run_with_events`](crate::catalog::EventSampler::run_with_events)
//! reports progress as [`CatalogEvent`]s to any [`EventSink`].
use crate::catalog::record::EventResult;

/// Describes what happened during a catalog run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum CatalogEvent {
    /// Emitted once before any event is sampled.
    RunStarted {
        /// Number of blocks supplied.
        block_count: usize,
        /// Number of event numbers that have a seed set.
        eligible_events: usize,
    },

    /// Emitted once per block for a run of event numbers with no seed set. Those events
    /// are not sampled.
    EventsSkipped {
        realization_index: i32,
        block_index: i32,
        /// First skipped event number.
        first: i64,
        /// Last skipped event number, inclusive.
        last: i64,
        /// Number of seed sets available.
        seed_count: usize,
    },

    /// Emitted after an event was sampled.
    EventSampled {
        result: EventResult,
    },

    /// Emitted when every block has been processed.
    RunFinished {
        /// Number of events sampled.
        event_count: usize,
        /// Number of event numbers skipped for lack of a seed set.
        skipped: usize,
    },
}

/// A generic event sink that accepts [`CatalogEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: CatalogEvent);
}

/// Borrowed sinks, so a [`MultiSink`] can fan out to sinks the caller still owns.
impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn send(&mut self, event: CatalogEvent) {
        (**self).send(event);
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: CatalogEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(CatalogEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(CatalogEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(CatalogEvent),
{
    #[inline]
    fn send(&mut self, event: CatalogEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<CatalogEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<CatalogEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[CatalogEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: CatalogEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self { sinks: Vec::new() }
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: CatalogEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            sink.send(event.clone());
        }
        last.send(event);
    }
}
