// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Envelope builder and fixtures for tests.

use hitpack_model::{
    AsyncState, Count, Event, Hits, HitsBody, Sequence, SearchResponse, Source, TotalHits,
};

/// Event in index `"logs"` with the given id, or `None` for an empty id.
pub fn event(id: &str) -> Option<Event> {
    Event::new("logs", id).ok()
}

/// Source object from `(name, value)` pairs.
pub fn source<I, K>(pairs: I) -> Source
where
    I: IntoIterator<Item = (K, serde_json::Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Builder for [`SearchResponse`] instances in tests.
///
/// # Example
///
/// ```
/// use hitpack_testkit::{event, ResponseBuilder};
/// use hitpack_model::TotalHits;
///
/// let response = ResponseBuilder::new()
///     .events(event("1").into_iter().collect())
///     .total(TotalHits::exact(500))
///     .took(42)
///     .build();
///
/// assert_eq!(response.took(), 42);
/// assert_eq!(response.hits().map(|h| h.len()), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    body: Option<HitsBody>,
    total: Option<TotalHits>,
    took: u64,
    timed_out: bool,
    async_state: Option<AsyncState>,
}

impl ResponseBuilder {
    /// Start with no hits, `took = 0`, not timed out, minimal shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Event hits.
    pub fn events(mut self, events: Vec<Event>) -> Self {
        self.body = Some(HitsBody::Events(events));
        self
    }

    /// Sequence hits.
    pub fn sequences(mut self, sequences: Vec<Sequence>) -> Self {
        self.body = Some(HitsBody::Sequences(sequences));
        self
    }

    /// Count hits.
    pub fn counts(mut self, counts: Vec<Count>) -> Self {
        self.body = Some(HitsBody::Counts(counts));
        self
    }

    /// Present but empty hits container.
    pub fn empty_hits(mut self) -> Self {
        self.body = Some(HitsBody::Empty);
        self
    }

    /// Total summary (only written when a hits container is present).
    pub fn total(mut self, total: TotalHits) -> Self {
        self.total = Some(total);
        self
    }

    /// Elapsed milliseconds.
    pub fn took(mut self, took: u64) -> Self {
        self.took = took;
        self
    }

    /// Timeout flag.
    pub fn timed_out(mut self, timed_out: bool) -> Self {
        self.timed_out = timed_out;
        self
    }

    /// Continuation state (extended shape).
    pub fn async_state(mut self, id: &str, is_running: bool, is_partial: bool) -> Self {
        self.async_state = Some(AsyncState::new(id, is_running, is_partial));
        self
    }

    /// Build the envelope.
    pub fn build(self) -> SearchResponse {
        let hits = self.body.map(|body| Hits::from_body(body, self.total));
        match self.async_state {
            Some(state) => SearchResponse::with_async_state(hits, self.took, self.timed_out, state),
            None => SearchResponse::new(hits, self.took, self.timed_out),
        }
    }
}
