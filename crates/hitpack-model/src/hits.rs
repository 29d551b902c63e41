// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Hits container: one result shape plus an optional total.

use crate::{Count, Event, Sequence, TotalHits, ValidationError};
use std::fmt;

/// Which result shape a [`Hits`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitsKind {
    /// Flat events.
    Events,
    /// Correlated sequences.
    Sequences,
    /// Aggregated counts.
    Counts,
    /// No record list.
    Empty,
}

impl HitsKind {
    /// Lowercase name, matching the document field for non-empty kinds.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Sequences => "sequences",
            Self::Counts => "counts",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for HitsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The active record list.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum HitsBody {
    /// Container present, no records.
    #[default]
    Empty,
    /// Flat events (possibly empty).
    Events(Vec<Event>),
    /// Sequences (possibly empty).
    Sequences(Vec<Sequence>),
    /// Counts (possibly empty).
    Counts(Vec<Count>),
}

impl HitsBody {
    /// Kind of the active list.
    pub fn kind(&self) -> HitsKind {
        match self {
            Self::Empty => HitsKind::Empty,
            Self::Events(_) => HitsKind::Events,
            Self::Sequences(_) => HitsKind::Sequences,
            Self::Counts(_) => HitsKind::Counts,
        }
    }
}

/// Result payload of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hits {
    body: HitsBody,
    total: Option<TotalHits>,
}

impl Hits {
    /// Build from three optional lists, at most one of which may be `Some`.
    ///
    /// This is the bridge for producers that track the shapes separately; all
    /// `None` yields an [`HitsBody::Empty`] container.
    pub fn new(
        total: Option<TotalHits>,
        events: Option<Vec<Event>>,
        sequences: Option<Vec<Sequence>>,
        counts: Option<Vec<Count>>,
    ) -> Result<Self, ValidationError> {
        let body = match (events, sequences, counts) {
            (None, None, None) => HitsBody::Empty,
            (Some(e), None, None) => HitsBody::Events(e),
            (None, Some(s), None) => HitsBody::Sequences(s),
            (None, None, Some(c)) => HitsBody::Counts(c),
            (e, s, c) => {
                let supplied = [
                    (e.is_some(), HitsKind::Events),
                    (s.is_some(), HitsKind::Sequences),
                    (c.is_some(), HitsKind::Counts),
                ]
                .into_iter()
                .filter_map(|(present, kind)| present.then_some(kind))
                .collect();
                return Err(ValidationError::ConflictingHitsVariants { supplied });
            }
        };
        Ok(Self { body, total })
    }

    /// Wrap an already-chosen body.
    pub fn from_body(body: HitsBody, total: Option<TotalHits>) -> Self {
        Self { body, total }
    }

    /// Event hits.
    pub fn events(events: Vec<Event>, total: Option<TotalHits>) -> Self {
        Self::from_body(HitsBody::Events(events), total)
    }

    /// Sequence hits.
    pub fn sequences(sequences: Vec<Sequence>, total: Option<TotalHits>) -> Self {
        Self::from_body(HitsBody::Sequences(sequences), total)
    }

    /// Count hits.
    pub fn counts(counts: Vec<Count>, total: Option<TotalHits>) -> Self {
        Self::from_body(HitsBody::Counts(counts), total)
    }

    /// Present but empty container.
    pub fn empty(total: Option<TotalHits>) -> Self {
        Self::from_body(HitsBody::Empty, total)
    }

    /// Active shape.
    pub fn kind(&self) -> HitsKind {
        self.body.kind()
    }

    /// Active body.
    pub fn body(&self) -> &HitsBody {
        &self.body
    }

    /// Total summary, if tracked.
    pub fn total(&self) -> Option<&TotalHits> {
        self.total.as_ref()
    }

    /// Events, when the body holds events.
    pub fn event_list(&self) -> Option<&[Event]> {
        match &self.body {
            HitsBody::Events(e) => Some(e),
            _ => None,
        }
    }

    /// Sequences, when the body holds sequences.
    pub fn sequence_list(&self) -> Option<&[Sequence]> {
        match &self.body {
            HitsBody::Sequences(s) => Some(s),
            _ => None,
        }
    }

    /// Counts, when the body holds counts.
    pub fn count_list(&self) -> Option<&[Count]> {
        match &self.body {
            HitsBody::Counts(c) => Some(c),
            _ => None,
        }
    }

    /// Number of records in the active list.
    pub fn len(&self) -> usize {
        match &self.body {
            HitsBody::Empty => 0,
            HitsBody::Events(e) => e.len(),
            HitsBody::Sequences(s) => s.len(),
            HitsBody::Counts(c) => c.len(),
        }
    }

    /// True when the active list has no records (or there is none).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
