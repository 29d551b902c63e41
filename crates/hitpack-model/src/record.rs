// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record types carried by [`crate::Hits`].

use crate::{JoinKey, Scalar, ValidationError};
use std::collections::BTreeMap;

/// Raw source document of an event (a JSON object).
pub type Source = serde_json::Map<String, serde_json::Value>;

/// A single search hit.
///
/// Invariants:
///
/// - `id` and `index` are non-empty.
/// - `source` is opaque to this crate; `None` means the engine did not fetch it,
///   which is distinct from an empty object.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    index: String,
    id: String,
    source: Option<Source>,
    fields: BTreeMap<String, Scalar>,
}

impl Event {
    /// Create an event without source or fields.
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Result<Self, ValidationError> {
        let index = index.into();
        let id = id.into();
        if index.is_empty() {
            return Err(ValidationError::EmptyEventIndex);
        }
        if id.is_empty() {
            return Err(ValidationError::EmptyEventId);
        }
        Ok(Self {
            index,
            id,
            source: None,
            fields: BTreeMap::new(),
        })
    }

    /// Attach the source document.
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Add (or replace) a metadata field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Replace all metadata fields.
    pub fn with_fields(mut self, fields: BTreeMap<String, Scalar>) -> Self {
        self.fields = fields;
        self
    }

    /// Index the event was read from.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Source document, when fetched.
    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    /// Metadata fields, sorted by name.
    pub fn fields(&self) -> &BTreeMap<String, Scalar> {
        &self.fields
    }
}

/// Events correlated by a join key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    join_keys: Option<JoinKey>,
    events: Option<Vec<Event>>,
}

impl Sequence {
    /// Create a sequence. `events: None` and `Some(vec![])` stay distinct.
    pub fn new(join_keys: Option<JoinKey>, events: Option<Vec<Event>>) -> Self {
        Self { join_keys, events }
    }

    /// Correlation key, if any.
    pub fn join_keys(&self) -> Option<&JoinKey> {
        self.join_keys.as_ref()
    }

    /// Ordered events, if any.
    pub fn events(&self) -> Option<&[Event]> {
        self.events.as_deref()
    }
}

/// Occurrence count of a key group.
#[derive(Debug, Clone, PartialEq)]
pub struct Count {
    count: u32,
    keys: Option<JoinKey>,
    percent: f32,
}

impl Count {
    /// Create a count. `percent` must be finite and within `[0, 100]`.
    pub fn new(count: u32, keys: Option<JoinKey>, percent: f32) -> Result<Self, ValidationError> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(ValidationError::PercentOutOfRange(percent));
        }
        Ok(Self {
            count,
            keys,
            percent,
        })
    }

    /// Number of occurrences.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Group key, if any.
    pub fn keys(&self) -> Option<&JoinKey> {
        self.keys.as_ref()
    }

    /// Share of all occurrences, in percent.
    pub fn percent(&self) -> f32 {
        self.percent
    }
}
