// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON document form of [`SearchResponse`].
//!
//! Field names: `hits` (`events` | `sequences` | `counts`, `total`), `took`,
//! `timed_out`, `id`, `is_running`, `is_partial`. Absent optionals are omitted
//! on write and `null` is read as absent. The hits variant is implied by which
//! list field is present; more than one is an error in every mode.
//!
//! Scalars are written as `{"kind": "string" | "int" | "long" | "bool", "value": ...}`
//! so that 32- and 64-bit integers survive a round trip.

use hitpack_model::{
    Count, Event, Hits, HitsBody, JoinKey, Scalar, ScalarKind, SearchResponse, Sequence, Source,
    TotalHits, TotalHitsRelation, ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors produced by the document codec.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Input was not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A value had the wrong JSON type.
    #[error("{path}: expected {expected}")]
    Malformed {
        /// Location of the value.
        path: String,
        /// Expected JSON shape.
        expected: &'static str,
    },
    /// A required field was absent.
    #[error("{path}: missing field")]
    MissingField {
        /// Location of the field.
        path: String,
    },
    /// More than one hits variant list was present.
    #[error("{path}: conflicting hits variants {}", .fields.join(", "))]
    ConflictingHitsVariants {
        /// Location of the hits object.
        path: String,
        /// Variant fields that were present.
        fields: Vec<&'static str>,
    },
    /// Unrecognized field name (strict mode only).
    #[error("{path}: unknown field")]
    UnknownField {
        /// Location of the field.
        path: String,
    },
    /// Scalar `kind` or total `relation` name not recognized.
    #[error("{path}: unknown kind {kind:?}")]
    UnknownKind {
        /// Location of the value.
        path: String,
        /// Offending name.
        kind: String,
    },
    /// Number outside the range of its target type.
    #[error("{path}: number out of range")]
    OutOfRange {
        /// Location of the value.
        path: String,
    },
    /// Decoded values violated a model invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Treatment of unrecognized field names when reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentMode {
    /// Ignore unknown fields (forward compatible).
    #[default]
    Lenient,
    /// Reject unknown fields.
    Strict,
}

/// Document reader configured with a [`DocumentMode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentCodec {
    /// Unknown-field policy.
    pub mode: DocumentMode,
}

impl DocumentCodec {
    /// Lenient reader.
    pub fn lenient() -> Self {
        Self {
            mode: DocumentMode::Lenient,
        }
    }

    /// Strict reader.
    pub fn strict() -> Self {
        Self {
            mode: DocumentMode::Strict,
        }
    }

    /// Decode from a parsed JSON value.
    #[instrument(level = "trace", skip_all, fields(mode = ?self.mode))]
    pub fn decode_value(&self, value: Value) -> Result<SearchResponse, DocumentError> {
        read_response(value, self.mode).inspect_err(|err| debug!(%err, "document rejected"))
    }

    /// Decode from JSON text.
    pub fn decode_str(&self, text: &str) -> Result<SearchResponse, DocumentError> {
        self.decode_value(serde_json::from_str(text)?)
    }

    /// Decode from JSON bytes.
    pub fn decode_slice(&self, bytes: &[u8]) -> Result<SearchResponse, DocumentError> {
        self.decode_value(serde_json::from_slice(bytes)?)
    }
}

/// Build the JSON value for an envelope.
pub fn to_value(response: &SearchResponse) -> Value {
    let mut out = Map::new();
    if let Some(hits) = response.hits() {
        out.insert("hits".into(), hits_to_value(hits));
    }
    out.insert("took".into(), response.took().into());
    out.insert("timed_out".into(), response.timed_out().into());
    if let Some(state) = response.async_state() {
        out.insert("id".into(), state.id.clone().into());
        out.insert("is_running".into(), state.is_running.into());
        out.insert("is_partial".into(), state.is_partial.into());
    }
    Value::Object(out)
}

/// Compact JSON text.
pub fn to_string(response: &SearchResponse) -> Result<String, DocumentError> {
    Ok(serde_json::to_string(&to_value(response))?)
}

/// Indented JSON text.
pub fn to_string_pretty(response: &SearchResponse) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(&to_value(response))?)
}

/// Lenient decode from a JSON value.
pub fn from_value(value: Value) -> Result<SearchResponse, DocumentError> {
    DocumentCodec::lenient().decode_value(value)
}

/// Lenient decode from JSON text.
pub fn from_str(text: &str) -> Result<SearchResponse, DocumentError> {
    DocumentCodec::lenient().decode_str(text)
}

/// Lenient decode from JSON bytes.
pub fn from_slice(bytes: &[u8]) -> Result<SearchResponse, DocumentError> {
    DocumentCodec::lenient().decode_slice(bytes)
}

// --- writing ---------------------------------------------------------------

fn scalar_to_value(scalar: &Scalar) -> Value {
    let value = match scalar {
        Scalar::Str(s) => Value::from(s.as_str()),
        Scalar::Int(i) => Value::from(*i),
        Scalar::Long(l) => Value::from(*l),
        Scalar::Bool(b) => Value::from(*b),
    };
    let mut out = Map::new();
    out.insert("kind".into(), scalar.kind().as_str().into());
    out.insert("value".into(), value);
    Value::Object(out)
}

fn join_key_to_value(key: &JoinKey) -> Value {
    key.iter().map(scalar_to_value).collect()
}

fn event_to_value(event: &Event) -> Value {
    let mut out = Map::new();
    out.insert("_index".into(), event.index().into());
    out.insert("_id".into(), event.id().into());
    if let Some(source) = event.source() {
        out.insert("_source".into(), Value::Object(source.clone()));
    }
    if !event.fields().is_empty() {
        let fields = event
            .fields()
            .iter()
            .map(|(name, value)| (name.clone(), scalar_to_value(value)))
            .collect();
        out.insert("fields".into(), Value::Object(fields));
    }
    Value::Object(out)
}

fn sequence_to_value(sequence: &Sequence) -> Value {
    let mut out = Map::new();
    if let Some(keys) = sequence.join_keys() {
        out.insert("join_keys".into(), join_key_to_value(keys));
    }
    if let Some(events) = sequence.events() {
        out.insert("events".into(), events.iter().map(event_to_value).collect());
    }
    Value::Object(out)
}

fn count_to_value(count: &Count) -> Value {
    let mut out = Map::new();
    out.insert("_count".into(), count.count().into());
    if let Some(keys) = count.keys() {
        out.insert("_keys".into(), join_key_to_value(keys));
    }
    // widened exactly; reading narrows back to the same f32
    out.insert("_percent".into(), f64::from(count.percent()).into());
    Value::Object(out)
}

fn hits_to_value(hits: &Hits) -> Value {
    let mut out = Map::new();
    match hits.body() {
        HitsBody::Empty => {}
        HitsBody::Events(events) => {
            out.insert("events".into(), events.iter().map(event_to_value).collect());
        }
        HitsBody::Sequences(sequences) => {
            out.insert(
                "sequences".into(),
                sequences.iter().map(sequence_to_value).collect(),
            );
        }
        HitsBody::Counts(counts) => {
            out.insert("counts".into(), counts.iter().map(count_to_value).collect());
        }
    }
    if let Some(total) = hits.total() {
        let mut t = Map::new();
        t.insert("value".into(), total.count.into());
        t.insert("relation".into(), total.relation.as_str().into());
        out.insert("total".into(), Value::Object(t));
    }
    Value::Object(out)
}

// --- reading ---------------------------------------------------------------

/// Object being consumed field by field; leftovers are unknown fields.
struct Fields {
    path: String,
    map: Map<String, Value>,
    mode: DocumentMode,
}

impl Fields {
    fn open(value: Value, path: String, mode: DocumentMode) -> Result<Self, DocumentError> {
        match value {
            Value::Object(map) => Ok(Self { path, map, mode }),
            _ => Err(DocumentError::Malformed {
                path,
                expected: "object",
            }),
        }
    }

    fn child(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_owned()
        } else {
            format!("{}.{name}", self.path)
        }
    }

    /// Remove a field; explicit `null` counts as absent.
    fn take(&mut self, name: &str) -> Option<(Value, String)> {
        match self.map.remove(name) {
            None | Some(Value::Null) => None,
            Some(value) => Some((value, self.child(name))),
        }
    }

    fn required(&mut self, name: &str) -> Result<(Value, String), DocumentError> {
        self.take(name).ok_or_else(|| DocumentError::MissingField {
            path: self.child(name),
        })
    }

    fn finish(self) -> Result<(), DocumentError> {
        let Some(name) = self.map.keys().next() else {
            return Ok(());
        };
        match self.mode {
            DocumentMode::Strict => Err(DocumentError::UnknownField {
                path: self.child(name),
            }),
            DocumentMode::Lenient => {
                for name in self.map.keys() {
                    debug!(path = %self.child(name), "ignoring unknown document field");
                }
                Ok(())
            }
        }
    }
}

fn as_string(value: Value, path: &str) -> Result<String, DocumentError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(malformed(path, "string")),
    }
}

fn as_bool(value: &Value, path: &str) -> Result<bool, DocumentError> {
    value.as_bool().ok_or_else(|| malformed(path, "boolean"))
}

fn as_u64(value: &Value, path: &str) -> Result<u64, DocumentError> {
    match value {
        Value::Number(n) => n.as_u64().ok_or_else(|| out_of_range(path)),
        _ => Err(malformed(path, "unsigned integer")),
    }
}

fn as_i64(value: &Value, path: &str) -> Result<i64, DocumentError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| out_of_range(path)),
        _ => Err(malformed(path, "integer")),
    }
}

fn as_array(value: Value, path: &str) -> Result<Vec<Value>, DocumentError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(malformed(path, "array")),
    }
}

fn malformed(path: &str, expected: &'static str) -> DocumentError {
    DocumentError::Malformed {
        path: path.to_owned(),
        expected,
    }
}

fn out_of_range(path: &str) -> DocumentError {
    DocumentError::OutOfRange {
        path: path.to_owned(),
    }
}

fn read_list<T>(
    value: Value,
    path: &str,
    mode: DocumentMode,
    read: impl Fn(Value, String, DocumentMode) -> Result<T, DocumentError>,
) -> Result<Vec<T>, DocumentError> {
    as_array(value, path)?
        .into_iter()
        .enumerate()
        .map(|(i, item)| read(item, format!("{path}[{i}]"), mode))
        .collect()
}

fn read_scalar(value: Value, path: String, mode: DocumentMode) -> Result<Scalar, DocumentError> {
    let mut f = Fields::open(value, path, mode)?;
    let (kind, kind_path) = f.required("kind")?;
    let kind = as_string(kind, &kind_path)?;
    let kind = ScalarKind::from_name(&kind).ok_or(DocumentError::UnknownKind {
        path: kind_path,
        kind,
    })?;
    let (value, path) = f.required("value")?;
    let scalar = match kind {
        ScalarKind::Str => Scalar::Str(as_string(value, &path)?),
        ScalarKind::Int => {
            let wide = as_i64(&value, &path)?;
            Scalar::Int(i32::try_from(wide).map_err(|_| out_of_range(&path))?)
        }
        ScalarKind::Long => Scalar::Long(as_i64(&value, &path)?),
        ScalarKind::Bool => Scalar::Bool(as_bool(&value, &path)?),
    };
    f.finish()?;
    Ok(scalar)
}

fn read_join_key(value: Value, path: &str, mode: DocumentMode) -> Result<JoinKey, DocumentError> {
    read_list(value, path, mode, read_scalar).map(JoinKey::new)
}

fn read_event(value: Value, path: String, mode: DocumentMode) -> Result<Event, DocumentError> {
    let mut f = Fields::open(value, path, mode)?;
    let (index, index_path) = f.required("_index")?;
    let index = as_string(index, &index_path)?;
    let (id, id_path) = f.required("_id")?;
    let id = as_string(id, &id_path)?;
    let source: Option<Source> = match f.take("_source") {
        Some((Value::Object(map), _)) => Some(map),
        Some((_, path)) => return Err(malformed(&path, "object")),
        None => None,
    };
    let mut fields = BTreeMap::new();
    if let Some((value, path)) = f.take("fields") {
        let Value::Object(map) = value else {
            return Err(malformed(&path, "object"));
        };
        for (name, value) in map {
            let child = format!("{path}.{name}");
            let scalar = read_scalar(value, child, mode)?;
            fields.insert(name, scalar);
        }
    }
    f.finish()?;
    let event = Event::new(index, id)?.with_fields(fields);
    Ok(match source {
        Some(source) => event.with_source(source),
        None => event,
    })
}

fn read_sequence(value: Value, path: String, mode: DocumentMode) -> Result<Sequence, DocumentError> {
    let mut f = Fields::open(value, path, mode)?;
    let join_keys = f
        .take("join_keys")
        .map(|(v, p)| read_join_key(v, &p, mode))
        .transpose()?;
    let events = f
        .take("events")
        .map(|(v, p)| read_list(v, &p, mode, read_event))
        .transpose()?;
    f.finish()?;
    Ok(Sequence::new(join_keys, events))
}

#[allow(clippy::cast_possible_truncation)]
fn read_count(value: Value, path: String, mode: DocumentMode) -> Result<Count, DocumentError> {
    let mut f = Fields::open(value, path, mode)?;
    let (count, count_path) = f.required("_count")?;
    let count = u32::try_from(as_u64(&count, &count_path)?).map_err(|_| out_of_range(&count_path))?;
    let keys = f
        .take("_keys")
        .map(|(v, p)| read_join_key(v, &p, mode))
        .transpose()?;
    let (percent, percent_path) = f.required("_percent")?;
    let percent = percent
        .as_f64()
        .ok_or_else(|| malformed(&percent_path, "number"))?;
    // range is checked before narrowing so 100.000001 cannot round to 100.0
    if !(0.0..=100.0).contains(&percent) {
        return Err(out_of_range(&percent_path));
    }
    f.finish()?;
    let percent = percent as f32;
    Ok(Count::new(count, keys, percent)?)
}

fn read_total(value: Value, path: String, mode: DocumentMode) -> Result<TotalHits, DocumentError> {
    let mut f = Fields::open(value, path, mode)?;
    let (count, count_path) = f.required("value")?;
    let count = as_u64(&count, &count_path)?;
    let (relation, relation_path) = f.required("relation")?;
    let relation = as_string(relation, &relation_path)?;
    let relation = TotalHitsRelation::from_name(&relation).ok_or(DocumentError::UnknownKind {
        path: relation_path,
        kind: relation,
    })?;
    f.finish()?;
    Ok(TotalHits { count, relation })
}

fn read_hits(value: Value, path: String, mode: DocumentMode) -> Result<Hits, DocumentError> {
    let mut f = Fields::open(value, path, mode)?;
    let events = f.take("events");
    let sequences = f.take("sequences");
    let counts = f.take("counts");
    let present: Vec<&'static str> = [
        ("events", events.is_some()),
        ("sequences", sequences.is_some()),
        ("counts", counts.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, present)| present.then_some(name))
    .collect();
    if present.len() > 1 {
        return Err(DocumentError::ConflictingHitsVariants {
            path: f.path,
            fields: present,
        });
    }
    let body = match (events, sequences, counts) {
        (Some((v, p)), _, _) => HitsBody::Events(read_list(v, &p, mode, read_event)?),
        (_, Some((v, p)), _) => HitsBody::Sequences(read_list(v, &p, mode, read_sequence)?),
        (_, _, Some((v, p))) => HitsBody::Counts(read_list(v, &p, mode, read_count)?),
        (None, None, None) => HitsBody::Empty,
    };
    let total = f
        .take("total")
        .map(|(v, p)| read_total(v, p, mode))
        .transpose()?;
    f.finish()?;
    Ok(Hits::from_body(body, total))
}

fn read_response(value: Value, mode: DocumentMode) -> Result<SearchResponse, DocumentError> {
    let mut f = Fields::open(value, String::new(), mode)?;
    let hits = f
        .take("hits")
        .map(|(v, p)| read_hits(v, p, mode))
        .transpose()?;
    let (took, took_path) = f.required("took")?;
    let took = as_u64(&took, &took_path)?;
    let (timed_out, timed_out_path) = f.required("timed_out")?;
    let timed_out = as_bool(&timed_out, &timed_out_path)?;
    let id = f.take("id").map(|(v, p)| as_string(v, &p)).transpose()?;
    let is_running = f
        .take("is_running")
        .map(|(v, p)| as_bool(&v, &p))
        .transpose()?;
    let is_partial = f
        .take("is_partial")
        .map(|(v, p)| as_bool(&v, &p))
        .transpose()?;
    f.finish()?;
    Ok(SearchResponse::try_extended(
        hits, took, timed_out, id, is_running, is_partial,
    )?)
}
