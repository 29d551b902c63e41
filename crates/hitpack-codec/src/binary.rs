// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Binary transport form of [`SearchResponse`].
//!
//! Layout (versionless, little-endian, no padding):
//!
//! ```text
//! hits?      u8 flag
//!   tag      u8            0 empty | 1 events | 2 sequences | 3 counts
//!   records  u32 n, n * record      (omitted for empty)
//!   total?   u8 flag, u64 count, u8 relation (0 eq | 1 gte)
//! took       u64
//! timed_out  u8
//! async?     u8 flag, string id, u8 is_running, u8 is_partial
//! ```
//!
//! Strings are `u32` byte length + UTF-8. Scalars are a type tag
//! (0 string | 1 int32 | 2 int64 | 3 bool) followed by the value. The decoder
//! is strict: unknown tags, non 0/1 flags, oversized prefixes and trailing
//! bytes all fail the whole decode.

use crate::codec::{decode_from_bytes, encode_to_vec, CodecError, Decode, Encode, Reader, Writer};
use crate::CodecLimits;
use hitpack_model::{
    AsyncState, Count, Event, Hits, HitsBody, JoinKey, Scalar, ScalarKind, SearchResponse,
    Sequence, Source, TotalHits, TotalHitsRelation,
};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

const HITS_EMPTY: u8 = 0;
const HITS_EVENTS: u8 = 1;
const HITS_SEQUENCES: u8 = 2;
const HITS_COUNTS: u8 = 3;

const RELATION_EQ: u8 = 0;
const RELATION_GTE: u8 = 1;

/// Encode an envelope with default limits.
pub fn encode(response: &SearchResponse) -> Result<Vec<u8>, CodecError> {
    encode_with_limits(response, CodecLimits::default())
}

/// Encode an envelope, refusing values the decoder would reject under `limits`.
#[instrument(level = "trace", skip_all)]
pub fn encode_with_limits(
    response: &SearchResponse,
    limits: CodecLimits,
) -> Result<Vec<u8>, CodecError> {
    encode_to_vec(response, limits)
}

/// Decode an envelope with default limits.
pub fn decode(bytes: &[u8]) -> Result<SearchResponse, CodecError> {
    decode_with_limits(bytes, CodecLimits::default())
}

/// Decode an envelope; the input must contain exactly one envelope.
#[instrument(level = "trace", skip_all, fields(len = bytes.len()))]
pub fn decode_with_limits(bytes: &[u8], limits: CodecLimits) -> Result<SearchResponse, CodecError> {
    decode_from_bytes(bytes, limits).inspect_err(|err| debug!(%err, "binary envelope rejected"))
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, writer: &mut Writer) -> Result<(), CodecError> {
        writer.write_bool(self.is_some());
        match self {
            Some(value) => value.encode(writer),
            None => Ok(()),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        if reader.read_bool()? {
            T::decode(reader).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, writer: &mut Writer) -> Result<(), CodecError> {
        writer.write_len(self.len())?;
        self.iter().try_for_each(|item| item.encode(writer))
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let len = reader.read_len()?;
        (0..len).map(|_| T::decode(reader)).collect()
    }
}

impl Encode for Scalar {
    fn encode(&self, writer: &mut Writer) -> Result<(), CodecError> {
        writer.write_u8(self.kind().tag());
        match self {
            Scalar::Str(s) => writer.write_string(s)?,
            Scalar::Int(i) => writer.write_i32_le(*i),
            Scalar::Long(l) => writer.write_i64_le(*l),
            Scalar::Bool(b) => writer.write_bool(*b),
        }
        Ok(())
    }
}

impl Decode for Scalar {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let tag = reader.read_u8()?;
        let kind = ScalarKind::from_tag(tag).ok_or(CodecError::UnknownTag {
            what: "scalar",
            tag,
        })?;
        Ok(match kind {
            ScalarKind::Str => Scalar::Str(reader.read_string()?),
            ScalarKind::Int => Scalar::Int(reader.read_i32_le()?),
            ScalarKind::Long => Scalar::Long(reader.read_i64_le()?),
            ScalarKind::Bool => Scalar::Bool(reader.read_bool()?),
        })
    }
}

impl Encode for JoinKey {
    fn encode(&self, writer: &mut Writer) -> Result<(), CodecError> {
        writer.write_len(self.len())?;
        self.iter().try_for_each(|value| value.encode(writer))
    }
}

impl Decode for JoinKey {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Vec::<Scalar>::decode(reader).map(JoinKey::new)
    }
}

fn encode_source(source: &Source, writer: &mut Writer) -> Result<(), CodecError> {
    let bytes =
        serde_json::to_vec(source).map_err(|err| CodecError::InvalidSource(err.to_string()))?;
    let max = writer.limits().max_source_bytes;
    writer.write_len_prefixed_bytes(&bytes, max)
}

fn decode_source(reader: &mut Reader<'_>) -> Result<Source, CodecError> {
    let max = reader.limits().max_source_bytes;
    let bytes = reader.read_len_prefixed_bytes(max)?;
    serde_json::from_slice(bytes).map_err(|err| CodecError::InvalidSource(err.to_string()))
}

impl Encode for Event {
    fn encode(&self, writer: &mut Writer) -> Result<(), CodecError> {
        writer.write_string(self.id())?;
        writer.write_string(self.index())?;
        writer.write_bool(self.source().is_some());
        if let Some(source) = self.source() {
            encode_source(source, writer)?;
        }
        writer.write_len(self.fields().len())?;
        for (name, value) in self.fields() {
            writer.write_string(name)?;
            value.encode(writer)?;
        }
        Ok(())
    }
}

impl Decode for Event {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let id = reader.read_string()?;
        let index = reader.read_string()?;
        let source = if reader.read_bool()? {
            Some(decode_source(reader)?)
        } else {
            None
        };
        let len = reader.read_len()?;
        let mut fields = BTreeMap::new();
        for _ in 0..len {
            let name = reader.read_string()?;
            let value = Scalar::decode(reader)?;
            if fields.contains_key(&name) {
                return Err(CodecError::DuplicateField(name));
            }
            fields.insert(name, value);
        }
        let event = Event::new(index, id)?.with_fields(fields);
        Ok(match source {
            Some(source) => event.with_source(source),
            None => event,
        })
    }
}

impl Encode for Sequence {
    fn encode(&self, writer: &mut Writer) -> Result<(), CodecError> {
        writer.write_bool(self.join_keys().is_some());
        if let Some(keys) = self.join_keys() {
            keys.encode(writer)?;
        }
        writer.write_bool(self.events().is_some());
        if let Some(events) = self.events() {
            writer.write_len(events.len())?;
            events.iter().try_for_each(|e| e.encode(writer))?;
        }
        Ok(())
    }
}

impl Decode for Sequence {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let join_keys = Option::<JoinKey>::decode(reader)?;
        let events = Option::<Vec<Event>>::decode(reader)?;
        Ok(Sequence::new(join_keys, events))
    }
}

impl Encode for Count {
    fn encode(&self, writer: &mut Writer) -> Result<(), CodecError> {
        writer.write_u32_le(self.count());
        writer.write_bool(self.keys().is_some());
        if let Some(keys) = self.keys() {
            keys.encode(writer)?;
        }
        writer.write_u32_le(self.percent().to_bits());
        Ok(())
    }
}

impl Decode for Count {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let count = reader.read_u32_le()?;
        let keys = Option::<JoinKey>::decode(reader)?;
        let percent = f32::from_bits(reader.read_u32_le()?);
        Ok(Count::new(count, keys, percent)?)
    }
}

impl Encode for TotalHits {
    fn encode(&self, writer: &mut Writer) -> Result<(), CodecError> {
        writer.write_u64_le(self.count);
        writer.write_u8(match self.relation {
            TotalHitsRelation::EqualTo => RELATION_EQ,
            TotalHitsRelation::GreaterThanOrEqualTo => RELATION_GTE,
        });
        Ok(())
    }
}

impl Decode for TotalHits {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let count = reader.read_u64_le()?;
        let relation = match reader.read_u8()? {
            RELATION_EQ => TotalHitsRelation::EqualTo,
            RELATION_GTE => TotalHitsRelation::GreaterThanOrEqualTo,
            tag => {
                return Err(CodecError::UnknownTag {
                    what: "total hits relation",
                    tag,
                })
            }
        };
        Ok(TotalHits { count, relation })
    }
}

impl Encode for Hits {
    fn encode(&self, writer: &mut Writer) -> Result<(), CodecError> {
        match self.body() {
            HitsBody::Empty => writer.write_u8(HITS_EMPTY),
            HitsBody::Events(events) => {
                writer.write_u8(HITS_EVENTS);
                events.encode(writer)?;
            }
            HitsBody::Sequences(sequences) => {
                writer.write_u8(HITS_SEQUENCES);
                sequences.encode(writer)?;
            }
            HitsBody::Counts(counts) => {
                writer.write_u8(HITS_COUNTS);
                counts.encode(writer)?;
            }
        }
        self.total().copied().encode(writer)
    }
}

impl Decode for Hits {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let body = match reader.read_u8()? {
            HITS_EMPTY => HitsBody::Empty,
            HITS_EVENTS => HitsBody::Events(Vec::decode(reader)?),
            HITS_SEQUENCES => HitsBody::Sequences(Vec::decode(reader)?),
            HITS_COUNTS => HitsBody::Counts(Vec::decode(reader)?),
            tag => return Err(CodecError::UnknownTag { what: "hits", tag }),
        };
        let total = Option::<TotalHits>::decode(reader)?;
        Ok(Hits::from_body(body, total))
    }
}

impl Encode for AsyncState {
    fn encode(&self, writer: &mut Writer) -> Result<(), CodecError> {
        writer.write_string(&self.id)?;
        writer.write_bool(self.is_running);
        writer.write_bool(self.is_partial);
        Ok(())
    }
}

impl Decode for AsyncState {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(AsyncState {
            id: reader.read_string()?,
            is_running: reader.read_bool()?,
            is_partial: reader.read_bool()?,
        })
    }
}

impl Encode for SearchResponse {
    fn encode(&self, writer: &mut Writer) -> Result<(), CodecError> {
        writer.write_bool(self.hits().is_some());
        if let Some(hits) = self.hits() {
            hits.encode(writer)?;
        }
        writer.write_u64_le(self.took());
        writer.write_bool(self.timed_out());
        writer.write_bool(self.async_state().is_some());
        if let Some(state) = self.async_state() {
            state.encode(writer)?;
        }
        Ok(())
    }
}

impl Decode for SearchResponse {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let hits = Option::<Hits>::decode(reader)?;
        let took = reader.read_u64_le()?;
        let timed_out = reader.read_bool()?;
        Ok(match Option::<AsyncState>::decode(reader)? {
            Some(state) => SearchResponse::with_async_state(hits, took, timed_out, state),
            None => SearchResponse::new(hits, took, timed_out),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use hitpack_model::ValidationError;

    fn event(id: &str) -> Event {
        Event::new("logs", id).expect("valid event")
    }

    #[test]
    fn absent_envelope_parts_are_single_zero_bytes() {
        let bytes = encode(&SearchResponse::new(None, 7, true)).unwrap();
        // hits flag, took, timed_out, async flag
        assert_eq!(bytes, [0, 7, 0, 0, 0, 0, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn minimal_events_envelope_round_trips() {
        let hits = Hits::events(vec![event("1")], Some(TotalHits::exact(500)));
        let response = SearchResponse::new(Some(hits), 42, false);
        let back = decode(&encode(&response).unwrap()).unwrap();
        assert_eq!(back, response);
        let hits = back.hits().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.total().map(|t| t.count), Some(500));
        assert_eq!(back.took(), 42);
    }

    #[test]
    fn empty_container_and_absent_hits_stay_distinct() {
        let absent = SearchResponse::new(None, 0, false);
        let empty = SearchResponse::new(Some(Hits::empty(None)), 0, false);
        assert_eq!(decode(&encode(&absent).unwrap()).unwrap().hits(), None);
        assert_eq!(
            decode(&encode(&empty).unwrap()).unwrap().hits(),
            Some(&Hits::empty(None))
        );
    }

    #[test]
    fn unknown_scalar_tag_is_rejected() {
        let key = JoinKey::new(vec![Scalar::Bool(true)]);
        let count = Count::new(1, Some(key), 10.0).unwrap();
        let response = SearchResponse::new(Some(Hits::counts(vec![count], None)), 0, false);
        let mut bytes = encode(&response).unwrap();
        // hits flag, tag, list len (4), count (4), keys flag, key len (4) -> scalar tag
        let tag_at = 1 + 1 + 4 + 4 + 1 + 4;
        assert_eq!(bytes[tag_at], ScalarKind::Bool.tag());
        bytes[tag_at] = 9;
        assert_eq!(
            decode(&bytes),
            Err(CodecError::UnknownTag {
                what: "scalar",
                tag: 9
            })
        );
    }

    #[test]
    fn unknown_hits_tag_is_rejected() {
        let response = SearchResponse::new(Some(Hits::empty(None)), 0, false);
        let mut bytes = encode(&response).unwrap();
        bytes[1] = 4;
        assert_eq!(
            decode(&bytes),
            Err(CodecError::UnknownTag { what: "hits", tag: 4 })
        );
    }

    #[test]
    fn out_of_range_percent_fails_validation() {
        let count = Count::new(3, None, 50.0).unwrap();
        let response = SearchResponse::new(Some(Hits::counts(vec![count], None)), 0, false);
        let mut bytes = encode(&response).unwrap();
        // hits flag, tag, list len, count, keys flag -> percent bits
        let at = 1 + 1 + 4 + 4 + 1;
        bytes[at..at + 4].copy_from_slice(&150f32.to_bits().to_le_bytes());
        assert_eq!(
            decode(&bytes),
            Err(CodecError::Validation(ValidationError::PercentOutOfRange(150.0)))
        );
    }

    #[test]
    fn encode_respects_limits() {
        let limits = CodecLimits {
            max_list_len: 1,
            ..CodecLimits::default()
        };
        let hits = Hits::events(vec![event("1"), event("2")], None);
        let response = SearchResponse::new(Some(hits), 0, false);
        assert_eq!(
            encode_with_limits(&response, limits),
            Err(CodecError::LengthTooLarge)
        );
        let bytes = encode(&response).unwrap();
        assert_eq!(
            decode_with_limits(&bytes, limits),
            Err(CodecError::LengthTooLarge)
        );
    }

    #[test]
    fn source_and_fields_survive() {
        let mut source = Source::new();
        source.insert("pid".into(), serde_json::json!(12));
        source.insert("tags".into(), serde_json::json!(["a", "b"]));
        let e = event("9")
            .with_source(source)
            .with_field("host", "srv-1")
            .with_field("seq", 3i32);
        let response = SearchResponse::new(Some(Hits::events(vec![e], None)), 1, false);
        assert_eq!(decode(&encode(&response).unwrap()).unwrap(), response);
    }
}
