// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `proptest` strategies for every model type.

use hitpack_model::{
    AsyncState, Count, Event, Hits, HitsBody, JoinKey, Scalar, SearchResponse, Sequence, Source,
    TotalHits, TotalHitsRelation,
};
use proptest::collection::{btree_map, vec};
use proptest::option;
use proptest::prelude::*;
use serde_json::Value;

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,9}"
}

/// Any scalar, integers across their full range.
pub fn scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        "[a-zA-Z0-9 _-]{0,12}".prop_map(Scalar::Str),
        any::<i32>().prop_map(Scalar::Int),
        any::<i64>().prop_map(Scalar::Long),
        any::<bool>().prop_map(Scalar::Bool),
    ]
}

/// Keys of 0..6 arbitrarily mixed scalars.
pub fn join_key() -> impl Strategy<Value = JoinKey> {
    vec(scalar(), 0..6).prop_map(JoinKey::new)
}

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("JSON numbers are finite", |f| f.is_finite())
            .prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::from),
    ]
}

/// Source objects with scalar values, arrays and nested objects.
pub fn source() -> impl Strategy<Value = Source> {
    let value = json_leaf().prop_recursive(2, 12, 3, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..3).prop_map(Value::Array),
            btree_map(name(), inner, 0..3)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    });
    btree_map(name(), value, 0..4).prop_map(|m| m.into_iter().collect::<Source>())
}

/// Events with optional source and up to two fields.
pub fn event() -> impl Strategy<Value = Event> {
    (
        "[a-z]{1,8}",
        "[a-zA-Z0-9]{1,12}",
        option::of(source()),
        btree_map(name(), scalar(), 0..3),
    )
        .prop_filter_map("event ids and indices are non-empty", |(index, id, source, fields)| {
            let event = Event::new(index, id).ok()?.with_fields(fields);
            Some(match source {
                Some(source) => event.with_source(source),
                None => event,
            })
        })
}

/// Sequences; absent and empty event lists both occur.
pub fn sequence() -> impl Strategy<Value = Sequence> {
    (option::of(join_key()), option::of(vec(event(), 0..3)))
        .prop_map(|(keys, events)| Sequence::new(keys, events))
}

/// Counts with percentages over the whole valid range.
pub fn count() -> impl Strategy<Value = Count> {
    (any::<u32>(), option::of(join_key()), 0.0f32..=100.0f32)
        .prop_filter_map("percent within [0, 100]", |(count, keys, percent)| {
            Count::new(count, keys, percent).ok()
        })
}

/// Total summaries.
pub fn total_hits() -> impl Strategy<Value = TotalHits> {
    (
        any::<u64>(),
        prop_oneof![
            Just(TotalHitsRelation::EqualTo),
            Just(TotalHitsRelation::GreaterThanOrEqualTo),
        ],
    )
        .prop_map(|(count, relation)| TotalHits { count, relation })
}

/// Any body, including the empty container and empty lists.
pub fn hits_body() -> impl Strategy<Value = HitsBody> {
    prop_oneof![
        Just(HitsBody::Empty),
        vec(event(), 0..4).prop_map(HitsBody::Events),
        vec(sequence(), 0..4).prop_map(HitsBody::Sequences),
        vec(count(), 0..4).prop_map(HitsBody::Counts),
    ]
}

/// Hits containers.
pub fn hits() -> impl Strategy<Value = Hits> {
    (hits_body(), option::of(total_hits())).prop_map(|(body, total)| Hits::from_body(body, total))
}

/// Continuation state.
pub fn async_state() -> impl Strategy<Value = AsyncState> {
    ("[a-zA-Z0-9_-]{0,16}", any::<bool>(), any::<bool>()).prop_map(|(id, is_running, is_partial)| {
        AsyncState {
            id,
            is_running,
            is_partial,
        }
    })
}

/// Envelopes of both shapes, hits optional.
pub fn search_response() -> impl Strategy<Value = SearchResponse> {
    (
        option::of(hits()),
        any::<u64>(),
        any::<bool>(),
        option::of(async_state()),
    )
        .prop_map(|(hits, took, timed_out, state)| match state {
            Some(state) => SearchResponse::with_async_state(hits, took, timed_out, state),
            None => SearchResponse::new(hits, took, timed_out),
        })
}
