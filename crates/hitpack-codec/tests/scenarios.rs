// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Concrete envelope scenarios, golden vectors and rejection cases.

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

use hitpack_codec::{binary, document, CodecError, DocumentCodec, DocumentError};
use hitpack_model::{
    Count, HitsKind, JoinKey, Scalar, ScalarKind, SearchResponse, Sequence, TotalHits,
    TotalHitsRelation,
};
use hitpack_testkit::{event, source, ResponseBuilder};
use serde_json::json;

fn minimal_events() -> SearchResponse {
    ResponseBuilder::new()
        .events(event("1").into_iter().collect())
        .total(TotalHits::exact(500))
        .took(42)
        .timed_out(false)
        .build()
}

fn mixed_counts() -> SearchResponse {
    let mixed = JoinKey::new(vec![
        Scalar::from("host-a"),
        Scalar::from(9_000_000_000i64),
        Scalar::from(true),
    ]);
    let counts = vec![
        Count::new(5, None, 50.0).expect("count"),
        Count::new(3, Some(mixed), 30.0).expect("count"),
        Count::new(2, Some(JoinKey::new(vec![Scalar::from(7i32)])), 20.0).expect("count"),
    ];
    ResponseBuilder::new().counts(counts).took(3).build()
}

#[test]
fn minimal_events_envelope_both_codecs() {
    let response = minimal_events();
    let via_binary = binary::decode(&binary::encode(&response).expect("encode")).expect("decode");
    let via_document =
        document::from_str(&document::to_string(&response).expect("encode")).expect("decode");
    for back in [via_binary, via_document] {
        let hits = back.hits().expect("hits present");
        assert_eq!(hits.kind(), HitsKind::Events);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.total().map(|t| t.count), Some(500));
        assert_eq!(
            hits.total().map(|t| t.relation),
            Some(TotalHitsRelation::EqualTo)
        );
        assert_eq!(back.took(), 42);
        assert!(!back.timed_out());
        assert_eq!(back, response);
    }
}

#[test]
fn minimal_events_document_shape() {
    assert_eq!(
        document::to_value(&minimal_events()),
        json!({
            "hits": {
                "events": [{"_index": "logs", "_id": "1"}],
                "total": {"value": 500, "relation": "eq"}
            },
            "took": 42,
            "timed_out": false
        })
    );
}

#[test]
fn extended_envelope_without_hits() {
    let response = ResponseBuilder::new()
        .async_state("cursor-abc", true, true)
        .took(0)
        .build();
    let via_binary = binary::decode(&binary::encode(&response).expect("encode")).expect("decode");
    let via_document =
        document::from_str(&document::to_string(&response).expect("encode")).expect("decode");
    for back in [via_binary, via_document] {
        assert!(back.hits().is_none());
        assert_eq!(back.id(), Some("cursor-abc"));
        assert!(back.is_running());
        assert!(back.is_partial());
        assert_eq!(back.took(), 0);
    }
}

#[test]
fn mixed_join_key_keeps_order_and_types() {
    let response = mixed_counts();
    let via_binary = binary::decode(&binary::encode(&response).expect("encode")).expect("decode");
    let via_document =
        document::from_str(&document::to_string(&response).expect("encode")).expect("decode");
    for back in [via_binary, via_document] {
        let counts = back.hits().and_then(|h| h.count_list()).expect("counts");
        assert_eq!(counts.len(), 3);
        let kinds: Vec<_> = counts[1]
            .keys()
            .expect("keys")
            .iter()
            .map(Scalar::kind)
            .collect();
        assert_eq!(kinds, [ScalarKind::Str, ScalarKind::Long, ScalarKind::Bool]);
        assert_eq!(counts[2].keys().map(|k| k.values()[0].kind()), Some(ScalarKind::Int));
        assert_eq!(back, response);
    }
}

#[test]
fn sequences_keep_absent_and_empty_event_lists() {
    let response = ResponseBuilder::new()
        .sequences(vec![
            Sequence::new(None, None),
            Sequence::new(Some(JoinKey::default()), Some(Vec::new())),
            Sequence::new(
                Some(JoinKey::new(vec![Scalar::from("u1")])),
                Some(event("7").into_iter().collect()),
            ),
        ])
        .total(TotalHits::at_least(10_000))
        .build();
    assert_eq!(
        binary::decode(&binary::encode(&response).expect("encode")).expect("decode"),
        response
    );
    let value = document::to_value(&response);
    assert_eq!(value["hits"]["sequences"][0], json!({}));
    assert_eq!(value["hits"]["sequences"][1], json!({"join_keys": [], "events": []}));
    assert_eq!(document::from_value(value).expect("decode"), response);
}

#[test]
fn golden_binary_events_envelope() {
    let response = ResponseBuilder::new()
        .events(
            event("1")
                .map(|e| e.with_source(source([("a", json!(1))])))
                .into_iter()
                .collect(),
        )
        .total(TotalHits::exact(2))
        .took(5)
        .build();
    let bytes = binary::encode(&response).expect("encode");
    let expected = concat!(
        "01",                 // hits present
        "01",                 // events
        "01000000",           // one event
        "01000000", "31",     // id "1"
        "04000000", "6c6f6773", // index "logs"
        "01", "07000000", "7b2261223a317d", // source {"a":1}
        "00000000",           // no fields
        "01", "0200000000000000", "00", // total 2 eq
        "0500000000000000",   // took
        "00",                 // timed_out
        "00",                 // no async state
    );
    assert_eq!(hex::encode(&bytes), expected);
}

#[test]
fn binary_rejects_trailing_bytes() {
    let mut bytes = binary::encode(&minimal_events()).expect("encode");
    bytes.push(0);
    assert_eq!(binary::decode(&bytes), Err(CodecError::TrailingBytes(1)));
}

#[test]
fn binary_rejects_oversized_list_prefix() {
    let mut bytes = binary::encode(&minimal_events()).expect("encode");
    // list length sits after the hits flag and tag
    bytes[2..6].copy_from_slice(&u32::MAX.to_le_bytes());
    assert_eq!(binary::decode(&bytes), Err(CodecError::LengthTooLarge));
}

#[test]
fn unknown_field_is_ignored_leniently() {
    let with_extra = json!({
        "hits": {
            "events": [{"_index": "logs", "_id": "1", "_score": 1.5}],
            "total": {"value": 500, "relation": "eq"},
            "max_score": 1.5
        },
        "took": 42,
        "timed_out": false,
        "_shards": {"total": 1}
    });
    let without = json!({
        "hits": {
            "events": [{"_index": "logs", "_id": "1"}],
            "total": {"value": 500, "relation": "eq"}
        },
        "took": 42,
        "timed_out": false
    });
    let lenient = document::from_value(with_extra.clone()).expect("lenient decode");
    assert_eq!(lenient, document::from_value(without).expect("decode"));
    assert_eq!(lenient, minimal_events());

    let err = DocumentCodec::strict()
        .decode_value(with_extra)
        .expect_err("strict rejects unknown fields");
    assert!(matches!(err, DocumentError::UnknownField { .. }), "{err}");
}

#[test]
fn multiple_variants_fail_in_both_modes() {
    let doc = json!({
        "hits": {"events": [], "counts": []},
        "took": 1,
        "timed_out": false,
        "unrelated": true
    });
    for codec in [DocumentCodec::lenient(), DocumentCodec::strict()] {
        let err = codec.decode_value(doc.clone()).expect_err("conflict");
        assert!(
            matches!(
                &err,
                DocumentError::ConflictingHitsVariants { path, fields }
                    if path == "hits" && fields == &["events", "counts"]
            ),
            "{:?}: {err}",
            codec.mode
        );
    }
}

#[test]
fn null_variant_does_not_conflict() {
    let doc = json!({"hits": {"events": null, "counts": []}, "took": 1, "timed_out": false});
    let back = document::from_value(doc).expect("decode");
    assert_eq!(back.hits().map(|h| h.kind()), Some(HitsKind::Counts));
}

#[test]
fn empty_hits_object_is_empty_container() {
    let doc = json!({"hits": {}, "took": 1, "timed_out": false});
    let back = document::from_value(doc).expect("decode");
    assert_eq!(back.hits().map(|h| h.kind()), Some(HitsKind::Empty));
}

#[test]
fn malformed_documents_are_rejected() {
    assert!(matches!(document::from_str("{"), Err(DocumentError::Json(_))));
    assert!(matches!(
        document::from_value(json!([])),
        Err(DocumentError::Malformed { .. })
    ));
    assert!(matches!(
        document::from_value(json!({"took": "1", "timed_out": false})),
        Err(DocumentError::Malformed { path, .. }) if path == "took"
    ));
    assert!(matches!(
        document::from_value(json!({"took": -1, "timed_out": false})),
        Err(DocumentError::OutOfRange { .. })
    ));
    assert!(matches!(
        document::from_value(json!({
            "hits": {"total": {"value": 1, "relation": "lte"}},
            "took": 1,
            "timed_out": false
        })),
        Err(DocumentError::UnknownKind { .. })
    ));
}

#[test]
fn source_floats_and_nesting_survive_both_codecs() {
    let doc = source([
        ("tenth", json!(0.1)),
        ("max", json!(f64::MAX)),
        ("deep", json!([1.5, {"x": -2.25e-300}])),
    ]);
    let response = ResponseBuilder::new()
        .events(
            event("1")
                .map(|e| e.with_source(doc.clone()))
                .into_iter()
                .collect(),
        )
        .build();
    let via_binary = binary::decode(&binary::encode(&response).expect("encode")).expect("decode");
    let via_document =
        document::from_str(&document::to_string(&response).expect("encode")).expect("decode");
    for back in [via_binary, via_document] {
        let events = back.hits().and_then(|h| h.event_list()).expect("events");
        assert_eq!(events[0].source(), Some(&doc));
    }
}

#[test]
fn percent_just_above_range_is_rejected() {
    let doc = json!({
        "hits": {"counts": [{"_count": 1, "_percent": 100.000001}]},
        "took": 1,
        "timed_out": false
    });
    assert!(matches!(
        document::from_value(doc),
        Err(DocumentError::OutOfRange { path }) if path == "hits.counts[0]._percent"
    ));
}
