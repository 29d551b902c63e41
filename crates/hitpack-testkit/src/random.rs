// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Seeded random envelope generator.
//!
//! Every optional part (hits container, record lists, join keys, totals,
//! async state) is independently present or absent, so a few hundred seeds
//! cover all envelope shapes. Same seed, same envelope.
//!
//! Generated values always satisfy the model invariants; record constructors
//! still return `Result`, which the generator passes through unchanged.

use hitpack_model::{
    AsyncState, Count, Event, Hits, HitsBody, JoinKey, Scalar, SearchResponse, Sequence, Source,
    TotalHits, TotalHitsRelation, ValidationError,
};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Reproducible generator of valid envelopes.
#[derive(Debug, Clone)]
pub struct Generator {
    rng: StdRng,
}

impl Generator {
    /// Generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn text(&mut self, min: usize, max: usize) -> String {
        let len = self.rng.gen_range(min..=max);
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    /// Any scalar.
    pub fn scalar(&mut self) -> Scalar {
        match self.rng.gen_range(0..4) {
            0 => Scalar::Str(self.text(0, 11)),
            1 => Scalar::Int(self.rng.gen()),
            2 => Scalar::Long(self.rng.gen()),
            _ => Scalar::Bool(self.rng.gen()),
        }
    }

    /// A key of 0..=5 elements: homogeneous (one of the four kinds) or mixed.
    pub fn join_key(&mut self) -> JoinKey {
        let len = self.rng.gen_range(0..=5);
        let shape = self.rng.gen_range(0..5);
        (0..len)
            .map(|_| match shape {
                0 => Scalar::Str(self.text(6, 11)),
                1 => Scalar::Int(self.rng.gen()),
                2 => Scalar::Long(self.rng.gen()),
                3 => Scalar::Bool(self.rng.gen()),
                _ => self.scalar(),
            })
            .collect()
    }

    fn maybe<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> Option<T> {
        if self.rng.gen_bool(0.5) {
            Some(f(self))
        } else {
            None
        }
    }

    fn json_leaf(&mut self) -> serde_json::Value {
        match self.rng.gen_range(0..4) {
            0 => serde_json::Value::from(self.text(0, 8)),
            1 => serde_json::Value::from(self.rng.gen::<i64>()),
            2 => serde_json::Value::from(self.rng.gen_range(-1e6f64..1e6)),
            _ => serde_json::Value::from(self.rng.gen::<bool>()),
        }
    }

    fn source(&mut self) -> Source {
        let len = self.rng.gen_range(0..4);
        (0..len)
            .map(|i| {
                let value = if self.rng.gen_bool(0.25) {
                    let inner: Source = (0..self.rng.gen_range(0..3))
                        .map(|j| (format!("g{j}"), self.json_leaf()))
                        .collect();
                    serde_json::Value::Object(inner)
                } else {
                    self.json_leaf()
                };
                (format!("f{i}"), value)
            })
            .collect()
    }

    /// Event with id `doc-{n}`, optional source and 0..3 fields.
    pub fn event(&mut self, n: usize) -> Result<Event, ValidationError> {
        let index = format!("idx-{}", self.text(1, 6));
        let fields: BTreeMap<String, Scalar> = (0..self.rng.gen_range(0..3))
            .map(|i| (format!("m{i}"), self.scalar()))
            .collect();
        let source = self.maybe(Self::source);
        let event = Event::new(index, format!("doc-{n}"))?.with_fields(fields);
        Ok(match source {
            Some(source) => event.with_source(source),
            None => event,
        })
    }

    fn events(&mut self) -> Result<Vec<Event>, ValidationError> {
        let len = self.rng.gen_range(1..=10);
        (0..len).map(|n| self.event(n)).collect()
    }

    /// Sequence with optional key and optional (non-empty) events.
    pub fn sequence(&mut self) -> Result<Sequence, ValidationError> {
        let join_keys = self.maybe(Self::join_key);
        let events = self.maybe(Self::events).transpose()?;
        Ok(Sequence::new(join_keys, events))
    }

    /// Count with optional key and a percentage in `[0, 100)`.
    pub fn count(&mut self) -> Result<Count, ValidationError> {
        let count = self.rng.gen_range(0..=41);
        let keys = self.maybe(Self::join_key);
        let percent = self.rng.gen_range(0.0f32..100.0);
        Count::new(count, keys, percent)
    }

    /// Total summary.
    pub fn total(&mut self) -> TotalHits {
        let relation = if self.rng.gen_bool(0.5) {
            TotalHitsRelation::EqualTo
        } else {
            TotalHitsRelation::GreaterThanOrEqualTo
        };
        TotalHits {
            count: self.rng.gen_range(100..=1000),
            relation,
        }
    }

    /// Hits of a random shape; the list itself may be absent (empty container).
    pub fn hits(&mut self) -> Result<Hits, ValidationError> {
        let total = self.maybe(Self::total);
        let len = self.rng.gen_range(1..=10);
        let body = match self.rng.gen_range(0..3) {
            0 => self
                .maybe(Self::events)
                .transpose()?
                .map(HitsBody::Events),
            1 => self
                .maybe(|g| (0..len).map(|_| g.sequence()).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .map(HitsBody::Sequences),
            _ => self
                .maybe(|g| (0..len).map(|_| g.count()).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .map(HitsBody::Counts),
        };
        Ok(Hits::from_body(body.unwrap_or_default(), total))
    }

    /// Envelope of either shape (minimal or extended), hits optional.
    pub fn response(&mut self) -> Result<SearchResponse, ValidationError> {
        let hits = self.maybe(Self::hits).transpose()?;
        let took = self.rng.gen_range(0..=1001);
        let timed_out = self.rng.gen();
        Ok(if self.rng.gen_bool(0.5) {
            SearchResponse::new(hits, took, timed_out)
        } else {
            let state = AsyncState {
                id: self.text(10, 10),
                is_running: self.rng.gen(),
                is_partial: self.rng.gen(),
            };
            SearchResponse::with_async_state(hits, took, timed_out, state)
        })
    }
}
