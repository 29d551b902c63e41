// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Value types for search response envelopes.
//!
//! A query answers with exactly one result shape:
//!
//! - flat [`Event`] hits,
//! - correlated [`Sequence`]s of events sharing a [`JoinKey`],
//! - aggregated [`Count`]s per key.
//!
//! [`Hits`] carries the active shape as a sum type ([`HitsBody`]) and
//! [`SearchResponse`] wraps it with execution metadata. Everything here is an
//! immutable value; the wire forms live in `hitpack-codec`.

mod error;
mod hits;
mod record;
mod response;
mod scalar;
mod total;

pub use error::ValidationError;
pub use hits::{Hits, HitsBody, HitsKind};
pub use record::{Count, Event, Sequence, Source};
pub use response::{AsyncState, SearchResponse};
pub use scalar::{JoinKey, Scalar, ScalarKind};
pub use total::{TotalHits, TotalHitsRelation};
