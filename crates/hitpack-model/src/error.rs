// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Construction-time validation failures.

use crate::HitsKind;
use thiserror::Error;

/// Errors produced by validating constructors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// More than one record list was supplied to [`crate::Hits::new`].
    #[error("hits accept a single record list, got {}", join_kinds(.supplied))]
    ConflictingHitsVariants {
        /// Variants that were supplied together.
        supplied: Vec<HitsKind>,
    },
    /// Continuation id, running flag and partial flag must be set together.
    #[error(
        "async fields must be supplied together (id: {id}, is_running: {is_running}, is_partial: {is_partial})"
    )]
    PartialAsyncState {
        /// Whether a continuation id was supplied.
        id: bool,
        /// Whether a running flag was supplied.
        is_running: bool,
        /// Whether a partial flag was supplied.
        is_partial: bool,
    },
    /// Count percentage is not a finite value in `[0, 100]`.
    #[error("count percentage {0} outside [0, 100]")]
    PercentOutOfRange(f32),
    /// Event id was empty.
    #[error("event id must not be empty")]
    EmptyEventId,
    /// Event index name was empty.
    #[error("event index must not be empty")]
    EmptyEventIndex,
}

fn join_kinds(kinds: &[HitsKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
