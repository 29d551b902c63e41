// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Top-level response envelope.

use crate::{Hits, ValidationError};

/// Continuation state of an asynchronously executed query.
///
/// The three fields only ever travel together: an envelope either carries
/// all of them or none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AsyncState {
    /// Opaque continuation id.
    pub id: String,
    /// Query still executing.
    pub is_running: bool,
    /// Result set is incomplete.
    pub is_partial: bool,
}

impl AsyncState {
    /// Convenience constructor.
    pub fn new(id: impl Into<String>, is_running: bool, is_partial: bool) -> Self {
        Self {
            id: id.into(),
            is_running,
            is_partial,
        }
    }
}

/// Response envelope returned by a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    hits: Option<Hits>,
    took: u64,
    timed_out: bool,
    async_state: Option<AsyncState>,
}

impl SearchResponse {
    /// Minimal envelope (no continuation state).
    pub fn new(hits: Option<Hits>, took: u64, timed_out: bool) -> Self {
        Self {
            hits,
            took,
            timed_out,
            async_state: None,
        }
    }

    /// Extended envelope with continuation state.
    pub fn with_async_state(
        hits: Option<Hits>,
        took: u64,
        timed_out: bool,
        async_state: AsyncState,
    ) -> Self {
        Self {
            hits,
            took,
            timed_out,
            async_state: Some(async_state),
        }
    }

    /// Extended envelope from separately supplied optionals.
    ///
    /// All three `None` is equivalent to [`SearchResponse::new`]; any other
    /// partial combination is rejected.
    pub fn try_extended(
        hits: Option<Hits>,
        took: u64,
        timed_out: bool,
        id: Option<String>,
        is_running: Option<bool>,
        is_partial: Option<bool>,
    ) -> Result<Self, ValidationError> {
        let async_state = match (id, is_running, is_partial) {
            (Some(id), Some(is_running), Some(is_partial)) => Some(AsyncState {
                id,
                is_running,
                is_partial,
            }),
            (None, None, None) => None,
            (id, is_running, is_partial) => {
                return Err(ValidationError::PartialAsyncState {
                    id: id.is_some(),
                    is_running: is_running.is_some(),
                    is_partial: is_partial.is_some(),
                })
            }
        };
        Ok(Self {
            hits,
            took,
            timed_out,
            async_state,
        })
    }

    /// Result payload; `None` means the query produced no hits section.
    pub fn hits(&self) -> Option<&Hits> {
        self.hits.as_ref()
    }

    /// Elapsed time in milliseconds.
    pub fn took(&self) -> u64 {
        self.took
    }

    /// Whether the query timed out.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Continuation state, when present.
    pub fn async_state(&self) -> Option<&AsyncState> {
        self.async_state.as_ref()
    }

    /// Continuation id, when present.
    pub fn id(&self) -> Option<&str> {
        self.async_state.as_ref().map(|s| s.id.as_str())
    }

    /// Running flag; `false` for minimal envelopes.
    pub fn is_running(&self) -> bool {
        self.async_state.as_ref().is_some_and(|s| s.is_running)
    }

    /// Partial flag; `false` for minimal envelopes.
    pub fn is_partial(&self) -> bool {
        self.async_state.as_ref().is_some_and(|s| s.is_partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_without_fields_equals_minimal() -> Result<(), ValidationError> {
        let extended = SearchResponse::try_extended(None, 5, true, None, None, None)?;
        let minimal = SearchResponse::new(None, 5, true);
        assert_eq!(extended, minimal);
        assert!(!minimal.is_running());
        assert!(!minimal.is_partial());
        assert_eq!(minimal.id(), None);
        Ok(())
    }

    #[test]
    fn extended_with_all_fields_matches_async_state() -> Result<(), ValidationError> {
        let a = SearchResponse::try_extended(
            None,
            0,
            false,
            Some("cursor".into()),
            Some(false),
            Some(true),
        )?;
        let b = SearchResponse::with_async_state(None, 0, false, AsyncState::new("cursor", false, true));
        assert_eq!(a, b);
        assert_eq!(a.id(), Some("cursor"));
        assert!(a.is_partial());
        Ok(())
    }

    #[test]
    fn any_partial_combination_is_rejected() {
        let combos = [
            (Some("x".to_string()), None, None),
            (None, Some(true), None),
            (None, None, Some(false)),
            (Some("x".to_string()), Some(true), None),
            (Some("x".to_string()), None, Some(true)),
            (None, Some(true), Some(true)),
        ];
        for (id, running, partial) in combos {
            let expected = ValidationError::PartialAsyncState {
                id: id.is_some(),
                is_running: running.is_some(),
                is_partial: partial.is_some(),
            };
            assert_eq!(
                SearchResponse::try_extended(None, 1, false, id, running, partial),
                Err(expected)
            );
        }
    }
}
