// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Total hit count summary.

/// How [`TotalHits::count`] relates to the true number of matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TotalHitsRelation {
    /// The count is exact.
    EqualTo,
    /// The count is a lower bound (tracking stopped early).
    GreaterThanOrEqualTo,
}

impl TotalHitsRelation {
    /// Short wire name (`"eq"` / `"gte"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EqualTo => "eq",
            Self::GreaterThanOrEqualTo => "gte",
        }
    }

    /// Parse the short wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(Self::EqualTo),
            "gte" => Some(Self::GreaterThanOrEqualTo),
            _ => None,
        }
    }
}

/// Number of items matched by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TotalHits {
    /// Matched item count.
    pub count: u64,
    /// Exact or lower bound.
    pub relation: TotalHitsRelation,
}

impl TotalHits {
    /// Exact total.
    pub fn exact(count: u64) -> Self {
        Self {
            count,
            relation: TotalHitsRelation::EqualTo,
        }
    }

    /// Lower-bound total.
    pub fn at_least(count: u64) -> Self {
        Self {
            count,
            relation: TotalHitsRelation::GreaterThanOrEqualTo,
        }
    }
}
