// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scalar values and join-key tuples.

/// Typed scalar carried by join keys and event fields.
///
/// `Int` and `Long` are kept apart so that both wire forms can restore the
/// exact width the producer used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// UTF-8 string.
    Str(String),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// Boolean.
    Bool(bool),
}

/// Discriminant of a [`Scalar`]; doubles as the wire type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// [`Scalar::Str`].
    Str,
    /// [`Scalar::Int`].
    Int,
    /// [`Scalar::Long`].
    Long,
    /// [`Scalar::Bool`].
    Bool,
}

impl ScalarKind {
    /// Binary type tag.
    pub fn tag(self) -> u8 {
        match self {
            Self::Str => 0,
            Self::Int => 1,
            Self::Long => 2,
            Self::Bool => 3,
        }
    }

    /// Inverse of [`ScalarKind::tag`].
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Str),
            1 => Some(Self::Int),
            2 => Some(Self::Long),
            3 => Some(Self::Bool),
            _ => None,
        }
    }

    /// Document `kind` name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "int",
            Self::Long => "long",
            Self::Bool => "bool",
        }
    }

    /// Inverse of [`ScalarKind::as_str`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::Str),
            "int" => Some(Self::Int),
            "long" => Some(Self::Long),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }
}

impl Scalar {
    /// Kind of this value.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Str(_) => ScalarKind::Str,
            Self::Int(_) => ScalarKind::Int,
            Self::Long(_) => ScalarKind::Long,
            Self::Bool(_) => ScalarKind::Bool,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Ordered, heterogeneous tuple identifying a correlation or count group.
///
/// Empty tuples are valid and distinct from an absent key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JoinKey(Vec<Scalar>);

impl JoinKey {
    /// Build a key from its elements, in order.
    pub fn new(values: Vec<Scalar>) -> Self {
        Self(values)
    }

    /// Elements in order.
    pub fn values(&self) -> &[Scalar] {
        &self.0
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the tuple has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Scalar> {
        self.0.iter()
    }
}

impl From<Vec<Scalar>> for JoinKey {
    fn from(values: Vec<Scalar>) -> Self {
        Self(values)
    }
}

impl FromIterator<Scalar> for JoinKey {
    fn from_iter<I: IntoIterator<Item = Scalar>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a JoinKey {
    type Item = &'a Scalar;
    type IntoIter = std::slice::Iter<'a, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
