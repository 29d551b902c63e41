// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Size bounds applied by the binary codec.

use serde::{Deserialize, Serialize};

/// Upper bounds enforced while encoding and decoding binary envelopes.
///
/// Decoders check every length prefix against these bounds (and against the
/// remaining input) before allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecLimits {
    /// Maximum UTF-8 byte length of any string.
    pub max_string_bytes: usize,
    /// Maximum element count of any list, tuple or field map.
    pub max_list_len: usize,
    /// Maximum byte length of an encoded event source.
    pub max_source_bytes: usize,
}

impl CodecLimits {
    /// 1 MiB strings, 1M-element lists, 16 MiB sources.
    pub const DEFAULT: Self = Self {
        max_string_bytes: 1 << 20,
        max_list_len: 1 << 20,
        max_source_bytes: 16 << 20,
    };
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let limits: CodecLimits = serde_json::from_str(r#"{"max_list_len": 8}"#).unwrap();
        assert_eq!(limits.max_list_len, 8);
        assert_eq!(limits.max_string_bytes, CodecLimits::DEFAULT.max_string_bytes);
    }
}
