// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire forms for hitpack search response envelopes.
//!
//! - [`binary`]: compact, versionless transport form. Strict: any malformed
//!   byte fails the decode.
//! - [`document`]: JSON document form. Lenient by default (unknown fields are
//!   ignored), with a strict mode for validation tooling.
//!
//! Both codecs are pure functions over immutable values and round-trip every
//! valid [`hitpack_model::SearchResponse`] exactly.

pub mod binary;
pub mod codec;
pub mod document;
mod limits;

pub use codec::CodecError;
pub use document::{DocumentCodec, DocumentError, DocumentMode};
pub use limits::CodecLimits;
