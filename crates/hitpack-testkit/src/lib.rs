// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared fixtures and generators for hitpack tests.
//!
//! # Modules
//!
//! - [`builders`] - Fluent envelope builder and small fixtures
//! - [`random`] - Seeded random envelope generator (reproducible samples)
//! - [`strategies`] - `proptest` strategies covering every valid envelope

pub mod builders;
pub mod random;
pub mod strategies;

pub use builders::{event, source, ResponseBuilder};
pub use random::Generator;
pub use strategies::search_response;
