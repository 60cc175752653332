//! Test helpers shared across Cascade crates.

pub mod fixture;

pub use fixture::ConfigFixture;
