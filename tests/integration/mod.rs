//! Integration tests for cursor queries over real grammars.
//!
//! `scenarios` drives the public API end to end on small sources;
//! `properties` checks the walker and boundary arithmetic with proptest.

mod properties;
mod scenarios;
