//! Unit tests for the label line format.
//!
//! These tests verify line encoding and decoding, malformed-line handling
//! and save/load round trips through real files.

mod polygon_tests;
mod roundtrip_tests;
