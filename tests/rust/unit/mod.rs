//! Unit tests - scanner edge cases and rename offset arithmetic
//!
//! These tests exercise the FEEL scanner and the occurrence index through the
//! public facade, with no document round-trips.
