//! # Bowl Support
//!
//! Shared text helpers for the Bowl container crates.
//!
//! This crate provides:
//! - "Did you mean?" suggestions for mistyped service and tag names
//! - Name list rendering for error messages

pub mod rendering;
