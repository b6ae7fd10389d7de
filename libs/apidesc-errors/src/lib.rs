//! Problem Details payload shape for documented error responses
//!
//! This crate provides pure data types with no dependencies on HTTP frameworks:
//! - RFC 9457 Problem Details (`Problem`)
//! - The problem media types (`application/problem+json`, `application/problem+xml`)
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod problem;

pub use problem::{
    APPLICATION_PROBLEM_JSON, APPLICATION_PROBLEM_XML, PROBLEM_MEDIA_TYPES, Problem,
    ValidationViolation,
};
