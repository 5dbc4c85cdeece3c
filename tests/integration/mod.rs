//! Library-level integration tests.

pub mod pipeline_test;
