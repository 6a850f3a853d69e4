//! Shared fixtures for the end-to-end tests under `tests/`.

pub mod harness;
