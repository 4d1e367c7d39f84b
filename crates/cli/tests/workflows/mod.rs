//! Workflow integration tests
//!
//! End-to-end runs of the `ib` binary against real git repositories.

pub mod settings;
pub mod status;
