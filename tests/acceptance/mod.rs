//! Integration tests for money clock acceptance testing.
//!
//! Everything runs on a virtual-time [`clock_runtime::scheduler::EventLoop`]
//! with a manual time source, so no test sleeps.

mod common;
mod desk_test;
mod persistence_test;
