//! Adapter integration tests.
//!
//! Tests for the network-backed providers, run against mock servers.

#[path = "adapters/sendgrid_test.rs"]
mod sendgrid_test;
#[path = "adapters/provider_factory_test.rs"]
mod provider_factory_test;
