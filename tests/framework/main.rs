//! Object Framework Integration Tests
//!
//! End-to-end behaviour of validated, lifecycle-managed entities: message
//! contracts, cascades through the object graph, owned collections, wire
//! round-trips and the client operations over a recording transport.

#[path = "../common/mod.rs"]
mod common;

mod client;
mod collections;
mod lifecycle;
mod validation;
mod wire;
