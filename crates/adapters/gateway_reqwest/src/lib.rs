//! # monika-adapter-gateway-reqwest
//!
//! Gateway adapter built on [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement `ErrorSink`, `UpdateSink` and `DriverRegistry` from
//!   `monika-app::ports::gateway` against the gateway's HTTP API
//! - Apply a per-request timeout (a timeout is a failure, never a hang)
//! - Map non-success statuses and transport failures into [`GatewayError`]
//!
//! ## Dependency rule
//! Depends on `monika-app` (for port traits) and `monika-domain` (for payloads).
//! The `app` and `domain` crates must never reference this adapter.

mod client;
mod error;

pub use client::GatewayClient;
pub use error::GatewayError;
