//! # monika-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the driver's **REST surface** under `/devices`: read devices,
//!   modules and iolets, and fire controls on them
//! - Validate path segments against the closed type and control vocabularies
//!   before anything is dispatched
//! - Map application results into JSON responses and status codes
//!
//! ## Dependency rule
//! Depends on `monika-app` (for port traits and services) and `monika-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
