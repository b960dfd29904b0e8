//! # monika-domain
//!
//! Pure domain model for monika device drivers.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, wire vocabularies
//! - Define the entity hierarchy: **Devices** own **Modules**, which own **IOlets**
//! - Track per-entity changes with an at-most-once dirty flag, and turn them
//!   into sparse **updates** via the `updated()` walk
//! - Define **controls** (commands) and per-instance action dispatch
//! - Define **faults** (checker candidates, live errors, gateway reports)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

#[macro_use]
mod macros;

pub mod error;
pub mod id;

pub mod action;
pub mod change;
pub mod control;
pub mod device;
pub mod driver;
pub mod fault;
pub mod iolet;
pub mod kind;
pub mod module;
pub mod status;
pub mod update;

mod sync;
