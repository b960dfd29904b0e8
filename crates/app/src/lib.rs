//! # monika-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ErrorSink`: report and withdraw faults
//!   - `UpdateSink`: publish sparse change updates
//!   - `DriverRegistry`: connect/disconnect handshake
//!   - `DeviceProvider`: the devices this driver manages
//! - Define **driving/inbound** use-cases:
//!   - `DriverService`: lookups and two-stage control dispatch
//!   - `ErrorReconciler`: keep remote fault state in line with checker output
//!   - `UpdateWorker`: single consumer of the change queue
//!   - `DriverSession`: bracket all traffic between connect and disconnect
//!
//! ## Dependency rule
//! Depends on `monika-domain` only (plus `tokio` for channels and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod reconciler;
pub mod services;
pub mod session;
pub mod update_worker;
