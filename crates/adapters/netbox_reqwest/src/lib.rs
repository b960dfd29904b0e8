//! # monika-adapter-netbox-reqwest
//!
//! Device provider that reads the driver's devices from a
//! [NetBox](https://netbox.dev) inventory.
//!
//! ## Responsibilities
//! - Implement `DeviceProvider` from `monika-app::ports::provider`
//! - Page through `api/dcim/devices/?device_type_id=N`, following `next`
//! - Keep only devices with a primary IP and record it as their control IP
//!
//! ## Dependency rule
//! Depends on `monika-app` (for the port trait) and `monika-domain` (for the
//! entity model). The `app` and `domain` crates must never reference this
//! adapter.

mod error;
mod provider;

pub use error::NetboxError;
pub use provider::{NetboxProvider, NetboxSettings};
