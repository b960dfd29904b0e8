//! # monika-adapter-mock
//!
//! Simulated driver used for demonstrations and end-to-end testing.
//!
//! ## Provided behaviour
//!
//! | Entity | Controls | Behaviour |
//! |--------|----------|-----------|
//! | Device | `BOOT` / `SHUTDOWN` / `REBOOT` | Online / offline; reboot comes back online after a delay |
//! | Module | `START` / `STOP` | OK / NOK |
//! | IOlet  | `START` / `STOP` | Running + receiving on / off |
//!
//! Every control, and every clock tick (which renames the device to the
//! current `HH:MM:SS`), pushes the device onto the change queue.
//!
//! ## Dependency rule
//!
//! Depends on `monika-app` (port traits, change queue) and `monika-domain` only.

mod checker;
mod device;
mod provider;

pub use checker::iolet_stopped_checker;
pub use device::{MockDevice, MockSettings};
pub use provider::MockProvider;
