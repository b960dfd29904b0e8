//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`MonikaError`]
//! via `#[from]` (or an explicit `into_domain` for adapter errors).

/// Top-level error for everything that crosses a port boundary.
#[derive(Debug, thiserror::Error)]
pub enum MonikaError {
    /// A value was rejected before any entity was touched.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The addressed device, module or iolet does not exist.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// The entity exists but cannot execute the requested control.
    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    /// Talking to the gateway failed (transport, status, timeout, body).
    #[error("gateway error")]
    Gateway(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The device inventory could not be loaded.
    #[error("device inventory error")]
    Inventory(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Static validation failures, raised at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The string is not part of the fixed control vocabulary.
    #[error("{value} is not a valid {kind}")]
    InvalidControl {
        /// Which vocabulary was consulted (e.g. `"device control"`).
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The string does not name a known device, module or iolet type.
    #[error("{value} is not a known {kind}")]
    UnknownType {
        /// Which vocabulary was consulted (e.g. `"iolet type"`).
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

/// Lookup failure for an entity addressed by id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Entity class (`"Device"`, `"Module"`, `"IOlet"`).
    pub entity: &'static str,
    /// The id that was looked up.
    pub id: String,
}

/// Per-instance capability failures, raised when an action is fired.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The control is part of the vocabulary but nothing is registered for it
    /// on this entity.
    #[error("no such action defined: {control}")]
    NoSuchAction {
        /// Wire name of the control.
        control: String,
    },

    /// The registered callback refused to run.
    #[error("action {control} failed: {reason}")]
    Rejected {
        /// Wire name of the control.
        control: String,
        /// Human readable reason reported by the callback.
        reason: String,
    },
}
