//! Per-instance action tables.
//!
//! Every entity owns one [`ActionTable`], mapping a control of its vocabulary
//! to the callback that executes it, and remembering which controls it
//! advertises (in registration order, without duplicates).

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use crate::error::{DispatchError, MonikaError};
use crate::sync::lock;

/// Callback executed when a control is fired against an entity of type `T`.
///
/// Callbacks mutate the entity through its setters. They run on the caller's
/// thread, so anything slow (a reboot that comes back later) must be handed
/// off to an independently scheduled task.
pub type Action<T> = Arc<dyn Fn(&T) -> Result<(), MonikaError> + Send + Sync>;

pub struct ActionTable<C, T> {
    inner: Mutex<Inner<C, T>>,
}

struct Inner<C, T> {
    controls: Vec<C>,
    actions: HashMap<C, Action<T>>,
}

impl<C, T> Default for ActionTable<C, T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                controls: Vec::new(),
                actions: HashMap::new(),
            }),
        }
    }
}

impl<C, T> std::fmt::Debug for ActionTable<C, T>
where
    C: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionTable")
            .field("controls", &lock(&self.inner).controls)
            .finish_non_exhaustive()
    }
}

impl<C, T> ActionTable<C, T>
where
    C: Copy + Eq + Hash + std::fmt::Display,
{
    /// Register or replace the callback for `control`.
    ///
    /// The advertised control list is append-only: registering the same
    /// control again only swaps the callback.
    pub fn register<F>(&self, control: C, action: F)
    where
        F: Fn(&T) -> Result<(), MonikaError> + Send + Sync + 'static,
    {
        let mut inner = lock(&self.inner);
        inner.actions.insert(control, Arc::new(action));
        if !inner.controls.contains(&control) {
            inner.controls.push(control);
        }
    }

    /// Invoke the callback registered for `control` with `target`.
    ///
    /// The table lock is released before the callback runs, so callbacks may
    /// register further actions or fire other controls.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NoSuchAction`] when nothing is registered for
    /// `control`, otherwise whatever the callback returns.
    pub fn fire(&self, control: C, target: &T) -> Result<(), MonikaError> {
        let action = lock(&self.inner).actions.get(&control).cloned();
        match action {
            Some(action) => action(target),
            None => Err(DispatchError::NoSuchAction {
                control: control.to_string(),
            }
            .into()),
        }
    }

    /// Advertised controls, in registration order.
    #[must_use]
    pub fn controls(&self) -> Vec<C> {
        lock(&self.inner).controls.clone()
    }
}
