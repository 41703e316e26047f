//! Handler lifecycle state machine and activation guards.
//!
//! Every handler is constructed inactive and only performs live I/O between
//! an explicit [`DataHandler::activate`](crate::handler::DataHandler::activate)
//! and [`DataHandler::deactivate`](crate::handler::DataHandler::deactivate)
//! pair. The [`Lifecycle`] value holds the flag; handlers embed it as a
//! field and surface it through the
//! [`DataHandler`](crate::handler::DataHandler) accessors.
//!
//! Operations whose correctness depends on lifecycle state wrap themselves
//! in the [`require_active`] / [`require_inactive`] guards. The
//! [`ActivationScope`] wrapper ties activation to scope entry and guarantees
//! deactivation on every exit path, including unwinding.

use std::ops::{Deref, DerefMut};

use crate::error::HandlerError;
use crate::handler::DataHandler;


// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Activation flag embedded by every handler.
///
/// Starts inactive; [`activate`](Lifecycle::activate) and
/// [`deactivate`](Lifecycle::deactivate) flip it. Both transitions are
/// idempotent in effect here; handlers that acquire real resources document
/// their own policy for repeated activation.
///
/// # Example
///
/// ```
/// use rafter_handlers::lifecycle::Lifecycle;
///
/// let mut lifecycle = Lifecycle::new();
/// assert!(!lifecycle.is_active());
/// lifecycle.activate();
/// assert!(lifecycle.is_active());
/// lifecycle.deactivate();
/// lifecycle.deactivate(); // safe to repeat
/// assert!(!lifecycle.is_active());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lifecycle {
    active: bool,
}

impl Lifecycle {
    /// Creates a lifecycle in the inactive state.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: false }
    }

    /// Returns `true` while the handler is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the handler active.
    pub const fn activate(&mut self) {
        self.active = true;
    }

    /// Marks the handler inactive. Safe to call repeatedly.
    pub const fn deactivate(&mut self) {
        self.active = false;
    }
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

/// Guard for operations that are only legal on an active handler.
///
/// # Errors
///
/// Returns [`HandlerError::InactiveState`] naming `operation` when the
/// handler is inactive.
pub fn require_active<H>(handler: &H, operation: &str) -> Result<(), HandlerError>
where
    H: DataHandler + ?Sized,
{
    if handler.is_active() {
        Ok(())
    } else {
        Err(HandlerError::InactiveState {
            operation: operation.to_owned(),
        })
    }
}

/// Guard for operations that are only legal on an inactive handler.
///
/// # Errors
///
/// Returns [`HandlerError::ActiveState`] naming `operation` when the
/// handler is active.
pub fn require_inactive<H>(handler: &H, operation: &str) -> Result<(), HandlerError>
where
    H: DataHandler + ?Sized,
{
    if handler.is_active() {
        Err(HandlerError::ActiveState {
            operation: operation.to_owned(),
        })
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ActivationScope
// ---------------------------------------------------------------------------

/// Scoped activation: activates on entry, deactivates on every exit path.
///
/// The scope dereferences to the wrapped handler so guarded operations can
/// be called directly on it. Deactivation failures during drop are logged
/// rather than propagated; call
/// [`DataHandler::deactivate`](crate::handler::DataHandler::deactivate)
/// explicitly when the teardown result matters.
///
/// # Example
///
/// ```
/// use rafter_handlers::handler::DataHandler;
/// use rafter_handlers::lifecycle::{ActivationScope, Lifecycle};
/// use rafter_handlers::HandlerError;
///
/// struct Probe {
///     lifecycle: Lifecycle,
/// }
///
/// impl DataHandler for Probe {
///     fn lifecycle(&self) -> &Lifecycle {
///         &self.lifecycle
///     }
///     fn lifecycle_mut(&mut self) -> &mut Lifecycle {
///         &mut self.lifecycle
///     }
/// }
///
/// # fn main() -> Result<(), HandlerError> {
/// let mut probe = Probe { lifecycle: Lifecycle::new() };
/// {
///     let scope = ActivationScope::enter(&mut probe)?;
///     assert!(scope.is_active());
/// }
/// assert!(!probe.is_active());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ActivationScope<'a, H>
where
    H: DataHandler + ?Sized,
{
    handler: &'a mut H,
}

impl<'a, H> ActivationScope<'a, H>
where
    H: DataHandler + ?Sized,
{
    /// Activates the handler and wraps it in a scope.
    ///
    /// # Errors
    ///
    /// Propagates any error from the handler's
    /// [`activate`](crate::handler::DataHandler::activate); the handler is
    /// left untouched on failure.
    pub fn enter(handler: &'a mut H) -> Result<Self, HandlerError> {
        handler.activate()?;
        Ok(Self { handler })
    }
}

impl<H> Deref for ActivationScope<'_, H>
where
    H: DataHandler + ?Sized,
{
    type Target = H;

    fn deref(&self) -> &H {
        self.handler
    }
}

impl<H> DerefMut for ActivationScope<'_, H>
where
    H: DataHandler + ?Sized,
{
    fn deref_mut(&mut self) -> &mut H {
        self.handler
    }
}

impl<H> Drop for ActivationScope<'_, H>
where
    H: DataHandler + ?Sized,
{
    fn drop(&mut self) {
        if let Err(err) = self.handler.deactivate() {
            tracing::warn!(error = %err, "handler deactivation failed during scope exit");
        }
    }
}
