//! Capability hierarchy for data sources and sinks.
//!
//! Handlers are described along two orthogonal axes: **direction**
//! ([`Source`] reads payloads out, [`Sink`] writes payloads in) and
//! **payload kind** ([`frame`], [`table`], [`distribution`]). A concrete
//! handler implements exactly one direction role and one payload-kind role;
//! membership is fixed at type-definition time.
//!
//! The base [`DataHandler`] trait carries the lifecycle contract shared by
//! every role: construction captures enough information to source or sink
//! data but performs no initialisation until
//! [`activate`](DataHandler::activate) is called. Deferred initialisation is
//! what lets a handler description be shipped to a remote worker or passed
//! as command-line state and rebuilt there — see
//! [`Reconstruct`](crate::params::Reconstruct).
//!
//! All operations on a single handler instance are expected to be invoked
//! from one logical thread of control at a time; concurrent invocation on
//! the same instance is a caller error.

pub mod distribution;
pub mod frame;
pub mod table;


use crate::error::HandlerError;
use crate::lifecycle::{ActivationScope, Lifecycle};

pub use self::distribution::{DistributionSink, DistributionSource};
pub use self::frame::{
    FrameConfig, FrameIter, FrameSink, FrameSource, ImageSink, ImageSource, Resolution,
    TomographySource, VolumeSource,
};
pub use self::table::{TableIter, TableSink, TableSource};

// ---------------------------------------------------------------------------
// DataHandler
// ---------------------------------------------------------------------------

/// Base trait for all data source and sink handlers.
///
/// Implementations embed a [`Lifecycle`] field and surface it through
/// [`lifecycle`](DataHandler::lifecycle) /
/// [`lifecycle_mut`](DataHandler::lifecycle_mut); the provided methods give
/// the default activate/deactivate behaviour. Handlers that acquire real
/// resources override [`activate`](DataHandler::activate) and
/// [`deactivate`](DataHandler::deactivate), always delegating the flag flip
/// to the embedded lifecycle.
///
/// Consumers are responsible for pairing activation with deactivation;
/// [`scope`](DataHandler::scope) does so mechanically.
pub trait DataHandler {
    /// Returns the embedded lifecycle state.
    fn lifecycle(&self) -> &Lifecycle;

    /// Returns the embedded lifecycle state for mutation.
    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Acquires whatever the handler needs to source or sink data.
    ///
    /// The base behaviour only flips the flag; overrides open files or
    /// connections first and flip the flag last. Calling `activate` on an
    /// already-active handler is a no-op here; overrides performing real
    /// acquisition document whether they error or ignore the repeat.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Activation`] when resource acquisition
    /// fails; the handler stays inactive in that case.
    fn activate(&mut self) -> Result<(), HandlerError> {
        self.lifecycle_mut().activate();
        Ok(())
    }

    /// Releases everything opened during the active period.
    ///
    /// Must be safe to call repeatedly, including on a handler that was
    /// never activated.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Activation`] when teardown fails; the
    /// handler is marked inactive regardless.
    fn deactivate(&mut self) -> Result<(), HandlerError> {
        self.lifecycle_mut().deactivate();
        Ok(())
    }

    /// Returns `true` while the handler is active.
    #[must_use]
    fn is_active(&self) -> bool {
        self.lifecycle().is_active()
    }

    /// Activates the handler for the duration of the returned scope.
    ///
    /// The scope dereferences to the handler and deactivates it on every
    /// exit path.
    ///
    /// # Errors
    ///
    /// Propagates the error from [`activate`](DataHandler::activate).
    fn scope(&mut self) -> Result<ActivationScope<'_, Self>, HandlerError>
    where
        Self: Sized,
    {
        ActivationScope::enter(self)
    }
}

// ---------------------------------------------------------------------------
// Direction roles
// ---------------------------------------------------------------------------

/// Read-direction role: handlers that produce payloads.
///
/// This layer exists so payload-kind source traits share a common bound and
/// so [`Sink::make_source`] can name its counterpart.
pub trait Source: DataHandler {}

/// Write-direction role: handlers that consume payloads.
pub trait Sink: DataHandler {
    /// The paired source type able to read back what this sink wrote.
    type Source: Source;

    /// Builds a source over the data written into this sink.
    ///
    /// The returned source is inactive and owns no resources of the sink;
    /// it is typically built after the sink has been deactivated.
    ///
    /// # Errors
    ///
    /// Returns a [`HandlerError`] when the written data cannot be exposed
    /// as a source (for example, nothing was recorded yet and the backend
    /// has no empty representation).
    fn make_source(&self) -> Result<Self::Source, HandlerError>;
}
