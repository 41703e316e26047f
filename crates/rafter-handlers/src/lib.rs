//! Pluggable handler abstraction for scientific data sources and sinks.
//!
//! The `rafter-handlers` crate defines the contracts shared by every data
//! handler: images, volumes, tomographic projections, distributions, and
//! tables. A handler is constructed cheaply and inactive, holding only the
//! declarative parameters needed to reach its data; live I/O happens inside
//! an explicit activation window; and at any inactive point the handler's
//! construction parameters can be captured as plain data and replayed on
//! another process to rebuild an equivalent handler. That last property is
//! what lets work be farmed out to remote compute workers, or a handler
//! description be carried through a scheduler as command-line state.
//!
//! The crate performs no I/O itself. Concrete backends implement the role
//! traits; this core governs *when* I/O-bearing code may run (the
//! [`lifecycle`] state machine), *how* construction parameters are captured
//! and replayed (the [`params`] contract), and how consumers find handlers
//! by what they can do (the [`discovery`] catalog).
//!
//! # Architecture
//!
//! - [`handler`] — the capability hierarchy: the [`DataHandler`] base, the
//!   [`Source`]/[`Sink`] direction roles, and the frame, table, and
//!   distribution payload kinds.
//! - [`lifecycle`] — the active/inactive state machine, the
//!   `require_active`/`require_inactive` guards, and scoped activation.
//! - [`params`] — the [`Reconstruct`] capture/replay protocol.
//! - [`metadata`] — string-keyed metadata with explicit missing-key errors.
//! - [`discovery`] — role-typed capability discovery over a [`Catalog`].
//!
//! # Example
//!
//! A minimal source: construction only records where the data lives,
//! capture produces a transportable mapping, and the activation scope
//! brackets the window in which reads are legal.
//!
//! ```
//! use rafter_handlers::handler::DataHandler;
//! use rafter_handlers::lifecycle::{require_active, Lifecycle};
//! use rafter_handlers::params::Reconstruct;
//! use rafter_handlers::HandlerError;
//! use serde::{Deserialize, Serialize};
//!
//! struct RampSource {
//!     lifecycle: Lifecycle,
//!     length: usize,
//! }
//!
//! #[derive(Serialize, Deserialize)]
//! struct RampParams {
//!     length: usize,
//! }
//!
//! impl RampSource {
//!     fn new(length: usize) -> Self {
//!         Self { lifecycle: Lifecycle::new(), length }
//!     }
//!
//!     fn read(&self, index: usize) -> Result<usize, HandlerError> {
//!         require_active(self, "read")?;
//!         Ok(index)
//!     }
//! }
//!
//! impl DataHandler for RampSource {
//!     fn lifecycle(&self) -> &Lifecycle {
//!         &self.lifecycle
//!     }
//!     fn lifecycle_mut(&mut self) -> &mut Lifecycle {
//!         &mut self.lifecycle
//!     }
//! }
//!
//! impl Reconstruct for RampSource {
//!     type Params = RampParams;
//!
//!     fn params(&self) -> RampParams {
//!         RampParams { length: self.length }
//!     }
//!
//!     fn from_params(params: RampParams) -> Result<Self, HandlerError> {
//!         Ok(Self::new(params.length))
//!     }
//! }
//!
//! # fn main() -> Result<(), HandlerError> {
//! // Capture while inactive, ship the mapping anywhere, rebuild.
//! let source = RampSource::new(16);
//! let description = source.capture()?;
//! let mut rebuilt = RampSource::restore(description)?;
//!
//! // Reads are only legal inside the activation window.
//! assert!(rebuilt.read(3).is_err());
//! let scope = rebuilt.scope()?;
//! assert_eq!(scope.read(3)?, 3);
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod error;
pub mod handler;
pub mod lifecycle;
pub mod metadata;
pub mod params;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[cfg(test)]
mod tests;

pub use self::discovery::{Catalog, HandlerDescriptor, HandlerType, RoleId};
pub use self::error::HandlerError;
pub use self::handler::{DataHandler, Sink, Source};
pub use self::lifecycle::{ActivationScope, Lifecycle};
pub use self::metadata::MetaStore;
pub use self::params::{ParamMap, Reconstruct};
