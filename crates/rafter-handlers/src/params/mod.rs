//! Declarative reconstruction contract for relocatable handlers.
//!
//! A handler's constructor captures everything needed to source or sink
//! data without touching any of it. That makes the construction parameters
//! a complete, transportable description of the handler: capture them on
//! one process, move them as plain data (file, pipe, network, command
//! line), and rebuild an equivalent handler on another process by
//! re-invoking the constructor. Only declarative parameters ever cross that
//! boundary — never live resource handles, which is why capture is illegal
//! while a handler is active.
//!
//! The contract is structural, not byte-level: parameters travel as a
//! string-keyed mapping of JSON primitives and arrays ([`ParamMap`]), and
//! any transport that preserves the mapping is acceptable.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::HandlerError;
use crate::handler::DataHandler;


/// Plain mapping of constructor-parameter names to JSON values.
pub type ParamMap = serde_json::Map<String, Value>;

/// Capture/replay protocol making a handler relocatable.
///
/// Each handler declares a `Params` struct mirroring its constructor
/// arguments. Shared role configuration (for example
/// [`FrameConfig`](crate::handler::FrameConfig)) is a named, flattened
/// field of `Params`, so concrete types extend the base mapping rather
/// than replacing it. Serde defaults on `Params` fields re-run the
/// constructor's default-filling when a captured mapping omits them.
///
/// The equivalence contract: for any inactive handler `h`,
/// `Restored::restore(h.capture()?)` yields a handler whose own `capture`
/// produces the same mapping. Equivalent, not identical — live state never
/// round-trips.
///
/// # Example
///
/// ```
/// use rafter_handlers::handler::DataHandler;
/// use rafter_handlers::lifecycle::Lifecycle;
/// use rafter_handlers::params::Reconstruct;
/// use rafter_handlers::HandlerError;
/// use serde::{Deserialize, Serialize};
///
/// struct Probe {
///     lifecycle: Lifecycle,
///     label: String,
/// }
///
/// #[derive(Serialize, Deserialize)]
/// struct ProbeParams {
///     label: String,
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
/// impl Reconstruct for Probe {
///     type Params = ProbeParams;
///
///     fn params(&self) -> ProbeParams {
///         ProbeParams { label: self.label.clone() }
///     }
///
///     fn from_params(params: ProbeParams) -> Result<Self, HandlerError> {
///         Ok(Self { lifecycle: Lifecycle::new(), label: params.label })
///     }
/// }
///
/// # fn main() -> Result<(), HandlerError> {
/// let probe = Probe { lifecycle: Lifecycle::new(), label: "beamline-2".into() };
/// let captured = probe.capture()?;
/// let rebuilt = Probe::restore(captured.clone())?;
/// assert_eq!(rebuilt.capture()?, captured);
/// # Ok(())
/// # }
/// ```
pub trait Reconstruct: DataHandler + Sized {
    /// Typed mirror of the handler's constructor arguments.
    type Params: Serialize + DeserializeOwned;

    /// Returns the constructor arguments that describe this handler.
    ///
    /// Pure and side-effect free; legal in any lifecycle state. The
    /// serialization-legality check lives in
    /// [`capture`](Reconstruct::capture).
    fn params(&self) -> Self::Params;

    /// Constructs a handler from typed parameters.
    ///
    /// This is the full constructor: all default-filling and validation
    /// runs here, for hand-authored parameters and restored captures
    /// alike.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InvalidParams`] when validation rejects the
    /// parameters.
    fn from_params(params: Self::Params) -> Result<Self, HandlerError>;

    /// Captures the reconstruction mapping of an inactive handler.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::CaptureActive`] when the handler is active
    /// (active handlers typically hold non-transportable resources), and
    /// [`HandlerError::SerializeParams`] when the parameters cannot be
    /// encoded.
    fn capture(&self) -> Result<ParamMap, HandlerError> {
        if self.is_active() {
            return Err(HandlerError::CaptureActive);
        }
        match serde_json::to_value(self.params()).map_err(HandlerError::SerializeParams)? {
            Value::Object(map) => Ok(map),
            other => Err(HandlerError::InvalidParams {
                message: format!("reconstruction parameters must serialise to an object, got {other}"),
            }),
        }
    }

    /// Rebuilds a handler from a captured mapping.
    ///
    /// Goes through [`from_params`](Reconstruct::from_params) — never field
    /// assignment — so constructor validation and default-filling re-run on
    /// the receiving side. The restored handler is inactive.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::DeserializeParams`] when the mapping does
    /// not decode into `Params`, and propagates constructor errors.
    fn restore(params: ParamMap) -> Result<Self, HandlerError> {
        let typed = serde_json::from_value(Value::Object(params)).map_err(|err| {
            let message = err.to_string();
            HandlerError::DeserializeParams {
                message,
                source: Some(err),
            }
        })?;
        Self::from_params(typed)
    }
}
