//! Frame-kind roles: handlers that move N-dimensional arrays.
//!
//! A frame is whatever the concrete handler considers its natural unit —
//! an image plane, a volume, a projection. The element type is an
//! associated type; the core never inspects it. What the core does govern
//! is the axial [`Resolution`] metadata every frame handler carries and the
//! lookup policy for per-frame and global metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HandlerError;
use crate::handler::{Sink, Source};
use crate::metadata::MetaStore;

/// Default unit string for axial resolution.
const DEFAULT_RESOLUTION_UNITS: &str = "pix";

/// Boxed iterator over frames, used by tomographic traversal orders.
pub type FrameIter<'a, F> = Box<dyn Iterator<Item = Result<F, HandlerError>> + 'a>;

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Axial size of a voxel, either isotropic or per axis.
///
/// Serialises untagged: an isotropic resolution is a bare number, a
/// per-axis resolution is an array whose length matches the frame
/// dimensionality. Units are tracked separately in [`FrameConfig`].
///
/// # Example
///
/// ```
/// use rafter_handlers::handler::Resolution;
///
/// let iso = Resolution::isotropic(2.5);
/// assert_eq!(iso, Resolution::Isotropic(2.5));
/// assert_eq!(Resolution::default(), Resolution::Isotropic(1.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resolution {
    /// One size for every axis.
    Isotropic(f64),
    /// One size per axis, in axis order.
    PerAxis(Vec<f64>),
}

impl Resolution {
    /// Creates an isotropic resolution.
    #[must_use]
    pub const fn isotropic(size: f64) -> Self {
        Self::Isotropic(size)
    }

    /// Creates a per-axis resolution.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InvalidParams`] when `sizes` is empty.
    pub fn per_axis(sizes: Vec<f64>) -> Result<Self, HandlerError> {
        if sizes.is_empty() {
            return Err(HandlerError::InvalidParams {
                message: String::from("per-axis resolution requires at least one axis"),
            });
        }
        Ok(Self::PerAxis(sizes))
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::Isotropic(1.0)
    }
}

// ---------------------------------------------------------------------------
// FrameConfig
// ---------------------------------------------------------------------------

/// Resolution configuration shared by every frame-kind handler.
///
/// Concrete handlers hold a `FrameConfig` field and flatten it into their
/// reconstruction parameters, so the resolution crosses the reconstruction
/// boundary with the handler. Both fields fill their documented defaults
/// when omitted from a reconstruction mapping.
///
/// # Example
///
/// ```
/// use rafter_handlers::handler::{FrameConfig, Resolution};
///
/// let config = FrameConfig::default();
/// assert_eq!(config.resolution(), &Resolution::Isotropic(1.0));
/// assert_eq!(config.resolution_units(), "pix");
///
/// let config = FrameConfig::new(Resolution::isotropic(2.5), "um");
/// assert_eq!(config.resolution_units(), "um");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    #[serde(default)]
    resolution: Resolution,
    #[serde(default = "default_resolution_units")]
    resolution_units: String,
}

fn default_resolution_units() -> String {
    String::from(DEFAULT_RESOLUTION_UNITS)
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            resolution_units: default_resolution_units(),
        }
    }
}

impl FrameConfig {
    /// Creates a configuration with an explicit resolution and units.
    #[must_use]
    pub fn new(resolution: Resolution, resolution_units: impl Into<String>) -> Self {
        Self {
            resolution,
            resolution_units: resolution_units.into(),
        }
    }

    /// Returns the axial resolution.
    #[must_use]
    pub const fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Returns the units of the axial resolution.
    #[must_use]
    pub const fn resolution_units(&self) -> &str {
        self.resolution_units.as_str()
    }

    /// Replaces the resolution and its units together.
    ///
    /// Only [`FrameSink::set_resolution`] calls this; sources treat the
    /// configuration as immutable after construction.
    pub fn set_resolution(&mut self, resolution: Resolution, resolution_units: impl Into<String>) {
        self.resolution = resolution;
        self.resolution_units = resolution_units.into();
    }
}

// ---------------------------------------------------------------------------
// FrameSource
// ---------------------------------------------------------------------------

/// Read-direction role for sequences of frames.
///
/// A frame source wraps a sequence of frames, possibly of length one.
/// Whether reads require activation is the concrete type's documented
/// choice; types that open resources guard
/// [`get_frame`](FrameSource::get_frame) with
/// [`require_active`](crate::lifecycle::require_active).
pub trait FrameSource: Source {
    /// The handler's natural frame unit.
    type Frame;

    /// Returns the resolution configuration.
    fn frame_config(&self) -> &FrameConfig;

    /// Returns the frame at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::FrameOutOfRange`] for an invalid index and
    /// [`HandlerError::InactiveState`] when the concrete type requires
    /// activation for reads.
    fn get_frame(&self, index: usize) -> Result<Self::Frame, HandlerError>;

    /// Returns the number of frames in the sequence.
    #[must_use]
    fn len(&self) -> usize;

    /// Returns `true` when the sequence holds no frames.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the axial resolution.
    #[must_use]
    fn resolution(&self) -> &Resolution {
        self.frame_config().resolution()
    }

    /// Returns the units of the axial resolution.
    #[must_use]
    fn resolution_units(&self) -> &str {
        self.frame_config().resolution_units()
    }

    /// Looks up frame-specific metadata (for example an exact timestamp).
    ///
    /// The default models the base of the lookup chain and always fails.
    /// Implementations consult their own [`MetaStore`] first and only then
    /// chain to any richer fallback, so a miss always surfaces as an error
    /// rather than a sentinel; callers rely on distinguishing "not set"
    /// from "set to an empty value".
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::KeyNotFound`] when no level of the chain
    /// defines `key`, and [`HandlerError::FrameOutOfRange`] for an invalid
    /// index.
    fn frame_metadata(&self, index: usize, key: &str) -> Result<Value, HandlerError> {
        let _ = index;
        Err(HandlerError::KeyNotFound {
            key: key.to_owned(),
        })
    }

    /// Looks up metadata global to the whole frame sequence (for example
    /// the instrument name).
    ///
    /// Same lookup policy as [`frame_metadata`](FrameSource::frame_metadata).
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::KeyNotFound`] when no level of the chain
    /// defines `key`.
    fn metadata(&self, key: &str) -> Result<Value, HandlerError> {
        Err(HandlerError::KeyNotFound {
            key: key.to_owned(),
        })
    }
}

// ---------------------------------------------------------------------------
// FrameSink
// ---------------------------------------------------------------------------

/// Write-direction role for sequences of frames.
pub trait FrameSink: Sink {
    /// The handler's natural frame unit.
    type Frame;

    /// Returns the resolution configuration.
    fn frame_config(&self) -> &FrameConfig;

    /// Returns the resolution configuration for mutation.
    fn frame_config_mut(&mut self) -> &mut FrameConfig;

    /// Records one frame under the given frame number.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InactiveState`] when the concrete type
    /// requires activation for writes, or a backend-specific error when
    /// the write fails.
    fn record_frame(
        &mut self,
        frame: Self::Frame,
        index: usize,
        metadata: Option<MetaStore>,
    ) -> Result<(), HandlerError>;

    /// Sets metadata global to all frames written into this sink.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InactiveState`] when the concrete type
    /// requires activation for writes.
    fn set_metadata(&mut self, metadata: MetaStore) -> Result<(), HandlerError>;

    /// Replaces the resolution and its units.
    ///
    /// The one sanctioned post-construction mutation of the resolution;
    /// sources have no counterpart.
    fn set_resolution(&mut self, resolution: Resolution, resolution_units: &str) {
        self.frame_config_mut()
            .set_resolution(resolution, resolution_units);
    }

    /// Returns the axial resolution.
    #[must_use]
    fn resolution(&self) -> &Resolution {
        self.frame_config().resolution()
    }

    /// Returns the units of the axial resolution.
    #[must_use]
    fn resolution_units(&self) -> &str {
        self.frame_config().resolution_units()
    }
}

// ---------------------------------------------------------------------------
// Refinements
// ---------------------------------------------------------------------------

/// Frame sources whose frames are 2-D arrays (images, slices, planes).
pub trait ImageSource: FrameSource {}

/// Frame sinks whose frames are 2-D arrays.
pub trait ImageSink: FrameSink {}

/// Frame sources whose frames are 3-D arrays (volumes).
pub trait VolumeSource: FrameSource {}

/// Image sources over raw tomographic data, traversable in the two natural
/// orders.
///
/// Enumerating either iterator and converting through the resolution maps
/// positions back to real units: sinogram index to the y coordinate,
/// projection index to the rotation angle.
pub trait TomographySource: ImageSource {
    /// Iterates sinograms, the (theta, x) planes as a function of y.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InactiveState`] when the source is not
    /// active.
    fn iter_by_sinogram(&self) -> Result<FrameIter<'_, Self::Frame>, HandlerError>;

    /// Iterates projections in acquisition order.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InactiveState`] when the source is not
    /// active.
    fn iter_by_projection(&self) -> Result<FrameIter<'_, Self::Frame>, HandlerError>;
}
