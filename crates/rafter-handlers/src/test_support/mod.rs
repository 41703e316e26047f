//! In-memory reference handlers.
//!
//! One concrete handler per role pairing, holding its payload entirely in
//! memory. They exist so this crate's own tests — and backend crates
//! enabling the `test-support` feature — can exercise the lifecycle,
//! reconstruction, and discovery contracts without a storage backend.
//!
//! For these types the payload itself is a construction parameter, so a
//! captured source round-trips with its data. Sinks capture only their
//! configuration: written data is live output, not a constructor argument.
//! All reads and writes require activation; repeated activation is a no-op.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::discovery::{HandlerType, RoleId};
use crate::error::HandlerError;
use crate::handler::{
    DataHandler, DistributionSink, DistributionSource, FrameConfig, FrameSink, FrameSource, Sink,
    Source, TableSink, TableSource,
};
use crate::lifecycle::{Lifecycle, require_active};
use crate::metadata::MetaStore;
use crate::params::Reconstruct;

// ---------------------------------------------------------------------------
// MemFrameSource
// ---------------------------------------------------------------------------

/// Frame source over an in-memory sequence of 1-D frames.
#[derive(Debug, Clone, PartialEq)]
pub struct MemFrameSource {
    lifecycle: Lifecycle,
    config: FrameConfig,
    frames: Vec<Vec<f64>>,
    frame_meta: Vec<MetaStore>,
    global_meta: MetaStore,
}

/// Reconstruction parameters for [`MemFrameSource`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemFrameSourceParams {
    /// Resolution configuration, flattened into the mapping.
    #[serde(flatten)]
    pub config: FrameConfig,
    /// The frame payloads, in frame order.
    #[serde(default)]
    pub frames: Vec<Vec<f64>>,
    /// Per-frame metadata, one store per frame. Empty means no metadata.
    #[serde(default)]
    pub frame_metadata: Vec<MetaStore>,
    /// Metadata global to the whole sequence.
    #[serde(default)]
    pub metadata: MetaStore,
}

impl MemFrameSource {
    /// Creates a source over the given frames with empty metadata.
    #[must_use]
    pub fn new(config: FrameConfig, frames: Vec<Vec<f64>>) -> Self {
        let frame_meta = vec![MetaStore::new(); frames.len()];
        Self {
            lifecycle: Lifecycle::new(),
            config,
            frames,
            frame_meta,
            global_meta: MetaStore::new(),
        }
    }

    /// Attaches per-frame metadata, one store per frame.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InvalidParams`] when the store count does
    /// not match the frame count.
    pub fn with_frame_metadata(mut self, frame_meta: Vec<MetaStore>) -> Result<Self, HandlerError> {
        if frame_meta.len() != self.frames.len() {
            return Err(HandlerError::InvalidParams {
                message: format!(
                    "expected {} frame metadata stores, got {}",
                    self.frames.len(),
                    frame_meta.len()
                ),
            });
        }
        self.frame_meta = frame_meta;
        Ok(self)
    }

    /// Attaches global metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: MetaStore) -> Self {
        self.global_meta = metadata;
        self
    }
}

impl DataHandler for MemFrameSource {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

impl Source for MemFrameSource {}

impl FrameSource for MemFrameSource {
    type Frame = Vec<f64>;

    fn frame_config(&self) -> &FrameConfig {
        &self.config
    }

    fn get_frame(&self, index: usize) -> Result<Vec<f64>, HandlerError> {
        require_active(self, "get_frame")?;
        self.frames
            .get(index)
            .cloned()
            .ok_or(HandlerError::FrameOutOfRange {
                index,
                len: self.frames.len(),
            })
    }

    fn len(&self) -> usize {
        self.frames.len()
    }

    fn frame_metadata(&self, index: usize, key: &str) -> Result<Value, HandlerError> {
        require_active(self, "frame_metadata")?;
        let store = self
            .frame_meta
            .get(index)
            .ok_or(HandlerError::FrameOutOfRange {
                index,
                len: self.frames.len(),
            })?;
        store.lookup(key)
    }

    fn metadata(&self, key: &str) -> Result<Value, HandlerError> {
        self.global_meta.lookup(key)
    }
}

impl Reconstruct for MemFrameSource {
    type Params = MemFrameSourceParams;

    fn params(&self) -> MemFrameSourceParams {
        MemFrameSourceParams {
            config: self.config.clone(),
            frames: self.frames.clone(),
            frame_metadata: self.frame_meta.clone(),
            metadata: self.global_meta.clone(),
        }
    }

    fn from_params(params: MemFrameSourceParams) -> Result<Self, HandlerError> {
        let mut source = Self::new(params.config, params.frames);
        if !params.frame_metadata.is_empty() {
            source = source.with_frame_metadata(params.frame_metadata)?;
        }
        Ok(source.with_metadata(params.metadata))
    }
}

impl HandlerType for MemFrameSource {
    fn roles() -> &'static [RoleId] {
        &[RoleId::Source, RoleId::Frame]
    }
}

// ---------------------------------------------------------------------------
// MemFrameSink
// ---------------------------------------------------------------------------

/// Frame sink accumulating 1-D frames in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemFrameSink {
    lifecycle: Lifecycle,
    config: FrameConfig,
    frames: Vec<(usize, Vec<f64>, MetaStore)>,
    global_meta: MetaStore,
}

/// Reconstruction parameters for [`MemFrameSink`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemFrameSinkParams {
    /// Resolution configuration, flattened into the mapping.
    #[serde(flatten)]
    pub config: FrameConfig,
}

impl MemFrameSink {
    /// Creates an empty sink with the given configuration.
    #[must_use]
    pub fn new(config: FrameConfig) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            config,
            frames: Vec::new(),
            global_meta: MetaStore::new(),
        }
    }
}

impl DataHandler for MemFrameSink {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

impl Sink for MemFrameSink {
    type Source = MemFrameSource;

    fn make_source(&self) -> Result<MemFrameSource, HandlerError> {
        let mut ordered = self.frames.clone();
        ordered.sort_by_key(|(index, _, _)| *index);
        let frames = ordered.iter().map(|(_, frame, _)| frame.clone()).collect();
        let frame_meta: Vec<MetaStore> = ordered.into_iter().map(|(_, _, meta)| meta).collect();
        MemFrameSource::new(self.config.clone(), frames)
            .with_frame_metadata(frame_meta)
            .map(|source| source.with_metadata(self.global_meta.clone()))
    }
}

impl FrameSink for MemFrameSink {
    type Frame = Vec<f64>;

    fn frame_config(&self) -> &FrameConfig {
        &self.config
    }

    fn frame_config_mut(&mut self) -> &mut FrameConfig {
        &mut self.config
    }

    fn record_frame(
        &mut self,
        frame: Vec<f64>,
        index: usize,
        metadata: Option<MetaStore>,
    ) -> Result<(), HandlerError> {
        require_active(self, "record_frame")?;
        self.frames
            .push((index, frame, metadata.unwrap_or_default()));
        Ok(())
    }

    fn set_metadata(&mut self, metadata: MetaStore) -> Result<(), HandlerError> {
        self.global_meta = metadata;
        Ok(())
    }
}

impl Reconstruct for MemFrameSink {
    type Params = MemFrameSinkParams;

    fn params(&self) -> MemFrameSinkParams {
        MemFrameSinkParams {
            config: self.config.clone(),
        }
    }

    fn from_params(params: MemFrameSinkParams) -> Result<Self, HandlerError> {
        Ok(Self::new(params.config))
    }
}

impl HandlerType for MemFrameSink {
    fn roles() -> &'static [RoleId] {
        &[RoleId::Sink, RoleId::Frame]
    }
}

// ---------------------------------------------------------------------------
// MemTableSource
// ---------------------------------------------------------------------------

/// Table source over in-memory named tables.
///
/// Tables are JSON values standing in for record-arrays; enumeration order
/// is construction order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemTableSource {
    lifecycle: Lifecycle,
    tables: Vec<(String, Value)>,
}

/// Reconstruction parameters for [`MemTableSource`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemTableSourceParams {
    /// Named tables in enumeration order.
    #[serde(default)]
    pub tables: Vec<(String, Value)>,
}

impl MemTableSource {
    /// Creates a source over the given named tables.
    #[must_use]
    pub const fn new(tables: Vec<(String, Value)>) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            tables,
        }
    }
}

impl DataHandler for MemTableSource {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

impl Source for MemTableSource {}

impl TableSource for MemTableSource {
    type Table = Value;

    fn table_names(&self) -> Result<Vec<String>, HandlerError> {
        Ok(self.tables.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read_table(&self, name: &str) -> Result<Value, HandlerError> {
        require_active(self, "read_table")?;
        self.tables
            .iter()
            .find(|(table_name, _)| table_name == name)
            .map(|(_, table)| table.clone())
            .ok_or_else(|| HandlerError::KeyNotFound {
                key: name.to_owned(),
            })
    }
}

impl Reconstruct for MemTableSource {
    type Params = MemTableSourceParams;

    fn params(&self) -> MemTableSourceParams {
        MemTableSourceParams {
            tables: self.tables.clone(),
        }
    }

    fn from_params(params: MemTableSourceParams) -> Result<Self, HandlerError> {
        Ok(Self::new(params.tables))
    }
}

impl HandlerType for MemTableSource {
    fn roles() -> &'static [RoleId] {
        &[RoleId::Source, RoleId::Table]
    }
}

// ---------------------------------------------------------------------------
// MemTableSink
// ---------------------------------------------------------------------------

/// Table sink accumulating named tables in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemTableSink {
    lifecycle: Lifecycle,
    tables: Vec<(String, Value)>,
}

/// Reconstruction parameters for [`MemTableSink`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemTableSinkParams {}

impl MemTableSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataHandler for MemTableSink {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

impl Sink for MemTableSink {
    type Source = MemTableSource;

    fn make_source(&self) -> Result<MemTableSource, HandlerError> {
        Ok(MemTableSource::new(self.tables.clone()))
    }
}

impl TableSink for MemTableSink {
    type Table = Value;

    fn write_table(&mut self, table: Value, name: &str) -> Result<(), HandlerError> {
        require_active(self, "write_table")?;
        self.tables.retain(|(table_name, _)| table_name != name);
        self.tables.push((name.to_owned(), table));
        Ok(())
    }
}

impl Reconstruct for MemTableSink {
    type Params = MemTableSinkParams;

    fn params(&self) -> MemTableSinkParams {
        MemTableSinkParams {}
    }

    fn from_params(_params: MemTableSinkParams) -> Result<Self, HandlerError> {
        Ok(Self::new())
    }
}

impl HandlerType for MemTableSink {
    fn roles() -> &'static [RoleId] {
        &[RoleId::Sink, RoleId::Table]
    }
}

// ---------------------------------------------------------------------------
// MemDistributionSource
// ---------------------------------------------------------------------------

/// Distribution source over an in-memory binned distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct MemDistributionSource {
    lifecycle: Lifecycle,
    edges: Vec<f64>,
    values: Vec<f64>,
    right_edge: bool,
}

/// Reconstruction parameters for [`MemDistributionSource`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemDistributionSourceParams {
    /// Bin edge locations.
    pub edges: Vec<f64>,
    /// Bin values.
    pub values: Vec<f64>,
    /// Whether `edges` carries the right edge of the last bin.
    #[serde(default)]
    pub right_edge: bool,
}

impl MemDistributionSource {
    /// Creates a source over the given distribution.
    ///
    /// With `right_edge` set, `edges` must be one longer than `values`;
    /// otherwise the lengths must match.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InvalidParams`] when the lengths disagree
    /// with `right_edge`.
    pub fn new(edges: Vec<f64>, values: Vec<f64>, right_edge: bool) -> Result<Self, HandlerError> {
        check_distribution_shape(&edges, &values, right_edge)?;
        Ok(Self {
            lifecycle: Lifecycle::new(),
            edges,
            values,
            right_edge,
        })
    }
}

impl DataHandler for MemDistributionSource {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

impl Source for MemDistributionSource {}

impl DistributionSource for MemDistributionSource {
    fn bin_values(&self) -> Result<Vec<f64>, HandlerError> {
        require_active(self, "bin_values")?;
        Ok(self.values.clone())
    }

    fn bin_edges(&self, include_right: bool) -> Result<Vec<f64>, HandlerError> {
        require_active(self, "bin_edges")?;
        if include_right && !self.right_edge {
            return Err(HandlerError::InvalidParams {
                message: String::from("right edge of the last bin was not recorded"),
            });
        }
        if self.right_edge && !include_right {
            let mut edges = self.edges.clone();
            edges.pop();
            return Ok(edges);
        }
        Ok(self.edges.clone())
    }

    fn bin_centers(&self) -> Result<Vec<f64>, HandlerError> {
        require_active(self, "bin_centers")?;
        if !self.right_edge {
            return Err(HandlerError::InvalidParams {
                message: String::from("bin centres require the right edge of the last bin"),
            });
        }
        Ok(self
            .edges
            .iter()
            .zip(self.edges.iter().skip(1))
            .map(|(left, right)| left.midpoint(*right))
            .collect())
    }
}

impl Reconstruct for MemDistributionSource {
    type Params = MemDistributionSourceParams;

    fn params(&self) -> MemDistributionSourceParams {
        MemDistributionSourceParams {
            edges: self.edges.clone(),
            values: self.values.clone(),
            right_edge: self.right_edge,
        }
    }

    fn from_params(params: MemDistributionSourceParams) -> Result<Self, HandlerError> {
        Self::new(params.edges, params.values, params.right_edge)
    }
}

impl HandlerType for MemDistributionSource {
    fn roles() -> &'static [RoleId] {
        &[RoleId::Source, RoleId::Distribution]
    }
}

// ---------------------------------------------------------------------------
// MemDistributionSink
// ---------------------------------------------------------------------------

/// Distribution sink holding at most one distribution in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemDistributionSink {
    lifecycle: Lifecycle,
    recorded: Option<(Vec<f64>, Vec<f64>, bool)>,
}

/// Reconstruction parameters for [`MemDistributionSink`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemDistributionSinkParams {}

impl MemDistributionSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataHandler for MemDistributionSink {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

impl Sink for MemDistributionSink {
    type Source = MemDistributionSource;

    fn make_source(&self) -> Result<MemDistributionSource, HandlerError> {
        let (edges, values, right_edge) =
            self.recorded
                .as_ref()
                .ok_or_else(|| HandlerError::InvalidParams {
                    message: String::from("no distribution recorded"),
                })?;
        MemDistributionSource::new(edges.clone(), values.clone(), *right_edge)
    }
}

impl DistributionSink for MemDistributionSink {
    fn write_distribution(
        &mut self,
        edges: &[f64],
        values: &[f64],
        right_edge: bool,
    ) -> Result<(), HandlerError> {
        require_active(self, "write_distribution")?;
        check_distribution_shape(edges, values, right_edge)?;
        self.recorded = Some((edges.to_vec(), values.to_vec(), right_edge));
        Ok(())
    }
}

impl Reconstruct for MemDistributionSink {
    type Params = MemDistributionSinkParams;

    fn params(&self) -> MemDistributionSinkParams {
        MemDistributionSinkParams {}
    }

    fn from_params(_params: MemDistributionSinkParams) -> Result<Self, HandlerError> {
        Ok(Self::new())
    }
}

impl HandlerType for MemDistributionSink {
    fn roles() -> &'static [RoleId] {
        &[RoleId::Sink, RoleId::Distribution]
    }
}

/// Validates the edge/value length relationship for a distribution.
fn check_distribution_shape(
    edges: &[f64],
    values: &[f64],
    right_edge: bool,
) -> Result<(), HandlerError> {
    let expected = if right_edge {
        values.len().saturating_add(1)
    } else {
        values.len()
    };
    if edges.len() == expected {
        Ok(())
    } else {
        Err(HandlerError::InvalidParams {
            message: format!(
                "expected {expected} bin edges for {} values (right_edge = {right_edge}), got {}",
                values.len(),
                edges.len()
            ),
        })
    }
}
