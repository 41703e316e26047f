//! Distribution-kind roles: handlers that move binned distributions.
//!
//! A distribution is a pair of arrays, `bin_edges` and `bin_values`. Edges
//! are monotonic and increasing. The edges array either matches the values
//! array in length, denoting the left edge of each bin, or carries one
//! extra element marking the right edge of the last bin.

use crate::error::HandlerError;
use crate::handler::{Sink, Source};

/// Read-direction role for binned distributions.
pub trait DistributionSource: Source {
    /// Returns the value of each bin.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InactiveState`] when the concrete type
    /// requires activation for reads.
    fn bin_values(&self) -> Result<Vec<f64>, HandlerError>;

    /// Returns the location of the bin edges.
    ///
    /// With `include_right` set, the right edge of the last bin is appended
    /// as the final element.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InactiveState`] when the concrete type
    /// requires activation for reads.
    fn bin_edges(&self, include_right: bool) -> Result<Vec<f64>, HandlerError>;

    /// Returns the centre of each bin.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InactiveState`] when the concrete type
    /// requires activation for reads.
    fn bin_centers(&self) -> Result<Vec<f64>, HandlerError>;
}

/// Write-direction role for binned distributions.
pub trait DistributionSink: Sink {
    /// Sinks the bin edges and values.
    ///
    /// With `right_edge` set, `edges` carries the right edge of the last
    /// bin as its final element and is one longer than `values`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InactiveState`] when the concrete type
    /// requires activation for writes, or
    /// [`HandlerError::InvalidParams`] when the array lengths do not agree
    /// with `right_edge`.
    fn write_distribution(
        &mut self,
        edges: &[f64],
        values: &[f64],
        right_edge: bool,
    ) -> Result<(), HandlerError>;
}
