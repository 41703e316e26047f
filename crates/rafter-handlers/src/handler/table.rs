//! Table-kind roles: handlers that move named record-arrays.

use crate::error::HandlerError;
use crate::handler::{Sink, Source};
use crate::lifecycle::require_active;

// ---------------------------------------------------------------------------
// TableSource
// ---------------------------------------------------------------------------

/// Read-direction role for named tables.
pub trait TableSource: Source {
    /// The record-array type a single table reads as.
    type Table;

    /// Enumerates the names of the tables in this source.
    ///
    /// The order is stable for a given source and defines the order of
    /// [`iter_tables`](TableSource::iter_tables).
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InactiveState`] when the concrete type
    /// requires activation to enumerate.
    fn table_names(&self) -> Result<Vec<String>, HandlerError>;

    /// Reads the table with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::KeyNotFound`] for an unknown name and
    /// [`HandlerError::InactiveState`] when the concrete type requires
    /// activation for reads.
    fn read_table(&self, name: &str) -> Result<Self::Table, HandlerError>;

    /// Lazily iterates every table in enumeration order.
    ///
    /// Each call produces a fresh iterator, so the traversal is
    /// restartable. Tables are read one at a time through
    /// [`read_table`](TableSource::read_table) as the iterator advances;
    /// the sequence is only well-defined while the source stays active, and
    /// deactivating mid-iteration surfaces through the per-item results.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InactiveState`] when the source is not
    /// active, and propagates any enumeration failure.
    fn iter_tables(&self) -> Result<TableIter<'_, Self>, HandlerError>
    where
        Self: Sized,
    {
        require_active(self, "iter_tables")?;
        Ok(TableIter {
            source: self,
            names: self.table_names()?.into_iter(),
        })
    }
}

/// Lazy iterator over every table of a [`TableSource`].
///
/// Yields one `Result` per enumerated name, reading each table on demand.
#[derive(Debug)]
pub struct TableIter<'a, S>
where
    S: TableSource,
{
    source: &'a S,
    names: std::vec::IntoIter<String>,
}

impl<S> Iterator for TableIter<'_, S>
where
    S: TableSource,
{
    type Item = Result<S::Table, HandlerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.names.next().map(|name| self.source.read_table(&name))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.names.size_hint()
    }
}

// ---------------------------------------------------------------------------
// TableSink
// ---------------------------------------------------------------------------

/// Write-direction role for named tables.
pub trait TableSink: Sink {
    /// The record-array type a single table writes as.
    type Table;

    /// Writes a table under the given name.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InactiveState`] when the concrete type
    /// requires activation for writes, or a backend-specific error when
    /// the write fails.
    fn write_table(&mut self, table: Self::Table, name: &str) -> Result<(), HandlerError>;
}
