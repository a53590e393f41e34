use std::fmt;

use crate::columns::ColumnDescriptor;
use crate::sort::SortDirective;

/// Opaque identifier of a record within its source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-row data handle supporting formatted-value lookup by column name.
/// A missing value is a normal empty-cell case, not an error.
pub trait Record {
    fn formatted_value(&self, column: &str) -> Option<String>;
}

/// Paging snapshot of the source, rebuilt every render cycle and never cached
/// across renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingInfo {
    pub total_result_count: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Boundary to the externally owned, windowed record set.
///
/// The accessors describe the current snapshot. The commands only request a
/// new one: their effect is observed through the next snapshot, never through
/// a return value. The grid holds no callback into the source.
pub trait RecordSource {
    /// True while the source has a load pending.
    fn loading(&self) -> bool;

    /// Raw column descriptors, unfiltered and unordered.
    fn columns(&self) -> Vec<ColumnDescriptor>;

    /// Record ids of the current page, in the source's display order.
    fn sorted_record_ids(&self) -> Vec<RecordId>;

    /// Resolves a record id from the current page.
    fn record(&self, id: &RecordId) -> Option<&dyn Record>;

    /// Paging capability of the source, if it pages at all.
    fn paging(&self) -> Option<PagingInfo>;

    /// Replaces the source's sort configuration. At most one directive; the
    /// empty list clears any previously applied sort.
    fn apply_sort(&mut self, directives: &[SortDirective]);

    /// Requests a reload under the current sort configuration.
    fn refresh(&mut self);

    fn load_next_page(&mut self);

    fn load_previous_page(&mut self);
}
