use tracing::{debug, trace};

use crate::columns::visible_columns;
use crate::sort::{SortDirection, SortState};
use crate::source::{PagingInfo, RecordId, RecordSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Ready,
}

/// Header cell of the rendered grid. The direction marker is only set on the
/// currently active sort column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub name: String,
    pub display_name: String,
    pub sort: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: RecordId,
    pub cells: Vec<String>,
}

/// Everything the renderer needs for one full redraw. Each update replaces
/// the previous view wholesale, there is no diffing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridView {
    Loading,
    Empty {
        paging: Option<PagingInfo>,
    },
    Populated {
        columns: Vec<HeaderView>,
        rows: Vec<RowView>,
        paging: Option<PagingInfo>,
    },
}

/// The embeddable grid control.
///
/// Owns the sort criterion for its whole lifetime; everything else is read
/// fresh from the source on every [`GridControl::update_view`]. Sorting is
/// not an output of the control, it mutates the external source directly.
pub struct GridControl {
    phase: Phase,
    sort: SortState,
}

impl GridControl {
    pub fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
            sort: SortState::default(),
        }
    }

    /// Activates the control and hands back the loading view, so the host can
    /// paint a placeholder before the first data snapshot is available.
    pub fn init(&mut self) -> GridView {
        self.phase = Phase::Ready;
        GridView::Loading
    }

    /// Builds a fresh view from the current source snapshot. This is the sole
    /// driver of re-rendering; the host calls it on every data change.
    ///
    /// Phases are gated in order: a pending load short-circuits everything,
    /// then no visible columns or no records yields the empty view (still
    /// carrying the paging snapshot), otherwise the grid is populated.
    pub fn update_view(&self, source: &dyn RecordSource) -> GridView {
        if self.phase != Phase::Ready {
            debug!("update_view on an inactive control");
            return GridView::Loading;
        }
        if source.loading() {
            return GridView::Loading;
        }

        let columns = visible_columns(&source.columns());
        let ids = source.sorted_record_ids();
        let paging = source.paging();

        if columns.is_empty() || ids.is_empty() {
            return GridView::Empty { paging };
        }

        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(record) = source.record(&id) else {
                // Stale id in the snapshot. Skip the row instead of failing
                // the whole render.
                debug!("Record {id} missing from source, skipping row");
                continue;
            };
            let cells = columns
                .iter()
                .map(|c| record.formatted_value(&c.name).unwrap_or_default())
                .collect();
            rows.push(RowView { id, cells });
        }

        let columns = columns
            .into_iter()
            .map(|c| HeaderView {
                sort: self.sort.direction_of(&c.name),
                name: c.name,
                display_name: c.display_name,
            })
            .collect();

        GridView::Populated {
            columns,
            rows,
            paging,
        }
    }

    /// Header activation: advance the sort cycle, push the directive list to
    /// the source and request a reload, in that order, on every activation.
    /// An empty directive list is pushed too, it clears the source's sort.
    pub fn header_click(&mut self, column: &str, source: &mut dyn RecordSource) {
        if self.phase != Phase::Ready {
            return;
        }
        let (next, directives) = self.sort.cycle(column);
        trace!("Sort cycle on {column}: {:?} -> {next:?}", self.sort);
        self.sort = next;
        source.apply_sort(&directives);
        source.refresh();
    }

    /// Forwards to the source's next-page command when a next page exists.
    /// No local state changes, the resulting reload drives the next view.
    pub fn page_next(&self, source: &mut dyn RecordSource) {
        if self.phase != Phase::Ready {
            return;
        }
        if source.paging().is_some_and(|p| p.has_next_page) {
            source.load_next_page();
        }
    }

    pub fn page_previous(&self, source: &mut dyn RecordSource) {
        if self.phase != Phase::Ready {
            return;
        }
        if source.paging().is_some_and(|p| p.has_previous_page) {
            source.load_previous_page();
        }
    }

    /// Detaches the control from input. The rendering surface stays with the
    /// host, no other teardown happens.
    pub fn destroy(&mut self) {
        self.phase = Phase::Uninitialized;
    }
}

impl Default for GridControl {
    fn default() -> Self {
        Self::new()
    }
}
