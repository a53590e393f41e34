use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, Table, Widget},
};

use crate::domain::GridConfig;
use crate::grid::{GridView, HeaderView, RowView};
use crate::sort::SortDirection;
use crate::source::PagingInfo;

pub fn draw(frame: &mut Frame, view: &GridView, cursor: usize, config: &GridConfig) {
    frame.render_widget(
        GridWidget {
            view,
            cursor,
            max_column_width: config.max_column_width,
        },
        frame.area(),
    );
}

/// Draws one complete `GridView`. The whole surface is overwritten on every
/// frame, the previous content is never patched.
///
/// The header cursor is host state and only influences highlighting.
pub struct GridWidget<'a> {
    pub view: &'a GridView,
    pub cursor: usize,
    pub max_column_width: usize,
}

impl Widget for GridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = Line::from(" dg ".bold());
        let instructions = Line::from(vec![
            " Sort ".into(),
            "<Enter>".blue().bold(),
            " Page ".into(),
            "<p/n>".blue().bold(),
            " Quit ".into(),
            "<q> ".blue().bold(),
        ]);
        let block = Block::bordered()
            .title(title.centered())
            .title_bottom(instructions.centered())
            .border_set(border::THICK);
        let inner = block.inner(area);
        block.render(area, buf);

        match self.view {
            GridView::Loading => {
                // No header, rows or paging bar while a load is pending.
                Paragraph::new("Loading data…").centered().render(inner, buf);
            }
            GridView::Empty { paging } => {
                let [body, bar] = split_paging(inner, paging);
                Paragraph::new("No records to display.")
                    .centered()
                    .render(body, buf);
                if let Some(info) = paging {
                    paging_line(info).render(bar, buf);
                }
            }
            GridView::Populated {
                columns,
                rows,
                paging,
            } => {
                let [body, bar] = split_paging(inner, paging);
                self.render_table(columns, rows, body, buf);
                if let Some(info) = paging {
                    paging_line(info).render(bar, buf);
                }
            }
        }
    }
}

impl GridWidget<'_> {
    fn render_table(&self, columns: &[HeaderView], rows: &[RowView], area: Rect, buf: &mut Buffer) {
        let header_cells: Vec<Cell> = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let span = Span::from(header_label(column));
                let span = if idx == self.cursor {
                    span.reversed()
                } else {
                    span.bold()
                };
                Cell::from(span)
            })
            .collect();
        let header = Row::new(header_cells);

        let body = rows
            .iter()
            .map(|row| Row::new(row.cells.iter().map(|cell| Cell::from(cell.as_str()))));

        let widths = self.column_widths(columns, rows);
        Table::new(body, widths)
            .header(header)
            .column_spacing(1)
            .render(area, buf);
    }

    fn column_widths(&self, columns: &[HeaderView], rows: &[RowView]) -> Vec<Constraint> {
        columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                // Room for the display name plus the sort marker.
                let mut width = column.display_name.chars().count() + 2;
                for row in rows {
                    if let Some(cell) = row.cells.get(idx) {
                        width = width.max(cell.chars().count());
                    }
                }
                Constraint::Length(width.min(self.max_column_width) as u16)
            })
            .collect()
    }
}

// The paging bar is only allotted space when paging info exists at all.
fn split_paging(area: Rect, paging: &Option<PagingInfo>) -> [Rect; 2] {
    let bar_height = if paging.is_some() { 1 } else { 0 };
    Layout::vertical([Constraint::Min(0), Constraint::Length(bar_height)]).areas(area)
}

fn header_label(column: &HeaderView) -> String {
    match column.sort {
        Some(SortDirection::Ascending) => format!("{} ▲", column.display_name),
        Some(SortDirection::Descending) => format!("{} ▼", column.display_name),
        None => column.display_name.clone(),
    }
}

fn paging_line(info: &PagingInfo) -> Line<'static> {
    let previous = if info.has_previous_page {
        "← Previous".bold()
    } else {
        "← Previous".dim()
    };
    let next = if info.has_next_page {
        "Next →".bold()
    } else {
        "Next →".dim()
    };
    Line::from(vec![
        Span::from(format!("Total records: {}", info.total_result_count)),
        Span::from("   "),
        previous,
        Span::from("  "),
        next,
    ])
}
