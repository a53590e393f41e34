use tracing::trace;

use crate::domain::Message;
use crate::file_source::FileSource;
use crate::grid::{GridControl, GridView};
use crate::source::RecordSource;

/// Demo host around the grid control.
///
/// Owns the source, the control and the header cursor. The widget itself is
/// selection free, so which header an activation lands on is host state.
pub struct App {
    control: GridControl,
    source: FileSource,
    view: GridView,
    cursor: usize,
    running: bool,
}

impl App {
    pub fn new(source: FileSource) -> Self {
        let mut control = GridControl::new();
        let view = control.init();
        Self {
            control,
            source,
            view,
            cursor: 0,
            running: true,
        }
    }

    /// Pulls a fresh view from the source. Called once the initial data is
    /// ready and after every dispatched message.
    pub fn refresh_view(&mut self) {
        self.view = self.control.update_view(&self.source);
        self.clamp_cursor();
    }

    pub fn view(&self) -> &GridView {
        &self.view
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn update(&mut self, message: Message) {
        trace!("Update: {message:?}");
        match message {
            Message::Quit => {
                self.running = false;
                return;
            }
            Message::CursorLeft => self.cursor = self.cursor.saturating_sub(1),
            Message::CursorRight => self.cursor += 1,
            Message::SortColumn => self.sort_cursor_column(),
            Message::NextPage => self.control.page_next(&mut self.source),
            Message::PreviousPage => self.control.page_previous(&mut self.source),
            Message::Refresh => self.source.refresh(),
        }
        self.refresh_view();
    }

    pub fn shutdown(&mut self) {
        self.control.destroy();
    }

    fn sort_cursor_column(&mut self) {
        let GridView::Populated { columns, .. } = &self.view else {
            return;
        };
        let Some(column) = columns.get(self.cursor) else {
            return;
        };
        let name = column.name.clone();
        self.control.header_click(&name, &mut self.source);
    }

    fn clamp_cursor(&mut self) {
        let count = match &self.view {
            GridView::Populated { columns, .. } => columns.len(),
            _ => 0,
        };
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::sort::SortDirection;

    fn app() -> App {
        let source = FileSource::load(PathBuf::from("tests/fixtures/people.csv"), 2, &[])
            .expect("fixture loads");
        let mut app = App::new(source);
        app.refresh_view();
        app
    }

    fn active_sorts(app: &App) -> Vec<Option<SortDirection>> {
        match app.view() {
            GridView::Populated { columns, .. } => columns.iter().map(|c| c.sort).collect(),
            other => panic!("expected populated view, got {other:?}"),
        }
    }

    #[test]
    fn starts_with_the_loading_view() {
        let source = FileSource::load(PathBuf::from("tests/fixtures/people.csv"), 2, &[])
            .expect("fixture loads");
        let app = App::new(source);
        assert_eq!(app.view(), &GridView::Loading);
    }

    #[test]
    fn quit_stops_the_run_loop() {
        let mut app = app();
        assert!(app.running());
        app.update(Message::Quit);
        assert!(!app.running());
    }

    #[test]
    fn cursor_clamps_to_the_last_column() {
        let mut app = app();
        for _ in 0..10 {
            app.update(Message::CursorRight);
        }
        assert_eq!(app.cursor(), 2);
        app.update(Message::CursorLeft);
        assert_eq!(app.cursor(), 1);
    }

    #[test]
    fn sorting_marks_the_cursor_column() {
        let mut app = app();
        app.update(Message::CursorRight);
        app.update(Message::SortColumn);
        assert_eq!(
            active_sorts(&app),
            vec![None, Some(SortDirection::Ascending), None]
        );

        app.update(Message::SortColumn);
        assert_eq!(
            active_sorts(&app),
            vec![None, Some(SortDirection::Descending), None]
        );

        app.update(Message::SortColumn);
        assert_eq!(active_sorts(&app), vec![None, None, None]);
    }

    #[test]
    fn paging_messages_move_the_window() {
        let mut app = app();
        app.update(Message::NextPage);
        let GridView::Populated { paging, .. } = app.view() else {
            panic!("expected populated view");
        };
        assert!(paging.unwrap().has_previous_page);

        app.update(Message::PreviousPage);
        let GridView::Populated { paging, .. } = app.view() else {
            panic!("expected populated view");
        };
        assert!(!paging.unwrap().has_previous_page);
    }
}
