use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::columns::ColumnDescriptor;
use crate::domain::GridError;
use crate::sort::{SortDirection, SortDirective};
use crate::source::{PagingInfo, Record, RecordId, RecordSource};

#[derive(Debug)]
enum FileType {
    CSV,
    PARQUET,
    ARROW,
}

struct ColumnMeta {
    name: String,
    numeric: bool,
    hidden: bool,
}

struct LoadedColumn {
    name: String,
    numeric: bool,
    values: Vec<Option<String>>,
}

struct FileRecord {
    columns: Arc<HashMap<String, usize>>,
    cells: Vec<Option<String>>,
}

impl Record for FileRecord {
    fn formatted_value(&self, column: &str) -> Option<String> {
        let idx = *self.columns.get(column)?;
        self.cells.get(idx).and_then(|value| value.clone())
    }
}

/// A windowed record source backed by a tabular data file.
///
/// The whole file is materialized as display strings at load time; sort
/// directives reorder the full row set and pages are fixed-size windows over
/// that order. Record ids are row positions in file order, so they stay
/// stable across re-sorts.
pub struct FileSource {
    columns: Vec<ColumnMeta>,
    column_index: Arc<HashMap<String, usize>>,
    records: Vec<FileRecord>,
    order: Vec<usize>,
    sorting: Vec<SortDirective>,
    applied: Vec<SortDirective>,
    page_start: usize,
    page_size: usize,
}

impl FileSource {
    pub fn load(path: PathBuf, page_size: usize, hidden: &[String]) -> Result<Self, GridError> {
        let file_type = inspect_file(&path)?;
        debug!("Loading {path:?} as {file_type:?}");
        let frame = match file_type {
            FileType::CSV => load_csv(&path)?,
            FileType::PARQUET => load_parquet(&path)?,
            FileType::ARROW => load_arrow(&path)?,
        };

        // Each column is cast and pre-formatted in its own rayon task; all
        // cell data lives in memory as strings afterwards.
        let start_time = Instant::now();
        let df = frame.collect()?;
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let loaded: Result<Vec<LoadedColumn>, PolarsError> = names
            .par_iter()
            .map(|name| load_column(&df, name))
            .collect();
        let mut loaded = loaded?;
        info!(
            "Loaded {} rows x {} columns in {}ms",
            df.height(),
            loaded.len(),
            start_time.elapsed().as_millis()
        );

        let columns: Vec<ColumnMeta> = loaded
            .iter()
            .map(|column| ColumnMeta {
                name: column.name.clone(),
                numeric: column.numeric,
                hidden: hidden.iter().any(|h| h == &column.name),
            })
            .collect();
        let column_index: Arc<HashMap<String, usize>> = Arc::new(
            columns
                .iter()
                .enumerate()
                .map(|(idx, column)| (column.name.clone(), idx))
                .collect(),
        );

        let mut cells: Vec<Vec<Option<String>>> = (0..df.height())
            .map(|_| Vec::with_capacity(columns.len()))
            .collect();
        for column in &mut loaded {
            for (row, value) in column.values.drain(..).enumerate() {
                cells[row].push(value);
            }
        }
        let records: Vec<FileRecord> = cells
            .into_iter()
            .map(|cells| FileRecord {
                columns: Arc::clone(&column_index),
                cells,
            })
            .collect();

        let order = (0..records.len()).collect();
        Ok(Self {
            columns,
            column_index,
            records,
            order,
            sorting: Vec::new(),
            applied: Vec::new(),
            page_start: 0,
            // A page size of zero could never advance.
            page_size: page_size.max(1),
        })
    }

    fn window(&self) -> &[usize] {
        let begin = self.page_start.min(self.order.len());
        let end = (begin + self.page_size).min(self.order.len());
        &self.order[begin..end]
    }
}

impl RecordSource for FileSource {
    fn loading(&self) -> bool {
        // Everything is resident once construction succeeded.
        false
    }

    fn columns(&self) -> Vec<ColumnDescriptor> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| ColumnDescriptor {
                name: column.name.clone(),
                display_name: column.name.replace('_', " "),
                order: idx as i32,
                is_hidden: column.hidden,
            })
            .collect()
    }

    fn sorted_record_ids(&self) -> Vec<RecordId> {
        self.window()
            .iter()
            .map(|row| RecordId::new(row.to_string()))
            .collect()
    }

    fn record(&self, id: &RecordId) -> Option<&dyn Record> {
        let row: usize = id.as_str().parse().ok()?;
        self.records.get(row).map(|record| record as &dyn Record)
    }

    fn paging(&self) -> Option<PagingInfo> {
        Some(PagingInfo {
            total_result_count: self.records.len(),
            has_next_page: self.page_start + self.page_size < self.order.len(),
            has_previous_page: self.page_start > 0,
        })
    }

    fn apply_sort(&mut self, directives: &[SortDirective]) {
        trace!("Sort configuration replaced: {directives:?}");
        self.sorting = directives.to_vec();
    }

    fn refresh(&mut self) {
        let mut order: Vec<usize> = (0..self.records.len()).collect();
        if let Some(directive) = self.sorting.first()
            && let Some(&column) = self.column_index.get(&directive.name)
        {
            let numeric = self.columns[column].numeric;
            let ascending = directive.direction == SortDirection::Ascending;
            order.sort_by(|&a, &b| {
                compare_cells(
                    self.records[a].cells[column].as_deref(),
                    self.records[b].cells[column].as_deref(),
                    numeric,
                    ascending,
                )
            });
        }
        self.order = order;

        // A changed criterion starts reading from the first window again.
        if self.sorting != self.applied {
            self.page_start = 0;
            self.applied = self.sorting.clone();
        }
    }

    fn load_next_page(&mut self) {
        if self.page_start + self.page_size < self.order.len() {
            self.page_start += self.page_size;
        }
    }

    fn load_previous_page(&mut self) {
        self.page_start = self.page_start.saturating_sub(self.page_size);
    }
}

// Numeric columns compare as floats with parse failures ordered last, all
// other columns compare as strings. Nulls always sort last.
fn compare_cells(a: Option<&str>, b: Option<&str>, numeric: bool, ascending: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if numeric => {
            let a_val: Result<f64, _> = a.parse();
            let b_val: Result<f64, _> = b.parse();
            match (a_val, b_val) {
                (Ok(a_float), Ok(b_float)) => {
                    if ascending {
                        a_float.partial_cmp(&b_float).unwrap_or(Ordering::Equal)
                    } else {
                        b_float.partial_cmp(&a_float).unwrap_or(Ordering::Equal)
                    }
                }
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => {
                    if ascending {
                        a.cmp(b)
                    } else {
                        b.cmp(a)
                    }
                }
            }
        }
        (Some(a), Some(b)) => {
            if ascending {
                a.cmp(b)
            } else {
                b.cmp(a)
            }
        }
    }
}

fn load_column(df: &DataFrame, name: &str) -> Result<LoadedColumn, PolarsError> {
    let dtype = df.column(name)?.dtype().clone();
    let col = df.column(name)?.cast(&DataType::String)?;
    let series = col.str()?;
    let mut values = Vec::with_capacity(series.len());
    for value in series.into_iter() {
        values.push(value.map(|s| s.replace("\r\n", " ↵ ").replace('\n', " ↵ ")));
    }
    Ok(LoadedColumn {
        name: name.to_string(),
        numeric: is_numeric_type(&dtype),
        values,
    })
}

fn is_numeric_type(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn inspect_file(path: &Path) -> Result<FileType, GridError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GridError::FileNotFound,
        ErrorKind::PermissionDenied => GridError::PermissionDenied,
        _ => GridError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(GridError::LoadingFailed("Not a file!".into()));
    }
    detect_file_type(path)
}

fn detect_file_type(path: &Path) -> Result<FileType, GridError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::CSV),
        Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
        _ => Err(GridError::UnknownFileType),
    }
}

fn load_csv(path: &PathBuf) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.as_path().into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &PathBuf) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(
        PlPath::Local(path.as_path().into()),
        ScanArgsParquet::default(),
    )
}

fn load_arrow(path: &PathBuf) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.as_path().into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(page_size: usize) -> FileSource {
        FileSource::load(
            PathBuf::from("tests/fixtures/people.csv"),
            page_size,
            &[],
        )
        .expect("fixture loads")
    }

    fn ids(source: &FileSource) -> Vec<String> {
        source
            .sorted_record_ids()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect()
    }

    fn directive(name: &str, direction: SortDirection) -> SortDirective {
        SortDirective {
            name: name.to_string(),
            direction,
        }
    }

    #[test]
    fn columns_come_out_in_schema_order() {
        let source = fixture(2);
        let columns = source.columns();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["name", "email", "age"]);
        assert_eq!(columns[0].order, 0);
        assert_eq!(columns[2].order, 2);
        assert!(columns.iter().all(|c| !c.is_hidden));
    }

    #[test]
    fn hidden_names_are_marked_hidden() {
        let source = FileSource::load(
            PathBuf::from("tests/fixtures/people.csv"),
            2,
            &["email".to_string()],
        )
        .expect("fixture loads");
        let columns = source.columns();
        assert!(columns.iter().find(|c| c.name == "email").unwrap().is_hidden);
        assert!(!columns.iter().find(|c| c.name == "name").unwrap().is_hidden);
    }

    #[test]
    fn first_window_and_paging_flags() {
        let source = fixture(2);
        assert_eq!(ids(&source), vec!["0", "1"]);
        let paging = source.paging().unwrap();
        assert_eq!(paging.total_result_count, 5);
        assert!(paging.has_next_page);
        assert!(!paging.has_previous_page);
    }

    #[test]
    fn paging_walks_forward_and_back() {
        let mut source = fixture(2);
        source.load_next_page();
        assert_eq!(ids(&source), vec!["2", "3"]);
        assert!(source.paging().unwrap().has_previous_page);

        source.load_next_page();
        assert_eq!(ids(&source), vec!["4"]);
        assert!(!source.paging().unwrap().has_next_page);

        // Walking past the last window changes nothing.
        source.load_next_page();
        assert_eq!(ids(&source), vec!["4"]);

        source.load_previous_page();
        source.load_previous_page();
        assert_eq!(ids(&source), vec!["0", "1"]);
    }

    #[test]
    fn numeric_sort_orders_by_value() {
        let mut source = fixture(2);
        source.apply_sort(&[directive("age", SortDirection::Ascending)]);
        source.refresh();
        // Bob 25, Eve 29 lead the ascending order.
        assert_eq!(ids(&source), vec!["2", "4"]);

        source.apply_sort(&[directive("age", SortDirection::Descending)]);
        source.refresh();
        // Dave 41, Carol 34 lead the descending order.
        assert_eq!(ids(&source), vec!["3", "0"]);
    }

    #[test]
    fn string_sort_orders_lexically() {
        let mut source = fixture(2);
        source.apply_sort(&[directive("name", SortDirection::Ascending)]);
        source.refresh();
        assert_eq!(ids(&source), vec!["1", "2"]);
    }

    #[test]
    fn clearing_the_sort_restores_source_order() {
        let mut source = fixture(2);
        source.apply_sort(&[directive("name", SortDirection::Descending)]);
        source.refresh();
        assert_ne!(ids(&source), vec!["0", "1"]);

        source.apply_sort(&[]);
        source.refresh();
        assert_eq!(ids(&source), vec!["0", "1"]);
    }

    #[test]
    fn changed_criterion_resets_to_the_first_page() {
        let mut source = fixture(2);
        source.load_next_page();
        assert_eq!(ids(&source), vec!["2", "3"]);

        source.apply_sort(&[directive("age", SortDirection::Ascending)]);
        source.refresh();
        assert!(!source.paging().unwrap().has_previous_page);
        assert_eq!(ids(&source), vec!["2", "4"]);

        // A refresh under the unchanged criterion keeps the window.
        source.load_next_page();
        source.refresh();
        assert!(source.paging().unwrap().has_previous_page);
    }

    #[test]
    fn record_lookup_formats_values_by_column_name() {
        let source = fixture(2);
        let id = RecordId::new("0");
        let record = source.record(&id).expect("record resolves");
        assert_eq!(record.formatted_value("name").as_deref(), Some("Carol"));
        assert_eq!(record.formatted_value("age").as_deref(), Some("34"));
        assert_eq!(record.formatted_value("nonexistent"), None);

        assert!(source.record(&RecordId::new("99")).is_none());
        assert!(source.record(&RecordId::new("ghost")).is_none());
    }
}
