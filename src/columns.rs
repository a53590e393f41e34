/// Column metadata as supplied by the record source. A fresh snapshot arrives
/// with every update cycle; the grid never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub display_name: String,
    pub order: i32,
    pub is_hidden: bool,
}

/// Derives the renderable columns from a raw descriptor list: hidden columns
/// and columns with a negative order are dropped, the rest is sorted ascending
/// by `order`. The sort is stable, equal orders keep their input order.
///
/// An empty result means "nothing renderable", not an error.
pub fn visible_columns(raw: &[ColumnDescriptor]) -> Vec<ColumnDescriptor> {
    let mut columns: Vec<ColumnDescriptor> = raw
        .iter()
        .filter(|c| !c.is_hidden && c.order >= 0)
        .cloned()
        .collect();
    columns.sort_by_key(|c| c.order);
    columns
}
