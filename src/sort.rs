/// Direction of an active sort criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Instruction consumed by the record source: order by `name` in `direction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub name: String,
    pub direction: SortDirection,
}

/// The grid's current sort criterion. Column and direction are either both
/// present or both absent, a single `Option` holds them together.
///
/// One instance lives for the whole widget lifetime. It only changes through
/// [`SortState::cycle`] and survives data reloads, so a new page keeps the
/// same criterion applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    active: Option<(String, SortDirection)>,
}

impl SortState {
    /// Direction applied to `column`, if it is the active sort column.
    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        match &self.active {
            Some((name, direction)) if name == column => Some(*direction),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Advances the cycle for the activated column:
    /// none -> ascending -> descending -> none. Activating a different column
    /// always restarts at ascending on that column.
    ///
    /// Returns the next state and the directive list to push to the source.
    /// The list holds exactly one entry while a direction is active and is
    /// empty when the criterion was cleared. The empty list must still be
    /// pushed, it clears any sort the source has applied before.
    ///
    /// Pure transition, no I/O. The caller stores the state, pushes the
    /// directives and requests a reload, in that order.
    pub fn cycle(&self, clicked: &str) -> (SortState, Vec<SortDirective>) {
        let active = match &self.active {
            Some((column, SortDirection::Ascending)) if column == clicked => {
                Some((column.clone(), SortDirection::Descending))
            }
            Some((column, SortDirection::Descending)) if column == clicked => None,
            _ => Some((clicked.to_string(), SortDirection::Ascending)),
        };

        let directives = active
            .iter()
            .map(|(name, direction)| SortDirective {
                name: name.clone(),
                direction: *direction,
            })
            .collect();

        (SortState { active }, directives)
    }
}
