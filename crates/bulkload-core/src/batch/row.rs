use crate::stmt::Value;

/// A cell of a [`Row`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    /// Nothing was written. Renders as the column default for non-nullable
    /// columns and as null for nullable ones.
    #[default]
    Missing,

    /// An explicit value, including an explicit null.
    Value(Value),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Cell::Value(value) => Some(value),
            Cell::Missing => None,
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        Cell::Value(value)
    }
}

/// Change-tracking state of a row. Engines use it to decide what the row is
/// being submitted for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowState {
    /// Freshly built, not yet submitted anywhere
    #[default]
    Detached,

    /// In sync with the database
    Unchanged,

    /// Pending insertion
    Added,

    /// Pending update
    Modified,
}

/// A row of a [`RowBatch`](super::RowBatch), one cell per batch column.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub(super) cells: Vec<Cell>,
    pub(super) state: RowState,
}

impl Row {
    pub(super) fn with_width(width: usize) -> Self {
        Self {
            cells: vec![Cell::Missing; width],
            state: RowState::Detached,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> &Cell {
        &self.cells[column]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn state(&self) -> RowState {
        self.state
    }

    pub fn set_state(&mut self, state: RowState) {
        self.state = state;
    }
}
