use thiserror::Error;

use crate::schema::SheetKind;

/// A foreign key points at a row that is not in the snapshot.
///
/// This means the sheet rows and the row numbers stored in association cells
/// have diverged. It is never a normal "not found" condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferentialError {
    #[error("model row {0} does not exist")]
    MissingModel(usize),

    #[error("input row {0} does not exist")]
    MissingInput(usize),

    #[error("model row {model} references missing input row {input}")]
    DanglingInput { model: usize, input: usize },

    #[error("input row {input} references missing curve row {curve}")]
    DanglingCurve { input: usize, curve: usize },
}

/// Errors raised by the store mapping layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunwayError {
    #[error("column index {0} is outside the supported range A..BZ")]
    ColumnOutOfRange(usize),

    #[error("sheet {0} has no header row")]
    MissingHeader(SheetKind),

    #[error("row {row} does not exist in sheet {sheet}")]
    RowNotFound { sheet: SheetKind, row: usize },

    #[error("row {row} of sheet {sheet} is not associated with {key}")]
    AssociationNotFound {
        sheet: SheetKind,
        row: usize,
        key: usize,
    },

    #[error(transparent)]
    Referential(#[from] ReferentialError),
}

pub type Result<T, E = RunwayError> = std::result::Result<T, E>;
