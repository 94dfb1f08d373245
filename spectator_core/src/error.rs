use thiserror::Error;

/// Grid position of a cell: index of its column in the snapshot, then index
/// within that column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub column: usize,
    pub row: usize,
}

impl std::fmt::Display for CellPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

#[derive(Debug, Error)]
pub enum SpectatorError {
    #[error("unrecognized cell type {tag:?} at {position}")]
    UnrecognizedCellType { tag: String, position: CellPosition },
    #[error("{tag} cell at {position} has no unit count")]
    MissingUnits { tag: String, position: CellPosition },
    #[error("{tag} cell at {position} has no owner")]
    MissingOwner { tag: String, position: CellPosition },
    #[error("{tag} cell at {position} cannot be owned (owner {owner:?})")]
    UnexpectedOwner {
        tag: String,
        owner: String,
        position: CellPosition,
    },
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SpectatorError {
    /// Position of the offending cell, when the failure is tied to one.
    pub fn position(&self) -> Option<CellPosition> {
        match self {
            SpectatorError::UnrecognizedCellType { position, .. }
            | SpectatorError::MissingUnits { position, .. }
            | SpectatorError::MissingOwner { position, .. }
            | SpectatorError::UnexpectedOwner { position, .. } => Some(*position),
            SpectatorError::Decode(_) => None,
        }
    }
}
