use std::borrow::Borrow;
use std::fmt;

use board_proto::{
    WireCell, WireSnapshot, EMPTY, MOUNTAIN, NEUTRAL_TOWN, PLAYER_CAPITAL, PLAYER_EMPTY,
    PLAYER_TOWN,
};
use serde::{Deserialize, Serialize};

use crate::error::{CellPosition, SpectatorError};

/// Identifier of an owning player. Ordered by plain byte-wise string order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Mountain,
    Empty,
    NeutralTown { units: u32 },
    PlayerCapital { units: u32, owner: EntityId },
    PlayerTown { units: u32, owner: EntityId },
    PlayerEmpty { units: u32, owner: EntityId },
}

impl Cell {
    pub fn owner(&self) -> Option<&EntityId> {
        match self {
            Cell::PlayerCapital { owner, .. }
            | Cell::PlayerTown { owner, .. }
            | Cell::PlayerEmpty { owner, .. } => Some(owner),
            Cell::Mountain | Cell::Empty | Cell::NeutralTown { .. } => None,
        }
    }

    pub fn units(&self) -> Option<u32> {
        match self {
            Cell::NeutralTown { units }
            | Cell::PlayerCapital { units, .. }
            | Cell::PlayerTown { units, .. }
            | Cell::PlayerEmpty { units, .. } => Some(*units),
            Cell::Mountain | Cell::Empty => None,
        }
    }

    /// Wire tag this variant is serialized under.
    pub fn tag(&self) -> &'static str {
        match self {
            Cell::Mountain => MOUNTAIN,
            Cell::Empty => EMPTY,
            Cell::NeutralTown { .. } => NEUTRAL_TOWN,
            Cell::PlayerCapital { .. } => PLAYER_CAPITAL,
            Cell::PlayerTown { .. } => PLAYER_TOWN,
            Cell::PlayerEmpty { .. } => PLAYER_EMPTY,
        }
    }

    /// Interpret one wire cell. Stray `units` on terrain cells are ignored;
    /// every other mismatch between tag and fields is rejected.
    pub fn from_wire(cell: &WireCell, position: CellPosition) -> Result<Self, SpectatorError> {
        let tag = cell.kind.as_str();
        let units = || {
            cell.units.ok_or_else(|| SpectatorError::MissingUnits {
                tag: tag.to_string(),
                position,
            })
        };
        let owner = || match cell.owner.as_deref() {
            Some(owner) if !owner.is_empty() => Ok(EntityId::from(owner)),
            _ => Err(SpectatorError::MissingOwner {
                tag: tag.to_string(),
                position,
            }),
        };
        let unowned = || match &cell.owner {
            Some(owner) => Err(SpectatorError::UnexpectedOwner {
                tag: tag.to_string(),
                owner: owner.clone(),
                position,
            }),
            None => Ok(()),
        };

        match tag {
            MOUNTAIN => unowned().map(|_| Cell::Mountain),
            EMPTY => unowned().map(|_| Cell::Empty),
            NEUTRAL_TOWN => {
                unowned()?;
                Ok(Cell::NeutralTown { units: units()? })
            }
            PLAYER_CAPITAL => Ok(Cell::PlayerCapital {
                units: units()?,
                owner: owner()?,
            }),
            PLAYER_TOWN => Ok(Cell::PlayerTown {
                units: units()?,
                owner: owner()?,
            }),
            PLAYER_EMPTY => Ok(Cell::PlayerEmpty {
                units: units()?,
                owner: owner()?,
            }),
            other => Err(SpectatorError::UnrecognizedCellType {
                tag: other.to_string(),
                position,
            }),
        }
    }
}

impl From<&Cell> for WireCell {
    fn from(cell: &Cell) -> Self {
        WireCell::new(
            cell.tag(),
            cell.units(),
            cell.owner().map(|owner| owner.as_str().to_string()),
        )
    }
}

/// Board snapshot as a sequence of columns, each a sequence of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub columns: Vec<Vec<Cell>>,
}

impl Snapshot {
    pub fn new(columns: Vec<Vec<Cell>>) -> Self {
        Self { columns }
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.columns.iter().flatten()
    }

    pub fn cell_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }
}

impl TryFrom<&WireSnapshot> for Snapshot {
    type Error = SpectatorError;

    fn try_from(wire: &WireSnapshot) -> Result<Self, Self::Error> {
        let columns = wire
            .spaces
            .iter()
            .enumerate()
            .map(|(column, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(row, cell)| Cell::from_wire(cell, CellPosition { column, row }))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Snapshot { columns })
    }
}

impl From<&Snapshot> for WireSnapshot {
    fn from(snapshot: &Snapshot) -> Self {
        WireSnapshot::new(
            snapshot
                .columns
                .iter()
                .map(|column| column.iter().map(WireCell::from).collect())
                .collect(),
        )
    }
}
