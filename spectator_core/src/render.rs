//! Toolkit-independent description of how each cell should be painted.

use serde::Serialize;

use crate::cell::{Cell, EntityId};
use crate::color::{Color, ColorRegistry};

/// Fixed style markers a renderer maps onto its own palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StyleClass {
    Space,
    NeutralTown,
    Mountain,
}

impl StyleClass {
    pub fn css_name(&self) -> &'static str {
        match self {
            StyleClass::Space => "space",
            StyleClass::NeutralTown => "neutralTown",
            StyleClass::Mountain => "mountain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderDescriptor {
    /// Label text; lines are separated by `\n`.
    pub label: String,
    /// Owner color, set only for player-owned cells.
    pub fill: Option<Color>,
    /// Style markers; always ends with [`StyleClass::Space`].
    pub classes: Vec<StyleClass>,
}

impl RenderDescriptor {
    fn new(label: String, fill: Option<Color>, class: Option<StyleClass>) -> Self {
        let mut classes = Vec::with_capacity(2);
        classes.extend(class);
        classes.push(StyleClass::Space);
        Self {
            label,
            fill,
            classes,
        }
    }

    pub fn for_cell(cell: &Cell, colors: &mut ColorRegistry) -> Self {
        let mut owned = |prefix: Option<char>, units: u32, owner: &EntityId| {
            let label = match prefix {
                Some(prefix) => format!("{prefix}\n{units}"),
                None => units.to_string(),
            };
            Self::new(label, Some(colors.color_of(owner)), None)
        };
        match cell {
            Cell::PlayerCapital { units, owner } => owned(Some('P'), *units, owner),
            Cell::PlayerTown { units, owner } => owned(Some('p'), *units, owner),
            Cell::PlayerEmpty { units, owner } => owned(None, *units, owner),
            Cell::NeutralTown { units } => {
                Self::new(format!("t\n{units}"), None, Some(StyleClass::NeutralTown))
            }
            Cell::Empty => Self::new(String::new(), None, None),
            Cell::Mountain => Self::new("M".to_string(), None, Some(StyleClass::Mountain)),
        }
    }

    pub fn has_class(&self, class: StyleClass) -> bool {
        self.classes.contains(&class)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.label.split('\n')
    }
}

/// Descriptors laid out with the same column/row shape as the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderGrid {
    columns: Vec<Vec<RenderDescriptor>>,
}

impl RenderGrid {
    pub(crate) fn from_columns(columns: Vec<Vec<RenderDescriptor>>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Vec<RenderDescriptor>] {
        &self.columns
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&RenderDescriptor> {
        self.columns.get(column).and_then(|cells| cells.get(row))
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn longest_column(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &RenderDescriptor> {
        self.columns.iter().flatten()
    }
}
