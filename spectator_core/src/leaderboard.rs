use std::collections::BTreeMap;

use serde::Serialize;

use crate::cell::{Cell, EntityId};
use crate::color::{Color, ColorRegistry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    pub land_count: u32,
    pub total_units: u64,
}

impl AggregateStats {
    fn record(&mut self, units: u32) {
        self.land_count += 1;
        self.total_units += units as u64;
    }
}

/// Per-owner tallies for one snapshot, kept in ordinal id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsTable {
    by_owner: BTreeMap<EntityId, AggregateStats>,
}

impl StatsTable {
    pub fn record(&mut self, cell: &Cell) {
        if let (Some(owner), Some(units)) = (cell.owner(), cell.units()) {
            self.by_owner.entry(owner.clone()).or_default().record(units);
        }
    }

    pub fn get(&self, owner: &str) -> Option<&AggregateStats> {
        self.by_owner.get(owner)
    }

    pub fn len(&self) -> usize {
        self.by_owner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_owner.is_empty()
    }

    pub fn into_rows(self, colors: &mut ColorRegistry) -> Vec<LeaderboardRow> {
        self.by_owner
            .into_iter()
            .map(|(id, stats)| LeaderboardRow {
                color: colors.color_of(&id),
                id,
                land_count: stats.land_count,
                total_units: stats.total_units,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardRow {
    pub id: EntityId,
    pub color: Color,
    pub land_count: u32,
    pub total_units: u64,
}

impl LeaderboardRow {
    pub fn summary(&self) -> String {
        format!(
            "Player {}  Land: {}  Units: {}",
            self.id, self.land_count, self.total_units
        )
    }
}
