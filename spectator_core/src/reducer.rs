use board_proto::{fingerprint, WireSnapshot};
use serde::Serialize;

use crate::cell::Snapshot;
use crate::color::ColorRegistry;
use crate::error::SpectatorError;
use crate::leaderboard::{LeaderboardRow, StatsTable};
use crate::render::{RenderDescriptor, RenderGrid};

/// Everything a renderer needs to paint one snapshot. Each frame fully
/// replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpectatorFrame {
    pub grid: RenderGrid,
    pub leaderboard: Vec<LeaderboardRow>,
    pub fingerprint: u64,
}

/// Derive render descriptors and the leaderboard from a typed snapshot.
///
/// Cells are visited column by column, so owners are assigned colors in
/// board order the first time they appear. The fingerprint is taken over the
/// wire form of the typed board.
pub fn reduce(snapshot: &Snapshot, colors: &mut ColorRegistry) -> SpectatorFrame {
    build_frame(snapshot, colors, fingerprint(&WireSnapshot::from(snapshot)))
}

/// Reduce a snapshot straight off the wire.
///
/// The whole board is validated before anything is rendered, so a bad cell
/// anywhere yields an error and leaves the color registry untouched. The
/// fingerprint is that of the received snapshot.
pub fn reduce_wire(
    wire: &WireSnapshot,
    colors: &mut ColorRegistry,
) -> Result<SpectatorFrame, SpectatorError> {
    let snapshot = Snapshot::try_from(wire)?;
    Ok(build_frame(&snapshot, colors, fingerprint(wire)))
}

fn build_frame(
    snapshot: &Snapshot,
    colors: &mut ColorRegistry,
    fingerprint: u64,
) -> SpectatorFrame {
    let mut stats = StatsTable::default();
    let columns: Vec<Vec<RenderDescriptor>> = snapshot
        .columns
        .iter()
        .map(|column| {
            column
                .iter()
                .map(|cell| {
                    stats.record(cell);
                    RenderDescriptor::for_cell(cell, colors)
                })
                .collect()
        })
        .collect();

    SpectatorFrame {
        grid: RenderGrid::from_columns(columns),
        leaderboard: stats.into_rows(colors),
        fingerprint,
    }
}
