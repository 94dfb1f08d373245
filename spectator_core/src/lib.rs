//! Presentation core for the territory-control spectator.
//!
//! Turns full board snapshots into paintable frames: one
//! [`RenderDescriptor`] per cell plus a leaderboard sorted by owner id. Owner
//! colors come from a [`ColorRegistry`] that lives for the whole session, so
//! a player keeps the same color from one snapshot to the next.

mod cell;
mod color;
pub mod config;
mod error;
mod leaderboard;
mod reducer;
mod render;
mod session;

pub use cell::{Cell, EntityId, Snapshot};
pub use color::{Color, ColorParseError, ColorRegistry};
pub use config::{
    load_spectator_config, PaletteConfig, SpectatorConfig, SpectatorConfigError,
    SpectatorConfigMetadata,
};
pub use error::{CellPosition, SpectatorError};
pub use leaderboard::{AggregateStats, LeaderboardRow, StatsTable};
pub use reducer::{reduce, reduce_wire, SpectatorFrame};
pub use render::{RenderDescriptor, RenderGrid, StyleClass};
pub use session::SpectatorSession;
