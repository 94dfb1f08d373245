use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use board_proto::{decode_snapshot_json, WireSnapshot};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedBoard {
    pub owned_cells: usize,
    pub leaderboard: Vec<ExpectedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpectedRow {
    pub id: String,
    pub land_count: u32,
    pub total_units: u64,
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn read_fixture(name: &str) -> Result<String> {
    let path = fixture_path(name);
    fs::read_to_string(&path).with_context(|| format!("reading fixture {}", path.display()))
}

pub fn load_snapshot(name: &str) -> Result<WireSnapshot> {
    let text = read_fixture(name)?;
    decode_snapshot_json(&text).with_context(|| format!("decoding fixture {name}"))
}

pub fn load_expected(name: &str) -> Result<ExpectedBoard> {
    let text = read_fixture(name)?;
    serde_json::from_str(&text).with_context(|| format!("decoding expectations {name}"))
}

/// Non-empty lines of a JSON-lines replay, in file order.
pub fn load_replay_lines(name: &str) -> Result<Vec<String>> {
    Ok(read_fixture(name)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}
