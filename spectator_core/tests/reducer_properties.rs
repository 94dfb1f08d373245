use std::collections::HashMap;

use proptest::prelude::*;
use spectator_core::{
    reduce, Cell, ColorRegistry, EntityId, PaletteConfig, Snapshot, StyleClass,
};

fn owner_strategy() -> impl Strategy<Value = EntityId> {
    prop_oneof![
        Just("A"),
        Just("B"),
        Just("b"),
        Just("player-10"),
        Just("player-9"),
        Just("Zed"),
    ]
    .prop_map(EntityId::from)
}

fn cell_strategy() -> impl Strategy<Value = Cell> {
    prop_oneof![
        Just(Cell::Mountain),
        Just(Cell::Empty),
        (0u32..500).prop_map(|units| Cell::NeutralTown { units }),
        (0u32..500, owner_strategy()).prop_map(|(units, owner)| Cell::PlayerCapital { units, owner }),
        (0u32..500, owner_strategy()).prop_map(|(units, owner)| Cell::PlayerTown { units, owner }),
        (0u32..500, owner_strategy()).prop_map(|(units, owner)| Cell::PlayerEmpty { units, owner }),
    ]
}

fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
    prop::collection::vec(prop::collection::vec(cell_strategy(), 0..12), 0..12)
        .prop_map(Snapshot::new)
}

fn registry(seed: u64) -> ColorRegistry {
    ColorRegistry::with_seed(PaletteConfig::default(), seed)
}

proptest! {
    #[test]
    fn land_counts_cover_every_owned_cell(snapshot in snapshot_strategy()) {
        let frame = reduce(&snapshot, &mut registry(1));
        let owned = snapshot.cells().filter(|cell| cell.owner().is_some()).count();
        let land: u32 = frame.leaderboard.iter().map(|row| row.land_count).sum();
        prop_assert_eq!(land as usize, owned);
    }

    #[test]
    fn unit_totals_match_owned_cells(snapshot in snapshot_strategy()) {
        let frame = reduce(&snapshot, &mut registry(2));
        let mut expected: HashMap<&str, u64> = HashMap::new();
        for cell in snapshot.cells() {
            if let (Some(owner), Some(units)) = (cell.owner(), cell.units()) {
                *expected.entry(owner.as_str()).or_default() += units as u64;
            }
        }
        prop_assert_eq!(frame.leaderboard.len(), expected.len());
        for row in &frame.leaderboard {
            prop_assert_eq!(Some(&row.total_units), expected.get(row.id.as_str()));
        }
    }

    #[test]
    fn leaderboard_sorted_by_id(snapshot in snapshot_strategy()) {
        let frame = reduce(&snapshot, &mut registry(3));
        let ids: Vec<&str> = frame.leaderboard.iter().map(|row| row.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        prop_assert_eq!(ids, sorted);
    }

    #[test]
    fn grid_mirrors_snapshot_shape(snapshot in snapshot_strategy()) {
        let frame = reduce(&snapshot, &mut registry(4));
        prop_assert_eq!(frame.grid.column_count(), snapshot.columns.len());
        for (cells, descriptors) in snapshot.columns.iter().zip(frame.grid.columns()) {
            prop_assert_eq!(cells.len(), descriptors.len());
            for (cell, descriptor) in cells.iter().zip(descriptors) {
                prop_assert!(descriptor.has_class(StyleClass::Space));
                prop_assert_eq!(descriptor.fill.is_some(), cell.owner().is_some());
            }
        }
    }

    #[test]
    fn warm_cache_is_stable(snapshot in snapshot_strategy()) {
        let mut colors = registry(5);
        let first = reduce(&snapshot, &mut colors);
        let second = reduce(&snapshot, &mut colors);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn owner_colors_are_bright_and_consistent(snapshot in snapshot_strategy()) {
        let mut colors = registry(6);
        let frame = reduce(&snapshot, &mut colors);
        for row in &frame.leaderboard {
            prop_assert!(row.color.channel_sum() > 400);
            prop_assert_eq!(colors.color_of(&row.id), row.color);
        }
    }
}

#[test]
fn many_owners_get_distinct_colors() {
    let mut colors = registry(2024);
    let mut seen = HashMap::new();
    for n in 0..200 {
        let id = EntityId::from(format!("owner-{n}"));
        let color = colors.color_of(&id);
        if let Some(previous) = seen.insert(color, id.clone()) {
            panic!("{previous} and {id} both received {color}");
        }
    }
}
