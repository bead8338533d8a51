//! Property/fuzz-style invariants for grid edit operations.
//!
//! Random operation streams run against `GridModel::apply_operation`. After
//! every step the grid must validate, keep track counts fitted to its
//! assignments, keep gap insets consistent, and leave the model untouched
//! when an operation is rejected. Accepted streams must replay to the same
//! state hash.

use trellis_grid::{
    Axis, CellRect, ComponentId, EditConfig, GridModel, GridOperation, GridOperationKind, GridQuery,
    HorizontalAlignment, Insets, LayoutMetrics, NoPreferredSizes, QueryConfig, Rect, SplitWeight,
    TypeHint, VerticalAlignment,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state >> 11
    }

    fn below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        (self.next_u64() % bound as u64) as usize
    }

    fn up_to(&mut self, max: usize) -> usize {
        self.below(max + 1)
    }

    fn choose_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 0
    }
}

fn random_axis(rng: &mut Lcg) -> Axis {
    if rng.choose_bool() {
        Axis::Column
    } else {
        Axis::Row
    }
}

fn random_hint(rng: &mut Lcg) -> TypeHint {
    match rng.below(4) {
        0 => TypeHint::label(),
        1 => TypeHint::text_input(),
        2 => TypeHint::area(),
        _ => TypeHint::plain(),
    }
}

fn random_component(model: &GridModel, rng: &mut Lcg) -> Option<ComponentId> {
    let components: Vec<ComponentId> = model.components().collect();
    (!components.is_empty()).then(|| components[rng.below(components.len())])
}

fn random_operation(model: &GridModel, rng: &mut Lcg, next_id: &mut u64) -> GridOperation {
    let axis = random_axis(rng);
    let count = model.track_count(axis);
    let existing = random_component(model, rng);

    let mut candidates = vec![0usize, 1, 2, 7]; // add, add last, insert, normalize
    if count > 0 {
        candidates.extend([3, 4, 5, 6, 8, 9]);
    }
    if existing.is_some() {
        candidates.extend([10, 11, 12, 13, 14]);
    }
    if model.column_count() > 0 && model.row_count() > 0 {
        candidates.push(15);
    }

    match candidates[rng.below(candidates.len())] {
        0 => {
            *next_id += 1;
            GridOperation::AddComponent {
                component: ComponentId::new(*next_id),
                column: rng.up_to(model.column_count()),
                row: rng.up_to(model.row_count()),
                insert_column: rng.choose_bool(),
                insert_row: rng.choose_bool(),
                hint: random_hint(rng),
            }
        }
        1 => {
            *next_id += 1;
            GridOperation::AddComponentLast {
                component: ComponentId::new(*next_id),
                hint: random_hint(rng),
            }
        }
        2 => GridOperation::InsertTrack {
            axis,
            index: rng.up_to(count),
        },
        3 => GridOperation::DeleteTrack {
            axis,
            index: rng.below(count),
        },
        4 => GridOperation::MoveTrack {
            axis,
            from: rng.below(count),
            to: rng.up_to(count),
        },
        5 => GridOperation::SplitTrack {
            axis,
            index: rng.below(count),
            weight: match rng.below(3) {
                0 => SplitWeight::First,
                1 => SplitWeight::Second,
                _ => SplitWeight::Both,
            },
        },
        6 => GridOperation::ClearTrack {
            axis,
            index: rng.below(count),
        },
        8 => GridOperation::SetTrackSize {
            axis,
            index: rng.below(count),
            size: rng.below(200) as u32,
        },
        9 => GridOperation::SetTrackWeight {
            axis,
            index: rng.below(count),
            weight: rng.below(4) as f64,
        },
        10 => GridOperation::SetCells {
            component: existing.unwrap_or(ComponentId::new(0)),
            cells: CellRect::new(
                rng.up_to(model.column_count()),
                rng.up_to(model.row_count()),
                1 + rng.below(3),
                1 + rng.below(3),
            ),
        },
        11 => GridOperation::SetInsets {
            component: existing.unwrap_or(ComponentId::new(0)),
            insets: Insets::new(
                rng.below(8) as i32,
                rng.below(8) as i32,
                rng.below(8) as i32,
                rng.below(8) as i32,
            ),
        },
        12 => GridOperation::MoveComponent {
            component: existing.unwrap_or(ComponentId::new(0)),
            column: rng.up_to(model.column_count()),
            row: rng.up_to(model.row_count()),
            insert_column: rng.choose_bool(),
            insert_row: rng.choose_bool(),
        },
        13 => GridOperation::RemoveComponent {
            component: existing.unwrap_or(ComponentId::new(0)),
        },
        14 => GridOperation::SetGrow {
            component: existing.unwrap_or(ComponentId::new(0)),
            axis,
            grow: rng.choose_bool(),
        },
        15 => {
            if rng.choose_bool() {
                GridOperation::SetColumnAlignment {
                    column: rng.below(model.column_count()),
                    alignment: HorizontalAlignment::Leading,
                }
            } else {
                GridOperation::SetRowAlignment {
                    row: rng.below(model.row_count()),
                    alignment: VerticalAlignment::Bottom,
                }
            }
        }
        _ => GridOperation::NormalizeSpanning {
            axis: rng.choose_bool().then_some(axis),
        },
    }
}

fn assert_grid_invariants(model: &GridModel, config: &EditConfig) {
    model.validate().expect("grid should remain structurally valid");
    for axis in Axis::ALL {
        let tracks = model.tracks(axis);
        let used = model.used_extent(axis);
        assert_eq!(
            tracks.len(),
            used.max(tracks.declared_len()),
            "{axis} count must fit the assignments and declared arrays"
        );
        let count = model.track_count(axis);
        let declaration = tracks.declaration();
        let persisted = count + usize::from(tracks.filler().is_some());
        for declared in [
            declaration.sizes.as_ref().map(Vec::len),
            declaration.weights.as_ref().map(Vec::len),
        ]
        .into_iter()
        .flatten()
        {
            assert_eq!(declared, persisted, "declared {axis} array length drifted");
        }
        for assignment in model.assignments() {
            assert!(assignment.cells.span(axis) >= 1);
            assert!(assignment.cells.end(axis) <= config.max_track_index);
        }
    }
}

fn assert_gap_insets(model: &GridModel, config: &EditConfig) {
    for axis in Axis::ALL {
        let count = model.track_count(axis);
        let gap = config.gap(axis);
        for assignment in model.assignments() {
            let trailing = assignment.trailing_inset(axis);
            if assignment.cells.end(axis) < count {
                assert!(
                    trailing >= gap,
                    "{} ends before the last {axis} but has trailing inset {trailing}",
                    assignment.component
                );
            } else {
                assert_ne!(trailing, gap, "last-{axis} gap inset should be cleared");
            }
        }
    }
}

fn assert_query_covers_components(model: &GridModel) {
    let metrics = LayoutMetrics::new(Rect::new(0, 0, 800, 600));
    let query = GridQuery::new(model, &metrics, &NoPreferredSizes, QueryConfig::default());
    assert_eq!(query.column_intervals().len(), model.column_count());
    assert_eq!(query.row_intervals().len(), model.row_count());
    for component in model.components() {
        assert!(
            query.component_rect(component).is_some(),
            "every component maps to a pixel rect"
        );
    }
}

fn run_sequence(seed: u64, steps: usize) -> (GridModel, Vec<GridOperation>) {
    let config = EditConfig::default();
    let mut model = GridModel::new();
    let mut rng = Lcg::new(seed);
    let mut next_id = 0;
    let mut applied = Vec::with_capacity(steps);
    // Explicit insets hold until the next edit that refreshes gaps.
    let mut gaps_refreshed = true;

    for step in 0..steps {
        let operation = random_operation(&model, &mut rng, &mut next_id);
        let before = model.clone();
        match model.apply_operation(step as u64 + 1, operation.clone(), &config) {
            Ok(change) => {
                assert_eq!(change.before_hash, before.state_hash());
                assert_eq!(change.after_hash, model.state_hash());
                let kind = operation.kind();
                if kind.maintains_gap_insets() {
                    gaps_refreshed = true;
                } else if kind == GridOperationKind::SetInsets {
                    gaps_refreshed = false;
                }
                applied.push(operation);
            }
            Err(err) => {
                assert_eq!(
                    model, before,
                    "rejected operation must not change the grid: seed={seed} step={step} {err}"
                );
                assert_eq!(err.before_hash, before.state_hash());
            }
        }
        assert_grid_invariants(&model, &config);
        if gaps_refreshed {
            assert_gap_insets(&model, &config);
        }
    }

    assert_query_covers_components(&model);
    (model, applied)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn grid_random_operation_sequences_preserve_invariants(
        seed in any::<u64>(),
        steps in 20usize..120,
    ) {
        let (model, _) = run_sequence(seed, steps);
        assert_grid_invariants(&model, &EditConfig::default());
    }

    #[test]
    fn grid_random_operation_sequences_replay_deterministically(
        seed in any::<u64>(),
        steps in 20usize..80,
    ) {
        let (final_model, operations) = run_sequence(seed, steps);
        let config = EditConfig::default();

        let mut replay = GridModel::new();
        for (idx, operation) in operations.into_iter().enumerate() {
            replay
                .apply_operation(idx as u64 + 1, operation, &config)
                .expect("replay operation should succeed");
        }

        prop_assert_eq!(replay.state_hash(), final_model.state_hash());
        prop_assert_eq!(replay.snapshot(), final_model.snapshot());
    }

    #[test]
    fn insert_then_delete_restores_the_grid(
        seed in any::<u64>(),
        steps in 10usize..60,
        pick in any::<u64>(),
    ) {
        let (mut model, _) = run_sequence(seed, steps);
        let config = EditConfig::default();
        for axis in Axis::ALL {
            let count = model.track_count(axis);
            if count == 0 || count + 1 >= config.max_track_index {
                continue;
            }
            let index = (pick % count as u64) as usize;
            let before = model.clone();
            model
                .apply_operation(1, GridOperation::InsertTrack { axis, index }, &config)
                .expect("insert inside the grid");
            prop_assert_eq!(model.track_count(axis), count + 1);
            prop_assert!(model.primary_occupants(axis, index).next().is_none());
            model
                .apply_operation(2, GridOperation::DeleteTrack { axis, index }, &config)
                .expect("delete the inserted track");
            prop_assert_eq!(model.state_hash(), before.state_hash());
            prop_assert_eq!(&model, &before);
        }
    }
}

#[test]
fn grid_fuzz_seed_corpus_preserves_invariants() {
    let seeds = [
        0_u64,
        1,
        2,
        3,
        5,
        8,
        13,
        21,
        34,
        55,
        89,
        144,
        u32::MAX as u64,
        (u32::MAX as u64) + 1,
        u64::MAX - 1,
        u64::MAX,
    ];

    for seed in seeds {
        let (model, _) = run_sequence(seed, 180);
        assert_grid_invariants(&model, &EditConfig::default());
    }
}
