#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use trellis_grid::{
    Axis, CellRect, ComponentId, EditConfig, GridModel, GridOperation, Insets, SplitWeight,
    TypeHint,
};

#[derive(Debug, Arbitrary)]
enum Edit {
    Add { column: u8, row: u8, insert_column: bool, insert_row: bool, grows: bool },
    AddLast { label: bool },
    Insert { row_axis: bool, index: u8 },
    Delete { row_axis: bool, index: u8 },
    Move { row_axis: bool, from: u8, to: u8 },
    Split { row_axis: bool, index: u8, both: bool },
    Clear { row_axis: bool, index: u8 },
    Normalize,
    Resize { row_axis: bool, index: u8, size: u16 },
    Weight { row_axis: bool, index: u8, weight: u8 },
    SetCells { pick: u8, column: u8, row: u8, columns: u8, rows: u8 },
    SetInsets { pick: u8, top: i8, left: i8, bottom: i8, right: i8 },
    Remove { pick: u8 },
}

fn axis(row_axis: bool) -> Axis {
    if row_axis { Axis::Row } else { Axis::Column }
}

fn pick(model: &GridModel, pick: u8) -> ComponentId {
    let components: Vec<ComponentId> = model.components().collect();
    if components.is_empty() {
        ComponentId::new(0)
    } else {
        components[usize::from(pick) % components.len()]
    }
}

fn to_operation(model: &GridModel, edit: Edit, next_id: &mut u64) -> GridOperation {
    match edit {
        Edit::Add { column, row, insert_column, insert_row, grows } => {
            *next_id += 1;
            GridOperation::AddComponent {
                component: ComponentId::new(*next_id),
                column: usize::from(column % 16),
                row: usize::from(row % 16),
                insert_column,
                insert_row,
                hint: if grows { TypeHint::area() } else { TypeHint::plain() },
            }
        }
        Edit::AddLast { label } => {
            *next_id += 1;
            GridOperation::AddComponentLast {
                component: ComponentId::new(*next_id),
                hint: if label { TypeHint::label() } else { TypeHint::text_input() },
            }
        }
        Edit::Insert { row_axis, index } => GridOperation::InsertTrack {
            axis: axis(row_axis),
            index: usize::from(index % 24),
        },
        Edit::Delete { row_axis, index } => GridOperation::DeleteTrack {
            axis: axis(row_axis),
            index: usize::from(index % 24),
        },
        Edit::Move { row_axis, from, to } => GridOperation::MoveTrack {
            axis: axis(row_axis),
            from: usize::from(from % 24),
            to: usize::from(to % 24),
        },
        Edit::Split { row_axis, index, both } => GridOperation::SplitTrack {
            axis: axis(row_axis),
            index: usize::from(index % 24),
            weight: if both { SplitWeight::Both } else { SplitWeight::First },
        },
        Edit::Clear { row_axis, index } => GridOperation::ClearTrack {
            axis: axis(row_axis),
            index: usize::from(index % 24),
        },
        Edit::Normalize => GridOperation::NormalizeSpanning { axis: None },
        Edit::Resize { row_axis, index, size } => GridOperation::SetTrackSize {
            axis: axis(row_axis),
            index: usize::from(index % 24),
            size: u32::from(size),
        },
        Edit::Weight { row_axis, index, weight } => GridOperation::SetTrackWeight {
            axis: axis(row_axis),
            index: usize::from(index % 24),
            weight: f64::from(weight) / 16.0,
        },
        Edit::SetCells { pick: which, column, row, columns, rows } => GridOperation::SetCells {
            component: pick(model, which),
            cells: CellRect::new(
                usize::from(column % 16),
                usize::from(row % 16),
                usize::from(columns % 4),
                usize::from(rows % 4),
            ),
        },
        Edit::SetInsets { pick: which, top, left, bottom, right } => GridOperation::SetInsets {
            component: pick(model, which),
            insets: Insets::new(top.into(), left.into(), bottom.into(), right.into()),
        },
        Edit::Remove { pick: which } => GridOperation::RemoveComponent {
            component: pick(model, which),
        },
    }
}

fuzz_target!(|edits: Vec<Edit>| {
    let config = EditConfig::default();
    let mut model = GridModel::new();
    let mut next_id = 0;

    for (step, edit) in edits.into_iter().take(256).enumerate() {
        let operation = to_operation(&model, edit, &mut next_id);
        let before = model.clone();
        match model.apply_operation(step as u64, operation, &config) {
            Ok(change) => assert_eq!(change.after_hash, model.state_hash()),
            Err(_) => assert_eq!(model, before, "rejected edit changed the grid"),
        }

        // Post-conditions that must always hold:
        model.validate().expect("grid invalid after edit");
        for axis in Axis::ALL {
            let tracks = model.tracks(axis);
            assert_eq!(
                tracks.len(),
                model.used_extent(axis).max(tracks.declared_len()),
                "track count drifted from assignments"
            );
        }
    }
});
