//! End-to-end editing and synthesis scenarios.

use trellis_grid::{
    Axis, CellAssignment, CellRect, ComponentGeometry, ComponentId, EditConfig, GridEditor,
    GridModel, GridOperation, GridSynthesizer, HorizontalAlignment, Insets, RectF, Size,
    SplitWeight, TrackDeclaration, VerticalAlignment, WEIGHT_SENTINEL,
};

fn id(raw: u64) -> ComponentId {
    ComponentId::new(raw)
}

fn declared_axis() -> TrackDeclaration {
    TrackDeclaration::new(Some(vec![1, 2, 3]), Some(vec![0.1, 0.2, WEIGHT_SENTINEL]))
}

fn editor(assignments: Vec<CellAssignment>) -> GridEditor {
    let model = GridModel::from_declaration(&declared_axis(), &declared_axis(), assignments)
        .expect("valid fixture");
    GridEditor::new(model, EditConfig::default())
}

#[test]
fn delete_shifts_following_components() {
    let mut editor = editor(vec![
        CellAssignment::new(id(1), CellRect::cell(0, 0)),
        CellAssignment::new(id(2), CellRect::cell(1, 1)),
    ]);
    assert_eq!(editor.model().column_count(), 2);

    let change = editor.delete_track(Axis::Column, 0).expect("delete column 0");
    assert_eq!(change.removed, vec![id(1)]);

    let snapshot = editor.model().snapshot();
    assert_eq!(snapshot.columns.sizes, Some(vec![2, 3]));
    assert_eq!(snapshot.columns.weights, Some(vec![0.2, WEIGHT_SENTINEL]));
    assert_eq!(editor.model().cells_of(id(2)), Some(CellRect::cell(0, 1)));
}

#[test]
fn move_last_column_to_front_keeps_diagonal_disjoint() {
    let mut model = GridModel::new();
    for index in 0..3 {
        model
            .add_assignment(CellAssignment::new(
                id(index as u64),
                CellRect::cell(index, index),
            ))
            .expect("diagonal cell");
    }
    let mut editor = GridEditor::new(model, EditConfig::default());
    editor.move_track(Axis::Column, 2, 0).expect("move column");

    let model = editor.model();
    assert_eq!(model.cells_of(id(2)).map(|cells| cells.column), Some(0));
    assert_eq!(model.cells_of(id(0)).map(|cells| cells.column), Some(1));
    assert_eq!(model.cells_of(id(1)).map(|cells| cells.column), Some(2));
    model.validate().expect("still disjoint");
}

#[test]
fn split_then_move_keeps_components() {
    let mut editor = editor(vec![
        CellAssignment::new(id(1), CellRect::cell(0, 0)),
        CellAssignment::new(id(2), CellRect::cell(1, 1)),
    ]);
    editor
        .split_track(Axis::Column, 0, SplitWeight::First)
        .expect("split column 0");
    assert_eq!(editor.model().column_count(), 3);
    assert_eq!(editor.model().cells_of(id(1)), Some(CellRect::new(0, 0, 2, 1)));
    assert_eq!(editor.model().cells_of(id(2)), Some(CellRect::cell(2, 1)));

    editor.move_track(Axis::Column, 2, 0).expect("move column");
    assert_eq!(editor.model().cells_of(id(2)), Some(CellRect::cell(0, 1)));
    assert_eq!(editor.model().cells_of(id(1)), Some(CellRect::new(1, 0, 2, 1)));
}

#[test]
fn clear_and_normalize_spanning() {
    let mut model = GridModel::new();
    model
        .add_assignment(CellAssignment::new(id(1), CellRect::new(0, 0, 3, 1)))
        .unwrap();
    model
        .add_assignment(CellAssignment::new(id(2), CellRect::cell(1, 1)))
        .unwrap();
    model
        .add_assignment(CellAssignment::new(id(3), CellRect::cell(2, 1)))
        .unwrap();
    let mut editor = GridEditor::new(model, EditConfig::default());

    editor.clear_track(Axis::Column, 1).expect("clear column 1");
    assert!(!editor.model().contains_component(id(2)));
    assert_eq!(editor.model().column_count(), 3);

    editor.normalize_spanning().expect("normalize");
    assert_eq!(editor.model().column_count(), 2);
    assert_eq!(editor.model().cells_of(id(1)), Some(CellRect::new(0, 0, 2, 1)));
    assert_eq!(editor.model().cells_of(id(3)), Some(CellRect::cell(1, 1)));
}

#[test]
fn moving_a_component_past_the_edge_expands_the_grid() {
    let mut model = GridModel::new();
    model
        .add_assignment(CellAssignment::new(id(1), CellRect::cell(0, 0)))
        .unwrap();
    let mut editor = GridEditor::new(model, EditConfig::default());
    editor
        .apply(GridOperation::MoveComponent {
            component: id(1),
            column: 3,
            row: 2,
            insert_column: false,
            insert_row: false,
        })
        .expect("move component");
    assert_eq!(editor.model().column_count(), 4);
    assert_eq!(editor.model().row_count(), 3);
    assert_eq!(editor.model().cells_of(id(1)), Some(CellRect::cell(3, 2)));
}

#[test]
fn unused_trailing_tracks_are_trimmed_after_removal() {
    let mut model = GridModel::new();
    model
        .add_assignment(CellAssignment::new(id(1), CellRect::cell(0, 0)))
        .unwrap();
    model
        .add_assignment(CellAssignment::new(id(2), CellRect::cell(2, 0)))
        .unwrap();
    let mut editor = GridEditor::new(model, EditConfig::default());
    editor
        .apply(GridOperation::RemoveComponent { component: id(2) })
        .expect("remove");
    assert_eq!(editor.model().column_count(), 1);
}

#[test]
fn synthesize_stacked_components() {
    let components = [
        ComponentGeometry::new(id(1), RectF::new(4.0, 10.0, 100.0, 30.0)),
        ComponentGeometry::new(id(2), RectF::new(10.0, 50.0, 80.0, 20.0)),
    ];
    let synthesis = GridSynthesizer::default().synthesize(&components, Size::new(450, 300));
    assert!(synthesis.rejected.is_empty());

    let model = synthesis.model;
    assert_eq!(model.columns().sizes(), vec![100]);
    assert_eq!(model.rows().sizes(), vec![30, 20]);

    let first = model.assignment(id(1)).expect("first placed");
    assert_eq!(first.cells, CellRect::cell(0, 0));
    assert_eq!(first.insets.bottom, 5);
    assert_eq!(first.insets.right, 0);

    let second = model.assignment(id(2)).expect("second placed");
    assert_eq!(second.cells, CellRect::cell(0, 1));
    assert_eq!(second.insets, Insets::ZERO);
}

#[test]
fn synthesize_components_in_a_row() {
    let components = [
        ComponentGeometry::new(id(1), RectF::new(4.0, 10.0, 100.0, 30.0)),
        ComponentGeometry::new(id(2), RectF::new(120.0, 13.0, 80.0, 15.0)),
    ];
    let synthesis = GridSynthesizer::default().synthesize(&components, Size::new(450, 300));
    let model = synthesis.model;
    assert_eq!(model.columns().sizes(), vec![100, 80]);
    assert_eq!(model.rows().sizes(), vec![30]);

    let first = model.assignment(id(1)).expect("first placed");
    assert_eq!(first.insets.right, 5);
    assert_eq!(first.alignment.vertical, VerticalAlignment::Fill);

    let second = model.assignment(id(2)).expect("second placed");
    assert_eq!(second.cells, CellRect::cell(1, 0));
    assert_eq!(second.alignment.horizontal, HorizontalAlignment::Fill);
    assert_eq!(second.alignment.vertical, VerticalAlignment::Center);
}

#[test]
fn synthesized_grid_accepts_edits() {
    let components = [
        ComponentGeometry::new(id(1), RectF::new(0.0, 0.0, 60.0, 20.0)),
        ComponentGeometry::new(id(2), RectF::new(70.0, 0.0, 60.0, 20.0)),
        ComponentGeometry::new(id(3), RectF::new(0.0, 30.0, 130.0, 20.0)),
    ];
    let synthesis = GridSynthesizer::default().synthesize(&components, Size::new(450, 300));
    assert!(synthesis.rejected.is_empty());
    assert_eq!(
        synthesis.model.cells_of(id(3)),
        Some(CellRect::new(0, 1, 2, 1))
    );

    let mut editor = GridEditor::new(synthesis.model, EditConfig::default());
    editor.delete_track(Axis::Column, 1).expect("delete column");
    assert!(!editor.model().contains_component(id(2)));
    assert_eq!(editor.model().cells_of(id(3)), Some(CellRect::cell(0, 1)));
    let snapshot = editor.model().snapshot();
    assert_eq!(snapshot.columns.sizes, Some(vec![60, 0]));
}
