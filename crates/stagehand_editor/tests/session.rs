// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session behaviour across undo/redo and re-parenting.

use stagehand_editor::{EditorError, EditorSession, EditorSettings, HistoryError};
use stagehand_timeline::layer::{OPACITY, POSITION, ROTATION, SCALE};
use stagehand_timeline::{
    AssetData, ImageAsset, LayerContent, LayerId, Resource, SampledContent, ShapeKind, TimelineError, Value, Vec2,
};
use std::sync::Arc;

fn shape(session: &mut EditorSession, name: &str) -> LayerId {
    session
        .add_layer(
            name,
            LayerContent::Shape {
                shape: ShapeKind::Rectangle,
                fill: [255, 255, 255, 255],
            },
        )
        .unwrap()
}

#[test]
fn undo_restores_previous_keyframes_and_redo_reapplies() {
    let mut session = EditorSession::default();
    let layer = shape(&mut session, "Box");
    session.add_or_update_keyframe(layer, OPACITY, 0.0, 20.0).unwrap();
    session.add_or_update_keyframe(layer, OPACITY, 0.0, 80.0).unwrap();

    let opacity = |s: &EditorSession| {
        s.active_composition()
            .unwrap()
            .layer(layer)
            .unwrap()
            .sample(OPACITY, 0.0)
    };
    assert_eq!(opacity(&session), Some(Value::Scalar(80.0)));

    session.undo().unwrap();
    assert_eq!(opacity(&session), Some(Value::Scalar(20.0)));

    session.redo().unwrap();
    assert_eq!(opacity(&session), Some(Value::Scalar(80.0)));

    session.undo().unwrap();
    session.undo().unwrap();
    session.undo().unwrap();
    assert!(session.active_composition().unwrap().layer(layer).is_none());
    assert!(matches!(
        session.undo(),
        Err(EditorError::History(HistoryError::NothingToUndo))
    ));
}

#[test]
fn undo_reestablishes_active_composition_and_resources() {
    let mut session = EditorSession::default();
    let first = session.active_id();
    let image = session.import_asset(
        "Logo",
        AssetData::Image(ImageAsset {
            path: "images/logo.png".to_string(),
        }),
    );
    assert!(session.attach_resource(image, Arc::new(Resource::Image { width: 64, height: 64 })));
    let logo = session
        .add_layer("Logo", LayerContent::Image { source: Some(image) })
        .unwrap();

    let second = session.add_composition("Intro");
    session.set_active_composition(second).unwrap();
    shape(&mut session, "Intro box");

    session.undo().unwrap();
    session.undo().unwrap();
    assert_eq!(session.active_id(), first);
    assert!(session.library().composition(second).is_none());

    let frame = session.frame().unwrap();
    let sample = frame.layers.iter().find(|l| l.layer_id == logo).unwrap();
    assert_eq!(
        sample.content,
        SampledContent::Image {
            source: Some(image),
            ready: true
        }
    );
    assert!(session.library().resource(image).is_some());
}

#[test]
fn history_is_bounded_by_settings() {
    let mut settings = EditorSettings::default();
    settings.history_capacity = 3;
    let mut session = EditorSession::new(settings);
    let layer = shape(&mut session, "Box");
    for i in 0..10_u32 {
        session
            .add_or_update_keyframe(layer, ROTATION, f64::from(i) / 10.0, f64::from(i))
            .unwrap();
    }

    let mut undone = 0;
    while session.can_undo() {
        session.undo().unwrap();
        undone += 1;
    }
    assert_eq!(undone, 3);
}

#[test]
fn cycle_is_rejected_without_side_effects() {
    let mut session = EditorSession::default();
    let a = shape(&mut session, "A");
    let b = shape(&mut session, "B");
    let c = shape(&mut session, "C");
    session.set_parent(b, Some(a)).unwrap();
    session.set_parent(c, Some(b)).unwrap();

    let before = session.to_project().to_json().unwrap();
    let depth = session.history().undo_depth();

    let err = session.set_parent(a, Some(c)).unwrap_err();
    match err {
        EditorError::Timeline(TimelineError::Cycle(cycle)) => {
            assert_eq!(cycle.child, a);
            assert_eq!(cycle.parent, c);
        }
        other => panic!("expected a cycle error, got {other:?}"),
    }

    assert_eq!(session.to_project().to_json().unwrap(), before);
    assert_eq!(session.history().undo_depth(), depth);
}

#[test]
fn reparenting_three_levels_keeps_world_transforms() {
    let mut session = EditorSession::default();
    let root = shape(&mut session, "Root");
    let middle = shape(&mut session, "Middle");
    let leaf = shape(&mut session, "Leaf");

    session.add_or_update_keyframe(root, POSITION, 0.0, Vec2::new(50.0, 40.0)).unwrap();
    session.add_or_update_keyframe(root, POSITION, 2.0, Vec2::new(150.0, 90.0)).unwrap();
    session.add_or_update_keyframe(root, ROTATION, 0.0, 15.0).unwrap();
    session.add_or_update_keyframe(root, ROTATION, 2.0, 75.0).unwrap();
    session.add_or_update_keyframe(middle, SCALE, 0.0, Vec2::new(200.0, 50.0)).unwrap();
    session.add_or_update_keyframe(middle, ROTATION, 1.0, -30.0).unwrap();
    session.add_or_update_keyframe(leaf, POSITION, 0.0, Vec2::new(10.0, 200.0)).unwrap();
    session.add_or_update_keyframe(leaf, ROTATION, 0.0, 5.0).unwrap();

    session.set_play_head(1.0);
    for (child, parent) in [(middle, root), (leaf, middle)] {
        let before = session.world_transform(child).unwrap();
        session.set_parent(child, Some(parent)).unwrap();
        let after = session.world_transform(child).unwrap();
        assert!(after.approx_eq(&before, 1e-6), "{before:?} vs {after:?}");
    }

    session.set_play_head(0.5);
    let before = session.world_transform(leaf).unwrap();
    session.set_parent(leaf, None).unwrap();
    assert!(session.world_transform(leaf).unwrap().approx_eq(&before, 1e-6));
}

#[test]
fn removing_a_parent_unparents_children() {
    let mut session = EditorSession::default();
    let parent = shape(&mut session, "Parent");
    let child = shape(&mut session, "Child");
    session.set_parent(child, Some(parent)).unwrap();

    let removed = session.remove_layer(parent).unwrap();
    assert_eq!(removed.id, parent);
    let comp = session.active_composition().unwrap();
    assert_eq!(comp.layer(child).unwrap().parent, None);

    session.undo().unwrap();
    let comp = session.active_composition().unwrap();
    assert_eq!(comp.layer(child).unwrap().parent, Some(parent));
}

#[test]
fn selection_is_pruned_after_undo() {
    let mut session = EditorSession::default();
    let layer = shape(&mut session, "Box");
    let key = session.add_or_update_keyframe(layer, OPACITY, 1.0, 10.0).unwrap();
    session
        .selection_mut()
        .add(stagehand_editor::KeyframeRef::new(layer, OPACITY, key));

    session.undo().unwrap();
    assert!(session.selection().is_empty());
}
