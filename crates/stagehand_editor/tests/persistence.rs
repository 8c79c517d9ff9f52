// SPDX-License-Identifier: MIT OR Apache-2.0
//! Project and settings files on disk.

use stagehand_editor::{EditorSession, EditorSettings, ProjectFile};
use stagehand_timeline::layer::{OPACITY, POSITION, ROTATION, SCALE, TEXT, VOLUME};
use stagehand_timeline::{InterpolationMode, LayerContent, ShapeKind, Vec2};

fn sample_session() -> EditorSession {
    let mut session = EditorSession::default();

    let ball = session
        .add_layer(
            "Ball",
            LayerContent::Shape {
                shape: ShapeKind::Ellipse,
                fill: [10, 20, 30, 255],
            },
        )
        .unwrap();
    session.add_or_update_keyframe(ball, POSITION, 0.0, Vec2::new(0.0, 0.0)).unwrap();
    let mid = session
        .add_or_update_keyframe(ball, POSITION, 1.3, Vec2::new(123.456, 78.9))
        .unwrap();
    session.add_or_update_keyframe(ball, POSITION, 3.0, Vec2::new(300.0, 10.0)).unwrap();
    session
        .set_keyframe_easing(&stagehand_editor::KeyframeRef::new(ball, POSITION, mid), true, true)
        .unwrap();
    session.add_or_update_keyframe(ball, ROTATION, 0.0, 0.0).unwrap();
    let spin = session.add_or_update_keyframe(ball, ROTATION, 2.0, 1.0 / 3.0).unwrap();
    session
        .set_keyframe_interpolation(
            &stagehand_editor::KeyframeRef::new(ball, ROTATION, spin),
            InterpolationMode::Hold,
        )
        .unwrap();

    let label = session
        .add_layer(
            "Label",
            LayerContent::Text {
                text: "zero".to_string(),
                font: "Mono".to_string(),
                font_size: 18.0,
            },
        )
        .unwrap();
    session.add_or_update_keyframe(label, TEXT, 0.0, "one").unwrap();
    session.add_or_update_keyframe(label, TEXT, 2.5, "two").unwrap();
    session.add_or_update_keyframe(label, OPACITY, 0.0, 0.0).unwrap();
    session.add_or_update_keyframe(label, OPACITY, 4.0, 100.0).unwrap();
    session.set_play_head(0.7);
    session.set_parent(label, Some(ball)).unwrap();
    session.set_trim_points(label, Some(0.5), Some(6.0)).unwrap();

    let audio = session
        .add_layer(
            "Audio",
            LayerContent::Audio {
                asset: None,
                start_time: 1.0,
            },
        )
        .unwrap();
    session.add_or_update_keyframe(audio, VOLUME, 1.0, 80.0).unwrap();
    session.shift_layer_window(audio, 2.0).unwrap();

    session
}

#[test]
fn json_roundtrip_preserves_dense_samples() {
    let session = sample_session();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("show.json");

    session.to_project().save(&path).unwrap();
    let loaded = EditorSession::from_project(ProjectFile::load(&path).unwrap(), EditorSettings::default());

    assert_eq!(loaded.active_id(), session.active_id());
    assert_eq!(loaded.play_head(), session.play_head());

    let before = session.active_composition().unwrap();
    let after = loaded.active_composition().unwrap();
    assert_eq!(after, before);

    for step in 0..=100 {
        let time = f64::from(step) * 0.1;
        assert_eq!(
            after.evaluate_frame(time, loaded.library()),
            before.evaluate_frame(time, session.library()),
            "frame mismatch at {time}s"
        );
    }
}

#[test]
fn parenting_under_a_collapsed_layer_still_saves() {
    let mut session = EditorSession::default();
    let shape = LayerContent::Shape {
        shape: ShapeKind::Rectangle,
        fill: [255, 255, 255, 255],
    };
    let parent = session.add_layer("Parent", shape.clone()).unwrap();
    let child = session.add_layer("Child", shape).unwrap();
    session.add_or_update_keyframe(parent, SCALE, 0.0, Vec2::new(0.0, 0.0)).unwrap();
    session.add_or_update_keyframe(parent, SCALE, 1.0, Vec2::new(100.0, 100.0)).unwrap();
    session.add_or_update_keyframe(child, POSITION, 0.0, Vec2::new(10.0, 20.0)).unwrap();

    session.set_play_head(0.0);
    session.set_parent(child, Some(parent)).unwrap();

    let json = session.to_project().to_json().unwrap();
    let loaded = EditorSession::from_project(ProjectFile::from_json(&json).unwrap(), EditorSettings::default());
    assert_eq!(loaded.active_composition().unwrap(), session.active_composition().unwrap());

    let world = loaded.active_composition().unwrap().world_transform(child, 1.0).unwrap();
    assert!(world.position.x.is_finite() && world.position.y.is_finite());
}

#[test]
fn loaded_project_falls_back_to_first_composition() {
    let session = sample_session();
    let mut project = session.to_project();
    project.active = stagehand_timeline::AssetId::new();

    let json = project.to_json().unwrap();
    let loaded = EditorSession::from_project(ProjectFile::from_json(&json).unwrap(), EditorSettings::default());
    assert_eq!(loaded.active_id(), session.active_id());
}

#[test]
fn settings_roundtrip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(stagehand_editor::SETTINGS_FILE_NAME);

    assert_eq!(EditorSettings::load_or_default(&path).unwrap(), EditorSettings::default());

    let mut settings = EditorSettings::default();
    settings.history_capacity = 7;
    settings.composition.frames_per_second = 24.0;
    settings.save(&path).unwrap();

    let loaded = EditorSettings::load_or_default(&path).unwrap();
    assert_eq!(loaded, settings);

    let session = EditorSession::new(loaded);
    let comp = session.active_composition().unwrap();
    assert_eq!(comp.frames_per_second, 24.0);
    assert_eq!(session.history().stats().max_depth, 7);
}

#[test]
fn malformed_project_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"version\": 1, ").unwrap();

    assert!(matches!(
        ProjectFile::load(&path),
        Err(stagehand_editor::EditorError::Json(_))
    ));
    assert!(matches!(
        ProjectFile::load(&dir.path().join("missing.json")),
        Err(stagehand_editor::EditorError::Io(_))
    ));
}
