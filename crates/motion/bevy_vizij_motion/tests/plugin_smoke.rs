use bevy::prelude::*;
use bevy_vizij_motion::{
    AvatarExpressions, BoneIndex, MotionAvatar, MotionBone, MotionEngineRes, MotionNotification,
    MotionSignal, MotionTimestep, VizijMotionPlugin,
};
use vizij_motion_core::{BoneName, ControlSignal, Emotion, Expression, MotionConfig, MotionEvent};

fn app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(VizijMotionPlugin {
        config: MotionConfig::default().with_seed(7),
    });
    app.insert_resource(MotionTimestep(Some(1.0 / 60.0)));
    app
}

fn spawn_avatar(app: &mut App, bones: &[&str]) -> (Entity, Vec<Entity>) {
    let mut children = Vec::new();
    let root = app
        .world_mut()
        .spawn((MotionAvatar, Name::new("avatar"), Transform::from_xyz(0.0, 1.0, 0.0)))
        .with_children(|parent| {
            for bone in bones {
                children.push(parent.spawn((Name::new(bone.to_string()), Transform::default())).id());
            }
            parent.spawn((Name::new("hat"), Transform::default()));
        })
        .id();
    (root, children)
}

#[test]
fn plugin_inserts_engine_resource() {
    let app = app();
    assert!(app.world().get_resource::<MotionEngineRes>().is_some());
    assert!(app.world().get_resource::<BoneIndex>().is_some());
}

#[test]
fn avatar_bones_are_bound_by_name() {
    let mut app = app();
    let (root, children) = spawn_avatar(&mut app, &["leftUpperArm", "rightUpperArm", "head", "spine"]);
    app.update();

    let index = app.world().resource::<BoneIndex>();
    assert_eq!(index.avatar, Some(root));
    assert_eq!(index.bones.len(), 4);
    assert_eq!(index.bones[&BoneName::Head], children[2]);
    assert_eq!(index.base_height, 1.0);

    let engine = app.world().resource::<MotionEngineRes>();
    assert!(engine.0.has_rig());
    assert_eq!(engine.0.rest_pose().len(), 2);
    assert_eq!(
        app.world().get::<MotionBone>(children[0]),
        Some(&MotionBone(BoneName::LeftUpperArm))
    );
}

#[test]
fn frames_move_bone_transforms() {
    let mut app = app();
    let (root, children) = spawn_avatar(&mut app, &["leftUpperArm", "rightUpperArm", "head", "spine"]);
    for _ in 0..30 {
        app.update();
    }
    let left_arm = app.world().get::<Transform>(children[0]).unwrap();
    assert!(left_arm.rotation.angle_between(Quat::IDENTITY) > 0.01);
    let spine = app.world().get::<Transform>(children[3]).unwrap();
    assert!(spine.rotation != Quat::IDENTITY);
    let root_tf = app.world().get::<Transform>(root).unwrap();
    assert!((root_tf.translation.y - 1.0).abs() <= 0.003);
}

#[test]
fn signals_reach_the_engine() {
    let mut app = app();
    spawn_avatar(&mut app, &["leftUpperArm", "rightUpperArm", "head", "spine"]);
    app.update();

    app.world_mut()
        .send_event(MotionSignal(ControlSignal::StartSpeaking));
    app.world_mut().send_event(MotionSignal(ControlSignal::ShowEmotion {
        emotion: Emotion::Happy,
    }));
    app.update();

    let engine = app.world().resource::<MotionEngineRes>();
    assert!(engine.0.is_speaking());
    assert_eq!(engine.0.held_emotion(), Some(Emotion::Happy));

    let index = app.world().resource::<BoneIndex>();
    let root = index.avatar.unwrap();
    let mirror = app.world().get::<AvatarExpressions>(root).unwrap();
    assert_eq!(mirror.get(&Expression::Happy), 0.7);

    let events = app.world().resource::<Events<MotionNotification>>();
    let mut reader = events.get_reader();
    let seen: Vec<_> = reader.read(events).map(|n| n.0.clone()).collect();
    assert!(seen.contains(&MotionEvent::SpeakingStarted));
    assert!(seen.contains(&MotionEvent::EmotionShown {
        emotion: Emotion::Happy
    }));
}

#[test]
fn new_avatar_replaces_the_rig() {
    let mut app = app();
    spawn_avatar(&mut app, &["leftUpperArm", "rightUpperArm"]);
    app.update();
    let (second, _) = spawn_avatar(&mut app, &["head", "spine", "leftEye", "rightEye"]);
    app.update();

    let index = app.world().resource::<BoneIndex>();
    assert_eq!(index.avatar, Some(second));
    assert!(!index.bones.contains_key(&BoneName::LeftUpperArm));
    let engine = app.world().resource::<MotionEngineRes>();
    assert!(engine.0.rest_pose().is_empty());
}

#[test]
fn fixture_rig_bone_names_bind() {
    let desc: serde_json::Value = vizij_test_fixtures::rigs::load("upper-body").unwrap();
    let names: Vec<String> = desc["bones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b.as_str().unwrap().to_string())
        .collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut app = app();
    spawn_avatar(&mut app, &refs);
    app.update();
    assert_eq!(app.world().resource::<BoneIndex>().bones.len(), names.len());
}
