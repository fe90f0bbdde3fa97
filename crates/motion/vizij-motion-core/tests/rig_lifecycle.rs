mod common;

use common::{fixture_rig, run, seeded, FixtureLoader, TrackedRig, DT};
use glam::Vec3;
use vizij_motion_core::{
    Emotion, Expression, MotionConfig, MotionEngine, MotionError, MotionEvent, RigCall,
    RigHandle, ARM_BONES,
};

#[test]
fn failed_load_keeps_the_running_rig() {
    let mut engine = seeded(30);
    let mut loader = FixtureLoader::default();
    engine.load_with(&mut loader, "humanoid").unwrap();
    engine.start_speaking();
    run(&mut engine, 30);
    let selections_before = engine.arm().selections();

    let err = engine.load_with(&mut loader, "no-such-rig").unwrap_err();
    assert!(matches!(err, MotionError::RigLoad { ref asset, .. } if asset == "no-such-rig"));
    assert!(engine.is_speaking());
    assert_eq!(engine.rig().unwrap().bones().count(), 25);
    assert_eq!(engine.arm().selections(), selections_before);
    assert!(!engine.update(DT).is_idle());
}

#[test]
fn load_first_falls_back_in_order() {
    let mut engine = seeded(31);
    let mut loader = FixtureLoader::default();
    let loaded = engine
        .load_first(&mut loader, ["missing", "also-missing", "upper-body", "humanoid"])
        .unwrap();
    assert_eq!(loaded, "upper-body");
    assert_eq!(loader.attempts, vec!["missing", "also-missing", "upper-body"]);
    assert!(engine.rig().unwrap().has_bone(vizij_motion_core::BoneName::Head));

    let err = engine
        .load_first(&mut loader, ["nope", "still-nope"])
        .unwrap_err();
    assert!(matches!(err, MotionError::RigLoad { ref asset, .. } if asset == "still-nope"));
    assert!(engine.has_rig());

    let none: [&str; 0] = [];
    assert_eq!(
        engine.load_first(&mut loader, none).unwrap_err(),
        MotionError::NoRigCandidates
    );
}

#[test]
fn swapping_rigs_disposes_and_resets_everything() {
    let mut engine: MotionEngine<TrackedRig> =
        MotionEngine::new(MotionConfig::default().with_seed(32));
    let (first, first_disposed) = TrackedRig::new(fixture_rig("humanoid"));
    engine.install_rig(first);
    engine.start_speaking();
    engine.show_thinking();
    for _ in 0..90 {
        engine.update(DT);
    }
    engine.nod();
    engine.update(DT);
    assert!(engine.expression_weight(&Expression::Aa) > 0.0);
    assert!(engine.head().is_nodding());
    assert_ne!(engine.head().offset(), Vec3::ZERO);

    let (second, second_disposed) = TrackedRig::new(fixture_rig("tilted-bind"));
    engine.install_rig(second);
    assert_eq!(first_disposed.get(), 1);
    assert_eq!(second_disposed.get(), 0);

    assert!(!engine.is_speaking());
    assert_eq!(engine.held_emotion(), None);
    assert_eq!(engine.expression_weight(&Expression::Aa), 0.0);
    assert_eq!(engine.expression_weight(&Expression::Relaxed), 0.0);
    assert_eq!(engine.arm().selections(), 0);
    assert!(!engine.head().is_nudged());
    assert!(!engine.head().is_nodding());
    assert_eq!(engine.head().offset(), Vec3::ZERO);
    assert_eq!(engine.eyes().offset(), Vec3::ZERO);
    assert_eq!(engine.eyes().last_saccade(), None);
    assert_eq!(engine.lip_sync().value(), 0.0);
    assert_eq!(engine.expression().ambient_expression(), None);
    for bone in ARM_BONES {
        assert_eq!(engine.arm().current(bone), engine.rest_pose().get(bone));
    }

    let report = engine.update(DT);
    assert!(matches!(report.events[0], MotionEvent::RigInstalled { bones: 10 }));

    engine.dispose();
    assert_eq!(second_disposed.get(), 1);
    assert!(!engine.has_rig());
    let report = engine.update(DT);
    assert!(report.is_idle());
    assert_eq!(report.events, vec![MotionEvent::RigDisposed]);

    engine.dispose();
    assert_eq!(second_disposed.get(), 1, "dispose is idempotent");
}

#[test]
fn rig_without_expression_channels_still_animates() {
    let mut engine = seeded(33);
    engine.install_rig(fixture_rig("faceless"));
    engine.start_speaking();
    engine.show_emotion(Emotion::Surprised);
    for _ in 0..120 {
        let report = engine.update(DT);
        assert!(report.expression_writes.is_empty());
        assert!(!report.normalized_writes.is_empty());
    }
    let log = engine.rig_mut().unwrap().take_log();
    assert!(!log.iter().any(|c| matches!(c, RigCall::SetExpression(..))));
}

#[test]
fn same_seed_same_motion() {
    let trace = |seed| {
        let mut engine = seeded(seed);
        engine.install_rig(fixture_rig("humanoid"));
        engine.start_speaking();
        let mut out = Vec::new();
        for _ in 0..200 {
            let report = engine.update(DT);
            out.extend(report.raw_writes.iter().map(|w| w.rotation));
            out.extend(report.normalized_writes.iter().map(|w| w.rotation));
        }
        out
    };
    assert_eq!(trace(34), trace(34));
    assert_ne!(trace(34), trace(35));
}
