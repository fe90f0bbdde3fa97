//! Engine: owns the rig, the rest pose and every motion layer, and exposes the control
//! surface the conversation side talks to.
//!
//! Methods:
//! - rig lifecycle: install_rig, load_with, load_first, dispose
//! - control: start/stop_speaking, set_expression, show_*, stop_thinking, nod, signal
//! - update: one composited frame (expressions → normalized → resolve → raw)

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::bones::BoneName;
use crate::compositor::ExpressionStage;
use crate::config::MotionConfig;
use crate::error::{MotionError, MotionResult};
use crate::expressions::{Expression, ExpressionWeights, RESETTABLE};
use crate::gestures::GestureTable;
use crate::layers::{
    ArmGestureLayer, BlinkLayer, BodySwayLayer, BreathingLayer, ExpressionLayer,
    EyeSaccadeLayer, HeadWanderLayer, LipSyncLayer,
};
use crate::outputs::{FrameReport, MotionEvent};
use crate::rest_pose::RestPose;
use crate::rig::{RigHandle, RigLoader};
use crate::signals::{ControlSignal, Emotion, EmotionCue};

/// Every layer's state, rebuilt together so nothing leaks across rig swaps.
#[derive(Clone, Debug)]
struct Layers {
    arm: ArmGestureLayer,
    blink: BlinkLayer,
    lip_sync: LipSyncLayer,
    expression: ExpressionLayer,
    head: HeadWanderLayer,
    eyes: EyeSaccadeLayer,
    sway: BodySwayLayer,
    breathing: BreathingLayer,
}

impl Layers {
    fn new(cfg: &MotionConfig, rest: &RestPose, rng: &mut StdRng) -> Self {
        let mut arm = ArmGestureLayer::new(&cfg.arm);
        arm.reset(rest, &cfg.arm);
        Self {
            arm,
            blink: BlinkLayer::new(&cfg.blink, rng),
            lip_sync: LipSyncLayer::new(),
            expression: ExpressionLayer::new(&cfg.expression, rng),
            head: HeadWanderLayer::new(&cfg.head, rng),
            eyes: EyeSaccadeLayer::new(&cfg.eyes, rng),
            sway: BodySwayLayer::new(),
            breathing: BreathingLayer::new(),
        }
    }
}

/// Procedural motion engine driving one rig.
pub struct MotionEngine<R: RigHandle> {
    config: MotionConfig,
    rng: StdRng,
    gestures: GestureTable,
    rig: Option<R>,
    rest: RestPose,
    layers: Layers,
    weights: ExpressionWeights,
    speaking: bool,
    frame: u64,
    pending: Vec<MotionEvent>,
    report: FrameReport,
}

impl<R: RigHandle> MotionEngine<R> {
    pub fn new(config: MotionConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let rest = RestPose::default();
        let layers = Layers::new(&config, &rest, &mut rng);
        Self {
            config,
            rng,
            gestures: GestureTable::default(),
            rig: None,
            rest,
            layers,
            weights: ExpressionWeights::new(),
            speaking: false,
            frame: 0,
            pending: Vec::new(),
            report: FrameReport::default(),
        }
    }

    pub fn with_gestures(mut self, gestures: GestureTable) -> Self {
        self.gestures = gestures;
        self
    }

    // ---- rig lifecycle ----

    /// Install a loaded rig. Any previous rig is disposed and every layer starts over from
    /// the new rest pose.
    pub fn install_rig(&mut self, rig: R) {
        if let Some(mut old) = self.rig.take() {
            old.dispose();
            debug!("previous rig disposed");
        }
        self.rest = RestPose::build(&rig, &self.config.arm);
        self.reset_state();
        let bones = BoneName::ALL.iter().filter(|b| rig.has_bone(**b)).count();
        self.rig = Some(rig);
        info!(bones, rest_bones = self.rest.len(), "rig installed");
        self.pending.push(MotionEvent::RigInstalled { bones });
    }

    /// Load `asset` and install it. On failure the current rig keeps running untouched.
    pub fn load_with<L>(&mut self, loader: &mut L, asset: &str) -> MotionResult<()>
    where
        L: RigLoader<Rig = R>,
    {
        match loader.load(asset) {
            Ok(rig) => {
                self.install_rig(rig);
                Ok(())
            }
            Err(err) => {
                warn!(asset, error = %err, "rig load failed; keeping current rig");
                Err(err)
            }
        }
    }

    /// Try each candidate in order and install the first that loads. Returns the asset
    /// that succeeded, or the last error.
    pub fn load_first<L, I, S>(&mut self, loader: &mut L, candidates: I) -> MotionResult<String>
    where
        L: RigLoader<Rig = R>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut last_err = MotionError::NoRigCandidates;
        for candidate in candidates {
            let asset = candidate.as_ref();
            match self.load_with(loader, asset) {
                Ok(()) => return Ok(asset.to_string()),
                Err(err) => last_err = err,
            }
        }
        Err(last_err)
    }

    /// Release the rig and return every layer to neutral. Later frames are idle until a
    /// new rig is installed.
    pub fn dispose(&mut self) {
        if let Some(mut rig) = self.rig.take() {
            rig.dispose();
            info!("rig disposed");
            self.pending.push(MotionEvent::RigDisposed);
        }
        self.rest = RestPose::default();
        self.reset_state();
    }

    fn reset_state(&mut self) {
        self.layers = Layers::new(&self.config, &self.rest, &mut self.rng);
        self.weights.clear();
        self.speaking = false;
    }

    // ---- control surface ----

    pub fn start_speaking(&mut self) {
        if self.speaking {
            return;
        }
        self.speaking = true;
        self.layers.arm.force_selection();
        self.layers
            .lip_sync
            .start(&self.config.lip_sync, &mut self.rng);
        self.pending.push(MotionEvent::SpeakingStarted);
    }

    pub fn stop_speaking(&mut self) {
        if !self.speaking {
            return;
        }
        self.speaking = false;
        self.layers.lip_sync.stop();
        self.pending.push(MotionEvent::SpeakingStopped);
    }

    /// Direct override of one channel; reaches the rig on the next frame.
    pub fn set_expression(&mut self, expression: impl Into<Expression>, weight: f32) {
        self.weights.set(expression.into(), weight);
    }

    /// Zero the emotion and mouth channels.
    pub fn reset_expressions(&mut self) {
        self.weights.reset(&RESETTABLE);
    }

    pub fn show_emotion(&mut self, emotion: Emotion) {
        let profile = self.config.expression.profile(emotion).clone();
        let event = self
            .layers
            .expression
            .trigger(emotion, &profile, &mut self.weights);
        self.layers.head.release_nudge();
        self.layers
            .head
            .nudge(profile.nudge, profile.nudge_for.or(profile.revert_after));
        self.pending.push(event);
    }

    pub fn show_happy(&mut self) {
        self.show_emotion(Emotion::Happy);
    }

    pub fn show_sad(&mut self) {
        self.show_emotion(Emotion::Sad);
    }

    pub fn show_surprised(&mut self) {
        self.show_emotion(Emotion::Surprised);
    }

    pub fn show_thinking(&mut self) {
        self.show_emotion(Emotion::Thinking);
    }

    pub fn stop_thinking(&mut self) {
        if let Some(event) = self.layers.expression.stop_thinking(&mut self.weights) {
            self.layers.head.release_nudge();
            self.pending.push(event);
        }
    }

    pub fn nod(&mut self) {
        self.layers.head.nod();
        self.pending.push(MotionEvent::NodStarted);
    }

    /// Pick and play a reaction for an assistant reply.
    pub fn react_to_reply(&mut self, text: &str) -> EmotionCue {
        let cue = EmotionCue::from_reply(text);
        match cue {
            EmotionCue::Show(emotion) => self.show_emotion(emotion),
            EmotionCue::Nod => self.nod(),
        }
        cue
    }

    pub fn signal(&mut self, signal: ControlSignal) {
        match signal {
            ControlSignal::StartSpeaking => self.start_speaking(),
            ControlSignal::StopSpeaking => self.stop_speaking(),
            ControlSignal::SetExpression { expression, weight } => {
                self.set_expression(expression, weight)
            }
            ControlSignal::ResetExpressions => self.reset_expressions(),
            ControlSignal::ShowEmotion { emotion } => self.show_emotion(emotion),
            ControlSignal::StopThinking => self.stop_thinking(),
            ControlSignal::Nod => self.nod(),
            ControlSignal::ReactToReply { text } => {
                self.react_to_reply(&text);
            }
            ControlSignal::Dispose => self.dispose(),
        }
    }

    // ---- frame ----

    /// Composite one frame. Non-finite or negative `dt` is treated as 0.
    pub fn update(&mut self, dt: f32) -> &FrameReport {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.frame += 1;
        self.report.clear();
        self.report.frame = self.frame;
        self.report.dt = dt;
        self.report.events.append(&mut self.pending);

        let Self {
            config,
            rng,
            gestures,
            rig,
            rest,
            layers,
            weights,
            speaking,
            report,
            ..
        } = self;
        let Some(rig) = rig.as_mut() else {
            return &self.report;
        };
        let speaking = *speaking;
        let mut events = Vec::new();

        // 1. expression weights
        let (blink, blink_event) = layers.blink.update(dt, &config.blink, rng);
        events.extend(blink_event);
        if let Some(w) = blink {
            weights.set(Expression::Blink, w);
        }
        if let Some(v) = layers.lip_sync.update(dt, &config.lip_sync, rng) {
            let (aa, oh) = LipSyncLayer::mouth_weights(v, &config.lip_sync);
            weights.set(Expression::Aa, aa);
            weights.set(Expression::Oh, oh);
        }
        events.extend(layers.expression.update(dt, weights, &config.expression, rng));
        let mut normalized = ExpressionStage::begin(rig, report).write_expressions(weights);

        // 2. normalized arm bones
        events.extend(layers.arm.update(dt, speaking, rest, gestures, &config.arm, rng));
        for (bone, rotation) in layers.arm.current_rotations() {
            normalized.set_normalized(bone, rotation);
        }

        // 3. resolve, 4. raw additive layers
        let mut raw = normalized.resolve(dt);
        layers.breathing.update(dt);
        raw.set_root_height(layers.breathing.height(&config.breathing));

        events.extend(layers.head.update(dt, speaking, &config.head, rng));
        raw.add_euler(BoneName::Head, layers.head.offset());

        layers.eyes.update(dt, speaking, &config.eyes, rng);
        let gaze = layers.eyes.offset();
        raw.add_euler(BoneName::LeftEye, gaze);
        raw.add_euler(BoneName::RightEye, gaze);

        layers.sway.update(dt);
        raw.add_euler(BoneName::Spine, layers.sway.offset(&config.sway));
        raw.finish();

        report.events.extend(events);
        &self.report
    }

    // ---- accessors ----

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn rig(&self) -> Option<&R> {
        self.rig.as_ref()
    }

    pub fn rig_mut(&mut self) -> Option<&mut R> {
        self.rig.as_mut()
    }

    pub fn has_rig(&self) -> bool {
        self.rig.is_some()
    }

    pub fn rest_pose(&self) -> &RestPose {
        &self.rest
    }

    pub fn gestures(&self) -> &GestureTable {
        &self.gestures
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Engine-side weight of a channel (what the rig has or will receive next frame).
    pub fn expression_weight(&self, expression: &Expression) -> f32 {
        self.weights.get(expression)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn last_report(&self) -> &FrameReport {
        &self.report
    }

    pub fn arm(&self) -> &ArmGestureLayer {
        &self.layers.arm
    }

    pub fn blink(&self) -> &BlinkLayer {
        &self.layers.blink
    }

    pub fn lip_sync(&self) -> &LipSyncLayer {
        &self.layers.lip_sync
    }

    pub fn expression(&self) -> &ExpressionLayer {
        &self.layers.expression
    }

    pub fn head(&self) -> &HeadWanderLayer {
        &self.layers.head
    }

    pub fn eyes(&self) -> &EyeSaccadeLayer {
        &self.layers.eyes
    }

    pub fn held_emotion(&self) -> Option<Emotion> {
        self.layers.expression.held_emotion()
    }
}

impl<R: RigHandle> Default for MotionEngine<R> {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::InMemoryRig;

    fn engine() -> MotionEngine<InMemoryRig> {
        MotionEngine::new(MotionConfig::default().with_seed(42))
    }

    #[test]
    fn idle_without_rig() {
        let mut e = engine();
        e.start_speaking();
        let r = e.update(1.0 / 60.0);
        assert!(r.is_idle());
        assert_eq!(r.events, vec![MotionEvent::SpeakingStarted]);
        assert!(e.update(1.0 / 60.0).events.is_empty());
    }

    #[test]
    fn bad_dt_is_zeroed() {
        let mut e = engine();
        e.install_rig(InMemoryRig::humanoid());
        assert_eq!(e.update(f32::NAN).dt, 0.0);
        assert_eq!(e.update(-1.0).dt, 0.0);
        assert_eq!(e.update(0.02).dt, 0.02);
        assert_eq!(e.frame_count(), 3);
    }

    #[test]
    fn set_expression_reaches_rig_next_frame() {
        let mut e = engine();
        e.install_rig(InMemoryRig::humanoid());
        e.set_expression("surprised", 0.4);
        assert_eq!(e.rig().unwrap().expression(&Expression::Surprised), None);
        let r = e.update(1.0 / 60.0);
        assert_eq!(r.expression_write(&Expression::Surprised), Some(0.4));
        assert_eq!(e.rig().unwrap().expression(&Expression::Surprised), Some(0.4));
    }

    #[test]
    fn control_signals_dispatch() {
        let mut e = engine();
        e.install_rig(InMemoryRig::humanoid());
        e.signal(ControlSignal::StartSpeaking);
        assert!(e.is_speaking());
        e.signal(ControlSignal::ShowEmotion {
            emotion: Emotion::Thinking,
        });
        assert_eq!(e.held_emotion(), Some(Emotion::Thinking));
        e.signal(ControlSignal::StopThinking);
        assert_eq!(e.held_emotion(), None);
        e.signal(ControlSignal::Dispose);
        assert!(!e.has_rig());
        assert!(!e.is_speaking());
    }
}
