//! Blink controller.
//!
//! A triangular close/open pulse on the `blink` channel, optionally followed by a second
//! pulse after a short gap. The ramp runs on the frame clock: the frame that crosses the
//! midpoint emits exactly 1, so every pulse fully closes the eyes regardless of frame rate.

use rand::Rng;
use tracing::trace;

use crate::config::BlinkConfig;
use crate::layers::Timer;
use crate::outputs::MotionEvent;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Waiting(Timer),
    Pulse {
        elapsed: f32,
        peaked: bool,
        second_pending: bool,
    },
    Gap {
        elapsed: f32,
    },
}

#[derive(Clone, Debug)]
pub struct BlinkLayer {
    phase: Phase,
    weight: f32,
    blinks: u64,
}

impl BlinkLayer {
    pub fn new<R: Rng + ?Sized>(cfg: &BlinkConfig, rng: &mut R) -> Self {
        Self {
            phase: Phase::Waiting(Timer::drawn(&cfg.first_interval, rng)),
            weight: 0.0,
            blinks: 0,
        }
    }

    /// Fire on the next frame if the eyes are open and no pulse is pending.
    pub fn trigger(&mut self) {
        if let Phase::Waiting(timer) = &mut self.phase {
            timer.force();
        }
    }

    /// Advance one frame. Returns the weight to write while a pulse advances (the
    /// closing 0 included) and `None` while the eyes rest open.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        cfg: &BlinkConfig,
        rng: &mut R,
    ) -> (Option<f32>, Option<MotionEvent>) {
        let half = (cfg.duration * 0.5).max(f32::EPSILON);
        match self.phase {
            Phase::Waiting(mut timer) => {
                if timer.tick(dt) {
                    let second_pending = rng.gen_bool(cfg.double_probability.clamp(0.0, 1.0));
                    self.start_pulse(second_pending);
                    trace!(double = second_pending, "blink");
                    (
                        Some(self.weight),
                        Some(MotionEvent::BlinkStarted { second: false }),
                    )
                } else {
                    self.phase = Phase::Waiting(timer);
                    (None, None)
                }
            }
            // A frame with no elapsed time adds no sample, so each half stays strictly monotone.
            Phase::Pulse { .. } if dt <= 0.0 => (None, None),
            Phase::Pulse {
                elapsed,
                peaked,
                second_pending,
            } => {
                let elapsed = elapsed + dt;
                if !peaked {
                    if elapsed >= half {
                        self.weight = 1.0;
                        self.phase = Phase::Pulse {
                            elapsed,
                            peaked: true,
                            second_pending,
                        };
                    } else {
                        self.weight = elapsed / half;
                        self.phase = Phase::Pulse {
                            elapsed,
                            peaked,
                            second_pending,
                        };
                    }
                } else if elapsed >= cfg.duration {
                    self.weight = 0.0;
                    self.blinks += 1;
                    self.phase = if second_pending {
                        Phase::Gap { elapsed: 0.0 }
                    } else {
                        Phase::Waiting(Timer::drawn(&cfg.interval, rng))
                    };
                } else {
                    self.weight = ((cfg.duration - elapsed) / half).clamp(0.0, 1.0);
                    self.phase = Phase::Pulse {
                        elapsed,
                        peaked,
                        second_pending,
                    };
                }
                (Some(self.weight), None)
            }
            Phase::Gap { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= cfg.double_gap {
                    self.start_pulse(false);
                    (
                        Some(self.weight),
                        Some(MotionEvent::BlinkStarted { second: true }),
                    )
                } else {
                    self.phase = Phase::Gap { elapsed };
                    (None, None)
                }
            }
        }
    }

    fn start_pulse(&mut self, second_pending: bool) {
        self.weight = 0.0;
        self.phase = Phase::Pulse {
            elapsed: 0.0,
            peaked: false,
            second_pending,
        };
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn in_pulse(&self) -> bool {
        matches!(self.phase, Phase::Pulse { .. })
    }

    /// Completed pulses, second pulses of a double blink included.
    pub fn completed(&self) -> u64 {
        self.blinks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn single_only() -> BlinkConfig {
        BlinkConfig {
            double_probability: 0.0,
            ..BlinkConfig::default()
        }
    }

    #[test]
    fn pulse_rises_to_one_then_falls_to_zero() {
        let cfg = single_only();
        let mut rng = StdRng::seed_from_u64(5);
        let mut layer = BlinkLayer::new(&cfg, &mut rng);
        layer.trigger();

        let mut samples = Vec::new();
        for _ in 0..30 {
            if let (Some(w), _) = layer.update(DT, &cfg, &mut rng) {
                samples.push(w);
            }
        }
        let peak = samples.iter().position(|w| *w == 1.0).expect("pulse peaks at 1");
        assert!(samples[..=peak].windows(2).all(|w| w[1] > w[0]));
        assert!(samples[peak..].windows(2).all(|w| w[1] < w[0]));
        assert_eq!(*samples.last().unwrap(), 0.0);
        assert!(samples.iter().all(|w| (0.0..=1.0).contains(w)));
        assert_eq!(layer.completed(), 1);
    }

    #[test]
    fn coarse_frames_still_reach_full_closure() {
        let cfg = single_only();
        let mut rng = StdRng::seed_from_u64(6);
        let mut layer = BlinkLayer::new(&cfg, &mut rng);
        layer.trigger();
        assert_eq!(layer.update(0.5, &cfg, &mut rng).0, Some(0.0));
        assert_eq!(layer.update(0.5, &cfg, &mut rng).0, Some(1.0));
        assert_eq!(layer.update(0.5, &cfg, &mut rng).0, Some(0.0));
        assert_eq!(layer.update(0.5, &cfg, &mut rng).0, None);
    }

    #[test]
    fn zero_dt_frames_do_not_repeat_a_sample() {
        let cfg = single_only();
        let mut rng = StdRng::seed_from_u64(9);
        let mut layer = BlinkLayer::new(&cfg, &mut rng);
        layer.trigger();

        let mut samples = Vec::new();
        for frame in 0..40 {
            let dt = if frame % 3 == 1 { 0.0 } else { DT };
            let (w, _) = layer.update(dt, &cfg, &mut rng);
            if dt == 0.0 {
                assert_eq!(w, None, "frame {frame}");
            }
            samples.extend(w);
        }
        let peak = samples.iter().position(|w| *w == 1.0).expect("pulse peaks at 1");
        assert!(samples[..=peak].windows(2).all(|w| w[1] > w[0]));
        assert!(samples[peak..].windows(2).all(|w| w[1] < w[0]));
        assert_eq!(layer.completed(), 1);
    }

    #[test]
    fn double_blink_has_a_gap() {
        let cfg = BlinkConfig {
            double_probability: 1.0,
            ..BlinkConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let mut layer = BlinkLayer::new(&cfg, &mut rng);
        layer.trigger();
        let mut starts = Vec::new();
        let mut gap_frames = 0;
        for _ in 0..60 {
            let (w, ev) = layer.update(DT, &cfg, &mut rng);
            if let Some(MotionEvent::BlinkStarted { second }) = ev {
                starts.push(second);
            }
            if w.is_none() && starts.len() == 1 {
                gap_frames += 1;
            }
        }
        assert_eq!(starts, vec![false, true]);
        assert!(gap_frames >= 6, "gap_frames={gap_frames}");
        assert_eq!(layer.completed(), 2);
    }

    #[test]
    fn waits_for_first_threshold() {
        let cfg = BlinkConfig::default();
        let mut rng = StdRng::seed_from_u64(8);
        let mut layer = BlinkLayer::new(&cfg, &mut rng);
        for _ in 0..(60 * 3 - 1) {
            assert_eq!(layer.update(DT, &cfg, &mut rng), (None, None));
        }
    }
}
