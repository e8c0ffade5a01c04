//! The fade and time-dilation transition between worlds.
//!
//! A transition drives a single scalar, `height`, from 1 down to roughly 0
//! (fading out), switches world, then drives it back up to 1 (fading in).
//! Each frame moves `height` a fixed fraction of the remaining distance, so
//! both halves converge geometrically for any positive speed and delta.
//!
//! While fading, the tint overlay's alpha is `sqrt(1 - height)` and the
//! global time scale is slowed: `0.1 + sqrt(height)` on the way out,
//! `0.1 + height²` on the way in.

use crate::command::{CommandBuffer, WorldCommand};

/// Fading out stops once `height` is at or below this.
pub const FADE_OUT_EPSILON: f32 = 0.01;

/// Fading in stops once `height` is at or above this.
pub const FADE_IN_EPSILON: f32 = 0.98;

/// Time scale floor while a transition is running.
const MIN_TIME_SCALE: f32 = 0.1;

/// Where a transition is in its cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    /// No transition running.
    #[default]
    Idle,
    /// Height is falling toward 0.
    FadingOut,
    /// The world is being switched. Never observable between ticks: the
    /// switch and the first fade-in step happen in the same frame.
    Switching,
    /// Height is rising back toward 1.
    FadingIn,
}

/// Progress of the current transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionState {
    pub phase: TransitionPhase,
    /// Fade height in `[0, 1]`. 1 is fully faded in.
    pub height: f32,
}

impl Default for TransitionState {
    fn default() -> Self {
        Self {
            phase: TransitionPhase::Idle,
            height: 1.0,
        }
    }
}

/// What a fade step asks of its caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    /// The step ran; call again next frame.
    Continue,
    /// Fade-out has converged; switch world then fade in.
    NeedsSwitch,
    /// The transition finished this frame.
    Finished,
}

impl TransitionState {
    /// Whether a transition is running.
    pub fn is_active(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    /// Starts fading out. Returns `false` if a transition is already running.
    pub(crate) fn begin(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = TransitionPhase::FadingOut;
        true
    }

    /// Runs the fade-out half for one frame.
    ///
    /// `t` is the per-frame interpolation factor, already clamped to `[0, 1]`.
    pub(crate) fn step_out(&mut self, t: f32, out: &mut CommandBuffer) -> StepOutcome {
        if self.height > FADE_OUT_EPSILON {
            out.push(WorldCommand::SetTintAlpha(tint_alpha(self.height)));
            self.height = lerp(self.height, 0.0, t);
            out.push(WorldCommand::SetTimeScale(fade_out_time_scale(self.height)));
            StepOutcome::Continue
        } else {
            self.phase = TransitionPhase::Switching;
            StepOutcome::NeedsSwitch
        }
    }

    /// Runs the fade-in half for one frame, finishing once converged.
    pub(crate) fn step_in(&mut self, t: f32, out: &mut CommandBuffer) -> StepOutcome {
        self.phase = TransitionPhase::FadingIn;
        if self.height < FADE_IN_EPSILON {
            out.push(WorldCommand::SetTintAlpha(tint_alpha(self.height)));
            self.height = lerp(self.height, 1.0, t);
            out.push(WorldCommand::SetTimeScale(fade_in_time_scale(self.height)));
            StepOutcome::Continue
        } else {
            self.finish(out);
            StepOutcome::Finished
        }
    }

    /// Snaps to the neutral state: clear tint, full height, real-time.
    pub(crate) fn finish(&mut self, out: &mut CommandBuffer) {
        out.push(WorldCommand::SetTintAlpha(0.0));
        self.height = 1.0;
        out.push(WorldCommand::SetTimeScale(1.0));
        self.phase = TransitionPhase::Idle;
    }
}

/// Tint overlay alpha for a given height.
pub fn tint_alpha(height: f32) -> f32 {
    (1.0 - height).max(0.0).sqrt()
}

/// Time scale while fading out.
pub fn fade_out_time_scale(height: f32) -> f32 {
    MIN_TIME_SCALE + height.max(0.0).sqrt()
}

/// Time scale while fading in.
pub fn fade_in_time_scale(height: f32) -> f32 {
    MIN_TIME_SCALE + height * height
}

/// Interpolation factor clamped to `[0, 1]`.
pub(crate) fn clamp01(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_only_from_idle() {
        let mut state = TransitionState::default();
        assert!(state.begin());
        assert_eq!(state.phase, TransitionPhase::FadingOut);
        assert!(!state.begin());
    }

    #[test]
    fn test_fade_out_step_emits_alpha_then_time_scale() {
        let mut state = TransitionState::default();
        state.begin();
        let mut out = CommandBuffer::new();

        assert_eq!(state.step_out(0.5, &mut out), StepOutcome::Continue);
        assert_eq!(state.height, 0.5);

        let commands: Vec<_> = out.into_iter().collect();
        // Alpha is computed from the height before the step.
        assert_eq!(commands[0], WorldCommand::SetTintAlpha(0.0));
        match commands[1] {
            WorldCommand::SetTimeScale(scale) => {
                assert!((scale - (0.1 + 0.5f32.sqrt())).abs() < 1e-6);
            }
            other => panic!("expected time scale, got {other:?}"),
        }
    }

    #[test]
    fn test_fade_out_converges_to_switch() {
        let mut state = TransitionState::default();
        state.begin();
        let mut out = CommandBuffer::new();
        let mut steps = 0;
        while state.step_out(0.16, &mut out) == StepOutcome::Continue {
            steps += 1;
            assert!(steps < 100, "fade-out must converge");
        }
        assert!(state.height <= FADE_OUT_EPSILON);
        assert_eq!(state.phase, TransitionPhase::Switching);
    }

    #[test]
    fn test_fade_in_finishes_neutral() {
        let mut state = TransitionState {
            phase: TransitionPhase::Switching,
            height: 0.005,
        };
        let mut out = CommandBuffer::new();
        while state.step_in(0.16, &mut out) == StepOutcome::Continue {}

        assert_eq!(state.phase, TransitionPhase::Idle);
        assert_eq!(state.height, 1.0);
        assert_eq!(out.last_time_scale(), Some(1.0));
        assert_eq!(out.last_tint_alpha(), Some(0.0));
    }

    #[test]
    fn test_zero_factor_makes_no_progress() {
        let mut state = TransitionState::default();
        state.begin();
        let mut out = CommandBuffer::new();
        state.step_out(0.0, &mut out);
        assert_eq!(state.height, 1.0);
    }

    #[test]
    fn test_curves() {
        assert_eq!(tint_alpha(1.0), 0.0);
        assert_eq!(tint_alpha(0.0), 1.0);
        assert!((fade_out_time_scale(1.0) - 1.1).abs() < 1e-6);
        assert!((fade_in_time_scale(0.0) - 0.1).abs() < 1e-6);
        assert_eq!(clamp01(3.0), 1.0);
        assert_eq!(clamp01(-1.0), 0.0);
    }
}
