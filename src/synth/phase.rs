//! Fixed-point oscillator primitives
//!
//! A full sine period is mapped onto the 16-bit range, so a phase counter
//! wraps back to the start of the period by plain integer overflow.

use std::f32::consts::PI;

/// Radians per phase unit (one period = 65536 units).
const PHASE_TO_RADIANS: f32 = 2.0 * PI / 65536.0;

/// Unsigned 8-bit level a zero-amplitude signal quantizes to.
pub const SILENCE_LEVEL: u8 = 127;

/// 16-bit wrapping phase counter.
///
/// Starts at phase 0; [`tick`](Self::tick) returns the current phase and then
/// advances it by the fixed step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseAccumulator {
    phase: u16,
    step: u16,
}

impl PhaseAccumulator {
    /// Oscillator for `frequency` Hz at `sample_rate` Hz.
    ///
    /// The step is `(frequency << 16) / sample_rate`, truncated to 16 bits.
    /// `sample_rate` must be non-zero.
    pub fn new(frequency: u32, sample_rate: u32) -> Self {
        debug_assert!(sample_rate > 0, "sample rate must be non-zero");
        let step = ((frequency as u64) << 16) / sample_rate as u64;
        Self {
            phase: 0,
            step: step as u16,
        }
    }

    /// Per-sample phase increment.
    #[inline]
    pub fn step(&self) -> u16 {
        self.step
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> u16 {
        self.phase
    }

    /// Return the current phase and advance by one sample.
    #[inline]
    pub fn tick(&mut self) -> u16 {
        let current = self.phase;
        self.phase = self.phase.wrapping_add(self.step);
        current
    }
}

/// `sin(phase * 2π / 65536)`.
#[inline]
pub fn fixed_sine(phase: u16) -> f32 {
    (phase as f32 * PHASE_TO_RADIANS).sin()
}

/// Map a signal in `[-1, 1]` onto unsigned 8-bit PCM: `round((x + 1) * 127)`.
#[inline]
pub fn quantize_u8(value: f32) -> u8 {
    ((value + 1.0) * 127.0).round() as u8
}
