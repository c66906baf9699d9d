//! Synthesizer configuration
//!
//! Settings can be built in code, loaded from a JSON file, or left at their
//! defaults (8 kHz, 250 ms tones, 1/40 s gaps).

use crate::{DtmfError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 8000;
/// Default silence buffer size as a fraction of one second (1/40 s).
pub const DEFAULT_WHITE_NOISE_FRACTION: u32 = 40;
/// Default tone length in milliseconds.
pub const DEFAULT_TONE_DURATION_MS: u32 = 250;

/// Tone synthesis and playback settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Silence buffer holds `sample_rate / white_noise_fraction` samples
    pub white_noise_fraction: u32,
    /// Submit the silence buffer after every played unit
    pub append_silence: bool,
    /// Length of each rendered tone in milliseconds
    pub tone_duration_ms: u32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            white_noise_fraction: DEFAULT_WHITE_NOISE_FRACTION,
            append_silence: true,
            tone_duration_ms: DEFAULT_TONE_DURATION_MS,
        }
    }
}

impl SynthConfig {
    /// Reject settings the synthesizer cannot render with.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(DtmfError::ConfigError(
                "sample rate must be greater than zero".into(),
            ));
        }
        if self.white_noise_fraction == 0 {
            return Err(DtmfError::ConfigError(
                "white noise fraction must be greater than zero".into(),
            ));
        }
        if self.tone_duration_ms == 0 {
            return Err(DtmfError::ConfigError(
                "tone duration must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DtmfError::IoFailure {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SynthConfig = serde_json::from_str(&text).map_err(|e| {
            DtmfError::ConfigError(format!("failed to parse '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Number of samples in one rendered tone.
    pub fn tone_samples(&self) -> usize {
        (self.tone_duration_ms as u64 * self.sample_rate as u64 / 1000) as usize
    }

    /// Number of samples in the silence buffer.
    pub fn silence_samples(&self) -> usize {
        (self.sample_rate / self.white_noise_fraction) as usize
    }
}
