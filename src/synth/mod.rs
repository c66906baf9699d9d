//! DTMF tone waveform synthesizer
//!
//! Pre-renders one unsigned 8-bit PCM buffer per DTMF symbol, plus a silence
//! buffer used as inter-symbol gap. Buffers are rendered by [`ToneSynthesizer::init`]
//! and are read-only afterwards, so a synthesizer can be shared behind an `Arc`
//! by any number of sequencers.
//!
//! # Example
//! ```
//! use dtmf::{Symbol, SynthConfig, ToneSynthesizer};
//!
//! let mut synth = ToneSynthesizer::new(SynthConfig::default()).unwrap();
//! synth.init(250).unwrap();
//! let tone = synth.waveform(Symbol::from_nibble(0x5));
//! assert_eq!(tone.len(), 2000);
//! ```

pub mod phase;

use crate::alphabet::Symbol;
use crate::config::SynthConfig;
use crate::{DtmfError, Result};
pub use phase::{fixed_sine, quantize_u8, PhaseAccumulator, SILENCE_LEVEL};

/// Pre-rendered PCM-8 waveforms for the sixteen DTMF symbols.
#[derive(Debug, Clone)]
pub struct ToneSynthesizer {
    config: SynthConfig,
    tones: [Vec<u8>; 16],
    silence: Vec<u8>,
    rendered_duration_ms: Option<u32>,
}

impl ToneSynthesizer {
    /// Create a synthesizer; buffers stay empty until [`init`](Self::init).
    ///
    /// Fails with [`DtmfError::ConfigError`] when the configuration is invalid
    /// (e.g. a zero sample rate).
    pub fn new(config: SynthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tones: Default::default(),
            silence: vec![SILENCE_LEVEL; config.silence_samples()],
            rendered_duration_ms: None,
        })
    }

    /// Create a synthesizer and render it with the configured tone duration.
    pub fn rendered(config: SynthConfig) -> Result<Self> {
        let mut synth = Self::new(config)?;
        synth.init(config.tone_duration_ms)?;
        Ok(synth)
    }

    /// Render every symbol buffer for tones of `tone_duration_ms` milliseconds.
    ///
    /// Calling this again discards and re-renders all buffers. A zero duration
    /// is rejected with [`DtmfError::ConfigError`] and leaves the bank untouched.
    pub fn init(&mut self, tone_duration_ms: u32) -> Result<()> {
        if tone_duration_ms == 0 {
            return Err(DtmfError::ConfigError(
                "tone duration must be greater than zero".into(),
            ));
        }
        let sample_rate = self.config.sample_rate;
        let len = (tone_duration_ms as u64 * sample_rate as u64 / 1000) as usize;

        for symbol in Symbol::ALL {
            let (low, high) = symbol.frequencies();
            render_tone(
                &mut self.tones[symbol.index()],
                PhaseAccumulator::new(low as u32, sample_rate),
                PhaseAccumulator::new(high as u32, sample_rate),
                len,
            );
        }
        self.rendered_duration_ms = Some(tone_duration_ms);

        tracing::info!(
            sample_rate,
            tone_duration_ms,
            tone_samples = len,
            silence_samples = self.silence.len(),
            "rendered DTMF tone bank"
        );
        Ok(())
    }

    /// Whether [`init`](Self::init) has run.
    pub fn is_initialized(&self) -> bool {
        self.rendered_duration_ms.is_some()
    }

    /// Tone duration of the last render, if any.
    pub fn tone_duration_ms(&self) -> Option<u32> {
        self.rendered_duration_ms
    }

    /// Rendered waveform for `symbol` (empty before `init`).
    #[inline]
    pub fn waveform(&self, symbol: Symbol) -> &[u8] {
        &self.tones[symbol.index()]
    }

    /// Silence buffer used for gaps and spaces.
    #[inline]
    pub fn silence(&self) -> &[u8] {
        &self.silence
    }

    /// Configuration this synthesizer was built with.
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }
}

fn render_tone(
    out: &mut Vec<u8>,
    mut low: PhaseAccumulator,
    mut high: PhaseAccumulator,
    len: usize,
) {
    out.clear();
    out.reserve_exact(len);
    for _ in 0..len {
        let avg = (fixed_sine(low.tick()) + fixed_sine(high.tick())) * 0.5;
        out.push(quantize_u8(avg));
    }
}
