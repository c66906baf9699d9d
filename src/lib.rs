//! DTMF tone synthesis and symbol transcoding
//!
//! Generates dual-tone multi-frequency (DTMF) audio for the sixteen keypad
//! symbols `0-9 A-D # *`, and converts losslessly between arbitrary binary data
//! and text made of those symbols (two symbols per byte, high nibble first).
//!
//! # Features
//! - Pre-rendered unsigned 8-bit PCM tone bank using 16-bit fixed-point oscillators
//! - Byte ↔ symbol-pair codec with typed errors for invalid and dangling symbols
//! - Playback sequencer for strings, buffers and unbounded byte streams
//! - Pluggable [`AudioSink`] targets: sound card, WAV file, raw PCM writer, memory
//!
//! # Crate feature flags
//! - `export-wav` (default): WAV file rendering via `hound` ([`sink::WavSink`])
//! - `streaming` (opt-in): Sound card playback via `rodio` ([`sink::AudioDevice`])
//!
//! # Quick start
//! ## Encode and decode
//! ```
//! let text = dtmf::codec::encode(b"\xAB\x3D");
//! assert_eq!(text, b"AB3D");
//! assert_eq!(dtmf::codec::decode(&text).unwrap(), vec![0xAB, 0x3D]);
//! ```
//!
//! ## Play symbols into a sink
//! ```
//! use std::sync::Arc;
//! use dtmf::{MemorySink, PlaybackSequencer, SynthConfig, ToneSynthesizer};
//!
//! let synth = Arc::new(ToneSynthesizer::rendered(SynthConfig::default()).unwrap());
//! let sink = MemorySink::new();
//! let mut player = PlaybackSequencer::new(synth, sink.clone()).unwrap();
//! player.play_str("12#").unwrap();
//! assert_eq!(sink.submission_count(), 6); // three tones, three gaps
//! ```

#![warn(missing_docs)]

use std::path::PathBuf;

pub mod alphabet; // Symbol tables
pub mod codec; // Byte <-> symbol pairs
pub mod config; // Synthesizer settings
pub mod sequencer; // Playback driver
pub mod sink; // Audio output targets
pub mod synth; // Tone rendering
pub mod transcode; // File/stream conversion

/// Error types for DTMF synthesis, transcoding and playback
#[derive(thiserror::Error, Debug)]
pub enum DtmfError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Byte outside the symbol alphabet
    #[error("Invalid symbol 0x{value:02X} at offset {offset}")]
    InvalidSymbol {
        /// Offending byte
        value: u8,
        /// Zero-based position in the input
        offset: u64,
    },

    /// Odd-length symbol stream (high nibble without a low nibble)
    #[error("Invalid trailing symbol: stream of {length} symbols has no final low nibble")]
    TruncatedStream {
        /// Total number of symbols read
        length: u64,
    },

    /// Audio sink rejected a buffer
    #[error("Audio sink error: {0}")]
    SinkFailure(String),

    /// IO error attributed to a file
    #[error("IO error on '{}': {source}", .path.display())]
    IoFailure {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// IO error from a stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for DTMF operations
pub type Result<T> = std::result::Result<T, DtmfError>;

// Public API exports
pub use alphabet::Symbol;
pub use config::SynthConfig;
pub use sequencer::{PlaybackSequencer, StreamSummary};
pub use sink::{AudioSink, MemorySink, RawPcmSink};
pub use synth::ToneSynthesizer;

#[cfg(feature = "streaming")]
pub use sink::AudioDevice;
#[cfg(feature = "export-wav")]
pub use sink::WavSink;
