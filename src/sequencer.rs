//! Symbol-by-symbol playback
//!
//! [`PlaybackSequencer`] looks up each input character in a shared
//! [`ToneSynthesizer`] and submits the matching waveform to its [`AudioSink`].
//!
//! Accepted characters are `0-9`, `A-D` (either case), `#`, `*` and space;
//! space plays the silence buffer. Any other character, line breaks
//! included, is rejected without touching the sink. With `append_silence`
//! enabled, the silence buffer is submitted after every accepted unit, even
//! when the tone itself failed.

use crate::alphabet::Symbol;
use crate::sink::AudioSink;
use crate::synth::ToneSynthesizer;
use crate::{DtmfError, Result};
use std::io::{ErrorKind, Read};
use std::sync::Arc;

/// Read size used by [`PlaybackSequencer::play_stream`].
pub const STREAM_CHUNK_SIZE: usize = 1024;

const NO_ERROR: &str = "No error";

/// Counters reported by [`PlaybackSequencer::play_stream`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Bytes read from the source
    pub bytes_read: u64,
    /// Non-empty reads
    pub chunks: u64,
    /// Reads whose playback stopped on an error
    pub failed_chunks: u64,
}

impl StreamSummary {
    /// True when every chunk played without error.
    pub fn is_clean(&self) -> bool {
        self.failed_chunks == 0
    }
}

/// Drives a sink from strings, buffers and byte streams.
pub struct PlaybackSequencer<S: AudioSink> {
    synth: Arc<ToneSynthesizer>,
    sink: S,
    append_silence: bool,
    error_message: String,
}

impl<S: AudioSink> PlaybackSequencer<S> {
    /// Create a sequencer over a rendered synthesizer.
    ///
    /// The gap policy is taken from the synthesizer's configuration. Fails with
    /// [`DtmfError::ConfigError`] if the synthesizer was never initialized.
    pub fn new(synth: Arc<ToneSynthesizer>, sink: S) -> Result<Self> {
        if !synth.is_initialized() {
            return Err(DtmfError::ConfigError(
                "tone synthesizer must be initialized before playback".into(),
            ));
        }
        let append_silence = synth.config().append_silence;
        Ok(Self {
            synth,
            sink,
            append_silence,
            error_message: NO_ERROR.to_string(),
        })
    }

    /// Enable or disable the silence gap after each unit.
    pub fn set_append_silence(&mut self, enabled: bool) {
        self.append_silence = enabled;
    }

    /// Whether a silence gap follows each unit.
    pub fn append_silence(&self) -> bool {
        self.append_silence
    }

    /// Message of the most recent failure, or `"No error"`.
    ///
    /// Sink failures are reported with the sink's own text.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Shared synthesizer.
    pub fn synthesizer(&self) -> &Arc<ToneSynthesizer> {
        &self.synth
    }

    /// Underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Underlying sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the sequencer and return its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Play a single character.
    pub fn play_char(&mut self, ch: char) -> Result<()> {
        let mut utf8 = [0u8; 4];
        let byte = ch.encode_utf8(&mut utf8).as_bytes()[0];
        if !ch.is_ascii() {
            return self.reject(byte, 0);
        }
        self.play_unit(byte, 0)
    }

    /// Play a single byte interpreted as an ASCII character.
    pub fn play_byte(&mut self, byte: u8) -> Result<()> {
        self.play_unit(byte, 0)
    }

    /// Play every character of `text`, stopping at the first failure.
    pub fn play_str(&mut self, text: &str) -> Result<()> {
        self.play_bytes(text.as_bytes())
    }

    /// Play a bounded buffer, stopping at the first failure.
    ///
    /// Audio submitted before the failure is not retracted.
    pub fn play_bytes(&mut self, units: &[u8]) -> Result<()> {
        self.play_units(units, 0)
    }

    /// Play an unbounded byte stream until end of input.
    ///
    /// The source is read in chunks of [`STREAM_CHUNK_SIZE`] bytes and every
    /// byte is played as a unit. A chunk that fails is abandoned at the
    /// failing unit and recorded in [`error_message`](Self::error_message); playback
    /// resumes with the next chunk. Only read errors end the stream early.
    pub fn play_stream<R: Read>(&mut self, mut reader: R) -> Result<StreamSummary> {
        let mut buf = [0u8; STREAM_CHUNK_SIZE];
        let mut summary = StreamSummary::default();

        loop {
            let len = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(len) => len,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            tracing::debug!(len, "read symbols from stream");

            let base = summary.bytes_read;
            summary.bytes_read += len as u64;
            summary.chunks += 1;

            if self.play_units(&buf[..len], base).is_err() {
                summary.failed_chunks += 1;
            }
        }

        Ok(summary)
    }

    fn play_units(&mut self, units: &[u8], base_offset: u64) -> Result<()> {
        for (i, &byte) in units.iter().enumerate() {
            self.play_unit(byte, base_offset + i as u64)?;
        }
        Ok(())
    }

    fn play_unit(&mut self, byte: u8, offset: u64) -> Result<()> {
        let synth = &self.synth;
        let waveform = if byte == b' ' {
            synth.silence()
        } else {
            match Symbol::from_ascii(byte.to_ascii_uppercase()) {
                Some(symbol) => synth.waveform(symbol),
                None => return self.reject(byte, offset),
            }
        };

        tracing::debug!(unit = %(byte as char), samples = waveform.len(), "submitting tone");
        let mut outcome = self.sink.submit(waveform);
        if self.append_silence {
            let gap = self.sink.submit(synth.silence());
            outcome = outcome.and(gap);
        }

        if let Err(err) = &outcome {
            self.record(err);
        }
        outcome
    }

    fn reject(&mut self, value: u8, offset: u64) -> Result<()> {
        let err = DtmfError::InvalidSymbol { value, offset };
        self.record(&err);
        Err(err)
    }

    fn record(&mut self, err: &DtmfError) {
        tracing::warn!(error = %err, "playback failed");
        self.error_message = match err {
            DtmfError::SinkFailure(msg) => msg.clone(),
            other => other.to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthConfig;
    use crate::sink::MemorySink;
    use std::io::Cursor;

    fn synth(append_silence: bool) -> Arc<ToneSynthesizer> {
        let cfg = SynthConfig {
            append_silence,
            tone_duration_ms: 20,
            ..SynthConfig::default()
        };
        Arc::new(ToneSynthesizer::rendered(cfg).unwrap())
    }

    fn wave(synth: &ToneSynthesizer, c: u8) -> Vec<u8> {
        synth.waveform(Symbol::from_ascii(c).unwrap()).to_vec()
    }

    /// Fails the first `failures` submissions, counting every attempt.
    struct Flaky {
        failures: usize,
        attempts: usize,
    }

    impl AudioSink for Flaky {
        fn submit(&mut self, _samples: &[u8]) -> Result<()> {
            self.attempts += 1;
            if self.attempts <= self.failures {
                return Err(DtmfError::SinkFailure("snd_pcm_writei failed: broken pipe".into()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_requires_initialized_synth() {
        let raw = Arc::new(ToneSynthesizer::new(SynthConfig::default()).unwrap());
        assert!(matches!(
            PlaybackSequencer::new(raw, MemorySink::new()),
            Err(DtmfError::ConfigError(_))
        ));
    }

    #[test]
    fn test_tone_then_gap() {
        let synth = synth(true);
        let sink = MemorySink::new();
        let mut player = PlaybackSequencer::new(Arc::clone(&synth), sink.clone()).unwrap();

        player.play_char('5').unwrap();
        let subs = sink.submissions();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0], wave(&synth, b'5'));
        assert_eq!(subs[1], synth.silence());
        assert_eq!(player.error_message(), "No error");
    }

    #[test]
    fn test_case_folding() {
        let synth = synth(false);
        let sink = MemorySink::new();
        let mut player = PlaybackSequencer::new(Arc::clone(&synth), sink.clone()).unwrap();

        player.play_char('a').unwrap();
        player.play_char('A').unwrap();
        player.play_byte(b'd').unwrap();
        let subs = sink.submissions();
        assert_eq!(subs[0], subs[1]);
        assert_eq!(subs[0], wave(&synth, b'A'));
        assert_eq!(subs[2], wave(&synth, b'D'));
    }

    #[test]
    fn test_lowercase_outside_a_to_d_rejected() {
        let sink = MemorySink::new();
        let mut player = PlaybackSequencer::new(synth(true), sink.clone()).unwrap();
        assert!(player.play_char('e').is_err());
        assert_eq!(sink.submission_count(), 0);
    }

    #[test]
    fn test_invalid_character_skips_sink() {
        let sink = MemorySink::new();
        let mut player = PlaybackSequencer::new(synth(true), sink.clone()).unwrap();

        let err = player.play_char('Z').unwrap_err();
        assert!(matches!(err, DtmfError::InvalidSymbol { value: b'Z', offset: 0 }));
        assert_eq!(sink.submission_count(), 0);
        assert_eq!(player.error_message(), "Invalid symbol 0x5A at offset 0");
    }

    #[test]
    fn test_non_ascii_character_rejected() {
        let sink = MemorySink::new();
        let mut player = PlaybackSequencer::new(synth(true), sink.clone()).unwrap();
        assert!(matches!(
            player.play_char('é'),
            Err(DtmfError::InvalidSymbol { value: 0xC3, .. })
        ));
        assert_eq!(sink.submission_count(), 0);
    }

    #[test]
    fn test_space_plays_silence() {
        let synth = synth(true);
        let sink = MemorySink::new();
        let mut player = PlaybackSequencer::new(Arc::clone(&synth), sink.clone()).unwrap();

        player.play_char(' ').unwrap();
        assert_eq!(sink.submissions(), vec![synth.silence().to_vec(); 2]);
    }

    #[test]
    fn test_sequence_short_circuits() {
        let synth = synth(true);
        let sink = MemorySink::new();
        let mut player = PlaybackSequencer::new(Arc::clone(&synth), sink.clone()).unwrap();

        let err = player.play_str("12Z3").unwrap_err();
        assert!(matches!(err, DtmfError::InvalidSymbol { value: b'Z', offset: 2 }));
        // "1", gap, "2", gap; nothing for "3".
        let subs = sink.submissions();
        assert_eq!(subs.len(), 4);
        assert_eq!(subs[2], wave(&synth, b'2'));
    }

    #[test]
    fn test_no_gap_when_disabled() {
        let sink = MemorySink::new();
        let mut player = PlaybackSequencer::new(synth(true), sink.clone()).unwrap();
        player.set_append_silence(false);
        player.play_bytes(b"#*").unwrap();
        assert_eq!(sink.submission_count(), 2);
    }

    #[test]
    fn test_sink_failure_verbatim_and_halts() {
        let sink = MemorySink::new().fail_after(2);
        let mut player = PlaybackSequencer::new(synth(true), sink.clone()).unwrap();

        let err = player.play_str("123").unwrap_err();
        assert!(matches!(err, DtmfError::SinkFailure(_)));
        assert_eq!(player.error_message(), "device unavailable");
        assert_eq!(sink.submission_count(), 2);
    }

    #[test]
    fn test_gap_submitted_after_failed_tone() {
        let flaky = Flaky {
            failures: 1,
            attempts: 0,
        };
        let mut player = PlaybackSequencer::new(synth(true), flaky).unwrap();

        assert!(player.play_char('9').is_err());
        assert_eq!(player.sink().attempts, 2);
        assert_eq!(player.error_message(), "snd_pcm_writei failed: broken pipe");
    }

    #[test]
    fn test_short_write_reported() {
        let sink = MemorySink::new().with_frame_limit(10);
        let mut player = PlaybackSequencer::new(synth(false), sink).unwrap();
        assert!(player.play_char('0').is_err());
        assert_eq!(player.error_message(), "Short write (expected: 160 wrote: 10)");
    }

    #[test]
    fn test_stream_rejects_line_breaks() {
        let synth = synth(false);
        let sink = MemorySink::new();
        let mut player = PlaybackSequencer::new(Arc::clone(&synth), sink.clone()).unwrap();

        let summary = player.play_stream(Cursor::new(b"1\n2".to_vec())).unwrap();
        assert_eq!(summary.bytes_read, 3);
        assert_eq!(summary.chunks, 1);
        assert_eq!(summary.failed_chunks, 1);
        // Only "1" plays; the newline abandons the rest of the chunk.
        assert_eq!(sink.submissions(), vec![wave(&synth, b'1')]);
        assert_eq!(player.error_message(), "Invalid symbol 0x0A at offset 1");
    }

    #[test]
    fn test_stream_matches_buffer_playback() {
        let synth = synth(true);
        let streamed = MemorySink::new();
        let buffered = MemorySink::new();
        let mut a = PlaybackSequencer::new(Arc::clone(&synth), streamed.clone()).unwrap();
        let mut b = PlaybackSequencer::new(Arc::clone(&synth), buffered.clone()).unwrap();

        assert!(!a.play_stream(Cursor::new(b"7\r8".to_vec())).unwrap().is_clean());
        assert!(b.play_bytes(b"7\r8").is_err());
        assert_eq!(streamed.submissions(), buffered.submissions());
        assert_eq!(a.error_message(), b.error_message());
    }

    #[test]
    fn test_stream_continues_after_failed_chunk() {
        let sink = MemorySink::new();
        let mut player = PlaybackSequencer::new(synth(false), sink.clone()).unwrap();

        let source = Cursor::new(b"12".to_vec())
            .chain(Cursor::new(b"4Z9".to_vec()))
            .chain(Cursor::new(b"#".to_vec()));
        let summary = player.play_stream(source).unwrap();

        assert_eq!(summary.chunks, 3);
        assert_eq!(summary.failed_chunks, 1);
        assert!(!summary.is_clean());
        // 1, 2, 4, # (9 is dropped with the rest of the failed chunk)
        assert_eq!(sink.submission_count(), 4);
        assert_eq!(player.error_message(), "Invalid symbol 0x5A at offset 3");
    }

    #[test]
    fn test_stream_read_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(ErrorKind::Other, "pipe closed"))
            }
        }

        let mut player = PlaybackSequencer::new(synth(false), MemorySink::new()).unwrap();
        assert!(matches!(player.play_stream(Broken), Err(DtmfError::Io(_))));
    }

    #[test]
    fn test_shared_synth_across_threads() {
        let synth = synth(false);
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let synth = Arc::clone(&synth);
                std::thread::spawn(move || {
                    let sink = MemorySink::new();
                    let mut player = PlaybackSequencer::new(synth, sink.clone()).unwrap();
                    player.play_str("159D").unwrap();
                    sink.samples()
                })
            })
            .collect();
        let outputs: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(outputs[0], outputs[1]);
    }
}
