//! Audio output targets
//!
//! The sequencer hands every rendered buffer to an [`AudioSink`]. Sinks accept
//! whole buffers of unsigned 8-bit mono PCM and either take all of it or fail;
//! a partial write is reported as a failure, never as partial success.

#[cfg(feature = "streaming")]
pub mod audio_device;
#[cfg(feature = "export-wav")]
pub mod wav;

#[cfg(feature = "streaming")]
pub use audio_device::AudioDevice;
#[cfg(feature = "export-wav")]
pub use wav::WavSink;

use crate::{DtmfError, Result};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Destination for rendered PCM-8 buffers.
///
/// `submit` blocks until the buffer has been accepted or rejected. Errors are
/// [`DtmfError::SinkFailure`] carrying the backend's message.
pub trait AudioSink {
    /// Submit one buffer of unsigned 8-bit mono samples.
    fn submit(&mut self, samples: &[u8]) -> Result<()>;
}

impl<S: AudioSink + ?Sized> AudioSink for &mut S {
    fn submit(&mut self, samples: &[u8]) -> Result<()> {
        (**self).submit(samples)
    }
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn submit(&mut self, samples: &[u8]) -> Result<()> {
        (**self).submit(samples)
    }
}

/// Failure description for a buffer the backend only partly accepted.
pub fn short_write_message(expected: usize, written: usize) -> String {
    format!("Short write (expected: {} wrote: {})", expected, written)
}

/// Writes raw unsigned 8-bit PCM to any [`Write`] (e.g. stdout piped into `aplay -f U8`).
#[derive(Debug)]
pub struct RawPcmSink<W: Write> {
    writer: W,
    frames_written: u64,
}

impl<W: Write> RawPcmSink<W> {
    /// Wrap `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            frames_written: 0,
        }
    }

    /// Total frames accepted so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AudioSink for RawPcmSink<W> {
    fn submit(&mut self, samples: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < samples.len() {
            match self.writer.write(&samples[written..]) {
                Ok(0) => {
                    return Err(DtmfError::SinkFailure(short_write_message(
                        samples.len(),
                        written,
                    )))
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(DtmfError::SinkFailure(format!("PCM write failed: {}", e))),
            }
        }
        self.writer
            .flush()
            .map_err(|e| DtmfError::SinkFailure(format!("PCM flush failed: {}", e)))?;
        self.frames_written += samples.len() as u64;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemorySinkState {
    submissions: Vec<Vec<u8>>,
    fail_after: Option<usize>,
    frame_limit: Option<usize>,
}

/// In-memory sink recording every submitted buffer.
///
/// Clones share the same recording, so a test can keep one handle while the
/// sequencer owns another. Failures can be injected to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<MemorySinkState>>,
}

impl MemorySink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every submission after the first `accepted` ones.
    pub fn fail_after(self, accepted: usize) -> Self {
        self.state.lock().fail_after = Some(accepted);
        self
    }

    /// Accept at most `frames` samples per submission (simulated short write).
    pub fn with_frame_limit(self, frames: usize) -> Self {
        self.state.lock().frame_limit = Some(frames);
        self
    }

    /// Number of accepted buffers.
    pub fn submission_count(&self) -> usize {
        self.state.lock().submissions.len()
    }

    /// Copy of every accepted buffer in submission order.
    pub fn submissions(&self) -> Vec<Vec<u8>> {
        self.state.lock().submissions.clone()
    }

    /// Every accepted sample, concatenated.
    pub fn samples(&self) -> Vec<u8> {
        self.state.lock().submissions.concat()
    }

    /// Drop the recording.
    pub fn clear(&self) {
        self.state.lock().submissions.clear();
    }
}

impl AudioSink for MemorySink {
    fn submit(&mut self, samples: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(limit) = state.fail_after {
            if state.submissions.len() >= limit {
                return Err(DtmfError::SinkFailure("device unavailable".into()));
            }
        }
        if let Some(limit) = state.frame_limit {
            if samples.len() > limit {
                return Err(DtmfError::SinkFailure(short_write_message(
                    samples.len(),
                    limit,
                )));
            }
        }
        state.submissions.push(samples.to_vec());
        Ok(())
    }
}
