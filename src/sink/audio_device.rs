//! Sound card output using rodio
//!
//! Each submitted buffer is queued on a rodio [`Sink`] and the call blocks
//! until it has finished playing, so submissions never overlap.

use super::AudioSink;
use crate::{DtmfError, Result};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

/// Convert unsigned 8-bit PCM (midpoint 128) to `f32` in `[-1, 1)`.
#[inline]
fn pcm_u8_to_f32(sample: u8) -> f32 {
    (sample as f32 - 128.0) / 128.0
}

/// Playback on the default output device.
///
/// The output stream is opened in [`AudioDevice::new`] and released when the
/// device is dropped, after queued audio has drained.
pub struct AudioDevice {
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
    sample_rate: u32,
}

impl AudioDevice {
    /// Open the default output device for mono playback at `sample_rate` Hz.
    pub fn new(sample_rate: u32) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| DtmfError::SinkFailure(format!("can't open pcm: {}", e)))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| DtmfError::SinkFailure(format!("can't create audio sink: {}", e)))?;

        tracing::debug!(sample_rate, "opened default audio output device");

        Ok(AudioDevice {
            _stream: stream,
            _handle: handle,
            sink,
            sample_rate,
        })
    }

    /// Sample rate submitted buffers are played at.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl AudioSink for AudioDevice {
    fn submit(&mut self, samples: &[u8]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }
        let data: Vec<f32> = samples.iter().copied().map(pcm_u8_to_f32).collect();
        self.sink.append(SamplesBuffer::new(1, self.sample_rate, data));
        self.sink.sleep_until_end();
        Ok(())
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        self.sink.sleep_until_end();
        self.sink.stop();
    }
}
