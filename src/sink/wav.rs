//! WAV file output
//!
//! Renders every submitted buffer into an 8-bit mono WAV file, which is the
//! exact sample format the synthesizer produces.

use super::AudioSink;
use crate::{DtmfError, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Sink that appends submitted audio to a WAV file.
///
/// Call [`finalize`](Self::finalize) to write the final header; dropping the
/// sink also finalizes it but discards any error.
pub struct WavSink {
    writer: hound::WavWriter<BufWriter<File>>,
    path: PathBuf,
}

impl WavSink {
    /// Create (or truncate) `path` for 8-bit mono audio at `sample_rate` Hz.
    pub fn create<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 8,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::create(&path, spec).map_err(|e| {
            DtmfError::SinkFailure(format!("Failed to create WAV file '{}': {}", path.display(), e))
        })?;
        Ok(Self { writer, path })
    }

    /// Output file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of samples written so far.
    pub fn frames_written(&self) -> u32 {
        self.writer.len()
    }

    /// Flush and write the final WAV header.
    pub fn finalize(self) -> Result<()> {
        self.writer
            .finalize()
            .map_err(|e| DtmfError::SinkFailure(format!("Failed to finalize WAV file: {}", e)))
    }
}

impl AudioSink for WavSink {
    fn submit(&mut self, samples: &[u8]) -> Result<()> {
        // hound stores 8-bit WAV as unsigned on disk but takes signed samples.
        for &sample in samples {
            self.writer
                .write_sample((sample as i16 - 128) as i8)
                .map_err(|e| DtmfError::SinkFailure(format!("Failed to write sample: {}", e)))?;
        }
        Ok(())
    }
}
