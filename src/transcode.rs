//! File and stream conversion between binary data and DTMF symbol text
//!
//! The stream functions work on any reader/writer pair; the file functions
//! wrap them and attach the offending path to I/O failures.

use crate::codec::{encode_into, Decoder};
use crate::{DtmfError, Result};
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::Path;

const CHUNK_SIZE: usize = 8192;

/// Byte counts of a finished conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscodeStats {
    /// Bytes consumed from the input
    pub bytes_in: u64,
    /// Bytes produced on the output
    pub bytes_out: u64,
}

/// Which side of a conversion an I/O error came from.
enum Side {
    Input,
    Output,
}

type SideResult<T> = std::result::Result<T, (Side, std::io::Error)>;

fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> SideResult<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other.map_err(|e| (Side::Input, e)),
        }
    }
}

fn encode_impl<R: Read, W: Write>(mut reader: R, mut writer: W) -> SideResult<TranscodeStats> {
    let mut stats = TranscodeStats::default();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut out = Vec::with_capacity(CHUNK_SIZE * 2);

    loop {
        let len = read_chunk(&mut reader, &mut buf)?;
        if len == 0 {
            break;
        }
        out.clear();
        encode_into(&buf[..len], &mut out);
        writer.write_all(&out).map_err(|e| (Side::Output, e))?;
        stats.bytes_in += len as u64;
        stats.bytes_out += out.len() as u64;
    }
    writer.flush().map_err(|e| (Side::Output, e))?;
    Ok(stats)
}

/// Decode errors are either codec errors or side-tagged I/O errors.
enum DecodeFailure {
    Codec(DtmfError),
    Io(Side, std::io::Error),
}

impl From<(Side, std::io::Error)> for DecodeFailure {
    fn from((side, e): (Side, std::io::Error)) -> Self {
        DecodeFailure::Io(side, e)
    }
}

fn decode_impl<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
) -> std::result::Result<TranscodeStats, DecodeFailure> {
    let mut stats = TranscodeStats::default();
    let mut decoder = Decoder::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut out = Vec::with_capacity(CHUNK_SIZE / 2 + 1);

    loop {
        let len = read_chunk(&mut reader, &mut buf)?;
        if len == 0 {
            break;
        }
        out.clear();
        let fed = decoder.feed(&buf[..len], &mut out);
        // Bytes completed before a bad symbol are still written.
        writer.write_all(&out).map_err(|e| (Side::Output, e))?;
        stats.bytes_in += len as u64;
        stats.bytes_out += out.len() as u64;
        if let Err(err) = fed {
            writer.flush().map_err(|e| (Side::Output, e))?;
            return Err(DecodeFailure::Codec(err));
        }
    }
    writer.flush().map_err(|e| (Side::Output, e))?;
    decoder.finish().map_err(DecodeFailure::Codec)?;
    Ok(stats)
}

/// Encode everything from `reader` as symbol text on `writer`.
pub fn encode_stream<R: Read, W: Write>(reader: R, writer: W) -> Result<TranscodeStats> {
    encode_impl(reader, writer).map_err(|(_, e)| DtmfError::Io(e))
}

/// Decode symbol text from `reader` into bytes on `writer`.
///
/// Bytes decoded before an invalid or dangling symbol have already been
/// written when the error is returned.
pub fn decode_stream<R: Read, W: Write>(reader: R, writer: W) -> Result<TranscodeStats> {
    decode_impl(reader, writer).map_err(|failure| match failure {
        DecodeFailure::Codec(err) => err,
        DecodeFailure::Io(_, e) => DtmfError::Io(e),
    })
}

fn open_pair(input: &Path, output: &Path) -> Result<(File, BufWriter<File>)> {
    let reader = File::open(input).map_err(|source| DtmfError::IoFailure {
        path: input.to_path_buf(),
        source,
    })?;
    let writer = File::create(output).map_err(|source| DtmfError::IoFailure {
        path: output.to_path_buf(),
        source,
    })?;
    Ok((reader, BufWriter::new(writer)))
}

fn attribute(side: Side, source: std::io::Error, input: &Path, output: &Path) -> DtmfError {
    let path = match side {
        Side::Input => input,
        Side::Output => output,
    };
    DtmfError::IoFailure {
        path: path.to_path_buf(),
        source,
    }
}

/// Convert the binary file `input` into the symbol file `output`.
pub fn encode_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<TranscodeStats> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let (reader, writer) = open_pair(input, output)?;
    let stats =
        encode_impl(reader, writer).map_err(|(side, e)| attribute(side, e, input, output))?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        bytes = stats.bytes_in,
        symbols = stats.bytes_out,
        "encoded binary file to DTMF symbols"
    );
    Ok(stats)
}

/// Convert the symbol file `input` back into the binary file `output`.
pub fn decode_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<TranscodeStats> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let (reader, writer) = open_pair(input, output)?;
    let stats = decode_impl(reader, writer).map_err(|failure| match failure {
        DecodeFailure::Codec(err) => err,
        DecodeFailure::Io(side, e) => attribute(side, e, input, output),
    })?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        symbols = stats.bytes_in,
        bytes = stats.bytes_out,
        "decoded DTMF symbols to binary file"
    );
    Ok(stats)
}
