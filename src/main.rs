//! `dtmf` command line tool
//!
//! Plays DTMF symbols on the sound card (or into a WAV/raw PCM target) and
//! converts files to and from DTMF symbol text.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use dtmf::{transcode, AudioSink, PlaybackSequencer, RawPcmSink, SynthConfig, ToneSynthesizer};

const AFTER_HELP: &str = "\
With no mode flag, the program plays the ASCII tone representation
(0123456789ABCD#*) received on stdin.

Examples:
  dtmf -s 123A#                    # Play a string on the sound card
  printf 555 | dtmf --wav out.wav  # Render stdin to a WAV file
  dtmf -b photo.jpg -o photo.dtmf  # Convert a file to tone coding
  dtmf -t photo.dtmf -o photo.jpg  # Convert it back";

#[derive(Parser, Debug)]
#[command(
    name = "dtmf",
    version,
    about = "A command line DTMF tool",
    after_help = AFTER_HELP,
    group(ArgGroup::new("file_mode").args(["binary", "tones"])),
    group(ArgGroup::new("target").args(["wav", "raw"]))
)]
struct Cli {
    /// String of tone symbols (0123456789ABCD#*) to play
    #[arg(
        short = 's',
        long = "string",
        value_name = "SYMBOLS",
        conflicts_with_all = ["binary", "tones", "output"]
    )]
    symbols: Option<String>,

    /// Regular file (binary or text) to convert into tone coding
    #[arg(short = 'b', long, value_name = "FILE", requires = "output")]
    binary: Option<PathBuf>,

    /// Tone file to convert back into the original data
    #[arg(short = 't', long, value_name = "FILE", requires = "output")]
    tones: Option<PathBuf>,

    /// Output file for -b or -t
    #[arg(short = 'o', long, value_name = "FILE", requires = "file_mode")]
    output: Option<PathBuf>,

    /// Render playback into a WAV file instead of the sound card
    #[arg(long, value_name = "FILE", conflicts_with = "file_mode")]
    wav: Option<PathBuf>,

    /// Write raw unsigned 8-bit PCM to stdout instead of the sound card
    #[arg(long, conflicts_with = "file_mode")]
    raw: bool,

    /// JSON synthesizer configuration file
    #[arg(long, value_name = "FILE", env = "DTMF_CONFIG")]
    config: Option<PathBuf>,

    /// Output sample rate in Hz
    #[arg(long, value_name = "HZ")]
    sample_rate: Option<u32>,

    /// Tone length in milliseconds
    #[arg(long, value_name = "MS")]
    duration_ms: Option<u32>,

    /// Do not insert silence after each symbol
    #[arg(long)]
    no_gap: bool,

    /// Log every read and submission
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<SynthConfig> {
    let mut config = match &cli.config {
        Some(path) => SynthConfig::from_json_file(path)?,
        None => SynthConfig::default(),
    };
    if let Some(rate) = cli.sample_rate {
        config.sample_rate = rate;
    }
    if let Some(ms) = cli.duration_ms {
        config.tone_duration_ms = ms;
    }
    if cli.no_gap {
        config.append_silence = false;
    }
    config.validate()?;
    Ok(config)
}

/// Play the inline string, or stdin when none was given, and hand the sink back.
fn play_with<S: AudioSink>(
    synth: Arc<ToneSynthesizer>,
    sink: S,
    symbols: Option<&str>,
) -> anyhow::Result<S> {
    let mut player = PlaybackSequencer::new(synth, sink)?;
    match symbols {
        Some(text) => {
            if player.play_str(text).is_err() {
                bail!("Player error: {}", player.error_message());
            }
        }
        None => {
            let summary = player
                .play_stream(io::stdin().lock())
                .context("failed to read symbols from stdin")?;
            tracing::debug!(?summary, "stdin closed");
            if !summary.is_clean() {
                bail!(
                    "Player error: {} ({} of {} reads failed)",
                    player.error_message(),
                    summary.failed_chunks,
                    summary.chunks
                );
            }
        }
    }
    Ok(player.into_sink())
}

#[cfg(feature = "export-wav")]
fn play_to_wav(
    synth: Arc<ToneSynthesizer>,
    path: &Path,
    symbols: Option<&str>,
) -> anyhow::Result<()> {
    let sink = dtmf::WavSink::create(path, synth.sample_rate())?;
    let sink = play_with(synth, sink, symbols)?;
    sink.finalize()?;
    Ok(())
}

#[cfg(not(feature = "export-wav"))]
fn play_to_wav(
    _synth: Arc<ToneSynthesizer>,
    _path: &Path,
    _symbols: Option<&str>,
) -> anyhow::Result<()> {
    bail!("WAV output requires the \"export-wav\" feature");
}

#[cfg(feature = "streaming")]
fn play_to_device(synth: Arc<ToneSynthesizer>, symbols: Option<&str>) -> anyhow::Result<()> {
    let device = dtmf::AudioDevice::new(synth.sample_rate())?;
    play_with(synth, device, symbols)?;
    Ok(())
}

#[cfg(not(feature = "streaming"))]
fn play_to_device(_synth: Arc<ToneSynthesizer>, _symbols: Option<&str>) -> anyhow::Result<()> {
    bail!(
        "sound card playback requires the \"streaming\" feature; \
         rebuild with `--features streaming` or use --wav/--raw"
    );
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let (Some(input), Some(output)) = (&cli.binary, &cli.output) {
        transcode::encode_file(input, output)
            .with_context(|| format!("failed to convert '{}'", input.display()))?;
        return Ok(());
    }
    if let (Some(input), Some(output)) = (&cli.tones, &cli.output) {
        transcode::decode_file(input, output)
            .with_context(|| format!("Dtmf decoding of '{}' failed", input.display()))?;
        return Ok(());
    }

    let config = load_config(&cli)?;
    let synth = Arc::new(ToneSynthesizer::rendered(config)?);
    let symbols = cli.symbols.as_deref();

    if let Some(path) = &cli.wav {
        play_to_wav(synth, path, symbols)
    } else if cli.raw {
        play_with(synth, RawPcmSink::new(io::stdout().lock()), symbols)?;
        Ok(())
    } else {
        play_to_device(synth, symbols)
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests exit non-zero as well.
            eprint!("{}", err.render());
            return ExitCode::from(1);
        }
    };
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(1)
        }
    }
}
