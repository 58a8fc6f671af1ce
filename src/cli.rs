use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use spectral_eq::augment::{discover_sources, run_augmentation, AugmentGrid, SoundStretch};
use spectral_eq::config::{read_config_json, write_config_json};
use spectral_eq::markup::{convert_file, MarkupOptions};
use spectral_eq::{BandSpec, EqConfig, EqError, GainScale, WavFormat, WindowType};

/// Band equalizer and speech-dataset helpers.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the band equalizer to a WAV file
    Eq(EqArgs),
    /// Convert plain text into <speak> markup with pauses
    Markup(MarkupArgs),
    /// Render tempo/pitch variants of audio_*_*.wav files with soundstretch
    Augment(AugmentArgs),
}

#[derive(Args, Debug)]
struct EqArgs {
    /// Input WAV file
    input: PathBuf,

    /// Output WAV file
    output: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Band as start:end:gain_db (repeatable; replaces configured bands)
    #[arg(short, long = "band", value_parser = parse_band, allow_hyphen_values = true)]
    bands: Vec<BandSpec>,

    /// FFT size
    #[arg(long)]
    fft_size: Option<usize>,

    /// Block overlap in percent
    #[arg(long)]
    overlap: Option<f64>,

    /// Hop length in samples (overrides --overlap)
    #[arg(long)]
    hop: Option<usize>,

    /// Window: hann, blackman-harris, kaiser[:beta]
    #[arg(short, long, value_parser = parse_window_str)]
    window: Option<WindowType>,

    /// Decibel convention: amplitude (20 log10) or power (10 log10)
    #[arg(long, value_parser = parse_scale)]
    scale: Option<GainScale>,

    /// Skip peak normalization of the input
    #[arg(long)]
    no_normalize: bool,

    /// Write 24-bit PCM output (default: 16-bit)
    #[arg(long = "24bit", conflicts_with = "float")]
    pcm24: bool,

    /// Write 32-bit float output
    #[arg(long)]
    float: bool,

    /// Save the effective configuration as JSON
    #[arg(long)]
    dump_config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct MarkupArgs {
    /// Plain text input
    #[arg(default_value = "raw_text.txt")]
    input: PathBuf,

    /// Markup output
    #[arg(default_value = "texts/text_00020.txt")]
    output: PathBuf,

    /// Pause length in milliseconds
    #[arg(long, default_value_t = 300)]
    break_ms: u32,
}

#[derive(Args, Debug)]
struct AugmentArgs {
    /// Directory holding audio_*_*.wav sources
    #[arg(short, long, default_value = "WAVs")]
    input_dir: PathBuf,

    /// Directory receiving rendered variants
    #[arg(short, long, default_value = "WAVs_mod")]
    output_dir: PathBuf,

    /// soundstretch executable
    #[arg(long, default_value = "soundstretch")]
    tool: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Command::Eq(args) => run_eq(args),
        Command::Markup(args) => run_markup(args),
        Command::Augment(args) => run_augment(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_eq(args: EqArgs) -> Result<(), EqError> {
    let mut config = match &args.config {
        Some(path) => read_config_json(path)?,
        None => EqConfig::default(),
    };
    if !args.bands.is_empty() {
        config.bands = args.bands;
    }
    if let Some(n) = args.fft_size {
        config.fft_size = n;
    }
    if let Some(p) = args.overlap {
        config.overlap_percent = p;
        config.hop_size = None;
    }
    if let Some(h) = args.hop {
        config.hop_size = Some(h);
    }
    if let Some(w) = args.window {
        config.window = w;
    }
    if let Some(s) = args.scale {
        config.gain_scale = s;
    }
    if args.no_normalize {
        config.normalize = false;
    }
    if let Some(path) = &args.dump_config {
        write_config_json(path, &config)?;
        log::info!("configuration written to {}", path.display());
    }

    let format = if args.float {
        WavFormat::Float32
    } else if args.pcm24 {
        WavFormat::Pcm24
    } else {
        WavFormat::Pcm16
    };

    let start = std::time::Instant::now();
    let output = spectral_eq::equalize_wav_file(&args.input, &args.output, &config, format)?;
    let elapsed = start.elapsed().as_secs_f64();

    log::info!(
        "wrote {}: {} frames, {:.2}s of audio in {:.3}s",
        args.output.display(),
        output.num_frames(),
        output.duration_secs(),
        elapsed
    );
    Ok(())
}

fn run_markup(args: MarkupArgs) -> Result<(), EqError> {
    let options = MarkupOptions {
        break_ms: args.break_ms,
        ..MarkupOptions::default()
    };
    convert_file(&args.input, &args.output, &options)
}

fn run_augment(args: AugmentArgs) -> Result<(), EqError> {
    let groups = discover_sources(&args.input_dir)?;
    if groups.is_empty() {
        return Err(EqError::InvalidFormat(format!(
            "no audio_*_*.wav files in {}",
            args.input_dir.display()
        )));
    }
    log::info!("found {} group(s)", groups.len());

    let grid = AugmentGrid::default();
    let mut tool = SoundStretch::new(&args.tool);
    let report = run_augmentation(&groups, &grid, &args.output_dir, &mut tool)?;

    for group in &report.groups {
        match group.last_index() {
            Some(last) => log::info!(
                "{}: {} file(s), variants 00006..{:05}",
                group.prefix,
                group.created,
                last
            ),
            None => log::info!("{}: nothing created", group.prefix),
        }
    }
    log::info!(
        "done: {} group(s), {} file(s) created, {} failed",
        report.groups.len(),
        report.total_created(),
        report.total_failed()
    );
    Ok(())
}

fn parse_band(s: &str) -> Result<BandSpec, String> {
    BandSpec::parse(s).map_err(|e| e.to_string())
}

fn parse_scale(s: &str) -> Result<GainScale, String> {
    match s {
        "amplitude" | "amp" | "20" => Ok(GainScale::Amplitude),
        "power" | "pow" | "10" => Ok(GainScale::Power),
        other => Err(format!(
            "unknown gain scale '{}' (use amplitude or power)",
            other
        )),
    }
}

fn parse_window_str(s: &str) -> Result<WindowType, String> {
    match s {
        "hann" => Ok(WindowType::Hann),
        "blackman-harris" | "bh" => Ok(WindowType::BlackmanHarris),
        "kaiser" => Ok(WindowType::Kaiser(800)), // default beta=8.0
        other if other.starts_with("kaiser:") => {
            let beta_str = &other["kaiser:".len()..];
            match beta_str.parse::<f64>() {
                Ok(beta) if beta >= 0.0 => Ok(WindowType::Kaiser((beta * 100.0).round() as u32)),
                _ => Err(format!(
                    "invalid Kaiser beta: '{}' (expected positive number)",
                    beta_str
                )),
            }
        }
        other => Err(format!(
            "unknown window type '{}' (use hann, blackman-harris, or kaiser:<beta>)",
            other
        )),
    }
}
