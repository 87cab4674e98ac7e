use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "choreo", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the engine over a synthetic frame library and print one JSON status per tick.
    Trace(TraceArgs),
    /// Load a frame manifest, run the engine for a while and write the composited PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct SignalArgs {
    /// Tempo of the synthetic kick pulse.
    #[arg(long, default_value_t = 150.0)]
    bpm: f64,

    /// Ticks per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Engine config JSON; defaults apply to anything it leaves out.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the config's PRNG seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    #[command(flatten)]
    signal: SignalArgs,

    /// Seconds of signal to run.
    #[arg(long, default_value_t = 8.0)]
    seconds: f64,

    /// Only print ticks that registered a beat or a scratch.
    #[arg(long)]
    events_only: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    signal: SignalArgs,

    /// Frame manifest JSON. Image paths resolve relative to it.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of ticks to run before compositing.
    #[arg(long, default_value_t = 120)]
    ticks: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

/// One frame plus where its image lives on disk.
#[derive(serde::Deserialize, Debug)]
struct ManifestFrame {
    #[serde(flatten)]
    frame: choreo::Frame,
    path: PathBuf,
}

#[derive(serde::Deserialize, Debug)]
struct Manifest {
    canvas: choreo::Canvas,
    frames: Vec<ManifestFrame>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Trace(args) => cmd_trace(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_config(args: &SignalArgs) -> anyhow::Result<choreo::ChoreoConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            choreo::ChoreoConfig::from_json_str(&json)?
        }
        None => choreo::ChoreoConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    Ok(cfg)
}

fn tick_interval(args: &SignalArgs) -> anyhow::Result<f64> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be > 0");
    }
    if !(args.bpm.is_finite() && args.bpm > 0.0) {
        anyhow::bail!("--bpm must be > 0");
    }
    Ok(1.0 / args.fps)
}

/// Kick on every beat, hats on the off-beats, a mid swell across each bar.
fn pulse(t: f64, bpm: f64) -> choreo::AudioFeatures {
    let beat = t * bpm / 60.0;
    let phase = beat.fract();
    let bass = if phase < 0.25 { 1.0 } else { 0.1 };
    let hat_phase = (beat * 2.0).fract();
    let high = if hat_phase > 0.5 && hat_phase < 0.56 { 0.7 } else { 0.1 };
    let bar = (beat / 4.0).fract();
    let mid = 0.2 + 0.5 * (std::f64::consts::PI * bar).sin();
    choreo::AudioFeatures::new(bass, mid, high, 0.4 + 0.6 * bass)
}

fn synthetic_library() -> Vec<choreo::Frame> {
    use choreo::{Direction, EnergyTier, Frame, MacroRegion, Role};
    vec![
        Frame::new("stand", EnergyTier::Low).with_role(Role::Base),
        Frame::new("bounce", EnergyTier::Low),
        Frame::new("lean", EnergyTier::Low),
        Frame::new("step_left", EnergyTier::Mid).with_direction(Direction::Left),
        Frame::new("arm_left", EnergyTier::Mid).with_direction(Direction::Left),
        Frame::new("step_right", EnergyTier::Mid).with_direction(Direction::Right),
        Frame::new("arm_right", EnergyTier::Mid)
            .with_direction(Direction::Right)
            .with_image("arm_left")
            .mirrored(),
        Frame::new("jump", EnergyTier::High),
        Frame::new("spin", EnergyTier::High),
        Frame::new("face", EnergyTier::High).with_macro_region(MacroRegion::Face),
        Frame::new("hands", EnergyTier::Mid).with_role(Role::Closeup),
    ]
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.signal)?;
    let step = tick_interval(&args.signal)?;
    let mut engine = choreo::Engine::with_frames(cfg, synthetic_library())?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let ticks = (args.seconds.max(0.0) / step).round() as u64;
    for i in 0..=ticks {
        let t = i as f64 * step;
        let status = engine.tick(&choreo::TickInput::new(t, pulse(t, args.signal.bpm)));
        if args.events_only && status.beat.is_none() && status.stutter.is_none() {
            continue;
        }
        serde_json::to_writer(&mut out, &status).context("serialize tick status")?;
        writeln!(out).context("write tick status")?;
    }
    out.flush().context("flush stdout")?;
    Ok(())
}

fn read_manifest(path: &Path) -> anyhow::Result<Manifest> {
    let f = File::open(path).with_context(|| format!("open manifest '{}'", path.display()))?;
    let manifest: Manifest =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse manifest JSON")?;
    Ok(manifest)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.signal)?;
    let step = tick_interval(&args.signal)?;
    let manifest = read_manifest(&args.in_path)?;
    let canvas = choreo::Canvas::new(manifest.canvas.width, manifest.canvas.height)?;

    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let mut assets = choreo::AssetStore::new();
    let mut frames = Vec::with_capacity(manifest.frames.len());
    for entry in manifest.frames {
        if !assets.contains(&entry.frame.image) {
            let image = choreo::load_image_file(&root.join(&entry.path))?;
            assets.insert(entry.frame.image.clone(), image);
        }
        frames.push(entry.frame);
    }

    let mut engine = choreo::Engine::with_frames(cfg, frames)?;
    for i in 0..args.ticks {
        let t = f64::from(i) * step;
        engine.tick(&choreo::TickInput::new(t, pulse(t, args.signal.bpm)));
    }

    let mut surface = choreo::Surface::new(canvas.width, canvas.height)?;
    let stats = engine.render(&assets, &mut surface);
    tracing::info!(drawn = stats.drawn, skipped = stats.skipped, "composited");

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &surface.to_straight_rgba8(),
        surface.width,
        surface.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
