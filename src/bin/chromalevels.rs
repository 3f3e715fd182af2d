use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chromalevels", version)]
struct Cli {
    /// Log verbosity on stderr (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cluster counts a run with `--steps` would render.
    Levels(LevelsArgs),
    /// Quantize an image level by level and write the stills and a video.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct LevelsArgs {
    /// Number of requested steps (>= 2).
    #[arg(long)]
    steps: u32,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for stills and the video.
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of requested steps (>= 2).
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// Seed for reproducible clustering (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,

    /// Run options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Video file name without extension.
    #[arg(long, default_value = "levels")]
    video_name: String,

    /// Only write the stills (no `ffmpeg` needed).
    #[arg(long)]
    no_video: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Levels(args) => cmd_levels(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn cmd_levels(args: LevelsArgs) -> anyhow::Result<()> {
    let levels = chromalevels::cluster_levels(args.steps)?;
    let line: Vec<String> = levels.iter().map(u32::to_string).collect();
    println!("{}", line.join(" "));
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut opts = match args.config.as_deref() {
        Some(path) => chromalevels::RunOpts::from_path(path)?,
        None => chromalevels::RunOpts::default(),
    };
    if args.seed.is_some() {
        opts.seed = args.seed;
    }

    let raster = chromalevels::raster::decode::load_image(&args.in_path)?;
    let session = chromalevels::RunSession::new(&raster, args.steps, opts)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut coop = chromalevels::Cooperative::detached();
    let mut progress = |p: chromalevels::Progress| {
        eprintln!("[{}/{}] {} clusters", p.step, p.total, p.k);
    };

    if args.no_video {
        let frames = match session.render_frames(&mut coop, &mut progress) {
            Ok(frames) => frames,
            Err(failure) => {
                write_stills(&args.out_dir, &failure.frames)?;
                return Err(failure.into());
            }
        };
        write_stills(&args.out_dir, &frames)?;
        return Ok(());
    }

    let mut encoder = chromalevels::FfmpegEncoder::new();
    let out = match session.run(&mut encoder, &mut coop, &mut progress) {
        Ok(out) => out,
        Err(failure) => {
            write_stills(&args.out_dir, &failure.frames)?;
            return Err(failure.into());
        }
    };
    write_stills(&args.out_dir, &out.frames)?;

    let video_path = args
        .out_dir
        .join(format!("{}.{}", args.video_name, out.video.profile.extension()));
    out.video.save(&video_path)?;
    eprintln!(
        "wrote {} ({}, {} ms)",
        video_path.display(),
        out.video.mime_type(),
        out.video.duration_ms()
    );
    Ok(())
}

fn write_stills(dir: &Path, frames: &[chromalevels::Frame]) -> anyhow::Result<()> {
    for frame in frames {
        let path = dir.join(frame.file_name());
        std::fs::write(&path, &frame.png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        eprintln!("wrote {} ({})", path.display(), frame.label());
    }
    Ok(())
}
