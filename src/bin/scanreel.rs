use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use scanreel::{FrameIndex, LabelFont, RenderToGifOpts, Scene};

#[derive(Parser, Debug)]
#[command(name = "scanreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene to an animated GIF.
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the built-in demo scene as JSON.
    Scene,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Scene JSON; the built-in demo scene when omitted.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Output GIF path.
    #[arg(long, default_value = "dynamic_face_tracking.gif")]
    out: PathBuf,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    keep_existing: bool,

    /// Label font path; well-known monospace fonts are probed when omitted.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Override the scene's frame count.
    #[arg(long)]
    frames: Option<u32>,

    /// Override the scene's palette quality (1 best .. 30 fastest).
    #[arg(long)]
    quality: Option<i32>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Scene JSON; the built-in demo scene when omitted.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Frame index (0-based).
    #[arg(long)]
    index: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Label font path; well-known monospace fonts are probed when omitted.
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Scene => cmd_scene(),
    }
}

fn load_scene(path: Option<&PathBuf>) -> anyhow::Result<Scene> {
    match path {
        Some(path) => {
            Scene::from_path(path).with_context(|| format!("load scene '{}'", path.display()))
        }
        None => Ok(Scene::demo()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(args.scene.as_ref())?;
    if let Some(frames) = args.frames {
        scene.frames = frames;
    }
    if let Some(quality) = args.quality {
        scene.quality = quality;
    }

    let opts = RenderToGifOpts {
        overwrite: !args.keep_existing,
        font_path: args.font,
    };
    let stats = scanreel::render_to_gif(&scene, &args.out, &opts)?;

    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames_rendered);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = load_scene(args.scene.as_ref())?;
    let font = match LabelFont::load(args.font.as_deref()) {
        Ok(font) => Some(font),
        Err(err) => {
            eprintln!("warning: {err}; rendering without text");
            None
        }
    };

    let frame = scanreel::render_frame(&scene, font.as_ref(), FrameIndex(args.index))?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_scene() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&Scene::demo()).context("serialize demo scene")?;
    println!("{json}");
    Ok(())
}
