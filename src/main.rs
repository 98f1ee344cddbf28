use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imagegene::models::{AppConfig, FontFamily, CONFIG_ENV};
use imagegene::raster_ops::{self, stego};
use imagegene::rendering::{Codec, ImageFormat};
use imagegene::services::Pipeline;

#[derive(Parser)]
#[command(name = "imagegene")]
#[command(about = "ImageGene - filters, dithering, compositing and steganography for raster images")]
struct Cli {
    /// Config file (defaults to $IMAGEGENE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a YAML recipe against an image
    Run {
        /// Recipe file
        recipe: PathBuf,

        /// Override the recipe's output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Hide a message in the low bits of an image
    Hide {
        /// Carrier image
        input: PathBuf,

        /// Where to write the result (use a lossless format)
        #[arg(short, long)]
        output: PathBuf,

        /// Message to embed
        #[arg(short, long)]
        message: String,
    },
    /// Print a message hidden with `hide`
    Reveal {
        /// Image carrying the message
        input: PathBuf,
    },
    /// Write the per-channel difference of two images
    Diff {
        /// First image; the result has its shape
        a: PathBuf,

        /// Second image
        b: PathBuf,

        /// Output image
        #[arg(short, long)]
        output: PathBuf,

        /// Stretch the differences to full range, never by more than 255/scale
        #[arg(short, long)]
        scale: Option<u8>,
    },
    /// Print the shape of an image and how much it can hide
    Info {
        /// Image file
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imagegene=info,raster_ops=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = AppConfig::load(cli.config.as_deref());

    match cli.command {
        Some(Commands::Run { recipe, output }) => run_recipe_command(&config, &recipe, output),
        Some(Commands::Hide {
            input,
            output,
            message,
        }) => run_hide_command(&config, &input, &output, &message),
        Some(Commands::Reveal { input }) => run_reveal_command(&config, &input),
        Some(Commands::Diff {
            a,
            b,
            output,
            scale,
        }) => run_diff_command(&config, &a, &b, &output, scale),
        Some(Commands::Info { input }) => run_info_command(&config, &input),
        None => {
            run_status_command(&config, cli.config.as_deref());
            Ok(())
        }
    }
}

/// Run a recipe, optionally redirecting its final output
fn run_recipe_command(
    config: &AppConfig,
    recipe_path: &Path,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut recipe = imagegene::services::Recipe::from_file(recipe_path)
        .with_context(|| format!("Failed to load recipe {}", recipe_path.display()))?;
    if output.is_some() {
        recipe.output = output;
    }

    let base = recipe_path.parent().map(Path::to_path_buf).unwrap_or_default();
    let pipeline = Pipeline::new(config).with_base_dir(base);
    let (buffer, report) = pipeline.run(&recipe)?;

    println!(
        "Applied {} of {} steps ({}x{}, {} channels)",
        report.applied,
        recipe.steps.len(),
        buffer.width(),
        buffer.height(),
        buffer.channels()
    );
    for skipped in &report.skipped {
        println!("  skipped step {} ({}): {}", skipped.index, skipped.op, skipped.error);
    }
    if !report.missing_glyphs.is_empty() {
        let missing: String = report.missing_glyphs.iter().collect();
        println!("  missing glyphs: {missing:?}");
    }
    for message in &report.revealed {
        println!("  revealed: {message}");
    }
    for path in &report.written {
        println!("  wrote {}", path.display());
    }

    Ok(())
}

fn run_hide_command(
    config: &AppConfig,
    input: &Path,
    output: &Path,
    message: &str,
) -> anyhow::Result<()> {
    let codec = Codec::new(&config.output);
    let mut buffer = codec.decode(input)?;

    if ImageFormat::from_path(output) == ImageFormat::Jpeg {
        tracing::warn!("JPEG is lossy; the hidden message will not survive");
    }

    stego::encode(&mut buffer, message.as_bytes()).with_context(|| {
        format!(
            "{} can hold at most {} bytes",
            input.display(),
            stego::capacity(&buffer)
        )
    })?;
    codec.encode(&buffer, output)?;

    println!("Hid {} bytes in {}", message.len(), output.display());
    Ok(())
}

fn run_reveal_command(config: &AppConfig, input: &Path) -> anyhow::Result<()> {
    let buffer = Codec::new(&config.output).decode(input)?;
    let bytes = stego::decode(&buffer)
        .with_context(|| format!("No readable message in {}", input.display()))?;
    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}

fn run_diff_command(
    config: &AppConfig,
    a: &Path,
    b: &Path,
    output: &Path,
    scale: Option<u8>,
) -> anyhow::Result<()> {
    let codec = Codec::new(&config.output);
    let mut first = codec.decode(a)?;
    let second = codec.decode(b)?;

    match scale {
        Some(scale) => {
            let factor = raster_ops::diffmap_with_scale(&mut first, &second, scale);
            println!("Scaled differences by {factor}");
        }
        None => raster_ops::diffmap(&mut first, &second),
    }

    codec.encode(&first, output)?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn run_info_command(config: &AppConfig, input: &Path) -> anyhow::Result<()> {
    let buffer = Codec::new(&config.output).decode(input)?;

    println!("{}", input.display());
    println!("  Size:     {}x{}", buffer.width(), buffer.height());
    println!("  Channels: {}", buffer.channels());
    println!("  Bytes:    {}", buffer.len());
    println!("  Capacity: {} bytes hidden", stego::capacity(&buffer));
    Ok(())
}

/// Print configuration status and a command overview
fn run_status_command(config: &AppConfig, explicit: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("ImageGene v{VERSION}");
    println!("Pixel-buffer image toolkit\n");

    println!("Configuration:");
    match AppConfig::resolve_path(explicit) {
        Some(path) if path.exists() => println!("  Config file: {}", path.display()),
        Some(path) => println!("  Config file: {} (not found, defaults)", path.display()),
        None => println!("  Config file: (not set, {CONFIG_ENV} unset)"),
    }
    println!("  JPEG quality: {}", config.output.jpeg_quality);

    println!("\nFonts:");
    println!("  Directory: {}", config.fonts.directory.display());
    println!(
        "  System fallback: {} ({})",
        config.fonts.fallback_family,
        if config.fonts.system_fonts {
            "enabled"
        } else {
            "disabled"
        }
    );
    for family in FontFamily::ALL {
        let path = config.fonts.file_for(family);
        let state = if path.is_file() { "found" } else { "missing" };
        println!("  {:<12} {} ({state})", family.name(), path.display());
    }

    println!("\nCommands:");
    println!("  imagegene run      Apply a YAML recipe to an image");
    println!("  imagegene hide     Embed a message in an image");
    println!("  imagegene reveal   Extract an embedded message");
    println!("  imagegene diff     Difference map of two images");
    println!("  imagegene info     Show image shape and capacity");
    println!("\nRun 'imagegene --help' for more details.");
}
