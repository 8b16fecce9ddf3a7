use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use common::log_setup::{setup_logging, LogConfig};
use common::SerdeFormat;
use glam::IVec2;
use serde::{Deserialize, Serialize};

use unwarp::landmarks::file::{format_landmark_table, read_landmarks};
use unwarp::{rescale_between, FillMode, ImageSize, LandmarkPairs, MaskRegion, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "unwarp")]
#[command(about = "Landmark and mask tools for paired-image registration")]
#[command(version)]
struct Cli {
    /// Base log level; RUST_LOG overrides it.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// YAML or JSON file with `log` and `session` sections.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a landmark file as a table.
    Show {
        file: PathBuf,

        /// Append the display colour of each landmark.
        #[arg(long)]
        colors: bool,
    },

    /// Rescale the target column of a landmark file to a new image size.
    Rescale {
        input: PathBuf,
        output: PathBuf,

        /// Target image size the file was made for, e.g. 512x512.
        #[arg(long)]
        from: ImageSize,

        /// New target image size.
        #[arg(long)]
        to: ImageSize,
    },

    /// Trace a polygon mask and write it as a PNG.
    Mask {
        output: PathBuf,

        #[arg(long)]
        size: ImageSize,

        /// Vertices as "x,y x,y ...".
        #[arg(long)]
        vertices: String,

        /// Exclude the inside of the polygon instead.
        #[arg(long)]
        invert: bool,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CliConfig {
    log: LogConfig,
    session: SessionConfig,
}

impl CliConfig {
    fn load(path: &Path) -> Result<Self> {
        let format = SerdeFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = format
            .deserialize(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.session.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    setup_logging(&config.log).context("Failed to set up logging")?;

    let result = match cli.command {
        Command::Show { file, colors } => show(&file, colors, &config.session),
        Command::Rescale {
            input,
            output,
            from,
            to,
        } => rescale(&input, &output, from, to),
        Command::Mask {
            output,
            size,
            vertices,
            invert,
        } => mask(&output, size, &vertices, invert),
    };
    if let Err(err) = &result {
        tracing::warn!("{err:#}");
    }
    result
}

fn show(path: &Path, colors: bool, session: &SessionConfig) -> Result<()> {
    let rows = read_landmarks(path)?;
    // Sizes only matter for editing; a listing never clamps or rescales.
    let any = ImageSize::new(u32::MAX, u32::MAX);
    let mut pairs = LandmarkPairs::with_colors(any, any, session.colors.cycle());
    pairs.replace(&rows.source, &rows.target)?;

    let table = format_landmark_table(&pairs);
    if !colors {
        print!("{table}");
        return Ok(());
    }
    let mut lines = table.lines();
    if let Some(header) = lines.next() {
        println!("{header}\tColor");
    }
    for (line, landmark) in lines.zip(pairs.source().iter()) {
        let [r, g, b] = landmark.color.to_rgb();
        println!("{line}\t#{r:02x}{g:02x}{b:02x}");
    }
    Ok(())
}

fn rescale(input: &Path, output: &Path, from: ImageSize, to: ImageSize) -> Result<()> {
    if from.is_empty() || to.is_empty() {
        bail!("image sizes must be non-empty, got {from} and {to}");
    }
    let rows = read_landmarks(input)?;
    let target: Vec<IVec2> = rows
        .target
        .iter()
        .map(|&p| rescale_between(p, from, to))
        .collect();
    let pairs = LandmarkPairs::from_point_lists(from, to, &rows.source, &target)?;
    pairs
        .save_file(output)
        .with_context(|| format!("Failed to save rescaled landmarks to {}", output.display()))?;
    println!(
        "Rescaled {} landmarks from {from} to {to} into {}",
        pairs.len(),
        output.display()
    );
    Ok(())
}

fn parse_vertices(text: &str) -> Result<Vec<IVec2>> {
    text.split_whitespace()
        .map(|token| {
            let (x, y) = token
                .split_once(',')
                .with_context(|| format!("vertex '{token}' is not x,y"))?;
            let x = x.trim().parse().with_context(|| format!("bad x in '{token}'"))?;
            let y = y.trim().parse().with_context(|| format!("bad y in '{token}'"))?;
            Ok(IVec2::new(x, y))
        })
        .collect()
}

fn mask(output: &Path, size: ImageSize, vertices: &str, invert: bool) -> Result<()> {
    let vertices = parse_vertices(vertices)?;
    let mut region = MaskRegion::new(size);
    for v in vertices {
        region.add_vertex(v);
    }
    let mode = if invert {
        FillMode::Inverted
    } else {
        FillMode::Normal
    };
    if !region.close(mode) {
        bail!("a mask needs at least one vertex");
    }
    region.write_image(output)?;
    println!(
        "{} of {} pixels included, written to {}",
        region.included_count(),
        size.pixel_count(),
        output.display()
    );
    Ok(())
}
