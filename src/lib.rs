pub use self::error::{Error, Result};

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, error::ErrorKind};
use wild::ArgsOs;

use crate::arg_validators::HexBytes;
use crate::color::{LabColor, RgbColor};
use crate::conflicts::DEFAULT_CONFLICT_THRESHOLD;
use crate::tinter::{Adjustments, DEFAULT_MAX_SIZE, ReinhardConfig, TargetColor, Tinter};

mod arg_validators;
pub mod catalog;
pub mod color;
mod commands;
pub mod conflicts;
mod error;
pub mod tinter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Verbose messages
    #[arg(short('v'), long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a color as hex, RGB, LAB and HSL
    Convert {
        /// CSS color or L,a,b triple
        #[arg(value_parser = arg_validators::validate_color, allow_hyphen_values = true)]
        color: TargetColor,
    },
    /// CIEDE2000 difference between two colors
    DeltaE {
        /// CSS color or L,a,b triple
        #[arg(value_parser = arg_validators::validate_color, allow_hyphen_values = true)]
        first: TargetColor,
        /// CSS color or L,a,b triple
        #[arg(value_parser = arg_validators::validate_color, allow_hyphen_values = true)]
        second: TargetColor,
    },
    /// List every pair of catalog colors that are too similar
    Conflicts(ConflictsArgs),
    /// Check a new color against a catalog
    Check(CheckArgs),
    /// Dye fabric images with a color
    Tint(TintArgs),
    /// Decode a colorimeter measurement packet
    Packet {
        /// Packet bytes in hex, like "AB 44 00 ..."
        #[arg(required(true), value_parser = arg_validators::validate_hex_bytes)]
        bytes: Vec<HexBytes>,
    },
}

#[derive(clap::Args, Debug)]
struct ConflictsArgs {
    /// Catalog JSON file
    catalog: PathBuf,
    /// ΔE00 below which two colors conflict
    #[arg(
        short('t'),
        long,
        default_value_t = DEFAULT_CONFLICT_THRESHOLD,
        value_parser = arg_validators::validate_threshold
    )]
    threshold: f64,
    /// Skip pairs whose lightness gap alone rules out a conflict
    #[arg(short('p'), long, default_value_t = false)]
    prune: bool,
    /// Print the pairs as JSON
    #[arg(short('j'), long, default_value_t = false)]
    json: bool,
    /// Print the per-color index as JSON instead of the pairs
    #[arg(short('m'), long, default_value_t = false)]
    map: bool,
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Catalog JSON file
    catalog: PathBuf,
    /// CSS color or L,a,b triple
    #[arg(value_parser = arg_validators::validate_color, allow_hyphen_values = true)]
    color: TargetColor,
    /// ΔE00 below which two colors conflict
    #[arg(
        short('t'),
        long,
        default_value_t = DEFAULT_CONFLICT_THRESHOLD,
        value_parser = arg_validators::validate_threshold
    )]
    threshold: f64,
    /// The color is a raw colorimeter reading that still needs compensation
    #[arg(short('c'), long, default_value_t = false)]
    compensate: bool,
}

#[derive(clap::Args, Debug)]
#[group(id = "target", required = true, multiple = false)]
struct TargetArgs {
    /// Target color in CSS syntax
    #[arg(short('c'), long, value_parser = arg_validators::validate_rgb_color)]
    color: Option<RgbColor>,
    /// Target color as an L,a,b triple
    #[arg(
        short('l'),
        long,
        value_parser = arg_validators::validate_lab_color,
        allow_hyphen_values = true
    )]
    lab: Option<LabColor>,
}

impl TargetArgs {
    fn target(&self) -> Option<TargetColor> {
        self.lab
            .map(TargetColor::Lab)
            .or(self.color.map(TargetColor::Rgb))
    }
}

#[derive(clap::Args, Debug)]
struct TintArgs {
    /// Input image files
    #[arg(required(true))]
    files: Vec<PathBuf>,
    #[command(flatten)]
    target: TargetArgs,
    /// Output file, only with a single input
    #[arg(short('o'), long)]
    output: Option<PathBuf>,
    /// Transfer preset JSON file, flags below override it
    #[arg(short('P'), long)]
    preset: Option<PathBuf>,
    /// Longest side of the working image (pixels)
    #[arg(
        short('s'),
        long,
        default_value_t = DEFAULT_MAX_SIZE,
        value_parser = arg_validators::validate_max_size
    )]
    max_size: u32,
    /// Keep the full frame instead of cropping a square
    #[arg(long, default_value_t = false)]
    no_crop: bool,
    /// Chroma multiplier
    #[arg(long, allow_negative_numbers = true)]
    saturation_multiplier: Option<f64>,
    /// Extra lightness spread
    #[arg(long, allow_negative_numbers = true)]
    contrast_boost: Option<f64>,
    /// Weight of the reapplied fabric texture
    #[arg(long, allow_negative_numbers = true)]
    detail_amount: Option<f64>,
    /// Lightness S-curve strength
    #[arg(long, allow_negative_numbers = true)]
    s_curve: Option<f64>,
    /// Lightness subtracted from every pixel
    #[arg(long, allow_negative_numbers = true)]
    darken: Option<f64>,
    /// Chroma lost in the shadows
    #[arg(long, allow_negative_numbers = true)]
    shadow_desaturation: Option<f64>,
    /// Rotation of the a-b plane (degrees)
    #[arg(long, allow_negative_numbers = true)]
    hue_shift: Option<f64>,
    /// Manual hue correction (degrees)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    hue: f64,
    /// Manual saturation correction (percent)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    saturation: f64,
    /// Manual brightness correction (percent)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    brightness: f64,
    /// Manual contrast correction (percent)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    contrast: f64,
}

impl TintArgs {
    /// Preset (or defaults) with the flags given on the command line on top
    fn reinhard_config(&self) -> Result<ReinhardConfig> {
        let mut config = match &self.preset {
            Some(preset) => ReinhardConfig::from_json_file(preset)?,
            None => ReinhardConfig::default(),
        };
        let overrides = [
            (self.saturation_multiplier, &mut config.saturation_multiplier),
            (self.contrast_boost, &mut config.contrast_boost),
            (self.detail_amount, &mut config.detail_amount),
            (self.s_curve, &mut config.luminance_s_curve),
            (self.darken, &mut config.darken_amount),
            (self.shadow_desaturation, &mut config.shadow_desaturation),
            (self.hue_shift, &mut config.hue_shift),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        Ok(config)
    }

    fn adjustments(&self) -> Adjustments {
        Adjustments {
            hue: self.hue,
            saturation: self.saturation,
            brightness: self.brightness,
            contrast: self.contrast,
        }
    }
}

pub fn run(args: ArgsOs) -> Result<()> {
    let cli = Cli::parse_from(args);
    match &cli.command {
        Command::Convert { color } => commands::convert(*color),
        Command::DeltaE { first, second } => commands::delta_e(*first, *second),
        Command::Conflicts(args) => commands::conflicts(args, cli.verbose),
        Command::Check(args) => commands::check(args, cli.verbose),
        Command::Packet { bytes } => {
            let bytes: Vec<u8> = bytes.iter().flat_map(|run| run.0.iter().copied()).collect();
            commands::packet(&bytes)
        }
        Command::Tint(args) => tint(args, cli.verbose),
    }
}

fn tint(args: &TintArgs, verbose: bool) -> Result<()> {
    if args.output.is_some() && args.files.len() > 1 {
        Cli::command()
            .error(ErrorKind::ArgumentConflict, "--output needs exactly one input file")
            .exit();
    }
    let Some(target) = args.target.target() else {
        Cli::command()
            .error(ErrorKind::MissingRequiredArgument, "--color or --lab is required")
            .exit();
    };
    let config = args.reinhard_config()?;
    if verbose {
        println!("Transfer settings: {config:?}");
    }
    for file in &args.files {
        let mut tinter = Tinter::new(file.to_owned(), target, config)
            .with_adjustments(args.adjustments())
            .with_max_size(args.max_size)
            .with_crop(!args.no_crop)
            .with_verbose(verbose);
        if let Some(output) = &args.output {
            tinter = tinter.with_output(output.to_owned());
        }
        let saved = tinter.process()?;
        println!("{}: saved {}", file.display(), saved.display());
    }
    Ok(())
}
