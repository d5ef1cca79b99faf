use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::Result;

/// Longest side of the working image
pub const DEFAULT_MAX_SIZE: u32 = 800;

/// Open an image file, guessing the format from its contents
pub(crate) fn open_image(file: &Path) -> Result<DynamicImage> {
    let image = image::ImageReader::open(file)?
        .with_guessed_format()?
        .decode()?;
    Ok(image)
}

/// Shrink the image so its longest side is at most `max_size`, never enlarging it
pub fn fit_within(image: &RgbaImage, max_size: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if longest <= max_size || max_size == 0 {
        return image.clone();
    }
    let scale = f64::from(max_size) / f64::from(longest);
    let new_width = ((f64::from(width) * scale).round() as u32).max(1);
    let new_height = ((f64::from(height) * scale).round() as u32).max(1);
    imageops::resize(image, new_width, new_height, FilterType::Triangle)
}

/// Crop the largest centered square
pub fn crop_to_square(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let size = width.min(height);
    imageops::crop_imm(image, (width - size) / 2, (height - size) / 2, size, size).to_image()
}

/// Writes PNG files next to the input, or to a fixed path when one is given
pub struct ImageSaver {
    base_path: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
}

impl ImageSaver {
    pub fn new(base_path: &Path, output: Option<&Path>, verbose: bool) -> Self {
        Self {
            base_path: base_path.to_owned(),
            output: output.map(Path::to_owned),
            verbose,
        }
    }

    /// Save RGBA image to PNG file with suffix appended before extension
    pub fn save_rgba_image_as(&self, image: &RgbaImage, suffix: &str) -> Result<PathBuf> {
        let filename = self.compute_path(suffix);
        let file = File::create(&filename)?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.write_header()?.write_image_data(image.as_raw())?;

        if self.verbose {
            println!("{}: saved", filename.display());
        }
        Ok(filename)
    }

    /// Compute full file path from base path and suffix, unless an output path was given
    pub fn compute_path(&self, suffix: &str) -> PathBuf {
        match &self.output {
            Some(output) => output.clone(),
            None => format!("{}-{suffix}.png", self.base_path.display()).into(),
        }
    }
}
