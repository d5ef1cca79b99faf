use std::path::PathBuf;

use image::RgbaImage;

pub use self::adjust::{Adjustments, adjust_image, adjust_rgb, apply_adjustments};
pub use self::io::{DEFAULT_MAX_SIZE, ImageSaver, crop_to_square, fit_within};
pub use self::stats::{AdaptiveMetrics, LabStats};
pub use self::transfer::{ReinhardConfig, ReinhardTransfer, TargetColor};

use crate::Result;
use crate::color::{self, LabColor, RgbColor};

mod adjust;
mod io;
mod stats;
pub mod texture;
mod transfer;

/// An opaque pixel and its color
struct Sample {
    x: u32,
    y: u32,
    lab: LabColor,
}

/// Dye a fabric image with the target color
///
/// Fully transparent pixels are left as they are, the alpha of the others is kept. An image
/// without any visible pixel comes back unchanged.
pub fn tint_image(image: &RgbaImage, target: TargetColor, config: &ReinhardConfig) -> RgbaImage {
    let samples: Vec<Sample> = image
        .enumerate_pixels()
        .filter(|(_, _, pixel)| pixel[3] != 0)
        .map(|(x, y, pixel)| Sample {
            x,
            y,
            lab: color::rgb_to_lab(RgbColor::from(*pixel)),
        })
        .collect();
    if samples.is_empty() {
        return image.clone();
    }

    let labs: Vec<LabColor> = samples.iter().map(|sample| sample.lab).collect();
    let stats = LabStats::from_samples(&labs);

    let plane = texture::lightness_plane(
        image.width(),
        image.height(),
        samples.iter().map(|sample| (sample.x, sample.y, sample.lab.l)),
    );
    let detail_plane = texture::high_frequency(&plane, texture::TEXTURE_SIGMA);
    let details: Vec<f64> = samples
        .iter()
        .map(|sample| f64::from(detail_plane.get_pixel(sample.x, sample.y)[0]))
        .collect();

    let metrics = AdaptiveMetrics::measure(&stats, &details);
    let transfer = ReinhardTransfer::new(stats, &metrics, target.to_lab(), config);

    let mut tinted = image.clone();
    for (sample, detail) in samples.iter().zip(details) {
        let alpha = image.get_pixel(sample.x, sample.y)[3];
        let rgb = color::lab_to_rgb(transfer.apply(sample.lab, detail));
        tinted.put_pixel(sample.x, sample.y, rgb.to_rgba(alpha));
    }
    tinted
}

/// Tints one image file and saves the result as PNG
pub struct Tinter {
    file: PathBuf,
    target: TargetColor,
    config: ReinhardConfig,
    adjustments: Adjustments,
    max_size: u32,
    crop: bool,
    output: Option<PathBuf>,
    verbose: bool,
}

impl Tinter {
    pub fn new(file: PathBuf, target: TargetColor, config: ReinhardConfig) -> Self {
        Self {
            file,
            target,
            config,
            adjustments: Adjustments::default(),
            max_size: DEFAULT_MAX_SIZE,
            crop: true,
            output: None,
            verbose: false,
        }
    }

    #[must_use]
    pub fn with_adjustments(mut self, adjustments: Adjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    #[must_use]
    pub fn with_crop(mut self, crop: bool) -> Self {
        self.crop = crop;
        self
    }

    /// Save to this path instead of next to the input
    #[must_use]
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run the whole pipeline and return the path of the saved image
    pub fn process(self) -> Result<PathBuf> {
        let image = io::open_image(&self.file)?.to_rgba8();
        if self.verbose {
            println!(
                "{}: {}x{}",
                self.file.display(),
                image.width(),
                image.height()
            );
        }

        let image = fit_within(&image, self.max_size);
        if self.verbose {
            println!(
                "{}: working at {}x{}, target {}",
                self.file.display(),
                image.width(),
                image.height(),
                self.target.to_lab()
            );
        }

        let mut tinted = tint_image(&image, self.target, &self.config);
        if !self.adjustments.is_identity() {
            if self.verbose {
                println!("{}: applying {:?}", self.file.display(), self.adjustments);
            }
            adjust_image(&mut tinted, &self.adjustments);
        }

        let tinted = if self.crop {
            crop_to_square(&tinted)
        } else {
            tinted
        };
        let saver = ImageSaver::new(
            &self.file.with_extension(""),
            self.output.as_deref(),
            self.verbose,
        );
        saver.save_rgba_image_as(&tinted, "tinted")
    }
}
