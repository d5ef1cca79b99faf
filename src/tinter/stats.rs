use crate::color::LabColor;

/// Replacement for a zero spread, so ratios of deviations stay finite
pub(crate) const MIN_STD: f64 = 1e-6;

/// Per-channel statistics of the opaque pixels of an image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabStats {
    pub mean_l: f64,
    pub mean_a: f64,
    pub mean_b: f64,
    pub std_l: f64,
    pub std_a: f64,
    pub std_b: f64,
    pub min_l: f64,
    pub max_l: f64,
}

impl Default for LabStats {
    fn default() -> Self {
        Self {
            mean_l: 50.0,
            mean_a: 0.0,
            mean_b: 0.0,
            std_l: 1.0,
            std_a: 1.0,
            std_b: 1.0,
            min_l: 0.0,
            max_l: 100.0,
        }
    }
}

impl LabStats {
    /// Means, population standard deviations and the lightness extremes
    pub fn from_samples(samples: &[LabColor]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let count = samples.len() as f64;

        let mut sum = [0.0; 3];
        let mut min_l = f64::INFINITY;
        let mut max_l = f64::NEG_INFINITY;
        for lab in samples {
            sum[0] += lab.l;
            sum[1] += lab.a;
            sum[2] += lab.b;
            min_l = min_l.min(lab.l);
            max_l = max_l.max(lab.l);
        }
        let mean = sum.map(|total| total / count);

        let mut variance = [0.0; 3];
        for lab in samples {
            variance[0] += (lab.l - mean[0]).powi(2);
            variance[1] += (lab.a - mean[1]).powi(2);
            variance[2] += (lab.b - mean[2]).powi(2);
        }
        let [std_l, std_a, std_b] = variance.map(|total| nonzero_std((total / count).sqrt()));

        Self {
            mean_l: mean[0],
            mean_a: mean[1],
            mean_b: mean[2],
            std_l,
            std_a,
            std_b,
            min_l,
            max_l,
        }
    }
}

fn nonzero_std(std: f64) -> f64 {
    if std == 0.0 || std.is_nan() {
        MIN_STD
    } else {
        std
    }
}

/// Coarse description of the source image used to steer the transfer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveMetrics {
    /// Mean absolute high-frequency luminance over 10, capped at 1
    pub texture_intensity: f64,
    /// Lightness range over 100, capped at 1
    pub contrast_level: f64,
    pub luminance_range: f64,
    pub is_dark_image: bool,
    pub is_light_image: bool,
    pub has_strong_texture: bool,
}

impl AdaptiveMetrics {
    pub fn measure(stats: &LabStats, high_frequency: &[f64]) -> Self {
        let (texture_mean, texture_std) = if high_frequency.is_empty() {
            (0.0, 0.0)
        } else {
            let count = high_frequency.len() as f64;
            let mean = high_frequency.iter().map(|value| value.abs()).sum::<f64>() / count;
            let variance = high_frequency
                .iter()
                .map(|value| (value.abs() - mean).powi(2))
                .sum::<f64>()
                / count;
            (mean, variance.sqrt())
        };
        let luminance_range = stats.max_l - stats.min_l;

        Self {
            texture_intensity: (texture_mean / 10.0).min(1.0),
            contrast_level: (luminance_range / 100.0).min(1.0),
            luminance_range,
            is_dark_image: stats.mean_l < 40.0,
            is_light_image: stats.mean_l > 70.0,
            has_strong_texture: texture_std > 4.0,
        }
    }
}
