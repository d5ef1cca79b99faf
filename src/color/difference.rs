//! CIEDE2000 color difference
//!
//! Follows Sharma, Wu & Dalal, "The CIEDE2000 Color-Difference Formula: Implementation Notes,
//! Supplementary Test Data, and Mathematical Observations" (2005), with kL = kC = kH = 1.

use super::LabColor;

/// 25^7, the chroma pivot of the G and R_C terms
const POW25_7: f64 = 6_103_515_625.0;

/// Perceptual difference between two LAB colors
///
/// Symmetric up to floating point, zero for identical input and never negative.
pub fn delta_e_2000(lab1: LabColor, lab2: LabColor) -> f64 {
    let LabColor { l: l1, a: a1, b: b1 } = lab1;
    let LabColor { l: l2, a: a2, b: b2 } = lab2;

    let c1 = a1.hypot(b1);
    let c2 = a2.hypot(b2);
    let c_mean = (c1 + c2) / 2.0;

    let g = 0.5 * (1.0 - chroma_ratio(c_mean));
    let a1_prime = (1.0 + g) * a1;
    let a2_prime = (1.0 + g) * a2;

    let c1_prime = a1_prime.hypot(b1);
    let c2_prime = a2_prime.hypot(b2);
    let h1_prime = hue_degrees(b1, a1_prime);
    let h2_prime = hue_degrees(b2, a2_prime);

    let delta_l_prime = l2 - l1;
    let delta_c_prime = c2_prime - c1_prime;

    // Achromatic colors have no defined hue
    let achromatic = c1_prime * c2_prime == 0.0;
    let hue_gap = h2_prime - h1_prime;
    let delta_h_prime = if achromatic {
        0.0
    } else if hue_gap.abs() <= 180.0 {
        hue_gap
    } else if hue_gap > 180.0 {
        hue_gap - 360.0
    } else {
        hue_gap + 360.0
    };
    let delta_big_h_prime =
        2.0 * (c1_prime * c2_prime).sqrt() * (delta_h_prime.to_radians() / 2.0).sin();

    let l_prime_mean = (l1 + l2) / 2.0;
    let c_prime_mean = (c1_prime + c2_prime) / 2.0;
    let h_prime_mean = if achromatic {
        h1_prime + h2_prime
    } else if (h1_prime - h2_prime).abs() <= 180.0 {
        (h1_prime + h2_prime) / 2.0
    } else if h1_prime + h2_prime < 360.0 {
        (h1_prime + h2_prime + 360.0) / 2.0
    } else {
        (h1_prime + h2_prime - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_prime_mean - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_prime_mean).to_radians().cos()
        + 0.32 * (3.0 * h_prime_mean + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_prime_mean - 63.0).to_radians().cos();

    let delta_theta = 30.0 * (-((h_prime_mean - 275.0) / 25.0).powi(2)).exp();
    let r_c = 2.0 * chroma_ratio(c_prime_mean);
    let r_t = -(2.0 * delta_theta).to_radians().sin() * r_c;

    let s_l = lightness_weight(l_prime_mean);
    let s_c = 1.0 + 0.045 * c_prime_mean;
    let s_h = 1.0 + 0.015 * c_prime_mean * t;

    let lightness = delta_l_prime / s_l;
    let chroma = delta_c_prime / s_c;
    let hue = delta_big_h_prime / s_h;

    (lightness * lightness + chroma * chroma + hue * hue + r_t * chroma * hue).sqrt()
}

/// The S_L weighting function for a mean lightness
///
/// Grows with the distance from L = 50, which makes it a usable upper bound for pruning.
pub(crate) fn lightness_weight(l_mean: f64) -> f64 {
    let offset = (l_mean - 50.0).powi(2);
    1.0 + 0.015 * offset / (20.0 + offset).sqrt()
}

/// sqrt(C^7 / (C^7 + 25^7))
fn chroma_ratio(c: f64) -> f64 {
    let c7 = c.powi(7);
    (c7 / (c7 + POW25_7)).sqrt()
}

fn hue_degrees(b: f64, a_prime: f64) -> f64 {
    let degrees = b.atan2(a_prime).to_degrees().rem_euclid(360.0);
    if degrees >= 360.0 { 0.0 } else { degrees }
}

#[cfg(test)]
mod tests {
    use palette::color_difference::Ciede2000;
    use palette::white_point::D65;

    use super::*;

    fn lab(l: f64, a: f64, b: f64) -> LabColor {
        LabColor::new(l, a, b)
    }

    /// Selected pairs from the Sharma et al. supplementary test data
    const SHARMA_PAIRS: [([f64; 3], [f64; 3], f64); 16] = [
        ([50.0, 2.6772, -79.7751], [50.0, 0.0, -82.7485], 2.0425),
        ([50.0, 3.1571, -77.2803], [50.0, 0.0, -82.7485], 2.8615),
        ([50.0, 2.8361, -74.0200], [50.0, 0.0, -82.7485], 3.4412),
        ([50.0, -1.3802, -84.2814], [50.0, 0.0, -82.7485], 1.0000),
        ([50.0, 0.0, 0.0], [50.0, -1.0, 2.0], 2.3669),
        ([50.0, -1.0, 2.0], [50.0, 0.0, 0.0], 2.3669),
        ([50.0, 2.49, -0.001], [50.0, -2.49, 0.0009], 7.1792),
        ([50.0, 2.49, -0.001], [50.0, -2.49, 0.0010], 7.1792),
        ([50.0, 2.49, -0.001], [50.0, -2.49, 0.0011], 7.2195),
        ([50.0, 2.49, -0.001], [50.0, -2.49, 0.0012], 7.2195),
        ([50.0, 2.5, 0.0], [73.0, 25.0, -18.0], 27.1492),
        ([50.0, 2.5, 0.0], [61.0, -5.0, 29.0], 22.8977),
        ([50.0, 2.5, 0.0], [56.0, -27.0, -3.0], 31.9030),
        ([50.0, 2.5, 0.0], [58.0, 24.0, 15.0], 19.4535),
        ([50.0, 2.5, 0.0], [50.0, 3.1736, 0.5854], 1.0000),
        ([60.2574, -34.0099, 36.2677], [60.4626, -34.1751, 39.4387], 1.2644),
    ];

    #[test]
    fn matches_sharma_reference_data() {
        for (first, second, expected) in SHARMA_PAIRS {
            let actual = delta_e_2000(
                lab(first[0], first[1], first[2]),
                lab(second[0], second[1], second[2]),
            );
            assert!(
                (actual - expected).abs() < 1e-4,
                "{first:?} vs {second:?}: expected {expected}, got {actual}"
            );
        }
    }

    #[test]
    fn sharma_pair_one() {
        let value = delta_e_2000(lab(50.0, 2.6772, -79.7751), lab(50.0, 0.0, -82.7485));
        assert!((value - 2.0425).abs() < 1e-4, "got {value}");
    }

    #[test]
    fn identical_colors_have_zero_difference() {
        for color in [lab(0.0, 0.0, 0.0), lab(50.0, 20.0, -30.0), lab(100.0, -128.0, 127.0)] {
            assert_eq!(delta_e_2000(color, color), 0.0);
        }
    }

    #[test]
    fn difference_is_symmetric() {
        let samples = [
            lab(50.0, 2.6772, -79.7751),
            lab(0.0, 0.0, 0.0),
            lab(100.0, 0.0, 0.0),
            lab(35.0, -60.0, 10.0),
            lab(72.5, 5.0, 90.0),
            lab(20.0, 127.0, -128.0),
            lab(50.0, 0.0, 3.0),
        ];
        for first in samples {
            for second in samples {
                let forward = delta_e_2000(first, second);
                let backward = delta_e_2000(second, first);
                assert!(forward >= 0.0);
                assert!((forward - backward).abs() < 1e-9, "{first} vs {second}");
            }
        }
    }

    #[test]
    fn achromatic_pair_reduces_to_lightness_term() {
        let value = delta_e_2000(lab(40.0, 0.0, 0.0), lab(60.0, 0.0, 0.0));
        assert!((value - 20.0 / lightness_weight(50.0)).abs() < 1e-12);
    }

    #[test]
    fn agrees_with_palette() {
        let samples = [
            lab(50.0, 2.6772, -79.7751),
            lab(35.0, -60.0, 10.0),
            lab(72.5, 5.0, 90.0),
            lab(60.2574, -34.0099, 36.2677),
            lab(22.0, 40.0, -40.0),
        ];
        for first in samples {
            for second in samples {
                let ours = delta_e_2000(first, second);
                let theirs = Ciede2000::difference(
                    palette::Lab::<D65, f64>::from(first),
                    palette::Lab::<D65, f64>::from(second),
                );
                assert!((ours - theirs).abs() < 1e-4, "{first} vs {second}: {ours} vs {theirs}");
            }
        }
    }

    #[test]
    fn hue_stays_below_a_full_turn() {
        let hue = hue_degrees(-1e-20, 1.0);
        assert_eq!(hue, 0.0);
        let value = delta_e_2000(lab(50.0, 1.0, -1e-20), lab(50.0, 1.0, 1e-20));
        assert!(value < 1e-9, "got {value}");
    }

    #[test]
    fn lightness_weight_grows_away_from_mid_gray() {
        assert_eq!(lightness_weight(50.0), 1.0);
        assert!(lightness_weight(0.0) > lightness_weight(25.0));
        assert!((lightness_weight(0.0) - lightness_weight(100.0)).abs() < 1e-12);
    }
}
