use image::{ImageBuffer, Luma};

/// Lightness plane of an image, one `f32` per pixel
pub type LightnessPlane = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Blur radius separating fabric texture from the overall shading
pub const TEXTURE_SIGMA: f32 = 3.0;

/// Lightness given to pixels without a color
const TRANSPARENT_LIGHTNESS: f32 = 50.0;

/// Lightness plane of the given size, mid gray except at the listed pixels
///
/// Transparent pixels stay at mid gray so they do not bleed edges into the texture.
pub fn lightness_plane(
    width: u32,
    height: u32,
    pixels: impl IntoIterator<Item = (u32, u32, f64)>,
) -> LightnessPlane {
    let mut plane = LightnessPlane::from_pixel(width, height, Luma([TRANSPARENT_LIGHTNESS]));
    for (x, y, lightness) in pixels {
        plane.put_pixel(x, y, Luma([lightness as f32]));
    }
    plane
}

/// Fine detail of the lightness plane: the plane minus its gaussian blur
pub fn high_frequency(plane: &LightnessPlane, sigma: f32) -> LightnessPlane {
    let blurred = imageproc::filter::gaussian_blur_f32(plane, sigma);
    ImageBuffer::from_fn(plane.width(), plane.height(), |x, y| {
        Luma([plane.get_pixel(x, y)[0] - blurred.get_pixel(x, y)[0]])
    })
}
