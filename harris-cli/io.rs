use std::path::Path;

use harris_core::Image;
use image::{DynamicImage, Rgb, RgbImage};

use crate::HarrisResult;

/// Decode an image file into a planar `Image` with samples in [0, 1]
pub fn load_image<P: AsRef<Path>>(path: P) -> HarrisResult<Image> {
    let decoded = image::open(path.as_ref())?;
    log::debug!(
        "loaded {} ({}x{}, {:?})",
        path.as_ref().display(),
        decoded.width(),
        decoded.height(),
        decoded.color()
    );
    from_dynamic(&decoded)
}

/// Gray (with or without alpha) becomes one channel, everything else RGB.
/// Alpha is discarded.
pub fn from_dynamic(img: &DynamicImage) -> HarrisResult<Image> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let image = match img.color().channel_count() {
        1 | 2 => {
            let gray = img.to_luma8();
            Image::from_fn(w, h, 1, |x, y, _| gray.get_pixel(x as u32, y as u32)[0] as f32 / 255.0)?
        }
        _ => {
            let rgb = img.to_rgb8();
            Image::from_fn(w, h, 3, |x, y, c| rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0)?
        }
    };
    Ok(image)
}

/// 8-bit RGB rendering of an `Image`. One channel is replicated, counts
/// other than one or three are shown as luminance.
pub fn to_rgb8(img: &Image) -> RgbImage {
    let view = match img.channels() {
        1 | 3 => None,
        _ => Some(img.to_luminance()),
    };
    let src = view.as_ref().unwrap_or(img);
    RgbImage::from_fn(src.width() as u32, src.height() as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let px = |c: usize| quantize(src.get(x, y, c.min(src.channels() - 1)));
        Rgb([px(0), px(1), px(2)])
    })
}

#[inline]
fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
