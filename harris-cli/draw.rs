use harris_core::{Correspondence, InterestPoint};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

/// Half-length of the cross drawn at each corner
pub const MARKER_ARM: f32 = 9.0;

pub const CORNER_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
pub const MATCH_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Draw a cross centered on every point
pub fn mark_corners(canvas: &mut RgbImage, points: &[InterestPoint], color: Rgb<u8>) {
    for p in points {
        let (x, y) = (p.x as f32, p.y as f32);
        draw_line_segment_mut(canvas, (x - MARKER_ARM, y), (x + MARKER_ARM, y), color);
        draw_line_segment_mut(canvas, (x, y - MARKER_ARM), (x, y + MARKER_ARM), color);
    }
}

/// `a` and `b` next to each other on a black canvas, `a` on the left
pub fn side_by_side(a: &RgbImage, b: &RgbImage) -> RgbImage {
    let mut canvas = RgbImage::new(a.width() + b.width(), a.height().max(b.height()));
    imageops::replace(&mut canvas, a, 0, 0);
    imageops::replace(&mut canvas, b, a.width() as i64, 0);
    canvas
}

/// Side-by-side canvas with a line from each `a` point to its `b` point
pub fn draw_matches(
    a: &RgbImage,
    b: &RgbImage,
    matches: &[Correspondence],
    color: Rgb<u8>,
) -> RgbImage {
    let mut canvas = side_by_side(a, b);
    let offset = a.width() as f32;
    for m in matches {
        draw_line_segment_mut(
            &mut canvas,
            (m.a.x as f32, m.a.y as f32),
            (m.b.x as f32 + offset, m.b.y as f32),
            color,
        );
    }
    canvas
}
