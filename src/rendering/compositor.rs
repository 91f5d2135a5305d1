//! CPU frame composition for export.
//!
//! Warps the decoded source frame through the camera transform with
//! bilinear sampling, fills uncovered output with the project background,
//! and alpha-blends the rasterized vector cursor anchored at its tip.

use image::{Rgba, RgbaImage};

use crate::models::project::Background;

use super::composer::ComposedFrame;
use super::svg_cursor::{cursor_at_height, RenderedCursor};

/// Render one output frame.
pub fn compose_frame(
    source: &RgbaImage,
    frame: &ComposedFrame,
    out_width: u32,
    out_height: u32,
    background: &Background,
    draw_cursor: bool,
) -> RgbaImage {
    let mut output = RgbaImage::new(out_width, out_height);
    let src_w = source.width();
    let src_h = source.height();
    let has_source = src_w > 0 && src_h > 0;

    for oy in 0..out_height {
        for ox in 0..out_width {
            let (nx, ny) = frame.transform.invert(
                ox as f64 + 0.5,
                oy as f64 + 0.5,
                out_width,
                out_height,
            );
            let pixel = if has_source && (0.0..1.0).contains(&nx) && (0.0..1.0).contains(&ny) {
                sample_bilinear(source, nx * src_w as f64 - 0.5, ny * src_h as f64 - 0.5)
            } else {
                background_pixel(background, ox, oy, out_width, out_height)
            };
            output.put_pixel(ox, oy, pixel);
        }
    }

    if draw_cursor && frame.cursor.height_px >= 1.0 {
        let height = frame.cursor.height_px.round().max(2.0) as u32;
        if let Some(cursor) = cursor_at_height(height) {
            blend_cursor(&mut output, &cursor, frame.cursor.x, frame.cursor.y);
        }
    }

    output
}

/// Bilinear sample with edge clamping.
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let max_x = (image.width() - 1) as f64;
    let max_y = (image.height() - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width() - 1);
    let y1 = (y0 + 1).min(image.height() - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = image.get_pixel(x0, y0).0;
    let p10 = image.get_pixel(x1, y0).0;
    let p01 = image.get_pixel(x0, y1).0;
    let p11 = image.get_pixel(x1, y1).0;

    let mut out = [0u8; 4];
    for channel in 0..4 {
        let top = p00[channel] as f64 * (1.0 - fx) + p10[channel] as f64 * fx;
        let bottom = p01[channel] as f64 * (1.0 - fx) + p11[channel] as f64 * fx;
        out[channel] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

fn background_pixel(
    background: &Background,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Rgba<u8> {
    match background {
        Background::Solid { color } => parse_hex_color(color),
        Background::Gradient { from, to, direction } => {
            let from = parse_hex_color(from);
            let to = parse_hex_color(to);
            let t = if direction.eq_ignore_ascii_case("horizontal") {
                x as f64 / width.max(1) as f64
            } else {
                y as f64 / height.max(1) as f64
            };
            let mut out = [0u8; 4];
            for channel in 0..4 {
                out[channel] = (from.0[channel] as f64 * (1.0 - t) + to.0[channel] as f64 * t)
                    .round()
                    .clamp(0.0, 255.0) as u8;
            }
            Rgba(out)
        }
    }
}

/// Parse `#RRGGBB`; anything unparsable falls back to opaque black.
fn parse_hex_color(color: &str) -> Rgba<u8> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return Rgba([0, 0, 0, 255]);
    }
    let parse = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(0);
    Rgba([parse(0..2), parse(2..4), parse(4..6), 255])
}

/// Blend a premultiplied-alpha cursor bitmap with its hotspot at
/// `(tip_x, tip_y)`.
fn blend_cursor(output: &mut RgbaImage, cursor: &RenderedCursor, tip_x: f64, tip_y: f64) {
    let origin_x = tip_x.round() as i64 - cursor.hotspot_x as i64;
    let origin_y = tip_y.round() as i64 - cursor.hotspot_y as i64;

    for cy in 0..cursor.height {
        let oy = origin_y + cy as i64;
        if oy < 0 || oy >= output.height() as i64 {
            continue;
        }
        for cx in 0..cursor.width {
            let ox = origin_x + cx as i64;
            if ox < 0 || ox >= output.width() as i64 {
                continue;
            }
            let idx = ((cy * cursor.width + cx) * 4) as usize;
            let alpha = cursor.data[idx + 3] as u32;
            if alpha == 0 {
                continue;
            }
            let dst = output.get_pixel_mut(ox as u32, oy as u32);
            for channel in 0..3 {
                // Source is premultiplied: out = src + dst * (1 - a).
                let src = cursor.data[idx + channel] as u32;
                let blended = src + dst.0[channel] as u32 * (255 - alpha) / 255;
                dst.0[channel] = blended.min(255) as u8;
            }
            let dst_alpha = alpha + dst.0[3] as u32 * (255 - alpha) / 255;
            dst.0[3] = dst_alpha.min(255) as u8;
        }
    }
}
