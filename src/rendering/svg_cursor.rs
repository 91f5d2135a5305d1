//! Vector cursor rasterization using resvg.
//!
//! The drawn pointer is a fixed SVG silhouette (black fill, white stroke)
//! with a 72:110 width/height ratio and its hotspot at the tip, the
//! top-left of the viewBox. The silhouette is an opaque contract: any
//! re-skin must keep the hotspot and the pulse anchoring, or preview and
//! export drift apart.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

/// Embedded cursor silhouette.
const ARROW_SVG: &str = include_str!("../../assets/cursor/arrow.svg");

/// Silhouette aspect, width over height.
pub const CURSOR_ASPECT: f64 = 72.0 / 110.0;

/// Rasterized cursor as premultiplied RGBA.
#[derive(Clone)]
pub struct RenderedCursor {
    pub width: u32,
    pub height: u32,
    /// Hotspot in bitmap pixels. The tip sits at the viewBox origin, so
    /// both are zero for the stock silhouette.
    pub hotspot_x: i32,
    pub hotspot_y: i32,
    pub data: Vec<u8>,
}

/// Cache of rasterized cursors keyed by pixel height.
static CURSOR_CACHE: OnceLock<Mutex<HashMap<u32, Arc<RenderedCursor>>>> = OnceLock::new();

/// Rasterize the cursor at the given height.
///
/// Returns `None` when the SVG fails to parse or the pixmap cannot be
/// allocated; callers skip the cursor for that frame rather than fail the
/// render.
pub fn render_cursor_to_height(target_height: u32) -> Option<RenderedCursor> {
    let opts = resvg::usvg::Options::default();
    let tree = resvg::usvg::Tree::from_str(ARROW_SVG, &opts).ok()?;

    let size = tree.size();
    let orig_width = size.width();
    let orig_height = size.height();

    let height = target_height.max(2);
    let width = ((height as f32) * (orig_width / orig_height)).ceil().max(1.0) as u32;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)?;
    let transform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / orig_width,
        height as f32 / orig_height,
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // Keep premultiplied alpha for correct compositing.
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for pixel in pixmap.pixels() {
        data.extend_from_slice(&[pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()]);
    }

    Some(RenderedCursor {
        width,
        height,
        hotspot_x: 0,
        hotspot_y: 0,
        data,
    })
}

/// Cached rasterization at the given height.
pub fn cursor_at_height(target_height: u32) -> Option<Arc<RenderedCursor>> {
    let cache = CURSOR_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock();
    if let Some(found) = cache.get(&target_height) {
        return Some(found.clone());
    }
    let rendered = Arc::new(render_cursor_to_height(target_height)?);
    cache.insert(target_height, rendered.clone());
    Some(rendered)
}
