use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{BoardcastError, BoardcastResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded raster sprite in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub(crate) struct RasterSprite {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba8_premul: Arc<Vec<u8>>,
}

/// Parsed vector sprite, rasterized on demand at the target cell size.
#[derive(Clone, Debug)]
pub(crate) struct VectorSprite {
    pub(crate) tree: Arc<usvg::Tree>,
}

pub(crate) fn decode_raster_sprite(bytes: &[u8]) -> BoardcastResult<RasterSprite> {
    let dyn_img = image::load_from_memory(bytes).context("decode sprite image")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(RasterSprite {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub(crate) fn parse_vector_sprite(bytes: &[u8]) -> BoardcastResult<VectorSprite> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse sprite svg")?;
    Ok(VectorSprite {
        tree: Arc::new(tree),
    })
}

/// Rasterize a vector sprite to an exact target size in premultiplied RGBA8.
pub(crate) fn rasterize_vector_sprite(
    sprite: &VectorSprite,
    width: u32,
    height: u32,
) -> BoardcastResult<Vec<u8>> {
    let size = sprite.tree.size();
    if !(size.width() > 0.0 && size.height() > 0.0) {
        return Err(BoardcastError::configuration(
            "sprite svg has a degenerate intrinsic size",
        ));
    }
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| BoardcastError::configuration("failed to allocate sprite pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(&sprite.tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}
