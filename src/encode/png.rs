use std::io::Cursor;

use crate::foundation::error::{BoardcastError, BoardcastResult};
use crate::foundation::math::flatten_premul_over_bg;
use crate::render::surface::FrameRgba;

/// Encode one rendered frame as PNG bytes.
pub(crate) fn png_bytes(frame: &FrameRgba) -> BoardcastResult<Vec<u8>> {
    let mut straight = vec![0u8; frame.data.len()];
    flatten_premul_over_bg(&mut straight, &frame.data, [0, 0, 0])?;

    let img = image::RgbaImage::from_raw(frame.width, frame.height, straight)
        .ok_or_else(|| BoardcastError::encode("frame buffer has the wrong length"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| BoardcastError::encode(format!("failed to encode png: {e}")))?;
    Ok(out)
}
