use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chess::{ALL_PIECES, Color, Piece};

use crate::assets::decode::{
    RasterSprite, VectorSprite, decode_raster_sprite, parse_vector_sprite,
    rasterize_vector_sprite,
};
use crate::board::theme::Theme;
use crate::foundation::error::{BoardcastError, BoardcastResult};

/// Sprite file stem for a piece: `wp`, `bk`, ...
fn sprite_stem(color: Color, piece: Piece) -> String {
    let c = match color {
        Color::White => 'w',
        Color::Black => 'b',
    };
    let p = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    format!("{c}{p}")
}

fn key(color: Color, piece: Piece) -> (usize, usize) {
    (color.to_index(), piece.to_index())
}

enum SpriteSource {
    Raster(RasterSprite),
    Vector(VectorSprite),
}

/// A drawable sprite paint plus its pixel dimensions.
#[derive(Clone)]
pub(crate) struct SpritePaint {
    pub(crate) image: vello_cpu::Image,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// Piece sprites for one theme, loaded eagerly so missing assets fail the
/// render before any frame is produced.
///
/// Raster sprites keep their intrinsic size and are scaled at draw time;
/// vector sprites are rasterized per requested cell size and cached, so an
/// animation pays the rasterization cost once per piece.
pub(crate) struct SpriteStore {
    theme_dir: PathBuf,
    sources: HashMap<(usize, usize), SpriteSource>,
    paints: HashMap<(usize, usize, u32), SpritePaint>,
    label_font: Option<Vec<u8>>,
}

impl SpriteStore {
    /// Load all twelve piece sprites for `theme` under `assets_root`.
    ///
    /// For each piece, `<stem>.svg` is preferred and `<stem>.png` is the
    /// fallback; a piece with neither is a fatal configuration error.
    pub(crate) fn open(assets_root: &Path, theme: Theme) -> BoardcastResult<Self> {
        let theme_dir = assets_root.join(theme.dir_name());
        let mut sources = HashMap::new();
        for color in [Color::White, Color::Black] {
            for piece in ALL_PIECES {
                let stem = sprite_stem(color, piece);
                sources.insert(key(color, piece), load_sprite(&theme_dir, &stem)?);
            }
        }

        let label_font = read_optional(&theme_dir.join("label.ttf"))?;

        Ok(Self {
            theme_dir,
            sources,
            paints: HashMap::new(),
            label_font,
        })
    }

    /// Font bytes for coordinate labels, when the theme ships them.
    pub(crate) fn label_font(&self) -> Option<&[u8]> {
        self.label_font.as_deref()
    }

    /// Directory the sprites were loaded from (for error messages).
    pub(crate) fn theme_dir(&self) -> &Path {
        &self.theme_dir
    }

    /// Paint for a piece sprite, targeting a `cell_px` square cell.
    pub(crate) fn paint(
        &mut self,
        color: Color,
        piece: Piece,
        cell_px: u32,
    ) -> BoardcastResult<SpritePaint> {
        let cache_key = (color.to_index(), piece.to_index(), cell_px);
        if let Some(paint) = self.paints.get(&cache_key) {
            return Ok(paint.clone());
        }

        let source = self.sources.get(&key(color, piece)).ok_or_else(|| {
            BoardcastError::configuration(format!(
                "no sprite loaded for '{}'",
                sprite_stem(color, piece)
            ))
        })?;

        let paint = match source {
            SpriteSource::Raster(raster) => SpritePaint {
                image: premul_bytes_to_image(&raster.rgba8_premul, raster.width, raster.height)?,
                width: raster.width,
                height: raster.height,
            },
            SpriteSource::Vector(vector) => {
                let px = rasterize_vector_sprite(vector, cell_px.max(1), cell_px.max(1))?;
                SpritePaint {
                    image: premul_bytes_to_image(&px, cell_px.max(1), cell_px.max(1))?,
                    width: cell_px.max(1),
                    height: cell_px.max(1),
                }
            }
        };
        self.paints.insert(cache_key, paint.clone());
        Ok(paint)
    }
}

fn load_sprite(theme_dir: &Path, stem: &str) -> BoardcastResult<SpriteSource> {
    let svg_path = theme_dir.join(format!("{stem}.svg"));
    if svg_path.is_file() {
        let bytes = read_sprite_bytes(&svg_path)?;
        return Ok(SpriteSource::Vector(parse_vector_sprite(&bytes).map_err(
            |e| sprite_error(&svg_path, &e),
        )?));
    }

    let png_path = theme_dir.join(format!("{stem}.png"));
    if png_path.is_file() {
        let bytes = read_sprite_bytes(&png_path)?;
        return Ok(SpriteSource::Raster(decode_raster_sprite(&bytes).map_err(
            |e| sprite_error(&png_path, &e),
        )?));
    }

    Err(BoardcastError::configuration(format!(
        "missing piece sprite '{stem}.svg' or '{stem}.png' in '{}'",
        theme_dir.display()
    )))
}

fn read_sprite_bytes(path: &Path) -> BoardcastResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        BoardcastError::configuration(format!("failed to read sprite '{}': {e}", path.display()))
    })
}

fn read_optional(path: &Path) -> BoardcastResult<Option<Vec<u8>>> {
    if !path.is_file() {
        return Ok(None);
    }
    read_sprite_bytes(path).map(Some)
}

fn sprite_error(path: &Path, err: &BoardcastError) -> BoardcastError {
    BoardcastError::configuration(format!("bad sprite '{}': {err}", path.display()))
}

/// Wrap premultiplied RGBA8 bytes as a `vello_cpu` image paint.
pub(crate) fn premul_bytes_to_image(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> BoardcastResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BoardcastError::validation("sprite width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BoardcastError::validation("sprite height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(BoardcastError::validation("sprite byte length mismatch"));
    }

    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_stems_cover_both_colors() {
        assert_eq!(sprite_stem(Color::White, Piece::Pawn), "wp");
        assert_eq!(sprite_stem(Color::Black, Piece::King), "bk");
        assert_eq!(sprite_stem(Color::White, Piece::Knight), "wn");
    }

    #[test]
    fn open_fails_with_the_missing_stem_named() {
        let missing = std::env::temp_dir().join("boardcast-no-such-theme");
        let Err(err) = SpriteStore::open(&missing, Theme::Modern) else {
            panic!("expected a configuration error");
        };
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("wp.svg"));
    }

    #[test]
    fn premul_image_rejects_bad_lengths() {
        assert!(premul_bytes_to_image(&[0u8; 3], 1, 1).is_err());
        assert!(premul_bytes_to_image(&[0u8; 4], 1, 1).is_ok());
    }
}
