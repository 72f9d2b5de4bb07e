use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use boardcast::chess::Square;
use boardcast::{
    BoardGeometry, BoardcastError, GameRecord, InMemorySink, LoopCount, PlyIndex, RenderOptions,
    Theme, render_animated, render_static,
};
use image::AnimationDecoder;

const WHITE_SPRITE: [u8; 4] = [200, 0, 0, 255];
const BLACK_SPRITE: [u8; 4] = [0, 0, 200, 255];

static FIXTURE_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Temporary assets root with a full `modern/` sprite set: solid-color SVG
/// sprites (white pieces red, black pieces blue) so occupied squares have a
/// known center color. Removed on drop.
struct TempAssets {
    root: PathBuf,
}

impl TempAssets {
    fn create() -> Self {
        let seq = FIXTURE_SEQ.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "boardcast-fixture-{}-{seq}",
            std::process::id()
        ));
        let theme_dir = root.join("modern");
        std::fs::create_dir_all(&theme_dir).unwrap();
        for (color, fill) in [('w', "#c80000"), ('b', "#0000c8")] {
            for piece in ['p', 'n', 'b', 'r', 'q', 'k'] {
                let svg = format!(
                    r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64"><rect width="64" height="64" fill="{fill}"/></svg>"##
                );
                std::fs::write(theme_dir.join(format!("{color}{piece}.svg")), svg).unwrap();
            }
        }
        Self { root }
    }

    fn options(&self) -> RenderOptions {
        RenderOptions {
            assets_root: self.root.clone(),
            coordinates: false,
            ..RenderOptions::default()
        }
    }
}

impl Drop for TempAssets {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

fn decode_png(bytes: &[u8]) -> image::RgbaImage {
    image::load_from_memory(bytes).unwrap().to_rgba8()
}

fn center_pixel(img: &image::RgbaImage, geom: &BoardGeometry, file: usize, rank: usize) -> [u8; 4] {
    let c = geom.square_to_rect(file, rank).center();
    img.get_pixel(c.x as u32, c.y as u32).0
}

fn four_move_game() -> GameRecord {
    GameRecord::from_san(["e4", "e5", "Nf3", "Nc6"]).unwrap()
}

#[test]
fn static_empty_history_renders_the_starting_position() {
    let assets = TempAssets::create();
    let opts = assets.options();
    let geom = opts.geometry();

    let png = render_static(&GameRecord::new(), Some(0), &opts).unwrap();
    let img = decode_png(&png);
    assert_eq!(img.dimensions(), (480, 480));

    let light = [opts.light.r, opts.light.g, opts.light.b, 255];
    let dark = [opts.dark.r, opts.dark.g, opts.dark.b, 255];

    // Empty middle squares show the bare checkerboard: a4 light, a5 dark.
    assert_eq!(center_pixel(&img, &geom, 0, 3), light);
    assert_eq!(center_pixel(&img, &geom, 0, 4), dark);
    // Back ranks and pawn ranks are occupied.
    assert_eq!(center_pixel(&img, &geom, 0, 0), WHITE_SPRITE); // a1 rook
    assert_eq!(center_pixel(&img, &geom, 4, 1), WHITE_SPRITE); // e2 pawn
    assert_eq!(center_pixel(&img, &geom, 4, 7), BLACK_SPRITE); // e8 king
}

#[test]
fn static_after_e2e4_shows_the_move_and_its_highlight() {
    let assets = TempAssets::create();
    let opts = assets.options();
    let geom = opts.geometry();
    let record = GameRecord::from_uci(["e2e4"]).unwrap();

    let img = decode_png(&render_static(&record, Some(1), &opts).unwrap());

    // The pawn now sits on e4 and e2 is empty.
    assert_eq!(center_pixel(&img, &geom, 4, 3), WHITE_SPRITE);
    let e2 = center_pixel(&img, &geom, 4, 1);
    assert_ne!(e2, WHITE_SPRITE);

    // e2 is tinted: it differs from the same render with highlighting off,
    // which shows the bare light square.
    let mut plain_opts = assets.options();
    plain_opts.highlight_last_move = false;
    let plain = decode_png(&render_static(&record, Some(1), &plain_opts).unwrap());
    let light = [opts.light.r, opts.light.g, opts.light.b, 255];
    assert_eq!(center_pixel(&plain, &geom, 4, 1), light);
    assert_ne!(e2, light);
}

#[test]
fn static_out_of_range_ply_clamps_to_the_final_position() {
    let assets = TempAssets::create();
    let opts = assets.options();
    let record = four_move_game();

    let at_end = render_static(&record, None, &opts).unwrap();
    let beyond = render_static(&record, Some(999), &opts).unwrap();
    assert_eq!(at_end, beyond);
}

#[test]
fn static_render_is_deterministic() {
    let assets = TempAssets::create();
    let opts = assets.options();
    let record = four_move_game();

    let a = render_static(&record, Some(3), &opts).unwrap();
    let b = render_static(&record, Some(3), &opts).unwrap();
    assert_eq!(a, b);
}

#[test]
fn flipped_render_point_reflects_piece_placement() {
    let assets = TempAssets::create();
    let opts = assets.options();
    let record = GameRecord::new();

    let white_view = decode_png(&render_static(&record, Some(0), &opts).unwrap());

    let mut flipped_opts = assets.options();
    flipped_opts.flipped = true;
    let black_view = decode_png(&render_static(&record, Some(0), &flipped_opts).unwrap());

    let geom = opts.geometry();
    let flipped_geom = flipped_opts.geometry();
    for (file, rank) in [(0usize, 0usize), (4, 1), (4, 7), (7, 7), (3, 0)] {
        let a = geom.square_to_rect(file, rank).center();
        let b = flipped_geom.square_to_rect(file, rank).center();
        // The same square sits at point-reflected pixel positions...
        assert_eq!(a.x + b.x, 480.0);
        assert_eq!(a.y + b.y, 480.0);
        // ...and shows the same content in both orientations.
        assert_eq!(
            white_view.get_pixel(a.x as u32, a.y as u32),
            black_view.get_pixel(b.x as u32, b.y as u32)
        );
    }
}

#[test]
fn animated_full_game_yields_one_frame_per_ply_plus_initial() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let assets = TempAssets::create();
    let opts = assets.options();
    let record = four_move_game();

    let gif = render_animated(&record, None, 500, &opts).unwrap();
    assert_eq!(&gif[0..6], b"GIF89a");
    // Infinite looping is advertised through the Netscape extension.
    assert!(gif.windows(11).any(|w| w == b"NETSCAPE2.0"));

    let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(&gif)).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), record.len() + 1);
    for frame in &frames {
        assert_eq!(frame.buffer().dimensions(), (480, 480));
        let (num, den) = frame.delay().numer_denom_ms();
        assert_eq!(u64::from(num), 500 * u64::from(den));
    }
}

#[test]
fn animated_end_ply_bounds_the_frame_count() {
    let assets = TempAssets::create();
    let opts = assets.options();
    let record = four_move_game();

    let gif = render_animated(&record, Some(2), 100, &opts).unwrap();
    let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(&gif)).unwrap();
    assert_eq!(decoder.into_frames().collect_frames().unwrap().len(), 3);

    // Past-the-end requests clamp to the whole game.
    let gif = render_animated(&record, Some(99), 100, &opts).unwrap();
    let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(&gif)).unwrap();
    assert_eq!(
        decoder.into_frames().collect_frames().unwrap().len(),
        record.len() + 1
    );
}

#[test]
fn finite_loop_count_is_encoded() {
    let assets = TempAssets::create();
    let mut opts = assets.options();
    opts.loop_count = LoopCount::Finite(2);
    let record = GameRecord::from_uci(["e2e4"]).unwrap();

    let gif = render_animated(&record, None, 100, &opts).unwrap();
    assert!(gif.windows(11).any(|w| w == b"NETSCAPE2.0"));
}

#[test]
fn sequencer_feeds_sinks_in_strict_ply_order() {
    let assets = TempAssets::create();
    let opts = assets.options();
    let record = four_move_game();

    let mut renderer = boardcast::BoardRenderer::new(opts).unwrap();
    let mut sink = InMemorySink::new();
    renderer
        .render_into_sink(&record, None, 250, &mut sink)
        .unwrap();

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (480, 480));
    assert_eq!(cfg.delay_ms, 250);

    let plies: Vec<_> = sink.frames().iter().map(|(ply, _)| *ply).collect();
    assert_eq!(plies, (0..=4).map(PlyIndex).collect::<Vec<_>>());
}

#[test]
fn renderer_session_is_reusable_across_games() {
    let assets = TempAssets::create();
    let mut renderer = boardcast::BoardRenderer::new(assets.options()).unwrap();
    let record = four_move_game();

    let a = renderer.render_ply(&record, 2).unwrap();
    let b = renderer.render_ply(&GameRecord::new(), 0).unwrap();
    let c = renderer.render_ply(&record, 2).unwrap();
    assert_eq!(a.data, c.data);
    assert_ne!(a.data, b.data);
}

#[test]
fn render_position_accepts_arbitrary_highlights() {
    let assets = TempAssets::create();
    let opts = assets.options();
    let geom = opts.geometry();
    let mut renderer = boardcast::BoardRenderer::new(opts.clone()).unwrap();

    let board = boardcast::snapshot(&GameRecord::new(), 0).unwrap();
    let highlights = boardcast::HighlightSet::of(&[Square::D4]);
    let frame = renderer.render_position(&board, &highlights).unwrap();

    let img =
        image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone()).unwrap();
    let light = [opts.light.r, opts.light.g, opts.light.b, 255];
    // d4 (dark square, empty) is tinted; d5 keeps its bare light color.
    assert_ne!(center_pixel(&img, &geom, 3, 3), light);
    assert_eq!(center_pixel(&img, &geom, 3, 4), light);
}

#[test]
fn missing_sprites_are_a_configuration_error() {
    let root = std::env::temp_dir().join(format!(
        "boardcast-missing-{}-{}",
        std::process::id(),
        FIXTURE_SEQ.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::create_dir_all(root.join("modern")).unwrap();

    let opts = RenderOptions {
        assets_root: root.clone(),
        coordinates: false,
        ..RenderOptions::default()
    };
    let err = render_static(&GameRecord::new(), Some(0), &opts).unwrap_err();
    assert!(matches!(err, BoardcastError::Configuration(_)));
    assert!(err.to_string().contains("wp"));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn coordinates_without_a_label_font_fail_fast() {
    let assets = TempAssets::create();
    let mut opts = assets.options();
    opts.coordinates = true;

    let Err(err) = boardcast::BoardRenderer::new(opts) else {
        panic!("expected a configuration error");
    };
    assert!(matches!(err, BoardcastError::Configuration(_)));
    assert!(err.to_string().contains("label.ttf"));
}

#[test]
fn wood_theme_reads_its_own_sprite_directory() {
    let assets = TempAssets::create();
    let mut opts = assets.options().with_theme(Theme::Wood);
    opts.assets_root = assets.root.clone();
    opts.coordinates = false;

    // Only `modern/` exists in the fixture.
    let Err(err) = boardcast::BoardRenderer::new(opts) else {
        panic!("expected a configuration error");
    };
    assert!(err.to_string().contains("wood"));
}
