//! Animated GIF frame sink.

use std::io::Write;
use std::sync::mpsc;
use std::thread::JoinHandle;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::board::theme::LoopCount;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::PlyIndex;
use crate::foundation::error::{BoardcastError, BoardcastResult};
use crate::foundation::math::flatten_premul_over_bg;
use crate::render::surface::FrameRgba;

/// `Write` half of the encoder output stream: every chunk the GIF encoder
/// emits is forwarded to the drain thread.
struct ChannelWriter {
    tx: mpsc::Sender<Vec<u8>>,
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.tx
            .send(buf.to_vec())
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gif drain closed"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Sink that streams frames into an animated GIF container and collects the
/// encoder's output into a single buffer.
///
/// Lifecycle: `begin` starts the encoder and a drain thread accumulating the
/// output byte stream; `push_frame` feeds frames in strictly increasing ply
/// order with a uniform delay; `end` finalizes the container (trailer bytes),
/// closes the stream and joins the drain, after which [`GifSink::into_bytes`]
/// yields the complete file. The buffer is only ever surfaced after the
/// end-of-stream has been observed, never on a failed or unfinished encode.
pub struct GifSink {
    encoder: Option<GifEncoder<ChannelWriter>>,
    drain: Option<JoinHandle<Vec<u8>>>,
    cfg: Option<SinkConfig>,
    last_ply: Option<PlyIndex>,
    scratch: Vec<u8>,
    bytes: Option<Vec<u8>>,
}

impl GifSink {
    /// Create an idle sink; the encoder starts in [`FrameSink::begin`].
    pub fn new() -> Self {
        Self {
            encoder: None,
            drain: None,
            cfg: None,
            last_ply: None,
            scratch: Vec::new(),
            bytes: None,
        }
    }

    /// Take the finished GIF bytes. Errors if `end` has not completed.
    pub fn into_bytes(self) -> BoardcastResult<Vec<u8>> {
        self.bytes
            .ok_or_else(|| BoardcastError::encode("gif sink was not finalized"))
    }
}

impl Default for GifSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> BoardcastResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(BoardcastError::validation(
                "gif sink width/height must be non-zero",
            ));
        }
        if cfg.delay_ms == 0 {
            return Err(BoardcastError::validation(
                "gif sink delay_ms must be non-zero",
            ));
        }

        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        let drain = std::thread::spawn(move || {
            let mut out = Vec::new();
            while let Ok(chunk) = rx.recv() {
                out.extend_from_slice(&chunk);
            }
            out
        });

        let mut encoder = GifEncoder::new_with_speed(ChannelWriter { tx }, 10);
        let repeat = match cfg.loop_count {
            LoopCount::Infinite => Repeat::Infinite,
            LoopCount::Finite(n) => Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| BoardcastError::encode(format!("failed to set gif loop count: {e}")))?;

        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.encoder = Some(encoder);
        self.drain = Some(drain);
        self.cfg = Some(cfg);
        self.last_ply = None;
        self.bytes = None;
        Ok(())
    }

    fn push_frame(&mut self, ply: PlyIndex, frame: &FrameRgba) -> BoardcastResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| BoardcastError::encode("gif sink not started"))?;
        if let Some(last) = self.last_ply
            && ply <= last
        {
            return Err(BoardcastError::encode(
                "gif sink received out-of-order frame",
            ));
        }
        self.last_ply = Some(ply);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(BoardcastError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(BoardcastError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        // The GIF container has no alpha; flatten premultiplied pixels first.
        flatten_premul_over_bg(&mut self.scratch, &frame.data, [0, 0, 0])?;
        let img = RgbaImage::from_raw(frame.width, frame.height, self.scratch.clone())
            .ok_or_else(|| BoardcastError::encode("frame buffer has the wrong length"))?;
        let delay = Delay::from_numer_denom_ms(cfg.delay_ms, 1);

        let Some(encoder) = self.encoder.as_mut() else {
            return Err(BoardcastError::encode("gif sink is already finalized"));
        };
        encoder
            .encode_frame(Frame::from_parts(img, 0, 0, delay))
            .map_err(|e| BoardcastError::encode(format!("failed to encode gif frame: {e}")))
    }

    fn end(&mut self) -> BoardcastResult<()> {
        if self.cfg.is_none() {
            return Err(BoardcastError::encode("gif sink not started"));
        }
        // Dropping the encoder writes the trailer and closes the writer,
        // which is the drain thread's end-of-stream signal.
        drop(self.encoder.take());

        let drain = self
            .drain
            .take()
            .ok_or_else(|| BoardcastError::encode("gif sink drain already consumed"))?;
        let bytes = drain
            .join()
            .map_err(|_| BoardcastError::encode("gif drain thread panicked"))?;
        if bytes.is_empty() {
            return Err(BoardcastError::encode("gif encoder produced no output"));
        }

        self.bytes = Some(bytes);
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, rgba: [u8; 4]) -> FrameRgba {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        FrameRgba {
            width,
            height,
            data,
        }
    }

    fn cfg(delay_ms: u32) -> SinkConfig {
        SinkConfig {
            width: 8,
            height: 8,
            delay_ms,
            loop_count: LoopCount::Infinite,
        }
    }

    #[test]
    fn encodes_three_frames_into_one_buffer() {
        let mut sink = GifSink::new();
        sink.begin(cfg(500)).unwrap();
        for ply in 0..3usize {
            let shade = (ply as u8) * 40;
            sink.push_frame(PlyIndex(ply), &solid_frame(8, 8, [shade, 0, 0, 255]))
                .unwrap();
        }
        sink.end().unwrap();
        let bytes = sink.into_bytes().unwrap();
        // GIF89a magic plus trailer.
        assert_eq!(&bytes[0..6], b"GIF89a");
        assert_eq!(*bytes.last().unwrap(), 0x3B);
    }

    #[test]
    fn rejects_out_of_order_frames() {
        let mut sink = GifSink::new();
        sink.begin(cfg(100)).unwrap();
        sink.push_frame(PlyIndex(1), &solid_frame(8, 8, [0, 0, 0, 255]))
            .unwrap();
        let err = sink
            .push_frame(PlyIndex(1), &solid_frame(8, 8, [0, 0, 0, 255]))
            .unwrap_err();
        assert!(err.to_string().contains("out-of-order"));
    }

    #[test]
    fn rejects_mismatched_frame_sizes() {
        let mut sink = GifSink::new();
        sink.begin(cfg(100)).unwrap();
        assert!(
            sink.push_frame(PlyIndex(0), &solid_frame(4, 4, [0, 0, 0, 255]))
                .is_err()
        );
    }

    #[test]
    fn into_bytes_requires_end() {
        let mut sink = GifSink::new();
        sink.begin(cfg(100)).unwrap();
        sink.push_frame(PlyIndex(0), &solid_frame(8, 8, [0, 0, 0, 255]))
            .unwrap();
        assert!(sink.into_bytes().is_err());
    }

    #[test]
    fn begin_validates_config() {
        let mut sink = GifSink::new();
        assert!(sink.begin(cfg(0)).is_err());
        let mut sink = GifSink::new();
        let mut bad = cfg(100);
        bad.width = 0;
        assert!(sink.begin(bad).is_err());
    }
}