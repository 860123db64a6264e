//! Frame decoding for animated images.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageFormat, RgbaImage};

/// Shortest delay honoured between frames. Smaller delays (including the
/// common zero) are treated as this value.
pub const MIN_FRAME_DELAY: Duration = Duration::from_millis(20);

/// Delay used for frames that ask for less than [`MIN_FRAME_DELAY`].
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("image contains no frames")]
    NoFrames,
}

/// One decoded frame, ready to draw.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: Arc<RgbaImage>,
    /// How long the frame stays on screen
    pub delay: Duration,
}

impl Frame {
    pub fn new(image: RgbaImage, delay: Duration) -> Self {
        Self {
            image: Arc::new(image),
            delay: if delay < MIN_FRAME_DELAY {
                DEFAULT_FRAME_DELAY
            } else {
                delay
            },
        }
    }
}

/// Indexed access to the frames of an animation.
///
/// Sources live on the decode thread; every call may be expensive.
pub trait FrameSource: Send {
    /// Decode frame `index`, or `None` past the last frame.
    fn frame_at(&mut self, index: usize) -> Result<Option<Frame>, DecodeError>;
}

/// Frame source over encoded bytes in any format the `image` crate reads.
///
/// GIF data yields every frame; other formats yield a single frame. The
/// bytes are decoded on the first call to [`FrameSource::frame_at`].
pub struct ImageFrameSource {
    bytes: Arc<[u8]>,
    frames: Option<Vec<Frame>>,
}

impl ImageFrameSource {
    pub fn new(bytes: Arc<[u8]>) -> Self {
        Self {
            bytes,
            frames: None,
        }
    }

    fn decode(&self) -> Result<Vec<Frame>, DecodeError> {
        let format = image::guess_format(&self.bytes)?;
        let frames = if format == ImageFormat::Gif {
            let decoder = GifDecoder::new(Cursor::new(&self.bytes[..]))?;
            decoder
                .into_frames()
                .collect_frames()?
                .into_iter()
                .map(|frame| {
                    let delay = Duration::from(frame.delay());
                    Frame::new(frame.into_buffer(), delay)
                })
                .collect()
        } else {
            let image = image::load_from_memory_with_format(&self.bytes, format)?;
            vec![Frame::new(image.to_rgba8(), Duration::ZERO)]
        };

        if frames.is_empty() {
            return Err(DecodeError::NoFrames);
        }
        log::debug!("decoded {} frame(s) as {:?}", frames.len(), format);
        Ok(frames)
    }
}

impl FrameSource for ImageFrameSource {
    fn frame_at(&mut self, index: usize) -> Result<Option<Frame>, DecodeError> {
        if self.frames.is_none() {
            self.frames = Some(self.decode()?);
        }
        Ok(self
            .frames
            .as_ref()
            .and_then(|frames| frames.get(index))
            .cloned())
    }
}

/// Width and height of the encoded image, read from its header.
pub fn intrinsic_size(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}


#[cfg(test)]
mod tests {
    use super::testing::gif;
    use super::*;

    #[test]
    fn test_gif_yields_every_frame() {
        let bytes = gif(&[[255, 0, 0, 255], [0, 0, 255, 255]], 4, 3, 50);
        let mut source = ImageFrameSource::new(bytes.into());

        let first = source.frame_at(0).expect("decode").expect("frame");
        assert_eq!(first.image.dimensions(), (4, 3));
        let [r, _, b, _] = first.image.get_pixel(0, 0).0;
        assert!(r > 200 && b < 50);
        assert_eq!(first.delay, Duration::from_millis(50));

        let second = source.frame_at(1).expect("decode").expect("frame");
        let [r, _, b, _] = second.image.get_pixel(0, 0).0;
        assert!(r < 50 && b > 200);
        assert!(source.frame_at(2).expect("decode").is_none());
        assert!(source.frame_at(0).expect("decode").is_some());
    }

    #[test]
    fn test_short_delays_use_default() {
        let frame = Frame::new(RgbaImage::new(1, 1), Duration::ZERO);
        assert_eq!(frame.delay, DEFAULT_FRAME_DELAY);
    }

    #[test]
    fn test_garbage_is_an_error() {
        let mut source = ImageFrameSource::new(Arc::from(&b"not an image"[..]));
        assert!(matches!(source.frame_at(0), Err(DecodeError::Image(_))));
    }

    #[test]
    fn test_intrinsic_size_from_header() {
        let bytes = gif(&[[0, 0, 0, 255]], 7, 5, 10);
        assert_eq!(intrinsic_size(&bytes), Some((7, 5)));
        assert_eq!(intrinsic_size(b"nope"), None);
    }
}
