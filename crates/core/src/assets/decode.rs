//! Decoding of cached or fetched asset bytes.
//!
//! Decoding never fails loudly: bytes that are not a valid image decode to
//! `None` and the caller treats the asset as absent.

use std::fmt;
use std::io::Cursor;
use std::time::Duration;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, Frame};

/// A decoded static sprite.
#[derive(Debug, Clone)]
pub struct Sprite {
    image: DynamicImage,
}

impl Sprite {
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// A decoded animated image.
#[derive(Clone)]
pub struct AnimatedImage {
    frames: Vec<Frame>,
}

impl AnimatedImage {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Size of the first frame.
    pub fn dimensions(&self) -> (u32, u32) {
        self.frames
            .first()
            .map(|frame| frame.buffer().dimensions())
            .unwrap_or((0, 0))
    }

    /// Sum of all frame delays.
    pub fn duration(&self) -> Duration {
        self.frames
            .iter()
            .map(|frame| {
                let (numer, denom) = frame.delay().numer_denom_ms();
                if denom == 0 {
                    Duration::ZERO
                } else {
                    Duration::from_secs_f64(f64::from(numer) / f64::from(denom) / 1000.0)
                }
            })
            .sum()
    }
}

impl fmt::Debug for AnimatedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedImage")
            .field("frames", &self.frames.len())
            .field("dimensions", &self.dimensions())
            .finish()
    }
}

/// Decode a static image (PNG or GIF).
pub fn decode_sprite(bytes: &[u8]) -> Option<Sprite> {
    image::load_from_memory(bytes)
        .ok()
        .map(|image| Sprite { image })
}

/// Decode every frame of a GIF. An image with no frames counts as invalid.
pub fn decode_animation(bytes: &[u8]) -> Option<AnimatedImage> {
    let decoder = GifDecoder::new(Cursor::new(bytes)).ok()?;
    let frames = decoder.into_frames().collect_frames().ok()?;
    if frames.is_empty() {
        return None;
    }
    Some(AnimatedImage { frames })
}
