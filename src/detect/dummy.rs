//! Randomized dummy detection provider.
//!
//! Stands in for a trained model: picks a handful of items from a fixed
//! catalog and invents counts and boxes inside the frame. Useful for demos
//! and for exercising the ingestion path without model weights.

use async_trait::async_trait;
use rand::Rng;

use super::{BoundingBox, Detection, Detector};
use crate::error::Result;

/// Fixed catalog the dummy provider draws from.
pub const DUMMY_ITEMS: [&str; 6] = [
    "CocaCola",
    "Pepsi",
    "Sprite",
    "Kinley",
    "ThumbsUp",
    "MountainDew",
];

/// Detection provider that fabricates plausible results.
#[derive(Debug, Clone)]
pub struct DummyDetector {
    frame_width: u32,
    frame_height: u32,
}

impl DummyDetector {
    /// Creates a dummy detector with the given frame dimensions.
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
        }
    }
}

impl Default for DummyDetector {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

#[async_trait]
impl Detector for DummyDetector {
    async fn detect(&self, _image: &[u8]) -> Result<Detection> {
        let mut rng = rand::thread_rng();
        let (w, h) = (self.frame_width, self.frame_height);

        let label_count = rng.gen_range(3..=5);
        let mut detection = Detection::default();

        for label in DUMMY_ITEMS.iter().take(label_count) {
            let x1 = rng.gen_range(0..w * 7 / 10);
            let y1 = rng.gen_range(0..h * 7 / 10);
            let x2 = x1 + rng.gen_range(w / 10..=w / 5);
            let y2 = y1 + rng.gen_range(h / 10..=h / 5);

            detection.counts.push((label.to_string(), rng.gen_range(10..=20)));
            detection
                .boxes
                .push((label.to_string(), BoundingBox { x1, y1, x2, y2 }));
        }

        Ok(detection)
    }
}
