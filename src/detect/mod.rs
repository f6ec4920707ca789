//! Detection collaborator.
//!
//! The core treats detection as an opaque producer of (label, count) pairs
//! plus box annotations: any capability-conforming provider fits behind the
//! trait, whether model-backed or randomized. Detection output feeds the
//! store only through the ingestion path.

mod dummy;

pub use dummy::{DummyDetector, DUMMY_ITEMS};

use async_trait::async_trait;

use crate::error::Result;

/// An axis-aligned bounding box in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

/// Output of one detection pass over one image.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// Item label to detected count.
    pub counts: Vec<(String, u32)>,
    /// Per-instance box annotations.
    pub boxes: Vec<(String, BoundingBox)>,
}

/// Trait for detection providers.
#[async_trait]
pub trait Detector: Send + Sync {
    /// Runs detection over opaque image bytes.
    async fn detect(&self, image: &[u8]) -> Result<Detection>;
}
