use image::{GrayImage, Luma};
use std::sync::Arc;

/// Generates a simple high-contrast checkerboard frame.
pub fn checkerboard_frame(width: u32, height: u32, cell: u32) -> Arc<GrayImage> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let img = GrayImage::from_fn(width, height, |x, y| {
        let sum = x / cell + y / cell;
        Luma([if sum & 1 == 0 { 32u8 } else { 220u8 }])
    });
    Arc::new(img)
}
