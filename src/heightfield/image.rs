//! Create `LuminanceGrid`s from already-decoded grayscale images

use super::LuminanceGrid;
use crate::errors::Result;
use crate::float_types::Real;
use image::{GrayImage, ImageBuffer, Luma};

impl LuminanceGrid {
    /// Normalize an 8-bit grayscale image to `[0, 1]`, row-major.
    ///
    /// ```
    /// # use layerforge::heightfield::LuminanceGrid;
    /// # use image::{GrayImage, Luma};
    /// let img = GrayImage::from_pixel(3, 2, Luma([255]));
    /// let grid = LuminanceGrid::from_gray_image(&img).unwrap();
    /// assert_eq!((grid.width(), grid.height()), (3, 2));
    /// assert!(grid.values().iter().all(|&v| v == 1.0));
    /// ```
    pub fn from_gray_image(img: &GrayImage) -> Result<Self> {
        let values = img
            .pixels()
            .map(|Luma([v])| *v as Real / u8::MAX as Real)
            .collect();
        Self::new(values, img.width() as usize, img.height() as usize)
    }

    /// Normalize a 16-bit grayscale image to `[0, 1]`, row-major.
    pub fn from_gray16_image(img: &ImageBuffer<Luma<u16>, Vec<u16>>) -> Result<Self> {
        let values = img
            .pixels()
            .map(|Luma([v])| *v as Real / u16::MAX as Real)
            .collect();
        Self::new(values, img.width() as usize, img.height() as usize)
    }
}
