// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Host-side images and the conversions between 8-bit RGBA and the float buffers the kernel uses.

The kernel works on one normalized intensity per pixel.  [normalize] takes the red channel of
each pixel as that intensity, which is exact for grayscale input and a deliberately lossy
shortcut otherwise; it is not a luma transform.  [denormalize] turns gradient magnitudes back
into a grayscale RGBA edge map.

```
use edges_and_gradients::image::{SourceImage, normalize, denormalize};

let image = SourceImage::new(2, 1, vec![255, 0, 0, 255, 51, 51, 51, 255]).unwrap();
let normalized = normalize(&image);
assert_eq!(normalized.as_slice(), &[1.0, 0.2]);
```
*/
mod png_support;

use crate::error::FilterError;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Bytes per element of [NormalizedBuffer] and [ResultBuffer].
pub const BYTES_PER_ELEMENT: usize = std::mem::size_of::<f32>();

/// `width * height * per_element`, or `None` when it does not fit in memory at all.
fn element_count(width: u32, height: u32, per_element: usize) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(per_element)
}

fn invalid(width: u32, height: u32, expected: usize, actual: usize) -> FilterError {
    logwise::error_sync!(
        "Image of {width}x{height} has {actual} elements, expected {expected}",
        width = width,
        height = height,
        actual = actual,
        expected = expected
    );
    FilterError::InvalidImage {
        width,
        height,
        expected,
        actual,
    }
}

fn check_len(width: u32, height: u32, per_element: usize, actual: usize) -> Result<(), FilterError> {
    match element_count(width, height, per_element) {
        Some(expected) if expected == actual => Ok(()),
        Some(expected) => Err(invalid(width, height, expected, actual)),
        None => Err(invalid(width, height, usize::MAX, actual)),
    }
}

/**
An RGBA8 image supplied by the caller.

The pixel data is row-major, 4 bytes per pixel.  Construction checks that the data length
matches the declared dimensions, so every other operation can index without bounds surprises.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SourceImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FilterError> {
        check_len(width, height, BYTES_PER_PIXEL, pixels.len())?;
        Ok(SourceImage {
            width,
            height,
            pixels,
        })
    }

    /// An image whose every pixel is `rgba`.  Fails when the dimensions overflow `usize`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, FilterError> {
        let byte_len = element_count(width, height, BYTES_PER_PIXEL)
            .ok_or_else(|| invalid(width, height, usize::MAX, 0))?;
        let pixels = rgba.repeat(byte_len / BYTES_PER_PIXEL);
        Ok(SourceImage {
            width,
            height,
            pixels,
        })
    }

    /// A grayscale image built from one intensity per pixel, row-major.
    pub fn from_gray(width: u32, height: u32, gray: &[u8]) -> Result<Self, FilterError> {
        check_len(width, height, 1, gray.len())?;
        let pixels = gray.iter().flat_map(|&g| [g, g, g, 255]).collect();
        Ok(SourceImage {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len() / BYTES_PER_PIXEL
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// One normalized intensity in `[0,1]` per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBuffer {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl NormalizedBuffer {
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> Result<Self, FilterError> {
        check_len(width, height, 1, values.len())?;
        Ok(NormalizedBuffer {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Little-endian `f32`s, the layout the kernel's storage buffer expects.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.values)
    }

    pub fn byte_len(&self) -> usize {
        self.values.len() * BYTES_PER_ELEMENT
    }
}

/// One gradient magnitude per pixel, as written by the kernel.  Values are unclamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBuffer {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl ResultBuffer {
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> Result<Self, FilterError> {
        check_len(width, height, 1, values.len())?;
        Ok(ResultBuffer {
            width,
            height,
            values,
        })
    }

    /// For producers that emit exactly one value per pixel by construction.
    pub(crate) fn from_values(width: u32, height: u32, values: Vec<f32>) -> Self {
        debug_assert_eq!(Some(values.len()), element_count(width, height, 1));
        ResultBuffer {
            width,
            height,
            values,
        }
    }

    /**
    Reinterprets bytes read back from the device.

    The byte length must be exactly `width * height * 4`.
    */
    pub fn from_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, FilterError> {
        check_len(width, height, BYTES_PER_ELEMENT, bytes.len())?;
        //the readback vec has no alignment guarantee for f32
        let values = bytes
            .chunks_exact(BYTES_PER_ELEMENT)
            .map(bytemuck::pod_read_unaligned::<f32>)
            .collect();
        Ok(ResultBuffer {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[y as usize * self.width as usize + x as usize]
    }

    pub fn byte_len(&self) -> usize {
        self.values.len() * BYTES_PER_ELEMENT
    }
}

/// The grayscale edge map returned to the caller.  Same shape as the [SourceImage].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl OutputImage {
    pub(crate) fn empty(width: u32, height: u32) -> Self {
        debug_assert!(width == 0 || height == 0);
        OutputImage {
            width,
            height,
            pixels: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + BYTES_PER_PIXEL]);
        rgba
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Red channel of each pixel, divided by 255.
pub fn normalize(image: &SourceImage) -> NormalizedBuffer {
    let values = image
        .pixels
        .chunks_exact(BYTES_PER_PIXEL)
        .map(|rgba| rgba[0] as f32 / 255.0)
        .collect();
    NormalizedBuffer {
        width: image.width,
        height: image.height,
        values,
    }
}

/**
Rescales one magnitude to a channel value.

`value * 255` rounded to nearest with ties to even, then clamped into `[0,255]`.  This is the
conversion a browser's clamped byte array applies.  Out-of-range input saturates instead of
wrapping, and NaN maps to 0.
*/
pub fn denormalize_value(value: f32) -> u8 {
    //`as` saturates and sends NaN to 0, the clamp just makes the intent plain
    (value * 255.0).round_ties_even().clamp(0.0, 255.0) as u8
}

/**
Builds the edge map: every pixel's RGB is the rescaled magnitude, alpha is 255.

Fails when `result` does not hold exactly `width * height` values.
*/
pub fn denormalize(result: &ResultBuffer, width: u32, height: u32) -> Result<OutputImage, FilterError> {
    check_len(width, height, 1, result.values.len())?;
    let mut pixels = Vec::with_capacity(result.values.len() * BYTES_PER_PIXEL);
    for &value in &result.values {
        let v = denormalize_value(value);
        pixels.extend_from_slice(&[v, v, v, 255]);
    }
    Ok(OutputImage {
        width,
        height,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_rejects_mismatched_length() {
        let err = SourceImage::new(3, 2, vec![0; 23]).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidImage {
                width: 3,
                height: 2,
                expected: 24,
                actual: 23
            }
        );
        assert!(SourceImage::new(3, 2, vec![0; 24]).is_ok());
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let err = SourceImage::new(1 << 31, 1 << 31, Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            FilterError::InvalidImage {
                width: 2147483648,
                height: 2147483648,
                actual: 0,
                ..
            }
        ));
        assert!(SourceImage::new(u32::MAX, u32::MAX, Vec::new()).is_err());
        assert!(SourceImage::filled(u32::MAX, u32::MAX, [0, 0, 0, 255]).is_err());
        assert!(SourceImage::from_gray(u32::MAX, u32::MAX, &[]).is_err());
        assert!(ResultBuffer::from_bytes(u32::MAX, u32::MAX, &[]).is_err());
        assert!(ResultBuffer::new(u32::MAX, u32::MAX, Vec::new()).is_err());
        let result = ResultBuffer::new(0, 0, Vec::new()).unwrap();
        assert!(denormalize(&result, u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn normalize_uses_red_channel() {
        let image = SourceImage::new(3, 1, vec![0, 9, 9, 9, 255, 0, 0, 0, 102, 1, 2, 3]).unwrap();
        let normalized = normalize(&image);
        assert_eq!(normalized.width(), 3);
        assert_eq!(normalized.height(), 1);
        assert_eq!(normalized.as_slice(), &[0.0, 1.0, 0.4]);
    }

    #[test]
    fn buffer_byte_lengths_match_pixel_count() {
        let image = SourceImage::filled(7, 5, [10, 20, 30, 40]).unwrap();
        let normalized = normalize(&image);
        assert_eq!(normalized.byte_len(), 7 * 5 * 4);
        assert_eq!(normalized.as_bytes().len(), 7 * 5 * 4);
        let result = ResultBuffer::new(7, 5, vec![0.0; 35]).unwrap();
        assert_eq!(result.byte_len(), 7 * 5 * 4);
    }

    #[test]
    fn denormalize_value_clamps() {
        assert_eq!(denormalize_value(2.0), 255);
        assert_eq!(denormalize_value(-1.0), 0);
        assert_eq!(denormalize_value(f32::NAN), 0);
        assert_eq!(denormalize_value(f32::INFINITY), 255);
        assert_eq!(denormalize_value(1.0), 255);
    }

    #[test]
    fn denormalize_value_rounds_to_nearest_even() {
        // 127.5 is a tie
        assert_eq!(denormalize_value(0.5), 128);
        assert_eq!(denormalize_value(0.999), 255);
        assert_eq!(denormalize_value(0.1), 26);
        assert_eq!(denormalize_value(0.101), 26);
    }

    #[test]
    fn denormalize_writes_gray_with_opaque_alpha() {
        let result = ResultBuffer::new(2, 2, vec![0.0, 1.0, 2.0, -1.0]).unwrap();
        let out = denormalize(&result, 2, 2).unwrap();
        assert_eq!(out.width(), 2);
        assert_eq!(out.height(), 2);
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(out.pixel(1, 0), [255, 255, 255, 255]);
        assert_eq!(out.pixel(0, 1), [255, 255, 255, 255]);
        assert_eq!(out.pixel(1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn denormalize_rejects_wrong_dimensions() {
        let result = ResultBuffer::new(2, 2, vec![0.0; 4]).unwrap();
        assert!(matches!(
            denormalize(&result, 3, 2),
            Err(FilterError::InvalidImage { expected: 6, actual: 4, .. })
        ));
    }

    #[test]
    fn result_from_bytes() {
        let bytes: Vec<u8> = [0.25f32, 4.0].iter().flat_map(|f| f.to_le_bytes()).collect();
        let result = ResultBuffer::from_bytes(2, 1, &bytes).unwrap();
        assert_eq!(result.as_slice(), &[0.25, 4.0]);
        assert!(ResultBuffer::from_bytes(2, 1, &bytes[1..]).is_err());
    }

    #[test]
    fn from_gray_expands_to_rgba() {
        let image = SourceImage::from_gray(2, 1, &[7, 200]).unwrap();
        assert_eq!(image.pixels(), &[7, 7, 7, 255, 200, 200, 200, 255]);
        assert!(SourceImage::from_gray(2, 2, &[1, 2, 3]).is_err());
    }
}
