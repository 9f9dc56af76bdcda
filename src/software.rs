// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
CPU reference for the Sobel kernel.

This computes exactly what the bundled kernel computes, with the same clamp-to-edge border
policy, one pixel at a time on the host.  The GPU path is validated against it, and a caller
without a GPU can use [process_image] as a fallback.
*/
use crate::error::FilterError;
use crate::image::{NormalizedBuffer, OutputImage, ResultBuffer, SourceImage, denormalize, normalize};

const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Gradient magnitude `sqrt(Gx² + Gy²)` per pixel, unclamped.
pub fn sobel_magnitude(input: &NormalizedBuffer) -> ResultBuffer {
    let width = input.width() as i64;
    let height = input.height() as i64;
    let values = input.as_slice();
    let at = |x: i64, y: i64| {
        let cx = x.clamp(0, width - 1);
        let cy = y.clamp(0, height - 1);
        values[(cy * width + cx) as usize]
    };

    let mut out = Vec::with_capacity(values.len());
    for y in 0..height {
        for x in 0..width {
            let mut gx = 0.0;
            let mut gy = 0.0;
            for (j, (row_x, row_y)) in SOBEL_X.iter().zip(SOBEL_Y.iter()).enumerate() {
                for i in 0..3 {
                    let v = at(x + i as i64 - 1, y + j as i64 - 1);
                    gx += row_x[i] * v;
                    gy += row_y[i] * v;
                }
            }
            out.push((gx * gx + gy * gy).sqrt());
        }
    }
    ResultBuffer::from_values(input.width(), input.height(), out)
}

/// The whole pipeline on the host: normalize, Sobel, denormalize.
pub fn process_image(image: &SourceImage) -> Result<OutputImage, FilterError> {
    let magnitudes = sobel_magnitude(&normalize(image));
    denormalize(&magnitudes, image.width(), image.height())
}
