// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! PNG encoding, for inspecting inputs and edge maps while debugging.
use super::{OutputImage, SourceImage};

fn encode_rgba8(width: u32, height: u32, pixels: &[u8]) -> Result<Vec<u8>, png::EncodingError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixels)?;
        writer.finish()?;
    }
    Ok(out)
}

impl OutputImage {
    /// Encodes the edge map as an RGBA8 PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        encode_rgba8(self.width, self.height, &self.pixels)
    }
}

impl SourceImage {
    /// Encodes the source as an RGBA8 PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        encode_rgba8(self.width, self.height, &self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use crate::image::{SourceImage, denormalize, ResultBuffer};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn encodes_signature() {
        let result = ResultBuffer::new(3, 2, vec![0.0, 0.5, 1.0, 0.0, 0.5, 1.0]).unwrap();
        let out = denormalize(&result, 3, 2).unwrap();
        let png = out.encode_png().unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);

        let source = SourceImage::filled(4, 4, [1, 2, 3, 4]).unwrap();
        assert_eq!(&source.encode_png().unwrap()[..8], &PNG_SIGNATURE);
    }
}
