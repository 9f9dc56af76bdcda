// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! The uniform block bound at [crate::kernel::KernelInterface::PARAMS_SLOT].
use bytemuck::{Pod, Zeroable};

/// Mirrors `struct Params { width: u32, height: u32 }` in the kernel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ParameterBlock {
    pub width: u32,
    pub height: u32,
}

impl ParameterBlock {
    pub const BYTE_LEN: usize = std::mem::size_of::<ParameterBlock>();

    pub fn new(width: u32, height: u32) -> Self {
        ParameterBlock { width, height }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_two_words() {
        assert_eq!(ParameterBlock::BYTE_LEN, 8);
        let block = ParameterBlock::new(640, 480);
        let bytes = block.as_bytes();
        assert_eq!(&bytes[0..4], &640u32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &480u32.to_ne_bytes());
    }
}
