// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The compute program and the fixed interface it shares with the dispatcher.

[KernelInterface] is one versioned contract: binding slots, tile size and entry point.  The
dispatcher binds and sizes its grid from these constants, and any kernel program, bundled or
caller-supplied, must be written against the same values.  Changing either side means bumping
[KernelInterface::VERSION] and updating both.
*/
use std::borrow::Cow;
use std::fmt::Formatter;

use crate::device::BoundDevice;
use crate::error::FilterError;
use crate::imp;

/// The fixed dispatcher/program contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelInterface;

impl KernelInterface {
    pub const VERSION: u32 = 1;
    /// Read-only storage buffer of normalized intensities.
    pub const INPUT_SLOT: u32 = 0;
    /// Read-write storage buffer of gradient magnitudes.
    pub const OUTPUT_SLOT: u32 = 1;
    /// Uniform [crate::params::ParameterBlock].
    pub const PARAMS_SLOT: u32 = 2;
    /// Threads per workgroup along each axis.  One thread per pixel.
    pub const TILE: u32 = 16;
    pub const ENTRY_POINT: &'static str = "main";

    /**
    Workgroups needed to cover a `width` x `height` image.

    ```
    use edges_and_gradients::kernel::KernelInterface;
    assert_eq!(KernelInterface::dispatch_grid(1024, 1024), (64, 64));
    assert_eq!(KernelInterface::dispatch_grid(17, 1), (2, 1));
    ```
    */
    pub const fn dispatch_grid(width: u32, height: u32) -> (u32, u32) {
        (width.div_ceil(Self::TILE), height.div_ceil(Self::TILE))
    }
}

const SOBEL_WGSL: &str = include_str!("kernel/sobel.wgsl");

/**
Source text for a compute program.

The text is opaque to this crate: it is handed as-is to the device compiler.
*/
#[derive(Clone, PartialEq, Eq)]
pub struct KernelProgram {
    label: Cow<'static, str>,
    wgsl_code: Cow<'static, str>,
}

impl KernelProgram {
    /// The bundled Sobel operator, with clamp-to-edge borders.
    pub fn sobel() -> Self {
        KernelProgram {
            label: Cow::Borrowed("sobel"),
            wgsl_code: Cow::Borrowed(SOBEL_WGSL),
        }
    }

    /// A caller-supplied program, for example one loaded from an asset location.
    pub fn new(label: impl Into<String>, wgsl_code: impl Into<String>) -> Self {
        KernelProgram {
            label: Cow::Owned(label.into()),
            wgsl_code: Cow::Owned(wgsl_code.into()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn wgsl_code(&self) -> &str {
        &self.wgsl_code
    }
}

impl Default for KernelProgram {
    fn default() -> Self {
        Self::sobel()
    }
}

impl std::fmt::Debug for KernelProgram {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelProgram")
            .field("label", &self.label)
            .field("bytes", &self.wgsl_code.len())
            .finish()
    }
}

/**
A program compiled into a compute pipeline for one device.

Compiling is the expensive part of an invocation; [crate::SobelFilter] keeps one around.
*/
#[derive(Debug, Clone)]
pub struct CompiledKernel(pub(crate) imp::CompiledKernel);

impl CompiledKernel {
    /// Compiles and links `program`.  Any compiler or validation message becomes
    /// [FilterError::ShaderCompileError].
    pub async fn compile(device: &BoundDevice, program: &KernelProgram) -> Result<Self, FilterError> {
        imp::CompiledKernel::compile(&device.0, program.label(), program.wgsl_code())
            .await
            .map(CompiledKernel)
            .map_err(FilterError::from)
    }
}
