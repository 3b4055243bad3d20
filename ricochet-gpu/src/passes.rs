use bytemuck::{Pod, Zeroable};
use glam::{uvec2, UVec2};

use crate::{resolve_checkerboard, KernelConfig, Resolution};

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct IndirectLightingPassParams {
    pub seed: u32,
    pub bounce: u32,

    /// Size of the full-resolution image, in pixels.
    pub width: u32,
    pub height: u32,
}

impl IndirectLightingPassParams {
    pub fn screen_size(&self) -> UVec2 {
        uvec2(self.width, self.height)
    }

    /// Returns how many invocations the pass needs; at half resolution only
    /// every other pixel of each row gets shaded.
    pub fn dispatch_size(&self, config: &KernelConfig) -> UVec2 {
        match config.resolution() {
            Resolution::Half => uvec2((self.width + 1) / 2, self.height),
            Resolution::Full => self.screen_size(),
        }
    }

    /// Maps an invocation into the pixel it shades; `None` for invocations
    /// past the image's edge.
    pub fn resolve_pixel(
        &self,
        config: &KernelConfig,
        global_id: UVec2,
    ) -> Option<UVec2> {
        let pixel = match config.resolution() {
            Resolution::Half => resolve_checkerboard(global_id, config.frame),
            Resolution::Full => global_id,
        };

        if pixel.x < self.width && pixel.y < self.height {
            Some(pixel)
        } else {
            None
        }
    }

    pub fn pixel_index(&self, pixel: UVec2) -> usize {
        (pixel.y * self.width + pixel.x) as usize
    }
}
