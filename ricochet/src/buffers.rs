use derivative::Derivative;
use glam::{UVec2, Vec3, Vec4};
use log::info;

use crate::gpu::{
    self, DiffuseSh, NextSurfaceState, PrimarySurface, Rgb9e5,
    STORAGE_SCALE_DIFFUSE, STORAGE_SCALE_SPECULAR,
};
use crate::{Error, Result};

/// Per-pixel buffers of a single viewport.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct FrameBuffers {
    size: UVec2,

    /// See: [`PrimarySurface`].
    #[derivative(Debug = "ignore")]
    pub(crate) primary_surfaces: Vec<Vec4>,

    /// See: [`NextSurfaceState`].
    #[derivative(Debug = "ignore")]
    pub(crate) bounce_surfaces: Vec<Vec4>,

    /// See: [`DiffuseSh`].
    #[derivative(Debug = "ignore")]
    pub(crate) diffuse: Vec<Vec4>,

    /// See: [`Rgb9e5`].
    #[derivative(Debug = "ignore")]
    pub(crate) specular: Vec<u32>,
}

impl FrameBuffers {
    pub fn new(size: UVec2) -> Result<Self> {
        if size.x == 0 || size.y == 0 {
            return Err(Error::EmptyViewport {
                width: size.x,
                height: size.y,
            });
        }

        let len = (size.x as usize) * (size.y as usize);

        info!(
            "Allocating frame buffers; size={}x{}, pixels={}",
            size.x, size.y, len
        );

        Ok(Self {
            size,
            primary_surfaces: vec![Vec4::ZERO; 4 * len],
            bounce_surfaces: vec![Vec4::ZERO; 4 * len],
            diffuse: vec![Vec4::ZERO; 2 * len],
            specular: vec![0; len],
        })
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.specular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specular.is_empty()
    }

    pub fn write_primary(
        &mut self,
        pixel: UVec2,
        surface: &PrimarySurface,
    ) -> Result<()> {
        let id = self.index(pixel)?;

        surface.write(&mut self.primary_surfaces, id);

        Ok(())
    }

    /// Replaces all primary surfaces, in row-major order.
    pub fn write_primaries(
        &mut self,
        surfaces: &[PrimarySurface],
    ) -> Result<()> {
        if surfaces.len() != self.len() {
            return Err(Error::BufferSizeMismatch {
                buffer: "primary_surfaces",
                expected: self.len(),
                actual: surfaces.len(),
            });
        }

        for (id, surface) in surfaces.iter().enumerate() {
            surface.write(&mut self.primary_surfaces, id);
        }

        Ok(())
    }

    pub fn primary_at(&self, pixel: UVec2) -> Result<PrimarySurface> {
        Ok(PrimarySurface::read(&self.primary_surfaces, self.index(pixel)?))
    }

    pub fn clear_primaries(&mut self) {
        self.primary_surfaces.fill(Vec4::ZERO);
    }

    pub fn clear_accumulators(&mut self) {
        self.diffuse.fill(Vec4::ZERO);
        self.specular.fill(0);
    }

    /// Returns the surface the next bounce of given pixel starts from;
    /// `None` if the path has terminated.
    pub fn next_surface_at(
        &self,
        pixel: UVec2,
    ) -> Result<Option<NextSurfaceState>> {
        let state =
            NextSurfaceState::read(&self.bounce_surfaces, self.index(pixel)?);

        Ok(if state.material_id.is_some() {
            Some(state)
        } else {
            None
        })
    }

    /// Returns diffuse light accumulated for given pixel, with the storage
    /// scale undone.
    pub fn diffuse_at(&self, pixel: UVec2) -> Result<DiffuseSh> {
        let sh = DiffuseSh::read(&self.diffuse, self.index(pixel)?);

        Ok(DiffuseSh {
            sh_y: sh.sh_y / STORAGE_SCALE_DIFFUSE,
            co_cg: sh.co_cg / STORAGE_SCALE_DIFFUSE,
        })
    }

    /// Returns specular light accumulated for given pixel, with the storage
    /// scale undone.
    pub fn specular_at(&self, pixel: UVec2) -> Result<Vec3> {
        let id = self.index(pixel)?;

        Ok(Rgb9e5(self.specular[id]).decode() / STORAGE_SCALE_SPECULAR)
    }

    /// Returns the raw diffuse accumulator, ready to be uploaded to a
    /// `Rgba32Float` texture.
    pub fn diffuse_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.diffuse)
    }

    /// Returns the raw specular accumulator, ready to be uploaded to a
    /// `Rgb9e5Ufloat` texture.
    pub fn specular_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.specular)
    }

    pub(crate) fn pass_params(
        &self,
        seed: u32,
        bounce: u32,
    ) -> gpu::IndirectLightingPassParams {
        gpu::IndirectLightingPassParams {
            seed,
            bounce,
            width: self.size.x,
            height: self.size.y,
        }
    }

    fn index(&self, pixel: UVec2) -> Result<usize> {
        if pixel.x >= self.size.x || pixel.y >= self.size.y {
            return Err(Error::PixelOutOfBounds {
                x: pixel.x,
                y: pixel.y,
                width: self.size.x,
                height: self.size.y,
            });
        }

        Ok((pixel.y as usize) * (self.size.x as usize) + (pixel.x as usize))
    }
}
