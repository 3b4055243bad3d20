use glam::Vec3;

use crate::SurfaceSample;

/// Ray shot from a surface along a sampled lobe.
#[derive(Copy, Clone, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct BounceRay {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t_min: f32,
    pub t_max: f32,

    /// See: `Self::MASK_*`.
    pub cull_mask: u32,
}

impl BounceRay {
    /// Regular world geometry.
    pub const MASK_OPAQUE: u32 = 1 << 0;

    /// First-person weapon model.
    pub const MASK_VIEWER_WEAPON: u32 = 1 << 1;

    /// Viewer's own body, as seen in third person.
    pub const MASK_VIEWER_MODEL: u32 = 1 << 2;

    /// How far to move the origin back towards the viewer to avoid
    /// self-intersection with the originating surface.
    pub const NUDGE_OFFSET: f32 = 0.01;

    pub const MAX_DISTANCE: f32 = 10000.0;

    pub fn new(origin: Vec3, direction: Vec3, cull_mask: u32) -> Self {
        Self {
            origin,
            direction,
            t_min: 0.0,
            t_max: Self::MAX_DISTANCE,
            cull_mask,
        }
    }

    /// Creates a ray leaving given surface in given direction.
    pub fn from_surface(
        surface: &SurfaceSample,
        direction: Vec3,
        cull_mask: u32,
    ) -> Self {
        let origin = surface.position - surface.view_dir * Self::NUDGE_OFFSET;

        Self::new(origin, direction, cull_mask)
    }

    pub fn with_max_distance(mut self, t_max: f32) -> Self {
        self.t_max = t_max;
        self
    }
}
