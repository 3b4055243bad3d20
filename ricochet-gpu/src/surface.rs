use glam::{vec4, Vec3, Vec4, Vec4Swizzles};

use crate::{
    KernelConfig, MaterialId, Normal, Resolution, SliceExt, U32Ext,
};

/// Surface a bounce starts from.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct SurfaceSample {
    pub position: Vec3,
    pub material_id: MaterialId,

    /// Direction of the ray that arrived at this surface, i.e. pointing from
    /// the previous vertex towards the surface.
    pub view_dir: Vec3,

    pub normal: Vec3,
    pub geo_normal: Vec3,

    /// Energy that survived the path so far.
    pub throughput: Vec3,

    /// Whether the path so far started with a specular reflection.
    pub is_specular: bool,

    pub base_color: Vec3,
    pub specular_factor: f32,
    pub metallic: f32,
    pub roughness: f32,

    /// Outgoing direction of the first bounce; zero on the first bounce.
    pub primary_dir: Vec3,
}

/// Primary surface, as written by the rasterizer / first hit pass.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct PrimarySurface {
    pub position: Vec3,
    pub material_id: MaterialId,
    pub view_dir: Vec3,
    pub normal: Vec3,
    pub geo_normal: Vec3,
    pub base_color: Vec3,
    pub specular_factor: f32,
    pub metallic: f32,
    pub roughness: f32,
}

impl PrimarySurface {
    pub fn read(buffer: &[Vec4], id: usize) -> Self {
        let d0 = *buffer.at(4 * id);
        let d1 = *buffer.at(4 * id + 1);
        let d2 = *buffer.at(4 * id + 2);
        let d3 = *buffer.at(4 * id + 3);

        let metallic_roughness = d1.w.to_bits().to_unorm4x8();

        Self {
            position: d0.xyz(),
            material_id: MaterialId::new(d0.w.to_bits()),
            view_dir: d1.xyz(),
            normal: Normal::decode(d2.xy()),
            geo_normal: Normal::decode(d2.zw()),
            base_color: d3.xyz(),
            specular_factor: d3.w,
            metallic: metallic_roughness.x,
            roughness: metallic_roughness.y,
        }
    }

    pub fn write(&self, buffer: &mut [Vec4], id: usize) {
        let d0 = self
            .position
            .extend(f32::from_bits(self.material_id.get()));

        let d1 = self.view_dir.extend(f32::from_bits(u32::from_unorm4x8(vec4(
            self.metallic,
            self.roughness,
            0.0,
            0.0,
        ))));

        let normal = Normal::encode(self.normal);
        let geo_normal = Normal::encode(self.geo_normal);
        let d2 = vec4(normal.x, normal.y, geo_normal.x, geo_normal.y);
        let d3 = self.base_color.extend(self.specular_factor);

        *buffer.at_mut(4 * id) = d0;
        *buffer.at_mut(4 * id + 1) = d1;
        *buffer.at_mut(4 * id + 2) = d2;
        *buffer.at_mut(4 * id + 3) = d3;
    }
}

/// Surface hit by a bounce, persisted for the next bounce.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct NextSurfaceState {
    pub position: Vec3,
    pub material_id: MaterialId,

    /// Direction of the bounce ray that found this surface.
    pub direction: Vec3,

    pub geo_normal: Vec3,

    /// See: [`SurfaceSample::primary_dir`].
    pub primary_dir: Vec3,

    pub throughput: Vec3,
    pub is_specular: bool,
}

impl NextSurfaceState {
    pub fn read(buffer: &[Vec4], id: usize) -> Self {
        let d0 = *buffer.at(4 * id);
        let d1 = *buffer.at(4 * id + 1);
        let d2 = *buffer.at(4 * id + 2);
        let d3 = *buffer.at(4 * id + 3);

        Self {
            position: d0.xyz(),
            material_id: MaterialId::new(d0.w.to_bits()),
            direction: d1.xyz(),
            geo_normal: Normal::decode(d2.xy()),
            primary_dir: Normal::decode(d2.zw()),
            throughput: d3.xyz(),
            is_specular: d3.w > 0.5,
        }
    }

    pub fn write(&self, buffer: &mut [Vec4], id: usize) {
        let d0 = self
            .position
            .extend(f32::from_bits(self.material_id.get()));

        let d1 = self.direction.extend(0.0);
        let geo_normal = Normal::encode(self.geo_normal);
        let primary_dir = Normal::encode(self.primary_dir);
        let d2 = vec4(geo_normal.x, geo_normal.y, primary_dir.x, primary_dir.y);

        let d3 = self
            .throughput
            .extend(if self.is_specular { 1.0 } else { 0.0 });

        *buffer.at_mut(4 * id) = d0;
        *buffer.at_mut(4 * id + 1) = d1;
        *buffer.at_mut(4 * id + 2) = d2;
        *buffer.at_mut(4 * id + 3) = d3;
    }

    /// Marks given slot as empty, terminating the path.
    pub fn clear(buffer: &mut [Vec4], id: usize) {
        *buffer.at_mut(4 * id) = Vec4::ZERO;
        *buffer.at_mut(4 * id + 1) = Vec4::ZERO;
        *buffer.at_mut(4 * id + 2) = Vec4::ZERO;
        *buffer.at_mut(4 * id + 3) = Vec4::ZERO;
    }
}

/// Reads the surface a bounce starts from.
#[derive(Clone, Copy)]
pub struct SurfaceLoader<'a> {
    config: &'a KernelConfig,
    bounce: u32,
}

impl<'a> SurfaceLoader<'a> {
    pub fn new(config: &'a KernelConfig, bounce: u32) -> Self {
        Self { config, bounce }
    }

    /// Returns the surface for this bounce or `None` if the path terminates
    /// here.
    pub fn load(
        self,
        primary_surfaces: &[Vec4],
        primary_id: usize,
        bounce_surfaces: &[Vec4],
        bounce_id: usize,
    ) -> Option<SurfaceSample> {
        let surface = if self.bounce == 0 {
            self.from_primary(PrimarySurface::read(primary_surfaces, primary_id))
        } else {
            Self::from_bounce(NextSurfaceState::read(bounce_surfaces, bounce_id))
        };

        let material_id = surface.material_id;

        if material_id.is_none() || material_id.is_self_illuminating() {
            None
        } else {
            Some(surface)
        }
    }

    pub fn from_primary(self, surface: PrimarySurface) -> SurfaceSample {
        let mut sample = SurfaceSample {
            position: surface.position,
            material_id: surface.material_id,
            view_dir: surface.view_dir,
            normal: surface.normal,
            geo_normal: surface.geo_normal,
            throughput: Vec3::ONE,
            is_specular: false,
            base_color: surface.base_color,
            specular_factor: surface.specular_factor,
            metallic: surface.metallic,
            roughness: surface.roughness,
            primary_dir: Vec3::ZERO,
        };

        if let Resolution::Half = self.config.resolution() {
            // Metallic/roughness aren't available at reduced resolution; each
            // shaded pixel also stands in for its unshaded neighbour
            sample.metallic = 0.0;
            sample.roughness = 1.0;
            sample.throughput *= 2.0;
        }

        sample
    }

    /// Surfaces past the first bounce only carry their geometric normal and
    /// are treated as rough dielectrics whose color is already folded into
    /// the throughput.
    pub fn from_bounce(surface: NextSurfaceState) -> SurfaceSample {
        SurfaceSample {
            position: surface.position,
            material_id: surface.material_id,
            view_dir: surface.direction,
            normal: surface.geo_normal,
            geo_normal: surface.geo_normal,
            throughput: surface.throughput,
            is_specular: surface.is_specular,
            base_color: Vec3::ZERO,
            specular_factor: 0.0,
            metallic: 0.0,
            roughness: 1.0,
            primary_dir: surface.primary_dir,
        }
    }
}
