//! Collaborators used by unit tests.

use core::cell::Cell;

use glam::{vec2, vec3, Vec2, Vec3, Vec4};

use crate::{
    BounceRay, DirectLighting, EnvironmentMap, HitResult, LightContribution,
    LightingQuery, MaterialId, MaterialLookup, PolygonLightMode, SunLighting,
    Tracer, TriangleRef, WhiteNoise,
};

/// Scene where every ray hits (or misses) the same thing.
pub struct TestScene {
    pub hit: HitResult,
    pub env: Vec3,

    /// Added to `env` for lookups which include the sun.
    pub sun_disk: Vec3,

    pub emissive: Vec3,
    pub base_color: Vec4,
    pub metallic_roughness: Vec2,
    pub direct: LightContribution,
    pub sun: LightContribution,
    pub transparency: Vec4,
    pub traces: Cell<u32>,
    pub direct_modes: Cell<Option<PolygonLightMode>>,
}

impl Default for TestScene {
    fn default() -> Self {
        Self {
            hit: HitResult::none(),
            env: Vec3::ZERO,
            sun_disk: Vec3::ZERO,
            emissive: Vec3::ZERO,
            base_color: Vec4::ONE,
            metallic_roughness: vec2(0.0, 1.0),
            direct: Default::default(),
            sun: Default::default(),
            transparency: Vec4::ZERO,
            traces: Cell::new(0),
            direct_modes: Cell::new(None),
        }
    }
}

/// Returns a hit against a large, downwards-facing triangle `distance` above
/// the origin; the hit point lies at `(0, distance, 0)`.
pub fn ceiling(material_id: MaterialId, distance: f32) -> HitResult {
    let triangle = TriangleRef {
        positions: [
            vec3(-10.0, distance, -10.0),
            vec3(10.0, distance, -10.0),
            vec3(-10.0, distance, 10.0),
        ],
        normals: [-Vec3::Y; 3],
        uvs: [vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0)],
        material_id,
        emissive_factor: 1.0,
        cluster: 3,
    };

    HitResult::new(distance, vec2(0.5, 0.5), triangle)
}

impl Tracer for TestScene {
    fn trace(&self, _ray: &BounceRay) -> HitResult {
        self.traces.set(self.traces.get() + 1);
        self.hit
    }

    fn trace_transparency(&self, _ray: &BounceRay) -> Vec4 {
        self.transparency
    }
}

impl DirectLighting for TestScene {
    fn evaluate(
        &self,
        _query: &LightingQuery,
        polygon_lights: PolygonLightMode,
        _wnoise: &mut WhiteNoise,
    ) -> LightContribution {
        self.direct_modes.set(Some(polygon_lights));
        self.direct
    }

    fn light_selection_pdf(&self, _origin: Vec3, _light: &TriangleRef) -> f32 {
        0.5
    }
}

impl SunLighting for TestScene {
    fn evaluate(
        &self,
        _query: &LightingQuery,
        _wnoise: &mut WhiteNoise,
    ) -> LightContribution {
        self.sun
    }
}

impl EnvironmentMap for TestScene {
    fn sample(&self, _direction: Vec3, include_sun: bool) -> Vec3 {
        if include_sun {
            self.env + self.sun_disk
        } else {
            self.env
        }
    }
}

impl MaterialLookup for TestScene {
    fn base_color(&self, _material_id: MaterialId, _uv: Vec2) -> Vec4 {
        self.base_color
    }

    fn emissive(&self, _material_id: MaterialId, _uv: Vec2) -> Vec3 {
        self.emissive
    }

    fn metallic_roughness(&self, _material_id: MaterialId, _uv: Vec2) -> Vec2 {
        self.metallic_roughness
    }
}
