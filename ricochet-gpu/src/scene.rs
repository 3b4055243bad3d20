//! Services the kernel consumes but doesn't implement.

use glam::{Vec2, Vec3, Vec4};

use crate::{
    BounceRay, HitResult, LightContribution, LightingQuery, MaterialId,
    PolygonLightMode, TriangleRef, WhiteNoise,
};

/// Acceleration-structure intersection service.
pub trait Tracer {
    fn trace(&self, ray: &BounceRay) -> HitResult;

    /// Returns the premultiplied color (rgb) and coverage (a) of translucent
    /// geometry found along the ray, up to `ray.t_max`.
    fn trace_transparency(&self, _ray: &BounceRay) -> Vec4 {
        Vec4::ZERO
    }
}

/// Analytic direct lighting evaluator.
pub trait DirectLighting {
    fn evaluate(
        &self,
        query: &LightingQuery,
        polygon_lights: PolygonLightMode,
        wnoise: &mut WhiteNoise,
    ) -> LightContribution;

    /// Returns the probability with which the evaluator picks given light
    /// polygon when lighting `origin`.
    fn light_selection_pdf(&self, _origin: Vec3, _light: &TriangleRef) -> f32 {
        1.0
    }
}

pub trait SunLighting {
    fn evaluate(
        &self,
        query: &LightingQuery,
        wnoise: &mut WhiteNoise,
    ) -> LightContribution;
}

pub trait EnvironmentMap {
    fn sample(&self, direction: Vec3, include_sun: bool) -> Vec3;
}

/// Material and texture lookups.
pub trait MaterialLookup {
    /// Returns base color (rgb) and specular factor (a).
    fn base_color(&self, material_id: MaterialId, uv: Vec2) -> Vec4;

    fn emissive(&self, material_id: MaterialId, uv: Vec2) -> Vec3;

    /// Returns metallic (x) and perceptual roughness (y).
    fn metallic_roughness(&self, material_id: MaterialId, uv: Vec2) -> Vec2;
}

/// Everything a bounce needs from the outside world.
pub trait Scene:
    Tracer + DirectLighting + SunLighting + EnvironmentMap + MaterialLookup
{
}

impl<T> Scene for T where
    T: Tracer + DirectLighting + SunLighting + EnvironmentMap + MaterialLookup
{
}
