use glam::{Vec2, Vec3, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{
    balance_heuristic, base_reflectivity, lava_uv_warp, lerp,
    polygon_light_pdf, specular_light_weight, BounceRay, DirectLighting,
    F32Ext, HitResult, KernelConfig, LightingQuery, LobeSample, LobeWeights,
    NextSurfaceState, Scene, SunLighting, SurfaceSample, WhiteNoise,
    MIN_REFLECTIVITY,
};

/// Energy a bounce brings back to its pixel.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct RadianceContribution {
    pub radiance: Vec3,

    /// Whether the energy belongs to the specular channel; decided by the
    /// first bounce and kept for the rest of the path.
    pub is_specular: bool,

    /// First bounce's direction; used to project the energy onto the
    /// directional basis.
    pub direction: Vec3,
}

impl RadianceContribution {
    pub fn none() -> Self {
        Default::default()
    }
}

#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct BounceOutcome {
    pub contribution: RadianceContribution,

    /// Surface the next bounce should start from; `None` terminates the path.
    pub next: Option<NextSurfaceState>,
}

/// Returns how much sun light a bounce hit `distance` away still receives;
/// fades smoothly to 0.0 at `range`.
///
/// Specular reflections of sun-lit surfaces get a range that shrinks with
/// decreasing roughness, so that only near & sharp reflections show them.
pub fn sun_attenuation(
    distance: f32,
    range: f32,
    roughness: f32,
    is_specular: bool,
) -> f32 {
    let range = if is_specular {
        range * lerp(0.1, 1.0, roughness)
    } else {
        range
    };

    if range <= 0.0 || distance >= range {
        return 0.0;
    }

    let x = (distance / range).saturate();

    (1.0 - x * x).sqr()
}

/// Returns the factor by which energy of specular bounces is dimmed the
/// longer and rougher the path is; that's where fireflies come from.
pub fn specular_compensation(
    anti_flicker: f32,
    roughness: f32,
    distance: f32,
) -> f32 {
    1.0 / (1.0 + anti_flicker.max(0.0) * roughness.sqr() * distance.max(0.0))
}

/// Traces a bounce ray and evaluates light it brings back.
pub struct BounceShader<'a, S> {
    config: &'a KernelConfig,
    scene: &'a S,
    bounce: u32,
}

impl<'a, S> BounceShader<'a, S>
where
    S: Scene,
{
    pub fn new(config: &'a KernelConfig, scene: &'a S, bounce: u32) -> Self {
        Self {
            config,
            scene,
            bounce,
        }
    }

    pub fn shade(
        &self,
        surface: &SurfaceSample,
        lobe: &LobeSample,
        weights: LobeWeights,
        wnoise: &mut WhiteNoise,
    ) -> BounceOutcome {
        let cull_mask = self.config.cull_mask(surface.material_id);
        let ray = BounceRay::from_surface(surface, lobe.direction, cull_mask);
        let hit = self.scene.trace(&ray);

        let (is_specular, primary_dir) = if self.bounce == 0 {
            (lobe.is_specular, lobe.direction)
        } else {
            (surface.is_specular, surface.primary_dir)
        };

        let mut throughput = surface.throughput * lobe.throughput;

        // Reflectivity gets re-applied when the specular channel is resolved
        if self.bounce == 0 && lobe.is_specular {
            let f0 = base_reflectivity(surface.base_color, surface.metallic);

            throughput /= f0.max(Vec3::splat(MIN_REFLECTIVITY));
        }

        let mut radiance = Vec3::ZERO;
        let mut next = None;

        if hit.is_none() || hit.material_id().is_sky() {
            radiance += self.shade_sky(&ray, &hit, lobe, weights) * throughput;
        } else {
            if lobe.is_specular {
                throughput *= specular_compensation(
                    self.config.specular_anti_flicker,
                    surface.roughness,
                    hit.distance,
                );
            }

            radiance += self.shade_emissive(&ray, &hit, lobe, weights)
                * throughput;

            let (hit_radiance, hit_throughput) = self.shade_surface(
                surface, &ray, &hit, lobe, throughput, cull_mask, wnoise,
            );

            radiance += hit_radiance;

            if self.config.has_next_bounce(self.bounce) {
                next = Some(NextSurfaceState {
                    position: hit.point(),
                    material_id: hit.material_id(),
                    direction: ray.direction,
                    geo_normal: hit.geo_normal(ray.direction),
                    primary_dir,
                    throughput: hit_throughput,
                    is_specular,
                });
            }
        }

        if lobe.is_specular {
            let transparency = self
                .scene
                .trace_transparency(&ray.with_max_distance(hit.distance));

            radiance = radiance * (1.0 - transparency.w.saturate())
                + transparency.xyz() * throughput;
        }

        BounceOutcome {
            contribution: RadianceContribution {
                radiance,
                is_specular,
                direction: primary_dir,
            },
            next,
        }
    }

    /// Returns how much of light coming straight from a light polygon (or
    /// the sky) the bounce is responsible for.
    ///
    /// `light` is `None` for genuine misses, which have no polygon the
    /// direct lighting pass could've picked.
    fn light_weight(
        &self,
        ray: &BounceRay,
        hit: &HitResult,
        lobe: &LobeSample,
        weights: LobeWeights,
    ) -> f32 {
        let polygon_lights = self.config.polygon_lights(self.bounce);

        if !lobe.is_specular {
            return if polygon_lights.is_handled_elsewhere() {
                0.0
            } else {
                1.0
            };
        }

        let mis = if hit.is_some() {
            let selection_pdf =
                self.scene.light_selection_pdf(ray.origin, &hit.triangle);

            let light_pdf =
                polygon_light_pdf(ray.origin, &hit.triangle, selection_pdf);

            balance_heuristic(lobe.pdf, light_pdf)
        } else {
            0.0
        };

        specular_light_weight(weights.direct_specular, mis)
    }

    fn shade_sky(
        &self,
        ray: &BounceRay,
        hit: &HitResult,
        lobe: &LobeSample,
        weights: LobeWeights,
    ) -> Vec3 {
        let weight = self.light_weight(ray, hit, lobe, weights);

        if weight <= 0.0 {
            return Vec3::ZERO;
        }

        // Sun's disk is present only in specular reflections; diffuse
        // surfaces get the sun through `SunLighting`
        let env = self.scene.sample(ray.direction, lobe.is_specular);

        env * self.config.env_scale * weight
    }

    fn shade_emissive(
        &self,
        ray: &BounceRay,
        hit: &HitResult,
        lobe: &LobeSample,
        weights: LobeWeights,
    ) -> Vec3 {
        let material_id = hit.material_id();

        let emissive = self.scene.emissive(material_id, self.hit_uv(hit))
            * hit.triangle.emissive_factor;

        if emissive == Vec3::ZERO {
            return Vec3::ZERO;
        }

        // Matches the spotlight-like falloff used when sampling polygon
        // lights analytically
        let falloff = (-ray.direction)
            .dot(hit.triangle.plane_normal())
            .max(0.0)
            .sqrt();

        let weight = if material_id.is_light() {
            self.light_weight(ray, hit, lobe, weights)
        } else {
            1.0
        };

        emissive * falloff * weight
    }

    /// Returns light reflected by the hit surface towards the bounce's
    /// origin, along with the path throughput past the hit.
    fn shade_surface(
        &self,
        surface: &SurfaceSample,
        ray: &BounceRay,
        hit: &HitResult,
        lobe: &LobeSample,
        throughput: Vec3,
        cull_mask: u32,
        wnoise: &mut WhiteNoise,
    ) -> (Vec3, Vec3) {
        let material_id = hit.material_id();
        let uv = self.hit_uv(hit);
        let base_color = self.scene.base_color(material_id, uv);
        let metallic_roughness = self.scene.metallic_roughness(material_id, uv);
        let throughput = throughput * base_color.xyz();

        let query = LightingQuery {
            position: hit.point(),
            normal: hit.normal(ray.direction),
            geo_normal: hit.geo_normal(ray.direction),
            view: -ray.direction,
            cluster: hit.triangle.cluster,
            material_id,
            base_color: base_color.xyz(),
            metallic: metallic_roughness.x,
            roughness: metallic_roughness.y,
            specular_factor: base_color.w,
            cull_mask,
        };

        let mut radiance = Vec3::ZERO;

        if self.bounce == 0 {
            let direct = DirectLighting::evaluate(
                self.scene,
                &query,
                self.config.polygon_lights(self.bounce + 1),
                wnoise,
            );

            radiance += direct.diffuse * throughput;
        }

        let attenuation = sun_attenuation(
            hit.distance,
            self.config.sun_bounce_range,
            surface.roughness,
            lobe.is_specular,
        );

        if attenuation > 0.0 {
            let sun = SunLighting::evaluate(self.scene, &query, wnoise);

            radiance += sun.diffuse * throughput * attenuation;
        }

        (radiance, throughput)
    }

    fn hit_uv(&self, hit: &HitResult) -> Vec2 {
        let uv = hit.uv();

        if hit.material_id().is_lava() {
            lava_uv_warp(uv, self.config.time)
        } else {
            uv
        }
    }
}
