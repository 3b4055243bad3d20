use core::f32::consts::PI;

use glam::{UVec2, Vec3};

use crate::{
    base_reflectivity, fresnel_schlick, ggx_vndf_pdf,
    perceptual_roughness_to_roughness, sample_ggx_vndf, smith_g1,
    Accumulation, KernelConfig, SpecularSampling, SurfaceSample, Vec3Ext,
    WhiteNoise,
};

/// Direction a bounce continues in, along with its estimator weight.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct LobeSample {
    pub direction: Vec3,

    /// BRDF * cosine / pdf; never negative, possibly zero.
    pub throughput: Vec3,

    /// Probability density (per solid angle) of having picked `direction`,
    /// including the probability of having picked this lobe.
    pub pdf: f32,

    pub is_specular: bool,
}

impl LobeSample {
    /// Returns a sample that carries no energy.
    pub fn none() -> Self {
        Default::default()
    }

    pub fn is_some(&self) -> bool {
        self.throughput != Vec3::ZERO
    }
}

/// Roughness-dependent weights deciding how a surface is sampled.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct LobeWeights {
    /// See: [`KernelConfig::direct_specular_weight()`].
    pub direct_specular: f32,

    /// See: [`KernelConfig::fake_specular_weight()`].
    pub fake_specular: f32,

    /// Probability of picking the specular lobe.
    pub specular_probability: f32,
}

impl LobeWeights {
    pub fn new(
        config: &KernelConfig,
        bounce: u32,
        surface: &SurfaceSample,
    ) -> Self {
        let direct_specular =
            config.direct_specular_weight(bounce, surface.roughness);

        let fake_specular = config.fake_specular_weight(surface.roughness);
        let n_o_v = surface.normal.dot(-surface.view_dir);

        let specular_probability = if bounce == 0
            && config.specular_sampling() == SpecularSampling::Enabled
            && n_o_v > 0.0
        {
            if surface.metallic >= 1.0 && fake_specular <= 0.0 {
                1.0
            } else {
                0.5
            }
        } else {
            0.0
        };

        Self {
            direct_specular,
            fake_specular,
            specular_probability,
        }
    }
}

/// Picks the lobe a bounce continues along.
#[derive(Clone, Copy)]
pub struct LobeSampler<'a> {
    config: &'a KernelConfig,
    bounce: u32,
    pixel: UVec2,
}

impl<'a> LobeSampler<'a> {
    pub fn new(config: &'a KernelConfig, bounce: u32, pixel: UVec2) -> Self {
        Self {
            config,
            bounce,
            pixel,
        }
    }

    pub fn sample(
        self,
        surface: &SurfaceSample,
        weights: LobeWeights,
        wnoise: &mut WhiteNoise,
    ) -> LobeSample {
        let p_spec = weights.specular_probability;
        let choice = wnoise.sample();

        if choice < p_spec {
            if let Some(sample) = self.sample_specular(surface, weights, wnoise)
            {
                return sample;
            }

            // There's no diffuse lobe to fall back to
            if p_spec >= 1.0 {
                return LobeSample::none();
            }
        }

        self.sample_diffuse(surface, p_spec, wnoise)
    }

    fn sample_specular(
        self,
        surface: &SurfaceSample,
        weights: LobeWeights,
        wnoise: &mut WhiteNoise,
    ) -> Option<LobeSample> {
        let p_spec = weights.specular_probability;
        let n = surface.normal;
        let v = -surface.view_dir;
        let n_o_v = n.dot(v);
        let roughness = perceptual_roughness_to_roughness(surface.roughness);

        let h =
            sample_ggx_vndf(n, v, roughness, wnoise.sample(), wnoise.sample());

        let l = surface.view_dir.reflect(h);
        let n_o_l = n.dot(l);
        let v_o_h = v.dot(h);

        if n_o_l <= 0.0 || v_o_h <= 0.0 {
            return None;
        }

        let f0 = base_reflectivity(surface.base_color, surface.metallic);
        let f = fresnel_schlick(f0, v_o_h, surface.specular_factor);
        let g1 = smith_g1(roughness, n_o_l);

        let throughput =
            f * (g1 * (1.0 - weights.fake_specular).max(0.0) / p_spec);

        Some(LobeSample {
            direction: l,
            throughput,
            pdf: ggx_vndf_pdf(roughness, n_o_v, n.dot(h)) * p_spec,
            is_specular: true,
        })
    }

    fn sample_diffuse(
        self,
        surface: &SurfaceSample,
        p_spec: f32,
        wnoise: &mut WhiteNoise,
    ) -> LobeSample {
        let n = surface.normal;
        let v = -surface.view_dir;

        let l = if self.bounce == 0
            && self.config.accumulation() == Accumulation::Directional
        {
            // Stratifying over frames spreads samples evenly over the
            // hemisphere, which the directional basis is sensitive to
            let stratum = self
                .config
                .frame
                .wrapping_add(self.pixel.x)
                .wrapping_add(self.pixel.y)
                % 4;

            let l = wnoise
                .sample_cosine_hemisphere_stratified(surface.geo_normal, stratum);

            // Samples are stratified around the geometric normal, so they
            // can land below the shading normal; those get redrawn around
            // the shading normal. The weight below treats both as cosine
            // distributed around `n`, which is an approximation: the
            // geometric-to-shading cosine ratio isn't folded in.
            if l.dot(n) > 0.0 {
                l
            } else {
                wnoise.sample_cosine_hemisphere(n)
            }
        } else {
            wnoise.sample_cosine_hemisphere(n)
        };

        let n_o_l = n.dot(l).max(0.0);
        let h = (v + l).normalize_or_zero();
        let f0 = base_reflectivity(surface.base_color, surface.metallic);
        let f = fresnel_schlick(f0, v.dot(h).max(0.0), surface.specular_factor);

        let throughput = (Vec3::ONE - f).max(Vec3::ZERO) / (1.0 - p_spec);

        LobeSample {
            direction: l,
            throughput,
            pdf: n_o_l / PI * (1.0 - p_spec),
            is_specular: false,
        }
    }
}
