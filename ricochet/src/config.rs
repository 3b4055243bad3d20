use crate::gpu::{
    self, Accumulation, KernelConfig, PolygonLightMode, SpecularSampling,
};
use crate::{Error, Result};

/// Configuration of the indirect lighting, as seen by the application.
///
/// Converted into [`KernelConfig`] once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Roughness around which specular reflections of polygon lights are
    /// handed over from bounce rays to the direct lighting pass.
    pub direct_roughness_threshold: f32,

    /// Roughness above which specular gets approximated from the diffuse
    /// channel downstream.
    pub fake_roughness_threshold: f32,

    /// How quickly indirect specular fades with hit distance on rough
    /// surfaces; zero disables the fade.
    pub specular_anti_flicker: f32,

    /// Distance past which bounce hits don't receive sun light anymore.
    pub sun_bounce_range: f32,

    /// Multiplier for the environment map.
    pub env_scale: f32,

    /// Number of bounces; zero means one bounce at half resolution.
    pub bounce_rays: u32,

    /// How polygon lights visible from primary surfaces are handled.
    pub direct_polygon_lights: PolygonLightMode,

    /// How polygon lights visible from first-bounce hits are handled.
    pub indirect_polygon_lights: PolygonLightMode,

    /// Whether the camera is in first person; bounce rays see the player's
    /// body then, but not their weapon.
    pub first_person_model: bool,

    pub accumulation: Accumulation,
    pub specular_sampling: SpecularSampling,

    /// Seed of the per-frame random streams; the same seed renders the same
    /// sequence of frames.
    pub seed: u64,
}

impl Config {
    pub const MAX_BOUNCE_RAYS: u32 = 8;

    pub fn validate(&self) -> Result<()> {
        fn check(
            field: &'static str,
            value: f32,
            min: f32,
            max: f32,
        ) -> Result<()> {
            if !value.is_finite() {
                return Err(Error::InvalidConfig {
                    field,
                    reason: "must be finite",
                });
            }

            if value < min || value > max {
                return Err(Error::InvalidConfig {
                    field,
                    reason: "is out of range",
                });
            }

            Ok(())
        }

        check(
            "direct_roughness_threshold",
            self.direct_roughness_threshold,
            0.0,
            1.0,
        )?;

        check(
            "fake_roughness_threshold",
            self.fake_roughness_threshold,
            0.0,
            1.0,
        )?;

        check(
            "specular_anti_flicker",
            self.specular_anti_flicker,
            0.0,
            f32::MAX,
        )?;

        check("sun_bounce_range", self.sun_bounce_range, 0.0, f32::MAX)?;
        check("env_scale", self.env_scale, 0.0, f32::MAX)?;

        if self.bounce_rays > Self::MAX_BOUNCE_RAYS {
            return Err(Error::InvalidConfig {
                field: "bounce_rays",
                reason: "is out of range",
            });
        }

        Ok(())
    }

    pub fn to_kernel(&self, frame: u32, time: f32) -> KernelConfig {
        let mut flags = 0;

        if self.first_person_model {
            flags |= KernelConfig::FLAG_FIRST_PERSON_MODEL;
        }

        if self.accumulation == Accumulation::Directional {
            flags |= KernelConfig::FLAG_DIRECTIONAL_ACCUMULATION;
        }

        if self.specular_sampling == SpecularSampling::Enabled {
            flags |= KernelConfig::FLAG_SPECULAR_SAMPLING;
        }

        gpu::KernelConfig {
            direct_roughness_threshold: self.direct_roughness_threshold,
            fake_roughness_threshold: self.fake_roughness_threshold,
            specular_anti_flicker: self.specular_anti_flicker,
            sun_bounce_range: self.sun_bounce_range,
            env_scale: self.env_scale,
            time,
            frame,
            direct_polygon_lights: self.direct_polygon_lights.to_i32(),
            indirect_polygon_lights: self.indirect_polygon_lights.to_i32(),
            bounce_rays: self.bounce_rays,
            flags,
            _pad0: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            direct_roughness_threshold: 0.18,
            fake_roughness_threshold: 0.2,
            specular_anti_flicker: 2.0,
            sun_bounce_range: 2000.0,
            env_scale: 1.0,
            bounce_rays: 1,
            direct_polygon_lights: PolygonLightMode::Analytic,
            indirect_polygon_lights: PolygonLightMode::Disabled,
            first_person_model: false,
            accumulation: Accumulation::Directional,
            specular_sampling: SpecularSampling::Enabled,
            seed: 0,
        }
    }
}
