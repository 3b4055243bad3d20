use bytemuck::{Pod, Zeroable};

use crate::{smoothstep, BounceRay, MaterialId};

/// Immutable, per-frame configuration of the indirect lighting kernel.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct KernelConfig {
    /// Roughness around which specular highlights of analytic lights are
    /// handed over from bounce sampling to the direct lighting pass.
    pub direct_roughness_threshold: f32,

    /// Roughness above which the downstream reconstruction approximates
    /// specular from the diffuse channel instead of true specular samples.
    pub fake_roughness_threshold: f32,

    /// How quickly indirect specular fades with hit distance on rough
    /// surfaces; 0.0 disables the fade.
    pub specular_anti_flicker: f32,

    /// Maximum distance at which bounce hits still receive sun light.
    pub sun_bounce_range: f32,

    /// Multiplier for environment map radiance.
    pub env_scale: f32,

    /// Time in seconds; animates lava.
    pub time: f32,

    pub frame: u32,

    /// Polygon lights handling of the direct lighting pass (bounce 0):
    /// negative - bounce, zero - disabled, positive - analytic.
    pub direct_polygon_lights: i32,

    /// Like `direct_polygon_lights`, but for surfaces hit by the first
    /// bounce.
    pub indirect_polygon_lights: i32,

    /// Number of bounces at full resolution; 0 means a single bounce at half
    /// resolution.
    pub bounce_rays: u32,

    /// See: `Self::FLAG_*`.
    pub flags: u32,

    pub _pad0: u32,
}

impl KernelConfig {
    pub const FLAG_FIRST_PERSON_MODEL: u32 = 1 << 0;
    pub const FLAG_DIRECTIONAL_ACCUMULATION: u32 = 1 << 1;
    pub const FLAG_SPECULAR_SAMPLING: u32 = 1 << 2;

    /// Returns how polygon lights reaching the surface a given bounce starts
    /// from are handled.
    ///
    /// Primary surfaces are lit by the direct lighting pass and first bounce
    /// hits are lit by the first bounce itself; past that, emissive polygons
    /// are only ever found by bounce rays.
    pub fn polygon_lights(&self, bounce: u32) -> PolygonLightMode {
        match bounce {
            0 => PolygonLightMode::from_i32(self.direct_polygon_lights),
            1 => PolygonLightMode::from_i32(self.indirect_polygon_lights),
            _ => PolygonLightMode::Bounce,
        }
    }

    pub fn is_first_person_model(&self) -> bool {
        self.flags & Self::FLAG_FIRST_PERSON_MODEL > 0
    }

    pub fn accumulation(&self) -> Accumulation {
        if self.flags & Self::FLAG_DIRECTIONAL_ACCUMULATION > 0 {
            Accumulation::Directional
        } else {
            Accumulation::Constant
        }
    }

    pub fn specular_sampling(&self) -> SpecularSampling {
        if self.flags & Self::FLAG_SPECULAR_SAMPLING > 0 {
            SpecularSampling::Enabled
        } else {
            SpecularSampling::Disabled
        }
    }

    pub fn resolution(&self) -> Resolution {
        if self.bounce_rays == 0 {
            Resolution::Half
        } else {
            Resolution::Full
        }
    }

    pub fn max_bounces(&self) -> u32 {
        self.bounce_rays.max(1)
    }

    /// Returns whether the kernel should persist the next surface after given
    /// bounce.
    pub fn has_next_bounce(&self, bounce: u32) -> bool {
        bounce + 1 < self.max_bounces()
    }

    /// Weight of the direct lighting pass in specular reflections of polygon
    /// lights; 0.0 for smooth surfaces (bounce rays own them entirely) and
    /// 1.0 for rough ones.
    ///
    /// When polygon lights are found only by bounce rays there's nothing to
    /// share with, so the weight is 0.0.
    pub fn direct_specular_weight(&self, bounce: u32, roughness: f32) -> f32 {
        if !self.polygon_lights(bounce).is_handled_elsewhere() {
            return 0.0;
        }

        smoothstep(
            self.direct_roughness_threshold - 0.02,
            self.direct_roughness_threshold + 0.02,
            roughness,
        )
    }

    /// Weight of the approximated specular in the downstream reconstruction;
    /// 0.0 for smooth surfaces and 1.0 for rough ones.
    pub fn fake_specular_weight(&self, roughness: f32) -> f32 {
        smoothstep(
            self.fake_roughness_threshold,
            self.fake_roughness_threshold + 0.1,
            roughness,
        )
    }

    /// Returns the cull mask for bounce rays shot from given surface.
    pub fn cull_mask(&self, material_id: MaterialId) -> u32 {
        if material_id.is_weapon() {
            BounceRay::MASK_OPAQUE
        } else if self.is_first_person_model() {
            BounceRay::MASK_OPAQUE | BounceRay::MASK_VIEWER_MODEL
        } else {
            BounceRay::MASK_OPAQUE | BounceRay::MASK_VIEWER_WEAPON
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            direct_roughness_threshold: 0.18,
            fake_roughness_threshold: 0.2,
            specular_anti_flicker: 2.0,
            sun_bounce_range: 2000.0,
            env_scale: 1.0,
            time: 0.0,
            frame: 0,
            direct_polygon_lights: 1,
            indirect_polygon_lights: 0,
            bounce_rays: 1,
            flags: Self::FLAG_DIRECTIONAL_ACCUMULATION
                | Self::FLAG_SPECULAR_SAMPLING,
            _pad0: 0,
        }
    }
}

/// How emissive polygons reach the image.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum PolygonLightMode {
    /// Polygon lights are found only by bounce rays.
    Bounce,

    /// Polygon lights are not sampled by the direct lighting pass.
    Disabled,

    /// Polygon lights are sampled analytically by the direct lighting pass.
    Analytic,
}

impl PolygonLightMode {
    pub fn from_i32(val: i32) -> Self {
        if val < 0 {
            Self::Bounce
        } else if val == 0 {
            Self::Disabled
        } else {
            Self::Analytic
        }
    }

    pub fn to_i32(self) -> i32 {
        match self {
            Self::Bounce => -1,
            Self::Disabled => 0,
            Self::Analytic => 1,
        }
    }

    /// Returns whether light reaching the surface straight from a light
    /// polygon is accounted for outside of bounce sampling.
    pub fn is_handled_elsewhere(self) -> bool {
        self != Self::Bounce
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum Accumulation {
    /// Diffuse energy lands in the constant term only.
    Constant,

    /// Diffuse energy is projected onto the directional basis.
    Directional,
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum SpecularSampling {
    Enabled,
    Disabled,
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum Resolution {
    /// Every other pixel (checkerboarded) is shaded; throughput is doubled to
    /// compensate.
    Half,
    Full,
}
