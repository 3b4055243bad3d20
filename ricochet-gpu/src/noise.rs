use core::f32::consts::PI;

use glam::{vec2, vec3, UVec2, Vec2, Vec3};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

/// Pixel-local pseudo-random stream.
///
/// Every pixel and every bounce gets its own, deterministic stream, so a frame
/// can be reproduced given its seed.
#[derive(Copy, Clone)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq, Eq))]
pub struct WhiteNoise {
    state: u32,
}

impl WhiteNoise {
    pub fn new(seed: u32, id: UVec2) -> Self {
        Self {
            state: seed
                ^ 48619u32.wrapping_mul(id.x)
                ^ 95461u32.wrapping_mul(id.y),
        }
    }

    /// Creates a stream for given bounce of given pixel.
    pub fn for_bounce(seed: u32, id: UVec2, bounce: u32) -> Self {
        let mut this =
            Self::new(seed ^ 0x9e3779b9u32.wrapping_mul(bounce + 1), id);

        // Decorrelates seeds which differ only in their lowest bits
        this.sample_int();
        this
    }

    pub fn from_state(state: u32) -> Self {
        Self { state }
    }

    /// Generates a uniform sample in range `<0.0, 1.0)`.
    pub fn sample(&mut self) -> f32 {
        // Top 24 bits, so that the result is exactly representable and never
        // rounds up to 1.0
        ((self.sample_int() >> 8) as f32) / 16777216.0
    }

    /// Generates a uniform sample in range `<0, u32::MAX>`.
    pub fn sample_int(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(747796405)
            .wrapping_add(2891336453);

        let word = ((self.state >> ((self.state >> 28) + 4)) ^ self.state)
            .wrapping_mul(277803737);

        (word >> 22) ^ word
    }

    pub fn sample_vec2(&mut self) -> Vec2 {
        vec2(self.sample(), self.sample())
    }

    /// Generates a cosine-weighted sample on a hemisphere around given normal.
    pub fn sample_cosine_hemisphere(&mut self, normal: Vec3) -> Vec3 {
        let u = self.sample_vec2();

        cosine_hemisphere(normal, u)
    }

    /// Like [`Self::sample_cosine_hemisphere()`], but confines the sample into
    /// one of four quadrants of the unit square; rotating `stratum` across
    /// frames spreads consecutive samples evenly over the hemisphere.
    pub fn sample_cosine_hemisphere_stratified(
        &mut self,
        normal: Vec3,
        stratum: u32,
    ) -> Vec3 {
        let offset = vec2((stratum & 1) as f32, ((stratum >> 1) & 1) as f32);
        let u = (self.sample_vec2() + offset) * 0.5;

        cosine_hemisphere(normal, u)
    }
}

fn cosine_hemisphere(normal: Vec3, u: Vec2) -> Vec3 {
    let radius = u.x.sqrt();
    let angle = 2.0 * PI * u.y;
    let (t, b) = normal.any_orthonormal_pair();

    let local = vec3(
        radius * angle.cos(),
        radius * angle.sin(),
        (1.0 - u.x).max(0.0).sqrt(),
    );

    (local.x * t + local.y * b + local.z * normal).normalize()
}
