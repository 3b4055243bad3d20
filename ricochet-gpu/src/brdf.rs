use core::f32::consts::PI;

use glam::{vec3, Vec3};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{lerp, F32Ext, RICOCHET_EPSILON};

/// Reflectivity at normal incidence of all non-metals.
pub const DIELECTRIC_REFLECTIVITY: f32 = 0.04;

/// Smallest reflectivity specular is demodulated by.
pub const MIN_REFLECTIVITY: f32 = 0.02;

pub fn perceptual_roughness_to_roughness(perceptual_roughness: f32) -> f32 {
    let clamped_perceptual_roughness = perceptual_roughness.clamp(0.089, 1.0);

    clamped_perceptual_roughness * clamped_perceptual_roughness
}

/// Returns the specular color at normal incidence (F0).
pub fn base_reflectivity(base_color: Vec3, metallic: f32) -> Vec3 {
    lerp(Vec3::splat(DIELECTRIC_REFLECTIVITY), base_color, metallic)
}

/// Schlick's approximation of the Fresnel term, scaled by the material's
/// specular factor.
pub fn fresnel_schlick(f0: Vec3, v_o_h: f32, specular_factor: f32) -> Vec3 {
    let f0 = f0.clamp(Vec3::ZERO, Vec3::ONE);
    let f = f0 + (1.0 - f0) * (1.0 - v_o_h.saturate()).powf(5.0);

    f * specular_factor.saturate()
}

/// GGX normal distribution function; `roughness` is alpha (i.e. squared
/// perceptual roughness).
pub fn d_ggx(roughness: f32, n_o_h: f32) -> f32 {
    let one_minus_noh_squared = 1.0 - n_o_h * n_o_h;
    let a = n_o_h * roughness;
    let k = roughness / (one_minus_noh_squared + a * a).max(RICOCHET_EPSILON);

    k * k * (1.0 / PI)
}

/// Smith's masking function for GGX.
pub fn smith_g1(roughness: f32, n_o_x: f32) -> f32 {
    let a2 = roughness * roughness;
    let n_o_x = n_o_x.saturate();
    let denom = n_o_x + (a2 + (1.0 - a2) * n_o_x * n_o_x).sqrt();

    if denom <= 0.0 {
        0.0
    } else {
        2.0 * n_o_x / denom
    }
}

/// Probability density (per solid angle) of reflecting `v` into `l` through a
/// half-vector drawn with [`sample_ggx_vndf()`].
pub fn ggx_vndf_pdf(roughness: f32, n_o_v: f32, n_o_h: f32) -> f32 {
    if n_o_v <= 0.0 {
        return 0.0;
    }

    smith_g1(roughness, n_o_v) * d_ggx(roughness, n_o_h) / (4.0 * n_o_v)
}

/// Samples a half-vector from the distribution of visible normals.
///
/// `v` points from the surface towards the viewer; the returned half-vector
/// is given in world space.
///
/// Thanks to:
///
/// - https://jcgt.org/published/0007/04/01/
///   (Sampling the GGX Distribution of Visible Normals by Eric Heitz)
pub fn sample_ggx_vndf(
    n: Vec3,
    v: Vec3,
    roughness: f32,
    sample1: f32,
    sample2: f32,
) -> Vec3 {
    let (t, b) = n.any_orthonormal_pair();
    let v_local = vec3(v.dot(t), v.dot(b), v.dot(n));

    let v_h = vec3(roughness * v_local.x, roughness * v_local.y, v_local.z)
        .normalize();

    let len = v_h.x * v_h.x + v_h.y * v_h.y;

    let tt1 = if len > 0.0 {
        vec3(-v_h.y, v_h.x, 0.0) * (1.0 / len.sqrt())
    } else {
        vec3(1.0, 0.0, 0.0)
    };

    let tt2 = v_h.cross(tt1);

    let r = sample1.sqrt();
    let phi = 2.0 * PI * sample2;
    let t1 = r * phi.cos();
    let t2 = r * phi.sin();
    let s = 0.5 * (1.0 + v_h.z);
    let t2 = (1.0 - s) * (1.0 - t1 * t1).max(0.0).sqrt() + s * t2;

    let n_h =
        t1 * tt1 + t2 * tt2 + 0.0f32.max(1.0 - t1 * t1 - t2 * t2).sqrt() * v_h;

    let h = vec3(roughness * n_h.x, roughness * n_h.y, 0.0f32.max(n_h.z))
        .normalize();

    (h.x * t + h.y * b + h.z * n).normalize()
}
