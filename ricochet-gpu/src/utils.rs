mod f32_ext;
mod slice_ext;
mod u32_ext;
mod vec3_ext;

use core::ops;

use glam::{vec3, UVec2, Vec3};

pub use self::f32_ext::*;
pub use self::slice_ext::*;
pub use self::u32_ext::*;
pub use self::vec3_ext::*;

pub fn lerp<T>(a: T, b: T, t: f32) -> T
where
    T: ops::Add<Output = T>,
    T: ops::Sub<Output = T>,
    T: ops::Mul<f32, Output = T>,
    T: Copy,
{
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Hermite interpolation between `edge0` and `edge1`, clamped to `<0.0, 1.0>`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).saturate();

    t * t * (3.0 - 2.0 * t)
}

pub fn rgb_to_ycocg(val: Vec3) -> Vec3 {
    let co = val.x - val.z;
    let tmp = val.z + co / 2.0;
    let cg = val.y - tmp;
    let y = tmp + cg / 2.0;

    vec3(y, co, cg)
}

pub fn ycocg_to_rgb(val: Vec3) -> Vec3 {
    let tmp = val.x - val.z / 2.0;
    let g = val.z + tmp;
    let b = tmp - val.y / 2.0;
    let r = b + val.y;

    vec3(r, g, b)
}

/// Maps a half-width dispatch id into the full-width pixel it shades on given
/// frame; alternating rows and frames cover the whole screen.
pub fn resolve_checkerboard(global_id: UVec2, frame: u32) -> UVec2 {
    let offset = (global_id.y + frame) & 1;

    UVec2::new(global_id.x * 2 + offset, global_id.y)
}
