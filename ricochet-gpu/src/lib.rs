//! Common structs, algorithms etc. used by Ricochet's indirect lighting kernel
//! and its host.

#![cfg_attr(target_arch = "spirv", no_std)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::too_many_arguments)]

mod accumulator;
mod brdf;
mod config;
mod hit;
mod kernel;
mod light;
mod lobe;
mod material;
mod noise;
mod normal;
mod passes;
mod ray;
mod scene;
mod shading;
mod surface;
#[cfg(test)]
mod testing;
mod utils;

pub use self::accumulator::*;
pub use self::brdf::*;
pub use self::config::*;
pub use self::hit::*;
pub use self::kernel::*;
pub use self::light::*;
pub use self::lobe::*;
pub use self::material::*;
pub use self::noise::*;
pub use self::normal::*;
pub use self::passes::*;
pub use self::ray::*;
pub use self::scene::*;
pub use self::shading::*;
pub use self::surface::*;
pub use self::utils::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::*;
    #[cfg(target_arch = "spirv")]
    pub use spirv_std::num_traits::Float;

    pub use crate::*;
}

/// Smallest value we divide by; keeps reciprocals of cosines, pdfs and
/// reflectivities finite.
pub const RICOCHET_EPSILON: f32 = 0.0001;
