use glam::{vec3, vec4, Vec3, Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{
    rgb_to_ycocg, ycocg_to_rgb, Accumulation, KernelConfig,
    RadianceContribution, SliceExt, Vec3Ext,
};

/// Factor specular radiance is multiplied by before it's stored.
pub const STORAGE_SCALE_SPECULAR: f32 = 32.0;

/// Factor diffuse radiance is multiplied by before it's stored.
pub const STORAGE_SCALE_DIFFUSE: f32 = 256.0;

/// RGB color with 9-bit mantissas and a shared 5-bit exponent.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Rgb9e5(pub u32);

impl Rgb9e5 {
    const MANTISSA_BITS: i32 = 9;
    const EXPONENT_BIAS: i32 = 15;
    const MAX_EXPONENT: i32 = 31;
    const MANTISSA_MASK: u32 = (1 << Self::MANTISSA_BITS) - 1;

    /// Largest representable channel value.
    pub const MAX: f32 = 65408.0;

    pub fn encode(color: Vec3) -> Self {
        let color = vec3(
            Self::sanitize(color.x),
            Self::sanitize(color.y),
            Self::sanitize(color.z),
        );

        let max = color.max_element();

        if max <= 0.0 {
            return Self(0);
        }

        // floor(log2(max)), read straight from the float's exponent
        let max_log2 = ((max.to_bits() >> 23) & 0xff) as i32 - 127;

        let mut exp = max_log2.max(-Self::EXPONENT_BIAS - 1)
            + 1
            + Self::EXPONENT_BIAS;

        let mut scale = Self::scale(exp);

        if (max / scale + 0.5).floor() as u32 > Self::MANTISSA_MASK {
            exp += 1;
            scale *= 2.0;
        }

        let exp = exp.clamp(0, Self::MAX_EXPONENT) as u32;
        let r = Self::quantize(color.x / scale);
        let g = Self::quantize(color.y / scale);
        let b = Self::quantize(color.z / scale);

        Self(r | (g << 9) | (b << 18) | (exp << 27))
    }

    pub fn decode(self) -> Vec3 {
        let scale = Self::scale((self.0 >> 27) as i32);

        vec3(
            (self.0 & Self::MANTISSA_MASK) as f32,
            ((self.0 >> 9) & Self::MANTISSA_MASK) as f32,
            ((self.0 >> 18) & Self::MANTISSA_MASK) as f32,
        ) * scale
    }

    fn sanitize(val: f32) -> f32 {
        // Also catches NaNs
        if val > 0.0 {
            val.min(Self::MAX)
        } else {
            0.0
        }
    }

    fn quantize(val: f32) -> u32 {
        ((val + 0.5).floor() as u32).min(Self::MANTISSA_MASK)
    }

    fn scale(exp: i32) -> f32 {
        ((exp - Self::EXPONENT_BIAS - Self::MANTISSA_BITS) as f32).exp2()
    }
}

/// Diffuse radiance projected onto the first two bands of spherical
/// harmonics.
///
/// Luminance gets all four coefficients while chroma (YCoCg) is kept
/// undirected.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct DiffuseSh {
    /// x, y, z - L1 coefficients of luminance
    /// w - L0 coefficient of luminance
    pub sh_y: Vec4,

    /// x - Co
    /// y - Cg
    pub co_cg: Vec4,
}

impl DiffuseSh {
    pub const L0: f32 = 0.282095;
    pub const L1: f32 = 0.488603;

    pub fn read(buffer: &[Vec4], id: usize) -> Self {
        Self {
            sh_y: *buffer.at(2 * id),
            co_cg: *buffer.at(2 * id + 1),
        }
    }

    pub fn write(self, buffer: &mut [Vec4], id: usize) {
        *buffer.at_mut(2 * id) = self.sh_y;
        *buffer.at_mut(2 * id + 1) = self.co_cg;
    }

    pub fn add(
        &mut self,
        color: Vec3,
        direction: Vec3,
        accumulation: Accumulation,
    ) {
        let ycocg = rgb_to_ycocg(color);
        let y = ycocg.x;

        match accumulation {
            Accumulation::Constant => {
                self.sh_y.w += y * Self::L0;
            }

            Accumulation::Directional => {
                self.sh_y += y * (direction * Self::L1).extend(Self::L0);
            }
        }

        self.co_cg += vec4(ycocg.y, ycocg.z, 0.0, 0.0);
    }

    /// Returns the accumulated color, disregarding its direction.
    pub fn color(&self) -> Vec3 {
        ycocg_to_rgb(vec3(self.sh_y.w / Self::L0, self.co_cg.x, self.co_cg.y))
    }

    /// Returns the luminance-weighted average direction light came from;
    /// zero if nothing directional was accumulated.
    pub fn dominant_direction(&self) -> Vec3 {
        self.sh_y.xyz().normalize_or_zero()
    }
}

/// Folds bounce radiance into per-pixel accumulators.
#[derive(Clone, Copy)]
pub struct AccumulatorWriter<'a> {
    config: &'a KernelConfig,
}

impl<'a> AccumulatorWriter<'a> {
    pub fn new(config: &'a KernelConfig) -> Self {
        Self { config }
    }

    /// Adds given contribution into the pixel's diffuse or specular
    /// accumulator; returns whether anything has been written.
    pub fn write(
        self,
        contribution: &RadianceContribution,
        diffuse: &mut [Vec4],
        specular: &mut [u32],
        id: usize,
    ) -> bool {
        if !contribution.radiance.is_sane()
            || !contribution.direction.is_sane()
            || contribution.radiance == Vec3::ZERO
        {
            return false;
        }

        if contribution.is_specular {
            let slot = specular.at_mut(id);

            let value = Rgb9e5(*slot).decode()
                + contribution.radiance * STORAGE_SCALE_SPECULAR;

            *slot = Rgb9e5::encode(value).0;
        } else {
            let mut sh = DiffuseSh::read(diffuse, id);

            sh.add(
                contribution.radiance * STORAGE_SCALE_DIFFUSE,
                contribution.direction,
                self.config.accumulation(),
            );

            sh.write(diffuse, id);
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn assert_rgb9e5_round_trip(color: Vec3) {
        let actual = Rgb9e5::encode(color).decode();

        // Each channel gets the precision of the largest one
        let tolerance = color.max_element() / 512.0 + f32::EPSILON;

        assert!(
            (actual - color).abs().max_element() <= tolerance,
            "{color:?} -> {actual:?}"
        );
    }

    #[test]
    fn rgb9e5() {
        assert_eq!(Rgb9e5(0), Rgb9e5::encode(Vec3::ZERO));
        assert_eq!(Vec3::ZERO, Rgb9e5(0).decode());
        assert_eq!(Vec3::ONE, Rgb9e5::encode(Vec3::ONE).decode());

        assert_rgb9e5_round_trip(vec3(1000.0, 0.001, 50.0));
        assert_rgb9e5_round_trip(vec3(0.25, 0.5, 0.75));
        assert_rgb9e5_round_trip(vec3(0.003, 0.002, 0.001));
        assert_rgb9e5_round_trip(vec3(511.9, 0.0, 0.0));
        assert_rgb9e5_round_trip(vec3(60000.0, 1.0, 2.0));
    }

    #[test]
    fn rgb9e5_clamps() {
        assert_eq!(Vec3::ZERO, Rgb9e5::encode(Vec3::splat(-1.0)).decode());
        assert_eq!(Vec3::ZERO, Rgb9e5::encode(Vec3::splat(f32::NAN)).decode());
        assert_eq!(
            Vec3::splat(Rgb9e5::MAX),
            Rgb9e5::encode(Vec3::splat(1e10)).decode()
        );
    }

    #[test]
    fn diffuse_sh() {
        for accumulation in [Accumulation::Constant, Accumulation::Directional]
        {
            for color in [
                Vec3::ZERO,
                Vec3::ONE,
                vec3(1000.0, 0.001, 50.0),
                vec3(0.1, 0.7, 0.3),
            ] {
                let mut sh = DiffuseSh::default();

                sh.add(color, Vec3::Y, accumulation);

                let actual = sh.color();

                assert_relative_eq!(actual.x, color.x, epsilon = 0.001);
                assert_relative_eq!(actual.y, color.y, epsilon = 0.001);
                assert_relative_eq!(actual.z, color.z, epsilon = 0.001);
            }
        }
    }

    #[test]
    fn diffuse_sh_direction() {
        let mut sh = DiffuseSh::default();

        sh.add(Vec3::ONE, Vec3::X, Accumulation::Directional);
        sh.add(Vec3::ONE, Vec3::Y, Accumulation::Directional);

        let dir = sh.dominant_direction();

        assert_relative_eq!(dir.x, 0.7071, epsilon = 0.001);
        assert_relative_eq!(dir.y, 0.7071, epsilon = 0.001);

        let mut sh = DiffuseSh::default();

        sh.add(Vec3::ONE, Vec3::X, Accumulation::Constant);

        assert_eq!(Vec3::ZERO, sh.dominant_direction());
    }

    fn contribution(radiance: Vec3, is_specular: bool) -> RadianceContribution {
        RadianceContribution {
            radiance,
            is_specular,
            direction: Vec3::Y,
        }
    }

    #[test]
    fn writer_routes_channels() {
        let config = KernelConfig::default();
        let writer = AccumulatorWriter::new(&config);
        let mut diffuse = vec![Vec4::ZERO; 4];
        let mut specular = vec![0; 2];

        assert!(writer.write(
            &contribution(Vec3::ONE, true),
            &mut diffuse,
            &mut specular,
            1,
        ));

        assert!(diffuse.iter().all(|d| *d == Vec4::ZERO));
        assert_eq!(0, specular[0]);

        assert_relative_eq!(
            Rgb9e5(specular[1]).decode().x,
            STORAGE_SCALE_SPECULAR
        );

        assert!(writer.write(
            &contribution(Vec3::ONE, false),
            &mut diffuse,
            &mut specular,
            1,
        ));

        let color = DiffuseSh::read(&diffuse, 1).color() / STORAGE_SCALE_DIFFUSE;

        assert_relative_eq!(color.x, 1.0, epsilon = 0.0001);
        assert_eq!(Vec4::ZERO, diffuse[0]);
        assert_eq!(Vec4::ZERO, diffuse[1]);
    }

    #[test]
    fn writer_accumulates() {
        let config = KernelConfig::default();
        let writer = AccumulatorWriter::new(&config);
        let mut diffuse = vec![Vec4::ZERO; 2];
        let mut specular = vec![0; 1];

        for _ in 0..4 {
            writer.write(
                &contribution(Vec3::splat(0.25), true),
                &mut diffuse,
                &mut specular,
                0,
            );

            writer.write(
                &contribution(Vec3::splat(0.25), false),
                &mut diffuse,
                &mut specular,
                0,
            );
        }

        assert_relative_eq!(
            Rgb9e5(specular[0]).decode().y / STORAGE_SCALE_SPECULAR,
            1.0,
            epsilon = 0.01
        );

        assert_relative_eq!(
            DiffuseSh::read(&diffuse, 0).color().y / STORAGE_SCALE_DIFFUSE,
            1.0,
            epsilon = 0.0001
        );
    }

    #[test]
    fn writer_ignores_zero_and_insane_contributions() {
        let config = KernelConfig::default();
        let writer = AccumulatorWriter::new(&config);
        let mut diffuse = vec![vec4(1.0, 2.0, 3.0, 4.0), vec4(5.0, 6.0, 0.0, 0.0)];
        let mut specular = vec![Rgb9e5::encode(Vec3::splat(3.0)).0];
        let diffuse0 = diffuse.clone();
        let specular0 = specular.clone();

        for is_specular in [false, true] {
            for radiance in [
                Vec3::ZERO,
                vec3(f32::NAN, 1.0, 1.0),
                vec3(1.0, f32::INFINITY, 1.0),
            ] {
                assert!(!writer.write(
                    &contribution(radiance, is_specular),
                    &mut diffuse,
                    &mut specular,
                    0,
                ));
            }

            assert!(!writer.write(
                &RadianceContribution {
                    radiance: Vec3::ONE,
                    is_specular,
                    direction: vec3(f32::NAN, 0.0, 0.0),
                },
                &mut diffuse,
                &mut specular,
                0,
            ));
        }

        assert_eq!(
            bytemuck::cast_slice::<_, u32>(&diffuse0),
            bytemuck::cast_slice::<_, u32>(&diffuse)
        );

        assert_eq!(specular0, specular);
    }
}
