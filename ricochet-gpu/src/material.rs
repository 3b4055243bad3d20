use glam::{Vec2, Vec2Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

/// Identifier of a material, along with its kind and flags.
///
/// Layout:
///
/// - bits 0..16 - index into the material table,
/// - bits 20..24 - kind (see `Self::KIND_*`; other values behave as regular),
/// - bits 24..28 - flags (see `Self::FLAG_*`).
///
/// Zero means "no surface".
#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct MaterialId(u32);

impl MaterialId {
    pub const INDEX_MASK: u32 = 0x0000_ffff;
    pub const KIND_MASK: u32 = 0x00f0_0000;
    pub const KIND_SHIFT: u32 = 20;

    pub const KIND_REGULAR: u32 = 0;
    pub const KIND_SKY: u32 = 1;
    pub const KIND_LAVA: u32 = 2;

    /// Surface is an emissive polygon registered with the analytic light
    /// sampler.
    pub const FLAG_LIGHT: u32 = 1 << 24;

    /// Surface belongs to the viewer's weapon.
    pub const FLAG_WEAPON: u32 = 1 << 25;

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn with_kind(index: u32, kind: u32) -> Self {
        Self((index & Self::INDEX_MASK) | (kind << Self::KIND_SHIFT))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn index(self) -> u32 {
        self.0 & Self::INDEX_MASK
    }

    pub fn kind(self) -> u32 {
        (self.0 & Self::KIND_MASK) >> Self::KIND_SHIFT
    }

    pub fn with_flags(self, flags: u32) -> Self {
        Self(self.0 | flags)
    }

    pub fn is_some(self) -> bool {
        self.0 != 0
    }

    pub fn is_none(self) -> bool {
        !self.is_some()
    }

    pub fn is_sky(self) -> bool {
        self.kind() == Self::KIND_SKY
    }

    pub fn is_lava(self) -> bool {
        self.kind() == Self::KIND_LAVA
    }

    pub fn is_light(self) -> bool {
        self.0 & Self::FLAG_LIGHT > 0
    }

    pub fn is_weapon(self) -> bool {
        self.0 & Self::FLAG_WEAPON > 0
    }

    /// Returns whether surfaces of this material light themselves up.
    ///
    /// Such surfaces would count their own light twice if they gathered
    /// indirect light, so they are skipped.
    pub fn is_self_illuminating(self) -> bool {
        self.is_lava()
    }
}

/// Distorts texture coordinates the way animated lava surfaces wobble.
pub fn lava_uv_warp(uv: Vec2, time: f32) -> Vec2 {
    const RANGE: f32 = 0.0625;
    const PERIOD: f32 = 4.0;

    let phase = uv.yx() * PERIOD + Vec2::splat(time);

    uv + RANGE * Vec2::new(phase.x.sin(), phase.y.sin())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec2;

    use super::*;

    #[test]
    fn layout() {
        let id = MaterialId::with_kind(1234, MaterialId::KIND_LAVA)
            .with_flags(MaterialId::FLAG_LIGHT);

        assert_eq!(1234, id.index());
        assert_eq!(MaterialId::KIND_LAVA, id.kind());
        assert!(id.is_lava());
        assert!(id.is_light());
        assert!(!id.is_weapon());
        assert!(!id.is_sky());
        assert!(id.is_self_illuminating());
        assert!(MaterialId::new(0).is_none());
    }

    #[test]
    fn lava_warp_is_bounded() {
        for (uv, time) in [(vec2(0.0, 0.0), 0.0), (vec2(3.5, -1.25), 17.0)] {
            let warped = lava_uv_warp(uv, time);

            assert!((warped - uv).abs().max_element() <= 0.0625 + 0.0001);
        }

        assert_relative_eq!(
            lava_uv_warp(vec2(0.0, 0.0), 0.0).x,
            0.0,
            epsilon = 0.0001
        );
    }
}
