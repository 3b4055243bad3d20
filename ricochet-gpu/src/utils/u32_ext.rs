use glam::{vec4, Vec4};

pub trait U32Ext
where
    Self: Sized,
{
    fn from_bytes(bytes: [u32; 4]) -> Self;
    fn to_bytes(self) -> [u32; 4];

    /// Packs four values from `<0.0, 1.0>` into one byte each.
    fn from_unorm4x8(val: Vec4) -> Self;

    /// See: [`Self::from_unorm4x8()`].
    fn to_unorm4x8(self) -> Vec4;
}

impl U32Ext for u32 {
    fn from_bytes([a, b, c, d]: [u32; 4]) -> Self {
        (a & 0xff) | ((b & 0xff) << 8) | ((c & 0xff) << 16) | ((d & 0xff) << 24)
    }

    fn to_bytes(self) -> [u32; 4] {
        [
            self & 0xff,
            (self >> 8) & 0xff,
            (self >> 16) & 0xff,
            (self >> 24) & 0xff,
        ]
    }

    fn from_unorm4x8(val: Vec4) -> Self {
        let val = (val.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round().as_uvec4();

        Self::from_bytes([val.x, val.y, val.z, val.w])
    }

    fn to_unorm4x8(self) -> Vec4 {
        let [x, y, z, w] = self.to_bytes();

        vec4(x as f32, y as f32, z as f32, w as f32) / 255.0
    }
}
