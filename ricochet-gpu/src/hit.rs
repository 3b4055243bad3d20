use glam::{vec3, Vec2, Vec3};

use crate::{MaterialId, Normal};

/// Triangle reported by the intersection service.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct TriangleRef {
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
    pub uvs: [Vec2; 3],
    pub material_id: MaterialId,

    /// Multiplier for the material's emissive texture.
    pub emissive_factor: f32,

    /// Visibility cluster the triangle lives in; negative if unknown.
    pub cluster: i32,
}

impl TriangleRef {
    /// Returns the normal of triangle's plane, following the winding order.
    pub fn plane_normal(&self) -> Vec3 {
        let [p0, p1, p2] = self.positions;

        (p1 - p0).cross(p2 - p0).normalize_or_zero()
    }
}

/// Result of tracing a [`crate::BounceRay`].
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct HitResult {
    /// Distance along the ray; `f32::MAX` for misses.
    pub distance: f32,

    /// Weights of the second and third vertex; the first one's is implied.
    pub barycentrics: Vec2,

    pub triangle: TriangleRef,
}

impl HitResult {
    pub fn none() -> Self {
        Self {
            distance: f32::MAX,
            barycentrics: Default::default(),
            triangle: Default::default(),
        }
    }

    pub fn new(distance: f32, barycentrics: Vec2, triangle: TriangleRef) -> Self {
        Self {
            distance,
            barycentrics,
            triangle,
        }
    }

    pub fn is_some(&self) -> bool {
        self.distance < f32::MAX
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    pub fn material_id(&self) -> MaterialId {
        self.triangle.material_id
    }

    /// Returns all three barycentric weights; they sum up to one.
    pub fn weights(&self) -> Vec3 {
        let Vec2 { x: u, y: v } = self.barycentrics;

        vec3(1.0 - u - v, u, v)
    }

    pub fn point(&self) -> Vec3 {
        let w = self.weights();
        let [p0, p1, p2] = self.triangle.positions;

        p0 * w.x + p1 * w.y + p2 * w.z
    }

    pub fn uv(&self) -> Vec2 {
        let w = self.weights();
        let [t0, t1, t2] = self.triangle.uvs;

        t0 * w.x + t1 * w.y + t2 * w.z
    }

    /// Returns the geometric normal, flipped to face the incoming ray.
    pub fn geo_normal(&self, ray_direction: Vec3) -> Vec3 {
        Normal::face_forward(self.triangle.plane_normal(), ray_direction)
    }

    /// Returns the interpolated shading normal, flipped to the same side as
    /// the geometric normal.
    pub fn normal(&self, ray_direction: Vec3) -> Vec3 {
        let w = self.weights();
        let [n0, n1, n2] = self.triangle.normals;
        let geo_normal = self.geo_normal(ray_direction);

        let normal = (n0 * w.x + n1 * w.y + n2 * w.z).normalize_or_zero();

        if normal == Vec3::ZERO {
            geo_normal
        } else if normal.dot(geo_normal) < 0.0 {
            -normal
        } else {
            normal
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec2;

    use super::*;

    fn triangle() -> TriangleRef {
        TriangleRef {
            positions: [
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 0.0, 1.0),
            ],
            normals: [Vec3::NEG_Y; 3],
            uvs: [vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0)],
            material_id: MaterialId::new(1),
            emissive_factor: 1.0,
            cluster: -1,
        }
    }

    #[test]
    fn interpolation() {
        let hit = HitResult::new(5.0, vec2(0.25, 0.5), triangle());

        assert!(hit.is_some());
        assert_relative_eq!(hit.weights().dot(Vec3::ONE), 1.0);

        let point = hit.point();

        assert_relative_eq!(point.x, 0.25);
        assert_relative_eq!(point.z, 0.5);

        let uv = hit.uv();

        assert_relative_eq!(uv.x, 0.25);
        assert_relative_eq!(uv.y, 0.5);
    }

    #[test]
    fn normals_face_the_ray() {
        let hit = HitResult::new(1.0, vec2(0.2, 0.2), triangle());
        let dir = vec3(0.0, -1.0, 0.0);

        assert_eq!(Vec3::Y, hit.geo_normal(dir));
        assert_eq!(Vec3::Y, hit.normal(dir));
        assert_eq!(Vec3::NEG_Y, hit.geo_normal(-dir));
    }

    #[test]
    fn none() {
        assert!(HitResult::none().is_none());
    }
}
