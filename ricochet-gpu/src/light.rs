use glam::Vec3;
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{MaterialId, TriangleRef, RICOCHET_EPSILON};

/// Point at which external light evaluators are queried.
#[derive(Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct LightingQuery {
    pub position: Vec3,
    pub normal: Vec3,
    pub geo_normal: Vec3,

    /// Points from the queried point towards the viewer (i.e. the previous
    /// path vertex).
    pub view: Vec3,

    /// Visibility cluster of the queried point; negative if unknown.
    pub cluster: i32,

    pub material_id: MaterialId,
    pub base_color: Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub specular_factor: f32,
    pub cull_mask: u32,
}

/// Light arriving at a point, already multiplied by the BRDF.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct LightContribution {
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightContribution {
    pub fn new(diffuse: Vec3, specular: Vec3) -> Self {
        Self { diffuse, specular }
    }
}

/// Returns the solid angle subtended by a triangle, as seen from `origin`.
///
/// Thanks to:
///
/// - https://en.wikipedia.org/wiki/Solid_angle#Tetrahedron
///   (Van Oosterom & Strackee)
pub fn triangle_solid_angle(origin: Vec3, positions: [Vec3; 3]) -> f32 {
    let a = (positions[0] - origin).normalize_or_zero();
    let b = (positions[1] - origin).normalize_or_zero();
    let c = (positions[2] - origin).normalize_or_zero();

    let numerator = a.dot(b.cross(c)).abs();
    let denominator = 1.0 + a.dot(b) + b.dot(c) + c.dot(a);

    // Both zero happens for degenerate triangles or for origins lying on the
    // triangle's plane
    if numerator <= 0.0 {
        return 0.0;
    }

    2.0 * numerator.atan2(denominator)
}

/// Returns the probability density (per solid angle) with which the direct
/// lighting pass would've picked a direction towards given light polygon.
///
/// `selection_pdf` is the probability of choosing this particular polygon;
/// the point on the polygon is assumed to be chosen uniformly over its
/// solid angle.
pub fn polygon_light_pdf(
    origin: Vec3,
    triangle: &TriangleRef,
    selection_pdf: f32,
) -> f32 {
    let solid_angle = triangle_solid_angle(origin, triangle.positions);

    if solid_angle <= RICOCHET_EPSILON {
        0.0
    } else {
        selection_pdf.max(0.0) / solid_angle
    }
}

/// Weight of the bounce estimator when combined with the light estimator.
pub fn balance_heuristic(bounce_pdf: f32, light_pdf: f32) -> f32 {
    let sum = bounce_pdf + light_pdf;

    if sum <= 0.0 {
        0.0
    } else {
        bounce_pdf / sum
    }
}

/// Combines the share the direct lighting pass left for bounce rays
/// (`1.0 - direct_specular_weight`) with the share assigned to bounce rays
/// through `mis` within the part both passes cover.
pub fn specular_light_weight(direct_specular_weight: f32, mis: f32) -> f32 {
    let dsw = direct_specular_weight.clamp(0.0, 1.0);

    (1.0 - dsw) + dsw * mis.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use core::f32::consts::PI;

    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    #[test]
    fn solid_angle_of_octant() {
        let angle = triangle_solid_angle(
            Vec3::ZERO,
            [vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), vec3(0.0, 0.0, 1.0)],
        );

        assert_relative_eq!(angle, 4.0 * PI / 8.0, epsilon = 0.0001);
    }

    #[test]
    fn solid_angle_of_far_triangle() {
        // Small triangle of area 0.005, 10 units away, facing the origin
        let angle = triangle_solid_angle(
            Vec3::ZERO,
            [
                vec3(0.0, 0.0, 10.0),
                vec3(0.1, 0.0, 10.0),
                vec3(0.0, 0.1, 10.0),
            ],
        );

        assert_relative_eq!(angle, 0.005 / 100.0, epsilon = 0.000001);
    }

    #[test]
    fn solid_angle_of_edge_on_triangle() {
        let angle = triangle_solid_angle(
            Vec3::ZERO,
            [vec3(1.0, 0.0, 0.0), vec3(2.0, 0.0, 0.0), vec3(1.0, 1.0, 0.0)],
        );

        assert_eq!(0.0, angle);
    }

    #[test]
    fn light_pdf() {
        let triangle = TriangleRef {
            positions: [
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
                vec3(0.0, 0.0, 1.0),
            ],
            ..Default::default()
        };

        assert_relative_eq!(
            polygon_light_pdf(Vec3::ZERO, &triangle, 0.5),
            0.5 / (PI / 2.0),
            epsilon = 0.0001
        );

        let degenerate = TriangleRef::default();

        assert_eq!(0.0, polygon_light_pdf(Vec3::ZERO, &degenerate, 0.5));
    }

    #[test]
    fn weights() {
        assert_eq!(0.0, balance_heuristic(0.0, 0.0));
        assert_eq!(1.0, balance_heuristic(2.0, 0.0));
        assert_relative_eq!(balance_heuristic(1.0, 3.0), 0.25);

        assert_eq!(1.0, specular_light_weight(0.0, 0.0));
        assert_eq!(0.0, specular_light_weight(1.0, 0.0));
        assert_relative_eq!(specular_light_weight(0.5, 0.5), 0.75);
    }
}
