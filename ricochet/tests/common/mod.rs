#![allow(dead_code)]

use glam::{uvec2, vec2, vec3, UVec2, Vec2, Vec3, Vec4};
use ricochet::gpu::{
    BounceRay, DirectLighting, EnvironmentMap, HitResult, LightContribution,
    LightingQuery, MaterialId, MaterialLookup, PolygonLightMode,
    PrimarySurface, SunLighting, Tracer, TriangleRef, WhiteNoise,
};

pub const FLOOR: u32 = 1;
pub const CEILING: u32 = 2;

#[derive(Clone, Copy, Debug, Default)]
pub struct Material {
    pub base_color: Vec4,
    pub emissive: Vec3,
    pub metallic: f32,
    pub roughness: f32,
}

/// Scene that intersects rays by testing every triangle.
#[derive(Debug, Default)]
pub struct BruteForceScene {
    pub triangles: Vec<TriangleRef>,

    /// Indexed by [`MaterialId::index()`].
    pub materials: Vec<Material>,

    pub sky: Vec3,
    pub sun_disk: Vec3,

    /// Sun light reaching every point, regardless of its orientation.
    pub sun: Vec3,

    /// Direct light reaching every point, regardless of its orientation.
    pub direct: Vec3,
}

impl BruteForceScene {
    pub fn with_material(mut self, index: u32, material: Material) -> Self {
        let index = index as usize;

        if self.materials.len() <= index {
            self.materials.resize(index + 1, Material::default());
        }

        self.materials[index] = material;
        self
    }

    /// Adds a quad at given height, facing up or down; it's large enough for
    /// every ray shot from around the origin to hit it.
    pub fn with_quad(
        mut self,
        height: f32,
        facing_up: bool,
        material_id: MaterialId,
    ) -> Self {
        const EXTENT: f32 = 5000.0;

        let a = vec3(-EXTENT, height, -EXTENT);
        let b = vec3(-EXTENT, height, EXTENT);
        let c = vec3(EXTENT, height, -EXTENT);
        let d = vec3(EXTENT, height, EXTENT);

        let (tris, normal) = if facing_up {
            ([[a, b, c], [d, c, b]], Vec3::Y)
        } else {
            ([[a, c, b], [d, b, c]], -Vec3::Y)
        };

        for positions in tris {
            self.triangles.push(TriangleRef {
                positions,
                normals: [normal; 3],
                uvs: [Vec2::ZERO, vec2(1.0, 0.0), vec2(0.0, 1.0)],
                material_id,
                emissive_factor: 1.0,
                cluster: -1,
            });
        }

        self
    }

    fn material(&self, material_id: MaterialId) -> Material {
        self.materials
            .get(material_id.index() as usize)
            .copied()
            .unwrap_or_default()
    }
}

impl Tracer for BruteForceScene {
    fn trace(&self, ray: &BounceRay) -> HitResult {
        let mut closest = HitResult::none();

        for triangle in &self.triangles {
            let [p0, p1, p2] = triangle.positions;
            let e1 = p1 - p0;
            let e2 = p2 - p0;
            let pvec = ray.direction.cross(e2);
            let det = e1.dot(pvec);

            if det.abs() < 1e-8 {
                continue;
            }

            let inv_det = 1.0 / det;
            let tvec = ray.origin - p0;
            let u = tvec.dot(pvec) * inv_det;

            if !(0.0..=1.0).contains(&u) {
                continue;
            }

            let qvec = tvec.cross(e1);
            let v = ray.direction.dot(qvec) * inv_det;

            if v < 0.0 || u + v > 1.0 {
                continue;
            }

            let t = e2.dot(qvec) * inv_det;

            if t > ray.t_min && t < ray.t_max && t < closest.distance {
                closest = HitResult::new(t, vec2(u, v), *triangle);
            }
        }

        closest
    }
}

impl DirectLighting for BruteForceScene {
    fn evaluate(
        &self,
        _query: &LightingQuery,
        _polygon_lights: PolygonLightMode,
        _wnoise: &mut WhiteNoise,
    ) -> LightContribution {
        LightContribution::new(self.direct, Vec3::ZERO)
    }
}

impl SunLighting for BruteForceScene {
    fn evaluate(
        &self,
        _query: &LightingQuery,
        _wnoise: &mut WhiteNoise,
    ) -> LightContribution {
        LightContribution::new(self.sun, Vec3::ZERO)
    }
}

impl EnvironmentMap for BruteForceScene {
    fn sample(&self, _direction: Vec3, include_sun: bool) -> Vec3 {
        if include_sun {
            self.sky + self.sun_disk
        } else {
            self.sky
        }
    }
}

impl MaterialLookup for BruteForceScene {
    fn base_color(&self, material_id: MaterialId, _uv: Vec2) -> Vec4 {
        self.material(material_id).base_color
    }

    fn emissive(&self, material_id: MaterialId, _uv: Vec2) -> Vec3 {
        self.material(material_id).emissive
    }

    fn metallic_roughness(&self, material_id: MaterialId, _uv: Vec2) -> Vec2 {
        let material = self.material(material_id);

        vec2(material.metallic, material.roughness)
    }
}

/// Scene with a grey floor and nothing above it.
pub fn open_sky() -> BruteForceScene {
    BruteForceScene {
        sky: vec3(0.5, 0.7, 1.0),
        ..Default::default()
    }
    .with_material(
        FLOOR,
        Material {
            base_color: Vec4::new(0.8, 0.8, 0.8, 1.0),
            roughness: 0.5,
            ..Default::default()
        },
    )
    .with_quad(0.0, true, MaterialId::new(FLOOR))
}

/// Scene with a grey floor and a glowing ceiling.
pub fn closed_room() -> BruteForceScene {
    open_sky()
        .with_material(
            CEILING,
            Material {
                base_color: Vec4::new(0.5, 0.5, 0.5, 1.0),
                emissive: Vec3::splat(2.0),
                roughness: 1.0,
                ..Default::default()
            },
        )
        .with_quad(
            2.0,
            false,
            MaterialId::new(CEILING | MaterialId::FLAG_LIGHT),
        )
}

/// Returns primary surfaces of a camera looking down at the floor from
/// above; every pixel sees the floor.
pub fn floor_primaries(
    size: UVec2,
    metallic: f32,
    roughness: f32,
) -> Vec<PrimarySurface> {
    let camera = vec3(0.0, 5.0, 0.0);

    (0..size.y)
        .flat_map(|y| (0..size.x).map(move |x| uvec2(x, y)))
        .map(|pixel| {
            let position = vec3(
                pixel.x as f32 * 0.25 - size.x as f32 * 0.125,
                0.0,
                pixel.y as f32 * 0.25 - size.y as f32 * 0.125,
            );

            PrimarySurface {
                position,
                material_id: MaterialId::new(FLOOR),
                view_dir: (position - camera).normalize(),
                normal: Vec3::Y,
                geo_normal: Vec3::Y,
                base_color: Vec3::splat(0.8),
                specular_factor: 1.0,
                metallic,
                roughness,
            }
        })
        .collect()
}
