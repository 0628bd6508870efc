use std::cmp::Ordering;

use glam::{Affine3A, Vec2, Vec3};

use crate::resources::geometry::BoundingBox;
use crate::scene::{Camera, NodeHandle, Scene};

const EPSILON: f32 = 1e-7;

/// Converts a pointer position in pixels (origin top-left, y down) into
/// normalized device coordinates.
///
/// Returns `None` for a degenerate viewport.
#[must_use]
pub fn pointer_to_ndc(pointer: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        pointer.x / viewport.x * 2.0 - 1.0,
        -(pointer.y / viewport.y) * 2.0 + 1.0,
    ))
}

/// A half-line in world space. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Re-expresses the ray in the space whose local-to-world matrix is
    /// `world`. The direction is left unnormalized, so ray parameters stay
    /// equal to world-space distances.
    fn to_local(self, world: &Affine3A) -> (Vec3, Vec3) {
        let inv = world.inverse();
        (inv.transform_point3(self.origin), inv.transform_vector3(self.direction))
    }
}

/// A ray hit against a mesh-bearing node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// World-space distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// The node whose mesh was hit.
    pub node: NodeHandle,
}

/// Casts rays into a scene.
#[derive(Debug, Clone, Copy)]
pub struct Raycaster {
    pub ray: Ray,
    pub near: f32,
    pub far: f32,
}

impl Raycaster {
    #[must_use]
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            near: 0.0,
            far: f32::INFINITY,
        }
    }

    /// Ray from the camera position through `ndc` on the image plane.
    ///
    /// The camera's matrices must be current.
    #[must_use]
    pub fn from_camera(ndc: Vec2, camera: &Camera) -> Option<Self> {
        let origin = camera.position();
        let target = camera.unproject(ndc.extend(0.5));
        Ray::new(origin, target - origin).map(Self::new)
    }

    /// Tests `objects` (and with `recursive`, all of their descendants) and
    /// returns every mesh hit, nearest first.
    ///
    /// World matrices are read as they are; update the scene first.
    #[must_use]
    pub fn intersect_objects(&self, scene: &Scene, objects: &[NodeHandle], recursive: bool) -> Vec<Intersection> {
        let mut hits = Vec::new();
        for &object in objects {
            if recursive {
                for handle in scene.collect_subtree(object) {
                    self.intersect_node(scene, handle, &mut hits);
                }
            } else {
                self.intersect_node(scene, object, &mut hits);
            }
        }
        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits
    }

    fn intersect_node(&self, scene: &Scene, handle: NodeHandle, hits: &mut Vec<Intersection>) {
        let Some(node) = scene.get_node(handle) else {
            return;
        };
        let Some(mesh) = node.mesh.and_then(|key| scene.meshes.get(key)) else {
            return;
        };

        let world = node.world_matrix();
        if world.matrix3.determinant().abs() < EPSILON {
            return;
        }
        let (origin, direction) = self.ray.to_local(world);

        if !ray_hits_box(origin, direction, mesh.geometry.bounding_box(), self.far) {
            return;
        }

        let nearest = mesh
            .geometry
            .triangles()
            .filter_map(|[a, b, c]| intersect_triangle(origin, direction, a, b, c))
            .filter(|&t| t >= self.near && t <= self.far)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        if let Some(distance) = nearest {
            hits.push(Intersection {
                distance,
                point: self.ray.at(distance),
                node: handle,
            });
        }
    }
}

/// Slab test against a local-space box.
fn ray_hits_box(origin: Vec3, direction: Vec3, bounds: &BoundingBox, far: f32) -> bool {
    if bounds.is_empty() {
        return false;
    }
    let inv = direction.recip();
    let t0 = (bounds.min - origin) * inv;
    let t1 = (bounds.max - origin) * inv;
    // NaN from 0 * inf is dropped by min/max
    let t_min = t0.min(t1).max_element();
    let t_max = t0.max(t1).min_element();
    t_max >= t_min.max(0.0) && t_min <= far
}

/// Double-sided Möller–Trumbore. Returns the ray parameter of the hit.
fn intersect_triangle(origin: Vec3, direction: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = det.recip();

    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// The node under `pointer`, if any.
///
/// Casts a ray through the pointer and tests every candidate together with
/// its mesh-bearing descendants; the nearest hit node wins. This is a pure
/// query: viewport size comes from the caller on every call.
#[must_use]
pub fn pick(pointer: Vec2, viewport: Vec2, camera: &Camera, scene: &Scene, candidates: &[NodeHandle]) -> Option<NodeHandle> {
    let ndc = pointer_to_ndc(pointer, viewport)?;
    let raycaster = Raycaster::from_camera(ndc, camera)?;
    raycaster
        .intersect_objects(scene, candidates, true)
        .first()
        .map(|hit| hit.node)
}
