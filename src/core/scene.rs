// 3D selection scene - ray casting from a pointing fingertip and selected-object animation

use crate::models::scene::{Intersection, Light, NdcPoint, PerspectiveCamera, Ray, SceneObject};
use nalgebra::{Perspective3, Point3, Vector3};
use tracing::debug;

/// Rotation added to the selected object on every render tick (radians)
pub const SELECTED_SPIN_PER_TICK: f32 = 0.01;
/// Angular speed of the bounce, per millisecond of wall-clock time
pub const BOUNCE_RATE_PER_MS: f64 = 0.002;
pub const BOUNCE_AMPLITUDE: f32 = 0.5;

const OBJECT_SCALE: f32 = 0.5;
const OBJECT_BASE_RADIUS: f32 = 1.0;
const OBJECT_DEPTH: f32 = -5.0;

// ==============================================================================
// Ray Casting
// ==============================================================================

pub struct Raycaster;

impl Raycaster {
    /// Ray from the camera through a point given in normalized device coordinates
    pub fn from_camera(camera: &PerspectiveCamera, ndc: NdcPoint) -> Ray {
        let projection = Perspective3::new(
            camera.aspect,
            camera.fov_deg.to_radians(),
            camera.near,
            camera.far,
        );
        let near = projection.unproject_point(&Point3::new(ndc.x, ndc.y, -1.0));
        let far = projection.unproject_point(&Point3::new(ndc.x, ndc.y, 1.0));

        Ray {
            origin: camera.position,
            direction: (far - near).normalize(),
        }
    }

    /// Distance along `ray` to the first hit on a sphere, if any
    pub fn intersect_sphere(ray: &Ray, center: &Point3<f32>, radius: f32) -> Option<f32> {
        let oc: Vector3<f32> = ray.origin - *center;
        let b = oc.dot(&ray.direction);
        let c = oc.dot(&oc) - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        // Origin inside the sphere
        let far = -b + root;
        (far >= 0.0).then_some(far)
    }

    /// All hits, nearest first
    pub fn intersect_objects(ray: &Ray, objects: &[SceneObject]) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = objects
            .iter()
            .filter_map(|object| {
                Self::intersect_sphere(ray, &object.position, object.bound_radius()).map(|distance| {
                    Intersection {
                        object_id: object.id,
                        distance,
                        point: ray.origin + ray.direction * distance,
                    }
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

// ==============================================================================
// Scene
// ==============================================================================

pub struct Scene {
    pub camera: PerspectiveCamera,
    pub lights: Vec<Light>,
    objects: Vec<SceneObject>,
    selected: Option<usize>,
}

impl Scene {
    /// Empty scene for a viewport of `width` x `height` pixels
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = PerspectiveCamera::new(75.0, width as f32 / height.max(1) as f32, 0.1, 1000.0);
        camera.position = Point3::new(0.0, 0.0, 5.0);

        let lights = vec![
            Light::Ambient { color: 0x404040 },
            Light::Directional {
                color: 0xffffff,
                intensity: 0.5,
                direction: Vector3::new(1.0, 1.0, 1.0).normalize(),
            },
        ];

        Self {
            camera,
            lights,
            objects: Vec::new(),
            selected: None,
        }
    }

    /// Place an object for the asset in list position `slot`
    pub fn add_object(&mut self, slot: usize, source: &str, asset_bytes: usize) -> usize {
        let id = self.objects.len();
        let name = source
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(source)
            .to_string();

        self.objects.push(SceneObject {
            id,
            name,
            source: source.to_string(),
            position: Point3::new(slot as f32 * 2.0 - 2.0, 0.0, OBJECT_DEPTH),
            rotation: Vector3::zeros(),
            scale: OBJECT_SCALE,
            base_radius: OBJECT_BASE_RADIUS,
            asset_bytes,
        });
        id
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn selected(&self) -> Option<&SceneObject> {
        self.selected.and_then(|id| self.objects.get(id))
    }

    /// Select the nearest object under `ndc`, or clear the selection on a miss
    pub fn pick(&mut self, ndc: NdcPoint) -> Option<usize> {
        let ray = Raycaster::from_camera(&self.camera, ndc);
        let hit = Raycaster::intersect_objects(&ray, &self.objects).first().copied();

        self.selected = hit.map(|h| h.object_id);
        if let Some(hit) = hit {
            debug!("Selected object {} at distance {:.2}", hit.object_id, hit.distance);
        }
        self.selected
    }

    /// Advance the selected object's animation for one render tick
    pub fn animate(&mut self, now_ms: i64, bounce: bool) {
        let Some(object) = self.selected.and_then(|id| self.objects.get_mut(id)) else {
            return;
        };

        object.rotation.y += SELECTED_SPIN_PER_TICK;
        if bounce {
            object.position.y = ((now_ms as f64 * BOUNCE_RATE_PER_MS).sin() as f32) * BOUNCE_AMPLITUDE;
        }
    }
}
