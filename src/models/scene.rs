// Data models for the 3D selection scene

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

// ==============================================================================
// Scene Objects
// ==============================================================================

/// One selectable object placed in the scene
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: usize,
    pub name: String,
    /// Where the object's asset was loaded from
    pub source: String,
    pub position: Point3<f32>,
    /// Euler angles in radians
    pub rotation: Vector3<f32>,
    pub scale: f32,
    /// Bounding sphere radius before scaling
    pub base_radius: f32,
    /// Size of the fetched asset payload
    pub asset_bytes: usize,
}

impl SceneObject {
    /// Radius of the bounding sphere used for picking
    pub fn bound_radius(&self) -> f32 {
        self.base_radius * self.scale
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: u32,
    },
    Directional {
        color: u32,
        intensity: f32,
        direction: Vector3<f32>,
    },
}

/// Perspective camera looking down -Z from `position`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Point3<f32>,
}

impl PerspectiveCamera {
    pub fn new(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_deg,
            aspect,
            near,
            far,
            position: Point3::origin(),
        }
    }
}

// ==============================================================================
// Picking
// ==============================================================================

/// Ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    /// Unit length
    pub direction: Vector3<f32>,
}

/// A ray hit against a scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub object_id: usize,
    pub distance: f32,
    pub point: Point3<f32>,
}

/// Pointer position in normalized device coordinates, both axes in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NdcPoint {
    pub x: f32,
    pub y: f32,
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Failed to fetch asset {0}: {1}")]
    FetchFailed(String, String),

    #[error("Failed to read asset {0}: {1}")]
    ReadFailed(String, String),

    #[error("Asset {0} is empty")]
    EmptyAsset(String),
}

pub type SceneResult<T> = Result<T, SceneError>;
