//! Scene data model consumed by the exporter
//!
//! These types are a read-only snapshot of the host application's scene
//! graph. The host adapter fills them in; the exporter never mutates them.

use std::collections::HashMap;

use nalgebra::{Matrix4, Point3};

/// The active camera: a name, a focal length in millimeters (the host
/// expresses lens values in mm) and a world transform.
#[derive(Debug, Clone)]
pub struct Camera {
    pub name: String,
    pub focal_length_mm: f64,
    pub world: Matrix4<f64>,
}

impl Camera {
    pub fn new(name: impl Into<String>, focal_length_mm: f64, world: Matrix4<f64>) -> Self {
        Self {
            name: name.into(),
            focal_length_mm,
            world,
        }
    }
}

/// A mesh object: vertex positions in local space, polygonal faces as
/// 0-based indices into the vertex list, and a world transform.
///
/// Per-face vertex ordering determines winding and therefore normal
/// direction; it is preserved verbatim on export.
#[derive(Debug, Clone)]
pub struct MeshObject {
    pub name: String,
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<Vec<u32>>,
    pub world: Matrix4<f64>,
}

impl MeshObject {
    pub fn new(name: impl Into<String>, world: Matrix4<f64>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            faces: Vec::new(),
            world,
        }
    }

    pub fn push_vertex(&mut self, x: f64, y: f64, z: f64) {
        self.vertices.push(Point3::new(x, y, z));
    }

    pub fn push_face(&mut self, indices: &[u32]) {
        self.faces.push(indices.to_vec());
    }
}

/// A type-tagged scene object. Only mesh objects are exported; everything
/// else (lights, empties, curves, ...) is skipped.
#[derive(Debug, Clone)]
pub enum Object {
    Mesh(MeshObject),
    Other { name: String },
}

impl Object {
    pub fn name(&self) -> &str {
        match self {
            Object::Mesh(mesh) => &mesh.name,
            Object::Other { name } => name,
        }
    }
}

/// A complete scene: the active camera, the host-ordered object list and
/// the per-scene custom key/value properties.
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: Camera,
    pub objects: Vec<Object>,
    pub properties: HashMap<String, String>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            objects: Vec::new(),
            properties: HashMap::new(),
        }
    }

    pub fn add_mesh(&mut self, mesh: MeshObject) {
        self.objects.push(Object::Mesh(mesh));
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Look up a custom property, falling back to `default` when the host
    /// never set one.
    pub fn property_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.properties.get(key).map(String::as_str).unwrap_or(default)
    }
}
