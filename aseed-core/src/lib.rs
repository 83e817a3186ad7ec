//! aseed core library - scene to appleseed project conversion
//!
//! This library provides the stateless core functionality for exporting an
//! in-memory 3D scene (camera, mesh objects, world transforms) to an
//! appleseed project file plus one Wavefront OBJ file per mesh object.
//!
//! Host integration (menus, file dialogs, scene-graph bindings) lives
//! outside this crate; callers construct a [`Scene`] and hand it to
//! [`project::export`].

pub mod document;
pub mod error;
pub mod obj;
pub mod project;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use error::ExportError;
pub use project::export;
pub use scene::{Camera, MeshObject, Object, Scene};

/// Generator tag written into the header of every output file.
pub const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));
