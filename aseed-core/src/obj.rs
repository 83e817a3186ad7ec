//! Wavefront OBJ mesh serialization

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::ExportError;
use crate::scene::MeshObject;
use crate::transform;

/// Write one mesh object to `path` in Wavefront OBJ form.
///
/// Vertex positions are converted from the host's Z-up axes to the
/// renderer's Y-up axes. Face indices are 0-based in the scene data and
/// emitted 1-based per the OBJ convention, preserving per-face vertex
/// ordering (winding must not change).
pub fn write_mesh_object(mesh: &MeshObject, path: &Path) -> Result<(), ExportError> {
    write_impl(mesh, path).map_err(|source| ExportError::io(path, source))
}

fn write_impl(mesh: &MeshObject, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    writeln!(writer, "# File generated by {}.", crate::GENERATOR)?;

    writeln!(writer, "# {} vertices.", mesh.vertices.len())?;
    for vertex in &mesh.vertices {
        let v = transform::to_renderer(vertex.coords);
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }

    writeln!(writer, "# {} faces.", mesh.faces.len())?;
    for face in &mesh.faces {
        write!(writer, "f")?;
        for index in face {
            write!(writer, " {}", index + 1)?;
        }
        writeln!(writer)?;
    }

    writer.flush()
}
