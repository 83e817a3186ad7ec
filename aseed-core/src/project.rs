//! appleseed project emission
//!
//! Builds the project document as a typed tree and writes it to disk,
//! emitting one companion OBJ file per mesh object first so the document
//! never references geometry that is not on disk yet.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::{Matrix4, Vector3};

use crate::document::{Document, Element};
use crate::error::ExportError;
use crate::obj;
use crate::scene::{Camera, MeshObject, Object, Scene};
use crate::transform;

/// The host hardcodes a 32 mm film back; appleseed wants meters.
const FILM_WIDTH: f64 = 32.0 / 1000.0;
/// Placeholder aspect ratio.
// TODO: derive from the frame's resolution property instead of assuming 640x480.
const ASPECT_RATIO: f64 = 640.0 / 480.0;
const DEFAULT_RESOLUTION: &str = "640 480";
const DEFAULT_COLOR_SPACE: &str = "srgb";

/// Export a scene to an appleseed project file at `path`.
///
/// One Wavefront OBJ file named `<object_name>.obj` is written next to the
/// project file for every mesh object in the scene. The first I/O failure
/// aborts the export; files already written stay on disk.
pub fn export(scene: &Scene, path: &Path) -> Result<(), ExportError> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));

    // Geometry goes to disk before any reference to it is emitted.
    let mut meshes = Vec::new();
    for object in &scene.objects {
        match object {
            Object::Mesh(mesh) => {
                let filename = format!("{}.obj", mesh.name);
                obj::write_mesh_object(mesh, &dir.join(&filename))?;
                log::info!("wrote geometry file {filename}");
                meshes.push((mesh, filename));
            }
            Object::Other { name } => {
                log::debug!("skipping non-mesh object {name}");
            }
        }
    }

    let document = build_document(scene, &meshes);
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    document
        .write_to(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| ExportError::io(path, e))?;

    log::info!("wrote project file {}", path.display());
    Ok(())
}

fn build_document(scene: &Scene, meshes: &[(&MeshObject, String)]) -> Document {
    let project = Element::new("project")
        .child(scene_element(scene, meshes))
        .child(output_element(scene))
        .child(configurations_element());

    Document::new(project).comment(format!("File generated by {}.", crate::GENERATOR))
}

fn scene_element(scene: &Scene, meshes: &[(&MeshObject, String)]) -> Element {
    let mut assembly = Element::new("assembly").attribute("name", "assembly");
    for (mesh, filename) in meshes {
        assembly = assembly
            .child(object_element(mesh, filename))
            .child(instance_element(mesh));
    }

    Element::new("scene")
        .child(camera_element(&scene.camera))
        .child(assembly)
        .child(
            Element::new("assembly_instance")
                .attribute("name", "assembly_inst")
                .attribute("assembly", "assembly"),
        )
}

fn camera_element(camera: &Camera) -> Element {
    let view = transform::look_at(&camera.world);

    Element::new("camera")
        .attribute("name", &camera.name)
        .attribute("model", "pinhole_camera")
        .child(parameter("film_width", FILM_WIDTH))
        .child(parameter("aspect_ratio", ASPECT_RATIO))
        // The host expresses lens values in millimeters.
        .child(parameter("focal_length", camera.focal_length_mm / 1000.0))
        .child(
            Element::new("transform").child(
                Element::leaf("look_at")
                    .attribute("origin", triple(view.origin))
                    .attribute("target", triple(view.target))
                    .attribute("up", triple(view.up)),
            ),
        )
}

fn object_element(mesh: &MeshObject, filename: &str) -> Element {
    Element::new("object")
        .attribute("name", &mesh.name)
        .attribute("model", "mesh_object")
        .child(parameter("filename", filename))
}

fn instance_element(mesh: &MeshObject) -> Element {
    Element::new("object_instance")
        .attribute("name", format!("{}_inst", mesh.name))
        // appleseed names the single mesh inside the OBJ file "<name>.0".
        .attribute("object", format!("{}.0", mesh.name))
        .child(transform_element(&mesh.world))
}

fn transform_element(world: &Matrix4<f64>) -> Element {
    let mut matrix = Element::new("matrix");
    for row in transform::matrix_rows(world) {
        matrix = matrix.line(format!("{} {} {} {}", row[0], row[1], row[2], row[3]));
    }
    Element::new("transform").child(matrix)
}

fn output_element(scene: &Scene) -> Element {
    Element::new("output").child(
        Element::new("frame")
            .attribute("name", "beauty")
            .child(parameter("camera", &scene.camera.name))
            .child(parameter(
                "resolution",
                scene.property_or("resolution", DEFAULT_RESOLUTION),
            ))
            .child(parameter(
                "color_space",
                scene.property_or("color_space", DEFAULT_COLOR_SPACE),
            )),
    )
}

fn configurations_element() -> Element {
    Element::new("configurations")
        .child(configuration("final", "base_final"))
        .child(configuration("interactive", "base_interactive"))
}

fn configuration(name: &str, base: &str) -> Element {
    Element::new("configuration")
        .attribute("name", name)
        .attribute("base", base)
}

fn parameter(name: &str, value: impl ToString) -> Element {
    Element::leaf("parameter")
        .attribute("name", name)
        .attribute("value", value)
}

fn triple(v: Vector3<f64>) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_scene() -> Scene {
        let mut scene = Scene::new(Camera::new("camera", 50.0, Matrix4::identity()));
        let mut triangle = MeshObject::new("triangle", Matrix4::identity());
        triangle.push_vertex(0.0, 0.0, 0.0);
        triangle.push_vertex(1.0, 0.0, 0.0);
        triangle.push_vertex(0.0, 1.0, 0.0);
        triangle.push_face(&[0, 1, 2]);
        scene.add_mesh(triangle);
        scene
    }

    #[test]
    fn test_export_writes_both_artifacts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.appleseed");
        export(&test_scene(), &path).unwrap();

        let project = std::fs::read_to_string(&path).unwrap();
        assert!(project.contains("<camera name=\"camera\" model=\"pinhole_camera\">"));
        assert!(project.contains("<parameter name=\"focal_length\" value=\"0.05\" />"));
        assert!(project.contains("<object name=\"triangle\" model=\"mesh_object\">"));
        assert!(project.contains("<parameter name=\"filename\" value=\"triangle.obj\" />"));

        let geometry = std::fs::read_to_string(dir.path().join("triangle.obj")).unwrap();
        assert_eq!(geometry.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert!(geometry.lines().any(|l| l == "f 1 2 3"));
    }

    #[test]
    fn test_one_reference_and_one_instance_per_mesh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.appleseed");

        let mut scene = test_scene();
        let mut cube = MeshObject::new("cube", Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0)));
        cube.push_vertex(0.0, 0.0, 0.0);
        cube.push_face(&[0]);
        scene.add_mesh(cube);
        export(&scene, &path).unwrap();

        let project = std::fs::read_to_string(&path).unwrap();
        assert_eq!(project.matches("<object name=").count(), 2);
        assert_eq!(project.matches("<object_instance name=").count(), 2);
        assert!(project.contains("<object_instance name=\"cube_inst\" object=\"cube.0\">"));
        // Host enumeration order: triangle before cube.
        let triangle_at = project.find("<object name=\"triangle\"").unwrap();
        let cube_at = project.find("<object name=\"cube\"").unwrap();
        assert!(triangle_at < cube_at);
        assert!(dir.path().join("cube.obj").exists());
    }

    #[test]
    fn test_instance_carries_world_transform() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.appleseed");

        let mut scene = test_scene();
        if let Some(Object::Mesh(mesh)) = scene.objects.first_mut() {
            mesh.world = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        }
        export(&scene, &path).unwrap();

        let project = std::fs::read_to_string(&path).unwrap();
        assert!(project.contains("1 0 0 1"));
        assert!(project.contains("0 0 -1 3"));
        assert!(project.contains("0 1 0 -2"));
        assert!(project.contains("0 0 0 1"));
    }

    #[test]
    fn test_non_mesh_objects_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.appleseed");

        let mut scene = test_scene();
        scene.objects.push(Object::Other {
            name: "lamp".to_string(),
        });
        export(&scene, &path).unwrap();

        let project = std::fs::read_to_string(&path).unwrap();
        assert!(!project.contains("lamp"));
        assert!(!dir.path().join("lamp.obj").exists());
    }

    #[test]
    fn test_frame_properties_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.appleseed");
        export(&test_scene(), &path).unwrap();

        let project = std::fs::read_to_string(&path).unwrap();
        assert!(project.contains("<parameter name=\"resolution\" value=\"640 480\" />"));
        assert!(project.contains("<parameter name=\"color_space\" value=\"srgb\" />"));
    }

    #[test]
    fn test_frame_properties_come_from_scene_storage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.appleseed");

        let mut scene = test_scene();
        scene.set_property("resolution", "1920 1080");
        scene.set_property("color_space", "linear_rgb");
        export(&scene, &path).unwrap();

        let project = std::fs::read_to_string(&path).unwrap();
        assert!(project.contains("<parameter name=\"resolution\" value=\"1920 1080\" />"));
        assert!(project.contains("<parameter name=\"color_space\" value=\"linear_rgb\" />"));
    }

    #[test]
    fn test_fixed_configurations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.appleseed");
        export(&test_scene(), &path).unwrap();

        let project = std::fs::read_to_string(&path).unwrap();
        assert!(project.contains("<configuration name=\"final\" base=\"base_final\">"));
        assert!(project.contains("<configuration name=\"interactive\" base=\"base_interactive\">"));
    }

    #[test]
    fn test_unwritable_target_reports_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.appleseed");
        let result = export(&test_scene(), &path);
        assert!(matches!(result, Err(ExportError::Io { .. })));
    }
}
