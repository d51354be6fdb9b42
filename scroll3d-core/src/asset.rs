/// Asset loading for glTF/GLB scenes and single-mesh STL files
use std::path::Path;

use gltf::animation::util::ReadOutputs;
use gltf::camera::Projection;
use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, UnitQuaternion, Vector3};

use crate::animation::{AnimationClip, Interpolation, Track, TrackValues};
use crate::error::{Error, Result};
use crate::geometry::{Mesh, Triangle, Vertex};
use crate::projection::Camera;
use crate::scene::{Node, NodeId, SceneGraph};
use crate::stl;
use crate::transform::NodeTransform;

/// A loaded model: node hierarchy, embedded cameras, and clips
#[derive(Debug, Clone)]
pub struct Asset {
    pub scene: SceneGraph,
    pub cameras: Vec<Camera>,
    pub animations: Vec<AnimationClip>,
}

impl Asset {
    /// Load from disk, choosing the format from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if extension == "gltf" {
            // .gltf may reference sibling .bin files, so let gltf resolve them
            let (document, buffers, _images) = gltf::import(path)?;
            return Self::from_document(&document, &buffers);
        }

        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, &extension)
    }

    /// Parse in-memory data; `extension` is `glb`, `gltf` or `stl`
    pub fn from_bytes(bytes: &[u8], extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "glb" | "gltf" => Self::from_gltf_slice(bytes),
            "stl" => Self::from_stl(bytes),
            other => Err(Error::UnsupportedAsset(other.to_string())),
        }
    }

    pub fn from_gltf_slice(bytes: &[u8]) -> Result<Self> {
        let (document, buffers, _images) = gltf::import_slice(bytes)?;
        Self::from_document(&document, &buffers)
    }

    pub fn from_stl(bytes: &[u8]) -> Result<Self> {
        let mesh = stl::parse_stl(bytes)?;
        let mut scene = SceneGraph::new();
        scene.add_root(Node::new("model").with_mesh(mesh));
        Ok(Self {
            scene,
            cameras: Vec::new(),
            animations: Vec::new(),
        })
    }

    fn from_document(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<Self> {
        let gltf_scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or(Error::EmptyScene)?;

        let mut loader = DocumentLoader {
            buffers,
            scene: SceneGraph::new(),
            cameras: Vec::new(),
            node_ids: vec![None; document.nodes().len()],
        };

        // All top-level nodes hang off one root, like a loaded scene object
        let root = loader.scene.add_root(Node::new(gltf_scene.name().unwrap_or("scene")));
        for node in gltf_scene.nodes() {
            loader.visit(&node, root, Matrix4::identity());
        }

        let animations = document
            .animations()
            .map(|animation| loader.clip(&animation))
            .filter(|clip| !clip.tracks.is_empty())
            .collect();

        log::info!(
            "loaded glTF scene: {} nodes, {} triangles, {} cameras",
            loader.scene.len(),
            loader.scene.triangle_count(),
            loader.cameras.len()
        );

        Ok(Self {
            scene: loader.scene,
            cameras: loader.cameras,
            animations,
        })
    }
}

struct DocumentLoader<'a> {
    buffers: &'a [gltf::buffer::Data],
    scene: SceneGraph,
    cameras: Vec<Camera>,
    node_ids: Vec<Option<NodeId>>,
}

impl DocumentLoader<'_> {
    fn buffer(&self, buffer: gltf::Buffer<'_>) -> Option<&[u8]> {
        self.buffers.get(buffer.index()).map(|data| data.0.as_slice())
    }

    fn visit(&mut self, node: &gltf::Node<'_>, parent: NodeId, parent_world: Matrix4<f32>) {
        let (translation, rotation, scale) = node.transform().decomposed();
        let transform = NodeTransform::from_decomposed(translation, rotation, scale);
        let world = parent_world * Matrix4::from(node.transform().matrix());

        let mut scene_node = match node.name() {
            Some(name) => Node::new(name),
            None => Node::unnamed(),
        }
        .with_transform(transform);
        if let Some(mesh) = node.mesh() {
            scene_node.mesh = self.mesh(&mesh);
        }

        let id = self.scene.add_child(parent, scene_node);
        self.node_ids[node.index()] = Some(id);

        if let Some(camera) = node.camera() {
            self.cameras.push(camera_from(&camera, &world));
        }

        for child in node.children() {
            self.visit(&child, id, world);
        }
    }

    fn mesh(&self, mesh: &gltf::Mesh<'_>) -> Option<Mesh> {
        let mut out = Mesh::new();

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!("skipping non-triangle primitive in mesh {:?}", mesh.name());
                continue;
            }
            let [r, g, b, _] = primitive.material().pbr_metallic_roughness().base_color_factor();
            out.color = [r, g, b];

            let reader = primitive.reader(|buffer| self.buffer(buffer));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let normals: Vec<[f32; 3]> = match reader.read_normals() {
                Some(normals) => normals.collect(),
                None => vec![[0.0, 1.0, 0.0]; positions.len()],
            };
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            let vertex = |i: u32| -> Option<Vertex> {
                let [x, y, z] = *positions.get(i as usize)?;
                let [nx, ny, nz] = normals.get(i as usize).copied().unwrap_or([0.0, 1.0, 0.0]);
                Some(Vertex::new(x, y, z, nx, ny, nz))
            };
            for face in indices.chunks_exact(3) {
                if let (Some(a), Some(b), Some(c)) = (vertex(face[0]), vertex(face[1]), vertex(face[2])) {
                    out.add_triangle(Triangle::new(a, b, c));
                }
            }
        }

        (!out.is_empty()).then_some(out)
    }

    fn clip(&self, animation: &gltf::Animation<'_>) -> AnimationClip {
        let mut tracks = Vec::new();

        for channel in animation.channels() {
            let Some(node) = self.node_ids.get(channel.target().node().index()).copied().flatten() else {
                continue;
            };
            let reader = channel.reader(|buffer| self.buffer(buffer));
            let Some(times) = reader.read_inputs() else {
                continue;
            };
            let times: Vec<f32> = times.collect();

            let (interpolation, stride) = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => (Interpolation::Linear, 1),
                gltf::animation::Interpolation::Step => (Interpolation::Step, 1),
                // in-tangent, value, out-tangent per keyframe; keep the values
                gltf::animation::Interpolation::CubicSpline => (Interpolation::Linear, 3),
            };
            let keep = |i: usize| stride == 1 || i % 3 == 1;

            let values = match reader.read_outputs() {
                Some(ReadOutputs::Translations(values)) => TrackValues::Translation(
                    values.enumerate().filter(|(i, _)| keep(*i)).map(|(_, v)| Vector3::from(v)).collect(),
                ),
                Some(ReadOutputs::Scales(values)) => TrackValues::Scale(
                    values.enumerate().filter(|(i, _)| keep(*i)).map(|(_, v)| Vector3::from(v)).collect(),
                ),
                Some(ReadOutputs::Rotations(values)) => TrackValues::Rotation(
                    values
                        .into_f32()
                        .enumerate()
                        .filter(|(i, _)| keep(*i))
                        .map(|(_, [x, y, z, w])| {
                            UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(w, x, y, z))
                        })
                        .collect(),
                ),
                Some(ReadOutputs::MorphTargetWeights(_)) | None => continue,
            };

            tracks.push(Track {
                node,
                times,
                values,
                interpolation,
            });
        }

        AnimationClip {
            name: animation.name().map(str::to_string),
            tracks,
        }
    }
}

fn camera_from(camera: &gltf::Camera<'_>, world: &Matrix4<f32>) -> Camera {
    let position = Point3::from(world.fixed_view::<3, 1>(0, 3).into_owned());
    let basis: Matrix3<f32> = world.fixed_view::<3, 3>(0, 0).into_owned();
    // Strip any scale from the basis before reading the rotation
    let normalized = Matrix3::from_columns(&[
        basis.column(0).normalize(),
        basis.column(1).normalize(),
        basis.column(2).normalize(),
    ]);
    let orientation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix(&normalized));

    let camera = match camera.projection() {
        Projection::Perspective(p) => Camera::perspective(
            p.yfov().to_degrees(),
            p.aspect_ratio().unwrap_or(16.0 / 9.0),
            p.znear(),
            p.zfar().unwrap_or(1000.0),
            position,
        ),
        Projection::Orthographic(o) => {
            let aspect = if o.ymag() != 0.0 { o.xmag() / o.ymag() } else { 1.0 };
            Camera::orthographic(o.ymag(), aspect, o.znear(), o.zfar(), position)
        }
    };
    camera.with_orientation(orientation)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal GLB: one named triangle under a parent, plus a camera node
    fn sample_glb() -> Vec<u8> {
        let mut bin = Vec::new();
        for f in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            bin.extend(f.to_le_bytes());
        }
        let json = r#"{
            "asset": {"version": "2.0"},
            "scene": 0,
            "scenes": [{"name": "Scene", "nodes": [0, 2]}],
            "nodes": [
                {"name": "body", "children": [1]},
                {"name": "screen", "mesh": 0, "translation": [0, 0, -1]},
                {"name": "Camera", "camera": 0, "translation": [0, 2, 5]}
            ],
            "cameras": [{"type": "perspective", "perspective": {"yfov": 0.8, "znear": 0.1, "zfar": 100}}],
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
            "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                           "min": [0, 0, 0], "max": [1, 1, 0]}],
            "bufferViews": [{"buffer": 0, "byteLength": 36}],
            "buffers": [{"byteLength": 36}]
        }"#;

        let mut json = json.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }

        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut glb = Vec::new();
        glb.extend(b"glTF");
        glb.extend(2u32.to_le_bytes());
        glb.extend((total as u32).to_le_bytes());
        glb.extend((json.len() as u32).to_le_bytes());
        glb.extend(b"JSON");
        glb.extend(&json);
        glb.extend((bin.len() as u32).to_le_bytes());
        glb.extend(b"BIN\0");
        glb.extend(&bin);
        glb
    }

    #[test]
    fn test_glb_hierarchy_and_camera() {
        let asset = Asset::from_bytes(&sample_glb(), "glb").unwrap();

        let screen = asset.scene.find_by_name("screen").unwrap();
        assert!(asset.scene.node(screen).unwrap().mesh.is_some());
        assert_eq!(asset.scene.node_at_path(&[0, 0]), Some(screen));
        assert_eq!(asset.scene.triangle_count(), 1);

        assert_eq!(asset.cameras.len(), 1);
        assert!((asset.cameras[0].position.y - 2.0).abs() < 1e-6);
        assert!(asset.animations.is_empty());
    }

    #[test]
    fn test_stl_asset_has_no_camera() {
        let mut data = vec![0u8; 80];
        data.extend(0u32.to_le_bytes());
        let asset = Asset::from_bytes(&data, "STL").unwrap();
        assert!(asset.cameras.is_empty());
        assert!(asset.scene.find_by_name("model").is_some());
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            Asset::from_bytes(b"", "obj"),
            Err(Error::UnsupportedAsset(ext)) if ext == "obj"
        ));
    }
}
