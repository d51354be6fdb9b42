/// Built-in laptop model used when no asset file is given
use nalgebra::{Point3, Vector3};

use crate::asset::Asset;
use crate::geometry::Mesh;
use crate::lighting::rgb_from_hex;
use crate::scene::{Node, SceneGraph};
use crate::transform::NodeTransform;

const WIDTH: f32 = 3.0;
const DEPTH: f32 = 2.0;
const BASE_THICKNESS: f32 = 0.12;
const LID_THICKNESS: f32 = 0.05;

/// A closed laptop whose lid hinges on the `screen` node.
///
/// At zero rotation the lid lies flat on the base; a negative X rotation
/// lifts it open towards the viewer.
pub fn laptop() -> Asset {
    let mut scene = SceneGraph::new();
    let root = scene.add_root(
        Node::new("laptop").with_transform(NodeTransform::from_translation(0.0, 0.0, -2.5)),
    );

    let base = Mesh::cuboid(
        Vector3::new(WIDTH, BASE_THICKNESS, DEPTH),
        Point3::new(0.0, BASE_THICKNESS / 2.0, 0.0),
    )
    .with_color(rgb_from_hex(0xb8bcc4));
    scene.add_child(root, Node::new("base").with_mesh(base));

    let keyboard = Mesh::cuboid(
        Vector3::new(WIDTH * 0.8, 0.01, DEPTH * 0.4),
        Point3::new(0.0, BASE_THICKNESS + 0.005, -DEPTH * 0.1),
    )
    .with_color(rgb_from_hex(0x2a2d33));
    scene.add_child(root, Node::new("keyboard").with_mesh(keyboard));

    // Hinge along the back edge; the lid extends forward from it
    let hinge = scene.add_child(
        root,
        Node::new("screen").with_transform(NodeTransform::from_translation(
            0.0,
            BASE_THICKNESS,
            -DEPTH / 2.0,
        )),
    );
    let lid = Mesh::cuboid(
        Vector3::new(WIDTH, LID_THICKNESS, DEPTH),
        Point3::new(0.0, LID_THICKNESS / 2.0, DEPTH / 2.0),
    )
    .with_color(rgb_from_hex(0xc9ccd3));
    scene.add_child(hinge, Node::new("lid").with_mesh(lid));

    let panel = Mesh::cuboid(
        Vector3::new(WIDTH * 0.9, 0.01, DEPTH * 0.85),
        Point3::new(0.0, -0.005, DEPTH / 2.0),
    )
    .with_color(rgb_from_hex(0x3a6ea5));
    scene.add_child(hinge, Node::new("display").with_mesh(panel));

    Asset {
        scene,
        cameras: Vec::new(),
        animations: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_laptop_has_screen_and_no_camera() {
        let asset = laptop();
        assert!(asset.scene.find_by_name("screen").is_some());
        assert!(asset.cameras.is_empty());
        assert_eq!(asset.scene.triangle_count(), 48);
    }

    #[test]
    fn test_opening_lid_raises_front_edge() {
        let mut asset = laptop();
        let screen = asset.scene.find_by_name("screen").unwrap();
        let lid = asset.scene.find_by_name("lid").unwrap();

        let front = Point3::new(0.0, 0.0, DEPTH);
        let closed = asset.scene.world_matrices()[lid.0].transform_point(&front);
        asset.scene.node_mut(screen).unwrap().transform.rotation.x = -1.5;
        let open = asset.scene.world_matrices()[lid.0].transform_point(&front);
        assert!(open.y > closed.y + 1.0);
    }
}
