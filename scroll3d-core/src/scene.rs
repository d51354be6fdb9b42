/// Scene graph: an arena of named nodes with local transforms
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use crate::geometry::Mesh;
use crate::transform::NodeTransform;

/// Index of a node inside its `SceneGraph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,
    pub transform: NodeTransform,
    pub mesh: Option<Mesh>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            transform: NodeTransform::identity(),
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn unnamed() -> Self {
        Self {
            name: None,
            transform: NodeTransform::identity(),
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: NodeTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }
}

/// How the scroll-animated node is located in a loaded asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSelector {
    /// First node (depth-first) carrying this name
    Name(String),
    /// Child indices walked from the first root node
    Path(Vec<usize>),
}

impl Default for NodeSelector {
    fn default() -> Self {
        Self::Name("screen".to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, node: Node) -> NodeId {
        let id = self.push(node);
        self.roots.push(id);
        id
    }

    /// Attach `node` under `parent`. Panics if `parent` is not from this graph.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if node.name.as_deref() == Some(name) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Walk child indices starting at the first root
    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        let mut current = *self.roots.first()?;
        for &index in path {
            current = *self.nodes[current.0].children.get(index)?;
        }
        Some(current)
    }

    pub fn resolve(&self, selector: &NodeSelector) -> Option<NodeId> {
        match selector {
            NodeSelector::Name(name) => self.find_by_name(name),
            NodeSelector::Path(path) => self.node_at_path(path),
        }
    }

    /// World matrix of every node, indexed by `NodeId`
    pub fn world_matrices(&self) -> Vec<Matrix4<f32>> {
        let mut world = vec![Matrix4::identity(); self.nodes.len()];
        let mut stack: Vec<(NodeId, Matrix4<f32>)> =
            self.roots.iter().map(|&id| (id, Matrix4::identity())).collect();

        while let Some((id, parent)) = stack.pop() {
            let node = &self.nodes[id.0];
            let matrix = parent * node.transform.matrix();
            world[id.0] = matrix;
            stack.extend(node.children.iter().map(|&child| (child, matrix)));
        }

        world
    }

    /// Meshes paired with their world matrices
    pub fn meshes(&self) -> Vec<(&Mesh, Matrix4<f32>)> {
        let world = self.world_matrices();
        self.nodes
            .iter()
            .zip(world)
            .filter_map(|(node, matrix)| node.mesh.as_ref().map(|mesh| (mesh, matrix)))
            .collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|node| node.mesh.as_ref())
            .map(|mesh| mesh.triangles.len())
            .sum()
    }
}
