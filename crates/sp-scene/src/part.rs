//! Part trees: the 3D description of one synthesized object.
//!
//! A [`PartTree`] is a small DAG of [`Part`]s stored in a petgraph
//! `StableDiGraph`, edges going parent → child. Offsets and rotations are
//! local to the parent. The root sits at the object's local origin, which
//! for every synthesized element is the footprint center at floor level.
//! The object's own placement and yaw live outside the tree, in
//! [`ObjectTransform`](crate::transform::ObjectTransform).

use glam::{Quat, Vec3};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::Serialize;
use sp_core::model::Color;

// ─── Parts ───────────────────────────────────────────────────────────────

/// Geometry of a single part. Sizes are full extents, not half extents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Shape {
    /// Pure grouping node.
    Group,
    Cuboid { size: Vec3 },
    #[serde(rename_all = "camelCase")]
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
    },
    Sphere { radius: f32 },
    /// Arc of a torus in its XY plane; `arc` in radians.
    Torus { radius: f32, tube: f32, arc: f32 },
    /// Flat quad facing +Z.
    Plane { width: f32, height: f32 },
    /// Point light.
    Light { intensity: f32 },
}

impl Shape {
    /// Half of the vertical extent, ignoring the part's own rotation.
    fn half_height(&self) -> f32 {
        match self {
            Self::Group | Self::Light { .. } => 0.0,
            Self::Cuboid { size } => size.y / 2.0,
            Self::Cylinder { height, .. } => height / 2.0,
            Self::Sphere { radius } => *radius,
            Self::Torus { radius, tube, .. } => radius + tube,
            Self::Plane { height, .. } => height / 2.0,
        }
    }
}

/// How a part looks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    pub color: Color,
    pub opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub name: String,
    pub shape: Shape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<Surface>,
    pub offset: Vec3,
    pub rotation: Quat,
}

impl Part {
    fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            surface: None,
            offset: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, Shape::Group)
    }

    pub fn cuboid(name: impl Into<String>, width: f32, height: f32, depth: f32) -> Self {
        Self::new(
            name,
            Shape::Cuboid {
                size: Vec3::new(width, height, depth),
            },
        )
    }

    pub fn cylinder(name: impl Into<String>, radius_top: f32, radius_bottom: f32, height: f32) -> Self {
        Self::new(
            name,
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
            },
        )
    }

    pub fn sphere(name: impl Into<String>, radius: f32) -> Self {
        Self::new(name, Shape::Sphere { radius })
    }

    pub fn torus(name: impl Into<String>, radius: f32, tube: f32, arc: f32) -> Self {
        Self::new(name, Shape::Torus { radius, tube, arc })
    }

    pub fn plane(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self::new(name, Shape::Plane { width, height })
    }

    pub fn light(name: impl Into<String>, intensity: f32) -> Self {
        Self::new(name, Shape::Light { intensity })
    }

    #[must_use]
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.offset = Vec3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.surface = Some(Surface {
            color,
            opacity: 1.0,
            texture: None,
        });
        self
    }

    /// Set the opacity, keeping (or defaulting) the color.
    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        let surface = self.surface.get_or_insert(Surface {
            color: Color::WHITE,
            opacity: 1.0,
            texture: None,
        });
        surface.opacity = opacity;
        self
    }

    #[must_use]
    pub fn textured(mut self, texture: impl Into<String>) -> Self {
        let surface = self.surface.get_or_insert(Surface {
            color: Color::WHITE,
            opacity: 1.0,
            texture: None,
        });
        surface.texture = Some(texture.into());
        self
    }

    #[must_use]
    pub fn rotated_x(mut self, radians: f32) -> Self {
        self.rotation = Quat::from_rotation_x(radians) * self.rotation;
        self
    }

    #[must_use]
    pub fn rotated_y(mut self, radians: f32) -> Self {
        self.rotation = Quat::from_rotation_y(radians) * self.rotation;
        self
    }

    #[must_use]
    pub fn rotated_z(mut self, radians: f32) -> Self {
        self.rotation = Quat::from_rotation_z(radians) * self.rotation;
        self
    }
}

// ─── Part tree ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PartTree {
    graph: StableDiGraph<Part, ()>,
    root: NodeIndex,
}

impl PartTree {
    /// An empty tree whose root group is called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(Part::group(name));
        Self { graph, root }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn name(&self) -> &str {
        &self.graph[self.root].name
    }

    /// Add `part` under `parent`. Returns the new node's index.
    pub fn add(&mut self, parent: NodeIndex, part: Part) -> NodeIndex {
        let idx = self.graph.add_node(part);
        self.graph.add_edge(parent, idx, ());
        idx
    }

    /// Add `part` directly under the root.
    pub fn push(&mut self, part: Part) -> NodeIndex {
        self.add(self.root, part)
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&Part> {
        self.graph.node_weight(idx)
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Children in insertion order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// Node count, root included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Pre-order walk from the root.
    pub fn walk(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            stack.extend(self.children(idx).into_iter().rev());
        }
        order
    }

    /// Every part whose name is `name`, in walk order.
    pub fn find_all(&self, name: &str) -> Vec<NodeIndex> {
        self.walk()
            .into_iter()
            .filter(|idx| self.graph[*idx].name == name)
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.find_all(name).into_iter().next()
    }

    pub fn count(&self, name: &str) -> usize {
        self.find_all(name).len()
    }

    /// Position of a part relative to the tree root.
    pub fn root_offset(&self, idx: NodeIndex) -> Vec3 {
        let mut chain = vec![idx];
        let mut cursor = idx;
        while let Some(parent) = self.parent(cursor) {
            chain.push(parent);
            cursor = parent;
        }
        let mut position = Vec3::ZERO;
        let mut rotation = Quat::IDENTITY;
        for node in chain.into_iter().rev() {
            let part = &self.graph[node];
            position += rotation * part.offset;
            rotation *= part.rotation;
        }
        position
    }

    /// Lowest and highest Y reached by any part, using each shape's
    /// unrotated vertical extent.
    pub fn vertical_extent(&self) -> (f32, f32) {
        let mut low = f32::INFINITY;
        let mut high = f32::NEG_INFINITY;
        for idx in self.walk() {
            let part = &self.graph[idx];
            if matches!(part.shape, Shape::Group | Shape::Light { .. }) {
                continue;
            }
            let y = self.root_offset(idx).y;
            let half = part.shape.half_height();
            low = low.min(y - half);
            high = high.max(y + half);
        }
        if low > high { (0.0, 0.0) } else { (low, high) }
    }

    /// Copy `other` (root included) under `parent`, placed at `offset`
    /// and turned by `rotation`. Returns the copied root.
    pub fn graft(&mut self, parent: NodeIndex, other: &PartTree, offset: Vec3, rotation: Quat) -> NodeIndex {
        let mut root_part = other.graph[other.root].clone();
        root_part.offset = offset + root_part.offset;
        root_part.rotation = rotation * root_part.rotation;
        let new_root = self.add(parent, root_part);

        let mut stack = vec![(other.root, new_root)];
        while let Some((from, to)) = stack.pop() {
            for child in other.children(from) {
                let copied = self.add(to, other.graph[child].clone());
                stack.push((child, copied));
            }
        }
        new_root
    }

    /// Nested, serializable form of the whole tree.
    pub fn to_node(&self) -> PartNode {
        self.node_at(self.root)
    }

    fn node_at(&self, idx: NodeIndex) -> PartNode {
        PartNode {
            part: self.graph[idx].clone(),
            children: self.children(idx).into_iter().map(|c| self.node_at(c)).collect(),
        }
    }
}

/// A part with its children inline, as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartNode {
    #[serde(flatten)]
    pub part: Part,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PartNode>,
}
