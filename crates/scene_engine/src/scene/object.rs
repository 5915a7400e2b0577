//! Scene object arena
//!
//! Every drawable thing in the scene (meshes, groups of meshes, lights) lives
//! in an [`ObjectArena`] and is addressed by the [`ObjectId`] handle issued
//! when it was inserted. Handles stay valid until the object is removed from
//! the arena; a stale handle simply misses.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::render::{Light, Material};

use super::bounds::AABB;
use super::SceneError;

new_key_type! {
    /// Handle to a node in the object arena
    pub struct ObjectId;
}

/// Renderable surface with a single material
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub material: Material,
    /// Local-space bounds used for picking
    pub bounds: Option<AABB>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(material: Material) -> Self {
        Self {
            material,
            bounds: None,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

/// What a node contributes to the frame
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure transform node; only its children are drawn
    Group,
    Mesh(Mesh),
    Light(Light),
}

/// A node of the scene hierarchy
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    /// Transform relative to the parent
    pub transform: Transform,
    pub kind: NodeKind,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
}

impl SceneNode {
    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Empty group node
    pub fn group(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    /// Mesh leaf with the given material
    pub fn mesh(name: impl Into<String>, material: Material) -> Self {
        Self::with_kind(name, NodeKind::Mesh(Mesh::new(material)))
    }

    /// Light node
    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::with_kind(name, NodeKind::Light(light))
    }

    /// Set local-space picking bounds; ignored for non-mesh nodes
    pub fn with_bounds(mut self, bounds: AABB) -> Self {
        if let NodeKind::Mesh(mesh) = &mut self.kind {
            mesh.bounds = Some(bounds);
        }
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Enable shadow casting and receiving on a mesh
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        if let NodeKind::Mesh(mesh) = &mut self.kind {
            mesh.cast_shadow = cast;
            mesh.receive_shadow = receive;
        }
        self
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, NodeKind::Light(_))
    }

    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(&mesh.material),
            _ => None,
        }
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(&mut mesh.material),
            _ => None,
        }
    }

    pub fn light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }
}

/// Storage for all scene nodes
#[derive(Debug, Default)]
pub struct ObjectArena {
    nodes: SlotMap<ObjectId, SceneNode>,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detached node and return its handle
    pub fn insert(&mut self, node: SceneNode) -> ObjectId {
        self.nodes.insert(node)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Make `child` the last child of `parent`, detaching it from any previous parent
    pub fn attach_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<(), SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownObject(parent));
        }
        if !self.contains(child) {
            return Err(SceneError::UnknownObject(child));
        }
        if self.ancestors_and_self(parent).contains(&child) {
            return Err(SceneError::HierarchyCycle { parent, child });
        }

        self.detach_from_parent(child);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Turn a node back into a hierarchy root
    pub fn detach_from_parent(&mut self, child: ObjectId) {
        let Some(parent) = self.nodes.get_mut(child).and_then(|node| node.parent.take()) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|id| *id != child);
        }
    }

    /// Remove a node and its whole subtree
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneNode> {
        self.detach_from_parent(id);
        let subtree = self.descendants(id);
        let mut removed = None;
        for node_id in subtree {
            let node = self.nodes.remove(node_id);
            if node_id == id {
                removed = node;
            }
        }
        removed
    }

    /// Direct children of a node, empty for unknown handles
    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.nodes.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// The node and everything below it, depth first, parents before children
    pub fn descendants(&self, root: ObjectId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Nodes without children reached by recursive descent from `root`
    ///
    /// A childless root is its own only leaf.
    pub fn leaves(&self, root: ObjectId) -> Vec<ObjectId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.children(*id).is_empty())
            .collect()
    }

    fn ancestors_and_self(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            chain.push(node_id);
            current = self.nodes.get(node_id).and_then(|node| node.parent);
        }
        chain
    }

    pub fn is_light(&self, id: ObjectId) -> bool {
        self.nodes.get(id).is_some_and(SceneNode::is_light)
    }

    pub fn material(&self, id: ObjectId) -> Option<&Material> {
        self.nodes.get(id).and_then(SceneNode::material)
    }

    pub fn material_mut(&mut self, id: ObjectId) -> Option<&mut Material> {
        self.nodes.get_mut(id).and_then(SceneNode::material_mut)
    }

    /// Local-to-world matrix, composed through all ancestors
    pub fn world_matrix(&self, id: ObjectId) -> Mat4 {
        self.ancestors_and_self(id)
            .iter()
            .rev()
            .filter_map(|node_id| self.nodes.get(*node_id))
            .fold(Mat4::identity(), |world, node| world * node.transform.to_matrix())
    }

    /// World-space origin of a node
    pub fn world_position(&self, id: ObjectId) -> Vec3 {
        let world = self.world_matrix(id);
        Vec3::new(world.m14, world.m24, world.m34)
    }

    /// World-space bounds of every mesh with bounds in the subtree
    pub fn world_bounds(&self, root: ObjectId) -> Option<AABB> {
        self.descendants(root)
            .into_iter()
            .filter_map(|id| {
                let bounds = match &self.nodes.get(id)?.kind {
                    NodeKind::Mesh(mesh) => mesh.bounds?,
                    _ => return None,
                };
                Some(bounds.transformed(&self.world_matrix(id)))
            })
            .reduce(|acc, bounds| acc.union(&bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Color;
    use approx::assert_relative_eq;

    fn model(arena: &mut ObjectArena) -> (ObjectId, ObjectId, ObjectId, ObjectId) {
        let root = arena.insert(SceneNode::group("model"));
        let body = arena.insert(SceneNode::group("body"));
        let wheel = arena.insert(SceneNode::mesh("wheel", Material::new()));
        let door = arena.insert(SceneNode::mesh("door", Material::unlit(Color::WHITE)));
        arena.attach_child(root, body).unwrap();
        arena.attach_child(body, wheel).unwrap();
        arena.attach_child(root, door).unwrap();
        (root, body, wheel, door)
    }

    #[test]
    fn test_leaves_descend_to_childless_nodes() {
        let mut arena = ObjectArena::new();
        let (root, body, wheel, door) = model(&mut arena);

        assert_eq!(arena.leaves(root), vec![wheel, door]);
        assert_eq!(arena.leaves(body), vec![wheel]);
        assert_eq!(arena.leaves(door), vec![door]);
        assert_eq!(arena.descendants(root), vec![root, body, wheel, door]);
    }

    #[test]
    fn test_attach_child_rejects_cycles() {
        let mut arena = ObjectArena::new();
        let (root, body, wheel, _) = model(&mut arena);

        assert!(matches!(
            arena.attach_child(wheel, root),
            Err(SceneError::HierarchyCycle { .. })
        ));
        assert!(matches!(arena.attach_child(body, body), Err(SceneError::HierarchyCycle { .. })));
    }

    #[test]
    fn test_reparenting_moves_child() {
        let mut arena = ObjectArena::new();
        let (root, body, wheel, door) = model(&mut arena);

        arena.attach_child(door, wheel).unwrap();
        assert!(arena.children(body).is_empty());
        assert_eq!(arena.get(wheel).unwrap().parent(), Some(door));
        assert_eq!(arena.leaves(root), vec![body, wheel]);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut arena = ObjectArena::new();
        let (root, body, wheel, door) = model(&mut arena);

        let removed = arena.remove(body).unwrap();
        assert_eq!(removed.name, "body");
        assert!(!arena.contains(wheel));
        assert!(arena.contains(door));
        assert_eq!(arena.children(root), &[door]);
    }

    #[test]
    fn test_world_bounds_follow_parent_transform() {
        let mut arena = ObjectArena::new();
        let root = arena.insert(SceneNode::group("root").with_position(Vec3::new(0.0, 5.0, 0.0)));
        let leaf = arena.insert(
            SceneNode::mesh("box", Material::new())
                .with_bounds(AABB::from_size(2.0, 2.0, 2.0))
                .with_position(Vec3::new(1.0, 0.0, 0.0)),
        );
        arena.attach_child(root, leaf).unwrap();

        let bounds = arena.world_bounds(root).unwrap();
        assert_relative_eq!(bounds.center(), Vec3::new(1.0, 5.0, 0.0));
        assert_relative_eq!(arena.world_position(leaf), Vec3::new(1.0, 5.0, 0.0));

        let empty = arena.insert(SceneNode::group("empty"));
        assert!(arena.world_bounds(empty).is_none());
    }
}
