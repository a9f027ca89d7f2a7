use std::fmt;

use serde::{Deserialize, Serialize};

use super::Camera;
use crate::error::{Result, RigError};
use crate::spatial::{Matrix4, Transform};

/// Handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named node with a local transform and an optional camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub local: Transform,
    pub camera: Option<Camera>,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            local: Transform::identity(),
            camera: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneGraph {
    nodes: Vec<Option<Node>>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unparented node with an identity transform.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(name.into())));
        id
    }

    /// Add a node directly under `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(RigError::UnknownNode(parent));
        }
        let id = self.add_node(name);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i), n)))
    }

    pub fn rename(&mut self, id: NodeId, name: &str) -> Result<()> {
        let node = self.get_mut(id).ok_or(RigError::UnknownNode(id))?;
        if node.name != name {
            node.name = name.to_string();
        }
        Ok(())
    }

    /// Reparent `child`. Re-setting the current parent leaves sibling order untouched.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> Result<()> {
        let current = self.get(child).ok_or(RigError::UnknownNode(child))?.parent;
        if current == parent {
            return Ok(());
        }

        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(RigError::UnknownNode(parent));
            }
            if self.is_ancestor_or_self(child, parent) {
                return Err(RigError::ParentCycle { child, parent });
            }
        }

        if let Some(old) = current.and_then(|p| self.get_mut(p)) {
            old.children.retain(|c| *c != child);
        }
        if let Some(new) = parent.and_then(|p| self.get_mut(p)) {
            new.children.push(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
        }
        Ok(())
    }

    /// Remove a node and its whole subtree. Returns false if it was already gone.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.get(id).map(Node::parent) else {
            return false;
        };
        if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
            p.children.retain(|c| *c != id);
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take) {
                pending.extend(node.children);
            }
        }
        true
    }

    /// Resolve a `/`-separated path of child names starting below `from`.
    ///
    /// The first child with a matching name wins at each level.
    pub fn find(&self, from: NodeId, path: &str) -> Option<NodeId> {
        let mut current = from;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = self
                .get(current)?
                .children
                .iter()
                .copied()
                .find(|c| self.get(*c).is_some_and(|n| n.name == segment))?;
        }
        (current != from).then_some(current)
    }

    /// Local-to-world matrix, composed along the parent chain.
    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4> {
        let mut node = self.get(id)?;
        let mut matrix = node.local.to_matrix();
        while let Some(parent) = node.parent {
            node = self.get(parent)?;
            matrix = node.local.to_matrix() * matrix;
        }
        Some(matrix)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.get(id).and_then(Node::parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }
}
