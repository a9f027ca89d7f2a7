//! Minimal scene graph the rig builds its anchors in
//!
//! Nodes live in an arena addressed by [`NodeId`]. Removing a node removes
//! its whole subtree; ids of removed nodes are never reused, so a stale id
//! simply stops resolving.

mod camera;
mod graph;

pub use camera::{Camera, CameraTag, StereoTarget};
pub use graph::{Node, NodeId, SceneGraph};
