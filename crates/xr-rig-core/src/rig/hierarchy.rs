//! Self-healing construction of the anchor tree
//!
//! ```text
//! <rig root>
//! └── TrackingSpace
//!     ├── LeftEyeAnchor    (camera: Left)
//!     ├── CenterEyeAnchor  (camera: Both)
//!     ├── RightEyeAnchor   (camera: Right)
//!     ├── LeftHandAnchor
//!     ├── RightHandAnchor
//!     └── TrackerAnchor
//! ```

use tracing::{debug, warn};
use xr_rig_config::IntegrityPolicy;

use super::anchor::{AnchorKind, ResolvedAnchors};
use super::lookup::{self, LookupStrategy};
use crate::error::{Result, RigError};
use crate::scene::{NodeId, SceneGraph};
use crate::spatial::Transform;

/// How an anchor handle was (re)established during an integrity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// An existing node was recognized and taken over.
    Adopted(LookupStrategy),
    /// No candidate existed, a fresh node was added.
    Created,
}

/// Caches the node handle of every anchor between integrity checks.
#[derive(Debug, Clone, Default)]
pub struct AnchorHierarchy {
    cached: [Option<NodeId>; 7],
}

impl AnchorHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached handle, if the node still exists.
    pub fn get(&self, scene: &SceneGraph, kind: AnchorKind) -> Option<NodeId> {
        self.cached[kind.index()].filter(|id| scene.contains(*id))
    }

    /// Make sure every anchor exists below `rig_root` and sits where it should.
    ///
    /// Handles that are still alive are reused. Anything missing is looked up
    /// with the kind's lookup strategies and created only when nothing
    /// matches, so repeated calls never duplicate nodes. Each anchor
    /// touched is renamed to its canonical name, parented (tracking space
    /// under the rig root, the rest under the tracking space), and reset to
    /// an identity local transform. With [`IntegrityPolicy::Once`] anchors
    /// whose handles were still alive are not touched.
    pub fn ensure(
        &mut self,
        scene: &mut SceneGraph,
        rig_root: NodeId,
        policy: IntegrityPolicy,
        resolved: &mut Vec<(AnchorKind, Resolution)>,
    ) -> ResolvedAnchors {
        let tracking_space = self.ensure_anchor(
            scene,
            rig_root,
            rig_root,
            AnchorKind::TrackingSpace,
            policy,
            resolved,
        );

        let mut ids = [tracking_space; 7];
        for kind in AnchorKind::TRACKED {
            ids[kind.index()] =
                self.ensure_anchor(scene, rig_root, tracking_space, kind, policy, resolved);
        }

        ResolvedAnchors {
            tracking_space,
            tracker: ids[AnchorKind::Tracker.index()],
            left_eye: ids[AnchorKind::LeftEye.index()],
            center_eye: ids[AnchorKind::CenterEye.index()],
            right_eye: ids[AnchorKind::RightEye.index()],
            left_hand: ids[AnchorKind::LeftHand.index()],
            right_hand: ids[AnchorKind::RightHand.index()],
        }
    }

    fn ensure_anchor(
        &mut self,
        scene: &mut SceneGraph,
        rig_root: NodeId,
        parent: NodeId,
        kind: AnchorKind,
        policy: IntegrityPolicy,
        resolved: &mut Vec<(AnchorKind, Resolution)>,
    ) -> NodeId {
        let id = match self.get(scene, kind) {
            Some(id) if policy == IntegrityPolicy::Once => return id,
            Some(id) => id,
            None => {
                let (id, resolution) = match lookup::resolve(scene, rig_root, kind) {
                    Some((id, strategy)) => {
                        debug!(anchor = %kind, ?strategy, "Adopting existing anchor node {}", id);
                        (id, Resolution::Adopted(strategy))
                    }
                    None => {
                        let id = scene.add_node(kind.name());
                        debug!(anchor = %kind, "Created anchor node {}", id);
                        (id, Resolution::Created)
                    }
                };
                self.cached[kind.index()] = Some(id);
                resolved.push((kind, resolution));
                id
            }
        };

        if let Err(err) = normalize(scene, id, parent, kind) {
            warn!(anchor = %kind, "Could not normalize anchor: {}", err);
        }
        id
    }
}

fn normalize(scene: &mut SceneGraph, id: NodeId, parent: NodeId, kind: AnchorKind) -> Result<()> {
    scene.rename(id, kind.name())?;
    scene.set_parent(id, Some(parent))?;
    let node = scene.get_mut(id).ok_or(RigError::UnknownNode(id))?;
    node.local = Transform::identity();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Point3D, Vector3D};

    fn build(policy: IntegrityPolicy) -> (SceneGraph, NodeId, AnchorHierarchy, ResolvedAnchors) {
        let mut scene = SceneGraph::new();
        let root = scene.add_node("CameraRig");
        let mut hierarchy = AnchorHierarchy::new();
        let mut resolved = Vec::new();
        let anchors = hierarchy.ensure(&mut scene, root, policy, &mut resolved);
        (scene, root, hierarchy, anchors)
    }

    #[test]
    fn test_builds_full_tree() {
        let (scene, root, _, anchors) = build(IntegrityPolicy::EveryTick);

        assert_eq!(scene.len(), 8);
        assert_eq!(scene.get(root).unwrap().children(), &[anchors.tracking_space]);
        for kind in AnchorKind::TRACKED {
            let node = scene.get(anchors.get(kind)).unwrap();
            assert_eq!(node.name(), kind.name());
            assert_eq!(node.parent(), Some(anchors.tracking_space));
            assert!(node.local.is_identity());
        }
    }

    #[test]
    fn test_reports_creations_once() {
        let mut scene = SceneGraph::new();
        let root = scene.add_node("CameraRig");
        let mut hierarchy = AnchorHierarchy::new();

        let mut first = Vec::new();
        hierarchy.ensure(&mut scene, root, IntegrityPolicy::EveryTick, &mut first);
        assert_eq!(first.len(), 7);
        assert!(first.iter().all(|(_, r)| *r == Resolution::Created));

        let mut second = Vec::new();
        hierarchy.ensure(&mut scene, root, IntegrityPolicy::EveryTick, &mut second);
        assert!(second.is_empty());
    }

    #[test]
    fn test_every_tick_resets_drift() {
        let (mut scene, root, mut hierarchy, anchors) = build(IntegrityPolicy::EveryTick);
        {
            let node = scene.get_mut(anchors.left_hand).unwrap();
            node.local.position = Point3D::new(1.0, 2.0, 3.0);
            node.local.scale = Vector3D::new(2.0, 2.0, 2.0);
        }
        scene.set_parent(anchors.left_hand, Some(root)).unwrap();

        let again = hierarchy.ensure(&mut scene, root, IntegrityPolicy::EveryTick, &mut Vec::new());
        assert_eq!(again, anchors);
        let node = scene.get(anchors.left_hand).unwrap();
        assert_eq!(node.parent(), Some(anchors.tracking_space));
        assert!(node.local.is_identity());
    }

    #[test]
    fn test_once_leaves_live_anchors_alone() {
        let (mut scene, root, mut hierarchy, anchors) = build(IntegrityPolicy::Once);
        scene.get_mut(anchors.tracker).unwrap().local.position = Point3D::new(0.0, 1.0, 0.0);

        hierarchy.ensure(&mut scene, root, IntegrityPolicy::Once, &mut Vec::new());
        assert_eq!(
            scene.get(anchors.tracker).unwrap().local.position,
            Point3D::new(0.0, 1.0, 0.0)
        );

        // deleted anchors are still rebuilt
        scene.remove(anchors.tracker);
        let rebuilt = hierarchy.ensure(&mut scene, root, IntegrityPolicy::Once, &mut Vec::new());
        assert_ne!(rebuilt.tracker, anchors.tracker);
        assert!(scene.get(rebuilt.tracker).unwrap().local.is_identity());
    }

    #[test]
    fn test_adopts_legacy_and_bare_nodes() {
        let mut scene = SceneGraph::new();
        let root = scene.add_node("CameraRig");
        let legacy = scene.add_child(root, "CameraRightEye").unwrap();
        let bare = scene.add_child(root, "RightHandAnchor").unwrap();
        scene.get_mut(legacy).unwrap().local.position = Point3D::new(5.0, 5.0, 5.0);

        let mut resolved = Vec::new();
        let anchors =
            AnchorHierarchy::new().ensure(&mut scene, root, IntegrityPolicy::EveryTick, &mut resolved);

        assert_eq!(anchors.right_eye, legacy);
        assert_eq!(anchors.right_hand, bare);
        assert_eq!(scene.len(), 8);
        assert!(resolved.contains(&(
            AnchorKind::RightEye,
            Resolution::Adopted(LookupStrategy::LegacyName)
        )));

        let eye = scene.get(legacy).unwrap();
        assert_eq!(eye.name(), "RightEyeAnchor");
        assert_eq!(eye.parent(), Some(anchors.tracking_space));
        assert!(eye.local.is_identity());
    }
}
