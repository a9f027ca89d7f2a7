//! Ordered strategies for finding an existing anchor node
//!
//! Scenes may already contain anchors from a previous session, from manual
//! setup, or from rigs that used the older flat naming. Each strategy is one
//! way of recognizing such a node; [`resolve`] tries them in the order given
//! by [`AnchorKind::lookup_strategies`].

use serde::{Deserialize, Serialize};

use super::anchor::{AnchorKind, TRACKING_SPACE_NAME};
use crate::scene::{NodeId, SceneGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    /// `TrackingSpace/<Name>` below the rig root.
    QualifiedPath,
    /// `<Name>` directly below the rig root.
    BareName,
    /// Legacy flat name directly below the rig root.
    LegacyName,
}

impl LookupStrategy {
    pub fn locate(self, scene: &SceneGraph, rig_root: NodeId, kind: AnchorKind) -> Option<NodeId> {
        match self {
            LookupStrategy::QualifiedPath => {
                scene.find(rig_root, &format!("{}/{}", TRACKING_SPACE_NAME, kind.name()))
            }
            LookupStrategy::BareName => scene.find(rig_root, kind.name()),
            LookupStrategy::LegacyName => kind
                .legacy_name()
                .and_then(|legacy| scene.find(rig_root, legacy)),
        }
    }
}

/// First match among `kind`'s strategies, with the strategy that found it.
pub fn resolve(
    scene: &SceneGraph,
    rig_root: NodeId,
    kind: AnchorKind,
) -> Option<(NodeId, LookupStrategy)> {
    kind.lookup_strategies()
        .iter()
        .find_map(|strategy| strategy.locate(scene, rig_root, kind).map(|id| (id, *strategy)))
}
