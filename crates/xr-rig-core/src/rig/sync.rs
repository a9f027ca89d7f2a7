//! Copying tracked poses onto anchors, and the stale-frame guard

use serde::{Deserialize, Serialize};

use super::anchor::{AnchorKind, EyeAnchors, ResolvedAnchors};
use crate::scene::{NodeId, SceneGraph};
use crate::spatial::Pose;
use crate::tracking::{Eye, Hand, PoseSource};

/// Why a frame must not present tracked poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    /// The rig was just built and tracking data is not trusted yet.
    Initialized,
    /// The camera set changed during this tick's integrity check.
    CameraModeChanged,
}

/// One-shot guard deciding whether the next synchronization freezes.
///
/// Set on construction and on camera-mode transitions, cleared at the start
/// of each variable-step tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameState {
    #[default]
    Live,
    Stale(StaleReason),
}

impl FrameState {
    pub fn is_stale(&self) -> bool {
        matches!(self, FrameState::Stale(_))
    }

    /// Raise the guard. An already stale frame keeps its original reason.
    pub fn mark_stale(&mut self, reason: StaleReason) {
        if *self == FrameState::Live {
            *self = FrameState::Stale(reason);
        }
    }

    pub fn clear(&mut self) {
        *self = FrameState::Live;
    }
}

/// Result of one synchronization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Eye anchors were held at identity; no change event fired.
    Frozen(StaleReason),
    /// Tracked poses were applied and the change event fired.
    Synchronized { monoscopic: bool },
}

impl SyncOutcome {
    pub fn is_frozen(&self) -> bool {
        matches!(self, SyncOutcome::Frozen(_))
    }
}

/// Put the three eye anchors at identity. Tracker and hands keep their pose.
pub fn freeze_eyes(scene: &mut SceneGraph, eyes: &EyeAnchors) {
    for id in [eyes.center, eyes.left, eyes.right] {
        write_pose(scene, id, Pose::IDENTITY);
    }
}

/// Copy the source's current poses onto every tracked anchor.
///
/// In monoscopic mode both eye anchors take the center-eye pose; hands and
/// tracker are never affected by it. Returns the monoscopic flag that was used.
pub fn apply_poses<S: PoseSource + ?Sized>(
    scene: &mut SceneGraph,
    anchors: &ResolvedAnchors,
    source: &S,
) -> bool {
    let monoscopic = source.is_monoscopic();
    let center = source.eye_pose(Eye::Center);
    let eye = |eye: Eye| {
        if monoscopic {
            center
        } else {
            source.eye_pose(eye)
        }
    };

    let poses = [
        (AnchorKind::Tracker, source.tracker_pose()),
        (AnchorKind::CenterEye, center),
        (AnchorKind::LeftEye, eye(Eye::Left)),
        (AnchorKind::RightEye, eye(Eye::Right)),
        (AnchorKind::LeftHand, source.hand_pose(Hand::Left)),
        (AnchorKind::RightHand, source.hand_pose(Hand::Right)),
    ];
    for (kind, pose) in poses {
        write_pose(scene, anchors.get(kind), pose);
    }
    monoscopic
}

fn write_pose(scene: &mut SceneGraph, id: NodeId, pose: Pose) {
    if let Some(node) = scene.get_mut(id) {
        node.local.set_pose(pose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_reason_sticks() {
        let mut state = FrameState::Live;
        state.mark_stale(StaleReason::Initialized);
        state.mark_stale(StaleReason::CameraModeChanged);
        assert_eq!(state, FrameState::Stale(StaleReason::Initialized));

        state.clear();
        assert!(!state.is_stale());
        state.mark_stale(StaleReason::CameraModeChanged);
        assert_eq!(state, FrameState::Stale(StaleReason::CameraModeChanged));
    }
}
