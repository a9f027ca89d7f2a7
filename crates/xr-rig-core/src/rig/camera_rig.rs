//! The head-tracked stereo camera rig

use serde::Serialize;
use tracing::{debug, error, info};
use xr_rig_config::{IntegrityPolicy, RigConfiguration};

use super::anchor::{AnchorKind, ResolvedAnchors};
use super::hierarchy::{AnchorHierarchy, Resolution};
use super::notifier::{ChangeNotifier, SubscriptionId};
use super::reference::tracking_reference_matrix;
use super::stereo::{self, ModeTransition};
use super::sync::{self, FrameState, StaleReason, SyncOutcome};
use crate::error::{Result, RigError};
use crate::scene::{Camera, NodeId, SceneGraph};
use crate::spatial::{Matrix4, Transform};
use crate::tracking::PoseSource;

/// Name of the rig root when the rig creates its own scene.
pub const DEFAULT_RIG_NAME: &str = "CameraRig";

/// What one integrity check had to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub anchors: ResolvedAnchors,
    /// Anchors whose handle had to be (re)established.
    pub resolved: Vec<(AnchorKind, Resolution)>,
    pub cameras_attached: bool,
    pub mode_transition: Option<ModeTransition>,
}

impl IntegrityReport {
    /// True when the hierarchy needed no repair.
    pub fn is_clean(&self) -> bool {
        self.resolved.is_empty() && !self.cameras_attached && self.mode_transition.is_none()
    }
}

/// A camera as exposed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeCamera<'a> {
    pub node: NodeId,
    pub camera: &'a Camera,
}

/// Serializable view of one anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorState {
    pub kind: AnchorKind,
    pub node: NodeId,
    pub name: String,
    pub local: Transform,
    pub camera: Option<Camera>,
}

/// A head-tracked stereoscopic camera rig.
///
/// The rig owns a scene subtree rooted at `root`:
/// a tracking-space node whose children mirror the headset eyes, the
/// positional tracker and both hand controllers. Each tick it repairs that
/// subtree, copies poses from its [`PoseSource`], and tells subscribers.
///
/// Everything runs on the caller's thread. Change callbacks run inline
/// during synchronization and only see the rig immutably; re-entering
/// synchronization from one is not supported.
#[derive(Debug)]
pub struct CameraRig<S: PoseSource> {
    scene: SceneGraph,
    root: NodeId,
    source: S,
    config: RigConfiguration,
    hierarchy: AnchorHierarchy,
    anchors: ResolvedAnchors,
    frame_state: FrameState,
    anchors_updated: ChangeNotifier<CameraRig<S>>,
}

impl<S: PoseSource> CameraRig<S> {
    /// Build a rig in a scene of its own.
    pub fn new(source: S, config: RigConfiguration) -> Self {
        let mut scene = SceneGraph::new();
        let root = scene.add_node(DEFAULT_RIG_NAME);
        Self::build(scene, root, source, config)
    }

    /// Build a rig under an existing node, adopting any anchors already there.
    pub fn with_scene(
        scene: SceneGraph,
        root: NodeId,
        source: S,
        config: RigConfiguration,
    ) -> Result<Self> {
        if !scene.contains(root) {
            return Err(RigError::UnknownNode(root));
        }
        Ok(Self::build(scene, root, source, config))
    }

    fn build(mut scene: SceneGraph, root: NodeId, source: S, config: RigConfiguration) -> Self {
        let mut hierarchy = AnchorHierarchy::new();
        let anchors = hierarchy.ensure(&mut scene, root, config.integrity_policy, &mut Vec::new());

        let mut rig = Self {
            scene,
            root,
            source,
            config,
            hierarchy,
            anchors,
            frame_state: FrameState::Stale(StaleReason::Initialized),
            anchors_updated: ChangeNotifier::new(),
        };
        rig.ensure_integrity();
        rig
    }

    /// Repair the anchor tree and camera set.
    ///
    /// A no-op on a healthy rig. If the camera flags had to change to match
    /// `use_per_eye_cameras`, the current frame is marked stale.
    pub fn ensure_integrity(&mut self) -> IntegrityReport {
        let mut resolved = Vec::new();
        self.anchors = self.hierarchy.ensure(
            &mut self.scene,
            self.root,
            self.config.integrity_policy,
            &mut resolved,
        );

        let eyes = self.anchors.eyes();
        let cameras_attached = stereo::attach_cameras(&mut self.scene, &eyes);
        let mode_transition =
            stereo::reconcile_cameras(&mut self.scene, &eyes, self.config.use_per_eye_cameras);

        if let Some(transition) = &mode_transition {
            info!(
                per_eye = self.config.use_per_eye_cameras,
                "Camera mode changed from {:?} to {:?}, next frame is stale",
                transition.from,
                transition.to
            );
            self.frame_state.mark_stale(StaleReason::CameraModeChanged);
        }

        IntegrityReport {
            anchors: self.anchors,
            resolved,
            cameras_attached,
            mode_transition,
        }
    }

    /// One synchronization pass: integrity check, then poses or a freeze.
    ///
    /// Call at most once per logical tick.
    pub fn synchronize_once(&mut self) -> SyncOutcome {
        self.ensure_integrity();

        if let FrameState::Stale(reason) = self.frame_state {
            debug!(?reason, "Stale frame, holding eye anchors at identity");
            sync::freeze_eyes(&mut self.scene, &self.anchors.eyes());
            return SyncOutcome::Frozen(reason);
        }

        let monoscopic = sync::apply_poses(&mut self.scene, &self.anchors, &self.source);
        self.anchors_updated.notify(&*self);
        SyncOutcome::Synchronized { monoscopic }
    }

    /// Clear the stale-frame guard; the start of a variable-step tick.
    pub fn begin_tick(&mut self) {
        self.frame_state.clear();
    }

    /// Variable-step tick. Synchronizes unless tracking runs on the fixed step.
    pub fn update(&mut self) -> Option<SyncOutcome> {
        self.begin_tick();
        let variable = !self.config.use_fixed_update_for_tracking;
        variable.then(|| self.synchronize_once())
    }

    /// Fixed-step tick. Synchronizes only when tracking runs on the fixed step.
    pub fn fixed_update(&mut self) -> Option<SyncOutcome> {
        let fixed = self.config.use_fixed_update_for_tracking;
        fixed.then(|| self.synchronize_once())
    }

    /// Tracking-to-world matrix, or the error that prevented computing it.
    pub fn try_compute_tracking_reference_matrix(&self) -> Result<Matrix4> {
        let center = self
            .anchor(AnchorKind::CenterEye)
            .ok_or(RigError::MissingAnchor(AnchorKind::CenterEye))?;
        let world = self
            .scene
            .world_matrix(center)
            .ok_or(RigError::MissingAnchor(AnchorKind::CenterEye))?;
        Ok(tracking_reference_matrix(&world, &self.source.head_pose()))
    }

    /// Tracking-to-world matrix. Logs an error and returns identity when the
    /// center-eye anchor is missing.
    pub fn compute_tracking_reference_matrix(&self) -> Matrix4 {
        self.try_compute_tracking_reference_matrix()
            .unwrap_or_else(|err| {
                error!("Cannot compute tracking reference matrix: {}", err);
                Matrix4::IDENTITY
            })
    }

    /// Register a callback fired after every non-stale synchronization.
    pub fn on_anchors_updated(&self, callback: impl Fn(&Self) + 'static) -> SubscriptionId {
        self.anchors_updated.subscribe(callback)
    }

    pub fn anchors_updated(&self) -> &ChangeNotifier<Self> {
        &self.anchors_updated
    }

    /// Camera rendering the left eye: its own in per-eye mode, else the center camera.
    pub fn left_eye_camera(&self) -> Option<EyeCamera<'_>> {
        let node = if self.config.use_per_eye_cameras {
            self.anchor(AnchorKind::LeftEye)?
        } else {
            self.anchor(AnchorKind::CenterEye)?
        };
        self.eye_camera(node)
    }

    /// Camera rendering the right eye: its own in per-eye mode, else the center camera.
    pub fn right_eye_camera(&self) -> Option<EyeCamera<'_>> {
        let node = if self.config.use_per_eye_cameras {
            self.anchor(AnchorKind::RightEye)?
        } else {
            self.anchor(AnchorKind::CenterEye)?
        };
        self.eye_camera(node)
    }

    fn eye_camera(&self, node: NodeId) -> Option<EyeCamera<'_>> {
        let camera = self.scene.get(node)?.camera.as_ref()?;
        Some(EyeCamera { node, camera })
    }

    /// Anchor node, if it currently exists.
    pub fn anchor(&self, kind: AnchorKind) -> Option<NodeId> {
        self.hierarchy.get(&self.scene, kind)
    }

    pub fn tracking_space(&self) -> Option<NodeId> {
        self.anchor(AnchorKind::TrackingSpace)
    }

    pub fn anchor_transform(&self, kind: AnchorKind) -> Option<Transform> {
        self.scene.get(self.anchor(kind)?).map(|n| n.local)
    }

    /// Current state of every anchor that exists.
    pub fn anchor_snapshot(&self) -> Vec<AnchorState> {
        AnchorKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let node = self.anchor(kind)?;
                let data = self.scene.get(node)?;
                Some(AnchorState {
                    kind,
                    node,
                    name: data.name().to_string(),
                    local: data.local,
                    camera: data.camera,
                })
            })
            .collect()
    }

    pub fn frame_state(&self) -> FrameState {
        self.frame_state
    }

    pub fn config(&self) -> &RigConfiguration {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RigConfiguration {
        &mut self.config
    }

    /// Takes effect at the next integrity check and causes one stale frame.
    pub fn set_use_per_eye_cameras(&mut self, enabled: bool) {
        self.config.use_per_eye_cameras = enabled;
    }

    pub fn set_use_fixed_update_for_tracking(&mut self, enabled: bool) {
        self.config.use_fixed_update_for_tracking = enabled;
    }

    pub fn set_integrity_policy(&mut self, policy: IntegrityPolicy) {
        self.config.integrity_policy = policy;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Direct scene access; structural damage is repaired on the next check.
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn pose_source(&self) -> &S {
        &self.source
    }

    pub fn pose_source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::SimulatedPoseSource;

    fn rig(config: RigConfiguration) -> CameraRig<SimulatedPoseSource> {
        CameraRig::new(SimulatedPoseSource::new(), config)
    }

    #[test]
    fn test_new_rig_starts_stale() {
        let rig = rig(RigConfiguration::default());
        assert_eq!(rig.frame_state(), FrameState::Stale(StaleReason::Initialized));
        assert_eq!(rig.scene().len(), 8);
    }

    #[test]
    fn test_second_integrity_check_is_clean() {
        let mut rig = rig(RigConfiguration::default());
        assert!(rig.ensure_integrity().is_clean());
    }

    #[test]
    fn test_eye_cameras_follow_mode() {
        let mut rig = rig(RigConfiguration::default());
        let center = rig.anchor(AnchorKind::CenterEye).unwrap();
        assert_eq!(rig.left_eye_camera().unwrap().node, center);
        assert_eq!(rig.right_eye_camera().unwrap().node, center);

        rig.set_use_per_eye_cameras(true);
        rig.ensure_integrity();
        assert_eq!(
            rig.left_eye_camera().unwrap().node,
            rig.anchor(AnchorKind::LeftEye).unwrap()
        );
        assert!(rig.right_eye_camera().unwrap().camera.enabled);
    }

    #[test]
    fn test_fixed_and_variable_ticks_are_exclusive() {
        let mut rig = rig(RigConfiguration::default().with_fixed_update_for_tracking(true));
        assert_eq!(rig.update(), None);
        assert!(rig.fixed_update().is_some());

        rig.set_use_fixed_update_for_tracking(false);
        assert_eq!(rig.fixed_update(), None);
        assert!(rig.update().is_some());
    }

    #[test]
    fn test_with_scene_rejects_unknown_root() {
        let mut other = SceneGraph::new();
        let root = other.add_node("Elsewhere");
        other.remove(root);
        let result = CameraRig::with_scene(
            other,
            root,
            SimulatedPoseSource::new(),
            RigConfiguration::default(),
        );
        assert_eq!(result.err(), Some(RigError::UnknownNode(root)));
    }
}
