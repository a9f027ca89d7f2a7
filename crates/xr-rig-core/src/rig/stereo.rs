//! Stereo camera attachment and per-eye / shared camera switching

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::anchor::EyeAnchors;
use crate::scene::{Camera, CameraTag, NodeId, SceneGraph};

/// Enabled flags of the three eye cameras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraEnableState {
    pub center: bool,
    pub left: bool,
    pub right: bool,
}

impl CameraEnableState {
    /// The flags a rig in the given mode must have.
    pub fn for_mode(use_per_eye_cameras: bool) -> Self {
        Self {
            center: !use_per_eye_cameras,
            left: use_per_eye_cameras,
            right: use_per_eye_cameras,
        }
    }

    /// Current flags; a missing camera reads as disabled.
    pub fn capture(scene: &SceneGraph, eyes: &EyeAnchors) -> Self {
        Self {
            center: is_enabled(scene, eyes.center),
            left: is_enabled(scene, eyes.left),
            right: is_enabled(scene, eyes.right),
        }
    }

    fn apply(&self, scene: &mut SceneGraph, eyes: &EyeAnchors) {
        for (id, enabled) in [
            (eyes.center, self.center),
            (eyes.left, self.left),
            (eyes.right, self.right),
        ] {
            if let Some(camera) = scene.get_mut(id).and_then(|n| n.camera.as_mut()) {
                camera.enabled = enabled;
            }
        }
    }
}

/// Camera flags before and after a reconcile that had to change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: CameraEnableState,
    pub to: CameraEnableState,
}

fn is_enabled(scene: &SceneGraph, id: NodeId) -> bool {
    scene
        .get(id)
        .and_then(|n| n.camera.as_ref())
        .is_some_and(|c| c.enabled)
}

/// Give every eye anchor its camera.
///
/// Nothing happens while all three cameras are present. Once any is missing,
/// existing cameras are reused, missing ones are added as main cameras, and
/// all three get their stereo target reassigned. Returns true if a camera
/// was added.
pub fn attach_cameras(scene: &mut SceneGraph, eyes: &EyeAnchors) -> bool {
    let bindings = eyes.bindings();
    let complete = bindings
        .iter()
        .all(|(id, _)| scene.get(*id).is_some_and(|n| n.camera.is_some()));
    if complete {
        return false;
    }

    let mut added = false;
    for (id, target) in bindings {
        let Some(node) = scene.get_mut(id) else {
            continue;
        };
        if let Some(camera) = node.camera.as_mut() {
            camera.stereo_target = target;
            continue;
        }
        node.camera = Some(Camera::new(target).with_tag(CameraTag::MainCamera));
        added = true;
        debug!(?target, "Attached camera to {}", node.name());
    }
    added
}

/// Force the camera flags to match the configured mode.
///
/// The flags are snapshotted first; a transition is returned when the
/// snapshot disagreed with the mode, meaning this call changed what renders.
pub fn reconcile_cameras(
    scene: &mut SceneGraph,
    eyes: &EyeAnchors,
    use_per_eye_cameras: bool,
) -> Option<ModeTransition> {
    let before = CameraEnableState::capture(scene, eyes);
    let target = CameraEnableState::for_mode(use_per_eye_cameras);
    target.apply(scene, eyes);

    (before != target).then_some(ModeTransition {
        from: before,
        to: target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::StereoTarget;

    fn eye_scene() -> (SceneGraph, EyeAnchors) {
        let mut scene = SceneGraph::new();
        let eyes = EyeAnchors {
            left: scene.add_node("LeftEyeAnchor"),
            center: scene.add_node("CenterEyeAnchor"),
            right: scene.add_node("RightEyeAnchor"),
        };
        (scene, eyes)
    }

    fn camera(scene: &SceneGraph, id: NodeId) -> Camera {
        scene.get(id).unwrap().camera.unwrap()
    }

    #[test]
    fn test_attach_assigns_targets() {
        let (mut scene, eyes) = eye_scene();
        assert!(attach_cameras(&mut scene, &eyes));

        assert_eq!(camera(&scene, eyes.center).stereo_target, StereoTarget::Both);
        assert_eq!(camera(&scene, eyes.left).stereo_target, StereoTarget::Left);
        assert_eq!(camera(&scene, eyes.right).stereo_target, StereoTarget::Right);
        assert_eq!(camera(&scene, eyes.left).tag, CameraTag::MainCamera);

        assert!(!attach_cameras(&mut scene, &eyes));
    }

    #[test]
    fn test_attach_reuses_existing_camera() {
        let (mut scene, eyes) = eye_scene();
        let existing = Camera::new(StereoTarget::Right).with_enabled(false);
        scene.get_mut(eyes.left).unwrap().camera = Some(existing);

        assert!(attach_cameras(&mut scene, &eyes));
        let left = camera(&scene, eyes.left);
        assert_eq!(left.stereo_target, StereoTarget::Left);
        assert_eq!(left.tag, CameraTag::Untagged);
        assert!(!left.enabled);
    }

    #[test]
    fn test_reconcile_reports_transition_once() {
        let (mut scene, eyes) = eye_scene();
        attach_cameras(&mut scene, &eyes);

        // fresh cameras are all enabled, which matches neither mode
        let transition = reconcile_cameras(&mut scene, &eyes, false).unwrap();
        assert_eq!(transition.to, CameraEnableState::for_mode(false));
        assert!(reconcile_cameras(&mut scene, &eyes, false).is_none());

        let transition = reconcile_cameras(&mut scene, &eyes, true).unwrap();
        assert_eq!(transition.from, CameraEnableState::for_mode(false));
        assert_eq!(
            CameraEnableState::capture(&scene, &eyes),
            CameraEnableState::for_mode(true)
        );
    }
}
