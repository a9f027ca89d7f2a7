//! Render camera component attached to eye anchors

use serde::{Deserialize, Serialize};

/// Which eye(s) a camera renders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StereoTarget {
    Left,
    Right,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraTag {
    #[default]
    Untagged,
    /// Primary output camera
    MainCamera,
}

/// A render camera as seen by the rig; rendering itself happens elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub stereo_target: StereoTarget,
    pub enabled: bool,
    pub tag: CameraTag,
}

impl Camera {
    /// A freshly added camera: enabled, untagged.
    pub fn new(stereo_target: StereoTarget) -> Self {
        Self {
            stereo_target,
            enabled: true,
            tag: CameraTag::Untagged,
        }
    }

    pub fn with_tag(mut self, tag: CameraTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
