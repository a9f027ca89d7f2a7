//! Rig behavior flags

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How often the anchor hierarchy is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityPolicy {
    /// Reset parent, scale, position and rotation of every anchor on each
    /// integrity check, repairing any external scene mutation.
    #[default]
    EveryTick,
    /// Normalize an anchor only when it is first resolved (or re-resolved
    /// after being deleted). Camera reconciliation still runs every check.
    Once,
}

impl IntegrityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrityPolicy::EveryTick => "every_tick",
            IntegrityPolicy::Once => "once",
        }
    }
}

impl fmt::Display for IntegrityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrityPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "every_tick" => Ok(IntegrityPolicy::EveryTick),
            "once" => Ok(IntegrityPolicy::Once),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Flags read by the rig on every tick.
///
/// All fields may be changed at any time; a change to `use_per_eye_cameras`
/// takes effect on the next integrity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfiguration {
    /// Render each eye with its own camera instead of one shared center camera.
    pub use_per_eye_cameras: bool,
    /// Synchronize anchors on the fixed-step tick instead of the variable-step tick.
    pub use_fixed_update_for_tracking: bool,
    /// Hierarchy normalization frequency.
    pub integrity_policy: IntegrityPolicy,
}

impl RigConfiguration {
    pub fn with_per_eye_cameras(mut self, enabled: bool) -> Self {
        self.use_per_eye_cameras = enabled;
        self
    }

    pub fn with_fixed_update_for_tracking(mut self, enabled: bool) -> Self {
        self.use_fixed_update_for_tracking = enabled;
        self
    }

    pub fn with_integrity_policy(mut self, policy: IntegrityPolicy) -> Self {
        self.integrity_policy = policy;
        self
    }
}
