//! xr-rig: head-tracked stereo camera rig
//!
//! Facade over the workspace crates. Most users only need [`CameraRig`]
//! and a [`PoseSource`] implementation.

pub use xr_rig_config::{AppConfig, ConfigError};
pub use xr_rig_core::{error, rig, scene, spatial, tracking};
pub use xr_rig_core::{
    AnchorKind, CameraRig, FrameDriver, IntegrityPolicy, Matrix4, PoseSource, RigConfiguration,
    RigError, SimulatedPoseSource, SimulationConfig, SyncOutcome,
};
