//! xr-rig-core: head-tracked stereo camera rig
//!
//! This crate provides:
//! - A self-healing anchor hierarchy (tracking space, eyes, hands, tracker)
//! - Stereo camera setup with shared or per-eye rendering
//! - Pose synchronization from a pluggable tracking source, with a
//!   stale-frame guard around start-up and camera-mode switches
//! - The tracking-to-world reference matrix
//! - A change notifier fired after every live synchronization

pub mod error;
pub mod rig;
pub mod scene;
pub mod spatial;
pub mod tracking;

pub use error::{Result, RigError};
pub use rig::{
    AnchorKind, AnchorState, CameraRig, ChangeNotifier, FrameDriver, FrameReport, FrameState,
    IntegrityReport, StaleReason, SubscriptionId, SyncOutcome,
};
pub use scene::{Camera, CameraTag, NodeId, SceneGraph, StereoTarget};
pub use spatial::{Matrix4, Point3D, Pose, Quaternion, Transform, Vector3D};
pub use tracking::{Eye, Hand, PoseSource, SimulatedPoseSource};
pub use xr_rig_config::{IntegrityPolicy, RigConfiguration, SimulationConfig};
