//! The camera rig: anchor hierarchy, stereo cameras and pose synchronization

mod anchor;
mod camera_rig;
mod driver;
mod hierarchy;
mod lookup;
mod notifier;
mod reference;
mod stereo;
mod sync;

pub use anchor::{AnchorKind, EyeAnchors, ResolvedAnchors, TRACKING_SPACE_NAME};
pub use camera_rig::{AnchorState, CameraRig, EyeCamera, IntegrityReport, DEFAULT_RIG_NAME};
pub use driver::{FrameDriver, FrameReport};
pub use hierarchy::{AnchorHierarchy, Resolution};
pub use lookup::{resolve, LookupStrategy};
pub use notifier::{ChangeNotifier, SubscriptionId};
pub use reference::tracking_reference_matrix;
pub use stereo::{attach_cameras, reconcile_cameras, CameraEnableState, ModeTransition};
pub use sync::{apply_poses, freeze_eyes, FrameState, StaleReason, SyncOutcome};
