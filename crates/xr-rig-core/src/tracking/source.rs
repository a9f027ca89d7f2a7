use serde::{Deserialize, Serialize};

use crate::spatial::Pose;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eye {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Left,
    Right,
}

/// Live tracking-space poses, local to the tracking origin.
///
/// Implementations are assumed to always have data once tracking is up, so
/// none of the queries can fail.
pub trait PoseSource {
    /// Pose of the standalone positional tracker.
    fn tracker_pose(&self) -> Pose;

    /// Pose of the head, used to relate tracking space to world space.
    fn head_pose(&self) -> Pose;

    fn eye_pose(&self, eye: Eye) -> Pose;

    fn hand_pose(&self, hand: Hand) -> Pose;

    /// When true both eyes render the center-eye view.
    fn is_monoscopic(&self) -> bool;
}

impl<T: PoseSource + ?Sized> PoseSource for Box<T> {
    fn tracker_pose(&self) -> Pose {
        (**self).tracker_pose()
    }

    fn head_pose(&self) -> Pose {
        (**self).head_pose()
    }

    fn eye_pose(&self, eye: Eye) -> Pose {
        (**self).eye_pose(eye)
    }

    fn hand_pose(&self, hand: Hand) -> Pose {
        (**self).hand_pose(hand)
    }

    fn is_monoscopic(&self) -> bool {
        (**self).is_monoscopic()
    }
}
