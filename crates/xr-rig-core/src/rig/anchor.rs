//! Anchor identities and canonical naming

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lookup::LookupStrategy;
use crate::scene::{NodeId, StereoTarget};
use crate::tracking::{Eye, Hand};

/// Name of the node every tracked anchor hangs off.
pub const TRACKING_SPACE_NAME: &str = "TrackingSpace";

const FULL_LOOKUP: &[LookupStrategy] = &[
    LookupStrategy::QualifiedPath,
    LookupStrategy::BareName,
    LookupStrategy::LegacyName,
];
const CURRENT_NAMES: &[LookupStrategy] = &[LookupStrategy::QualifiedPath, LookupStrategy::BareName];
const ROOT_CHILD: &[LookupStrategy] = &[LookupStrategy::BareName];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorKind {
    TrackingSpace,
    Tracker,
    LeftEye,
    CenterEye,
    RightEye,
    LeftHand,
    RightHand,
}

impl AnchorKind {
    pub const ALL: [AnchorKind; 7] = [
        AnchorKind::TrackingSpace,
        AnchorKind::LeftEye,
        AnchorKind::CenterEye,
        AnchorKind::RightEye,
        AnchorKind::LeftHand,
        AnchorKind::RightHand,
        AnchorKind::Tracker,
    ];

    /// Children of the tracking space, in resolution order.
    pub const TRACKED: [AnchorKind; 6] = [
        AnchorKind::LeftEye,
        AnchorKind::CenterEye,
        AnchorKind::RightEye,
        AnchorKind::LeftHand,
        AnchorKind::RightHand,
        AnchorKind::Tracker,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnchorKind::TrackingSpace => TRACKING_SPACE_NAME,
            AnchorKind::Tracker => "TrackerAnchor",
            AnchorKind::LeftEye => "LeftEyeAnchor",
            AnchorKind::CenterEye => "CenterEyeAnchor",
            AnchorKind::RightEye => "RightEyeAnchor",
            AnchorKind::LeftHand => "LeftHandAnchor",
            AnchorKind::RightHand => "RightHandAnchor",
        }
    }

    /// Flat name used by older rigs, eye anchors only.
    pub fn legacy_name(self) -> Option<&'static str> {
        match self {
            AnchorKind::LeftEye => Some("CameraLeftEye"),
            AnchorKind::CenterEye => Some("CameraCenterEye"),
            AnchorKind::RightEye => Some("CameraRightEye"),
            _ => None,
        }
    }

    /// Lookup strategies in priority order.
    pub fn lookup_strategies(self) -> &'static [LookupStrategy] {
        match self {
            AnchorKind::TrackingSpace => ROOT_CHILD,
            AnchorKind::LeftEye | AnchorKind::CenterEye | AnchorKind::RightEye => FULL_LOOKUP,
            AnchorKind::Tracker | AnchorKind::LeftHand | AnchorKind::RightHand => CURRENT_NAMES,
        }
    }

    pub fn eye(self) -> Option<Eye> {
        match self {
            AnchorKind::LeftEye => Some(Eye::Left),
            AnchorKind::CenterEye => Some(Eye::Center),
            AnchorKind::RightEye => Some(Eye::Right),
            _ => None,
        }
    }

    pub fn hand(self) -> Option<Hand> {
        match self {
            AnchorKind::LeftHand => Some(Hand::Left),
            AnchorKind::RightHand => Some(Hand::Right),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            AnchorKind::TrackingSpace => 0,
            AnchorKind::LeftEye => 1,
            AnchorKind::CenterEye => 2,
            AnchorKind::RightEye => 3,
            AnchorKind::LeftHand => 4,
            AnchorKind::RightHand => 5,
            AnchorKind::Tracker => 6,
        }
    }
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Node handles of a fully built hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAnchors {
    pub tracking_space: NodeId,
    pub tracker: NodeId,
    pub left_eye: NodeId,
    pub center_eye: NodeId,
    pub right_eye: NodeId,
    pub left_hand: NodeId,
    pub right_hand: NodeId,
}

impl ResolvedAnchors {
    pub fn get(&self, kind: AnchorKind) -> NodeId {
        match kind {
            AnchorKind::TrackingSpace => self.tracking_space,
            AnchorKind::Tracker => self.tracker,
            AnchorKind::LeftEye => self.left_eye,
            AnchorKind::CenterEye => self.center_eye,
            AnchorKind::RightEye => self.right_eye,
            AnchorKind::LeftHand => self.left_hand,
            AnchorKind::RightHand => self.right_hand,
        }
    }

    pub fn eyes(&self) -> EyeAnchors {
        EyeAnchors {
            left: self.left_eye,
            center: self.center_eye,
            right: self.right_eye,
        }
    }
}

/// The three anchors that carry cameras.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeAnchors {
    pub left: NodeId,
    pub center: NodeId,
    pub right: NodeId,
}

impl EyeAnchors {
    /// Each eye anchor paired with the stereo target its camera renders.
    pub fn bindings(&self) -> [(NodeId, StereoTarget); 3] {
        [
            (self.center, StereoTarget::Both),
            (self.left, StereoTarget::Left),
            (self.right, StereoTarget::Right),
        ]
    }
}
