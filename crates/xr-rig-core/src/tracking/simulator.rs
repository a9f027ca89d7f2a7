//! Deterministic pose source for development without tracking hardware.

use super::{Eye, Hand, PoseSource};
use crate::spatial::{Point3D, Pose, Quaternion, Vector3D};

/// Typical adult interpupillary distance in meters.
const DEFAULT_IPD: f32 = 0.064;
/// Standing eye height in meters.
const DEFAULT_HEAD_HEIGHT: f32 = 1.6;
/// Head sway frequency in radians per second.
const SWAY_RATE: f32 = 1.5;

/// Simulates a headset, tracker and two controllers.
///
/// Eye poses are derived from the head pose and the IPD unless overridden.
/// `advance` drives an optional yaw sway so that successive frames differ.
#[derive(Debug, Clone)]
pub struct SimulatedPoseSource {
    head: Pose,
    tracker: Pose,
    left_hand: Pose,
    right_hand: Pose,
    eye_overrides: [Option<Pose>; 3],
    ipd: f32,
    monoscopic: bool,
    sway_amplitude: f32,
    elapsed: f32,
}

impl Default for SimulatedPoseSource {
    fn default() -> Self {
        Self {
            head: Pose::new(
                Point3D::new(0.0, DEFAULT_HEAD_HEIGHT, 0.0),
                Quaternion::IDENTITY,
            ),
            tracker: Pose::new(
                Point3D::new(0.0, 1.2, 2.0),
                Quaternion::from_axis_angle(Vector3D::UP, std::f32::consts::PI),
            ),
            left_hand: Pose::new(Point3D::new(-0.2, 1.1, 0.3), Quaternion::IDENTITY),
            right_hand: Pose::new(Point3D::new(0.2, 1.1, 0.3), Quaternion::IDENTITY),
            eye_overrides: [None; 3],
            ipd: DEFAULT_IPD,
            monoscopic: false,
            sway_amplitude: 0.0,
            elapsed: 0.0,
        }
    }
}

impl SimulatedPoseSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_head_pose(mut self, pose: Pose) -> Self {
        self.head = pose;
        self
    }

    pub fn with_monoscopic(mut self, monoscopic: bool) -> Self {
        self.monoscopic = monoscopic;
        self
    }

    pub fn with_ipd(mut self, ipd: f32) -> Self {
        self.ipd = ipd;
        self
    }

    /// Peak head yaw in radians applied by `advance`.
    pub fn with_sway(mut self, amplitude: f32) -> Self {
        self.sway_amplitude = amplitude;
        self
    }

    pub fn set_head_pose(&mut self, pose: Pose) {
        self.head = pose;
    }

    pub fn set_tracker_pose(&mut self, pose: Pose) {
        self.tracker = pose;
    }

    pub fn set_hand_pose(&mut self, hand: Hand, pose: Pose) {
        match hand {
            Hand::Left => self.left_hand = pose,
            Hand::Right => self.right_hand = pose,
        }
    }

    /// Pin an eye to an explicit pose instead of deriving it from the head.
    pub fn set_eye_pose(&mut self, eye: Eye, pose: Pose) {
        self.eye_overrides[eye_slot(eye)] = Some(pose);
    }

    pub fn clear_eye_overrides(&mut self) {
        self.eye_overrides = [None; 3];
    }

    pub fn set_monoscopic(&mut self, monoscopic: bool) {
        self.monoscopic = monoscopic;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance simulated time by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    fn swayed_head(&self) -> Pose {
        if self.sway_amplitude == 0.0 {
            return self.head;
        }
        let yaw = self.sway_amplitude * (self.elapsed * SWAY_RATE).sin();
        Pose::new(
            self.head.position,
            self.head.orientation * Quaternion::from_axis_angle(Vector3D::UP, yaw),
        )
    }
}

fn eye_slot(eye: Eye) -> usize {
    match eye {
        Eye::Left => 0,
        Eye::Center => 1,
        Eye::Right => 2,
    }
}

impl PoseSource for SimulatedPoseSource {
    fn tracker_pose(&self) -> Pose {
        self.tracker
    }

    fn head_pose(&self) -> Pose {
        self.swayed_head()
    }

    fn eye_pose(&self, eye: Eye) -> Pose {
        if let Some(pose) = self.eye_overrides[eye_slot(eye)] {
            return pose;
        }
        let head = self.swayed_head();
        let half_ipd = self.ipd * 0.5;
        match eye {
            Eye::Left => head.offset_local(Vector3D::RIGHT * -half_ipd),
            Eye::Center => head,
            Eye::Right => head.offset_local(Vector3D::RIGHT * half_ipd),
        }
    }

    fn hand_pose(&self, hand: Hand) -> Pose {
        match hand {
            Hand::Left => self.left_hand,
            Hand::Right => self.right_hand,
        }
    }

    fn is_monoscopic(&self) -> bool {
        self.monoscopic
    }
}
