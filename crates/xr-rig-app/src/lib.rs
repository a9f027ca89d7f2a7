//! Headless rig simulation
//!
//! Drives a [`CameraRig`] with a [`SimulatedPoseSource`] for a fixed number
//! of frames and reports what happened.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};
use xr_rig_config::AppConfig;
use xr_rig_core::{
    AnchorKind, AnchorState, CameraRig, FrameDriver, Matrix4, SimulatedPoseSource, SyncOutcome,
};

/// How a simulation run is set up.
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub config: AppConfig,
    pub frames: u64,
    pub frame_duration: Duration,
    /// Flip between shared and per-eye cameras every N frames.
    pub toggle_every: Option<u64>,
    /// Sleep between frames instead of running as fast as possible.
    pub realtime: bool,
    pub monoscopic: bool,
    /// Head yaw sway amplitude in radians.
    pub sway: f32,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            frames: 90,
            frame_duration: Duration::from_micros(11_111),
            toggle_every: None,
            realtime: false,
            monoscopic: false,
            sway: 0.2,
        }
    }
}

/// Result of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub frames: u64,
    pub fixed_steps: u64,
    pub synchronized: u64,
    pub frozen: u64,
    pub notifications: u64,
    pub mode_switches: u64,
    pub anchors: Vec<AnchorState>,
    pub reference_matrix: Matrix4,
}

pub async fn run(options: SimulationOptions) -> Result<SimulationSummary> {
    options.config.validate()?;

    let source = SimulatedPoseSource::new()
        .with_monoscopic(options.monoscopic)
        .with_sway(options.sway);
    let mut rig = CameraRig::new(source, options.config.rig);
    let mut driver = FrameDriver::new(&options.config.simulation)?;

    let notifications = Rc::new(Cell::new(0u64));
    {
        let notifications = Rc::clone(&notifications);
        rig.on_anchors_updated(move |rig: &CameraRig<SimulatedPoseSource>| {
            notifications.set(notifications.get() + 1);
            if let Some(center) = rig.anchor_transform(AnchorKind::CenterEye) {
                debug!(position = ?center.position, "Anchors updated");
            }
        });
    }

    info!(
        frames = options.frames,
        per_eye = options.config.rig.use_per_eye_cameras,
        fixed_update = options.config.rig.use_fixed_update_for_tracking,
        policy = %options.config.rig.integrity_policy,
        "Starting rig simulation"
    );

    let mut summary = SimulationSummary {
        frames: 0,
        fixed_steps: 0,
        synchronized: 0,
        frozen: 0,
        notifications: 0,
        mode_switches: 0,
        anchors: Vec::new(),
        reference_matrix: Matrix4::IDENTITY,
    };
    tally(&mut summary, driver.start(&mut rig));

    let mut interval = options
        .realtime
        .then(|| tokio::time::interval(options.frame_duration));
    let dt = options.frame_duration.as_secs_f32();

    for frame in 1..=options.frames {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }

        if let Some(every) = options.toggle_every.filter(|n| *n > 0) {
            if frame % every == 0 {
                let per_eye = !rig.config().use_per_eye_cameras;
                info!(frame, per_eye, "Switching camera mode");
                rig.set_use_per_eye_cameras(per_eye);
                summary.mode_switches += 1;
            }
        }

        rig.pose_source_mut().advance(dt);
        let report = driver.frame(&mut rig, options.frame_duration);
        summary.fixed_steps += u64::from(report.fixed_steps);
        for outcome in report.outcomes {
            tally(&mut summary, outcome);
        }
        summary.frames += 1;
    }

    summary.notifications = notifications.get();
    summary.anchors = rig.anchor_snapshot();
    summary.reference_matrix = rig.compute_tracking_reference_matrix();

    info!(
        synchronized = summary.synchronized,
        frozen = summary.frozen,
        "Simulation finished"
    );
    Ok(summary)
}

fn tally(summary: &mut SimulationSummary, outcome: SyncOutcome) {
    if outcome.is_frozen() {
        summary.frozen += 1;
    } else {
        summary.synchronized += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xr_rig_config::RigConfiguration;

    #[tokio::test]
    async fn test_default_run_freezes_first_frame_only() {
        let options = SimulationOptions {
            frames: 10,
            ..Default::default()
        };
        let summary = run(options).await.unwrap();

        assert_eq!(summary.frames, 10);
        assert_eq!(summary.frozen, 1);
        assert_eq!(summary.synchronized, 10);
        assert_eq!(summary.notifications, 10);
        assert_eq!(summary.anchors.len(), 7);
    }

    #[tokio::test]
    async fn test_toggling_mode_adds_frozen_frames() {
        let options = SimulationOptions {
            frames: 12,
            toggle_every: Some(4),
            ..Default::default()
        };
        let summary = run(options).await.unwrap();

        assert_eq!(summary.mode_switches, 3);
        assert_eq!(summary.frozen, 4);
        assert_eq!(summary.synchronized, 9);
        assert_eq!(summary.notifications, summary.synchronized);
    }

    #[tokio::test]
    async fn test_fixed_update_tracking_counts_fixed_steps() {
        let mut config = AppConfig::default();
        config.rig = RigConfiguration::default().with_fixed_update_for_tracking(true);
        let options = SimulationOptions {
            config,
            frames: 9,
            frame_duration: Duration::from_millis(20),
            ..Default::default()
        };
        let summary = run(options).await.unwrap();

        assert!(summary.fixed_steps >= 9);
        assert_eq!(summary.notifications, summary.synchronized);
    }

    #[tokio::test]
    async fn test_summary_serializes() {
        let options = SimulationOptions {
            frames: 2,
            ..Default::default()
        };
        let summary = run(options).await.unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["frames"], 2);
        assert!(json["anchors"].is_array());
    }

    #[tokio::test]
    async fn test_vanishing_timestep_is_rejected() {
        let mut config = AppConfig::default();
        config.simulation.fixed_timestep_secs = 1e-10;
        let options = SimulationOptions {
            config,
            frames: 1,
            ..Default::default()
        };
        assert!(run(options).await.is_err());
    }
}
