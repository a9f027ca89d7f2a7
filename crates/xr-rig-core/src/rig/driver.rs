//! Engine-style tick loop for a camera rig

use std::time::Duration;

use tracing::{debug, trace};
use xr_rig_config::{ConfigError, SimulationConfig};

use super::camera_rig::CameraRig;
use super::sync::SyncOutcome;
use crate::tracking::PoseSource;

/// What one frame ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Fixed steps executed before the variable-step update.
    pub fixed_steps: u32,
    /// Fixed-step time dropped because the per-frame cap was hit.
    pub dropped_steps: u32,
    /// Synchronizations performed this frame, in order.
    pub outcomes: Vec<SyncOutcome>,
}

/// Drives a rig the way a game loop would.
///
/// `start` runs the initial synchronization. Every `frame` first runs as
/// many fixed steps as the accumulated time allows, then one variable step.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    fixed_timestep: Duration,
    max_fixed_steps: u32,
    accumulator: Duration,
    started: bool,
    frames: u64,
}

impl FrameDriver {
    /// Fails if the timing is invalid or the step would round to zero.
    pub fn new(config: &SimulationConfig) -> xr_rig_config::Result<Self> {
        config.validate()?;
        let fixed_timestep = Duration::try_from_secs_f32(config.fixed_timestep_secs)
            .ok()
            .filter(|step| !step.is_zero())
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "fixed_timestep_secs {} is not a usable step length",
                    config.fixed_timestep_secs
                ))
            })?;

        Ok(Self {
            fixed_timestep,
            max_fixed_steps: config.max_fixed_steps_per_frame,
            accumulator: Duration::ZERO,
            started: false,
            frames: 0,
        })
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Initial synchronization; a freshly built rig freezes here.
    pub fn start<S: PoseSource>(&mut self, rig: &mut CameraRig<S>) -> SyncOutcome {
        self.started = true;
        self.accumulator = Duration::ZERO;
        let outcome = rig.synchronize_once();
        debug!(?outcome, "Rig started");
        outcome
    }

    /// Advance one rendered frame of length `dt`. Starts the rig first if needed.
    pub fn frame<S: PoseSource>(&mut self, rig: &mut CameraRig<S>, dt: Duration) -> FrameReport {
        let mut report = FrameReport::default();
        if !self.started {
            report.outcomes.push(self.start(rig));
        }

        self.accumulator += dt;
        while self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            if report.fixed_steps == self.max_fixed_steps {
                report.dropped_steps += 1;
                continue;
            }
            report.fixed_steps += 1;
            if let Some(outcome) = rig.fixed_update() {
                report.outcomes.push(outcome);
            }
        }

        if let Some(outcome) = rig.update() {
            report.outcomes.push(outcome);
        }

        self.frames += 1;
        trace!(
            frame = self.frames,
            fixed_steps = report.fixed_steps,
            dropped = report.dropped_steps,
            "Frame complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::sync::StaleReason;
    use crate::tracking::SimulatedPoseSource;
    use xr_rig_config::RigConfiguration;

    fn config(step: f32, max: u32) -> SimulationConfig {
        SimulationConfig {
            fixed_timestep_secs: step,
            max_fixed_steps_per_frame: max,
        }
    }

    #[test]
    fn test_first_frame_starts_frozen() {
        let mut rig = CameraRig::new(SimulatedPoseSource::new(), RigConfiguration::default());
        let mut driver = FrameDriver::new(&config(0.01, 4)).unwrap();

        let report = driver.frame(&mut rig, Duration::from_millis(5));
        assert_eq!(report.fixed_steps, 0);
        assert_eq!(
            report.outcomes,
            vec![
                SyncOutcome::Frozen(StaleReason::Initialized),
                SyncOutcome::Synchronized { monoscopic: false },
            ]
        );
        assert!(driver.is_started());
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn test_fixed_steps_are_capped() {
        let rig_config = RigConfiguration::default().with_fixed_update_for_tracking(true);
        let mut rig = CameraRig::new(SimulatedPoseSource::new(), rig_config);
        let mut driver = FrameDriver::new(&config(0.25, 2)).unwrap();
        driver.start(&mut rig);

        let report = driver.frame(&mut rig, Duration::from_secs(1));
        assert_eq!(report.fixed_steps, 2);
        assert_eq!(report.dropped_steps, 2);
        assert_eq!(report.outcomes.len(), 2);

        let report = driver.frame(&mut rig, Duration::from_millis(100));
        assert_eq!(report.fixed_steps, 0);
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_rejects_unusable_timesteps() {
        for step in [1e-10, 0.0, -0.5, f32::NAN, f32::INFINITY] {
            assert!(
                FrameDriver::new(&config(step, 4)).is_err(),
                "accepted fixed step {step}"
            );
        }
        assert!(FrameDriver::new(&config(0.01, 0)).is_err());
    }

    #[test]
    fn test_smallest_valid_step_terminates() {
        let rig_config = RigConfiguration::default().with_fixed_update_for_tracking(true);
        let mut rig = CameraRig::new(SimulatedPoseSource::new(), rig_config);
        let mut driver =
            FrameDriver::new(&config(xr_rig_config::MIN_FIXED_TIMESTEP_SECS, 4)).unwrap();

        let report = driver.frame(&mut rig, Duration::from_millis(11));
        assert_eq!(report.fixed_steps, 4);
        assert!(report.dropped_steps > 100);
    }
}
