//! Configuration for the xr-rig camera rig.
//!
//! Settings are read from TOML. Every field has a default, so an empty file
//! (or no file at all) yields a working single-camera rig:
//!
//! ```toml
//! [rig]
//! use_per_eye_cameras = false
//! use_fixed_update_for_tracking = false
//! integrity_policy = "every_tick"
//!
//! [simulation]
//! fixed_timestep_secs = 0.0111
//! max_fixed_steps_per_frame = 4
//! ```

mod app;
mod error;
mod rig;
mod simulation;

pub use app::AppConfig;
pub use error::{ConfigError, Result};
pub use rig::{IntegrityPolicy, RigConfiguration};
pub use simulation::{SimulationConfig, MIN_FIXED_TIMESTEP_SECS};
