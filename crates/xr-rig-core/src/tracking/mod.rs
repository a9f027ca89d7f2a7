//! Tracking data consumed by the rig
//!
//! Hardware access stays behind [`PoseSource`]; the rig receives an
//! implementation at construction instead of looking one up globally.

mod simulator;
mod source;

pub use simulator::SimulatedPoseSource;
pub use source::{Eye, Hand, PoseSource};
