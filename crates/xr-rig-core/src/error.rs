//! Error types for rig operations.

use crate::rig::AnchorKind;
use crate::scene::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RigError {
    #[error("{0} is required but missing from the scene")]
    MissingAnchor(AnchorKind),

    #[error("Scene node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("Cannot parent {child} under {parent}: it would create a cycle")]
    ParentCycle { child: NodeId, parent: NodeId },
}

pub type Result<T> = std::result::Result<T, RigError>;
