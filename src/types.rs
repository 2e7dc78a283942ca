//! Shared identifiers and the lifecycle state enumeration.

use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric identity of a cluster version directory entry.
pub type ClusterVersionId = i64;

/// Where a node (or a cluster version) stands in an install/upgrade rollout.
///
/// The enumeration is closed. Anything that needs one slot per state must
/// iterate [`LifecycleState::ALL`] so that adding a state is a single change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// Packages for the version are being installed.
    Installing,
    /// Installed but not the active version.
    Installed,
    /// Installed and actively running.
    Current,
    /// Installation failed.
    InstallFailed,
    /// Not reconciled with the rest of the cluster.
    OutOfSync,
}

impl LifecycleState {
    /// Every member, in declaration order.
    pub const ALL: [LifecycleState; 5] = [
        LifecycleState::Installing,
        LifecycleState::Installed,
        LifecycleState::Current,
        LifecycleState::InstallFailed,
        LifecycleState::OutOfSync,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Installing => "INSTALLING",
            LifecycleState::Installed => "INSTALLED",
            LifecycleState::Current => "CURRENT",
            LifecycleState::InstallFailed => "INSTALL_FAILED",
            LifecycleState::OutOfSync => "OUT_OF_SYNC",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleState {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LifecycleState::ALL
            .iter()
            .copied()
            .find(|state| state.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::InvalidArgument(format!("Unknown lifecycle state: {}", s)))
    }
}
