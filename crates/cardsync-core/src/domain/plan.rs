//! Synchronization plans
//!
//! A plan is the planner's verdict for one run: either nothing to do, or a
//! contiguous range of date folders `[start_folder, latest]` to re-fetch.

use serde::{Deserialize, Serialize};

use super::newtypes::DateFolder;

/// Why a plan requires a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTrigger {
    /// First run, nothing synchronized before
    InitialSync,
    /// Folders newer than the last synchronized one appeared
    NewFolders,
    /// The last synchronized folder was modified in place
    LastFolderChanged,
    /// A start date was supplied manually
    Override,
}

impl std::fmt::Display for PlanTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlanTrigger::InitialSync => "initial_sync",
            PlanTrigger::NewFolders => "new_folders",
            PlanTrigger::LastFolderChanged => "last_folder_changed",
            PlanTrigger::Override => "override",
        };
        write!(f, "{}", s)
    }
}

/// A transfer the executor has to carry out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSync {
    /// First folder of the re-fetched range
    pub start_folder: DateFolder,
    /// Every remote folder `>= start_folder`, ascending
    pub folders_to_fetch: Vec<DateFolder>,
    /// True when the last synchronized folder is fetched again in full
    /// (manual override or detected in-place mutation)
    pub forced_redownload_of_last: bool,
    pub trigger: PlanTrigger,
}

impl PlannedSync {
    /// Most recent folder in the range, if any
    pub fn latest(&self) -> Option<&DateFolder> {
        self.folders_to_fetch.last()
    }

    /// Returns true if the range is empty (override past every remote folder)
    pub fn is_empty(&self) -> bool {
        self.folders_to_fetch.is_empty()
    }
}

/// Output of the planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncPlan {
    /// Nothing new and nothing changed: skip every side effect
    NoOp,
    /// Re-fetch and transfer a range of folders
    Execute(PlannedSync),
}

impl SyncPlan {
    /// Returns true for [`SyncPlan::NoOp`]
    pub fn is_noop(&self) -> bool {
        matches!(self, SyncPlan::NoOp)
    }

    /// The planned transfer, if any
    pub fn planned(&self) -> Option<&PlannedSync> {
        match self {
            SyncPlan::NoOp => None,
            SyncPlan::Execute(planned) => Some(planned),
        }
    }
}
