/// Membership reconciliation between GitLab and Hub/Upsource
pub mod sync;

pub use sync::{
    MembershipDelta, ProjectSyncContext, SyncAction, SyncReport, reconcile_project,
    reconcile_team,
};
