/******************************************************************************
   Author: Hub Sync Contributors
   Date: 19/10/26
******************************************************************************/

//! Membership reconciliation between GitLab and Hub/Upsource
//!
//! The desired state (GitLab group and project members, by login) is an
//! input; fetching it is the caller's business. Each reconciliation diffs the
//! desired members against what Hub currently holds and pushes the delta.
//! Logins unknown to Hub are skipped.

use crate::application::interfaces::{HubService, UpsourceService};
use crate::constants::{GLOBAL_PROJECT_ID, GLOBAL_PROJECT_NAME, TEAM_SUFFIX};
use crate::error::{AppError, AppResult};
use crate::model::hub::{EntityRef, HubProject, HubUser, ProjectRole, Resource, Role, UserGroup};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Logins to add and to remove so that `existing` becomes `desired`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDelta {
    /// In `desired` but not in `existing`, sorted
    pub to_add: Vec<String>,
    /// In `existing` but not in `desired`, sorted
    pub to_remove: Vec<String>,
}

impl MembershipDelta {
    /// Set difference in both directions; duplicates collapse
    pub fn between<D, E>(desired: D, existing: E) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let desired: BTreeSet<String> = desired.into_iter().map(|s| s.as_ref().to_string()).collect();
        let existing: BTreeSet<String> =
            existing.into_iter().map(|s| s.as_ref().to_string()).collect();

        Self {
            to_add: desired.difference(&existing).cloned().collect(),
            to_remove: existing.difference(&desired).cloned().collect(),
        }
    }

    /// Drops from `to_add` every login in `covered`
    #[must_use]
    pub fn without_additions<C>(mut self, covered: C) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let covered: BTreeSet<String> = covered.into_iter().map(|s| s.as_ref().to_string()).collect();
        self.to_add.retain(|login| !covered.contains(login));
        self
    }

    /// Whether nothing needs to change
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Hub project key for a GitLab project path: `/` and `.` become `-`
#[must_use]
pub fn hub_project_key(project_path: &str) -> String {
    project_path.replace(['/', '.'], "-")
}

/// Hub team name of a GitLab group
#[must_use]
pub fn team_name(group: &str) -> String {
    format!("{group}{TEAM_SUFFIX}")
}

/// GitLab group of a project path, the part before the first `/`
#[must_use]
pub fn group_of(project_path: &str) -> &str {
    project_path.split('/').next().unwrap_or(project_path)
}

/// One change pushed (or skipped) by a reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// A team was created
    CreatedTeam { team: String },
    /// A user joined a team
    AddedToTeam { team: String, login: String },
    /// A user left a team
    RemovedFromTeam { team: String, login: String },
    /// A Hub project was created
    CreatedProject { key: String },
    /// A team was granted the developer role in a project
    LinkedTeam { project: String, team: String },
    /// A user was granted the developer role in a project
    AddedDeveloper { project: String, login: String },
    /// A user lost the developer role in a project
    RemovedDeveloper { project: String, login: String },
    /// A login had no Hub account
    SkippedUnknownUser { login: String },
}

/// Actions taken by one reconciliation, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Actions in the order they were applied
    pub actions: Vec<SyncAction>,
}

impl SyncReport {
    fn push(&mut self, action: SyncAction) {
        self.actions.push(action);
    }

    /// Appends every action of `other`
    pub fn merge(&mut self, other: SyncReport) {
        self.actions.extend(other.actions);
    }

    /// Whether nothing happened
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of actions matching `predicate`
    pub fn count(&self, predicate: impl Fn(&SyncAction) -> bool) -> usize {
        self.actions.iter().filter(|a| predicate(a)).count()
    }
}

/// Maps user logins to Hub user ids
pub fn index_users(users: &[HubUser]) -> HashMap<String, String> {
    users
        .iter()
        .filter_map(|u| Some((u.login.clone()?, u.id.clone()?)))
        .collect()
}

/// Maps user group names to ids
pub fn index_user_groups(groups: &[UserGroup]) -> HashMap<String, String> {
    groups
        .iter()
        .filter_map(|g| Some((g.name.clone()?, g.id.clone()?)))
        .collect()
}

/// Maps project keys to ids
pub fn index_projects(projects: &[HubProject]) -> HashMap<String, String> {
    projects
        .iter()
        .filter_map(|p| Some((p.key.clone()?, p.id.clone()?)))
        .collect()
}

/// Maps resource keys to resources
pub fn index_resources(resources: &[Resource]) -> HashMap<String, Resource> {
    resources
        .iter()
        .filter_map(|r| Some((r.key.clone()?, r.clone())))
        .collect()
}

/// Makes the Hub team of `group` hold exactly the known logins of `desired`
///
/// A missing team is created in the global project and `user_groups` is
/// updated with its id.
///
/// # Arguments
/// * `hub` - Hub service
/// * `group` - GitLab group name, the team is `<group>-team`
/// * `desired` - logins of the group's GitLab members
/// * `hub_users` - Hub user ids by login
/// * `user_groups` - Hub user group ids by name
pub async fn reconcile_team<H: HubService + ?Sized>(
    hub: &H,
    group: &str,
    desired: &[String],
    hub_users: &HashMap<String, String>,
    user_groups: &mut HashMap<String, String>,
) -> AppResult<SyncReport> {
    let team = team_name(group);
    let mut report = SyncReport::default();

    let (group_id, delta) = match user_groups.get(&team) {
        Some(group_id) => {
            let members = hub
                .list_users_of_user_group(group_id, Some("login"))
                .await?;
            let existing = members.into_iter().filter_map(|u| u.login);
            (group_id.clone(), MembershipDelta::between(desired, existing))
        }
        None => {
            let new_group = UserGroup {
                id: None,
                name: Some(team.clone()),
                project: Some(EntityRef::named(GLOBAL_PROJECT_ID, GLOBAL_PROJECT_NAME)),
            };
            let created = hub.create_user_group(&new_group, Some("id")).await?;
            let group_id = created.id.ok_or_else(|| {
                AppError::Deserialization(format!("created group {team} has no id"))
            })?;
            user_groups.insert(team.clone(), group_id.clone());
            info!("Created team {}", team);
            report.push(SyncAction::CreatedTeam { team: team.clone() });
            (group_id, MembershipDelta::between(desired, Vec::<String>::new()))
        }
    };

    debug!(
        "Team {}: {} to add, {} to remove",
        team,
        delta.to_add.len(),
        delta.to_remove.len()
    );

    for login in delta.to_add {
        let Some(user_id) = hub_users.get(&login) else {
            warn!("No Hub user for {}, not adding to {}", login, team);
            report.push(SyncAction::SkippedUnknownUser { login });
            continue;
        };
        let user = hub.get_user(user_id, None).await?;
        hub.add_user_to_user_group(&group_id, &user).await?;
        info!("Added {} to {}", login, team);
        report.push(SyncAction::AddedToTeam {
            team: team.clone(),
            login,
        });
    }

    for login in delta.to_remove {
        let Some(user_id) = hub_users.get(&login) else {
            warn!("No Hub user for {}, not removing from {}", login, team);
            report.push(SyncAction::SkippedUnknownUser { login });
            continue;
        };
        hub.remove_user_from_user_group(&group_id, user_id).await?;
        info!("Removed {} from {}", login, team);
        report.push(SyncAction::RemovedFromTeam {
            team: team.clone(),
            login,
        });
    }

    Ok(report)
}

/// Everything [`reconcile_project`] needs besides the services
#[derive(Debug, Clone, Default)]
pub struct ProjectSyncContext {
    /// Hub user ids by login
    pub hub_users: HashMap<String, String>,
    /// Hub project ids by key
    pub hub_projects: HashMap<String, String>,
    /// Hub resources by key
    pub resources: HashMap<String, Resource>,
    /// Hub user group ids by name
    pub user_groups: HashMap<String, String>,
    /// Role granted to developers and to group teams
    pub developer_role: Role,
    /// GitLab group members by group name
    pub group_members: HashMap<String, Vec<String>>,
    /// GitLab project members by project path
    pub project_members: HashMap<String, Vec<String>>,
}

impl ProjectSyncContext {
    /// Loads users, user groups, projects and resources from Hub
    pub async fn load<H: HubService + ?Sized>(
        hub: &H,
        developer_role: Role,
        group_members: HashMap<String, Vec<String>>,
        project_members: HashMap<String, Vec<String>>,
    ) -> AppResult<Self> {
        let users = hub.list_users(Some("login,id")).await?;
        let groups = hub.list_user_groups(Some("name,id")).await?;
        let projects = hub.list_projects(Some("id,key")).await?;
        let resources = hub.list_resources(Some("id,key,name")).await?;

        info!(
            "Loaded {} users, {} groups, {} projects, {} resources from Hub",
            users.len(),
            groups.len(),
            projects.len(),
            resources.len()
        );

        Ok(Self {
            hub_users: index_users(&users),
            hub_projects: index_projects(&projects),
            resources: index_resources(&resources),
            user_groups: index_user_groups(&groups),
            developer_role,
            group_members,
            project_members,
        })
    }
}

/// Aligns the Hub project of an Upsource project with GitLab
///
/// The Hub project keyed [`hub_project_key`] is created when missing and
/// linked to the group team. Then project members who are not already
/// covered by the team get the developer role through Upsource, and
/// developers who left the GitLab project lose it. A project with no
/// GitLab member list loses every developer.
pub async fn reconcile_project<H, U>(
    hub: &H,
    upsource: &U,
    project_path: &str,
    ctx: &mut ProjectSyncContext,
) -> AppResult<SyncReport>
where
    H: HubService + ?Sized,
    U: UpsourceService + ?Sized,
{
    let key = hub_project_key(project_path);
    let group = group_of(project_path);
    let team = team_name(group);
    let team_id = ctx
        .user_groups
        .get(&team)
        .cloned()
        .ok_or_else(|| AppError::InvalidInput(format!("no Hub team {team} for {project_path}")))?;

    let mut report = SyncReport::default();

    let existing_developers = match ctx.hub_projects.get(&key).cloned() {
        None => {
            let resource = ctx
                .resources
                .get(&key)
                .cloned()
                .ok_or_else(|| AppError::InvalidInput(format!("no Hub resource {key}")))?;
            let created = hub
                .create_project(&key, project_path, &[resource], Some("id"))
                .await?;
            let project_id = created.id.ok_or_else(|| {
                AppError::Deserialization(format!("created project {key} has no id"))
            })?;
            ctx.hub_projects.insert(key.clone(), project_id.clone());
            info!("Created project {}", key);
            report.push(SyncAction::CreatedProject { key: key.clone() });

            let team_roles = hub
                .list_project_roles_of_user_group(&team_id, Some("project"))
                .await?;
            let linked = team_roles
                .iter()
                .filter_map(|r| r.project.as_ref())
                .any(|p| p.id == project_id);
            if !linked {
                link_team(hub, &team_id, &project_id, ctx, &mut report, &key, &team).await?;
            }
            Vec::new()
        }
        Some(project_id) => {
            let roles = hub
                .list_transitive_project_roles(&project_id, Some("owner,role"))
                .await?;
            let linked = roles
                .iter()
                .filter_map(|r| r.owner.as_ref())
                .any(|o| o.id == team_id);
            if !linked {
                link_team(hub, &team_id, &project_id, ctx, &mut report, &key, &team).await?;
            }
            developers(&roles, &ctx.developer_role)
        }
    };

    let covered_by_team = ctx.group_members.get(group).cloned().unwrap_or_default();
    let delta = match ctx.project_members.get(project_path) {
        Some(desired) => MembershipDelta::between(desired, &existing_developers)
            .without_additions(&covered_by_team),
        None => MembershipDelta::between(Vec::<String>::new(), &existing_developers),
    };

    debug!(
        "Project {}: {} developers to add, {} to remove",
        key,
        delta.to_add.len(),
        delta.to_remove.len()
    );

    for login in delta.to_add {
        let Some(user_id) = ctx.hub_users.get(&login) else {
            warn!("No Hub user for {}, not adding to {}", login, key);
            report.push(SyncAction::SkippedUnknownUser { login });
            continue;
        };
        upsource.add_user_to_project(&key, user_id).await?;
        report.push(SyncAction::AddedDeveloper {
            project: key.clone(),
            login,
        });
    }

    for login in delta.to_remove {
        let Some(user_id) = ctx.hub_users.get(&login) else {
            warn!("No Hub user for {}, not removing from {}", login, key);
            report.push(SyncAction::SkippedUnknownUser { login });
            continue;
        };
        upsource.delete_user_from_project(&key, user_id).await?;
        report.push(SyncAction::RemovedDeveloper {
            project: key.clone(),
            login,
        });
    }

    Ok(report)
}

async fn link_team<H: HubService + ?Sized>(
    hub: &H,
    team_id: &str,
    project_id: &str,
    ctx: &ProjectSyncContext,
    report: &mut SyncReport,
    key: &str,
    team: &str,
) -> AppResult<()> {
    let grant = ProjectRole::grant(project_id, ctx.developer_role.clone());
    hub.add_project_role_to_user_group(team_id, &grant).await?;
    info!("Linked project {} to team {}", key, team);
    report.push(SyncAction::LinkedTeam {
        project: key.to_string(),
        team: team.to_string(),
    });
    Ok(())
}

/// Logins holding `role` directly; group owners have no login and are ignored
fn developers(roles: &[ProjectRole], role: &Role) -> Vec<String> {
    roles
        .iter()
        .filter(|r| r.role.as_ref().is_some_and(|granted| granted.id == role.id))
        .filter_map(|r| r.owner.as_ref().and_then(|o| o.login.clone()))
        .collect()
}
