use async_trait::async_trait;
use hub_sync::application::interfaces::{HubService, UpsourceService};
use hub_sync::error::{AppError, ResponseError};
use hub_sync::model::hub::{HubProject, HubUser, ProjectRole, Resource, Role, RoleOwner, UserGroup};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;

pub fn user(id: &str, login: &str) -> HubUser {
    HubUser {
        id: Some(id.to_string()),
        login: Some(login.to_string()),
        ..Default::default()
    }
}

pub fn developer_role() -> Role {
    Role {
        id: "r-dev".to_string(),
        key: Some("developer".to_string()),
        name: Some("Developer".to_string()),
    }
}

/// Role of `owner_id` in a project; `login` is `None` for group owners
pub fn held_role(owner_id: &str, login: Option<&str>, role: Role) -> ProjectRole {
    ProjectRole {
        id: None,
        project: None,
        role: Some(role),
        owner: Some(RoleOwner {
            id: owner_id.to_string(),
            login: login.map(str::to_string),
            name: None,
        }),
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn not_found() -> AppError {
    ResponseError::from_status(StatusCode::NOT_FOUND)
        .expect("404 is a failure")
        .into()
}

/// In-memory Hub recording every write
#[derive(Default)]
pub struct FakeHub {
    pub users: Vec<HubUser>,
    pub groups: Mutex<Vec<UserGroup>>,
    /// Member logins by group id
    pub members: Mutex<HashMap<String, Vec<String>>>,
    /// Project roles by group id
    pub group_roles: HashMap<String, Vec<ProjectRole>>,
    pub projects: Mutex<Vec<HubProject>>,
    pub resources: Vec<Resource>,
    /// Transitive project roles by project id
    pub transitive_roles: HashMap<String, Vec<ProjectRole>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeHub {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn with_members(self, group_id: &str, logins: &[&str]) -> Self {
        self.members
            .lock()
            .unwrap()
            .insert(group_id.to_string(), strings(logins));
        self
    }
}

#[async_trait]
impl HubService for FakeHub {
    async fn get_user(&self, user_id: &str, _fields: Option<&str>) -> Result<HubUser, AppError> {
        self.users
            .iter()
            .find(|u| u.id.as_deref() == Some(user_id))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn list_users(&self, _fields: Option<&str>) -> Result<Vec<HubUser>, AppError> {
        Ok(self.users.clone())
    }

    async fn list_user_groups(&self, _fields: Option<&str>) -> Result<Vec<UserGroup>, AppError> {
        Ok(self.groups.lock().unwrap().clone())
    }

    async fn create_user_group(
        &self,
        group: &UserGroup,
        _fields: Option<&str>,
    ) -> Result<UserGroup, AppError> {
        let name = group.name.clone().unwrap_or_default();
        self.record(format!("create_user_group {name}"));
        let created = UserGroup {
            id: Some(format!("g-{name}")),
            ..group.clone()
        };
        self.groups.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list_users_of_user_group(
        &self,
        group_id: &str,
        _fields: Option<&str>,
    ) -> Result<Vec<HubUser>, AppError> {
        let members = self.members.lock().unwrap();
        let logins = members.get(group_id).ok_or_else(not_found)?;
        Ok(logins
            .iter()
            .map(|login| HubUser {
                login: Some(login.clone()),
                ..Default::default()
            })
            .collect())
    }

    async fn add_user_to_user_group(&self, group_id: &str, user: &HubUser) -> Result<(), AppError> {
        let user_id = user.id.clone().unwrap_or_default();
        self.record(format!("add_user_to_user_group {group_id} {user_id}"));
        Ok(())
    }

    async fn remove_user_from_user_group(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<(), AppError> {
        self.record(format!("remove_user_from_user_group {group_id} {user_id}"));
        Ok(())
    }

    async fn list_project_roles_of_user_group(
        &self,
        group_id: &str,
        _fields: Option<&str>,
    ) -> Result<Vec<ProjectRole>, AppError> {
        Ok(self.group_roles.get(group_id).cloned().unwrap_or_default())
    }

    async fn add_project_role_to_user_group(
        &self,
        group_id: &str,
        role: &ProjectRole,
    ) -> Result<(), AppError> {
        let project_id = role.project.as_ref().map(|p| p.id.clone()).unwrap_or_default();
        let role_id = role.role.as_ref().map(|r| r.id.clone()).unwrap_or_default();
        self.record(format!(
            "add_project_role_to_user_group {group_id} {project_id} {role_id}"
        ));
        Ok(())
    }

    async fn list_projects(&self, _fields: Option<&str>) -> Result<Vec<HubProject>, AppError> {
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn create_project(
        &self,
        key: &str,
        name: &str,
        resources: &[Resource],
        _fields: Option<&str>,
    ) -> Result<HubProject, AppError> {
        let resource_ids: Vec<String> = resources.iter().filter_map(|r| r.id.clone()).collect();
        self.record(format!("create_project {key} {name} [{}]", resource_ids.join(",")));
        let created = HubProject {
            id: Some(format!("p-{key}")),
            key: Some(key.to_string()),
            name: Some(name.to_string()),
            resources: Some(resources.to_vec()),
        };
        self.projects.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list_resources(&self, _fields: Option<&str>) -> Result<Vec<Resource>, AppError> {
        Ok(self.resources.clone())
    }

    async fn list_transitive_project_roles(
        &self,
        project_id: &str,
        _fields: Option<&str>,
    ) -> Result<Vec<ProjectRole>, AppError> {
        self.record(format!("list_transitive_project_roles {project_id}"));
        Ok(self.transitive_roles.get(project_id).cloned().unwrap_or_default())
    }
}

/// Upsource recording every role change
#[derive(Default)]
pub struct FakeUpsource {
    pub project_names: Vec<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeUpsource {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpsourceService for FakeUpsource {
    async fn all_project_names(&self) -> Result<Vec<String>, AppError> {
        Ok(self.project_names.clone())
    }

    async fn add_user_to_project(&self, project_id: &str, user_id: &str) -> Result<(), AppError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("add_user_to_project {project_id} {user_id}"));
        Ok(())
    }

    async fn delete_user_from_project(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<(), AppError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("delete_user_from_project {project_id} {user_id}"));
        Ok(())
    }
}
