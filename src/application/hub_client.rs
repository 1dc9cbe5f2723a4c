/******************************************************************************
   Author: Hub Sync Contributors
   Date: 19/10/26
******************************************************************************/

//! Client for the Hub permission server REST API
//!
//! List operations return a [`Paginator`] that walks the collection with
//! `$top` set to the configured page size. Every operation accepts an
//! optional `fields` projection, passed through as the `fields` query
//! parameter.

use crate::application::config::Config;
use crate::application::interfaces::HubService;
use crate::constants::{
    FIELDS_PARAM, HUB_PROJECTS_ENDPOINT, HUB_RESOURCES_ENDPOINT, HUB_USERGROUPS_ENDPOINT,
    HUB_USERS_ENDPOINT,
};
use crate::error::{AppError, AppResult};
use crate::model::http::{RequestOptions, RestClient};
use crate::model::hub::{
    Avatar, HubProject, HubUser, NewUser, ProjectRole, Resource, UserGroup,
};
use crate::model::pagination::Paginator;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::fmt;
use tracing::{debug, info};

/// Hub REST API client
#[derive(Debug, Clone)]
pub struct HubClient {
    rest: RestClient,
    page_size: u32,
}

impl HubClient {
    /// Wraps a REST client bound to the Hub base URL
    ///
    /// # Arguments
    /// * `rest` - client whose base URL is the Hub root, e.g. `http://host/hub`
    /// * `page_size` - `$top` used by every list operation, must be positive
    pub fn new(rest: RestClient, page_size: u32) -> AppResult<Self> {
        if page_size == 0 {
            return Err(AppError::InvalidInput(
                "page size must be positive".to_string(),
            ));
        }
        Ok(Self { rest, page_size })
    }

    /// Builds the client from the `hub` section of the configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(RestClient::from_config(&config.hub)?, config.page_size)
    }

    /// Underlying REST client
    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Page size used by list operations
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn options(fields: Option<&str>) -> RequestOptions {
        match fields {
            Some(fields) => RequestOptions::new().query(FIELDS_PARAM, fields),
            None => RequestOptions::new(),
        }
    }

    fn list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        search_key: &str,
        fields: Option<&str>,
    ) -> AppResult<Paginator<'_, T>> {
        self.rest
            .paginate(endpoint, Self::options(fields), search_key, self.page_size)
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, fields: Option<&str>) -> AppResult<T> {
        self.rest.get_json(endpoint, Self::options(fields)).await
    }

    async fn create<B, T>(&self, endpoint: &str, body: &B, fields: Option<&str>) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .rest
            .post(endpoint, Self::options(fields).json(body)?)
            .await?;
        Ok(response.json().await?)
    }

    async fn send<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> AppResult<()> {
        self.rest
            .post(endpoint, RequestOptions::new().json(body)?)
            .await?;
        Ok(())
    }

    async fn remove(&self, endpoint: &str) -> AppResult<()> {
        self.rest.delete(endpoint, RequestOptions::new()).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Gets one user
    pub async fn get_user(&self, user_id: &str, fields: Option<&str>) -> AppResult<HubUser> {
        self.fetch(&format!("{HUB_USERS_ENDPOINT}/{user_id}"), fields)
            .await
    }

    /// Gets one user as raw JSON, keeping every field Hub returns
    pub async fn get_user_json(&self, user_id: &str) -> AppResult<Value> {
        self.fetch(&format!("{HUB_USERS_ENDPOINT}/{user_id}"), None)
            .await
    }

    /// Walks every user
    pub fn all_users(&self, fields: Option<&str>) -> AppResult<Paginator<'_, HubUser>> {
        self.list(HUB_USERS_ENDPOINT, "users", fields)
    }

    /// Creates a user
    pub async fn create_user(&self, user: &NewUser, fields: Option<&str>) -> AppResult<HubUser> {
        info!("Creating user {}", user.login);
        self.create(HUB_USERS_ENDPOINT, user, fields).await
    }

    /// Replaces the data of an existing user
    pub async fn update_user<B: Serialize + ?Sized>(&self, user_id: &str, data: &B) -> AppResult<()> {
        info!("Updating user {}", user_id);
        self.send(&format!("{HUB_USERS_ENDPOINT}/{user_id}"), data)
            .await
    }

    /// Deletes a user
    pub async fn delete_user(&self, user_id: &str) -> AppResult<()> {
        info!("Deleting user {}", user_id);
        self.remove(&format!("{HUB_USERS_ENDPOINT}/{user_id}"))
            .await
    }

    /// Replaces a user's avatar with a JPEG image given as raw bytes
    pub async fn update_user_avatar(&self, user_id: &str, image: &[u8]) -> AppResult<()> {
        let mut user = self.get_user_json(user_id).await?;
        let avatar = Avatar {
            kind: "urlavatar".to_string(),
            avatar_url: avatar_data_url(image),
        };
        profile_mut(&mut user, user_id)?.insert("avatar".to_string(), serde_json::to_value(avatar)?);

        info!("Updating avatar of user {}", user_id);
        self.send(&format!("{HUB_USERS_ENDPOINT}/{user_id}"), &user)
            .await
    }

    /// Marks a user's email as verified or not
    pub async fn update_user_email_verified(&self, user_id: &str, verified: bool) -> AppResult<()> {
        let mut user = self.get_user_json(user_id).await?;
        let email = profile_mut(&mut user, user_id)?
            .get_mut("email")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| AppError::InvalidInput(format!("user {user_id} has no email")))?;
        email.insert("verified".to_string(), Value::Bool(verified));

        info!("Setting email verified={} for user {}", verified, user_id);
        self.send(&format!("{HUB_USERS_ENDPOINT}/{user_id}"), &user)
            .await
    }

    /// Walks the groups a user belongs to
    pub fn groups_of_user(
        &self,
        user_id: &str,
        fields: Option<&str>,
    ) -> AppResult<Paginator<'_, UserGroup>> {
        self.list(&format!("{HUB_USERS_ENDPOINT}/{user_id}/groups"), "groups", fields)
    }

    // ------------------------------------------------------------------
    // User groups
    // ------------------------------------------------------------------

    /// Gets one user group
    pub async fn get_user_group(&self, group_id: &str, fields: Option<&str>) -> AppResult<UserGroup> {
        self.fetch(&format!("{HUB_USERGROUPS_ENDPOINT}/{group_id}"), fields)
            .await
    }

    /// Walks every user group
    pub fn all_user_groups(&self, fields: Option<&str>) -> AppResult<Paginator<'_, UserGroup>> {
        self.list(HUB_USERGROUPS_ENDPOINT, "usergroups", fields)
    }

    /// Creates a user group
    pub async fn create_user_group(
        &self,
        group: &UserGroup,
        fields: Option<&str>,
    ) -> AppResult<UserGroup> {
        info!("Creating user group {}", group.name.as_deref().unwrap_or_default());
        self.create(HUB_USERGROUPS_ENDPOINT, group, fields).await
    }

    /// Replaces the data of an existing user group
    pub async fn update_user_group<B: Serialize + ?Sized>(
        &self,
        group_id: &str,
        data: &B,
    ) -> AppResult<()> {
        info!("Updating user group {}", group_id);
        self.send(&format!("{HUB_USERGROUPS_ENDPOINT}/{group_id}"), data)
            .await
    }

    /// Deletes a user group
    pub async fn delete_user_group(&self, group_id: &str) -> AppResult<()> {
        info!("Deleting user group {}", group_id);
        self.remove(&format!("{HUB_USERGROUPS_ENDPOINT}/{group_id}"))
            .await
    }

    /// Walks the members of a user group
    pub fn users_of_user_group(
        &self,
        group_id: &str,
        fields: Option<&str>,
    ) -> AppResult<Paginator<'_, HubUser>> {
        self.list(&format!("{HUB_USERGROUPS_ENDPOINT}/{group_id}/users"), "users", fields)
    }

    /// Gets one member of a user group
    pub async fn get_user_of_user_group(
        &self,
        group_id: &str,
        user_id: &str,
        fields: Option<&str>,
    ) -> AppResult<HubUser> {
        self.fetch(
            &format!("{HUB_USERGROUPS_ENDPOINT}/{group_id}/users/{user_id}"),
            fields,
        )
        .await
    }

    /// Adds a user to a user group
    pub async fn add_user_to_user_group(&self, group_id: &str, user: &HubUser) -> AppResult<()> {
        info!(
            "Adding user {} to user group {}",
            user.login.as_deref().or(user.id.as_deref()).unwrap_or_default(),
            group_id
        );
        self.send(&format!("{HUB_USERGROUPS_ENDPOINT}/{group_id}/users"), user)
            .await
    }

    /// Removes a user from a user group
    pub async fn remove_user_from_user_group(&self, group_id: &str, user_id: &str) -> AppResult<()> {
        info!("Removing user {} from user group {}", user_id, group_id);
        self.remove(&format!("{HUB_USERGROUPS_ENDPOINT}/{group_id}/users/{user_id}"))
            .await
    }

    /// Walks the project roles held by a user group
    pub fn project_roles_of_user_group(
        &self,
        group_id: &str,
        fields: Option<&str>,
    ) -> AppResult<Paginator<'_, ProjectRole>> {
        self.list(
            &format!("{HUB_USERGROUPS_ENDPOINT}/{group_id}/projectroles"),
            "projectroles",
            fields,
        )
    }

    /// Grants a project role to a user group
    pub async fn add_project_role_to_user_group(
        &self,
        group_id: &str,
        role: &ProjectRole,
    ) -> AppResult<()> {
        info!("Granting project role to user group {}", group_id);
        self.send(
            &format!("{HUB_USERGROUPS_ENDPOINT}/{group_id}/projectroles"),
            role,
        )
        .await
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// Gets one project
    pub async fn get_project(&self, project_id: &str, fields: Option<&str>) -> AppResult<HubProject> {
        self.fetch(&format!("{HUB_PROJECTS_ENDPOINT}/{project_id}"), fields)
            .await
    }

    /// Walks every project
    pub fn all_projects(&self, fields: Option<&str>) -> AppResult<Paginator<'_, HubProject>> {
        self.list(HUB_PROJECTS_ENDPOINT, "projects", fields)
    }

    /// Creates a project with the given resources attached
    pub async fn create_project(
        &self,
        key: &str,
        name: &str,
        resources: &[Resource],
        fields: Option<&str>,
    ) -> AppResult<HubProject> {
        let project = json!({
            "key": key,
            "name": name,
            "resources": resources,
        });
        info!("Creating project {}", key);
        self.create(HUB_PROJECTS_ENDPOINT, &project, fields).await
    }

    /// Replaces the data of an existing project
    pub async fn update_project<B: Serialize + ?Sized>(
        &self,
        project_id: &str,
        data: &B,
    ) -> AppResult<()> {
        info!("Updating project {}", project_id);
        self.send(&format!("{HUB_PROJECTS_ENDPOINT}/{project_id}"), data)
            .await
    }

    /// Deletes a project
    pub async fn delete_project(&self, project_id: &str) -> AppResult<()> {
        info!("Deleting project {}", project_id);
        self.remove(&format!("{HUB_PROJECTS_ENDPOINT}/{project_id}"))
            .await
    }

    /// Walks the teams of a project
    pub fn teams_of_project(
        &self,
        project_id: &str,
        fields: Option<&str>,
    ) -> AppResult<Paginator<'_, UserGroup>> {
        self.list(&format!("{HUB_PROJECTS_ENDPOINT}/{project_id}/teams"), "teams", fields)
    }

    /// Adds a team to a project
    pub async fn add_team_to_project(&self, project_id: &str, team: &UserGroup) -> AppResult<()> {
        info!("Adding team to project {}", project_id);
        self.send(&format!("{HUB_PROJECTS_ENDPOINT}/{project_id}/teams"), team)
            .await
    }

    /// Removes a team from a project
    pub async fn remove_team_from_project(&self, project_id: &str, team_id: &str) -> AppResult<()> {
        info!("Removing team {} from project {}", team_id, project_id);
        self.remove(&format!("{HUB_PROJECTS_ENDPOINT}/{project_id}/teams/{team_id}"))
            .await
    }

    /// Walks the transitive project roles of a project
    pub fn transitive_project_roles(
        &self,
        project_id: &str,
        fields: Option<&str>,
    ) -> AppResult<Paginator<'_, ProjectRole>> {
        self.list(
            &format!("{HUB_PROJECTS_ENDPOINT}/{project_id}/transitiveprojectroles"),
            "transitiveprojectroles",
            fields,
        )
    }

    /// Gets one transitive project role of a project
    pub async fn get_transitive_project_role(
        &self,
        project_id: &str,
        role_id: &str,
        fields: Option<&str>,
    ) -> AppResult<ProjectRole> {
        self.fetch(
            &format!("{HUB_PROJECTS_ENDPOINT}/{project_id}/transitiveprojectroles/{role_id}"),
            fields,
        )
        .await
    }

    // ------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------

    /// Walks every resource
    pub fn all_resources(&self, fields: Option<&str>) -> AppResult<Paginator<'_, Resource>> {
        self.list(HUB_RESOURCES_ENDPOINT, "resources", fields)
    }
}

impl fmt::Display for HubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rest)
    }
}

/// `data:` URL holding a base64 encoded JPEG
#[must_use]
pub fn avatar_data_url(image: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(image))
}

fn profile_mut<'v>(user: &'v mut Value, user_id: &str) -> AppResult<&'v mut Map<String, Value>> {
    let user = user.as_object_mut().ok_or_else(|| {
        AppError::Deserialization(format!("user {user_id} is not a JSON object"))
    })?;
    user.entry("profile")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| AppError::Deserialization(format!("profile of user {user_id} is not an object")))
}

#[async_trait]
impl HubService for HubClient {
    async fn get_user(&self, user_id: &str, fields: Option<&str>) -> Result<HubUser, AppError> {
        HubClient::get_user(self, user_id, fields).await
    }

    async fn list_users(&self, fields: Option<&str>) -> Result<Vec<HubUser>, AppError> {
        let users = self.all_users(fields)?.collect_all().await?;
        debug!("Users obtained: {}", users.len());
        Ok(users)
    }

    async fn list_user_groups(&self, fields: Option<&str>) -> Result<Vec<UserGroup>, AppError> {
        let groups = self.all_user_groups(fields)?.collect_all().await?;
        debug!("User groups obtained: {}", groups.len());
        Ok(groups)
    }

    async fn create_user_group(
        &self,
        group: &UserGroup,
        fields: Option<&str>,
    ) -> Result<UserGroup, AppError> {
        HubClient::create_user_group(self, group, fields).await
    }

    async fn list_users_of_user_group(
        &self,
        group_id: &str,
        fields: Option<&str>,
    ) -> Result<Vec<HubUser>, AppError> {
        self.users_of_user_group(group_id, fields)?
            .collect_all()
            .await
    }

    async fn add_user_to_user_group(
        &self,
        group_id: &str,
        user: &HubUser,
    ) -> Result<(), AppError> {
        HubClient::add_user_to_user_group(self, group_id, user).await
    }

    async fn remove_user_from_user_group(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<(), AppError> {
        HubClient::remove_user_from_user_group(self, group_id, user_id).await
    }

    async fn list_project_roles_of_user_group(
        &self,
        group_id: &str,
        fields: Option<&str>,
    ) -> Result<Vec<ProjectRole>, AppError> {
        self.project_roles_of_user_group(group_id, fields)?
            .collect_all()
            .await
    }

    async fn add_project_role_to_user_group(
        &self,
        group_id: &str,
        role: &ProjectRole,
    ) -> Result<(), AppError> {
        HubClient::add_project_role_to_user_group(self, group_id, role).await
    }

    async fn list_projects(&self, fields: Option<&str>) -> Result<Vec<HubProject>, AppError> {
        let projects = self.all_projects(fields)?.collect_all().await?;
        debug!("Projects obtained: {}", projects.len());
        Ok(projects)
    }

    async fn create_project(
        &self,
        key: &str,
        name: &str,
        resources: &[Resource],
        fields: Option<&str>,
    ) -> Result<HubProject, AppError> {
        HubClient::create_project(self, key, name, resources, fields).await
    }

    async fn list_resources(&self, fields: Option<&str>) -> Result<Vec<Resource>, AppError> {
        self.all_resources(fields)?.collect_all().await
    }

    async fn list_transitive_project_roles(
        &self,
        project_id: &str,
        fields: Option<&str>,
    ) -> Result<Vec<ProjectRole>, AppError> {
        self.transitive_project_roles(project_id, fields)?
            .collect_all()
            .await
    }
}
