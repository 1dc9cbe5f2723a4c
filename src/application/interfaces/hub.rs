use crate::error::AppError;
use crate::model::hub::{HubProject, HubUser, ProjectRole, Resource, UserGroup};
use async_trait::async_trait;

/// Hub operations used by membership reconciliation
///
/// List operations return fully drained collections; use the paginators on
/// [`HubClient`](crate::application::hub_client::HubClient) to stream them.
#[async_trait]
pub trait HubService: Send + Sync {
    /// Gets one user
    async fn get_user(&self, user_id: &str, fields: Option<&str>) -> Result<HubUser, AppError>;

    /// Gets every user
    async fn list_users(&self, fields: Option<&str>) -> Result<Vec<HubUser>, AppError>;

    /// Gets every user group
    async fn list_user_groups(&self, fields: Option<&str>) -> Result<Vec<UserGroup>, AppError>;

    /// Creates a user group and returns it as stored by Hub
    async fn create_user_group(
        &self,
        group: &UserGroup,
        fields: Option<&str>,
    ) -> Result<UserGroup, AppError>;

    /// Gets the members of a user group
    async fn list_users_of_user_group(
        &self,
        group_id: &str,
        fields: Option<&str>,
    ) -> Result<Vec<HubUser>, AppError>;

    /// Adds a user to a user group
    async fn add_user_to_user_group(&self, group_id: &str, user: &HubUser)
    -> Result<(), AppError>;

    /// Removes a user from a user group
    async fn remove_user_from_user_group(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<(), AppError>;

    /// Gets the project roles held by a user group
    async fn list_project_roles_of_user_group(
        &self,
        group_id: &str,
        fields: Option<&str>,
    ) -> Result<Vec<ProjectRole>, AppError>;

    /// Grants a project role to a user group
    async fn add_project_role_to_user_group(
        &self,
        group_id: &str,
        role: &ProjectRole,
    ) -> Result<(), AppError>;

    /// Gets every project
    async fn list_projects(&self, fields: Option<&str>) -> Result<Vec<HubProject>, AppError>;

    /// Creates a project and returns it as stored by Hub
    async fn create_project(
        &self,
        key: &str,
        name: &str,
        resources: &[Resource],
        fields: Option<&str>,
    ) -> Result<HubProject, AppError>;

    /// Gets every resource
    async fn list_resources(&self, fields: Option<&str>) -> Result<Vec<Resource>, AppError>;

    /// Gets the transitive project roles of a project
    async fn list_transitive_project_roles(
        &self,
        project_id: &str,
        fields: Option<&str>,
    ) -> Result<Vec<ProjectRole>, AppError>;
}
