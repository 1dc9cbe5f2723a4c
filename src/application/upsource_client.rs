/******************************************************************************
   Author: Hub Sync Contributors
   Date: 19/10/26
******************************************************************************/

//! Client for the Upsource RPC API
//!
//! Upsource exposes its methods under `<base>/~rpc/<method>`. Read methods
//! take their request JSON-encoded in the `params` query parameter and answer
//! `{"result": ...}`; write methods take a JSON body.

use crate::application::config::Config;
use crate::application::interfaces::UpsourceService;
use crate::constants::{DEVELOPER_ROLE_KEY, UPSOURCE_ROLES_PAGE_SIZE, UPSOURCE_RPC_PATH};
use crate::error::{AppError, AppResult};
use crate::model::http::{RequestOptions, RestClient};
use crate::model::upsource::{ProjectList, ProjectSettings, UserInfo};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use tracing::{debug, info};

/// Upsource RPC client
#[derive(Debug, Clone)]
pub struct UpsourceClient {
    rest: RestClient,
}

impl UpsourceClient {
    /// Wraps a REST client bound to the Upsource base URL
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Builds the client from the `upsource` section of the configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(Self::new(RestClient::from_config(&config.upsource)?))
    }

    /// Underlying REST client
    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Calls a read method and returns its `result`, `None` when absent
    pub async fn rpc_get(&self, method: &str, request: Option<&Value>) -> AppResult<Option<Value>> {
        let mut options = RequestOptions::new();
        if let Some(request) = request {
            options = options.query("params", serde_json::to_string(request)?);
        }

        let body: Value = self
            .rest
            .get_json(&format!("{UPSOURCE_RPC_PATH}{method}"), options)
            .await?;
        debug!("Upsource {} answered", method);

        Ok(match body {
            Value::Object(mut map) => map.remove("result"),
            _ => None,
        })
    }

    /// Calls a write method with `data` as JSON body
    pub async fn rpc_post<B: Serialize + ?Sized>(&self, method: &str, data: &B) -> AppResult<()> {
        self.rest
            .post(
                &format!("{UPSOURCE_RPC_PATH}{method}"),
                RequestOptions::new().json(data)?,
            )
            .await?;
        Ok(())
    }

    /// Lists every project
    pub async fn all_projects(&self) -> AppResult<ProjectList> {
        match self.rpc_get("getAllProjects", None).await? {
            Some(result) => Ok(serde_json::from_value(result)?),
            None => Ok(ProjectList::default()),
        }
    }

    /// Ids of every project
    pub async fn all_project_ids(&self) -> AppResult<Vec<String>> {
        let projects = self.all_projects().await?;
        Ok(projects.project.into_iter().map(|p| p.project_id).collect())
    }

    /// Gets a project's attributes, including the group it belongs to
    pub async fn project_info(&self, project_id: &str) -> AppResult<Option<Value>> {
        self.rpc_get("getProjectInfo", Some(&json!({ "projectId": project_id })))
            .await
    }

    /// Gets a project's settings
    pub async fn load_project(&self, project_id: &str) -> AppResult<Option<Value>> {
        self.rpc_get("loadProject", Some(&json!({ "projectId": project_id })))
            .await
    }

    /// Replaces a project's settings
    pub async fn edit_project<S: Serialize + ?Sized>(
        &self,
        project_id: &str,
        settings: &S,
    ) -> AppResult<()> {
        info!("Editing Upsource project {}", project_id);
        self.rpc_post(
            "editProject",
            &json!({ "projectId": project_id, "settings": settings }),
        )
        .await
    }

    /// Creates a project
    pub async fn create_project(&self, project_id: &str, settings: &ProjectSettings) -> AppResult<()> {
        info!("Creating Upsource project {}", project_id);
        self.rpc_post(
            "createProject",
            &json!({ "newProjectId": project_id, "settings": settings }),
        )
        .await
    }

    /// Deletes a project
    pub async fn delete_project(&self, project_id: &str) -> AppResult<()> {
        info!("Deleting Upsource project {}", project_id);
        self.rpc_post("deleteProject", &json!({ "projectId": project_id }))
            .await
    }

    /// Drops a project's index so it is imported again
    pub async fn reset_project(&self, project_id: &str) -> AppResult<()> {
        info!("Resetting Upsource project {}", project_id);
        self.rpc_post("resetProject", &json!({ "projectId": project_id }))
            .await
    }

    /// Whether the initial import of a project has finished
    pub async fn is_project_ready(&self, project_id: &str) -> AppResult<bool> {
        let result = self
            .rpc_get("getAllProjects", Some(&json!({ "projectId": project_id })))
            .await?;
        let Some(result) = result else {
            return Ok(false);
        };
        let projects: ProjectList = serde_json::from_value(result)?;
        Ok(projects.project.first().is_some_and(|p| p.is_ready))
    }

    /// Gets a user record, `None` when Upsource does not know the user
    pub async fn user_info(&self, user_id: &str) -> AppResult<Option<UserInfo>> {
        let result = self
            .rpc_get("getUserInfo", Some(&json!({ "ids": user_id })))
            .await?;

        let info = result
            .and_then(|mut r| r.get_mut("infos").map(Value::take))
            .and_then(|infos| match infos {
                Value::Array(mut infos) if !infos.is_empty() => Some(infos.swap_remove(0)),
                _ => None,
            });

        match info {
            Some(info) => {
                let info: UserInfo = serde_json::from_value(info)?;
                Ok(info.login.is_some().then_some(info))
            }
            None => Ok(None),
        }
    }

    /// Gets the user roles of a project
    pub async fn users_roles_in_project(&self, project_id: &str) -> AppResult<Option<Value>> {
        self.rpc_get(
            "getUsersRoles",
            Some(&json!({
                "projectId": project_id,
                "offset": 0,
                "pageSize": UPSOURCE_ROLES_PAGE_SIZE,
            })),
        )
        .await
    }

    async fn user_role(&self, method: &str, project_id: &str, user_id: &str) -> AppResult<()> {
        self.rpc_post(
            method,
            &json!({
                "projectId": project_id,
                "userId": user_id,
                "roleKey": DEVELOPER_ROLE_KEY,
            }),
        )
        .await
    }
}

impl fmt::Display for UpsourceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rest)
    }
}

#[async_trait]
impl UpsourceService for UpsourceClient {
    async fn all_project_names(&self) -> Result<Vec<String>, AppError> {
        let projects = self.all_projects().await?;
        Ok(projects.project.into_iter().map(|p| p.project_name).collect())
    }

    async fn add_user_to_project(&self, project_id: &str, user_id: &str) -> Result<(), AppError> {
        info!("Adding user {} to Upsource project {}", user_id, project_id);
        self.user_role("addUserRole", project_id, user_id).await
    }

    async fn delete_user_from_project(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<(), AppError> {
        info!("Removing user {} from Upsource project {}", user_id, project_id);
        self.user_role("deleteUserRole", project_id, user_id).await
    }
}
