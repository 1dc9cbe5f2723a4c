use crate::error::AppError;
use async_trait::async_trait;

/// Upsource operations used by membership reconciliation
#[async_trait]
pub trait UpsourceService: Send + Sync {
    /// Gets the names of every project
    async fn all_project_names(&self) -> Result<Vec<String>, AppError>;

    /// Grants the developer role in a project
    async fn add_user_to_project(&self, project_id: &str, user_id: &str) -> Result<(), AppError>;

    /// Revokes the developer role in a project
    async fn delete_user_from_project(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<(), AppError>;
}
