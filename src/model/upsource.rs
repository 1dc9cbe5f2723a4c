//! Upsource RPC payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Build system of a project, picks the Upsource project model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// Maven project, gets the maven model and settings
    Java,
    /// Anything else
    Other,
}

/// Project model section of the settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectModel {
    /// `maven` or `none`
    #[serde(rename = "type")]
    pub kind: String,
    /// Path to the model file
    #[serde(rename = "pathToModel")]
    pub path_to_model: String,
}

/// One VCS mapping inside `vcsSettings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsMapping {
    /// Mapping id, empty for new projects
    pub id: String,
    /// Private SSH key used to clone
    pub key: String,
    /// Mount point
    pub mapping: String,
    /// Repository URL
    pub url: String,
    /// VCS kind, `git`
    pub vcs: String,
}

/// The `vcsSettings` document, sent JSON-encoded as a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsSettings {
    /// Repository mappings
    pub mappings: Vec<VcsMapping>,
}

/// Settings of an Upsource project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub add_merge_commits_to_branch_review: bool,
    pub author_can_close_review: bool,
    pub author_can_delete_review: bool,
    pub build_status_receive_token: String,
    pub check_interval_seconds: u64,
    pub code_review_id_pattern: String,
    pub default_branch: String,
    pub default_encoding: String,
    pub gradle_init_script: String,
    pub gradle_properties: String,
    pub limit_resolve_discussion: bool,
    pub maven_profiles: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maven_settings: Option<String>,
    pub model_conversion_system_properties: String,
    pub project_name: String,
    pub project_model: ProjectModel,
    pub javascript_language_level: String,
    pub skip_file_contents_import: Vec<String>,
    pub vcs_settings: String,
    pub run_inspections: bool,
}

impl ProjectSettings {
    /// Settings for a new project cloned from `git@<git_host>:<path>.git`
    ///
    /// The review id pattern is built from the initials of the path's
    /// `/`- and `-`-separated words, e.g. `infra/hub-sync` gives `IHS-CR-{}`.
    pub fn for_repository(
        git_host: &str,
        path: &str,
        default_branch: &str,
        kind: ProjectKind,
        maven_settings: Option<String>,
        vcs_private_key: &str,
    ) -> Result<Self, serde_json::Error> {
        let vcs = VcsSettings {
            mappings: vec![VcsMapping {
                id: String::new(),
                key: vcs_private_key.to_string(),
                mapping: "/".to_string(),
                url: format!("git@{git_host}:{path}.git"),
                vcs: "git".to_string(),
            }],
        };

        let (project_model, maven_settings) = match kind {
            ProjectKind::Java => ("maven", maven_settings),
            ProjectKind::Other => ("none", None),
        };

        Ok(Self {
            add_merge_commits_to_branch_review: false,
            author_can_close_review: true,
            author_can_delete_review: true,
            build_status_receive_token: String::new(),
            check_interval_seconds: 43200,
            code_review_id_pattern: format!("{}-CR-{{}}", review_id_prefix(path)),
            default_branch: default_branch.to_string(),
            default_encoding: "UTF-8".to_string(),
            gradle_init_script: String::new(),
            gradle_properties: String::new(),
            limit_resolve_discussion: true,
            maven_profiles: String::new(),
            maven_settings,
            model_conversion_system_properties: String::new(),
            project_name: path.to_string(),
            project_model: ProjectModel {
                kind: project_model.to_string(),
                path_to_model: String::new(),
            },
            javascript_language_level: "none".to_string(),
            skip_file_contents_import: ["*.bin", "*.dll", "*.exe", "*.so"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vcs_settings: serde_json::to_string(&vcs)?,
            run_inspections: false,
        })
    }
}

fn review_id_prefix(path: &str) -> String {
    path.replace('/', "-")
        .split('-')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Summary of one project from `getAllProjects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_id: String,
    pub project_name: String,
    #[serde(default)]
    pub is_ready: bool,
}

/// Result of `getAllProjects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectList {
    #[serde(default)]
    pub project: Vec<ProjectSummary>,
}

/// A user record from `getUserInfo`; absent logins mean an unknown user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
