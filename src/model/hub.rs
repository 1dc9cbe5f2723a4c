//! Hub REST entities
//!
//! Every field is optional because Hub only returns the fields asked for
//! through the `fields` query parameter.

use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};

/// Lightweight reference to a Hub entity, `{"id": ...}`
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct EntityRef {
    /// Entity id
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityRef {
    /// Reference carrying only an id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    /// Reference carrying an id and a name
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }
}

/// Email entry of a user profile
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Email {
    /// Address
    pub email: String,
    /// JSON type tag, `EmailJSON`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Whether the address was verified
    #[serde(default)]
    pub verified: bool,
}

impl Email {
    /// A verified `EmailJSON` entry
    pub fn verified(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            kind: Some("EmailJSON".to_string()),
            verified: true,
        }
    }
}

/// Avatar entry of a user profile
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Avatar {
    /// JSON type tag, `urlavatar` for data URLs
    #[serde(rename = "type")]
    pub kind: String,
    /// Image URL, possibly a `data:` URL
    #[serde(rename = "avatarUrl")]
    pub avatar_url: String,
}

/// Profile of a Hub user
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    /// Primary email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    /// Avatar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,
}

/// VCS user name alias
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct VcsUserName {
    /// Alias as it appears in commits
    pub name: String,
}

/// A Hub user
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct HubUser {
    /// User id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Login name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Full name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    /// VCS aliases
    #[serde(
        rename = "VCSUserNames",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub vcs_user_names: Option<Vec<VcsUserName>>,
}

impl HubUser {
    /// Primary email address, if the profile has one
    pub fn email(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|p| p.email.as_ref())
            .map(|e| e.email.as_str())
    }
}

/// Payload for creating or replacing a user
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    /// Login name
    pub login: String,
    /// Full name
    pub name: String,
    /// Profile
    pub profile: UserProfile,
    /// VCS aliases
    #[serde(rename = "VCSUserNames")]
    pub vcs_user_names: Vec<VcsUserName>,
}

impl NewUser {
    /// A user with a verified email whose VCS aliases are the email and the login
    pub fn with_email(
        login: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        let login = login.into();
        let email = email.into();
        Self {
            vcs_user_names: vec![
                VcsUserName {
                    name: email.clone(),
                },
                VcsUserName {
                    name: login.clone(),
                },
            ],
            login,
            name: name.into(),
            profile: UserProfile {
                email: Some(Email::verified(email)),
                avatar: None,
            },
        }
    }
}

/// A Hub user group (a "team")
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct UserGroup {
    /// Group id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Group name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Project the group belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<EntityRef>,
}

/// A resource (e.g. an Upsource project) attached to a Hub project
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Resource {
    /// Resource id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A Hub project
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct HubProject {
    /// Project id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Project key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Project name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Attached resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
}

/// A role definition
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Role {
    /// Role id
    pub id: String,
    /// Role key, e.g. `developer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Role name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Owner of a project role: a user (has a login) or a group (has none)
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct RoleOwner {
    /// Owner id
    pub id: String,
    /// Login, present only for users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A role granted within a project
#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ProjectRole {
    /// Project role id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Project the role applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<EntityRef>,
    /// Granted role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Who holds the role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<RoleOwner>,
}

impl ProjectRole {
    /// Grant of `role` in the project `project_id`
    pub fn grant(project_id: impl Into<String>, role: Role) -> Self {
        Self {
            id: None,
            project: Some(EntityRef::new(project_id)),
            role: Some(role),
            owner: None,
        }
    }
}
