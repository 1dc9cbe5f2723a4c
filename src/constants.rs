/// User agent string sent with every request
pub const USER_AGENT: &str = "hub-sync/0.1.0";
/// Default page size (`$top`) for Hub list endpoints
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Default transport timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Query parameter holding the page size
pub const TOP_PARAM: &str = "$top";
/// Query parameter holding the page offset
pub const SKIP_PARAM: &str = "$skip";
/// Query parameter restricting the fields returned by Hub
pub const FIELDS_PARAM: &str = "fields";
/// Content type sent with JSON bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Hub users endpoint
pub const HUB_USERS_ENDPOINT: &str = "/api/rest/users";
/// Hub user groups endpoint
pub const HUB_USERGROUPS_ENDPOINT: &str = "/api/rest/usergroups";
/// Hub projects endpoint
pub const HUB_PROJECTS_ENDPOINT: &str = "/api/rest/projects";
/// Hub resources endpoint
pub const HUB_RESOURCES_ENDPOINT: &str = "/api/rest/resources";

/// Path segment under which Upsource serves its RPC methods
pub const UPSOURCE_RPC_PATH: &str = "/~rpc/";
/// Role key granted to project developers in Upsource
pub const DEVELOPER_ROLE_KEY: &str = "developer";
/// Page size used when listing the user roles of an Upsource project
pub const UPSOURCE_ROLES_PAGE_SIZE: u32 = 1000;
/// Suffix appended to a GitLab group name to form its Hub team
pub const TEAM_SUFFIX: &str = "-team";
/// Id of the Hub global project
pub const GLOBAL_PROJECT_ID: &str = "0";
/// Name of the Hub global project
pub const GLOBAL_PROJECT_NAME: &str = "Global";
