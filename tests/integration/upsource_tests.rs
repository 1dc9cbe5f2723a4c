use crate::common::{self, BASIC_USER_PASS};
use hub_sync::prelude::*;
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn test_all_projects_and_names() {
    let (mut server, upsource) = common::upsource().await;
    let mock = server
        .mock("GET", "/~rpc/getAllProjects")
        .match_header("authorization", BASIC_USER_PASS)
        .with_status(200)
        .with_body(
            r#"{"result": {"project": [
                {"projectId": "infra-hub-sync", "projectName": "infra/hub-sync", "isReady": true},
                {"projectId": "web-shop", "projectName": "web/shop"}
            ]}}"#,
        )
        .expect(2)
        .create_async()
        .await;

    let ids = upsource.all_project_ids().await.unwrap();
    let names = upsource.all_project_names().await.unwrap();

    assert_eq!(ids, vec!["infra-hub-sync", "web-shop"]);
    assert_eq!(names, vec!["infra/hub-sync", "web/shop"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_result_means_no_projects() {
    let (mut server, upsource) = common::upsource().await;
    let _mock = server
        .mock("GET", "/~rpc/getAllProjects")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let projects = upsource.all_projects().await.unwrap();
    assert!(projects.project.is_empty());
}

#[tokio::test]
async fn test_read_methods_send_params_as_query() {
    let (mut server, upsource) = common::upsource().await;
    let mock = server
        .mock("GET", "/~rpc/getProjectInfo")
        .match_query(Matcher::UrlEncoded(
            "params".into(),
            r#"{"projectId":"web-shop"}"#.into(),
        ))
        .with_status(200)
        .with_body(r#"{"result": {"projectName": "web/shop", "groupName": "web"}}"#)
        .create_async()
        .await;

    let info = upsource.project_info("web-shop").await.unwrap().unwrap();

    assert_eq!(info["groupName"], "web");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_is_project_ready() {
    let (mut server, upsource) = common::upsource().await;
    let _ready = server
        .mock("GET", "/~rpc/getAllProjects")
        .match_query(Matcher::UrlEncoded(
            "params".into(),
            r#"{"projectId":"ready"}"#.into(),
        ))
        .with_status(200)
        .with_body(r#"{"result": {"project": [{"projectId": "ready", "projectName": "r", "isReady": true}]}}"#)
        .create_async()
        .await;
    let _unknown = server
        .mock("GET", "/~rpc/getAllProjects")
        .match_query(Matcher::UrlEncoded(
            "params".into(),
            r#"{"projectId":"unknown"}"#.into(),
        ))
        .with_status(200)
        .with_body(r#"{"result": {}}"#)
        .create_async()
        .await;

    assert!(upsource.is_project_ready("ready").await.unwrap());
    assert!(!upsource.is_project_ready("unknown").await.unwrap());
}

#[tokio::test]
async fn test_user_info() {
    let (mut server, upsource) = common::upsource().await;
    let _known = server
        .mock("GET", "/~rpc/getUserInfo")
        .match_query(Matcher::UrlEncoded("params".into(), r#"{"ids":"u-1"}"#.into()))
        .with_status(200)
        .with_body(r#"{"result": {"infos": [{"userId": "u-1", "login": "alice", "name": "Alice"}]}}"#)
        .create_async()
        .await;
    let _unknown = server
        .mock("GET", "/~rpc/getUserInfo")
        .match_query(Matcher::UrlEncoded("params".into(), r#"{"ids":"u-2"}"#.into()))
        .with_status(200)
        .with_body(r#"{"result": {"infos": [{"userId": "u-2"}]}}"#)
        .create_async()
        .await;

    let known = upsource.user_info("u-1").await.unwrap().unwrap();
    assert_eq!(known.login.as_deref(), Some("alice"));
    assert!(upsource.user_info("u-2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_users_roles_in_project() {
    let (mut server, upsource) = common::upsource().await;
    let mock = server
        .mock("GET", "/~rpc/getUsersRoles")
        .match_query(Matcher::UrlEncoded(
            "params".into(),
            r#"{"offset":0,"pageSize":1000,"projectId":"web-shop"}"#.into(),
        ))
        .with_status(200)
        .with_body(r#"{"result": {"users": []}}"#)
        .create_async()
        .await;

    let roles = upsource.users_roles_in_project("web-shop").await.unwrap();

    assert_eq!(roles, Some(json!({ "users": [] })));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_developer_role_changes() {
    let (mut server, upsource) = common::upsource().await;
    let add = server
        .mock("POST", "/~rpc/addUserRole")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "projectId": "web-shop",
            "userId": "u-1",
            "roleKey": "developer"
        })))
        .with_status(200)
        .create_async()
        .await;
    let delete = server
        .mock("POST", "/~rpc/deleteUserRole")
        .match_body(Matcher::Json(json!({
            "projectId": "web-shop",
            "userId": "u-1",
            "roleKey": "developer"
        })))
        .with_status(200)
        .create_async()
        .await;

    upsource.add_user_to_project("web-shop", "u-1").await.unwrap();
    upsource
        .delete_user_from_project("web-shop", "u-1")
        .await
        .unwrap();

    add.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_create_project_sends_settings() {
    let (mut server, upsource) = common::upsource().await;
    let mock = server
        .mock("POST", "/~rpc/createProject")
        .match_body(Matcher::PartialJson(json!({
            "newProjectId": "infra-hub-sync",
            "settings": {
                "projectName": "infra/hub-sync",
                "codeReviewIdPattern": "IHS-CR-{}",
                "projectModel": { "type": "maven" },
                "mavenSettings": "<settings/>"
            }
        })))
        .with_status(200)
        .create_async()
        .await;

    let settings = ProjectSettings::for_repository(
        "git.example.com",
        "infra/hub-sync",
        "master",
        ProjectKind::Java,
        Some("<settings/>".to_string()),
        "KEY",
    )
    .unwrap();
    upsource
        .create_project("infra-hub-sync", &settings)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_project_lifecycle_methods() {
    let (mut server, upsource) = common::upsource().await;
    let body = Matcher::Json(json!({ "projectId": "web-shop" }));
    let reset = server
        .mock("POST", "/~rpc/resetProject")
        .match_body(body.clone())
        .with_status(200)
        .create_async()
        .await;
    let delete = server
        .mock("POST", "/~rpc/deleteProject")
        .match_body(body)
        .with_status(200)
        .create_async()
        .await;
    let edit = server
        .mock("POST", "/~rpc/editProject")
        .match_body(Matcher::Json(json!({
            "projectId": "web-shop",
            "settings": { "defaultBranch": "main" }
        })))
        .with_status(200)
        .create_async()
        .await;

    upsource.reset_project("web-shop").await.unwrap();
    upsource
        .edit_project("web-shop", &json!({ "defaultBranch": "main" }))
        .await
        .unwrap();
    upsource.delete_project("web-shop").await.unwrap();

    reset.assert_async().await;
    edit.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_rpc_failures_are_classified() {
    let (mut server, upsource) = common::upsource().await;
    let _mock = server
        .mock("POST", "/~rpc/addUserRole")
        .with_status(500)
        .create_async()
        .await;

    let err = upsource
        .add_user_to_project("web-shop", "u-1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ResponseErrorKind::Server));
}
