use crate::common::{self, page_query};
use futures::StreamExt;
use hub_sync::prelude::*;
use serde_json::Value;

#[tokio::test]
async fn test_paginate_walks_until_short_page() {
    let (mut server, client) = common::server_and_client().await;
    let first = server
        .mock("GET", "/api/rest/users")
        .match_query(page_query(2, 0, Some("login")))
        .with_status(200)
        .with_body(r#"{"users": [{"login": "a"}, {"login": "b"}], "total": 3}"#)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/api/rest/users")
        .match_query(page_query(2, 2, Some("login")))
        .with_status(200)
        .with_body(r#"{"users": [{"login": "c"}], "total": 3}"#)
        .expect(1)
        .create_async()
        .await;

    let users: Vec<HubUser> = client
        .paginate(
            "/api/rest/users",
            RequestOptions::new().query("fields", "login"),
            "users",
            2,
        )
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    let logins: Vec<_> = users.iter().filter_map(|u| u.login.as_deref()).collect();
    assert_eq!(logins, vec!["a", "b", "c"]);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_paginate_exact_multiple_needs_an_empty_page() {
    let (mut server, client) = common::server_and_client().await;
    let full = server
        .mock("GET", "/items")
        .match_query(page_query(2, 0, None))
        .with_status(200)
        .with_body(r#"{"items": [1, 2]}"#)
        .expect(1)
        .create_async()
        .await;
    let empty = server
        .mock("GET", "/items")
        .match_query(page_query(2, 2, None))
        .with_status(200)
        .with_body(r#"{"items": []}"#)
        .expect(1)
        .create_async()
        .await;

    let items: Vec<u32> = client
        .paginate("/items", RequestOptions::new(), "items", 2)
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    assert_eq!(items, vec![1, 2]);
    full.assert_async().await;
    empty.assert_async().await;
}

#[tokio::test]
async fn test_paginate_missing_key_ends_quietly() {
    let (mut server, client) = common::server_and_client().await;
    let mock = server
        .mock("GET", "/items")
        .match_query(page_query(10, 0, None))
        .with_status(200)
        .with_body(r#"{"error": "unexpected shape"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut paginator = client
        .paginate::<Value>("/items", RequestOptions::new(), "items", 10)
        .unwrap();

    assert!(paginator.next().await.is_none());
    assert_eq!(paginator.pages_fetched(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_paginate_surfaces_failing_page() {
    let (mut server, client) = common::server_and_client().await;
    let _first = server
        .mock("GET", "/items")
        .match_query(page_query(1, 0, None))
        .with_status(200)
        .with_body(r#"{"items": ["a"]}"#)
        .create_async()
        .await;
    let _second = server
        .mock("GET", "/items")
        .match_query(page_query(1, 1, None))
        .with_status(403)
        .create_async()
        .await;

    let mut paginator = client
        .paginate::<String>("/items", RequestOptions::new(), "items", 1)
        .unwrap();

    assert_eq!(paginator.next().await.unwrap().unwrap(), "a");
    let err = paginator.next().await.unwrap().unwrap_err();
    assert_eq!(err.kind(), Some(ResponseErrorKind::Auth));
    assert!(paginator.next().await.is_none());
}

#[tokio::test]
async fn test_paginate_as_stream() {
    let (mut server, client) = common::server_and_client().await;
    let _first = server
        .mock("GET", "/items")
        .match_query(page_query(2, 0, None))
        .with_status(200)
        .with_body(r#"{"items": ["a", "b"]}"#)
        .create_async()
        .await;
    let _second = server
        .mock("GET", "/items")
        .match_query(page_query(2, 2, None))
        .with_status(200)
        .with_body(r#"{"items": ["c"]}"#)
        .create_async()
        .await;

    let items: Vec<AppResult<String>> = client
        .paginate::<String>("/items", RequestOptions::new(), "items", 2)
        .unwrap()
        .into_stream()
        .collect()
        .await;

    let items: Vec<String> = items.into_iter().map(Result::unwrap).collect();
    assert_eq!(items, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_paginate_rejects_zero_top() {
    let (_server, client) = common::server_and_client().await;
    let result = client.paginate::<Value>("/items", RequestOptions::new(), "items", 0);
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}
