// Common utilities for integration tests

use hub_sync::prelude::*;
use mockito::{Matcher, ServerGuard};

/// Basic auth header for `user:pass`
pub const BASIC_USER_PASS: &str = "Basic dXNlcjpwYXNz";

/// Starts a mock server and a client authenticated as `user:pass` against it
pub async fn server_and_client() -> (ServerGuard, RestClient) {
    setup_logger();
    let server = mockito::Server::new_async().await;
    let client = RestClient::new(server.url(), Credentials::basic("user", "pass"))
        .expect("Failed to build client");
    (server, client)
}

/// Hub client with the given page size on top of a fresh mock server
pub async fn hub(page_size: u32) -> (ServerGuard, HubClient) {
    let (server, rest) = server_and_client().await;
    let hub = HubClient::new(rest, page_size).expect("Failed to build Hub client");
    (server, hub)
}

/// Upsource client on top of a fresh mock server
pub async fn upsource() -> (ServerGuard, UpsourceClient) {
    let (server, rest) = server_and_client().await;
    (server, UpsourceClient::new(rest))
}

/// Query matcher for one page of a paginated request
pub fn page_query(top: u32, skip: u64, fields: Option<&str>) -> Matcher {
    let mut matchers = vec![
        Matcher::UrlEncoded("$top".into(), top.to_string()),
        Matcher::UrlEncoded("$skip".into(), skip.to_string()),
    ];
    if let Some(fields) = fields {
        matchers.push(Matcher::UrlEncoded("fields".into(), fields.into()));
    }
    Matcher::AllOf(matchers)
}
