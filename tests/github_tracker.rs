//! Integration tests for the live GitHub tracker against a wiremock server.

use github_lockify::adapters::live::github::GithubTracker;
use github_lockify::error::TrackerError;
use github_lockify::model::Credential;
use github_lockify::ports::tracker::IssueTracker;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn issue(number: u64, pull_request: bool) -> Value {
    let mut issue = json!({
        "number": number,
        "title": format!("Issue {number}"),
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-02-01T00:00:00Z",
        "closed_at": "2024-02-01T00:00:00Z",
        "locked": false,
        "labels": [{"name": "bug", "color": "d73a4a"}],
        "assignee": null,
        "user": {"login": "octocat", "id": 1},
        "state": "closed",
    });
    if pull_request {
        issue["pull_request"] = json!({"url": "https://api.github.com/repos/octo/hello/pulls/2"});
    }
    issue
}

#[tokio::test]
async fn listing_decodes_issues_and_next_link() {
    let mock_server = MockServer::start().await;
    let next = format!("{}/repositories/42/issues?state=closed&page=2", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/repos/octo/hello/issues"))
        .and(query_param("state", "closed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([issue(1, false), issue(2, true)]))
                .insert_header("link", format!(r#"<{next}>; rel="next", <{next}9>; rel="last""#).as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/repos/octo/hello/issues?state=closed&direction=asc", mock_server.uri());
    let page = GithubTracker::new().list_issues(&url, None).await.unwrap();

    assert_eq!(page.issues.len(), 2);
    assert_eq!(page.issues[0].number, 1);
    assert_eq!(page.issues[0].label_names().collect::<Vec<_>>(), ["bug"]);
    assert!(page.issues[1].is_pull_request());
    assert_eq!(page.next.as_deref(), Some(next.as_str()));
}

#[tokio::test]
async fn last_page_has_no_next_link() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let url = format!("{}/repos/octo/hello/issues", mock_server.uri());
    let page = GithubTracker::new().list_issues(&url, None).await.unwrap();

    assert!(page.issues.is_empty());
    assert_eq!(page.next, None);
}

#[tokio::test]
async fn lock_sends_token_and_github_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/repos/octo/hello/issues/7/lock"))
        .and(query_param("lock_reason", "resolved"))
        .and(header("authorization", "token ghp_live"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("content-length", "0"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/repos/octo/hello/issues/7/lock?lock_reason=resolved", mock_server.uri());
    let credential = Credential::new("ghp_live");
    GithubTracker::new().lock_issue(&url, Some(&credential)).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.starts_with("github-lockify/"), "{agent}");
}

#[tokio::test]
async fn anonymous_listing_sends_no_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([issue(3, false)])))
        .mount(&mock_server)
        .await;

    let url = format!("{}/repos/octo/hello/issues", mock_server.uri());
    GithubTracker::new().list_issues(&url, None).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn api_error_message_is_reported_with_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Must have admin rights to Repository.",
            "documentation_url": "https://docs.github.com/rest/issues/issues#lock-an-issue",
        })))
        .mount(&mock_server)
        .await;

    let url = format!("{}/repos/octo/hello/issues/3/lock?lock_reason=resolved", mock_server.uri());
    let err = GithubTracker::new().lock_issue(&url, Some(&Credential::new("ghp_live"))).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    match err {
        TrackerError::Http { method, url: failed, message, .. } => {
            assert_eq!(method, "PUT");
            assert_eq!(failed, url);
            assert_eq!(message, "Must have admin rights to Repository.");
        }
        other => panic!("expected an HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_is_kept_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/repos/octo/hello/issues", mock_server.uri());
    let err = GithubTracker::new().list_issues(&url, None).await.unwrap_err();

    assert!(
        matches!(err, TrackerError::Http { status: 502, ref message, .. } if message == "Bad Gateway"),
        "{err:?}"
    );
}

#[tokio::test]
async fn unexpected_listing_shape_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "not a list"})))
        .mount(&mock_server)
        .await;

    let url = format!("{}/repos/octo/hello/issues", mock_server.uri());
    let err = GithubTracker::new().list_issues(&url, None).await.unwrap_err();

    assert!(matches!(err, TrackerError::Decode { url: ref failed, .. } if *failed == url), "{err:?}");
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/repos/octo/hello/issues", listener.local_addr().unwrap());
    drop(listener);

    let err = GithubTracker::new().list_issues(&url, None).await.unwrap_err();

    assert!(matches!(err, TrackerError::Transport { ref method, .. } if method == "GET"), "{err:?}");
}
