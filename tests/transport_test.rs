mod common;

use common::http_server;
use rawfetch::{
    Credentials, Engine, HttpRequest, ProviderKind, RawfetchError, ReqwestTransport, Transport,
};
use reqwest::StatusCode;

fn creds(pairs: &'static [(&'static str, &'static str)]) -> Credentials {
    Credentials::from_lookup(|k| {
        pairs
            .iter()
            .find(|(name, _)| *name == k)
            .map(|(_, v)| v.to_string())
    })
}

#[test]
fn transport_returns_non_ok_status_without_error() {
    let base = http_server::start(|_| (401, "denied".into()));
    let transport = ReqwestTransport::new().unwrap();

    let resp = transport
        .get(&HttpRequest::get(&format!("{base}/f.txt")))
        .unwrap();
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body, "denied");
}

#[test]
fn transport_sends_headers_and_basic_auth() {
    let base = http_server::start(|req| {
        let ok = req.header("private-token") == Some("glpat")
            && req.header("authorization") == Some("Basic bWU6YXBwLXBhc3M=");
        if ok {
            (200, "ok".into())
        } else {
            (400, format!("{:?}", req.headers))
        }
    });
    let transport = ReqwestTransport::new().unwrap();

    let request = HttpRequest::get(&format!("{base}/f.txt"))
        .with_header("PRIVATE-TOKEN", "glpat")
        .with_basic_auth("me", "app-pass");
    let resp = transport.get(&request).unwrap();
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
}

#[test]
fn generic_fetch_over_http() {
    let base = http_server::start(|req| {
        if req.path == "/notes.txt" {
            (200, "hello".into())
        } else {
            (404, String::new())
        }
    });
    let transport = ReqwestTransport::new().unwrap();
    let engine = Engine::new(&transport, Credentials::default());

    let result = engine.fetch(&format!("{base}/notes.txt")).unwrap();
    assert_eq!(result.provider, ProviderKind::Generic);
    assert_eq!(result.text, "hello");

    let err = engine.fetch(&format!("{base}/missing.txt")).unwrap_err();
    assert!(matches!(
        err,
        RawfetchError::FetchFailed { status, .. } if status == StatusCode::NOT_FOUND
    ));
}

#[test]
fn github_style_url_retries_with_token_over_http() {
    let base = http_server::start(|req| {
        if req.path != "/raw.githubusercontent.com/org/repo/main/f.txt" {
            return (404, String::new());
        }
        match req.header("authorization") {
            Some("token ghp_test") => (200, "content".into()),
            _ => (401, String::new()),
        }
    });
    let transport = ReqwestTransport::new().unwrap();
    let engine = Engine::new(&transport, creds(&[("GITHUB_TOKEN", "ghp_test")]));

    let result = engine
        .fetch(&format!("{base}/github.com/org/repo/blob/main/f.txt"))
        .unwrap();
    assert_eq!(result.provider, ProviderKind::GitHub);
    assert_eq!(result.attempts, 2);
    assert_eq!(result.text, "content");
}

#[test]
fn bitbucket_style_url_retries_with_basic_auth_over_http() {
    let base = http_server::start(|req| {
        if !req.path.starts_with("/api.bitbucket.org/2.0/repositories/") {
            return (404, String::new());
        }
        match req.header("authorization") {
            Some("Basic bWU6YXBwLXBhc3M=") => (200, "bb".into()),
            _ => (401, String::new()),
        }
    });
    let transport = ReqwestTransport::new().unwrap();
    let engine = Engine::new(
        &transport,
        creds(&[("BITBUCKET_USERNAME", "me"), ("BITBUCKET_APP_PASSWORD", "app-pass")]),
    );

    let text = engine
        .fetch_text(&format!("{base}/bitbucket.org/org/repo/src/main/f.txt"))
        .unwrap();
    assert_eq!(text, "bb");
}

#[test]
fn wrong_token_fails_after_single_retry() {
    let base = http_server::start(|_| (401, String::new()));
    let transport = ReqwestTransport::new().unwrap();
    let engine = Engine::new(&transport, creds(&[("GITLAB_TOKEN", "wrong")]));

    let err = engine
        .fetch(&format!("{base}/gitlab.com/org/repo/-/blob/main/f.txt"))
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(
        err,
        RawfetchError::FetchFailed { status, .. } if status == StatusCode::UNAUTHORIZED
    ));
}

#[test]
fn connection_failure_is_a_transport_error() {
    let transport = ReqwestTransport::new().unwrap();
    let engine = Engine::new(&transport, Credentials::default());

    let err = engine.fetch(&http_server::closed_port_url()).unwrap_err();
    match err {
        RawfetchError::Transport(source) => {
            assert!(source.downcast_ref::<reqwest::Error>().is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unsendable_token_is_fatal_on_retry() {
    let base = http_server::start(|_| (401, String::new()));
    let transport = ReqwestTransport::new().unwrap();
    let engine = Engine::new(&transport, creds(&[("GITHUB_TOKEN", "ab\ncd")]));

    let err = engine
        .fetch(&format!("{base}/github.com/org/repo/blob/main/f.txt"))
        .unwrap_err();
    assert!(matches!(err, RawfetchError::InvalidRequest(_)), "{err:?}");
    assert!(err.is_fatal());
}
