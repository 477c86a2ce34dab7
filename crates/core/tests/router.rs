use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use quarkboard_api::models::PluginDescriptor;
use quarkboard_core::{AppState, Emitter, MountTable, Provenance, Template, build_router};
use quarkboard_plugin::{PagePlugin, PluginRegistry};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct Fixed(PluginDescriptor);

impl PagePlugin for Fixed {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.0
    }
}

fn write(dir: &Path, file: &str, content: &str) {
    let path = dir.join(file);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Two plugins with js dirs; `off` is disabled.
fn setup(template: &str) -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "clock/js/tick.js", "console.log('tick');");
    write(dir.path(), "off/js/off.js", "console.log('off');");

    let mut registry = PluginRegistry::new();
    registry
        .register(Arc::new(Fixed(
            PluginDescriptor::new("clock")
                .with_asset("js", dir.path().join("clock/js"))
                .with_script("tick.js"),
        )))
        .unwrap();
    registry
        .register(Arc::new(Fixed(
            PluginDescriptor::new("off")
                .with_enabled(false)
                .with_asset("js", dir.path().join("off/js"))
                .with_script("off.js"),
        )))
        .unwrap();

    let mounts = MountTable::build(&registry);
    let state = AppState::new(
        Template::from_source(template),
        registry,
        Emitter::new(Provenance::new("1.2.3", "https://example.com/quarkboard")),
    );
    (dir, build_router(state, &mounts))
}

async fn get(router: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

fn assert_provenance(headers: &axum::http::HeaderMap) {
    assert_eq!(headers.get("x-quarkboard-version").unwrap(), "1.2.3");
    assert_eq!(
        headers.get("x-quarkboard-repository").unwrap(),
        "https://example.com/quarkboard"
    );
}

fn assert_security_headers(headers: &axum::http::HeaderMap) {
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN");
    assert_eq!(headers.get("referrer-policy").unwrap(), "no-referrer");
    assert_eq!(headers.get("x-dns-prefetch-control").unwrap(), "off");
    assert_eq!(headers.get("x-permitted-cross-domain-policies").unwrap(), "none");
    assert!(headers.get("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let (_dir, router) = setup("<html><head></head><body></body></html>");
    for (uri, expected) in [
        ("/", StatusCode::OK),
        ("/clock/js/tick.js", StatusCode::OK),
        ("/nowhere", StatusCode::NOT_FOUND),
        ("/clock/js/missing.js", StatusCode::NOT_FOUND),
    ] {
        let (status, headers, _) = get(&router, uri).await;
        assert_eq!(status, expected, "{uri}");
        assert_security_headers(&headers);
    }
}

#[tokio::test]
async fn test_root_serves_composed_page() {
    let (_dir, router) = setup("<html><head></head><body></body></html>");
    let (status, headers, body) = get(&router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(
        headers
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert_provenance(&headers);
    assert_eq!(
        body,
        "<html><head></head><body><script src=\"/clock/js/tick.js\" type=\"application/javascript\"></script></body></html>"
    );
}

#[tokio::test]
async fn test_static_asset_is_served_with_headers() {
    let (_dir, router) = setup("<html></html>");
    let (status, headers, body) = get(&router, "/clock/js/tick.js").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "console.log('tick');");
    assert_provenance(&headers);
}

#[tokio::test]
async fn test_disabled_plugin_assets_stay_reachable() {
    let (_dir, router) = setup("<html></html>");
    let (status, _, body) = get(&router, "/off/js/off.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "console.log('off');");

    let (_, _, page) = get(&router, "/").await;
    assert!(!page.contains("off.js"));
}

#[tokio::test]
async fn test_unknown_paths_are_not_found() {
    let (_dir, router) = setup("<html></html>");

    let (status, headers, _) = get(&router, "/unknown/js/x.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_provenance(&headers);

    let (status, _, _) = get(&router, "/clock/js/missing.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get(&router, "/clock/css/tick.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_template_is_server_error() {
    let (_dir, router) = setup("<html><body></span>");
    let (status, headers, _) = get(&router, "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_provenance(&headers);

    // Static serving is unaffected.
    let (status, _, _) = get(&router, "/clock/js/tick.js").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let (_dir, router) = setup("<html><head></head><body><p>hi</p></body></html>");
    let (_, _, first) = get(&router, "/").await;
    let (_, _, second) = get(&router, "/").await;
    assert_eq!(first, second);
}
