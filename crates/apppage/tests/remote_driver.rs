//! RemoteDriver against an in-process fake Appium server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use apppage::prelude::*;
use apppage::{LEGACY_ELEMENT_KEY, W3C_ELEMENT_KEY};
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
struct Request {
    method: Method,
    path: String,
    body: Value,
}

#[derive(Debug, Clone, Default)]
struct FakeAppium {
    dialect: Dialect,
    element_present: bool,
    fail_start: bool,
    omit_session_id: bool,
    log: Arc<Mutex<Vec<Request>>>,
}

impl FakeAppium {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            element_present: true,
            ..Self::default()
        }
    }

    fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().clone()
    }

    fn paths(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    async fn serve(self) -> String {
        let app = Router::new().fallback(handle).with_state(self);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn ok(&self, value: Value) -> (StatusCode, Json<Value>) {
        match self.dialect {
            Dialect::W3c => (StatusCode::OK, Json(json!({ "value": value }))),
            Dialect::Legacy => (StatusCode::OK, Json(json!({ "status": 0, "value": value }))),
        }
    }

    fn fail(&self, message: &str) -> (StatusCode, Json<Value>) {
        match self.dialect {
            Dialect::W3c => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "value": { "error": "unknown error", "message": message } })),
            ),
            Dialect::Legacy => (
                StatusCode::OK,
                Json(json!({ "status": 13, "value": { "message": message } })),
            ),
        }
    }
}

async fn handle(
    State(fake): State<FakeAppium>,
    method: Method,
    uri: Uri,
    body: String,
) -> (StatusCode, Json<Value>) {
    let path = uri.path().to_string();
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    fake.log.lock().unwrap().push(Request {
        method: method.clone(),
        path: path.clone(),
        body: body.clone(),
    });

    if path == "/session" && method == Method::POST {
        if fake.omit_session_id {
            return fake.ok(json!({ "capabilities": {} }));
        }
        let id = uuid::Uuid::new_v4().to_string();
        return match fake.dialect {
            Dialect::W3c => (
                StatusCode::OK,
                Json(json!({ "value": { "sessionId": id, "capabilities": {} } })),
            ),
            Dialect::Legacy => (
                StatusCode::OK,
                Json(json!({ "status": 0, "sessionId": id, "value": {} })),
            ),
        };
    }

    let starts_app = path.ends_with("/appium/app/launch")
        || body["script"] == "mobile: activateApp";
    if fake.fail_start && starts_app {
        return fake.fail("app not installed");
    }

    if path.ends_with("/elements") {
        let key = match fake.dialect {
            Dialect::W3c => W3C_ELEMENT_KEY,
            Dialect::Legacy => LEGACY_ELEMENT_KEY,
        };
        let mut element = serde_json::Map::new();
        element.insert(key.to_string(), Value::from("el-1"));
        let found = if fake.element_present {
            vec![Value::Object(element)]
        } else {
            Vec::new()
        };
        return fake.ok(Value::Array(found));
    }

    fake.ok(Value::Null)
}

fn suffixes(paths: &[String], session: &str) -> Vec<String> {
    let prefix = format!("/session/{session}");
    paths.iter().map(|p| p.replace(&prefix, "")).collect()
}

#[tokio::test]
async fn w3c_session_open_close_quit() {
    let fake = FakeAppium::new(Dialect::W3c);
    let url = fake.clone().serve().await;
    let server = ServerConfig::new(url).with_dialect(Dialect::W3c);

    let driver = RemoteDriver::connect(&server, &apppage::calculator_capabilities())
        .await
        .unwrap();
    let session = driver.session_id().to_string();
    assert!(driver.owns_session());

    let page = AppPage::calculator(&driver);
    page.open().await.unwrap();
    page.close().await.unwrap();
    driver.quit().await.unwrap();

    assert_eq!(
        suffixes(&fake.paths(), &session),
        vec![
            "POST /session",
            "POST /timeouts",
            "POST /execute/sync",
            "POST /elements",
            "POST /execute/sync",
            "DELETE ",
        ]
    );

    let requests = fake.requests();
    assert_eq!(
        requests[0].body["capabilities"]["alwaysMatch"]["appium:appPackage"],
        "com.google.android.calculator"
    );
    assert_eq!(requests[1].body, json!({ "implicit": 10000 }));
    assert_eq!(
        requests[2].body,
        json!({
            "script": "mobile: activateApp",
            "args": [{ "appId": "com.google.android.calculator" }],
        })
    );
    assert_eq!(
        requests[3].body,
        json!({ "using": "id", "value": "com.google.android.calculator:id/main_calculator" })
    );
    assert_eq!(requests[4].body["script"], "mobile: terminateApp");
}

#[tokio::test]
async fn legacy_session_open_close_quit() {
    let fake = FakeAppium::new(Dialect::Legacy);
    let url = fake.clone().serve().await;
    let server = ServerConfig::new(url).with_dialect(Dialect::Legacy);

    let driver = RemoteDriver::connect(&server, &apppage::calculator_capabilities())
        .await
        .unwrap();
    let session = driver.session_id().to_string();

    let page = AppPage::calculator(&driver);
    page.open().await.unwrap();
    page.close().await.unwrap();
    driver.quit().await.unwrap();

    assert_eq!(
        suffixes(&fake.paths(), &session),
        vec![
            "POST /session",
            "POST /timeouts/implicit_wait",
            "POST /appium/app/launch",
            "POST /elements",
            "POST /appium/app/close",
            "DELETE ",
        ]
    );
    let requests = fake.requests();
    assert_eq!(
        requests[0].body["desiredCapabilities"]["platformName"],
        "Android"
    );
    assert_eq!(requests[1].body, json!({ "ms": 10000 }));
}

#[tokio::test]
async fn find_elements_decodes_both_element_keys() {
    for dialect in [Dialect::W3c, Dialect::Legacy] {
        let fake = FakeAppium::new(dialect);
        let url = fake.clone().serve().await;
        let driver = RemoteDriver::attach(&ServerConfig::new(url).with_dialect(dialect), "s-1")
            .unwrap();

        let found = driver
            .find_elements(&Selector::id("com.google.android.calculator:id/main_calculator"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), "el-1");
    }
}

#[tokio::test]
async fn start_failure_surfaces_as_webdriver_error() {
    for dialect in [Dialect::W3c, Dialect::Legacy] {
        let fake = FakeAppium {
            fail_start: true,
            ..FakeAppium::new(dialect)
        };
        let url = fake.clone().serve().await;
        let driver = RemoteDriver::attach(&ServerConfig::new(url).with_dialect(dialect), "s-1")
            .unwrap();

        let err = AppPage::calculator(&driver).open().await.unwrap_err();
        match err {
            PageError::WebDriver { error, message } => {
                assert_eq!(error, "unknown error");
                assert_eq!(message, "app not installed");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!fake.paths().iter().any(|p| p.ends_with("/elements")));
    }
}

#[tokio::test]
async fn absent_ready_element_does_not_fail_open() {
    let fake = FakeAppium {
        element_present: false,
        ..FakeAppium::new(Dialect::W3c)
    };
    let url = fake.clone().serve().await;
    let driver = RemoteDriver::attach(&ServerConfig::new(url), "s-1").unwrap();

    AppPage::calculator(&driver).open().await.unwrap();
    assert!(fake.paths().last().unwrap().ends_with("/elements"));
}

#[tokio::test]
async fn attached_session_is_not_created_or_deleted() {
    let fake = FakeAppium::new(Dialect::W3c);
    let url = fake.clone().serve().await;
    let driver = RemoteDriver::attach(&ServerConfig::new(url), "existing-session").unwrap();

    AppPage::calculator(&driver).close().await.unwrap();
    driver.quit().await.unwrap();

    assert_eq!(
        fake.paths(),
        vec!["POST /session/existing-session/execute/sync"]
    );
}

#[tokio::test]
async fn missing_session_id_is_invalid_session() {
    let fake = FakeAppium {
        omit_session_id: true,
        ..FakeAppium::new(Dialect::W3c)
    };
    let url = fake.clone().serve().await;

    let err = RemoteDriver::connect(&ServerConfig::new(url), &serde_json::Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PageError::InvalidSession { .. }));
}

#[tokio::test]
async fn unreachable_server_is_http_error() {
    let server = ServerConfig::new("http://127.0.0.1:9").with_request_timeout(2_000);
    let err = RemoteDriver::connect(&server, &serde_json::Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PageError::Http(_)));
}

#[tokio::test]
async fn legacy_session_launches_its_own_package() {
    let fake = FakeAppium::new(Dialect::Legacy);
    let url = fake.clone().serve().await;
    let server = ServerConfig::new(url).with_dialect(Dialect::Legacy);

    let mut caps = apppage::calculator_capabilities();
    caps.insert("appium:appPackage".into(), Value::from("com.example.notes"));
    let driver = RemoteDriver::connect(&server, &caps).await.unwrap();
    let session = driver.session_id().to_string();

    let page = AppPage::new(
        &driver,
        PageConfig::new("com.example.notes", Selector::accessibility_id("notes_list")),
    );
    page.open().await.unwrap();
    page.close().await.unwrap();
    driver.quit().await.unwrap();

    let requests = fake.requests();
    assert_eq!(
        requests[0].body["desiredCapabilities"]["appium:appPackage"],
        "com.example.notes"
    );
    assert_eq!(
        suffixes(&fake.paths(), &session)[2..5],
        ["POST /appium/app/launch", "POST /elements", "POST /appium/app/close"]
    );
    assert_eq!(
        requests[3].body,
        json!({ "using": "accessibility id", "value": "notes_list" })
    );
}

#[tokio::test]
async fn legacy_refuses_app_outside_session() {
    let fake = FakeAppium::new(Dialect::Legacy);
    let url = fake.clone().serve().await;
    let server = ServerConfig::new(url).with_dialect(Dialect::Legacy);
    let driver = RemoteDriver::connect(&server, &apppage::calculator_capabilities())
        .await
        .unwrap();

    let page = AppPage::new(
        &driver,
        PageConfig::new("com.example.notes", Selector::accessibility_id("notes_list")),
    );
    let err = page.open().await.unwrap_err();
    assert!(matches!(err, PageError::Driver { .. }));
    assert!(err.to_string().contains("com.example.notes"));

    let err = page.close().await.unwrap_err();
    assert!(matches!(err, PageError::Driver { .. }));

    // session creation and the implicit wait reached the server, nothing else
    let paths = fake.paths();
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| !p.contains("/appium/app/")));
    driver.quit().await.unwrap();
}

#[tokio::test]
async fn w3c_targets_configured_package() {
    let fake = FakeAppium::new(Dialect::W3c);
    let url = fake.clone().serve().await;
    let server = ServerConfig::new(url).with_dialect(Dialect::W3c);
    let driver = RemoteDriver::connect(&server, &apppage::calculator_capabilities())
        .await
        .unwrap();

    let page = AppPage::new(
        &driver,
        PageConfig::new("com.example.notes", Selector::accessibility_id("notes_list")),
    );
    page.open().await.unwrap();
    page.close().await.unwrap();

    let requests = fake.requests();
    assert_eq!(requests[2].body["args"][0]["appId"], "com.example.notes");
    assert_eq!(requests[4].body["args"][0]["appId"], "com.example.notes");
    driver.quit().await.unwrap();
}
