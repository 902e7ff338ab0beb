use airthings_proxy::airthings::AirthingsClient;
use airthings_proxy::config::{
    BEDROOM_DEVICE_ID_VAR, CLIENT_ID_VAR, CLIENT_SECRET_VAR, Endpoints, OFFICE_DEVICE_ID_VAR,
};
use airthings_proxy::{AppState, build_router};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use mock_airthings::MockState;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::task::JoinHandle;
use tower::util::ServiceExt; // for `oneshot`

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const OFFICE: &str = "2960000001";
pub const BEDROOM: &str = "3210000001";

pub struct Upstream {
    pub endpoints: Endpoints,
    handle: JoinHandle<()>,
}

impl Drop for Upstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn serve(router: Router) -> Upstream {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Upstream {
        endpoints: Endpoints {
            token_url: format!("http://{addr}/v1/token"),
            api_base: format!("http://{addr}/v1"),
        },
        handle,
    }
}

/// The mock vendor with the test credentials and whatever devices the caller adds.
pub async fn serve_vendor(devices: &[(&str, Value)]) -> Upstream {
    let mut state = MockState::new(CLIENT_ID, CLIENT_SECRET);
    for (id, sample) in devices {
        state = state.with_device(*id, sample.clone());
    }
    serve(mock_airthings::build_router(Arc::new(state))).await
}

/// An upstream that only counts how often it is hit.
pub async fn serve_counter() -> (Upstream, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().fallback(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    });
    (serve(router).await, hits)
}

pub fn proxy(endpoints: &Endpoints) -> Router {
    let client = AirthingsClient::new(reqwest::Client::new(), endpoints.clone());
    build_router(Arc::new(AppState::new(client)))
}

pub fn set_credentials(secret: &str, office: Option<&str>, bedroom: Option<&str>) {
    unsafe {
        std::env::set_var(CLIENT_ID_VAR, CLIENT_ID);
        std::env::set_var(CLIENT_SECRET_VAR, secret);
        match office {
            Some(id) => std::env::set_var(OFFICE_DEVICE_ID_VAR, id),
            None => std::env::remove_var(OFFICE_DEVICE_ID_VAR),
        }
        match bedroom {
            Some(id) => std::env::set_var(BEDROOM_DEVICE_ID_VAR, id),
            None => std::env::remove_var(BEDROOM_DEVICE_ID_VAR),
        }
    }
}

pub fn clear_credentials() {
    unsafe {
        for key in [
            CLIENT_ID_VAR,
            CLIENT_SECRET_VAR,
            OFFICE_DEVICE_ID_VAR,
            BEDROOM_DEVICE_ID_VAR,
        ] {
            std::env::remove_var(key);
        }
    }
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub async fn call(app: Router, method: Method, uri: &str) -> Reply {
    let resp = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = to_bytes(resp.into_body(), 64 * 1024).await.unwrap().to_vec();
    Reply {
        status,
        headers,
        body,
    }
}

pub fn assert_cors(headers: &HeaderMap) {
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
}
