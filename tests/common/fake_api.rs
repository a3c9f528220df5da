//! Fake USGS feed + geocoder HTTP server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `GET /summary/{file}` — GeoJSON bodies registered with [`FakeApi::set_feed`]
//! - `GET /search?country=…` — geocoder results registered with [`FakeApi::set_place`]
//!
//! Unknown feeds answer 404; unknown countries answer `[]`, like Nominatim.
//! Every request's path, query and `User-Agent` are recorded.
//!
//! ```rust,no_run
//! let api = FakeApi::start().await.unwrap();
//! api.set_feed("all_day", FEED_DAY).await;
//! api.set_place("India", PLACE_INDIA).await;
//! // --feed-url api.feed_base_url() --geocode-url api.geocode_url()
//! ```

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A request as the fake server saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub path: String,
    pub query: HashMap<String, String>,
    pub user_agent: Option<String>,
}

#[derive(Default)]
struct ApiState {
    /// Keyed by feed path segment without extension, e.g. `all_day`.
    feeds: HashMap<String, (StatusCode, String)>,
    /// Keyed by the exact `country` query value.
    places: HashMap<String, String>,
    requests: Vec<Recorded>,
}

type Shared = Arc<Mutex<ApiState>>;

/// Handle to the running fake server.
pub struct FakeApi {
    addr: SocketAddr,
    state: Shared,
}

impl FakeApi {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Shared::default();

        let app = Router::new()
            .route("/summary/{file}", get(serve_feed))
            .route("/search", get(search))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Directory URL holding `<feed>.geojson` files.
    pub fn feed_base_url(&self) -> String {
        format!("http://{}/summary", self.addr)
    }

    pub fn geocode_url(&self) -> String {
        format!("http://{}/search", self.addr)
    }

    pub async fn set_feed(&self, feed: &str, body: &str) {
        self.set_feed_status(feed, StatusCode::OK, body).await;
    }

    pub async fn set_feed_status(&self, feed: &str, status: StatusCode, body: &str) {
        let mut state = self.state.lock().await;
        state.feeds.insert(feed.to_string(), (status, body.to_string()));
    }

    pub async fn set_place(&self, country: &str, body: &str) {
        let mut state = self.state.lock().await;
        state.places.insert(country.to_string(), body.to_string());
    }

    pub async fn requests(&self) -> Vec<Recorded> {
        self.state.lock().await.requests.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

fn record(state: &mut ApiState, path: String, query: HashMap<String, String>, headers: &HeaderMap) {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.push(Recorded { path, query, user_agent });
}

async fn serve_feed(
    Path(file): Path<String>,
    headers: HeaderMap,
    State(state): State<Shared>,
) -> impl IntoResponse {
    let mut state = state.lock().await;
    record(&mut state, format!("/summary/{file}"), HashMap::new(), &headers);

    let feed = file.strip_suffix(".geojson").unwrap_or(&file);
    match state.feeds.get(feed) {
        Some((status, body)) => (*status, body.clone()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

async fn search(
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    State(state): State<Shared>,
) -> impl IntoResponse {
    let mut state = state.lock().await;
    let country = query.get("country").cloned().unwrap_or_default();
    record(&mut state, "/search".to_string(), query, &headers);

    let body = state.places.get(&country).cloned().unwrap_or_else(|| "[]".to_string());
    (StatusCode::OK, body)
}
