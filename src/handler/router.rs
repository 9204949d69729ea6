//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route matching, method
//! dispatch, body size validation on create, and access logging.

use crate::config::AppState;
use crate::handler::albums;
use crate::http;
use crate::logger::{self, AccessLogEntry, AccessLogFormat};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const COLLECTION_PATH: &str = "/albums";
const ITEM_PREFIX: &str = "/albums/";

/// Album routes recognised by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumRoute<'a> {
    /// `/albums`
    Collection,
    /// `/albums/{id}`, id still percent-encoded and possibly empty
    Item(&'a str),
}

impl<'a> AlbumRoute<'a> {
    pub fn parse(path: &'a str) -> Option<Self> {
        if path == COLLECTION_PATH {
            return Some(Self::Collection);
        }
        path.strip_prefix(ITEM_PREFIX).map(Self::Item)
    }
}

/// Percent-decode an item id; `None` when empty or not valid UTF-8
pub fn decode_album_id(raw: &str) -> Option<String> {
    urlencoding::decode(raw)
        .ok()
        .map(std::borrow::Cow::into_owned)
        .filter(|id| !id.is_empty())
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = state
        .access_log()
        .then(|| AccessLogEntry::start(&req, remote_addr));

    let mut response = route_request(req, &state).await;

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes, started.elapsed());
        logger::log_access(
            entry,
            &AccessLogFormat::parse(&state.config.logging.access_log_format),
        );
    }

    Ok(response)
}

/// Route request based on path and method
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    // Health check endpoints
    let health = &state.config.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        if method != Method::GET && method != Method::HEAD {
            return method_not_allowed(&method, "GET, HEAD");
        }
        if path == health.liveness_path {
            return http::build_health_response("ok");
        }
        return match state.store.ping().await {
            Ok(()) => http::build_health_response("ok"),
            Err(e) => http::json_error(StatusCode::SERVICE_UNAVAILABLE, &e.to_string()),
        };
    }

    let store = state.store.as_ref();
    match AlbumRoute::parse(&path) {
        Some(AlbumRoute::Collection) => match method {
            Method::GET => albums::list_albums(store).await,
            Method::POST => match read_body(req, state.config.http.max_body_size).await {
                Ok(body) => albums::create_album(store, &body).await,
                Err(resp) => resp,
            },
            _ => method_not_allowed(&method, "GET, POST"),
        },
        Some(AlbumRoute::Item(raw_id)) => {
            let Some(id) = decode_album_id(raw_id) else {
                return albums::invalid_id();
            };
            match method {
                Method::GET => albums::get_album(store, &id).await,
                Method::DELETE => albums::delete_album(store, &id).await,
                _ => method_not_allowed(&method, "GET, DELETE"),
            }
        }
        None => http::build_404_response(),
    }
}

fn method_not_allowed(method: &Method, allow: &'static str) -> Response<Full<Bytes>> {
    logger::log_warning(&format!("Method not allowed: {method}"));
    http::build_405_response(allow)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Read the whole body, rejecting a declared or actual size over the limit
async fn read_body<B>(req: Request<B>, max_body_size: u64) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if let Some(resp) = check_body_size(&req, max_body_size) {
        return Err(resp);
    }
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!("Request body exceeded {max_body_size} bytes"));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(albums::invalid_body())
        }
    }
}
