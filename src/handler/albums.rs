//! Album handlers
//!
//! One function per operation: call the store once, then shape the result
//! into a status code and JSON body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::http;
use crate::logger;
use crate::model::Album;
use crate::store::{AlbumStore, StoreError};

/// GET /albums
pub async fn list_albums(store: &dyn AlbumStore) -> Response<Full<Bytes>> {
    match store.list_all().await {
        Ok(albums) => http::json_response(StatusCode::OK, &albums),
        Err(e) => store_failure(&e),
    }
}

/// POST /albums
pub async fn create_album(store: &dyn AlbumStore, body: &[u8]) -> Response<Full<Bytes>> {
    let album: Album = match serde_json::from_slice(body) {
        Ok(album) => album,
        Err(e) => {
            logger::log_warning(&format!("Rejected album body: {e}"));
            return invalid_body();
        }
    };

    match store.insert(album).await {
        Ok(created) => http::json_response(StatusCode::CREATED, &created),
        Err(e) => store_failure(&e),
    }
}

/// GET /albums/{id}
pub async fn get_album(store: &dyn AlbumStore, id: &str) -> Response<Full<Bytes>> {
    match store.find_by_id(id).await {
        Ok(album) => http::json_response(StatusCode::OK, &album),
        Err(e) => store_failure(&e),
    }
}

/// DELETE /albums/{id}
pub async fn delete_album(store: &dyn AlbumStore, id: &str) -> Response<Full<Bytes>> {
    match store.delete_by_id(id).await {
        Ok(0) => not_found(),
        Ok(_) => http::build_204_response(),
        Err(e) => store_failure(&e),
    }
}

pub fn invalid_body() -> Response<Full<Bytes>> {
    http::json_error(StatusCode::BAD_REQUEST, "Invalid request body")
}

pub fn invalid_id() -> Response<Full<Bytes>> {
    http::json_error(StatusCode::BAD_REQUEST, "Invalid album ID")
}

fn not_found() -> Response<Full<Bytes>> {
    http::json_error(StatusCode::NOT_FOUND, "album not found")
}

/// Map a store error; everything except a missing row is a 500 with the driver message
fn store_failure(error: &StoreError) -> Response<Full<Bytes>> {
    match error {
        StoreError::NotFound => not_found(),
        StoreError::Database(message) => {
            logger::log_error(&format!("Store error: {message}"));
            http::json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}
