use crate::error::Result;
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::net::SocketAddr;
use tether_engine::EngineError;

pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>)> {
    let Json(request) = payload?;
    let mapping = state
        .engine()
        .create(
            &request.url,
            request.custom_alias.as_deref().filter(|alias| !alias.is_empty()),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse::new(mapping, state.base_url())),
    ))
}

/// `/shorten` is a fixed route, so a mapping whose code is literally
/// `shorten` is served by these handlers instead of the `/{short_code}` ones.
const SHORTEN_CODE: &str = "shorten";

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response> {
    redirect(&state, &short_code, peer, &headers).await
}

pub async fn redirect_shorten_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response> {
    redirect(&state, SHORTEN_CODE, peer, &headers).await
}

pub async fn deactivate_url_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    deactivate(&state, short_code).await
}

pub async fn deactivate_shorten_handler(State(state): State<AppState>) -> Result<StatusCode> {
    deactivate(&state, SHORTEN_CODE.to_string()).await
}

async fn redirect(
    state: &AppState,
    short_code: &str,
    peer: SocketAddr,
    headers: &HeaderMap,
) -> Result<Response> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let mapping = state
        .engine()
        .resolve(short_code, &peer.ip().to_string(), user_agent)
        .await?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, mapping.original_url)],
    )
        .into_response())
}

async fn deactivate(state: &AppState, short_code: String) -> Result<StatusCode> {
    if state.engine().deactivate(&short_code).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(EngineError::NotFound(short_code).into())
    }
}
