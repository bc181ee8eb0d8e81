//! warp filters and handlers for the API routes

use std::convert::Infallible;
use std::sync::Arc;

use amp_api::{AmpController, ApiError, CommandReply, ErrorKind, ValidationError};
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::{debug, error, warn};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Largest accepted command envelope
const MAX_BODY_BYTES: u64 = 64 * 1024;

/// All API routes with rejection handling attached
pub fn routes(
    controller: Arc<AmpController>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let with_controller = warp::any().map(move || Arc::clone(&controller));
    let api = warp::path("api").and(warp::path::end());

    let get_state = api
        .and(warp::get())
        .and(with_controller.clone())
        .and_then(get_state);

    let post_command = api
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_controller)
        .and_then(post_command);

    get_state
        .or(post_command)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

/// HTTP status for a failed command
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation | ErrorKind::UnknownCommand => StatusCode::BAD_REQUEST,
        ErrorKind::Hardware => StatusCode::BAD_GATEWAY,
    }
}

/// The blocking engine task panicked or was cancelled
#[derive(Debug)]
struct EngineTaskFailed;

impl warp::reject::Reject for EngineTaskFailed {}

async fn get_state(controller: Arc<AmpController>) -> Result<impl Reply, Rejection> {
    let state = tokio::task::spawn_blocking(move || controller.get_state())
        .await
        .map_err(|err| {
            error!(%err, "state read task failed");
            warp::reject::custom(EngineTaskFailed)
        })?;
    Ok(warp::reply::json(&state))
}

async fn post_command(
    body: Bytes,
    controller: Arc<AmpController>,
) -> Result<impl Reply, Rejection> {
    let envelope: Value = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            debug!(%err, "rejecting malformed request body");
            let err = ApiError::from(ValidationError::custom(
                "body",
                format!("invalid JSON: {err}"),
            ));
            return Ok(reply_with_status(&err.into()));
        }
    };

    let command = envelope
        .get("command")
        .and_then(Value::as_str)
        .unwrap_or("<missing>")
        .to_string();

    let result = tokio::task::spawn_blocking(move || controller.parse_cmd(&envelope))
        .await
        .map_err(|err| {
            error!(%err, command = %command, "command task failed");
            warp::reject::custom(EngineTaskFailed)
        })?;

    match &result {
        Ok(()) => debug!(command = %command, "command applied"),
        Err(err @ ApiError::Hardware(_)) => warn!(command = %command, %err, "command failed in hardware"),
        Err(err) => debug!(command = %command, kind = %err.kind(), %err, "command rejected"),
    }

    Ok(reply_with_status(&result.into()))
}

fn reply_with_status(reply: &CommandReply) -> warp::reply::WithStatus<warp::reply::Json> {
    let status = reply.error_kind().map_or(StatusCode::OK, status_for);
    warp::reply::with_status(warp::reply::json(reply), status)
}

/// Handle rejections and convert them to HTTP responses.
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "no such route";
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = StatusCode::PAYLOAD_TOO_LARGE;
        message = "command envelope too large";
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        code = StatusCode::LENGTH_REQUIRED;
        message = "command envelope needs a content-length";
    } else if err.find::<EngineTaskFailed>().is_some() {
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "command engine failure";
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        // a POST body rejection is combined with the GET branch's method
        // rejection, so this is checked last
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "method not allowed";
    } else {
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "internal server error";
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "error": message })),
        code,
    ))
}
