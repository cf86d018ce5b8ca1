// # HTTP Surface
//
// Routes, keyed by path and method:
//
// - `POST /dns`     update the caller's record
// - `GET  /myip`    echo the caller's source IP
// - `GET  /version` service version and author
// - `GET  /info`    describe the incoming request
// - `GET  /script`  download the client update script
//
// Anything else answers "Resource / Handler mapping not found.". Every
// response is HTTP 200; the outcome travels in the body.

use axum::extract::{ConnectInfo, Query, Request, State};
use axum::http::{Extensions, HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use dyndns_core::response::{CONTENT_TYPE_TEXT, STATUS_CODE_OK};
use dyndns_core::{Error, FunctionResponse, RequestProcessor, ResponseFormat};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

const UNMAPPED: &str = "Resource / Handler mapping not found.";
const MISSING_HOSTNAME: &str = "You have to pass 'hostname' querystring parameters.";
const MISSING_HASH: &str = "You have to pass 'hash' querystring parameters.";
const MISSING_SOURCE_IP: &str = "Source IP address cannot be extracted from request context.";
const SCRIPT_NOT_CONFIGURED: &str = "No client script is configured.";

type Params = HashMap<String, String>;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    processor: Arc<RequestProcessor>,
    trust_forwarded_for: bool,
    script_file: Option<PathBuf>,
}

impl AppState {
    pub fn new(processor: Arc<RequestProcessor>, trust_forwarded_for: bool) -> Self {
        Self {
            processor,
            trust_forwarded_for,
            script_file: None,
        }
    }

    /// Serve `path` on `GET /script`
    pub fn with_script_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.script_file = Some(path.into());
        self
    }
}

/// Adapter from the framework-neutral response to axum
pub struct HttpResponse(pub FunctionResponse);

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::OK);
        (status, [(header::CONTENT_TYPE, self.0.content_type)], self.0.body).into_response()
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/dns", post(dns_update).fallback(unmapped))
        .route("/myip", get(my_ip).fallback(unmapped))
        .route("/version", get(version).fallback(unmapped))
        .route("/info", get(request_info).fallback(unmapped))
        .route("/script", get(script).fallback(unmapped))
        .fallback(unmapped)
        .with_state(state)
}

fn format_of(params: &Params) -> ResponseFormat {
    ResponseFormat::from_raw_flag(params.contains_key("raw"))
}

/// Caller address: the peer, or the first `X-Forwarded-For` entry when
/// the daemon runs behind a trusted proxy
fn source_ip(trust_forwarded_for: bool, headers: &HeaderMap, extensions: &Extensions) -> Option<String> {
    let ip = if trust_forwarded_for {
        headers
            .get("x-forwarded-for")?
            .to_str()
            .ok()?
            .split(',')
            .next()?
            .trim()
            .parse::<IpAddr>()
            .ok()?
    } else {
        extensions.get::<ConnectInfo<SocketAddr>>()?.0.ip()
    };

    Some(ip.to_canonical().to_string())
}

async fn dns_update(
    State(state): State<AppState>,
    Query(params): Query<Params>,
    request: Request,
) -> HttpResponse {
    let format = format_of(&params);

    let Some(hostname) = params.get("hostname") else {
        return HttpResponse(FunctionResponse::fail(MISSING_HOSTNAME, format));
    };
    let Some(validation_hash) = params.get("hash") else {
        return HttpResponse(FunctionResponse::fail(MISSING_HASH, format));
    };
    let Some(caller_ip) = source_ip(state.trust_forwarded_for, request.headers(), request.extensions())
    else {
        return HttpResponse(FunctionResponse::fail(Error::input(MISSING_SOURCE_IP), format));
    };
    let internal_ip = params.get("internalip").map(String::as_str).unwrap_or("");

    if let Err(e) = state.processor.config_source().load().await {
        warn!("Configuration load failed: {}", e);
        return HttpResponse(FunctionResponse::fail(e, format));
    }

    let result = state
        .processor
        .process(hostname, validation_hash, &caller_ip, internal_ip)
        .await;

    match &result {
        Ok(outcome) => info!("{}: {}", hostname, outcome),
        Err(e) => warn!("Update of {} from {} failed: {}", hostname, caller_ip, e),
    }

    HttpResponse(FunctionResponse::from_result(&result, format))
}

async fn my_ip(
    State(state): State<AppState>,
    Query(params): Query<Params>,
    request: Request,
) -> HttpResponse {
    let format = format_of(&params);
    match source_ip(state.trust_forwarded_for, request.headers(), request.extensions()) {
        Some(ip) => HttpResponse(FunctionResponse::success(ip, format)),
        None => HttpResponse(FunctionResponse::fail(MISSING_SOURCE_IP, format)),
    }
}

async fn version() -> Response {
    let body = json!({
        "version": env!("CARGO_PKG_VERSION"),
        "author": author_name(env!("CARGO_PKG_AUTHORS")),
        "author-email": author_email(env!("CARGO_PKG_AUTHORS")),
    });
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, dyndns_core::response::CONTENT_TYPE_JSON)],
        body.to_string(),
    )
        .into_response()
}

async fn request_info(
    State(state): State<AppState>,
    Query(params): Query<Params>,
    request: Request,
) -> HttpResponse {
    let headers: Map<String, Value> = request
        .headers()
        .iter()
        .filter(|(name, _)| name.as_str() != "authorization")
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), Value::from(v)))
        })
        .collect();

    let message = json!({
        "method": request.method().as_str(),
        "path": request.uri().path(),
        "query": params,
        "headers": headers,
        "sourceIp": source_ip(state.trust_forwarded_for, request.headers(), request.extensions()),
    });

    HttpResponse(FunctionResponse::success(message, ResponseFormat::Json))
}

/// The script is sent as-is; only failures follow the `raw` flag
async fn script(State(state): State<AppState>, Query(params): Query<Params>) -> HttpResponse {
    let format = format_of(&params);
    let Some(path) = state.script_file.as_deref() else {
        return HttpResponse(FunctionResponse::fail(SCRIPT_NOT_CONFIGURED, format));
    };

    match tokio::fs::read_to_string(path).await {
        Ok(body) => HttpResponse(FunctionResponse {
            status_code: STATUS_CODE_OK,
            content_type: CONTENT_TYPE_TEXT,
            body,
        }),
        Err(e) => {
            warn!("Reading script {} failed: {}", path.display(), e);
            HttpResponse(FunctionResponse::fail(
                format!("Could not read script. Exception: {}", e),
                format,
            ))
        }
    }
}

async fn unmapped(Query(params): Query<Params>, request: Request) -> HttpResponse {
    debug!("No handler for {} {}", request.method(), request.uri().path());
    HttpResponse(FunctionResponse::fail(UNMAPPED, format_of(&params)))
}

/// First author's name, without the `<email>` part
fn author_name(authors: &str) -> &str {
    let first = authors.split(':').next().unwrap_or("");
    first.split('<').next().unwrap_or("").trim()
}

/// First author's email, or empty
fn author_email(authors: &str) -> &str {
    let first = authors.split(':').next().unwrap_or("");
    match (first.find('<'), first.find('>')) {
        (Some(start), Some(end)) if start < end => &first[start + 1..end],
        _ => "",
    }
}
