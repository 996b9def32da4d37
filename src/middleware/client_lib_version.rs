//! Client library version headers for every response.
//!
//! Responsibility:
//! - `Skills-Client-Lib-Version`: version of the server-side client library
//! - `upgrade-in-progress`: `true` while a database upgrade is running
//! - `Access-Control-Expose-Headers`: lets cross-origin browser clients read both
//!
//! Ordering:
//! - Must run before authentication stages. Responses those stages short-circuit
//!   (401, CORS preflight) still have to carry the headers, so this layer wraps them.
//! - A version or upgrade value already set by a downstream stage is left untouched.
//! - An exposure list set downstream is kept; whichever of the two names it
//!   lacks is appended as an extra header line.

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, header},
    middleware::{self, Next},
    response::Response,
};

pub const CLIENT_LIB_VERSION: HeaderName = HeaderName::from_static("skills-client-lib-version");
pub const UPGRADE_IN_PROGRESS: HeaderName = HeaderName::from_static("upgrade-in-progress");

/// Value of `Access-Control-Expose-Headers`.
pub const EXPOSED_HEADERS: &str = "Skills-Client-Lib-Version, upgrade-in-progress";

const EXPOSED_NAMES: [&str; 2] = ["Skills-Client-Lib-Version", "upgrade-in-progress"];

/// Header values resolved once at startup.
#[derive(Clone, Debug)]
pub struct ClientLibHeaders {
    version: HeaderValue,
    upgrade_in_progress: bool,
}

impl ClientLibHeaders {
    pub fn new(version: HeaderValue, upgrade_in_progress: bool) -> Self {
        Self {
            version,
            upgrade_in_progress,
        }
    }

    pub fn version(&self) -> &HeaderValue {
        &self.version
    }

    pub fn upgrade_in_progress(&self) -> bool {
        self.upgrade_in_progress
    }

    fn upgrade_in_progress_value(&self) -> HeaderValue {
        if self.upgrade_in_progress {
            HeaderValue::from_static("true")
        } else {
            HeaderValue::from_static("false")
        }
    }
}

/// Boolean-like config values: only `true` (any ASCII case) is true.
/// Empty, `yes`, `1` and padded values are all false.
pub fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Apply the client library headers to every response of `router`.
pub fn apply(router: Router, headers: ClientLibHeaders) -> Router {
    router.layer(middleware::from_fn_with_state(
        headers,
        client_lib_version_middleware,
    ))
}

async fn client_lib_version_middleware(
    State(headers): State<ClientLibHeaders>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    let out = response.headers_mut();
    out.entry(CLIENT_LIB_VERSION)
        .or_insert_with(|| headers.version.clone());
    out.entry(UPGRADE_IN_PROGRESS)
        .or_insert_with(|| headers.upgrade_in_progress_value());
    expose_client_lib_headers(out);

    response
}

fn expose_client_lib_headers(headers: &mut HeaderMap) {
    let missing: Vec<&'static str> = EXPOSED_NAMES
        .into_iter()
        .filter(|name| {
            !headers
                .get_all(header::ACCESS_CONTROL_EXPOSE_HEADERS)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(|v| v.split(','))
                .any(|exposed| exposed.trim().eq_ignore_ascii_case(name))
        })
        .collect();

    let value = match missing.as_slice() {
        [] => return,
        [name] => HeaderValue::from_static(*name),
        _ => HeaderValue::from_static(EXPOSED_HEADERS),
    };
    headers.append(header::ACCESS_CONTROL_EXPOSE_HEADERS, value);
}
