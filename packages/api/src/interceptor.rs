//! Response decision table of the Request Client.
//!
//! Every response passes through [`classify`] before the caller sees it. Rows
//! are evaluated in order; the first match wins.
//!
//! | Condition | [`ResponseAction`] |
//! |-----------|--------------------|
//! | 2xx/3xx | `Accept` |
//! | 401 + `x-reissue-token: true` + not yet retried | `ReissueAndRetry` |
//! | 401 or 403 | `ForceLogout` |
//! | 404 | `NotFound` |
//! | anything else | `Propagate` |

use reqwest::StatusCode;

use crate::transport::{ApiRequest, ApiResponse};

/// An in-flight request together with its retry state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request: ApiRequest,
    /// Set once the request has been resent after a reissue.
    pub retried: bool,
}

impl RequestContext {
    pub fn new(request: ApiRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseAction {
    Accept,
    ReissueAndRetry,
    ForceLogout,
    NotFound,
    Propagate,
}

pub fn classify(ctx: &RequestContext, response: &ApiResponse) -> ResponseAction {
    let status = response.status;
    if !(status.is_client_error() || status.is_server_error()) {
        return ResponseAction::Accept;
    }
    match status {
        StatusCode::UNAUTHORIZED if response.reissue_allowed() && !ctx.retried => {
            ResponseAction::ReissueAndRetry
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ResponseAction::ForceLogout,
        StatusCode::NOT_FOUND => ResponseAction::NotFound,
        _ => ResponseAction::Propagate,
    }
}
