//! Shared request plumbing for the adapters.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use url::Url;

use crate::error::GatewayError;

pub(crate) fn new_client(timeout: Duration) -> Result<Client, GatewayError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, GatewayError> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(GatewayError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}

/// `base` with each segment appended, percent-encoded.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, GatewayError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GatewayError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Map non-success statuses onto gateway errors. 404 and 409 are
/// attributed to `entity`/`id`.
pub(crate) async fn check_status(
    response: Response,
    entity: &'static str,
    id: &str,
) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::NOT_FOUND => Err(GatewayError::NotFound {
            entity,
            id: id.to_string(),
        }),
        StatusCode::CONFLICT => Err(GatewayError::Conflict {
            entity,
            id: id.to_string(),
        }),
        _ => {
            let message = response.text().await.unwrap_or_default();
            Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
