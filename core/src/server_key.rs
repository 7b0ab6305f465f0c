//! Routing-key discovery for mutation endpoints.
//!
//! The service expects writes under a deployment-specific path prefix. The
//! prefix is advertised in the `@odata.context` field of the service
//! document served at the API root, e.g.
//! `https://host/api/(S(abc))/$metadata` for base `https://host/api/` gives
//! `(S(abc))`. The key is resolved fresh for every write.

use serde_json::{Map, Value};
use tracing::error;

use crate::error::PeopleError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const CONTEXT_FIELD: &str = "@odata.context";

pub(crate) struct ServerKeyResolver<'a> {
    base_url: &'a str,
}

impl<'a> ServerKeyResolver<'a> {
    pub(crate) fn new(base_url: &'a str) -> Self {
        Self { base_url }
    }

    /// GET against the bare base URL.
    pub(crate) fn build_request(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            uri: self.base_url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn parse_response(&self, response: HttpResponse) -> Result<String, PeopleError> {
        if !response.is_success() {
            error!(
                status_code = response.status,
                message = %response.body,
                "unable to retrieve server key"
            );
            return Err(PeopleError::RequestFailed {
                status: response.status,
                body: response.body,
            });
        }

        let document: Map<String, Value> = serde_json::from_str(&response.body)?;
        let context = document
            .get(CONTEXT_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default();

        let key = key_from_context(self.base_url, context);
        if key.is_empty() {
            return Err(PeopleError::MissingServerKey);
        }
        Ok(key.to_string())
    }
}

/// First `/`-delimited segment of `context` once `base_url` is stripped.
fn key_from_context<'c>(base_url: &str, context: &'c str) -> &'c str {
    let rest = context.strip_prefix(base_url).unwrap_or(context);
    rest.split('/').next().unwrap_or_default()
}
