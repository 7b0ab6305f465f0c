//! Request building, transport and response interpretation for the People
//! resource.
//!
//! # Design
//! `PeopleClient` holds only read-only configuration and a transport handle;
//! no state survives between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. The async operations (`search`, `get_by_user_name`,
//! `update_user_field`) run those pairs through the configured
//! `HttpTransport`. Hosts that prefer to do their own I/O can call the pairs
//! directly.
//!
//! Error-status and shape failures are logged where they are detected.
//! Anything else (transport, JSON decoding) is logged once as unhandled on
//! its way out of the public operation.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::error;

use crate::config::ApiConfig;
use crate::error::PeopleError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::server_key::ServerKeyResolver;
use crate::types::Person;

const PEOPLE: &str = "People";

/// Client for the People resource of an OData-style service.
#[derive(Debug, Clone)]
pub struct PeopleClient<T> {
    config: ApiConfig,
    transport: T,
}

impl<T> PeopleClient<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// GET `People`, or `People?$filter=<filter>` with the filter
    /// percent-decoded once. An empty filter counts as none.
    pub fn build_search(&self, filter: Option<&str>) -> HttpRequest {
        let endpoint = match filter.filter(|f| !f.is_empty()) {
            Some(filter) => format!("{PEOPLE}?$filter={}", decode_filter(filter)),
            None => PEOPLE.to_string(),
        };
        self.request(HttpMethod::Get, &endpoint, None)
    }

    pub fn parse_search(&self, response: HttpResponse) -> Result<Vec<Person>, PeopleError> {
        check_status(&response)?;
        let mut document: Map<String, Value> = serde_json::from_str(&response.body)?;
        let Some(people) = document.remove("value") else {
            return Err(invalid_shape("value", response.body));
        };
        Ok(serde_json::from_value(people)?)
    }

    pub fn build_get_by_user_name(&self, user_name: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &person_path(user_name), None)
    }

    pub fn parse_get_by_user_name(&self, response: HttpResponse) -> Result<Person, PeopleError> {
        check_status(&response)?;
        let document: Map<String, Value> = serde_json::from_str(&response.body)?;
        if !document.contains_key("UserName") {
            return Err(invalid_shape("UserName", response.body));
        }
        Ok(serde_json::from_value(Value::Object(document))?)
    }

    /// GET against the API root to read the service document.
    pub fn build_server_key_lookup(&self) -> HttpRequest {
        ServerKeyResolver::new(self.base_url()).build_request()
    }

    pub fn parse_server_key(&self, response: HttpResponse) -> Result<String, PeopleError> {
        ServerKeyResolver::new(self.base_url()).parse_response(response)
    }

    /// PATCH `<server_key>/People('<user_name>')` with `fields` as the JSON
    /// body. Field names are not checked against the `Person` schema.
    pub fn build_update_user_field(
        &self,
        server_key: &str,
        user_name: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<HttpRequest, PeopleError> {
        let body = serde_json::to_string(fields)?;
        let endpoint = format!("{server_key}/{}", person_path(user_name));
        Ok(self.request(HttpMethod::Patch, &endpoint, Some(body)))
    }

    /// Any 2xx counts as success; the body is ignored.
    pub fn parse_update_user_field(&self, response: HttpResponse) -> Result<bool, PeopleError> {
        check_status(&response)?;
        Ok(true)
    }

    fn request(&self, method: HttpMethod, endpoint: &str, body: Option<String>) -> HttpRequest {
        let headers = if body.is_some() {
            vec![("content-type".to_string(), "application/json".to_string())]
        } else {
            Vec::new()
        };
        HttpRequest {
            method,
            uri: format!("{}{endpoint}", self.base_url()),
            headers,
            body,
        }
    }
}

impl<T: HttpTransport> PeopleClient<T> {
    /// Search people, optionally constrained by a raw OData `$filter`
    /// expression. Results keep the server's order.
    pub async fn search(&self, filter: Option<&str>) -> Result<Vec<Person>, PeopleError> {
        let request = self.build_search(filter);
        self.execute(request)
            .await
            .and_then(|response| self.parse_search(response))
            .inspect_err(log_unhandled)
    }

    pub async fn get_by_user_name(&self, user_name: &str) -> Result<Person, PeopleError> {
        let request = self.build_get_by_user_name(user_name);
        self.execute(request)
            .await
            .and_then(|response| self.parse_get_by_user_name(response))
            .inspect_err(log_unhandled)
    }

    /// Resolve the server key, then PATCH the given fields onto the person.
    /// No PATCH is sent when the key cannot be resolved.
    pub async fn update_user_field(
        &self,
        user_name: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<bool, PeopleError> {
        self.try_update_user_field(user_name, fields)
            .await
            .inspect_err(log_unhandled)
    }

    async fn try_update_user_field(
        &self,
        user_name: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<bool, PeopleError> {
        let key = self.resolve_server_key().await?;
        let request = self.build_update_user_field(&key, user_name, fields)?;
        let response = self.execute(request).await?;
        self.parse_update_user_field(response)
    }

    async fn resolve_server_key(&self) -> Result<String, PeopleError> {
        let response = self.execute(self.build_server_key_lookup()).await?;
        self.parse_server_key(response)
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, PeopleError> {
        self.transport
            .send(request)
            .await
            .map_err(PeopleError::Unhandled)
    }
}

/// Quoted key segment. `user_name` is inserted as-is: embedded quotes are
/// not escaped.
fn person_path(user_name: &str) -> String {
    format!("{PEOPLE}('{user_name}')")
}

/// Form-style decode: `+` becomes a space, then `%XX` escapes are resolved.
/// Invalid UTF-8 after decoding is replaced rather than rejected.
fn decode_filter(filter: &str) -> String {
    let spaced = filter.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

fn check_status(response: &HttpResponse) -> Result<(), PeopleError> {
    if response.is_success() {
        return Ok(());
    }
    error!(
        status_code = response.status,
        message = %response.body,
        "error response received"
    );
    Err(PeopleError::RequestFailed {
        status: response.status,
        body: response.body.clone(),
    })
}

fn invalid_shape(field: &'static str, body: String) -> PeopleError {
    error!(response = %body, "invalid response format");
    PeopleError::InvalidResponseShape { field, body }
}

fn log_unhandled(err: &PeopleError) {
    if let PeopleError::Unhandled(source) = err {
        error!(error = %source, "unhandled error");
    }
}
