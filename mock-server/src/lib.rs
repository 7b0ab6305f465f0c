use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header::HOST, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Person {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub gender: String,
    pub emails: Vec<String>,
    pub favorite_feature: String,
    pub features: Vec<String>,
    pub address_info: Vec<Value>,
    pub home_address: Option<Value>,
}

impl Person {
    /// `None` when `name` is not a filterable string property.
    fn property(&self, name: &str) -> Option<Option<&str>> {
        let value = match name {
            "UserName" => Some(self.user_name.as_str()),
            "FirstName" => Some(self.first_name.as_str()),
            "LastName" => Some(self.last_name.as_str()),
            "MiddleName" => self.middle_name.as_deref(),
            "Gender" => Some(self.gender.as_str()),
            "FavoriteFeature" => Some(self.favorite_feature.as_str()),
            _ => return None,
        };
        Some(value)
    }

    fn set_property(&mut self, name: &str, value: String) -> Result<(), ODataError> {
        match name {
            "FirstName" => self.first_name = value,
            "LastName" => self.last_name = value,
            "MiddleName" => self.middle_name = Some(value),
            "Gender" => self.gender = value,
            "FavoriteFeature" => self.favorite_feature = value,
            other => {
                return Err(ODataError::bad_request(format!(
                    "The property '{other}' cannot be updated on type 'Person'."
                )))
            }
        }
        Ok(())
    }
}

/// OData-style error payload: `{"error":{"code":"","message":"..."}}`.
#[derive(Debug)]
pub struct ODataError {
    status: StatusCode,
    message: String,
}

impl ODataError {
    fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    fn not_found(segment: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("The request resource is not found: '{segment}'."),
        }
    }
}

impl IntoResponse for ODataError {
    fn into_response(self) -> Response {
        let body = json!({ "error": { "code": "", "message": self.message } });
        (self.status, Json(body)).into_response()
    }
}

pub type Db = Arc<RwLock<Vec<Person>>>;

#[derive(Clone)]
pub struct AppState {
    key: Arc<str>,
    people: Db,
}

/// Router with a fresh session key of the form `(S(<hex>))`.
pub fn app() -> Router {
    app_with_key(&format!("(S({}))", Uuid::new_v4().simple()))
}

/// Router whose writes are accepted only under `/{key}/...`.
pub fn app_with_key(key: &str) -> Router {
    let state = AppState {
        key: key.into(),
        people: Arc::new(RwLock::new(seed_people())),
    };
    Router::new()
        .route("/", get(service_document))
        .route("/People", get(list_people))
        .route("/{entity}", get(get_person))
        .route("/{key}/{entity}", patch(patch_person))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn service_document(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    Json(json!({
        "@odata.context": format!("http://{host}/{}/$metadata", state.key),
        "value": [{ "name": "People", "kind": "EntitySet", "url": "People" }],
    }))
}

async fn list_people(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ODataError> {
    let people = state.people.read().await;
    let matched: Vec<&Person> = match params.get("$filter") {
        Some(raw) => {
            let filter = EqFilter::parse(raw)
                .inspect_err(|err| warn!(filter = %raw, message = %err.message, "rejected filter"))?;
            people.iter().filter(|p| filter.matches(p)).collect()
        }
        None => people.iter().collect(),
    };
    Ok(Json(json!({
        "@odata.context": "$metadata#People",
        "value": matched,
    })))
}

async fn get_person(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Json<Value>, ODataError> {
    let user_name = entity_key(&entity).ok_or_else(|| ODataError::not_found(&entity))?;
    let people = state.people.read().await;
    let person = people
        .iter()
        .find(|p| p.user_name == user_name)
        .ok_or_else(|| ODataError::not_found(&entity))?;

    let mut body = json!({ "@odata.context": "$metadata#People/$entity" });
    if let (Value::Object(target), Ok(Value::Object(fields))) = (&mut body, serde_json::to_value(person)) {
        target.extend(fields);
    }
    Ok(Json(body))
}

async fn patch_person(
    State(state): State<AppState>,
    Path((key, entity)): Path<(String, String)>,
    Json(fields): Json<HashMap<String, String>>,
) -> Result<StatusCode, ODataError> {
    if key != *state.key {
        return Err(ODataError::not_found(&key));
    }
    let user_name = entity_key(&entity).ok_or_else(|| ODataError::not_found(&entity))?;
    let mut people = state.people.write().await;
    let person = people
        .iter_mut()
        .find(|p| p.user_name == user_name)
        .ok_or_else(|| ODataError::not_found(&entity))?;

    // Apply to a copy so a bad field leaves the record untouched.
    let mut updated = person.clone();
    for (name, value) in fields {
        updated.set_property(&name, value)?;
    }
    *person = updated;
    info!(user_name, "person updated");
    Ok(StatusCode::NO_CONTENT)
}

/// `People('<key>')` → `<key>`.
fn entity_key(segment: &str) -> Option<&str> {
    segment.strip_prefix("People('")?.strip_suffix("')")
}

/// The one filter shape the mock understands: `<Property> eq '<value>'`.
#[derive(Debug, PartialEq)]
struct EqFilter<'a> {
    property: &'a str,
    value: &'a str,
}

impl<'a> EqFilter<'a> {
    fn parse(raw: &'a str) -> Result<Self, ODataError> {
        let unsupported =
            || ODataError::bad_request(format!("The query specified in the URI is not valid: '{raw}'."));
        let (property, value) = raw.split_once(" eq ").ok_or_else(unsupported)?;
        let value = value
            .trim()
            .strip_prefix('\'')
            .and_then(|v| v.strip_suffix('\''))
            .ok_or_else(unsupported)?;
        Ok(Self {
            property: property.trim(),
            value,
        })
    }

    fn matches(&self, person: &Person) -> bool {
        person.property(self.property) == Some(Some(self.value))
    }
}

fn seed_people() -> Vec<Person> {
    fn person(user_name: &str, first: &str, last: &str, gender: &str, city: &str, features: &[&str]) -> Person {
        Person {
            user_name: user_name.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            middle_name: None,
            gender: gender.to_string(),
            emails: vec![format!("{first}@example.com"), format!("{first}@contoso.com")],
            favorite_feature: features.first().copied().unwrap_or("Feature1").to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
            address_info: vec![json!({
                "Address": "187 Suffolk Ln.",
                "City": { "Name": city, "CountryRegion": "United States", "Region": "ID" },
            })],
            home_address: None,
        }
    }

    vec![
        person("russellwhyte", "Russell", "Whyte", "Male", "Boise", &["Feature1", "Feature2"]),
        person("scottketchum", "Scott", "Ketchum", "Male", "San Francisco", &[]),
        person("ronaldmundy", "Ronald", "Mundy", "Male", "Boise", &["Feature3"]),
        person("javieralfred", "Javier", "Alfred", "Male", "Pittsburgh", &["Feature1"]),
        person("willieashmore", "Willie", "Ashmore", "Male", "Seattle", &[]),
        person("vincentcalabrese", "Vincent", "Calabrese", "Male", "Boise", &["Feature2"]),
        person("clydeguess", "Clyde", "Guess", "Male", "Boise", &[]),
        person("keithpinckney", "Keith", "Pinckney", "Male", "Boise", &["Feature4"]),
        person("marshallgaray", "Marshall", "Garay", "Male", "Boise", &[]),
        person("ryantheriault", "Ryan", "Theriault", "Male", "Boise", &[]),
        person("elainestewart", "Elaine", "Stewart", "Female", "Boise", &["Feature1"]),
        person("salliesampson", "Sallie", "Sampson", "Female", "Boise", &[]),
    ]
}
