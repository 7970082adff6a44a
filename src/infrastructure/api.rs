//! HTTP contract of the library service.
//!
//! The plugin cannot block on the network. Every call is described as an
//! [`HttpRequest`] carrying a [`RequestContext`]; the shim hands it to Zellij's
//! `web_request` and the context comes back verbatim with the response, which
//! is how a response is matched to the state that asked for it.
//!
//! Endpoints (relative to `api_base_url`):
//!
//! | Purpose      | Request                                             |
//! |--------------|-----------------------------------------------------|
//! | Search       | `GET /search?query=..&type=AllFields&limit=..`      |
//! | Availability | `GET /search/availability/{id}?latitude=..&longitude=..` |
//! | Login        | `POST /auth/login`                                  |
//! | Signup       | `POST /auth/signup`                                 |

use std::cmp::Ordering;
use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::domain::credentials::{LoginRequest, SignupRequest, TokenPair};
use crate::domain::{Book, BuildingAvailability, KaveriError, Result};

/// Characters left unescaped in path segments and query values (RFC 3986 unreserved).
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const RESERVATION_BASE: &str = "https://www.finna.fi/Record";

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Builds the public record page where a book can be reserved.
///
/// ```
/// use kirjastokaveri::infrastructure::reservation_url;
///
/// assert_eq!(
///     reservation_url("helmet.1234"),
///     "https://www.finna.fi/Record/helmet.1234"
/// );
/// assert_eq!(
///     reservation_url("a b/c"),
///     "https://www.finna.fi/Record/a%20b%2Fc"
/// );
/// ```
#[must_use]
pub fn reservation_url(book_id: &str) -> String {
    format!("{RESERVATION_BASE}/{}", encode(book_id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Identifies what a pending request was for.
///
/// Serialized into the `web_request` context map and parsed back from the
/// response, so it must round-trip through `BTreeMap<String, String>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestContext {
    Search { generation: u64 },
    Availability { book_id: String, generation: u64 },
    Login { email: String },
    Signup { email: String },
}

impl RequestContext {
    const PURPOSE: &'static str = "purpose";
    const GENERATION: &'static str = "generation";
    const BOOK_ID: &'static str = "book_id";
    const EMAIL: &'static str = "email";

    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        let purpose = match self {
            Self::Search { generation } => {
                map.insert(Self::GENERATION.to_string(), generation.to_string());
                "search"
            }
            Self::Availability { book_id, generation } => {
                map.insert(Self::BOOK_ID.to_string(), book_id.clone());
                map.insert(Self::GENERATION.to_string(), generation.to_string());
                "availability"
            }
            Self::Login { email } => {
                map.insert(Self::EMAIL.to_string(), email.clone());
                "login"
            }
            Self::Signup { email } => {
                map.insert(Self::EMAIL.to_string(), email.clone());
                "signup"
            }
        };
        map.insert(Self::PURPOSE.to_string(), purpose.to_string());
        map
    }

    /// Parses a context map produced by [`RequestContext::to_map`].
    ///
    /// Returns `None` for maps this plugin did not produce.
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Option<Self> {
        let generation = || map.get(Self::GENERATION).and_then(|g| g.parse::<u64>().ok());
        let email = || map.get(Self::EMAIL).cloned();

        match map.get(Self::PURPOSE)?.as_str() {
            "search" => Some(Self::Search {
                generation: generation()?,
            }),
            "availability" => Some(Self::Availability {
                book_id: map.get(Self::BOOK_ID)?.clone(),
                generation: generation()?,
            }),
            "login" => Some(Self::Login { email: email()? }),
            "signup" => Some(Self::Signup { email: email()? }),
            _ => None,
        }
    }
}

/// An outbound request waiting to be executed by the plugin shim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    pub context: RequestContext,
}

impl HttpRequest {
    fn get(url: String, context: RequestContext) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        Self {
            method: HttpMethod::Get,
            url,
            headers,
            body: Vec::new(),
            context,
        }
    }

    fn post_json(url: String, body: Vec<u8>, context: RequestContext) -> Self {
        let mut request = Self::get(url, context);
        request.method = HttpMethod::Post;
        request
            .headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        request.body = body;
        request
    }
}

/// Builds requests against one library service instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    search_limit: u32,
    location: Option<(f64, f64)>,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str, search_limit: u32, location: Option<(f64, f64)>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            search_limit,
            location,
        }
    }

    /// ```
    /// use kirjastokaveri::infrastructure::ApiClient;
    ///
    /// let api = ApiClient::new("http://localhost:8000/api/", 20, None);
    /// let request = api.search_request("Tove Jansson", 3);
    /// assert_eq!(
    ///     request.url,
    ///     "http://localhost:8000/api/search?query=Tove%20Jansson&type=AllFields&limit=20"
    /// );
    /// ```
    #[must_use]
    pub fn search_request(&self, query: &str, generation: u64) -> HttpRequest {
        let url = format!(
            "{}/search?query={}&type=AllFields&limit={}",
            self.base_url,
            encode(query),
            self.search_limit
        );
        HttpRequest::get(url, RequestContext::Search { generation })
    }

    #[must_use]
    pub fn availability_request(&self, book_id: &str, generation: u64) -> HttpRequest {
        let mut url = format!("{}/search/availability/{}", self.base_url, encode(book_id));
        if let Some((latitude, longitude)) = self.location {
            url.push_str(&format!("?latitude={latitude}&longitude={longitude}"));
        }
        HttpRequest::get(
            url,
            RequestContext::Availability {
                book_id: book_id.to_string(),
                generation,
            },
        )
    }

    /// # Errors
    ///
    /// Returns [`KaveriError::Json`] if the body cannot be encoded.
    pub fn login_request(&self, login: &LoginRequest) -> Result<HttpRequest> {
        let body = serde_json::to_vec(login)?;
        Ok(HttpRequest::post_json(
            format!("{}/auth/login", self.base_url),
            body,
            RequestContext::Login {
                email: login.email.clone(),
            },
        ))
    }

    /// # Errors
    ///
    /// Returns [`KaveriError::Json`] if the body cannot be encoded.
    pub fn signup_request(&self, signup: &SignupRequest) -> Result<HttpRequest> {
        let body = serde_json::to_vec(signup)?;
        Ok(HttpRequest::post_json(
            format!("{}/auth/signup", self.base_url),
            body,
            RequestContext::Signup {
                email: signup.email.clone(),
            },
        ))
    }
}

fn ensure_success(status: u16, body: &[u8]) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(KaveriError::api(status, body))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    #[serde(default)]
    records: Vec<SearchRecord>,
}

#[derive(Debug, Deserialize)]
struct SearchRecord {
    record_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    cover_url: Option<String>,
    #[serde(default)]
    buildings: Vec<String>,
    #[serde(default)]
    isbns: Vec<String>,
    #[serde(default)]
    formats: Vec<String>,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    subjects: Vec<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

impl From<SearchRecord> for Book {
    fn from(record: SearchRecord) -> Self {
        Self {
            id: record.record_id,
            title: record.title.unwrap_or_else(|| "Untitled".to_string()),
            author: record.authors.join(", "),
            year: record.year,
            publisher: record.publisher,
            summary: record.summary,
            subjects: record.subjects,
            isbns: record.isbns,
            formats: record.formats,
            languages: record.languages,
            cover_url: record.cover_url,
            buildings: record
                .buildings
                .into_iter()
                .map(BuildingAvailability::named)
                .collect(),
        }
    }
}

/// Decodes a search response into books.
///
/// # Errors
///
/// Returns [`KaveriError::Api`] for a non-2xx status and [`KaveriError::Json`]
/// for a body that does not match the search contract.
pub fn parse_search_response(status: u16, body: &[u8]) -> Result<Vec<Book>> {
    ensure_success(status, body)?;
    let parsed: SearchResponseBody = serde_json::from_slice(body)?;
    Ok(parsed.records.into_iter().map(Book::from).collect())
}

#[derive(Debug, Deserialize)]
struct AvailabilityResponseBody {
    #[serde(default)]
    items: Vec<AvailabilityItem>,
}

#[derive(Debug, Deserialize)]
struct AvailabilityItem {
    library: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    call_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    distance_km: Option<f64>,
    #[serde(default)]
    available_count: Option<u32>,
}

impl From<AvailabilityItem> for BuildingAvailability {
    fn from(item: AvailabilityItem) -> Self {
        Self {
            name: item.library,
            shelf_location: item.call_number.or(item.location),
            distance_km: item.distance_km,
            status: item.status,
            available: item.available_count.unwrap_or(0),
        }
    }
}

/// Nearest first; buildings without a distance go last, in service order.
fn by_distance(a: &BuildingAvailability, b: &BuildingAvailability) -> Ordering {
    match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Decodes an availability response, sorted by distance.
///
/// # Errors
///
/// Returns [`KaveriError::Api`] for a non-2xx status and [`KaveriError::Json`]
/// for an undecodable body.
pub fn parse_availability_response(status: u16, body: &[u8]) -> Result<Vec<BuildingAvailability>> {
    ensure_success(status, body)?;
    let parsed: AvailabilityResponseBody = serde_json::from_slice(body)?;
    let mut buildings: Vec<BuildingAvailability> =
        parsed.items.into_iter().map(BuildingAvailability::from).collect();
    buildings.sort_by(by_distance);
    Ok(buildings)
}

/// Decodes the token pair returned by login and signup.
///
/// # Errors
///
/// Returns [`KaveriError::Api`] for a non-2xx status and [`KaveriError::Json`]
/// for an undecodable body.
pub fn parse_token_response(status: u16, body: &[u8]) -> Result<TokenPair> {
    ensure_success(status, body)?;
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_round_trips_through_map() {
        let contexts = [
            RequestContext::Search { generation: 7 },
            RequestContext::Availability {
                book_id: "helmet.1".to_string(),
                generation: 2,
            },
            RequestContext::Login {
                email: "a@b.fi".to_string(),
            },
            RequestContext::Signup {
                email: "a@b.fi".to_string(),
            },
        ];
        for context in contexts {
            assert_eq!(RequestContext::from_map(&context.to_map()), Some(context));
        }
    }

    #[test]
    fn foreign_context_is_ignored() {
        let mut map = BTreeMap::new();
        assert_eq!(RequestContext::from_map(&map), None);
        map.insert("purpose".to_string(), "availability".to_string());
        map.insert("generation".to_string(), "not-a-number".to_string());
        map.insert("book_id".to_string(), "x".to_string());
        assert_eq!(RequestContext::from_map(&map), None);
    }

    #[test]
    fn availability_url_includes_location() {
        let api = ApiClient::new("http://api", 20, Some((60.17, 24.94)));
        let request = api.availability_request("helmet.1", 1);
        assert_eq!(
            request.url,
            "http://api/search/availability/helmet.1?latitude=60.17&longitude=24.94"
        );
        assert_eq!(request.method, HttpMethod::Get);
    }

    #[test]
    fn login_request_posts_json() {
        let api = ApiClient::new("http://api", 20, None);
        let login = LoginRequest {
            email: "a@b.fi".to_string(),
            password: "secret".to_string(),
        };
        let request = api.login_request(&login).unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "http://api/auth/login");
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["email"], "a@b.fi");
    }

    #[test]
    fn search_response_maps_records() {
        let body = br#"{
            "total_hits": 1,
            "records": [{
                "record_id": "helmet.42",
                "title": "Muumipappa ja meri",
                "authors": ["Jansson, Tove"],
                "year": "1965",
                "buildings": ["Oodi", "Kallio"],
                "isbns": ["9789510"]
            }]
        }"#;
        let books = parse_search_response(200, body).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, "helmet.42");
        assert_eq!(books[0].author, "Jansson, Tove");
        assert_eq!(books[0].buildings.len(), 2);
        assert_eq!(books[0].buildings[1].name, "Kallio");
        assert!(books[0].buildings.iter().all(|b| b.available == 0));
    }

    #[test]
    fn availability_sorted_with_unknown_distance_last() {
        let body = br#"{
            "record_id": "x",
            "items": [
                {"library": "Far", "distance_km": 9.5, "status": "On Loan", "available_count": 0},
                {"library": "Unknown", "status": "Available", "available_count": 1},
                {"library": "Near", "distance_km": 0.4, "location": "Aikuiset", "call_number": "84.2"}
            ]
        }"#;
        let buildings = parse_availability_response(200, body).unwrap();
        let names: Vec<&str> = buildings.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Near", "Far", "Unknown"]);
        assert_eq!(buildings[0].shelf_location.as_deref(), Some("84.2"));
    }

    #[test]
    fn non_success_status_is_an_error() {
        let err = parse_availability_response(503, b"down").unwrap_err();
        assert!(matches!(err, KaveriError::Api { status: 503, .. }));
        let err = parse_token_response(200, b"<html>").unwrap_err();
        assert!(matches!(err, KaveriError::Json(_)));
    }
}
