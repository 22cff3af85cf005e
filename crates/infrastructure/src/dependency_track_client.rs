use std::time::Duration;

use dtrack_application::{Page, PageRequest};
use dtrack_core::{AppError, AppResult, Credentials};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

mod acl;
mod config_properties;
mod notifications;
mod permissions;
mod policies;
mod projects;
mod teams;
mod users;


const API_KEY_HEADER: &str = "x-api-key";
const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Connection settings for [`DependencyTrackClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Server base URL without the `/api` suffix.
    pub endpoint: Url,
    /// Credentials attached to every call.
    pub credentials: Credentials,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Dependency-Track REST client implementing every application port.
#[derive(Clone)]
pub struct DependencyTrackClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl DependencyTrackClient {
    /// Builds the client and exchanges a username/password for a bearer
    /// token when needed.
    pub async fn connect(settings: ClientSettings) -> AppResult<Self> {
        if settings.endpoint.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "endpoint '{}' cannot be used as a base URL",
                settings.endpoint
            )));
        }

        let credentials = match settings.credentials {
            Credentials::UsernamePassword { username, password } => {
                let token =
                    login(&settings.endpoint, settings.timeout, &username, &password).await?;
                info!(username = %username, "obtained bearer token");
                Credentials::BearerToken(token)
            }
            other => other,
        };

        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .default_headers(auth_headers(&credentials)?)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        info!(
            endpoint = %settings.endpoint,
            auth = credentials.method(),
            "configured Dependency-Track client"
        );

        Ok(Self {
            http_client,
            base_url: settings.endpoint,
        })
    }

    fn url(&self, segments: &[&str]) -> AppResult<Url> {
        api_url(&self.base_url, segments)
    }

    fn request(&self, method: Method, segments: &[&str]) -> AppResult<RequestBuilder> {
        let url = self.url(segments)?;
        debug!(method = %method, path = url.path(), "sending request");
        Ok(self.http_client.request(method, url))
    }

    fn paged(&self, segments: &[&str], page: PageRequest) -> AppResult<RequestBuilder> {
        Ok(self.request(Method::GET, segments)?.query(&[
            ("pageNumber", page.page_number),
            ("pageSize", page.page_size),
        ]))
    }

    /// Sends a request and decodes the JSON body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &str,
    ) -> AppResult<T> {
        let response = send(builder, what).await?;
        decode(response, what).await
    }

    /// Sends a request and discards the body.
    async fn execute(&self, builder: RequestBuilder, what: &str) -> AppResult<()> {
        send(builder, what).await.map(|_| ())
    }

    /// Sends a write the server answers with `304 Not Modified` when it is
    /// already in effect.
    async fn execute_idempotent(&self, builder: RequestBuilder, what: &str) -> AppResult<()> {
        send_accepting(builder, what, |status| {
            status.is_success() || status == StatusCode::NOT_MODIFIED
        })
        .await
        .map(|_| ())
    }

    /// Sends a paginated request and decodes one page.
    async fn fetch_page<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        page: PageRequest,
        what: &str,
    ) -> AppResult<Page<T>> {
        let response = send(builder, what).await?;
        let reported_total = total_count(&response);
        let items: Vec<T> = decode(response, what).await?;
        let total = reported_total.unwrap_or_else(|| estimated_total(page, items.len()));
        Ok(Page { items, total })
    }
}

async fn login(
    endpoint: &Url,
    timeout: Duration,
    username: &str,
    password: &str,
) -> AppResult<String> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let url = api_url(endpoint, &["user", "login"])?;

    let response = send(
        http_client
            .post(url)
            .form(&[("username", username), ("password", password)]),
        "login",
    )
    .await?;

    let token = response
        .text()
        .await
        .map_err(|error| AppError::Decode(format!("login response body unreadable: {error}")))?;
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized(
            "login succeeded but returned no token".to_owned(),
        ));
    }

    Ok(token.to_owned())
}

fn auth_headers(credentials: &Credentials) -> AppResult<HeaderMap> {
    let (name, value) = match credentials {
        Credentials::ApiKey(api_key) => (HeaderName::from_static(API_KEY_HEADER), api_key.clone()),
        Credentials::BearerToken(token) => (AUTHORIZATION, format!("Bearer {token}")),
        Credentials::UsernamePassword { .. } => {
            return Err(AppError::Internal(
                "username/password must be exchanged for a token first".to_owned(),
            ));
        }
    };

    let mut value = HeaderValue::from_str(&value).map_err(|_| {
        AppError::Validation(format!("{} contains invalid header characters", credentials.method()))
    })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(name, value);
    Ok(headers)
}

fn api_url(base: &Url, segments: &[&str]) -> AppResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| {
            AppError::Validation(format!("endpoint '{base}' cannot be used as a base URL"))
        })?
        .pop_if_empty()
        .extend(["api", "v1"])
        .extend(segments);
    Ok(url)
}

async fn send(builder: RequestBuilder, what: &str) -> AppResult<Response> {
    send_accepting(builder, what, |status| status.is_success()).await
}

async fn send_accepting(
    builder: RequestBuilder,
    what: &str,
    accepted: impl Fn(StatusCode) -> bool,
) -> AppResult<Response> {
    let response = builder
        .send()
        .await
        .map_err(|error| AppError::Transport(format!("{what}: {error}")))?;

    let status = response.status();
    if accepted(status) {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
    Err(status_error(status, what, body))
}

fn status_error(status: StatusCode, what: &str, body: String) -> AppError {
    let message = if body.trim().is_empty() {
        what.to_owned()
    } else {
        format!("{what}: {}", body.trim())
    };

    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Remote {
            status: status.as_u16(),
            message,
        },
    }
}

async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> AppResult<T> {
    let body = response
        .text()
        .await
        .map_err(|error| AppError::Decode(format!("{what}: unreadable body: {error}")))?;
    serde_json::from_str(&body).map_err(|error| AppError::Decode(format!("{what}: {error}")))
}

fn total_count(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(TOTAL_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Total assumed when the server omits the count header: a short page is the
/// last one, a full page means more may follow.
fn estimated_total(page: PageRequest, items: usize) -> u64 {
    let before = u64::from(page.page_number.saturating_sub(1)) * u64::from(page.page_size);
    if items < page.page_size as usize {
        before + items as u64
    } else {
        u64::MAX
    }
}

fn missing_uuid(what: &str) -> AppError {
    AppError::Decode(format!("{what}: response has no uuid"))
}
