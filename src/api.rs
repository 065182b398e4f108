// Transport: a small blocking client that performs one HTTP round trip per
// call. It stamps every request with the access token and a JSON
// content-type, and turns error statuses into `Error::Api`.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{BoxError, Error, ErrorEnvelope, Result};
use crate::types::null_as_default;
use crate::services::{
    BlocksService, BotsService, ChatsService, DirectMessagesService, GroupsService,
    LeaderboardService, LikesService, MembersService, MessagesService, SmsService, UsersService,
};

/// A fully formed request: the URL already carries any query parameters
/// the caller wants sent.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Request {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// A response whose body has been read in full, so the connection is
/// already released whatever the caller does next.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// One HTTP round trip. Implemented for the reqwest blocking client and
/// swappable in tests.
pub trait HttpSend: Send + Sync {
    fn send(&self, request: Request) -> std::result::Result<Response, BoxError>;
}

impl HttpSend for reqwest::blocking::Client {
    fn send(&self, request: Request) -> std::result::Result<Response, BoxError> {
        let mut builder = self
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let res = builder.send()?;
        let status = res.status();
        let body = res.bytes()?.to_vec();
        Ok(Response { status, body })
    }
}

/// Transport shared by every resource service. Cloning is cheap and
/// clones share the same HTTP connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<dyn HttpSend>,
    base_url: Url,
    token: String,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Successful reply wrapper. `meta` is ignored; a `null` response decodes
/// as the payload's default.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
struct Envelope<T> {
    #[serde(deserialize_with = "null_as_default")]
    response: T,
}

impl ApiClient {
    /// Build a client backed by reqwest, applying the configured timeout.
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http(config, http))
    }

    /// Build a client over any [`HttpSend`] implementation.
    pub fn with_http(config: Config, http: impl HttpSend + 'static) -> Self {
        ApiClient {
            http: Arc::new(http),
            base_url: config.base_url,
            token: config.access_token,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL. Each segment is
    /// percent-encoded, so IDs are substituted verbatim.
    ///
    /// The base URL must be able to carry a path; `Config` rejects those
    /// that cannot, and a cannot-be-a-base URL is returned unchanged.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        debug_assert!(!url.cannot_be_a_base(), "base URL cannot carry a path: {url}");
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send one request. Sets the `token` query parameter (replacing any
    /// existing one) and the JSON content-type, then classifies the reply:
    /// status >= 400 becomes `Error::Api` built from the error envelope.
    pub fn execute(&self, mut request: Request) -> Result<Response> {
        set_query_param(&mut request.url, "token", &self.token);
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        debug!(method = %request.method, path = request.url.path(), "sending request");
        let res = self.http.send(request).map_err(Error::Transport)?;
        debug!(status = res.status.as_u16(), "received response");

        if res.status.as_u16() >= 400 {
            let envelope: ErrorEnvelope = serde_json::from_slice(&res.body)?;
            warn!(
                status = res.status.as_u16(),
                code = envelope.meta.code,
                "API returned an error"
            );
            return Err(envelope.into());
        }
        Ok(res)
    }

    /// Execute and decode the `response` member of the success envelope.
    pub(crate) fn fetch<T: DeserializeOwned + Default>(&self, request: Request) -> Result<T> {
        let res = self.execute(request)?;
        let envelope: Envelope<T> = serde_json::from_slice(&res.body)?;
        Ok(envelope.response)
    }

    pub fn groups(&self) -> GroupsService<'_> {
        GroupsService::new(self)
    }

    pub fn messages(&self) -> MessagesService<'_> {
        MessagesService::new(self)
    }

    pub fn likes(&self) -> LikesService<'_> {
        LikesService::new(self)
    }

    pub fn members(&self) -> MembersService<'_> {
        MembersService::new(self)
    }

    pub fn chats(&self) -> ChatsService<'_> {
        ChatsService::new(self)
    }

    pub fn direct_messages(&self) -> DirectMessagesService<'_> {
        DirectMessagesService::new(self)
    }

    pub fn leaderboard(&self) -> LeaderboardService<'_> {
        LeaderboardService::new(self)
    }

    pub fn bots(&self) -> BotsService<'_> {
        BotsService::new(self)
    }

    pub fn users(&self) -> UsersService<'_> {
        UsersService::new(self)
    }

    pub fn sms(&self) -> SmsService<'_> {
        SmsService::new(self)
    }

    pub fn blocks(&self) -> BlocksService<'_> {
        BlocksService::new(self)
    }
}

/// Set `key=value` in the query string, dropping earlier values of `key`.
pub(crate) fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| *k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(key, value);
}

/// `query_pairs_mut` leaves a bare `?` behind when nothing was appended.
pub(crate) fn clear_empty_query(url: &mut Url) {
    if url.query() == Some("") {
        url.set_query(None);
    }
}
