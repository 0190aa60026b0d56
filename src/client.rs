use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use url::Url;

use crate::account::AccountClient;
use crate::domain::DomainsService;
use crate::pagination::{self, Page};
use crate::policy::TokenPoliciesService;
use crate::record::RecordsService;
use crate::token::TokensService;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::{ClientBuilderError, ClientError};

/// The versioned root of the deSEC API.
pub const DEFAULT_ENDPOINT: &str = "https://desec.io/api/v1/";

/// Joins the path segments onto `base`.
///
/// The resulting path always ends in exactly one `/`, which the deSEC API
/// requires. Empty segments are skipped and the query of `base` is kept.
///
/// # Errors
/// - `RelativeUrlWithCannotBeABaseBase` if `base` can't have a path
pub fn build_endpoint(base: &Url, segments: &[&str]) -> Result<Url, url::ParseError> {
    if base.cannot_be_a_base() {
        return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
    }

    let mut url = base.clone();
    let trimmed = url.path().trim_end_matches('/').to_string();
    url.set_path(&trimmed);
    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments.iter().filter(|s| !s.is_empty()))
        .push("");

    Ok(url)
}

/// Builder for a [Client] or an [AccountClient] that handles default values.
#[derive(Default)]
pub struct ClientBuilder {
    endpoint: Option<Url>,
    token: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Sets the API endpoint to the one given.
    pub fn endpoint(mut self, endpoint: &Url) -> Self {
        self.endpoint = Some(endpoint.clone());
        self
    }

    /// In the case that `endpoint` is the Some variant, sets the API endpoint to it.
    pub fn endpoint_if_some(mut self, endpoint: Option<&Url>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = Some(endpoint.clone());
        }
        self
    }

    /// Sets the API token to the one given.
    pub fn token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Sets a deadline applied to every call made by the client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the `User-Agent` of the default transport.
    ///
    /// Has no effect when a custom transport or HTTP client is given.
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Sends all requests through the given reqwest client.
    pub fn http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.transport = Some(Arc::new(ReqwestTransport::new(client)));
        self
    }

    /// Sends all requests through the given transport.
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Builds a [Client] from the builder.
    ///
    /// In the case that no API endpoint is set, [DEFAULT_ENDPOINT] is used.
    ///
    /// # Errors
    /// - `MissingField` if no token was added to the builder.
    /// - `UrlParse` if the default API endpoint fails to parse. This shouldn't happen.
    /// - `HttpClient` if the default transport can't be set up.
    pub fn build(mut self) -> Result<Client, ClientBuilderError> {
        let token = self
            .token
            .take()
            .ok_or_else(|| ClientBuilderError::MissingField("token".to_string()))?;

        self.build_with(Some(token))
    }

    /// Builds an [AccountClient] from the builder.
    ///
    /// The account client never sends the builder's token; the calls that
    /// need one take it as an argument.
    ///
    /// # Errors
    /// Same as [ClientBuilder::build], except that no token is required.
    pub fn build_account(self) -> Result<AccountClient, ClientBuilderError> {
        Ok(AccountClient::new(self.build_with(None)?))
    }

    fn build_with(self, token: Option<String>) -> Result<Client, ClientBuilderError> {
        let endpoint = match self.endpoint {
            Some(endpoint) => endpoint,
            None => DEFAULT_ENDPOINT.parse()?,
        };
        if endpoint.cannot_be_a_base() {
            return Err(ClientBuilderError::UrlParse(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::blocking::Client::builder();
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                Arc::new(ReqwestTransport::new(builder.build()?))
            }
        };

        Ok(Client {
            config: Arc::new(Config {
                endpoint,
                token,
                transport,
            }),
            timeout: self.timeout,
        })
    }
}

struct Config {
    endpoint: Url,
    token: Option<String>,
    transport: Arc<dyn Transport>,
}

/// API client.
///
/// Cloning is cheap: clones share the same configuration and transport.
#[derive(Clone)]
pub struct Client {
    config: Arc<Config>,
    timeout: Option<Duration>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.config.endpoint.as_str())
            .field("has_token", &self.config.token.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Client {
    /// Creates a new Client using the default transport.
    ///
    /// # Errors
    /// - `HttpClient` if the default transport can't be set up.
    pub fn new(endpoint: &Url, token: &str) -> Result<Self, ClientBuilderError> {
        Self::builder().endpoint(endpoint).token(token).build()
    }

    /// Returns a builder for a Client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns a handle sharing this client's configuration whose calls are
    /// aborted once `timeout` has elapsed.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            config: Arc::clone(&self.config),
            timeout: Some(timeout),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.config.endpoint
    }

    pub fn domains(&self) -> DomainsService<'_> {
        DomainsService::new(self)
    }

    pub fn records(&self) -> RecordsService<'_> {
        RecordsService::new(self)
    }

    pub fn tokens(&self) -> TokensService<'_> {
        TokensService::new(self)
    }

    pub fn token_policies(&self) -> TokenPoliciesService<'_> {
        TokenPoliciesService::new(self)
    }

    /// Creates a [Url] from the endpoint and the path sections.
    pub(crate) fn build_url(&self, path: &[&str]) -> Result<Url, url::ParseError> {
        build_endpoint(&self.config.endpoint, path)
    }

    /// Starts a request to the given url.
    pub(crate) fn call(&self, method: Method, url: Url) -> Call<'_> {
        Call {
            client: self,
            method,
            url,
            body: None,
            token: None,
        }
    }
}

/// A request being put together by one of the services.
pub(crate) struct Call<'a> {
    client: &'a Client,
    method: Method,
    url: Url,
    body: Option<Vec<u8>>,
    token: Option<&'a str>,
}

impl<'a> Call<'a> {
    /// Sets the JSON body of the request.
    pub(crate) fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_vec(body).map_err(ClientError::Encode)?);
        Ok(self)
    }

    /// Authorizes this request with `token` instead of the client's.
    pub(crate) fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    /// Sends the request, returning whatever response came back.
    pub(crate) fn send(self) -> Result<HttpResponse, ClientError> {
        let mut headers = HeaderMap::new();
        if self.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(token) = self.token.or(self.client.config.token.as_deref()) {
            let mut value = HeaderValue::from_str(&format!("Token {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        log::debug!("{} {}", self.method, self.url);

        let resp = self.client.config.transport.execute(HttpRequest {
            method: self.method,
            url: self.url,
            headers,
            body: self.body,
            timeout: self.client.timeout,
        })?;

        log::debug!("Response Status: {}", resp.status);
        log::trace!("Response Body: {} bytes", resp.body.len());

        Ok(resp)
    }

    /// Sends the request, turning any status other than `status` into an error.
    pub(crate) fn expect(self, status: StatusCode) -> Result<HttpResponse, ClientError> {
        let resp = self.send()?;
        if resp.status != status {
            return Err(ClientError::from_response(resp));
        }
        Ok(resp)
    }
}

impl HttpResponse {
    /// Decodes the JSON body.
    pub(crate) fn decode<T: for<'de> serde::Deserialize<'de>>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body).map_err(ClientError::Decode)
    }

    /// Decodes the JSON list in the body along with the pagination cursors.
    ///
    /// `url` is the URL of the request, which relative links are resolved
    /// against.
    pub(crate) fn decode_page<T: for<'de> serde::Deserialize<'de>>(
        &self,
        url: &Url,
    ) -> Result<Page<T>, ClientError> {
        let cursors = pagination::parse_cursors(&self.headers, url)?;
        Ok(Page {
            items: self.decode()?,
            cursors,
        })
    }
}
