//! Account management, most of which happens before having a token.
//!
//! <https://desec.readthedocs.io/en/latest/auth/account.html>

use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::token::Token;
use crate::{Client, ClientBuilder, ClientError, Payload};

/// The account of a deSEC user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_domains: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outreach_preference: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptchaKind {
    Image,
    Audio,
}

impl CaptchaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CaptchaKind::Image => "image",
            CaptchaKind::Audio => "audio",
        }
    }
}

/// A captcha issued by the server, which the client solves and sends back.
///
/// `challenge` is the base64 encoded image or audio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Captcha {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub challenge: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub solution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CaptchaKind>,
}

impl Captcha {
    /// The captcha as sent back to the server, with just its id and solution.
    pub fn solved(id: &str, solution: &str) -> Self {
        Self {
            id: id.to_string(),
            solution: solution.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub new_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha: Option<Captcha>,
    /// A domain to create together with the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Client for the account endpoints.
///
/// It holds no token of its own: calls that need one take it as an argument.
#[derive(Debug, Clone)]
pub struct AccountClient {
    client: Client,
}

impl AccountClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a builder; finish it with [ClientBuilder::build_account].
    pub fn builder() -> ClientBuilder {
        Client::builder()
    }

    /// Returns a handle whose calls are aborted once `timeout` has elapsed.
    pub fn with_timeout(&self, timeout: std::time::Duration) -> Self {
        Self::new(self.client.with_timeout(timeout))
    }

    /// Obtains an image captcha.
    pub fn obtain_captcha(&self) -> Result<Captcha, ClientError> {
        self.obtain_captcha_of_kind(CaptchaKind::Image)
    }

    pub fn obtain_captcha_of_kind(&self, kind: CaptchaKind) -> Result<Captcha, ClientError> {
        let url = self.client.build_url(&["captcha"])?;

        let payload = Payload::new().add("kind", kind.as_str());

        let resp = self.client.call(Method::POST, url).json(&payload)?.send()?;
        match resp.status {
            StatusCode::OK | StatusCode::CREATED => resp.decode(),
            _ => Err(ClientError::from_response(resp)),
        }
    }

    /// Registers an account. The server answers by sending a verification email.
    pub fn register(&self, registration: &Registration) -> Result<(), ClientError> {
        let url = self.client.build_url(&["auth"])?;

        self.client
            .call(Method::POST, url)
            .json(registration)?
            .expect(StatusCode::ACCEPTED)?;

        Ok(())
    }

    /// Logs in, returning a new login token.
    pub fn login(&self, email: &str, password: &str) -> Result<Token, ClientError> {
        let url = self.client.build_url(&["auth", "login"])?;

        let payload = Payload::new()
            .add("email", email)
            .add("password", password);

        self.client
            .call(Method::POST, url)
            .json(&payload)?
            .expect(StatusCode::OK)?
            .decode()
    }

    /// Logs out, which invalidates `token`.
    pub fn logout(&self, token: &str) -> Result<(), ClientError> {
        let url = self.client.build_url(&["auth", "logout"])?;

        self.client
            .call(Method::POST, url)
            .token(token)
            .expect(StatusCode::NO_CONTENT)?;

        Ok(())
    }

    pub fn retrieve_information(&self, token: &str) -> Result<Account, ClientError> {
        let url = self.client.build_url(&["auth", "account"])?;

        self.client
            .call(Method::GET, url)
            .token(token)
            .expect(StatusCode::OK)?
            .decode()
    }

    /// Opts in or out of occasional emails from deSEC.
    pub fn change_outreach_preference(
        &self,
        token: &str,
        outreach_preference: bool,
    ) -> Result<Account, ClientError> {
        let url = self.client.build_url(&["auth", "account"])?;

        let payload = Payload::new().add("outreach_preference", outreach_preference);

        self.client
            .call(Method::PATCH, url)
            .token(token)
            .json(&payload)?
            .expect(StatusCode::OK)?
            .decode()
    }

    /// Requests a password reset link, sent by email. Also used for changing
    /// the password.
    pub fn password_reset(&self, email: &str, captcha: &Captcha) -> Result<(), ClientError> {
        let url = self
            .client
            .build_url(&["auth", "account", "reset-password"])?;

        let registration = Registration {
            email: email.to_string(),
            captcha: Some(captcha.clone()),
            ..Default::default()
        };

        self.client
            .call(Method::POST, url)
            .json(&registration)?
            .expect(StatusCode::ACCEPTED)?;

        Ok(())
    }

    /// Requests moving the account to `new_email`, confirmed by email.
    pub fn change_email(
        &self,
        email: &str,
        password: &str,
        new_email: &str,
    ) -> Result<(), ClientError> {
        let url = self
            .client
            .build_url(&["auth", "account", "change-email"])?;

        let registration = Registration {
            email: email.to_string(),
            password: password.to_string(),
            new_email: new_email.to_string(),
            ..Default::default()
        };

        self.client
            .call(Method::POST, url)
            .json(&registration)?
            .expect(StatusCode::ACCEPTED)?;

        Ok(())
    }

    /// Requests deletion of the account, confirmed by email.
    pub fn delete(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let url = self.client.build_url(&["auth", "account", "delete"])?;

        let payload = Payload::new()
            .add("email", email)
            .add("password", password);

        self.client
            .call(Method::POST, url)
            .json(&payload)?
            .expect(StatusCode::ACCEPTED)?;

        Ok(())
    }
}
