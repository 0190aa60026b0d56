//! Authentication tokens of the account.
//!
//! <https://desec.readthedocs.io/en/latest/auth/tokens.html>

use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{Client, ClientError, Payload};

/// An API token.
///
/// The secret `value` is only ever returned when the token is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "token", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub perm_create_domain: bool,
    #[serde(default)]
    pub perm_delete_domain: bool,
    #[serde(default)]
    pub perm_manage_tokens: bool,
    #[serde(default)]
    pub is_valid: bool,
    /// Networks the token may be used from. `Some` of an empty list allows
    /// none, while `None` leaves the server's setting as it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_subnets: Option<Vec<String>>,
    #[serde(default)]
    pub auto_policy: bool,
    /// Maximum lifetime, in the server's `[DD] [HH:[MM:]]ss` duration format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_unused_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl Token {
    /// The fields of the token that can be written.
    fn writable(&self) -> Payload {
        Payload::new()
            .add_if_some("name", (!self.name.is_empty()).then_some(self.name.as_str()))
            .add("perm_create_domain", self.perm_create_domain)
            .add("perm_delete_domain", self.perm_delete_domain)
            .add("perm_manage_tokens", self.perm_manage_tokens)
            .add_if_some("allowed_subnets", self.allowed_subnets.clone())
            .add("auto_policy", self.auto_policy)
            .add_nullable("max_age", self.max_age.clone())
            .add_nullable("max_unused_period", self.max_unused_period.clone())
    }
}

/// Handle for the token related calls of a [Client].
pub struct TokensService<'a> {
    client: &'a Client,
}

impl<'a> TokensService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists all tokens of the account.
    pub fn get_all(&self) -> Result<Vec<Token>, ClientError> {
        let url = self.client.build_url(&["auth", "tokens"])?;

        self.client
            .call(Method::GET, url)
            .expect(StatusCode::OK)?
            .decode()
    }

    /// Retrieves a specific token, or `None` if there's no token with that id.
    pub fn get(&self, id: &str) -> Result<Option<Token>, ClientError> {
        let url = self.client.build_url(&["auth", "tokens", id])?;

        match self.client.call(Method::GET, url).expect(StatusCode::OK) {
            Ok(resp) => resp.decode().map(Some),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Creates a token with default permissions.
    pub fn create(&self, name: &str) -> Result<Token, ClientError> {
        let url = self.client.build_url(&["auth", "tokens"])?;

        let payload = Payload::new().add("name", name);

        self.client
            .call(Method::POST, url)
            .json(&payload)?
            .expect(StatusCode::CREATED)?
            .decode()
    }

    /// Creates a token with the permissions and restrictions of `token`.
    pub fn create_with(&self, token: &Token) -> Result<Token, ClientError> {
        let url = self.client.build_url(&["auth", "tokens"])?;

        self.client
            .call(Method::POST, url)
            .json(&token.writable())?
            .expect(StatusCode::CREATED)?
            .decode()
    }

    /// Changes the writable fields of a token.
    ///
    /// Server-managed fields of `token` such as its id, value, owner or
    /// timestamps are not sent.
    pub fn update(&self, id: &str, token: &Token) -> Result<Token, ClientError> {
        let url = self.client.build_url(&["auth", "tokens", id])?;

        self.client
            .call(Method::PATCH, url)
            .json(&token.writable())?
            .expect(StatusCode::OK)?
            .decode()
    }

    pub fn delete(&self, id: &str) -> Result<(), ClientError> {
        let url = self.client.build_url(&["auth", "tokens", id])?;

        self.client
            .call(Method::DELETE, url)
            .expect(StatusCode::NO_CONTENT)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests;
