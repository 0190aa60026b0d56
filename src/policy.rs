//! RRset access policies scoped to a token.
//!
//! <https://desec.readthedocs.io/en/latest/auth/tokens.html#token-scoping-policies>

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{Client, ClientError, Payload};

/// A policy granting a token access to RRsets.
///
/// A `None` domain, sub-name or type applies to every value of it, so a
/// policy with all three unset is the token's default policy. These are
/// always sent as explicit `null`s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPolicy {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub domain: Option<String>,
    pub subname: Option<String>,
    #[serde(rename = "type")]
    pub rr_type: Option<String>,
    #[serde(default)]
    pub perm_write: bool,
}

impl TokenPolicy {
    fn payload(&self) -> Payload {
        Payload::new()
            .add_nullable("domain", self.domain.clone())
            .add_nullable("subname", self.subname.clone())
            .add_nullable("type", self.rr_type.clone())
            .add("perm_write", self.perm_write)
    }
}

/// Handle for the token policy related calls of a [Client].
pub struct TokenPoliciesService<'a> {
    client: &'a Client,
}

impl<'a> TokenPoliciesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists the RRset policies of a token, in the order the server returns them.
    pub fn get_all(&self, token_id: &str) -> Result<Vec<TokenPolicy>, ClientError> {
        let url = self
            .client
            .build_url(&["auth", "tokens", token_id, "policies", "rrsets"])?;

        self.client
            .call(Method::GET, url)
            .expect(StatusCode::OK)?
            .decode()
    }

    pub fn get(&self, token_id: &str, policy_id: &str) -> Result<TokenPolicy, ClientError> {
        let url = self.client.build_url(&[
            "auth", "tokens", token_id, "policies", "rrsets", policy_id,
        ])?;

        self.client
            .call(Method::GET, url)
            .expect(StatusCode::OK)?
            .decode()
    }

    pub fn create(&self, token_id: &str, policy: &TokenPolicy) -> Result<TokenPolicy, ClientError> {
        let url = self
            .client
            .build_url(&["auth", "tokens", token_id, "policies", "rrsets"])?;

        self.client
            .call(Method::POST, url)
            .json(&policy.payload())?
            .expect(StatusCode::CREATED)?
            .decode()
    }

    pub fn update(
        &self,
        token_id: &str,
        policy_id: &str,
        policy: &TokenPolicy,
    ) -> Result<TokenPolicy, ClientError> {
        let url = self.client.build_url(&[
            "auth", "tokens", token_id, "policies", "rrsets", policy_id,
        ])?;

        self.client
            .call(Method::PATCH, url)
            .json(&policy.payload())?
            .expect(StatusCode::OK)?
            .decode()
    }

    pub fn delete(&self, token_id: &str, policy_id: &str) -> Result<(), ClientError> {
        let url = self.client.build_url(&[
            "auth", "tokens", token_id, "policies", "rrsets", policy_id,
        ])?;

        self.client
            .call(Method::DELETE, url)
            .expect(StatusCode::NO_CONTENT)?;

        Ok(())
    }
}
