//! Domains (DNS zones) hosted by deSEC.
//!
//! <https://desec.readthedocs.io/en/latest/dns/domains.html>

use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::pagination::Page;
use crate::{Client, ClientError, NotFound, Payload};

/// A domain, along with the DNSSEC keys deSEC manages for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<DomainKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touched: Option<DateTime<Utc>>,
}

/// A DNSSEC key of a [Domain]. These are managed by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainKey {
    #[serde(default)]
    pub dnskey: String,
    #[serde(default)]
    pub ds: Vec<String>,
    #[serde(default)]
    pub flags: u16,
    #[serde(default)]
    pub keytype: String,
}

/// Handle for the domain related calls of a [Client].
pub struct DomainsService<'a> {
    client: &'a Client,
}

impl<'a> DomainsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Creates a new domain.
    pub fn create(&self, name: &str) -> Result<Domain, ClientError> {
        let url = self.client.build_url(&["domains"])?;

        let payload = Payload::new().add("name", name);

        self.client
            .call(Method::POST, url)
            .json(&payload)?
            .expect(StatusCode::CREATED)?
            .decode()
    }

    /// Retrieves a specific domain.
    pub fn get(&self, name: &str) -> Result<Domain, ClientError> {
        let url = self.client.build_url(&["domains", name])?;

        self.client
            .call(Method::GET, url)
            .expect(StatusCode::OK)?
            .decode()
    }

    /// Lists the domains of the account.
    ///
    /// Only the first page is returned; use [DomainsService::get_page] to walk
    /// through all of them.
    pub fn get_all(&self) -> Result<Vec<Domain>, ClientError> {
        let url = self.client.build_url(&["domains"])?;

        self.client
            .call(Method::GET, url)
            .expect(StatusCode::OK)?
            .decode()
    }

    /// Lists one page of domains. An empty cursor asks for the first page.
    pub fn get_page(&self, cursor: &str) -> Result<Page<Domain>, ClientError> {
        let mut url = self.client.build_url(&["domains"])?;
        url.query_pairs_mut().append_pair("cursor", cursor);

        self.client
            .call(Method::GET, url.clone())
            .expect(StatusCode::OK)?
            .decode_page(&url)
    }

    /// Finds the domain whose zone is authoritative for `qname`.
    ///
    /// # Errors
    /// - `NotFound` if none of the account's domains is responsible for it
    pub fn get_responsible(&self, qname: &str) -> Result<Domain, ClientError> {
        let mut url = self.client.build_url(&["domains"])?;
        url.query_pairs_mut().append_pair("owns_qname", qname);

        let domains: Vec<Domain> = self
            .client
            .call(Method::GET, url)
            .expect(StatusCode::OK)?
            .decode()?;

        domains.into_iter().next().ok_or_else(|| {
            ClientError::NotFound(NotFound::new(format!(
                "no domain is responsible for {qname}"
            )))
        })
    }

    /// Exports the zone of the domain in zonefile format.
    pub fn zonefile(&self, name: &str) -> Result<String, ClientError> {
        let url = self.client.build_url(&["domains", name, "zonefile"])?;

        let resp = self
            .client
            .call(Method::GET, url)
            .expect(StatusCode::OK)?;

        Ok(String::from_utf8_lossy(&resp.body).into_owned())
    }

    pub fn delete(&self, name: &str) -> Result<(), ClientError> {
        let url = self.client.build_url(&["domains", name])?;

        self.client
            .call(Method::DELETE, url)
            .expect(StatusCode::NO_CONTENT)?;

        Ok(())
    }
}
