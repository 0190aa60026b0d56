//! DNS record sets (RRsets) within a domain.
//!
//! <https://desec.readthedocs.io/en/latest/dns/rrsets.html>

use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};
use url::Url;

use crate::pagination::Page;
use crate::transport::HttpResponse;
use crate::utils::path_subname;
use crate::{Client, ClientError, Payload};

/// Sub-name used in URL paths for the apex of a zone.
pub const APEX: &str = "@";

/// Marker for an [RRSetFilter] field that shouldn't constrain the listing.
///
/// Equivalent to leaving the field as `None`. It is never sent to the server.
pub const IGNORE_FILTER: &str = "#IGNORE#";

/// Record types supported by deSEC.
///
/// The API itself works with plain strings, so these are only a convenience
/// for spelling them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Afsdb,
    Apl,
    Caa,
    Cdnskey,
    Cds,
    Cert,
    Cname,
    Dhcid,
    Dname,
    Dnskey,
    Dlv,
    Ds,
    Eui48,
    Eui64,
    Hinfo,
    Https,
    Kx,
    L32,
    L64,
    Loc,
    Lp,
    Mx,
    Naptr,
    Nid,
    Ns,
    Openpgpkey,
    Ptr,
    Rp,
    Smimea,
    Spf,
    Srv,
    Sshfp,
    Svcb,
    Tlsa,
    Txt,
    Uri,
}

impl RecordType {
    /// Gets the string representation of the type.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

/// A DNS record set: all records of one type at one name.
///
/// An RRset without records doesn't exist; writing an empty `records` list
/// deletes the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RRSet {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subname: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub rr_type: String,
    #[serde(default)]
    pub records: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touched: Option<DateTime<Utc>>,
}

impl RRSet {
    /// Creates an RRset for `domain` with the given records.
    pub fn new(
        domain: &str,
        subname: &str,
        rr_type: impl Into<String>,
        records: Vec<String>,
        ttl: Option<u32>,
    ) -> Self {
        Self {
            domain: domain.to_string(),
            subname: subname.to_string(),
            rr_type: rr_type.into(),
            records,
            ttl,
            ..Default::default()
        }
    }

    pub fn is_apex(&self) -> bool {
        self.subname.is_empty() || self.subname == APEX
    }
}

/// Constrains which RRsets of a zone get listed.
///
/// `None` leaves the field unconstrained, while `Some("")` for the sub-name
/// only matches the apex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RRSetFilter {
    pub rr_type: Option<String>,
    pub subname: Option<String>,
}

impl RRSetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rr_type(mut self, rr_type: impl Into<String>) -> Self {
        self.rr_type = Some(rr_type.into());
        self
    }

    pub fn subname(mut self, subname: &str) -> Self {
        self.subname = Some(subname.to_string());
        self
    }

    /// The query parameters for the fields that apply.
    fn query(&self) -> Vec<(&'static str, &str)> {
        [("type", &self.rr_type), ("subname", &self.subname)]
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .filter(|v| *v != IGNORE_FILTER)
                    .map(|v| (key, v))
            })
            .collect()
    }
}

/// How a bulk update treats the RRsets it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkMode {
    /// Every RRset is replaced as a whole (`PUT`).
    FullResource,
    /// Only the fields given are changed (`PATCH`).
    OnlyFields,
}

impl BulkMode {
    fn method(self) -> Method {
        match self {
            BulkMode::FullResource => Method::PUT,
            BulkMode::OnlyFields => Method::PATCH,
        }
    }
}

/// An RRset as sent in bulk requests, where the sub-name and type identify
/// the set and therefore always have to be present.
#[derive(Serialize)]
struct BulkItem<'a> {
    subname: &'a str,
    #[serde(rename = "type")]
    rr_type: &'a str,
    records: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
}

impl<'a> BulkItem<'a> {
    fn from_rrset(rrset: &'a RRSet) -> Self {
        Self {
            subname: &rrset.subname,
            rr_type: &rrset.rr_type,
            records: &rrset.records,
            ttl: rrset.ttl,
        }
    }
}

/// Handle for the RRset related calls of a [Client].
pub struct RecordsService<'a> {
    client: &'a Client,
}

impl<'a> RecordsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists the RRsets of a zone, optionally filtered.
    ///
    /// Only the first page is returned; use [RecordsService::get_page] to walk
    /// through all of them.
    pub fn get_all(
        &self,
        domain: &str,
        filter: Option<&RRSetFilter>,
    ) -> Result<Vec<RRSet>, ClientError> {
        let mut url = self.client.build_url(&["domains", domain, "rrsets"])?;
        let query = filter.map(RRSetFilter::query).unwrap_or_default();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        self.client
            .call(Method::GET, url)
            .expect(StatusCode::OK)?
            .decode()
    }

    /// Lists one page of the RRsets of a zone. An empty cursor asks for the
    /// first page.
    pub fn get_page(
        &self,
        domain: &str,
        filter: Option<&RRSetFilter>,
        cursor: &str,
    ) -> Result<Page<RRSet>, ClientError> {
        let mut url = self.client.build_url(&["domains", domain, "rrsets"])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(filter) = filter {
                query.extend_pairs(filter.query());
            }
            query.append_pair("cursor", cursor);
        }

        self.client
            .call(Method::GET, url.clone())
            .expect(StatusCode::OK)?
            .decode_page(&url)
    }

    /// Retrieves a specific RRset.
    pub fn get(&self, domain: &str, subname: &str, rr_type: &str) -> Result<RRSet, ClientError> {
        let url = self.rrset_url(domain, subname, rr_type)?;

        self.client
            .call(Method::GET, url)
            .expect(StatusCode::OK)?
            .decode()
    }

    /// Creates an RRset in the domain named by `rrset.domain`.
    pub fn create(&self, rrset: &RRSet) -> Result<RRSet, ClientError> {
        let url = self
            .client
            .build_url(&["domains", &rrset.domain, "rrsets"])?;

        self.client
            .call(Method::POST, url)
            .json(rrset)?
            .expect(StatusCode::CREATED)?
            .decode()
    }

    /// Changes the records and, if given, the TTL of an RRset.
    ///
    /// Returns `None` when the RRset was deleted because `records` was empty.
    pub fn update(
        &self,
        domain: &str,
        subname: &str,
        rr_type: &str,
        rrset: &RRSet,
    ) -> Result<Option<RRSet>, ClientError> {
        let url = self.rrset_url(domain, subname, rr_type)?;

        let payload = Payload::new()
            .add("records", rrset.records.clone())
            .add_if_some("ttl", rrset.ttl);

        self.modify(Method::PATCH, url, &payload)
    }

    /// Replaces an RRset as a whole.
    ///
    /// Returns `None` when the RRset was deleted because `records` was empty.
    pub fn replace(
        &self,
        domain: &str,
        subname: &str,
        rr_type: &str,
        rrset: &RRSet,
    ) -> Result<Option<RRSet>, ClientError> {
        let url = self.rrset_url(domain, subname, rr_type)?;

        let payload = Payload::new()
            .add("records", rrset.records.clone())
            .add_if_some("ttl", rrset.ttl);

        self.modify(Method::PUT, url, &payload)
    }

    pub fn delete(&self, domain: &str, subname: &str, rr_type: &str) -> Result<(), ClientError> {
        let url = self.rrset_url(domain, subname, rr_type)?;

        self.client
            .call(Method::DELETE, url)
            .expect(StatusCode::NO_CONTENT)?;

        Ok(())
    }

    /// Creates several RRsets in one request.
    pub fn bulk_create(&self, domain: &str, rrsets: &[RRSet]) -> Result<Vec<RRSet>, ClientError> {
        let url = self.client.build_url(&["domains", domain, "rrsets"])?;

        let items: Vec<_> = rrsets.iter().map(BulkItem::from_rrset).collect();

        self.client
            .call(Method::POST, url)
            .json(&items)?
            .expect(StatusCode::CREATED)?
            .decode()
    }

    /// Updates several RRsets in one request, as selected by `mode`.
    pub fn bulk_update(
        &self,
        mode: BulkMode,
        domain: &str,
        rrsets: &[RRSet],
    ) -> Result<Vec<RRSet>, ClientError> {
        let items: Vec<_> = rrsets.iter().map(BulkItem::from_rrset).collect();

        self.send_bulk(mode, domain, &items)?.decode()
    }

    /// Deletes several RRsets in one request, by replacing them with empty
    /// record lists.
    pub fn bulk_delete(&self, domain: &str, rrsets: &[RRSet]) -> Result<(), ClientError> {
        let items: Vec<_> = rrsets
            .iter()
            .map(|rrset| BulkItem {
                records: &[],
                ..BulkItem::from_rrset(rrset)
            })
            .collect();

        self.send_bulk(BulkMode::FullResource, domain, &items)?;

        Ok(())
    }

    fn send_bulk(
        &self,
        mode: BulkMode,
        domain: &str,
        items: &[BulkItem<'_>],
    ) -> Result<HttpResponse, ClientError> {
        let url = self.client.build_url(&["domains", domain, "rrsets"])?;

        self.client
            .call(mode.method(), url)
            .json(items)?
            .expect(StatusCode::OK)
    }

    /// Sends a single-RRset modification, which answers 204 when the set is gone.
    fn modify(
        &self,
        method: Method,
        url: Url,
        payload: &Payload,
    ) -> Result<Option<RRSet>, ClientError> {
        let resp = self.client.call(method, url).json(payload)?.send()?;

        match resp.status {
            StatusCode::NO_CONTENT => Ok(None),
            StatusCode::OK => resp.decode().map(Some),
            _ => Err(ClientError::from_response(resp)),
        }
    }

    fn rrset_url(
        &self,
        domain: &str,
        subname: &str,
        rr_type: &str,
    ) -> Result<Url, url::ParseError> {
        self.client.build_url(&[
            "domains",
            domain,
            "rrsets",
            path_subname(subname),
            rr_type,
        ])
    }
}
