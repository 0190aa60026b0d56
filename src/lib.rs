//! # Simple and type-safe client for the deSEC API.
//!
//! Implements a blocking client for the [deSEC API], covering domains, RRsets,
//! tokens, token policies and account management.
//!
//! ## Examples
//!
//! ```no_run
//! use desec::Client;
//! use desec::record::{RRSet, RecordType};
//!
//! let client = Client::builder()
//!     .token("<TOKEN>")
//!     .build()
//!     .unwrap();
//!
//! let domain = client.domains().create("example.dedyn.io").unwrap();
//!
//! let records = vec!["192.0.2.1".to_string()];
//! let rrset = RRSet::new(&domain.name, "www", RecordType::A, records, Some(3600));
//! client.records().create(&rrset).unwrap();
//! ```
//!
//! Account management happens without a token:
//!
//! ```no_run
//! use desec::AccountClient;
//!
//! let accounts = AccountClient::builder().build_account().unwrap();
//! let token = accounts.login("email@example.com", "password").unwrap();
//! ```
//!
//! [deSEC API]: https://desec.readthedocs.io/en/latest/

pub mod account;
mod client;
pub mod domain;
mod errors;
pub mod pagination;
mod payload;
pub mod policy;
pub mod record;
pub mod token;
pub mod transport;
mod utils;

#[cfg(test)]
mod testing;

pub use account::AccountClient;
pub use client::*;
pub use errors::*;
pub(crate) use payload::*;
