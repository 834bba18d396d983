//! Inspector module: one request/response exchange per URL
//!
//! This module knows nothing about rows, modes or storage. It turns
//! `(url, siteUrl, token)` into either an [`IndexInspection`] or a classified
//! [`InspectionError`].

mod client;
mod credential;
mod error;
mod wire;

pub use client::{build_http_client, InspectionClient, Inspector};
pub use credential::{credential_provider, CredentialProvider, EnvToken, StaticToken, TokenFile};
pub use error::{CredentialError, InspectionError};
pub use wire::{parse_inspection_response, IndexInspection, InspectRequest, LANGUAGE_CODE};
