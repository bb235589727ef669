//! Gateway OAuth 2.0 resource that hands token introspection and userinfo lookups to an
//! Access Management server. Endpoints are resolved once, one pooled client is shared, and every
//! upstream answer becomes a success or failure result the policy layer can consume.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod metadata;
pub mod obs;
pub mod resource;
pub mod response;

mod _prelude {
	pub use std::{
		borrow::Cow,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
