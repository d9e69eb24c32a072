//! REST clients for the silex server.
//!
//! Thin request/response mappings, one method per route:
//!
//! - [`AuthenticationService`]: `authenticate`, `logout`
//! - [`UsersService`]: `create`
//!
//! Each method builds a URL from the configured base path, sets its
//! headers, issues one `POST` through an [`HttpClient`], and returns either
//! the decoded body or the whole response depending on [`Observe`].
//!
//! # Feature Flags
//!
//! - `reqwest` (default): [`ReqwestClient`], the `reqwest`-backed client

#![allow(async_fn_in_trait)]

mod authentication;
mod error;
mod http;
mod models;
#[cfg(feature = "reqwest")]
mod reqwest_client;
mod users;

pub use authentication::AuthenticationService;
pub use error::ApiError;
pub use http::{
    ApiConfiguration, ApiResult, Headers, HttpClient, HttpResponse, Observe,
};
pub use models::{TokenGetDTO, UserAuthenticationDTO, UserCreationDTO};
#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;
pub use users::UsersService;
