pub mod auth;
pub mod client;
pub mod error;

pub use auth::{ClientCredentialsTokenSource, TokenSource};
pub use client::ArmClient;
pub use error::ApiFailure;

/// ARM host every management call is issued against.
pub const MANAGEMENT_URL: &str = "https://management.azure.com";
/// Entra ID host the client-credentials grant is issued against.
pub const LOGIN_URL: &str = "https://login.microsoftonline.com";
/// Audience the bearer token is scoped to. The trailing slash matters.
pub const MANAGEMENT_RESOURCE: &str = "https://management.azure.com/";
