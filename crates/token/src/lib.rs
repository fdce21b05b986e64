//! videoruf-token – Zugangstoken fuer den externen Konferenz-Dienst
//!
//! Stellt kurzlebige HS256-Token aus, mit denen ein Browser-Client einem
//! Raum des verwalteten Videokonferenz-Dienstes beitreten darf. Das Relay
//! selbst validiert diese Token nie; es ist reiner Aussteller.

pub mod error;
pub mod zugangstoken;

pub use error::TokenError;
pub use zugangstoken::{VideoGrants, Zugangstoken};
