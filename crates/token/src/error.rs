//! Fehlertypen fuer die Token-Ausstellung

use thiserror::Error;

/// Fehlertyp fuer die Token-Ausstellung
#[derive(Debug, Error)]
pub enum TokenError {
    /// Keine Identitaet gesetzt
    #[error("Keine Identitaet fuer das Token gesetzt")]
    FehlendeIdentitaet,

    /// JWT-Kodierung fehlgeschlagen
    #[error("Token-Kodierung fehlgeschlagen: {0}")]
    Kodierung(#[from] jsonwebtoken::errors::Error),
}
