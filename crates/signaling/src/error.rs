//! Fehlertypen fuer das Signaling-Relay

use thiserror::Error;

/// Fehlertyp fuer das Signaling-Relay
///
/// Alle Varianten sind verbindungslokal: sie werden als `error`-Event an
/// die verursachende Verbindung gemeldet oder still verworfen, nie an
/// andere Verbindungen propagiert.
#[derive(Debug, Error)]
pub enum SignalingError {
    /// Login ohne Anzeigenamen
    #[error("Name required")]
    LeererName,

    /// Raumbeitritt ohne Raumnamen
    #[error("Room name required")]
    LeererRaumName,

    /// Ziel-Benutzer nicht im Verzeichnis
    #[error("User not found")]
    BenutzerNichtGefunden,
}

/// Result-Typ fuer das Signaling-Relay
pub type SignalingResult<T> = Result<T, SignalingError>;
