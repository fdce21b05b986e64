//! videoruf-signaling – Presence- und Signaling-Relay
//!
//! Dieser Crate implementiert das Relay fuer Videoruf: eine im Speicher
//! gehaltene Benutzer- und Raumverwaltung plus das Nachrichten-Routing,
//! das Anrufer und Angerufene verbindet und opake Verhandlungs-Payloads
//! unveraendert weiterreicht.
//!
//! ## Architektur
//!
//! ```text
//! WebSocket-Endpunkt (ws_handler)
//!     |
//!     v
//! ClientConnection (pro Verbindung ein Task)
//!     |  Zustand: Anonym -> Identifiziert, orthogonal dazu Raummitgliedschaft
//!     |
//!     v
//! MessageDispatcher
//!     |
//!     +-- auth_handler   (Login)
//!     +-- raum_handler   (JoinRoom, RoomChat)
//!     +-- anruf_handler  (CallUser, CallAccepted, Signal)
//!
//! BenutzerVerzeichnis – Wer ist verbunden, welcher Name gehoert wem
//! RaumVerwaltung      – Wer ist in welchem Raum
//! EventBroadcaster    – Events an Verbindungen senden
//! ```

pub mod broadcast;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod raeume;
pub mod server_state;
pub mod verzeichnis;
pub mod ws;

// Bequeme Re-Exporte
pub use broadcast::EventBroadcaster;
pub use connection::ClientConnection;
pub use dispatcher::MessageDispatcher;
pub use error::{SignalingError, SignalingResult};
pub use raeume::RaumVerwaltung;
pub use server_state::SignalingState;
pub use verzeichnis::BenutzerVerzeichnis;
pub use ws::ws_handler;
