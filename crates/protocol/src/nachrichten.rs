//! Relay-Protokoll (WebSocket)
//!
//! Definiert alle Nachrichten die ueber die WebSocket-Verbindung zwischen
//! Browser-Client und Relay ausgetauscht werden.
//!
//! ## Design
//! - JSON-Serialisierung via serde, intern getaggt (`"type"`-Feld)
//! - Das `signal`-Feld ist ein opakes `serde_json::Value`: das Relay
//!   interpretiert Verhandlungs-Payloads (Offer/Answer/Candidate) nie,
//!   sondern reicht sie unveraendert an die Zielverbindung weiter
//! - Fehlende Felder deserialisieren zu leeren Werten; die Handler
//!   entscheiden ob daraus ein `error`-Event oder ein stilles Verwerfen wird

use serde::{Deserialize, Serialize};
use videoruf_core::VerbindungsId;

// ---------------------------------------------------------------------------
// Client -> Relay
// ---------------------------------------------------------------------------

/// Alle Nachrichten die ein Client an das Relay senden kann
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientNachricht {
    /// Anzeigenamen binden; loest einen `userlist`-Broadcast aus
    Login {
        #[serde(default)]
        name: String,
    },

    /// Einem benannten Raum beitreten (implizit erstellt)
    JoinRoom {
        #[serde(default)]
        room: String,
    },

    /// Anruf an einen Benutzer (per Anzeigename) einleiten
    CallUser {
        #[serde(default)]
        to: String,
    },

    /// Anruf-Annahme an die anrufende Verbindung melden
    CallAccepted { to: Option<VerbindungsId> },

    /// Opakes Verhandlungs-Payload an eine Zielverbindung weiterreichen
    Signal {
        to: Option<VerbindungsId>,
        #[serde(default)]
        signal: serde_json::Value,
    },

    /// Chat-Nachricht an alle Mitglieder eines Raums (Absender inklusive)
    RoomChat {
        #[serde(default)]
        room: String,
        #[serde(default)]
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Relay -> Client
// ---------------------------------------------------------------------------

/// Alle Events die das Relay an Clients sendet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEreignis {
    /// Login-Bestaetigung an den Absender
    Login { success: bool },

    /// Fehler-Event an die verursachende Verbindung
    Error { message: String },

    /// Aktuelle Liste aller gebundenen Anzeigenamen (sortiert)
    Userlist { users: Vec<String> },

    /// Ein Benutzer ist dem Raum beigetreten (an die uebrigen Mitglieder)
    ///
    /// `name` kann fehlen wenn `join_room` vor `login` gesendet wurde.
    NewUser {
        id: VerbindungsId,
        name: Option<String>,
    },

    /// Eingehender Anruf an die Zielverbindung
    IncomingCall {
        from: VerbindungsId,
        name: Option<String>,
    },

    /// Anruf-Annahme an die anrufende Verbindung
    CallAccepted { from: VerbindungsId },

    /// Weitergereichtes Verhandlungs-Payload, unveraendert
    SignalReceived {
        from: VerbindungsId,
        signal: serde_json::Value,
    },

    /// Raum-Chat-Nachricht an alle Raummitglieder
    RoomChat {
        from: Option<String>,
        message: String,
    },
}

impl ServerEreignis {
    /// Erstellt ein Fehler-Event
    pub fn fehler(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Serialisiert das Event als JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl ClientNachricht {
    /// Deserialisiert eine Nachricht aus JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
