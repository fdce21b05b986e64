//! Gemeinsamer Zustand des Signaling-Relays
//!
//! Haelt Verzeichnis, Raumverwaltung und Broadcaster als ein explizit
//! konstruiertes Zustandsobjekt, das beim Prozessstart erstellt und in den
//! WebSocket-Endpunkt injiziert wird. Es gibt bewusst keinen globalen oder
//! statischen Zustand.

use std::sync::Arc;

use videoruf_protocol::ServerEreignis;

use crate::broadcast::EventBroadcaster;
use crate::raeume::RaumVerwaltung;
use crate::verzeichnis::BenutzerVerzeichnis;

/// Gemeinsamer Relay-Zustand (thread-safe, Arc-geteilt)
pub struct SignalingState {
    /// Lebende Verbindungen und Namensbindungen
    pub verzeichnis: BenutzerVerzeichnis,
    /// Raumzugehoerigkeit
    pub raeume: RaumVerwaltung,
    /// Send-Queues aller Verbindungen
    pub broadcaster: EventBroadcaster,
}

impl SignalingState {
    /// Erstellt einen neuen, leeren Relay-Zustand
    pub fn neu() -> Arc<Self> {
        Arc::new(Self {
            verzeichnis: BenutzerVerzeichnis::neu(),
            raeume: RaumVerwaltung::neu(),
            broadcaster: EventBroadcaster::neu(),
        })
    }

    /// Verteilt die aktuelle Benutzerliste an alle Verbindungen
    ///
    /// Wird nach jeder Aenderung einer Namensbindung aufgerufen
    /// (Login und Trennen einer benannten Verbindung).
    pub fn benutzerliste_verteilen(&self) {
        let users = self.verzeichnis.alle_namen();
        tracing::debug!(anzahl = users.len(), "Benutzerliste wird verteilt");
        self.broadcaster
            .an_alle_senden(ServerEreignis::Userlist { users });
    }
}
