//! Auth-Handler – Login
//!
//! Bindet den Anzeigenamen der Verbindung im Verzeichnis und verteilt die
//! aktualisierte Benutzerliste an alle Verbindungen. Ein zweiter Login
//! derselben Verbindung bindet lediglich den Namen um.

use std::sync::Arc;
use videoruf_core::VerbindungsId;
use videoruf_protocol::ServerEreignis;

use crate::server_state::SignalingState;

/// Verarbeitet eine Login-Nachricht
///
/// Bei leerem Namen erhaelt der Absender ein `error`-Event und die
/// Verbindung bleibt anonym. Bei Erfolg: Bestaetigung an den Absender,
/// danach die Benutzerliste an alle (Absender eingeschlossen).
pub fn handle_login(name: String, verbindung: VerbindungsId, state: &Arc<SignalingState>) {
    match state.verzeichnis.name_binden(verbindung, &name) {
        Ok(()) => {
            state
                .broadcaster
                .an_verbindung_senden(&verbindung, ServerEreignis::Login { success: true });
            state.benutzerliste_verteilen();
        }
        Err(e) => {
            tracing::debug!(verbindung = %verbindung, "Login ohne Namen abgelehnt");
            state
                .broadcaster
                .an_verbindung_senden(&verbindung, ServerEreignis::fehler(e.to_string()));
        }
    }
}
