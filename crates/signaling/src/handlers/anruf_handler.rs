//! Anruf-Handler – Anruf-Aufbau und Signal-Weiterleitung
//!
//! Das Routing ist rein identifier-basiert: `call_user` loest einen
//! Anzeigenamen ueber das Verzeichnis auf, `call_accepted` und `signal`
//! adressieren Verbindungen direkt. Signal-Payloads werden nie inspiziert.

use std::sync::Arc;
use videoruf_core::VerbindungsId;
use videoruf_protocol::ServerEreignis;

use crate::error::SignalingError;
use crate::server_state::SignalingState;

/// Verarbeitet einen Anrufwunsch an einen Anzeigenamen
///
/// Ist der Name nicht gebunden, erhaelt der Anrufer ein `error`-Event
/// und nirgendwo wird ein `incoming_call` zugestellt.
pub fn handle_anruf(to: String, verbindung: VerbindungsId, state: &Arc<SignalingState>) {
    match state.verzeichnis.aufloesen(&to) {
        Some(ziel) => {
            let name = state.verzeichnis.name_von(&verbindung);
            state.broadcaster.an_verbindung_senden(
                &ziel,
                ServerEreignis::IncomingCall {
                    from: verbindung,
                    name,
                },
            );
        }
        None => {
            tracing::debug!(verbindung = %verbindung, ziel = %to, "Anruf an unbekannten Benutzer");
            state.broadcaster.an_verbindung_senden(
                &verbindung,
                ServerEreignis::fehler(SignalingError::BenutzerNichtGefunden.to_string()),
            );
        }
    }
}

/// Verarbeitet eine Anruf-Annahme
///
/// Fehlendes Ziel wird still verworfen.
pub fn handle_anruf_angenommen(
    to: Option<VerbindungsId>,
    verbindung: VerbindungsId,
    state: &Arc<SignalingState>,
) {
    let Some(ziel) = to else {
        return;
    };
    state
        .broadcaster
        .an_verbindung_senden(&ziel, ServerEreignis::CallAccepted { from: verbindung });
}

/// Reicht ein opakes Verhandlungs-Payload an die Zielverbindung weiter
///
/// Fehlendes Ziel wird still verworfen. Das Payload geht unveraendert raus.
pub fn handle_signal(
    to: Option<VerbindungsId>,
    signal: serde_json::Value,
    verbindung: VerbindungsId,
    state: &Arc<SignalingState>,
) {
    let Some(ziel) = to else {
        return;
    };
    state.broadcaster.an_verbindung_senden(
        &ziel,
        ServerEreignis::SignalReceived {
            from: verbindung,
            signal,
        },
    );
}
