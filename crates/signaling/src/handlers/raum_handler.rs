//! Raum-Handler – Raumbeitritt und Raum-Chat
//!
//! Raumbeitritt benachrichtigt die uebrigen Mitglieder; Raum-Chat ist ein
//! Broadcast an alle Mitglieder, den Absender eingeschlossen.

use std::sync::Arc;
use videoruf_core::VerbindungsId;
use videoruf_protocol::ServerEreignis;

use crate::server_state::SignalingState;

/// Verarbeitet einen Raumbeitritt
///
/// Ein leerer Raumname wird still verworfen. Die uebrigen Mitglieder
/// erhalten ein `new_user`-Event; der Name kann fehlen wenn der Beitritt
/// vor dem Login erfolgt.
pub fn handle_raum_beitritt(room: String, verbindung: VerbindungsId, state: &Arc<SignalingState>) {
    if state.raeume.beitreten(verbindung, &room).is_err() {
        tracing::debug!(verbindung = %verbindung, "Raumbeitritt ohne Raumnamen ignoriert");
        return;
    }

    let name = state.verzeichnis.name_von(&verbindung);
    let andere: Vec<VerbindungsId> = state
        .raeume
        .mitglieder(&room)
        .into_iter()
        .filter(|mitglied| mitglied != &verbindung)
        .collect();

    state.broadcaster.an_mehrere_senden(
        &andere,
        ServerEreignis::NewUser {
            id: verbindung,
            name,
        },
    );
}

/// Verarbeitet eine Raum-Chat-Nachricht
///
/// Zustellung an alle Mitglieder des Raums, Absender eingeschlossen.
/// Fehlender Raumname wird still verworfen; ist der Absender selbst kein
/// Mitglied, erreicht ihn sein eigenes Echo nicht.
pub fn handle_raum_chat(
    room: String,
    message: String,
    verbindung: VerbindungsId,
    state: &Arc<SignalingState>,
) {
    if room.is_empty() {
        tracing::debug!(verbindung = %verbindung, "Raum-Chat ohne Raumnamen ignoriert");
        return;
    }

    let from = state.verzeichnis.name_von(&verbindung);
    let mitglieder = state.raeume.mitglieder(&room);
    state
        .broadcaster
        .an_mehrere_senden(&mitglieder, ServerEreignis::RoomChat { from, message });
}
