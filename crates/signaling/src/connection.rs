//! Client-Connection – Verwaltet eine einzelne WebSocket-Verbindung
//!
//! Jede Verbindung bekommt eine `ClientConnection` in einem eigenen
//! tokio-Task: ein Send-Task leert die Broadcaster-Queue Richtung Socket,
//! die Empfangsschleife parst eingehende Textframes und dispatcht sie.
//!
//! ## Lebenszyklus
//! ```text
//! Akzeptiert -> registriert (Verzeichnis + Broadcaster)
//!     |
//!     v
//! Empfangsschleife (Nachricht fuer Nachricht, in Senderreihenfolge)
//!     |
//!     v
//! Geschlossen -> AufraeumWache entfernt alle abgeleiteten Zustaende
//! ```
//!
//! Das Aufraeumen haengt am Drop der `AufraeumWache` und laeuft damit auf
//! jedem Austrittspfad, auch bei einem Panic in der Schleife.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use videoruf_core::VerbindungsId;
use videoruf_protocol::ClientNachricht;

use crate::dispatcher::{DispatcherContext, MessageDispatcher};
use crate::server_state::SignalingState;

/// Raeumt beim Verbindungsende alle abgeleiteten Zustaende ab
///
/// Reihenfolge: erst die Send-Queue (keine Zustellung an Tote), dann
/// Raummitgliedschaft und Verzeichniseintrag. Hat die Verbindung einen
/// Namen gebunden, wird die Benutzerliste neu verteilt.
struct AufraeumWache {
    state: Arc<SignalingState>,
    verbindung: VerbindungsId,
}

impl Drop for AufraeumWache {
    fn drop(&mut self) {
        self.state.broadcaster.entfernen(&self.verbindung);
        self.state.raeume.verbindung_entfernen(&self.verbindung);
        let hatte_name = self.state.verzeichnis.verbindung_entfernen(&self.verbindung);
        if hatte_name {
            self.state.benutzerliste_verteilen();
        }
        tracing::info!(verbindung = %self.verbindung, "Verbindung aufgeraeumt");
    }
}

/// Verarbeitet eine einzelne WebSocket-Verbindung
///
/// Liest Textframes, dispatcht an den `MessageDispatcher` und sendet
/// Events aus der Broadcaster-Queue zurueck. Laeuft in einem eigenen
/// tokio-Task bis der Transport die Schliessung meldet.
pub struct ClientConnection {
    state: Arc<SignalingState>,
    verbindung: VerbindungsId,
}

impl ClientConnection {
    /// Erstellt eine neue ClientConnection
    pub fn neu(state: Arc<SignalingState>, verbindung: VerbindungsId) -> Self {
        Self { state, verbindung }
    }

    /// Startet die Verbindungs-Verarbeitungsschleife
    pub async fn verarbeiten(self, socket: WebSocket) {
        let Self { state, verbindung } = self;

        tracing::info!(verbindung = %verbindung, "Neue Verbindung");

        state.verzeichnis.verbindung_registrieren(verbindung);
        let mut ereignis_rx = state.broadcaster.registrieren(verbindung);
        let _wache = AufraeumWache {
            state: Arc::clone(&state),
            verbindung,
        };

        let (mut sender, mut receiver) = socket.split();

        // Send-Task: Broadcaster-Queue -> WebSocket
        let mut send_task = tokio::spawn(async move {
            while let Some(ereignis) = ereignis_rx.recv().await {
                match ereignis.to_json() {
                    Ok(json) => {
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(fehler = %e, "Event-Serialisierung fehlgeschlagen");
                    }
                }
            }
        });

        let dispatcher = MessageDispatcher::neu(Arc::clone(&state));
        let ctx = DispatcherContext { verbindung };

        // Empfangsschleife: pro Verbindung strikt in Senderreihenfolge
        loop {
            tokio::select! {
                frame = receiver.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            match ClientNachricht::from_json(&text) {
                                Ok(nachricht) => dispatcher.dispatch(nachricht, &ctx),
                                Err(e) => {
                                    // Fehlerhafte Nachrichten betreffen nur diese Verbindung
                                    tracing::warn!(
                                        verbindung = %verbindung,
                                        fehler = %e,
                                        "Ungueltige Nachricht verworfen"
                                    );
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            tracing::info!(verbindung = %verbindung, "Verbindung vom Client getrennt");
                            break;
                        }
                        Some(Ok(_)) => {
                            // Ping/Pong beantwortet axum selbst; Binaerframes ignorieren
                        }
                        Some(Err(e)) => {
                            tracing::warn!(verbindung = %verbindung, fehler = %e, "Frame-Lesefehler");
                            break;
                        }
                    }
                }

                // Send-Task endet nur wenn der Socket nicht mehr schreibbar ist
                _ = &mut send_task => {
                    tracing::debug!(verbindung = %verbindung, "Send-Task beendet");
                    break;
                }
            }
        }

        send_task.abort();
        tracing::debug!(verbindung = %verbindung, "Verbindungs-Task beendet");
        // _wache faellt hier aus dem Scope und raeumt garantiert auf
    }
}
