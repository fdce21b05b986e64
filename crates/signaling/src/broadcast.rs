//! Event-Broadcaster – Sendet Events an Verbindungen
//!
//! Der EventBroadcaster verwaltet die Send-Queues aller lebenden
//! Verbindungen und stellt Methoden bereit, um Events gezielt, an eine
//! Auswahl oder an alle zu senden.
//!
//! Die Zustellung ist nicht-blockierend: eine volle Queue verwirft das
//! Event fuer diese eine Verbindung, die Verarbeitung anderer Verbindungen
//! bleibt davon unberuehrt.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use videoruf_core::VerbindungsId;
use videoruf_protocol::ServerEreignis;

/// Groesse der Send-Queue pro Verbindung
const SEND_QUEUE_GROESSE: usize = 64;

/// Handle auf die Send-Queue einer lebenden Verbindung
#[derive(Clone, Debug)]
pub struct ClientSender {
    pub verbindung: VerbindungsId,
    pub tx: mpsc::Sender<ServerEreignis>,
}

impl ClientSender {
    /// Sendet ein Event nicht-blockierend an die Verbindung
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    pub fn senden(&self, ereignis: ServerEreignis) -> bool {
        match self.tx.try_send(ereignis) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(verbindung = %self.verbindung, "Send-Queue voll – Event verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(verbindung = %self.verbindung, "Send-Queue geschlossen (Verbindung getrennt)");
                false
            }
        }
    }
}

/// Zentraler Event-Broadcaster fuer alle lebenden Verbindungen
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct EventBroadcaster {
    inner: Arc<EventBroadcasterInner>,
}

struct EventBroadcasterInner {
    /// Send-Queues, indiziert nach VerbindungsId
    clients: DashMap<VerbindungsId, ClientSender>,
}

impl EventBroadcaster {
    /// Erstellt einen neuen EventBroadcaster
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(EventBroadcasterInner {
                clients: DashMap::new(),
            }),
        }
    }

    /// Registriert eine neue Verbindung und gibt ihre Empfangs-Queue zurueck
    ///
    /// Die `ClientConnection` liest aus dieser Queue und sendet via WebSocket.
    pub fn registrieren(&self, verbindung: VerbindungsId) -> mpsc::Receiver<ServerEreignis> {
        let (tx, rx) = mpsc::channel(SEND_QUEUE_GROESSE);
        let sender = ClientSender { verbindung, tx };
        self.inner.clients.insert(verbindung, sender);
        tracing::debug!(verbindung = %verbindung, "Verbindung im Broadcaster registriert");
        rx
    }

    /// Entfernt eine Verbindung aus dem Broadcaster
    pub fn entfernen(&self, verbindung: &VerbindungsId) {
        self.inner.clients.remove(verbindung);
        tracing::debug!(verbindung = %verbindung, "Verbindung aus Broadcaster entfernt");
    }

    /// Sendet ein Event an eine einzelne Verbindung
    ///
    /// Gibt `true` zurueck wenn die Verbindung gefunden und das Event
    /// eingereiht wurde.
    pub fn an_verbindung_senden(&self, verbindung: &VerbindungsId, ereignis: ServerEreignis) -> bool {
        match self.inner.clients.get(verbindung) {
            Some(sender) => sender.senden(ereignis),
            None => {
                tracing::debug!(verbindung = %verbindung, "Senden an unbekannte Verbindung");
                false
            }
        }
    }

    /// Sendet ein Event an eine Auswahl von Verbindungen
    ///
    /// Gibt die Anzahl der erfolgreichen Sendungen zurueck.
    pub fn an_mehrere_senden(&self, empfaenger: &[VerbindungsId], ereignis: ServerEreignis) -> usize {
        let mut gesendet = 0;
        for verbindung in empfaenger {
            if let Some(sender) = self.inner.clients.get(verbindung) {
                if sender.senden(ereignis.clone()) {
                    gesendet += 1;
                }
            }
        }
        gesendet
    }

    /// Sendet ein Event an alle lebenden Verbindungen
    ///
    /// Gibt die Anzahl der erfolgreichen Sendungen zurueck.
    pub fn an_alle_senden(&self, ereignis: ServerEreignis) -> usize {
        let mut gesendet = 0;
        self.inner.clients.iter().for_each(|eintrag| {
            if eintrag.value().senden(ereignis.clone()) {
                gesendet += 1;
            }
        });
        gesendet
    }

    /// Gibt die Anzahl der registrierten Verbindungen zurueck
    pub fn verbindungs_anzahl(&self) -> usize {
        self.inner.clients.len()
    }

    /// Prueft ob eine Verbindung registriert ist
    pub fn ist_registriert(&self, verbindung: &VerbindungsId) -> bool {
        self.inner.clients.contains_key(verbindung)
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::neu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ereignis() -> ServerEreignis {
        ServerEreignis::fehler("test")
    }

    #[tokio::test]
    async fn registrieren_und_senden() {
        let broadcaster = EventBroadcaster::neu();
        let id = VerbindungsId::new();

        let mut rx = broadcaster.registrieren(id);
        assert!(broadcaster.ist_registriert(&id));

        let gesendet = broadcaster.an_verbindung_senden(&id, test_ereignis());
        assert!(gesendet);

        let empfangen = rx.try_recv().expect("Event muss vorhanden sein");
        assert!(matches!(empfangen, ServerEreignis::Error { .. }));
    }

    #[tokio::test]
    async fn an_mehrere_senden_erreicht_nur_auswahl() {
        let broadcaster = EventBroadcaster::neu();
        let a = VerbindungsId::new();
        let b = VerbindungsId::new();
        let c = VerbindungsId::new();

        let mut rx_a = broadcaster.registrieren(a);
        let mut rx_b = broadcaster.registrieren(b);
        let mut rx_c = broadcaster.registrieren(c);

        let gesendet = broadcaster.an_mehrere_senden(&[a, b], test_ereignis());
        assert_eq!(gesendet, 2);

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
        assert!(rx_c.try_recv().is_err(), "c darf nichts empfangen");
    }

    #[tokio::test]
    async fn an_alle_senden() {
        let broadcaster = EventBroadcaster::neu();

        let ids: Vec<VerbindungsId> = (0..5).map(|_| VerbindungsId::new()).collect();
        let mut receivers: Vec<_> = ids
            .iter()
            .map(|id| broadcaster.registrieren(*id))
            .collect();

        let gesendet = broadcaster.an_alle_senden(test_ereignis());
        assert_eq!(gesendet, 5);

        for rx in &mut receivers {
            assert!(rx.try_recv().is_ok());
        }
    }

    #[tokio::test]
    async fn senden_an_unbekannte_verbindung() {
        let broadcaster = EventBroadcaster::neu();
        let id = VerbindungsId::new();

        assert!(!broadcaster.an_verbindung_senden(&id, test_ereignis()));
    }

    #[tokio::test]
    async fn entfernen_stoppt_zustellung() {
        let broadcaster = EventBroadcaster::neu();
        let id = VerbindungsId::new();

        let _rx = broadcaster.registrieren(id);
        broadcaster.entfernen(&id);

        assert!(!broadcaster.ist_registriert(&id));
        assert!(!broadcaster.an_verbindung_senden(&id, test_ereignis()));
    }
}
