//! Raum-Verwaltung – Verwaltet Raumzugehoerigkeit
//!
//! Raeume sind benannte Mengen von Verbindungen. Ein Raum entsteht implizit
//! beim ersten Beitritt und verschwindet implizit wenn das letzte Mitglied
//! ihn verlaesst. Der Raumname ist ein opaker, vom Client gelieferter
//! Gruppierungsschluessel; ausser der Nicht-Leere wird nichts geprueft.
//!
//! ## Invarianten
//! - Mengen-Semantik: eine Verbindung ist pro Raum hoechstens einmal Mitglied
//! - Eine Verbindung kann gleichzeitig in beliebig vielen Raeumen sein

use dashmap::DashMap;
use std::sync::Arc;
use videoruf_core::VerbindungsId;

use crate::error::{SignalingError, SignalingResult};

/// Verwaltet die Raumzugehoerigkeit aller Verbindungen
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct RaumVerwaltung {
    inner: Arc<RaumVerwaltungInner>,
}

struct RaumVerwaltungInner {
    /// Raumname -> Mitglieder (Beitrittsreihenfolge, ohne Duplikate)
    raeume: DashMap<String, Vec<VerbindungsId>>,
}

impl RaumVerwaltung {
    /// Erstellt eine neue, leere Raumverwaltung
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(RaumVerwaltungInner {
                raeume: DashMap::new(),
            }),
        }
    }

    /// Fuegt eine Verbindung einem Raum hinzu (implizite Raum-Erstellung)
    ///
    /// Idempotent: ein erneuter Beitritt zum selben Raum aendert nichts.
    pub fn beitreten(&self, id: VerbindungsId, raum: &str) -> SignalingResult<()> {
        if raum.is_empty() {
            return Err(SignalingError::LeererRaumName);
        }

        let mut mitglieder = self.inner.raeume.entry(raum.to_string()).or_default();
        if !mitglieder.contains(&id) {
            mitglieder.push(id);
            tracing::debug!(verbindung = %id, raum = raum, "Raum beigetreten");
        }
        Ok(())
    }

    /// Gibt alle Mitglieder eines Raums zurueck (leer wenn unbekannt)
    pub fn mitglieder(&self, raum: &str) -> Vec<VerbindungsId> {
        self.inner
            .raeume
            .get(raum)
            .map(|mitglieder| mitglieder.clone())
            .unwrap_or_default()
    }

    /// Prueft ob eine Verbindung Mitglied eines Raums ist
    pub fn ist_mitglied(&self, id: &VerbindungsId, raum: &str) -> bool {
        self.inner
            .raeume
            .get(raum)
            .is_some_and(|mitglieder| mitglieder.contains(id))
    }

    /// Entfernt eine Verbindung aus allen Raeumen (beim Trennen)
    ///
    /// Leere Raeume werden dabei aufgeraeumt.
    pub fn verbindung_entfernen(&self, id: &VerbindungsId) {
        self.inner.raeume.iter_mut().for_each(|mut eintrag| {
            eintrag.value_mut().retain(|mitglied| mitglied != id);
        });
        self.inner
            .raeume
            .retain(|_, mitglieder| !mitglieder.is_empty());
    }

    /// Gibt die Anzahl existierender Raeume zurueck
    pub fn raum_anzahl(&self) -> usize {
        self.inner.raeume.len()
    }
}

impl Default for RaumVerwaltung {
    fn default() -> Self {
        Self::neu()
    }
}
