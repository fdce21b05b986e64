//! Benutzer-Verzeichnis – Verwaltet Verbindungen und Namensbindungen
//!
//! Wer ist verbunden, welcher Anzeigename gehoert zu welcher Verbindung?
//! Das Verzeichnis haelt den ephemeren Zustand aller lebenden Verbindungen
//! und die Abbildung Name -> Verbindung fuer das Anruf-Routing.
//!
//! ## Invarianten
//! - Pro Anzeigename hoechstens eine Verbindung; ein spaeterer `login` mit
//!   demselben Namen verdraengt die fruehere Bindung still (last writer wins)
//! - Jeder Verzeichniseintrag zeigt auf eine lebende Verbindung; beim
//!   Trennen wird nur der Eintrag entfernt der noch auf diese Verbindung
//!   zeigt (eine verdraengte Bindung darf ihren Verdraenger nicht abbauen)

use dashmap::DashMap;
use std::sync::Arc;
use videoruf_core::VerbindungsId;

use crate::error::{SignalingError, SignalingResult};

/// Verwaltet alle lebenden Verbindungen und ihre Namensbindungen
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct BenutzerVerzeichnis {
    inner: Arc<BenutzerVerzeichnisInner>,
}

struct BenutzerVerzeichnisInner {
    /// Alle lebenden Verbindungen mit ihrem optional gebundenen Namen
    verbindungen: DashMap<VerbindungsId, Option<String>>,
    /// Anzeigename -> Verbindung (Routing-Tabelle fuer `call_user`)
    namen: DashMap<String, VerbindungsId>,
}

impl BenutzerVerzeichnis {
    /// Erstellt ein neues, leeres Verzeichnis
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(BenutzerVerzeichnisInner {
                verbindungen: DashMap::new(),
                namen: DashMap::new(),
            }),
        }
    }

    /// Registriert eine neue lebende Verbindung ohne gebundenen Namen
    pub fn verbindung_registrieren(&self, id: VerbindungsId) {
        self.inner.verbindungen.insert(id, None);
        tracing::debug!(verbindung = %id, "Verbindung registriert");
    }

    /// Bindet einen Anzeigenamen an eine Verbindung
    ///
    /// Ein bestehender Eintrag fuer denselben Namen wird still verdraengt.
    /// Bindet die Verbindung zu einem neuen Namen um, wird ihr alter
    /// Eintrag freigegeben sofern er noch auf sie zeigt.
    pub fn name_binden(&self, id: VerbindungsId, name: &str) -> SignalingResult<()> {
        if name.is_empty() {
            return Err(SignalingError::LeererName);
        }

        let alter_name = match self.inner.verbindungen.get_mut(&id) {
            Some(mut eintrag) => eintrag.replace(name.to_string()),
            None => {
                tracing::warn!(verbindung = %id, "Namensbindung fuer unbekannte Verbindung");
                return Ok(());
            }
        };

        if let Some(alter_name) = alter_name {
            if alter_name != name {
                self.inner
                    .namen
                    .remove_if(&alter_name, |_, inhaber| *inhaber == id);
            }
        }

        self.inner.namen.insert(name.to_string(), id);
        tracing::info!(verbindung = %id, name = name, "Name gebunden");
        Ok(())
    }

    /// Loest einen Anzeigenamen zur gebundenen Verbindung auf
    pub fn aufloesen(&self, name: &str) -> Option<VerbindungsId> {
        self.inner.namen.get(name).map(|eintrag| *eintrag)
    }

    /// Gibt den gebundenen Namen einer Verbindung zurueck
    pub fn name_von(&self, id: &VerbindungsId) -> Option<String> {
        self.inner.verbindungen.get(id)?.clone()
    }

    /// Entfernt eine Verbindung samt ihrer Namensbindung
    ///
    /// Idempotent: das Entfernen einer unbekannten Verbindung ist ein No-op.
    /// Gibt `true` zurueck wenn dabei eine Namensbindung geloest wurde
    /// (der Aufrufer muss dann die Benutzerliste neu verteilen).
    pub fn verbindung_entfernen(&self, id: &VerbindungsId) -> bool {
        let Some((_, name)) = self.inner.verbindungen.remove(id) else {
            return false;
        };

        match name {
            Some(name) => {
                let entfernt = self
                    .inner
                    .namen
                    .remove_if(&name, |_, inhaber| inhaber == id)
                    .is_some();
                tracing::info!(verbindung = %id, name = %name, "Verbindung entfernt");
                entfernt
            }
            None => {
                tracing::debug!(verbindung = %id, "Anonyme Verbindung entfernt");
                false
            }
        }
    }

    /// Gibt alle gebundenen Anzeigenamen sortiert zurueck
    pub fn alle_namen(&self) -> Vec<String> {
        let mut namen: Vec<String> = self
            .inner
            .namen
            .iter()
            .map(|eintrag| eintrag.key().clone())
            .collect();
        namen.sort();
        namen
    }

    /// Gibt die Anzahl der lebenden Verbindungen zurueck
    pub fn verbindungs_anzahl(&self) -> usize {
        self.inner.verbindungen.len()
    }
}

impl Default for BenutzerVerzeichnis {
    fn default() -> Self {
        Self::neu()
    }
}
