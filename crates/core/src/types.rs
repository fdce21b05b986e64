//! Gemeinsame Identifikationstypen fuer Videoruf
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige Verbindungs-ID
///
/// Wird beim Akzeptieren einer Verbindung vergeben und nie wiederverwendet.
/// Eine Verbindung die sich neu verbindet erhaelt eine frische ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerbindungsId(pub Uuid);

impl VerbindungsId {
    /// Erstellt eine neue zufaellige VerbindungsId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for VerbindungsId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VerbindungsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "verbindung:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbindungs_id_eindeutig() {
        let a = VerbindungsId::new();
        let b = VerbindungsId::new();
        assert_ne!(a, b, "Zwei neue VerbindungsIds muessen verschieden sein");
    }

    #[test]
    fn verbindungs_id_display() {
        let id = VerbindungsId(Uuid::nil());
        assert!(id.to_string().starts_with("verbindung:"));
    }

    #[test]
    fn ids_sind_serde_kompatibel() {
        let id = VerbindungsId::new();
        let json = serde_json::to_string(&id).unwrap();
        let id2: VerbindungsId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, id2);
    }
}
