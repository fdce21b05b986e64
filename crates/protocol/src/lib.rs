//! videoruf-protocol – Netzwerkprotokoll-Definitionen
//!
//! Dieses Crate definiert alle Nachrichtentypen die zwischen Client und
//! Relay ausgetauscht werden.

pub mod nachrichten;

pub use nachrichten::{ClientNachricht, ServerEreignis};
