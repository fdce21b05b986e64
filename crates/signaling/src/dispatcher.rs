//! Message-Dispatcher – Routet Client-Nachrichten an die richtigen Handler
//!
//! Der Dispatcher empfaengt geparste Nachrichten von einer
//! ClientConnection und ruft den zustaendigen Handler auf. Handler sind
//! fire-and-forget; saemtliche Wirkung laeuft ueber den EventBroadcaster,
//! wodurch die Reihenfolge pro Verbindung erhalten bleibt.
//!
//! ## Zustandsmodell
//! Eine Verbindung ist zunaechst anonym und wird durch einen gueltigen
//! `login` identifiziert; ein zweiter `login` bindet nur den Namen um.
//! Raummitgliedschaft ist davon unabhaengig – `join_room` vor `login`
//! wird toleriert.

use std::sync::Arc;
use videoruf_core::VerbindungsId;
use videoruf_protocol::ClientNachricht;

use crate::handlers::{anruf_handler, auth_handler, raum_handler};
use crate::server_state::SignalingState;

/// Dispatcher-Kontext – Informationen ueber die aktuelle Verbindung
pub struct DispatcherContext {
    /// ID der Verbindung von der die Nachricht stammt
    pub verbindung: VerbindungsId,
}

/// Zentraler Message-Dispatcher
///
/// Routet eingehende Client-Nachrichten an die entsprechenden Handler.
pub struct MessageDispatcher {
    state: Arc<SignalingState>,
}

impl MessageDispatcher {
    /// Erstellt einen neuen Dispatcher
    pub fn neu(state: Arc<SignalingState>) -> Self {
        Self { state }
    }

    /// Verarbeitet eine eingehende Client-Nachricht vollstaendig
    pub fn dispatch(&self, nachricht: ClientNachricht, ctx: &DispatcherContext) {
        let verbindung = ctx.verbindung;

        match nachricht {
            ClientNachricht::Login { name } => {
                auth_handler::handle_login(name, verbindung, &self.state);
            }

            ClientNachricht::JoinRoom { room } => {
                raum_handler::handle_raum_beitritt(room, verbindung, &self.state);
            }

            ClientNachricht::CallUser { to } => {
                anruf_handler::handle_anruf(to, verbindung, &self.state);
            }

            ClientNachricht::CallAccepted { to } => {
                anruf_handler::handle_anruf_angenommen(to, verbindung, &self.state);
            }

            ClientNachricht::Signal { to, signal } => {
                anruf_handler::handle_signal(to, signal, verbindung, &self.state);
            }

            ClientNachricht::RoomChat { room, message } => {
                raum_handler::handle_raum_chat(room, message, verbindung, &self.state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;
    use videoruf_protocol::ServerEreignis;

    struct TestClient {
        id: VerbindungsId,
        rx: mpsc::Receiver<ServerEreignis>,
    }

    impl TestClient {
        fn naechstes(&mut self) -> ServerEreignis {
            self.rx.try_recv().expect("Event muss vorhanden sein")
        }

        fn leer(&mut self) -> bool {
            self.rx.try_recv().is_err()
        }

        fn abraeumen(&mut self) {
            while self.rx.try_recv().is_ok() {}
        }
    }

    fn verbinden(state: &Arc<SignalingState>) -> TestClient {
        let id = VerbindungsId::new();
        state.verzeichnis.verbindung_registrieren(id);
        let rx = state.broadcaster.registrieren(id);
        TestClient { id, rx }
    }

    fn aufbau() -> (Arc<SignalingState>, MessageDispatcher) {
        let state = SignalingState::neu();
        let dispatcher = MessageDispatcher::neu(Arc::clone(&state));
        (state, dispatcher)
    }

    fn ctx(client: &TestClient) -> DispatcherContext {
        DispatcherContext {
            verbindung: client.id,
        }
    }

    fn erwarte_userlist(client: &mut TestClient, erwartet: &[&str]) {
        match client.naechstes() {
            ServerEreignis::Userlist { users } => {
                let erwartet: Vec<String> = erwartet.iter().map(|s| s.to_string()).collect();
                assert_eq!(users, erwartet);
            }
            andere => panic!("Userlist erwartet, war {andere:?}"),
        }
    }

    #[tokio::test]
    async fn login_verteilt_benutzerliste_nach_bestaetigung() {
        let (state, dispatcher) = aufbau();
        let mut a = verbinden(&state);
        let mut b = verbinden(&state);

        dispatcher.dispatch(
            ClientNachricht::Login {
                name: "alice".into(),
            },
            &ctx(&a),
        );

        // Der Absender sieht zuerst die Bestaetigung, dann die Liste
        assert!(matches!(
            a.naechstes(),
            ServerEreignis::Login { success: true }
        ));
        erwarte_userlist(&mut a, &["alice"]);
        erwarte_userlist(&mut b, &["alice"]);

        dispatcher.dispatch(
            ClientNachricht::Login { name: "bob".into() },
            &ctx(&b),
        );

        assert!(matches!(
            b.naechstes(),
            ServerEreignis::Login { success: true }
        ));
        erwarte_userlist(&mut a, &["alice", "bob"]);
        erwarte_userlist(&mut b, &["alice", "bob"]);
    }

    #[tokio::test]
    async fn login_ohne_namen_gibt_fehler_nur_an_absender() {
        let (state, dispatcher) = aufbau();
        let mut a = verbinden(&state);
        let mut b = verbinden(&state);

        dispatcher.dispatch(ClientNachricht::Login { name: "".into() }, &ctx(&a));

        assert!(matches!(a.naechstes(), ServerEreignis::Error { .. }));
        assert!(a.leer());
        assert!(b.leer(), "Unbeteiligte duerfen nichts sehen");
    }

    #[tokio::test]
    async fn anruf_ablauf_zwischen_zwei_clients() {
        let (state, dispatcher) = aufbau();
        let mut a = verbinden(&state);
        let mut b = verbinden(&state);

        dispatcher.dispatch(
            ClientNachricht::Login {
                name: "alice".into(),
            },
            &ctx(&a),
        );
        dispatcher.dispatch(
            ClientNachricht::Login { name: "bob".into() },
            &ctx(&b),
        );

        // Login-Events abraeumen
        a.abraeumen();
        b.abraeumen();

        // A ruft B per Anzeigename an
        dispatcher.dispatch(ClientNachricht::CallUser { to: "bob".into() }, &ctx(&a));
        match b.naechstes() {
            ServerEreignis::IncomingCall { from, name } => {
                assert_eq!(from, a.id);
                assert_eq!(name.as_deref(), Some("alice"));
            }
            andere => panic!("IncomingCall erwartet, war {andere:?}"),
        }

        // B nimmt an, adressiert per Verbindungs-ID
        dispatcher.dispatch(
            ClientNachricht::CallAccepted { to: Some(a.id) },
            &ctx(&b),
        );
        match a.naechstes() {
            ServerEreignis::CallAccepted { from } => assert_eq!(from, b.id),
            andere => panic!("CallAccepted erwartet, war {andere:?}"),
        }

        // A schickt ein Offer; das Payload muss unveraendert ankommen
        let payload = json!({"type": "offer", "sdp": "v=0\r\no=- 42 2 IN IP4 127.0.0.1"});
        dispatcher.dispatch(
            ClientNachricht::Signal {
                to: Some(b.id),
                signal: payload.clone(),
            },
            &ctx(&a),
        );
        match b.naechstes() {
            ServerEreignis::SignalReceived { from, signal } => {
                assert_eq!(from, a.id);
                assert_eq!(signal, payload);
            }
            andere => panic!("SignalReceived erwartet, war {andere:?}"),
        }
    }

    #[tokio::test]
    async fn anruf_an_unbekannten_namen() {
        let (state, dispatcher) = aufbau();
        let mut a = verbinden(&state);
        let mut b = verbinden(&state);

        dispatcher.dispatch(
            ClientNachricht::CallUser {
                to: "niemand".into(),
            },
            &ctx(&a),
        );

        assert!(matches!(a.naechstes(), ServerEreignis::Error { .. }));
        assert!(b.leer(), "Nirgendwo darf ein incoming_call ankommen");
    }

    #[tokio::test]
    async fn umbindung_routet_zum_neuen_client() {
        let (state, dispatcher) = aufbau();
        let mut alt = verbinden(&state);
        let mut neu = verbinden(&state);
        let anrufer = verbinden(&state);

        dispatcher.dispatch(
            ClientNachricht::Login {
                name: "alice".into(),
            },
            &ctx(&alt),
        );
        dispatcher.dispatch(
            ClientNachricht::Login {
                name: "alice".into(),
            },
            &ctx(&neu),
        );

        alt.abraeumen();
        neu.abraeumen();

        dispatcher.dispatch(
            ClientNachricht::CallUser { to: "alice".into() },
            &ctx(&anrufer),
        );

        assert!(
            matches!(neu.naechstes(), ServerEreignis::IncomingCall { .. }),
            "Anruf muss bei der neuen Bindung ankommen"
        );
        assert!(alt.leer(), "Die verdraengte Verbindung bleibt stumm");
    }

    #[tokio::test]
    async fn raum_beitritt_meldet_nur_den_uebrigen() {
        let (state, dispatcher) = aufbau();
        let mut a = verbinden(&state);
        let mut b = verbinden(&state);

        dispatcher.dispatch(
            ClientNachricht::Login {
                name: "alice".into(),
            },
            &ctx(&a),
        );
        a.abraeumen();
        b.abraeumen();

        dispatcher.dispatch(
            ClientNachricht::JoinRoom {
                room: "sala1".into(),
            },
            &ctx(&a),
        );
        assert!(a.leer(), "Der Beitretende erhaelt kein new_user");

        dispatcher.dispatch(
            ClientNachricht::JoinRoom {
                room: "sala1".into(),
            },
            &ctx(&b),
        );
        match a.naechstes() {
            ServerEreignis::NewUser { id, name } => {
                assert_eq!(id, b.id);
                // B ist noch anonym: join_room vor login ist toleriert
                assert_eq!(name, None);
            }
            andere => panic!("NewUser erwartet, war {andere:?}"),
        }
        assert!(b.leer());
    }

    #[tokio::test]
    async fn raum_chat_erreicht_alle_mitglieder_inklusive_absender() {
        let (state, dispatcher) = aufbau();
        let mut a = verbinden(&state);
        let mut b = verbinden(&state);
        let mut draussen = verbinden(&state);

        dispatcher.dispatch(
            ClientNachricht::Login {
                name: "alice".into(),
            },
            &ctx(&a),
        );
        a.abraeumen();
        b.abraeumen();
        draussen.abraeumen();

        dispatcher.dispatch(
            ClientNachricht::JoinRoom {
                room: "sala1".into(),
            },
            &ctx(&a),
        );
        dispatcher.dispatch(
            ClientNachricht::JoinRoom {
                room: "sala1".into(),
            },
            &ctx(&b),
        );
        a.abraeumen();

        dispatcher.dispatch(
            ClientNachricht::RoomChat {
                room: "sala1".into(),
                message: "hola".into(),
            },
            &ctx(&a),
        );

        for client in [&mut a, &mut b] {
            match client.naechstes() {
                ServerEreignis::RoomChat { from, message } => {
                    assert_eq!(from.as_deref(), Some("alice"));
                    assert_eq!(message, "hola");
                }
                andere => panic!("RoomChat erwartet, war {andere:?}"),
            }
        }
        assert!(draussen.leer(), "Nicht-Mitglieder bleiben aussen vor");
    }

    #[tokio::test]
    async fn stille_verwerfer_liefern_keine_fehler() {
        let (state, dispatcher) = aufbau();
        let mut a = verbinden(&state);

        // join_room, call_accepted, signal und room_chat ohne Ziel/Raum
        // werden still verworfen – kein error-Event an den Absender
        dispatcher.dispatch(ClientNachricht::JoinRoom { room: "".into() }, &ctx(&a));
        dispatcher.dispatch(ClientNachricht::CallAccepted { to: None }, &ctx(&a));
        dispatcher.dispatch(
            ClientNachricht::Signal {
                to: None,
                signal: json!({"type": "offer"}),
            },
            &ctx(&a),
        );
        dispatcher.dispatch(
            ClientNachricht::RoomChat {
                room: "".into(),
                message: "hola".into(),
            },
            &ctx(&a),
        );

        assert!(a.leer());
    }
}
