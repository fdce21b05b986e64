//! videoruf-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen
//! Einstiegspunkt fuer Integrationstests bereit.

pub mod api;
pub mod config;

use std::sync::Arc;

use anyhow::Result;
use axum::extract::FromRef;
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use videoruf_signaling::{ws_handler, SignalingState};

use config::ServerConfig;

/// Axum-State des Servers
///
/// Der Relay-Zustand wird hier konstruiert und explizit in die Handler
/// injiziert; es gibt keinen globalen Zustand.
#[derive(Clone, FromRef)]
pub struct AppZustand {
    pub signaling: Arc<SignalingState>,
    pub config: Arc<ServerConfig>,
}

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Baut den Axum-Router mit allen Endpunkten und Layern
    pub fn router(config: Arc<ServerConfig>, signaling: Arc<SignalingState>) -> Router {
        let cors = cors_layer(&config.netzwerk.cors_origin);
        let zustand = AppZustand { signaling, config };

        Router::new()
            .route("/", get(api::health))
            .route(
                "/livekit-token",
                get(api::token_hinweis).post(api::token_ausstellen),
            )
            .route("/ws", get(ws_handler))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(zustand)
    }

    /// Startet den Server und laeuft bis zum Shutdown-Signal
    ///
    /// Einziger prozess-fataler Fehlerpfad: der Port laesst sich nicht
    /// binden. Alles danach ist verbindungs- bzw. anfragelokal.
    pub async fn starten(self) -> Result<()> {
        let config = Arc::new(self.config);
        let signaling = SignalingState::neu();

        let bind_adresse = config.bind_adresse();
        let app = Self::router(Arc::clone(&config), signaling);

        let listener = tokio::net::TcpListener::bind(&bind_adresse).await?;
        tracing::info!(
            server_name = %config.server.name,
            adresse = %bind_adresse,
            "Server gestartet – Signaling: GET /ws, Token: POST /livekit-token"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server beendet");
        Ok(())
    }
}

/// CORS konfigurieren: entweder ein spezifischer Origin oder Any
fn cors_layer(cors_origin: &str) -> CorsLayer {
    match cors_origin {
        "*" | "" => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
        origin => match origin.parse::<HeaderValue>() {
            Ok(origin) => CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
            Err(_) => {
                tracing::warn!(origin = origin, "Ungueltiger CORS-Origin, erlaube alle");
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET, Method::POST])
                    .allow_headers([header::CONTENT_TYPE])
            }
        },
    }
}

/// Wartet auf Ctrl-C / SIGTERM
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(fehler = %e, "Shutdown-Signal nicht verfuegbar");
    }
    tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
}
