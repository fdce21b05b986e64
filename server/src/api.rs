//! REST-Handler – Health-Check und Token-Endpunkt
//!
//! Der Token-Endpunkt stellt kurzlebige Zugangstoken fuer den verwalteten
//! Konferenz-Dienst aus. Fehlendes Schluesselmaterial ist ein Server-Fehler
//! der einzelnen Anfrage, nie ein Prozessabbruch; interne Fehlerdetails
//! verlassen den Server nicht.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use videoruf_token::{VideoGrants, Zugangstoken};

use crate::config::ServerConfig;

/// Anfrage an den Token-Endpunkt
///
/// Fehlende Felder deserialisieren zu leeren Strings und werden vom
/// Handler als Client-Fehler gemeldet.
#[derive(Debug, Deserialize)]
pub struct TokenAnfrage {
    #[serde(default, rename = "roomId")]
    pub room_id: String,
    #[serde(default)]
    pub identity: String,
}

/// GET / – Health-Check-Endpunkt
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "message": "Server is running",
            "endpoints": {
                "livekitTokenPOST": "/livekit-token",
            },
        })),
    )
}

/// GET /livekit-token – Hinweis fuer Browser-Aufrufe
pub async fn token_hinweis() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": "Use POST with JSON",
            "example": {
                "method": "POST",
                "url": "http://localhost:7000/livekit-token",
                "body": { "roomId": "sala-prueba", "identity": "juan" },
            },
        })),
    )
}

/// POST /livekit-token – Stellt ein Zugangstoken aus
pub async fn token_ausstellen(
    State(config): State<Arc<ServerConfig>>,
    Json(anfrage): Json<TokenAnfrage>,
) -> (StatusCode, Json<Value>) {
    if anfrage.room_id.is_empty() || anfrage.identity.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "roomId and identity are required" })),
        );
    }

    let Some((url, api_key, api_secret)) = config.livekit.vollstaendig() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Missing configuration: LIVEKIT_URL, LIVEKIT_API_KEY, LIVEKIT_API_SECRET",
            })),
        );
    };

    let ergebnis = Zugangstoken::neu(api_key, api_secret)
        .fuer_identitaet(&anfrage.identity)
        .mit_ttl_sek(config.livekit.token_ttl_sek)
        .mit_grants(VideoGrants::vollzugriff(&anfrage.room_id))
        .als_jwt();

    match ergebnis {
        Ok(token) => (
            StatusCode::OK,
            Json(json!({ "token": token, "url": url })),
        ),
        Err(e) => {
            tracing::error!(fehler = %e, "Token-Ausstellung fehlgeschlagen");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Could not generate token" })),
            )
        }
    }
}
