//! Zugangstoken-Builder
//!
//! Baut HS256-JWTs in der Form die der verwaltete Konferenz-Dienst erwartet:
//! `iss` = API-Key, `sub` = Identitaet, Berechtigungen als camelCase-Felder
//! unter dem `video`-Claim.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Standard-Gueltigkeitsdauer eines Tokens
const STANDARD_TTL_SEK: i64 = 2 * 60 * 60;

/// Raum-Berechtigungen unter dem `video`-Claim
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrants {
    /// Darf dem Raum beitreten
    pub room_join: bool,
    /// Raumname auf den das Token beschraenkt ist
    pub room: String,
    /// Darf Audio/Video publizieren
    pub can_publish: bool,
    /// Darf Streams abonnieren
    pub can_subscribe: bool,
    /// Darf Daten-Nachrichten publizieren
    pub can_publish_data: bool,
}

impl VideoGrants {
    /// Vollzugriff auf einen Raum (Beitritt, Publish, Subscribe, Daten)
    pub fn vollzugriff(room: impl Into<String>) -> Self {
        Self {
            room_join: true,
            room: room.into(),
            can_publish: true,
            can_subscribe: true,
            can_publish_data: true,
        }
    }
}

/// JWT-Claims eines Zugangstokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// API-Key des Ausstellers
    pub iss: String,
    /// Identitaet des Teilnehmers
    pub sub: String,
    /// Gueltig ab (Unix-Timestamp)
    pub nbf: i64,
    /// Ablaufzeitpunkt (Unix-Timestamp)
    pub exp: i64,
    /// Raum-Berechtigungen
    pub video: VideoGrants,
}

/// Builder fuer Zugangstoken
///
/// ```
/// use videoruf_token::{VideoGrants, Zugangstoken};
///
/// let jwt = Zugangstoken::neu("api-key", "api-secret")
///     .fuer_identitaet("juan")
///     .mit_grants(VideoGrants::vollzugriff("sala-prueba"))
///     .als_jwt()
///     .unwrap();
/// assert!(!jwt.is_empty());
/// ```
pub struct Zugangstoken {
    api_key: String,
    api_secret: String,
    identitaet: Option<String>,
    ttl: Duration,
    grants: VideoGrants,
}

impl Zugangstoken {
    /// Erstellt einen neuen Builder mit Schluesselmaterial
    pub fn neu(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            identitaet: None,
            ttl: Duration::seconds(STANDARD_TTL_SEK),
            grants: VideoGrants::default(),
        }
    }

    /// Setzt die Identitaet des Teilnehmers
    pub fn fuer_identitaet(mut self, identitaet: impl Into<String>) -> Self {
        self.identitaet = Some(identitaet.into());
        self
    }

    /// Setzt die Gueltigkeitsdauer (Standard: 2 Stunden)
    pub fn mit_ttl_sek(mut self, ttl_sek: i64) -> Self {
        self.ttl = Duration::seconds(ttl_sek);
        self
    }

    /// Setzt die Raum-Berechtigungen
    pub fn mit_grants(mut self, grants: VideoGrants) -> Self {
        self.grants = grants;
        self
    }

    /// Stellt das signierte JWT aus
    pub fn als_jwt(self) -> Result<String, TokenError> {
        let identitaet = self.identitaet.ok_or(TokenError::FehlendeIdentitaet)?;

        let jetzt = Utc::now();
        let claims = TokenClaims {
            iss: self.api_key,
            sub: identitaet,
            nbf: jetzt.timestamp(),
            exp: (jetzt + self.ttl).timestamp(),
            video: self.grants,
        };

        let key = EncodingKey::from_secret(self.api_secret.as_bytes());
        Ok(encode(&Header::default(), &claims, &key)?)
    }
}
