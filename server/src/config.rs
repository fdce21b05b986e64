//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist. Umgebungsvariablen (`PORT`, `ALLOWED_ORIGIN`,
//! `LIVEKIT_URL`, `LIVEKIT_API_KEY`, `LIVEKIT_API_SECRET`) ueberschreiben
//! die Datei – die Secrets gehoeren in die Umgebung, nicht ins TOML.

use serde::{Deserialize, Serialize};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Zugang zum verwalteten Konferenz-Dienst
    pub livekit: LivekitEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Videoruf Server".into(),
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer HTTP und WebSocket
    pub bind_adresse: String,
    /// Port fuer HTTP und WebSocket
    pub port: u16,
    /// Erlaubter CORS-Origin ("*" = alle, fuer Entwicklung)
    pub cors_origin: String,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 7000,
            cors_origin: "*".into(),
        }
    }
}

/// Zugang zum verwalteten Konferenz-Dienst
///
/// Ohne vollstaendiges Schluesselmaterial startet der Server trotzdem;
/// der Token-Endpunkt antwortet dann mit einem Server-Fehler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LivekitEinstellungen {
    /// Basis-URL des Dienstes (wird dem Client unveraendert mitgegeben)
    pub url: Option<String>,
    /// API-Key
    pub api_key: Option<String>,
    /// API-Secret
    pub api_secret: Option<String>,
    /// Gueltigkeitsdauer ausgestellter Token in Sekunden
    pub token_ttl_sek: i64,
}

impl Default for LivekitEinstellungen {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            api_secret: None,
            token_ttl_sek: 2 * 60 * 60,
        }
    }
}

impl LivekitEinstellungen {
    /// Gibt URL, Key und Secret zurueck wenn alle drei konfiguriert sind
    pub fn vollstaendig(&self) -> Option<(&str, &str, &str)> {
        match (&self.url, &self.api_key, &self.api_secret) {
            (Some(url), Some(key), Some(secret)) => Some((url, key, secret)),
            _ => None,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht
    /// existiert; anschliessend ueberschreibt die Umgebung.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        let mut config = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => toml::from_str::<Self>(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Self::default()
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
                ))
            }
        };

        config.umgebung_anwenden(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Ueberschreibt Felder aus der Umgebung (Deployment-Oberflaeche)
    ///
    /// `holen` ist injizierbar damit Tests keine Prozess-Umgebung anfassen.
    pub fn umgebung_anwenden<F>(&mut self, holen: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = holen("PORT").and_then(|p| p.parse().ok()) {
            self.netzwerk.port = port;
        }
        if let Some(origin) = holen("ALLOWED_ORIGIN") {
            self.netzwerk.cors_origin = origin;
        }
        if let Some(url) = holen("LIVEKIT_URL") {
            self.livekit.url = Some(url);
        }
        if let Some(key) = holen("LIVEKIT_API_KEY") {
            self.livekit.api_key = Some(key);
        }
        if let Some(secret) = holen("LIVEKIT_API_SECRET") {
            self.livekit.api_secret = Some(secret);
        }
    }

    /// Gibt die vollstaendige Bind-Adresse zurueck
    pub fn bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.port)
    }
}
