//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist. Die Umgebungsvariablen `SWITCHBOARD_PORT`/`PORT` und
//! `SWITCHBOARD_HOST`/`HOST` ueberstimmen die Datei.

use serde::{Deserialize, Serialize};
use switchboard_core::{Result, SwitchboardError};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
    /// Maximale Anzahl gleichzeitiger Clients
    pub max_clients: u32,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Switchboard".into(),
            max_clients: 512,
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
    /// Erlaubte CORS-Origins fuer HTTP (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec![],
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
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> Result<Self> {
        let mut config: Self = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => toml::from_str(&inhalt).map_err(|e| {
                SwitchboardError::konfiguration(format!("'{pfad}' nicht parsebar: {e}"))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };
        config.umgebung_anwenden();
        Ok(config)
    }

    /// Wendet die Umgebungsvariablen-Overrides an.
    ///
    /// `SWITCHBOARD_PORT` geht vor `PORT`, `SWITCHBOARD_HOST` vor `HOST`.
    fn umgebung_anwenden(&mut self) {
        if let Some(roh) = env_wert("SWITCHBOARD_PORT", "PORT") {
            match roh.parse() {
                Ok(port) => self.netzwerk.port = port,
                Err(_) => {
                    tracing::warn!(wert = %roh, "Ungueltiger Port in der Umgebung, ignoriert")
                }
            }
        }
        if let Some(host) = env_wert("SWITCHBOARD_HOST", "HOST") {
            self.netzwerk.bind_adresse = host;
        }
    }

    /// Gibt die vollstaendige Bind-Adresse zurueck
    pub fn bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.port)
    }
}

/// Liest die erste gesetzte der beiden Umgebungsvariablen
fn env_wert(primaer: &str, sekundaer: &str) -> Option<String> {
    std::env::var(primaer)
        .or_else(|_| std::env::var(sekundaer))
        .ok()
}
