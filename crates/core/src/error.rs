//! Fehlertypen fuer Switchboard
//!
//! Das Routing selbst kennt keine fatalen Fehler: Fehlzustellungen,
//! unbekannte Kommandos und kaputte Argumente degradieren still statt die
//! Session zu beenden. Typisierte Fehler entstehen deshalb nur am Rand,
//! beim Laden der Konfiguration und beim Oeffnen des Listeners.

use thiserror::Error;

/// Globaler Result-Alias fuer Switchboard
pub type Result<T> = std::result::Result<T, SwitchboardError>;

/// Alle moeglichen Fehler im Switchboard-System
#[derive(Debug, Error)]
pub enum SwitchboardError {
    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    // --- Ein-/Ausgabe ---
    #[error("E/A-Fehler: {0}")]
    Io(#[from] std::io::Error),
}

impl SwitchboardError {
    /// Erstellt einen Konfigurationsfehler aus einer beliebigen Nachricht
    pub fn konfiguration(msg: impl Into<String>) -> Self {
        Self::Konfiguration(msg.into())
    }
}
