//! Gemeinsame Identifikationstypen fuer Switchboard
//!
//! SessionId verwendet das Newtype-Pattern um Verwechslungen mit anderen
//! UUIDs zur Compilezeit auszuschliessen. PeerId ist bewusst kein Newtype
//! um eine UUID: Peers melden ihre Kennung selbst an und duerfen dafuer
//! Strings oder Zahlen verwenden.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige Session-ID einer Transportverbindung
///
/// Wird beim Verbinden vergeben und bleibt fuer die Lebensdauer der
/// Verbindung stabil, unabhaengig davon welche Kennung der Peer spaeter
/// per Announce anmeldet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Erstellt eine neue zufaellige SessionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// Vom Peer selbst angemeldete Kennung
///
/// Kommt im Announce-Payload ueber die Leitung und darf laut Protokoll ein
/// String oder eine Zahl sein. Vor dem ersten Announce hat eine Session
/// keine Kennung. Strings und Zahlen sind strikt verschieden (die Kennung
/// `"42"` und die Kennung `42` bezeichnen verschiedene Peers); Zahlen
/// untereinander vergleichen nach Wert, `42` und `42.0` sind dieselbe
/// Kennung.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeerId {
    Text(String),
    Zahl(serde_json::Number),
}

// PartialEq von Hand: serde_json unterscheidet Ganzzahl- und
// Gleitkomma-Repraesentation, auf der Leitung ist beides dieselbe Zahl
impl PartialEq for PeerId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PeerId::Text(a), PeerId::Text(b)) => a == b,
            (PeerId::Zahl(a), PeerId::Zahl(b)) => zahlen_gleich(a, b),
            _ => false,
        }
    }
}

/// Vergleicht zwei JSON-Zahlen nach ihrem numerischen Wert
fn zahlen_gleich(a: &serde_json::Number, b: &serde_json::Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y)
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerId::Text(s) => write!(f, "{}", s),
            PeerId::Zahl(n) => write!(f, "{}", n),
        }
    }
}
