//! Kommando-Klassifikation
//!
//! Hebt geparste Frames auf die typisierte Ebene: bekannte Kommandos
//! bekommen ihre dekodierten Payloads, alles andere faellt als
//! `Unbekannt` durch und wird vom Router an den Raum weitergereicht.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use switchboard_core::PeerId;

use crate::frame::Frame;

// ---------------------------------------------------------------------------
// Announce-Payload
// ---------------------------------------------------------------------------

/// Payload des `announce`-Kommandos
///
/// Kommt als zweites Positionsargument ueber die Leitung:
/// `/announce|<ignoriert>|{"id":...,"room":...}`. Das erste Argument ist
/// historisch bedingt und wird nicht ausgewertet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnounceDaten {
    /// Selbstgewaehlte Kennung des Peers (String oder Zahl)
    pub id: PeerId,
    /// Zielraum; fehlt er oder ist er leer, wird nur die Kennung gesetzt
    #[serde(default)]
    pub room: Option<String>,
}

// ---------------------------------------------------------------------------
// Kommando
// ---------------------------------------------------------------------------

/// Typisierte Sicht auf einen Kommando-Frame
#[derive(Debug, Clone, PartialEq)]
pub enum Kommando {
    /// Kennung anmelden und optional einem Raum beitreten
    ///
    /// `daten` ist `None` wenn das Payload-Argument fehlt oder sich nicht
    /// dekodieren laesst. Das Kommando bleibt trotzdem erkannt und wird
    /// nie als Broadcast behandelt.
    Announce { daten: Option<AnnounceDaten> },

    /// Aktuellen Raum verlassen
    Leave,

    /// Frame gezielt an ein Raummitglied zustellen
    ///
    /// `ziel` ist `None` wenn das erste Argument fehlt oder weder String
    /// noch Zahl ist; die Zustellung laeuft dann als Routing-Miss aus.
    To { ziel: Option<PeerId> },

    /// Unbekanntes Kommando; der rohe Frame geht als Broadcast an den Raum
    Unbekannt { name: String },
}

impl Kommando {
    /// Klassifiziert einen geparsten Frame; `None` fuer opake Daten
    pub fn aus_frame(frame: &Frame) -> Option<Kommando> {
        match frame {
            Frame::Daten => None,
            Frame::Befehl { name, argumente } => Some(match name.as_str() {
                "announce" => Kommando::Announce {
                    daten: argumente.get(1).cloned().and_then(announce_daten),
                },
                "leave" => Kommando::Leave,
                "to" => Kommando::To {
                    ziel: argumente.first().and_then(peer_id_aus_wert),
                },
                _ => Kommando::Unbekannt { name: name.clone() },
            }),
        }
    }
}

/// Dekodiert das Announce-Payload-Objekt, `None` bei Formfehlern
///
/// Ein leerer Raumname wird zu "kein Raumname" normalisiert: der Peer
/// meldet dann nur seine Kennung an und bleibt raumlos.
fn announce_daten(wert: Value) -> Option<AnnounceDaten> {
    let mut daten: AnnounceDaten = serde_json::from_value(wert).ok()?;
    if daten.room.as_deref() == Some("") {
        daten.room = None;
    }
    Some(daten)
}

/// Liest eine Peer-Kennung aus einem Argumentwert
///
/// Nur Strings und Zahlen sind gueltige Kennungen; andere JSON-Werte
/// koennen nie einem Mitglied entsprechen.
fn peer_id_aus_wert(wert: &Value) -> Option<PeerId> {
    match wert {
        Value::String(s) => Some(PeerId::Text(s.clone())),
        Value::Number(n) => Some(PeerId::Zahl(n.clone())),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
