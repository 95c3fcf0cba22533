//! Lebenszyklus-Ereignisse des Switchboards
//!
//! Geschlossener Ereignis-Enum statt stringbasierter Event-Namen:
//! Tippfehler in Ereignisnamen fallen damit zur Compilezeit auf.
//! Die Zustellung an Beobachter erfolgt im Relay-Crate ueber einen
//! tokio-Broadcast-Kanal.

use crate::types::{PeerId, SessionId};
use serde::{Deserialize, Serialize};

/// Alle Ereignisse die das Switchboard an Beobachter meldet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SwitchboardEvent {
    // --- Peer-Ereignisse ---
    /// Eine neue Transportverbindung wurde angenommen
    PeerVerbunden { session_id: SessionId },

    /// Ein Peer hat seinen Raum verlassen (explizit per `/leave` oder
    /// implizit durch Raumwechsel bzw. Verbindungsabbruch)
    PeerGetrennt {
        session_id: SessionId,
        peer_id: Option<PeerId>,
    },

    // --- Raum-Ereignisse ---
    /// Ein Raum wurde beim ersten Beitritt angelegt
    RaumErstellt { name: String },

    /// Der letzte Peer hat den Raum verlassen
    RaumZerstoert { name: String },

    // --- Daten-Beobachtung ---
    /// Ein eingehender Frame, unveraendert wie empfangen
    ///
    /// Wird fuer jeden eingehenden Frame gemeldet, egal ob Kommando oder
    /// opake Daten. Beobachter (Logging, Metriken) nehmen damit am
    /// Routing nicht teil.
    Daten {
        frame: String,
        peer_id: Option<PeerId>,
        session_id: SessionId,
    },
}
