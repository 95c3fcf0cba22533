//! Peer-Session – Zustand und oeffentliches Handle einer Verbindung
//!
//! Eine Session entsteht mit der Transportverbindung und traegt hoechstens
//! eine Raum-Mitgliedschaft. Das `Peer`-Handle ist die Schnittstelle fuer
//! die Transportschicht: rohe Frames hinein, Lebenszyklus-Aufrufe beim
//! Verbindungsabbau.

use switchboard_core::{PeerId, SessionId};

use crate::board::Switchboard;

// ---------------------------------------------------------------------------
// PeerZustand
// ---------------------------------------------------------------------------

/// Registrierter Zustand einer Session
///
/// `raum` ist bewusst nur der Raumname, kein besitzendes Handle: ein Peer
/// darf einen Raum nicht am Leben halten nachdem alle Mitglieder weg sind.
#[derive(Debug, Clone, Default)]
pub(crate) struct PeerZustand {
    /// Per Announce angemeldete Kennung; vor dem ersten Announce leer
    pub kennung: Option<PeerId>,
    /// Name des aktuellen Raums; hoechstens einer
    pub raum: Option<String>,
}

// ---------------------------------------------------------------------------
// Peer
// ---------------------------------------------------------------------------

/// Oeffentliches Handle einer verbundenen Session
///
/// Wird von `Switchboard::verbinden` ausgegeben. Die Transportschicht
/// reicht eingehende Text-Frames an `verarbeiten` weiter und ruft beim
/// Verbindungsabbau `trennen` auf.
#[derive(Clone)]
pub struct Peer {
    session_id: SessionId,
    board: Switchboard,
}

impl Peer {
    pub(crate) fn neu(session_id: SessionId, board: Switchboard) -> Self {
        Self { session_id, board }
    }

    /// Stabile Session-Kennung dieser Verbindung
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Verarbeitet einen rohen eingehenden Frame
    ///
    /// Schlaegt nie fehl: kaputte Frames degradieren still
    /// (Literal-Fallback, Routing-Miss) statt die Session zu beenden.
    pub fn verarbeiten(&self, roh: &str) {
        self.board.frame_verarbeiten(self.session_id, roh);
    }

    /// Verlaesst den aktuellen Raum; die Session bleibt bestehen
    ///
    /// Entspricht einem eingehenden `/leave`: der Peer kann danach erneut
    /// announcen.
    pub fn verlassen(&self) {
        self.board.raum_verlassen(self.session_id);
    }

    /// Baut die Session vollstaendig ab (Transport getrennt)
    ///
    /// Fuehrt den Leave synchron aus und entfernt erst danach Zustand und
    /// Send-Queue; Raeume behalten so nie ein totes Mitglied.
    pub fn trennen(&self) {
        self.board.session_trennen(self.session_id);
    }
}
