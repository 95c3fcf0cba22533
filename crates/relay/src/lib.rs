//! switchboard-relay – Raum-Registry und Frame-Routing
//!
//! Dieses Crate implementiert den Kern des Switchboards: das Raum-Register,
//! die Peer-Sessions und die Routing-Entscheidung fuer jeden eingehenden
//! Frame. Transport (WebSocket) und HTTP-Status liegen im Server-Crate.
//!
//! ## Architektur
//!
//! ```text
//! Transportschicht (pro Verbindung)
//!     |
//!     v
//! Peer::verarbeiten(roher Frame)
//!     |
//!     v
//! Frame::parsen -> Kommando::aus_frame        (switchboard-protocol)
//!     |
//!     v
//! router – ein Schloss, ein Frame nach dem anderen
//!     +-- announce   Kennung setzen, Raum wechseln, roominfo an Peer
//!     +-- leave      Raum raeumen, leeren Raum zerstoeren
//!     +-- to         roher Frame an genau ein Raummitglied
//!     +-- unbekannt  roher Frame an alle anderen Raummitglieder
//!     +-- opak       nur beobachtet, nie geroutet
//!
//! RaumRegister – benannte Raeume, Mitglieder in Beitrittsreihenfolge
//! FrameVersand – Send-Queue pro Session, Zustellung nicht-blockierend
//! Switchboard  – Koordinator, Lebenszyklus-Ereignisse fuer Beobachter
//! ```

pub mod board;
pub mod peer;
pub mod raum;

mod router;
mod versand;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use board::Switchboard;
pub use peer::Peer;
pub use raum::RaumUebersicht;
