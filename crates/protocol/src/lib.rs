//! switchboard-protocol – Kommando-Frame-Protokoll
//!
//! Dieses Crate definiert das textuelle Wire-Format zwischen Client und
//! Switchboard: Frame-Klassifikation, typisierte Kommandos und die
//! synthetisierten Antwort-Frames.

pub mod frame;
pub mod kommando;

pub use frame::{roominfo_frame, Frame};
pub use kommando::{AnnounceDaten, Kommando};
