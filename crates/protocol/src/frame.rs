//! Wire-Format fuer Kommando-Frames
//!
//! Textbasiertes Protokoll: jede Transportnachricht ist genau ein Frame.
//!
//! ## Frame-Format
//!
//! ```text
//! /<kommando>|<arg1>|<arg2>|...
//! ```
//!
//! Ein Frame der mit `/` beginnt ist ein Kommando-Frame. Der Kommandoname
//! reicht vom ersten Zeichen nach dem `/` bis vor das erste `|` und wird
//! case-insensitiv verglichen. Jedes Argument wird als JSON dekodiert;
//! schlaegt das fehl, zaehlt der rohe Text als String-Literal. Frames ohne
//! fuehrenden `/` sind opake Daten und werden nicht interpretiert.

use serde_json::Value;

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// Ergebnis der Frame-Klassifikation
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Kommando-Frame: `/<name>|<argumente...>`
    Befehl {
        /// Kommandoname, bereits kleingeschrieben
        name: String,
        /// Pipe-getrennte Argumente, je als JSON-Wert oder String-Literal
        argumente: Vec<Value>,
    },
    /// Frame ohne fuehrenden `/`; der Inhalt bleibt uninterpretiert
    Daten,
}

impl Frame {
    /// Klassifiziert einen rohen Text-Frame
    ///
    /// Fehlt das `|` nach dem Kommandonamen, reicht der Name bis zum Ende
    /// und die Argumentliste ist leer. Die Funktion schlaegt nie fehl.
    pub fn parsen(roh: &str) -> Frame {
        let Some(rest) = roh.strip_prefix('/') else {
            return Frame::Daten;
        };
        match rest.split_once('|') {
            Some((name, tail)) => Frame::Befehl {
                name: name.to_ascii_lowercase(),
                argumente: tail.split('|').map(json_oder_literal).collect(),
            },
            None => Frame::Befehl {
                name: rest.to_ascii_lowercase(),
                argumente: Vec::new(),
            },
        }
    }
}

/// Dekodiert ein einzelnes Argument als JSON, mit String-Literal-Fallback
fn json_oder_literal(roh: &str) -> Value {
    serde_json::from_str(roh).unwrap_or_else(|_| Value::String(roh.to_string()))
}

// ---------------------------------------------------------------------------
// Roominfo-Synthese
// ---------------------------------------------------------------------------

/// Baut den `roominfo`-Frame der nach erfolgreichem Announce an den
/// beitretenden Peer geht
///
/// Das Format ist byte-genau Teil des Wire-Protokolls:
/// `/roominfo|{"memberCount":<n>}`.
pub fn roominfo_frame(mitglieder: usize) -> String {
    format!("/roominfo|{{\"memberCount\":{}}}", mitglieder)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
