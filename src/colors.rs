//! Colour assignment for event titles.

use std::collections::HashMap;

use owo_colors::Rgb;
use schaukasten_core::EventSpan;

/// Colours of the regular events.
const KNOWN: &[(&str, (u8, u8, u8))] = &[
    ("Filmabend", (0xE7, 0x80, 0x80)),
    ("Queer Feminist Action", (0x88, 0xE7, 0x80)),
    ("Queercafé", (0xE7, 0x80, 0xDB)),
    ("Trans-Beratung", (0x80, 0xE7, 0xE1)),
    ("International Evening", (0x80, 0xE7, 0xA7)),
    ("Ace & Aro Abend", (0xE7, 0xE6, 0x80)),
    ("Fesseltreff", (0xAA, 0x80, 0xE7)),
    ("Bi-Pan* and Friends", (0xE7, 0xC2, 0x80)),
    ("FLINTA-Abend", (0xDF, 0x80, 0xE7)),
    ("Plenum", (0x80, 0x81, 0xE7)),
    ("Spieleabend", (0xE7, 0xD0, 0x80)),
    ("TIN* Abend", (0x84, 0xD9, 0x80)),
    ("Poly Abend", (0xD2, 0xD9, 0x84)),
    ("Warm Up", (0xF0, 0x52, 0x52)),
    ("Anime Abend (Film)", (0xF2, 0x96, 0x6F)),
    ("Anime Abend Serie", (0xBD, 0xF3, 0x70)),
    ("Bibliothekstreffen", (0x99, 0xFF, 0xFC)),
];

/// Fallback colours for everything else.
const PALETTE: &[(u8, u8, u8)] = &[
    (0xB0, 0xC4, 0xDE),
    (0xF4, 0xA4, 0x60),
    (0x9A, 0xCD, 0x32),
    (0xDD, 0xA0, 0xDD),
    (0x66, 0xCD, 0xAA),
    (0xF0, 0xE6, 0x8C),
    (0x87, 0xCE, 0xEB),
    (0xFF, 0xB6, 0xC1),
];

/// Colour of every title in a span, keyed by the primary title.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    colors: HashMap<String, Rgb>,
}

impl ColorMap {
    pub fn for_span(span: &EventSpan) -> Self {
        let colors = span
            .occurrences()
            .iter()
            .map(|o| o.title().primary())
            .map(|title| (title.to_string(), color_for(title)))
            .collect();
        ColorMap { colors }
    }

    pub fn get(&self, title: &str) -> Rgb {
        self.colors
            .get(title)
            .copied()
            .unwrap_or_else(|| color_for(title))
    }
}

fn color_for(title: &str) -> Rgb {
    let (r, g, b) = KNOWN
        .iter()
        .find(|(name, _)| *name == title)
        .map(|(_, rgb)| *rgb)
        .unwrap_or_else(|| PALETTE[(fnv1a(title) % PALETTE.len() as u64) as usize]);
    Rgb(r, g, b)
}

/// 64-bit FNV-1a.
fn fnv1a(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_titles_use_their_colour() {
        let Rgb(r, g, b) = color_for("Plenum");
        assert_eq!((r, g, b), (0x80, 0x81, 0xE7));
    }

    #[test]
    fn test_unknown_titles_are_deterministic() {
        let Rgb(r1, g1, b1) = color_for("Lesekreis");
        let Rgb(r2, g2, b2) = color_for("Lesekreis");
        assert_eq!((r1, g1, b1), (r2, g2, b2));
        assert!(PALETTE.contains(&(r1, g1, b1)));
    }

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a("a"), 0xaf63_dc4c_8601_ec8c);
    }
}
