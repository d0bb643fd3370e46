//! The fixed font set: PDF standard Type1 faces with their AFM advance widths.
//!
//! Text faces use WinAnsiEncoding. ZapfDingbats only carries the bullet
//! glyphs that WinAnsi lacks.

use postpress_types::pt_to_mm;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Helvetica,
    Courier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    ZapfDingbats,
}

impl BuiltinFont {
    pub const ALL: [BuiltinFont; 9] = [
        BuiltinFont::Helvetica,
        BuiltinFont::HelveticaBold,
        BuiltinFont::HelveticaOblique,
        BuiltinFont::HelveticaBoldOblique,
        BuiltinFont::Courier,
        BuiltinFont::CourierBold,
        BuiltinFont::CourierOblique,
        BuiltinFont::CourierBoldOblique,
        BuiltinFont::ZapfDingbats,
    ];

    pub fn select(family: FontFamily, bold: bool, italic: bool) -> Self {
        match (family, bold, italic) {
            (FontFamily::Helvetica, false, false) => BuiltinFont::Helvetica,
            (FontFamily::Helvetica, true, false) => BuiltinFont::HelveticaBold,
            (FontFamily::Helvetica, false, true) => BuiltinFont::HelveticaOblique,
            (FontFamily::Helvetica, true, true) => BuiltinFont::HelveticaBoldOblique,
            (FontFamily::Courier, false, false) => BuiltinFont::Courier,
            (FontFamily::Courier, true, false) => BuiltinFont::CourierBold,
            (FontFamily::Courier, false, true) => BuiltinFont::CourierOblique,
            (FontFamily::Courier, true, true) => BuiltinFont::CourierBoldOblique,
        }
    }

    /// PostScript name used as the PDF `BaseFont`.
    pub fn base_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
            BuiltinFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            BuiltinFont::Courier => "Courier",
            BuiltinFont::CourierBold => "Courier-Bold",
            BuiltinFont::CourierOblique => "Courier-Oblique",
            BuiltinFont::CourierBoldOblique => "Courier-BoldOblique",
            BuiltinFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Name of the font in a page's resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F1",
            BuiltinFont::HelveticaBold => "F2",
            BuiltinFont::HelveticaOblique => "F3",
            BuiltinFont::HelveticaBoldOblique => "F4",
            BuiltinFont::Courier => "F5",
            BuiltinFont::CourierBold => "F6",
            BuiltinFont::CourierOblique => "F7",
            BuiltinFont::CourierBoldOblique => "F8",
            BuiltinFont::ZapfDingbats => "F9",
        }
    }

    /// Symbolic fonts carry their own encoding.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, BuiltinFont::ZapfDingbats)
    }

    pub fn is_bold(&self) -> bool {
        matches!(
            self,
            BuiltinFont::HelveticaBold
                | BuiltinFont::HelveticaBoldOblique
                | BuiltinFont::CourierBold
                | BuiltinFont::CourierBoldOblique
        )
    }

    /// Advance width of `ch` in thousandths of the font size.
    pub fn char_width(&self, ch: char) -> u16 {
        match self {
            BuiltinFont::Courier
            | BuiltinFont::CourierBold
            | BuiltinFont::CourierOblique
            | BuiltinFont::CourierBoldOblique => 600,
            BuiltinFont::ZapfDingbats => match ch {
                '◦' => 873,
                '▪' => 761,
                _ => 791,
            },
            BuiltinFont::Helvetica | BuiltinFont::HelveticaOblique => {
                helvetica_width(&HELVETICA_ASCII, ch, false)
            }
            BuiltinFont::HelveticaBold | BuiltinFont::HelveticaBoldOblique => {
                helvetica_width(&HELVETICA_BOLD_ASCII, ch, true)
            }
        }
    }

    /// Width of `text` set at `size_pt`, in millimetres.
    pub fn text_width(&self, text: &str, size_pt: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        pt_to_mm(units as f32 * size_pt / 1000.0)
    }

    /// Encodes `text` as single-byte codes for this font. Characters the font
    /// cannot show become `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let code: fn(char) -> Option<u8> = if self.is_symbolic() {
            dingbat_code
        } else {
            win_ansi_code
        };
        text.chars().map(|c| code(c).unwrap_or(b'?')).collect()
    }
}

/// Widths of ASCII 32..=126 in Helvetica.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Widths of ASCII 32..=126 in Helvetica-Bold.
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn helvetica_width(table: &[u16; 95], ch: char, bold: bool) -> u16 {
    if (' '..='~').contains(&ch) {
        return table[ch as usize - 32];
    }
    match ch {
        '\u{a0}' => 278,
        '•' => 350,
        '–' => 556,
        '—' | '…' | '‰' => 1000,
        '‘' | '’' | '‚' => {
            if bold {
                278
            } else {
                222
            }
        }
        '“' | '”' | '„' => {
            if bold {
                500
            } else {
                333
            }
        }
        '©' | '®' => 737,
        '°' => 400,
        '×' => 584,
        '™' => 1000,
        _ => 556,
    }
}

/// WinAnsiEncoding code for `ch`, if it has one.
pub fn win_ansi_code(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7e | 0xa0..=0xff => Some(code as u8),
        _ => {
            let mapped = match ch {
                '€' => 0x80,
                '‚' => 0x82,
                'ƒ' => 0x83,
                '„' => 0x84,
                '…' => 0x85,
                '†' => 0x86,
                '‡' => 0x87,
                'ˆ' => 0x88,
                '‰' => 0x89,
                'Š' => 0x8a,
                '‹' => 0x8b,
                'Œ' => 0x8c,
                'Ž' => 0x8e,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '˜' => 0x98,
                '™' => 0x99,
                'š' => 0x9a,
                '›' => 0x9b,
                'œ' => 0x9c,
                'ž' => 0x9e,
                'Ÿ' => 0x9f,
                _ => return None,
            };
            Some(mapped)
        }
    }
}

/// ZapfDingbats code for the bullet glyphs.
pub fn dingbat_code(ch: char) -> Option<u8> {
    match ch {
        '•' | '●' => Some(0x6c),
        '◦' | '○' => Some(0x6d),
        '▪' | '■' => Some(0x6e),
        ' ' => Some(0x20),
        _ => None,
    }
}

/// Picks the face that can show `glyph`: the text face when WinAnsi covers
/// it, ZapfDingbats otherwise.
pub fn marker_font(text_font: BuiltinFont, glyph: &str) -> BuiltinFont {
    if glyph.chars().all(|c| win_ansi_code(c).is_some()) {
        text_font
    } else {
        BuiltinFont::ZapfDingbats
    }
}
