//! Font metrics
//!
//! Fonts cross the link as a 16-bit id. Each side resolves the id to a
//! [`FontTable`] on its own; the module keeps the tables it has seen in a
//! [`FontRegistry`].

use canvaslink_protocol::FontHandle;
use heapless::Vec;

/// Registry id of DejaVu Sans 9
pub const DEJAVU_SANS_9_ID: u16 = 30367;

/// Registry id of DejaVu Sans Condensed 9
pub const DEJAVU_SANS_CONDENSED_9_ID: u16 = 41259;

/// Number of distinct fonts the registry can hold
pub const MAX_FONTS: usize = 4;

/// Per-character advance widths for a printable-ASCII font
#[derive(Debug, PartialEq, Eq)]
pub struct FontTable {
    pub id: u16,
    pub name: &'static str,
    /// Line height in pixels
    pub height: u16,
    pub first_char: char,
    pub last_char: char,
    /// Glyph widths from `first_char` to `last_char`
    pub widths: &'static [u8],
}

impl FontTable {
    pub fn handle(&self) -> FontHandle {
        FontHandle(self.id)
    }

    /// Glyph width, or `None` outside the covered range
    pub fn char_width(&self, c: char) -> Option<u8> {
        if c < self.first_char || c > self.last_char {
            return None;
        }
        self.widths
            .get(c as usize - self.first_char as usize)
            .copied()
    }

    /// Rendered width of `text`: each glyph plus one pixel of spacing
    ///
    /// Characters the font does not cover take no space.
    pub fn string_width(&self, text: &str) -> u16 {
        text.chars()
            .filter_map(|c| self.char_width(c))
            .fold(0u16, |acc, w| acc.saturating_add(w as u16 + 1))
    }
}

pub static DEJAVU_SANS_9: FontTable = FontTable {
    id: DEJAVU_SANS_9_ID,
    name: "DejaVu Sans 9",
    height: 13,
    first_char: ' ',
    last_char: '~',
    widths: &[
        5, 1, 3, 8, 5, 10, 8, 1, 3, 3, 5, 7, 1, 3, 1, 4, // ' ' .. '/'
        6, 5, 6, 6, 6, 6, 6, 6, 6, 6, 1, 1, 8, 8, 8, 5, // '0' .. '?'
        11, 8, 6, 6, 7, 6, 5, 7, 7, 1, 3, 6, 5, 8, 7, 7, // '@' .. 'O'
        6, 7, 7, 6, 7, 7, 8, 11, 7, 7, 7, 2, 4, 2, 6, 6, // 'P' .. '_'
        2, 6, 6, 5, 6, 6, 4, 6, 6, 1, 2, 5, 1, 9, 6, 6, // '`' .. 'o'
        6, 6, 4, 5, 4, 6, 6, 9, 6, 6, 5, 5, 1, 5, 8, // 'p' .. '~'
    ],
};

pub static DEJAVU_SANS_CONDENSED_9: FontTable = FontTable {
    id: DEJAVU_SANS_CONDENSED_9_ID,
    name: "DejaVu Sans Condensed 9",
    height: 13,
    first_char: ' ',
    last_char: '~',
    widths: &[
        5, 1, 3, 7, 5, 9, 7, 1, 2, 2, 5, 7, 1, 2, 1, 4, // ' ' .. '/'
        5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 1, 1, 7, 7, 7, 4, // '0' .. '?'
        9, 7, 6, 6, 7, 5, 5, 6, 6, 1, 3, 6, 5, 7, 6, 7, // '@' .. 'O'
        5, 7, 6, 5, 7, 6, 7, 10, 6, 6, 7, 2, 3, 2, 7, 6, // 'P' .. '_'
        2, 5, 5, 4, 5, 5, 4, 5, 5, 1, 2, 5, 1, 9, 5, 5, // '`' .. 'o'
        5, 5, 3, 4, 4, 5, 6, 8, 5, 6, 5, 5, 1, 5, 7, // 'p' .. '~'
    ],
};

/// Look up a built-in font by id
pub fn known_font(id: u16) -> Option<&'static FontTable> {
    match id {
        DEJAVU_SANS_9_ID => Some(&DEJAVU_SANS_9),
        DEJAVU_SANS_CONDENSED_9_ID => Some(&DEJAVU_SANS_CONDENSED_9),
        _ => None,
    }
}

/// Font id not known to this build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownFont(pub u16);

/// Append-only cache of fonts referenced by a command stream
///
/// Populated on first reference; never shrinks.
#[derive(Debug, Default)]
pub struct FontRegistry {
    fonts: Vec<&'static FontTable, MAX_FONTS>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Resolve a handle, loading the table on first use
    pub fn resolve(&mut self, handle: FontHandle) -> Result<&'static FontTable, UnknownFont> {
        if let Some(font) = self.fonts.iter().find(|f| f.id == handle.0) {
            return Ok(font);
        }
        let font = known_font(handle.0).ok_or(UnknownFont(handle.0))?;
        // Sized for every built-in font
        let cached = self.fonts.push(font);
        debug_assert!(cached.is_ok(), "font registry full");
        Ok(font)
    }

    /// Fonts loaded so far
    pub fn loaded(&self) -> usize {
        self.fonts.len()
    }
}
