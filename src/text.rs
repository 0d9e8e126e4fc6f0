//! Conversion between UTF-8 byte offsets and UTF-16 code-unit offsets.
//!
//! Grammars report byte offsets; editors report cursors in UTF-16 code
//! units. The map records an anchor around every non-ASCII character so
//! conversions between anchors are plain arithmetic.

#[derive(Debug, Clone, Copy)]
struct Anchor {
    byte: usize,
    utf16: usize,
    /// Start of a multi-unit character; offsets up to the next anchor fall
    /// inside it and snap back here.
    wide: bool,
}

/// Offset converter for one source text.
#[derive(Debug, Clone)]
pub struct OffsetMap {
    anchors: Vec<Anchor>,
    len_bytes: usize,
    len_utf16: usize,
}

impl OffsetMap {
    pub fn new(text: &str) -> Self {
        let mut anchors = vec![Anchor {
            byte: 0,
            utf16: 0,
            wide: false,
        }];
        let mut utf16 = 0;

        for (byte, ch) in text.char_indices() {
            if !ch.is_ascii() {
                anchors.push(Anchor {
                    byte,
                    utf16,
                    wide: true,
                });
                anchors.push(Anchor {
                    byte: byte + ch.len_utf8(),
                    utf16: utf16 + ch.len_utf16(),
                    wide: false,
                });
            }
            utf16 += ch.len_utf16();
        }

        Self {
            anchors,
            len_bytes: text.len(),
            len_utf16: utf16,
        }
    }

    /// Length of the text in UTF-16 code units.
    pub fn len_utf16(&self) -> usize {
        self.len_utf16
    }

    /// Byte offset to UTF-16 offset. Offsets inside a character map to the
    /// character's start; offsets past the end are clamped.
    pub fn to_utf16(&self, byte: usize) -> usize {
        let byte = byte.min(self.len_bytes);
        let anchor = self.anchors[self.anchors.partition_point(|a| a.byte <= byte) - 1];
        if anchor.wide {
            anchor.utf16
        } else {
            anchor.utf16 + (byte - anchor.byte)
        }
    }

    /// UTF-16 offset to byte offset. An offset between the halves of a
    /// surrogate pair maps to the character's start; offsets past the end
    /// are clamped.
    pub fn to_byte(&self, utf16: usize) -> usize {
        let utf16 = utf16.min(self.len_utf16);
        let anchor = self.anchors[self.anchors.partition_point(|a| a.utf16 <= utf16) - 1];
        if anchor.wide {
            anchor.byte
        } else {
            anchor.byte + (utf16 - anchor.utf16)
        }
    }
}
