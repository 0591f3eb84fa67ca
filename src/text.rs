/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module defines and partially implements the [`Text`] trait.

use crate::error::TextEnvError;

/// This trait provides methods that operate on structures that hold or represent text content.
/// All positions are expressed in unicode points, as are the character offsets of tokens.
pub trait Text<'store, 'slf>
where
    'store: 'slf,
{
    /// Returns a reference to the text
    fn text(&'slf self) -> &'store str;

    /// Returns the length of the text in unicode points
    /// For bytes, use `Self::text().len()` instead.
    fn textlen(&'slf self) -> usize;

    fn is_empty(&'slf self) -> bool {
        self.text().is_empty()
    }

    /// Converts a unicode character position to a UTF-8 byte position.
    /// The position equal to the text length is valid and maps to the byte length.
    fn utf8byte(&'slf self, charpos: usize) -> Result<usize, TextEnvError> {
        let text = self.text();
        let textlen = self.textlen();
        if charpos == textlen {
            Ok(text.len())
        } else if charpos > textlen {
            Err(TextEnvError::OutOfRange(
                charpos,
                charpos,
                textlen,
                "Text::utf8byte()",
            ))
        } else if text.len() == textlen {
            //ascii fast path
            Ok(charpos)
        } else {
            text.char_indices()
                .nth(charpos)
                .map(|(bytepos, _)| bytepos)
                .ok_or(TextEnvError::OutOfRange(
                    charpos,
                    charpos,
                    textlen,
                    "Text::utf8byte()",
                ))
        }
    }

    /// Converts a UTF-8 byte position into a unicode position
    fn utf8byte_to_charpos(&'slf self, bytecursor: usize) -> Result<usize, TextEnvError> {
        let text = self.text();
        if bytecursor > text.len() || !text.is_char_boundary(bytecursor) {
            return Err(TextEnvError::OutOfRange(
                bytecursor,
                bytecursor,
                text.len(),
                "Text::utf8byte_to_charpos(): not a valid byte position",
            ));
        }
        Ok(text[..bytecursor].chars().count())
    }

    /// Returns a string reference to a slice of text by character offsets (end is non-inclusive)
    fn text_by_chars(&'slf self, begin: usize, end: usize) -> Result<&'store str, TextEnvError> {
        if begin > end || end > self.textlen() {
            return Err(TextEnvError::OutOfRange(
                begin,
                end,
                self.textlen(),
                "Text::text_by_chars()",
            ));
        }
        let beginbyte = self.utf8byte(begin)?;
        let endbyte = self.utf8byte(end)?;
        Ok(&self.text()[beginbyte..endbyte])
    }
}
