/*
 *   Copyright (c) 2025 the rawline authors
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

//! Key bindings and the incremental escape-sequence decoder.
//!
//! One immutable table maps byte sequences to editing actions; it serves
//! both exact matching and prefix validation, so dispatch is a linear scan.
//! That is adequate for this many bindings, and it makes table order
//! irrelevant: an exact match always wins over prefix continuation.

use std::io;

use strum_macros::Display;

use crate::InputDevice;

pub const ESC: u8 = 0x1b;
pub const BEL: u8 = 0x07;

/// Staging bound for one escape sequence.
pub const ESC_SEQ_MAX: usize = 32;

/// Everything a key binding can do to the editor.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum EditorAction {
    MoveLineStart,
    MoveCursorLeft,
    EndOfTransmission,
    MoveLineEnd,
    MoveCursorRight,
    RingBell,
    DeleteCharBefore,
    Complete,
    SubmitLine,
    KillToLineEnd,
    ClearScreen,
    KillToLineStart,
    DeleteCharUnder,
    HistoryPrevious,
    HistoryNext,
    MoveWordRight,
    MoveWordLeft,
    DeleteWordAfter,
    DeleteWordBefore,
}

/// A byte sequence and the action it resolves to.
#[derive(Debug)]
pub struct Binding {
    pub sequence: &'static [u8],
    pub action: EditorAction,
}

pub const BINDINGS: &[Binding] = &[
    // Control bytes.
    Binding { sequence: b"\x01", action: EditorAction::MoveLineStart }, // Ctrl-A
    Binding { sequence: b"\x02", action: EditorAction::MoveCursorLeft }, // Ctrl-B
    Binding { sequence: b"\x04", action: EditorAction::EndOfTransmission }, // Ctrl-D
    Binding { sequence: b"\x05", action: EditorAction::MoveLineEnd },   // Ctrl-E
    Binding { sequence: b"\x06", action: EditorAction::MoveCursorRight }, // Ctrl-F
    Binding { sequence: b"\x07", action: EditorAction::RingBell },      // Ctrl-G
    Binding { sequence: b"\x08", action: EditorAction::DeleteCharBefore }, // Ctrl-H
    Binding { sequence: b"\x09", action: EditorAction::Complete },      // Tab
    Binding { sequence: b"\x0a", action: EditorAction::SubmitLine },    // Enter
    Binding { sequence: b"\x0b", action: EditorAction::KillToLineEnd }, // Ctrl-K
    Binding { sequence: b"\x0c", action: EditorAction::ClearScreen },   // Ctrl-L
    Binding { sequence: b"\x15", action: EditorAction::KillToLineStart }, // Ctrl-U
    Binding { sequence: b"\x7f", action: EditorAction::DeleteCharBefore }, // Backspace
    // ANSI sequences.
    Binding { sequence: b"\x1b[A", action: EditorAction::HistoryPrevious }, // Up
    Binding { sequence: b"\x1b[B", action: EditorAction::HistoryNext },     // Down
    Binding { sequence: b"\x1b[C", action: EditorAction::MoveCursorRight }, // Right
    Binding { sequence: b"\x1b[D", action: EditorAction::MoveCursorLeft },  // Left
    Binding { sequence: b"\x1b[H", action: EditorAction::MoveLineStart },   // Home
    Binding { sequence: b"\x1b[F", action: EditorAction::MoveLineEnd },     // End
    Binding { sequence: b"\x1b[3~", action: EditorAction::DeleteCharUnder }, // Delete
    Binding { sequence: b"\x1b[1;5C", action: EditorAction::MoveWordRight }, // Ctrl-Right
    Binding { sequence: b"\x1b[1;5D", action: EditorAction::MoveWordLeft },  // Ctrl-Left
    Binding { sequence: b"\x1b[3;5~", action: EditorAction::DeleteWordAfter }, // Ctrl-Delete
    // Meta sequences.
    Binding { sequence: b"\x1bf", action: EditorAction::MoveWordRight },
    Binding { sequence: b"\x1bb", action: EditorAction::MoveWordLeft },
    Binding { sequence: b"\x1bd", action: EditorAction::DeleteWordAfter },
    Binding { sequence: b"\x1b\x7f", action: EditorAction::DeleteWordBefore }, // Meta-Backspace
];

/// Action for an exactly matching byte sequence.
#[must_use]
pub fn lookup_exact(staged: &[u8]) -> Option<EditorAction> {
    BINDINGS
        .iter()
        .find(|binding| binding.sequence == staged)
        .map(|binding| binding.action)
}

/// True when `staged` is a strict prefix of at least one binding.
#[must_use]
pub fn is_prefix_of_any(staged: &[u8]) -> bool {
    BINDINGS
        .iter()
        .any(|binding| binding.sequence.len() > staged.len() && binding.sequence.starts_with(staged))
}

/// Incrementally recognize one escape sequence after its ESC byte has been
/// read.
///
/// Reads further bytes one at a time into a bounded staging buffer. After
/// each byte: an exact table match resolves to its action; a strict prefix
/// of some binding keeps reading; anything else is unrecognized and
/// discarded without side effects. End of input aborts immediately — the
/// terminal delivers escape sequences as a contiguous burst, so this never
/// blocks waiting for a sequence that will not complete. An interrupted
/// read mid-burst is retried in place.
///
/// # Errors
///
/// Returns an error if the underlying read fails.
pub fn decode_escape_sequence(input: &mut InputDevice) -> io::Result<Option<EditorAction>> {
    let mut staged = [0u8; ESC_SEQ_MAX];
    staged[0] = ESC;
    let mut len = 1;

    loop {
        let byte = loop {
            match input.next_byte() {
                Ok(Some(byte)) => break byte,
                Ok(None) => return Ok(None),
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            }
        };

        if len == ESC_SEQ_MAX {
            tracing::debug!("escape sequence exceeded staging bound, discarding");
            return Ok(None);
        }
        staged[len] = byte;
        len += 1;

        if let Some(action) = lookup_exact(&staged[..len]) {
            return Ok(Some(action));
        }
        if !is_prefix_of_any(&staged[..len]) {
            tracing::debug!(sequence = ?&staged[..len], "unrecognized escape sequence, discarding");
            return Ok(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(b"\x1b[A", EditorAction::HistoryPrevious ; "up arrow")]
    #[test_case(b"\x1b[D", EditorAction::MoveCursorLeft ; "left arrow")]
    #[test_case(b"\x1b[H", EditorAction::MoveLineStart ; "home")]
    #[test_case(b"\x1b[F", EditorAction::MoveLineEnd ; "end")]
    #[test_case(b"\x1b[3~", EditorAction::DeleteCharUnder ; "delete")]
    #[test_case(b"\x1b[1;5C", EditorAction::MoveWordRight ; "ctrl right")]
    #[test_case(b"\x1b[1;5D", EditorAction::MoveWordLeft ; "ctrl left")]
    #[test_case(b"\x1b[3;5~", EditorAction::DeleteWordAfter ; "ctrl delete")]
    #[test_case(b"\x1bf", EditorAction::MoveWordRight ; "meta f")]
    #[test_case(b"\x1bb", EditorAction::MoveWordLeft ; "meta b")]
    #[test_case(b"\x1bd", EditorAction::DeleteWordAfter ; "meta d")]
    #[test_case(b"\x1b\x7f", EditorAction::DeleteWordBefore ; "meta backspace")]
    fn test_escape_sequences_decode_to_their_actions(sequence: &[u8], expected: EditorAction) {
        let mut input = InputDevice::new_mock(sequence[1..].to_vec());
        let action = decode_escape_sequence(&mut input).unwrap();
        assert_eq!(action, Some(expected));
    }

    #[test]
    fn test_exact_match_wins_over_prefix_continuation() {
        // "\x1b[3~" shares the prefix "\x1b[3" with "\x1b[3;5~"; the decoder
        // must resolve on the '~' without waiting for more bytes.
        let mut input = InputDevice::new_mock(b"[3~X".to_vec());
        let action = decode_escape_sequence(&mut input).unwrap();
        assert_eq!(action, Some(EditorAction::DeleteCharUnder));
        // The trailing byte was not consumed.
        assert_eq!(input.next_byte().unwrap(), Some(b'X'));
    }

    #[test]
    fn test_unrecognized_sequence_is_discarded() {
        let mut input = InputDevice::new_mock(b"[Z".to_vec());
        let action = decode_escape_sequence(&mut input).unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn test_sequence_cut_short_by_end_of_input_is_discarded() {
        let mut input = InputDevice::new_mock(b"[".to_vec());
        let action = decode_escape_sequence(&mut input).unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn test_single_control_bytes_resolve_via_the_same_table() {
        assert_eq!(lookup_exact(b"\x01"), Some(EditorAction::MoveLineStart));
        assert_eq!(lookup_exact(b"\x0a"), Some(EditorAction::SubmitLine));
        assert_eq!(lookup_exact(b"\x7f"), Some(EditorAction::DeleteCharBefore));
        assert_eq!(lookup_exact(b"q"), None);
    }

    #[test]
    fn test_decode_outcome_is_independent_of_table_order() {
        // Every strict prefix of every multi-byte binding must be reported
        // as a prefix, and no complete sequence may be a strict prefix of
        // another (which would make one of them unreachable).
        for binding in BINDINGS {
            for split in 1..binding.sequence.len() {
                assert!(is_prefix_of_any(&binding.sequence[..split]));
            }
            assert!(
                !is_prefix_of_any(binding.sequence),
                "binding {:?} is shadowed by a longer one",
                binding.sequence
            );
        }
    }
}
