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

//! Terminal attribute switching and queries, via rustix's safe termios API.

use rustix::termios::{self, LocalModes, OptionalActions, SpecialCodeIndex, Termios};
use std::io;

/// Width used when the terminal cannot report one.
pub const DEFAULT_WIDTH: u16 = 80;

/// Returns true when both stdin and stdout are attached to a terminal.
///
/// Piping either stream (`echo foo | prog`, `prog | grep bar`) makes the
/// editor unusable, so bring-up refuses in that case.
/// More info: <https://unix.stackexchange.com/questions/597083/how-does-piping-affect-stdin>
#[must_use]
pub fn is_interactive() -> bool {
    termios::isatty(std::io::stdin()) && termios::isatty(std::io::stdout())
}

/// Current terminal width in cells, from the `tcgetwinsize` syscall on
/// stdout. Falls back to [`DEFAULT_WIDTH`] if the size cannot be determined
/// or the terminal reports zero columns.
#[must_use]
pub fn window_width() -> u16 {
    match termios::tcgetwinsize(std::io::stdout()) {
        Ok(winsize) if winsize.ws_col > 0 => winsize.ws_col,
        _ => DEFAULT_WIDTH,
    }
}

/// Guard that holds the terminal in per-byte read mode for the duration of
/// one read.
///
/// [`RawMode::enable`] snapshots the current attributes of stdin, then
/// installs a copy with canonical mode and local echo disabled and a
/// one-byte minimum / zero-timeout read policy (`VMIN=1`, `VTIME=0`).
/// Input post-processing stays on, so Enter arrives as a line feed; output
/// post-processing stays on, so an emitted line feed also returns the
/// carriage.
///
/// The snapshot is restored by [`Drop`], which covers every exit path out of
/// the read: submit, EOF, error propagation, and panic unwind.
#[derive(Debug)]
pub struct RawMode {
    original: Termios,
}

impl RawMode {
    /// Switch the terminal to per-byte reads, returning the guard that will
    /// switch it back.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal attributes cannot be retrieved or set.
    pub fn enable() -> io::Result<Self> {
        let stdin = io::stdin();
        let original = termios::tcgetattr(&stdin).map_err(io::Error::from)?;

        let mut raw = original.clone();
        raw.local_modes
            .remove(LocalModes::ICANON | LocalModes::ECHO);
        raw.special_codes[SpecialCodeIndex::VMIN] = 1;
        raw.special_codes[SpecialCodeIndex::VTIME] = 0;

        termios::tcsetattr(&stdin, OptionalActions::Now, &raw).map_err(io::Error::from)?;

        Ok(Self { original })
    }

    /// Restore the snapshot taken by [`RawMode::enable`].
    ///
    /// # Errors
    ///
    /// Returns an error if terminal attributes cannot be set.
    pub fn restore(&self) -> io::Result<()> {
        let stdin = io::stdin();
        termios::tcsetattr(&stdin, OptionalActions::Now, &self.original)
            .map_err(io::Error::from)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        _ = self.restore();
    }
}
