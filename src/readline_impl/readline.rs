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

//! The editor core: one owner struct holding the buffer, the screen model,
//! the history ring, and the I/O devices, plus the per-line read loop.

use std::{io, sync::Arc};

use crossterm::{
    cursor::MoveTo,
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use miette::Diagnostic;
use strum_macros::Display;
use thiserror::Error;

use crate::{
    decode_escape_sequence, lookup_exact, readline_impl::completion::longest_common_prefix, term,
    Completer, EditorAction, History, InputDevice, LineBuffer, LineState, OutputDevice, SafeWidth,
    StdMutex, BEL, ESC,
};

/// Error returned from [`Readline::read_line`]. Environmental failures
/// (terminal attributes, window size, terminal reads and writes) surface
/// here; the raw-mode guard restores the terminal while the error unwinds.
#[derive(Debug, Error, Diagnostic)]
pub enum ReadlineError {
    /// Bring-up refusal: line editing needs a terminal on both ends.
    #[error("standard input and standard output must both be terminals")]
    #[diagnostic(
        code(rawline::not_interactive),
        help("run from an interactive terminal; piped stdin or stdout disables line editing")
    )]
    NotInteractive,

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Outcome of one [`Readline::read_line`] call.
#[derive(Debug, Display, PartialEq, Eq, Clone)]
pub enum ReadlineEvent {
    /// The user submitted a line. It still carries its trailing line feed,
    /// so callers can tell a submitted empty line (`"\n"`) apart from
    /// [`ReadlineEvent::Eof`].
    Line(String),

    /// End of input: Ctrl-D on an empty line, or the input stream ended.
    Eof,
}

/// What the loop should do after dispatching one byte.
#[derive(Debug, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Submitted,
    EndOfInput,
}

/// The line editor engine, over injected devices.
///
/// All state lives here: the logical buffer, the screen model, the history
/// ring, and the completion hook. One instance supports one read at a time
/// (`&mut self`); between the moment a byte is read and the moment its
/// action completes, no other byte is processed.
///
/// Real devices put the terminal into raw mode for the duration of each
/// [`Self::read_line`] call; mock devices skip the switch, so tests can run
/// the whole loop headless. For the tty-guarded entry point see
/// [`crate::LineEditor`].
#[allow(missing_debug_implementations)]
pub struct Readline {
    pub input: InputDevice,
    pub output: OutputDevice,
    prompt: Option<String>,
    buffer: LineBuffer,
    screen: LineState,
    history: History,
    completer: Option<Box<dyn Completer + Send>>,
    redraw_pending: bool,
    /// Width used when the devices are mocks (no terminal to query).
    /// Shared, so a scripted input source can change it between bytes.
    mock_width: SafeWidth,
}

impl Readline {
    #[must_use]
    pub fn new(input: InputDevice, output: OutputDevice, width: u16) -> Self {
        Self {
            input,
            output,
            prompt: None,
            buffer: LineBuffer::new(),
            screen: LineState::new(width),
            history: History::new(),
            completer: None,
            redraw_pending: false,
            mock_width: Arc::new(StdMutex::new(width)),
        }
    }

    pub fn set_prompt(&mut self, prompt: Option<String>) {
        self.prompt = prompt;
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn set_completer(&mut self, completer: Option<Box<dyn Completer + Send>>) {
        self.completer = completer;
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Write the history ring through the output device.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn history_print(&self) -> Result<(), ReadlineError> {
        let mut term = self.output.lock();
        self.history.print_to(&mut *term)?;
        Ok(())
    }

    /// The screen model, for assertions on the cursor after a read.
    #[must_use]
    pub fn screen(&self) -> &LineState {
        &self.screen
    }

    /// Change the width a mock-device editor pretends the terminal has. Has
    /// no effect with real devices, which query the terminal instead.
    ///
    /// # Panics
    ///
    /// Panics if the width lock is poisoned.
    pub fn set_mock_width(&self, width: u16) {
        *self.mock_width.lock().unwrap() = width;
    }

    /// Shared handle to the mock width: a scripted input source can store a
    /// new value through it between bytes to simulate a resize mid-read.
    #[must_use]
    pub fn mock_width_handle(&self) -> SafeWidth {
        self.mock_width.clone()
    }

    fn current_width(&self) -> u16 {
        if self.input.is_mock {
            *self.mock_width.lock().unwrap()
        } else {
            term::window_width()
        }
    }

    /// Read one line from the input device, editing interactively until the
    /// user submits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal attributes cannot be switched or an I/O
    /// operation on the terminal fails. The terminal is restored either way.
    pub fn read_line(&mut self) -> Result<ReadlineEvent, ReadlineError> {
        let _raw_mode = if self.input.is_mock {
            None
        } else {
            Some(term::RawMode::enable()?)
        };

        self.buffer.clear();
        self.history.reset_navigation();
        self.screen.reset(self.current_width());
        self.redraw_pending = true;

        loop {
            self.reconcile_resize();
            if self.redraw_pending {
                self.render()?;
                self.redraw_pending = false;
            }

            let byte = match self.input.next_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => return self.finish(ReadlineEvent::Eof),
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error.into()),
            };

            let control = self.dispatch(byte)?;
            self.output.lock().flush()?;
            match control {
                LoopControl::Continue => {}
                LoopControl::Submitted => {
                    let line = self.buffer.take_line();
                    return self.finish(ReadlineEvent::Line(line));
                }
                LoopControl::EndOfInput => return self.finish(ReadlineEvent::Eof),
            }
        }
    }

    /// Leave the line: when the cursor is not at column 1, emit a line feed
    /// so the next program output starts on its own row.
    fn finish(&mut self, event: ReadlineEvent) -> Result<ReadlineEvent, ReadlineError> {
        let mut term = self.output.lock();
        if self.screen.col() != 1 {
            term.write_all(b"\n")?;
        }
        term.flush()?;
        Ok(event)
    }

    /// Poll the window width and re-derive the cursor position if it
    /// changed. Runs before every read, so a resize produces exactly one
    /// redraw before the next byte is processed.
    fn reconcile_resize(&mut self) {
        let width = self.current_width();
        if width != self.screen.width() {
            self.screen.reconcile_resize(width);
            self.redraw_pending = true;
        }
    }

    fn render(&mut self) -> Result<(), ReadlineError> {
        let mut term = self.output.lock();
        self.screen.render(
            &mut *term,
            self.prompt.as_deref(),
            self.buffer.as_bytes(),
            self.buffer.cursor(),
        )?;
        term.flush()?;
        Ok(())
    }

    fn bell(&self) -> Result<(), ReadlineError> {
        let mut term = self.output.lock();
        term.write_all(&[BEL])?;
        term.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, byte: u8) -> Result<LoopControl, ReadlineError> {
        if byte == ESC {
            return match decode_escape_sequence(&mut self.input)? {
                Some(action) => self.apply(action),
                None => Ok(LoopControl::Continue),
            };
        }
        if let Some(action) = lookup_exact(&[byte]) {
            return self.apply(action);
        }
        if byte.is_ascii_graphic() || byte == b' ' {
            self.insert_byte(byte)?;
        }
        Ok(LoopControl::Continue)
    }

    /// Insert at the cursor. Appending at the end of the line writes the
    /// byte straight through instead of redrawing: it is the common case,
    /// and a full clear + redraw there causes visible flicker.
    fn insert_byte(&mut self, byte: u8) -> Result<(), ReadlineError> {
        self.buffer.insert(byte);
        if self.buffer.cursor() == self.buffer.len() {
            let mut term = self.output.lock();
            self.screen.write_tracked(&mut *term, &[byte])?;
        } else {
            self.redraw_pending = true;
        }
        Ok(())
    }

    fn cursor_left(&mut self, cells: usize) -> Result<(), ReadlineError> {
        let mut term = self.output.lock();
        self.screen.move_left_wrap(&mut *term, cells)?;
        Ok(())
    }

    fn cursor_right(&mut self, cells: usize) -> Result<(), ReadlineError> {
        let mut term = self.output.lock();
        self.screen.move_right_wrap(&mut *term, cells)?;
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn apply(&mut self, action: EditorAction) -> Result<LoopControl, ReadlineError> {
        match action {
            EditorAction::MoveLineStart => {
                let delta = self.buffer.cursor();
                self.buffer.set_cursor(0);
                self.cursor_left(delta)?;
            }
            EditorAction::MoveCursorLeft => {
                if self.buffer.cursor() == 0 {
                    self.bell()?;
                } else {
                    self.buffer.set_cursor(self.buffer.cursor() - 1);
                    self.cursor_left(1)?;
                }
            }
            EditorAction::EndOfTransmission => {
                if self.buffer.is_empty() {
                    return Ok(LoopControl::EndOfInput);
                }
                return self.apply(EditorAction::DeleteCharUnder);
            }
            EditorAction::MoveLineEnd => {
                let delta = self.buffer.len() - self.buffer.cursor();
                self.buffer.set_cursor(self.buffer.len());
                self.cursor_right(delta)?;
            }
            EditorAction::MoveCursorRight => {
                if self.buffer.cursor() == self.buffer.len() {
                    self.bell()?;
                } else {
                    self.buffer.set_cursor(self.buffer.cursor() + 1);
                    self.cursor_right(1)?;
                }
            }
            EditorAction::RingBell => self.bell()?,
            EditorAction::DeleteCharBefore => {
                if self.buffer.remove_before(1) {
                    self.redraw_pending = true;
                } else {
                    self.bell()?;
                }
            }
            EditorAction::Complete => self.complete()?,
            EditorAction::SubmitLine => {
                self.buffer.push_newline();
                // Past any trailing text, so the native line feed emitted by
                // `finish` lands after the whole footprint.
                let to_end = self.screen.rendered() - self.screen.flat();
                self.cursor_right(to_end)?;
                return Ok(LoopControl::Submitted);
            }
            EditorAction::KillToLineEnd => {
                let tail = self.buffer.len() - self.buffer.cursor();
                if self.buffer.remove_after(tail) {
                    self.redraw_pending = true;
                } else {
                    self.bell()?;
                }
            }
            EditorAction::ClearScreen => {
                {
                    let mut term = self.output.lock();
                    term.queue(Clear(ClearType::All))?;
                    term.queue(MoveTo(0, 0))?;
                }
                let width = self.screen.width();
                self.screen.reset(width);
                self.redraw_pending = true;
            }
            EditorAction::KillToLineStart => {
                let head = self.buffer.cursor();
                if self.buffer.remove_before(head) {
                    self.redraw_pending = true;
                } else {
                    self.bell()?;
                }
            }
            EditorAction::DeleteCharUnder => {
                if self.buffer.remove_after(1) {
                    self.redraw_pending = true;
                } else {
                    self.bell()?;
                }
            }
            EditorAction::HistoryPrevious => {
                let current = self.buffer.to_string_lossy();
                let loaded = self.history.navigate_prev(&current).map(String::from);
                match loaded {
                    Some(entry) => {
                        self.buffer.load(&entry);
                        self.redraw_pending = true;
                    }
                    None => self.bell()?,
                }
            }
            EditorAction::HistoryNext => {
                let loaded = self.history.navigate_next().map(String::from);
                match loaded {
                    Some(entry) => {
                        self.buffer.load(&entry);
                        self.redraw_pending = true;
                    }
                    None => self.bell()?,
                }
            }
            EditorAction::MoveWordRight => {
                let target = self.buffer.word_end_from_cursor();
                let delta = target - self.buffer.cursor();
                if delta == 0 {
                    self.bell()?;
                } else {
                    self.buffer.set_cursor(target);
                    self.cursor_right(delta)?;
                }
            }
            EditorAction::MoveWordLeft => {
                let target = self.buffer.word_start_from_cursor();
                let delta = self.buffer.cursor() - target;
                if delta == 0 {
                    self.bell()?;
                } else {
                    self.buffer.set_cursor(target);
                    self.cursor_left(delta)?;
                }
            }
            EditorAction::DeleteWordAfter => {
                let count = self.buffer.word_end_from_cursor() - self.buffer.cursor();
                if self.buffer.remove_after(count) {
                    self.redraw_pending = true;
                } else {
                    self.bell()?;
                }
            }
            EditorAction::DeleteWordBefore => {
                let count = self.buffer.cursor() - self.buffer.word_start_from_cursor();
                if self.buffer.remove_before(count) {
                    self.redraw_pending = true;
                } else {
                    self.bell()?;
                }
            }
        }
        Ok(LoopControl::Continue)
    }

    /// Resolve Tab: complete the word prefix left of the cursor.
    fn complete(&mut self) -> Result<(), ReadlineError> {
        let Some(completer) = self.completer.as_deref() else {
            return self.bell();
        };

        let start = self.buffer.word_start_from_cursor();
        let end = self.buffer.cursor();
        let line = self.buffer.to_string_lossy();
        let candidates = completer.complete(&line, start, end);
        if candidates.is_empty() {
            return self.bell();
        }

        let region_len = end - start;
        let prefix = longest_common_prefix(&candidates);
        if prefix.len() > region_len {
            let prefix = prefix.to_owned();
            self.buffer.remove_before(region_len);
            for byte in prefix.bytes() {
                self.buffer.insert(byte);
            }
            self.redraw_pending = true;
        } else if candidates.len() > 1 {
            // Nothing to extend: list the candidates below the footprint and
            // redraw the line on a fresh row.
            {
                let mut term = self.output.lock();
                let to_end = self.screen.rendered() - self.screen.flat();
                self.screen.move_right_wrap(&mut *term, to_end)?;
                term.write_all(b"\n")?;
                for candidate in &candidates {
                    term.write_all(candidate.as_bytes())?;
                    term.write_all(b"\n")?;
                }
            }
            let width = self.screen.width();
            self.screen.reset(width);
            self.redraw_pending = true;
        } else {
            self.bell()?;
        }
        Ok(())
    }
}
