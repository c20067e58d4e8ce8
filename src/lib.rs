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

//! The `rawline` library reads one logical line at a time from the controlling
//! terminal, replacing canonical line-buffered input with a byte-by-byte
//! raw-mode loop that maintains its own view of the rendered line and the
//! logical cursor. On top of that loop it provides inline editing, word-wise
//! motion and deletion, cursor movement that stays consistent across wrapped
//! rows and live terminal resizes, a bounded command-history ring, and a
//! pluggable tab-completion hook.
//!
//! # Why use this crate
//!
//! [`std::io::BufRead::read_line`] hands the whole editing experience to the
//! terminal driver: no cursor keys, no history, no completion, and no control
//! over redraws when the line wraps. `rawline` owns the terminal for the
//! duration of one read and gives you the classic line-editor feel without
//! pulling in an async runtime or a TUI framework. It is single-threaded and
//! blocking by design: the read suspends only inside the one-byte terminal
//! read, and every side effect happens in dispatch order.
//!
//! # Input editing behavior
//!
//! While entering text, the user can edit and navigate through the current
//! input line with the following key bindings:
//!
//! - Left, Right: Move cursor left/right.
//! - Up, Down: Scroll through input history.
//! - Home / Ctrl-A: Jump to the start of the line.
//! - End / Ctrl-E: Jump to the end of the line.
//! - Ctrl-Right / Meta-F: Move to the end of the next word.
//! - Ctrl-Left / Meta-B: Move to the start of the previous word.
//! - Backspace / Ctrl-H: Erase the byte before the cursor.
//! - Delete / Ctrl-D (on a non-empty line): Erase the byte under the cursor.
//! - Ctrl-Delete / Meta-D: Erase through the end of the next word.
//! - Meta-Backspace: Erase back to the start of the previous word.
//! - Ctrl-U: Erase everything before the cursor.
//! - Ctrl-K: Erase everything after the cursor.
//! - Ctrl-L: Clear the screen and redraw the line.
//! - Tab: Invoke the installed [`Completer`], if any.
//! - Enter: Submit the line.
//! - Ctrl-D on an empty line: End the read ([`ReadlineEvent::Eof`]).
//!
//! # How to use this crate
//!
//! ```no_run
//! use rawline::{LineEditor, ReadlineEvent};
//!
//! fn main() -> Result<(), rawline::ReadlineError> {
//!     let mut editor = LineEditor::try_new()?;
//!     editor.set_prompt("> ");
//!     while let ReadlineEvent::Line(line) = editor.read_line()? {
//!         // `line` still carries its trailing newline.
//!         print!("read: {line}");
//!         editor.history_add(&line);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`LineEditor::try_new`] refuses to operate unless both stdin and stdout
//! are terminals. For tests and custom transports, construct the editor over
//! injected devices with [`LineEditor::with_devices`]; mock devices skip the
//! raw-mode switch entirely, so the whole edit loop can run headless against
//! scripted input bytes (see [`test_fixtures`]).
//!
//! # Limitations
//!
//! - Every byte occupies one terminal cell: no grapheme clusters, wide CJK,
//!   combining marks, or bidirectional text.
//! - The prompt's cell width is taken as its byte length. Prompts containing
//!   escape sequences render correctly only when those escapes cause zero net
//!   cursor movement (SGR coloring does; cursor movement does not).
//! - One line at a time; no multi-line editing.

// Attach sources.
pub mod public_api;
pub mod readline_impl;
pub mod test_fixtures;

// Re-export the public API.
pub use public_api::*;
pub use readline_impl::*;

// Type aliases.
pub type StdMutex<T> = std::sync::Mutex<T>;

pub type SendRawTerminal = dyn std::io::Write + Send;
pub type SafeRawTerminal = std::sync::Arc<StdMutex<SendRawTerminal>>;

/// Shared terminal width used when the devices are mocks; tests store a new
/// value through it mid-read to simulate a resize.
pub type SafeWidth = std::sync::Arc<StdMutex<u16>>;
