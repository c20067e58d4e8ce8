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

//! The caller-facing editor, guarding the engine behind a tty check.

use std::path::Path;

use crate::{
    term, Completer, History, InputDevice, OutputDevice, Readline, ReadlineError, ReadlineEvent,
};

/// Interactive line editor over stdin/stdout. Example of `prompt` is `"> "`.
///
/// This is the entry point for most programs: construct once with
/// [`LineEditor::try_new`], then call [`LineEditor::read_line`] in a loop.
/// Each call owns the terminal until the user submits the line or ends the
/// input, and restores the terminal attributes on the way out.
///
/// For headless use (tests, custom transports), construct over injected
/// devices with [`LineEditor::with_devices`].
#[allow(missing_debug_implementations)]
pub struct LineEditor {
    pub readline: Readline,
}

impl LineEditor {
    /// Create an editor over the real stdin and stdout.
    ///
    /// # Errors
    ///
    /// Returns [`ReadlineError::NotInteractive`] unless both stdin and
    /// stdout are terminals — with either stream piped there is no terminal
    /// to edit on.
    pub fn try_new() -> Result<Self, ReadlineError> {
        if !term::is_interactive() {
            return Err(ReadlineError::NotInteractive);
        }
        Ok(Self {
            readline: Readline::new(
                InputDevice::new_stdin(),
                OutputDevice::new_stdout(),
                term::window_width(),
            ),
        })
    }

    /// Create an editor over injected devices, skipping the tty checks.
    /// Mock devices also skip the raw-mode switch, so the edit loop can run
    /// headless; `width` stands in for the terminal width.
    #[must_use]
    pub fn with_devices(input: InputDevice, output: OutputDevice, width: u16) -> Self {
        Self {
            readline: Readline::new(input, output, width),
        }
    }

    /// Read one line interactively.
    ///
    /// Returns [`ReadlineEvent::Line`] with the submitted line — trailing
    /// line feed included — or [`ReadlineEvent::Eof`] for Ctrl-D on an empty
    /// line or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be switched into or out of
    /// raw mode, or an I/O operation on it fails.
    pub fn read_line(&mut self) -> Result<ReadlineEvent, ReadlineError> {
        self.readline.read_line()
    }

    /// Set the prompt drawn before the editable input. Its cell width is
    /// taken as its byte length: escapes with zero net cursor movement (SGR
    /// coloring) render fine, anything else will skew the cursor math.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.readline.set_prompt(Some(prompt.into()));
    }

    /// Remove the prompt.
    pub fn clear_prompt(&mut self) {
        self.readline.set_prompt(None);
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.readline.prompt()
    }

    /// Install or remove the tab-completion hook.
    pub fn set_completer(&mut self, completer: Option<Box<dyn Completer + Send>>) {
        self.readline.set_completer(completer);
    }

    /// Append a line to the history ring. A single trailing line feed is
    /// stripped, so lines can be added exactly as [`Self::read_line`]
    /// returned them.
    pub fn history_add(&mut self, line: &str) {
        self.readline.history_mut().add(line);
    }

    /// Empty the history ring.
    pub fn history_clear(&mut self) {
        self.readline.history_mut().clear();
    }

    /// Number of entries currently in the ring.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.readline.history().len()
    }

    /// Copy of the `index`-th history entry, 1-based oldest first.
    #[must_use]
    pub fn history_get(&self, index: usize) -> Option<String> {
        self.readline.history().get(index)
    }

    /// Write the numbered history entries to the editor's output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn history_print(&self) -> Result<(), ReadlineError> {
        self.readline.history_print()
    }

    /// Replace the history ring with the lines of `path`; when the file has
    /// more lines than the ring holds, the most recent ones win.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn history_load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), ReadlineError> {
        self.readline.history_mut().load_from_file(path)?;
        Ok(())
    }

    /// Write the history ring to `path`, one entry per line; `append`
    /// extends the file instead of replacing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn history_save_to_file(
        &self,
        path: impl AsRef<Path>,
        append: bool,
    ) -> Result<(), ReadlineError> {
        self.readline.history().save_to_file(path, append)?;
        Ok(())
    }

    /// Direct access to the ring, for callers that need more than the
    /// convenience methods.
    #[must_use]
    pub fn history(&self) -> &History {
        self.readline.history()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::StdoutMock;
    use pretty_assertions::assert_eq;

    fn headless(script: &[u8]) -> (LineEditor, StdoutMock) {
        let mock = StdoutMock::default();
        let editor = LineEditor::with_devices(
            InputDevice::new_mock(script.to_vec()),
            OutputDevice::new_mock(mock.clone()),
            80,
        );
        (editor, mock)
    }

    #[test]
    fn test_read_add_recall_cycle() {
        let (mut editor, _mock) = headless(b"first\n\x1b[A\n");
        editor.set_prompt("> ");

        let ReadlineEvent::Line(line) = editor.read_line().unwrap() else {
            panic!("expected a line");
        };
        assert_eq!(line, "first\n");
        editor.history_add(&line);

        // Up recalls the line just added, without its newline.
        assert_eq!(
            editor.read_line().unwrap(),
            ReadlineEvent::Line("first\n".into())
        );
        assert_eq!(editor.history_len(), 1);
        assert_eq!(editor.history_get(1).as_deref(), Some("first"));
    }

    #[test]
    fn test_prompt_can_be_set_and_cleared() {
        let (mut editor, _mock) = headless(b"");
        editor.set_prompt("db> ");
        assert_eq!(editor.prompt(), Some("db> "));
        editor.clear_prompt();
        assert_eq!(editor.prompt(), None);
    }

    #[test]
    fn test_history_persistence_through_the_editor_surface() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        let (mut editor, _mock) = headless(b"");
        editor.history_add("one");
        editor.history_add("two");
        editor.history_save_to_file(&path, false).unwrap();

        let (mut editor, _mock) = headless(b"");
        editor.history_load_from_file(&path).unwrap();
        assert_eq!(editor.history_len(), 2);
        assert_eq!(editor.history_get(2).as_deref(), Some("two"));
    }
}
