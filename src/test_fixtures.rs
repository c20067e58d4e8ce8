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

//! Reusable fixtures for testing the editor end to end: pair a
//! [`StdoutMock`] with [`crate::InputDevice::new_mock`] and the whole edit
//! loop runs headless against scripted input bytes.

use std::{
    io::{Result, Write},
    sync::Arc,
};

use crate::StdMutex;

/// Capturing stand-in for stdout.
///
/// You can safely clone this struct; the inner buffer is shared, only the
/// [`Arc`] is cloned. Hand one clone to
/// [`crate::OutputDevice::new_mock`] and keep the other for assertions.
#[derive(Clone, Debug, Default)]
pub struct StdoutMock {
    pub buffer: Arc<StdMutex<Vec<u8>>>,
}

impl StdoutMock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned (a thread panicked while holding it).
    #[must_use]
    pub fn get_copy_of_buffer(&self) -> Vec<u8> {
        self.buffer.lock().unwrap().clone()
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned, or the captured bytes are not UTF-8.
    #[must_use]
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        let buffer_data = self.buffer.lock().unwrap();
        String::from_utf8(buffer_data.clone()).expect("utf8")
    }

    /// Captured output with ANSI escape sequences stripped: what the user
    /// would actually see.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned, or the captured bytes are not UTF-8.
    #[must_use]
    pub fn get_copy_of_buffer_as_string_strip_ansi(&self) -> String {
        let buffer_data = self.buffer.lock().unwrap();
        let stripped = strip_ansi_escapes::strip(buffer_data.clone());
        String::from_utf8(stripped).expect("utf8")
    }
}

impl Write for StdoutMock {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stdout_mock_clones_share_one_buffer() {
        let mut stdout_mock = StdoutMock::default();
        let stdout_mock_clone = stdout_mock.clone();

        stdout_mock.write_all(b"hello world").unwrap();
        stdout_mock.flush().unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "hello world");
        assert_eq!(
            stdout_mock_clone.get_copy_of_buffer_as_string(),
            "hello world"
        );
    }

    #[test]
    fn test_stdout_mock_strips_ansi_escapes() {
        let mut stdout_mock = StdoutMock::default();
        stdout_mock.write_all(b"\x1b[2K\rprompt \x1b[1Gtext").unwrap();
        // Escape sequences and C0 controls other than line feeds are gone.
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            "prompt text"
        );
    }
}
