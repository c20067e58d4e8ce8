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

//! Input and output devices for the editor.
//!
//! These are the dependency-injection seams of the crate: the real devices
//! wrap stdin and stdout, while the mock constructors wrap a scripted byte
//! source and a capturing buffer so the whole edit loop can run headless in
//! tests. Mock devices also tell the loop to skip the raw-mode switch.

use std::{
    io::{self, Cursor, Read},
    sync::Arc,
};

use crate::{test_fixtures::StdoutMock, SafeRawTerminal, SendRawTerminal, StdMutex};

/// Byte source the editor reads from, one byte per call.
#[allow(missing_debug_implementations)]
pub struct InputDevice {
    pub resource: Box<dyn Read + Send>,
    pub is_mock: bool,
}

impl InputDevice {
    #[must_use]
    pub fn new_stdin() -> Self {
        Self {
            resource: Box::new(io::stdin()),
            is_mock: false,
        }
    }

    /// A device that replays the given bytes, then reports end of input.
    #[must_use]
    pub fn new_mock(bytes: Vec<u8>) -> Self {
        Self {
            resource: Box::new(Cursor::new(bytes)),
            is_mock: true,
        }
    }

    /// Read exactly one byte. `Ok(None)` means end of input.
    ///
    /// Interrupted reads are surfaced to the caller (the main loop treats
    /// them as retryable; the escape decoder retries in place).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.resource.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

/// Terminal the editor writes to.
///
/// - It is safe to clone; clones share the underlying resource.
/// - To write to it, lock it first; see [`Self::lock()`].
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct OutputDevice {
    pub resource: SafeRawTerminal,
    pub is_mock: bool,
}

impl Default for OutputDevice {
    fn default() -> Self {
        Self::new_stdout()
    }
}

impl OutputDevice {
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            resource: Arc::new(StdMutex::new(io::stdout())),
            is_mock: false,
        }
    }

    /// A device that captures everything written to it; assert on the
    /// contents through the [`StdoutMock`] handle.
    #[must_use]
    pub fn new_mock(mock: StdoutMock) -> Self {
        Self {
            resource: Arc::new(StdMutex::new(mock)),
            is_mock: true,
        }
    }

    /// Locks the output device for writing.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (a thread panicked while holding the
    /// lock).
    pub fn lock(&self) -> std::sync::MutexGuard<'_, SendRawTerminal> {
        self.resource.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mock_input_replays_bytes_then_eof() {
        let mut input = InputDevice::new_mock(b"ab".to_vec());
        assert_eq!(input.next_byte().unwrap(), Some(b'a'));
        assert_eq!(input.next_byte().unwrap(), Some(b'b'));
        assert_eq!(input.next_byte().unwrap(), None);
        assert_eq!(input.next_byte().unwrap(), None);
    }

    #[test]
    fn test_mock_output_captures_writes() {
        let mock = StdoutMock::default();
        let device = OutputDevice::new_mock(mock.clone());
        {
            let mut term = device.lock();
            term.write_all(b"hello").unwrap();
            term.flush().unwrap();
        }
        assert_eq!(mock.get_copy_of_buffer_as_string(), "hello");
        assert!(device.is_mock);
    }
}
