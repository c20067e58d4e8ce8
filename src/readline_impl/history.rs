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

//! Fixed-capacity ring of submitted lines, plus one scratch slot that
//! preserves the in-progress line while the user walks the ring.

use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

/// Default number of committed entries the ring holds.
pub const HISTORY_SIZE_MAX: usize = 4;

/// Ring of the last `capacity` submitted lines.
///
/// `slots` holds `capacity + 1` entries: indices `0..capacity` form the ring
/// of committed entries, and index `capacity` is the scratch slot for the
/// line under edit during navigation. All slots are allocated once and
/// reused; [`History::clear`] empties them without freeing.
///
/// `nav` is the navigation cursor; the value `capacity` designates the
/// scratch slot, meaning "not navigating".
#[derive(Debug)]
pub struct History {
    slots: Vec<String>,
    capacity: usize,
    start: usize,
    end: usize,
    len: usize,
    nav: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_SIZE_MAX)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![String::new(); capacity + 1],
            capacity,
            start: 0,
            end: capacity - 1,
            len: 0,
            nav: capacity,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an entry, dropping the oldest one when the ring is full. A
    /// single trailing line feed is stripped, so submitted lines can be
    /// added as returned. No deduplication.
    pub fn add(&mut self, entry: &str) {
        let entry = entry.strip_suffix('\n').unwrap_or(entry);
        let slot = (self.end + 1) % self.capacity;
        self.slots[slot].clear();
        self.slots[slot].push_str(entry);
        if self.len < self.capacity {
            self.len += 1;
        } else {
            self.start = (self.start + 1) % self.capacity;
        }
        self.end = slot;
    }

    /// Empty every slot and reset the ring pointers.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
        self.start = 0;
        self.end = self.capacity - 1;
        self.len = 0;
        self.nav = self.capacity;
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        (0..self.len).map(move |offset| self.slots[(self.start + offset) % self.capacity].as_str())
    }

    /// Copy of the `index`-th entry, 1-based oldest first.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<String> {
        if index == 0 || index > self.len {
            return None;
        }
        Some(self.slots[(self.start + index - 1) % self.capacity].clone())
    }

    /// Write the entries oldest first, numbered from 1.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn print_to(&self, term: &mut dyn Write) -> io::Result<()> {
        for (offset, entry) in self.iter().enumerate() {
            writeln!(term, "    {}  {}", offset + 1, entry)?;
        }
        term.flush()
    }

    /// Leave navigation mode. Called at the top of every read.
    pub fn reset_navigation(&mut self) {
        self.nav = self.capacity;
    }

    /// Step to an older entry. On the first step away from the scratch slot,
    /// `current_line` is saved there so [`History::navigate_next`] can
    /// restore it. Returns `None` (caller rings the bell) when there is no
    /// older entry.
    pub fn navigate_prev(&mut self, current_line: &str) -> Option<&str> {
        if self.len == 0 || self.nav == self.start {
            return None;
        }
        if self.nav == self.capacity {
            let scratch = self.capacity;
            self.slots[scratch].clear();
            self.slots[scratch].push_str(current_line);
            self.nav = self.end;
        } else {
            self.nav = (self.nav + self.capacity - 1) % self.capacity;
        }
        Some(self.slots[self.nav].as_str())
    }

    /// Step to a newer entry, ending with the preserved scratch line.
    /// Returns `None` (caller rings the bell) when not navigating.
    pub fn navigate_next(&mut self) -> Option<&str> {
        if self.len == 0 || self.nav == self.capacity {
            return None;
        }
        if self.nav == self.end {
            self.nav = self.capacity;
        } else {
            self.nav = (self.nav + 1) % self.capacity;
        }
        Some(self.slots[self.nav].as_str())
    }

    /// Replace the ring with the lines of a file, one entry per line. When
    /// the file holds more lines than the ring, the most recent (last) ones
    /// win.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read; the ring is
    /// cleared but remains usable.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        let reader = BufReader::new(File::open(path)?);
        self.clear();
        let mut total = 0usize;
        for line in reader.lines() {
            self.add(&line?);
            total += 1;
        }
        if total > self.capacity {
            tracing::debug!(
                total,
                capacity = self.capacity,
                "history file longer than the ring, kept the most recent entries"
            );
        }
        Ok(())
    }

    /// Write the entries oldest first, one per line. `append = false`
    /// replaces the file, `append = true` extends it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>, append: bool) -> io::Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        let mut writer = BufWriter::new(file);
        for entry in self.iter() {
            writeln!(writer, "{entry}")?;
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled(entries: &[&str]) -> History {
        let mut history = History::new();
        for entry in entries {
            history.add(entry);
        }
        history
    }

    #[test]
    fn test_add_strips_one_trailing_newline() {
        let history = filled(&["one\n"]);
        assert_eq!(history.get(1).as_deref(), Some("one"));
    }

    #[test]
    fn test_ring_keeps_the_last_capacity_entries_in_order() {
        let history = filled(&["one", "two", "three", "four", "five"]);
        assert_eq!(history.len(), HISTORY_SIZE_MAX);
        let entries: Vec<&str> = history.iter().collect();
        assert_eq!(entries, vec!["two", "three", "four", "five"]);
    }

    #[test]
    fn test_get_is_one_based_over_ring_order() {
        let history = filled(&["one", "two", "three", "four", "five"]);
        assert_eq!(history.get(0), None);
        assert_eq!(history.get(1).as_deref(), Some("two"));
        assert_eq!(history.get(4).as_deref(), Some("five"));
        assert_eq!(history.get(5), None);
    }

    #[test]
    fn test_navigation_walks_back_and_stops_at_the_oldest() {
        let mut history = filled(&["one", "two", "three", "four", "five"]);
        assert_eq!(history.navigate_prev(""), Some("five"));
        assert_eq!(history.navigate_prev(""), Some("four"));
        assert_eq!(history.navigate_prev(""), Some("three"));
        assert_eq!(history.navigate_prev(""), Some("two"));
        assert_eq!(history.navigate_prev(""), None);
    }

    #[test]
    fn test_navigation_round_trip_restores_the_scratch_line() {
        let mut history = filled(&["one", "two"]);
        assert_eq!(history.navigate_prev("draft"), Some("two"));
        assert_eq!(history.navigate_prev("ignored"), Some("one"));
        assert_eq!(history.navigate_next(), Some("two"));
        assert_eq!(history.navigate_next(), Some("draft"));
        // Back on the scratch slot: not navigating any more.
        assert_eq!(history.navigate_next(), None);
    }

    #[test]
    fn test_navigation_on_empty_ring_is_rejected() {
        let mut history = History::new();
        assert_eq!(history.navigate_prev("draft"), None);
        assert_eq!(history.navigate_next(), None);
    }

    #[test]
    fn test_reset_navigation_leaves_navigation_mode() {
        let mut history = filled(&["one", "two"]);
        assert_eq!(history.navigate_prev(""), Some("two"));
        history.reset_navigation();
        assert_eq!(history.navigate_next(), None);
        assert_eq!(history.navigate_prev(""), Some("two"));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut history = filled(&["one", "two", "three", "four", "five"]);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.get(1), None);
        let mut after = History::new();
        after.add("fresh");
        history.add("fresh");
        assert_eq!(
            history.iter().collect::<Vec<_>>(),
            after.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_print_numbers_entries_from_one() {
        let history = filled(&["alpha", "beta"]);
        let mut out: Vec<u8> = Vec::new();
        history.print_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "    1  alpha\n    2  beta\n"
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        let history = filled(&["one", "two", "three"]);
        history.save_to_file(&path, false).unwrap();

        let mut loaded = History::new();
        loaded.load_from_file(&path).unwrap();
        assert_eq!(
            loaded.iter().collect::<Vec<_>>(),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn test_load_keeps_the_last_entries_of_an_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        std::fs::write(&path, "a\nb\nc\nd\ne\nf\n").unwrap();

        let mut history = History::new();
        history.load_from_file(&path).unwrap();
        assert_eq!(
            history.iter().collect::<Vec<_>>(),
            vec!["c", "d", "e", "f"]
        );
    }

    #[test]
    fn test_save_append_extends_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        filled(&["one"]).save_to_file(&path, false).unwrap();
        filled(&["two"]).save_to_file(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");

        filled(&["three"]).save_to_file(&path, false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "three\n");
    }

    #[test]
    fn test_load_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        std::fs::write(&path, "from-file\n").unwrap();

        let mut history = filled(&["stale"]);
        history.load_from_file(&path).unwrap();
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["from-file"]);
    }
}
