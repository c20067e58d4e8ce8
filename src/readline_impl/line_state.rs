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

//! Screen model for the prompt + input footprint.
//!
//! The cursor's physical position is tracked as a 1-based `(row, col)` pair
//! relative to the cell where the prompt started, and every primitive keeps
//! it consistent with the flat position `F = (row-1)*width + (col-1)`. `F`
//! is width-independent, which makes a terminal resize a single
//! re-derivation of `(row, col)` instead of a re-layout.
//!
//! Terminals do not reliably advance to the next row after the last cell of
//! a row is written ("phantom last column"); whenever a tracked write ends
//! exactly on a row boundary, a space is emitted to force the physical wrap
//! and the column is re-set.

use std::io::{self, Write};

use crossterm::{
    cursor::{MoveDown, MoveToColumn, MoveUp},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

#[derive(Debug)]
pub struct LineState {
    /// Cells per row, refreshed on resize. Never zero.
    width: u16,
    /// 1-based, relative to the start of the prompt.
    row: u16,
    /// 1-based.
    col: u16,
    /// Count of cells currently drawn: prompt + buffer contents.
    rendered: usize,
}

impl LineState {
    #[must_use]
    pub fn new(width: u16) -> Self {
        Self {
            width: width.max(1),
            row: 1,
            col: 1,
            rendered: 0,
        }
    }

    /// Reset to the origin with the given width, as at the top of a read.
    pub fn reset(&mut self, width: u16) {
        self.width = width.max(1);
        self.row = 1;
        self.col = 1;
        self.rendered = 0;
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn row(&self) -> u16 {
        self.row
    }

    #[must_use]
    pub fn col(&self) -> u16 {
        self.col
    }

    #[must_use]
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Flat cursor position `(row-1)*width + (col-1)`.
    #[must_use]
    pub fn flat(&self) -> usize {
        (self.row as usize - 1) * self.width as usize + (self.col as usize - 1)
    }

    fn position_at(width: u16, flat: usize) -> (u16, u16) {
        let width = width as usize;
        ((flat / width + 1) as u16, (flat % width + 1) as u16)
    }

    fn set_flat(&mut self, flat: usize) {
        let (row, col) = Self::position_at(self.width, flat);
        self.row = row;
        self.col = col;
    }

    /// Move the cursor left by `cells`, wrapping across rows.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn move_left_wrap(&mut self, term: &mut dyn Write, cells: usize) -> io::Result<()> {
        if cells == 0 {
            return Ok(());
        }
        let target = self.flat().saturating_sub(cells);
        let (row, col) = Self::position_at(self.width, target);
        if row < self.row {
            term.queue(MoveUp(self.row - row))?;
        }
        term.queue(MoveToColumn(col - 1))?;
        self.row = row;
        self.col = col;
        Ok(())
    }

    /// Move the cursor right by `cells`, wrapping across rows.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn move_right_wrap(&mut self, term: &mut dyn Write, cells: usize) -> io::Result<()> {
        if cells == 0 {
            return Ok(());
        }
        let target = self.flat() + cells;
        let (row, col) = Self::position_at(self.width, target);
        if row > self.row {
            term.queue(MoveDown(row - self.row))?;
        }
        term.queue(MoveToColumn(col - 1))?;
        self.row = row;
        self.col = col;
        Ok(())
    }

    /// Blank every row the footprint covers and return to the origin.
    ///
    /// Moves to the end of the rendered region first, then clears row by
    /// row moving upward. Postcondition: `row == col == 1`, `rendered == 0`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn clear_footprint(&mut self, term: &mut dyn Write) -> io::Result<()> {
        let to_end = self.rendered - self.flat();
        self.move_right_wrap(term, to_end)?;

        let mut rows = self.rendered / self.width as usize + 1;
        loop {
            term.queue(Clear(ClearType::CurrentLine))?;
            term.write_all(b"\r")?;
            rows -= 1;
            if rows == 0 {
                break;
            }
            term.queue(MoveUp(1))?;
        }

        self.row = 1;
        self.col = 1;
        self.rendered = 0;
        Ok(())
    }

    /// Write `bytes` at the end of the rendered region, tracking the cursor
    /// and the footprint. Only valid while the cursor sits at the end of the
    /// rendered region (`flat() == rendered`).
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn write_tracked(&mut self, term: &mut dyn Write, bytes: &[u8]) -> io::Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        term.write_all(bytes)?;
        self.rendered += bytes.len();
        let flat = self.flat() + bytes.len();
        self.set_flat(flat);
        if self.col == 1 {
            // The write ended on a row boundary: force the physical wrap.
            term.write_all(b" ")?;
            term.queue(MoveToColumn(0))?;
        }
        Ok(())
    }

    /// Clear the footprint and re-render prompt + line, leaving the cursor
    /// at the logical position `cursor` (a byte index into `line`).
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn render(
        &mut self,
        term: &mut dyn Write,
        prompt: Option<&str>,
        line: &[u8],
        cursor: usize,
    ) -> io::Result<()> {
        self.clear_footprint(term)?;
        if let Some(prompt) = prompt {
            self.write_tracked(term, prompt.as_bytes())?;
        }
        self.write_tracked(term, line)?;
        self.move_left_wrap(term, line.len() - cursor)?;
        Ok(())
    }

    /// Re-derive `(row, col)` from the current flat position under a new
    /// width. The caller is responsible for requesting a full redraw.
    pub fn reconcile_resize(&mut self, new_width: u16) {
        let flat = self.flat();
        self.width = new_width.max(1);
        self.set_flat(flat);
    }
}
