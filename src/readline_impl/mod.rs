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

// Attach sources.
pub mod bindings;
pub mod completion;
pub mod devices;
pub mod history;
pub mod line_buffer;
pub mod line_state;
pub mod readline;
pub mod term;

// Re-export.
pub use bindings::*;
pub use completion::*;
pub use devices::*;
pub use history::*;
pub use line_buffer::*;
pub use line_state::*;
pub use readline::*;
pub use term::*;
