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

//! Caller-supplied completion hook.

/// Produces completion candidates for a region of the current line.
///
/// Tab invokes the hook with the word prefix left of the cursor:
/// `line[start..end]` is the text being completed, with `end` at the cursor.
/// Candidates should be full replacements for that region, sorted.
pub trait Completer: Send {
    fn complete(&self, line: &str, start: usize, end: usize) -> Vec<String>;
}

/// Longest common prefix of the candidate set, cut to a char boundary.
#[must_use]
pub(crate) fn longest_common_prefix(candidates: &[String]) -> &str {
    let Some(first) = candidates.first() else {
        return "";
    };
    let mut end = first.len();
    for candidate in &candidates[1..] {
        let common = first
            .bytes()
            .zip(candidate.bytes())
            .take_while(|(a, b)| a == b)
            .count();
        end = end.min(common);
    }
    while !first.is_char_boundary(end) {
        end -= 1;
    }
    &first[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn owned(candidates: &[&str]) -> Vec<String> {
        candidates.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_common_prefix_of_related_words() {
        assert_eq!(
            longest_common_prefix(&owned(&["history", "histogram", "historic"])),
            "histo"
        );
    }

    #[test]
    fn test_single_candidate_is_its_own_prefix() {
        assert_eq!(longest_common_prefix(&owned(&["exit"])), "exit");
    }

    #[test]
    fn test_disjoint_candidates_share_nothing() {
        assert_eq!(longest_common_prefix(&owned(&["abc", "xyz"])), "");
    }

    #[test]
    fn test_empty_candidate_set() {
        assert_eq!(longest_common_prefix(&[]), "");
    }

    #[test]
    fn test_prefix_is_cut_to_a_char_boundary() {
        // 'é' and 'à' share the first byte of their two-byte encodings; the
        // shared prefix must not split a char.
        assert_eq!(longest_common_prefix(&owned(&["né", "nà"])), "n");
    }
}
