// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

use cqasm_syntax::SourceLocation;
use std::ops::Range;
use std::path::{Path, PathBuf};

pub trait ErrorTrait {
    /// Return a message describing the error.
    fn message(&self) -> String;

    /// Return the location in the source associated with the error.
    fn location(&self) -> SourceLocation;

    /// Return `true` if this is a warning rather than an error.
    fn is_warning(&self) -> bool {
        false
    }
}

/// Source text that did not come from a file, for example a literal string in a test.
/// `fake_file_path` is only used in printed diagnostics.
#[derive(Clone, Debug)]
pub struct SourceString {
    source: String,
    fake_file_path: PathBuf,
}

impl SourceString {
    pub fn new<T: ToString, P: AsRef<Path>>(source: T, fake_file_path: P) -> SourceString {
        SourceString {
            source: source.to_string(),
            fake_file_path: fake_file_path.as_ref().to_path_buf(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn fake_file_path(&self) -> &PathBuf {
        &self.fake_file_path
    }
}

/// Convert a one-based line and column into a character span of length one,
/// which is what `ariadne` labels want. Locations past the end of the text are
/// clamped to the last character.
pub(crate) fn location_to_span(location: SourceLocation, source: &str) -> Range<usize> {
    let num_chars = source.chars().count();
    if num_chars == 0 {
        return 0..0;
    }
    let mut offset = 0;
    for (line_number, line) in source.split_inclusive('\n').enumerate() {
        let line_len = line.chars().count();
        if line_number + 1 == location.line() as usize {
            let column = (location.column().max(1) - 1) as usize;
            offset += column.min(line_len.saturating_sub(1));
            break;
        }
        offset += line_len;
    }
    let start = offset.min(num_chars - 1);
    start..start + 1
}

#[cfg(test)]
mod tests {
    use super::location_to_span;
    use cqasm_syntax::SourceLocation;

    #[test]
    fn span_of_second_line() {
        let source = "version 1.0\nqubits 2\n";
        assert_eq!(location_to_span(SourceLocation::new(2, 8), source), 19..20);
    }

    #[test]
    fn span_clamped_to_end() {
        let source = "version 1.0";
        assert_eq!(location_to_span(SourceLocation::new(7, 1), source), 10..11);
        assert_eq!(location_to_span(SourceLocation::new(1, 1), ""), 0..0);
    }
}
