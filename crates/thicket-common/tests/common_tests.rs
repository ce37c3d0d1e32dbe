//! Tests for the shared position and warning utilities.

use thicket_common::position::{LineColumn, LineIndex};
use thicket_common::warning::{clear_warnings, warn_once, was_warned};

// ========== LineIndex ==========

#[test]
fn test_first_byte_is_line_one_column_one() {
    let index = LineIndex::new("abc");
    assert_eq!(index.locate(0), LineColumn { line: 1, column: 1 });
}

#[test]
fn test_offsets_after_newlines() {
    let index = LineIndex::new("ab\ncd\n\nef");
    assert_eq!(index.line_count(), 4);
    assert_eq!(index.locate(3), LineColumn { line: 2, column: 1 });
    assert_eq!(index.locate(4), LineColumn { line: 2, column: 2 });
    assert_eq!(index.locate(6), LineColumn { line: 3, column: 1 });
    assert_eq!(index.locate(8), LineColumn { line: 4, column: 2 });
}

#[test]
fn test_columns_count_characters() {
    // "é" is two bytes; the "x" after it is the second character.
    let index = LineIndex::new("éx");
    assert_eq!(index.locate(2), LineColumn { line: 1, column: 2 });
}

#[test]
fn test_offset_past_end_clamps() {
    let index = LineIndex::new("ab");
    assert_eq!(index.locate(100), LineColumn { line: 1, column: 3 });
}

// ========== warn_once ==========

// One test, because the warning set is process-global and tests run in parallel.
#[test]
fn test_warn_once_records_and_clears() {
    warn_once("Test", "common_tests unique message");
    assert!(was_warned("Test", "common_tests unique message"));
    assert!(!was_warned("Test", "never emitted"));

    clear_warnings();
    assert!(!was_warned("Test", "common_tests unique message"));
}
