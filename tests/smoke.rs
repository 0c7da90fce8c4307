//! Integration smoke tests for `academic_records`

use academic_records::core::grading::{letter_from_numeric, LetterGrade};
use academic_records::get_version;

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}

#[test]
fn grading_is_reachable_from_the_crate_root() {
    assert_eq!(letter_from_numeric(Some(95.0)), Some(LetterGrade::A));
}
