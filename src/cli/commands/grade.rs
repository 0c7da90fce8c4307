//! Grade command handler

use academic_records::core::grading::{grade_points, letter_from_numeric, validate_score};

/// Print the letter and grade points for a score
pub fn run(score: f64) {
    if let Err(e) = validate_score(score) {
        super::fail(&format!("✗ {e}"));
    }

    let letter = letter_from_numeric(Some(score));
    let points = grade_points(letter);
    match letter {
        Some(letter) => {
            let approving = if letter.is_approving() { "approving" } else { "not approving" };
            println!("{score} → {letter} ({points:.1} points, {approving})");
        }
        None => println!("{score} → --"),
    }
}
