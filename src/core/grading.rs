//! Grade calculation: letter grades, grade points and weighted averages
//!
//! Letter thresholds are fixed and evaluated top-down, first match wins:
//!
//! | Score            | Letter |
//! |------------------|--------|
//! | `> 90`           | A      |
//! | `80 ..= 90`      | B      |
//! | `70 .. 80`       | C      |
//! | `< 70`           | F      |
//!
//! A score of exactly 90 is a B. No score ever produces a D even though the
//! grade-point table carries one; whether D is a missing band or dead weight
//! is unresolved, so the table and thresholds are kept as they are.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Display marker for a value that has not been graded yet.
pub const UNGRADED: &str = "--";

/// Highest score accepted by the write path.
pub const MAX_SCORE: f64 = 100.0;

/// Letter grade with its fixed grade-point value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterGrade {
    /// 4.0
    A,
    /// 3.7
    AMinus,
    /// 3.3
    BPlus,
    /// 3.0
    B,
    /// 2.7
    BMinus,
    /// 2.3
    CPlus,
    /// 2.0
    C,
    /// 1.7
    CMinus,
    /// 1.0
    D,
    /// 0.0
    F,
}

impl LetterGrade {
    /// Every letter in the grade-point table, best first
    pub const ALL: [Self; 10] = [
        Self::A,
        Self::AMinus,
        Self::BPlus,
        Self::B,
        Self::BMinus,
        Self::CPlus,
        Self::C,
        Self::CMinus,
        Self::D,
        Self::F,
    ];

    /// Grade-point value of this letter
    #[must_use]
    pub const fn points(self) -> f64 {
        match self {
            Self::A => 4.0,
            Self::AMinus => 3.7,
            Self::BPlus => 3.3,
            Self::B => 3.0,
            Self::BMinus => 2.7,
            Self::CPlus => 2.3,
            Self::C => 2.0,
            Self::CMinus => 1.7,
            Self::D => 1.0,
            Self::F => 0.0,
        }
    }

    /// Symbol as stored and displayed (e.g. `"B+"`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// Whether a completed course with this letter counts as approved for
    /// prerequisite purposes. Only the plain A, B and C letters qualify.
    #[must_use]
    pub const fn is_approving(self) -> bool {
        matches!(self, Self::A | Self::B | Self::C)
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LetterGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|letter| letter.as_str() == symbol)
            .ok_or_else(|| format!("Unknown letter grade: '{s}'"))
    }
}

impl Serialize for LetterGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Convert a numeric score into a letter grade.
///
/// Returns `None` when there is no score yet.
#[must_use]
pub fn letter_from_numeric(score: Option<f64>) -> Option<LetterGrade> {
    let score = score?;
    let letter = if score > 90.0 {
        LetterGrade::A
    } else if score >= 80.0 {
        LetterGrade::B
    } else if score >= 70.0 {
        LetterGrade::C
    } else {
        LetterGrade::F
    };
    Some(letter)
}

/// Grade points for a letter; a missing letter is worth 0.0.
#[must_use]
pub fn grade_points(letter: Option<LetterGrade>) -> f64 {
    letter.map_or(0.0, LetterGrade::points)
}

/// A score paired with the weight (credits or percentage) it carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScore {
    /// Numeric score
    pub score: f64,
    /// Weight of the score in the average
    pub weight: f64,
}

impl WeightedScore {
    /// Create a new weighted score
    #[must_use]
    pub const fn new(score: f64, weight: f64) -> Self {
        Self { score, weight }
    }
}

/// `sum(score * weight) / sum(weight)`, or 0.0 when the weights sum to zero.
#[must_use]
pub fn weighted_average(components: &[WeightedScore]) -> f64 {
    let total_weight: f64 = components.iter().map(|c| c.weight).sum();
    if total_weight.abs() < f64::EPSILON {
        return 0.0;
    }
    let weighted_sum: f64 = components.iter().map(|c| c.score * c.weight).sum();
    weighted_sum / total_weight
}

/// Round half away from zero to `places` decimals.
#[must_use]
pub fn round_half_up(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Per-period component scores of an enrollment
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodScores {
    /// First partial period
    pub p1: Option<f64>,
    /// Second partial period
    pub p2: Option<f64>,
    /// Third partial period
    pub p3: Option<f64>,
    /// Final exam
    pub exam: Option<f64>,
}

impl PeriodScores {
    /// Whether no component has been graded
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.p1.is_none() && self.p2.is_none() && self.p3.is_none() && self.exam.is_none()
    }
}

/// Relative weight of each period component in the running grade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeWeights {
    /// Weight of `p1`
    pub p1: f64,
    /// Weight of `p2`
    pub p2: f64,
    /// Weight of `p3`
    pub p3: f64,
    /// Weight of the final exam
    pub exam: f64,
}

impl Default for GradeWeights {
    fn default() -> Self {
        Self {
            p1: 25.0,
            p2: 25.0,
            p3: 25.0,
            exam: 25.0,
        }
    }
}

/// Running grade from whichever components are graded so far.
///
/// Ungraded components are left out of both sums rather than counted as zero.
/// Returns `None` when nothing has been graded.
#[must_use]
pub fn current_grade(scores: &PeriodScores, weights: &GradeWeights) -> Option<f64> {
    let components: Vec<WeightedScore> = [
        (scores.p1, weights.p1),
        (scores.p2, weights.p2),
        (scores.p3, weights.p3),
        (scores.exam, weights.exam),
    ]
    .into_iter()
    .filter_map(|(score, weight)| score.map(|s| WeightedScore::new(s, weight)))
    .collect();

    if components.is_empty() {
        None
    } else {
        Some(round_half_up(weighted_average(&components), 2))
    }
}

/// Check that a score can be stored: finite and within `0..=100`.
///
/// # Errors
/// Returns a message naming the offending value.
pub fn validate_score(score: f64) -> Result<f64, String> {
    if score.is_finite() && (0.0..=MAX_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(format!("Score {score} is outside 0..={MAX_SCORE}"))
    }
}

/// A displayed score: a number, or the ungraded marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeCell {
    /// Graded value, already rounded for display
    Graded(f64),
    /// No value yet
    Ungraded,
}

impl GradeCell {
    /// Round `score` to `places` decimals, or mark it ungraded when absent.
    #[must_use]
    pub fn rounded(score: Option<f64>, places: i32) -> Self {
        score.map_or(Self::Ungraded, |s| Self::Graded(round_half_up(s, places)))
    }
}

impl fmt::Display for GradeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graded(v) => write!(f, "{v}"),
            Self::Ungraded => f.write_str(UNGRADED),
        }
    }
}

impl Serialize for GradeCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Graded(v) => serializer.serialize_f64(*v),
            Self::Ungraded => serializer.serialize_str(UNGRADED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_table() {
        let cases = [
            (95.0, LetterGrade::A),
            (90.0, LetterGrade::B),
            (89.9, LetterGrade::B),
            (80.0, LetterGrade::B),
            (79.9, LetterGrade::C),
            (70.0, LetterGrade::C),
            (69.9, LetterGrade::F),
            (0.0, LetterGrade::F),
        ];
        for (score, expected) in cases {
            assert_eq!(
                letter_from_numeric(Some(score)),
                Some(expected),
                "score {score}"
            );
        }
    }

    #[test]
    fn test_no_score_has_no_letter() {
        assert_eq!(letter_from_numeric(None), None);
    }

    #[test]
    fn test_letters_never_improve_as_score_drops() {
        let mut previous = f64::INFINITY;
        let mut score = 100.0;
        while score >= 0.0 {
            let points = grade_points(letter_from_numeric(Some(score)));
            assert!(points <= previous, "score {score} improved the grade");
            previous = points;
            score -= 0.5;
        }
    }

    #[test]
    fn test_d_is_never_produced() {
        let mut score = 0.0;
        while score <= 100.0 {
            assert_ne!(letter_from_numeric(Some(score)), Some(LetterGrade::D));
            score += 0.25;
        }
    }

    #[test]
    fn test_grade_points() {
        assert!((grade_points(Some(LetterGrade::A)) - 4.0).abs() < f64::EPSILON);
        assert!((grade_points(Some(LetterGrade::BPlus)) - 3.3).abs() < f64::EPSILON);
        assert!((grade_points(Some(LetterGrade::D)) - 1.0).abs() < f64::EPSILON);
        assert!(grade_points(Some(LetterGrade::F)).abs() < f64::EPSILON);
        assert!(grade_points(None).abs() < f64::EPSILON);
    }

    #[test]
    fn test_letter_parse_and_display() {
        assert_eq!("a-".parse::<LetterGrade>(), Ok(LetterGrade::AMinus));
        assert_eq!(" C+ ".parse::<LetterGrade>(), Ok(LetterGrade::CPlus));
        assert!("E".parse::<LetterGrade>().is_err());
        assert_eq!(LetterGrade::BMinus.to_string(), "B-");
    }

    #[test]
    fn test_approving_letters() {
        let approving: Vec<_> = LetterGrade::ALL
            .into_iter()
            .filter(|l| l.is_approving())
            .collect();
        assert_eq!(approving, vec![LetterGrade::A, LetterGrade::B, LetterGrade::C]);
    }

    #[test]
    fn test_weighted_average() {
        let avg = weighted_average(&[WeightedScore::new(90.0, 4.0), WeightedScore::new(70.0, 1.0)]);
        assert!((avg - 86.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_average_zero_weight() {
        assert!(weighted_average(&[]).abs() < f64::EPSILON);
        assert!(weighted_average(&[WeightedScore::new(80.0, 0.0)]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_current_grade_skips_ungraded() {
        let scores = PeriodScores {
            p1: Some(80.0),
            p2: Some(90.0),
            ..PeriodScores::default()
        };
        let grade = current_grade(&scores, &GradeWeights::default());
        assert_eq!(grade, Some(85.0));
        assert_eq!(current_grade(&PeriodScores::default(), &GradeWeights::default()), None);
    }

    #[test]
    fn test_round_half_up() {
        assert!((round_half_up(84.25, 1) - 84.3).abs() < 1e-9);
        assert!((round_half_up(3.142_857, 2) - 3.14).abs() < 1e-9);
        assert!((round_half_up(72.5, 0) - 73.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_score() {
        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(100.0).is_ok());
        assert!(validate_score(-1.0).is_err());
        assert!(validate_score(100.5).is_err());
        assert!(validate_score(f64::NAN).is_err());
    }

    #[test]
    fn test_grade_cell() {
        assert_eq!(GradeCell::rounded(None, 1), GradeCell::Ungraded);
        assert_eq!(GradeCell::rounded(Some(0.0), 1), GradeCell::Graded(0.0));
        assert_eq!(GradeCell::rounded(Some(77.46), 1).to_string(), "77.5");
        assert_eq!(GradeCell::Ungraded.to_string(), UNGRADED);
        assert_eq!(serde_json::to_string(&GradeCell::Ungraded).unwrap(), "\"--\"");
        assert_eq!(serde_json::to_string(&GradeCell::Graded(88.5)).unwrap(), "88.5");
    }
}
