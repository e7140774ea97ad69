//! GPA calculation on the 4-point scale.
//!
//! Input is one course per line: `Course, grade-or-mark, credits`, with
//! `,`, `|` or tab as the separator. Grades are letters A–F or 0–100 marks.

use lazy_regex::regex;
use thiserror::Error;

/// Rejected GPA input line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GpaError {
    #[error("line {line}: need at least 3 columns: course, grade/mark, credits")]
    TooFewColumns { line: usize },

    #[error("line {line}: credits must be an integer, got {value:?}")]
    InvalidCredits { line: usize, value: String },

    #[error("line {line}: grade must be A-F or a 0-100 mark, got {value:?}")]
    InvalidGrade { line: usize, value: String },

    #[error("line {line}: credits must be between 0 and {max}, got {value}")]
    CreditsOutOfRange { line: usize, value: u32, max: u32 },

    #[error("too many courses: credit totals overflow")]
    TotalsOverflow,
}

/// Largest credit load accepted for a single course.
pub const MAX_COURSE_CREDITS: u32 = 30;

/// A parsed course line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseGrade {
    pub course: String,
    pub grade: char,
    pub credits: u32,
}

/// Totals for a list of courses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpaSummary {
    /// Rounded to two decimals.
    pub gpa: f64,
    pub quality_points: u32,
    pub credits: u32,
}

pub fn grade_points(grade: char) -> u32 {
    match grade {
        'A' => 4,
        'B' => 3,
        'C' => 2,
        'D' => 1,
        _ => 0,
    }
}

/// Converts a 0–100 mark to a letter grade.
pub fn mark_to_grade(mark: i64) -> char {
    match mark {
        m if m >= 70 => 'A',
        m if m >= 60 => 'B',
        m if m >= 50 => 'C',
        m if m >= 40 => 'D',
        _ => 'F',
    }
}

/// Parses one course line; `line_no` is only used in error messages.
pub fn parse_line(raw: &str, line_no: usize) -> Result<CourseGrade, GpaError> {
    let parts: Vec<&str> = regex!(r"[,|\t]")
        .split(raw)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 3 {
        return Err(GpaError::TooFewColumns { line: line_no });
    }

    let credits = parts[2].parse::<u32>().map_err(|_| GpaError::InvalidCredits {
        line: line_no,
        value: parts[2].to_string(),
    })?;
    if credits > MAX_COURSE_CREDITS {
        return Err(GpaError::CreditsOutOfRange {
            line: line_no,
            value: credits,
            max: MAX_COURSE_CREDITS,
        });
    }

    let grade_raw = parts[1].to_uppercase();
    let grade = match grade_raw.as_str() {
        "A" | "B" | "C" | "D" | "F" => grade_raw.chars().next().unwrap_or('F'),
        _ => {
            let mark = grade_raw.parse::<f64>().map_err(|_| GpaError::InvalidGrade {
                line: line_no,
                value: parts[1].to_string(),
            })?;
            mark_to_grade(mark.trunc() as i64)
        }
    };

    Ok(CourseGrade {
        course: parts[0].to_string(),
        grade,
        credits,
    })
}

/// Parses every non-blank line and totals quality points and credits.
pub fn calculate_gpa<S: AsRef<str>>(lines: &[S]) -> Result<GpaSummary, GpaError> {
    let mut quality_points: u32 = 0;
    let mut credits: u32 = 0;
    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        let course = parse_line(line, idx + 1)?;
        quality_points = grade_points(course.grade)
            .checked_mul(course.credits)
            .and_then(|points| quality_points.checked_add(points))
            .ok_or(GpaError::TotalsOverflow)?;
        credits = credits.checked_add(course.credits).ok_or(GpaError::TotalsOverflow)?;
    }

    let gpa = if credits == 0 {
        0.0
    } else {
        (f64::from(quality_points) / f64::from(credits) * 100.0).round() / 100.0
    };
    Ok(GpaSummary {
        gpa,
        quality_points,
        credits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mark_boundaries() {
        assert_eq!(mark_to_grade(70), 'A');
        assert_eq!(mark_to_grade(69), 'B');
        assert_eq!(mark_to_grade(50), 'C');
        assert_eq!(mark_to_grade(40), 'D');
        assert_eq!(mark_to_grade(39), 'F');
    }

    #[test]
    fn test_parse_line_variants() {
        assert_eq!(
            parse_line("Chemistry, 85, 3", 1).unwrap(),
            CourseGrade {
                course: "Chemistry".to_string(),
                grade: 'A',
                credits: 3
            }
        );
        assert_eq!(parse_line("Statics | b | 2", 1).unwrap().grade, 'B');
        assert_eq!(parse_line("Drawing\t59.9\t1", 1).unwrap().grade, 'C');
    }

    #[test]
    fn test_parse_line_errors() {
        assert_eq!(parse_line("Chemistry, A", 4).unwrap_err(), GpaError::TooFewColumns { line: 4 });
        assert!(matches!(
            parse_line("Chemistry, A, three", 1),
            Err(GpaError::InvalidCredits { .. })
        ));
        assert!(matches!(
            parse_line("Chemistry, E, 3", 1),
            Err(GpaError::InvalidGrade { .. })
        ));
    }

    #[test]
    fn test_calculate_gpa() {
        let summary = calculate_gpa(&["Thermo, A, 3", "", "Fluids, 55, 2", "Workshop, F, 1"]).unwrap();
        assert_eq!(summary.quality_points, 16);
        assert_eq!(summary.credits, 6);
        assert_eq!(summary.gpa, 2.67);
    }

    #[test]
    fn test_huge_credit_value_is_rejected() {
        assert_eq!(
            calculate_gpa(&["Thermo, A, 4000000000"]).unwrap_err(),
            GpaError::CreditsOutOfRange {
                line: 1,
                value: 4_000_000_000,
                max: MAX_COURSE_CREDITS
            }
        );
        assert!(matches!(
            calculate_gpa(&["Thermo, A, 99999999999"]),
            Err(GpaError::InvalidCredits { line: 1, .. })
        ));
        assert_eq!(calculate_gpa(&["Project, A, 30"]).unwrap().quality_points, 120);
    }

    #[test]
    fn test_calculate_gpa_empty() {
        let summary = calculate_gpa::<&str>(&[]).unwrap();
        assert_eq!(summary.gpa, 0.0);
        assert_eq!(summary.credits, 0);
    }
}
