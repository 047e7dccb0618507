//! Fontainebleau grade table and grade/points conversions.
//!
//! Every grade maps to a fixed number of points. Scores computed from
//! several grades (averages, leaderboard aggregates) are mapped back to a
//! label with a nearest-value lookup over the same table.

/// Points added to a climb's grade points when it was flashed.
pub const FLASH_BONUS: i32 = 10;

/// Grade reported when there is nothing to average.
pub const DEFAULT_GRADE: &str = "6A";

/// Number of entries in [`GRADE_TABLE`].
pub const GRADE_COUNT: usize = 60;

/// Static grade table ordered from easiest to hardest.
///
/// Each number spans 100 points split across the six sub-grades
/// `A, A+, B, B+, C, C+` at offsets `0, 17, 33, 50, 67, 83`.
pub const GRADE_TABLE: [(&str, i32); GRADE_COUNT] = [
    ("1A", 100), ("1A+", 117), ("1B", 133), ("1B+", 150), ("1C", 167), ("1C+", 183),
    ("2A", 200), ("2A+", 217), ("2B", 233), ("2B+", 250), ("2C", 267), ("2C+", 283),
    ("3A", 300), ("3A+", 317), ("3B", 333), ("3B+", 350), ("3C", 367), ("3C+", 383),
    ("4A", 400), ("4A+", 417), ("4B", 433), ("4B+", 450), ("4C", 467), ("4C+", 483),
    ("5A", 500), ("5A+", 517), ("5B", 533), ("5B+", 550), ("5C", 567), ("5C+", 583),
    ("6A", 600), ("6A+", 617), ("6B", 633), ("6B+", 650), ("6C", 667), ("6C+", 683),
    ("7A", 700), ("7A+", 717), ("7B", 733), ("7B+", 750), ("7C", 767), ("7C+", 783),
    ("8A", 800), ("8A+", 817), ("8B", 833), ("8B+", 850), ("8C", 867), ("8C+", 883),
    ("9A", 900), ("9A+", 917), ("9B", 933), ("9B+", 950), ("9C", 967), ("9C+", 983),
    ("10A", 1000), ("10A+", 1017), ("10B", 1033), ("10B+", 1050), ("10C", 1067), ("10C+", 1083),
];

/// Index range of the grades accepted on new route submissions (`5A`..=`9C+`).
const SUBMISSION_RANGE: std::ops::Range<usize> = 24..54;

/// Grades a user may assign to a newly submitted route.
pub fn submission_grades() -> impl Iterator<Item = &'static str> {
    GRADE_TABLE[SUBMISSION_RANGE].iter().map(|(grade, _)| *grade)
}

/// Whether `grade` is accepted on route submissions. Exact, case-sensitive match.
pub fn is_valid_submission_grade(grade: &str) -> bool {
    GRADE_TABLE[SUBMISSION_RANGE]
        .iter()
        .any(|(candidate, _)| *candidate == grade)
}

/// Position of `grade` in [`GRADE_TABLE`].
pub fn grade_index(grade: &str) -> Option<usize> {
    GRADE_TABLE.iter().position(|(candidate, _)| *candidate == grade)
}

/// Points for a grade, or `None` if the grade is not in the table.
pub fn grade_points(grade: &str) -> Option<i32> {
    grade_index(grade).map(|i| GRADE_TABLE[i].1)
}

/// Points for a flashed ascent of `grade`.
pub fn flash_points(grade: &str) -> Option<i32> {
    grade_points(grade).map(|p| p + FLASH_BONUS)
}

/// Map a score back to the grade whose points are nearest.
///
/// Linear scan in table order; on a tie the first grade encountered wins.
pub fn grade_from_points(points: f64) -> &'static str {
    let mut closest = GRADE_TABLE[0].0;
    let mut min_diff = f64::INFINITY;

    for (grade, grade_pts) in GRADE_TABLE.iter() {
        let diff = (f64::from(*grade_pts) - points).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = grade;
        }
    }

    closest
}

/// The grade after `grade`, or `grade` itself at the top of the table.
pub fn next_grade(grade: &str) -> Option<&'static str> {
    let i = grade_index(grade)?;
    Some(GRADE_TABLE[(i + 1).min(GRADE_COUNT - 1)].0)
}

/// The grade before `grade`, or `grade` itself at the bottom of the table.
pub fn previous_grade(grade: &str) -> Option<&'static str> {
    let i = grade_index(grade)?;
    Some(GRADE_TABLE[i.saturating_sub(1)].0)
}

/// Percentage progress of `current_points` between two grades, clamped to 0..=100.
///
/// Returns 0 when either grade is unknown or `next` is not harder than `previous`.
pub fn progress_percent(current_points: f64, previous: &str, next: &str) -> u8 {
    let (Some(prev_pts), Some(next_pts)) = (grade_points(previous), grade_points(next)) else {
        return 0;
    };
    if next_pts <= prev_pts {
        return 0;
    }

    let span = f64::from(next_pts - prev_pts);
    let percent = ((current_points - f64::from(prev_pts)) / span * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}
