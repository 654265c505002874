use chrono::NaiveDate;
use std::fmt;

/// Placeholder used for the major and the single course of a student who is
/// not enrolled.
pub const NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct CourseGrade {
    pub name: String,
    pub grade: f64,
}

impl CourseGrade {
    pub fn new(name: impl Into<String>, grade: f64) -> Self {
        Self {
            name: name.into(),
            grade,
        }
    }

    pub fn not_applicable() -> Self {
        Self::new(NOT_APPLICABLE, 0.0)
    }
}

impl fmt::Display for CourseGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.grade)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub major: String,
    pub is_enrolled: bool,
    pub courses: Vec<CourseGrade>,
}

impl Default for Student {
    fn default() -> Self {
        Self {
            id: 0,
            first_name: String::new(),
            last_name: String::new(),
            date_of_birth: NaiveDate::MIN,
            major: String::new(),
            is_enrolled: false,
            courses: Vec::new(),
        }
    }
}

impl Student {
    /// Mean of all course grades, 0 when there are no courses.
    pub fn average_grade(&self) -> f64 {
        if self.courses.is_empty() {
            return 0.0;
        }

        let total: f64 = self.courses.iter().map(|c| c.grade).sum();
        total / self.courses.len() as f64
    }

    /// Resets major and courses to the not-enrolled placeholders.
    pub fn unenroll(&mut self) {
        self.is_enrolled = false;
        self.major = NOT_APPLICABLE.to_string();
        self.courses = vec![CourseGrade::not_applicable()];
    }

    /// Course list joined with `;`, the form used in the storage file.
    pub fn courses_field(&self) -> String {
        self.courses
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Rounds to two decimals, sending exact halves to the even neighbour.
pub fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Parses the comma separated `Name:Grade` list typed at the prompt.
///
/// Entries without exactly one `:` or with a non-numeric grade are dropped.
/// An input that yields no course at all becomes the `N/A` placeholder.
pub fn parse_courses_input(input: &str) -> Vec<CourseGrade> {
    let courses: Vec<CourseGrade> = input
        .split(',')
        .filter_map(|entry| {
            let parts: Vec<&str> = entry.split(':').collect();
            match parts.as_slice() {
                [name, grade] => grade
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .map(|grade| CourseGrade::new(name.trim(), grade)),
                _ => None,
            }
        })
        .collect();

    if courses.is_empty() {
        vec![CourseGrade::not_applicable()]
    } else {
        courses
    }
}

/// Parses the `;` separated course field of a stored line.
///
/// Unlike [`parse_courses_input`] nothing is dropped: an entry that does not
/// carry a numeric grade is kept with grade 0.
pub fn parse_courses_field(field: &str) -> Vec<CourseGrade> {
    if field == NOT_APPLICABLE {
        return vec![CourseGrade::not_applicable()];
    }
    if field.is_empty() {
        return Vec::new();
    }

    field
        .split(';')
        .map(|entry| {
            let parts: Vec<&str> = entry.split(':').collect();
            let grade = match parts.as_slice() {
                [_, grade] => grade.trim().parse::<f64>().unwrap_or(0.0),
                _ => 0.0,
            };
            CourseGrade::new(parts[0].trim(), grade)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_with_grades(grades: &[f64]) -> Student {
        Student {
            courses: grades
                .iter()
                .enumerate()
                .map(|(i, g)| CourseGrade::new(format!("C{i}"), *g))
                .collect(),
            ..Student::default()
        }
    }

    #[test]
    fn average_of_no_courses_is_zero() {
        assert_eq!(student_with_grades(&[]).average_grade(), 0.0);
    }

    #[test]
    fn average_of_two_courses() {
        assert_eq!(student_with_grades(&[5.0, 10.0]).average_grade(), 7.5);
    }

    #[test]
    fn unenroll_sets_placeholders() {
        let mut student = student_with_grades(&[90.0]);
        student.is_enrolled = true;
        student.major = "CS".to_string();

        student.unenroll();

        assert!(!student.is_enrolled);
        assert_eq!(student.major, "N/A");
        assert_eq!(student.courses, vec![CourseGrade::new("N/A", 0.0)]);
        assert_eq!(student.average_grade(), 0.0);
    }

    #[test]
    fn course_display_uses_shortest_grade() {
        assert_eq!(CourseGrade::new("Math", 90.0).to_string(), "Math:90");
        assert_eq!(CourseGrade::new("Bio", 85.5).to_string(), "Bio:85.5");
    }

    #[test]
    fn courses_field_joins_with_semicolons() {
        let student = student_with_grades(&[90.0, 85.0]);
        assert_eq!(student.courses_field(), "C0:90;C1:85");
    }

    #[test]
    fn round_to_two_decimals() {
        assert_eq!(round_2dp(87.5), 87.5);
        assert_eq!(round_2dp(2.0 / 3.0), 0.67);
        assert_eq!(round_2dp(81.666), 81.67);
    }

    #[test]
    fn round_halves_to_even() {
        assert_eq!(round_2dp(0.125), 0.12);
        assert_eq!(round_2dp(0.375), 0.38);
        assert_eq!(round_2dp(-0.125), -0.12);
    }

    #[test]
    fn input_drops_malformed_entries() {
        let courses = parse_courses_input("Math:90, Bio:abc,History, Art:70:1 ,Chem: 88.5");
        assert_eq!(
            courses,
            vec![CourseGrade::new("Math", 90.0), CourseGrade::new("Chem", 88.5)]
        );
    }

    #[test]
    fn input_without_valid_courses_becomes_placeholder() {
        assert_eq!(parse_courses_input(""), vec![CourseGrade::not_applicable()]);
        assert_eq!(
            parse_courses_input("Math,Bio:x"),
            vec![CourseGrade::not_applicable()]
        );
    }

    #[test]
    fn field_keeps_malformed_entries_with_zero_grade() {
        let courses = parse_courses_field("Math:90;Bio:abc;History");
        assert_eq!(
            courses,
            vec![
                CourseGrade::new("Math", 90.0),
                CourseGrade::new("Bio", 0.0),
                CourseGrade::new("History", 0.0),
            ]
        );
    }

    #[test]
    fn field_na_is_placeholder() {
        assert_eq!(parse_courses_field("N/A"), vec![CourseGrade::not_applicable()]);
    }

    #[test]
    fn empty_field_is_empty_list() {
        assert!(parse_courses_field("").is_empty());
    }
}
