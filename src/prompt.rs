//! Line-oriented prompting used by the add and edit flows.
//!
//! Every read goes through a [`BufRead`] so sessions can be driven from a
//! script as easily as from a terminal.

use chrono::NaiveDate;
use std::io::{BufRead, Write};

use crate::error::{Result, RosterError};
use crate::records::{parse_bool, parse_date};
use crate::student::{parse_courses_input, Student};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Next line without its terminator. End of input is an error.
    pub fn read_line(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(RosterError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub fn ask(&mut self, message: &str) -> Result<String> {
        self.say(message)?;
        self.read_line()
    }

    /// Reads lines until `parse` accepts one, printing `retry` after each
    /// rejected line.
    fn read_until<T>(&mut self, retry: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
        loop {
            let line = self.read_line()?;
            if !line.trim().is_empty() {
                if let Some(value) = parse(&line) {
                    return Ok(value);
                }
            }
            self.say(retry)?;
        }
    }

    pub fn read_id(&mut self) -> Result<i32> {
        self.say("Enter ID:")?;
        self.read_until("Invalid input. Please enter a valid ID:", |s| {
            s.trim().parse::<i32>().ok()
        })
    }

    pub fn read_date_of_birth(&mut self) -> Result<NaiveDate> {
        self.say("DOB (yyyy-mm-dd):")?;
        self.read_until(
            "Invalid date format. Please enter DOB in yyyy-mm-dd format:",
            parse_date,
        )
    }

    pub fn read_enrollment(&mut self) -> Result<bool> {
        self.say("Are you enrolled? (true/false):")?;
        self.read_until("Invalid input. Please enter true or false:", parse_bool)
    }

    /// Overwrites every field of `student` from the input.
    pub fn fill_student(&mut self, student: &mut Student) -> Result<()> {
        student.id = self.read_id()?;
        student.first_name = self.ask("First Name:")?;
        student.last_name = self.ask("Last Name:")?;
        student.date_of_birth = self.read_date_of_birth()?;

        if self.read_enrollment()? {
            student.is_enrolled = true;
            student.major = self.ask("Major:")?;
            let courses = self.ask("Classes (comma separated, format: ClassName:Grade):")?;
            student.courses = parse_courses_input(&courses);
        } else {
            student.unenroll();
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::student::CourseGrade;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn id_reprompts_until_valid() {
        let mut p = prompter("\nabc\n12.5\n 42 \n");

        assert_eq!(p.read_id().unwrap(), 42);

        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out.matches("Please enter a valid ID").count(), 3);
    }

    #[test]
    fn date_reprompts_until_valid() {
        let mut p = prompter("yesterday\n1999-02-30\n1999-02-28\n");

        assert_eq!(
            p.read_date_of_birth().unwrap(),
            NaiveDate::from_ymd_opt(1999, 2, 28).unwrap()
        );
    }

    #[test]
    fn enrollment_reprompts_until_valid() {
        let mut p = prompter("yes\nTRUE\n");
        assert!(p.read_enrollment().unwrap());
    }

    #[test]
    fn retry_ends_when_input_runs_out() {
        let mut p = prompter("abc\n");
        assert!(matches!(p.read_id(), Err(RosterError::InputClosed)));
    }

    #[test]
    fn fill_enrolled_student() {
        let mut p = prompter("7\nAda\nLovelace\n1990-01-01\ntrue\nCS\nMath:90, Bio:bad, Art:70\n");
        let mut student = Student::default();

        p.fill_student(&mut student).unwrap();

        assert_eq!(student.id, 7);
        assert_eq!(student.first_name, "Ada");
        assert_eq!(student.last_name, "Lovelace");
        assert_eq!(student.major, "CS");
        assert!(student.is_enrolled);
        assert_eq!(
            student.courses,
            vec![CourseGrade::new("Math", 90.0), CourseGrade::new("Art", 70.0)]
        );
        assert_eq!(student.average_grade(), 80.0);
    }

    #[test]
    fn fill_unenrolled_student_uses_placeholders() {
        let mut p = prompter("8\nAlan\nTuring\n1912-06-23\nfalse\n");
        let mut student = Student {
            major: "Physics".to_string(),
            courses: vec![CourseGrade::new("Optics", 60.0)],
            is_enrolled: true,
            ..Student::default()
        };

        p.fill_student(&mut student).unwrap();

        assert!(!student.is_enrolled);
        assert_eq!(student.major, "N/A");
        assert_eq!(student.courses, vec![CourseGrade::new("N/A", 0.0)]);
    }

    #[test]
    fn blank_course_list_becomes_placeholder() {
        let mut p = prompter("9\nA\nB\n2001-01-01\ntrue\nUndeclared\n\n");
        let mut student = Student::default();

        p.fill_student(&mut student).unwrap();

        assert!(student.is_enrolled);
        assert_eq!(student.courses, vec![CourseGrade::not_applicable()]);
    }
}
