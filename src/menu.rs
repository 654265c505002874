use std::io::{BufRead, Write};
use tracing::{info, warn};

use crate::error::{Result, RosterError};
use crate::prompt::Prompter;
use crate::records::DATE_FORMAT;
use crate::roster::{Roster, StudentId};
use crate::student::{round_2dp, Student};

const NOT_FOUND: &str = "Student with that ID not found.";

/// Interactive session over a roster.
pub struct Menu<R, W> {
    roster: Roster,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(roster: Roster, input: R, output: W) -> Self {
        Self {
            roster,
            prompter: Prompter::new(input, output),
        }
    }

    /// Runs until "Save and Exit" is chosen or the input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.show_menu()?;
            let choice = match self.prompter.read_line() {
                Ok(choice) => choice,
                Err(RosterError::InputClosed) => {
                    info!("Input closed, leaving without saving");
                    return Ok(());
                }
                Err(err) => return Err(err),
            };

            let outcome = match choice.trim() {
                "1" => self.view(),
                "2" => self.add(),
                "3" => self.edit(),
                "4" => self.delete(),
                "5" => {
                    self.save()?;
                    return Ok(());
                }
                _ => self
                    .prompter
                    .say("Invalid option. Please select a valid number."),
            };

            match outcome {
                Ok(()) => {}
                Err(RosterError::InputClosed) => {
                    info!("Input closed, leaving without saving");
                    return Ok(());
                }
                Err(err) => {
                    warn!("Menu action failed: {}", err);
                    self.prompter
                        .say(&format!("An unexpected error occurred: {err}"))?;
                }
            }
        }
    }

    #[cfg(test)]
    pub fn finish(self) -> (Roster, W) {
        (self.roster, self.prompter.into_output())
    }

    fn show_menu(&mut self) -> Result<()> {
        self.prompter.say("=== Student Management System ===")?;
        self.prompter.say("1. View Students")?;
        self.prompter.say("2. Add Student")?;
        self.prompter.say("3. Edit Student")?;
        self.prompter.say("4. Delete Student")?;
        self.prompter.say("5. Save and Exit")?;
        self.prompter.say("Select an option (1-5):")
    }

    fn pause(&mut self) -> Result<()> {
        self.prompter.say("\nPress Enter to return to the menu.")?;
        self.prompter.read_line().map(|_| ())
    }

    fn view(&mut self) -> Result<()> {
        self.prompter.say("=== List of Students ===")?;
        let lines: Vec<String> = self.roster.students().iter().map(describe).collect();
        for line in &lines {
            self.prompter.say(line)?;
        }
        self.pause()
    }

    fn add(&mut self) -> Result<()> {
        let mut student = Student::default();
        self.prompter.fill_student(&mut student)?;
        self.roster.add(student);
        self.prompter.say("Student added successfully!")?;
        self.pause()
    }

    fn edit(&mut self) -> Result<()> {
        let id = self.ask_id("Enter the ID of the student you want to edit:")?;

        match id.and_then(|id| self.roster.find(id).cloned().map(|s| (id, s))) {
            Some((id, mut edited)) => {
                self.prompter.say("Editing student...")?;
                self.prompter.fill_student(&mut edited)?;
                if let Some(slot) = self.roster.find_mut(id) {
                    *slot = edited;
                }
                info!("Edited student {}", id);
                self.prompter.say("Student details updated successfully!")?;
            }
            None => self.prompter.say(NOT_FOUND)?,
        }

        self.pause()
    }

    fn delete(&mut self) -> Result<()> {
        let id = self.ask_id("Enter the ID of the student you want to delete:")?;

        match id.and_then(|id| self.roster.remove(id)) {
            Some(_) => {
                self.prompter.say("Student deleted successfully!")?;
                self.save()?;
            }
            None => self.prompter.say(NOT_FOUND)?,
        }

        self.pause()
    }

    /// An unparsable answer reads as an unknown id.
    fn ask_id(&mut self, message: &str) -> Result<Option<StudentId>> {
        let answer = self.prompter.ask(message)?;
        Ok(answer.trim().parse().ok())
    }

    fn save(&mut self) -> Result<()> {
        match self.roster.save() {
            Ok(()) => self
                .prompter
                .say("All students have been saved successfully!"),
            Err(err) => {
                warn!("Saving {} failed: {}", self.roster.path().display(), err);
                self.prompter
                    .say(&format!("An error occurred while saving the file: {err}"))
            }
        }
    }
}

/// One listing line for the view screen.
pub fn describe(student: &Student) -> String {
    let classes = if student.courses.is_empty() {
        "No courses assigned".to_string()
    } else {
        student
            .courses
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "ID: {}, Name: {} {}, DOB: {}, Major: {}, Classes: {}, Enrolled: {}, Average Grade: {}",
        student.id,
        student.first_name,
        student.last_name,
        student.date_of_birth.format(DATE_FORMAT),
        student.major,
        classes,
        if student.is_enrolled { "True" } else { "False" },
        round_2dp(student.average_grade()),
    )
}
