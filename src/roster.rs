use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, RosterError};
use crate::records::{self, LoadPolicy, SaveMode};
use crate::student::Student;

pub type StudentId = i32;

/// The in-memory roster together with the file it is persisted to.
#[derive(Debug)]
pub struct Roster {
    path: PathBuf,
    save_mode: SaveMode,
    students: Vec<Student>,
    /// Set when the last load failed; the file then holds records this
    /// roster never saw.
    load_failed: bool,
}

impl Roster {
    pub fn new(path: impl Into<PathBuf>, save_mode: SaveMode) -> Self {
        Self {
            path: path.into(),
            save_mode,
            students: Vec::new(),
            load_failed: false,
        }
    }

    /// Replaces the in-memory roster with the file's contents.
    pub fn load(&mut self, policy: LoadPolicy) -> Result<usize> {
        match records::load(&self.path, policy) {
            Ok(students) => {
                self.students = students;
                self.load_failed = false;
                Ok(self.students.len())
            }
            Err(err) => {
                self.load_failed = true;
                Err(err)
            }
        }
    }

    /// Writes the roster back. Overwriting a file that failed to load is
    /// refused, appending to it is not.
    pub fn save(&self) -> Result<()> {
        if self.load_failed && self.save_mode == SaveMode::Overwrite {
            return Err(RosterError::UnloadedOverwrite {
                path: self.path.clone(),
            });
        }
        records::save(&self.path, &self.students, self.save_mode)
    }

    pub fn add(&mut self, student: Student) {
        info!("Adding student {}", student.id);
        self.students.push(student);
    }

    /// First student with `id`. Ids are not required to be unique.
    pub fn find(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn find_mut(&mut self, id: StudentId) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == id)
    }

    /// Removes and returns the first student with `id`.
    pub fn remove(&mut self, id: StudentId) -> Option<Student> {
        let index = self.students.iter().position(|s| s.id == id)?;
        info!("Removing student {}", id);
        Some(self.students.remove(index))
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
