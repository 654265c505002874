use chrono::NaiveDate;
use csv::{ByteRecord, ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Serialize, Serializer};
use std::{
    fs::{File, OpenOptions},
    io::{Read, Write},
    path::Path,
};
use tracing::{debug, warn};

use crate::error::{Result, RosterError};
use crate::student::{parse_courses_field, round_2dp, Student};

pub const HEADER: [&str; 8] = [
    "ID",
    "First Name",
    "Last Name",
    "DOB",
    "Major",
    "Classes",
    "Is Enrolled",
    "Average Grade",
];

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored line carries the average as an eighth column, but only the first
/// seven are needed to rebuild a student.
const REQUIRED_FIELDS: usize = 7;

/// How `save` treats a file that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Truncate and rewrite header plus every record.
    #[default]
    Overwrite,
    /// Append records after the existing content. The header is only written
    /// when the file is new, so repeated saves accumulate duplicate rows.
    Append,
}

/// What `load` does with a line that fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// The first bad line fails the whole load.
    #[default]
    Abort,
    /// Bad lines are logged and skipped.
    SkipMalformed,
}

#[derive(Debug, Serialize)]
struct StudentLine<'a> {
    id: i32,
    first_name: &'a str,
    last_name: &'a str,
    #[serde(serialize_with = "serialize_date")]
    date_of_birth: NaiveDate,
    major: &'a str,
    classes: String,
    #[serde(serialize_with = "serialize_enrolled")]
    is_enrolled: bool,
    #[serde(serialize_with = "serialize_f64_2dp")]
    average_grade: f64,
}

impl<'a> From<&'a Student> for StudentLine<'a> {
    fn from(student: &'a Student) -> Self {
        Self {
            id: student.id,
            first_name: &student.first_name,
            last_name: &student.last_name,
            date_of_birth: student.date_of_birth,
            major: &student.major,
            classes: student.courses_field(),
            is_enrolled: student.is_enrolled,
            average_grade: student.average_grade(),
        }
    }
}

/// Reads the roster file at `path`. A missing file is an empty roster.
pub fn load<P: AsRef<Path>>(path: P, policy: LoadPolicy) -> Result<Vec<Student>> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("{} does not exist, starting with an empty roster", path.display());
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    let students = read_students(file, policy)?;
    debug!("Loaded {} students from {}", students.len(), path.display());

    Ok(students)
}

/// Writes `students` to `path` according to `mode`.
pub fn save<P: AsRef<Path>>(path: P, students: &[Student], mode: SaveMode) -> Result<()> {
    let path = path.as_ref();
    let existed = path.exists();

    let file = match mode {
        SaveMode::Overwrite => File::create(path)?,
        SaveMode::Append => OpenOptions::new().create(true).append(true).open(path)?,
    };
    let with_header = mode == SaveMode::Overwrite || !existed;

    write_students(file, students, with_header)?;
    debug!(
        "Saved {} students to {} ({:?})",
        students.len(),
        path.display(),
        mode
    );

    Ok(())
}

/// Decodes a roster. The first line is always treated as a header.
pub fn read_students<R: Read>(reader: R, policy: LoadPolicy) -> Result<Vec<Student>> {
    // The CSV reader is buffered automatically.
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    // The header is discarded without being decoded as text.
    let mut header = ByteRecord::new();
    if !rdr.read_byte_record(&mut header)? {
        return Ok(Vec::new());
    }

    let mut students = Vec::new();
    for result in rdr.records() {
        match result
            .map_err(RosterError::from)
            .and_then(|record| parse_record(&record))
        {
            Ok(student) => students.push(student),
            Err(err) if policy == LoadPolicy::SkipMalformed && err.is_parse_error() => {
                warn!("Skipping malformed line: {}", err);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(students)
}

/// Encodes a roster, optionally preceded by the header line.
pub fn write_students<W: Write>(writer: W, students: &[Student], with_header: bool) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    if with_header {
        wtr.write_record(HEADER)?;
    }
    for student in students {
        wtr.serialize(StudentLine::from(student))?;
    }

    wtr.flush()?;
    Ok(())
}

fn parse_record(record: &StringRecord) -> Result<Student> {
    let line = record.position().map_or(0, |pos| pos.line());
    if record.len() < REQUIRED_FIELDS {
        return Err(RosterError::MissingFields {
            line,
            found: record.len(),
        });
    }

    // Length is checked above.
    let field = |index: usize| record.get(index).unwrap_or_default();

    let id = field(0)
        .trim()
        .parse::<i32>()
        .map_err(|_| RosterError::format(line, "ID", field(0)))?;
    let date_of_birth =
        parse_date(field(3)).ok_or_else(|| RosterError::format(line, "DOB", field(3)))?;
    let is_enrolled =
        parse_bool(field(6)).ok_or_else(|| RosterError::format(line, "enrollment", field(6)))?;

    Ok(Student {
        id,
        first_name: field(1).to_string(),
        last_name: field(2).to_string(),
        date_of_birth,
        major: field(4).to_string(),
        is_enrolled,
        courses: parse_courses_field(field(5)),
    })
}

/// Accepts ISO dates, plus the slash form and a trailing time of day.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .ok()
}

/// Case-insensitive `true`/`false`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn serialize_date<S>(value: &NaiveDate, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.format(DATE_FORMAT).to_string())
}

fn serialize_enrolled<S>(value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *value { "True" } else { "False" })
}

fn serialize_f64_2dp<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&round_2dp(*value).to_string())
}
