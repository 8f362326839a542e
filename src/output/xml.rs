//! XML export of an [`ExportDocument`].
//!
//! ```text
//! <root>
//!   <studentsInfo><studentEntry>...</studentEntry></studentsInfo>
//!   <universitiesInfo><universityEntry>...</universityEntry></universitiesInfo>
//!   <statisticalInfo><statisticsEntry>...</statisticsEntry></statisticalInfo>
//!   <processedAt>...</processedAt>
//! </root>
//! ```
//!
//! Absent optional values are left out rather than written as empty elements.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::{debug, instrument};

use super::{ExportDocument, ensure_dir};
use crate::model::{Student, University};
use crate::statistics::StatisticsEntry;

/// Writes `document` as indented UTF-8 XML into `dir` and returns the file path.
#[instrument(skip(document), fields(dir = %dir.display()))]
pub fn write_export(document: &ExportDocument<'_>, dir: &Path) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(document.file_name("xml"));

    let file = File::create(&path).with_context(|| format!("failed to create '{}'", path.display()))?;
    let mut out = BufWriter::new(file);
    render(document, &mut out)?;
    out.flush()?;

    debug!(path = %path.display(), "XML export written");
    Ok(path)
}

/// Serializes `document` into `out`.
pub fn render<W: Write>(document: &ExportDocument<'_>, out: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 4);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    start(&mut writer, "root")?;

    start(&mut writer, "studentsInfo")?;
    for student in document.students {
        write_student(&mut writer, student)?;
    }
    end(&mut writer, "studentsInfo")?;

    start(&mut writer, "universitiesInfo")?;
    for university in document.universities {
        write_university(&mut writer, university)?;
    }
    end(&mut writer, "universitiesInfo")?;

    start(&mut writer, "statisticalInfo")?;
    for entry in document.statistics {
        write_statistics(&mut writer, entry)?;
    }
    end(&mut writer, "statisticalInfo")?;

    let processed_at = document
        .processed_at
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    text_element(&mut writer, "processedAt", &processed_at)?;

    end(&mut writer, "root")?;
    Ok(())
}

fn write_student<W: Write>(writer: &mut Writer<W>, student: &Student) -> Result<()> {
    start(writer, "studentEntry")?;
    optional_element(writer, "studentName", student.full_name.as_deref())?;
    optional_element(writer, "universityId", student.university_id.as_deref())?;
    text_element(
        writer,
        "currentCourseNumber",
        &student.current_course_number.to_string(),
    )?;
    text_element(writer, "avgScore", &student.avg_exam_score.to_string())?;
    end(writer, "studentEntry")
}

fn write_university<W: Write>(writer: &mut Writer<W>, university: &University) -> Result<()> {
    start(writer, "universityEntry")?;
    optional_element(writer, "id", university.id.as_deref())?;
    optional_element(writer, "fullName", university.full_name.as_deref())?;
    optional_element(writer, "shortName", university.short_name.as_deref())?;
    text_element(
        writer,
        "yearOfFoundation",
        &university.year_of_foundation.to_string(),
    )?;
    optional_element(
        writer,
        "mainProfile",
        university.main_profile.map(|p| p.tag()),
    )?;
    end(writer, "universityEntry")
}

fn write_statistics<W: Write>(writer: &mut Writer<W>, entry: &StatisticsEntry) -> Result<()> {
    start(writer, "statisticsEntry")?;
    text_element(writer, "studyProfile", entry.study_profile.tag())?;
    optional_element(
        writer,
        "avgExamScore",
        entry.avg_exam_score.map(|v| format!("{v:.2}")).as_deref(),
    )?;
    text_element(writer, "studentCount", &entry.student_count.to_string())?;
    text_element(writer, "universityCount", &entry.university_count.to_string())?;
    for name in &entry.university_names {
        text_element(writer, "universityName", name)?;
    }
    end(writer, "statisticsEntry")
}

fn start<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    start(writer, name)?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    end(writer, name)
}

fn optional_element<W: Write>(writer: &mut Writer<W>, name: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(value) => text_element(writer, name, value),
        None => Ok(()),
    }
}
