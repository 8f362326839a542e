//! CLI entry point for unistats.
//!
//! Loads student and university records, aggregates them into per-study-profile
//! statistics and writes the report and exports, optionally publishing them to S3.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use unistats::{
    Student, StudyProfile, University,
    fetch::{BasicClient, load_source},
    ordering::{SortCriterion, sort_students, sort_universities},
    output::{ExportDocument, OutputFormat, write_outputs},
    parser::{RecordFormat, parse_students, parse_universities},
    publish::upload_files,
    statistics::{calculate_statistics, project},
    workbook::{DEFAULT_STUDENTS_SHEET, DEFAULT_UNIVERSITIES_SHEET, SheetNames},
};

#[derive(Parser)]
#[command(name = "unistats")]
#[command(about = "Per-study-profile statistics for students and universities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SheetArgs {
    /// Sheet holding students when a source is an XLSX workbook
    #[arg(long, default_value = DEFAULT_STUDENTS_SHEET)]
    students_sheet: String,

    /// Sheet holding universities when a source is an XLSX workbook
    #[arg(long, default_value = DEFAULT_UNIVERSITIES_SHEET)]
    universities_sheet: String,
}

impl From<SheetArgs> for SheetNames {
    fn from(args: SheetArgs) -> Self {
        SheetNames {
            students: args.students_sheet,
            universities: args.universities_sheet,
        }
    }
}

/// Exactly one record source for `sort`; the flag used decides the record kind.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct SortSource {
    /// Path or URL of student records (.csv, .json or .xlsx)
    #[arg(short, long, value_name = "SRC")]
    students: Option<String>,

    /// Path or URL of university records (.csv, .json or .xlsx)
    #[arg(short, long, value_name = "SRC")]
    universities: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate records into the statistics report and exports
    Report {
        /// Path or URL of the student records (.csv, .json or .xlsx)
        #[arg(short, long)]
        students: String,

        /// Path or URL of the university records (.csv, .json or .xlsx)
        #[arg(short, long)]
        universities: String,

        /// Directory to write outputs to
        #[arg(short, long, default_value = "reports")]
        output_dir: String,

        /// Outputs to produce
        #[arg(short, long, value_delimiter = ',', default_value = "xlsx,json,xml")]
        format: Vec<OutputFormat>,

        /// Order used when logging students
        #[arg(long, default_value = "AVG_EXAM_SCORE")]
        student_order: SortCriterion,

        /// Order used when logging universities
        #[arg(long, default_value = "FULL_NAME")]
        university_order: SortCriterion,

        #[command(flatten)]
        sheets: SheetArgs,

        /// Optional: S3 bucket to upload outputs to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Key prefix for uploaded outputs
        #[arg(long, default_value = "")]
        s3_prefix: String,

        /// Gzip compress outputs before uploading to S3
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Print records of one kind in the requested order, one JSON object per line
    Sort {
        #[command(flatten)]
        source: SortSource,

        /// Sort criterion, e.g. FULL_NAME or YEAR_OF_FOUNDATION
        #[arg(short, long)]
        by: SortCriterion,

        #[command(flatten)]
        sheets: SheetArgs,
    },
    /// List study profiles and their display labels
    Profiles,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/unistats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("unistats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            students,
            universities,
            output_dir,
            format,
            student_order,
            university_order,
            sheets,
            s3_bucket,
            s3_prefix,
            gzip,
        } => {
            let sheets = SheetNames::from(sheets);
            let (students, universities) = load_records(&students, &universities, &sheets).await?;

            log_sorted(&students, &universities, student_order, university_order)?;

            let statistics = calculate_statistics(&students, &universities);
            info!(profiles = statistics.len(), "Statistics calculated");
            for entry in &statistics {
                info!(
                    profile = entry.study_profile.label(),
                    avg_exam_score = entry.avg_exam_score,
                    student_count = entry.student_count,
                    university_count = entry.university_count,
                    university_names = %entry.university_names.join(", "),
                    "Profile statistics"
                );
            }

            let table = project(&statistics);
            let document = ExportDocument {
                students: &students,
                universities: &universities,
                statistics: &statistics,
                processed_at: Utc::now(),
            };
            let written = write_outputs(&format, &table, &document, Path::new(&output_dir))?;

            match s3_bucket {
                Some(bucket) if !bucket.is_empty() => {
                    info!(bucket = %bucket, gzip, "S3 upload enabled");
                    let config = aws_config::load_from_env().await;
                    let s3 = aws_sdk_s3::Client::new(&config);
                    upload_files(&s3, &bucket, &s3_prefix, &written, gzip).await?;
                }
                _ => debug!("S3 bucket not specified, skipping upload"),
            }

            info!(outputs = written.len(), output_dir = %output_dir, "Report complete");
        }
        Commands::Sort { source, by, sheets } => {
            let sheets = SheetNames::from(sheets);
            let client = BasicClient::new()?;

            match source {
                SortSource {
                    students: Some(source),
                    ..
                } => {
                    let bytes = load_source(&client, &source).await?;
                    let format = RecordFormat::from_source(&source)?;
                    let mut students = parse_students(&bytes, format, &sheets)?;
                    sort_students(&mut students, by)?;
                    for student in &students {
                        println!("{}", serde_json::to_string(student)?);
                    }
                }
                SortSource {
                    universities: Some(source),
                    ..
                } => {
                    let bytes = load_source(&client, &source).await?;
                    let format = RecordFormat::from_source(&source)?;
                    let mut universities = parse_universities(&bytes, format, &sheets)?;
                    sort_universities(&mut universities, by)?;
                    for university in &universities {
                        println!("{}", serde_json::to_string(university)?);
                    }
                }
                SortSource { .. } => anyhow::bail!("sort requires --students or --universities"),
            }
        }
        Commands::Profiles => {
            for profile in StudyProfile::ALL {
                println!("{}\t{}", profile.tag(), profile.label());
            }
        }
    }

    Ok(())
}

/// Loads both record lists. A source shared by both kinds (one XLSX workbook
/// with two sheets) is read once.
#[tracing::instrument(skip(sheets))]
async fn load_records(
    students_source: &str,
    universities_source: &str,
    sheets: &SheetNames,
) -> Result<(Vec<Student>, Vec<University>)> {
    let client = BasicClient::new()?;

    let universities_bytes = load_source(&client, universities_source).await?;
    let universities = parse_universities(
        &universities_bytes,
        RecordFormat::from_source(universities_source)?,
        sheets,
    )
    .with_context(|| format!("failed to parse universities from '{universities_source}'"))?;
    info!(count = universities.len(), "Universities loaded");

    let students_bytes = if students_source == universities_source {
        universities_bytes
    } else {
        load_source(&client, students_source).await?
    };
    let students = parse_students(
        &students_bytes,
        RecordFormat::from_source(students_source)?,
        sheets,
    )
    .with_context(|| format!("failed to parse students from '{students_source}'"))?;
    info!(count = students.len(), "Students loaded");

    Ok((students, universities))
}

/// Logs both record lists in the requested orders without reordering the
/// inputs; aggregation depends on the source university order.
fn log_sorted(
    students: &[Student],
    universities: &[University],
    student_order: SortCriterion,
    university_order: SortCriterion,
) -> Result<()> {
    let mut sorted_universities = universities.to_vec();
    sort_universities(&mut sorted_universities, university_order)?;
    info!(order = %university_order, "Universities sorted");
    for university in &sorted_universities {
        debug!(?university, "University");
    }

    let mut sorted_students = students.to_vec();
    sort_students(&mut sorted_students, student_order)?;
    info!(order = %student_order, "Students sorted");
    for student in &sorted_students {
        debug!(?student, "Student");
    }

    Ok(())
}
