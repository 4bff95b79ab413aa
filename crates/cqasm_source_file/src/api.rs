// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

use ariadne::Config;
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::fs;
use std::io;
use std::ops::Range;
use std::path::Path;

use crate::source_file::{location_to_span, ErrorTrait};

pub fn read_source_file(file_path: &Path) -> io::Result<String> {
    fs::read_to_string(file_path)
}

/// Write one formatted diagnostic per entry in `errors` to `writer`.
/// Diagnostics include text taken from `source`. `info_file_path` is only used in
/// the report header and need not name an existing file.
pub fn write_compiler_errors<T: ErrorTrait, W: io::Write>(
    errors: &[T],
    info_file_path: &Path,
    source: &str,
    color: bool,
    writer: &mut W,
) -> io::Result<()> {
    let file_path_str = info_file_path.to_string_lossy();
    for err in errors.iter() {
        let err_span = location_to_span(err.location(), source);
        let kind = if err.is_warning() {
            ReportKind::Warning
        } else {
            ReportKind::Error
        };
        report_error(
            kind,
            &err.message(),
            &err_span,
            &file_path_str,
            source,
            color,
            writer,
        )?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Print compiler errors to stderr.
pub fn inner_print_compiler_errors<T: ErrorTrait>(
    errors: &[T],
    info_file_path: &Path,
    source: &str,
) -> io::Result<()> {
    write_compiler_errors(errors, info_file_path, source, true, &mut io::stderr())
}

/// Read the source in `file_path` and print compiler errors against it.
pub fn print_compiler_errors<T: ErrorTrait>(errors: &[T], file_path: &Path) -> io::Result<()> {
    let source = read_source_file(file_path)?;
    inner_print_compiler_errors(errors, file_path, &source)
}

pub fn report_error<W: io::Write>(
    kind: ReportKind<'_>,
    message: &str,
    span: &Range<usize>,
    file_path: &str,
    source: &str,
    color: bool,
    writer: &mut W,
) -> io::Result<()> {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    Report::build(kind, (file_path, span.clone()))
        .with_message(message)
        .with_config(Config::default().with_compact(true).with_color(color))
        .with_label(
            Label::new((file_path, span.clone()))
                .with_message("Near this point")
                .with_color(a),
        )
        .finish()
        .write((file_path, Source::from(source)), writer)
}
