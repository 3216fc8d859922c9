//! Error rendering using ariadne
//!
//! Renders compile, runtime and validation errors with source snippets and
//! labelled spans.

use crate::{Diagnostic, Error, Severity, ValidationResult};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use gamexpr::{compile, render_error};
///
/// if let Err(e) = compile("1 + * 2") {
///     let error: gamexpr::Error = e.into();
///     render_error(&error);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for editor panels and logs)
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Same as `render_error_to_string` but without ANSI color codes.
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render the errors and warnings of one validated expression.
pub fn render_validation_to_string(
    source: &str,
    result: &ValidationResult,
    use_color: bool,
) -> String {
    let diagnostics: Vec<Diagnostic> = result
        .errors
        .iter()
        .map(|e| e.to_diagnostic(Severity::Error))
        .chain(result.warnings.iter().map(|w| w.to_diagnostic(Severity::Warning)))
        .collect();

    let mut buf = Vec::new();
    render_diagnostics(source, &diagnostics, &mut buf, use_color).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error {
        Error::Compilation {
            diagnostics,
            source,
        } => render_diagnostics(source, diagnostics, writer, use_color),
        Error::Runtime { diagnostic, source } => {
            render_diagnostics(source, std::slice::from_ref(diagnostic), writer, use_color)
        }
    }
}

fn render_diagnostics(
    source: &str,
    diagnostics: &[Diagnostic],
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    for diag in diagnostics {
        let mut colors = ColorGenerator::new();
        colors.next(); // Skip the first color.

        let kind = match diag.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
            Severity::Info => ReportKind::Advice,
        };

        let mut report = Report::build(kind, ("<expr>", diag.span.0.clone()))
            .with_message(&diag.message)
            .with_config(ariadne::Config::default().with_color(use_color));

        if let Some(code) = &diag.code {
            report = report.with_code(code);
        }

        report = report.with_label(
            Label::new(("<expr>", diag.span.0.clone()))
                .with_message(&diag.message)
                .with_color(colors.next()),
        );

        if let Some(help) = &diag.help {
            report = report.with_help(help);
        }

        report
            .finish()
            .write(("<expr>", Source::from(source)), &mut *writer)?;
    }

    Ok(())
}
