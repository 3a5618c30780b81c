// src/report.rs
//! Rendering semantic errors with their source.

use miette::{
    Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, ThemeCharacters, ThemeStyles,
};

use oxpas_sema::SemanticError;

/// Attach the unit's source text so labels point into it.
pub fn with_source(err: SemanticError, file_name: &str, source: &str) -> miette::Report {
    miette::Report::new(err).with_source_code(NamedSource::new(file_name, source.to_string()))
}

/// Unicode and colors, for terminals.
pub fn terminal_handler() -> GraphicalReportHandler {
    GraphicalReportHandler::new_themed(GraphicalTheme {
        characters: ThemeCharacters::unicode(),
        styles: ThemeStyles::ansi(),
    })
}

/// Plain ascii without colors, for logs and tests.
pub fn plain_handler() -> GraphicalReportHandler {
    GraphicalReportHandler::new_themed(GraphicalTheme {
        characters: ThemeCharacters::ascii(),
        styles: ThemeStyles::none(),
    })
}

pub fn render_to_string(report: &dyn Diagnostic) -> String {
    let mut output = String::new();
    let _ = plain_handler().render_report(&mut output, report);
    output
}

pub fn render_to_stderr(report: &dyn Diagnostic) {
    let mut output = String::new();
    if terminal_handler().render_report(&mut output, report).is_ok() {
        eprint!("{output}");
    }
}
