//! Diagnostics for malformed catalog YAML files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A catalog record that failed to parse, pointing at the offending line
#[derive(Debug, Error, Diagnostic)]
#[error("invalid catalog record: {message}")]
#[diagnostic(code(hbom::yaml::record))]
pub struct RecordSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl RecordSyntaxError {
    /// Build from a serde_yml error and the text it was parsing
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = suggest(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Byte offset of a 1-based line/column, clamped to the source length
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();

    let line_len = source[line_start.min(source.len())..]
        .split('\n')
        .next()
        .map_or(0, str::len);

    (line_start + column.saturating_sub(1).min(line_len)).min(source.len())
}

fn suggest(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("tab") {
        return Some("YAML indentation must use spaces, not tabs.".to_string());
    }
    if msg.contains("duplicate key") {
        return Some("Each key may appear once per record.".to_string());
    }
    if msg.contains("missing field `quantity`") {
        return Some("Every BOM line needs `quantity:` (a positive number).".to_string());
    }
    if msg.contains("missing field `part_number`") {
        return Some("Product files start with `part_number: <PN>`.".to_string());
    }
    if msg.contains("missing field `mpn`") {
        return Some("Components are keyed by `mpn:` plus an optional `manufacturer:`.".to_string());
    }
    if msg.contains("missing field `unit_cost`") {
        return Some(
            "Each source needs `unit_cost:`; drop the source if the price is unknown.".to_string(),
        );
    }
    if msg.contains("decimal") || msg.contains("invalid type") {
        return Some(
            "Quantities and costs are plain numbers, e.g. `quantity: 2` or `unit_cost: 0.25`."
                .to_string(),
        );
    }

    None
}
