//! `cantera audit`: locale file checks.

use std::io::{self, Write};
use std::path::Path;

use cantera_core::i18n::{
    AuditOptions, AuditReport, Inconsistency, InconsistencyKind, TranslationKey, audit,
};
use cantera_storefront::StorefrontError;
use cantera_storefront::i18n::load_dir;

use super::{CommandError, emit};
use crate::OutputFormat;

/// Audit every locale file in `dir` against the keys declared in code.
///
/// # Errors
///
/// Returns an error if a locale file cannot be read, or with `strict` when
/// the report has issues.
pub fn run(
    dir: &Path,
    format: OutputFormat,
    untranslated: bool,
    strict: bool,
) -> Result<(), CommandError> {
    let dictionaries = load_dir(dir).map_err(StorefrontError::from)?;
    if dictionaries.is_empty() {
        tracing::warn!(dir = %dir.display(), "No locale files found");
    }

    let options = AuditOptions {
        reference: None,
        report_untranslated: untranslated,
        declared_keys: Some(TranslationKey::declared()),
    };
    let report = audit(&dictionaries, &options);

    match format {
        OutputFormat::Text => emit(|out| render_text(&report, out))?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)?;
            emit(|out| writeln!(out, "{json}"))?;
        }
    }

    let issues = report.issue_count();
    if strict && issues > 0 {
        return Err(CommandError::AuditFailed(issues));
    }
    Ok(())
}

/// Human-readable audit report.
pub fn render_text(report: &AuditReport, out: &mut dyn Write) -> io::Result<()> {
    match report.reference {
        Some(reference) => writeln!(out, "Reference locale: {reference}")?,
        None => writeln!(out, "Reference locale: none")?,
    }
    writeln!(out, "Expected keys: {}", report.total_keys)?;

    for locale in &report.locales {
        writeln!(out)?;
        writeln!(
            out,
            "[{}] {} keys, {} missing, {} duplicate, {} inconsistent",
            locale.locale,
            locale.key_count,
            locale.missing.len(),
            locale.duplicates.len(),
            locale.inconsistent.len(),
        )?;
        for key in &locale.missing {
            writeln!(out, "  missing       {key}")?;
        }
        for key in &locale.duplicates {
            writeln!(out, "  duplicate     {key}")?;
        }
        for issue in &locale.inconsistent {
            writeln!(out, "  inconsistent  {} ({})", issue.key, describe(issue))?;
        }
        for key in &locale.untranslated {
            writeln!(out, "  untranslated  {key}")?;
        }
    }

    if !report.unknown_keys.is_empty() {
        writeln!(out)?;
        writeln!(out, "Keys not declared in code ({}):", report.unknown_keys.len())?;
        for key in &report.unknown_keys {
            writeln!(out, "  {key}")?;
        }
    }

    writeln!(out)?;
    match report.issue_count() {
        0 => writeln!(out, "No issues found"),
        n => writeln!(out, "{n} issue(s) found"),
    }
}

fn describe(issue: &Inconsistency) -> String {
    match &issue.kind {
        InconsistencyKind::PlaceholderMismatch { expected, found } => {
            format!("placeholders {expected:?}, found {found:?}")
        }
        InconsistencyKind::MarkupMismatch { expected, found } => {
            format!("markup {expected:?}, found {found:?}")
        }
        InconsistencyKind::Blank => "blank value".to_string(),
    }
}
