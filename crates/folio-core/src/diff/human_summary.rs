//! Human-readable summary renderer for version comparisons.

use serde_json::Value;

use crate::diff::model::{ChangeKind, VersionComparison};
use crate::model::VersionSummary;

/// Longest rendered value before truncation
const MAX_VALUE_CHARS: usize = 80;

/// Render a Markdown summary of a [`VersionComparison`].
///
/// Informational only; the structured comparison is the source of truth.
pub fn render_human_summary(comparison: &VersionComparison) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "## {}: version {} → version {}\n\n",
        comparison.entity,
        comparison.version1.version_number,
        comparison.version2.version_number
    ));

    out.push_str("| | Version | Summary | Author | Flags |\n|---|---|---|---|---|\n");
    out.push_str(&summary_row("A", &comparison.version1));
    out.push_str(&summary_row("B", &comparison.version2));
    out.push('\n');

    if comparison.is_identical() {
        out.push_str("_No field changes._\n");
        return out;
    }

    out.push_str(&format!(
        "**Changes**: {} modified, {} added, {} removed\n\n",
        comparison.count(ChangeKind::Modified),
        comparison.count(ChangeKind::Added),
        comparison.count(ChangeKind::Removed)
    ));

    for diff in &comparison.differences {
        match diff.kind {
            ChangeKind::Added => out.push_str(&format!(
                "- **{}** added: `{}`\n",
                diff.field,
                short(&diff.new)
            )),
            ChangeKind::Removed => out.push_str(&format!(
                "- **{}** removed (was `{}`)\n",
                diff.field,
                short(&diff.old)
            )),
            ChangeKind::Modified => out.push_str(&format!(
                "- **{}** modified: `{}` → `{}`\n",
                diff.field,
                short(&diff.old),
                short(&diff.new)
            )),
        }
    }

    out
}

fn summary_row(label: &str, summary: &VersionSummary) -> String {
    let mut flags = Vec::new();
    if summary.is_current {
        flags.push("current");
    }
    if summary.is_published {
        flags.push("published");
    }
    flags.push(summary.origin.as_str());
    format!(
        "| {} | {} | {} | {} | {} |\n",
        label,
        summary.version_number,
        summary.change_summary,
        summary.author.as_deref().unwrap_or("-"),
        flags.join(", ")
    )
}

fn short(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.chars().count() > MAX_VALUE_CHARS {
        let cut: String = text.chars().take(MAX_VALUE_CHARS).collect();
        format!("{}…", cut)
    } else {
        text
    }
}
