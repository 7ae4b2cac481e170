//! Discord markdown for pipeline results.

use std::fmt::Write;

use crate::analytics::ContextOverlap;
use crate::bias::{BiasCategory, DocumentAnalysis, SeverityBand};
use crate::diff::{DiffKind, TextComparison};
use crate::sentiment::TextMetrics;
use crate::store::types::CredibilityRecord;

/// Discord's limit is 2000; leave room for formatting.
pub const MAX_MESSAGE_LEN: usize = 1990;

/// Split text into Discord-safe pieces, preferring newline then space boundaries.
pub fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut remaining = text;
    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            pieces.push(remaining);
            break;
        }
        let limit = (1..=max_len)
            .rev()
            .find(|&i| remaining.is_char_boundary(i))
            .unwrap_or(remaining.len());
        let head = &remaining[..limit];
        let split_at = head
            .rfind('\n')
            .or_else(|| head.rfind(' '))
            .map(|i| i + 1)
            .unwrap_or(limit);
        pieces.push(&remaining[..split_at]);
        remaining = &remaining[split_at..];
    }
    pieces
}

pub fn analysis(
    analysis: &DocumentAnalysis,
    metrics: &TextMetrics,
    credibility: Option<&CredibilityRecord>,
) -> String {
    let level = analysis.level();
    let mut out = format!(
        "**Bias score:** {:.0}/100 ({})\n{}\n",
        analysis.bias_score,
        level.label(),
        level.assessment()
    );
    let _ = writeln!(
        out,
        "**Tone:** sentiment {:+.2}, subjectivity {:.2}",
        metrics.sentiment_score, metrics.subjectivity_score
    );
    if let Some(cred) = credibility {
        let _ = writeln!(out, "**Source:** {} (credibility {:.2})", cred.domain, cred.score);
    }

    let counts: Vec<String> = BiasCategory::KNOWN
        .iter()
        .map(|c| format!("{} {}", c, analysis.categories.get(c)))
        .collect();
    let _ = writeln!(
        out,
        "**Categories:** {} ({} of {} flagged passages categorised)",
        counts.join(" · "),
        analysis.categories.total(),
        analysis.instances.len()
    );

    if !analysis.instances.is_empty() {
        out.push_str("\n**Flagged passages:**\n");
        for (i, instance) in analysis.instances.iter().enumerate() {
            let _ = writeln!(
                out,
                "{} **{}.** [{} · {}/10] \"{}\"",
                SeverityBand::from_severity(instance.severity).marker(),
                i + 1,
                instance.category,
                instance.severity,
                instance.excerpt
            );
            if !instance.balanced_alternative.is_empty() {
                let _ = writeln!(out, "   ↳ {}", instance.balanced_alternative);
            }
        }
    }

    if !analysis.missing_context.is_empty() {
        out.push_str("\n**Missing context:**\n");
        for item in &analysis.missing_context {
            let _ = writeln!(
                out,
                "{} \"{}\": {}",
                SeverityBand::from_severity(item.importance).marker(),
                item.statement,
                item.context
            );
        }
    }
    out
}

pub fn comparison(comparison: &TextComparison) -> String {
    let c = comparison.changes;
    let mut out = format!(
        "**Changes:** +{} added · -{} removed · {} edited\n",
        c.added, c.removed, c.changed
    );
    for entry in &comparison.diff {
        let prefix = match entry.kind {
            DiffKind::Unchanged => continue,
            DiffKind::Removed => "-",
            DiffKind::Added => "+",
        };
        let _ = writeln!(out, "{} {}", prefix, entry.text);
    }
    out
}

pub fn coverage(
    topic: &str,
    articles: usize,
    variance: f64,
    similarity: f64,
    overlap: &ContextOverlap,
) -> String {
    format!(
        "**Coverage of '{}'** ({} articles)\n\
         Sentiment variance: {:.3}\n\
         Bias-category similarity: {:.2}\n\
         Flagged-passage overlap: {:.2}\n\
         Missing-context overlap: {:.2}",
        topic,
        articles,
        variance,
        similarity,
        overlap.event_overlap,
        overlap.missing_context_overlap
    )
}
