//! Sentence-level comparison of an article and its rewrite.
//!
//! Both texts are segmented into sentences and aligned as sequences. Inside a
//! block of replaced sentences, the closest pair (character similarity at or
//! above `NEAR_MATCH_RATIO`) is emitted as a removed/added pair and counted as
//! changed; everything else in the block is emitted as plain removals and
//! additions, shorter run first. Near matches are never merged into a single
//! entry, so a rewritten sentence always shows up as both of its versions.

use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffOp, DiffTag, TextDiff};
use tracing::debug;

use crate::text;

/// Sentences at least this similar (0-1, by characters) are reported as edits of each other.
pub const NEAR_MATCH_RATIO: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Unchanged,
    Removed,
    Added,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    pub text: String,
}

impl DiffEntry {
    fn new(kind: DiffKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub added: usize,
    pub removed: usize,
    /// Hint lines for near-matched sentence pairs: one per side that actually changed.
    pub changed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextComparison {
    pub changes: ChangeCounts,
    pub diff: Vec<DiffEntry>,
}

impl TextComparison {
    fn push(&mut self, kind: DiffKind, text: &str) {
        match kind {
            DiffKind::Added => self.changes.added += 1,
            DiffKind::Removed => self.changes.removed += 1,
            DiffKind::Unchanged => {}
        }
        self.diff.push(DiffEntry::new(kind, text));
    }

    /// Sentences of one side: `Added` filtered out gives the original,
    /// `Removed` filtered out gives the rewrite.
    #[cfg(test)]
    pub fn side(&self, skip: DiffKind) -> Vec<&str> {
        self.diff
            .iter()
            .filter(|e| e.kind != skip)
            .map(|e| e.text.as_str())
            .collect()
    }
}

/// Compare two texts sentence by sentence. Never fails.
pub fn compare(original: &str, rewritten: &str) -> TextComparison {
    let old = text::segment(original);
    let new = text::segment(rewritten);
    if old.is_empty() || new.is_empty() {
        debug!(
            original_sentences = old.len(),
            rewritten_sentences = new.len(),
            "one side is empty, comparing whole texts"
        );
        return whole_text_fallback(original, rewritten);
    }

    let mut out = TextComparison::default();
    for op in capture_diff_slices(Algorithm::Patience, &old, &new) {
        match op {
            DiffOp::Equal { old_index, len, .. } => {
                for line in &old[old_index..old_index + len] {
                    out.push(DiffKind::Unchanged, line);
                }
            }
            DiffOp::Delete {
                old_index, old_len, ..
            } => dump(&mut out, DiffKind::Removed, &old[old_index..old_index + old_len]),
            DiffOp::Insert {
                new_index, new_len, ..
            } => dump(&mut out, DiffKind::Added, &new[new_index..new_index + new_len]),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => replace_block(
                &mut out,
                &old[old_index..old_index + old_len],
                &new[new_index..new_index + new_len],
            ),
        }
    }
    out
}

fn whole_text_fallback(original: &str, rewritten: &str) -> TextComparison {
    let mut out = TextComparison::default();
    let original = original.trim();
    let rewritten = rewritten.trim();
    if !original.is_empty() {
        out.push(DiffKind::Removed, original);
    }
    if !rewritten.is_empty() {
        out.push(DiffKind::Added, rewritten);
    }
    out
}

fn dump(out: &mut TextComparison, kind: DiffKind, lines: &[String]) {
    for line in lines {
        out.push(kind, line);
    }
}

/// Pair up the most similar sentences in a replaced block, recursing on the
/// runs either side of the pair.
fn replace_block(out: &mut TextComparison, old: &[String], new: &[String]) {
    let mut best: Option<(usize, usize, f32)> = None;
    for (j, b) in new.iter().enumerate() {
        for (i, a) in old.iter().enumerate() {
            let ratio = TextDiff::from_chars(a.as_str(), b.as_str()).ratio();
            if best.map_or(true, |(_, _, r)| ratio > r) {
                best = Some((i, j, ratio));
            }
        }
    }

    let Some((i, j, ratio)) = best.filter(|&(_, _, r)| r >= NEAR_MATCH_RATIO) else {
        plain_replace(out, old, new);
        return;
    };

    replace_around(out, &old[..i], &new[..j]);
    out.push(DiffKind::Removed, &old[i]);
    out.push(DiffKind::Added, &new[j]);
    out.changes.changed += hint_lines(&old[i], &new[j]);
    debug!(ratio, "near-matched sentence pair");
    replace_around(out, &old[i + 1..], &new[j + 1..]);
}

fn replace_around(out: &mut TextComparison, old: &[String], new: &[String]) {
    match (old.is_empty(), new.is_empty()) {
        (false, false) => replace_block(out, old, new),
        (false, true) => dump(out, DiffKind::Removed, old),
        (true, false) => dump(out, DiffKind::Added, new),
        (true, true) => {}
    }
}

/// Unrelated sentences: shorter run first.
fn plain_replace(out: &mut TextComparison, old: &[String], new: &[String]) {
    if new.len() < old.len() {
        dump(out, DiffKind::Added, new);
        dump(out, DiffKind::Removed, old);
    } else {
        dump(out, DiffKind::Removed, old);
        dump(out, DiffKind::Added, new);
    }
}

/// One hint for the old sentence if it lost characters, one for the new if it gained any.
fn hint_lines(old: &str, new: &str) -> usize {
    let diff = TextDiff::from_chars(old, new);
    let (mut old_marked, mut new_marked) = (false, false);
    for op in diff.ops() {
        match op.tag() {
            DiffTag::Equal => {}
            DiffTag::Delete => old_marked = true,
            DiffTag::Insert => new_marked = true,
            DiffTag::Replace => {
                old_marked = true;
                new_marked = true;
            }
        }
    }
    usize::from(old_marked) + usize::from(new_marked)
}
