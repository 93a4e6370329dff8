//! Region transducer: rewrites the managed block of a configuration header.
//!
//! # How the scan works
//!
//! The input is processed one line at a time by a three-state machine:
//!
//! ```text
//!            BEGIN marker               END marker
//! Outside ───────────────▶ InsideBlock ─────────────▶ AfterBlock
//!  (copy)                   (rewrite)                   (copy)
//! ```
//!
//! Inside the block every line is offered first to each enable pattern, then
//! to each disable pattern, in resolved selection order.  The first pattern
//! that matches rewrites the line and no other pattern sees it.  When the END
//! marker arrives, every enabled feature that matched no line gets a fresh
//! `#define <prefix><NAME>` inserted just before the marker, which is what
//! makes a second run a no-op.
//!
//! The transducer never returns partial output: a missing, misplaced or
//! repeated marker is reported as a [`RegionError`] and the caller writes
//! nothing.
//!
//! Line terminators are carried through untouched, including `\r\n` and a
//! final line without a terminator.

mod patterns;

use thiserror::Error;
use tracing::debug;

use crate::domain::profile::{CasePolicy, EditorProfile, ProfileError};
use crate::domain::selection::Selection;

use patterns::TogglePattern;

/// Reasons a source cannot be rewritten.  Line numbers are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("begin marker '{marker}' not found")]
    BeginMarkerMissing { marker: String },

    #[error("end marker '{marker}' not found after begin marker on line {begin_line}")]
    EndMarkerMissing { marker: String, begin_line: usize },

    #[error("end marker on line {line} appears before the begin marker")]
    EndBeforeBegin { line: usize },

    #[error("extra marker on line {line}: only one managed block is supported")]
    DuplicateMarker { line: usize },

    #[error("cannot build toggle pattern for '{name}': {message}")]
    Pattern { name: String, message: String },
}

/// Output of one rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    /// The complete rewritten source.
    pub text: String,
    /// Managed-block lines in emission order, without terminators.
    /// Synthesised lines are included.
    pub block_lines: Vec<String>,
    /// Lines appended before the END marker for features with no toggle line.
    pub synthesized: Vec<String>,
    /// Number of existing block lines that a pattern rewrote.
    pub rewritten: usize,
    /// 1-based line numbers of the BEGIN and END markers in the input.
    pub begin_line: usize,
    pub end_line: usize,
    match_counts: Vec<(String, usize)>,
}

impl RewriteResult {
    /// How many block lines matched the enable pattern for `name`.
    ///
    /// Returns `0` for names that were not requested.
    pub fn match_count(&self, name: &str) -> usize {
        self.match_counts
            .iter()
            .find(|(n, _)| n == name)
            .map_or(0, |(_, count)| *count)
    }
}

/// Where the scan currently is relative to the managed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState<'a> {
    Outside,
    InsideBlock {
        begin_line: usize,
        /// Terminator of the BEGIN line, reused for synthesised lines.
        eol: &'a str,
    },
    AfterBlock,
}

/// Rewrites the managed block delimited by an [`EditorProfile`]'s markers.
///
/// Construction compiles the marker patterns once; each call to
/// [`rewrite`](Self::rewrite) compiles the per-feature toggle patterns for
/// that request.
#[derive(Debug, Clone)]
pub struct RegionTransducer {
    begin_marker: String,
    end_marker: String,
    define_prefix: String,
    case_policy: CasePolicy,
    begin_re: regex::Regex,
    end_re: regex::Regex,
}

impl RegionTransducer {
    /// Creates a transducer for `profile`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if the profile fails validation or a marker
    /// pattern cannot be compiled.
    pub fn new(profile: &EditorProfile) -> Result<Self, ProfileError> {
        profile.validate()?;
        let begin_re = patterns::marker(&profile.begin_marker)
            .map_err(|e| ProfileError::Pattern(e.to_string()))?;
        let end_re = patterns::marker(&profile.end_marker)
            .map_err(|e| ProfileError::Pattern(e.to_string()))?;
        Ok(Self {
            begin_marker: profile.begin_marker.clone(),
            end_marker: profile.end_marker.clone(),
            define_prefix: profile.define_prefix.clone(),
            case_policy: profile.case_policy,
            begin_re,
            end_re,
        })
    }

    /// Applies a resolved [`Selection`] to `source`.
    ///
    /// # Errors
    ///
    /// See [`rewrite`](Self::rewrite).
    pub fn apply(&self, source: &str, selection: &Selection) -> Result<RewriteResult, RegionError> {
        self.rewrite(source, selection.to_enable(), selection.to_disable())
    }

    /// Rewrites `source`, enabling every name in `to_enable` and disabling
    /// every name in `to_disable`.
    ///
    /// Names are used as given; registry validation is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns a [`RegionError`] if the markers are missing, out of order or
    /// repeated, or if a name cannot be turned into a pattern.
    pub fn rewrite<E, D>(
        &self,
        source: &str,
        to_enable: &[E],
        to_disable: &[D],
    ) -> Result<RewriteResult, RegionError>
    where
        E: AsRef<str>,
        D: AsRef<str>,
    {
        let enables = self.compile(to_enable)?;
        let disables = self.compile(to_disable)?;

        let mut counts: Vec<usize> = vec![0; enables.len()];
        let mut text = String::with_capacity(source.len() + 64);
        let mut block_lines = Vec::new();
        let mut synthesized = Vec::new();
        let mut rewritten = 0;
        let mut begin_at = 0;
        let mut end_at = 0;
        let mut state = ScanState::Outside;

        for (idx, raw) in source.split_inclusive('\n').enumerate() {
            let line_no = idx + 1;
            let (line, eol) = split_eol(raw);

            state = match state {
                ScanState::Outside => {
                    if self.end_re.is_match(line) {
                        return Err(RegionError::EndBeforeBegin { line: line_no });
                    }
                    text.push_str(raw);
                    if self.begin_re.is_match(line) {
                        begin_at = line_no;
                        ScanState::InsideBlock {
                            begin_line: line_no,
                            eol: if eol.is_empty() { "\n" } else { eol },
                        }
                    } else {
                        ScanState::Outside
                    }
                }

                ScanState::InsideBlock { eol: block_eol, .. } if self.end_re.is_match(line) => {
                    for (pattern, count) in enables.iter().zip(&counts) {
                        if *count == 0 {
                            let added = format!("#define {}{}", self.define_prefix, pattern.name);
                            text.push_str(&added);
                            text.push_str(block_eol);
                            block_lines.push(added.clone());
                            synthesized.push(added);
                        }
                    }
                    text.push_str(raw);
                    end_at = line_no;
                    ScanState::AfterBlock
                }

                inside @ ScanState::InsideBlock { .. } => {
                    if self.begin_re.is_match(line) {
                        return Err(RegionError::DuplicateMarker { line: line_no });
                    }
                    let emitted = match rewrite_line(line, &enables, &mut counts, &disables) {
                        Some(new_line) => {
                            rewritten += 1;
                            new_line
                        }
                        None => line.to_string(),
                    };
                    text.push_str(&emitted);
                    text.push_str(eol);
                    block_lines.push(emitted);
                    inside
                }

                ScanState::AfterBlock => {
                    if self.begin_re.is_match(line) || self.end_re.is_match(line) {
                        return Err(RegionError::DuplicateMarker { line: line_no });
                    }
                    text.push_str(raw);
                    ScanState::AfterBlock
                }
            };
        }

        match state {
            ScanState::AfterBlock => {}
            ScanState::Outside => {
                return Err(RegionError::BeginMarkerMissing {
                    marker: self.begin_marker.clone(),
                })
            }
            ScanState::InsideBlock { begin_line, .. } => {
                return Err(RegionError::EndMarkerMissing {
                    marker: self.end_marker.clone(),
                    begin_line,
                })
            }
        }

        debug!(
            begin_line = begin_at,
            end_line = end_at,
            rewritten,
            synthesized = synthesized.len(),
            "managed block rewritten"
        );

        Ok(RewriteResult {
            text,
            block_lines,
            synthesized,
            rewritten,
            begin_line: begin_at,
            end_line: end_at,
            match_counts: enables
                .into_iter()
                .map(|p| p.name)
                .zip(counts)
                .collect(),
        })
    }

    fn compile<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<TogglePattern>, RegionError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                TogglePattern::new(&self.define_prefix, name, self.case_policy).map_err(|e| {
                    RegionError::Pattern {
                        name: name.to_string(),
                        message: e.to_string(),
                    }
                })
            })
            .collect()
    }
}

/// Offers `line` to the enable patterns, then the disable patterns.  The
/// first match wins.
fn rewrite_line(
    line: &str,
    enables: &[TogglePattern],
    counts: &mut [usize],
    disables: &[TogglePattern],
) -> Option<String> {
    for (pattern, count) in enables.iter().zip(counts.iter_mut()) {
        if let Some(active) = pattern.activate(line) {
            *count += 1;
            return Some(active);
        }
    }
    disables.iter().find_map(|pattern| pattern.deactivate(line))
}

/// Splits a line produced by `split_inclusive('\n')` into body and terminator.
fn split_eol(raw: &str) -> (&str, &str) {
    if let Some(body) = raw.strip_suffix("\r\n") {
        (body, &raw[body.len()..])
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, &raw[body.len()..])
    } else {
        (raw, "")
    }
}
