//! Sequence submissions and analysis results.
//!
//! A submission names either a known reference sequence or carries literal
//! sequence text, never both. Analysis results are whatever JSON object the
//! analysis backend produced; the domain only distinguishes "found" from
//! "no data".

use std::fmt;

use serde_json::{Map, Value};

/// Untyped analysis payload as produced by the analysis backend.
pub type AnalysisResult = Map<String, Value>;

/// Validation errors for sequence submissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceValidationError {
    #[error("sequence id must not be empty")]
    EmptySequenceId,
    #[error("sequence id must start with a letter or digit and contain only letters, digits, '.', '_' or '-'")]
    InvalidSequenceId,
    #[error("sequence entry `{name}` has no sequence text")]
    EmptySequenceText { name: String },
    #[error("submission must carry a reference id or sequence text")]
    EmptySubmission,
}

/// Accession-style identifier of a reference sequence, e.g. `NC_045512`.
///
/// ## Invariants
/// - Trimmed and non-empty.
/// - Only ASCII letters, digits, `.`, `_` and `-`, starting with a letter or
///   digit; the value is handed to an external process as an argument.
///
/// # Examples
/// ```
/// use virusdecode::domain::SequenceId;
///
/// let id = SequenceId::new(" NC_045512.2 ").unwrap();
/// assert_eq!(id.as_ref(), "NC_045512.2");
/// assert!(SequenceId::new("NC 045512").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceId(String);

impl SequenceId {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SequenceValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SequenceValidationError::EmptySequenceId);
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
        let leads_with_alphanumeric = trimmed.starts_with(|c: char| c.is_ascii_alphanumeric());
        if !leads_with_alphanumeric || !trimmed.chars().all(allowed) {
            return Err(SequenceValidationError::InvalidSequenceId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for SequenceId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One piece of literal sequence text, pasted or uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceEntry {
    name: String,
    text: String,
}

impl SequenceEntry {
    /// Build an entry; blank text is rejected, a blank name becomes `sequence`.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Result<Self, SequenceValidationError> {
        let name = name.into();
        let text = text.into();
        let name = match name.trim() {
            "" => "sequence".to_owned(),
            trimmed => trimmed.replace(['\r', '\n'], " "),
        };
        if text.trim().is_empty() {
            return Err(SequenceValidationError::EmptySequenceText { name });
        }
        Ok(Self { name, text })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Render as FASTA: verbatim when the text already starts with a header,
    /// otherwise prefixed with `>{name}`. Always newline-terminated.
    pub fn to_fasta(&self) -> String {
        let mut rendered = if self.text.trim_start().starts_with('>') {
            self.text.clone()
        } else {
            format!(">{}\n{}", self.name, self.text)
        };
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        rendered
    }
}

/// Alignment submission.
///
/// The frontend sends its chosen reference alongside any variant sequences,
/// so a reference may come alone or together with sequence text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantSubmission {
    Reference(SequenceId),
    Sequences(Vec<SequenceEntry>),
    /// Variant sequences to align against a named reference.
    AgainstReference {
        reference: SequenceId,
        entries: Vec<SequenceEntry>,
    },
}

impl VariantSubmission {
    /// Combine the optional halves of a submission.
    ///
    /// # Examples
    /// ```
    /// use virusdecode::domain::{SequenceEntry, SequenceId, SequenceValidationError, VariantSubmission};
    ///
    /// let entry = SequenceEntry::new("variant", "ACGT").unwrap();
    /// let submission = VariantSubmission::from_parts(None, vec![entry]).unwrap();
    /// assert!(matches!(submission, VariantSubmission::Sequences(_)));
    ///
    /// let reference = SequenceId::new("NC_045512").unwrap();
    /// let both = VariantSubmission::from_parts(
    ///     Some(reference.clone()),
    ///     vec![SequenceEntry::new("variant", "ACGT").unwrap()],
    /// )
    /// .unwrap();
    /// assert_eq!(both.reference(), Some(&reference));
    ///
    /// let neither = VariantSubmission::from_parts(None, Vec::new());
    /// assert_eq!(neither, Err(SequenceValidationError::EmptySubmission));
    /// ```
    pub fn from_parts(
        reference: Option<SequenceId>,
        entries: Vec<SequenceEntry>,
    ) -> Result<Self, SequenceValidationError> {
        match (reference, entries.is_empty()) {
            (Some(reference), false) => Ok(Self::AgainstReference { reference, entries }),
            (Some(id), true) => Ok(Self::Reference(id)),
            (None, false) => Ok(Self::Sequences(entries)),
            (None, true) => Err(SequenceValidationError::EmptySubmission),
        }
    }

    /// The named reference, if any.
    pub fn reference(&self) -> Option<&SequenceId> {
        match self {
            Self::Reference(id) | Self::AgainstReference { reference: id, .. } => Some(id),
            Self::Sequences(_) => None,
        }
    }

    /// Literal sequence text, empty for a bare reference.
    pub fn entries(&self) -> &[SequenceEntry] {
        match self {
            Self::Reference(_) => &[],
            Self::Sequences(entries) | Self::AgainstReference { entries, .. } => entries,
        }
    }
}

/// Result of an analysis: data, or an explicit "nothing found".
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Found(AnalysisResult),
    Empty,
}

impl AnalysisOutcome {
    /// Classify a result map; an empty object means "no data".
    pub fn from_result(result: AnalysisResult) -> Self {
        if result.is_empty() {
            Self::Empty
        } else {
            Self::Found(result)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
