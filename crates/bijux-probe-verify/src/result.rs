use serde::Serialize;

/// Verdict for one case or one named check. `passed` always equals
/// `issues.is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    ordinal: Option<usize>,
    subject: String,
    passed: bool,
    issues: Vec<String>,
    notes: Vec<String>,
}

impl VerificationResult {
    #[must_use]
    pub fn new(ordinal: Option<usize>, subject: impl Into<String>) -> Self {
        Self {
            ordinal,
            subject: subject.into(),
            passed: true,
            issues: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn issue(&mut self, issue: impl Into<String>) {
        self.issues.push(issue.into());
        self.passed = false;
    }

    pub fn extend_issues<I: IntoIterator<Item = String>>(&mut self, issues: I) {
        for issue in issues {
            self.issue(issue);
        }
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    #[must_use]
    pub fn ordinal(&self) -> Option<usize> {
        self.ordinal
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    #[must_use]
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    #[must_use]
    pub fn first_issue(&self) -> Option<&str> {
        self.issues.first().map(String::as_str)
    }
}
