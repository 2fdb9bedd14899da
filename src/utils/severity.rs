use serde::Serialize;
use std::fmt;
use std::process::ExitCode;

/// kind of policy violation that fails a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// no fragment was added under any fragment directory
    MissingFragment,
    /// fragment type token is not a configured type
    UnknownType,
    /// fragment name does not carry the pull request number
    NumberMismatch,
    /// a fragment was added although the skip label promises none
    SkipLabelContradiction,
    /// what's new label is set but no entry was added
    MissingWhatsNew,
    /// more than one what's new entry was added
    TooManyWhatsNew,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MissingFragment => write!(f, "missing_fragment"),
            ViolationKind::UnknownType => write!(f, "unknown_type"),
            ViolationKind::NumberMismatch => write!(f, "number_mismatch"),
            ViolationKind::SkipLabelContradiction => write!(f, "skip_label_contradiction"),
            ViolationKind::MissingWhatsNew => write!(f, "missing_whatsnew"),
            ViolationKind::TooManyWhatsNew => write!(f, "too_many_whatsnew"),
        }
    }
}

/// a policy violation with a user-actionable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// final outcome of a check run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verdict {
    Pass { message: String },
    Fail { violation: Violation },
}

impl Verdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Verdict::Pass {
            message: message.into(),
        }
    }

    pub fn fail(kind: ViolationKind, message: impl Into<String>) -> Self {
        Verdict::Fail {
            violation: Violation::new(kind, message),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Verdict::Pass { message } => message,
            Verdict::Fail { violation } => &violation.message,
        }
    }

    pub fn violation_kind(&self) -> Option<ViolationKind> {
        match self {
            Verdict::Pass { .. } => None,
            Verdict::Fail { violation } => Some(violation.kind),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_pass() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

impl From<Violation> for Verdict {
    fn from(violation: Violation) -> Self {
        Verdict::Fail { violation }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
