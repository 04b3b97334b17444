use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Contact,
    Developer,
    Mentor,
    Test,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Contact => "contact",
            RecordKind::Developer => "developer",
            RecordKind::Mentor => "mentor",
            RecordKind::Test => "test",
        }
    }

    pub fn is_application(&self) -> bool {
        matches!(self, RecordKind::Developer | RecordKind::Mentor)
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactDetails {
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationDetails {
    pub experience: String,
    pub skills: String,
    pub motivation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecordDetails {
    Application(ApplicationDetails),
    Contact(ContactDetails),
}

/// What the form layer collects. Has no timestamp or source; those are
/// stamped by the submission client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormInput {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub details: RecordDetails,
}

impl FormInput {
    pub fn contact(name: &str, email: &str, subject: &str, message: &str) -> Self {
        Self {
            kind: RecordKind::Contact,
            name: name.to_string(),
            email: email.to_string(),
            details: RecordDetails::Contact(ContactDetails {
                subject: subject.to_string(),
                message: message.to_string(),
            }),
        }
    }

    pub fn application(kind: RecordKind, name: &str, email: &str, details: ApplicationDetails) -> Self {
        Self {
            kind,
            name: name.to_string(),
            email: email.to_string(),
            details: RecordDetails::Application(details),
        }
    }

    /// Collect every problem with the input. An empty vec means valid.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("Missing required field: name".to_string());
        }

        let email = self.email.trim();
        if email.is_empty() {
            problems.push("Missing required field: email".to_string());
        } else if !email.contains('@') {
            problems.push("Invalid email format: email".to_string());
        }

        match (&self.details, self.kind.is_application()) {
            (RecordDetails::Contact(c), false) => {
                require(&mut problems, "subject", &c.subject);
                require(&mut problems, "message", &c.message);
            }
            (RecordDetails::Application(a), true) => {
                require(&mut problems, "experience", &a.experience);
                require(&mut problems, "skills", &a.skills);
                require(&mut problems, "motivation", &a.motivation);
            }
            (RecordDetails::Contact(_), true) => {
                problems.push(format!("{} submissions need application details", self.kind));
            }
            (RecordDetails::Application(_), false) => {
                problems.push(format!("{} submissions need subject and message", self.kind));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    pub(crate) fn stamp(self, source: &str, submitted_at: DateTime<Utc>) -> SubmissionRecord {
        SubmissionRecord {
            kind: self.kind,
            name: self.name,
            email: self.email,
            details: self.details,
            submitted_at,
            source: source.to_string(),
        }
    }
}

fn require(problems: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        problems.push(format!("Missing required field: {field}"));
    }
}

/// A stamped record, ready to go over the wire.
///
/// Only [`crate::client::SubmissionClient`] builds these, so `submitted_at`
/// is always the moment `submit` was called.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionRecord {
    #[serde(rename = "type")]
    kind: RecordKind,
    name: String,
    email: String,
    #[serde(flatten)]
    details: RecordDetails,
    #[serde(rename = "timestamp", serialize_with = "iso_millis")]
    submitted_at: DateTime<Utc>,
    source: String,
}

impl SubmissionRecord {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn details(&self) -> &RecordDetails {
        &self.details
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to serialize record: {e}"))
    }
}

fn iso_millis<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Routing key naming the remote sheet a record lands in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetCollection(String);

impl TargetCollection {
    pub const CONTACTS: &'static str = "contacts";
    pub const APPLICATIONS: &'static str = "applications";

    pub fn new(name: &str) -> Result<Self, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Target collection name must not be empty".to_string());
        }
        Ok(Self(name.to_string()))
    }

    pub fn contacts() -> Self {
        Self(Self::CONTACTS.to_string())
    }

    pub fn applications() -> Self {
        Self(Self::APPLICATIONS.to_string())
    }

    pub fn for_kind(kind: RecordKind) -> Self {
        if kind.is_application() {
            Self::applications()
        } else {
            Self::contacts()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TargetCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
