use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Logical collection a record is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Leads,
    Messages,
}

impl Destination {
    pub const ALL: [Destination; 2] = [Destination::Leads, Destination::Messages];

    pub fn as_str(self) -> &'static str {
        match self {
            Destination::Leads => "leads",
            Destination::Messages => "messages",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|destination| destination.as_str() == raw)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interest {
    #[default]
    Buying,
    Rental,
    Clinic,
}

impl Interest {
    pub const ALL: [Interest; 3] = [Interest::Buying, Interest::Rental, Interest::Clinic];

    pub fn as_str(self) -> &'static str {
        match self {
            Interest::Buying => "buying",
            Interest::Rental => "rental",
            Interest::Clinic => "clinic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Interest::Buying => "Purchasing a Chamber (Home Use)",
            Interest::Rental => "Renting a Chamber",
            Interest::Clinic => "Clinic / Professional Use",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|interest| interest.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visitor-supplied payload appended to a destination collection.
///
/// The gateway assigns the write timestamp; clients never send one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest: Option<Interest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LeadRecord {
    pub fn inquiry(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        interest: Interest,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            interest: Some(interest),
            subject: None,
            message: None,
        }
    }
}

/// Loose shape check matching what a browser `type=email` input accepts.
pub fn looks_like_email(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain
            .split('.')
            .all(|label| !label.is_empty())
}
