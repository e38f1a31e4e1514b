//! Closed vocabulary of semantic hints
//!
//! A hint tells the load generator what kind of synthetic value to produce
//! for a leaf field. The wire names are the camelCase strings stored in the
//! `x-user-hint` extension.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic hint for a leaf field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Hint {
    FirstName,
    LastName,
    FullName,
    Name,
    Email,
    Username,
    Password,
    Url,
    Uri,
    DomainName,
    Hostname,
    Ip,
    Ipv4,
    Ipv6,
    City,
    State,
    Country,
    Word,
    String,
    Date,
    Timestamp,
    DateTime,
    Iso8601,
    Uuid,
    Number,
    Integer,
    Int,
    Float,
    Double,
    Boolean,
    Byte,
    Binary,
    Id,
}

/// Grouping used when presenting the vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintCategory {
    Person,
    Internet,
    Address,
    Text,
    Date,
    Datatype,
    Identifier,
}

impl HintCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HintCategory::Person => "person",
            HintCategory::Internet => "internet",
            HintCategory::Address => "address",
            HintCategory::Text => "text",
            HintCategory::Date => "date",
            HintCategory::Datatype => "datatype",
            HintCategory::Identifier => "identifier",
        }
    }
}

impl fmt::Display for HintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Hint {
    /// Every hint, in presentation order
    pub const ALL: [Hint; 33] = [
        Hint::FirstName,
        Hint::LastName,
        Hint::FullName,
        Hint::Name,
        Hint::Email,
        Hint::Username,
        Hint::Password,
        Hint::Url,
        Hint::Uri,
        Hint::DomainName,
        Hint::Hostname,
        Hint::Ip,
        Hint::Ipv4,
        Hint::Ipv6,
        Hint::City,
        Hint::State,
        Hint::Country,
        Hint::Word,
        Hint::String,
        Hint::Date,
        Hint::Timestamp,
        Hint::DateTime,
        Hint::Iso8601,
        Hint::Uuid,
        Hint::Number,
        Hint::Integer,
        Hint::Int,
        Hint::Float,
        Hint::Double,
        Hint::Boolean,
        Hint::Byte,
        Hint::Binary,
        Hint::Id,
    ];

    /// Wire name stored in `x-user-hint`
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Hint::FirstName => "firstName",
            Hint::LastName => "lastName",
            Hint::FullName => "fullName",
            Hint::Name => "name",
            Hint::Email => "email",
            Hint::Username => "username",
            Hint::Password => "password",
            Hint::Url => "url",
            Hint::Uri => "uri",
            Hint::DomainName => "domainName",
            Hint::Hostname => "hostname",
            Hint::Ip => "ip",
            Hint::Ipv4 => "ipv4",
            Hint::Ipv6 => "ipv6",
            Hint::City => "city",
            Hint::State => "state",
            Hint::Country => "country",
            Hint::Word => "word",
            Hint::String => "string",
            Hint::Date => "date",
            Hint::Timestamp => "timestamp",
            Hint::DateTime => "dateTime",
            Hint::Iso8601 => "iso8601",
            Hint::Uuid => "uuid",
            Hint::Number => "number",
            Hint::Integer => "integer",
            Hint::Int => "int",
            Hint::Float => "float",
            Hint::Double => "double",
            Hint::Boolean => "boolean",
            Hint::Byte => "byte",
            Hint::Binary => "binary",
            Hint::Id => "id",
        }
    }

    #[must_use]
    pub fn category(self) -> HintCategory {
        match self {
            Hint::FirstName | Hint::LastName | Hint::FullName | Hint::Name => HintCategory::Person,
            Hint::Email
            | Hint::Username
            | Hint::Password
            | Hint::Url
            | Hint::Uri
            | Hint::DomainName
            | Hint::Hostname
            | Hint::Ip
            | Hint::Ipv4
            | Hint::Ipv6 => HintCategory::Internet,
            Hint::City | Hint::State | Hint::Country => HintCategory::Address,
            Hint::Word | Hint::String => HintCategory::Text,
            Hint::Date | Hint::Timestamp | Hint::DateTime | Hint::Iso8601 => HintCategory::Date,
            Hint::Uuid
            | Hint::Number
            | Hint::Integer
            | Hint::Int
            | Hint::Float
            | Hint::Double
            | Hint::Boolean
            | Hint::Byte
            | Hint::Binary => HintCategory::Datatype,
            Hint::Id => HintCategory::Identifier,
        }
    }

    /// `<category>: <wire name>`
    #[must_use]
    pub fn option_label(self) -> String {
        format!("{}: {}", self.category(), self.as_str())
    }

    /// Selector options for [`Hint::ALL`], same order, grouped by category
    #[must_use]
    pub fn options() -> Vec<String> {
        Hint::ALL.iter().copied().map(Hint::option_label).collect()
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hint::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| format!("unknown hint: {s}"))
    }
}
