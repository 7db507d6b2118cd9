//! Literal typing: scalar field values become typed lexical forms.
//!
//! Typing is shape-driven. Booleans map to `xsd:boolean` with a `true`/`false`
//! lexical form, date-times keep their ISO-8601 lexical form byte for byte
//! (no timezone renormalization), everything else is a plain `xsd:string`.
//! Absence is handled upstream: a missing field value never reaches this
//! module, while an empty string is a legitimate lexical form.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, SecondsFormat, TimeZone};
use serde::Serialize;

use crate::vocab::xsd;

/// Scalar kind inferred from a field value's shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarKind {
    /// Plain string literal (`xsd:string`).
    Text,
    /// Boolean literal (`xsd:boolean`).
    Boolean,
    /// Date-time literal (`xsd:dateTime`).
    DateTime,
}

impl ScalarKind {
    /// Returns the XSD datatype IRI for this kind.
    #[must_use]
    pub fn datatype(self) -> &'static str {
        match self {
            Self::Text => xsd::STRING,
            Self::Boolean => xsd::BOOLEAN,
            Self::DateTime => xsd::DATE_TIME,
        }
    }
}

/// Raw scalar read out of a mapped field, before typing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScalarValue {
    /// Free-form text, including the empty string.
    Text(String),
    /// Boolean flag.
    Bool(bool),
    /// ISO-8601 date-time, stored as its lexical form.
    DateTime(String),
}

impl ScalarValue {
    /// Wraps free-form text.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Wraps an ISO-8601 lexical form without reformatting it.
    pub fn date_time(lexical: impl Into<String>) -> Self {
        Self::DateTime(lexical.into())
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ScalarValue
where
    Tz::Offset: Display,
{
    /// Renders the timestamp once, at construction. The resulting lexical
    /// form is preserved unchanged from here on.
    fn from(value: DateTime<Tz>) -> Self {
        Self::DateTime(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

/// A typed literal value: lexical form plus inferred scalar kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Literal {
    lexical: String,
    kind: ScalarKind,
}

impl Literal {
    /// Types a raw scalar according to its shape.
    #[must_use]
    pub fn of(value: ScalarValue) -> Self {
        match value {
            ScalarValue::Text(lexical) => Self {
                lexical,
                kind: ScalarKind::Text,
            },
            ScalarValue::Bool(flag) => Self {
                lexical: if flag { "true" } else { "false" }.to_owned(),
                kind: ScalarKind::Boolean,
            },
            ScalarValue::DateTime(lexical) => Self {
                lexical,
                kind: ScalarKind::DateTime,
            },
        }
    }

    /// Returns the lexical form.
    #[must_use]
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// Returns the inferred scalar kind.
    #[must_use]
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lexical)?;
        if self.kind != ScalarKind::Text {
            write!(f, "^^<{}>", self.kind.datatype())?;
        }
        Ok(())
    }
}
