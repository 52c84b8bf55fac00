// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error types for the value-graph serializer.

use std::fmt;

/// ErrorKind is all kinds of Error this crate can return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A value outside the supported catalog was encountered during Probe.
    UnsupportedType,
    /// Recursion depth or total item count exceeded the hard limits.
    LimitsExceeded,
    /// The leading version byte did not match [`crate::VERSION`].
    VersionMismatch,
    /// A reader would have to read past the end of the input.
    Truncation,
    /// A tag byte has no assigned reader.
    InvalidTag,
    /// A `STR_REF` id has no corresponding prior `STR_NEW`.
    InvalidReference,
    /// The decision stack and the encoder disagreed on byte count. Indicates a bug.
    InternalInvariant,
    /// Input had extra bytes after the single top-level value was fully read.
    TrailingData,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::UnsupportedType => "UnsupportedType",
            ErrorKind::LimitsExceeded => "LimitsExceeded",
            ErrorKind::VersionMismatch => "VersionMismatch",
            ErrorKind::Truncation => "Truncation",
            ErrorKind::InvalidTag => "InvalidTag",
            ErrorKind::InvalidReference => "InvalidReference",
            ErrorKind::InternalInvariant => "InternalInvariant",
            ErrorKind::TrailingData => "TrailingData",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by every fallible operation in this crate.
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::default(),
            source: None,
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Panics
    ///
    /// Panics if the source has already been set.
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

// Convenience constructors, one per failure mode in the error taxonomy.
impl Error {
    pub(crate) fn unsupported_type(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedType, msg)
    }

    pub(crate) fn limits_exceeded(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::LimitsExceeded, msg)
    }

    pub(crate) fn version_mismatch(expected: u8, actual: u8) -> Self {
        Self::new(
            ErrorKind::VersionMismatch,
            format!("unsupported version: expected {expected}, got {actual}"),
        )
    }

    pub(crate) fn truncation(context: &'static str) -> Self {
        Self::new(
            ErrorKind::Truncation,
            format!("input truncated while reading {context}"),
        )
    }

    pub(crate) fn invalid_tag(tag: u8) -> Self {
        Self::new(ErrorKind::InvalidTag, format!("invalid tag byte: {tag:#04x}"))
    }

    pub(crate) fn invalid_reference(id: u32, known: usize) -> Self {
        Self::new(
            ErrorKind::InvalidReference,
            format!("string reference {id} has no prior definition ({known} known)"),
        )
    }

    pub(crate) fn internal_invariant(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalInvariant, msg)
    }

    pub(crate) fn trailing_data(extra: usize) -> Self {
        Self::new(
            ErrorKind::TrailingData,
            format!("{extra} byte(s) remained after the top-level value"),
        )
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            de.field("source", &self.source);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let e = Error::new(ErrorKind::InvalidTag, "bad tag");
        assert_eq!(format!("{e}"), "InvalidTag => bad tag");
    }

    #[test]
    fn context_round_trips_through_display() {
        let e = Error::new(ErrorKind::Truncation, "short read").with_context("at", 12);
        let s = format!("{e}");
        assert!(s.contains("at: 12"), "{s}");
    }
}
