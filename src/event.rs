// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Key occurrences in a lifecycle of an instrumentation test run.
//!
//! The external test-execution engine describes every test it runs with a
//! [`Description`], and every problem it observes with a [`Failure`]. Both are
//! fed to a [`Listener`] in the order they actually happen.
//!
//! [`Listener`]: crate::Listener

use derive_more::with_trait::Display;

/// Placeholder used instead of an absent [`Failure::message`].
pub const NULL_MESSAGE: &str = "<null>";

/// Identity of a test, or of a suite-level marker, reported by the external
/// test-execution engine.
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
#[display("{class_name}#{display_name}")]
pub struct Description {
    /// Fully qualified name of the class declaring the test.
    ///
    /// Tests sharing a class name form a single JUnit `testsuite`.
    pub class_name: String,

    /// Human-readable name of the test.
    pub display_name: String,

    /// Indicates whether this [`Description`] represents an individual test
    /// rather than a suite-level marker.
    pub is_test: bool,
}

impl Description {
    /// Creates a [`Description`] of an individual test.
    #[must_use]
    pub fn test(
        class_name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            display_name: display_name.into(),
            is_test: true,
        }
    }

    /// Creates a [`Description`] of a suite-level marker, named after its
    /// class.
    #[must_use]
    pub fn suite(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            display_name: class_name.clone(),
            class_name,
            is_test: false,
        }
    }

    /// Indicates whether this [`Description`] represents an individual test.
    #[must_use]
    pub const fn is_test(&self) -> bool {
        self.is_test
    }
}

/// Kind of a problem recorded for a test case, selecting its XML element.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Problem {
    /// Assertion failed in a test.
    #[display("failure")]
    Failure,

    /// Test ended with an unexpected error.
    #[display("error")]
    Error,
}

impl Problem {
    /// Returns the name of the XML element this [`Problem`] is reported with.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Failure => "failure",
            Self::Error => "error",
        }
    }
}

/// Failure (or error) of a test, as observed by the external engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Failure {
    /// [`Description`] of the failed test.
    pub description: Description,

    /// Fully qualified name of the failure kind (usually an exception class
    /// name, like `java.lang.AssertionError`).
    pub kind: String,

    /// Message of the failure, if any.
    pub message: Option<String>,

    /// Full stack trace of the failure.
    pub trace: String,
}

impl Failure {
    /// Creates a new [`Failure`] of the given `kind` without any message or
    /// stack trace.
    #[must_use]
    pub fn new(description: Description, kind: impl Into<String>) -> Self {
        Self {
            description,
            kind: kind.into(),
            message: None,
            trace: String::new(),
        }
    }

    /// Sets the message of this [`Failure`].
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the stack trace of this [`Failure`].
    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = trace.into();
        self
    }

    /// Formats this [`Failure`] for the `message` attribute of a report.
    ///
    /// Always starts with the [`Failure::kind`], so the attribute is never
    /// empty, even if [`Failure::message`] is absent.
    #[must_use]
    pub fn safe_message(&self) -> String {
        format!(
            "{}: {}",
            self.kind,
            self.message.as_deref().unwrap_or(NULL_MESSAGE),
        )
    }
}
