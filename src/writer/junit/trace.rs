// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Stack trace filtering of test-framework noise.

use std::borrow::Cow;

/// Substrings marking stack trace lines that belong to test-framework and
/// reflection internals rather than to the code under test.
pub const DEFAULT_TRACE_FILTERS: &[&str] = &[
    "junit.framework.TestCase",
    "junit.framework.TestResult",
    "junit.framework.TestSuite",
    // Keeps `junit.framework.AssertionFailedError` lines.
    "junit.framework.Assert.",
    "java.lang.reflect.Method.invoke(",
    "sun.reflect.",
    "org.junit.",
    "junit.framework.JUnit4TestAdapter",
    " more",
    "android.test.",
    "android.app.Instrumentation",
    "java.lang.reflect.Method.invokeNative",
];

/// Indicates whether the given stack trace `line` is noise.
#[must_use]
pub fn is_noise(line: &str) -> bool {
    DEFAULT_TRACE_FILTERS.iter().any(|f| line.contains(f))
}

/// Drops every noise line (along with its line terminator) from the given
/// stack `trace`, keeping the rest byte-for-byte in original order.
#[must_use]
pub fn filter(trace: &str) -> String {
    trace.split_inclusive('\n').filter(|l| !is_noise(l)).collect()
}

/// Renders the given stack `trace` for a report, [`filter`]ing it if
/// `filtered` is `true`, or leaving it "as is" otherwise.
#[must_use]
pub fn render(trace: &str, filtered: bool) -> Cow<'_, str> {
    if filtered {
        filter(trace).into()
    } else {
        trace.into()
    }
}
