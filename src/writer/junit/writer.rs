// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Main JUnit XML writer implementation.

use std::{mem, path::Path, time::Instant};

use quick_xml::events::BytesStart;
use tracing::{debug, error, info, warn};

use crate::{
    clock::{self, Clock, Monotonic},
    error::Result,
    event::{Description, Failure, Problem},
    Listener,
};

use super::{
    cli::{Config, SUITE_TOKEN},
    document::{sanitize, Document},
    trace,
};

const TAG_SUITE: &str = "testsuite";
const TAG_CASE: &str = "testcase";
const ATTRIBUTE_NAME: &str = "name";
const ATTRIBUTE_CLASS: &str = "classname";
const ATTRIBUTE_TYPE: &str = "type";
const ATTRIBUTE_MESSAGE: &str = "message";
const ATTRIBUTE_TIME: &str = "time";

/// [JUnit XML report][1] writer streaming test lifecycle events into report
/// files as they happen.
///
/// Test cases are grouped into [JUnit `testsuite`s][1] by their class name.
/// A new `testsuite` starts every time a test of a class other than the
/// current one starts, so the external engine is expected to run tests of a
/// single class one after another.
///
/// Every test case is flushed into the report file as soon as it finishes,
/// so a crashed run still leaves everything reported before the crash.
///
/// # Errors
///
/// Only failing to open a report file is reported to the caller (see
/// [`JUnit::test_started()`]). Any error happening while writing an already
/// open report is logged and otherwise ignored, so reporting never fails a
/// test run.
///
/// [1]: https://llg.cubic.org/docs/junit
#[derive(Debug)]
pub struct JUnit<C: Clock = Monotonic> {
    /// [`Config`] of this [`JUnit`] writer.
    config: Config,

    /// [`Clock`] measuring test cases.
    clock: C,

    /// Currently open report, if any.
    document: Option<Document>,

    /// Position of the XML cursor in the current [`Document`].
    state: State,
}

/// Position of the XML cursor of a [`JUnit`] writer.
#[derive(Debug, Default)]
enum State {
    /// No `testsuite` is open.
    #[default]
    Idle,

    /// `testsuite` of the `suite` class is open, waiting for test cases.
    SuiteOpen {
        /// Class name of the open suite.
        suite: String,
    },

    /// Test `case` of the `suite` class is open.
    CaseOpen {
        /// Class name of the open suite.
        suite: String,

        /// Open test case.
        case: Case,
    },
}

/// Test case being written.
#[derive(Debug)]
struct Case {
    /// [`Instant`] when this [`Case`] has started.
    started_at: Instant,

    /// `testcase` start tag not yet written into the report.
    ///
    /// Held back until the first child element (or the end of this
    /// [`Case`]), so the `time` attribute can still be appended to it.
    pending: Option<BytesStart<'static>>,

    /// Whether the `time` attribute has been recorded already.
    time_written: bool,
}

impl Case {
    /// Starts a new [`Case`] for the given `test`.
    fn start(test: &Description, now: Instant) -> Self {
        let mut tag = BytesStart::new(TAG_CASE);
        tag.push_attribute((ATTRIBUTE_CLASS, &*sanitize(&test.class_name)));
        tag.push_attribute((ATTRIBUTE_NAME, &*sanitize(&test.display_name)));
        Self {
            started_at: now,
            pending: Some(tag),
            time_written: false,
        }
    }

    /// Records the time elapsed since this [`Case`] has started, unless it's
    /// recorded already.
    fn record_time(&mut self, now: Instant) {
        if mem::replace(&mut self.time_written, true) {
            return;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        if let Some(tag) = &mut self.pending {
            tag.push_attribute((
                ATTRIBUTE_TIME,
                clock::format_seconds(elapsed).as_str(),
            ));
        }
    }
}

impl JUnit {
    /// Creates a new [`JUnit`] writer measuring test cases with a
    /// [`Monotonic`] clock.
    ///
    /// No file is touched until the first test starts.
    #[must_use]
    pub fn new(config: impl Into<Config>) -> Self {
        Self::with_clock(config, Monotonic)
    }
}

impl<C: Clock> JUnit<C> {
    /// Creates a new [`JUnit`] writer measuring test cases with the given
    /// [`Clock`].
    #[must_use]
    pub fn with_clock(config: impl Into<Config>, clock: C) -> Self {
        let config = config.into();
        info!(
            "JUnit report writer created with arguments:\n  \
             report file  : '{}'\n  \
             report dir   : '{}'\n  \
             filter traces: {}\n  \
             multi file   : {}",
            config.report_file,
            config
                .report_dir
                .as_deref()
                .map(Path::display)
                .map(|d| d.to_string())
                .unwrap_or_default(),
            config.filter_traces,
            config.multi_file,
        );
        if config.multi_file && !config.report_file.contains(SUITE_TOKEN) {
            warn!(
                "Report file `{}` has no `{SUITE_TOKEN}` token, so every suite \
                 will overwrite the report of the previous one",
                config.report_file,
            );
        }
        Self {
            config,
            clock,
            document: None,
            state: State::Idle,
        }
    }

    /// Returns the [`Config`] of this [`JUnit`] writer.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the class name of the currently open suite, if any.
    #[must_use]
    pub fn current_suite(&self) -> Option<&str> {
        match &self.state {
            State::Idle => None,
            State::SuiteOpen { suite } | State::CaseOpen { suite, .. } => {
                Some(suite)
            }
        }
    }

    /// Indicates whether a test case is currently open.
    #[must_use]
    pub const fn is_case_open(&self) -> bool {
        matches!(self.state, State::CaseOpen { .. })
    }

    /// Returns the path of the currently open report file, if any.
    #[must_use]
    pub fn report_path(&self) -> Option<&Path> {
        self.document.as_ref().map(Document::path)
    }

    /// Starts a new test case for the given `test`.
    ///
    /// Suite-level markers are ignored. If the `test` belongs to a class
    /// other than the current suite, the current suite is closed (along with
    /// its report file in multi-file mode) and a new one is opened.
    ///
    /// A test case left open by the previous test is closed first.
    ///
    /// # Errors
    ///
    /// If the report file for the new suite cannot be opened, or its
    /// directory cannot be created.
    pub fn test_started(&mut self, test: &Description) -> Result<()> {
        if !test.is_test() {
            debug!("Ignoring start of suite-level `{test}`");
            return Ok(());
        }

        let open = match mem::take(&mut self.state) {
            State::Idle => None,
            State::SuiteOpen { suite } => Some(suite),
            State::CaseOpen { suite, case } => {
                warn!("Test in `{suite}` has not finished before `{test}`");
                let res = self.end_case(case);
                log_failure(
                    res,
                    "close unfinished test case",
                    self.report_path(),
                );
                Some(suite)
            }
        };
        let suite = match open {
            Some(suite) if suite == test.class_name => suite,
            open => self.enter_suite(open.is_some(), &test.class_name)?,
        };

        self.state = State::CaseOpen {
            suite,
            case: Case::start(test, self.clock.now()),
        };
        Ok(())
    }

    /// Finishes the currently open test case, recording its time unless a
    /// failure has recorded it already, and flushes the report.
    pub fn test_finished(&mut self, test: &Description) {
        match mem::take(&mut self.state) {
            State::CaseOpen { suite, case } => {
                let res = self.end_case(case);
                log_failure(res, "finish test case", self.report_path());
                self.state = State::SuiteOpen { suite };
            }
            state => {
                self.state = state;
                if test.is_test() {
                    warn!("Ignoring finish of `{test}` which has not started");
                }
            }
        }
    }

    /// Records the given `failure` of the currently open test case.
    pub fn test_failure(&mut self, failure: &Failure) {
        self.add_problem(Problem::Failure, failure);
    }

    /// Records the given `error` of the currently open test case.
    pub fn test_error(&mut self, error: &Failure) {
        self.add_problem(Problem::Error, error);
    }

    /// Closes everything left open and releases the report file.
    ///
    /// Safe to call at any moment, any number of times. Never fails: errors
    /// are logged.
    pub fn close(&mut self) {
        let suite_open = match mem::take(&mut self.state) {
            State::Idle => false,
            State::SuiteOpen { .. } => true,
            State::CaseOpen { case, .. } => {
                // The engine may never finish a test crashed in native code.
                let res = self.end_case(case);
                log_failure(res, "close test case", self.report_path());
                true
            }
        };
        self.close_document(suite_open);
    }

    /// Opens the `testsuite` of the given `class_name`, closing the current
    /// one (if `suite_open`) and opening a report file if required.
    fn enter_suite(
        &mut self,
        suite_open: bool,
        class_name: &str,
    ) -> Result<String> {
        if suite_open {
            if self.config.multi_file {
                self.close_document(true);
            } else if let Some(doc) = &mut self.document {
                let res = doc.end(TAG_SUITE).and_then(|()| doc.flush());
                log_failure(res, "close test suite", Some(doc.path()));
            }
        }

        let doc = match self.document.take() {
            Some(doc) => doc,
            None => Document::open(&self.config, class_name)?,
        };
        let doc = self.document.insert(doc);
        let mut tag = BytesStart::new(TAG_SUITE);
        tag.push_attribute((ATTRIBUTE_NAME, &*sanitize(class_name)));
        let res = doc.start(tag);
        log_failure(res, "open test suite", self.report_path());

        Ok(class_name.to_owned())
    }

    /// Writes the end of the given `case` into the report and flushes it.
    fn end_case(&mut self, mut case: Case) -> Result<()> {
        case.record_time(self.clock.now());
        let Some(doc) = &mut self.document else {
            return Ok(());
        };
        match case.pending.take() {
            Some(tag) => doc.empty(tag)?,
            None => doc.end(TAG_CASE)?,
        }
        doc.flush()
    }

    /// Writes the given `problem` into the currently open test case.
    ///
    /// Every call adds a separate element, so repeated problems of a single
    /// test case are reported as siblings.
    fn add_problem(&mut self, problem: Problem, failure: &Failure) {
        let State::CaseOpen { case, .. } = &mut self.state else {
            warn!(
                "Dropping {problem} of `{}` as no test case is open: {}",
                failure.description,
                failure.safe_message(),
            );
            return;
        };
        case.record_time(self.clock.now());
        let pending = case.pending.take();

        let Some(doc) = &mut self.document else {
            return;
        };
        let res = Self::write_problem(
            doc,
            pending,
            problem,
            failure,
            self.config.filter_traces,
        );
        log_failure(res, "record test problem", self.report_path());
    }

    /// Writes the given `problem` element, preceded by the `pending` start tag
    /// of its test case, if any.
    fn write_problem(
        doc: &mut Document,
        pending: Option<BytesStart<'static>>,
        problem: Problem,
        failure: &Failure,
        filter_traces: bool,
    ) -> Result<()> {
        if let Some(case) = pending {
            doc.start(case)?;
        }
        let mut tag = BytesStart::new(problem.tag());
        let message = failure.safe_message();
        tag.push_attribute((ATTRIBUTE_MESSAGE, &*sanitize(&message)));
        tag.push_attribute((ATTRIBUTE_TYPE, &*sanitize(&failure.kind)));
        doc.start(tag)?;
        doc.text(&trace::render(&failure.trace, filter_traces))?;
        doc.end(problem.tag())?;
        doc.flush()
    }

    /// Ends the current report, closing its `testsuite` if `suite_open`, and
    /// releases its file.
    fn close_document(&mut self, suite_open: bool) {
        let Some(mut doc) = self.document.take() else {
            return;
        };
        let path = doc.path().to_owned();
        if suite_open {
            let res = doc.end(TAG_SUITE);
            log_failure(res, "close test suite", Some(&path));
        }
        let res = doc.finish();
        log_failure(res, "finish report", Some(&path));
    }
}

/// Logs the given failed `res`ult of the `action` on the `report` file.
fn log_failure(res: Result<()>, action: &str, report: Option<&Path>) {
    if let Err(e) = res {
        error!(
            "Failed to {action} in JUnit report{}: {e}",
            report
                .map(|p| format!(" `{}`", p.display()))
                .unwrap_or_default(),
        );
    }
}

impl<C: Clock> Drop for JUnit<C> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<C: Clock> Listener for JUnit<C> {
    fn test_started(&mut self, test: &Description) -> Result<()> {
        Self::test_started(self, test)
    }

    fn test_finished(&mut self, test: &Description) {
        Self::test_finished(self, test);
    }

    fn test_failure(&mut self, failure: &Failure) {
        Self::test_failure(self, failure);
    }

    fn test_error(&mut self, error: &Failure) {
        Self::test_error(self, error);
    }

    fn shutdown(&mut self) {
        self.close();
    }
}
