// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration of a [`JUnit`] writer.
//!
//! [`JUnit`]: super::JUnit

use std::{borrow::Cow, path::PathBuf};

use smart_default::SmartDefault;

/// Token replaced with a suite's class name in a multi-file report file name.
pub const SUITE_TOKEN: &str = "__suite__";

/// Report file name used in single-file mode when none is specified.
pub const DEFAULT_REPORT_FILE: &str = "junit-report.xml";

/// Report file name template used in multi-file mode when none is specified.
pub const DEFAULT_MULTI_FILE_REPORT_FILE: &str = "junit-report-__suite__.xml";

/// Configuration of a [`JUnit`] writer, fixed at its construction.
///
/// [`JUnit`]: super::JUnit
#[derive(Clone, Debug, Eq, PartialEq, SmartDefault)]
pub struct Config {
    /// Name of the report file.
    ///
    /// In [multi-file](Config::multi_file) mode, every [`SUITE_TOKEN`]
    /// occurrence is replaced with the class name of the suite.
    #[default(String::from(DEFAULT_REPORT_FILE))]
    pub report_file: String,

    /// Directory to put report files into, created if absent.
    ///
    /// If [`None`], the [`report_file`](Config::report_file) is resolved
    /// against the current working directory.
    pub report_dir: Option<PathBuf>,

    /// Whether test-framework noise should be dropped from stack traces.
    #[default(true)]
    pub filter_traces: bool,

    /// Whether every suite should be written into its own report file.
    pub multi_file: bool,
}

impl Config {
    /// Creates a [`Config`] writing all suites into the given `report_file`.
    #[must_use]
    pub fn single_file(report_file: impl Into<String>) -> Self {
        Self {
            report_file: report_file.into(),
            ..Self::default()
        }
    }

    /// Creates a [`Config`] writing every suite into its own file, named by
    /// substituting [`SUITE_TOKEN`] in the given `template`.
    #[must_use]
    pub fn multi_file(template: impl Into<String>) -> Self {
        Self {
            report_file: template.into(),
            multi_file: true,
            ..Self::default()
        }
    }

    /// Sets the [`report_dir`](Config::report_dir) of this [`Config`].
    #[must_use]
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(dir.into());
        self
    }

    /// Sets the [`filter_traces`](Config::filter_traces) flag of this
    /// [`Config`].
    #[must_use]
    pub fn with_filter_traces(mut self, filter: bool) -> Self {
        self.filter_traces = filter;
        self
    }

    /// Resolves the report file name for the suite of the given `class_name`.
    #[must_use]
    pub fn file_name(&self, class_name: &str) -> Cow<'_, str> {
        if self.multi_file {
            self.report_file.replace(SUITE_TOKEN, class_name).into()
        } else {
            self.report_file.as_str().into()
        }
    }
}

/// CLI options of a [`JUnit`] writer.
///
/// Meant to be [flattened][1] into a command line of the host runner.
///
/// [`JUnit`]: super::JUnit
/// [1]: https://docs.rs/clap/latest/clap/_derive/index.html#flattening
#[derive(Clone, Debug, Default, clap::Args)]
#[group(skip)]
pub struct Cli {
    /// Name of the JUnit XML report file.
    ///
    /// With `--junit-multi-file`, `__suite__` is replaced with the class name
    /// of every suite.
    #[arg(
        id = "junit-report-file",
        long = "junit-report-file",
        value_name = "file",
        global = true
    )]
    pub report_file: Option<String>,

    /// Directory to put JUnit XML reports into.
    #[arg(
        id = "junit-report-dir",
        long = "junit-report-dir",
        value_name = "dir",
        global = true
    )]
    pub report_dir: Option<PathBuf>,

    /// Whether to drop test-framework frames from reported stack traces.
    #[arg(
        id = "junit-filter-traces",
        long = "junit-filter-traces",
        value_name = "true|false",
        global = true
    )]
    pub filter_traces: Option<bool>,

    /// Write every test suite into its own JUnit XML report file.
    #[arg(id = "junit-multi-file", long = "junit-multi-file", global = true)]
    pub multi_file: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let default_file = if cli.multi_file {
            DEFAULT_MULTI_FILE_REPORT_FILE
        } else {
            DEFAULT_REPORT_FILE
        };
        Self {
            report_file: cli
                .report_file
                .unwrap_or_else(|| default_file.to_owned()),
            report_dir: cli.report_dir,
            filter_traces: cli.filter_traces.unwrap_or(true),
            multi_file: cli.multi_file,
        }
    }
}
