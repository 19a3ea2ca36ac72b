// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types of the JUnit XML report [`Writer`].
//!
//! Only [`Error::CreateDir`] and [`Error::OpenReport`] ever reach the caller:
//! without a destination no report can be produced at all. Everything
//! happening after the destination is open is logged by the [`Writer`] and
//! absorbed, so a broken report never breaks a test run.
//!
//! [`Writer`]: crate::writer::JUnit

use std::{
    io,
    path::{Path, PathBuf},
};

use derive_more::with_trait::{Display, Error as StdError, From};

/// Error of producing a JUnit XML report.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Report directory doesn't exist and cannot be created.
    #[display("Cannot create directory `{}`: {source}", path.display())]
    #[from(ignore)]
    CreateDir {
        /// Path of the directory.
        path: PathBuf,

        /// Underlying I/O error.
        source: io::Error,
    },

    /// Report file cannot be created.
    #[display("Unable to open report file `{}`: {source}", path.display())]
    #[from(ignore)]
    OpenReport {
        /// Path of the report file.
        path: PathBuf,

        /// Underlying I/O error.
        source: io::Error,
    },

    /// I/O error while appending XML to an already open report.
    #[display("Failed to write XML report: {_0}")]
    Write(io::Error),
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the path this [`Error`] relates to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::CreateDir { path, .. } | Self::OpenReport { path, .. } => {
                Some(path)
            }
            Self::Write(_) => None,
        }
    }

    /// Indicates whether this [`Error`] prevents any report from being
    /// produced.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::CreateDir { .. } | Self::OpenReport { .. })
    }
}
