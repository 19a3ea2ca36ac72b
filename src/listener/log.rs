// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Listener`] logging test lifecycle events.

use tracing::{debug, info, warn};

use crate::{
    error::Result,
    event::{Description, Failure},
    Listener,
};

/// [`Listener`] logging every test lifecycle event via [`tracing`].
///
/// Never fails, so is safe to [`tee()`] with any other [`Listener`].
///
/// [`tee()`]: crate::ListenerExt::tee
#[derive(Clone, Copy, Debug, Default)]
pub struct Log {
    /// Number of tests started so far.
    started: usize,

    /// Number of failures and errors seen so far.
    problems: usize,
}

impl Log {
    /// Creates a new [`Log`] [`Listener`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            started: 0,
            problems: 0,
        }
    }

    /// Returns the number of tests started so far.
    #[must_use]
    pub const fn started(&self) -> usize {
        self.started
    }

    /// Returns the number of failures and errors seen so far.
    #[must_use]
    pub const fn problems(&self) -> usize {
        self.problems
    }
}

impl Listener for Log {
    fn test_started(&mut self, test: &Description) -> Result<()> {
        if test.is_test() {
            self.started += 1;
        }
        info!("started: {test}");
        Ok(())
    }

    fn test_finished(&mut self, test: &Description) {
        info!("finished: {test}");
    }

    fn test_failure(&mut self, failure: &Failure) {
        self.problems += 1;
        warn!("failed: {}: {}", failure.description, failure.safe_message());
        debug!("{}", failure.trace);
    }

    fn test_error(&mut self, error: &Failure) {
        self.problems += 1;
        warn!("errored: {}: {}", error.description, error.safe_message());
        debug!("{}", error.trace);
    }

    fn shutdown(&mut self) {
        info!(
            "run finished: {} tests started, {} failures or errors",
            self.started, self.problems,
        );
    }
}
