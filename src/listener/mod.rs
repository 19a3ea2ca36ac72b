// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Receivers of test lifecycle events.

pub mod log;
pub mod tee;

use sealed::sealed;

use crate::{
    error::Result,
    event::{Description, Failure},
};

#[doc(inline)]
pub use self::{log::Log, tee::Tee};

/// Receiver of lifecycle events of a test run.
///
/// The external test-execution engine holds a [`Listener`] and calls it once
/// per event, from a single thread, in the order the events happen:
/// [`test_started()`], then any number of [`test_failure()`]s or
/// [`test_error()`]s, then [`test_finished()`] for every test, and finally a
/// single [`shutdown()`] once the run is over (normally or not).
///
/// [`shutdown()`]: Listener::shutdown
/// [`test_error()`]: Listener::test_error
/// [`test_failure()`]: Listener::test_failure
/// [`test_finished()`]: Listener::test_finished
/// [`test_started()`]: Listener::test_started
pub trait Listener {
    /// Handles the start of the given `test`.
    ///
    /// # Errors
    ///
    /// If this [`Listener`] is unable to record the run at all.
    fn test_started(&mut self, test: &Description) -> Result<()>;

    /// Handles the finish of the given `test`.
    fn test_finished(&mut self, test: &Description);

    /// Handles an assertion `failure` of the currently running test.
    fn test_failure(&mut self, failure: &Failure);

    /// Handles an unexpected `error` of the currently running test.
    fn test_error(&mut self, error: &Failure);

    /// Handles the end of the run.
    fn shutdown(&mut self);
}

impl<L: Listener + ?Sized> Listener for &mut L {
    fn test_started(&mut self, test: &Description) -> Result<()> {
        (**self).test_started(test)
    }

    fn test_finished(&mut self, test: &Description) {
        (**self).test_finished(test);
    }

    fn test_failure(&mut self, failure: &Failure) {
        (**self).test_failure(failure);
    }

    fn test_error(&mut self, error: &Failure) {
        (**self).test_error(error);
    }

    fn shutdown(&mut self) {
        (**self).shutdown();
    }
}

impl<L: Listener + ?Sized> Listener for Box<L> {
    fn test_started(&mut self, test: &Description) -> Result<()> {
        (**self).test_started(test)
    }

    fn test_finished(&mut self, test: &Description) {
        (**self).test_finished(test);
    }

    fn test_failure(&mut self, failure: &Failure) {
        (**self).test_failure(failure);
    }

    fn test_error(&mut self, error: &Failure) {
        (**self).test_error(error);
    }

    fn shutdown(&mut self) {
        (**self).shutdown();
    }
}

/// Extension of [`Listener`] allowing its composition.
#[sealed]
pub trait Ext: Listener + Sized {
    /// Passes every event both to this [`Listener`] and the `other` one.
    ///
    /// See [`Tee`] for more information.
    #[must_use]
    fn tee<R: Listener>(self, other: R) -> Tee<Self, R>;
}

#[sealed]
impl<T: Listener> Ext for T {
    fn tee<R: Listener>(self, other: R) -> Tee<Self, R> {
        Tee::new(self, other)
    }
}
