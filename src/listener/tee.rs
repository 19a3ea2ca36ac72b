// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Passing events to multiple [`Listener`]s simultaneously.

use crate::{
    error::Result,
    event::{Description, Failure},
    Listener,
};

/// Wrapper for passing events to multiple [`Listener`]s simultaneously.
///
/// Every event reaches the `left` [`Listener`] first and the `right` one
/// second, even if the `left` one has failed to handle it.
#[derive(Clone, Debug)]
pub struct Tee<L, R> {
    /// Left [`Listener`].
    left: L,

    /// Right [`Listener`].
    right: R,
}

impl<L, R> Tee<L, R> {
    /// Creates a new [`Tee`] [`Listener`], which passes events both to the
    /// `left` and `right` [`Listener`]s.
    #[must_use]
    pub const fn new(left: L, right: R) -> Self {
        Self { left, right }
    }

    /// Returns the left [`Listener`] of this [`Tee`].
    #[must_use]
    pub const fn left(&self) -> &L {
        &self.left
    }

    /// Returns the right [`Listener`] of this [`Tee`].
    #[must_use]
    pub const fn right(&self) -> &R {
        &self.right
    }

    /// Splits this [`Tee`] into its left and right [`Listener`]s.
    #[must_use]
    pub fn into_inner(self) -> (L, R) {
        (self.left, self.right)
    }
}

impl<L: Listener, R: Listener> Listener for Tee<L, R> {
    /// Returns the error of the `left` [`Listener`] if both have failed.
    fn test_started(&mut self, test: &Description) -> Result<()> {
        let left = self.left.test_started(test);
        let right = self.right.test_started(test);
        left.and(right)
    }

    fn test_finished(&mut self, test: &Description) {
        self.left.test_finished(test);
        self.right.test_finished(test);
    }

    fn test_failure(&mut self, failure: &Failure) {
        self.left.test_failure(failure);
        self.right.test_failure(failure);
    }

    fn test_error(&mut self, error: &Failure) {
        self.left.test_error(error);
        self.right.test_error(error);
    }

    fn shutdown(&mut self) {
        self.left.shutdown();
        self.right.shutdown();
    }
}
