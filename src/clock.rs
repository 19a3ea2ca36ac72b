// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Source of time for measuring test cases.

use std::{
    rc::Rc,
    time::{Duration, Instant},
};

/// Source of [`Instant`]s a [`JUnit`] writer measures test cases with.
///
/// [`JUnit`]: crate::writer::JUnit
pub trait Clock {
    /// Returns the current [`Instant`].
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by [`Instant::now()`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Monotonic;

impl Clock for Monotonic {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Formats the given `elapsed` time as seconds with exactly 3 decimal digits.
///
/// Sub-millisecond precision is truncated, and the decimal separator is
/// always `.`.
#[must_use]
pub fn format_seconds(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    format!("{}.{:03}", millis / 1000, millis % 1000)
}
