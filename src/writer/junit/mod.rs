// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [JUnit XML report][1] writer implementation.
//!
//! - [`cli`]: configuration and CLI options
//! - [`trace`]: stack trace filtering
//! - [`writer`]: the [`JUnit`] writer itself
//!
//! [1]: https://llg.cubic.org/docs/junit

pub mod cli;
mod document;
pub mod trace;
pub mod writer;

pub use self::{
    cli::{Cli, Config},
    writer::JUnit,
};
