// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Open JUnit XML report file.

use std::{
    borrow::Cow,
    fmt,
    fs::{self, File},
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use tracing::{debug, error};

use crate::error::{Error, Result};

use super::cli::Config;

/// Encoding declared by every report.
const ENCODING_UTF_8: &str = "utf-8";

/// Root element wrapping all suites in single-file mode.
pub(super) const TAG_SUITES: &str = "testsuites";

/// XML document being streamed into a report file.
///
/// Only tracks the root element. Closing suites and test cases is up to the
/// [`JUnit`] writer.
///
/// [`JUnit`]: super::JUnit
pub(super) struct Document {
    /// Serializer writing into the report file.
    xml: Writer<BufWriter<File>>,

    /// Path of the report file.
    path: PathBuf,

    /// Whether the [`TAG_SUITES`] root element is open.
    rooted: bool,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("rooted", &self.rooted)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Opens a report file for the suite of the given `class_name` and
    /// begins the XML document in it.
    ///
    /// # Errors
    ///
    /// If the report directory cannot be created, or the report file cannot
    /// be opened or written.
    pub(super) fn open(config: &Config, class_name: &str) -> Result<Self> {
        let path = destination(config, class_name)?;
        debug!("Opening JUnit report file `{}`", path.display());

        let file = File::create(&path).map_err(|source| {
            error!("Cannot open `{}`: {source}", path.display());
            Error::OpenReport {
                path: path.clone(),
                source,
            }
        })?;

        let mut xml = Writer::new_with_indent(BufWriter::new(file), b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new(
            "1.0",
            Some(ENCODING_UTF_8),
            Some("yes"),
        )))?;
        let rooted = !config.multi_file;
        if rooted {
            xml.write_event(Event::Start(BytesStart::new(TAG_SUITES)))?;
        }

        Ok(Self { xml, path, rooted })
    }

    /// Returns the path of the report file.
    pub(super) fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the given start `tag`.
    pub(super) fn start(&mut self, tag: BytesStart<'_>) -> Result<()> {
        self.xml.write_event(Event::Start(tag))?;
        Ok(())
    }

    /// Writes the given `tag` as a self-closing element.
    pub(super) fn empty(&mut self, tag: BytesStart<'_>) -> Result<()> {
        self.xml.write_event(Event::Empty(tag))?;
        Ok(())
    }

    /// Writes an end tag of the given element `name`.
    pub(super) fn end(&mut self, name: &str) -> Result<()> {
        self.xml.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Writes the given `text`, [`sanitize`]d and escaped.
    pub(super) fn text(&mut self, text: &str) -> Result<()> {
        let text = sanitize(text);
        self.xml.write_event(Event::Text(BytesText::new(&text)))?;
        Ok(())
    }

    /// Flushes everything written so far into the report file.
    pub(super) fn flush(&mut self) -> Result<()> {
        self.xml.get_mut().flush()?;
        Ok(())
    }

    /// Closes the root element (if any), ends the document and flushes it.
    ///
    /// The report file is released even if this fails.
    pub(super) fn finish(mut self) -> Result<()> {
        if self.rooted {
            self.rooted = false;
            self.end(TAG_SUITES)?;
        }
        self.xml.get_mut().write_all(b"\n")?;
        self.flush()?;
        debug!("Finished JUnit report file `{}`", self.path.display());
        Ok(())
    }
}

/// Replaces every character XML 1.0 forbids in a document (most C0 control
/// characters, like the ANSI escape) with U+FFFD.
///
/// Borrows the given `value` if it's already allowed as is.
pub(super) fn sanitize(value: &str) -> Cow<'_, str> {
    if value.chars().all(is_xml_char) {
        return value.into();
    }
    value
        .chars()
        .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
        .collect::<String>()
        .into()
}

/// Indicates whether the given `c` is allowed in an XML 1.0 document.
const fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}',
    )
}

/// Resolves the report file path for the suite of the given `class_name`,
/// creating the report directory if required.
fn destination(config: &Config, class_name: &str) -> Result<PathBuf> {
    let file_name = config.file_name(class_name);
    let Some(dir) = &config.report_dir else {
        debug!(
            "No report directory specified, opening report file `{file_name}` \
             in the working directory",
        );
        return Ok(PathBuf::from(&*file_name));
    };
    ensure_dir_exists(dir)?;
    Ok(dir.join(&*file_name))
}

/// Creates the given `dir` along with its parents, unless it's already a
/// directory.
fn ensure_dir_exists(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| {
        error!("Cannot create directory `{}`: {source}", dir.display());
        Error::CreateDir {
            path: dir.to_owned(),
            source,
        }
    })
}
