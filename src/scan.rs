// Structural scan of an event stream
//
//  Copyright (C) 2014-2023 Ryan Specialty Group, LLC.
//
//  This file is part of xmlscan.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Single-pass structural query over a [`ParseEvent`] stream.
//!
//! [`Scanner`] answers one question without ever materializing a tree:
//!   which _record_ elements close without having contained a _marker_
//!   child?
//! Each such record yields a [`Diagnostic`] carrying the text of the
//!   record's _identifier_ child,
//!     if one was observed.
//!
//! The element names that play those three roles are configuration
//!   ([`Schema`]),
//!     so the scanner is reusable for any vocabulary of the same shape
//!       (record → optional marker, record → identifier).
//!
//! The scanner holds one stack frame per open record rather than a
//!   single set of flags,
//!     so records may nest without an inner record's bookkeeping
//!     corrupting its ancestors'.
//! It performs no validation:
//!   well-formedness is the event source's responsibility,
//!     and the scanner itself is total over well-formed streams---it
//!       never fails,
//!         it only accumulates state and emits diagnostics.

use crate::event::ParseEvent;

/// Element names consulted by a [`Scanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    record: String,
    marker: String,
    ident: String,
}

impl Schema {
    /// A schema whose _record_ elements are checked for the presence of
    ///   a _marker_ child and identified by the text of an _ident_
    ///   child.
    pub fn new(
        record: impl Into<String>,
        marker: impl Into<String>,
        ident: impl Into<String>,
    ) -> Self {
        Self {
            record: record.into(),
            marker: marker.into(),
            ident: ident.into(),
        }
    }

    /// Name of the record element.
    pub fn record(&self) -> &str {
        &self.record
    }

    /// Name of the marker element whose absence is being queried.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Name of the element whose text identifies a record.
    pub fn ident(&self) -> &str {
        &self.ident
    }
}

/// A record element that closed without a marker child.
///
/// Emitted at the moment the record's end event is observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    ident: Option<String>,
}

impl Diagnostic {
    /// Text of the most recently completed identifier element within
    ///   the offending record.
    ///
    /// [`None`] means the record contained no identifier element at
    ///   all,
    ///     which is distinct from an identifier whose text happens to
    ///     be empty.
    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }
}

/// Bookkeeping for a single open record element.
#[derive(Debug)]
struct Frame {
    /// Unset the moment a marker child's opening tag is observed.
    missing_marker: bool,

    /// Identifier text captured within this record.
    ident: Option<String>,
}

/// Detect record elements lacking a marker child.
///
/// Feed every event of a single document in order to
///   [`Scanner::process`] and finish with [`Scanner::finalize`];
///     diagnostics are handed back to the caller,
///       who decides where they go
///         (a log, a collection, a channel).
/// A scanner must not be reused across documents;
///   construct a fresh one per scan.
#[derive(Debug)]
pub struct Scanner {
    schema: Schema,

    /// One frame per open record,
    ///   innermost last.
    open: Vec<Frame>,

    /// Whether we are between an identifier element's opening and
    ///   closing tags.
    capturing: bool,
}

impl Scanner {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            open: Vec::new(),
            capturing: false,
        }
    }

    /// Observe a single event,
    ///   yielding a [`Diagnostic`] if this event completes a record
    ///   that is missing its marker.
    ///
    /// Events that do not involve the schema's element names leave the
    ///   scanner untouched;
    ///     in particular,
    ///       attributes are never inspected.
    pub fn process(&mut self, ev: &ParseEvent) -> Option<Diagnostic> {
        match ev {
            ParseEvent::ElementStart(name, _)
                if *name == self.schema.record =>
            {
                // Until proven otherwise,
                //   assume this record has no marker.
                self.open.push(Frame {
                    missing_marker: true,
                    ident: None,
                });

                None
            }

            ParseEvent::ElementStart(name, _)
                if *name == self.schema.marker =>
            {
                // A marker outside of any record answers no question.
                if let Some(frame) = self.open.last_mut() {
                    frame.missing_marker = false;
                }

                None
            }

            ParseEvent::ElementStart(name, _)
                if *name == self.schema.ident =>
            {
                self.capturing = true;
                None
            }

            ParseEvent::Text(content) if self.capturing => {
                if let Some(frame) = self.open.last_mut() {
                    frame.ident = Some(content.clone());
                }

                None
            }

            ParseEvent::ElementEnd(name) if *name == self.schema.ident => {
                self.capturing = false;
                None
            }

            ParseEvent::ElementEnd(name)
                if *name == self.schema.record =>
            {
                self.open.pop().and_then(|frame| {
                    frame
                        .missing_marker
                        .then(|| Diagnostic { ident: frame.ident })
                })
            }

            _ => None,
        }
    }

    /// Flush any state pending at the end of the stream.
    ///
    /// A well-formed stream pairs every record start with an end,
    ///   so every diagnostic will already have been emitted by
    ///   [`Scanner::process`] and this yields nothing;
    ///     records still open when the stream was abandoned are _not_
    ///     reported,
    ///       since their subtrees were never fully observed.
    pub fn finalize(self) -> Vec<Diagnostic> {
        vec![]
    }
}
