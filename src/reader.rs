// XML event reader
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

//! Produce a [`ParseEvent`] stream from raw XML.
//!
//! This uses [`quick_xml`] as the parser.
//!
//! [`XmlEventReader`] is an [`Iterator`] of
//!   [`Result<ParseEvent, Error>`](Result).
//! The stream is lazy, finite, and forward-only:
//!   it yields [`ParseEvent::DocumentStart`] before the first content
//!   event,
//!     [`ParseEvent::DocumentEnd`] when the underlying parser reports
//!     end-of-input,
//!     and [`None`] thereafter.
//! Consumers must treat an [`Err`] as fatal---once
//!   the underlying parser has failed,
//!     no further events can be trusted.
//!
//! The underlying reader produces events whose representation is
//!   specific to `quick_xml`
//!     (byte slices into an internal buffer, escaped content),
//!   so each is translated into the crate's own owned vocabulary here.
//! Self-closing elements are expanded into an open/close pair so that
//!   consumers need only reason about balanced tags;
//!     the paired close is buffered and yielded on the next pull.
//!
//! Whitespace-only text between elements is dropped by the underlying
//!   parser's trimming,
//!     which suits the pretty-printed and minified documents this crate
//!     processes;
//!       consumers therefore never observe indentation as content.

use crate::event::{Attr, ParseEvent};
use quick_xml::events::{
    attributes::AttrError, BytesDecl, BytesStart, Event as XmlEvent,
};
use std::{
    collections::VecDeque, io::BufRead, result, str, str::Utf8Error,
};

pub type Result<T> = result::Result<T, Error>;

/// The document's XML declaration (`<?xml … ?>`),
///   if one was present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    /// Value of the mandatory `version` pseudo-attribute.
    pub version: String,
    /// Value of the optional `encoding` pseudo-attribute.
    pub encoding: Option<String>,
    /// Value of the optional `standalone` pseudo-attribute.
    pub standalone: Option<String>,
}

/// Translate raw XML into a [`ParseEvent`] stream.
///
/// This reader is intended to be used as an [`Iterator`].
/// Errors can occur only while the underlying parser is reading;
///   buffered events
///     (such as the close paired with a self-closing tag)
///     never fail.
///
/// [`None`] is returned only after [`ParseEvent::DocumentEnd`],
///   not on error.
pub struct XmlEventReader<B: BufRead> {
    /// Inner parser.
    reader: quick_xml::Reader<B>,

    /// Buffer for [`quick_xml::Reader`].
    readbuf: Vec<u8>,

    /// Events already translated but not yet yielded.
    evbuf: VecDeque<ParseEvent>,

    /// XML declaration,
    ///   once observed.
    decl: Option<XmlDeclaration>,

    /// Whether [`ParseEvent::DocumentStart`] has been yielded.
    started: bool,

    /// Whether [`ParseEvent::DocumentEnd`] has been yielded.
    ended: bool,
}

impl<B: BufRead> XmlEventReader<B> {
    pub fn new(input: B) -> Self {
        let mut reader = quick_xml::Reader::from_reader(input);

        // Surrounding whitespace carries no information for any
        //   consumer in this crate.
        reader.config_mut().trim_text(true);

        Self {
            reader,
            readbuf: Vec::new(),
            evbuf: VecDeque::new(),
            decl: None,
            started: false,
            ended: false,
        }
    }

    /// The document's XML declaration,
    ///   if one has been observed so far.
    ///
    /// A declaration must precede all content,
    ///   so this is reliable once any content event has been yielded.
    pub fn declaration(&self) -> Option<&XmlDeclaration> {
        self.decl.as_ref()
    }

    /// Pull the next event from the underlying parser and translate it.
    ///
    /// This is intended to be invoked once the event buffer has been
    ///   depleted by [`XmlEventReader::next`].
    fn refill_buf(&mut self) -> Option<Result<ParseEvent>> {
        self.readbuf.clear();

        match self.reader.read_event_into(&mut self.readbuf) {
            Err(inner) => Some(Err(inner.into())),

            Ok(ev) => match ev {
                // This is the only time we'll consider the iterator to
                //   be done.
                XmlEvent::Eof if self.ended => None,
                XmlEvent::Eof => {
                    self.ended = true;
                    Some(Ok(ParseEvent::DocumentEnd))
                }

                XmlEvent::Start(ele) => Some(Self::element_open(&ele)),

                // Self-closing tag;
                //   queue the paired close so that consumers only ever
                //   see balanced tags.
                XmlEvent::Empty(ele) => {
                    let open = Self::element_open(&ele);

                    if let Ok(ParseEvent::ElementStart(name, _)) = &open {
                        self.evbuf
                            .push_back(ParseEvent::ElementEnd(name.clone()));
                    }

                    Some(open)
                }

                XmlEvent::End(ele) => Some(
                    utf8_owned(ele.name().as_ref())
                        .map(ParseEvent::ElementEnd),
                ),

                XmlEvent::Text(text) => Some(
                    text.unescape()
                        .map_err(Error::from)
                        .map(|unesc| ParseEvent::Text(unesc.into_owned())),
                ),

                // CDATA content is text that was never escaped.
                XmlEvent::CData(content) => {
                    Some(utf8_owned(content.as_ref()).map(ParseEvent::Text))
                }

                XmlEvent::Decl(decl) => {
                    let parsed = Self::parse_decl(&decl);

                    match parsed {
                        Err(e) => Some(Err(e)),
                        Ok(d) => {
                            self.decl = Some(d);
                            self.refill_buf()
                        }
                    }
                }

                // Comments, processing instructions, and doctype
                //   declarations have no bearing on any consumer in
                //   this crate.
                XmlEvent::Comment(..)
                | XmlEvent::PI(..)
                | XmlEvent::DocType(..) => self.refill_buf(),

                // Anything else the underlying parser may report is
                //   similarly outside of our vocabulary.
                _ => self.refill_buf(),
            },
        }
    }

    /// Translate an opening tag and its attributes.
    fn element_open(ele: &BytesStart) -> Result<ParseEvent> {
        let name = utf8_owned(ele.name().as_ref())?;

        let mut attrs = Vec::new();

        // The order of attributes is maintained.
        for attr in ele.attributes() {
            let attr = attr?;

            attrs.push(Attr(
                utf8_owned(attr.key.as_ref())?,
                attr.unescape_value()?.into_owned(),
            ));
        }

        Ok(ParseEvent::ElementStart(name, attrs))
    }

    /// Capture the pseudo-attributes of an XML declaration.
    ///
    /// `version` is mandatory per the XML specification and the
    ///   underlying parser enforces as much;
    ///     `encoding` and `standalone` are optional.
    fn parse_decl(decl: &BytesDecl) -> Result<XmlDeclaration> {
        let version = utf8_owned(&decl.version()?)?;

        let encoding = match decl.encoding() {
            Some(enc) => Some(utf8_owned(&enc?)?),
            None => None,
        };

        let standalone = match decl.standalone() {
            Some(sa) => Some(utf8_owned(&sa?)?),
            None => None,
        };

        Ok(XmlDeclaration {
            version,
            encoding,
            standalone,
        })
    }
}

impl<'a> XmlEventReader<&'a [u8]> {
    /// Read events from a string already in memory.
    pub fn from_str(src: &'a str) -> Self {
        Self::new(src.as_bytes())
    }
}

impl<B: BufRead> Iterator for XmlEventReader<B> {
    type Item = Result<ParseEvent>;

    /// Produce the next [`ParseEvent`] from the input.
    ///
    /// For more information on how this reader operates,
    ///   see [`XmlEventReader`].
    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            return Some(Ok(ParseEvent::DocumentStart));
        }

        self.evbuf
            .pop_front()
            .map(Result::Ok)
            .or_else(|| self.refill_buf())
    }
}

/// Copy a byte slice into an owned [`String`],
///   rejecting invalid UTF-8.
fn utf8_owned(bytes: &[u8]) -> Result<String> {
    str::from_utf8(bytes)
        .map(String::from)
        .map_err(|e| Error::from((e, bytes)))
}

/// Error attempting to produce a [`ParseEvent`].
///
/// Any of these indicates input that is not well-formed as far as this
///   crate is concerned;
///     once one has been yielded the stream must be abandoned.
#[derive(Debug)]
pub enum Error {
    /// A UTF-8 error together with the byte slice that caused it.
    ///
    /// By storing the raw bytes instead of a string,
    ///   we allow the displayer to determine how to handle invalid
    ///   UTF-8 encodings.
    InvalidUtf8(Utf8Error, Vec<u8>),

    /// An attribute could not be parsed.
    BadAttr(AttrError),

    /// Any other failure from the underlying parser,
    ///   such as syntactically invalid XML.
    Xml(quick_xml::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUtf8(inner, bytes) => {
                write!(
                    f,
                    "{} for string `{}`",
                    inner,
                    String::from_utf8_lossy(bytes)
                )
            }
            Self::BadAttr(inner) => {
                write!(f, "malformed attribute: {}", inner)
            }
            Self::Xml(inner) => {
                write!(f, "malformed XML: {}", inner)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidUtf8(inner, ..) => Some(inner),
            Self::BadAttr(inner) => Some(inner),
            Self::Xml(inner) => Some(inner),
        }
    }
}

impl From<(Utf8Error, &[u8])> for Error {
    fn from((err, bytes): (Utf8Error, &[u8])) -> Self {
        Self::InvalidUtf8(err, bytes.to_owned())
    }
}

impl From<AttrError> for Error {
    fn from(err: AttrError) -> Self {
        Self::BadAttr(err)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err)
    }
}
