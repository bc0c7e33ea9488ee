// Parse event model
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

//! Events produced while streaming through an XML document.
//!
//! [`ParseEvent`] is the vocabulary shared by every consumer in this
//!   crate:
//!     the tree builder ([`crate::tree`]) folds events into a document,
//!     and the structural scanner ([`crate::scan`]) observes them
//!       one-by-one and retains only a few flags.
//! Events are produced in document order and offer no random access;
//!   a consumer that needs to look backward must record what it saw.

use std::fmt::Display;

/// A single element attribute as an ordered `(name, value)` pair.
///
/// Attribute order is preserved as it appeared in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr(pub String, pub String);

impl Attr {
    /// Attribute name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Attribute value,
    ///   unescaped.
    pub fn value(&self) -> &str {
        &self.1
    }
}

impl Display for Attr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "`@{}=\"{}\"`", self.0, self.1)
    }
}

/// A document parse event.
///
/// A well-formed stream begins with [`ParseEvent::DocumentStart`],
///   ends with [`ParseEvent::DocumentEnd`],
///   and pairs every [`ParseEvent::ElementStart`] with a matching
///   [`ParseEvent::ElementEnd`].
/// Producing such a stream is the responsibility of the event source
///   (see [`crate::reader`]);
///     consumers are entitled to assume it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    /// Beginning of the document,
    ///   before any content has been observed.
    DocumentStart,

    /// Opening tag of an element,
    ///   together with its attributes in document order.
    ///
    /// Self-closing elements produce this event immediately followed by
    ///   a matching [`ParseEvent::ElementEnd`].
    ElementStart(String, Vec<Attr>),

    /// Closing tag of an element.
    ElementEnd(String),

    /// Text content between element tags.
    ///
    /// Empty content is valid and distinct from the absence of a text
    ///   event.
    Text(String),

    /// End of the document;
    ///   no further events will be produced.
    DocumentEnd,
}

impl ParseEvent {
    /// The element name if this event opens or closes an element,
    ///   otherwise [`None`].
    pub fn element_name(&self) -> Option<&str> {
        match self {
            Self::ElementStart(name, _) | Self::ElementEnd(name) => {
                Some(name)
            }
            _ => None,
        }
    }

    /// The attributes of an opening tag,
    ///   which is the only event kind that carries any.
    pub fn attrs(&self) -> &[Attr] {
        match self {
            Self::ElementStart(_, attrs) => attrs,
            _ => &[],
        }
    }
}

impl Display for ParseEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentStart => write!(f, "start of document"),
            Self::ElementStart(name, _) => write!(f, "`<{}>`", name),
            Self::ElementEnd(name) => write!(f, "`</{}>`", name),
            Self::Text(content) => write!(f, "text `{}`", content),
            Self::DocumentEnd => write!(f, "end of document"),
        }
    }
}
