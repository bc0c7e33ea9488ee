// Materialized document tree
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

//! [`ParseEvent`] stream folded into a navigable document tree.
//!
//! Unlike the event stream,
//!   a [`Document`] holds the entire input in memory at once;
//!     in exchange it can answer questions the stream cannot without
//!     bookkeeping:
//!       a node's parent,
//!       its adjacent siblings,
//!       and the text of an entire subtree.
//!
//! Nodes live in a single arena owned by the [`Document`] and are
//!   addressed by [`NodeId`],
//!     so parent and sibling references are plain indices rather than
//!     ownership edges.
//! Construction is a stack machine over the event stream:
//!   an opening tag pushes a node whose parent is the current top of
//!   the stack,
//!     and a closing tag pops it after verifying balance.
//! The builder performs only that structural verification;
//!   syntactic validity is the event source's concern.

use crate::event::{Attr, ParseEvent};
use crate::reader::{self, XmlDeclaration, XmlEventReader};
use std::{fmt::Display, io::BufRead, num::NonZeroUsize, result};

pub type Result<T> = result::Result<T, BuildError>;

/// Handle addressing a node within its owning [`Document`].
///
/// Handles are meaningful only to the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(NonZeroUsize);

// A nonzero representation means optional handles cost nothing extra.
assert_eq_size!(NodeId, Option<NodeId>);

impl NodeId {
    fn from_index(index: usize) -> Self {
        match NonZeroUsize::new(index.wrapping_add(1)) {
            Some(n) => Self(n),
            None => unreachable!("node arena index overflow"),
        }
    }

    fn index(self) -> usize {
        self.0.get() - 1
    }
}

/// What sort of node a [`NodeId`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

#[derive(Debug)]
enum Payload {
    Element { name: String, attrs: Vec<Attr> },
    Text(String),
}

#[derive(Debug)]
struct NodeData {
    payload: Payload,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// One step of a depth-first traversal in document order.
///
/// See [`Document::walk`].
#[derive(Debug, PartialEq, Eq)]
pub enum Step<'d> {
    /// An element has been entered,
    ///   before any of its children are visited.
    EnterElement(NodeId, &'d str, &'d [Attr]),

    /// A text node.
    Text(NodeId, &'d str),

    /// An element is being left,
    ///   after all of its children have been visited.
    LeaveElement(NodeId, &'d str),
}

/// A fully materialized document.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    decl: Option<XmlDeclaration>,
}

impl Document {
    /// Fold an event stream into a [`Document`].
    ///
    /// The stream is consumed up to and including
    ///   [`ParseEvent::DocumentEnd`].
    /// Event source failures are propagated as
    ///   [`BuildError::Source`];
    ///     the structural errors are this builder's own.
    pub fn parse<I>(events: I) -> Result<Self>
    where
        I: IntoIterator<Item = reader::Result<ParseEvent>>,
    {
        let mut nodes: Vec<NodeData> = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut root: Option<NodeId> = None;

        for result in events {
            match result? {
                ParseEvent::DocumentStart => (),

                ParseEvent::ElementStart(name, attrs) => {
                    let parent = stack.last().copied();

                    if parent.is_none() && root.is_some() {
                        return Err(BuildError::MultipleRoots(name));
                    }

                    let id = NodeId::from_index(nodes.len());
                    nodes.push(NodeData {
                        payload: Payload::Element { name, attrs },
                        parent,
                        children: vec![],
                    });

                    match parent {
                        Some(pid) => nodes[pid.index()].children.push(id),
                        None => root = Some(id),
                    }

                    stack.push(id);
                }

                ParseEvent::ElementEnd(name) => {
                    let id = stack
                        .pop()
                        .ok_or(BuildError::UnexpectedClose(name.clone()))?;

                    match &nodes[id.index()].payload {
                        Payload::Element { name: open, .. }
                            if *open != name =>
                        {
                            return Err(BuildError::UnbalancedTag {
                                open: open.clone(),
                                close: name,
                            });
                        }
                        _ => (),
                    }
                }

                ParseEvent::Text(content) => {
                    let parent = match stack.last().copied() {
                        Some(pid) => pid,
                        None => return Err(BuildError::TextOutsideRoot),
                    };

                    let id = NodeId::from_index(nodes.len());
                    nodes.push(NodeData {
                        payload: Payload::Text(content),
                        parent: Some(parent),
                        children: vec![],
                    });
                    nodes[parent.index()].children.push(id);
                }

                ParseEvent::DocumentEnd => break,
            }
        }

        if let Some(&open) = stack.last() {
            return Err(BuildError::UnclosedElement(
                match &nodes[open.index()].payload {
                    Payload::Element { name, .. } => name.clone(),
                    // Only elements are ever pushed onto the stack.
                    Payload::Text(..) => {
                        unreachable!("text node on builder stack")
                    }
                },
            ));
        }

        match root {
            Some(root) => Ok(Self {
                nodes,
                root,
                decl: None,
            }),
            None => Err(BuildError::EmptyDocument),
        }
    }

    /// Read and fold an entire document,
    ///   retaining the XML declaration the reader observed.
    pub fn from_reader<B: BufRead>(
        mut reader: XmlEventReader<B>,
    ) -> Result<Self> {
        let mut doc = Self::parse(&mut reader)?;
        doc.decl = reader.declaration().cloned();

        Ok(doc)
    }

    /// Parse a document from a string already in memory.
    pub fn from_str(src: &str) -> Result<Self> {
        Self::from_reader(XmlEventReader::from_str(src))
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    /// The document's root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The XML declaration,
    ///   if the source document carried one and this document was
    ///   produced by [`Document::from_reader`] or
    ///   [`Document::from_str`].
    pub fn declaration(&self) -> Option<&XmlDeclaration> {
        self.decl.as_ref()
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        match self.node(id).payload {
            Payload::Element { .. } => NodeKind::Element,
            Payload::Text(..) => NodeKind::Text,
        }
    }

    /// Element name,
    ///   or [`None`] for a text node.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).payload {
            Payload::Element { name, .. } => Some(name),
            Payload::Text(..) => None,
        }
    }

    /// Attributes in document order;
    ///   empty for text nodes.
    pub fn attrs(&self, id: NodeId) -> &[Attr] {
        match &self.node(id).payload {
            Payload::Element { attrs, .. } => attrs,
            Payload::Text(..) => &[],
        }
    }

    /// The node's parent element,
    ///   or [`None`] for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Child nodes in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// The sibling immediately preceding this node under its parent.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;

        pos.checked_sub(1).map(|prev| siblings[prev])
    }

    /// The sibling immediately following this node under its parent.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;

        siblings.get(pos + 1).copied()
    }

    /// A text node's own content,
    ///   or [`None`] for an element.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).payload {
            Payload::Text(content) => Some(content),
            Payload::Element { .. } => None,
        }
    }

    /// Concatenation of every text node within this subtree,
    ///   in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.node(id).payload {
            Payload::Text(content) => out.push_str(content),
            Payload::Element { .. } => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Visit this subtree depth-first in document order.
    ///
    /// Elements are announced both on entry
    ///   (with their attributes)
    ///   and on exit;
    ///     text nodes are announced once.
    pub fn walk<F: FnMut(Step)>(&self, id: NodeId, visit: &mut F) {
        match &self.node(id).payload {
            Payload::Element { name, attrs } => {
                visit(Step::EnterElement(id, name, attrs));

                for &child in self.children(id) {
                    self.walk(child, visit);
                }

                visit(Step::LeaveElement(id, name));
            }

            Payload::Text(content) => visit(Step::Text(id, content)),
        }
    }

    /// Every element of the given name,
    ///   root included,
    ///   in document order.
    pub fn elements_by_name(&self, name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();

        self.walk(self.root, &mut |step| {
            if let Step::EnterElement(id, ele_name, _) = step {
                if ele_name == name {
                    found.push(id);
                }
            }
        });

        found
    }
}

/// Error folding an event stream into a [`Document`].
#[derive(Debug)]
pub enum BuildError {
    /// The event source failed;
    ///   the document cannot be trusted.
    Source(reader::Error),

    /// A closing tag was observed with no element open.
    UnexpectedClose(String),

    /// The closing tag does not match the opening tag at the same
    ///   level of nesting.
    UnbalancedTag { open: String, close: String },

    /// The stream ended with this element still open.
    UnclosedElement(String),

    /// A second top-level element was observed.
    MultipleRoots(String),

    /// Text content was observed outside of any element.
    TextOutsideRoot,

    /// The stream ended without any root element.
    EmptyDocument,
}

impl Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(inner) => Display::fmt(inner, f),

            Self::UnexpectedClose(name) => {
                write!(f, "unexpected closing tag `</{}>`", name)
            }

            Self::UnbalancedTag { open, close } => {
                write!(
                    f,
                    "expected closing tag `</{}>`, but found `</{}>`",
                    open, close
                )
            }

            Self::UnclosedElement(name) => {
                write!(f, "element `<{}>` is never closed", name)
            }

            Self::MultipleRoots(name) => {
                write!(
                    f,
                    "unexpected second root element `<{}>`",
                    name
                )
            }

            Self::TextOutsideRoot => {
                write!(f, "text content outside of the root element")
            }

            Self::EmptyDocument => {
                write!(f, "document has no root element")
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<reader::Error> for BuildError {
    fn from(err: reader::Error) -> Self {
        Self::Source(err)
    }
}

#[cfg(test)]
mod test;
