// Tree- and event-based XML processing demonstration
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

//! Demonstration of the two major XML processing paradigms.
//!
//! This crate reads a single XML document in two different ways:
//!
//!   1. [`tree`] materializes the document into memory and exposes
//!        traversal primitives
//!          (parent, ordered children, siblings, text content); and
//!   2. [`reader`] streams the document as a sequence of
//!        [`event::ParseEvent`]s that are discarded as soon as they are
//!        consumed.
//!
//! Atop the event stream sits [`scan`],
//!   a single-pass structural query that reports record elements lacking
//!   a required marker child without ever materializing a tree.
//!
//! Tokenization is delegated to `quick_xml`;
//!   nothing in this crate parses XML syntax itself.
//! All code here is traversal and bookkeeping layered on top of that
//!   library's output.

#[macro_use]
extern crate static_assertions;

pub mod event;
pub mod reader;
pub mod scan;
pub mod tree;
