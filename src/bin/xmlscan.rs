// XML processing demonstration
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

//! Demonstrate both XML processing paradigms over one document.
//!
//! The document
//!   (an embedded sample,
//!     or a file named on the command line)
//!   is processed twice:
//!     first materialized into a tree and traversed,
//!     then streamed as events---once
//!       to display them and once through the structural scanner that
//!       reports record elements lacking their marker child.
//!
//! Observations are written through the `log` facade;
//!   set `RUST_LOG=trace` to also see the plumbing steps.

extern crate xmlscan;

use getopts::{Fail, Options};
use log::{error, info, trace};
use std::{
    env,
    fmt::{self, Display},
    fs, io,
    path::{Path, PathBuf},
};
use xmlscan::{
    reader::{self, XmlEventReader},
    scan::{Diagnostic, Scanner, Schema},
    tree::{BuildError, Document, NodeId, Step},
};

/// Document processed when no input file is named.
const SAMPLE_XML: &str = include_str!("../../resources/example.xml");

/// Vocabulary of the embedded sample document.
const DEFAULT_RECORD: &str = "noeud";
const DEFAULT_MARKER: &str = "data";
const DEFAULT_IDENT: &str = "id";

/// Types of commands
enum Command {
    Demo(Option<PathBuf>, Schema),
    Usage,
}

/// Entrypoint for the demonstration
pub fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args: Vec<String> = env::args().collect();
    let program = &args[0];
    let opts = get_opts();
    let usage = opts.usage(&format!("Usage: {} [OPTIONS] [FILE]", program));

    match parse_options(opts, args) {
        Ok(Command::Demo(input, schema)) => {
            info!("starting application");

            if let Err(e) = run_demo(input.as_deref(), &schema) {
                error!("{}", e);
                std::process::exit(match e {
                    DemoError::Io(..) => exitcode::IOERR,
                    _ => exitcode::DATAERR,
                });
            }

            info!("ending application");
        }
        Ok(Command::Usage) => {
            println!("{}", usage);
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            eprintln!("{}", e);
            println!("{}", usage);
            std::process::exit(exitcode::USAGE);
        }
    }
}

/// Get 'Options'
fn get_opts() -> Options {
    let mut opts = Options::new();
    opts.optopt(
        "",
        "record",
        "name of the record element to check",
        "NAME",
    );
    opts.optopt(
        "",
        "marker",
        "name of the child element whose absence is reported",
        "NAME",
    );
    opts.optopt(
        "",
        "ident",
        "name of the child element identifying a record",
        "NAME",
    );
    opts.optflag("h", "help", "print this help menu");

    opts
}

/// Option parser
fn parse_options(opts: Options, args: Vec<String>) -> Result<Command, Fail> {
    let matches = opts.parse(&args[1..])?;

    if matches.opt_present("h") {
        return Ok(Command::Usage);
    }

    let input = match matches.free.len() {
        0 => None,
        1 => Some(PathBuf::from(&matches.free[0])),
        _ => return Err(Fail::UnrecognizedOption(matches.free[1].clone())),
    };

    let schema = Schema::new(
        matches
            .opt_str("record")
            .unwrap_or_else(|| DEFAULT_RECORD.into()),
        matches
            .opt_str("marker")
            .unwrap_or_else(|| DEFAULT_MARKER.into()),
        matches
            .opt_str("ident")
            .unwrap_or_else(|| DEFAULT_IDENT.into()),
    );

    Ok(Command::Demo(input, schema))
}

/// Process one document both ways.
///
/// The input is held in memory so that each pass can stream it afresh,
///   mirroring how a file would be reopened per pass.
fn run_demo(input: Option<&Path>, schema: &Schema) -> Result<(), DemoError> {
    trace!("opening input document");

    let (label, src) = match input {
        Some(path) => {
            (path.display().to_string(), fs::read_to_string(path)?)
        }
        None => ("builtin sample".to_string(), SAMPLE_XML.to_string()),
    };

    info!("processing document: {}", label);

    tree_demo(&src, schema)?;
    event_demo(&src, schema)?;

    Ok(())
}

/// Materialize the document and traverse it.
fn tree_demo(src: &str, schema: &Schema) -> Result<(), DemoError> {
    info!("starting tree demo");

    trace!("folding the event stream into a document tree");
    let doc = Document::from_str(src)?;

    match doc.declaration() {
        Some(decl) => {
            info!("XML version: {}", decl.version);
            info!(
                "encoding: {}",
                decl.encoding.as_deref().unwrap_or("(unspecified)")
            );
        }
        None => info!("document carries no XML declaration"),
    }

    info!("processing the root node");
    print_tree(&doc);

    info!("fetching \"{}\" nodes", schema.marker());
    let found = doc.elements_by_name(schema.marker());
    info!("found {} \"{}\" node(s)", found.len(), schema.marker());

    for (nth, &id) in found.iter().enumerate() {
        info!("processing found node [{}/{}]", nth + 1, found.len());
        describe_neighborhood(&doc, id);
    }

    info!("ending tree demo");
    Ok(())
}

/// Report the entire tree,
///   depth-first,
///   in document order.
fn print_tree(doc: &Document) {
    doc.walk(doc.root(), &mut |step| match step {
        Step::EnterElement(_, name, attrs) => {
            info!("element (begin): {}", name);
            info!("element has attributes: {}", !attrs.is_empty());

            for attr in attrs {
                info!(
                    "attribute: {} - value: {}",
                    attr.name(),
                    attr.value()
                );
            }
        }
        Step::Text(_, content) => info!("text: {}", content),
        Step::LeaveElement(_, name) => info!("element (end): {}", name),
    });
}

/// Report a node's parent and adjacent siblings.
fn describe_neighborhood(doc: &Document, id: NodeId) {
    let parent = doc.parent(id);

    info!("node has parent: {}", parent.is_some());
    if let Some(pid) = parent {
        info!("parent name: {}", doc.name(pid).unwrap_or("#text"));
    }

    describe_sibling(doc, "previous", doc.prev_sibling(id));
    describe_sibling(doc, "next", doc.next_sibling(id));
}

fn describe_sibling(doc: &Document, which: &str, sibling: Option<NodeId>) {
    info!("node has {} sibling: {}", which, sibling.is_some());

    if let Some(sid) = sibling {
        info!(
            "{} sibling name: {}",
            which,
            doc.name(sid).unwrap_or("#text")
        );
        info!(
            "{} sibling text content: {}",
            which,
            doc.text_content(sid)
        );
    }
}

/// Stream the document twice:
///   once to display every event,
///   once through the structural scanner.
fn event_demo(src: &str, schema: &Schema) -> Result<(), DemoError> {
    info!("starting event demo");

    trace!("streaming events for display");
    for result in XmlEventReader::from_str(src) {
        let ev = result?;

        info!("{}", ev);
        for attr in ev.attrs() {
            info!("  {}", attr);
        }
    }

    trace!("streaming events through the structural scanner");
    let mut scanner = Scanner::new(schema.clone());
    let mut reported = 0;

    for result in XmlEventReader::from_str(src) {
        if let Some(diag) = scanner.process(&result?) {
            report(schema, &diag);
            reported += 1;
        }
    }

    for diag in scanner.finalize() {
        report(schema, &diag);
        reported += 1;
    }

    info!(
        "{} record(s) missing a \"{}\" element",
        reported,
        schema.marker()
    );

    info!("ending event demo");
    Ok(())
}

fn report(schema: &Schema, diag: &Diagnostic) {
    match diag.ident() {
        Some(ident) => info!(
            "no \"{}\" element for the record identified by: {}",
            schema.marker(),
            ident
        ),
        None => info!(
            "no \"{}\" element for a record carrying no \"{}\"",
            schema.marker(),
            schema.ident()
        ),
    }
}

/// Any failure the demonstration can encounter.
#[derive(Debug)]
enum DemoError {
    Io(io::Error),
    Parse(reader::Error),
    Build(BuildError),
}

impl Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(inner) => Display::fmt(inner, f),
            Self::Parse(inner) => Display::fmt(inner, f),
            Self::Build(inner) => Display::fmt(inner, f),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(inner) => Some(inner),
            Self::Parse(inner) => Some(inner),
            Self::Build(inner) => Some(inner),
        }
    }
}

impl From<io::Error> for DemoError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<reader::Error> for DemoError {
    fn from(err: reader::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<BuildError> for DemoError {
    fn from(err: BuildError) -> Self {
        Self::Build(err)
    }
}
