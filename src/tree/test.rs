// Document tree tests
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

use super::*;

type Sut = Document;

fn open(name: &str) -> ParseEvent {
    ParseEvent::ElementStart(name.into(), vec![])
}

fn close(name: &str) -> ParseEvent {
    ParseEvent::ElementEnd(name.into())
}

fn text(content: &str) -> ParseEvent {
    ParseEvent::Text(content.into())
}

/// Build a document from a literal event sequence,
///   as if it had come from a well-behaved event source.
fn build(events: Vec<ParseEvent>) -> Result<Document> {
    Sut::parse(events.into_iter().map(Ok))
}

#[test]
fn builds_document_from_source_text() {
    let doc = Sut::from_str(
        r#"<racine version="2"><noeud type="simple"><id>42</id></noeud></racine>"#,
    )
    .expect("parse failed");

    let root = doc.root();
    assert_eq!(Some("racine"), doc.name(root));
    assert_eq!(NodeKind::Element, doc.kind(root));
    assert_eq!(None, doc.parent(root));
    assert_eq!(
        &[Attr("version".into(), "2".into())][..],
        doc.attrs(root)
    );

    let node = doc.children(root)[0];
    assert_eq!(Some("noeud"), doc.name(node));
    assert_eq!(Some(root), doc.parent(node));
    assert_eq!(
        &[Attr("type".into(), "simple".into())][..],
        doc.attrs(node)
    );

    let ident = doc.children(node)[0];
    assert_eq!(Some("id"), doc.name(ident));

    let content = doc.children(ident)[0];
    assert_eq!(NodeKind::Text, doc.kind(content));
    assert_eq!(Some("42"), doc.text(content));
    assert_eq!(None, doc.name(content));
    assert!(doc.attrs(content).is_empty());
}

#[test]
fn captures_declaration_from_reader() {
    let doc = Sut::from_str(
        r#"<?xml version="1.0" encoding="UTF-8"?><racine/>"#,
    )
    .expect("parse failed");

    assert_eq!(
        Some(&XmlDeclaration {
            version: "1.0".into(),
            encoding: Some("UTF-8".into()),
            standalone: None,
        }),
        doc.declaration()
    );
}

#[test]
fn no_declaration_when_source_has_none() {
    let doc = Sut::from_str("<racine/>").expect("parse failed");

    assert_eq!(None, doc.declaration());
}

#[test]
fn sibling_navigation() {
    let doc = Sut::from_str("<r><a/><b>x</b><c/></r>").expect("parse failed");

    let root = doc.root();
    let (a, b, c) = match doc.children(root) {
        &[a, b, c] => (a, b, c),
        other => panic!("unexpected children: {:?}", other),
    };

    assert_eq!(None, doc.prev_sibling(a));
    assert_eq!(Some(b), doc.next_sibling(a));

    assert_eq!(Some(a), doc.prev_sibling(b));
    assert_eq!(Some(c), doc.next_sibling(b));

    assert_eq!(Some(b), doc.prev_sibling(c));
    assert_eq!(None, doc.next_sibling(c));

    // The root has no siblings at all.
    assert_eq!(None, doc.prev_sibling(root));
    assert_eq!(None, doc.next_sibling(root));
}

#[test]
fn text_content_concatenates_subtree_in_document_order() {
    let doc =
        Sut::from_str("<r><a>foo</a>bar<b><c>ba</c>z</b></r>")
            .expect("parse failed");

    assert_eq!("foobarbaz", doc.text_content(doc.root()));

    let b = *doc.children(doc.root()).last().expect("missing children");
    assert_eq!("baz", doc.text_content(b));
}

#[test]
fn walk_visits_depth_first_with_balanced_enter_and_leave() {
    let doc = Sut::from_str(r#"<r a="1"><b>hi</b><c/></r>"#)
        .expect("parse failed");

    let mut trace = Vec::new();

    doc.walk(doc.root(), &mut |step| {
        trace.push(match step {
            Step::EnterElement(_, name, attrs) => {
                format!("enter {} ({})", name, attrs.len())
            }
            Step::Text(_, content) => format!("text {}", content),
            Step::LeaveElement(_, name) => format!("leave {}", name),
        });
    });

    assert_eq!(
        vec![
            "enter r (1)",
            "enter b (0)",
            "text hi",
            "leave b",
            "enter c (0)",
            "leave c",
            "leave r",
        ],
        trace
    );
}

#[test]
fn elements_by_name_in_document_order_including_root() {
    let doc = Sut::from_str(
        "<data><noeud><data/></noeud><data>x</data></data>",
    )
    .expect("parse failed");

    let found = doc.elements_by_name("data");

    assert_eq!(3, found.len());
    assert_eq!(doc.root(), found[0]);
    assert!(found.iter().all(|&id| doc.name(id) == Some("data")));

    // And a name that appears nowhere.
    assert!(doc.elements_by_name("absent").is_empty());
}

#[test]
fn self_closing_and_explicit_pairs_are_equivalent() {
    let explicit = Sut::from_str("<r><a></a></r>").expect("parse failed");
    let collapsed = Sut::from_str("<r><a/></r>").expect("parse failed");

    assert_eq!(
        explicit.name(explicit.children(explicit.root())[0]),
        collapsed.name(collapsed.children(collapsed.root())[0]),
    );
    assert!(collapsed
        .children(collapsed.children(collapsed.root())[0])
        .is_empty());
}

#[test]
fn unbalanced_close_is_an_error() {
    let err = build(vec![open("a"), close("b")]).unwrap_err();

    assert!(matches!(
        err,
        BuildError::UnbalancedTag { open, close }
            if open == "a" && close == "b"
    ));
}

#[test]
fn close_without_open_is_an_error() {
    let err =
        build(vec![open("a"), close("a"), close("a")]).unwrap_err();

    assert!(matches!(err, BuildError::UnexpectedClose(name) if name == "a"));
}

#[test]
fn unclosed_element_is_an_error() {
    // The stream simply ends,
    //   as when a source is abandoned mid-document.
    let err = build(vec![open("a"), open("b")]).unwrap_err();

    assert!(matches!(err, BuildError::UnclosedElement(name) if name == "b"));
}

#[test]
fn second_root_element_is_an_error() {
    let err = build(vec![open("a"), close("a"), open("b")]).unwrap_err();

    assert!(matches!(err, BuildError::MultipleRoots(name) if name == "b"));
}

#[test]
fn empty_stream_is_an_error() {
    let err = build(vec![
        ParseEvent::DocumentStart,
        ParseEvent::DocumentEnd,
    ])
    .unwrap_err();

    assert!(matches!(err, BuildError::EmptyDocument));
}

#[test]
fn text_outside_root_is_an_error() {
    let err =
        build(vec![ParseEvent::DocumentStart, text("stray")]).unwrap_err();

    assert!(matches!(err, BuildError::TextOutsideRoot));
}

// A failing event source must surface as such,
//   not as a structural error.
#[test]
fn source_failure_is_propagated() {
    let err = Sut::from_str("<racine").unwrap_err();

    assert!(matches!(err, BuildError::Source(..)));
}
