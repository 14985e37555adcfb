//! Traversal order tests. Every consumer relies on the child order checked
//! here.

use pb::ast::*;
use pb::parser::grammar::MAX_NESTING;
use pb::visit::{inspect, walk, NodeKind, NodeRef, Visitor};
use pretty_assertions::assert_eq;

/// Records `+Kind` on enter and `-Kind` on leave; identifiers and literals
/// include their text.
#[derive(Default)]
struct Trip {
    events: Vec<String>,
    decline: Vec<NodeKind>,
}

fn label(node: NodeRef<'_>) -> String {
    match node {
        NodeRef::Ident(i) => format!("Ident({})", i.name),
        NodeRef::BasicLit(l) => format!("Lit({})", l.value),
        other => format!("{:?}", other.kind()),
    }
}

impl<'ast> Visitor<'ast> for Trip {
    fn enter(&mut self, node: NodeRef<'ast>) -> bool {
        self.events.push(format!("+{}", label(node)));
        !self.decline.contains(&node.kind())
    }

    fn leave(&mut self, node: NodeRef<'ast>) {
        self.events.push(format!("-{}", label(node)));
    }
}

fn trip(body: &str) -> Vec<String> {
    trip_declining(body, &[])
}

fn trip_declining(body: &str, decline: &[NodeKind]) -> Vec<String> {
    let src = format!("syntax = \"proto3\";\n{}", body);
    let file = pb::parse_str(&src).unwrap();
    let mut t = Trip {
        decline: decline.to_vec(),
        ..Default::default()
    };
    walk(&mut t, NodeRef::File(&file));
    t.events
}

fn expect(events: &[&str]) -> Vec<String> {
    events.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_empty_file() {
    assert_eq!(trip(""), expect(&["+File", "-File"]));
}

#[test]
fn test_import_order() {
    assert_eq!(
        trip("import weak \"a.proto\";"),
        expect(&[
            "+File",
            "+Import",
            "+Ident(weak)",
            "-Ident(weak)",
            "+Lit(\"a.proto\")",
            "-Lit(\"a.proto\")",
            "-Import",
            "-File",
        ])
    );
}

#[test]
fn test_package_and_option_order() {
    assert_eq!(
        trip("package a.b;\noption go_package = \"x\";"),
        expect(&[
            "+File",
            "+Package",
            "-Package",
            "+Option",
            "+Ident(go_package)",
            "-Ident(go_package)",
            "+Lit(\"x\")",
            "-Lit(\"x\")",
            "-Option",
            "-File",
        ])
    );
}

#[test]
fn test_message_field_order() {
    // name, number, type, repeated marker
    assert_eq!(
        trip("message M { repeated string tags = 2; ; }"),
        expect(&[
            "+File",
            "+Message",
            "+Ident(M)",
            "-Ident(M)",
            "+MessageField",
            "+Ident(tags)",
            "-Ident(tags)",
            "+Lit(2)",
            "-Lit(2)",
            "+Ident(string)",
            "-Ident(string)",
            "+Ident(repeated)",
            "-Ident(repeated)",
            "-MessageField",
            "+EmptyStmt",
            "-EmptyStmt",
            "-Message",
            "-File",
        ])
    );
}

#[test]
fn test_map_field_order() {
    assert_eq!(
        trip("message M { map<string, int64> counts = 1; }"),
        expect(&[
            "+File",
            "+Message",
            "+Ident(M)",
            "-Ident(M)",
            "+MessageField",
            "+Ident(counts)",
            "-Ident(counts)",
            "+Lit(1)",
            "-Lit(1)",
            "+MapType",
            "+Ident(string)",
            "-Ident(string)",
            "+Ident(int64)",
            "-Ident(int64)",
            "-MapType",
            "-MessageField",
            "-Message",
            "-File",
        ])
    );
}

#[test]
fn test_oneof_and_enum_order() {
    assert_eq!(
        trip("message M { oneof o { bool b = 1; } enum E { A = 0; } }"),
        expect(&[
            "+File",
            "+Message",
            "+Ident(M)",
            "-Ident(M)",
            "+OneOf",
            "+Ident(o)",
            "-Ident(o)",
            "+MessageField",
            "+Ident(b)",
            "-Ident(b)",
            "+Lit(1)",
            "-Lit(1)",
            "+Ident(bool)",
            "-Ident(bool)",
            "-MessageField",
            "-OneOf",
            "+Enum",
            "+Ident(E)",
            "-Ident(E)",
            "+EnumField",
            "+Ident(A)",
            "-Ident(A)",
            "-EnumField",
            "-Enum",
            "-Message",
            "-File",
        ])
    );
}

#[test]
fn test_service_order() {
    assert_eq!(
        trip("service S { rpc Get(Req) returns (Res) {} }"),
        expect(&[
            "+File",
            "+Service",
            "+Ident(S)",
            "-Ident(S)",
            "+Block",
            "+Rpc",
            "+Ident(Get)",
            "-Ident(Get)",
            "+Ident(Req)",
            "-Ident(Req)",
            "+Ident(Res)",
            "-Ident(Res)",
            "-Rpc",
            "-Block",
            "-Service",
            "-File",
        ])
    );
}

#[test]
fn test_declining_skips_children_but_leaves() {
    assert_eq!(
        trip_declining("enum E { A = 0; } message M {}", &[NodeKind::Enum]),
        expect(&[
            "+File",
            "+Enum",
            "-Enum",
            "+Message",
            "+Ident(M)",
            "-Ident(M)",
            "-Message",
            "-File",
        ])
    );
}

#[test]
fn test_walk_from_inner_node() {
    let file = pb::parse_str("syntax = \"proto3\"; enum E { A = 0; B = 1; }").unwrap();
    let Node::Enum(e) = &file.declarations[0] else {
        panic!("expected enum");
    };
    let mut t = Trip::default();
    walk(&mut t, (&e.body[1]).into());
    assert_eq!(
        t.events,
        expect(&["+EnumField", "+Ident(B)", "-Ident(B)", "-EnumField"])
    );
}

#[test]
fn test_inspect_counts_every_node() {
    let file = pb::parse_str("syntax = \"proto3\"; message M { string a = 1; }").unwrap();
    let mut kinds = Vec::new();
    inspect(&file, |node| {
        kinds.push(node.kind());
        true
    });
    assert_eq!(
        kinds,
        vec![
            NodeKind::File,
            NodeKind::Message,
            NodeKind::Ident,
            NodeKind::MessageField,
            NodeKind::Ident,
            NodeKind::BasicLit,
            NodeKind::Ident,
        ]
    );
}

#[test]
fn test_visitor_can_borrow_from_tree() {
    struct Names<'ast>(Vec<&'ast str>);

    impl<'ast> Visitor<'ast> for Names<'ast> {
        fn enter(&mut self, node: NodeRef<'ast>) -> bool {
            if let NodeRef::Ident(i) = node {
                self.0.push(&i.name);
            }
            true
        }
    }

    let file = pb::parse_str("syntax = \"proto3\"; service S { rpc A(B) returns (C) {} }").unwrap();
    let mut names = Names(Vec::new());
    walk(&mut names, (&file).into());
    assert_eq!(names.0, vec!["S", "A", "B", "C"]);
}

#[test]
fn test_walk_deepest_parsed_tree() {
    let src = format!(
        "syntax = \"proto3\"; {}{}",
        "message A {".repeat(MAX_NESTING),
        "}".repeat(MAX_NESTING)
    );
    let file = pb::parse_str(&src).unwrap();
    let mut t = Trip::default();
    walk(&mut t, NodeRef::File(&file));
    let messages = t.events.iter().filter(|e| *e == "+Message").count();
    assert_eq!(messages, MAX_NESTING);
    assert_eq!(t.events.last().map(String::as_str), Some("-File"));
}
