//! Depth-first traversal over the syntax tree.
//!
//! [`walk`] calls [`Visitor::enter`] on a node, then (if `enter` returned
//! `true`) walks its children in field order, then calls
//! [`Visitor::leave`] exactly once. `leave` runs for every entered node,
//! including leaves and nodes whose children were skipped.
//!
//! Child order per node:
//!
//! | Node | Children |
//! |---|---|
//! | `File` | declarations |
//! | `Import` | modifiers, path |
//! | `Option` | name, value |
//! | `Message`, `OneOf`, `Enum` | name, body |
//! | `MessageField` | name, number, field type, `repeated` marker |
//! | `MapType` | key, value |
//! | `EnumField` | name |
//! | `Service` | name, body block |
//! | `Block` | statements |
//! | `Rpc` | name, input type, output type |
//!
//! `Ident`, `BasicLit`, `PackageDecl` and `EmptyStmt` have no children.
//! Absent optional children are skipped.
//!
//! ```rust
//! use pb::visit::{self, NodeKind};
//!
//! let file = pb::parse_str(r#"syntax = "proto3"; enum E { A = 0; }"#).unwrap();
//! let mut idents = 0;
//! visit::inspect(&file, |node| {
//!     if node.kind() == NodeKind::Ident {
//!         idents += 1;
//!     }
//!     true
//! });
//! assert_eq!(idents, 2);
//! ```

use crate::ast::*;

/// Borrowed view of any node in the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'ast> {
    File(&'ast File),
    Ident(&'ast Ident),
    BasicLit(&'ast BasicLit),
    Import(&'ast Import),
    Package(&'ast PackageDecl),
    Option(&'ast OptionDecl),
    Message(&'ast Message),
    MessageField(&'ast MessageField),
    MapType(&'ast MapType),
    OneOf(&'ast OneOf),
    Enum(&'ast Enum),
    EnumField(&'ast EnumField),
    Service(&'ast Service),
    Block(&'ast Block),
    Rpc(&'ast Rpc),
    EmptyStmt(&'ast EmptyStmt),
}

/// The variant of a [`NodeRef`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Ident,
    BasicLit,
    Import,
    Package,
    Option,
    Message,
    MessageField,
    MapType,
    OneOf,
    Enum,
    EnumField,
    Service,
    Block,
    Rpc,
    EmptyStmt,
}

impl<'ast> NodeRef<'ast> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::File(_) => NodeKind::File,
            NodeRef::Ident(_) => NodeKind::Ident,
            NodeRef::BasicLit(_) => NodeKind::BasicLit,
            NodeRef::Import(_) => NodeKind::Import,
            NodeRef::Package(_) => NodeKind::Package,
            NodeRef::Option(_) => NodeKind::Option,
            NodeRef::Message(_) => NodeKind::Message,
            NodeRef::MessageField(_) => NodeKind::MessageField,
            NodeRef::MapType(_) => NodeKind::MapType,
            NodeRef::OneOf(_) => NodeKind::OneOf,
            NodeRef::Enum(_) => NodeKind::Enum,
            NodeRef::EnumField(_) => NodeKind::EnumField,
            NodeRef::Service(_) => NodeKind::Service,
            NodeRef::Block(_) => NodeKind::Block,
            NodeRef::Rpc(_) => NodeKind::Rpc,
            NodeRef::EmptyStmt(_) => NodeKind::EmptyStmt,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            NodeRef::File(n) => n.span,
            NodeRef::Ident(n) => n.span,
            NodeRef::BasicLit(n) => n.span,
            NodeRef::Import(n) => n.span,
            NodeRef::Package(n) => n.span,
            NodeRef::Option(n) => n.span,
            NodeRef::Message(n) => n.span,
            NodeRef::MessageField(n) => n.span,
            NodeRef::MapType(n) => n.span,
            NodeRef::OneOf(n) => n.span,
            NodeRef::Enum(n) => n.span,
            NodeRef::EnumField(n) => n.span,
            NodeRef::Service(n) => n.span,
            NodeRef::Block(n) => n.span(),
            NodeRef::Rpc(n) => n.span,
            NodeRef::EmptyStmt(n) => n.span,
        }
    }
}

impl<'ast> From<&'ast Node> for NodeRef<'ast> {
    fn from(node: &'ast Node) -> Self {
        match node {
            Node::Import(n) => NodeRef::Import(n),
            Node::Package(n) => NodeRef::Package(n),
            Node::Option(n) => NodeRef::Option(n),
            Node::Message(n) => NodeRef::Message(n),
            Node::MessageField(n) => NodeRef::MessageField(n),
            Node::OneOf(n) => NodeRef::OneOf(n),
            Node::Enum(n) => NodeRef::Enum(n),
            Node::EnumField(n) => NodeRef::EnumField(n),
            Node::Service(n) => NodeRef::Service(n),
            Node::Rpc(n) => NodeRef::Rpc(n),
            Node::EmptyStmt(n) => NodeRef::EmptyStmt(n),
        }
    }
}

impl<'ast> From<&'ast FieldType> for NodeRef<'ast> {
    fn from(field_type: &'ast FieldType) -> Self {
        match field_type {
            FieldType::Named(ident) => NodeRef::Ident(ident),
            FieldType::Map(map) => NodeRef::MapType(map),
        }
    }
}

macro_rules! node_ref_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl<'ast> From<&'ast $ty> for NodeRef<'ast> {
                fn from(node: &'ast $ty) -> Self {
                    NodeRef::$variant(node)
                }
            }
        )*
    };
}

node_ref_from! {
    File => File,
    Ident => Ident,
    BasicLit => BasicLit,
    Import => Import,
    PackageDecl => Package,
    OptionDecl => Option,
    Message => Message,
    MessageField => MessageField,
    MapType => MapType,
    OneOf => OneOf,
    Enum => Enum,
    EnumField => EnumField,
    Service => Service,
    Block => Block,
    Rpc => Rpc,
    EmptyStmt => EmptyStmt,
}

/// Caller-supplied logic for [`walk`].
pub trait Visitor<'ast> {
    /// Called before a node's children. Return `false` to skip them.
    fn enter(&mut self, _node: NodeRef<'ast>) -> bool {
        true
    }

    /// Called once after a node's subtree is finished.
    fn leave(&mut self, _node: NodeRef<'ast>) {}
}

/// Walk `node` and its descendants depth-first.
pub fn walk<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, node: NodeRef<'ast>) {
    if visitor.enter(node) {
        walk_children(visitor, node);
    }
    visitor.leave(node);
}

fn walk_all<'ast, V, I>(visitor: &mut V, nodes: I)
where
    V: Visitor<'ast> + ?Sized,
    I: IntoIterator,
    I::Item: Into<NodeRef<'ast>>,
{
    for node in nodes {
        walk(visitor, node.into());
    }
}

fn walk_children<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, node: NodeRef<'ast>) {
    match node {
        NodeRef::File(n) => walk_all(visitor, &n.declarations),
        NodeRef::Ident(_) | NodeRef::BasicLit(_) | NodeRef::Package(_) | NodeRef::EmptyStmt(_) => {}
        NodeRef::Import(n) => {
            walk_all(visitor, &n.modifiers);
            walk(visitor, NodeRef::BasicLit(&n.path));
        }
        NodeRef::Option(n) => {
            walk(visitor, NodeRef::Ident(&n.name));
            walk(visitor, NodeRef::BasicLit(&n.value));
        }
        NodeRef::Message(n) => {
            walk(visitor, NodeRef::Ident(&n.name));
            walk_all(visitor, &n.body);
        }
        NodeRef::MessageField(n) => {
            walk(visitor, NodeRef::Ident(&n.name));
            walk(visitor, NodeRef::BasicLit(&n.number));
            walk(visitor, NodeRef::from(&n.field_type));
            if let Some(repeated) = &n.repeated {
                walk(visitor, NodeRef::Ident(repeated));
            }
        }
        NodeRef::MapType(n) => {
            walk(visitor, NodeRef::Ident(&n.key));
            walk(visitor, NodeRef::Ident(&n.value));
        }
        NodeRef::OneOf(n) => {
            walk(visitor, NodeRef::Ident(&n.name));
            walk_all(visitor, &n.body);
        }
        NodeRef::Enum(n) => {
            walk(visitor, NodeRef::Ident(&n.name));
            walk_all(visitor, &n.body);
        }
        NodeRef::EnumField(n) => walk(visitor, NodeRef::Ident(&n.name)),
        NodeRef::Service(n) => {
            walk(visitor, NodeRef::Ident(&n.name));
            walk(visitor, NodeRef::Block(&n.body));
        }
        NodeRef::Block(n) => walk_all(visitor, &n.statements),
        NodeRef::Rpc(n) => {
            walk(visitor, NodeRef::Ident(&n.name));
            walk(visitor, NodeRef::Ident(&n.input_type));
            walk(visitor, NodeRef::Ident(&n.output_type));
        }
    }
}

/// Adapts a closure into a [`Visitor`] that ignores `leave`.
struct Inspector<F>(F);

impl<'ast, F> Visitor<'ast> for Inspector<F>
where
    F: FnMut(NodeRef<'ast>) -> bool,
{
    fn enter(&mut self, node: NodeRef<'ast>) -> bool {
        (self.0)(node)
    }
}

/// Walk the tree calling `f` on entry to each node; `f` returns whether to
/// descend into the node's children.
pub fn inspect<'ast, N, F>(node: N, f: F)
where
    N: Into<NodeRef<'ast>>,
    F: FnMut(NodeRef<'ast>) -> bool,
{
    walk(&mut Inspector(f), node.into());
}
