//! Syntax tree for parsed proto3 files.
//!
//! Every node records the byte span it covers. Children are owned by their
//! parent; the tree has no sharing and no cycles.

#[cfg(feature = "serde")]
use serde::Serialize;

/// A half-open byte range `[start, end)` in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// The syntax level declared by the preamble. Only proto3 is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Syntax {
    #[default]
    Proto3,
}

/// Root of the tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct File {
    pub syntax: Syntax,
    /// Top-level declarations in source order.
    pub declarations: Vec<Node>,
    pub span: Span,
}

/// A declaration or statement appearing in a file or a body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Node {
    Import(Import),
    Package(PackageDecl),
    Option(OptionDecl),
    Message(Message),
    MessageField(MessageField),
    OneOf(OneOf),
    Enum(Enum),
    EnumField(EnumField),
    Service(Service),
    Rpc(Rpc),
    EmptyStmt(EmptyStmt),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Import(n) => n.span,
            Node::Package(n) => n.span,
            Node::Option(n) => n.span,
            Node::Message(n) => n.span,
            Node::MessageField(n) => n.span,
            Node::OneOf(n) => n.span,
            Node::Enum(n) => n.span,
            Node::EnumField(n) => n.span,
            Node::Service(n) => n.span,
            Node::Rpc(n) => n.span,
            Node::EmptyStmt(n) => n.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum LitKind {
    String,
    Int,
    Bool,
}

/// A literal constant. `value` is the raw source text; string literals keep
/// their surrounding quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BasicLit {
    pub kind: LitKind,
    pub value: String,
    pub span: Span,
}

/// `import [weak|public] "path";`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Import {
    /// `weak` / `public` modifiers in source order, each at most once.
    pub modifiers: Vec<Ident>,
    pub path: BasicLit,
    pub span: Span,
}

/// `package a.b.c;` The name is not retained.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PackageDecl {
    pub span: Span,
}

/// `option name = constant;`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OptionDecl {
    pub name: Ident,
    pub value: BasicLit,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Message {
    pub name: Ident,
    pub body: Vec<Node>,
    pub span: Span,
}

/// The type of a message field: a named type or a map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum FieldType {
    Named(Ident),
    Map(MapType),
}

impl FieldType {
    pub fn span(&self) -> Span {
        match self {
            FieldType::Named(ident) => ident.span,
            FieldType::Map(map) => map.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MessageField {
    pub name: Ident,
    /// Field number as written; never range-checked.
    pub number: BasicLit,
    pub field_type: FieldType,
    /// The `repeated` keyword, when present.
    pub repeated: Option<Ident>,
    pub span: Span,
}

/// `map<key, value>`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MapType {
    pub key: Ident,
    pub value: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OneOf {
    pub name: Ident,
    pub body: Vec<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Enum {
    pub name: Ident,
    pub body: Vec<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EnumField {
    pub name: Ident,
    /// Raw literal text of the value.
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Service {
    pub name: Ident,
    pub body: Block,
    pub span: Span,
}

/// A brace-delimited statement list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Block {
    /// Offset of `{`.
    pub opening: usize,
    pub statements: Vec<Node>,
    /// Offset of `}`.
    pub closing: usize,
}

impl Block {
    pub fn span(&self) -> Span {
        Span::new(self.opening, self.closing + 1)
    }
}

/// `rpc Name(Input) returns (Output) {}`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Rpc {
    pub name: Ident,
    pub input_type: Ident,
    pub output_type: Ident,
    pub span: Span,
}

/// A stray `;`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EmptyStmt {
    pub span: Span,
}
