use crate::error::ParseError;
use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};

/// Deepest allowed nesting of message, oneof and enum bodies.
pub const MAX_NESTING: usize = 100;

/// Parse proto3 source text into a syntax tree.
///
/// Parsing stops at the first lexical or syntax error.
pub fn parse_proto(input: &str) -> Result<File, ParseError> {
    let mut parser = Parser::new(input);
    parser.parse_file()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    source_len: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
            source_len: input.len(),
            depth: 0,
        }
    }

    fn parse_file(&mut self) -> Result<File, ParseError> {
        log::debug!("parsing {} bytes", self.source_len);
        self.parse_syntax()?;

        let mut declarations = Vec::new();
        loop {
            let tok = self.next()?;
            let node = match tok.kind {
                TokenKind::Import => self.parse_import(tok)?,
                TokenKind::Package => self.parse_package(tok)?,
                TokenKind::Option => Node::Option(self.parse_option(tok)?),
                TokenKind::Message => Node::Message(self.nested(tok, Self::parse_message)?),
                TokenKind::Enum => Node::Enum(self.nested(tok, Self::parse_enum)?),
                TokenKind::Service => Node::Service(self.parse_service(tok)?),
                TokenKind::Eof => break,
                _ => {
                    return Err(unexpected(
                        &tok,
                        "'import', 'package', 'option', 'message', 'enum' or 'service'",
                    ))
                }
            };
            log::trace!("parsed declaration at {:?}", node.span());
            declarations.push(node);
        }

        log::debug!("parsed {} top-level declarations", declarations.len());
        Ok(File {
            syntax: Syntax::Proto3,
            declarations,
            span: Span::new(0, self.source_len),
        })
    }

    /// `syntax = "proto3";`
    fn parse_syntax(&mut self) -> Result<(), ParseError> {
        for kind in [
            TokenKind::Syntax,
            TokenKind::Eq,
            TokenKind::StrLit,
            TokenKind::Semicolon,
        ] {
            let tok = self.next()?;
            let matches = tok.kind == kind && (kind != TokenKind::StrLit || tok.text == "\"proto3\"");
            if !matches {
                return Err(ParseError::MissingPreamble {
                    offset: tok.offset,
                    found: tok.to_string(),
                });
            }
        }
        Ok(())
    }

    /// `import [weak|public] strLit ;` with the `import` keyword consumed.
    fn parse_import(&mut self, keyword: Token) -> Result<Node, ParseError> {
        let mut modifiers: Vec<Ident> = Vec::new();
        loop {
            let tok = self.next()?;
            match tok.kind {
                TokenKind::Weak | TokenKind::Public => {
                    if modifiers.iter().any(|m| m.name == tok.text) {
                        return Err(ParseError::DuplicateModifier {
                            offset: tok.offset,
                            modifier: tok.text,
                        });
                    }
                    modifiers.push(ident(tok));
                }
                TokenKind::StrLit => {
                    let [semi] = self.expect([TokenKind::Semicolon])?;
                    return Ok(Node::Import(Import {
                        modifiers,
                        path: literal(tok, LitKind::String),
                        span: Span::new(keyword.offset, semi.end()),
                    }));
                }
                _ => return Err(unexpected(&tok, "'weak', 'public' or string literal")),
            }
        }
    }

    /// Skips everything up to and including `;`. The name is dropped.
    fn parse_package(&mut self, keyword: Token) -> Result<Node, ParseError> {
        loop {
            let tok = self.next()?;
            match tok.kind {
                TokenKind::Semicolon => {
                    return Ok(Node::Package(PackageDecl {
                        span: Span::new(keyword.offset, tok.end()),
                    }))
                }
                TokenKind::Eof => return Err(unexpected(&tok, TokenKind::Semicolon.describe())),
                _ => {}
            }
        }
    }

    /// `option ident = (strLit | boolLit) ;`
    fn parse_option(&mut self, keyword: Token) -> Result<OptionDecl, ParseError> {
        let name = self.expect_type_name()?;
        self.expect([TokenKind::Eq])?;

        let tok = self.next()?;
        let kind = match tok.kind {
            TokenKind::StrLit => LitKind::String,
            TokenKind::BoolLit => LitKind::Bool,
            _ => return Err(unexpected(&tok, "string or boolean literal")),
        };
        let [semi] = self.expect([TokenKind::Semicolon])?;

        Ok(OptionDecl {
            name,
            value: literal(tok, kind),
            span: Span::new(keyword.offset, semi.end()),
        })
    }

    /// Run a body parser one nesting level deeper, failing at the keyword
    /// once [`MAX_NESTING`] is exceeded.
    fn nested<T>(
        &mut self,
        keyword: Token,
        parse: impl FnOnce(&mut Self, Token) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::NestingTooDeep {
                offset: keyword.offset,
                limit: MAX_NESTING,
            });
        }
        self.depth += 1;
        let result = parse(self, keyword);
        self.depth -= 1;
        result
    }

    fn parse_message(&mut self, keyword: Token) -> Result<Message, ParseError> {
        let name = self.expect_name()?;
        self.expect([TokenKind::LBrace])?;
        let (body, close) = self.parse_fields(BodyKind::Message)?;
        Ok(Message {
            name,
            body,
            span: Span::new(keyword.offset, close.end()),
        })
    }

    fn parse_oneof(&mut self, keyword: Token) -> Result<OneOf, ParseError> {
        let name = self.expect_name()?;
        self.expect([TokenKind::LBrace])?;
        let (body, close) = self.parse_fields(BodyKind::OneOf)?;
        Ok(OneOf {
            name,
            body,
            span: Span::new(keyword.offset, close.end()),
        })
    }

    /// Members of a message or oneof body, up to and including the closing
    /// brace, which is returned alongside the members.
    fn parse_fields(&mut self, kind: BodyKind) -> Result<(Vec<Node>, Token), ParseError> {
        let in_message = kind == BodyKind::Message;
        let mut body = Vec::new();

        loop {
            let tok = self.next()?;
            let node = match tok.kind {
                TokenKind::Semicolon => empty_stmt(&tok),
                TokenKind::OneOf if in_message => Node::OneOf(self.nested(tok, Self::parse_oneof)?),
                TokenKind::Message => Node::Message(self.nested(tok, Self::parse_message)?),
                TokenKind::Enum if in_message => Node::Enum(self.nested(tok, Self::parse_enum)?),
                TokenKind::Option => Node::Option(self.parse_option(tok)?),
                TokenKind::Repeated if in_message => {
                    let field_type = FieldType::Named(self.expect_type_name()?);
                    let start = tok.offset;
                    self.parse_field(start, field_type, Some(ident(tok)))?
                }
                TokenKind::Map => {
                    let start = tok.offset;
                    let map = self.parse_map_type(tok)?;
                    self.parse_field(start, FieldType::Map(map), None)?
                }
                TokenKind::Ident | TokenKind::FullIdent => {
                    let start = tok.offset;
                    self.parse_field(start, FieldType::Named(ident(tok)), None)?
                }
                TokenKind::RBrace => return Ok((body, tok)),
                _ => return Err(unexpected(&tok, kind.expected_member())),
            };
            body.push(node);
        }
    }

    /// `ident = intLit ;` following a field type.
    fn parse_field(
        &mut self,
        start: usize,
        field_type: FieldType,
        repeated: Option<Ident>,
    ) -> Result<Node, ParseError> {
        let [name, _, number, semi] = self.expect([
            TokenKind::Ident,
            TokenKind::Eq,
            TokenKind::IntLit,
            TokenKind::Semicolon,
        ])?;
        Ok(Node::MessageField(MessageField {
            name: ident(name),
            number: literal(number, LitKind::Int),
            field_type,
            repeated,
            span: Span::new(start, semi.end()),
        }))
    }

    /// `< type , type >` with the `map` keyword consumed.
    fn parse_map_type(&mut self, keyword: Token) -> Result<MapType, ParseError> {
        self.expect([TokenKind::LAngle])?;
        let key = self.expect_type_name()?;
        self.expect([TokenKind::Comma])?;
        let value = self.expect_type_name()?;
        let [close] = self.expect([TokenKind::RAngle])?;
        Ok(MapType {
            key,
            value,
            span: Span::new(keyword.offset, close.end()),
        })
    }

    fn parse_enum(&mut self, keyword: Token) -> Result<Enum, ParseError> {
        let name = self.expect_name()?;
        self.expect([TokenKind::LBrace])?;

        let mut body = Vec::new();
        loop {
            let tok = self.next()?;
            let node = match tok.kind {
                TokenKind::Semicolon => empty_stmt(&tok),
                TokenKind::Option => Node::Option(self.parse_option(tok)?),
                TokenKind::Ident => {
                    let [_, value, semi] =
                        self.expect([TokenKind::Eq, TokenKind::IntLit, TokenKind::Semicolon])?;
                    let start = tok.offset;
                    Node::EnumField(EnumField {
                        name: ident(tok),
                        value: value.text,
                        span: Span::new(start, semi.end()),
                    })
                }
                TokenKind::RBrace => {
                    return Ok(Enum {
                        name,
                        body,
                        span: Span::new(keyword.offset, tok.end()),
                    })
                }
                _ => return Err(unexpected(&tok, "enum field, 'option', ';' or '}'")),
            };
            body.push(node);
        }
    }

    fn parse_service(&mut self, keyword: Token) -> Result<Service, ParseError> {
        let name = self.expect_name()?;
        let [open] = self.expect([TokenKind::LBrace])?;

        let mut statements = Vec::new();
        loop {
            let tok = self.next()?;
            let node = match tok.kind {
                TokenKind::Semicolon => empty_stmt(&tok),
                TokenKind::Option => Node::Option(self.parse_option(tok)?),
                TokenKind::Rpc => Node::Rpc(self.parse_rpc(tok)?),
                TokenKind::RBrace => {
                    return Ok(Service {
                        name,
                        body: Block {
                            opening: open.offset,
                            statements,
                            closing: tok.offset,
                        },
                        span: Span::new(keyword.offset, tok.end()),
                    })
                }
                _ => return Err(unexpected(&tok, "'rpc', 'option', ';' or '}'")),
            };
            statements.push(node);
        }
    }

    /// `rpc ident ( type ) returns ( type ) { }` with `rpc` consumed.
    fn parse_rpc(&mut self, keyword: Token) -> Result<Rpc, ParseError> {
        let name = self.expect_name()?;
        self.expect([TokenKind::LParen])?;
        let input_type = self.expect_type_name()?;
        self.expect([TokenKind::RParen, TokenKind::Returns, TokenKind::LParen])?;
        let output_type = self.expect_type_name()?;
        let [_, _, close] =
            self.expect([TokenKind::RParen, TokenKind::LBrace, TokenKind::RBrace])?;
        Ok(Rpc {
            name,
            input_type,
            output_type,
            span: Span::new(keyword.offset, close.end()),
        })
    }

    // Helper functions

    /// Next non-comment token. Error tokens become `ParseError::Lexical`.
    fn next(&mut self) -> Result<Token, ParseError> {
        loop {
            let tok = self.lexer.next().unwrap_or_else(|| Token {
                kind: TokenKind::Eof,
                offset: self.source_len,
                text: String::new(),
            });
            match tok.kind {
                TokenKind::Comment => continue,
                TokenKind::Error => {
                    return Err(ParseError::Lexical {
                        offset: tok.offset,
                        message: tok.text,
                    })
                }
                _ => return Ok(tok),
            }
        }
    }

    /// Pull one token per kind, failing on the first mismatch.
    fn expect<const N: usize>(&mut self, kinds: [TokenKind; N]) -> Result<[Token; N], ParseError> {
        let mut tokens: [Token; N] = std::array::from_fn(|_| Token::default());
        for (slot, kind) in tokens.iter_mut().zip(kinds) {
            let tok = self.next()?;
            if tok.kind != kind {
                return Err(unexpected(&tok, kind.describe()));
            }
            *slot = tok;
        }
        Ok(tokens)
    }

    fn expect_name(&mut self) -> Result<Ident, ParseError> {
        let [tok] = self.expect([TokenKind::Ident])?;
        Ok(ident(tok))
    }

    /// A type reference or option name: plain or qualified identifier.
    fn expect_type_name(&mut self) -> Result<Ident, ParseError> {
        let tok = self.next()?;
        match tok.kind {
            TokenKind::Ident | TokenKind::FullIdent => Ok(ident(tok)),
            _ => Err(unexpected(&tok, TokenKind::Ident.describe())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Message,
    OneOf,
}

impl BodyKind {
    fn expected_member(self) -> &'static str {
        match self {
            BodyKind::Message => {
                "field, 'message', 'enum', 'oneof', 'option', 'repeated', 'map', ';' or '}'"
            }
            BodyKind::OneOf => "field, 'message', 'option', 'map', ';' or '}'",
        }
    }
}

fn unexpected(tok: &Token, expected: &str) -> ParseError {
    ParseError::Syntax {
        offset: tok.offset,
        found: tok.to_string(),
        expected: expected.to_string(),
    }
}

fn ident(tok: Token) -> Ident {
    Ident {
        span: Span::new(tok.offset, tok.end()),
        name: tok.text,
    }
}

fn literal(tok: Token, kind: LitKind) -> BasicLit {
    BasicLit {
        kind,
        span: Span::new(tok.offset, tok.end()),
        value: tok.text,
    }
}

fn empty_stmt(tok: &Token) -> Node {
    Node::EmptyStmt(EmptyStmt {
        span: Span::new(tok.offset, tok.end()),
    })
}
