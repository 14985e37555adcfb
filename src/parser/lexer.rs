use std::fmt;
use std::iter::FusedIterator;

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    /// A lexical error; the token text holds the message.
    Error,
    /// End of input
    #[default]
    Eof,

    /// `.`
    Dot,
    /// `=`
    Eq,
    /// `;`
    Semicolon,
    /// `,` (only inside `< >`)
    Comma,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `<`
    LAngle,
    /// `>`
    RAngle,

    /// `letter { letter | digit | "_" }`
    Ident,
    /// `ident { "." ident }`
    FullIdent,
    /// `"..."`, quotes included in the token text
    StrLit,
    /// Decimal or hex integer, optionally negative
    IntLit,
    /// `true` | `false`
    BoolLit,
    /// `// ...` up to the end of the line
    Comment,

    Syntax,
    Import,
    Weak,
    Public,
    Package,
    Option,
    Message,
    Enum,
    OneOf,
    Map,
    Repeated,
    Service,
    Rpc,
    Returns,
}

/// Reserved words. Matching is exact and case-sensitive.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("syntax", TokenKind::Syntax),
    ("import", TokenKind::Import),
    ("weak", TokenKind::Weak),
    ("public", TokenKind::Public),
    ("package", TokenKind::Package),
    ("option", TokenKind::Option),
    ("message", TokenKind::Message),
    ("enum", TokenKind::Enum),
    ("oneof", TokenKind::OneOf),
    ("map", TokenKind::Map),
    ("repeated", TokenKind::Repeated),
    ("service", TokenKind::Service),
    ("rpc", TokenKind::Rpc),
    ("returns", TokenKind::Returns),
];

/// Look up a fully scanned identifier in the keyword table.
pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|&(_, kind)| kind)
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        KEYWORDS.iter().any(|&(_, kind)| kind == self)
    }

    /// Human-readable description used in "expected ..." messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Error => "error",
            TokenKind::Eof => "end of input",
            TokenKind::Dot => "'.'",
            TokenKind::Eq => "'='",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LAngle => "'<'",
            TokenKind::RAngle => "'>'",
            TokenKind::Ident => "identifier",
            TokenKind::FullIdent => "qualified identifier",
            TokenKind::StrLit => "string literal",
            TokenKind::IntLit => "integer literal",
            TokenKind::BoolLit => "boolean literal",
            TokenKind::Comment => "comment",
            TokenKind::Syntax => "'syntax'",
            TokenKind::Import => "'import'",
            TokenKind::Weak => "'weak'",
            TokenKind::Public => "'public'",
            TokenKind::Package => "'package'",
            TokenKind::Option => "'option'",
            TokenKind::Message => "'message'",
            TokenKind::Enum => "'enum'",
            TokenKind::OneOf => "'oneof'",
            TokenKind::Map => "'map'",
            TokenKind::Repeated => "'repeated'",
            TokenKind::Service => "'service'",
            TokenKind::Rpc => "'rpc'",
            TokenKind::Returns => "'returns'",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token with its starting byte offset in the source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
    pub text: String,
}

impl Token {
    /// Offset one past the last byte of the token.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Error => f.write_str(&self.text),
            kind if kind.is_keyword() => write!(f, "<{}>", self.text),
            _ if self.text.chars().count() > 10 => {
                let head: String = self.text.chars().take(10).collect();
                write!(f, "{:?}...", head)
            }
            _ => write!(f, "{:?}", self.text),
        }
    }
}

/// Tokenizer for proto3 source text.
///
/// The lexer is a pull-based iterator: each call to `next` scans exactly one
/// token. It yields `Eof` once at the end of input, or a single `Error`
/// token on the first lexical error, and then stops.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current scan position.
    pos: usize,
    /// Start of the lexeme being scanned.
    start: usize,
    brace_depth: usize,
    map_depth: usize,
    finished: bool,
}

/// Create a lexer over `input`.
pub fn tokenize(input: &str) -> Lexer<'_> {
    Lexer::new(input)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn describe_char(c: char) -> String {
    format!("U+{:04X} '{}'", c as u32, c)
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            start: 0,
            brace_depth: 0,
            map_depth: 0,
            finished: false,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn emit(&mut self, kind: TokenKind) -> Token {
        let token = Token {
            kind,
            offset: self.start,
            text: self.input[self.start..self.pos].to_string(),
        };
        self.start = self.pos;
        token
    }

    fn error(&mut self, message: String) -> Token {
        log::debug!("lexical error at offset {}: {}", self.start, message);
        self.finished = true;
        Token {
            kind: TokenKind::Error,
            offset: self.start,
            text: message,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.peek_char() {
            self.advance();
        }
        self.start = self.pos;
    }

    fn scan(&mut self) -> Token {
        self.skip_whitespace();

        let Some(c) = self.advance() else {
            self.finished = true;
            return self.emit(TokenKind::Eof);
        };

        match c {
            '.' => self.emit(TokenKind::Dot),
            '=' => self.emit(TokenKind::Eq),
            ';' => self.emit(TokenKind::Semicolon),
            '<' => {
                self.map_depth += 1;
                self.emit(TokenKind::LAngle)
            }
            '>' => {
                self.map_depth = self.map_depth.saturating_sub(1);
                self.emit(TokenKind::RAngle)
            }
            '[' => self.emit(TokenKind::LBracket),
            ']' => self.emit(TokenKind::RBracket),
            '(' => self.emit(TokenKind::LParen),
            ')' => self.emit(TokenKind::RParen),
            '{' => {
                self.brace_depth += 1;
                self.emit(TokenKind::LBrace)
            }
            '}' => {
                if self.brace_depth == 0 {
                    return self.error(format!("unexpected right brace {}", describe_char(c)));
                }
                self.brace_depth -= 1;
                self.emit(TokenKind::RBrace)
            }
            ',' => {
                if self.map_depth == 0 {
                    return self.error(format!(
                        "unexpected comma outside of map definition {}",
                        describe_char(c)
                    ));
                }
                self.emit(TokenKind::Comma)
            }
            '"' => self.lex_quote(),
            '/' => self.lex_comment(),
            '-' if self.peek_char().is_some_and(|n| n.is_ascii_digit()) => self.lex_number(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if is_ident_start(c) => self.lex_ident(),
            c => self.error(format!("unrecognized character {}", describe_char(c))),
        }
    }

    /// Line comment; the leading `/` has been consumed.
    fn lex_comment(&mut self) -> Token {
        if self.advance() != Some('/') {
            return self.error("comments must start with two slashes".into());
        }
        while let Some(c) = self.peek_char() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.advance();
        }
        self.emit(TokenKind::Comment)
    }

    /// Quoted string; the opening `"` has been consumed. Escapes are not
    /// interpreted.
    fn lex_quote(&mut self) -> Token {
        loop {
            match self.advance() {
                None | Some('\n') => return self.error("unterminated quoted string".into()),
                Some('"') => return self.emit(TokenKind::StrLit),
                Some(_) => {}
            }
        }
    }

    /// Integer literal; the first digit or `-` has been consumed.
    fn lex_number(&mut self) -> Token {
        let negative = self.input.as_bytes()[self.start] == b'-';
        let leading_zero = if negative {
            self.peek_char() == Some('0')
        } else {
            self.input.as_bytes()[self.start] == b'0'
        };
        if negative {
            self.advance();
        }
        if leading_zero
            && matches!(self.peek_char(), Some('x' | 'X'))
            && self.peek_second().is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.advance();
            while self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
        } else {
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                self.pos += c.len_utf8();
                return self.error(format!(
                    "invalid character {} in integer literal",
                    describe_char(c)
                ));
            }
        }
        self.emit(TokenKind::IntLit)
    }

    /// Identifier, keyword, boolean, or qualified identifier; the first
    /// character has been consumed.
    fn lex_ident(&mut self) -> Token {
        let mut qualified = false;
        loop {
            while self.peek_char().is_some_and(is_ident_continue) {
                self.advance();
            }
            if self.peek_char() == Some('.') && self.peek_second().is_some_and(is_ident_start) {
                self.advance();
                qualified = true;
            } else {
                break;
            }
        }

        let word = &self.input[self.start..self.pos];
        let kind = if qualified {
            TokenKind::FullIdent
        } else if let Some(kw) = keyword(word) {
            kw
        } else if word == "true" || word == "false" {
            TokenKind::BoolLit
        } else {
            TokenKind::Ident
        };
        self.emit(kind)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        Some(self.scan())
    }
}

impl FusedIterator for Lexer<'_> {}
