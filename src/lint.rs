//! Naming-convention checks over a parsed proto3 file.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::ast::{File, Ident};
use crate::error::{self, Error, ParseError};
use crate::visit::{self, NodeRef};

static CAMEL_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").expect("valid camel case pattern"));
static UPPER_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("valid upper case pattern"));
static SNAKE_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid snake case pattern"));

const NAMING: &str = "naming";

/// A problem found in a source file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Problem {
    /// Byte offset of the offending node.
    pub position: usize,
    /// Description of the problem.
    pub text: String,
    /// Estimated confidence in (0, 1] that this is a real problem.
    pub confidence: f64,
    /// Short name for the general category of the problem.
    pub category: &'static str,
}

/// A single lint rule. Rules run in the order of [`Rule::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Rule {
    EnumNames,
    EnumFieldNames,
    MessageNames,
    FieldNames,
    ServiceNames,
    RpcNames,
}

impl Rule {
    pub const ALL: [Rule; 6] = [
        Rule::EnumNames,
        Rule::EnumFieldNames,
        Rule::MessageNames,
        Rule::FieldNames,
        Rule::ServiceNames,
        Rule::RpcNames,
    ];
}

/// Configurable linter.
#[derive(Debug, Clone)]
pub struct Linter {
    rules: Vec<Rule>,
    min_confidence: f64,
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

impl Linter {
    /// A linter running every rule and reporting every problem.
    pub fn new() -> Self {
        Linter {
            rules: Rule::ALL.to_vec(),
            min_confidence: 0.0,
        }
    }

    /// Restrict the linter to `rules`. They still run in [`Rule::ALL`] order.
    pub fn with_rules(mut self, rules: &[Rule]) -> Self {
        self.rules = Rule::ALL
            .iter()
            .copied()
            .filter(|r| rules.contains(r))
            .collect();
        self
    }

    /// Drop problems whose confidence is below `min`.
    pub fn min_confidence(mut self, min: f64) -> Self {
        self.min_confidence = min;
        self
    }

    /// Parse `src` and lint the resulting tree.
    pub fn lint(&self, filename: &str, src: &[u8]) -> Result<Vec<Problem>, ParseError> {
        let file = crate::parser::parse(src, Some(filename))?;
        let problems = self.lint_tree(&file);
        log::debug!("{}: {} problems", filename, problems.len());
        Ok(problems)
    }

    /// Lint an already parsed tree.
    pub fn lint_tree(&self, file: &File) -> Vec<Problem> {
        let mut checker = Checker {
            file,
            problems: Vec::new(),
        };
        for rule in &self.rules {
            checker.run(*rule);
        }
        checker
            .problems
            .into_iter()
            .filter(|p| p.confidence >= self.min_confidence)
            .collect()
    }
}

/// Lint `src` with every rule.
pub fn lint(filename: &str, src: &[u8]) -> Result<Vec<Problem>, ParseError> {
    Linter::new().lint(filename, src)
}

/// Read `path` and lint it with every rule.
pub fn lint_file(path: impl AsRef<Path>) -> error::Result<Vec<Problem>> {
    let path = path.as_ref();
    let src = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(lint(&path.display().to_string(), &src)?)
}

struct Checker<'ast> {
    file: &'ast File,
    problems: Vec<Problem>,
}

impl<'ast> Checker<'ast> {
    fn run(&mut self, rule: Rule) {
        match rule {
            Rule::EnumNames => self.lint_enums(),
            Rule::EnumFieldNames => self.lint_enum_fields(),
            Rule::MessageNames => self.lint_messages(),
            Rule::FieldNames => self.lint_message_fields(),
            Rule::ServiceNames => self.lint_services(),
            Rule::RpcNames => self.lint_rpcs(),
        }
    }

    fn report(&mut self, node: NodeRef<'_>, confidence: f64, text: String) {
        self.problems.push(Problem {
            position: node.span().start,
            text,
            confidence,
            category: NAMING,
        });
    }

    fn check(&mut self, node: NodeRef<'_>, name: &Ident, re: &Regex, what: &str, style: &str) {
        if !re.is_match(&name.name) {
            self.report(
                node,
                0.9,
                format!("{} names should be {}; {}", what, style, name.name),
            );
        }
    }

    /// Nodes for which `pick` returns `Some(descend)`, in walk order.
    fn walk(&self, mut pick: impl FnMut(NodeRef<'ast>) -> Option<bool>) -> Vec<NodeRef<'ast>> {
        let mut found = Vec::new();
        visit::inspect(self.file, |node| match pick(node) {
            Some(descend) => {
                found.push(node);
                descend
            }
            None => true,
        });
        found
    }

    /// Enum names should be CamelCase.
    fn lint_enums(&mut self) {
        for node in self.walk(|n| matches!(n, NodeRef::Enum(_)).then_some(false)) {
            if let NodeRef::Enum(e) = node {
                self.check(node, &e.name, &CAMEL_CASE, "enum", "CamelCase");
            }
        }
    }

    /// Enum value names should be ALL_CAPS.
    fn lint_enum_fields(&mut self) {
        for node in self.walk(|n| matches!(n, NodeRef::EnumField(_)).then_some(false)) {
            if let NodeRef::EnumField(f) = node {
                self.check(node, &f.name, &UPPER_CASE, "enum field", "ALL_CAPS");
            }
        }
    }

    fn lint_messages(&mut self) {
        for node in self.walk(|n| matches!(n, NodeRef::Message(_)).then_some(true)) {
            if let NodeRef::Message(m) = node {
                self.check(node, &m.name, &CAMEL_CASE, "message", "CamelCase");
            }
        }
    }

    fn lint_message_fields(&mut self) {
        for node in self.walk(|n| matches!(n, NodeRef::MessageField(_)).then_some(false)) {
            if let NodeRef::MessageField(f) = node {
                self.check(node, &f.name, &SNAKE_CASE, "field", "lower_snake_case");
            }
        }
    }

    fn lint_services(&mut self) {
        for node in self.walk(|n| matches!(n, NodeRef::Service(_)).then_some(true)) {
            if let NodeRef::Service(s) = node {
                self.check(node, &s.name, &CAMEL_CASE, "service", "CamelCase");
            }
        }
    }

    fn lint_rpcs(&mut self) {
        for node in self.walk(|n| matches!(n, NodeRef::Rpc(_)).then_some(false)) {
            if let NodeRef::Rpc(r) = node {
                self.check(node, &r.name, &CAMEL_CASE, "rpc", "CamelCase");
            }
        }
    }
}
