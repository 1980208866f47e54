//! Grammar handle and parsed source units.

use tree_sitter::{Node, Parser, Tree};

/// The C# grammar, statically linked.
pub fn language() -> tree_sitter::Language {
    tree_sitter_c_sharp::LANGUAGE.into()
}

/// Errors from constructing a [`SourceUnit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser (version mismatch).
    Grammar,
    /// The parser produced no tree (cancellation or internal failure).
    Unparseable,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Grammar => write!(f, "C# grammar incompatible with tree-sitter runtime"),
            ParseError::Unparseable => write!(f, "parser produced no syntax tree"),
        }
    }
}

impl std::error::Error for ParseError {}

/// One parsed compilation unit: immutable source text plus its tree.
///
/// Edits never mutate a `SourceUnit`; the rewrite layer produces a new text
/// and calls [`SourceUnit::parse`] again.
pub struct SourceUnit {
    text: String,
    tree: Tree,
}

impl SourceUnit {
    pub fn parse(text: impl Into<String>) -> Result<Self, ParseError> {
        let text = text.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language())
            .map_err(|_| ParseError::Grammar)?;
        let tree = parser.parse(&text, None).ok_or(ParseError::Unparseable)?;
        Ok(SourceUnit { text, tree })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text of a node.
    pub fn node_text(&self, node: Node<'_>) -> &str {
        &self.text[node.byte_range()]
    }
}
