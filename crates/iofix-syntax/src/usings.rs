//! Using-directive extraction.

use crate::{SourceUnit, normalize};
use std::ops::Range;
use tree_sitter::Node;

/// One `using` directive, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    /// Imported namespace (or type, for `using static`), whitespace-free.
    pub name: String,
    pub is_static: bool,
    /// Byte range of the whole directive including the trailing semicolon.
    pub range: Range<usize>,
    /// 1-based source line.
    pub line: usize,
}

/// Collect every using directive in the unit, including those nested inside
/// namespace declarations, in source order.
pub fn extract_usings(unit: &SourceUnit) -> Vec<UsingDirective> {
    let mut out = Vec::new();
    collect(unit, unit.root(), &mut out);
    out
}

fn collect(unit: &SourceUnit, node: Node<'_>, out: &mut Vec<UsingDirective>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "using_directive" => {
                if let Some(directive) = extract_one(unit, child) {
                    out.push(directive);
                }
            }
            "namespace_declaration" | "file_scoped_namespace_declaration" | "declaration_list" => {
                collect(unit, child, out);
            }
            _ => {}
        }
    }
}

fn extract_one(unit: &SourceUnit, node: Node<'_>) -> Option<UsingDirective> {
    let text = unit.node_text(node);
    let is_static = text.contains("static ");

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "qualified_name" || child.kind() == "identifier" {
            return Some(UsingDirective {
                name: normalize(unit.node_text(child)),
                is_static,
                range: node.byte_range(),
                line: node.start_position().row + 1,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_names_in_order() {
        let unit = SourceUnit::parse("using System;\nusing System.IO;\n\nclass C { }").unwrap();
        let usings = extract_usings(&unit);
        let names: Vec<&str> = usings.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["System", "System.IO"]);
        assert_eq!(usings[1].line, 2);
    }

    #[test]
    fn finds_usings_inside_namespace() {
        let source = "namespace App\n{\n    using System.IO;\n\n    class C { }\n}\n";
        let unit = SourceUnit::parse(source).unwrap();
        let usings = extract_usings(&unit);
        assert_eq!(usings.len(), 1);
        assert_eq!(usings[0].name, "System.IO");
    }

    #[test]
    fn static_using_flagged() {
        let unit = SourceUnit::parse("using static System.IO.Path;\nclass C { }").unwrap();
        let usings = extract_usings(&unit);
        assert!(usings[0].is_static);
    }
}
