//! Node helpers shared by the matcher and the rewrite synthesizer.

use tree_sitter::Node;

/// Walk from a node to the root through parent pointers.
pub fn ancestors<'a>(node: Node<'a>) -> impl Iterator<Item = Node<'a>> {
    std::iter::successors(node.parent(), |n| n.parent())
}

/// The class (or struct/record) declaration enclosing a node, if any.
pub fn enclosing_class<'a>(node: Node<'a>) -> Option<Node<'a>> {
    ancestors(node).find(|n| {
        matches!(
            n.kind(),
            "class_declaration" | "struct_declaration" | "record_declaration"
        )
    })
}

/// Canonical, whitespace-free text form of a short expression or type name.
///
/// Used for prefix and equality matching only; never applied to text that
/// may contain string literals.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// The leftmost identifier of a (possibly chained) member access or
/// qualified name, e.g. `_fileSystem` in `_fileSystem.Path.Combine`.
pub fn leftmost_identifier<'a>(mut node: Node<'a>) -> Option<Node<'a>> {
    loop {
        match node.kind() {
            "identifier" => return Some(node),
            "member_access_expression" => {
                node = node.child_by_field_name("expression")?;
            }
            "qualified_name" => {
                node = node.child_by_field_name("qualifier")?;
            }
            _ => return None,
        }
    }
}

/// Leading whitespace of the line a byte offset sits on.
pub fn line_indent(text: &str, at: usize) -> &str {
    let line_start = text[..at].rfind('\n').map_or(0, |p| p + 1);
    let rest = &text[line_start..];
    let indent_len = rest
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map_or(rest.len(), |(i, _)| i);
    &rest[..indent_len]
}
