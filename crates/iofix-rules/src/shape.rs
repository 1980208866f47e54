//! Read-only structural reflection over a class declaration.
//!
//! Everything here is recomputed from the tree on each call; shapes are
//! never cached across edits because any edit invalidates them.

use crate::registry::{ABSTRACTION_INTERFACE, ABSTRACTION_NAMESPACE, FIELD_NAME, PARAMETER_NAME};
use iofix_syntax::{SourceUnit, line_indent, normalize};
use std::ops::Range;
use tree_sitter::Node;

/// Structural facts about one class, plus the byte geometry the rewrite
/// synthesizer needs to splice edits in.
#[derive(Debug, Clone)]
pub struct ClassShape {
    pub has_field: bool,
    /// Name of the abstraction-typed field when present.
    pub field_name: Option<String>,
    pub has_constructor: bool,
    pub ctor_has_parameter: bool,
    /// Name of the abstraction-typed constructor parameter when present.
    pub parameter_name: Option<String>,
    pub ctor_assigns_field: bool,

    /// Byte just after the `{` opening the class body.
    pub body_open: Option<usize>,
    /// Byte of the `}` closing the class body.
    pub body_close: Option<usize>,
    pub first_member_start: Option<usize>,
    pub first_method_start: Option<usize>,
    /// Full byte range of the first constructor.
    pub ctor_range: Option<Range<usize>>,
    /// Byte of the `)` closing the constructor parameter list.
    pub ctor_params_close: Option<usize>,
    pub ctor_has_any_parameter: bool,
    /// Byte just after the `{` opening the constructor body (absent for
    /// expression-bodied or bodiless constructors).
    pub ctor_body_open: Option<usize>,
    /// Byte of the `}` closing the constructor body (absent for
    /// expression-bodied or bodiless constructors).
    pub ctor_body_close: Option<usize>,

    pub member_indent: String,
    pub statement_indent: String,
}

/// True when a declared-type text names the injectable abstraction.
pub fn is_abstraction_interface(type_text: &str) -> bool {
    type_text == ABSTRACTION_INTERFACE
        || type_text == format!("{ABSTRACTION_NAMESPACE}.{ABSTRACTION_INTERFACE}")
}

/// Inspect a `class_declaration` (or struct/record) node.
pub fn inspect(unit: &SourceUnit, class: Node<'_>) -> ClassShape {
    let text = unit.text();
    let body = class.child_by_field_name("body");

    let mut shape = ClassShape {
        has_field: false,
        field_name: None,
        has_constructor: false,
        ctor_has_parameter: false,
        parameter_name: None,
        ctor_assigns_field: false,
        body_open: body.map(|b| b.start_byte() + 1),
        body_close: body.map(|b| b.end_byte().saturating_sub(1)),
        first_member_start: None,
        first_method_start: None,
        ctor_range: None,
        ctor_params_close: None,
        ctor_has_any_parameter: false,
        ctor_body_open: None,
        ctor_body_close: None,
        member_indent: String::new(),
        statement_indent: String::new(),
    };

    let Some(body) = body else {
        return shape;
    };

    let mut ctor: Option<Node<'_>> = None;
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        if shape.first_member_start.is_none() && member.is_named() {
            shape.first_member_start = Some(member.start_byte());
        }
        match member.kind() {
            "field_declaration" => {
                if let Some((name, ty)) = field_name_and_type(unit, member) {
                    if is_abstraction_interface(&ty) && !shape.has_field {
                        shape.has_field = true;
                        shape.field_name = Some(name);
                    }
                }
            }
            "constructor_declaration" if ctor.is_none() => {
                ctor = Some(member);
            }
            "method_declaration" if shape.first_method_start.is_none() => {
                shape.first_method_start = Some(member.start_byte());
            }
            _ => {}
        }
    }

    shape.member_indent = match shape.first_member_start {
        Some(at) => line_indent(text, at).to_string(),
        None => format!("{}    ", line_indent(text, class.start_byte())),
    };

    if let Some(ctor) = ctor {
        shape.has_constructor = true;
        shape.ctor_range = Some(ctor.byte_range());
        inspect_constructor(unit, ctor, &mut shape);
    }

    if shape.statement_indent.is_empty() {
        shape.statement_indent = format!("{}    ", shape.member_indent);
    }

    shape
}

fn inspect_constructor(unit: &SourceUnit, ctor: Node<'_>, shape: &mut ClassShape) {
    if let Some(params) = ctor.child_by_field_name("parameters") {
        shape.ctor_params_close = Some(params.end_byte().saturating_sub(1));
        let mut cursor = params.walk();
        for p in params.named_children(&mut cursor) {
            if p.kind() != "parameter" {
                continue;
            }
            shape.ctor_has_any_parameter = true;
            let ty = p
                .child_by_field_name("type")
                .map(|t| normalize(unit.node_text(t)));
            if ty.as_deref().is_some_and(is_abstraction_interface) && shape.parameter_name.is_none()
            {
                shape.ctor_has_parameter = true;
                shape.parameter_name = p
                    .child_by_field_name("name")
                    .map(|n| unit.node_text(n).to_string());
            }
        }
    }

    let Some(body) = ctor.child_by_field_name("body") else {
        return;
    };
    if body.kind() != "block" {
        return;
    }
    shape.ctor_body_open = Some(body.start_byte() + 1);
    shape.ctor_body_close = Some(body.end_byte().saturating_sub(1));

    let field = shape.field_name.clone().unwrap_or_else(|| FIELD_NAME.to_string());
    let parameter = shape
        .parameter_name
        .clone()
        .unwrap_or_else(|| PARAMETER_NAME.to_string());

    let mut cursor = body.walk();
    for stmt in body.named_children(&mut cursor) {
        if shape.statement_indent.is_empty() {
            shape.statement_indent = line_indent(unit.text(), stmt.start_byte()).to_string();
        }
        if stmt.kind() != "expression_statement" {
            continue;
        }
        let Some(expr) = stmt.named_child(0) else {
            continue;
        };
        if expr.kind() != "assignment_expression" {
            continue;
        }
        let left = expr.child_by_field_name("left");
        let right = expr.child_by_field_name("right");
        let left_is_field = left.is_some_and(|l| normalize(unit.node_text(l)) == field);
        // Heuristic, not dataflow: the right side just has to mention the
        // parameter (or construct the implementation directly).
        let right_mentions = right.is_some_and(|r| {
            let t = unit.node_text(r);
            t.contains(&parameter) || t.contains(crate::registry::ABSTRACTION_CLASS)
        });
        if left_is_field && right_mentions {
            shape.ctor_assigns_field = true;
        }
    }
}

fn field_name_and_type(unit: &SourceUnit, field: Node<'_>) -> Option<(String, String)> {
    let mut cursor = field.walk();
    let decl = field
        .named_children(&mut cursor)
        .find(|c| c.kind() == "variable_declaration")?;
    let ty = decl
        .child_by_field_name("type")
        .map(|t| normalize(unit.node_text(t)))?;
    let mut dc = decl.walk();
    let declarator = decl
        .named_children(&mut dc)
        .find(|c| c.kind() == "variable_declarator")?;
    let name = declarator
        .child_by_field_name("name")
        .map(|n| unit.node_text(n).to_string())?;
    Some((name, ty))
}
