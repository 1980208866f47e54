//! Per-unit symbol resolution.
//!
//! The binder is a deliberately small stand-in for a compiler semantic
//! model: it only knows about symbols declared in the same compilation unit
//! (fields, properties, methods, constructor/method parameters, locals,
//! type declarations) plus the unit's using directives. Resolution returns
//! *all* candidate symbols visible at a node; callers apply their own
//! policy when candidates disagree.

use crate::node::{ancestors, normalize};
use crate::usings::{UsingDirective, extract_usings};
use crate::SourceUnit;
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Field,
    Property,
    Method,
    Parameter,
    Local,
    Type,
}

/// One candidate symbol for an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolBinding {
    pub name: String,
    pub kind: SymbolKind,
    /// Declared type (fields, properties, parameters, locals) or return
    /// type (methods), whitespace-free. `None` when unknowable (`var`).
    pub type_name: Option<String>,
}

pub struct Binder<'u> {
    unit: &'u SourceUnit,
    usings: Vec<UsingDirective>,
}

impl<'u> Binder<'u> {
    pub fn new(unit: &'u SourceUnit) -> Self {
        Binder {
            unit,
            usings: extract_usings(unit),
        }
    }

    /// True when a namespace is imported by a plain using directive.
    pub fn imports(&self, namespace: &str) -> bool {
        self.usings
            .iter()
            .any(|u| !u.is_static && u.name == namespace)
    }

    /// All symbols named like `ident` that are visible at `ident`'s
    /// position: enclosing-member parameters and locals, enclosing-class
    /// members, and type declarations anywhere in the unit.
    ///
    /// An empty result means the identifier does not refer to anything
    /// declared in this unit, i.e. it can only be an external type or
    /// namespace name.
    pub fn resolve(&self, ident: Node<'_>) -> Vec<SymbolBinding> {
        let name = self.unit.node_text(ident);
        let mut out = Vec::new();

        for anc in ancestors(ident) {
            match anc.kind() {
                "method_declaration" | "constructor_declaration" | "local_function_statement" => {
                    self.collect_parameters(anc, name, &mut out);
                    self.collect_locals(anc, name, &mut out);
                }
                "class_declaration" | "struct_declaration" | "record_declaration" => {
                    self.collect_members(anc, name, &mut out);
                }
                _ => {}
            }
        }

        self.collect_type_declarations(self.unit.root(), name, &mut out);
        out
    }

    fn collect_parameters(&self, member: Node<'_>, name: &str, out: &mut Vec<SymbolBinding>) {
        let Some(params) = member.child_by_field_name("parameters") else {
            return;
        };
        let mut cursor = params.walk();
        for p in params.named_children(&mut cursor) {
            if p.kind() != "parameter" {
                continue;
            }
            if self.named(p) != Some(name) {
                continue;
            }
            out.push(SymbolBinding {
                name: name.to_string(),
                kind: SymbolKind::Parameter,
                type_name: self.declared_type(p),
            });
        }
    }

    fn collect_locals(&self, member: Node<'_>, name: &str, out: &mut Vec<SymbolBinding>) {
        let Some(body) = member.child_by_field_name("body") else {
            return;
        };
        let mut stack = vec![body];
        while let Some(n) = stack.pop() {
            if n.kind() == "variable_declaration" {
                let ty = self.declared_type(n);
                let mut cursor = n.walk();
                for d in n.named_children(&mut cursor) {
                    if d.kind() == "variable_declarator" && self.named(d) == Some(name) {
                        out.push(SymbolBinding {
                            name: name.to_string(),
                            kind: SymbolKind::Local,
                            type_name: ty.clone().filter(|t| t != "var"),
                        });
                    }
                }
            }
            let mut cursor = n.walk();
            for c in n.children(&mut cursor) {
                stack.push(c);
            }
        }
    }

    fn collect_members(&self, class: Node<'_>, name: &str, out: &mut Vec<SymbolBinding>) {
        let Some(body) = class.child_by_field_name("body") else {
            return;
        };
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "field_declaration" => {
                    let Some(decl) = member
                        .named_children(&mut member.walk())
                        .find(|c| c.kind() == "variable_declaration")
                    else {
                        continue;
                    };
                    let ty = self.declared_type(decl);
                    let mut dc = decl.walk();
                    for d in decl.named_children(&mut dc) {
                        if d.kind() == "variable_declarator" && self.named(d) == Some(name) {
                            out.push(SymbolBinding {
                                name: name.to_string(),
                                kind: SymbolKind::Field,
                                type_name: ty.clone(),
                            });
                        }
                    }
                }
                "property_declaration" => {
                    if self.named(member) == Some(name) {
                        out.push(SymbolBinding {
                            name: name.to_string(),
                            kind: SymbolKind::Property,
                            type_name: self.declared_type(member),
                        });
                    }
                }
                "method_declaration" => {
                    if self.named(member) == Some(name) {
                        out.push(SymbolBinding {
                            name: name.to_string(),
                            kind: SymbolKind::Method,
                            type_name: self.declared_type(member),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_type_declarations(&self, node: Node<'_>, name: &str, out: &mut Vec<SymbolBinding>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "class_declaration"
                | "struct_declaration"
                | "interface_declaration"
                | "enum_declaration"
                | "record_declaration"
                | "delegate_declaration" => {
                    if self.named(child) == Some(name) {
                        out.push(SymbolBinding {
                            name: name.to_string(),
                            kind: SymbolKind::Type,
                            type_name: None,
                        });
                    }
                    if let Some(body) = child.child_by_field_name("body") {
                        self.collect_type_declarations(body, name, out);
                    }
                }
                "namespace_declaration" | "file_scoped_namespace_declaration"
                | "declaration_list" => {
                    self.collect_type_declarations(child, name, out);
                }
                _ => {}
            }
        }
    }

    fn named(&self, node: Node<'_>) -> Option<&str> {
        node.child_by_field_name("name")
            .map(|n| self.unit.node_text(n))
    }

    fn declared_type(&self, node: Node<'_>) -> Option<String> {
        node.child_by_field_name("type")
            .or_else(|| node.child_by_field_name("returns"))
            .map(|t| normalize(self.unit.node_text(t)))
    }
}
