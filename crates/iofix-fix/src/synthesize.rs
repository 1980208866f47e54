//! The rewrite synthesizer: from a matched site to an [`EditSet`].
//!
//! Each step is conditional on the class shape, so re-running the
//! synthesizer over already-fixed output records nothing and the fix is a
//! no-op. Malformed targets (missing body, missing argument list) skip the
//! affected step instead of failing.

use crate::edits::EditSet;
use iofix_rules::{
    ABSTRACTION_CLASS, ABSTRACTION_INTERFACE, ABSTRACTION_NAMESPACE, ClassShape, FIELD_NAME,
    IO_NAMESPACE, PARAMETER_NAME, RuleKind, SiteKind, SiteMatch, inspect,
};
use iofix_syntax::{SourceUnit, enclosing_class, extract_usings, line_indent};
use tree_sitter::Node;

/// How the injected field gets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InjectionMode {
    /// Constructor parameter: `public C(IFileSystem fileSystem)`.
    #[default]
    Parameter,
    /// Direct construction: `_fileSystem = new FileSystem();`.
    AutoConstruct,
}

/// Build the edits fixing one site, or `None` when the rule is
/// diagnostic-only or nothing is left to change.
pub fn synthesize(unit: &SourceUnit, site: &SiteMatch<'_>, mode: InjectionMode) -> Option<EditSet> {
    match (site.kind, site.binding.kind) {
        (SiteKind::ClassDeclaration, RuleKind::ConstructorInjection) => {
            wire_class(unit, enclosing_class(site.node)?, mode)
        }
        (SiteKind::Invocation, RuleKind::StaticCall) => {
            let function = site.node.child_by_field_name("function")?;
            let receiver = function.child_by_field_name("expression")?;
            let field = enclosing_field_name(unit, site.node);
            let mut edits = EditSet::new();
            edits.replace(
                receiver.byte_range(),
                format!("{field}.{}", site.binding.abstraction_member),
            );
            Some(edits)
        }
        (SiteKind::Construction, RuleKind::Construction { factory: Some(factory) }) => {
            let field = enclosing_field_name(unit, site.node);
            let args = site
                .node
                .child_by_field_name("arguments")
                .map(|a| unit.node_text(a).to_string())
                .unwrap_or_else(|| "()".to_string());
            let mut edits = EditSet::new();
            edits.replace(
                site.node.byte_range(),
                format!("{field}.{}.{factory}{args}", site.binding.abstraction_member),
            );
            Some(edits)
        }
        _ => None,
    }
}

/// Insert the abstraction field, constructor wiring and using directive
/// into an unwired class.
fn wire_class(unit: &SourceUnit, class: Node<'_>, mode: InjectionMode) -> Option<EditSet> {
    let shape = inspect(unit, class);
    let body_open = shape.body_open?;
    let body_close = shape.body_close?;

    let field = shape
        .field_name
        .clone()
        .unwrap_or_else(|| FIELD_NAME.to_string());
    let parameter = shape
        .parameter_name
        .clone()
        .unwrap_or_else(|| PARAMETER_NAME.to_string());
    let assignment = match mode {
        InjectionMode::Parameter => format!("{field} = {parameter};"),
        InjectionMode::AutoConstruct => format!("{field} = new {ABSTRACTION_CLASS}();"),
    };

    // A constructor without a block body (expression-bodied) cannot carry
    // the assignment statement, so the class cannot be wired at all; leave
    // it alone rather than emit half a fix.
    if shape.has_constructor && !shape.ctor_assigns_field && shape.ctor_body_close.is_none() {
        return None;
    }

    let mut edits = EditSet::new();

    if !shape.has_field {
        edits.insert(
            body_open,
            format!(
                "\n{0}private readonly {ABSTRACTION_INTERFACE} {field};\n",
                shape.member_indent
            ),
        );
    }

    if shape.has_constructor {
        if mode == InjectionMode::Parameter && !shape.ctor_has_parameter {
            if let Some(close) = shape.ctor_params_close {
                let sep = if shape.ctor_has_any_parameter { ", " } else { "" };
                edits.insert(close, format!("{sep}{ABSTRACTION_INTERFACE} {parameter}"));
            }
        }
        if !shape.ctor_assigns_field {
            if let (Some(open), Some(close)) = (shape.ctor_body_open, shape.ctor_body_close) {
                if unit.text()[open..close].contains('\n') {
                    // Closing brace on its own line: insert above it.
                    let at = close - line_indent(unit.text(), close).len();
                    edits.insert(at, format!("{}{assignment}\n", shape.statement_indent));
                } else {
                    // Single-line body: break it open across lines.
                    edits.insert(
                        close,
                        format!(
                            "\n{}{assignment}\n{}",
                            shape.statement_indent, shape.member_indent
                        ),
                    );
                }
            }
        }
    } else {
        let name = unit.node_text(class.child_by_field_name("name")?);
        let params = match mode {
            InjectionMode::Parameter => format!("{ABSTRACTION_INTERFACE} {parameter}"),
            InjectionMode::AutoConstruct => String::new(),
        };
        let indent = &shape.member_indent;
        let stmt_indent = &shape.statement_indent;
        let skeleton = format!(
            "public {name}({params})\n{indent}{{\n{stmt_indent}{assignment}\n{indent}}}\n"
        );
        match shape.first_method_start {
            Some(at) => edits.insert(at, format!("{skeleton}\n{indent}")),
            None => edits.insert(body_close, format!("\n{indent}{skeleton}")),
        }
    }

    wire_using(unit, &mut edits);

    if edits.is_empty() { None } else { Some(edits) }
}

/// Ensure exactly one `using System.IO.Abstractions;`. Replaces
/// `using System.IO;` in place when present, otherwise inserts before the
/// first using, otherwise becomes the sole using at the top of the unit.
fn wire_using(unit: &SourceUnit, edits: &mut EditSet) {
    let usings = extract_usings(unit);
    if usings
        .iter()
        .any(|u| !u.is_static && u.name == ABSTRACTION_NAMESPACE)
    {
        return;
    }
    if let Some(io) = usings.iter().find(|u| !u.is_static && u.name == IO_NAMESPACE) {
        edits.replace(io.range.clone(), format!("using {ABSTRACTION_NAMESPACE};"));
    } else if let Some(first) = usings.first() {
        edits.insert(first.range.start, format!("using {ABSTRACTION_NAMESPACE};\n"));
    } else {
        edits.insert(0, format!("using {ABSTRACTION_NAMESPACE};\n\n"));
    }
}

/// Name of the abstraction field in the class enclosing a site, falling
/// back to the canonical name when the class is not wired yet.
fn enclosing_field_name(unit: &SourceUnit, node: Node<'_>) -> String {
    enclosing_class(node)
        .map(|class| inspect(unit, class))
        .and_then(|shape: ClassShape| shape.field_name)
        .unwrap_or_else(|| FIELD_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iofix_rules::{FileSystemContext, MatchStrategy, match_unit};

    fn apply_first(source: &str, rule_id: &str, mode: InjectionMode) -> Option<String> {
        let unit = SourceUnit::parse(source).unwrap();
        let ctx = FileSystemContext::assume_referenced();
        let mut sites = match_unit(&unit, &ctx, MatchStrategy::Semantic);
        sites.sort_by_key(|s| s.node.start_byte());
        let site = sites
            .iter()
            .find(|s| s.binding.diagnostic_id == rule_id)?;
        let edits = synthesize(&unit, site, mode)?;
        Some(edits.apply(unit.text()).unwrap())
    }

    #[test]
    fn wires_a_bare_class() {
        let source = "using System.IO;\n\nclass Service\n{\n    void M()\n    {\n        File.ReadAllText(\"a\");\n    }\n}\n";
        let fixed = apply_first(source, "IO0001", InjectionMode::Parameter).unwrap();
        assert!(fixed.contains("using System.IO.Abstractions;"));
        assert!(!fixed.contains("using System.IO;"));
        assert!(fixed.contains("private readonly IFileSystem _fileSystem;"));
        assert!(fixed.contains("public Service(IFileSystem fileSystem)"));
        assert!(fixed.contains("_fileSystem = fileSystem;"));
        // The call itself is a separate fix.
        assert!(fixed.contains("File.ReadAllText(\"a\")"));
    }

    #[test]
    fn existing_constructor_is_extended_not_replaced() {
        let source = "using System.IO;\n\nclass Service\n{\n    private readonly string _root;\n\n    public Service(string root)\n    {\n        _root = root;\n    }\n}\n";
        let fixed = apply_first(source, "IO0001", InjectionMode::Parameter).unwrap();
        assert!(fixed.contains("public Service(string root, IFileSystem fileSystem)"));
        assert!(fixed.contains("_root = root;"));
        assert!(fixed.contains("_fileSystem = fileSystem;"));
        assert_eq!(fixed.matches("public Service(").count(), 1);
    }

    #[test]
    fn auto_construct_mode_skips_the_parameter() {
        let source = "using System.IO;\n\nclass Service\n{\n}\n";
        let fixed = apply_first(source, "IO0001", InjectionMode::AutoConstruct).unwrap();
        assert!(fixed.contains("public Service()"));
        assert!(fixed.contains("_fileSystem = new FileSystem();"));
    }

    #[test]
    fn static_call_gets_field_prefix() {
        let source = "using System.IO;\n\nclass C\n{\n    void M()\n    {\n        Path.Combine(\"a\", \"b\");\n    }\n}\n";
        let fixed = apply_first(source, "IO0006", InjectionMode::Parameter).unwrap();
        assert!(fixed.contains("_fileSystem.Path.Combine(\"a\", \"b\")"));
    }

    #[test]
    fn qualified_receiver_collapses_to_the_abstraction_member() {
        let source = "class C\n{\n    void M()\n    {\n        System.IO.Path.Combine(\"a\", \"b\");\n    }\n}\n";
        let fixed = apply_first(source, "IO0006", InjectionMode::Parameter).unwrap();
        assert!(fixed.contains("_fileSystem.Path.Combine(\"a\", \"b\")"));
        assert!(!fixed.contains("System.IO.Path"));
    }

    #[test]
    fn creation_rewrites_through_factory() {
        let source = "using System.IO;\n\nclass C\n{\n    void M()\n    {\n        var f = new FileInfo(\"a.txt\");\n    }\n}\n";
        let fixed = apply_first(source, "IO0004", InjectionMode::Parameter).unwrap();
        assert!(fixed.contains("var f = _fileSystem.FileInfo.FromFileName(\"a.txt\");"));
    }

    #[test]
    fn rewrites_use_the_existing_field_name() {
        let source = "using System.IO;\nusing System.IO.Abstractions;\n\nclass C\n{\n    private readonly IFileSystem _fs;\n\n    public C(IFileSystem fs)\n    {\n        _fs = fs;\n    }\n\n    void M()\n    {\n        Directory.CreateDirectory(\"d\");\n    }\n}\n";
        let fixed = apply_first(source, "IO0003", InjectionMode::Parameter).unwrap();
        assert!(fixed.contains("_fs.Directory.CreateDirectory(\"d\")"));
    }

    #[test]
    fn single_line_constructor_body_is_broken_open() {
        let source = "using System.IO;\n\nclass Service\n{\n    public Service() { }\n\n    void M()\n    {\n        File.Delete(\"f\");\n    }\n}\n";
        let fixed = apply_first(source, "IO0001", InjectionMode::Parameter).unwrap();
        assert!(fixed.contains("public Service(IFileSystem fileSystem) {"));
        assert!(fixed.contains("\n        _fileSystem = fileSystem;\n    }"));
        let reparsed = SourceUnit::parse(fixed).unwrap();
        assert!(!reparsed.root().has_error());
    }

    #[test]
    fn expression_bodied_constructor_gets_no_action() {
        let source = "using System.IO;\n\nclass Counter\n{\n    private int _count;\n\n    public Counter() => _count = 0;\n}\n";
        assert!(apply_first(source, "IO0001", InjectionMode::Parameter).is_none());
    }

    #[test]
    fn diagnostic_only_rules_have_no_action() {
        let source = "using System.IO;\n\nclass C\n{\n    void M()\n    {\n        var w = new FileSystemWatcher(\"d\");\n        var r = new StreamReader(\"f.txt\");\n    }\n}\n";
        assert!(apply_first(source, "IO0009", InjectionMode::Parameter).is_none());
        assert!(apply_first(source, "IO0011", InjectionMode::Parameter).is_none());
    }
}
