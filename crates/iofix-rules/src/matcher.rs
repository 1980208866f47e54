//! The site matcher: walks one compilation unit and classifies violation
//! sites against the registry.

use crate::context::FileSystemContext;
use crate::diagnostics::{self, Diagnostic, report};
use crate::registry::{ABSTRACTION_NAMESPACE, RuleKind, TypeBinding, builtin};
use crate::shape;
use iofix_syntax::{Binder, SourceUnit, SymbolKind, leftmost_identifier, normalize};
use std::sync::OnceLock;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

/// Which matching strategy to run.
///
/// The semantic strategy is authoritative: it resolves receivers and
/// constructed types through the binder and never fires on same-named local
/// declarations. The syntactic strategy is the degraded textual form kept
/// for sources where binding is unreliable; its prefix comparison is
/// case-sensitive ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    Syntactic,
    #[default]
    Semantic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    Invocation,
    Construction,
    ClassDeclaration,
}

/// A matched violation site. Borrowed from one parse; never persisted.
#[derive(Debug, Clone, Copy)]
pub struct SiteMatch<'a> {
    pub node: Node<'a>,
    pub kind: SiteKind,
    pub binding: &'static TypeBinding,
}

const SITE_QUERY: &str = "\
(invocation_expression) @site
(object_creation_expression) @site
(class_declaration) @site";

fn site_query() -> &'static Query {
    static QUERY: OnceLock<Query> = OnceLock::new();
    QUERY.get_or_init(|| {
        Query::new(&iofix_syntax::language(), SITE_QUERY).expect("site query must compile")
    })
}

/// Find every violation site in the unit. Returns sites in query order;
/// use [`analyze`] for position-sorted diagnostics.
pub fn match_unit<'a>(
    unit: &'a SourceUnit,
    ctx: &FileSystemContext,
    strategy: MatchStrategy,
) -> Vec<SiteMatch<'a>> {
    if !ctx.has_reference() {
        return Vec::new();
    }

    let binder = Binder::new(unit);
    let mut sites = Vec::new();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(site_query(), unit.root(), unit.text().as_bytes());
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let node = capture.node;
            match node.kind() {
                "invocation_expression" => {
                    if let Some(binding) = match_invocation(unit, &binder, node, strategy) {
                        sites.push(SiteMatch {
                            node,
                            kind: SiteKind::Invocation,
                            binding,
                        });
                    }
                }
                "object_creation_expression" => {
                    if let Some(binding) = match_creation(unit, &binder, node, strategy) {
                        sites.push(SiteMatch {
                            node,
                            kind: SiteKind::Construction,
                            binding,
                        });
                    }
                }
                "class_declaration" => {
                    if let Some(site) = match_class(unit, &binder, node) {
                        sites.push(site);
                    }
                }
                _ => {}
            }
        }
    }

    sites
}

/// Match the unit and report ordered diagnostics.
pub fn analyze(
    unit: &SourceUnit,
    ctx: &FileSystemContext,
    strategy: MatchStrategy,
) -> Vec<Diagnostic> {
    let mut diags: Vec<Diagnostic> = match_unit(unit, ctx, strategy)
        .iter()
        .map(|site| report(site, site.binding))
        .collect();
    diagnostics::sort(&mut diags);
    diags
}

fn match_invocation<'a>(
    unit: &SourceUnit,
    binder: &Binder<'_>,
    node: Node<'a>,
    strategy: MatchStrategy,
) -> Option<&'static TypeBinding> {
    let function = node.child_by_field_name("function")?;
    if function.kind() != "member_access_expression" {
        return None;
    }
    let receiver = function.child_by_field_name("expression")?;
    let receiver_text = normalize(unit.node_text(receiver));
    let function_text = normalize(unit.node_text(function));

    for binding in builtin() {
        if binding.kind != RuleKind::StaticCall {
            continue;
        }
        let hit = match strategy {
            MatchStrategy::Syntactic => {
                function_text.starts_with(&format!("{}.", binding.real_type))
            }
            MatchStrategy::Semantic => {
                receiver_text == binding.real_type
                    || receiver_text == binding.qualified_real_type()
            }
        };
        if !hit {
            continue;
        }
        if let Some(ident) = leftmost_identifier(receiver) {
            let candidates = binder.resolve(ident);
            if !candidates.is_empty() {
                if all_via_abstraction(binder, &candidates) {
                    continue;
                }
                // Any same-named declaration in this unit (type, member,
                // parameter or local) shadows the simple type name, so the
                // receiver cannot be the real static type.
                if strategy == MatchStrategy::Semantic {
                    continue;
                }
            }
        }
        return Some(binding);
    }
    None
}

fn match_creation<'a>(
    unit: &SourceUnit,
    binder: &Binder<'_>,
    node: Node<'a>,
    strategy: MatchStrategy,
) -> Option<&'static TypeBinding> {
    let ty = node.child_by_field_name("type")?;
    let type_text = normalize(unit.node_text(ty));

    for binding in builtin() {
        let constructs = match binding.kind {
            RuleKind::Construction { .. } | RuleKind::StringPathConstructor => {
                match strategy {
                    MatchStrategy::Syntactic => type_text == binding.real_type,
                    MatchStrategy::Semantic => {
                        type_text == binding.qualified_real_type()
                            || (type_text == binding.real_type && !type_shadowed(binder, ty))
                    }
                }
            }
            _ => false,
        };
        if !constructs {
            continue;
        }
        if binding.kind == RuleKind::StringPathConstructor
            && !first_argument_is_string(unit, binder, node)
        {
            continue;
        }
        return Some(binding);
    }
    None
}

fn match_class<'a>(
    unit: &SourceUnit,
    binder: &Binder<'_>,
    class: Node<'a>,
) -> Option<SiteMatch<'a>> {
    let binding = builtin()
        .iter()
        .find(|b| b.kind == RuleKind::ConstructorInjection)?;
    if !binder.imports(crate::registry::IO_NAMESPACE) {
        return None;
    }
    let shape = shape::inspect(unit, class);
    if shape.has_field && shape.has_constructor && shape.ctor_assigns_field {
        return None;
    }
    // Report at the class name, like the rest of the tooling expects.
    let name = class.child_by_field_name("name").unwrap_or(class);
    Some(SiteMatch {
        node: name,
        kind: SiteKind::ClassDeclaration,
        binding,
    })
}

/// Exclusion check: every candidate symbol is a field, property or method
/// whose declared/return type lives under the abstraction namespace. With
/// ambiguous candidates anything else keeps the site reportable.
fn all_via_abstraction(binder: &Binder<'_>, candidates: &[iofix_syntax::SymbolBinding]) -> bool {
    candidates.iter().all(|c| {
        matches!(
            c.kind,
            SymbolKind::Field | SymbolKind::Property | SymbolKind::Method
        ) && c
            .type_name
            .as_deref()
            .is_some_and(|t| type_in_abstraction_namespace(binder, t))
    })
}

/// Whether a declared-type text resolves under `System.IO.Abstractions`.
fn type_in_abstraction_namespace(binder: &Binder<'_>, type_text: &str) -> bool {
    if type_text.starts_with(&format!("{ABSTRACTION_NAMESPACE}.")) {
        return true;
    }
    if !binder.imports(ABSTRACTION_NAMESPACE) {
        return false;
    }
    // Simple names: the abstraction surface is the I-prefixed interface
    // family (IFileSystem, IFile, IPath, IFileInfoFactory, ...).
    type_text == crate::registry::ABSTRACTION_INTERFACE
        || (type_text.starts_with('I')
            && (builtin().iter().any(|b| type_text[1..] == *b.real_type)
                || type_text.ends_with("Factory")))
}

fn type_shadowed(binder: &Binder<'_>, ty: Node<'_>) -> bool {
    if ty.kind() != "identifier" {
        return false;
    }
    binder
        .resolve(ty)
        .iter()
        .any(|c| c.kind == SymbolKind::Type)
}

fn first_argument_is_string(unit: &SourceUnit, binder: &Binder<'_>, creation: Node<'_>) -> bool {
    let Some(args) = creation.child_by_field_name("arguments") else {
        return false;
    };
    let mut cursor = args.walk();
    let Some(first) = args.named_children(&mut cursor).find(|c| c.kind() == "argument") else {
        return false;
    };
    let Some(expr) = first.named_child(0) else {
        return false;
    };
    match expr.kind() {
        "string_literal"
        | "verbatim_string_literal"
        | "raw_string_literal"
        | "interpolated_string_expression" => true,
        "identifier" => {
            let candidates = binder.resolve(expr);
            !candidates.is_empty()
                && candidates.iter().all(|c| {
                    matches!(
                        c.type_name.as_deref(),
                        Some("string") | Some("String") | Some("System.String")
                    )
                })
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    fn diagnostics_for(source: &str) -> Vec<Diagnostic> {
        let unit = SourceUnit::parse(source).unwrap();
        analyze(&unit, &FileSystemContext::assume_referenced(), MatchStrategy::Semantic)
    }

    fn ids(diags: &[Diagnostic]) -> Vec<&str> {
        diags.iter().map(|d| d.rule_id.as_str()).collect()
    }

    #[test]
    fn empty_source_reports_nothing() {
        assert!(diagnostics_for("").is_empty());
    }

    #[test]
    fn source_without_io_types_reports_nothing() {
        let diags = diagnostics_for("class C { void M() { Helper.Run(\"x\"); } }");
        assert!(diags.is_empty());
    }

    #[test]
    fn single_path_combine_reports_io0006_at_call() {
        let source = "using System.IO;\n\nclass C\n{\n    void M()\n    {\n        var p = Path.Combine(\"a\", \"b\");\n    }\n}\n";
        let diags = diagnostics_for(source);
        // IO0001 fires on the unwired class as well.
        assert_eq!(ids(&diags), ["IO0001", "IO0006"]);
        let path = &diags[1];
        assert_eq!(path.location.line, 7);
        assert_eq!(path.location.column, 17);
        assert_eq!(path.severity, Severity::Warning);
    }

    #[test]
    fn file_and_directory_static_calls() {
        let source = "using System.IO;\n\nclass C\n{\n    void M()\n    {\n        File.ReadAllText(\"a\");\n        Directory.CreateDirectory(\"b\");\n    }\n}\n";
        let diags = diagnostics_for(source);
        assert_eq!(ids(&diags), ["IO0001", "IO0002", "IO0003"]);
    }

    #[test]
    fn call_through_abstraction_field_is_excluded() {
        let source = "using System.IO.Abstractions;\n\nclass C\n{\n    private readonly IFileSystem _fileSystem;\n\n    public C(IFileSystem fileSystem)\n    {\n        _fileSystem = fileSystem;\n    }\n\n    void M()\n    {\n        _fileSystem.Path.Combine(\"a\", \"b\");\n    }\n}\n";
        assert!(diagnostics_for(source).is_empty());
    }

    #[test]
    fn wrapper_property_typed_in_abstraction_is_excluded() {
        let source = "using System.IO.Abstractions;\n\nclass C\n{\n    private IPath Path { get; set; }\n\n    void M()\n    {\n        Path.Combine(\"a\", \"b\");\n    }\n}\n";
        assert!(diagnostics_for(source).is_empty());
    }

    #[test]
    fn local_type_named_path_never_matches_semantically() {
        let source = "class Path\n{\n    public static string Combine(string a) => a;\n}\n\nclass C\n{\n    void M()\n    {\n        Path.Combine(\"a\");\n    }\n}\n";
        assert!(diagnostics_for(source).is_empty());
    }

    #[test]
    fn parameter_named_like_the_type_shadows_it() {
        let source = "class C\n{\n    void M(string Path)\n    {\n        var t = Path.Trim();\n    }\n}\n";
        assert!(diagnostics_for(source).is_empty());
    }

    #[test]
    fn local_named_like_the_type_shadows_it() {
        let source = "class C\n{\n    void M()\n    {\n        var File = Open();\n        File.Close();\n    }\n}\n";
        assert!(diagnostics_for(source).is_empty());
    }

    #[test]
    fn syntactic_strategy_still_matches_shadowed_name() {
        // Documented difference: the textual strategy cannot see the local
        // declaration.
        let source = "class Path\n{\n    public static string Combine(string a) => a;\n}\n\nclass C\n{\n    void M()\n    {\n        Path.Combine(\"a\");\n    }\n}\n";
        let unit = SourceUnit::parse(source).unwrap();
        let diags = analyze(
            &unit,
            &FileSystemContext::assume_referenced(),
            MatchStrategy::Syntactic,
        );
        assert_eq!(ids(&diags), ["IO0006"]);
    }

    #[test]
    fn object_creations_match_their_rules() {
        let source = "using System.IO;\n\nclass C\n{\n    void M()\n    {\n        var f = new FileInfo(\"a.txt\");\n        var d = new DirectoryInfo(\"dir\");\n        var s = new FileStream(\"a.txt\", FileMode.Open);\n        var w = new FileSystemWatcher(\"dir\");\n    }\n}\n";
        let diags = diagnostics_for(source);
        assert_eq!(ids(&diags), ["IO0001", "IO0004", "IO0007", "IO0005", "IO0009"]);
    }

    #[test]
    fn stream_reader_string_ctor_matches_io0011() {
        let source = "using System.IO;\n\nclass C\n{\n    void M()\n    {\n        var r = new StreamReader(\"file.txt\");\n    }\n}\n";
        let diags = diagnostics_for(source);
        assert!(ids(&diags).contains(&"IO0011"));
    }

    #[test]
    fn stream_reader_stream_ctor_does_not_match() {
        let source = "using System.IO;\n\nclass C\n{\n    void M(Stream stream)\n    {\n        var r = new StreamReader(stream);\n    }\n}\n";
        let diags = diagnostics_for(source);
        assert!(!ids(&diags).contains(&"IO0011"));
    }

    #[test]
    fn stream_writer_local_string_variable_matches_io0010() {
        let source = "using System.IO;\n\nclass C\n{\n    void M()\n    {\n        string path = \"file.txt\";\n        var w = new StreamWriter(path);\n    }\n}\n";
        let diags = diagnostics_for(source);
        assert!(ids(&diags).contains(&"IO0010"));
    }

    #[test]
    fn wired_class_does_not_fire_io0001() {
        let source = "using System.IO;\nusing System.IO.Abstractions;\n\nclass C\n{\n    private readonly IFileSystem _fileSystem;\n\n    public C(IFileSystem fileSystem)\n    {\n        _fileSystem = fileSystem;\n    }\n}\n";
        let diags = diagnostics_for(source);
        assert!(!ids(&diags).contains(&"IO0001"));
    }

    #[test]
    fn no_reference_short_circuits_everything() {
        let source = "using System.IO;\n\nclass C\n{\n    void M()\n    {\n        File.ReadAllText(\"a\");\n    }\n}\n";
        let unit = SourceUnit::parse(source).unwrap();
        let ctx = FileSystemContext::new::<&str>(&[]);
        assert!(analyze(&unit, &ctx, MatchStrategy::Semantic).is_empty());
    }

    #[test]
    fn qualified_call_matches_semantically() {
        let source = "class C\n{\n    void M()\n    {\n        System.IO.File.ReadAllText(\"a\");\n    }\n}\n";
        let diags = diagnostics_for(source);
        assert_eq!(ids(&diags), ["IO0002"]);
    }

    #[test]
    fn diagnostics_are_ordered_by_position() {
        let source = "using System.IO;\n\nclass C\n{\n    void M()\n    {\n        Directory.CreateDirectory(\"b\");\n        File.ReadAllText(\"a\");\n    }\n}\n";
        let diags = diagnostics_for(source);
        assert_eq!(ids(&diags), ["IO0001", "IO0003", "IO0002"]);
    }
}
