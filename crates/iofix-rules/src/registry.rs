//! The type registry: one immutable table of rule bindings.

/// Namespace of the injectable abstraction.
pub const ABSTRACTION_NAMESPACE: &str = "System.IO.Abstractions";

/// Interface injected into consumer classes.
pub const ABSTRACTION_INTERFACE: &str = "IFileSystem";

/// Concrete implementation used by the auto-construct fix variant.
pub const ABSTRACTION_CLASS: &str = "FileSystem";

/// Field name inserted by the rewrite synthesizer.
pub const FIELD_NAME: &str = "_fileSystem";

/// Constructor parameter name inserted by the rewrite synthesizer.
pub const PARAMETER_NAME: &str = "fileSystem";

/// Namespace of the real, unabstracted I/O types.
pub const IO_NAMESPACE: &str = "System.IO";

/// How a binding matches sites and what rewrite it supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Static-method invocation on the real type (`File.ReadAllText(..)`).
    /// Fix: route through the abstraction field.
    StaticCall,
    /// Object creation of the real type (`new FileInfo(..)`). Fix: replace
    /// with the named factory call when one exists.
    Construction { factory: Option<&'static str> },
    /// Object creation whose first argument is a string path
    /// (`new StreamReader("file")`). Diagnostic only.
    StringPathConstructor,
    /// Class-level wiring check: a class using `System.IO` without the
    /// injected abstraction field/constructor assignment.
    ConstructorInjection,
}

/// One registered rule: the real type, its abstraction counterpart and the
/// diagnostic metadata. Immutable; registered once at startup.
#[derive(Debug, Clone, Copy)]
pub struct TypeBinding {
    pub diagnostic_id: &'static str,
    /// Simple name of the real type (empty for the class-level rule).
    pub real_type: &'static str,
    pub real_namespace: &'static str,
    /// Member of `IFileSystem` standing in for the real type.
    pub abstraction_member: &'static str,
    pub message: &'static str,
    pub category: &'static str,
    pub kind: RuleKind,
}

impl TypeBinding {
    /// `Namespace.Type` of the real type.
    pub fn qualified_real_type(&self) -> String {
        format!("{}.{}", self.real_namespace, self.real_type)
    }
}

static BINDINGS: &[TypeBinding] = &[
    TypeBinding {
        diagnostic_id: "IO0001",
        real_type: "",
        real_namespace: IO_NAMESPACE,
        abstraction_member: "",
        message: "Use System.IO.Abstractions for improved application testability",
        category: ABSTRACTION_NAMESPACE,
        kind: RuleKind::ConstructorInjection,
    },
    TypeBinding {
        diagnostic_id: "IO0002",
        real_type: "File",
        real_namespace: IO_NAMESPACE,
        abstraction_member: "File",
        message: "Replace File class with IFileSystem.File for improved testability",
        category: ABSTRACTION_NAMESPACE,
        kind: RuleKind::StaticCall,
    },
    TypeBinding {
        diagnostic_id: "IO0003",
        real_type: "Directory",
        real_namespace: IO_NAMESPACE,
        abstraction_member: "Directory",
        message: "Replace Directory class with IFileSystem.Directory for improved testability",
        category: ABSTRACTION_NAMESPACE,
        kind: RuleKind::StaticCall,
    },
    TypeBinding {
        diagnostic_id: "IO0004",
        real_type: "FileInfo",
        real_namespace: IO_NAMESPACE,
        abstraction_member: "FileInfo",
        message: "Replace FileInfo class with IFileSystem.FileInfo for improved testability",
        category: ABSTRACTION_NAMESPACE,
        kind: RuleKind::Construction {
            factory: Some("FromFileName"),
        },
    },
    TypeBinding {
        diagnostic_id: "IO0005",
        real_type: "FileStream",
        real_namespace: IO_NAMESPACE,
        abstraction_member: "FileStream",
        message: "Replace FileStream class with IFileSystem.FileStream for improved testability",
        category: ABSTRACTION_NAMESPACE,
        kind: RuleKind::Construction {
            factory: Some("Create"),
        },
    },
    TypeBinding {
        diagnostic_id: "IO0006",
        real_type: "Path",
        real_namespace: IO_NAMESPACE,
        abstraction_member: "Path",
        message: "Replace Path class with IFileSystem.Path for improved testability",
        category: ABSTRACTION_NAMESPACE,
        kind: RuleKind::StaticCall,
    },
    TypeBinding {
        diagnostic_id: "IO0007",
        real_type: "DirectoryInfo",
        real_namespace: IO_NAMESPACE,
        abstraction_member: "DirectoryInfo",
        message: "Replace DirectoryInfo class with IFileSystem.DirectoryInfo for improved testability",
        category: ABSTRACTION_NAMESPACE,
        kind: RuleKind::Construction {
            factory: Some("FromDirectoryName"),
        },
    },
    TypeBinding {
        diagnostic_id: "IO0009",
        real_type: "FileSystemWatcher",
        real_namespace: IO_NAMESPACE,
        abstraction_member: "FileSystemWatcher",
        message: "Replace FileSystemWatcher class with IFileSystem.FileSystemWatcher for improved testability",
        category: ABSTRACTION_NAMESPACE,
        kind: RuleKind::Construction { factory: None },
    },
    TypeBinding {
        diagnostic_id: "IO0010",
        real_type: "StreamWriter",
        real_namespace: IO_NAMESPACE,
        abstraction_member: "FileStream",
        message: "Replace StreamWriter string constructor overload with a stream based overload using a stream from IFileSystem.FileStream for improved testability",
        category: ABSTRACTION_NAMESPACE,
        kind: RuleKind::StringPathConstructor,
    },
    TypeBinding {
        diagnostic_id: "IO0011",
        real_type: "StreamReader",
        real_namespace: IO_NAMESPACE,
        abstraction_member: "FileStream",
        message: "Replace StreamReader string constructor overload with a stream based overload using a stream from IFileSystem.FileStream for improved testability",
        category: ABSTRACTION_NAMESPACE,
        kind: RuleKind::StringPathConstructor,
    },
];

/// Every registered binding, in diagnostic-id order.
pub fn builtin() -> &'static [TypeBinding] {
    BINDINGS
}

/// Binding for a diagnostic id, if registered.
pub fn lookup(diagnostic_id: &str) -> Option<&'static TypeBinding> {
    BINDINGS.iter().find(|b| b.diagnostic_id == diagnostic_id)
}
