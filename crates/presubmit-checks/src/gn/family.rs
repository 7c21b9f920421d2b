//! Source-file language families and the classes that may share a target.

/// Language family of a source file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFamily {
    /// `.c`
    C,
    /// `.cc`, `.cpp`
    Cpp,
    /// `.m`
    ObjC,
    /// `.mm`
    ObjCpp,
}

impl SourceFamily {
    /// Classifies a source path by extension.
    ///
    /// Returns `None` for headers, unknown extensions, and paths without a
    /// file stem (e.g. `".cc"` or `"dir/"`).
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let name = path.rsplit('/').next().unwrap_or(path);
        let (stem, extension) = name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        match extension {
            "c" => Some(Self::C),
            "cc" | "cpp" => Some(Self::Cpp),
            "m" => Some(Self::ObjC),
            "mm" => Some(Self::ObjCpp),
            _ => None,
        }
    }

    /// Returns the compatibility class this family belongs to.
    #[must_use]
    pub fn class(self) -> CompatibilityClass {
        match self {
            Self::C => CompatibilityClass::C,
            Self::Cpp => CompatibilityClass::Cpp,
            Self::ObjC | Self::ObjCpp => CompatibilityClass::ObjC,
        }
    }
}

/// Group of families that may coexist in one target.
///
/// Objective-C and Objective-C++ share a class; C and C++ each stand alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompatibilityClass {
    /// C sources.
    C,
    /// C++ sources.
    Cpp,
    /// Objective-C and Objective-C++ sources.
    ObjC,
}

impl CompatibilityClass {
    /// Classifies a source path straight to its compatibility class.
    #[must_use]
    pub fn of_path(path: &str) -> Option<Self> {
        SourceFamily::from_path(path).map(SourceFamily::class)
    }
}

impl std::fmt::Display for CompatibilityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::C => write!(f, "C"),
            Self::Cpp => write!(f, "C++"),
            Self::ObjC => write!(f, "Objective-C/C++"),
        }
    }
}
