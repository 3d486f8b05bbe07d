use crate::models::{Dependency, DependencyType};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// Marker that puts a requirement into an optional dependency group
const EXTRA_MARKER: &str = "extra ==";

/// Extract the bare package name from a raw specifier
///
/// Takes the longest leading run of `[A-Za-z0-9._-]` and lower-cases it.
/// Anything else (version constraints, markers, whitespace) ends the name.
/// Never fails: input that doesn't start with a name char yields "".
pub fn package_name(spec: &str) -> String {
    let end = spec
        .find(|c: char| !is_name_char(c))
        .unwrap_or(spec.len());

    spec[..end].to_lowercase()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

/// Does this specifier only apply when an extra is requested?
pub fn is_extra(spec: &str) -> bool {
    spec.contains(EXTRA_MARKER)
}

/// Parse one specifier into a [`Dependency`]
///
/// Extras still get a name so callers can report them, but they are
/// flagged so the graph never sees them.
pub fn parse_requirement(spec: &str) -> Dependency {
    let dep_type = if is_extra(spec) {
        DependencyType::Extra
    } else {
        DependencyType::Runtime
    };

    Dependency {
        name: package_name(spec),
        raw: spec.to_string(),
        dep_type,
    }
}

/// Reduce a package's `requires_dist` list to the distinct names it depends on
///
/// Extras are dropped before parsing, empty names are dropped after, and
/// duplicates keep their first position so traversal order stays stable.
pub fn dependency_names<S: AsRef<str>>(specs: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();

    specs
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !is_extra(s))
        .map(package_name)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Parse requirements.txt content
///
/// Comments, blank lines and pip option lines (`-r`, `--index-url`, ...)
/// are skipped. Inline comments are stripped.
pub fn parse_requirements_txt(content: &str) -> Vec<Dependency> {
    let mut dependencies = Vec::new();

    for line in content.lines() {
        let line = match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        };
        let line = line.trim();

        if line.is_empty() || line.starts_with('-') {
            continue;
        }

        let dep = parse_requirement(line);
        if dep.is_graph_edge() {
            dependencies.push(dep);
        }
    }

    dependencies
}

/// Read a requirements file and return the package names it lists
pub fn read_requirements_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read requirements file {}", path.display()))?;

    Ok(parse_requirements_txt(&content)
        .into_iter()
        .map(|d| d.name)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_strips_version_constraints() {
        assert_eq!(package_name("foo (>=1.0,<2.0)"), "foo");
        assert_eq!(package_name("numpy>=1.20"), "numpy");
        assert_eq!(package_name("requests[socks]>=2.0"), "requests");
        assert_eq!(
            package_name("typing-extensions; python_version < '3.8'"),
            "typing-extensions"
        );
    }

    #[test]
    fn test_package_name_lowercases_and_keeps_separators() {
        assert_eq!(package_name("Foo.Bar-Baz_Qux==1"), "foo.bar-baz_qux");
        assert_eq!(package_name("PyYAML"), "pyyaml");
    }

    #[test]
    fn test_package_name_degrades_to_empty() {
        assert_eq!(package_name(""), "");
        assert_eq!(package_name("  leading-space"), "");
        assert_eq!(package_name(">=1.0"), "");
        assert_eq!(package_name("ünïcode"), "");
    }

    #[test]
    fn test_extra_detection() {
        assert!(is_extra("  Foo.Bar-Baz; extra == 'test'"));
        assert!(is_extra("pytest ; extra == \"dev\""));
        assert!(!is_extra("numpy>=1.20"));
        assert!(!is_extra("extras-lib"));
    }

    #[test]
    fn test_dependency_names_dedups_and_filters() {
        let specs = vec![
            "y",
            "y (>=2)",
            "Z; python_version >= '3.8'",
            "pytest; extra == 'test'",
            ">=garbage",
            "",
        ];

        assert_eq!(dependency_names(&specs), vec!["y", "z"]);
    }

    #[test]
    fn test_parse_requirement_marks_extras() {
        let dep = parse_requirement("coverage>=5; extra == 'cov'");
        assert_eq!(dep.name, "coverage");
        assert_eq!(dep.dep_type, DependencyType::Extra);
        assert!(!dep.is_graph_edge());

        let dep = parse_requirement("Flask>=2.0");
        assert_eq!(dep.name, "flask");
        assert_eq!(dep.dep_type, DependencyType::Runtime);
        assert!(dep.is_graph_edge());
    }

    #[test]
    fn test_parse_requirements_txt() {
        let content = r#"
# Python dependencies
requests==2.28.0
flask>=2.0.0  # web
pandas~=1.5.0
-r other.txt
--index-url https://example.invalid/simple
numpy
        "#;

        let deps = parse_requirements_txt(content);
        let names: Vec<_> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["requests", "flask", "pandas", "numpy"]);
    }

    #[test]
    fn test_read_requirements_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requirements.txt");
        std::fs::write(&path, "Django>=4\nceleryd; extra == 'x'\n").unwrap();

        let names = read_requirements_file(&path).unwrap();
        assert_eq!(names, vec!["django"]);
    }

    #[test]
    fn test_read_requirements_file_missing() {
        let err = read_requirements_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read requirements file"));
    }
}
