// Dependency specifier handling
// Turns raw requirement strings from package metadata into bare package names

pub mod models;
pub mod parsers;

pub use models::{Dependency, DependencyType};
pub use parsers::{
    dependency_names, is_extra, package_name, parse_requirement, parse_requirements_txt,
    read_requirements_file,
};
