// License classification
// PyPI license data is a free-for-all: SPDX expressions, full license
// texts, "BSD", or nothing at all. This squashes it into a handful of labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw license-bearing fields of a package's metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseFields {
    /// SPDX expression (newer metadata only)
    pub license_expression: Option<String>,
    /// Free text, sometimes an entire license file
    pub license: Option<String>,
    /// Trove classifiers, only `License :: ...` ones matter
    pub classifiers: Vec<String>,
}

/// Common open source licenses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum License {
    MIT,
    Apache2,
    GPL,
    GPL2,
    GPL3,
    LGPL,
    AGPL,
    BSD2,
    BSD3,
    MPL2,
    Unlicense,
    ISC,
    PSF,
    Proprietary,
    Unknown,
}

impl License {
    /// Classify a package from all its license fields
    ///
    /// Fields are tried in order of reliability: SPDX expression, free
    /// text, then classifiers. The first one that says something wins.
    pub fn classify(fields: &LicenseFields) -> Self {
        let from_text = [&fields.license_expression, &fields.license]
            .into_iter()
            .flatten()
            .filter(|s| !is_placeholder(s))
            .map(|s| Self::parse_license(s))
            .find(|l| *l != License::Unknown);

        if let Some(license) = from_text {
            return license;
        }

        fields
            .classifiers
            .iter()
            .filter_map(|c| c.strip_prefix("License ::"))
            .filter_map(|c| c.rsplit("::").next())
            .map(Self::parse_license)
            .find(|l| *l != License::Unknown)
            .unwrap_or(License::Unknown)
    }

    /// Parse license from a single string
    pub fn parse_license(s: &str) -> Self {
        let s_lower = s.to_lowercase();
        let words: Vec<&str> = s_lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has_word = |w: &str| words.contains(&w);
        let has_prefix = |p: &str| words.iter().any(|w| w.starts_with(p));

        // Most specific first: "lgpl" and "agpl" both contain "gpl"
        if has_prefix("agpl") || s_lower.contains("affero") {
            License::AGPL
        } else if has_prefix("lgpl")
            || s_lower.contains("lesser general public")
            || s_lower.contains("library general public")
        {
            License::LGPL
        } else if has_prefix("gpl") || s_lower.contains("general public license") {
            match gpl_version(&words) {
                Some(3) => License::GPL3,
                Some(2) => License::GPL2,
                _ => License::GPL,
            }
        } else if s_lower.contains("apache") {
            License::Apache2
        } else if has_word("mit") || s_lower.contains("expat") {
            License::MIT
        } else if words.iter().any(|w| w.starts_with("bsd") || w.ends_with("bsd")) {
            if bsd_clauses(&words) == Some(2) || has_word("simplified") || has_word("freebsd") {
                License::BSD2
            } else {
                License::BSD3
            }
        } else if s_lower.contains("mozilla") || has_word("mpl") || s_lower.starts_with("mpl") {
            License::MPL2
        } else if has_word("unlicense") {
            License::Unlicense
        } else if has_word("isc") {
            License::ISC
        } else if has_word("psf")
            || s_lower.starts_with("psf")
            || s_lower.contains("python software foundation")
        {
            License::PSF
        } else if s_lower.contains("proprietary") || s_lower.contains("commercial") {
            License::Proprietary
        } else {
            License::Unknown
        }
    }
}

/// Major version 2 or 3 from a token like `2` or `v3`
fn major_version(token: &str) -> Option<u8> {
    match token.strip_prefix('v').unwrap_or(token) {
        "2" => Some(2),
        "3" => Some(3),
        _ => None,
    }
}

/// Version attached to the word at `i` (`suffix`) or written right after it,
/// optionally behind the word "version"
fn version_after(words: &[&str], i: usize, suffix: &str) -> Option<u8> {
    if let Some(v) = major_version(suffix) {
        return Some(v);
    }
    let mut next = i + 1;
    if words.get(next) == Some(&"version") {
        next += 1;
    }
    words.get(next).and_then(|w| major_version(w))
}

/// GPL version named next to "gpl..." or "general public license"
fn gpl_version(words: &[&str]) -> Option<u8> {
    words.iter().enumerate().find_map(|(i, w)| {
        if let Some(suffix) = w.strip_prefix("gpl") {
            version_after(words, i, suffix)
        } else if *w == "license" && i > 0 && words[i - 1] == "public" {
            version_after(words, i, "")
        } else {
            None
        }
    })
}

/// Clause count from "2-clause"/"3-clause" or a version right after "bsd"
fn bsd_clauses(words: &[&str]) -> Option<u8> {
    words
        .windows(2)
        .find_map(|pair| (pair[1] == "clause").then(|| major_version(pair[0])).flatten())
        .or_else(|| {
            words.iter().enumerate().find_map(|(i, w)| {
                w.strip_prefix("bsd").and_then(|suffix| version_after(words, i, suffix))
            })
        })
}

/// Values projects put in the license field to mean "nothing"
fn is_placeholder(s: &str) -> bool {
    let s = s.trim();
    s.is_empty()
        || s.eq_ignore_ascii_case("unknown")
        || s.eq_ignore_ascii_case("none")
        || s.eq_ignore_ascii_case("n/a")
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            License::MIT => write!(f, "MIT"),
            License::Apache2 => write!(f, "Apache-2.0"),
            License::GPL => write!(f, "GPL"),
            License::GPL2 => write!(f, "GPL-2.0"),
            License::GPL3 => write!(f, "GPL-3.0"),
            License::LGPL => write!(f, "LGPL"),
            License::AGPL => write!(f, "AGPL"),
            License::BSD2 => write!(f, "BSD-2-Clause"),
            License::BSD3 => write!(f, "BSD-3-Clause"),
            License::MPL2 => write!(f, "MPL-2.0"),
            License::Unlicense => write!(f, "Unlicense"),
            License::ISC => write!(f, "ISC"),
            License::PSF => write!(f, "PSF"),
            License::Proprietary => write!(f, "Proprietary"),
            License::Unknown => write!(f, "unknown"),
        }
    }
}
