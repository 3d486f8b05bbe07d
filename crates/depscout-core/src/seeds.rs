/// Ordered list of seed package names
///
/// Names are trimmed and lower-cased on the way in; blanks are dropped.
/// Duplicates are kept, the resolver skips them anyway.
#[derive(Debug, Clone, Default)]
pub struct SeedList {
    names: Vec<String>,
}

impl SeedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str) {
        if let Some(name) = normalize_seed(name) {
            self.names.push(name);
        }
    }

    pub fn extend<I, T>(&mut self, names: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for name in names {
            self.push(name.as_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

fn normalize_seed(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_normalization() {
        let mut seeds = SeedList::new();
        seeds.extend(["  Requests ", "", "   ", "numpy"]);
        seeds.push("NumPy");

        let names: Vec<_> = seeds.iter().collect();
        assert_eq!(names, vec!["requests", "numpy", "numpy"]);
        assert_eq!(seeds.len(), 3);
        assert!(!seeds.is_empty());
    }
}
