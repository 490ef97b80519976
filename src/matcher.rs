//! Line matching against a loaded [`Catalog`].
//!
//! Matching is lexical and stateless: each call to [`Catalog::check_line`]
//! depends only on the catalog and the line, so one catalog can be shared
//! across threads and files without any reset.

use crate::catalog::{Catalog, Pattern};

/// A pattern that fired, together with the name of its category.
#[derive(Debug, Clone, Copy)]
pub struct RuleMatch<'a> {
    pub category: &'a str,
    pub category_description: &'a str,
    pub pattern: &'a Pattern,
}

impl PartialEq for RuleMatch<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && std::ptr::eq(self.pattern, other.pattern)
    }
}

impl Eq for RuleMatch<'_> {}

impl Catalog {
    /// Every pattern paired with its category name, in category order and
    /// then pattern order.
    pub fn all_patterns(&self) -> impl Iterator<Item = RuleMatch<'_>> + '_ {
        self.categories().iter().flat_map(|category| {
            category.patterns.iter().map(move |pattern| RuleMatch {
                category: &category.name,
                category_description: &category.description,
                pattern,
            })
        })
    }

    /// Returns every `(category, pattern)` pair whose detector matches `line`
    /// and whose exclude pattern does not.
    ///
    /// There is no early exit and no deduplication: a line that trips
    /// several rules yields one entry per rule.
    ///
    /// ```
    /// use oxidized_bashrc::catalog::Catalog;
    ///
    /// let catalog = Catalog::builtin().unwrap();
    /// let hits = catalog.check_line("export PATH=/usr/local/bin");
    /// assert!(hits.iter().any(|m| m.category == "Direct Path Management"));
    ///
    /// let hits = catalog.check_line("export PATH=/usr/local/bin:$PATH");
    /// assert!(hits.iter().all(|m| m.category != "Direct Path Management"));
    /// ```
    pub fn check_line(&self, line: &str) -> Vec<RuleMatch<'_>> {
        self.all_patterns()
            .filter(|m| m.pattern.matches(line))
            .collect()
    }

    /// Returns `true` if at least one pattern fires on `line`.
    pub fn matches_line(&self, line: &str) -> bool {
        self.all_patterns().any(|m| m.pattern.matches(line))
    }
}
