//! Keyword rules mapping transaction descriptions to spending categories.
//!
//! Rules are an ordered list evaluated top to bottom: the first rule with
//! any keyword contained in the lowercased description wins. `Others` is
//! the fallback when nothing matches.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spending categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Food,
    Groceries,
    Transport,
    Shopping,
    Entertainment,
    Salary,
    Bills,
    Others,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Groceries,
        Category::Transport,
        Category::Shopping,
        Category::Entertainment,
        Category::Salary,
        Category::Bills,
        Category::Others,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Groceries => "Groceries",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Salary => "Salary",
            Category::Bills => "Bills",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A category plus the keyword substrings that select it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: Category,
    /// Lowercase substrings
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// `desc` must already be lowercased
    fn matches(&self, desc: &str) -> bool {
        self.keywords.iter().any(|k| desc.contains(k.as_str()))
    }
}

/// Ordered rule table. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<CategoryRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// The fixed ICICI table, in precedence order.
    pub fn standard() -> Self {
        Self::new(vec![
            CategoryRule::new(Category::Food, &["swiggy", "zomato", "restaurant", "dominos"]),
            CategoryRule::new(Category::Groceries, &["bigbasket", "dmart", "reliance"]),
            CategoryRule::new(Category::Transport, &["uber", "ola", "fuel", "petrol"]),
            CategoryRule::new(Category::Shopping, &["amazon", "flipkart", "myntra"]),
            CategoryRule::new(Category::Entertainment, &["netflix", "hotstar", "spotify"]),
            CategoryRule::new(Category::Salary, &["salary", "credit"]),
            CategoryRule::new(Category::Bills, &["electricity", "mobile", "internet"]),
            CategoryRule::new(Category::Others, &[]),
        ])
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Categorize a description. Always returns a category.
    pub fn categorize(&self, description: &str) -> Category {
        let desc = description.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&desc))
            .map(|rule| rule.category)
            .unwrap_or(Category::Others)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_keywords() {
        let table = RuleTable::standard();
        assert_eq!(table.categorize("SWIGGY ORDER 1234"), Category::Food);
        assert_eq!(table.categorize("DMART AVENUE"), Category::Groceries);
        assert_eq!(table.categorize("UBER TRIP"), Category::Transport);
        assert_eq!(table.categorize("AMAZON PURCHASE"), Category::Shopping);
        assert_eq!(table.categorize("NETFLIX.COM"), Category::Entertainment);
        assert_eq!(table.categorize("SALARY CREDIT"), Category::Salary);
        assert_eq!(table.categorize("BESCOM ELECTRICITY"), Category::Bills);
    }

    #[test]
    fn test_unmatched_falls_back_to_others() {
        let table = RuleTable::standard();
        assert_eq!(table.categorize("ATM WDL"), Category::Others);
        assert_eq!(table.categorize(""), Category::Others);
    }

    #[test]
    fn test_earlier_rule_wins() {
        let table = RuleTable::standard();
        // Shopping is declared before Salary
        assert_eq!(table.categorize("amazon salary"), Category::Shopping);
        // Food before Bills
        assert_eq!(table.categorize("zomato mobile order"), Category::Food);
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let table = RuleTable::standard();
        assert_eq!(table.categorize("Petrol Pump HP"), Category::Transport);
        // "ola" inside a longer word still matches
        assert_eq!(table.categorize("COCA COLA"), Category::Transport);
    }

    #[test]
    fn test_every_description_gets_one_category() {
        let table = RuleTable::standard();
        let samples = [
            "",
            "   ",
            "UPI/1234/PAYMENT",
            "ATM CASH",
            "₹ refund",
            "INTERNET BANKING NEFT",
            "bigbasket reliance fresh",
        ];
        for s in samples {
            let cat = table.categorize(s);
            assert!(Category::ALL.contains(&cat), "{s:?} -> {cat:?}");
        }
    }

    #[test]
    fn test_custom_table_order() {
        let table = RuleTable::new(vec![
            CategoryRule::new(Category::Salary, &["Salary"]),
            CategoryRule::new(Category::Shopping, &["amazon"]),
        ]);
        assert_eq!(table.categorize("amazon salary"), Category::Salary);
        assert_eq!(table.categorize("nothing"), Category::Others);
    }
}
