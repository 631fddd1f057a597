//! Summary statistics over a combined record set: income and expense
//! totals plus expenses grouped by category.

use passbook_core::{Category, Direction, TransactionRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Total expense amount for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    /// Signed sum, as it appears in the statements
    pub total: Decimal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub record_count: usize,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// Sorted by absolute spend, largest first
    pub expenses_by_category: Vec<CategoryTotal>,
}

impl Summary {
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let mut total_income = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        let mut groups: BTreeMap<Category, (Decimal, usize)> = BTreeMap::new();

        for r in records {
            match r.direction() {
                Direction::Income => total_income += r.amount(),
                Direction::Expense => {
                    total_expenses += r.amount();
                    let entry = groups.entry(r.category()).or_default();
                    entry.0 += r.amount();
                    entry.1 += 1;
                }
            }
        }

        let mut expenses_by_category: Vec<CategoryTotal> = groups
            .into_iter()
            .map(|(category, (total, transaction_count))| CategoryTotal {
                category,
                total,
                transaction_count,
            })
            .collect();

        // Stable sort keeps category declaration order for ties
        expenses_by_category.sort_by(|a, b| b.total.abs().cmp(&a.total.abs()));

        Self {
            record_count: records.len(),
            total_income,
            total_expenses,
            expenses_by_category,
        }
    }

    pub fn category_total(&self, category: Category) -> Option<Decimal> {
        self.expenses_by_category
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use passbook_core::AccountType;
    use rust_decimal_macros::dec;

    fn rec(desc: &str, amount: Decimal, category: Category) -> TransactionRecord {
        let direction = if amount > Decimal::ZERO {
            Direction::Income
        } else {
            Direction::Expense
        };
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            desc,
            amount,
            None,
            AccountType::Credit,
            category,
            direction,
        )
        .unwrap()
    }

    #[test]
    fn test_totals_by_direction() {
        let records = vec![
            rec("SALARY", dec!(50000), Category::Salary),
            rec("AMAZON", dec!(-1500), Category::Shopping),
            rec("SWIGGY", dec!(-400.50), Category::Food),
            rec("ZERO", dec!(0), Category::Others),
        ];
        let s = Summary::from_records(&records);
        assert_eq!(s.record_count, 4);
        assert_eq!(s.total_income, dec!(50000));
        assert_eq!(s.total_expenses, dec!(-1900.50));
    }

    #[test]
    fn test_expenses_grouped_and_sorted() {
        let records = vec![
            rec("SWIGGY", dec!(-200), Category::Food),
            rec("AMAZON", dec!(-1500), Category::Shopping),
            rec("ZOMATO", dec!(-300), Category::Food),
            rec("UBER", dec!(-500), Category::Transport),
            rec("SALARY", dec!(90000), Category::Salary),
        ];
        let s = Summary::from_records(&records);
        let order: Vec<Category> = s.expenses_by_category.iter().map(|c| c.category).collect();
        assert_eq!(order, vec![Category::Shopping, Category::Food, Category::Transport]);
        assert_eq!(s.category_total(Category::Food), Some(dec!(-500)));
        assert_eq!(s.expenses_by_category[1].transaction_count, 2);
        assert_eq!(s.category_total(Category::Salary), None);
    }

    #[test]
    fn test_ties_keep_category_order() {
        let records = vec![
            rec("NETFLIX", dec!(-100), Category::Entertainment),
            rec("UBER", dec!(-100), Category::Transport),
        ];
        let s = Summary::from_records(&records);
        assert_eq!(s.expenses_by_category[0].category, Category::Transport);
    }

    #[test]
    fn test_empty_summary() {
        let s = Summary::from_records(&[]);
        assert_eq!(s, Summary::default());
    }
}
