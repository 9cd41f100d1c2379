//! Total order over (category, phase) pairs.
//!
//! Every severity comparison in the crate (timeline sorting, the running
//! maximum behind new-alert detection, render ordering, window combining)
//! goes through [`rank`], which reads the single table below.

use crate::category::{Category, Phase};
use std::cmp::Ordering;

/// Every (category, phase) pair, least severe first. A pair's rank is its
/// position in this table.
pub const SEVERITY_ORDER: [(Category, Phase); 24] = [
    (Category::Ny, Phase::Ny),
    (Category::Ny, Phase::Na),
    (Category::Ny, Phase::Ready),
    (Category::Ny, Phase::Set),
    (Category::Na, Phase::Ny),
    (Category::Na, Phase::Na),
    (Category::Na, Phase::Ready),
    (Category::Na, Phase::Set),
    (Category::Normal, Phase::Ny),
    (Category::Normal, Phase::Na),
    (Category::Normal, Phase::Ready),
    (Category::Normal, Phase::Set),
    (Category::Mild, Phase::Ny),
    (Category::Mild, Phase::Na),
    (Category::Mild, Phase::Ready),
    (Category::Mild, Phase::Set),
    (Category::Moderate, Phase::Ny),
    (Category::Moderate, Phase::Na),
    (Category::Moderate, Phase::Ready),
    (Category::Moderate, Phase::Set),
    (Category::Severe, Phase::Ny),
    (Category::Severe, Phase::Na),
    (Category::Severe, Phase::Ready),
    (Category::Severe, Phase::Set),
];

/// Severity rank of a (category, phase) pair. Higher is more severe.
pub fn rank(category: Category, phase: Phase) -> usize {
    SEVERITY_ORDER
        .iter()
        .position(|pair| *pair == (category, phase))
        .unwrap_or_default()
}

/// Compare two pairs by severity.
pub fn compare(a: (Category, Phase), b: (Category, Phase)) -> Ordering {
    rank(a.0, a.1).cmp(&rank(b.0, b.1))
}

#[cfg(test)]
mod tests {
    use super::{compare, rank, SEVERITY_ORDER};
    use crate::category::{Category, Phase};
    use std::cmp::Ordering;

    #[test]
    fn test_table_covers_cross_product_once() {
        for category in Category::ALL {
            for phase in Phase::ALL {
                let hits = SEVERITY_ORDER
                    .iter()
                    .filter(|pair| **pair == (category, phase))
                    .count();
                assert_eq!(hits, 1, "{category}/{phase}");
            }
        }
    }

    #[test]
    fn test_rank_is_category_major() {
        assert!(rank(Category::Severe, Phase::Set) > rank(Category::Severe, Phase::Ready));
        assert!(rank(Category::Severe, Phase::Ready) > rank(Category::Moderate, Phase::Set));
        assert!(rank(Category::Moderate, Phase::Set) > rank(Category::Moderate, Phase::Ready));
        assert!(rank(Category::Mild, Phase::Ready) > rank(Category::Normal, Phase::Set));
        assert!(rank(Category::Normal, Phase::Ready) > rank(Category::Na, Phase::Na));
        assert!(rank(Category::Na, Phase::Na) > rank(Category::Ny, Phase::Ny));
    }

    #[test]
    fn test_rank_is_a_strict_total_order() {
        let pairs: Vec<(Category, Phase)> = Category::ALL
            .iter()
            .flat_map(|c| Phase::ALL.iter().map(move |p| (*c, *p)))
            .collect();
        for a in &pairs {
            assert_eq!(compare(*a, *a), Ordering::Equal);
            for b in &pairs {
                if a != b {
                    assert_ne!(rank(a.0, a.1), rank(b.0, b.1));
                    assert_eq!(compare(*a, *b), compare(*b, *a).reverse());
                }
                for c in &pairs {
                    if compare(*a, *b) == Ordering::Greater
                        && compare(*b, *c) == Ordering::Greater
                    {
                        assert_eq!(compare(*a, *c), Ordering::Greater);
                    }
                }
            }
        }
    }
}
