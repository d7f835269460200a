//! Parent/child category hierarchy.

use std::collections::HashMap;

use dompet_shared::types::CategoryId;

use super::types::{Category, CategoryNode, CategoryType};

/// Groups a flat category list into roots and their direct children.
///
/// A category is a root when it has no parent, when its parent is missing
/// from the input, or when its parent is itself a child (only one level of
/// nesting exists). Children keep their input order. No category is ever
/// dropped.
#[must_use]
pub fn build_category_hierarchy(categories: &[Category]) -> Vec<CategoryNode> {
    let by_id: HashMap<CategoryId, &Category> = categories.iter().map(|c| (c.id, c)).collect();

    let attaches_to = |category: &Category| -> Option<CategoryId> {
        let parent_id = category.parent_id?;
        let parent = by_id.get(&parent_id)?;
        // Self-references and grandchildren stay at the top level.
        (parent_id != category.id && parent.parent_id.is_none()).then_some(parent_id)
    };

    let mut nodes: Vec<CategoryNode> = Vec::new();
    let mut root_index: HashMap<CategoryId, usize> = HashMap::new();

    for category in categories {
        if attaches_to(category).is_none() {
            root_index.insert(category.id, nodes.len());
            nodes.push(CategoryNode {
                category: category.clone(),
                children: Vec::new(),
            });
        }
    }

    for category in categories {
        if let Some(parent_id) = attaches_to(category)
            && let Some(&idx) = root_index.get(&parent_id)
        {
            nodes[idx].children.push(category.clone());
        }
    }

    nodes
}

/// Keeps only expense categories, preserving order.
#[must_use]
pub fn expense_categories(categories: &[Category]) -> Vec<Category> {
    categories
        .iter()
        .filter(|c| c.category_type == CategoryType::Expense)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, parent_id: Option<i64>) -> Category {
        Category {
            id: CategoryId::new(id),
            name: format!("Category {id}"),
            category_type: CategoryType::Expense,
            parent_id: parent_id.map(CategoryId::new),
        }
    }

    fn ids(categories: &[Category]) -> Vec<i64> {
        categories.iter().map(|c| c.id.into_inner()).collect()
    }

    #[test]
    fn test_orphan_is_promoted() {
        let input = vec![category(1, None), category(2, Some(1)), category(3, Some(99))];
        let tree = build_category_hierarchy(&input);

        let roots: Vec<i64> = tree.iter().map(|n| n.category.id.into_inner()).collect();
        assert_eq!(roots, vec![1, 3]);
        assert_eq!(ids(&tree[0].children), vec![2]);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_children_keep_input_order() {
        let input = vec![
            category(5, Some(1)),
            category(1, None),
            category(3, Some(1)),
            category(4, Some(1)),
        ];
        let tree = build_category_hierarchy(&input);

        assert_eq!(tree.len(), 1);
        assert_eq!(ids(&tree[0].children), vec![5, 3, 4]);
    }

    #[test]
    fn test_grandchild_is_not_nested_further() {
        let input = vec![category(1, None), category(2, Some(1)), category(3, Some(2))];
        let tree = build_category_hierarchy(&input);

        let roots: Vec<i64> = tree.iter().map(|n| n.category.id.into_inner()).collect();
        assert_eq!(roots, vec![1, 3]);
        assert_eq!(ids(&tree[0].children), vec![2]);
    }

    #[test]
    fn test_self_reference_is_root() {
        let input = vec![category(1, Some(1))];
        let tree = build_category_hierarchy(&input);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_expense_filter() {
        let mut income = category(7, None);
        income.category_type = CategoryType::Income;
        let input = vec![category(1, None), income];
        assert_eq!(ids(&expense_categories(&input)), vec![1]);
    }
}
