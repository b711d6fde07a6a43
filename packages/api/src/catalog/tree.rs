//! Category hierarchy as an adjacency index.
//!
//! Categories only store their parent id. `CategoryTree` loads a set of rows
//! once and keeps a `parent -> children` index so child lookup does not hit
//! the database per level. Every recursive walk carries its own visited set,
//! so a cyclic parent chain surfaces as [`TreeError::Cycle`] instead of
//! unbounded recursion.

use std::collections::{HashMap, HashSet};

use crate::entity::category;
use crate::serialization::category::CategoryNode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("category {id} is part of a parent cycle")]
    Cycle { id: i32 },
    #[error("category {id} is not in the tree")]
    Missing { id: i32 },
}

#[derive(Debug, Default)]
pub struct CategoryTree {
    nodes: HashMap<i32, category::Model>,
    children: HashMap<i32, Vec<i32>>,
    order: Vec<i32>,
}

impl CategoryTree {
    /// Builds the index. Child lists keep the order in which rows are supplied,
    /// which for store reads is ascending id (insertion order).
    pub fn from_models(models: Vec<category::Model>) -> Self {
        let mut tree = CategoryTree::default();
        for model in models {
            if let Some(parent_id) = model.parent_id {
                tree.children.entry(parent_id).or_default().push(model.id);
            }
            tree.order.push(model.id);
            tree.nodes.insert(model.id, model);
        }
        tree
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: i32) -> Option<&category::Model> {
        self.nodes.get(&id)
    }

    /// Direct children of `id`.
    pub fn subcategories(&self, id: i32) -> &[i32] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Categories without a parent. A parent id pointing at a row that is not
    /// loaded also counts as top-level.
    pub fn roots(&self) -> Vec<i32> {
        self.order
            .iter()
            .copied()
            .filter(|id| match self.nodes[id].parent_id {
                None => true,
                Some(parent_id) => !self.nodes.contains_key(&parent_id),
            })
            .collect()
    }

    /// Nested representation of `id` and everything below it.
    pub fn nested(&self, id: i32) -> Result<CategoryNode, TreeError> {
        let mut visited = HashSet::new();
        self.nested_inner(id, &mut visited)
    }

    /// Nested representations of every top-level category.
    pub fn nested_roots(&self) -> Result<Vec<CategoryNode>, TreeError> {
        self.roots().into_iter().map(|id| self.nested(id)).collect()
    }

    fn nested_inner(
        &self,
        id: i32,
        visited: &mut HashSet<i32>,
    ) -> Result<CategoryNode, TreeError> {
        if !visited.insert(id) {
            return Err(TreeError::Cycle { id });
        }
        let model = self.nodes.get(&id).ok_or(TreeError::Missing { id })?;

        let subcategories = self
            .subcategories(id)
            .iter()
            .map(|child| self.nested_inner(*child, visited))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CategoryNode {
            id: model.id,
            name: model.name.clone(),
            parent: model.parent_id,
            subcategories,
        })
    }

    /// `id` and all of its descendants, parents before children.
    pub fn descendants(&self, id: i32) -> Result<Vec<i32>, TreeError> {
        if !self.nodes.contains_key(&id) {
            return Err(TreeError::Missing { id });
        }
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                return Err(TreeError::Cycle { id: current });
            }
            out.push(current);
            for child in self.subcategories(current).iter().rev() {
                stack.push(*child);
            }
        }
        Ok(out)
    }

    /// True when `candidate` is `id` itself or sits anywhere below it.
    pub fn is_descendant_or_self(&self, id: i32, candidate: i32) -> Result<bool, TreeError> {
        Ok(self.descendants(id)?.contains(&candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i32, parent_id: Option<i32>) -> category::Model {
        category::Model {
            id,
            name: format!("cat-{id}"),
            description: String::new(),
            parent_id,
        }
    }

    fn depth(node: &CategoryNode) -> usize {
        1 + node.subcategories.iter().map(depth).max().unwrap_or(0)
    }

    #[test]
    fn children_are_listed_under_their_parent() {
        let tree = CategoryTree::from_models(vec![
            cat(1, None),
            cat(2, Some(1)),
            cat(3, Some(1)),
            cat(4, Some(2)),
        ]);

        assert_eq!(tree.subcategories(1), &[2, 3]);
        assert_eq!(tree.subcategories(2), &[4]);
        assert!(tree.subcategories(4).is_empty());
        for id in [2, 3, 4] {
            let parent = tree.get(id).unwrap().parent_id.unwrap();
            assert!(tree.subcategories(parent).contains(&id));
        }
    }

    #[test]
    fn roots_are_categories_without_parent() {
        let tree = CategoryTree::from_models(vec![
            cat(1, None),
            cat(2, Some(1)),
            cat(3, None),
            cat(4, Some(99)),
        ]);
        assert_eq!(tree.roots(), vec![1, 3, 4]);
    }

    #[test]
    fn depth_five_chain_nests_five_levels() {
        let tree = CategoryTree::from_models(vec![
            cat(1, None),
            cat(2, Some(1)),
            cat(3, Some(2)),
            cat(4, Some(3)),
            cat(5, Some(4)),
        ]);

        let roots = tree.nested_roots().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(depth(&roots[0]), 5);
        assert_eq!(roots[0].subcategories[0].parent, Some(1));
    }

    #[test]
    fn cycle_is_reported_instead_of_recursing() {
        let tree = CategoryTree::from_models(vec![cat(1, Some(3)), cat(2, Some(1)), cat(3, Some(2))]);

        assert!(tree.roots().is_empty());
        assert!(matches!(tree.nested(1), Err(TreeError::Cycle { .. })));
        assert!(matches!(tree.descendants(2), Err(TreeError::Cycle { .. })));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let tree = CategoryTree::from_models(vec![cat(1, Some(1))]);
        assert_eq!(tree.nested(1), Err(TreeError::Cycle { id: 1 }));
    }

    #[test]
    fn descendants_cover_the_subtree() {
        let tree = CategoryTree::from_models(vec![
            cat(1, None),
            cat(2, Some(1)),
            cat(3, Some(2)),
            cat(4, None),
        ]);
        assert_eq!(tree.descendants(1).unwrap(), vec![1, 2, 3]);
        assert!(tree.is_descendant_or_self(1, 3).unwrap());
        assert!(!tree.is_descendant_or_self(2, 1).unwrap());
        assert_eq!(tree.descendants(42), Err(TreeError::Missing { id: 42 }));
    }
}
