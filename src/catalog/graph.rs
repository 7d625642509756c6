//! Dependency graph over the table catalog.
//!
//! Provides:
//! - Parent/child adjacency derived from the FK declarations
//! - Topological sorting (Kahn) for generation order
//! - Cycle detection, so a bad catalog edit fails loudly instead of hanging
//!   the generator on an impossible ordering

use super::{table_id, TableId, TABLES};
use anyhow::bail;
use std::collections::VecDeque;

/// Dependency graph built from the catalog's foreign key declarations.
///
/// A parent is a table referenced by another table's FK; a child is a table
/// holding the FK. Processing parents before children guarantees that every
/// key pool a child samples from is already materialized.
#[derive(Debug)]
pub struct CatalogGraph {
    /// For each table, the tables it references via FK
    parents: Vec<Vec<TableId>>,
    /// For each table, the tables that reference it via FK
    children: Vec<Vec<TableId>>,
}

/// Result of topological sort
#[derive(Debug)]
pub struct TopoSortResult {
    /// Tables in topological order (parents before children)
    pub order: Vec<TableId>,
    /// Tables that are part of cycles (could not be ordered)
    pub cyclic_tables: Vec<TableId>,
}

impl CatalogGraph {
    /// Build the dependency graph from the static catalog
    pub fn new() -> Self {
        let n = TABLES.len();
        let mut parents: Vec<Vec<TableId>> = vec![Vec::new(); n];
        let mut children: Vec<Vec<TableId>> = vec![Vec::new(); n];

        for (i, table) in TABLES.iter().enumerate() {
            let child_id = TableId(i as u32);

            for fk in table.foreign_keys {
                if let Some(parent_id) = table_id(fk.parent) {
                    if parent_id != child_id {
                        if !parents[child_id.0 as usize].contains(&parent_id) {
                            parents[child_id.0 as usize].push(parent_id);
                        }
                        if !children[parent_id.0 as usize].contains(&child_id) {
                            children[parent_id.0 as usize].push(child_id);
                        }
                    }
                }
            }
        }

        Self { parents, children }
    }

    /// Get the number of tables in the graph
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Tables with no FK dependencies (the tier-1 parents)
    pub fn root_tables(&self) -> Vec<TableId> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, parents)| parents.is_empty())
            .map(|(i, _)| TableId(i as u32))
            .collect()
    }

    /// Perform topological sort using Kahn's algorithm.
    ///
    /// Returns tables in dependency order (parents before children). Ties are
    /// broken by catalog position, so the order is stable across runs.
    pub fn topo_sort(&self) -> TopoSortResult {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.parents.iter().map(|p| p.len()).collect();

        let mut queue: VecDeque<TableId> = VecDeque::new();
        for (i, &deg) in in_degree.iter().enumerate() {
            if deg == 0 {
                queue.push_back(TableId(i as u32));
            }
        }

        let mut order = Vec::with_capacity(n);

        while let Some(table) = queue.pop_front() {
            order.push(table);

            for &child in &self.children[table.0 as usize] {
                in_degree[child.0 as usize] -= 1;
                if in_degree[child.0 as usize] == 0 {
                    queue.push_back(child);
                }
            }
        }

        let cyclic_tables: Vec<TableId> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &deg)| deg > 0)
            .map(|(i, _)| TableId(i as u32))
            .collect();

        TopoSortResult {
            order,
            cyclic_tables,
        }
    }

    /// Generation order for the full catalog, failing on cyclic declarations
    pub fn generation_order(&self) -> anyhow::Result<Vec<TableId>> {
        let result = self.topo_sort();
        if !result.cyclic_tables.is_empty() {
            let names: Vec<&str> = result
                .cyclic_tables
                .iter()
                .filter_map(|&id| super::table(id).map(|t| t.name))
                .collect();
            bail!(
                "catalog contains a foreign-key cycle involving: {}",
                names.join(", ")
            );
        }
        Ok(result.order)
    }
}

impl Default for CatalogGraph {
    fn default() -> Self {
        Self::new()
    }
}
