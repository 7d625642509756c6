//! Static catalog of the generated dataset.
//!
//! This module provides:
//! - Table definitions (name, primary key, foreign keys) for all 12 tables
//! - The dependency graph derived from the FK declarations
//!
//! The catalog is the single source of truth for both passes: the generator
//! derives its table ordering from it, and the verifier derives its
//! relationship list from it.

mod graph;

pub use graph::*;

use std::fmt;

/// Unique identifier for a table within the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableId({})", self.0)
    }
}

/// Foreign key declaration: a child column referencing a parent table's key column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FkDef {
    /// Column in the child table
    pub column: &'static str,
    /// Referenced parent table name
    pub parent: &'static str,
    /// Referenced key column in the parent table
    pub parent_column: &'static str,
}

/// Table definition within the catalog
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    /// Table name, also the CSV file stem ("Customers" -> "Customers.csv")
    pub name: &'static str,
    /// Primary key column(s); composite for Inventory
    pub primary_key: &'static [&'static str],
    /// Foreign key declarations
    pub foreign_keys: &'static [FkDef],
}

impl TableDef {
    /// CSV file name for this table
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name)
    }
}

/// All tables, tier-1 parents first (the order the files are listed in reports;
/// the generation order itself is derived from the FK graph, not from this list)
pub const TABLES: &[TableDef] = &[
    TableDef {
        name: "Customers",
        primary_key: &["customer_id"],
        foreign_keys: &[],
    },
    TableDef {
        name: "Products",
        primary_key: &["product_id"],
        foreign_keys: &[],
    },
    TableDef {
        name: "Suppliers",
        primary_key: &["supplier_id"],
        foreign_keys: &[],
    },
    TableDef {
        name: "Warehouses",
        primary_key: &["warehouse_id"],
        foreign_keys: &[],
    },
    TableDef {
        name: "ShippingCarriers",
        primary_key: &["carrier_id"],
        foreign_keys: &[],
    },
    TableDef {
        name: "Orders",
        primary_key: &["order_id"],
        foreign_keys: &[
            FkDef {
                column: "customer_id",
                parent: "Customers",
                parent_column: "customer_id",
            },
            FkDef {
                column: "fulfillment_warehouse_id",
                parent: "Warehouses",
                parent_column: "warehouse_id",
            },
        ],
    },
    TableDef {
        name: "OrderItems",
        primary_key: &["order_item_id"],
        foreign_keys: &[
            FkDef {
                column: "order_id",
                parent: "Orders",
                parent_column: "order_id",
            },
            FkDef {
                column: "product_id",
                parent: "Products",
                parent_column: "product_id",
            },
        ],
    },
    TableDef {
        name: "Inventory",
        primary_key: &["warehouse_id", "product_id"],
        foreign_keys: &[
            FkDef {
                column: "warehouse_id",
                parent: "Warehouses",
                parent_column: "warehouse_id",
            },
            FkDef {
                column: "product_id",
                parent: "Products",
                parent_column: "product_id",
            },
        ],
    },
    TableDef {
        name: "PurchaseOrders",
        primary_key: &["po_id"],
        foreign_keys: &[
            FkDef {
                column: "supplier_id",
                parent: "Suppliers",
                parent_column: "supplier_id",
            },
            FkDef {
                column: "warehouse_id",
                parent: "Warehouses",
                parent_column: "warehouse_id",
            },
        ],
    },
    TableDef {
        name: "PurchaseOrderItems",
        primary_key: &["po_item_id"],
        foreign_keys: &[
            FkDef {
                column: "po_id",
                parent: "PurchaseOrders",
                parent_column: "po_id",
            },
            FkDef {
                column: "product_id",
                parent: "Products",
                parent_column: "product_id",
            },
        ],
    },
    TableDef {
        name: "Shipments",
        primary_key: &["shipment_id"],
        foreign_keys: &[
            FkDef {
                column: "order_id",
                parent: "Orders",
                parent_column: "order_id",
            },
            FkDef {
                column: "carrier_id",
                parent: "ShippingCarriers",
                parent_column: "carrier_id",
            },
            FkDef {
                column: "origin_warehouse_id",
                parent: "Warehouses",
                parent_column: "warehouse_id",
            },
        ],
    },
    TableDef {
        name: "ShipmentTrackingHistory",
        primary_key: &["tracking_history_id"],
        foreign_keys: &[FkDef {
            column: "shipment_id",
            parent: "Shipments",
            parent_column: "shipment_id",
        }],
    },
];

/// Number of tables in the catalog
pub fn len() -> usize {
    TABLES.len()
}

/// Look up a table by name (case-insensitive)
pub fn table_id(name: &str) -> Option<TableId> {
    TABLES
        .iter()
        .position(|t| t.name.eq_ignore_ascii_case(name))
        .map(|i| TableId(i as u32))
}

/// Get a table definition by id
pub fn table(id: TableId) -> Option<&'static TableDef> {
    TABLES.get(id.0 as usize)
}
