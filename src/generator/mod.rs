//! Dataset generator.
//!
//! Produces the twelve entity tables in dependency order (parents before
//! children), guaranteeing referential integrity by construction: every
//! foreign key is sampled from the key pool of a parent table that has
//! already been materialized. Order totals are backfilled from the generated
//! line items after OrderItems exist.

pub mod config;

pub use config::{GenerateYamlConfig, RowCounts};

use crate::catalog::{self, CatalogGraph};
use crate::csvio::CsvWriter;
use crate::fake::FakeData;
use ahash::{AHashMap, AHashSet};
use anyhow::{bail, Context};
use chrono::{Duration, NaiveDateTime};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Default row count per table
pub const DEFAULT_ROWS: usize = 10_000;

/// Default random seed
pub const DEFAULT_SEED: u64 = 42;

const CATEGORIES: &[&str] = &["Electronics", "Clothing", "Books", "Home Goods", "Sports", "Toys"];
const ORDER_STATUSES: &[&str] = &["Placed", "Shipped", "Delivered", "Cancelled"];
const PAYMENT_METHODS: &[&str] = &["Credit Card", "PayPal", "COD"];
const PAYMENT_STATUSES: &[&str] = &["Paid", "Pending", "Failed"];
const PO_STATUSES: &[&str] = &["Ordered", "In Transit", "Received", "Cancelled"];
const SHIPMENT_STATUSES: &[&str] = &["In Transit", "Delivered", "Delayed"];
const SERVICE_LEVELS: &[&str] = &["Standard", "Express", "Overnight"];
const TRACKING_EVENTS: &[&str] = &[
    "Label Created",
    "Picked Up",
    "In Transit",
    "Out for Delivery",
    "Delivered",
];

/// A generated cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Render for a CSV cell. Floats use Rust's shortest round-trip
    /// formatting, so 19.99 stays "19.99" and 0.0 becomes "0".
    pub fn to_csv_field(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }
}

/// A row of generated data
pub type Row = Vec<Value>;

/// Generated data for a single table
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl TableData {
    fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Position of a column in the header
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Write this table to `<dir>/<Name>.csv`
    pub fn write_csv(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let path = dir.join(format!("{}.csv", self.name));
        let mut writer = CsvWriter::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        writer.write_header(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|v| Cow::Owned(v.to_csv_field())))?;
        }
        writer.flush()?;
        Ok(path)
    }
}

/// All generated tables, in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub tables: Vec<TableData>,
}

impl Dataset {
    pub fn table(&self, name: &str) -> Option<&TableData> {
        self.tables.iter().find(|t| t.name == name)
    }

    fn table_mut(&mut self, name: &str) -> Option<&mut TableData> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    /// Write every table to `<dir>/<Name>.csv`
    pub fn write_to(&self, dir: &Path) -> anyhow::Result<()> {
        for table in &self.tables {
            table.write_csv(dir)?;
        }
        Ok(())
    }
}

/// Generator settings
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub counts: RowCounts,
    /// Anchor instant for every date window; pinning it (together with the
    /// seed) makes output byte-identical across runs
    pub as_of: NaiveDateTime,
}

impl GeneratorConfig {
    pub fn new(seed: u64, rows: usize, as_of: NaiveDateTime) -> Self {
        Self {
            seed,
            counts: RowCounts::uniform(rows),
            as_of,
        }
    }
}

/// Primary-key pools of already-generated tables, the source of every FK
#[derive(Debug, Default)]
struct KeyPools {
    customers: Vec<String>,
    products: Vec<String>,
    suppliers: Vec<String>,
    warehouses: Vec<String>,
    carriers: Vec<String>,
    orders: Vec<String>,
    purchase_orders: Vec<String>,
    shipments: Vec<String>,
    /// product_id -> unit_price, feeds line-item pricing
    unit_prices: AHashMap<String, f64>,
}

/// Main dataset generator
pub struct Generator {
    fake: FakeData<ChaCha8Rng>,
    counts: RowCounts,
    history_start: NaiveDateTime,
    as_of: NaiveDateTime,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            fake: FakeData::new(ChaCha8Rng::seed_from_u64(config.seed)),
            history_start: config.as_of - Duration::days(365 * 3),
            as_of: config.as_of,
            counts: config.counts,
        }
    }

    /// Generate every table, parents before children, and backfill order
    /// totals once the line items exist.
    pub fn generate(&mut self) -> anyhow::Result<Dataset> {
        let order = CatalogGraph::new().generation_order()?;
        let mut pools = KeyPools::default();
        let mut tables = Vec::with_capacity(order.len());

        for id in order {
            let def = catalog::table(id).context("table id out of catalog range")?;
            let table = match def.name {
                "Customers" => self.customers(&mut pools),
                "Products" => self.products(&mut pools),
                "Suppliers" => self.suppliers(&mut pools),
                "Warehouses" => self.warehouses(&mut pools),
                "ShippingCarriers" => self.shipping_carriers(&mut pools),
                "Orders" => self.orders(&mut pools),
                "OrderItems" => self.order_items(&pools),
                "Inventory" => self.inventory(&pools)?,
                "PurchaseOrders" => self.purchase_orders(&mut pools),
                "PurchaseOrderItems" => self.purchase_order_items(&pools),
                "Shipments" => self.shipments(&mut pools),
                "ShipmentTrackingHistory" => self.shipment_tracking_history(&pools),
                other => bail!("no generator for table {}", other),
            };
            tables.push(table);
        }

        let mut dataset = Dataset { tables };
        backfill_order_totals(&mut dataset)?;

        // Report and write in catalog order regardless of topological ties
        dataset.tables.sort_by_key(|t| {
            catalog::table_id(&t.name).map(|id| id.0).unwrap_or(u32::MAX)
        });
        Ok(dataset)
    }

    fn historical_date(&mut self) -> NaiveDateTime {
        self.fake.datetime_between(self.history_start, self.as_of)
    }

    fn future_date(&mut self, days: i64) -> NaiveDateTime {
        self.fake
            .datetime_between(self.as_of, self.as_of + Duration::days(days))
    }

    fn customers(&mut self, pools: &mut KeyPools) -> TableData {
        let count = self.counts.rows_for("Customers");
        let mut table = TableData::new(
            "Customers",
            &[
                "customer_id",
                "name",
                "email",
                "phone",
                "address_line1",
                "city",
                "state",
                "postal_code",
                "country",
                "registered_at",
                "vip_flag",
            ],
        );
        for _ in 0..count {
            let id = self.fake.uuid();
            let first = self.fake.first_name();
            let last = self.fake.last_name();
            let registered = self.historical_date();
            table.rows.push(vec![
                Value::Text(id.clone()),
                Value::Text(format!("{} {}", first, last)),
                Value::Text(self.fake.email(first, last, "example.com")),
                Value::Text(self.fake.phone()),
                Value::Text(self.fake.street_address()),
                Value::Text(self.fake.city()),
                Value::Text(self.fake.state_abbr().to_string()),
                Value::Text(self.fake.postcode()),
                Value::Text("USA".to_string()),
                Value::DateTime(registered),
                Value::Bool(self.fake.bool_with_probability(0.05)),
            ]);
            pools.customers.push(id);
        }
        table
    }

    fn products(&mut self, pools: &mut KeyPools) -> TableData {
        let count = self.counts.rows_for("Products");
        let mut table = TableData::new(
            "Products",
            &[
                "product_id",
                "sku",
                "name",
                "description",
                "category",
                "unit_price",
                "weight_kg",
                "dimensions_cm",
                "active_flag",
                "created_at",
            ],
        );
        for _ in 0..count {
            let id = self.fake.uuid();
            let price = self.fake.price(5.0, 1500.0);
            let dimensions = format!(
                "{}x{}x{}",
                self.fake.int_range(5, 100),
                self.fake.int_range(5, 100),
                self.fake.int_range(5, 100)
            );
            let created = self.historical_date();
            table.rows.push(vec![
                Value::Text(id.clone()),
                Value::Text(self.fake.sku()),
                Value::Text(self.fake.product_name()),
                Value::Text(self.fake.sentence(10)),
                Value::Text(self.fake.pick(CATEGORIES).to_string()),
                Value::Float(price),
                Value::Float(self.fake.price(0.1, 25.0)),
                Value::Text(dimensions),
                Value::Bool(self.fake.bool_with_probability(0.95)),
                Value::DateTime(created),
            ]);
            pools.unit_prices.insert(id.clone(), price);
            pools.products.push(id);
        }
        table
    }

    fn suppliers(&mut self, pools: &mut KeyPools) -> TableData {
        let count = self.counts.rows_for("Suppliers");
        let mut table = TableData::new(
            "Suppliers",
            &[
                "supplier_id",
                "name",
                "contact_name",
                "contact_email",
                "phone",
                "country",
                "lead_time_days",
                "rating",
                "preferred",
            ],
        );
        for _ in 0..count {
            let id = self.fake.uuid();
            let company = self.fake.company_name();
            let first = self.fake.first_name();
            let last = self.fake.last_name();
            let email = self.fake.email(first, last, &company_domain(&company));
            table.rows.push(vec![
                Value::Text(id.clone()),
                Value::Text(company),
                Value::Text(format!("{} {}", first, last)),
                Value::Text(email),
                Value::Text(self.fake.phone()),
                Value::Text("USA".to_string()),
                Value::Int(self.fake.int_range(3, 30)),
                Value::Float(round1(self.fake.float_range(3.5, 5.0))),
                Value::Bool(self.fake.bool_with_probability(0.2)),
            ]);
            pools.suppliers.push(id);
        }
        table
    }

    fn warehouses(&mut self, pools: &mut KeyPools) -> TableData {
        let count = self.counts.rows_for("Warehouses");
        let mut table = TableData::new(
            "Warehouses",
            &[
                "warehouse_id",
                "location_name",
                "address_line1",
                "city",
                "state",
                "postal_code",
                "country",
                "latitude",
                "longitude",
                "capacity",
                "manager_name",
            ],
        );
        for _ in 0..count {
            let id = self.fake.uuid();
            let city = self.fake.city();
            table.rows.push(vec![
                Value::Text(id.clone()),
                Value::Text(format!("{} Distribution Center", city)),
                Value::Text(self.fake.street_address()),
                Value::Text(city),
                Value::Text(self.fake.state_abbr().to_string()),
                Value::Text(self.fake.postcode()),
                Value::Text("USA".to_string()),
                Value::Float(self.fake.latitude()),
                Value::Float(self.fake.longitude()),
                Value::Int(self.fake.int_range(50_000, 200_000)),
                Value::Text(self.fake.full_name()),
            ]);
            pools.warehouses.push(id);
        }
        table
    }

    fn shipping_carriers(&mut self, pools: &mut KeyPools) -> TableData {
        let count = self.counts.rows_for("ShippingCarriers");
        let mut table = TableData::new(
            "ShippingCarriers",
            &[
                "carrier_id",
                "name",
                "tracking_url",
                "phone",
                "service_level",
                "reliability_score",
                "avg_transit_days",
            ],
        );
        for _ in 0..count {
            let id = self.fake.uuid();
            let company = self.fake.company_name();
            let url = format!(
                "https://track.{}/?id=",
                company_domain(&company)
            );
            table.rows.push(vec![
                Value::Text(id.clone()),
                Value::Text(format!("{} Logistics", company)),
                Value::Text(url),
                Value::Text(self.fake.phone()),
                Value::Text(self.fake.pick(SERVICE_LEVELS).to_string()),
                Value::Float(self.fake.price(0.90, 0.99)),
                Value::Int(self.fake.int_range(1, 8)),
            ]);
            pools.carriers.push(id);
        }
        table
    }

    fn orders(&mut self, pools: &mut KeyPools) -> TableData {
        let count = self.counts.rows_for("Orders");
        let mut table = TableData::new(
            "Orders",
            &[
                "order_id",
                "customer_id",
                "order_date",
                "status",
                "total_amount",
                "currency",
                "shipping_address",
                "payment_method",
                "payment_status",
                "fulfillment_warehouse_id",
            ],
        );
        for _ in 0..count {
            let id = self.fake.uuid();
            let address = format!(
                "{} {} {} {}",
                self.fake.street_address(),
                self.fake.city(),
                self.fake.state_abbr(),
                self.fake.postcode()
            );
            let ordered = self.historical_date();
            table.rows.push(vec![
                Value::Text(id.clone()),
                Value::Text(self.fake.pick_key(&pools.customers)),
                Value::DateTime(ordered),
                Value::Text(self.fake.pick(ORDER_STATUSES).to_string()),
                // Placeholder, replaced by the line-item backfill
                Value::Float(0.0),
                Value::Text("USD".to_string()),
                Value::Text(address),
                Value::Text(self.fake.pick(PAYMENT_METHODS).to_string()),
                Value::Text(self.fake.pick(PAYMENT_STATUSES).to_string()),
                Value::Text(self.fake.pick_key(&pools.warehouses)),
            ]);
            pools.orders.push(id);
        }
        table
    }

    fn order_items(&mut self, pools: &KeyPools) -> TableData {
        let count = self.counts.rows_for("OrderItems");
        let mut table = TableData::new(
            "OrderItems",
            &[
                "order_item_id",
                "order_id",
                "product_id",
                "quantity",
                "price_at_time_of_sale",
                "discount",
                "tax_amount",
                "line_total",
            ],
        );
        for _ in 0..count {
            let product_id = self.fake.pick_key(&pools.products);
            let unit_price = pools.unit_prices.get(&product_id).copied().unwrap_or(0.0);
            let quantity = self.fake.int_range(1, 5);
            let line_total = round2(quantity as f64 * unit_price);
            table.rows.push(vec![
                Value::Text(self.fake.uuid()),
                Value::Text(self.fake.pick_key(&pools.orders)),
                Value::Text(product_id),
                Value::Int(quantity),
                Value::Float(unit_price),
                Value::Float(0.0),
                Value::Float(0.0),
                Value::Float(line_total),
            ]);
        }
        table
    }

    /// Unique (warehouse, product) pairs by rejection sampling.
    ///
    /// Infeasible targets fail upfront, and the attempt loop is capped so a
    /// target close to the full cartesian product fails with a diagnostic
    /// instead of degrading into an endless loop.
    fn inventory(&mut self, pools: &KeyPools) -> anyhow::Result<TableData> {
        let target = self.counts.rows_for("Inventory");
        let capacity = pools.warehouses.len().saturating_mul(pools.products.len());
        if target > capacity {
            bail!(
                "Inventory target {} exceeds the {} distinct (warehouse, product) pairs available",
                target,
                capacity
            );
        }

        let max_attempts = target.saturating_mul(20).saturating_add(1000);
        let mut seen: AHashSet<(u32, u32)> = AHashSet::with_capacity(target);
        let mut pairs: Vec<(u32, u32)> = Vec::with_capacity(target);
        let mut attempts = 0usize;
        while pairs.len() < target {
            attempts += 1;
            if attempts > max_attempts {
                bail!(
                    "gave up sampling unique (warehouse, product) pairs after {} attempts \
                     ({} of {} found); the Inventory target is too close to the {} possible pairs",
                    max_attempts,
                    pairs.len(),
                    target,
                    capacity
                );
            }
            let w = self.fake.int_range(0, pools.warehouses.len() as i64 - 1) as u32;
            let p = self.fake.int_range(0, pools.products.len() as i64 - 1) as u32;
            if seen.insert((w, p)) {
                pairs.push((w, p));
            }
        }

        let mut table = TableData::new(
            "Inventory",
            &[
                "warehouse_id",
                "product_id",
                "quantity_on_hand",
                "reorder_level",
                "last_restock_date",
                "safety_stock",
            ],
        );
        for (w, p) in pairs {
            let restocked = self.historical_date();
            table.rows.push(vec![
                Value::Text(pools.warehouses[w as usize].clone()),
                Value::Text(pools.products[p as usize].clone()),
                Value::Int(self.fake.int_range(0, 2000)),
                Value::Int(self.fake.int_range(20, 100)),
                Value::DateTime(restocked),
                Value::Int(self.fake.int_range(10, 50)),
            ]);
        }
        Ok(table)
    }

    fn purchase_orders(&mut self, pools: &mut KeyPools) -> TableData {
        let count = self.counts.rows_for("PurchaseOrders");
        let mut table = TableData::new(
            "PurchaseOrders",
            &[
                "po_id",
                "supplier_id",
                "warehouse_id",
                "po_date",
                "expected_delivery_date",
                "status",
                "total_cost",
                "created_by",
            ],
        );
        for _ in 0..count {
            let id = self.fake.uuid();
            let ordered = self.historical_date();
            let expected = self.future_date(30);
            table.rows.push(vec![
                Value::Text(id.clone()),
                Value::Text(self.fake.pick_key(&pools.suppliers)),
                Value::Text(self.fake.pick_key(&pools.warehouses)),
                Value::DateTime(ordered),
                Value::DateTime(expected),
                Value::Text(self.fake.pick(PO_STATUSES).to_string()),
                Value::Float(self.fake.price(500.0, 50_000.0)),
                Value::Text(self.fake.full_name()),
            ]);
            pools.purchase_orders.push(id);
        }
        table
    }

    fn purchase_order_items(&mut self, pools: &KeyPools) -> TableData {
        let count = self.counts.rows_for("PurchaseOrderItems");
        let mut table = TableData::new(
            "PurchaseOrderItems",
            &[
                "po_item_id",
                "po_id",
                "product_id",
                "quantity",
                "unit_cost",
                "expected_recv_date",
                "received_qty",
                "line_total",
            ],
        );
        for _ in 0..count {
            let product_id = self.fake.pick_key(&pools.products);
            let unit_price = pools.unit_prices.get(&product_id).copied().unwrap_or(0.0);
            // Wholesale cost is a fraction of the retail unit price
            let unit_cost = round2(unit_price * self.fake.float_range(0.4, 0.7));
            let quantity = self.fake.int_range(50, 1000);
            let expected = self.future_date(30);
            table.rows.push(vec![
                Value::Text(self.fake.uuid()),
                Value::Text(self.fake.pick_key(&pools.purchase_orders)),
                Value::Text(product_id),
                Value::Int(quantity),
                Value::Float(unit_cost),
                Value::DateTime(expected),
                Value::Int(0),
                Value::Float(round2(quantity as f64 * unit_cost)),
            ]);
        }
        table
    }

    fn shipments(&mut self, pools: &mut KeyPools) -> TableData {
        let count = self.counts.rows_for("Shipments");
        let mut table = TableData::new(
            "Shipments",
            &[
                "shipment_id",
                "order_id",
                "carrier_id",
                "tracking_number",
                "dispatch_date",
                "estimated_arrival",
                "actual_arrival",
                "shipping_cost",
                "origin_warehouse_id",
                "status",
            ],
        );
        for _ in 0..count {
            let id = self.fake.uuid();
            let dispatched = self.historical_date();
            let estimated = self.future_date(10);
            let actual = self.future_date(12);
            table.rows.push(vec![
                Value::Text(id.clone()),
                Value::Text(self.fake.pick_key(&pools.orders)),
                Value::Text(self.fake.pick_key(&pools.carriers)),
                Value::Text(self.fake.tracking_number()),
                Value::DateTime(dispatched),
                Value::DateTime(estimated),
                Value::DateTime(actual),
                Value::Float(self.fake.price(5.0, 100.0)),
                Value::Text(self.fake.pick_key(&pools.warehouses)),
                Value::Text(self.fake.pick(SHIPMENT_STATUSES).to_string()),
            ]);
            pools.shipments.push(id);
        }
        table
    }

    fn shipment_tracking_history(&mut self, pools: &KeyPools) -> TableData {
        let count = self.counts.rows_for("ShipmentTrackingHistory");
        let mut table = TableData::new(
            "ShipmentTrackingHistory",
            &[
                "tracking_history_id",
                "shipment_id",
                "timestamp",
                "status_description",
                "location",
            ],
        );
        for _ in 0..count {
            let seen_at = self.historical_date();
            let location = format!("{} {}", self.fake.city(), self.fake.state_abbr());
            table.rows.push(vec![
                Value::Text(self.fake.uuid()),
                Value::Text(self.fake.pick_key(&pools.shipments)),
                Value::DateTime(seen_at),
                Value::Text(self.fake.pick(TRACKING_EVENTS).to_string()),
                Value::Text(location),
            ]);
        }
        table
    }
}

/// Group line items by order and write the rounded sums back onto Orders.
/// Orders with no matching items keep 0.0.
fn backfill_order_totals(dataset: &mut Dataset) -> anyhow::Result<()> {
    let totals: AHashMap<String, f64> = {
        let items = dataset
            .table("OrderItems")
            .context("OrderItems table missing")?;
        let order_idx = items
            .column_index("order_id")
            .context("OrderItems has no order_id column")?;
        let total_idx = items
            .column_index("line_total")
            .context("OrderItems has no line_total column")?;

        let mut totals = AHashMap::new();
        for row in &items.rows {
            if let (Some(Value::Text(order_id)), Some(Value::Float(line_total))) =
                (row.get(order_idx), row.get(total_idx))
            {
                *totals.entry(order_id.clone()).or_insert(0.0) += line_total;
            }
        }
        totals
    };

    let orders = dataset.table_mut("Orders").context("Orders table missing")?;
    let id_idx = orders
        .column_index("order_id")
        .context("Orders has no order_id column")?;
    let amount_idx = orders
        .column_index("total_amount")
        .context("Orders has no total_amount column")?;

    for row in &mut orders.rows {
        let total = match row.get(id_idx) {
            Some(Value::Text(id)) => totals.get(id).copied().unwrap_or(0.0),
            _ => 0.0,
        };
        row[amount_idx] = Value::Float(round2(total));
    }
    Ok(())
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Lowercased alphanumeric company name + ".com"
fn company_domain(company: &str) -> String {
    let slug: String = company
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("{}.com", slug)
}
