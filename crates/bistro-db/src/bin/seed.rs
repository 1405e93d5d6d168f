//! # Demo Café Seeder
//!
//! Populates a database with a small café for development and demos.
//!
//! ## Usage
//! ```bash
//! # Seed ./bistro_dev.db with a week of records ending yesterday
//! cargo run -p bistro-db --bin seed
//!
//! # Longer history, custom path
//! cargo run -p bistro-db --bin seed -- --days 21 --db ./data/bistro.db
//! ```
//!
//! ## Generated Data
//! - Categories: Coffee, Bakery, Dairy
//! - Products with units and costs, menu items with recipes
//! - Positions, employees (one with a personal rate)
//! - Morning and evening shift templates, shifts for every seeded day
//! - One closed daily record per day with counts, deliveries, sales and
//!   expenses; every third day is a little short on milk

use std::env;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use bistro_core::{
    Category, Employee, Expense, ExpenseCategory, InventoryReceipt, Position, Product, SaleEntry,
    SalesItem, Shift, ShiftStatus, ShiftTemplate, SnapshotKind, Unit, WeekdaySet,
};
use bistro_db::repository::generate_id;
use bistro_db::{Database, DbConfig};

type SeedResult<T> = Result<T, Box<dyn std::error::Error>>;

/// (name, category, unit, cost per unit in cents, par stock in thousandths)
const PRODUCTS: &[(&str, &str, Unit, i64, i64)] = &[
    ("Coffee beans", "Coffee", Unit::Kilogram, 2400, 3_000),
    ("Milk", "Dairy", Unit::Liter, 120, 20_000),
    ("Croissant dough", "Bakery", Unit::Piece, 45, 40_000),
    ("Paper cups", "Coffee", Unit::Piece, 6, 300_000),
];

/// (name, category, price in cents, recipe as (product, thousandths))
const MENU: &[(&str, &str, i64, &[(&str, i64)])] = &[
    ("Espresso", "Coffee", 300, &[("Coffee beans", 18), ("Paper cups", 1_000)]),
    ("Cappuccino", "Coffee", 420, &[("Coffee beans", 18), ("Milk", 150), ("Paper cups", 1_000)]),
    ("Latte", "Coffee", 450, &[("Coffee beans", 18), ("Milk", 220), ("Paper cups", 1_000)]),
    ("Croissant", "Bakery", 350, &[("Croissant dough", 1_000)]),
];

/// Cups of each menu item sold on a typical day.
const DAILY_SALES: &[(&str, i64)] = &[
    ("Espresso", 35),
    ("Cappuccino", 40),
    ("Latte", 30),
    ("Croissant", 25),
];

fn time(h: u32, m: u32) -> SeedResult<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0).ok_or_else(|| format!("invalid time {h}:{m}").into())
}

fn find<'a, T>(items: &'a [T], name: &str, key: impl Fn(&T) -> &str) -> SeedResult<&'a T> {
    items
        .iter()
        .find(|item| key(item) == name)
        .ok_or_else(|| format!("unknown seed entry {name}").into())
}

#[tokio::main]
async fn main() -> SeedResult<()> {
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 7;
    let mut db_path = String::from("./bistro_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(7);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bistro demo café seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of history to generate (default: 7)");
                println!("  -d, --db <PATH>    Database file path (default: ./bistro_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Bistro demo café seeder");
    println!("=======================");
    println!("Database: {}", db_path);
    println!("Days:     {}", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let products = seed_catalog(&db).await?;
    let employees = seed_staff(&db).await?;
    let templates = seed_templates(&db).await?;

    let today = Utc::now().date_naive();
    let first = today - Duration::days(days.max(1));
    for offset in 0..days.max(1) {
        let day = first + Duration::days(offset);
        seed_day(&db, day, offset, &products).await?;
        seed_shifts(&db, day, &employees, &templates).await?;
    }
    println!("✓ {} closed business days", days.max(1));

    println!();
    println!("✓ Seed complete!");
    Ok(())
}

async fn seed_catalog(db: &Database) -> SeedResult<Vec<Product>> {
    let now = Utc::now();
    let mut categories = Vec::new();
    for (sort_order, name) in ["Coffee", "Bakery", "Dairy"].iter().enumerate() {
        let category = Category {
            id: generate_id(),
            name: name.to_string(),
            description: None,
            sort_order: sort_order as i64,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        categories.push(db.categories().insert(&category).await?);
    }

    let mut products = Vec::new();
    for (name, category, unit, cost_cents, _) in PRODUCTS {
        let category = find(&categories, category, |c| c.name.as_str())?;
        let product = Product {
            id: generate_id(),
            category_id: Some(category.id.clone()),
            name: name.to_string(),
            unit: *unit,
            cost_cents: *cost_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        products.push(db.products().insert(&product).await?);
    }

    for (name, category, price_cents, recipe) in MENU {
        let category = find(&categories, category, |c| c.name.as_str())?;
        let item = SalesItem {
            id: generate_id(),
            category_id: Some(category.id.clone()),
            name: name.to_string(),
            price_cents: *price_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.sales_items().insert(&item).await?;

        let mut components = Vec::new();
        for (product_name, milli) in recipe.iter() {
            let product = find(&products, product_name, |p| p.name.as_str())?;
            components.push((product.id.clone(), *milli));
        }
        db.sales_items().set_recipe(&item.id, &components).await?;
    }

    println!("✓ {} products, {} menu items", products.len(), MENU.len());
    Ok(products)
}

async fn seed_staff(db: &Database) -> SeedResult<Vec<Employee>> {
    let now = Utc::now();
    let hired_on = NaiveDate::from_ymd_opt(2025, 9, 1).ok_or("invalid hire date")?;

    let mut positions = Vec::new();
    for (name, rate) in [("Barista", 1600), ("Baker", 1800)] {
        let position = Position {
            id: generate_id(),
            name: name.to_string(),
            hourly_rate_cents: rate,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        positions.push(db.positions().insert(&position).await?);
    }

    let staff = [
        ("Olena Kovalenko", "Barista", Some(1900)),
        ("Taras Melnyk", "Barista", None),
        ("Iryna Shevchenko", "Baker", None),
    ];

    let mut employees = Vec::new();
    for (name, position, rate) in staff {
        let position = find(&positions, position, |p| p.name.as_str())?;
        let employee = Employee {
            id: generate_id(),
            full_name: name.to_string(),
            position_id: position.id.clone(),
            hourly_rate_cents: rate,
            phone: None,
            hired_on,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        employees.push(db.employees().insert(&employee).await?);
    }

    println!("✓ {} positions, {} employees", positions.len(), employees.len());
    Ok(employees)
}

async fn seed_templates(db: &Database) -> SeedResult<Vec<ShiftTemplate>> {
    let now = Utc::now();
    let mut templates = Vec::new();
    for (name, start, end) in [("Morning", time(7, 0)?, time(15, 0)?), ("Evening", time(14, 0)?, time(22, 0)?)] {
        let template = ShiftTemplate {
            id: generate_id(),
            name: name.to_string(),
            position_id: None,
            weekday_mask: i64::from(WeekdaySet::ALL.mask()),
            start_time: start,
            end_time: end,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        templates.push(db.shifts().insert_template(&template).await?);
    }
    Ok(templates)
}

async fn seed_shifts(
    db: &Database,
    day: NaiveDate,
    employees: &[Employee],
    templates: &[ShiftTemplate],
) -> SeedResult<()> {
    let now = Utc::now();
    let shifts: Vec<Shift> = employees
        .iter()
        .enumerate()
        .map(|(i, employee)| {
            let template = &templates[i % templates.len()];
            Shift {
                id: generate_id(),
                employee_id: employee.id.clone(),
                template_id: Some(template.id.clone()),
                shift_date: day,
                start_time: template.start_time,
                end_time: template.end_time,
                status: ShiftStatus::Completed,
                actual_minutes: None,
                notes: None,
                created_at: now,
                updated_at: now,
            }
        })
        .collect();

    db.shifts().insert_many(&shifts).await?;
    Ok(())
}

async fn seed_day(db: &Database, day: NaiveDate, offset: i64, products: &[Product]) -> SeedResult<()> {
    let journal = db.daily_records();
    let record = journal.open_day(day, offset > 0, None).await?;
    let now = Utc::now();

    if offset == 0 {
        let mut opening = Vec::new();
        for (name, _, _, _, par) in PRODUCTS {
            let product = find(products, name, |p| p.name.as_str())?;
            opening.push((product.id.clone(), *par));
        }
        journal
            .upsert_snapshots(&record.id, SnapshotKind::Opening, &opening)
            .await?;
    }

    let mut sold = Vec::new();
    for item in db.sales_items().list(false).await? {
        let base = find(DAILY_SALES, &item.name, |entry| entry.0)?.1;
        let quantity = base + (offset * 7 + item.name.len() as i64) % 9;
        journal
            .add_sale(&SaleEntry {
                id: generate_id(),
                daily_record_id: record.id.clone(),
                sales_item_id: item.id.clone(),
                quantity,
                unit_price_cents: item.price_cents,
                recorded_at: now,
            })
            .await?;
        sold.push((item.id, quantity));
    }

    // Restock everything back to par and count what is left
    let recipes = db.sales_items().all_recipes().await?;
    let counts: Vec<(String, i64)> = journal
        .snapshots(&record.id)
        .await?
        .into_iter()
        .filter(|s| s.kind == SnapshotKind::Opening)
        .map(|s| (s.product_id, s.quantity_milli))
        .collect();

    let mut closing = Vec::new();
    for (product_id, opening) in counts {
        let used: i64 = sold
            .iter()
            .flat_map(|(item_id, qty)| {
                recipes
                    .get(item_id)
                    .into_iter()
                    .flatten()
                    .filter(|c| c.product_id == product_id)
                    .map(move |c| c.quantity_milli * qty)
            })
            .sum();

        let product = products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or("counted product missing")?;
        let par = find(PRODUCTS, &product.name, |entry| entry.0)?.4;
        let delivered = (par - opening + used).max(0);
        if delivered > 0 {
            journal
                .add_receipt(&InventoryReceipt {
                    id: generate_id(),
                    daily_record_id: record.id.clone(),
                    product_id: product_id.clone(),
                    quantity_milli: delivered,
                    cost_cents: product.cost_cents * delivered / 1000,
                    supplier: Some("Central Wholesale".to_string()),
                    received_at: now,
                })
                .await?;
        }

        let shrink = if product.name == "Milk" && offset % 3 == 2 { 1_500 } else { 0 };
        closing.push((product_id, opening + delivered - used - shrink));
    }
    journal
        .upsert_snapshots(&record.id, SnapshotKind::Closing, &closing)
        .await?;

    journal
        .add_expense(&Expense {
            id: generate_id(),
            daily_record_id: record.id.clone(),
            category: ExpenseCategory::Supplies,
            description: "Napkins and stirrers".to_string(),
            amount_cents: 1_250,
            created_at: now,
        })
        .await?;

    journal.close_day(&record.id).await?;
    Ok(())
}
