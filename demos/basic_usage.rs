//! # Basic Usage Example
//!
//! Walks through the everyday minorm calls against a local MySQL server:
//! - Describing a model with `ModelDescriptor`
//! - Creating, reading, updating and deleting rows with keyword filters
//! - Paging and counting
//! - A locked update inside a transaction
//!
//! Needs a database named `test`. Override the connection with `DATABASE_URL`.

use minorm::prelude::*;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 minorm Basic Usage Example");
    println!("=============================");

    // 1. Setup Database Connection
    println!("\n📊 Step 1: Database Setup");
    let conn = match std::env::var("DATABASE_URL") {
        Ok(url) => MySqlConnection::connect(&url)?,
        Err(_) => {
            let config = DatabaseConfig::new(
                "localhost".to_string(),
                3306,
                "test".to_string(),
                "root".to_string(),
                "toor".to_string(),
                30, // connection_timeout_seconds
            )
            .with_init_statements(vec!["SET NAMES utf8mb4".to_string()]);
            MySqlConnection::from_config(&config)?
        }
    };
    let conn = Arc::new(conn);

    conn.execute(
        "DROP TABLE IF EXISTS `test_orm`;CREATE TABLE `test_orm` (`id` int NOT NULL AUTO_INCREMENT,\
         `name` varchar(128),`content` varchar(64),`type` tinyint(2) DEFAULT 1,\
         PRIMARY KEY (`id`)) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
        &[],
    )?;
    println!("✅ Created table `test_orm`");

    let descriptor =
        ModelDescriptor::new("test_orm", ["id", "name", "content", "type"])?.with_echo(true);
    let tests = Model::new(descriptor, conn);

    // 2. CREATE
    println!("\n📝 Step 2: Creating Records");
    let mut record = tests.create(fields! { "name" => "test0", "content" => "test", "type" => 0 })?;
    println!("✅ Created record {:?}", record.id());

    let batch: Vec<Fields> = (1..=5)
        .map(|i| fields! { "name" => format!("test{}", i), "content" => "batch" })
        .collect();
    let inserted = tests.insert_many(&batch)?;
    println!("✅ Inserted {:?} more rows", inserted);

    // 3. READ
    println!("\n🔍 Step 3: Reading Records");
    let found = tests.get(&QueryBuilder::new().filter("name", "test0"))?;
    println!("✅ get(name = test0) -> {:?}", found.map(|r| r.to_map(None)));

    let matching = tests.find(
        &QueryBuilder::new()
            .filter("content__like", "bat")
            .filter("type__ge", 1)
            .order_by("id DESC"),
    )?;
    println!("✅ {} rows match content LIKE %bat%", matching.len());

    let second_page = tests.page(2, Some(4), &QueryBuilder::new().order_by("id"))?;
    let total = tests.count(&QueryBuilder::new())?;
    println!("✅ Page 2 holds {} of {} rows", second_page.len(), total);

    // 4. UPDATE
    println!("\n✏️  Step 4: Updating Records");
    record.update(fields! { "content" => "updated" })?;
    record.set("type", 3)?;
    record.save()?;
    println!("✅ Record now reads {}", minorm::serde_json::to_string(&record)?);

    let changed = tests.update_where(
        &fields! { "type" => 2 },
        &fields! { "name" => ["test1", "test2"] },
        None,
    )?;
    println!("✅ update_where touched {} rows", changed);

    // 5. TRANSACTION
    println!("\n🔒 Step 5: Locked Update in a Transaction");
    tests.begin()?;
    match tests.update_where_locked(
        &fields! { "name" => "test3-locked" },
        &fields! { "name" => "test3" },
        None,
    ) {
        Ok(rows) => {
            tests.commit()?;
            println!("✅ Committed locked update of {} rows", rows);
        }
        Err(e) => {
            tests.rollback()?;
            println!("⚠️  Rolled back: {}", e);
        }
    }

    // 6. DELETE
    println!("\n🗑️  Step 6: Deleting Records");
    let deleted = tests.delete_where(&fields! { "content" => "batch" }, None)?;
    println!("✅ Deleted {} rows", deleted);
    println!("✅ {} rows remain", tests.count(&QueryBuilder::new())?);

    println!("\n🎉 Done");
    Ok(())
}
