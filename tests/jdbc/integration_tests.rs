//! Relational round trips against a throwaway SQLite database file, so no
//! external server is needed.

use anyhow::Context;
use conduit_connectors::{
    ColumnDefinition, ColumnType, Conduit, ConduitError, ContextProperty, DataContext, Dataset,
    Record, SourceType, Value,
};
use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database};
use std::path::PathBuf;

const CREATE_TABLE: &str = r#"
    CREATE TABLE people (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        age INTEGER,
        city TEXT,
        email TEXT
    )
"#;

struct TempDb {
    path: PathBuf,
}

impl TempDb {
    async fn create() -> anyhow::Result<Self> {
        Self::create_with(&[CREATE_TABLE]).await
    }

    async fn create_with(statements: &[&str]) -> anyhow::Result<Self> {
        let _ = env_logger::builder().is_test(true).try_init();
        let path = std::env::temp_dir().join(format!("conduit-{}.db", uuid::Uuid::new_v4()));
        let db = Database::connect(format!("sqlite://{}?mode=rwc", path.display()))
            .await
            .context("create sqlite db")?;
        for sql in statements {
            db.execute_unprepared(sql).await?;
        }
        db.close().await?;
        Ok(Self { path })
    }

    fn url(&self) -> String {
        format!("jdbc:sqlite://{}?mode=rwc", self.path.display())
    }

    fn target(&self, use_bind_variables: &str) -> DataContext {
        DataContext::builder(SourceType::Jdbc, self.url())
            .driver("sqlite")
            .property(ContextProperty::TargetTable, "people")
            .property(ContextProperty::UseBindVariables, use_bind_variables)
            .build()
    }

    fn query(&self, sql: &str) -> DataContext {
        DataContext::builder(SourceType::Jdbc, self.url())
            .driver("sqlite")
            .query(sql)
            .build()
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.path).ok();
    }
}

fn people() -> Dataset {
    vec![
        Record::new()
            .with("id", 100)
            .with("name", "ann")
            .with("age", 41)
            .with("city", "Oslo")
            .with("email", "ann@example.com"),
        Record::new()
            .with("id", 200)
            .with("name", "bob")
            .with("age", 38)
            .with("city", "Bergen")
            .with("email", None::<String>),
    ]
    .into_iter()
    .collect()
}

fn text(record: &Record, column: &str) -> String {
    record.get(column).map(Value::to_string).unwrap_or_default()
}

async fn assert_people_written(db: &TempDb, conduit: &Conduit) -> anyhow::Result<()> {
    let rows = conduit
        .retrieve(&db.query("select id, name, age, city, email from people order by id"))
        .await?;
    assert_eq!(rows.len(), 2);

    // ids come from the table, not from the dataset
    assert_eq!(text(&rows[0], "id"), "1");
    assert_eq!(text(&rows[0], "name"), "ann");
    assert_eq!(text(&rows[0], "age"), "41");
    assert_eq!(text(&rows[0], "city"), "Oslo");
    assert_eq!(text(&rows[0], "email"), "ann@example.com");
    assert_eq!(text(&rows[1], "city"), "Bergen");
    assert_eq!(rows[1].get("email"), Some(&Value::Null));
    Ok(())
}

#[tokio::test]
async fn positional_insert_binds_every_non_id_column() -> anyhow::Result<()> {
    let db = TempDb::create().await?;
    let conduit = Conduit::with_defaults();

    conduit.insert_dataset(&db.target("false"), &people()).await?;
    assert_people_written(&db, &conduit).await
}

#[tokio::test]
async fn named_insert_binds_every_non_id_column() -> anyhow::Result<()> {
    let db = TempDb::create().await?;
    let conduit = Conduit::with_defaults();

    conduit.insert_dataset(&db.target("true"), &people()).await?;
    assert_people_written(&db, &conduit).await
}

#[tokio::test]
async fn id_column_is_excluded_wherever_it_sits() -> anyhow::Result<()> {
    let db = TempDb::create().await?;
    let conduit = Conduit::with_defaults();

    let mut ds = Dataset::new();
    for (ordinal, name) in ["name", "ID", "city", "age", "email"].iter().enumerate() {
        ds.add_column_definition(ColumnDefinition::new(*name, ColumnType::String, ordinal + 1));
    }
    ds.add_record(
        Record::new()
            .with("name", "cy")
            .with("ID", 9)
            .with("city", "Tromsø")
            .with("age", 27)
            .with("email", "cy@example.com"),
    );
    conduit.insert_dataset(&db.target("false"), &ds).await?;

    let rows = conduit
        .retrieve(&db.query("select id, name, age, city, email from people"))
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(text(&rows[0], "id"), "1");
    assert_eq!(text(&rows[0], "city"), "Tromsø");
    assert_eq!(text(&rows[0], "age"), "27");
    Ok(())
}

#[tokio::test]
async fn retrieve_dataset_builds_columns_from_query_labels() -> anyhow::Result<()> {
    let db = TempDb::create().await?;
    let conduit = Conduit::with_defaults();
    conduit.insert_dataset(&db.target("false"), &people()).await?;

    let ds = conduit
        .retrieve_dataset(&db.query("select name, city as town from people order by id"))
        .await?;
    let names: Vec<_> = ds
        .column_definitions()
        .iter()
        .map(|d| (d.name.as_str(), d.ordinal))
        .collect();
    assert_eq!(names, vec![("name", 1), ("town", 2)]);
    assert_eq!(ds.len(), 2);
    Ok(())
}

#[cfg(feature = "csv")]
#[tokio::test]
async fn csv_source_replays_into_table() -> anyhow::Result<()> {
    let db = TempDb::create().await?;
    let csv_path = std::env::temp_dir().join(format!("conduit-{}.csv", uuid::Uuid::new_v4()));
    std::fs::write(
        &csv_path,
        "7|ann|41|Oslo|ann@example.com\n8|bob|38|Bergen|bob@example.com\n",
    )?;

    let source = DataContext::builder(SourceType::Csv, format!("file:{}", csv_path.display()))
        .property(ContextProperty::Delimiter, "|")
        .property(ContextProperty::Columns, "id, name, age, city, email")
        .build();
    let conduit = Conduit::with_defaults();
    let summary = conduit.transfer(&source, &db.target("false")).await;
    std::fs::remove_file(&csv_path).ok();
    let summary = summary?;

    assert_eq!(summary.records, 2);
    assert_eq!(summary.columns, 5);
    let rows = conduit
        .retrieve(&db.query("select name, city from people order by id"))
        .await?;
    assert_eq!(text(&rows[1], "name"), "bob");
    assert_eq!(text(&rows[1], "city"), "Bergen");
    Ok(())
}

#[tokio::test]
async fn insert_into_missing_table_is_a_source_error() -> anyhow::Result<()> {
    let db = TempDb::create().await?;
    let target = DataContext::builder(SourceType::Jdbc, db.url())
        .driver("sqlite")
        .property(ContextProperty::TargetTable, "nobody")
        .build();

    let err = Conduit::with_defaults()
        .insert_dataset(&target, &people())
        .await
        .expect_err("missing table");
    assert!(matches!(err, ConduitError::Source { .. }), "{err}");
    Ok(())
}

#[tokio::test]
async fn numeric_and_decimal_columns_are_kept() -> anyhow::Result<()> {
    let db = TempDb::create_with(&[
        "CREATE TABLE prices (id INTEGER, price NUMERIC, amount DECIMAL(10,2), data BLOB)",
        "INSERT INTO prices VALUES (1, 9.5, 12.25, X'00FF')",
    ])
    .await?;
    let conduit = Conduit::with_defaults();

    let rows = conduit
        .retrieve(&db.query("select id, price, amount from prices"))
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].names().collect::<Vec<_>>(), vec!["id", "price", "amount"]);
    assert_eq!(rows[0].get("price"), Some(&Value::Float(9.5)));
    assert_eq!(rows[0].get("amount"), Some(&Value::Float(12.25)));
    Ok(())
}

#[tokio::test]
async fn undecodable_column_is_a_source_error_naming_it() -> anyhow::Result<()> {
    let db = TempDb::create_with(&[
        "CREATE TABLE blobs (id INTEGER, data BLOB)",
        "INSERT INTO blobs VALUES (1, X'00FF')",
    ])
    .await?;

    let err = Conduit::with_defaults()
        .retrieve(&db.query("select id, data from blobs"))
        .await
        .expect_err("blob has no scalar form");
    assert!(matches!(err, ConduitError::Source { .. }), "{err}");
    assert!(err.to_string().contains("data"), "{err}");
    Ok(())
}

#[tokio::test]
async fn datetime_columns_read_as_datetime() -> anyhow::Result<()> {
    let db = TempDb::create_with(&[
        "CREATE TABLE events (id INTEGER, created DATETIME)",
        "INSERT INTO events VALUES (1, '2023-05-01 12:30:00')",
    ])
    .await?;

    let ds = Conduit::with_defaults()
        .retrieve_dataset(&db.query("select id, created from events"))
        .await?;
    let created = ds.column_definition("created").context("created column")?;
    assert_eq!(created.runtime_type, ColumnType::DateTime);

    let expected = NaiveDate::from_ymd_opt(2023, 5, 1)
        .and_then(|d| d.and_hms_opt(12, 30, 0))
        .context("valid timestamp")?;
    assert_eq!(ds.records()[0].get("created"), Some(&Value::DateTime(expected)));
    Ok(())
}

#[tokio::test]
async fn typed_values_survive_a_table_to_table_replay() -> anyhow::Result<()> {
    let db = TempDb::create_with(&[
        "CREATE TABLE src (id INTEGER PRIMARY KEY, created DATETIME, amount NUMERIC, note TEXT)",
        "CREATE TABLE dst (id INTEGER PRIMARY KEY AUTOINCREMENT, created DATETIME, amount NUMERIC, note TEXT)",
        "INSERT INTO src VALUES (1, '2023-05-01 12:30:00', 12.25, NULL)",
        "INSERT INTO src VALUES (2, NULL, NULL, 'late')",
    ])
    .await?;
    let conduit = Conduit::with_defaults();

    let ds = conduit
        .retrieve_dataset(&db.query("select id, created, amount, note from src order by id"))
        .await?;
    let target = DataContext::builder(SourceType::Jdbc, db.url())
        .driver("sqlite")
        .property(ContextProperty::TargetTable, "dst")
        .build();
    conduit.insert_dataset(&target, &ds).await?;

    let copied = conduit
        .retrieve_dataset(&db.query("select created, amount, note from dst order by id"))
        .await?;
    let expected: Vec<Record> = ds.records().iter().map(without_id).collect();
    assert_eq!(copied.records(), expected.as_slice());
    assert_eq!(
        copied.column_definition("created").map(|d| d.runtime_type),
        Some(ColumnType::DateTime)
    );
    Ok(())
}

fn without_id(record: &Record) -> Record {
    record
        .iter()
        .filter(|(name, _)| *name != "id")
        .map(|(name, value)| (name, value.clone()))
        .collect()
}

#[tokio::test]
async fn unknown_protocol_is_not_found() {
    let ctx = DataContext::builder(SourceType::Jdbc, "odbc:dsn=people")
        .driver("sqlite")
        .query("select 1")
        .build();
    let err = Conduit::with_defaults()
        .retrieve(&ctx)
        .await
        .expect_err("odbc is not a known protocol");
    assert!(err.is_not_found());
}
