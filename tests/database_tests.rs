#![cfg(feature = "sqlite")]

use std::sync::Arc;

use customers::customer::NewCustomer;
use customers::errors::{CustomerError, CustomerResult};
use customers::server::{CustomerStore, Database};

/// Helper: in-memory SQLite database with the customers table.
async fn setup_in_memory_db() -> CustomerResult<Arc<Database>> {
    let db = Database::connect("sqlite::memory:").await?;
    db.ensure_schema().await?;
    Ok(db)
}

fn new_customer(name: &str, status: &str) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        status: status.to_string(),
    }
}

#[tokio::test]
async fn insert_assigns_increasing_ids() -> CustomerResult<()> {
    let db = setup_in_memory_db().await?;

    let alice = db.insert_customer(&new_customer("Alice", "active")).await?;
    let bob = db.insert_customer(&new_customer("Bob", "active")).await?;

    assert!(alice.id > 0);
    assert!(bob.id > alice.id);
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.email, "alice@example.com");

    Ok(())
}

#[tokio::test]
async fn get_returns_none_for_missing_row() -> CustomerResult<()> {
    let db = setup_in_memory_db().await?;

    assert!(db.get_customer(1).await?.is_none());

    let alice = db.insert_customer(&new_customer("Alice", "active")).await?;
    assert_eq!(db.get_customer(alice.id).await?, Some(alice));

    Ok(())
}

#[tokio::test]
async fn list_returns_rows_in_id_order() -> CustomerResult<()> {
    let db = setup_in_memory_db().await?;
    assert!(db.list_customers().await?.is_empty());

    let alice = db.insert_customer(&new_customer("Alice", "active")).await?;
    let bob = db.insert_customer(&new_customer("Bob", "blocked")).await?;

    assert_eq!(db.list_customers().await?, vec![alice, bob]);

    Ok(())
}

#[tokio::test]
async fn update_overwrites_and_reports_missing_rows() -> CustomerResult<()> {
    let db = setup_in_memory_db().await?;
    let mut alice = db.insert_customer(&new_customer("Alice", "active")).await?;

    alice.status = "inactive".to_string();
    alice.email = "alice@corp.example".to_string();
    assert!(db.update_customer(&alice).await?);
    assert_eq!(db.get_customer(alice.id).await?, Some(alice.clone()));

    alice.id += 100;
    assert!(!db.update_customer(&alice).await?);

    Ok(())
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed() -> CustomerResult<()> {
    let db = setup_in_memory_db().await?;
    let alice = db.insert_customer(&new_customer("Alice", "active")).await?;

    assert!(db.delete_customer(alice.id).await?);
    assert!(!db.delete_customer(alice.id).await?);
    assert!(db.get_customer(alice.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() -> CustomerResult<()> {
    let db = setup_in_memory_db().await?;

    let first = db.insert_customer(&new_customer("Alice", "active")).await?;
    db.delete_customer(first.id).await?;
    let second = db.insert_customer(&new_customer("Bob", "active")).await?;

    assert!(second.id > first.id);

    Ok(())
}

#[tokio::test]
async fn ensure_schema_is_idempotent() -> CustomerResult<()> {
    let db = setup_in_memory_db().await?;
    let alice = db.insert_customer(&new_customer("Alice", "active")).await?;

    db.ensure_schema().await?;
    db.ensure_schema().await?;

    assert_eq!(db.list_customers().await?, vec![alice]);

    Ok(())
}

#[tokio::test]
async fn null_text_columns_read_as_empty() -> CustomerResult<()> {
    let db = setup_in_memory_db().await?;

    match &*db {
        Database::SQLite(pool) => {
            sqlx::query("INSERT INTO customers (name) VALUES ('Legacy')")
                .execute(pool)
                .await
                .map_err(|e| CustomerError::DatabaseError(e.to_string()))?;
        }
        #[allow(unreachable_patterns)]
        _ => panic!("expected SQLite"),
    }

    let customers = db.list_customers().await?;
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].name, "Legacy");
    assert_eq!(customers[0].email, "");
    assert_eq!(customers[0].status, "");

    Ok(())
}

#[tokio::test]
async fn storage_failures_surface_as_database_errors() -> CustomerResult<()> {
    let db = setup_in_memory_db().await?;

    match &*db {
        Database::SQLite(pool) => {
            sqlx::query("DROP TABLE customers")
                .execute(pool)
                .await
                .map_err(|e| CustomerError::DatabaseError(e.to_string()))?;
        }
        #[allow(unreachable_patterns)]
        _ => panic!("expected SQLite"),
    }

    let err = db.delete_customer(1).await.unwrap_err();
    assert!(matches!(err, CustomerError::DatabaseError(ref msg) if msg.contains("customers")));

    let err = db.get_customer(1).await.unwrap_err();
    assert!(matches!(err, CustomerError::DatabaseError(_)));

    Ok(())
}

#[tokio::test]
async fn unknown_scheme_is_a_config_error() {
    let err = Database::connect("mysql://localhost/customers")
        .await
        .unwrap_err();
    assert!(matches!(err, CustomerError::ConfigError(_)));
}

#[tokio::test]
async fn file_database_is_created_when_missing() -> CustomerResult<()> {
    let path = std::env::temp_dir().join(format!("customers-test-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let db = Database::connect(&format!("sqlite://{}", path.display())).await?;
    db.ensure_schema().await?;
    let alice = db.insert_customer(&new_customer("Alice", "active")).await?;
    db.close().await;

    let reopened = Database::connect(&format!("sqlite://{}", path.display())).await?;
    assert_eq!(reopened.get_customer(alice.id).await?, Some(alice));
    reopened.close().await;

    let _ = std::fs::remove_file(&path);
    Ok(())
}
