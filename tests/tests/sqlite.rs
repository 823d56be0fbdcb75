#![cfg(feature = "sqlite")]

use bulkload::{
    driver::operation::{Execute, Query},
    Db, Provider, RowBatch, Type, Value,
};
use pretty_assertions::assert_eq;

/// `children.ParentId` references `parents.Id` with the check deferred to
/// COMMIT. Only parent 1 exists.
async fn deferred_fk_db() -> Db {
    tests::init_tracing();

    let db = Db::builder()
        .provider(Provider::Sqlite)
        .connection_url("sqlite::memory:")
        .build()
        .await
        .unwrap();

    db.exec(Execute {
        sql: "PRAGMA foreign_keys = ON; \
              CREATE TABLE parents (Id INTEGER PRIMARY KEY); \
              CREATE TABLE children (\
                  Id INTEGER PRIMARY KEY AUTOINCREMENT, \
                  ParentId INTEGER NOT NULL \
                      REFERENCES parents(Id) DEFERRABLE INITIALLY DEFERRED\
              ); \
              INSERT INTO parents (Id) VALUES (1);"
            .into(),
    })
    .await
    .unwrap();

    db
}

async fn children(db: &Db, parents: &[i64]) -> RowBatch {
    let mut batch = db.describe("children").await.unwrap();
    for &parent in parents {
        batch
            .push_row(vec![Value::Null, Value::I64(parent)])
            .unwrap();
    }
    batch
}

async fn stored_parents(db: &Db) -> Vec<Vec<Value>> {
    db.exec(Query {
        sql: "SELECT ParentId FROM children ORDER BY Id".into(),
        params: vec![],
        ret: vec![Type::I64],
    })
    .await
    .unwrap()
    .rows
    .into_values()
    .unwrap()
}

#[tokio::test]
async fn load_rejected_at_commit_leaves_table_unchanged() {
    let db = deferred_fk_db().await;

    let batch = children(&db, &[42]).await;
    let err = db
        .bulk_load(batch)
        .primary_keys(["Id"])
        .exec()
        .await
        .unwrap_err();
    assert!(err.is_driver_operation_failed(), "{err}");

    assert!(stored_parents(&db).await.is_empty());

    // The connection is usable again
    let batch = children(&db, &[1]).await;
    let batch = db
        .bulk_load(batch)
        .primary_keys(["Id"])
        .exec()
        .await
        .unwrap();
    assert!(batch.get(0, "Id").unwrap().as_i64().is_some());
    assert_eq!(stored_parents(&db).await, [vec![Value::I64(1)]]);

    let schema = db.describe("children").await.unwrap();
    assert_eq!(schema.columns().len(), 2);
}

#[tokio::test]
async fn update_rejected_at_commit_is_discarded() {
    let db = deferred_fk_db().await;

    let batch = children(&db, &[1]).await;
    let mut batch = db
        .bulk_load(batch)
        .primary_keys(["Id"])
        .exec()
        .await
        .unwrap();
    batch.set_by_name(0, "ParentId", Value::I64(42)).unwrap();

    let err = db
        .batch_update(
            batch,
            "UPDATE children SET ParentId = @ParentId WHERE Id = @Id",
        )
        .exec()
        .await
        .unwrap_err();
    assert!(err.is_driver_operation_failed(), "{err}");

    assert_eq!(stored_parents(&db).await, [vec![Value::I64(1)]]);

    // No transaction was left open
    let tx = db.transaction().await.unwrap();
    tx.rollback().await.unwrap();
}
