use bulkload::{populate, project, RowBatch, Value, TRACKER_COLUMN};
use pretty_assertions::assert_eq;
use tests::*;

async fn users_batch(s: &impl Setup, db: &bulkload::Db, rows: &[(&str, &str)]) -> RowBatch {
    let mut batch = db.describe(s.users()).await.unwrap();
    for &(name, email) in rows {
        batch
            .push_row(vec![Value::Null, name.into(), email.into()])
            .unwrap();
    }
    batch
}

async fn keys_are_read_back_in_input_order(s: &impl Setup) {
    let db = s.setup().await;
    let batch = users_batch(s, &db, &[("A", "a@x"), ("B", "b@x"), ("C", "c@x")]).await;

    let batch = db
        .bulk_load(batch)
        .primary_keys(["Id"])
        .exec()
        .await
        .unwrap();

    assert!(batch.column(TRACKER_COLUMN).is_none());

    let ids = (0..3)
        .map(|row| batch.get(row, "Id").unwrap().as_i64().unwrap())
        .collect::<Vec<_>>();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]), "{ids:?}");

    let stored = stored_users(s, &db).await;
    let expected = ids
        .iter()
        .zip([("A", "a@x"), ("B", "b@x"), ("C", "c@x")])
        .map(|(&id, (name, email))| User {
            id: Some(id),
            ..User::new(name, email)
        })
        .collect::<Vec<_>>();
    assert_eq!(stored, expected);

    // The tracker column is gone from the table too
    let schema = db.describe(s.users()).await.unwrap();
    assert!(schema.column(TRACKER_COLUMN).is_none());
    assert_eq!(schema.columns().len(), 3);
}

async fn load_without_keys(s: &impl Setup) {
    let db = s.setup().await;
    let batch = users_batch(s, &db, &[("A", "a@x"), ("B", "b@x")]).await;

    let batch = db.bulk_load(batch).exec().await.unwrap();
    assert_eq!(batch.get(0, "Id"), Some(Value::Null));

    let stored = stored_users(s, &db).await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].name, "B");
}

async fn empty_batch_is_rejected(s: &impl Setup) {
    let db = s.setup().await;
    let batch = db.describe(s.users()).await.unwrap();

    let err = db
        .bulk_load(batch)
        .primary_keys(["Id"])
        .exec()
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

async fn failed_transfer_leaves_table_unchanged(s: &impl Setup) {
    let db = s.setup().await;

    // The duplicate email violates the unique constraint mid-transfer
    let batch = users_batch(s, &db, &[("A", "a@x"), ("B", "b@x"), ("C", "a@x")]).await;

    let err = db
        .bulk_load(batch)
        .primary_keys(["Id"])
        .batch_size(1)
        .exec()
        .await
        .unwrap_err();
    assert!(err.is_driver_operation_failed(), "{err}");

    assert!(stored_users(s, &db).await.is_empty());

    let schema = db.describe(s.users()).await.unwrap();
    assert!(schema.column(TRACKER_COLUMN).is_none());
}

async fn load_inside_caller_transaction(s: &impl Setup) {
    let db = s.setup().await;
    let batch = users_batch(s, &db, &[("A", "a@x")]).await;

    let mut tx = db.transaction().await.unwrap();
    let batch = tx
        .bulk_load(batch)
        .primary_keys(["Id"])
        .exec()
        .await
        .unwrap();
    assert!(batch.get(0, "Id").unwrap().as_i64().is_some());

    // Only one transaction per handle
    assert!(db.transaction().await.unwrap_err().is_invalid_operation());

    tx.commit().await.unwrap();

    assert_eq!(stored_users(s, &db).await.len(), 1);
}

async fn records_round_trip(s: &impl Setup) {
    let db = s.setup().await;
    let mapping = db.mapping_for::<User>(&s.resolver()).await.unwrap();

    let users = [User::new("A", "a@x"), User::new("B", "b@x")];
    let batch = populate(&users, &mapping).unwrap();

    let batch = db
        .bulk_load(batch)
        .primary_keys(mapping.primary_key_names())
        .exec()
        .await
        .unwrap();

    let loaded = project::<User>(&batch).unwrap();
    assert_eq!(loaded, stored_users(s, &db).await);
    assert!(loaded.iter().all(|user| user.id.is_some()));
}

async fn missing_cells_take_column_defaults(s: &impl Setup) {
    let db = s.setup().await;

    let mut batch = db.describe(s.users()).await.unwrap();
    batch.new_row();
    batch.set_by_name(0, "Email", "a@x".into()).unwrap();

    db.bulk_load(batch).exec().await.unwrap();

    let stored = stored_users(s, &db).await;
    assert_eq!(stored[0].name, "");
    assert_eq!(stored[0].email, "a@x");
}

async fn empty_records_populate_schema_only(s: &impl Setup) {
    let db = s.setup().await;
    let mapping = db.mapping_for::<User>(&s.resolver()).await.unwrap();

    let batch = populate::<User>(&[], &mapping).unwrap();
    assert!(batch.is_empty());
    assert_eq!(batch.columns().len(), 3);

    let err = db.bulk_load(batch).exec().await.unwrap_err();
    assert!(err.is_validation());
}

tests!(
    keys_are_read_back_in_input_order,
    load_without_keys,
    empty_batch_is_rejected,
    failed_transfer_leaves_table_unchanged,
    load_inside_caller_transaction,
    records_round_trip,
    missing_cells_take_column_defaults,
    empty_records_populate_schema_only,
);
