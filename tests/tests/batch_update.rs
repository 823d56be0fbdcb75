use bulkload::{RowBatch, Value};
use pretty_assertions::assert_eq;
use tests::*;

async fn load_users(s: &impl Setup, db: &bulkload::Db) -> RowBatch {
    let mut batch = db.describe(s.users()).await.unwrap();
    for (name, email) in [("A", "a@x"), ("B", "b@x"), ("C", "c@x")] {
        batch
            .push_row(vec![Value::Null, name.into(), email.into()])
            .unwrap();
    }
    db.bulk_load(batch)
        .primary_keys(["Id"])
        .exec()
        .await
        .unwrap()
}

fn rename_template(s: &impl Setup) -> String {
    format!(
        "UPDATE {} SET {} = @Name WHERE {} = @Id",
        s.ident(&s.table("users")),
        s.ident("Name"),
        s.ident("Id")
    )
}

async fn updates_loaded_rows(s: &impl Setup) {
    let db = s.setup().await;
    let mut batch = load_users(s, &db).await;

    for row in 0..batch.len() {
        let name = format!("{}!", batch.get(row, "Name").unwrap().as_str().unwrap());
        batch.set_by_name(row, "Name", name.into()).unwrap();
    }

    let count = db
        .batch_update(batch, rename_template(s))
        .exec()
        .await
        .unwrap();
    assert_eq!(count, 3);

    let names = stored_users(s, &db)
        .await
        .into_iter()
        .map(|user| user.name)
        .collect::<Vec<_>>();
    assert_eq!(names, ["A!", "B!", "C!"]);
}

async fn unbound_placeholder_is_rejected(s: &impl Setup) {
    let db = s.setup().await;
    let batch = load_users(s, &db).await;

    let template = format!(
        "UPDATE {} SET {} = @Age WHERE {} = @Id",
        s.ident(&s.table("users")),
        s.ident("Name"),
        s.ident("Id")
    );

    let err = db.batch_update(batch, template).exec().await.unwrap_err();
    assert!(err.is_unbound_parameter());
    assert!(err.is_validation());
}

async fn rolled_back_update_is_discarded(s: &impl Setup) {
    let db = s.setup().await;
    let mut batch = load_users(s, &db).await;
    batch.set_by_name(0, "Name", "Z".into()).unwrap();

    let mut tx = db.transaction().await.unwrap();
    let count = tx
        .batch_update(batch, rename_template(s))
        .batch_size(1)
        .exec()
        .await
        .unwrap();
    assert_eq!(count, 3);
    tx.rollback().await.unwrap();

    assert_eq!(stored_users(s, &db).await[0].name, "A");
}

async fn failed_update_rolls_back(s: &impl Setup) {
    let db = s.setup().await;
    let mut batch = load_users(s, &db).await;

    // The second row collides with the first on the unique email
    batch.set_by_name(0, "Email", "new@x".into()).unwrap();
    batch.set_by_name(1, "Email", "new@x".into()).unwrap();

    let template = format!(
        "UPDATE {} SET {} = @Email WHERE {} = @Id",
        s.ident(&s.table("users")),
        s.ident("Email"),
        s.ident("Id")
    );

    let err = db.batch_update(batch, template).exec().await.unwrap_err();
    assert!(err.is_driver_operation_failed(), "{err}");

    let emails = stored_users(s, &db)
        .await
        .into_iter()
        .map(|user| user.email)
        .collect::<Vec<_>>();
    assert_eq!(emails, ["a@x", "b@x", "c@x"]);
}

tests!(
    updates_loaded_rows,
    unbound_placeholder_is_rejected,
    rolled_back_update_is_discarded,
    failed_update_rolls_back,
);
