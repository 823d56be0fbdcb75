//! Population and projection need no database.

use bulkload::{populate, populate_tuples, project, ColumnMapping, TableMapping, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tests::User;

fn mapping() -> TableMapping {
    TableMapping::new("users")
        .column(
            ColumnMapping::for_primitive::<Option<i64>>("Id")
                .unwrap()
                .primary_key(true)
                .auto_increment(true)
                .property("id"),
        )
        .column(ColumnMapping::for_primitive::<String>("Name").unwrap().property("name"))
        .column(ColumnMapping::for_primitive::<String>("Email").unwrap().property("email"))
}

fn user() -> impl Strategy<Value = User> {
    (any::<Option<i64>>(), ".*", "[a-z]{1,8}@[a-z]{1,8}").prop_map(|(id, name, email)| User {
        id,
        name,
        email,
    })
}

proptest! {
    #[test]
    fn populate_then_project_preserves_records(users in prop::collection::vec(user(), 0..20)) {
        let batch = populate(&users, &mapping()).unwrap();
        prop_assert_eq!(batch.len(), users.len());

        let projected = project::<User>(&batch).unwrap();
        prop_assert_eq!(projected, users);
    }
}

#[test]
fn tuples_with_wrong_arity_are_rejected() {
    let err = populate_tuples([vec![Value::Null, "A".into()]], &mapping()).unwrap_err();
    assert!(err.is_shape_mismatch());
}

#[test]
fn mapping_without_columns_is_a_configuration_error() {
    let err = populate::<User>(&[], &TableMapping::new("users")).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn empty_input_keeps_the_schema() {
    let batch = populate::<User>(&[], &mapping()).unwrap();
    let names = batch
        .columns()
        .iter()
        .map(|column| column.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Id", "Name", "Email"]);
}
