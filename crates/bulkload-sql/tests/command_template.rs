use bulkload_core::{
    batch::Column,
    stmt::{Type, Value},
};
use bulkload_sql::{CommandTemplate, Serializer};
use pretty_assertions::assert_eq;

fn columns() -> Vec<Column> {
    vec![
        Column::new("Id", Type::I32),
        Column::new("Name", Type::String),
        Column::new("Email", Type::String),
    ]
}

const TEMPLATE: &str = "UPDATE t SET Name = @Name, Email = @Email WHERE Id = @Id OR Name = @Name";

#[test]
fn numbered_dialects_reuse_parameters() {
    let template = CommandTemplate::parse(TEMPLATE).unwrap();

    let bound = template
        .render(&Serializer::postgresql(), &columns())
        .unwrap();
    assert_eq!(
        bound.sql,
        "UPDATE t SET Name = $1, Email = $2 WHERE Id = $3 OR Name = $1"
    );
    assert_eq!(bound.order, [1, 2, 0]);

    let bound = template.render(&Serializer::sqlite(), &columns()).unwrap();
    assert_eq!(
        bound.sql,
        "UPDATE t SET Name = ?1, Email = ?2 WHERE Id = ?3 OR Name = ?1"
    );
}

#[test]
fn mysql_binds_each_occurrence() {
    let template = CommandTemplate::parse(TEMPLATE).unwrap();
    let bound = template.render(&Serializer::mysql(), &columns()).unwrap();

    assert_eq!(
        bound.sql,
        "UPDATE t SET Name = ?, Email = ? WHERE Id = ? OR Name = ?"
    );
    assert_eq!(bound.order, [1, 2, 0, 1]);
    assert_eq!(bound.parameters.len(), 3);

    let row = vec![Value::I32(7), "A".into(), "a@x".into()];
    assert_eq!(
        bound.bind_row(&row),
        [
            Value::from("A"),
            Value::from("a@x"),
            Value::I32(7),
            Value::from("A")
        ]
    );
}

#[test]
fn literal_text_is_preserved() {
    let template =
        CommandTemplate::parse("UPDATE t SET Note = 'ping @Name' WHERE Id = @Id").unwrap();
    let bound = template.render(&Serializer::sqlite(), &columns()).unwrap();
    assert_eq!(bound.sql, "UPDATE t SET Note = 'ping @Name' WHERE Id = ?1");
}

#[test]
fn unbound_placeholder_fails_render() {
    let template = CommandTemplate::parse("UPDATE t SET Age = @Age").unwrap();
    let err = template
        .render(&Serializer::postgresql(), &columns())
        .unwrap_err();
    assert!(err.is_unbound_parameter());
}
