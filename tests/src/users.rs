use bulkload::{
    stmt::Primitive, Name, PropertyDescriptor, Record, RecordDescriptor, RecordResolver, Resolver,
    Result, Value,
};

/// The record stored in the `users` table every test creates.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

impl Record for User {
    fn descriptor() -> RecordDescriptor {
        RecordDescriptor::new("users")
            .property(
                PropertyDescriptor::new::<Option<i64>>("id")
                    .column("Id")
                    .primary_key()
                    .auto_increment(),
            )
            .property(PropertyDescriptor::new::<String>("name").column("Name"))
            .property(PropertyDescriptor::new::<String>("email").column("Email"))
    }

    fn get(&self, property: &str) -> Option<Value> {
        match property {
            "id" => Some(self.id.into_value()),
            "name" => Some(self.name.clone().into_value()),
            "email" => Some(self.email.clone().into_value()),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "id" => self.id = Primitive::load(value)?,
            "name" => self.name = Primitive::load(value)?,
            "email" => self.email = Primitive::load(value)?,
            _ => {}
        }
        Ok(())
    }
}

/// Resolves records from their descriptors, with table names prefixed for
/// test isolation.
#[derive(Debug, Clone)]
pub struct UsersResolver {
    prefix: String,
}

impl UsersResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Resolver for UsersResolver {
    fn table_name<T: Record>(&self) -> Name {
        let mut name = RecordResolver.table_name::<T>();
        if let Some(table) = name.0.last_mut() {
            table.insert_str(0, &self.prefix);
        }
        name
    }

    fn mappings<T: Record>(&self) -> Vec<(String, String)> {
        RecordResolver.mappings::<T>()
    }

    fn primary_key_column_names<T: Record>(&self) -> Vec<String> {
        RecordResolver.primary_key_column_names::<T>()
    }
}

/// Reads every stored user back, ordered by id.
pub async fn stored_users(setup: &impl crate::Setup, db: &bulkload::Db) -> Vec<User> {
    use bulkload::{driver::operation::Query, Type};

    let sql = format!(
        "SELECT {id}, {name}, {email} FROM {table} ORDER BY {id}",
        id = setup.ident("Id"),
        name = setup.ident("Name"),
        email = setup.ident("Email"),
        table = setup.ident(&setup.table("users")),
    );

    let rows = db
        .exec(Query {
            sql,
            params: vec![],
            ret: vec![Type::I64, Type::String, Type::String],
        })
        .await
        .unwrap()
        .rows
        .into_values()
        .unwrap();

    rows.into_iter()
        .map(|row| {
            let mut user = User::default();
            for (property, value) in ["id", "name", "email"].into_iter().zip(row) {
                user.set(property, value).unwrap();
            }
            user
        })
        .collect()
}
