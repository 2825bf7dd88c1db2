use crate::schema::users;

#[derive(Queryable)]
pub struct User {
    pub id: String,
    pub push_tokens: Vec<String>,
}

#[derive(Insertable)]
#[table_name = "users"]
pub struct NewUser<'a> {
    pub id: &'a str,
    pub push_tokens: &'a [String],
}
