// Copyright 2023 Remi Bernotavicius

//! CRUD access to the catalog, one module per table.
//!
//! Every function takes the connection explicitly and keeps nothing between calls. Each write is
//! a single statement, so it is committed as soon as the function returns.

use crate::database;
use crate::Result;

mod category;
mod ingredient;
mod recipe;
mod recipe_ingredient;

pub use recipe::RecipeFilter;

pub trait Repository: Sized {
    type Id: Copy;
    type New;
    type Changes;

    /// Inserts a new row and returns it with its generated id.
    fn create(conn: &mut database::Connection, new: &Self::New) -> Result<Self>;

    fn get_by_id(conn: &mut database::Connection, id: Self::Id) -> Result<Option<Self>>;

    fn get_all(conn: &mut database::Connection) -> Result<Vec<Self>>;

    /// Applies only the fields present in `changes`. Returns `None` when there is no row with the
    /// given id.
    fn update(
        conn: &mut database::Connection,
        id: Self::Id,
        changes: &Self::Changes,
    ) -> Result<Option<Self>>;

    /// Returns whether a row was actually removed.
    fn delete(conn: &mut database::Connection, id: Self::Id) -> Result<bool>;
}

/// Builds a `LIKE` pattern matching `needle` anywhere, with wildcards in the needle escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[test]
fn contains_pattern_escapes_wildcards() {
    assert_eq!(contains_pattern("pancake"), "%pancake%");
    assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    assert_eq!(contains_pattern(""), "%%");
}
