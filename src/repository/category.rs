// Copyright 2023 Remi Bernotavicius

use super::Repository;
use crate::database;
use crate::database::models::{Category, CategoryChanges, CategoryId, NewCategory};
use crate::Result;
use diesel::prelude::OptionalExtension as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

impl Repository for Category {
    type Id = CategoryId;
    type New = NewCategory;
    type Changes = CategoryChanges;

    fn create(conn: &mut database::Connection, new: &NewCategory) -> Result<Self> {
        use database::schema::categories::dsl::*;

        let category = diesel::insert_into(categories)
            .values(new)
            .returning(Category::as_returning())
            .get_result(conn)?;
        log::debug!("created category {} {:?}", category.id, category.name);
        Ok(category)
    }

    fn get_by_id(conn: &mut database::Connection, find_id: CategoryId) -> Result<Option<Self>> {
        use database::schema::categories::dsl::*;

        Ok(categories
            .select(Category::as_select())
            .filter(id.eq(find_id))
            .get_result(conn)
            .optional()?)
    }

    fn get_all(conn: &mut database::Connection) -> Result<Vec<Self>> {
        use database::schema::categories::dsl::*;

        Ok(categories.select(Category::as_select()).load(conn)?)
    }

    fn update(
        conn: &mut database::Connection,
        edit_id: CategoryId,
        changes: &CategoryChanges,
    ) -> Result<Option<Self>> {
        use database::schema::categories::dsl::*;

        if changes.is_empty() {
            return Self::get_by_id(conn, edit_id);
        }
        let updated = diesel::update(categories.filter(id.eq(edit_id)))
            .set(changes)
            .returning(Category::as_returning())
            .get_result(conn)
            .optional()?;
        if updated.is_some() {
            log::debug!("updated category {edit_id}");
        }
        Ok(updated)
    }

    fn delete(conn: &mut database::Connection, delete_id: CategoryId) -> Result<bool> {
        use database::schema::categories::dsl::*;

        let removed = diesel::delete(categories.filter(id.eq(delete_id))).execute(conn)?;
        log::debug!("deleted category {delete_id}: {removed} row(s)");
        Ok(removed > 0)
    }
}

impl Category {
    pub fn get_by_name(conn: &mut database::Connection, find_name: &str) -> Result<Option<Self>> {
        use database::schema::categories::dsl::*;

        Ok(categories
            .select(Category::as_select())
            .filter(name.eq(find_name))
            .get_result(conn)
            .optional()?)
    }
}

#[cfg(test)]
fn new_category(name: &str) -> NewCategory {
    NewCategory { name: name.into() }
}

#[test]
fn create_and_get() {
    let mut conn = database::test_connection();

    let created = Category::create(&mut conn, &new_category("Breakfast")).unwrap();
    assert_eq!(created.name, "Breakfast");

    let fetched = Category::get_by_id(&mut conn, created.id).unwrap();
    assert_eq!(fetched, Some(created.clone()));

    let by_name = Category::get_by_name(&mut conn, "Breakfast").unwrap();
    assert_eq!(by_name, Some(created));

    assert_eq!(Category::get_by_name(&mut conn, "breakfast").unwrap(), None);
}

#[test]
fn get_all_returns_every_row() {
    use maplit::btreeset;
    use std::collections::BTreeSet;

    let mut conn = database::test_connection();
    assert!(Category::get_all(&mut conn).unwrap().is_empty());

    for name in ["Lunch", "Dinner", "Dessert"] {
        Category::create(&mut conn, &new_category(name)).unwrap();
    }

    let names: BTreeSet<String> = Category::get_all(&mut conn)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(
        names,
        btreeset! {"Dessert".to_owned(), "Dinner".to_owned(), "Lunch".to_owned()}
    );
}

#[test]
fn names_are_unique() {
    use crate::Error;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    let mut conn = database::test_connection();
    Category::create(&mut conn, &new_category("Vegan")).unwrap();

    let err = Category::create(&mut conn, &new_category("Vegan")).unwrap_err();
    assert!(
        matches!(
            err,
            Error::Store(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _
            ))
        ),
        "{err:?}"
    );
    assert_eq!(Category::get_all(&mut conn).unwrap().len(), 1);
}

#[test]
fn update_renames() {
    let mut conn = database::test_connection();
    let created = Category::create(&mut conn, &new_category("Appetiser")).unwrap();

    let changes = CategoryChanges {
        name: Some("Appetizer".into()),
    };
    let updated = Category::update(&mut conn, created.id, &changes)
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Appetizer");

    let unchanged = Category::update(&mut conn, created.id, &CategoryChanges::default())
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, updated);
}

#[test]
fn update_missing_is_none() {
    let mut conn = database::test_connection();
    let changes = CategoryChanges {
        name: Some("Brunch".into()),
    };
    assert_eq!(
        Category::update(&mut conn, CategoryId::from(42), &changes).unwrap(),
        None
    );
    assert_eq!(
        Category::update(&mut conn, CategoryId::from(42), &CategoryChanges::default()).unwrap(),
        None
    );
}

#[test]
fn delete_removes_row() {
    let mut conn = database::test_connection();
    let created = Category::create(&mut conn, &new_category("Dessert")).unwrap();

    assert!(Category::delete(&mut conn, created.id).unwrap());
    assert_eq!(Category::get_by_id(&mut conn, created.id).unwrap(), None);
    assert!(!Category::delete(&mut conn, created.id).unwrap());
}
