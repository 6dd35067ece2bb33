// Copyright 2023 Remi Bernotavicius

use super::Repository;
use crate::database;
use crate::database::models::{Ingredient, IngredientChanges, IngredientId, NewIngredient};
use crate::Result;
use diesel::prelude::OptionalExtension as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

impl Repository for Ingredient {
    type Id = IngredientId;
    type New = NewIngredient;
    type Changes = IngredientChanges;

    fn create(conn: &mut database::Connection, new: &NewIngredient) -> Result<Self> {
        use database::schema::ingredients::dsl::*;

        let ingredient = diesel::insert_into(ingredients)
            .values(new)
            .returning(Ingredient::as_returning())
            .get_result(conn)?;
        log::debug!(
            "created ingredient {} {:?}",
            ingredient.id,
            ingredient.name
        );
        Ok(ingredient)
    }

    fn get_by_id(conn: &mut database::Connection, find_id: IngredientId) -> Result<Option<Self>> {
        use database::schema::ingredients::dsl::*;

        Ok(ingredients
            .select(Ingredient::as_select())
            .filter(id.eq(find_id))
            .get_result(conn)
            .optional()?)
    }

    fn get_all(conn: &mut database::Connection) -> Result<Vec<Self>> {
        use database::schema::ingredients::dsl::*;

        Ok(ingredients.select(Ingredient::as_select()).load(conn)?)
    }

    fn update(
        conn: &mut database::Connection,
        edit_id: IngredientId,
        changes: &IngredientChanges,
    ) -> Result<Option<Self>> {
        use database::schema::ingredients::dsl::*;

        if changes.is_empty() {
            return Self::get_by_id(conn, edit_id);
        }
        let updated = diesel::update(ingredients.filter(id.eq(edit_id)))
            .set(changes)
            .returning(Ingredient::as_returning())
            .get_result(conn)
            .optional()?;
        if updated.is_some() {
            log::debug!("updated ingredient {edit_id}");
        }
        Ok(updated)
    }

    /// Any recipe lines using this ingredient go with it.
    fn delete(conn: &mut database::Connection, delete_id: IngredientId) -> Result<bool> {
        use database::schema::ingredients::dsl::*;

        let removed = diesel::delete(ingredients.filter(id.eq(delete_id))).execute(conn)?;
        log::debug!("deleted ingredient {delete_id}: {removed} row(s)");
        Ok(removed > 0)
    }
}

impl Ingredient {
    pub fn get_by_name(conn: &mut database::Connection, find_name: &str) -> Result<Option<Self>> {
        use database::schema::ingredients::dsl::*;

        Ok(ingredients
            .select(Ingredient::as_select())
            .filter(name.eq(find_name))
            .get_result(conn)
            .optional()?)
    }
}

#[test]
fn create_get_update_delete() {
    let mut conn = database::test_connection();

    let flour = Ingredient::create(
        &mut conn,
        &NewIngredient {
            name: "Flour".into(),
        },
    )
    .unwrap();
    assert_eq!(
        Ingredient::get_by_id(&mut conn, flour.id).unwrap(),
        Some(flour.clone())
    );
    assert_eq!(
        Ingredient::get_by_name(&mut conn, "Flour").unwrap(),
        Some(flour.clone())
    );

    let changes = IngredientChanges {
        name: Some("Whole Wheat Flour".into()),
    };
    let renamed = Ingredient::update(&mut conn, flour.id, &changes)
        .unwrap()
        .unwrap();
    assert_eq!(renamed.id, flour.id);
    assert_eq!(renamed.name, "Whole Wheat Flour");
    assert_eq!(Ingredient::get_by_name(&mut conn, "Flour").unwrap(), None);

    assert!(Ingredient::delete(&mut conn, flour.id).unwrap());
    assert_eq!(Ingredient::get_by_id(&mut conn, flour.id).unwrap(), None);
    assert!(Ingredient::get_all(&mut conn).unwrap().is_empty());
}

#[test]
fn ids_are_not_reused() {
    let mut conn = database::test_connection();
    let new = NewIngredient {
        name: "Salt".into(),
    };

    let first = Ingredient::create(&mut conn, &new).unwrap();
    Ingredient::delete(&mut conn, first.id).unwrap();
    let second = Ingredient::create(&mut conn, &new).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn duplicate_names_rejected() {
    let mut conn = database::test_connection();
    let new = NewIngredient {
        name: "Sugar".into(),
    };

    Ingredient::create(&mut conn, &new).unwrap();
    assert!(Ingredient::create(&mut conn, &new).is_err());
}
