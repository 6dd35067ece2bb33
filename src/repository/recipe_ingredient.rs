// Copyright 2023 Remi Bernotavicius

use super::Repository;
use crate::database;
use crate::database::models::{
    Ingredient, IngredientId, NewRecipeIngredient, Recipe, RecipeId, RecipeIngredient,
    RecipeIngredientChanges, RecipeIngredientId,
};
use crate::Result;
use diesel::prelude::OptionalExtension as _;
use diesel::BelongingToDsl as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

impl Repository for RecipeIngredient {
    type Id = RecipeIngredientId;
    type New = NewRecipeIngredient;
    type Changes = RecipeIngredientChanges;

    fn create(conn: &mut database::Connection, new: &NewRecipeIngredient) -> Result<Self> {
        use database::schema::recipe_ingredients::dsl::*;

        let line = diesel::insert_into(recipe_ingredients)
            .values(new)
            .returning(RecipeIngredient::as_returning())
            .get_result(conn)?;
        log::debug!(
            "added ingredient {} to recipe {} as line {}",
            line.ingredient_id,
            line.recipe_id,
            line.id
        );
        Ok(line)
    }

    fn get_by_id(
        conn: &mut database::Connection,
        find_id: RecipeIngredientId,
    ) -> Result<Option<Self>> {
        use database::schema::recipe_ingredients::dsl::*;

        Ok(recipe_ingredients
            .select(RecipeIngredient::as_select())
            .filter(id.eq(find_id))
            .get_result(conn)
            .optional()?)
    }

    fn get_all(conn: &mut database::Connection) -> Result<Vec<Self>> {
        use database::schema::recipe_ingredients::dsl::*;

        Ok(recipe_ingredients
            .select(RecipeIngredient::as_select())
            .load(conn)?)
    }

    fn update(
        conn: &mut database::Connection,
        edit_id: RecipeIngredientId,
        changes: &RecipeIngredientChanges,
    ) -> Result<Option<Self>> {
        use database::schema::recipe_ingredients::dsl::*;

        if changes.is_empty() {
            return Self::get_by_id(conn, edit_id);
        }
        let updated = diesel::update(recipe_ingredients.filter(id.eq(edit_id)))
            .set(changes)
            .returning(RecipeIngredient::as_returning())
            .get_result(conn)
            .optional()?;
        if updated.is_some() {
            log::debug!("updated recipe line {edit_id}");
        }
        Ok(updated)
    }

    fn delete(conn: &mut database::Connection, delete_id: RecipeIngredientId) -> Result<bool> {
        use database::schema::recipe_ingredients::dsl::*;

        let removed = diesel::delete(recipe_ingredients.filter(id.eq(delete_id))).execute(conn)?;
        log::debug!("deleted recipe line {delete_id}: {removed} row(s)");
        Ok(removed > 0)
    }
}

impl RecipeIngredient {
    pub fn get_by_recipe_id(
        conn: &mut database::Connection,
        find_recipe: RecipeId,
    ) -> Result<Vec<Self>> {
        use database::schema::recipe_ingredients::dsl::*;

        Ok(recipe_ingredients
            .select(RecipeIngredient::as_select())
            .filter(recipe_id.eq(find_recipe))
            .order_by(id)
            .load(conn)?)
    }

    /// The recipe's lines paired with the ingredient each one refers to, in the order they were
    /// added.
    pub fn lines_for(
        conn: &mut database::Connection,
        recipe: &Recipe,
    ) -> Result<Vec<(Self, Ingredient)>> {
        use database::schema::recipe_ingredients::dsl::*;

        Ok(RecipeIngredient::belonging_to(recipe)
            .inner_join(database::schema::ingredients::table)
            .select((RecipeIngredient::as_select(), Ingredient::as_select()))
            .order_by(id)
            .load(conn)?)
    }

    pub fn count_for_ingredient(
        conn: &mut database::Connection,
        count_ingredient: IngredientId,
    ) -> Result<i64> {
        use database::schema::recipe_ingredients::dsl::*;

        Ok(recipe_ingredients
            .filter(ingredient_id.eq(count_ingredient))
            .count()
            .get_result(conn)?)
    }
}

#[cfg(test)]
struct Fixture {
    conn: database::Connection,
    recipe: Recipe,
    flour: Ingredient,
}

#[cfg(test)]
impl Fixture {
    fn new() -> Self {
        use crate::database::models::{Category, NewCategory, NewIngredient, NewRecipe};

        let mut conn = database::test_connection();
        let breakfast = Category::create(
            &mut conn,
            &NewCategory {
                name: "Breakfast".into(),
            },
        )
        .unwrap();
        let recipe = Recipe::create(
            &mut conn,
            &NewRecipe {
                name: "Classic Pancakes".into(),
                prep_time: Some(10),
                cook_time: Some(15),
                serving_size: Some(4),
                category_id: Some(breakfast.id),
                ..Default::default()
            },
        )
        .unwrap();
        let flour = Ingredient::create(
            &mut conn,
            &NewIngredient {
                name: "Flour".into(),
            },
        )
        .unwrap();
        Self {
            conn,
            recipe,
            flour,
        }
    }

    fn add_line(
        &mut self,
        ingredient: IngredientId,
        quantity: f64,
        unit: &str,
    ) -> RecipeIngredient {
        RecipeIngredient::create(
            &mut self.conn,
            &NewRecipeIngredient {
                recipe_id: self.recipe.id,
                ingredient_id: ingredient,
                quantity,
                unit: (!unit.is_empty()).then(|| unit.to_owned()),
            },
        )
        .unwrap()
    }

    fn other_ingredient(&mut self, name: &str) -> Ingredient {
        use crate::database::models::NewIngredient;

        Ingredient::create(&mut self.conn, &NewIngredient { name: name.into() }).unwrap()
    }
}

#[test]
fn pancake_flour_scenario() {
    let mut f = Fixture::new();
    let line = f.add_line(f.flour.id, 1.5, "cups");

    let lines = RecipeIngredient::get_by_recipe_id(&mut f.conn, f.recipe.id).unwrap();
    assert_eq!(lines, vec![line.clone()]);
    assert_eq!(lines[0].quantity, 1.5);
    assert_eq!(lines[0].unit.as_deref(), Some("cups"));

    assert_eq!(
        RecipeIngredient::get_by_id(&mut f.conn, line.id).unwrap(),
        Some(line)
    );
}

#[test]
fn same_ingredient_twice() {
    let mut f = Fixture::new();
    f.add_line(f.flour.id, 1.0, "cups");
    f.add_line(f.flour.id, 2.0, "tbsp");

    let lines = RecipeIngredient::lines_for(&mut f.conn, &f.recipe).unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|(_, i)| *i == f.flour));
    assert_eq!(
        RecipeIngredient::count_for_ingredient(&mut f.conn, f.flour.id).unwrap(),
        2
    );
}

#[test]
fn unknown_recipe_or_ingredient_rejected() {
    let mut f = Fixture::new();
    let bad_recipe = NewRecipeIngredient {
        recipe_id: RecipeId::from(500),
        ingredient_id: f.flour.id,
        quantity: 1.0,
        unit: None,
    };
    assert!(RecipeIngredient::create(&mut f.conn, &bad_recipe).is_err());

    let bad_ingredient = NewRecipeIngredient {
        recipe_id: f.recipe.id,
        ingredient_id: IngredientId::from(500),
        quantity: 1.0,
        unit: None,
    };
    assert!(RecipeIngredient::create(&mut f.conn, &bad_ingredient).is_err());
    assert!(RecipeIngredient::get_all(&mut f.conn).unwrap().is_empty());
}

#[test]
fn update_quantity_keeps_unit() {
    let mut f = Fixture::new();
    let line = f.add_line(f.flour.id, 1.5, "cups");

    let changes = RecipeIngredientChanges {
        quantity: Some(2.0),
        ..Default::default()
    };
    let updated = RecipeIngredient::update(&mut f.conn, line.id, &changes)
        .unwrap()
        .unwrap();
    assert_eq!(updated.quantity, 2.0);
    assert_eq!(updated.unit.as_deref(), Some("cups"));
    assert_eq!(updated.ingredient_id, f.flour.id);
}

#[test]
fn deleting_recipe_cascades() {
    let mut f = Fixture::new();
    let sugar = f.other_ingredient("Sugar");
    f.add_line(f.flour.id, 1.5, "cups");
    f.add_line(sugar.id, 3.0, "tbsp");

    assert!(Recipe::delete(&mut f.conn, f.recipe.id).unwrap());
    assert!(RecipeIngredient::get_by_recipe_id(&mut f.conn, f.recipe.id)
        .unwrap()
        .is_empty());
    assert!(RecipeIngredient::get_all(&mut f.conn).unwrap().is_empty());

    // The ingredients themselves stay in the catalog
    assert_eq!(Ingredient::get_all(&mut f.conn).unwrap().len(), 2);
}

#[test]
fn deleting_ingredient_cascades() {
    let mut f = Fixture::new();
    let sugar = f.other_ingredient("Sugar");
    f.add_line(f.flour.id, 1.5, "cups");
    let sugar_line = f.add_line(sugar.id, 3.0, "tbsp");

    assert!(Ingredient::delete(&mut f.conn, f.flour.id).unwrap());
    assert_eq!(
        RecipeIngredient::get_by_recipe_id(&mut f.conn, f.recipe.id).unwrap(),
        vec![sugar_line]
    );
    assert_eq!(
        RecipeIngredient::count_for_ingredient(&mut f.conn, f.flour.id).unwrap(),
        0
    );
}

#[test]
fn delete_line() {
    let mut f = Fixture::new();
    let line = f.add_line(f.flour.id, 1.5, "");
    assert_eq!(line.unit, None);

    assert!(RecipeIngredient::delete(&mut f.conn, line.id).unwrap());
    assert_eq!(RecipeIngredient::get_by_id(&mut f.conn, line.id).unwrap(), None);
    assert!(!RecipeIngredient::delete(&mut f.conn, line.id).unwrap());
}
