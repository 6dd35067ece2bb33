// Copyright 2023 Remi Bernotavicius

use super::{contains_pattern, Repository};
use crate::database;
use crate::database::models::{CategoryId, NewRecipe, Recipe, RecipeChanges, RecipeId};
use crate::Result;
use diesel::expression_methods::EscapeExpressionMethods as _;
use diesel::expression_methods::TextExpressionMethods as _;
use diesel::prelude::OptionalExtension as _;
use diesel::ExpressionMethods as _;
use diesel::NullableExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

impl Repository for Recipe {
    type Id = RecipeId;
    type New = NewRecipe;
    type Changes = RecipeChanges;

    fn create(conn: &mut database::Connection, new: &NewRecipe) -> Result<Self> {
        use database::schema::recipes::dsl::*;

        let recipe = diesel::insert_into(recipes)
            .values(new)
            .returning(Recipe::as_returning())
            .get_result(conn)?;
        log::debug!("created recipe {} {:?}", recipe.id, recipe.name);
        Ok(recipe)
    }

    fn get_by_id(conn: &mut database::Connection, find_id: RecipeId) -> Result<Option<Self>> {
        use database::schema::recipes::dsl::*;

        Ok(recipes
            .select(Recipe::as_select())
            .filter(id.eq(find_id))
            .get_result(conn)
            .optional()?)
    }

    fn get_all(conn: &mut database::Connection) -> Result<Vec<Self>> {
        use database::schema::recipes::dsl::*;

        Ok(recipes.select(Recipe::as_select()).load(conn)?)
    }

    fn update(
        conn: &mut database::Connection,
        edit_id: RecipeId,
        changes: &RecipeChanges,
    ) -> Result<Option<Self>> {
        use database::schema::recipes::dsl::*;

        if changes.is_empty() {
            return Self::get_by_id(conn, edit_id);
        }
        let updated = diesel::update(recipes.filter(id.eq(edit_id)))
            .set(changes)
            .returning(Recipe::as_returning())
            .get_result(conn)
            .optional()?;
        if updated.is_some() {
            log::debug!("updated recipe {edit_id}");
        }
        Ok(updated)
    }

    /// The recipe's ingredient lines are removed along with it.
    fn delete(conn: &mut database::Connection, delete_id: RecipeId) -> Result<bool> {
        use database::schema::recipes::dsl::*;

        let removed = diesel::delete(recipes.filter(id.eq(delete_id))).execute(conn)?;
        log::debug!("deleted recipe {delete_id}: {removed} row(s)");
        Ok(removed > 0)
    }
}

/// Each filter is a substring match; all the filters that are set must match.
#[derive(Debug, Default, Clone)]
pub struct RecipeFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub ingredient: Option<String>,
}

impl RecipeFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.ingredient.is_none()
    }
}

impl Recipe {
    pub fn search(conn: &mut database::Connection, filter: &RecipeFilter) -> Result<Vec<Self>> {
        use database::schema::{categories, ingredients, recipe_ingredients};
        use database::schema::recipes::dsl::*;

        let mut query = recipes.select(Recipe::as_select()).into_boxed();

        if let Some(needle) = &filter.name {
            query = query.filter(name.like(contains_pattern(needle)).escape('\\'));
        }

        if let Some(needle) = &filter.category {
            let matching = categories::table
                .select(categories::id.nullable())
                .filter(categories::name.like(contains_pattern(needle)).escape('\\'));
            query = query.filter(category_id.eq_any(matching));
        }

        if let Some(needle) = &filter.ingredient {
            let matching = recipe_ingredients::table
                .inner_join(ingredients::table)
                .select(recipe_ingredients::recipe_id)
                .filter(ingredients::name.like(contains_pattern(needle)).escape('\\'));
            query = query.filter(id.eq_any(matching));
        }

        let found = query.load(conn)?;
        log::debug!("recipe search {filter:?} matched {} recipe(s)", found.len());
        Ok(found)
    }

    pub fn count_in_category(
        conn: &mut database::Connection,
        count_category: CategoryId,
    ) -> Result<i64> {
        use database::schema::recipes::dsl::*;

        Ok(recipes
            .filter(category_id.eq(count_category))
            .count()
            .get_result(conn)?)
    }
}

#[cfg(test)]
fn new_pancakes(category: Option<CategoryId>) -> NewRecipe {
    NewRecipe {
        name: "Classic Pancakes".into(),
        description: Some("Fluffy and delicious pancakes for a perfect breakfast.".into()),
        prep_time: Some(10),
        cook_time: Some(15),
        serving_size: Some(4),
        instructions: Some("Mix, then fry.".into()),
        category_id: category,
    }
}

#[cfg(test)]
fn create_category(conn: &mut database::Connection, name: &str) -> CategoryId {
    use crate::database::models::{Category, NewCategory};

    Category::create(conn, &NewCategory { name: name.into() })
        .unwrap()
        .id
}

#[cfg(test)]
fn link_ingredient(conn: &mut database::Connection, recipe: RecipeId, name: &str) {
    use crate::database::models::{Ingredient, NewIngredient, NewRecipeIngredient, RecipeIngredient};

    let ingredient = match Ingredient::get_by_name(conn, name).unwrap() {
        Some(i) => i,
        None => Ingredient::create(conn, &NewIngredient { name: name.into() }).unwrap(),
    };
    RecipeIngredient::create(
        conn,
        &NewRecipeIngredient {
            recipe_id: recipe,
            ingredient_id: ingredient.id,
            quantity: 1.0,
            unit: None,
        },
    )
    .unwrap();
}

#[test]
fn create_then_get_round_trips_every_field() {
    let mut conn = database::test_connection();
    let breakfast = create_category(&mut conn, "Breakfast");

    let new = new_pancakes(Some(breakfast));
    let created = Recipe::create(&mut conn, &new).unwrap();
    assert_eq!(created.name, new.name);
    assert_eq!(created.description, new.description);
    assert_eq!(created.prep_time, Some(10));
    assert_eq!(created.cook_time, Some(15));
    assert_eq!(created.serving_size, Some(4));
    assert_eq!(created.instructions, new.instructions);
    assert_eq!(created.category_id, Some(breakfast));

    assert_eq!(
        Recipe::get_by_id(&mut conn, created.id).unwrap(),
        Some(created)
    );
}

#[test]
fn optional_fields_default_to_absent() {
    let mut conn = database::test_connection();

    let created = Recipe::create(
        &mut conn,
        &NewRecipe {
            name: "Toast".into(),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(created.description, None);
    assert_eq!(created.prep_time, None);
    assert_eq!(created.cook_time, None);
    assert_eq!(created.serving_size, None);
    assert_eq!(created.instructions, None);
    assert_eq!(created.category_id, None);
}

#[test]
fn unknown_category_rejected() {
    let mut conn = database::test_connection();
    assert!(Recipe::create(&mut conn, &new_pancakes(Some(CategoryId::from(99)))).is_err());
    assert!(Recipe::get_all(&mut conn).unwrap().is_empty());
}

#[test]
fn update_changes_only_given_fields() {
    let mut conn = database::test_connection();
    let created = Recipe::create(&mut conn, &new_pancakes(None)).unwrap();

    let changes = RecipeChanges {
        cook_time: Some(Some(20)),
        ..Default::default()
    };
    let updated = Recipe::update(&mut conn, created.id, &changes)
        .unwrap()
        .unwrap();
    assert_eq!(
        updated,
        Recipe {
            cook_time: Some(20),
            ..created.clone()
        }
    );

    let changes = RecipeChanges {
        description: Some(None),
        ..Default::default()
    };
    let updated = Recipe::update(&mut conn, created.id, &changes)
        .unwrap()
        .unwrap();
    assert_eq!(updated.description, None);
    assert_eq!(updated.cook_time, Some(20));
    assert_eq!(updated.name, created.name);

    assert_eq!(
        Recipe::update(&mut conn, RecipeId::from(1000), &changes).unwrap(),
        None
    );
}

#[test]
fn delete_then_get_is_none() {
    let mut conn = database::test_connection();
    let created = Recipe::create(&mut conn, &new_pancakes(None)).unwrap();

    assert!(Recipe::delete(&mut conn, created.id).unwrap());
    assert_eq!(Recipe::get_by_id(&mut conn, created.id).unwrap(), None);
    assert!(!Recipe::delete(&mut conn, created.id).unwrap());
}

#[test]
fn deleting_category_uncategorizes_recipes() {
    use crate::database::models::Category;

    let mut conn = database::test_connection();
    let breakfast = create_category(&mut conn, "Breakfast");
    let created = Recipe::create(&mut conn, &new_pancakes(Some(breakfast))).unwrap();
    assert_eq!(Recipe::count_in_category(&mut conn, breakfast).unwrap(), 1);

    assert!(Category::delete(&mut conn, breakfast).unwrap());

    let survivor = Recipe::get_by_id(&mut conn, created.id).unwrap().unwrap();
    assert_eq!(survivor.category_id, None);
    assert_eq!(survivor.name, created.name);
    assert_eq!(Recipe::count_in_category(&mut conn, breakfast).unwrap(), 0);
}

#[test]
fn search_by_name_ignores_case() {
    let mut conn = database::test_connection();
    let created = Recipe::create(&mut conn, &new_pancakes(None)).unwrap();

    let filter = RecipeFilter {
        name: Some("pancake".into()),
        ..Default::default()
    };
    let found = Recipe::search(&mut conn, &filter).unwrap();
    assert_eq!(found, vec![created]);

    let filter = RecipeFilter {
        name: Some("waffle".into()),
        ..Default::default()
    };
    assert!(Recipe::search(&mut conn, &filter).unwrap().is_empty());
}

#[test]
fn search_name_wildcards_are_literal() {
    let mut conn = database::test_connection();
    Recipe::create(&mut conn, &new_pancakes(None)).unwrap();

    let filter = RecipeFilter {
        name: Some("%".into()),
        ..Default::default()
    };
    assert!(Recipe::search(&mut conn, &filter).unwrap().is_empty());
}

#[test]
fn search_combines_filters() {
    use maplit::btreeset;
    use std::collections::BTreeSet;

    let mut conn = database::test_connection();
    let breakfast = create_category(&mut conn, "Breakfast");
    let dessert = create_category(&mut conn, "Dessert");

    let pancakes = Recipe::create(&mut conn, &new_pancakes(Some(breakfast))).unwrap();
    link_ingredient(&mut conn, pancakes.id, "Flour");
    link_ingredient(&mut conn, pancakes.id, "Milk");
    link_ingredient(&mut conn, pancakes.id, "Flour");

    let cake = Recipe::create(
        &mut conn,
        &NewRecipe {
            name: "Chocolate Cake".into(),
            category_id: Some(dessert),
            ..Default::default()
        },
    )
    .unwrap();
    link_ingredient(&mut conn, cake.id, "Flour");
    link_ingredient(&mut conn, cake.id, "Cocoa");

    let omelette = Recipe::create(
        &mut conn,
        &NewRecipe {
            name: "Omelette".into(),
            category_id: Some(breakfast),
            ..Default::default()
        },
    )
    .unwrap();
    link_ingredient(&mut conn, omelette.id, "Eggs");

    let mut search = |filter: RecipeFilter| -> BTreeSet<RecipeId> {
        Recipe::search(&mut conn, &filter)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect()
    };

    assert_eq!(
        search(RecipeFilter::default()),
        btreeset! {pancakes.id, cake.id, omelette.id}
    );
    assert_eq!(
        search(RecipeFilter {
            category: Some("break".into()),
            ..Default::default()
        }),
        btreeset! {pancakes.id, omelette.id}
    );
    assert_eq!(
        search(RecipeFilter {
            ingredient: Some("flour".into()),
            ..Default::default()
        }),
        btreeset! {pancakes.id, cake.id}
    );
    assert_eq!(
        search(RecipeFilter {
            category: Some("Breakfast".into()),
            ingredient: Some("Flour".into()),
            ..Default::default()
        }),
        btreeset! {pancakes.id}
    );
    assert_eq!(
        search(RecipeFilter {
            name: Some("cake".into()),
            category: Some("Dessert".into()),
            ..Default::default()
        }),
        btreeset! {cake.id}
    );
    assert_eq!(
        search(RecipeFilter {
            category: Some("Lunch".into()),
            ..Default::default()
        }),
        btreeset! {}
    );
}

#[test]
fn search_ingredient_lists_recipe_once() {
    let mut conn = database::test_connection();
    let created = Recipe::create(&mut conn, &new_pancakes(None)).unwrap();
    link_ingredient(&mut conn, created.id, "Flour");
    link_ingredient(&mut conn, created.id, "Flour");

    let filter = RecipeFilter {
        ingredient: Some("Flour".into()),
        ..Default::default()
    };
    assert_eq!(Recipe::search(&mut conn, &filter).unwrap().len(), 1);
}
