// Copyright 2023 Remi Bernotavicius

use derive_more::{Display, From, FromStr, Into};
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel::prelude::{AsChangeset, Insertable};
use diesel_derive_newtype::DieselNewType;

#[derive(
    DieselNewType, Debug, Display, From, FromStr, Into, Hash, PartialEq, Eq, PartialOrd, Ord, Copy,
    Clone,
)]
pub struct CategoryId(i32);

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::database::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::database::schema::categories)]
pub struct NewCategory {
    pub name: String,
}

#[derive(AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = crate::database::schema::categories)]
pub struct CategoryChanges {
    pub name: Option<String>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(
    DieselNewType, Debug, Display, From, FromStr, Into, Hash, PartialEq, Eq, PartialOrd, Ord, Copy,
    Clone,
)]
pub struct IngredientId(i32);

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::database::schema::ingredients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct NewIngredient {
    pub name: String,
}

#[derive(AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct IngredientChanges {
    pub name: Option<String>,
}

impl IngredientChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(
    DieselNewType, Debug, Display, From, FromStr, Into, Hash, PartialEq, Eq, PartialOrd, Ord, Copy,
    Clone,
)]
pub struct RecipeId(i32);

/// Times are in minutes. `category_id` may point at a category that no longer exists, callers
/// must treat that the same as no category at all.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::database::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub description: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub serving_size: Option<i32>,
    pub instructions: Option<String>,
    pub category_id: Option<CategoryId>,
}

#[derive(Insertable, Default, Debug, Clone)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct NewRecipe {
    pub name: String,
    pub description: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub serving_size: Option<i32>,
    pub instructions: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// `None` leaves a column alone, `Some(None)` clears a nullable column.
#[derive(AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub prep_time: Option<Option<i32>>,
    pub cook_time: Option<Option<i32>>,
    pub serving_size: Option<Option<i32>>,
    pub instructions: Option<Option<String>>,
    pub category_id: Option<Option<CategoryId>>,
}

impl RecipeChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.prep_time.is_none()
            && self.cook_time.is_none()
            && self.serving_size.is_none()
            && self.instructions.is_none()
            && self.category_id.is_none()
    }
}

#[derive(
    DieselNewType, Debug, Display, From, FromStr, Into, Hash, PartialEq, Eq, PartialOrd, Ord, Copy,
    Clone,
)]
pub struct RecipeIngredientId(i32);

#[derive(Associations, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Ingredient))]
#[diesel(table_name = crate::database::schema::recipe_ingredients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeIngredient {
    pub id: RecipeIngredientId,
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub quantity: f64,
    pub unit: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::database::schema::recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub quantity: f64,
    pub unit: Option<String>,
}

#[derive(AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = crate::database::schema::recipe_ingredients)]
pub struct RecipeIngredientChanges {
    pub ingredient_id: Option<IngredientId>,
    pub quantity: Option<f64>,
    pub unit: Option<Option<String>>,
}

impl RecipeIngredientChanges {
    pub fn is_empty(&self) -> bool {
        self.ingredient_id.is_none() && self.quantity.is_none() && self.unit.is_none()
    }
}
