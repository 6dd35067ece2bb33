// Copyright 2023 Remi Bernotavicius

use super::render;
use crate::database::models::{Category, Ingredient, Recipe, RecipeIngredient};
use crate::database::{self, Store};
use crate::repository::Repository as _;
use crate::Result;
use comfy_table::Table;

/// Every row of every table with raw ids, in table order.
fn tables(conn: &mut database::Connection) -> Result<Vec<(&'static str, Table)>> {
    let mut recipes = render::new_table(vec![
        "ID",
        "Name",
        "Description",
        "Prep",
        "Cook",
        "Servings",
        "Category ID",
        "Instructions",
    ]);
    for recipe in Recipe::get_all(conn)? {
        recipes.add_row(vec![
            recipe.id.to_string(),
            recipe.name,
            render::or_dash(recipe.description),
            render::or_dash(recipe.prep_time),
            render::or_dash(recipe.cook_time),
            render::or_dash(recipe.serving_size),
            render::or_dash(recipe.category_id),
            render::or_dash(recipe.instructions),
        ]);
    }

    let ingredients = render::ingredient_table(&Ingredient::get_all(conn)?);

    let mut categories = render::new_table(vec!["ID", "Name"]);
    for category in Category::get_all(conn)? {
        categories.add_row(vec![category.id.to_string(), category.name]);
    }

    let mut lines = render::new_table(vec![
        "ID",
        "Recipe ID",
        "Ingredient ID",
        "Quantity",
        "Unit",
    ]);
    for line in RecipeIngredient::get_all(conn)? {
        lines.add_row(vec![
            line.id.to_string(),
            line.recipe_id.to_string(),
            line.ingredient_id.to_string(),
            line.quantity.to_string(),
            render::or_dash(line.unit),
        ]);
    }

    Ok(vec![
        ("Recipes", recipes),
        ("Ingredients", ingredients),
        ("Categories", categories),
        ("Recipe Ingredients", lines),
    ])
}

pub fn run(store: &Store) -> Result<()> {
    let mut conn = store.connect()?;
    for (title, table) in tables(&mut conn)? {
        println!();
        render::heading(title);
        println!("{table}");
    }
    Ok(())
}

#[test]
fn dumps_every_table() {
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    super::seed::run(&store).unwrap();

    let mut conn = store.connect().unwrap();
    let dumped = tables(&mut conn).unwrap();
    let titles: Vec<_> = dumped.iter().map(|(title, _)| *title).collect();
    assert_eq!(
        titles,
        vec!["Recipes", "Ingredients", "Categories", "Recipe Ingredients"]
    );

    let rows = |i: usize| dumped[i].1.row_iter().count();
    assert_eq!(rows(0), Recipe::get_all(&mut conn).unwrap().len());
    assert_eq!(rows(1), Ingredient::get_all(&mut conn).unwrap().len());
    assert_eq!(rows(2), Category::get_all(&mut conn).unwrap().len());
    assert_eq!(rows(3), RecipeIngredient::get_all(&mut conn).unwrap().len());
    assert!(dumped[0].1.to_string().contains("Classic Pancakes"));
}

#[test]
fn empty_catalog_dumps_headers_only() {
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    let mut conn = store.connect().unwrap();
    for (_, table) in tables(&mut conn).unwrap() {
        assert_eq!(table.row_iter().count(), 0);
    }
}
