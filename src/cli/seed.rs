// Copyright 2023 Remi Bernotavicius

use super::{find_or_create_category, find_or_create_ingredient, render};
use crate::database::models::{NewRecipe, NewRecipeIngredient, Recipe, RecipeIngredient};
use crate::database::{self, Store};
use crate::repository::Repository as _;
use crate::Result;
use diesel::Connection as _;

const CATEGORIES: &[&str] = &[
    "Breakfast",
    "Lunch",
    "Dinner",
    "Dessert",
    "Appetizer",
    "Vegetarian",
    "Vegan",
];

struct SampleRecipe {
    name: &'static str,
    description: &'static str,
    prep_time: i32,
    cook_time: i32,
    servings: i32,
    category: &'static str,
    instructions: &'static str,
    lines: &'static [(&'static str, f64, &'static str)],
}

const RECIPES: &[SampleRecipe] = &[
    SampleRecipe {
        name: "Classic Pancakes",
        description: "Fluffy and delicious pancakes for a perfect breakfast.",
        prep_time: 10,
        cook_time: 15,
        servings: 4,
        category: "Breakfast",
        instructions: "1. Whisk the flour, sugar, baking powder and salt together.\n\
                       2. Beat in the milk, egg and melted butter until smooth.\n\
                       3. Cook ladlefuls on a hot greased pan until golden on both sides.",
        lines: &[
            ("Flour", 1.5, "cups"),
            ("Sugar", 3.0, "tbsp"),
            ("Baking Powder", 1.0, "tbsp"),
            ("Salt", 0.5, "tsp"),
            ("Milk", 1.25, "cups"),
            ("Egg", 1.0, ""),
            ("Butter", 3.0, "tbsp"),
        ],
    },
    SampleRecipe {
        name: "Tomato Basil Pasta",
        description: "A quick weeknight pasta with a fresh tomato sauce.",
        prep_time: 10,
        cook_time: 20,
        servings: 2,
        category: "Dinner",
        instructions: "1. Boil the pasta in salted water.\n\
                       2. Soften the garlic in olive oil, add the tomatoes and simmer.\n\
                       3. Toss the pasta with the sauce and torn basil.",
        lines: &[
            ("Pasta", 200.0, "g"),
            ("Tomato", 4.0, ""),
            ("Garlic", 2.0, "cloves"),
            ("Olive Oil", 2.0, "tbsp"),
            ("Basil", 1.0, "handful"),
            ("Salt", 1.0, "tsp"),
        ],
    },
    SampleRecipe {
        name: "Chocolate Mug Cake",
        description: "A single serving cake made in the microwave.",
        prep_time: 5,
        cook_time: 2,
        servings: 1,
        category: "Dessert",
        instructions: "1. Stir everything together in a large mug.\n\
                       2. Microwave for 90 seconds and let it rest a minute.",
        lines: &[
            ("Flour", 4.0, "tbsp"),
            ("Sugar", 3.0, "tbsp"),
            ("Cocoa Powder", 2.0, "tbsp"),
            ("Milk", 3.0, "tbsp"),
            ("Butter", 2.0, "tbsp"),
        ],
    },
];

fn insert_samples(conn: &mut database::Connection) -> Result<usize> {
    for name in CATEGORIES {
        find_or_create_category(conn, name)?;
    }

    for sample in RECIPES {
        let category = find_or_create_category(conn, sample.category)?;
        let recipe = Recipe::create(
            conn,
            &NewRecipe {
                name: sample.name.into(),
                description: Some(sample.description.into()),
                prep_time: Some(sample.prep_time),
                cook_time: Some(sample.cook_time),
                serving_size: Some(sample.servings),
                instructions: Some(sample.instructions.into()),
                category_id: Some(category.id),
            },
        )?;

        for &(ingredient, quantity, unit) in sample.lines {
            let ingredient = find_or_create_ingredient(conn, ingredient)?;
            RecipeIngredient::create(
                conn,
                &NewRecipeIngredient {
                    recipe_id: recipe.id,
                    ingredient_id: ingredient.id,
                    quantity,
                    unit: (!unit.is_empty()).then(|| unit.to_owned()),
                },
            )?;
        }
        log::info!("seeded recipe {:?}", sample.name);
    }
    Ok(RECIPES.len())
}

/// Fills an empty catalog with a few sample recipes. A catalog that already has recipes is left
/// alone.
pub fn run(store: &Store) -> Result<()> {
    let mut conn = store.connect()?;
    if !Recipe::get_all(&mut conn)?.is_empty() {
        render::note("The catalog already has recipes, nothing to seed.");
        return Ok(());
    }

    let added = conn.transaction(insert_samples)?;
    render::success(format!("Added {added} sample recipes!"));
    Ok(())
}

#[test]
fn seeds_once() {
    use crate::cli::test_store;
    use crate::database::models::{Category, Ingredient};
    use crate::repository::RecipeFilter;

    let (_dir, store) = test_store();
    run(&store).unwrap();
    run(&store).unwrap();

    let mut conn = store.connect().unwrap();
    assert_eq!(Recipe::get_all(&mut conn).unwrap().len(), RECIPES.len());
    assert_eq!(Category::get_all(&mut conn).unwrap().len(), CATEGORIES.len());

    let flour = Ingredient::get_by_name(&mut conn, "Flour").unwrap().unwrap();
    assert_eq!(
        RecipeIngredient::count_for_ingredient(&mut conn, flour.id).unwrap(),
        2
    );

    let found = Recipe::search(
        &mut conn,
        &RecipeFilter {
            ingredient: Some("cocoa".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Chocolate Mug Cake");
}
