// Copyright 2023 Remi Bernotavicius

use super::{
    find_or_create_ingredient, non_empty, parse_quantity, prompt_required, render, Prompter,
};
use crate::database::models::{
    Ingredient, IngredientChanges, IngredientId, NewIngredient, NewRecipeIngredient, Recipe,
    RecipeId, RecipeIngredient, RecipeIngredientId,
};
use crate::database::{self, Store};
use crate::repository::Repository as _;
use crate::{Error, Result};
use clap::Subcommand;
use diesel::Connection as _;

/// Typing this instead of an ingredient name ends the add-to-recipe loop.
const DONE: &str = "done";

#[derive(Debug, Subcommand)]
pub enum IngredientCommand {
    /// List all ingredients
    List,

    /// Add a new ingredient
    Add {
        /// Name of the ingredient
        #[arg(long)]
        name: Option<String>,
    },

    /// Add ingredients to a recipe one at a time until 'done' is entered
    AddToRecipe { recipe_id: RecipeId },

    /// Remove one line from a recipe's ingredient list
    RemoveFromRecipe {
        /// The line number shown by `recipe view`
        line_id: RecipeIngredientId,

        /// Skip the confirmation prompt
        #[arg(short, long, alias = "confirm")]
        yes: bool,
    },

    /// Rename an ingredient
    Update {
        ingredient_id: IngredientId,

        /// New name for the ingredient
        #[arg(long)]
        name: Option<String>,
    },

    /// Delete an ingredient, removing it from every recipe
    Delete {
        ingredient_id: IngredientId,

        /// Skip the confirmation prompt
        #[arg(short, long, alias = "confirm")]
        yes: bool,
    },
}

pub fn run(store: &Store, command: IngredientCommand, prompter: &mut dyn Prompter) -> Result<()> {
    match command {
        IngredientCommand::List => list(store),
        IngredientCommand::Add { name } => {
            let name = match non_empty(name) {
                Some(name) => name,
                None => prompt_required(prompter, "Ingredient name")?,
            };
            add(store, &name)
        }
        IngredientCommand::AddToRecipe { recipe_id } => add_to_recipe(store, recipe_id, prompter),
        IngredientCommand::RemoveFromRecipe { line_id, yes } => {
            remove_from_recipe(store, line_id, yes, prompter)
        }
        IngredientCommand::Update {
            ingredient_id,
            name,
        } => {
            let name = match non_empty(name) {
                Some(name) => name,
                None => prompt_required(prompter, "New name")?,
            };
            update(store, ingredient_id, name)
        }
        IngredientCommand::Delete { ingredient_id, yes } => {
            delete(store, ingredient_id, yes, prompter)
        }
    }
}

fn get_ingredient(
    conn: &mut database::Connection,
    ingredient_id: IngredientId,
) -> Result<Ingredient> {
    Ingredient::get_by_id(conn, ingredient_id)?
        .ok_or_else(|| Error::not_found("Ingredient", ingredient_id))
}

fn list(store: &Store) -> Result<()> {
    let mut conn = store.connect()?;
    let ingredients = Ingredient::get_all(&mut conn)?;
    if ingredients.is_empty() {
        render::failure("No ingredients found!");
        return Ok(());
    }

    render::heading("Ingredients");
    println!("{}", render::ingredient_table(&ingredients));
    Ok(())
}

fn add(store: &Store, name: &str) -> Result<()> {
    let mut conn = store.connect()?;
    if let Some(existing) = Ingredient::get_by_name(&mut conn, name)? {
        render::note(format!(
            "Ingredient '{name}' already exists with ID {}!",
            existing.id
        ));
        return Ok(());
    }

    let ingredient = Ingredient::create(&mut conn, &NewIngredient { name: name.into() })?;
    render::success(format!(
        "Ingredient '{name}' added successfully with ID {}!",
        ingredient.id
    ));
    Ok(())
}

fn add_to_recipe(store: &Store, recipe_id: RecipeId, prompter: &mut dyn Prompter) -> Result<()> {
    let mut conn = store.connect()?;
    let recipe = Recipe::get_by_id(&mut conn, recipe_id)?
        .ok_or_else(|| Error::not_found("Recipe", recipe_id))?;

    render::success(format!("Adding ingredients to recipe: {}", recipe.name));
    loop {
        let ingredient_name = prompt_required(
            prompter,
            &format!("Ingredient name (or '{DONE}' to finish)"),
        )?;
        if ingredient_name.eq_ignore_ascii_case(DONE) {
            break;
        }

        let quantity = parse_quantity(&prompter.input("Quantity", false)?)?;
        let unit = non_empty(Some(prompter.input("Unit (e.g., g, ml, tbsp)", true)?));

        // A new ingredient is only kept together with the line that uses it
        let ingredient = conn.transaction(|conn| -> Result<Ingredient> {
            let ingredient = find_or_create_ingredient(conn, &ingredient_name)?;
            RecipeIngredient::create(
                conn,
                &NewRecipeIngredient {
                    recipe_id: recipe.id,
                    ingredient_id: ingredient.id,
                    quantity,
                    unit: unit.clone(),
                },
            )?;
            Ok(ingredient)
        })?;
        render::note(format!(
            "Added {quantity} {}{} to the recipe",
            unit.map(|u| format!("{u} ")).unwrap_or_default(),
            ingredient.name
        ));
    }
    render::success(format!("Finished adding ingredients to {}!", recipe.name));
    Ok(())
}

fn remove_from_recipe(
    store: &Store,
    line_id: RecipeIngredientId,
    yes: bool,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let mut conn = store.connect()?;
    let line = RecipeIngredient::get_by_id(&mut conn, line_id)?
        .ok_or_else(|| Error::not_found("Recipe ingredient", line_id))?;
    let ingredient = get_ingredient(&mut conn, line.ingredient_id)?;

    if !yes
        && !prompter.confirm(&format!(
            "Remove {} from recipe {}?",
            ingredient.name, line.recipe_id
        ))?
    {
        render::note("Removal cancelled.");
        return Ok(());
    }

    RecipeIngredient::delete(&mut conn, line_id)?;
    render::success(format!(
        "Removed {} from recipe {}!",
        ingredient.name, line.recipe_id
    ));
    Ok(())
}

fn update(store: &Store, ingredient_id: IngredientId, name: String) -> Result<()> {
    let mut conn = store.connect()?;
    let old = get_ingredient(&mut conn, ingredient_id)?;
    if let Some(existing) = Ingredient::get_by_name(&mut conn, &name)? {
        if existing.id != ingredient_id {
            return Err(Error::validation(format!(
                "Ingredient '{name}' already exists with ID {}!",
                existing.id
            )));
        }
    }

    let changes = IngredientChanges {
        name: Some(name.clone()),
    };
    Ingredient::update(&mut conn, ingredient_id, &changes)?
        .ok_or_else(|| Error::not_found("Ingredient", ingredient_id))?;
    render::success(format!(
        "Ingredient updated from '{}' to '{name}'!",
        old.name
    ));
    Ok(())
}

fn delete(
    store: &Store,
    ingredient_id: IngredientId,
    yes: bool,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let mut conn = store.connect()?;
    let ingredient = get_ingredient(&mut conn, ingredient_id)?;

    if !yes {
        let uses = RecipeIngredient::count_for_ingredient(&mut conn, ingredient_id)?;
        let prompt = if uses > 0 {
            render::note(format!(
                "Warning: This ingredient is used in {uses} recipe line(s)."
            ));
            "Deleting this ingredient will remove it from all recipes. Continue?".to_owned()
        } else {
            format!("Are you sure you want to delete ingredient '{}'?", ingredient.name)
        };
        if !prompter.confirm(&prompt)? {
            render::note("Deletion cancelled.");
            return Ok(());
        }
    }

    Ingredient::delete(&mut conn, ingredient_id)?;
    render::success(format!(
        "Ingredient '{}' deleted successfully!",
        ingredient.name
    ));
    Ok(())
}

#[test]
fn add_to_recipe_loop() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;
    use crate::database::models::NewRecipe;

    let (_dir, store) = test_store();
    let recipe = {
        let mut conn = store.connect().unwrap();
        Ingredient::create(
            &mut conn,
            &NewIngredient {
                name: "Flour".into(),
            },
        )
        .unwrap();
        Recipe::create(
            &mut conn,
            &NewRecipe {
                name: "Classic Pancakes".into(),
                ..Default::default()
            },
        )
        .unwrap()
    };

    let mut prompter = Scripted::new([
        "Flour", "1.5", "cups", "Sugar", "3", "tbsp", "Eggs", "2", "", "Done",
    ]);
    add_to_recipe(&store, recipe.id, &mut prompter).unwrap();
    assert!(prompter.is_finished());

    let mut conn = store.connect().unwrap();
    let lines = RecipeIngredient::lines_for(&mut conn, &recipe).unwrap();
    let summary: Vec<_> = lines
        .iter()
        .map(|(line, i)| (i.name.as_str(), line.quantity, line.unit.as_deref()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Flour", 1.5, Some("cups")),
            ("Sugar", 3.0, Some("tbsp")),
            ("Eggs", 2.0, None),
        ]
    );

    // Flour was reused, the other two were created on the way
    assert_eq!(Ingredient::get_all(&mut conn).unwrap().len(), 3);
}

#[test]
fn add_to_recipe_stops_on_bad_quantity() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;
    use crate::database::models::NewRecipe;

    let (_dir, store) = test_store();
    let recipe = Recipe::create(
        &mut store.connect().unwrap(),
        &NewRecipe {
            name: "Toast".into(),
            ..Default::default()
        },
    )
    .unwrap();

    let mut prompter = Scripted::new(["Butter", "a knob"]);
    let err = add_to_recipe(&store, recipe.id, &mut prompter).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let mut conn = store.connect().unwrap();
    assert!(RecipeIngredient::get_by_recipe_id(&mut conn, recipe.id)
        .unwrap()
        .is_empty());
    assert!(Ingredient::get_all(&mut conn).unwrap().is_empty());
}

#[test]
fn add_to_missing_recipe() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    let mut prompter = Scripted::new(Vec::<&str>::new());
    let err = add_to_recipe(&store, RecipeId::from(3), &mut prompter).unwrap_err();
    assert!(matches!(
        err,
        Error::NotFound {
            entity: "Recipe",
            id: 3
        }
    ));
}

#[test]
fn add_skips_existing_name() {
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    add(&store, "Salt").unwrap();
    add(&store, "Salt").unwrap();

    let mut conn = store.connect().unwrap();
    assert_eq!(Ingredient::get_all(&mut conn).unwrap().len(), 1);
}

#[test]
fn delete_used_ingredient_after_confirming() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;
    use crate::database::models::NewRecipe;

    let (_dir, store) = test_store();
    let (recipe, flour) = {
        let mut conn = store.connect().unwrap();
        let recipe = Recipe::create(
            &mut conn,
            &NewRecipe {
                name: "Bread".into(),
                ..Default::default()
            },
        )
        .unwrap();
        let flour = find_or_create_ingredient(&mut conn, "Flour").unwrap();
        RecipeIngredient::create(
            &mut conn,
            &NewRecipeIngredient {
                recipe_id: recipe.id,
                ingredient_id: flour.id,
                quantity: 500.0,
                unit: Some("g".into()),
            },
        )
        .unwrap();
        (recipe, flour)
    };

    let mut prompter = Scripted::new(["n"]);
    delete(&store, flour.id, false, &mut prompter).unwrap();
    let mut conn = store.connect().unwrap();
    assert_eq!(
        RecipeIngredient::get_by_recipe_id(&mut conn, recipe.id)
            .unwrap()
            .len(),
        1
    );
    drop(conn);

    let mut prompter = Scripted::new(["y"]);
    delete(&store, flour.id, false, &mut prompter).unwrap();
    let mut conn = store.connect().unwrap();
    assert!(RecipeIngredient::get_by_recipe_id(&mut conn, recipe.id)
        .unwrap()
        .is_empty());
    assert!(Recipe::get_by_id(&mut conn, recipe.id).unwrap().is_some());
}

#[test]
fn remove_line_and_rename() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;
    use crate::database::models::NewRecipe;

    let (_dir, store) = test_store();
    let (line, flour) = {
        let mut conn = store.connect().unwrap();
        let recipe = Recipe::create(
            &mut conn,
            &NewRecipe {
                name: "Bread".into(),
                ..Default::default()
            },
        )
        .unwrap();
        let flour = find_or_create_ingredient(&mut conn, "Flour").unwrap();
        let line = RecipeIngredient::create(
            &mut conn,
            &NewRecipeIngredient {
                recipe_id: recipe.id,
                ingredient_id: flour.id,
                quantity: 500.0,
                unit: Some("g".into()),
            },
        )
        .unwrap();
        (line, flour)
    };

    update(&store, flour.id, "Bread Flour".into()).unwrap();
    let mut prompter = Scripted::new(Vec::<&str>::new());
    remove_from_recipe(&store, line.id, true, &mut prompter).unwrap();

    let mut conn = store.connect().unwrap();
    assert_eq!(
        get_ingredient(&mut conn, flour.id).unwrap().name,
        "Bread Flour"
    );
    assert_eq!(RecipeIngredient::get_by_id(&mut conn, line.id).unwrap(), None);
}

#[test]
fn rename_to_taken_name_is_rejected() {
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    add(&store, "Salt").unwrap();
    add(&store, "Pepper").unwrap();

    let mut conn = store.connect().unwrap();
    let salt = Ingredient::get_by_name(&mut conn, "Salt").unwrap().unwrap();
    let pepper = Ingredient::get_by_name(&mut conn, "Pepper").unwrap().unwrap();
    drop(conn);

    let err = update(&store, pepper.id, "Salt".into()).unwrap_err();
    assert!(err.is_user_error(), "{err:?}");
    assert!(err.to_string().contains(&salt.id.to_string()));

    update(&store, salt.id, "Salt".into()).unwrap();

    let mut conn = store.connect().unwrap();
    assert_eq!(get_ingredient(&mut conn, pepper.id).unwrap().name, "Pepper");
}
