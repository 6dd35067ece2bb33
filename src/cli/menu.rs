// Copyright 2023 Remi Bernotavicius

use super::{
    parse_number, prompt_text, recipe, render, report, CategoryCommand, Command,
    IngredientCommand, Prompter, RecipeCommand, RecipeFields,
};
use crate::database::Store;
use crate::{Error, Result};
use derive_more::Display;
use std::str::FromStr;
use strum::IntoEnumIterator as _;

#[derive(Debug, Display, strum::EnumIter, Copy, Clone, PartialEq, Eq)]
enum MenuAction {
    #[display("List all recipes")]
    ListRecipes,
    #[display("View recipe details")]
    ViewRecipe,
    #[display("Add a new recipe")]
    AddRecipe,
    #[display("Update a recipe")]
    UpdateRecipe,
    #[display("Delete a recipe")]
    DeleteRecipe,
    #[display("Search recipes")]
    SearchRecipes,
    #[display("List all ingredients")]
    ListIngredients,
    #[display("Add a new ingredient")]
    AddIngredient,
    #[display("Add ingredients to a recipe")]
    AddToRecipe,
    #[display("Remove an ingredient from a recipe")]
    RemoveFromRecipe,
    #[display("Rename an ingredient")]
    UpdateIngredient,
    #[display("Delete an ingredient")]
    DeleteIngredient,
    #[display("List all categories")]
    ListCategories,
    #[display("Add a new category")]
    AddCategory,
    #[display("Rename a category")]
    UpdateCategory,
    #[display("Delete a category")]
    DeleteCategory,
    #[display("Quit")]
    Quit,
}

fn prompt_id<T: FromStr>(prompter: &mut dyn Prompter, field: &str) -> Result<T> {
    let answer = prompter.input(field, false)?;
    parse_number(field, &answer)
}

/// Collects whatever the chosen action needs up front. Names and fields left out here are asked
/// for by the action itself.
fn command_for(
    store: &Store,
    action: MenuAction,
    prompter: &mut dyn Prompter,
) -> Result<Option<Command>> {
    let command = match action {
        MenuAction::ListRecipes => Command::Recipe(RecipeCommand::List),
        MenuAction::ViewRecipe => Command::Recipe(RecipeCommand::View {
            recipe_id: prompt_id(prompter, "Recipe ID")?,
        }),
        MenuAction::AddRecipe => Command::Recipe(RecipeCommand::Add {
            fields: RecipeFields::default(),
        }),
        MenuAction::UpdateRecipe => {
            let recipe_id = prompt_id(prompter, "Recipe ID")?;
            let recipe = recipe::get_recipe(&mut store.connect()?, recipe_id)?;
            render::note(format!("Updating '{}', leave a field blank to keep it.", recipe.name));
            let fields = RecipeFields::default().prompt_missing(prompter, false)?;
            Command::Recipe(RecipeCommand::Update {
                recipe_id,
                fields,
                no_category: false,
            })
        }
        MenuAction::DeleteRecipe => Command::Recipe(RecipeCommand::Delete {
            recipe_id: prompt_id(prompter, "Recipe ID")?,
            yes: false,
        }),
        MenuAction::SearchRecipes => Command::Recipe(RecipeCommand::Search {
            name: prompt_text(prompter, "Name contains (blank for any)")?,
            category: prompt_text(prompter, "Category contains (blank for any)")?,
            ingredient: prompt_text(prompter, "Ingredient contains (blank for any)")?,
        }),
        MenuAction::ListIngredients => Command::Ingredient(IngredientCommand::List),
        MenuAction::AddIngredient => Command::Ingredient(IngredientCommand::Add { name: None }),
        MenuAction::AddToRecipe => Command::Ingredient(IngredientCommand::AddToRecipe {
            recipe_id: prompt_id(prompter, "Recipe ID")?,
        }),
        MenuAction::RemoveFromRecipe => Command::Ingredient(IngredientCommand::RemoveFromRecipe {
            line_id: prompt_id(prompter, "Line ID")?,
            yes: false,
        }),
        MenuAction::UpdateIngredient => Command::Ingredient(IngredientCommand::Update {
            ingredient_id: prompt_id(prompter, "Ingredient ID")?,
            name: None,
        }),
        MenuAction::DeleteIngredient => Command::Ingredient(IngredientCommand::Delete {
            ingredient_id: prompt_id(prompter, "Ingredient ID")?,
            yes: false,
        }),
        MenuAction::ListCategories => Command::Category(CategoryCommand::List),
        MenuAction::AddCategory => Command::Category(CategoryCommand::Add { name: None }),
        MenuAction::UpdateCategory => Command::Category(CategoryCommand::Update {
            category_id: prompt_id(prompter, "Category ID")?,
            name: None,
        }),
        MenuAction::DeleteCategory => Command::Category(CategoryCommand::Delete {
            category_id: prompt_id(prompter, "Category ID")?,
            yes: false,
        }),
        MenuAction::Quit => return Ok(None),
    };
    Ok(Some(command))
}

/// Loops over the numbered menu until Quit is chosen. A failed action is reported and the menu
/// comes back; only losing the terminal ends the loop early.
pub fn run(store: &Store, prompter: &mut dyn Prompter) -> Result<()> {
    let actions: Vec<MenuAction> = MenuAction::iter().collect();
    let items: Vec<String> = actions
        .iter()
        .enumerate()
        .map(|(i, action)| format!("{}. {action}", i + 1))
        .collect();

    loop {
        render::heading("Culinary Compass");
        let action = actions[prompter.select("Enter your choice", &items)?];
        log::debug!("menu action {action:?}");

        let result = command_for(store, action, prompter).and_then(|command| match command {
            Some(command) => super::run(store, command, prompter).map(|()| true),
            None => Ok(false),
        });
        match result {
            Ok(true) => {}
            Ok(false) => {
                render::success("Goodbye!");
                return Ok(());
            }
            Err(err @ Error::Prompt(_)) => return Err(err),
            Err(err) => report(&err),
        }
    }
}

#[test]
fn numbered_items_end_with_quit() {
    let actions: Vec<MenuAction> = MenuAction::iter().collect();
    assert_eq!(actions[0].to_string(), "List all recipes");
    assert_eq!(actions.last(), Some(&MenuAction::Quit));
    assert_eq!(actions.len(), 17);
}

#[test]
fn failed_actions_return_to_the_menu() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;
    use crate::database::models::Category;
    use crate::repository::Repository as _;

    let (_dir, store) = test_store();
    let mut prompter = Scripted::new([
        // Add a new category
        "13",
        "Breakfast",
        // View recipe details, not a number
        "1",
        "abc",
        // View recipe details, no such recipe
        "1",
        "99",
        // Quit
        "16",
    ]);
    run(&store, &mut prompter).unwrap();
    assert!(prompter.is_finished());

    let mut conn = store.connect().unwrap();
    let categories = Category::get_all(&mut conn).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Breakfast");
}

#[test]
fn menu_recipe_workflow() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;
    use crate::database::models::{Recipe, RecipeIngredient};
    use crate::repository::Repository as _;

    let (_dir, store) = test_store();
    let mut prompter = Scripted::new([
        // Add a new recipe
        "2",
        "Classic Pancakes",
        "",
        "10",
        "15",
        "4",
        "Breakfast",
        "",
        // Add ingredients to a recipe
        "8",
        "1",
        "Flour",
        "1.5",
        "cups",
        "done",
        // Update a recipe, only the servings
        "3",
        "1",
        "",
        "",
        "",
        "",
        "6",
        "",
        "",
        // Search recipes
        "5",
        "pancake",
        "",
        "",
        // Quit
        "16",
    ]);
    run(&store, &mut prompter).unwrap();
    assert!(prompter.is_finished());

    let mut conn = store.connect().unwrap();
    let recipes = Recipe::get_all(&mut conn).unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].serving_size, Some(6));
    assert_eq!(recipes[0].prep_time, Some(10));

    let lines = RecipeIngredient::get_by_recipe_id(&mut conn, recipes[0].id).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 1.5);
}

#[test]
fn update_of_missing_recipe_asks_nothing_more() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    let mut prompter = Scripted::new([
        // Update a recipe that isn't there
        "3",
        "42",
        // Quit
        "16",
    ]);
    run(&store, &mut prompter).unwrap();
    assert!(prompter.is_finished());
}
