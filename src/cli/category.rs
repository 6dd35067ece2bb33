// Copyright 2023 Remi Bernotavicius

use super::{non_empty, prompt_required, render, Prompter};
use crate::database::models::{Category, CategoryChanges, CategoryId, NewCategory, Recipe};
use crate::database::{self, Store};
use crate::repository::Repository as _;
use crate::{Error, Result};
use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List all categories with how many recipes each holds
    List,

    /// Add a new category
    Add {
        /// Name of the category
        #[arg(long)]
        name: Option<String>,
    },

    /// Rename a category
    Update {
        category_id: CategoryId,

        /// New name for the category
        #[arg(long)]
        name: Option<String>,
    },

    /// Delete a category. Its recipes are kept and become uncategorized.
    Delete {
        category_id: CategoryId,

        /// Skip the confirmation prompt
        #[arg(short, long, alias = "confirm")]
        yes: bool,
    },
}

pub fn run(store: &Store, command: CategoryCommand, prompter: &mut dyn Prompter) -> Result<()> {
    match command {
        CategoryCommand::List => list(store),
        CategoryCommand::Add { name } => {
            let name = match non_empty(name) {
                Some(name) => name,
                None => prompt_required(prompter, "Category name")?,
            };
            add(store, &name)
        }
        CategoryCommand::Update { category_id, name } => {
            let name = match non_empty(name) {
                Some(name) => name,
                None => prompt_required(prompter, "New name")?,
            };
            update(store, category_id, name)
        }
        CategoryCommand::Delete { category_id, yes } => delete(store, category_id, yes, prompter),
    }
}

fn get_category(conn: &mut database::Connection, category_id: CategoryId) -> Result<Category> {
    Category::get_by_id(conn, category_id)?
        .ok_or_else(|| Error::not_found("Category", category_id))
}

fn list(store: &Store) -> Result<()> {
    let mut conn = store.connect()?;
    let categories = Category::get_all(&mut conn)?;
    if categories.is_empty() {
        render::failure("No categories found!");
        return Ok(());
    }

    let mut counted = Vec::with_capacity(categories.len());
    for category in categories {
        let count = Recipe::count_in_category(&mut conn, category.id)?;
        counted.push((category, count));
    }

    render::heading("Categories");
    println!("{}", render::category_table(&counted));
    Ok(())
}

fn add(store: &Store, name: &str) -> Result<()> {
    let mut conn = store.connect()?;
    if let Some(existing) = Category::get_by_name(&mut conn, name)? {
        render::note(format!(
            "Category '{name}' already exists with ID {}!",
            existing.id
        ));
        return Ok(());
    }

    let category = Category::create(&mut conn, &NewCategory { name: name.into() })?;
    render::success(format!(
        "Category '{name}' added successfully with ID {}!",
        category.id
    ));
    Ok(())
}

fn update(store: &Store, category_id: CategoryId, name: String) -> Result<()> {
    let mut conn = store.connect()?;
    let old = get_category(&mut conn, category_id)?;
    if let Some(existing) = Category::get_by_name(&mut conn, &name)? {
        if existing.id != category_id {
            return Err(Error::validation(format!(
                "Category '{name}' already exists with ID {}!",
                existing.id
            )));
        }
    }

    let changes = CategoryChanges {
        name: Some(name.clone()),
    };
    Category::update(&mut conn, category_id, &changes)?
        .ok_or_else(|| Error::not_found("Category", category_id))?;
    render::success(format!(
        "Category updated from '{}' to '{name}'!",
        old.name
    ));
    Ok(())
}

fn delete(
    store: &Store,
    category_id: CategoryId,
    yes: bool,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let mut conn = store.connect()?;
    let category = get_category(&mut conn, category_id)?;

    if !yes {
        let recipes = Recipe::count_in_category(&mut conn, category_id)?;
        let prompt = if recipes > 0 {
            render::note(format!(
                "Warning: This category is used in {recipes} recipe(s)."
            ));
            "Recipes in this category will become uncategorized. Continue?".to_owned()
        } else {
            format!("Are you sure you want to delete category '{}'?", category.name)
        };
        if !prompter.confirm(&prompt)? {
            render::note("Deletion cancelled.");
            return Ok(());
        }
    }

    Category::delete(&mut conn, category_id)?;
    render::success(format!(
        "Category '{}' deleted successfully!",
        category.name
    ));
    Ok(())
}

#[test]
fn delete_keeps_recipes_uncategorized() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;
    use crate::database::models::NewRecipe;

    let (_dir, store) = test_store();
    add(&store, "Breakfast").unwrap();
    let recipe = {
        let mut conn = store.connect().unwrap();
        let breakfast = Category::get_by_name(&mut conn, "Breakfast")
            .unwrap()
            .unwrap();
        Recipe::create(
            &mut conn,
            &NewRecipe {
                name: "Classic Pancakes".into(),
                category_id: Some(breakfast.id),
                ..Default::default()
            },
        )
        .unwrap()
    };
    let category_id = recipe.category_id.unwrap();

    let mut prompter = Scripted::new(["y"]);
    delete(&store, category_id, false, &mut prompter).unwrap();
    assert!(prompter.is_finished());

    let mut conn = store.connect().unwrap();
    assert_eq!(Category::get_by_id(&mut conn, category_id).unwrap(), None);
    let kept = Recipe::get_by_id(&mut conn, recipe.id).unwrap().unwrap();
    assert_eq!(kept.category_id, None);

    let names = render::category_names(Category::get_all(&mut conn).unwrap());
    assert_eq!(
        render::category_label(&names, kept.category_id),
        render::UNCATEGORIZED
    );
}

#[test]
fn rename_and_duplicates() {
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    add(&store, "Desert").unwrap();
    add(&store, "Desert").unwrap();

    let mut conn = store.connect().unwrap();
    let all = Category::get_all(&mut conn).unwrap();
    assert_eq!(all.len(), 1);
    drop(conn);

    update(&store, all[0].id, "Dessert".into()).unwrap();
    let mut conn = store.connect().unwrap();
    assert_eq!(get_category(&mut conn, all[0].id).unwrap().name, "Dessert");
    drop(conn);

    let err = update(&store, CategoryId::from(77), "Lunch".into()).unwrap_err();
    assert!(err.is_user_error());
}

#[test]
fn declined_delete_keeps_category() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    add(&store, "Vegan").unwrap();
    let id = {
        let mut conn = store.connect().unwrap();
        Category::get_by_name(&mut conn, "Vegan").unwrap().unwrap().id
    };

    let mut prompter = Scripted::new(["n"]);
    delete(&store, id, false, &mut prompter).unwrap();

    let mut conn = store.connect().unwrap();
    assert!(Category::get_by_id(&mut conn, id).unwrap().is_some());
}

#[test]
fn rename_to_taken_name_is_rejected() {
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    add(&store, "Lunch").unwrap();
    add(&store, "Dinner").unwrap();

    let mut conn = store.connect().unwrap();
    let lunch = Category::get_by_name(&mut conn, "Lunch").unwrap().unwrap();
    let dinner = Category::get_by_name(&mut conn, "Dinner").unwrap().unwrap();
    drop(conn);

    let err = update(&store, dinner.id, "Lunch".into()).unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "{err:?}");
    assert!(err.to_string().contains(&lunch.id.to_string()));

    // Keeping the current name is not a clash
    update(&store, lunch.id, "Lunch".into()).unwrap();

    let mut conn = store.connect().unwrap();
    assert_eq!(get_category(&mut conn, dinner.id).unwrap().name, "Dinner");
}
