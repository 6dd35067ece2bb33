// Copyright 2023 Remi Bernotavicius

use super::{
    find_or_create_category, non_empty, prompt_number, prompt_required, prompt_text, render,
    Prompter,
};
use crate::database::models::{Category, NewRecipe, Recipe, RecipeChanges, RecipeId};
use crate::database::{self, models::RecipeIngredient, Store};
use crate::repository::{RecipeFilter, Repository as _};
use crate::{Error, Result};
use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum RecipeCommand {
    /// List all recipes
    List,

    /// Show a recipe with its ingredients and instructions
    View { recipe_id: RecipeId },

    /// Add a new recipe. Without --name every field is asked for interactively.
    Add {
        #[command(flatten)]
        fields: RecipeFields,
    },

    /// Change the given fields of a recipe
    Update {
        recipe_id: RecipeId,

        #[command(flatten)]
        fields: RecipeFields,

        /// Remove the recipe from its category
        #[arg(long, conflicts_with = "category")]
        no_category: bool,
    },

    /// Delete a recipe and its ingredient list
    Delete {
        recipe_id: RecipeId,

        /// Skip the confirmation prompt
        #[arg(short, long, alias = "confirm")]
        yes: bool,
    },

    /// Search recipes by name, category or ingredient
    Search {
        /// Part of the recipe name, any case
        #[arg(long)]
        name: Option<String>,

        /// Part of the category name
        #[arg(long)]
        category: Option<String>,

        /// Part of the name of any ingredient in the recipe
        #[arg(long)]
        ingredient: Option<String>,
    },
}

#[derive(Debug, Default, Clone, Args)]
pub struct RecipeFields {
    /// Name of the recipe
    #[arg(long)]
    pub name: Option<String>,

    /// Short description
    #[arg(long)]
    pub description: Option<String>,

    /// Preparation time in minutes
    #[arg(long)]
    pub prep_time: Option<i32>,

    /// Cooking time in minutes
    #[arg(long)]
    pub cook_time: Option<i32>,

    /// Number of servings
    #[arg(long)]
    pub servings: Option<i32>,

    /// Category name, created if it doesn't exist yet
    #[arg(long)]
    pub category: Option<String>,

    /// Cooking instructions
    #[arg(long)]
    pub instructions: Option<String>,
}

impl RecipeFields {
    /// Asks for every field that wasn't given. Blank answers leave the field unset.
    pub fn prompt_missing(
        mut self,
        prompter: &mut dyn Prompter,
        name_required: bool,
    ) -> Result<Self> {
        if self.name.is_none() {
            self.name = if name_required {
                Some(prompt_required(prompter, "Recipe name")?)
            } else {
                prompt_text(prompter, "Recipe name (blank to keep)")?
            };
        }
        if self.description.is_none() {
            self.description = prompt_text(prompter, "Description (optional)")?;
        }
        if self.prep_time.is_none() {
            self.prep_time = prompt_number(prompter, "Preparation time (minutes)")?;
        }
        if self.cook_time.is_none() {
            self.cook_time = prompt_number(prompter, "Cooking time (minutes)")?;
        }
        if self.servings.is_none() {
            self.servings = prompt_number(prompter, "Number of servings")?;
        }
        if self.category.is_none() {
            self.category = prompt_text(prompter, "Category (optional)")?;
        }
        if self.instructions.is_none() {
            self.instructions = prompt_text(prompter, "Instructions")?;
        }
        Ok(self)
    }
}

pub fn run(store: &Store, command: RecipeCommand, prompter: &mut dyn Prompter) -> Result<()> {
    match command {
        RecipeCommand::List => list(store),
        RecipeCommand::View { recipe_id } => view(store, recipe_id),
        RecipeCommand::Add { fields } => {
            let fields = if fields.name.is_none() {
                fields.prompt_missing(prompter, true)?
            } else {
                fields
            };
            add(store, fields).map(|_| ())
        }
        RecipeCommand::Update {
            recipe_id,
            fields,
            no_category,
        } => update(store, recipe_id, fields, no_category),
        RecipeCommand::Delete { recipe_id, yes } => delete(store, recipe_id, yes, prompter),
        RecipeCommand::Search {
            name,
            category,
            ingredient,
        } => search(
            store,
            &RecipeFilter {
                name: non_empty(name),
                category: non_empty(category),
                ingredient: non_empty(ingredient),
            },
        ),
    }
}

pub(super) fn get_recipe(
    conn: &mut database::Connection,
    recipe_id: RecipeId,
) -> Result<Recipe> {
    Recipe::get_by_id(conn, recipe_id)?.ok_or_else(|| Error::not_found("Recipe", recipe_id))
}

fn list(store: &Store) -> Result<()> {
    let mut conn = store.connect()?;
    let recipes = Recipe::get_all(&mut conn)?;
    if recipes.is_empty() {
        render::failure("No recipes found!");
        return Ok(());
    }

    let names = render::category_names(Category::get_all(&mut conn)?);
    render::heading("Recipes");
    println!("{}", render::recipe_table(&recipes, &names, true));
    Ok(())
}

fn view(store: &Store, recipe_id: RecipeId) -> Result<()> {
    let mut conn = store.connect()?;
    let recipe = get_recipe(&mut conn, recipe_id)?;

    let category = match recipe.category_id {
        Some(category_id) => Category::get_by_id(&mut conn, category_id)?,
        None => None,
    };
    let lines = RecipeIngredient::lines_for(&mut conn, &recipe)?;

    print!(
        "{}",
        render::recipe_details(&recipe, category.as_ref().map(|c| c.name.as_str()), &lines)
    );
    Ok(())
}

fn add(store: &Store, fields: RecipeFields) -> Result<Recipe> {
    let name =
        non_empty(fields.name).ok_or_else(|| Error::validation("Recipe name is required"))?;

    let mut conn = store.connect()?;
    let category_id = match non_empty(fields.category) {
        Some(category) => Some(find_or_create_category(&mut conn, &category)?.id),
        None => None,
    };

    let recipe = Recipe::create(
        &mut conn,
        &NewRecipe {
            name,
            description: non_empty(fields.description),
            prep_time: fields.prep_time,
            cook_time: fields.cook_time,
            serving_size: fields.servings,
            instructions: non_empty(fields.instructions),
            category_id,
        },
    )?;

    render::success(format!(
        "Recipe '{}' added successfully with ID {}!",
        recipe.name, recipe.id
    ));
    render::note("Now you can add ingredients to this recipe using:");
    render::note(format!("  ingredient add-to-recipe {}", recipe.id));
    Ok(recipe)
}

fn update(
    store: &Store,
    recipe_id: RecipeId,
    fields: RecipeFields,
    no_category: bool,
) -> Result<()> {
    let mut conn = store.connect()?;
    get_recipe(&mut conn, recipe_id)?;

    let mut changes = RecipeChanges {
        name: non_empty(fields.name),
        description: fields.description.map(|d| non_empty(Some(d))),
        prep_time: fields.prep_time.map(Some),
        cook_time: fields.cook_time.map(Some),
        serving_size: fields.servings.map(Some),
        instructions: fields.instructions.map(|i| non_empty(Some(i))),
        category_id: None,
    };
    if no_category {
        changes.category_id = Some(None);
    } else if let Some(category) = non_empty(fields.category) {
        changes.category_id = Some(Some(find_or_create_category(&mut conn, &category)?.id));
    }

    if changes.is_empty() {
        render::note("No changes specified for update.");
        return Ok(());
    }

    Recipe::update(&mut conn, recipe_id, &changes)?
        .ok_or_else(|| Error::not_found("Recipe", recipe_id))?;
    render::success(format!("Recipe with ID {recipe_id} updated successfully!"));
    Ok(())
}

fn delete(
    store: &Store,
    recipe_id: RecipeId,
    yes: bool,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let mut conn = store.connect()?;
    let recipe = get_recipe(&mut conn, recipe_id)?;

    if !yes
        && !prompter.confirm(&format!(
            "Are you sure you want to delete recipe '{}'?",
            recipe.name
        ))?
    {
        render::note("Deletion cancelled.");
        return Ok(());
    }

    if !Recipe::delete(&mut conn, recipe_id)? {
        return Err(Error::not_found("Recipe", recipe_id));
    }
    render::success(format!("Recipe '{}' deleted successfully!", recipe.name));
    Ok(())
}

fn search(store: &Store, filter: &RecipeFilter) -> Result<()> {
    if filter.is_empty() {
        render::note("No search criteria given, showing every recipe.");
    }

    let mut conn = store.connect()?;
    let recipes = Recipe::search(&mut conn, filter)?;
    if recipes.is_empty() {
        render::note("No recipes found matching your search criteria.");
        return Ok(());
    }

    let names = render::category_names(Category::get_all(&mut conn)?);
    render::heading("Search Results");
    println!("{}", render::recipe_table(&recipes, &names, false));
    Ok(())
}

#[test]
fn add_creates_category_once() {
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    let fields = RecipeFields {
        name: Some("Classic Pancakes".into()),
        prep_time: Some(10),
        cook_time: Some(15),
        servings: Some(4),
        category: Some("Breakfast".into()),
        ..Default::default()
    };
    let pancakes = add(&store, fields.clone()).unwrap();
    let waffles = add(
        &store,
        RecipeFields {
            name: Some("Waffles".into()),
            ..fields
        },
    )
    .unwrap();

    let mut conn = store.connect().unwrap();
    let breakfast = Category::get_by_name(&mut conn, "Breakfast")
        .unwrap()
        .unwrap();
    assert_eq!(pancakes.category_id, Some(breakfast.id));
    assert_eq!(waffles.category_id, Some(breakfast.id));
    assert_eq!(Category::get_all(&mut conn).unwrap().len(), 1);
    assert_eq!(pancakes.description, None);
}

#[test]
fn add_requires_name() {
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    let err = add(
        &store,
        RecipeFields {
            name: Some("  ".into()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn interactive_add_prompts_every_field() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    let mut prompter = Scripted::new([
        "Classic Pancakes",
        "Fluffy pancakes",
        "10",
        "15",
        "",
        "Breakfast",
        "Mix and fry",
    ]);
    run(
        &store,
        RecipeCommand::Add {
            fields: RecipeFields::default(),
        },
        &mut prompter,
    )
    .unwrap();
    assert!(prompter.is_finished());

    let mut conn = store.connect().unwrap();
    let recipes = Recipe::get_all(&mut conn).unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].name, "Classic Pancakes");
    assert_eq!(recipes[0].description.as_deref(), Some("Fluffy pancakes"));
    assert_eq!(recipes[0].prep_time, Some(10));
    assert_eq!(recipes[0].cook_time, Some(15));
    assert_eq!(recipes[0].serving_size, None);
    assert_eq!(recipes[0].instructions.as_deref(), Some("Mix and fry"));
    assert!(recipes[0].category_id.is_some());
}

#[test]
fn interactive_add_rejects_bad_number() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    let mut prompter = Scripted::new(["Classic Pancakes", "", "ten"]);
    let err = run(
        &store,
        RecipeCommand::Add {
            fields: RecipeFields::default(),
        },
        &mut prompter,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let mut conn = store.connect().unwrap();
    assert!(Recipe::get_all(&mut conn).unwrap().is_empty());
}

#[test]
fn update_only_touches_given_fields() {
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    let created = add(
        &store,
        RecipeFields {
            name: Some("Classic Pancakes".into()),
            prep_time: Some(10),
            category: Some("Breakfast".into()),
            ..Default::default()
        },
    )
    .unwrap();

    update(
        &store,
        created.id,
        RecipeFields {
            servings: Some(6),
            ..Default::default()
        },
        false,
    )
    .unwrap();

    let mut conn = store.connect().unwrap();
    let updated = Recipe::get_by_id(&mut conn, created.id).unwrap().unwrap();
    assert_eq!(
        updated,
        Recipe {
            serving_size: Some(6),
            ..created.clone()
        }
    );
    drop(conn);

    update(&store, created.id, RecipeFields::default(), true).unwrap();
    let mut conn = store.connect().unwrap();
    let updated = Recipe::get_by_id(&mut conn, created.id).unwrap().unwrap();
    assert_eq!(updated.category_id, None);
    assert_eq!(updated.serving_size, Some(6));
}

#[test]
fn missing_recipe_is_not_found() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    let missing = RecipeId::from(12);
    let mut prompter = Scripted::new(Vec::<&str>::new());

    for command in [
        RecipeCommand::View { recipe_id: missing },
        RecipeCommand::Update {
            recipe_id: missing,
            fields: RecipeFields::default(),
            no_category: false,
        },
        RecipeCommand::Delete {
            recipe_id: missing,
            yes: true,
        },
    ] {
        let err = run(&store, command, &mut prompter).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }), "{err:?}");
    }
}

#[test]
fn delete_asks_first() {
    use crate::cli::prompt::Scripted;
    use crate::cli::test_store;

    let (_dir, store) = test_store();
    let created = add(
        &store,
        RecipeFields {
            name: Some("Toast".into()),
            ..Default::default()
        },
    )
    .unwrap();

    let mut prompter = Scripted::new(["n"]);
    delete(&store, created.id, false, &mut prompter).unwrap();
    let mut conn = store.connect().unwrap();
    assert!(Recipe::get_by_id(&mut conn, created.id).unwrap().is_some());
    drop(conn);

    let mut prompter = Scripted::new(["y"]);
    delete(&store, created.id, false, &mut prompter).unwrap();
    let mut conn = store.connect().unwrap();
    assert!(Recipe::get_by_id(&mut conn, created.id).unwrap().is_none());
}
