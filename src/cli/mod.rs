// Copyright 2023 Remi Bernotavicius

use crate::database::models::{Category, Ingredient, NewCategory, NewIngredient};
use crate::database::{self, Store};
use crate::repository::Repository as _;
use crate::{Error, Result};
use clap::Subcommand;
use std::str::FromStr;

mod category;
mod dump;
mod ingredient;
mod menu;
mod prompt;
mod recipe;
mod render;
mod seed;

pub use category::CategoryCommand;
pub use ingredient::IngredientCommand;
pub use prompt::{Prompter, Terminal};
pub use recipe::{RecipeCommand, RecipeFields};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage recipes
    #[command(subcommand)]
    Recipe(RecipeCommand),

    /// Manage ingredients
    #[command(subcommand)]
    Ingredient(IngredientCommand),

    /// Manage recipe categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Browse the catalog through a numbered menu
    Menu,

    /// Fill an empty catalog with sample recipes
    Seed,

    /// Print every row of every table with raw ids
    Dump,
}

/// Runs one user action. Each action opens its own connection and closes it before returning.
pub fn run(store: &Store, command: Command, prompter: &mut dyn Prompter) -> Result<()> {
    match command {
        Command::Recipe(command) => recipe::run(store, command, prompter),
        Command::Ingredient(command) => ingredient::run(store, command, prompter),
        Command::Category(command) => category::run(store, command, prompter),
        Command::Menu => menu::run(store, prompter),
        Command::Seed => seed::run(store),
        Command::Dump => dump::run(store),
    }
}

/// Prints an error the way the user should see it.
pub fn report(err: &Error) {
    match err {
        Error::NotFound { .. } => render::failure(format!("{err}!")),
        Error::Validation(_) => render::note(err),
        _ => render::failure(format!("Error: {err}")),
    }
}

/// Blank answers and blank flags both mean "not given".
fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty())
}

fn parse_number<T: FromStr>(field: &str, text: &str) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| Error::validation(format!("{field} must be a number, got {text:?}")))
}

fn parse_quantity(text: &str) -> Result<f64> {
    let quantity: f64 = parse_number("Quantity", text)?;
    if !quantity.is_finite() {
        return Err(Error::validation(format!(
            "Quantity must be a finite number, got {text:?}"
        )));
    }
    Ok(quantity)
}

/// Asks for an optional number; a blank answer leaves it unset.
fn prompt_number<T: FromStr>(prompter: &mut dyn Prompter, field: &str) -> Result<Option<T>> {
    let answer = prompter.input(field, true)?;
    if answer.trim().is_empty() {
        return Ok(None);
    }
    parse_number(field, &answer).map(Some)
}

fn prompt_text(prompter: &mut dyn Prompter, field: &str) -> Result<Option<String>> {
    Ok(non_empty(Some(prompter.input(field, true)?)))
}

fn prompt_required(prompter: &mut dyn Prompter, field: &str) -> Result<String> {
    non_empty(Some(prompter.input(field, false)?))
        .ok_or_else(|| Error::validation(format!("{field} is required")))
}

/// Returns the category with this exact name, creating it when there is none yet.
fn find_or_create_category(conn: &mut database::Connection, name: &str) -> Result<Category> {
    if let Some(existing) = Category::get_by_name(conn, name)? {
        return Ok(existing);
    }
    let created = Category::create(conn, &NewCategory { name: name.into() })?;
    render::note(format!("Created new category: {name}"));
    Ok(created)
}

fn find_or_create_ingredient(conn: &mut database::Connection, name: &str) -> Result<Ingredient> {
    if let Some(existing) = Ingredient::get_by_name(conn, name)? {
        return Ok(existing);
    }
    let created = Ingredient::create(conn, &NewIngredient { name: name.into() })?;
    render::note(format!("Created new ingredient: {name}"));
    Ok(created)
}

#[cfg(test)]
fn test_store() -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("catalog.db")).unwrap();
    (dir, store)
}

#[test]
fn number_parsing() {
    assert_eq!(parse_number::<i32>("Servings", " 4 ").unwrap(), 4);
    assert!(parse_number::<i32>("Servings", "four")
        .unwrap_err()
        .is_user_error());

    assert_eq!(parse_quantity("1.5").unwrap(), 1.5);
    assert_eq!(parse_quantity("2").unwrap(), 2.0);
    assert!(matches!(parse_quantity("lots"), Err(Error::Validation(_))));
    assert!(matches!(parse_quantity("NaN"), Err(Error::Validation(_))));
    assert!(matches!(parse_quantity("inf"), Err(Error::Validation(_))));
}

#[test]
fn blank_text_is_absent() {
    assert_eq!(non_empty(None), None);
    assert_eq!(non_empty(Some("   ".into())), None);
    assert_eq!(non_empty(Some(" Lunch ".into())), Some("Lunch".into()));
}

#[test]
fn find_or_create_reuses_existing() {
    let mut conn = database::test_connection();

    let first = find_or_create_category(&mut conn, "Dinner").unwrap();
    let second = find_or_create_category(&mut conn, "Dinner").unwrap();
    assert_eq!(first, second);
    assert_eq!(Category::get_all(&mut conn).unwrap().len(), 1);

    let flour = find_or_create_ingredient(&mut conn, "Flour").unwrap();
    assert_eq!(find_or_create_ingredient(&mut conn, "Flour").unwrap(), flour);
    assert_ne!(find_or_create_ingredient(&mut conn, "flour").unwrap(), flour);
}
