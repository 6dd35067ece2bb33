// Copyright 2023 Remi Bernotavicius

use crate::database::models::{Category, CategoryId, Ingredient, Recipe, RecipeIngredient};
use comfy_table::{presets::UTF8_FULL, Table};
use console::style;
use std::collections::HashMap;
use std::fmt::{self, Display};

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Category names by id, for labelling recipes without querying per row.
pub type CategoryNames = HashMap<CategoryId, String>;

pub fn category_names(categories: Vec<Category>) -> CategoryNames {
    categories.into_iter().map(|c| (c.id, c.name)).collect()
}

/// A recipe whose category is unset or has since been deleted is uncategorized.
pub fn category_label(names: &CategoryNames, category: Option<CategoryId>) -> &str {
    category
        .and_then(|id| names.get(&id))
        .map(String::as_str)
        .unwrap_or(UNCATEGORIZED)
}

pub fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

pub fn heading(text: &str) {
    println!("{}", style(text).bold());
}

pub fn success(text: impl Display) {
    println!("{}", style(text).green().bold());
}

pub fn note(text: impl Display) {
    println!("{}", style(text).yellow());
}

pub fn failure(text: impl Display) {
    println!("{}", style(text).red().bold());
}

pub fn recipe_table(recipes: &[Recipe], names: &CategoryNames, with_servings: bool) -> Table {
    let mut header = vec!["ID", "Name", "Category", "Prep Time (min)", "Cook Time (min)"];
    if with_servings {
        header.push("Servings");
    }
    let mut table = new_table(header);

    for recipe in recipes {
        let mut row = vec![
            recipe.id.to_string(),
            recipe.name.clone(),
            category_label(names, recipe.category_id).to_owned(),
            or_dash(recipe.prep_time),
            or_dash(recipe.cook_time),
        ];
        if with_servings {
            row.push(or_dash(recipe.serving_size));
        }
        table.add_row(row);
    }
    table
}

pub fn ingredient_table(ingredients: &[Ingredient]) -> Table {
    let mut table = new_table(vec!["ID", "Name"]);
    for ingredient in ingredients {
        table.add_row(vec![ingredient.id.to_string(), ingredient.name.clone()]);
    }
    table
}

pub fn category_table(categories: &[(Category, i64)]) -> Table {
    let mut table = new_table(vec!["ID", "Name", "Recipe Count"]);
    for (category, count) in categories {
        table.add_row(vec![
            category.id.to_string(),
            category.name.clone(),
            count.to_string(),
        ]);
    }
    table
}

pub fn recipe_lines_table(lines: &[(RecipeIngredient, Ingredient)]) -> Table {
    let mut table = new_table(vec!["Line", "Ingredient", "Quantity", "Unit"]);
    for (line, ingredient) in lines {
        table.add_row(vec![
            line.id.to_string(),
            ingredient.name.clone(),
            line.quantity.to_string(),
            or_dash(line.unit.as_deref()),
        ]);
    }
    table
}

/// Everything known about one recipe, laid out for the terminal.
pub struct RecipeDetails<'a> {
    recipe: &'a Recipe,
    category: Option<&'a str>,
    lines: &'a [(RecipeIngredient, Ingredient)],
}

pub fn recipe_details<'a>(
    recipe: &'a Recipe,
    category: Option<&'a str>,
    lines: &'a [(RecipeIngredient, Ingredient)],
) -> RecipeDetails<'a> {
    RecipeDetails {
        recipe,
        category,
        lines,
    }
}

impl fmt::Display for RecipeDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recipe = self.recipe;
        writeln!(f, "Recipe: {}", recipe.name)?;
        writeln!(f, "Category: {}", self.category.unwrap_or(UNCATEGORIZED))?;
        writeln!(f, "Preparation Time: {} minutes", or_dash(recipe.prep_time))?;
        writeln!(f, "Cooking Time: {} minutes", or_dash(recipe.cook_time))?;
        writeln!(f, "Servings: {}", or_dash(recipe.serving_size))?;

        if let Some(description) = recipe.description.as_deref().filter(|d| !d.is_empty()) {
            writeln!(f, "\nDescription:\n{description}")?;
        }

        writeln!(f, "\nIngredients:")?;
        if self.lines.is_empty() {
            writeln!(f, "No ingredients listed")?;
        } else {
            writeln!(f, "{}", recipe_lines_table(self.lines))?;
        }

        if let Some(instructions) = recipe.instructions.as_deref().filter(|i| !i.is_empty()) {
            writeln!(f, "\nInstructions:\n{}", instructions.trim())?;
        }
        Ok(())
    }
}

#[cfg(test)]
fn recipe(id: i32, name: &str, category: Option<CategoryId>) -> Recipe {
    Recipe {
        id: id.into(),
        name: name.into(),
        description: None,
        prep_time: Some(10),
        cook_time: None,
        serving_size: Some(4),
        instructions: None,
        category_id: category,
    }
}

#[test]
fn labels_fall_back_to_uncategorized() {
    let names = category_names(vec![Category {
        id: CategoryId::from(1),
        name: "Breakfast".into(),
    }]);

    assert_eq!(category_label(&names, Some(CategoryId::from(1))), "Breakfast");
    assert_eq!(category_label(&names, Some(CategoryId::from(2))), UNCATEGORIZED);
    assert_eq!(category_label(&names, None), UNCATEGORIZED);
}

#[test]
fn recipe_table_rows() {
    let names = category_names(vec![Category {
        id: CategoryId::from(1),
        name: "Breakfast".into(),
    }]);
    let recipes = vec![
        recipe(1, "Classic Pancakes", Some(CategoryId::from(1))),
        recipe(2, "Toast", Some(CategoryId::from(9))),
    ];

    let table = recipe_table(&recipes, &names, true);
    assert_eq!(table.row_iter().count(), 2);
    let rendered = table.to_string();
    assert!(rendered.contains("Classic Pancakes"));
    assert!(rendered.contains("Breakfast"));
    assert!(rendered.contains(UNCATEGORIZED));
    assert!(rendered.contains("Servings"));

    let rendered = recipe_table(&recipes, &names, false).to_string();
    assert!(!rendered.contains("Servings"));
}

#[test]
fn details_show_lines_and_category() {
    use crate::database::models::IngredientId;

    let pancakes = Recipe {
        description: Some("Fluffy.".into()),
        instructions: Some("\n1. Mix.\n2. Fry.\n".into()),
        ..recipe(1, "Classic Pancakes", Some(CategoryId::from(1)))
    };
    let flour = Ingredient {
        id: IngredientId::from(3),
        name: "Flour".into(),
    };
    let line = RecipeIngredient {
        id: 1.into(),
        recipe_id: pancakes.id,
        ingredient_id: flour.id,
        quantity: 1.5,
        unit: Some("cups".into()),
    };

    let lines = [(line, flour)];
    let text = recipe_details(&pancakes, Some("Breakfast"), &lines).to_string();
    assert!(text.contains("Category: Breakfast"));
    assert!(text.contains("Preparation Time: 10 minutes"));
    assert!(text.contains("Cooking Time: - minutes"));
    assert!(text.contains("Flour"));
    assert!(text.contains("1.5"));
    assert!(text.contains("cups"));
    assert!(text.contains("Instructions:\n1. Mix.\n2. Fry."));

    let toast = recipe(2, "Toast", None);
    let bare = recipe_details(&toast, None, &[]).to_string();
    assert!(bare.contains("Category: Uncategorized"));
    assert!(bare.contains("No ingredients listed"));
    assert!(!bare.contains("Description:"));
}
