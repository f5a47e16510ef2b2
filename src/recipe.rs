//! # Recipe Types
//!
//! The request payload sent to the recipe-generation service and the
//! display-ready recipe built from its response.
//!
//! The response is parsed leniently: every field falls back to its own default
//! when missing, null, empty or of the wrong type. Only a body that is not JSON
//! at all is rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::errors::AppResult;
use crate::inventory::InventorySnapshot;
use crate::pantry::build_pantry_context;

/// Title used when the generator does not provide one
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// Payload of a recipe-generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRequest {
    /// Zero or one element
    pub main_ingredients: Vec<String>,
    pub pantry_ingredients: Vec<String>,
    pub suggest_substitution: bool,
}

impl RecipeRequest {
    /// Build a payload from an explicit main ingredient and pantry set
    pub fn new(
        main_ingredient: Option<&str>,
        pantry: &BTreeSet<String>,
        suggest_substitution: bool,
    ) -> Self {
        Self {
            main_ingredients: main_ingredient.map(|m| vec![m.to_string()]).unwrap_or_default(),
            pantry_ingredients: pantry.iter().cloned().collect(),
            suggest_substitution,
        }
    }

    /// Build a payload from the current selection.
    ///
    /// Without a main ingredient both lists are empty and the pantry is not computed.
    pub fn from_selection(
        main_ingredient: Option<&str>,
        snapshot: &InventorySnapshot,
        suggest_substitution: bool,
    ) -> Self {
        match main_ingredient {
            Some(main) => {
                let pantry = build_pantry_context(main, snapshot);
                Self::new(Some(main), &pantry, suggest_substitution)
            }
            None => Self::new(None, &BTreeSet::new(), suggest_substitution),
        }
    }

    /// The main ingredient, if one was selected
    pub fn main_ingredient(&self) -> Option<&str> {
        self.main_ingredients.first().map(String::as_str)
    }
}

/// A generated recipe, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub image_url: String,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            title: UNTITLED_RECIPE.to_string(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            image_url: String::new(),
        }
    }
}

impl Recipe {
    /// Parse a raw response body of the form `{"data": {...}}`
    pub fn from_response_body(body: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self::from_response_value(&value))
    }

    /// Build a recipe from a parsed response envelope.
    ///
    /// A missing or non-object `data` yields the all-defaults recipe.
    pub fn from_response_value(value: &Value) -> Self {
        match value.get("data") {
            Some(data) => Self::from_data(data),
            None => Self::default(),
        }
    }

    fn from_data(data: &Value) -> Self {
        let defaults = Self::default();
        Self {
            title: non_empty_string(data.get("title")).unwrap_or(defaults.title),
            image_url: non_empty_string(data.get("image_url")).unwrap_or(defaults.image_url),
            ingredients: string_list(data.get("ingredients")),
            steps: string_list(data.get("steps")),
        }
    }

    /// Whether the recipe carries an image to show
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
