use serde::{Deserialize, Serialize};
use std::fmt;

/// A recipe as produced by the generation flow. Field values are kept exactly
/// as the model returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSchema {
    pub recipe_name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub serving_size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementRequest {
    pub recipe: String,
    pub improvement_instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovedRecipe {
    pub improved_recipe: String,
}

impl ImprovementRequest {
    pub fn new(recipe: impl Into<String>, improvement_instructions: impl Into<String>) -> Self {
        Self {
            recipe: recipe.into(),
            improvement_instructions: improvement_instructions.into(),
        }
    }
}

impl fmt::Display for RecipeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.recipe_name.trim().is_empty() {
            writeln!(f, "Generated Recipe")?;
        } else {
            writeln!(f, "{}", self.recipe_name)?;
        }
        if !self.serving_size.trim().is_empty() {
            writeln!(f, "Serves: {}", self.serving_size)?;
        }

        writeln!(f)?;
        writeln!(f, "Ingredients")?;
        if self.ingredients.is_empty() {
            writeln!(f, "No ingredients listed.")?;
        }
        for ingredient in &self.ingredients {
            writeln!(f, "- {}", ingredient)?;
        }

        writeln!(f)?;
        writeln!(f, "Instructions")?;
        if self.instructions.is_empty() {
            write!(f, "No instructions provided.")?;
        }
        for (index, step) in self.instructions.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}", index + 1, step)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn soup() -> RecipeSchema {
        RecipeSchema {
            recipe_name: "Tomato Soup".to_string(),
            ingredients: vec!["tomato".to_string(), "salt".to_string()],
            instructions: vec!["Boil tomatoes".to_string(), "Blend".to_string()],
            serving_size: "2".to_string(),
        }
    }

    #[test]
    fn test_recipe_uses_camel_case_fields() {
        let json = serde_json::to_value(soup()).unwrap();
        assert_eq!(json["recipeName"], "Tomato Soup");
        assert_eq!(json["servingSize"], "2");
        assert_eq!(json["ingredients"][1], "salt");
    }

    #[test]
    fn test_display_renders_numbered_steps() {
        let text = soup().to_string();
        assert_eq!(
            text,
            "Tomato Soup\nServes: 2\n\nIngredients\n- tomato\n- salt\n\nInstructions\n1. Boil tomatoes\n2. Blend"
        );
    }

    #[test]
    fn test_display_placeholders_for_empty_recipe() {
        let recipe = RecipeSchema {
            recipe_name: "  ".to_string(),
            ingredients: vec![],
            instructions: vec![],
            serving_size: String::new(),
        };
        let text = recipe.to_string();
        assert!(text.starts_with("Generated Recipe\n"));
        assert!(!text.contains("Serves:"));
        assert!(text.contains("No ingredients listed."));
        assert!(text.ends_with("No instructions provided."));
    }

    #[test]
    fn test_improvement_request_serialization() {
        let request = ImprovementRequest::new("Soup", "make it vegan");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["improvementInstructions"], "make it vegan");
    }
}
