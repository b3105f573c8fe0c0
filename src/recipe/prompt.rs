//! Prompt templates.
//!
//! A template is plain text with `{{name}}` placeholders for text values and
//! `{{media name}}` placeholders for images. Rendering is pure: images are
//! embedded through their encoded `data:` URI, never re-read.

use super::EncodedImage;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromptPart {
    Text { text: String },
    Media { url: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedPrompt {
    pub parts: Vec<PromptPart>,
}

impl RenderedPrompt {
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(PromptPart::Text { text: last }) = self.parts.last_mut() {
            last.push_str(text);
        } else {
            self.parts.push(PromptPart::Text {
                text: text.to_string(),
            });
        }
    }

    /// All text parts concatenated, media parts omitted.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                PromptPart::Text { text } => Some(text.as_str()),
                PromptPart::Media { .. } => None,
            })
            .collect()
    }

    pub fn media_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, PromptPart::Media { .. }))
            .count()
    }
}

#[derive(Debug, Clone)]
pub enum PromptValue {
    Text(String),
    Media(EncodedImage),
}

#[derive(Debug, Clone, Default)]
pub struct PromptVars {
    values: BTreeMap<&'static str, PromptValue>,
}

impl PromptVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(name, PromptValue::Text(value.into()));
        self
    }

    pub fn media(mut self, name: &'static str, image: &EncodedImage) -> Self {
        self.values.insert(name, PromptValue::Media(image.clone()));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub source: &'static str,
}

impl PromptTemplate {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    pub fn render(&self, vars: &PromptVars) -> Result<RenderedPrompt> {
        let mut rendered = RenderedPrompt::default();
        let mut rest = self.source;

        while let Some(start) = rest.find("{{") {
            rendered.push_text(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                Error::internal(format!("template '{}' has an unclosed placeholder", self.name))
            })?;
            self.substitute(after[..end].trim(), vars, &mut rendered)?;
            rest = &after[end + 2..];
        }
        rendered.push_text(rest);

        Ok(rendered)
    }

    fn substitute(&self, token: &str, vars: &PromptVars, out: &mut RenderedPrompt) -> Result<()> {
        let (is_media, name) = match token.strip_prefix("media ") {
            Some(name) => (true, name.trim()),
            None => (false, token),
        };

        match (is_media, vars.values.get(name)) {
            (false, Some(PromptValue::Text(text))) => out.push_text(text),
            (true, Some(PromptValue::Media(image))) => out.parts.push(PromptPart::Media {
                url: image.to_data_uri(),
            }),
            (_, Some(_)) => {
                return Err(Error::internal(format!(
                    "template '{}' uses '{}' with the wrong kind of value",
                    self.name, name
                )));
            }
            (_, None) => {
                return Err(Error::internal(format!(
                    "template '{}' references unknown variable '{}'",
                    self.name, name
                )));
            }
        }
        Ok(())
    }
}

pub const GENERATE_RECIPE_PROMPT: PromptTemplate = PromptTemplate::new(
    "generateRecipeFromPhotoPrompt",
    "You are a world-class chef. A user will provide you with a photo of ingredients, and you will respond with a recipe using those ingredients.

Respond with:
{{outputGuidance}}

Ingredients Photo: {{media photo}}
",
);

pub const IMPROVE_RECIPE_PROMPT: PromptTemplate = PromptTemplate::new(
    "improveRecipePrompt",
    "You are an expert chef specializing in recipe improvement.

You will improve the given recipe based on the provided instructions.

Respond with:
{{outputGuidance}}

Recipe: {{recipe}}
Improvement Instructions: {{improvementInstructions}}

Improved Recipe:",
);
