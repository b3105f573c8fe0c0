mod image;
pub mod prompt;
pub mod schema;
mod types;

pub use image::{EncodedImage, encode_file, encode_reader};
pub use prompt::{PromptPart, PromptTemplate, PromptVars, RenderedPrompt};
pub use schema::{Contract, FieldKind, FieldSpec, Violation};
pub use types::{ImprovedRecipe, ImprovementRequest, RecipeSchema};
