use super::run_flow;
use crate::{
    Result,
    llm::ModelClient,
    recipe::{
        EncodedImage, PromptVars, RecipeSchema,
        prompt::GENERATE_RECIPE_PROMPT,
        schema::RECIPE_OUTPUT,
    },
};
use std::sync::Arc;
use tracing::info;

const FLOW_NAME: &str = "generateRecipeFromPhotoFlow";

/// Photo in, recipe out.
#[derive(Clone)]
pub struct GenerationFlow {
    model: Arc<dyn ModelClient>,
}

impl GenerationFlow {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    pub async fn generate(&self, photo: &EncodedImage) -> Result<RecipeSchema> {
        info!(
            "Generating recipe from {} photo ({} base64 chars)",
            photo.mime_type(),
            photo.payload().len()
        );

        let vars = PromptVars::new()
            .text("outputGuidance", RECIPE_OUTPUT.guidance())
            .media("photo", photo);
        let prompt = GENERATE_RECIPE_PROMPT.render(&vars)?;

        run_flow(self.model.as_ref(), FLOW_NAME, &RECIPE_OUTPUT, prompt).await
    }
}
