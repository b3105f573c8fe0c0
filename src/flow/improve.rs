use super::run_flow;
use crate::{
    Result,
    llm::ModelClient,
    recipe::{
        ImprovedRecipe, ImprovementRequest, PromptVars,
        prompt::IMPROVE_RECIPE_PROMPT,
        schema::{IMPROVE_INPUT, IMPROVED_OUTPUT},
    },
};
use std::sync::Arc;
use tracing::info;

const FLOW_NAME: &str = "improveRecipeFlow";

/// Rewrites an existing recipe text following free-text instructions.
/// Shares nothing with [`super::GenerationFlow`] besides the model handle.
#[derive(Clone)]
pub struct RefinementFlow {
    model: Arc<dyn ModelClient>,
}

impl RefinementFlow {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    pub async fn improve(&self, request: &ImprovementRequest) -> Result<ImprovedRecipe> {
        // Only emptiness is checked; the recipe's content is forwarded as-is.
        IMPROVE_INPUT.check_input(request)?;

        info!(
            "Improving recipe ({} chars) with instructions: {}",
            request.recipe.len(),
            request.improvement_instructions
        );

        let vars = PromptVars::new()
            .text("outputGuidance", IMPROVED_OUTPUT.guidance())
            .text("recipe", request.recipe.as_str())
            .text(
                "improvementInstructions",
                request.improvement_instructions.as_str(),
            );
        let prompt = IMPROVE_RECIPE_PROMPT.render(&vars)?;

        run_flow(self.model.as_ref(), FLOW_NAME, &IMPROVED_OUTPUT, prompt).await
    }
}
