use pretty_assertions::assert_eq;
use snap_recipe::{
    Error,
    flow::RefinementFlow,
    recipe::{ImprovementRequest, schema::IMPROVED_OUTPUT},
};
use std::sync::Arc;

mod common;
use common::{mocks::MockModelClient, test_utils::*};

#[tokio::test]
async fn test_make_it_vegan() {
    let model = Arc::new(
        MockModelClient::new().with_reply(r#"{"improvedRecipe":"Tomato Soup with olive oil"}"#),
    );
    let flow = RefinementFlow::new(model.clone());

    let improved = flow
        .improve(&ImprovementRequest::new("...", "make it vegan"))
        .await
        .unwrap();

    assert_eq!(improved.improved_recipe, "Tomato Soup with olive oil");
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn test_prompt_embeds_recipe_and_instructions_verbatim() {
    let model = Arc::new(MockModelClient::new().with_reply(r#"{"improvedRecipe":"ok"}"#));
    let flow = RefinementFlow::new(model.clone());
    let recipe_text = tomato_soup().to_string();

    flow.improve(&ImprovementRequest::new(
        recipe_text.clone(),
        "add {{more}} flavor",
    ))
    .await
    .unwrap();

    let request = &model.get_requests()[0];
    let text = request.prompt.text();
    assert!(text.contains(&format!("Recipe: {}\n", recipe_text)));
    assert!(text.contains("Improvement Instructions: add {{more}} flavor"));
    assert!(text.ends_with("Improved Recipe:"));
    assert_eq!(request.prompt.media_count(), 0);
    assert_eq!(request.output.name, IMPROVED_OUTPUT.name);
}

#[tokio::test]
async fn test_any_non_empty_recipe_is_forwarded() {
    let model = Arc::new(MockModelClient::new().with_reply(r#"{"improvedRecipe":"?"}"#));
    let flow = RefinementFlow::new(model.clone());

    let improved = flow
        .improve(&ImprovementRequest::new("not really a recipe", "fix it"))
        .await
        .unwrap();
    assert_eq!(improved.improved_recipe, "?");
}

#[tokio::test]
async fn test_empty_input_is_rejected_without_model_call() {
    let model = Arc::new(MockModelClient::new());
    let flow = RefinementFlow::new(model.clone());

    let err = flow
        .improve(&ImprovementRequest::new("", "make it vegan"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "recipe"));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_missing_improved_recipe_is_violation() {
    let model = Arc::new(MockModelClient::new().with_reply(r#"{"recipe":"x"}"#));
    let flow = RefinementFlow::new(model);

    let err = flow
        .improve(&ImprovementRequest::new("Soup", "less salt"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SchemaViolation { .. }));
}

#[tokio::test]
async fn test_model_unavailable() {
    let flow = RefinementFlow::new(Arc::new(MockModelClient::new().with_error("503")));

    let err = flow
        .improve(&ImprovementRequest::new("Soup", "less salt"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ModelUnavailable(_)));
}

#[tokio::test]
async fn test_whitespace_recipe_is_forwarded() {
    let model = Arc::new(MockModelClient::new().with_reply(r#"{"improvedRecipe":"ok"}"#));
    let flow = RefinementFlow::new(model.clone());

    let improved = flow
        .improve(&ImprovementRequest::new("   ", "make it vegan"))
        .await
        .unwrap();

    assert_eq!(improved.improved_recipe, "ok");
    assert_eq!(model.call_count(), 1);
    assert!(model.get_requests()[0].prompt.text().contains("Recipe:    \n"));
}
