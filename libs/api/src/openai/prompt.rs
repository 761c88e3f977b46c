/// Fixed-shape recipe request rendered into a prompt by field substitution.
#[derive(Clone, Debug)]
pub struct RecipePrompt {
    pub dish: String,
    pub ingredients: Vec<String>,
}

impl RecipePrompt {
    /// The roast served by `GET /openai/recipe`.
    pub fn roast() -> Self {
        Self {
            dish: "Assado".to_string(),
            ingredients: ["carne", "tomate", "cebola", "pimentao"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "Dish: {}. Ingredients: {}.",
            self.dish,
            self.ingredients.join(", ")
        )
    }
}
