use async_trait::async_trait;

use crate::error::{PovarError, Result};
use crate::provider::Provider;

static SYSTEM_PROMPT: &str = "You are a helpful assistant that extracts structured recipe \
     information from messy video transcripts and screen text.";

fn build_prompt(full_text: &str) -> String {
    format!(
        r#"You are an intelligent recipe extractor.
Given the following text from both a video transcript and on-screen text, extract:
1. A list of ingredients (with quantities if available).
2. A list of step-by-step cooking instructions
3. Estimated total calories
4. Total macros (protein, carbs, fat). If macros are provided in the text, use them. If not, provide a rough estimate based on common values.

Text:
"""{full_text}"""

Format the output like this:
---
Ingredients:
- Item 1
- Item 2

Instructions:
1. Step one
2. Step two

Nutrition:
Calories: __ cal
Protein: __ g
Carbs: __ g
Fat: __ g
---"#
    )
}

/// Turns combined transcript and screen text into a recipe report.
#[async_trait]
pub trait RecipeAnalyzer: Send + Sync {
    async fn analyze(&self, full_text: &str) -> Result<String>;
}

/// Asks a hosted chat model for the structured recipe report.
pub struct ChatAnalyzer {
    provider: Provider,
    client: reqwest::Client,
}

impl ChatAnalyzer {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RecipeAnalyzer for ChatAnalyzer {
    async fn analyze(&self, full_text: &str) -> Result<String> {
        let config = self.provider.config();
        let api_key = self.provider.validate_api_key()?;

        let response = self
            .client
            .post(config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&serde_json::json!({
                "model": config.model,
                "messages": [
                    {
                        "role": "system",
                        "content": SYSTEM_PROMPT,
                    },
                    {
                        "role": "user",
                        "content": build_prompt(full_text),
                    },
                ],
                "temperature": 0.3,
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| PovarError::AnalysisFailed {
                reason: format!("Invalid API response: {:?}", response),
            })?;

        Ok(content.to_string())
    }
}
