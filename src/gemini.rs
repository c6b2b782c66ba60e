use anyhow::Result;
use log::{error, info};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Minimal Gemini text-generation client, shared by the answer scorer and
/// the report generator.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
        }
    }

    /// Sends a single-turn prompt and returns the trimmed response text.
    pub async fn generate_content(&self, prompt: &str) -> Result<String> {
        let request_body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error {}: {}", status, error_text);
            anyhow::bail!("Gemini API error: {}", status);
        }

        let body: Value = response.json().await?;
        let text = body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("No text in Gemini response"))?
            .trim()
            .to_string();

        info!("Received {} chars from Gemini", text.len());
        Ok(text)
    }
}
