use anyhow::Result;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// How long we poll a submitted transcript before giving up.
const MAX_POLL_ATTEMPTS: u32 = 120;
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// AssemblyAI REST client: upload raw audio, create a transcript, poll
/// until it settles.
#[derive(Clone)]
pub struct AssemblyAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AssemblyAiClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: "https://api.assemblyai.com/v2".to_string(),
        }
    }

    /// Transcribes an audio payload. `Ok(None)` means the service produced
    /// no usable text (e.g. silence); errors cover request and transcript
    /// failures.
    pub async fn transcribe(&self, audio: &[u8]) -> Result<Option<String>> {
        let upload: Value = self
            .client
            .post(format!("{}/upload", self.base_url))
            .header("authorization", &self.api_key)
            .body(audio.to_vec())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let upload_url = upload["upload_url"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("No upload_url in AssemblyAI response"))?;
        debug!("Uploaded {} bytes to AssemblyAI", audio.len());

        let created: Value = self
            .client
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&json!({
                "audio_url": upload_url,
                "speech_model": "universal",
                "language_code": "en"
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let transcript_id = created["id"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("No transcript id in AssemblyAI response"))?
            .to_string();

        for _ in 0..MAX_POLL_ATTEMPTS {
            tokio::time::sleep(POLL_INTERVAL).await;

            let status: Value = self
                .client
                .get(format!("{}/transcript/{}", self.base_url, transcript_id))
                .header("authorization", &self.api_key)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            match status["status"].as_str().unwrap_or("") {
                "completed" => {
                    let text = status["text"].as_str().unwrap_or("").trim().to_string();
                    info!("AssemblyAI transcription completed ({} chars)", text.len());
                    return Ok(if text.is_empty() { None } else { Some(text) });
                }
                "error" => {
                    let detail = status["error"].as_str().unwrap_or("unknown error");
                    anyhow::bail!("Transcription failed: {}", detail);
                }
                // queued / processing
                other => debug!("Transcript {} status: {}", transcript_id, other),
            }
        }

        anyhow::bail!("Transcript {} did not settle in time", transcript_id)
    }
}
