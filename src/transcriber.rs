use log::{debug, error, info, warn};

use crate::assemblyai::AssemblyAiClient;

/// Outcome of a transcription attempt. `Unavailable` (no credentials) and
/// `Failed` (attempted, no usable text) are distinct so the boundary can
/// pick the right placeholder text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    /// No transcription capability is configured.
    Unavailable,
    /// Transcription ran but produced no usable text (empty audio,
    /// silence, or empty transcript).
    Failed,
    /// The transcription call itself failed.
    Errored,
    Text(String),
}

/// Optional speech-to-text capability. Constructed once; availability is
/// decided by configuration presence, never probed per call.
pub struct AudioTranscriber {
    client: Option<AssemblyAiClient>,
}

impl AudioTranscriber {
    pub fn new(api_key: Option<String>) -> Self {
        match api_key {
            Some(key) => {
                info!("AssemblyAI transcriber initialized successfully");
                Self {
                    client: Some(AssemblyAiClient::new(key)),
                }
            }
            None => {
                warn!("AssemblyAI transcriber not available - audio transcription disabled");
                Self { client: None }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    /// Transcribes an audio payload to trimmed text. Never returns an
    /// error: any failure is converted to a non-`Text` outcome and the
    /// caller falls back to requiring text input.
    pub async fn transcribe(
        &self,
        audio: &[u8],
        filename: Option<&str>,
        content_type: Option<&str>,
    ) -> Transcription {
        let Some(client) = &self.client else {
            return Transcription::Unavailable;
        };

        if audio.is_empty() {
            warn!("Audio payload is empty");
            return Transcription::Failed;
        }

        let suffix = file_suffix(filename, content_type);
        debug!("Transcribing {} bytes (suffix {})", audio.len(), suffix);

        match client.transcribe(audio).await {
            Ok(Some(text)) => {
                info!("Transcription successful: {} chars", text.len());
                Transcription::Text(text)
            }
            Ok(None) => {
                warn!("No text in transcription result");
                Transcription::Failed
            }
            Err(e) => {
                error!("Audio transcription failed: {}", e);
                Transcription::Errored
            }
        }
    }
}

/// Advisory storage suffix for an audio payload: filename extension first,
/// then content-type sniffing, defaulting to a generic `.wav`.
fn file_suffix(filename: Option<&str>, content_type: Option<&str>) -> String {
    if let Some(name) = filename {
        if let Some(dot) = name.rfind('.') {
            if dot + 1 < name.len() {
                return name[dot..].to_lowercase();
            }
        }
    }

    if let Some(ct) = content_type {
        for (marker, suffix) in [
            ("webm", ".webm"),
            ("wav", ".wav"),
            ("mp3", ".mp3"),
            ("mp4", ".mp4"),
            ("m4a", ".m4a"),
        ] {
            if ct.contains(marker) {
                return suffix.to_string();
            }
        }
    }

    ".wav".to_string()
}
