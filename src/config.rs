use log::warn;

/// Runtime configuration, loaded once from the environment. Missing API keys
/// are not errors: the owning component is constructed in fallback mode.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Gemini key, used for answer evaluation and report narration.
    pub google_api_key: Option<String>,
    /// AssemblyAI key, used for audio transcription.
    pub assemblyai_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let google_api_key = read_key("GOOGLE_API_KEY");
        let assemblyai_api_key = read_key("ASSEMBLYAI_API_KEY");

        if google_api_key.is_none() {
            warn!("GOOGLE_API_KEY not found in environment - using fallback evaluation");
        }
        if assemblyai_api_key.is_none() {
            warn!("ASSEMBLYAI_API_KEY not found in environment - audio transcription disabled");
        }

        Self {
            google_api_key,
            assemblyai_api_key,
        }
    }
}

fn read_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
