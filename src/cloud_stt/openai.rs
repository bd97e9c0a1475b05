use super::CloudSTTModel;
use log::{error, info};

const REQUEST_TIMEOUT_SECS: u64 = 10;

pub fn get_available_models() -> Vec<CloudSTTModel> {
    vec![
        CloudSTTModel {
            id: "whisper-1".to_string(),
            name: "Whisper".to_string(),
            description: "OpenAI Whisper - Fast and accurate".to_string(),
        },
        CloudSTTModel {
            id: "gpt-4o-transcribe".to_string(),
            name: "GPT-4o Transcribe".to_string(),
            description: "Advanced transcription model".to_string(),
        },
        CloudSTTModel {
            id: "gpt-4o-mini-transcribe".to_string(),
            name: "GPT-4o Mini Transcribe".to_string(),
            description: "Faster, more affordable transcription".to_string(),
        },
    ]
}

pub async fn test_connection(api_key: &str) -> bool {
    info!("Testing OpenAI API connection");

    let client = match reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return false;
        }
    };

    let response = match client
        .get("https://api.openai.com/v1/models")
        .header("Authorization", format!("Bearer {}", api_key))
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            error!("OpenAI API connection test failed: {}", e);
            return false;
        }
    };

    let status = response.status();
    if status.is_success() {
        info!("OpenAI API connection test successful");
        true
    } else {
        let response_text = response.text().await.unwrap_or_default();
        error!(
            "OpenAI API connection test failed: status={}, body={}",
            status, response_text
        );
        false
    }
}
