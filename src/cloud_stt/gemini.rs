use super::CloudSTTModel;
use log::{error, info};
use serde::Serialize;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

pub fn get_available_models() -> Vec<CloudSTTModel> {
    vec![
        CloudSTTModel {
            id: "gemini-2.0-flash".to_string(),
            name: "Gemini 2.0 Flash".to_string(),
            description: "Fast and capable - Recommended".to_string(),
        },
        CloudSTTModel {
            id: "gemini-2.5-flash-preview-05-20".to_string(),
            name: "Gemini 2.5 Flash Preview".to_string(),
            description: "Latest preview with improved accuracy".to_string(),
        },
        CloudSTTModel {
            id: "gemini-2.5-pro-preview-05-06".to_string(),
            name: "Gemini 2.5 Pro Preview".to_string(),
            description: "Most accurate, higher latency".to_string(),
        },
        CloudSTTModel {
            id: "gemini-1.5-flash".to_string(),
            name: "Gemini 1.5 Flash".to_string(),
            description: "Stable version".to_string(),
        },
    ]
}

pub async fn test_connection(api_key: &str) -> bool {
    info!("Testing Gemini API connection");

    let url = format!(
        "{}/gemini-2.0-flash:generateContent?key={}",
        GEMINI_API_URL, api_key
    );

    let request = GeminiRequest {
        contents: vec![GeminiContent {
            parts: vec![GeminiPart {
                text: "Say 'ok'".to_string(),
            }],
        }],
    };

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
        .post(&url)
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            error!("Gemini API connection test failed: {}", e);
            return false;
        }
    };

    let status = response.status();
    if status.is_success() {
        info!("Gemini API connection test successful");
        true
    } else {
        let response_text = response.text().await.unwrap_or_default();
        error!(
            "Gemini API connection test failed: status={}, body={}",
            status, response_text
        );
        false
    }
}
