use log::{info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Style prompt '{0}' not found")]
    PromptNotFound(String),
    #[error("Style prompt '{0}' is not a built-in prompt")]
    NotBuiltin(String),
    #[error("A style prompt with id '{0}' already exists")]
    DuplicatePrompt(String),
    #[error("Built-in prompt '{0}' cannot be deleted")]
    BuiltinImmutable(String),
    #[error("Unknown cloud STT provider '{0}'")]
    UnknownProvider(String),
    #[error("Model '{0}' is not available for provider '{1}'")]
    UnknownModel(String, String),
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to persist settings: {0}")]
    Persist(#[from] std::io::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContextMapping {
    pub app_id: String,
    pub context_style: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContextStylePrompt {
    pub id: String,
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub is_builtin: bool,
}

/// Local editor draft for a style prompt.
///
/// The editor compares its draft field-by-field against the last-loaded
/// store state; only a dirty, non-empty draft may be saved, and a save is
/// always followed by a full reload so the draft reflects any concurrent
/// reset.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptDraft {
    pub name: String,
    pub description: String,
    pub prompt: String,
}

impl PromptDraft {
    pub fn from_prompt(prompt: &ContextStylePrompt) -> Self {
        Self {
            name: prompt.name.clone(),
            description: prompt.description.clone(),
            prompt: prompt.prompt.clone(),
        }
    }

    pub fn is_dirty(&self, loaded: &ContextStylePrompt) -> bool {
        self.name != loaded.name
            || self.description != loaded.description
            || self.prompt != loaded.prompt
    }

    pub fn can_save(&self, loaded: &ContextStylePrompt) -> bool {
        self.is_dirty(loaded) && !self.name.trim().is_empty() && !self.prompt.trim().is_empty()
    }
}

/* the persisted singleton ------------------------------------------------ */
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppSettings {
    #[serde(default = "default_cloud_stt_enabled")]
    pub cloud_stt_enabled: bool,
    #[serde(default)]
    pub cloud_stt_provider: Option<String>,
    #[serde(default = "default_cloud_stt_api_keys")]
    pub cloud_stt_api_keys: HashMap<String, String>,
    #[serde(default = "default_cloud_stt_models")]
    pub cloud_stt_models: HashMap<String, String>,
    #[serde(default = "default_context_mappings")]
    pub context_mappings: Vec<ContextMapping>,
    #[serde(default = "default_context_style_prompts")]
    pub context_style_prompts: Vec<ContextStylePrompt>,
}

fn default_cloud_stt_enabled() -> bool {
    false
}

fn default_cloud_stt_api_keys() -> HashMap<String, String> {
    HashMap::new()
}

fn default_cloud_stt_models() -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert("openai".to_string(), "whisper-1".to_string());
    map.insert("gemini".to_string(), "gemini-2.0-flash".to_string());
    map
}

fn default_context_mappings() -> Vec<ContextMapping> {
    vec![]
}

pub fn default_context_style_prompts() -> Vec<ContextStylePrompt> {
    vec![
        ContextStylePrompt {
            id: "email_pro".to_string(),
            name: "Professional Email".to_string(),
            description: "Formal tone with greeting and sign-off".to_string(),
            prompt: r#"You are an assistant that rewrites dictated messages as professional emails.

Rules:
- Keep the exact meaning of the original message
- Add an appropriate greeting (Hello, Dear ...)
- Use a formal, professional tone
- Close with a polite sign-off (Best regards, Kind regards)
- Fix grammar and spelling
- Break into paragraphs where it helps

Dictated text:
${output}

Rewritten email:"#
                .to_string(),
            is_builtin: true,
        },
        ContextStylePrompt {
            id: "chat".to_string(),
            name: "Chat / Messaging".to_string(),
            description: "Casual and short".to_string(),
            prompt: r#"You are an assistant that rewrites dictated messages as chat messages.

Rules:
- Keep the message short and direct
- Casual but correct tone
- No formal greetings or sign-offs
- Only fix grammar and spelling
- Keep informal expressions where they fit

Dictated text:
${output}

Rewritten message:"#
                .to_string(),
            is_builtin: true,
        },
        ContextStylePrompt {
            id: "code".to_string(),
            name: "Code / Development".to_string(),
            description: "Raw code or technical comments".to_string(),
            prompt: r#"You are an assistant for developers.

If the dictated text describes code or a programming instruction:
- Generate the corresponding code directly
- No markdown, no code fences
- Raw code ready to paste

If the text is a comment or explanation:
- Format it as an appropriate code comment
- Keep it technical and concise

Dictated text:
${output}

Result:"#
                .to_string(),
            is_builtin: true,
        },
        ContextStylePrompt {
            id: "notes".to_string(),
            name: "Notes / Documentation".to_string(),
            description: "Structured with bullet points".to_string(),
            prompt: r#"You are an assistant that rewrites dictated notes.

Rules:
- Structure the content with bullet points (-)
- Use headings if there are several topics
- Keep the essential information
- Fix grammar
- Clear, scannable format

Dictated text:
${output}

Rewritten notes:"#
                .to_string(),
            is_builtin: true,
        },
        ContextStylePrompt {
            id: "ai_assistant".to_string(),
            name: "AI Assistant".to_string(),
            description: "Optimized prompt engineering".to_string(),
            prompt: r#"You are an assistant that turns dictated instructions into optimized AI prompts.

Rules:
- Rewrite as a clear, structured prompt
- Add context where needed
- Use precise instructions
- Format suited for ChatGPT/Claude

Dictated text:
${output}

Optimized prompt:"#
                .to_string(),
            is_builtin: true,
        },
        ContextStylePrompt {
            id: "social_pro".to_string(),
            name: "Professional Social".to_string(),
            description: "LinkedIn - professional tone".to_string(),
            prompt: r#"You are an assistant for writing on LinkedIn.

Rules:
- Professional but approachable tone
- No excessive jargon
- Clear structure
- Suited to the LinkedIn format
- Fix grammar

Dictated text:
${output}

Rewritten post:"#
                .to_string(),
            is_builtin: true,
        },
        ContextStylePrompt {
            id: "social_casual".to_string(),
            name: "Casual Social".to_string(),
            description: "Twitter/X - casual tone".to_string(),
            prompt: r#"You are an assistant for Twitter/X.

Rules:
- Short message (under 280 characters if possible)
- Casual tone
- Emojis allowed where they fit
- Direct and punchy

Dictated text:
${output}

Rewritten post:"#
                .to_string(),
            is_builtin: true,
        },
        ContextStylePrompt {
            id: "correction".to_string(),
            name: "Simple Correction".to_string(),
            description: "Spelling and grammar only (fallback)".to_string(),
            prompt: r#"Fix only the spelling and grammar of the following text. Do not change the style or the meaning.

Text:
${output}

Corrected text:"#
                .to_string(),
            is_builtin: true,
        },
        ContextStylePrompt {
            id: "dev_tools".to_string(),
            name: "Dev Tools".to_string(),
            description: "GitHub, Linear - issues and PRs".to_string(),
            prompt: r#"You are an assistant for technical writing (issues, PRs, tickets).

Rules:
- Clear, descriptive title
- Structured description
- Bullet points for steps and details
- Technical but approachable tone
- No pleasantries

Dictated text:
${output}

Rewritten content:"#
                .to_string(),
            is_builtin: true,
        },
    ]
}

pub fn get_default_settings() -> AppSettings {
    AppSettings {
        cloud_stt_enabled: default_cloud_stt_enabled(),
        cloud_stt_provider: None,
        cloud_stt_api_keys: default_cloud_stt_api_keys(),
        cloud_stt_models: default_cloud_stt_models(),
        context_mappings: default_context_mappings(),
        context_style_prompts: default_context_style_prompts(),
    }
}

/// Persisted settings singleton backed by a JSON file.
///
/// All mutations go through [`SettingsStore::update`], which applies the
/// change to a draft, persists the draft, and only then publishes it. A
/// failed validation or write leaves both the file and the in-memory state
/// exactly as they were.
pub struct SettingsStore {
    path: PathBuf,
    settings: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<AppSettings>(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Failed to parse settings, using defaults: {}", e);
                    get_default_settings()
                }
            },
            Err(_) => {
                info!("No settings file at {:?}, using defaults", path);
                let defaults = get_default_settings();
                if let Err(e) = persist(&path, &defaults) {
                    warn!("Failed to write default settings: {}", e);
                }
                defaults
            }
        };

        Self {
            path,
            settings: RwLock::new(settings),
        }
    }

    pub fn get(&self) -> AppSettings {
        self.settings.read().clone()
    }

    pub fn update<F>(&self, mutate: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut AppSettings) -> Result<(), SettingsError>,
    {
        let mut guard = self.settings.write();
        let mut draft = guard.clone();
        mutate(&mut draft)?;
        persist(&self.path, &draft)?;
        *guard = draft;
        Ok(())
    }
}

fn persist(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    let contents = serde_json::to_string_pretty(settings)?;
    fs::write(path, contents)?;
    Ok(())
}
