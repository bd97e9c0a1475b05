//! Static catalog of known dictation targets.
//!
//! Three lookup tables built once at startup: web domains to app ids,
//! app ids to their factory default context style, and app ids to a
//! display name. The resolver's fallback chain and the bridge client's
//! domain resolution both read from here.

use once_cell::sync::Lazy;
use std::collections::HashMap;

const DOMAIN_APPS: &[(&str, &str)] = &[
    ("mail.google.com", "gmail"),
    ("outlook.office.com", "outlook_web"),
    ("outlook.live.com", "outlook_web"),
    ("outlook.office365.com", "outlook_web"),
    ("app.slack.com", "slack_web"),
    ("slack.com", "slack_web"),
    ("discord.com", "discord_web"),
    ("web.whatsapp.com", "whatsapp_web"),
    ("web.telegram.org", "telegram_web"),
    ("chat.openai.com", "chatgpt"),
    ("chatgpt.com", "chatgpt"),
    ("claude.ai", "claude"),
    ("notion.so", "notion_web"),
    ("www.notion.so", "notion_web"),
    ("www.linkedin.com", "linkedin"),
    ("linkedin.com", "linkedin"),
    ("twitter.com", "twitter"),
    ("x.com", "twitter"),
    ("github.com", "github"),
    ("www.github.com", "github"),
    ("linear.app", "linear_web"),
    ("teams.microsoft.com", "teams_web"),
];

const DEFAULT_STYLES: &[(&str, &str)] = &[
    ("gmail", "email_pro"),
    ("outlook", "email_pro"),
    ("outlook_web", "email_pro"),
    ("apple_mail", "email_pro"),
    ("slack", "chat"),
    ("slack_web", "chat"),
    ("discord", "chat"),
    ("discord_web", "chat"),
    ("whatsapp", "chat"),
    ("whatsapp_web", "chat"),
    ("telegram", "chat"),
    ("telegram_web", "chat"),
    ("imessage", "chat"),
    ("teams", "chat"),
    ("teams_web", "chat"),
    ("vscode", "code"),
    ("cursor", "code"),
    ("jetbrains", "code"),
    ("notion", "notes"),
    ("notion_web", "notes"),
    ("obsidian", "notes"),
    ("chatgpt", "ai_assistant"),
    ("claude", "ai_assistant"),
    ("linkedin", "social_pro"),
    ("twitter", "social_casual"),
    ("github", "dev_tools"),
    ("linear", "dev_tools"),
    ("linear_web", "dev_tools"),
];

const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("gmail", "Gmail"),
    ("outlook", "Outlook"),
    ("outlook_web", "Outlook"),
    ("apple_mail", "Apple Mail"),
    ("slack", "Slack"),
    ("slack_web", "Slack"),
    ("discord", "Discord"),
    ("discord_web", "Discord"),
    ("vscode", "VS Code"),
    ("cursor", "Cursor"),
    ("chatgpt", "ChatGPT"),
    ("claude", "Claude"),
    ("notion", "Notion"),
    ("notion_web", "Notion"),
    ("obsidian", "Obsidian"),
    ("linkedin", "LinkedIn"),
    ("twitter", "Twitter/X"),
    ("whatsapp", "WhatsApp"),
    ("whatsapp_web", "WhatsApp"),
    ("telegram", "Telegram"),
    ("telegram_web", "Telegram"),
    ("github", "GitHub"),
    ("linear", "Linear"),
    ("linear_web", "Linear"),
    ("teams", "Microsoft Teams"),
    ("teams_web", "Microsoft Teams"),
    ("imessage", "iMessage"),
];

static DOMAIN_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| DOMAIN_APPS.iter().copied().collect());

static STYLE_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| DEFAULT_STYLES.iter().copied().collect());

static NAME_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| DISPLAY_NAMES.iter().copied().collect());

pub fn identify_from_domain(domain: &str) -> Option<&'static str> {
    DOMAIN_INDEX.get(domain).copied()
}

pub fn default_context_style(app_id: &str) -> Option<&'static str> {
    STYLE_INDEX.get(app_id).copied()
}

pub fn app_display_name(app_id: &str) -> String {
    NAME_INDEX
        .get(app_id)
        .map(|name| name.to_string())
        .unwrap_or_else(|| app_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_domains_map_to_apps() {
        assert_eq!(identify_from_domain("mail.google.com"), Some("gmail"));
        assert_eq!(identify_from_domain("x.com"), Some("twitter"));
        assert_eq!(identify_from_domain("example.com"), None);
    }

    #[test]
    fn factory_styles_cover_known_apps() {
        assert_eq!(default_context_style("gmail"), Some("email_pro"));
        assert_eq!(default_context_style("slack_web"), Some("chat"));
        assert_eq!(default_context_style("some_random_tool"), None);
    }

    #[test]
    fn display_name_falls_back_to_app_id() {
        assert_eq!(app_display_name("gmail"), "Gmail");
        assert_eq!(app_display_name("some_random_tool"), "some_random_tool");
    }

    #[test]
    fn every_domain_app_has_a_default_style() {
        for (_, app_id) in DOMAIN_APPS {
            assert!(
                default_context_style(app_id).is_some(),
                "domain app '{}' has no factory style",
                app_id
            );
        }
    }
}
