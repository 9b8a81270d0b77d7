use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Low,
    Medium,
    #[default]
    High,
}

/// Per-user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    pub theme: Theme,
    pub notifications: bool,
    pub email_updates: bool,
    pub image_quality: ImageQuality,
    pub auto_save: bool,
    pub language: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            notifications: true,
            email_updates: false,
            image_quality: ImageQuality::High,
            auto_save: true,
            language: "en".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_json_uses_camel_case() {
        let json = serde_json::to_value(UserSettings::default()).unwrap();
        assert_eq!(json["imageQuality"], "high");
        assert_eq!(json["emailUpdates"], false);
        assert_eq!(json["theme"], "light");
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: UserSettings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.language, "en");
        assert!(settings.auto_save);
    }
}
