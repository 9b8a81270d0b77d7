use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub twitter: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

/// Public profile fields a user can edit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub social_links: SocialLinks,
}

impl UserProfile {
    /// Trim every field; blank ones become `None`
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            bio: non_blank(self.bio),
            location: non_blank(self.location),
            website: non_blank(self.website),
            social_links: SocialLinks {
                twitter: non_blank(self.social_links.twitter),
                github: non_blank(self.social_links.github),
                linkedin: non_blank(self.social_links.linkedin),
            },
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_json_uses_camel_case() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"bio":"painter","socialLinks":{"github":"octo"}}"#).unwrap();
        assert_eq!(profile.bio.as_deref(), Some("painter"));
        assert_eq!(profile.social_links.github.as_deref(), Some("octo"));
        assert_eq!(profile.name, None);
    }

    #[test]
    fn test_normalized_drops_blank_fields() {
        let profile = UserProfile {
            name: Some("  Ada ".to_owned()),
            website: Some("   ".to_owned()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(profile.name.as_deref(), Some("Ada"));
        assert_eq!(profile.website, None);
    }
}
