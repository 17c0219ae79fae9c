//! Users and their experience

use serde::{Deserialize, Serialize};

use super::validation::{require_email, require_min_chars, ValidationError};
use crate::progress::{ExperienceState, LevelProgress};

/// Unique identifier for a user
pub type UserId = i64;

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    /// Trim identity fields and check them against the signup rules
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let username = self.username.trim().to_string();
        let email = self.email.trim().to_lowercase();

        require_min_chars("username", &username, 3)?;
        require_email(&email)?;
        require_min_chars("password", &self.password, 6)?;

        Ok(Self {
            username,
            email,
            password: self.password,
        })
    }
}

/// Login payload
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A stored user, including the password hash
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile_photo: Option<String>,
    pub experience: ExperienceState,
    /// Bonus counter bumped on every level-up
    pub total_streaks: u64,
    pub created_at: i64,
}

impl User {
    /// Public view of the user (no password hash)
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            profile_photo: self.profile_photo.clone(),
            experience: self.experience.experience(),
            level: self.experience.level(),
            level_title: self.experience.title().to_string(),
            total_streaks: self.total_streaks,
            progress: self.experience.progress(),
            created_at: self.created_at,
        }
    }
}

/// What the API returns for a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    pub experience: u64,
    pub level: u64,
    pub level_title: String,
    pub total_streaks: u64,
    pub progress: LevelProgress,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str, password: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_normalized_trims_and_lowercases() {
        let user = new_user("  ana  ", " Ana@Example.COM ", "secret1")
            .normalized()
            .unwrap();
        assert_eq!(user.username, "ana");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.password, "secret1");
    }

    #[test]
    fn test_normalized_rejects_short_fields() {
        let err = new_user("an", "ana@example.com", "secret1")
            .normalized()
            .unwrap_err();
        assert_eq!(err.field, "username");

        let err = new_user("ana", "ana@example.com", "12345")
            .normalized()
            .unwrap_err();
        assert_eq!(err.field, "password");

        let err = new_user("ana", "example.com", "secret1")
            .normalized()
            .unwrap_err();
        assert_eq!(err.field, "email");
    }

    #[test]
    fn test_profile_serializes_camel_case_without_hash() {
        let user = User {
            id: 7,
            username: "ana".into(),
            email: "ana@example.com".into(),
            password_hash: "$2b$04$hash".into(),
            profile_photo: None,
            experience: ExperienceState::new(105),
            total_streaks: 1,
            created_at: 1_704_067_200_000,
        };
        let json = serde_json::to_value(user.profile()).unwrap();
        assert_eq!(json["level"], 2);
        assert_eq!(json["levelTitle"], "Beginner");
        assert_eq!(json["totalStreaks"], 1);
        assert_eq!(json["progress"]["current"], 5);
        assert!(json.get("profilePhoto").is_none());
        assert!(!json.to_string().contains("hash"));
    }
}
