use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::User;

/// Sign-in submission. One operation covers both first-time and returning
/// users; there is no separate registration endpoint.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_omits_everything_but_id_and_email() {
        let json = serde_json::to_value(PublicUser {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
        })
        .unwrap();
        assert_eq!(json["email"], "test@example.com");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}
