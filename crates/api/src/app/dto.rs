use serde::Deserialize;

use gatekey_auth::Role;
use gatekey_identity::Account;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct ProfessionalStatusRequest {
    pub is_professional: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn account_to_json(account: &Account) -> serde_json::Value {
    serde_json::json!({
        "id": account.id.to_string(),
        "email": account.email,
        "role": account.role.as_str(),
        "nickname": account.profile.nickname,
        "first_name": account.profile.first_name,
        "last_name": account.profile.last_name,
        "bio": account.profile.bio,
        "profile_picture_url": account.profile.profile_picture_url,
        "github_profile_url": account.profile.github_profile_url,
        "linkedin_profile_url": account.profile.linkedin_profile_url,
        "is_professional": account.is_professional,
        "email_verified": account.is_verified(),
        "created_at": account.created_at.to_rfc3339(),
        "updated_at": account.updated_at.to_rfc3339(),
        "last_login_at": account.last_login_at.map(|t| t.to_rfc3339()),
    })
}
