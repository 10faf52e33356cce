use serde::Deserialize;

use crate::error::AppError;

/// Request body for signup. Fields are optional so missing ones surface as 400.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Partial profile update; absent or empty fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub photo: Option<String>,
}

#[derive(Debug)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

fn present(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn missing() -> AppError {
    AppError::BadRequest("Parameters missing".into())
}

impl SignupRequest {
    pub fn validate(self) -> Result<NewAccount, AppError> {
        let first_name = present(self.first_name).ok_or_else(missing)?;
        let last_name = present(self.last_name).ok_or_else(missing)?;
        let email = present(self.email).ok_or_else(missing)?.to_lowercase();
        let password = self.password.filter(|p| !p.is_empty()).ok_or_else(missing)?;
        Ok(NewAccount {
            first_name,
            last_name,
            email,
            password,
        })
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, AppError> {
        let email = present(self.email).ok_or_else(missing)?.to_lowercase();
        let password = self.password.filter(|p| !p.is_empty()).ok_or_else(missing)?;
        Ok(Credentials { email, password })
    }
}

impl UpdateUserRequest {
    pub fn first_name(&self) -> Option<String> {
        present(self.first_name.clone())
    }

    pub fn last_name(&self) -> Option<String> {
        present(self.last_name.clone())
    }

    pub fn photo(&self) -> Option<String> {
        present(self.photo.clone())
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}
