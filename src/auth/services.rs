use lazy_static::lazy_static;
use rand::{rngs::OsRng, RngCore};
use regex::Regex;
use time::OffsetDateTime;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{Credentials, NewAccount, UpdateUserRequest},
        password::{hash_password, verify_password},
        repo::{UserStore, VerificationTokenStore},
        repo_types::{NewUser, Projection, User, VerificationToken},
    },
    error::AppError,
    mail::{verify_email_template, Mailer},
};

const SECRET_BYTES: usize = 32;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// 32 bytes from the OS CSPRNG, hex encoded.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub async fn issue_token(
    tokens: &dyn VerificationTokenStore,
    user_id: Uuid,
) -> anyhow::Result<VerificationToken> {
    let secret = generate_secret();
    tokens.insert(user_id, &secret).await
}

/// Creates an unverified user and its verification token.
pub async fn register(
    users: &dyn UserStore,
    tokens: &dyn VerificationTokenStore,
    account: &NewAccount,
) -> Result<(User, VerificationToken), AppError> {
    if !is_valid_email(&account.email) {
        warn!(email = %account.email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }

    if users
        .find_by_email(&account.email, Projection::Default)
        .await?
        .is_some()
    {
        warn!(email = %account.email, "email already registered");
        return Err(AppError::Conflict(
            "A user with this email already exists".into(),
        ));
    }

    let hash = hash_password(&account.password)?;
    let user = users
        .create(NewUser {
            first_name: &account.first_name,
            last_name: &account.last_name,
            email: &account.email,
            password_hash: &hash,
        })
        .await?;

    let token = issue_token(tokens, user.id).await?;
    info!(user_id = %user.id, email = %account.email, "user registered");
    Ok((user, token))
}

/// Delivery failures are logged and swallowed; signup goes on without the email.
pub async fn send_verification_email(
    mailer: &dyn Mailer,
    base_url: &str,
    to: &str,
    token: &VerificationToken,
) {
    let url = format!("{}/user/verify/{}/{}", base_url, token.user_id, token.secret);
    let html = verify_email_template(&url);
    if let Err(e) = mailer.send(to, "Verify your email", &html).await {
        warn!(error = %format!("{e:#}"), user_id = %token.user_id, "verification email not sent");
    }
}

/// Checks the password before the verified flag so account state is only
/// revealed to someone holding the password.
pub async fn authenticate(users: &dyn UserStore, creds: &Credentials) -> Result<User, AppError> {
    let invalid = || AppError::Unauthorized("Invalid credentials".into());

    let Some(mut user) = users
        .find_by_email(&creds.email, Projection::WithCredentials)
        .await?
    else {
        warn!(email = %creds.email, "login unknown email");
        return Err(invalid());
    };

    let hash = user.password_hash.take().ok_or_else(|| {
        error!(user_id = %user.id, "credential projection returned no hash");
        AppError::Internal(anyhow::anyhow!("missing password hash"))
    })?;

    if !verify_password(&creds.password, &hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    if !user.verified {
        warn!(user_id = %user.id, "login before email verification");
        return Err(AppError::Unauthorized("User not verified".into()));
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}

/// Marks the user verified and consumes the token.
pub async fn redeem(
    users: &dyn UserStore,
    tokens: &dyn VerificationTokenStore,
    user_id: Uuid,
    secret: &str,
    ttl: Option<time::Duration>,
) -> Result<User, AppError> {
    let Some(mut user) = users.find_by_id(user_id, Projection::Default).await? else {
        warn!(%user_id, "verification for unknown user");
        return Err(AppError::NotFound("User not found".into()));
    };

    let Some(token) = tokens.find(user_id, secret).await? else {
        warn!(%user_id, "verification token not found");
        return Err(AppError::NotFound("Token not found".into()));
    };

    // An expiry past the representable range means the token never expires.
    let expires_at = ttl.and_then(|ttl| token.created_at.checked_add(ttl));
    if expires_at.is_some_and(|at| at < OffsetDateTime::now_utc()) {
        warn!(%user_id, "verification token expired");
        return Err(AppError::NotFound("Token not found".into()));
    }

    user.verified = true;
    let user = users.save(&user).await?;

    // The user is already verified at this point; a stale token is harmless.
    match tokens.delete(user_id, secret).await {
        Ok(_) => {}
        Err(e) => error!(error = %format!("{e:#}"), %user_id, "failed to delete used token"),
    }

    info!(%user_id, "account verified");
    Ok(user)
}

/// Applies the non-empty fields of `req` to `user` and persists it.
pub async fn update_profile(
    users: &dyn UserStore,
    mut user: User,
    req: &UpdateUserRequest,
) -> Result<User, AppError> {
    if let Some(first_name) = req.first_name() {
        user.first_name = first_name;
    }
    if let Some(last_name) = req.last_name() {
        user.last_name = last_name;
    }
    if let Some(password) = req.password() {
        user.password_hash = Some(hash_password(password)?);
    }
    if let Some(photo) = req.photo() {
        user.photo = Some(photo);
    }
    Ok(users.save(&user).await?)
}
