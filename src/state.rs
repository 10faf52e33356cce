use std::sync::Arc;

use crate::{
    actinobacteria::repo::{ActinobacteriaStore, PgActinobacteriaStore},
    auth::repo::{PgUserStore, PgVerificationTokenStore, UserStore, VerificationTokenStore},
    config::AppConfig,
    db,
    mail::{Mailer, SmtpMailer},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<dyn VerificationTokenStore>,
    pub actinobacterias: Arc<dyn ActinobacteriaStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config).await?;

        let mailer = Arc::new(SmtpMailer::new(config.smtp.clone())) as Arc<dyn Mailer>;

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgVerificationTokenStore::new(db.clone())),
            Arc::new(PgActinobacteriaStore::new(db)),
            mailer,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn VerificationTokenStore>,
        actinobacterias: Arc<dyn ActinobacteriaStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            users,
            tokens,
            actinobacterias,
            mailer,
        }
    }
}
