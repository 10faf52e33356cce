use serde::Deserialize;

use super::repo::ActinobacteriaFields;
use crate::error::AppError;

/// Body for create and update; both fields are required either way.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActinobacteriaBody {
    pub scientific_name: Option<String>,
    pub designation: Option<String>,
}

impl ActinobacteriaBody {
    pub fn validate(self) -> Result<ActinobacteriaFields, AppError> {
        let present = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        match (present(self.scientific_name), present(self.designation)) {
            (Some(scientific_name), Some(designation)) => Ok(ActinobacteriaFields {
                scientific_name,
                designation,
            }),
            _ => Err(AppError::BadRequest(
                "Actinobacteria must have scientific name and designation".into(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl Pagination {
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}
