//! DTOs for account endpoints.

use serde::{Deserialize, Serialize};

use crate::application::services::CascadeReport;

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveAccountResponse {
    pub username: String,
    pub deleted_links: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_links: Vec<String>,
}

impl From<CascadeReport> for RemoveAccountResponse {
    fn from(report: CascadeReport) -> Self {
        Self {
            username: report.username,
            deleted_links: report.deleted_links,
            failed_links: report.failed_links,
        }
    }
}
