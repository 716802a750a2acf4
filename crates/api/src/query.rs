//! Query-string parameter types shared by handlers.

use serde::Deserialize;

/// `GET /chores?status=`
#[derive(Debug, Default, Deserialize)]
pub struct ChoreListParams {
    pub status: Option<String>,
}

/// `GET /reports/export/*?format=`
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub format: Option<String>,
}
