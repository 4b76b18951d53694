//! Report records
//!
//! Reports are generated asynchronously: the generate endpoint returns a
//! job id immediately and the finished record appears in the store once
//! the simulated generation delay elapses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated (or seeded) report
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub name: String,
    /// engagement, skills, wellness, performance
    #[serde(rename = "type")]
    pub kind: String,
    /// pdf, csv
    pub format: String,
    pub last_updated: DateTime<Utc>,
    pub size: String,
    pub download_link: String,
}
