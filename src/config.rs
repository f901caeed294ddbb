use std::env;

use crate::error::{SyncError, SyncResult};

const DEFAULT_BASE_URL: &str = "https://mein.fitx.de";
const DEFAULT_TENANT: &str = "fitx";
const DEFAULT_FACILITY_GROUP: &str = "FITXDE-7B7DAC63E1744DE797245D6E314CD8F6";
const DEFAULT_SHEET_RANGE: &str = "Trainings!A:A";
const DEFAULT_SCHEDULE: &str = "0 0 0 * * *"; // daily at midnight UTC

#[derive(Debug, Clone)]
pub struct Config {
    pub portal: PortalConfig,
    pub sheet: SheetConfig,
    /// Cron expression for the recurring sync job
    pub schedule: String,
    /// Run one sync pass immediately at process start
    pub run_at_startup: bool,
}

/// Connection settings for the member portal
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Fixed `Authorization` header value the portal expects on every call
    pub authorization: String,
    pub tenant: String,
    pub facility_group: String,
}

/// Target spreadsheet settings
#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    pub range: String,
    /// Service-account key JSON payload
    pub service_account_json: String,
}

impl Config {
    pub fn from_env() -> SyncResult<Self> {
        Ok(Self {
            portal: PortalConfig {
                base_url: optional("FITX_BASE_URL", DEFAULT_BASE_URL),
                username: required("FITX_EMAIL")?,
                password: required("FITX_PASSWORD")?,
                authorization: required("FITX_AUTHORIZATION")?,
                tenant: optional("FITX_TENANT", DEFAULT_TENANT),
                facility_group: optional("FITX_FACILITY_GROUP", DEFAULT_FACILITY_GROUP),
            },
            sheet: SheetConfig {
                spreadsheet_id: required("GOOGLE_SHEET_ID")?,
                range: optional("GOOGLE_SHEET_RANGE", DEFAULT_SHEET_RANGE),
                service_account_json: required("GCP_CREDENTIALS")?,
            },
            schedule: optional("SYNC_SCHEDULE", DEFAULT_SCHEDULE),
            run_at_startup: env::var("RUN_AT_STARTUP")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

fn required(name: &'static str) -> SyncResult<String> {
    env::var(name).map_err(|_| SyncError::missing_env(name))
}

fn optional(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
