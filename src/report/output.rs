// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for printed reports

use super::Report;
use anyhow::Result;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportOutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl ReportOutputFormat {
    /// Machine-readable rendering; `Text` falls back to pretty JSON.
    pub fn serialize(&self, report: &Report) -> Result<String> {
        match self {
            ReportOutputFormat::Yaml => Ok(match report {
                Report::Import(r) => serde_yaml::to_string(r)?,
                Report::Build(r) => serde_yaml::to_string(r)?,
                Report::Status(r) => serde_yaml::to_string(r)?,
                Report::Sanitize(r) => serde_yaml::to_string(r)?,
                Report::Diff(r) => serde_yaml::to_string(r)?,
            }),
            ReportOutputFormat::Json | ReportOutputFormat::Text => Ok(match report {
                Report::Import(r) => serde_json::to_string_pretty(r)?,
                Report::Build(r) => serde_json::to_string_pretty(r)?,
                Report::Status(r) => serde_json::to_string_pretty(r)?,
                Report::Sanitize(r) => serde_json::to_string_pretty(r)?,
                Report::Diff(r) => serde_json::to_string_pretty(r)?,
            }),
        }
    }
}
