//! Release version tag derived from the AMT release file name.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{Result, TransformError};
use crate::shared::constants::{AMT_MODULE_ID, RELEASE_FILE_PATTERN};

static RELEASE_FILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(RELEASE_FILE_PATTERN).expect("release file pattern is a valid regex")
});

/// Version of the terminology release every record is stamped with
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseVersion {
    date: NaiveDate,
}

impl ReleaseVersion {
    /// Parse a release distribution file name such as
    /// `NCTS_SCT_RF2_DISTRIBUTION_32506021000036107-20240331-SNAPSHOT.zip`
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let captures = RELEASE_FILE_REGEX.captures(file_name).ok_or_else(|| {
            TransformError::invalid_release_identifier(format!(
                "AMT file name {} does not match expected pattern {}",
                file_name, RELEASE_FILE_PATTERN
            ))
        })?;

        let stamp = &captures[1];
        let date = NaiveDate::parse_from_str(stamp, "%Y%m%d").map_err(|e| {
            TransformError::invalid_release_identifier(format!(
                "AMT file name {} carries an invalid release date {}",
                file_name, stamp
            ))
            .with_source(e)
        })?;

        Ok(Self { date })
    }

    /// Parse the file name component of a release archive path
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                TransformError::invalid_release_identifier(format!(
                    "release path {} has no file name",
                    path.display()
                ))
            })?;
        Self::from_file_name(file_name)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// `YYYYMMDD` stamp of the release
    pub fn stamp(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    /// SNOMED CT version URI of the release
    pub fn version_uri(&self) -> String {
        format!(
            "http://snomed.info/sct?version=http%3A%2F%2Fsnomed.info%2Fsct%2F{}%2Fversion%2F{}",
            AMT_MODULE_ID,
            self.stamp()
        )
    }
}

impl FromStr for ReleaseVersion {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_file_name(s)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version_uri())
    }
}
