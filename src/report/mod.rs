use std::{fs, path::Path};

use serde::Serialize;

use crate::{
    DiffArtifact, LevelStats, QualityRange, ThumbnailComparison,
    batch::{BatchSummary, ImageResult},
    error::Result,
};

#[derive(Serialize)]
pub struct JsonReport {
    pub quality_range: QualityRange,
    pub image_count: usize,
    pub failed_count: usize,
    pub artifact_count: usize,
    pub images: Vec<ImageReportSection>,
}

#[derive(Serialize)]
pub struct ImageReportSection {
    pub source: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub artifacts: Vec<DiffArtifact>,
    pub levels: Vec<LevelStats>,
    pub skipped_levels: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<ThumbnailComparison>,
}

impl From<&ImageResult> for ImageReportSection {
    fn from(result: &ImageResult) -> Self {
        let source = result.source_path.display().to_string();
        match &result.outcome {
            Ok(outcome) => Self {
                source,
                succeeded: true,
                error: None,
                artifacts: outcome.artifacts.clone(),
                levels: outcome.levels.clone(),
                skipped_levels: outcome.skipped_levels.clone(),
                thumbnail: outcome.thumbnail.clone(),
            },
            Err(e) => Self {
                source,
                succeeded: false,
                error: Some(e.to_string()),
                artifacts: Vec::new(),
                levels: Vec::new(),
                skipped_levels: Vec::new(),
                thumbnail: None,
            },
        }
    }
}

impl JsonReport {
    pub fn new(range: QualityRange, summary: &BatchSummary) -> Self {
        Self {
            quality_range: range,
            image_count: summary.results.len(),
            failed_count: summary.failed_count(),
            artifact_count: summary.artifact_count(),
            images: summary.results.iter().map(ImageReportSection::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{ArtifactKind, SweepOutcome, error::ForensicsError};

    fn summary() -> BatchSummary {
        let ok = SweepOutcome {
            source_path: PathBuf::from("in/a.jpg"),
            artifacts: vec![DiffArtifact {
                kind: ArtifactKind::ErrorLevel { quality: 5 },
                path: PathBuf::from("out/a/a_q_5_error_analyze.png"),
                width: 4,
                height: 3,
            }],
            levels: vec![LevelStats {
                quality: 5,
                max_difference: 51,
                scale: 5.0,
                mean_difference: 2.5,
            }],
            skipped_levels: vec![10],
            thumbnail: Some(ThumbnailComparison::Skipped),
        };

        BatchSummary {
            results: vec![
                ImageResult {
                    source_path: PathBuf::from("in/a.jpg"),
                    outcome: Ok(ok),
                },
                ImageResult {
                    source_path: PathBuf::from("in/b.jpg"),
                    outcome: Err(ForensicsError::InvalidParameter("broken".into())),
                },
            ],
        }
    }

    #[test]
    fn report_counts_and_sections() {
        let report = JsonReport::new(QualityRange::new(5, 15, 5).unwrap(), &summary());
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["image_count"], 2);
        assert_eq!(json["failed_count"], 1);
        assert_eq!(json["artifact_count"], 1);
        assert_eq!(json["quality_range"]["step"], 5);

        let first = &json["images"][0];
        assert_eq!(first["succeeded"], true);
        assert_eq!(first["artifacts"][0]["kind"]["kind"], "error_level");
        assert_eq!(first["artifacts"][0]["kind"]["quality"], 5);
        assert_eq!(first["levels"][0]["max_difference"], 51);
        assert_eq!(first["skipped_levels"][0], 10);
        assert_eq!(first["thumbnail"]["status"], "skipped");
        assert!(first.get("error").is_none());

        let second = &json["images"][1];
        assert_eq!(second["succeeded"], false);
        assert_eq!(second["error"], "Invalid parameter: broken");
    }

    #[test]
    fn report_is_written_to_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("report.json");

        JsonReport::new(QualityRange::default(), &summary()).write(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"failed_count\": 1"));
    }
}
