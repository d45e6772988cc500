//! Extraction Pipeline
//!
//! snapshot → sample → aggregate + classify → semantic guesses → record.
//!
//! Every stage is a pure function of its input and the configuration
//! section it was built with. A run either yields a complete
//! [`HarvestRecord`] or an error; there are no partial records.

pub mod aggregate;
pub mod classifier;
pub mod merge;
pub mod page_type;
pub mod sampler;
pub mod semantic;
pub mod typography;

#[cfg(test)]
pub(crate) mod fixtures;

pub use aggregate::{Aggregated, FrequencyAggregator};
pub use classifier::{COMPONENT_RULES, ComponentClassifier, ComponentRule, StyleRule};
pub use merge::merge_records;
pub use sampler::{SampleSet, StyleSample, StyleSampler};
pub use semantic::SemanticGuesser;

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{AggregateConfig, Config};
use crate::snapshot::{PageInspector, SnapshotSource};
use crate::types::{HarvestError, HarvestMetadata, HarvestRecord, Result};

/// Builds harvest records from rendered pages
pub struct Harvester {
    sampler: StyleSampler,
    aggregator: FrequencyAggregator,
    classifier: ComponentClassifier,
    aggregate_config: AggregateConfig,
    crawl_delay: Duration,
}

impl Harvester {
    pub fn new(config: &Config) -> Self {
        Self {
            sampler: StyleSampler::new(&config.sampler),
            aggregator: FrequencyAggregator::new(&config.aggregate),
            classifier: ComponentClassifier::new(&config.classifier)
                .with_neutral_tolerance(config.aggregate.neutral_tolerance),
            aggregate_config: config.aggregate.clone(),
            crawl_delay: Duration::from_millis(config.crawl.delay_ms),
        }
    }

    /// Run one extraction pass over an inspected page
    pub fn harvest(&self, page: &dyn PageInspector) -> Result<HarvestRecord> {
        let set = self.sampler.sample(page)?;
        if set.samples.is_empty() {
            return Err(HarvestError::NoData(page.source().to_string()));
        }

        let aggregated = self.aggregator.aggregate(&set.samples);
        let components = self.classifier.classify(page);
        let typography = typography::extract(&set.samples);

        let mut colors = aggregated.colors;
        colors.semantic = SemanticGuesser::new(self.aggregator.neutral_tolerance()).guess(
            &set.samples,
            &components,
            &colors,
        );

        let record = HarvestRecord {
            metadata: HarvestMetadata {
                id: Uuid::new_v4().to_string(),
                source: page.source().to_string(),
                sources: vec![page.source().to_string()],
                title: page.title().map(str::to_string),
                extracted_at: Some(Utc::now()),
                page_type: page_type::detect(page.source(), &set.samples, &components),
                total_elements: set.total,
                sampled_elements: set.samples.len(),
                skipped_elements: set.skipped,
                ..Default::default()
            },
            colors,
            typography,
            spacing: aggregated.spacing,
            borders: aggregated.borders,
            shadows: aggregated.shadows,
            components,
        };

        info!(
            "Harvested {}: {} components, page type '{}'{}",
            record.metadata.source,
            record.components.len(),
            record.metadata.page_type,
            if record.is_sparse() { " (sparse)" } else { "" }
        );
        Ok(record)
    }

    /// Snapshot and harvest a single target
    pub async fn harvest_target(
        &self,
        source: &dyn SnapshotSource,
        target: &str,
    ) -> Result<HarvestRecord> {
        let snapshot = source.snapshot(target).await?;
        self.harvest(&snapshot)
    }

    /// Harvest targets one after another and merge the results.
    ///
    /// Pages that fail are skipped; the run fails only when none succeed.
    pub async fn harvest_many(
        &self,
        source: &dyn SnapshotSource,
        targets: &[String],
    ) -> Result<HarvestRecord> {
        let mut records = Vec::with_capacity(targets.len());
        let mut last_error = None;

        for (i, target) in targets.iter().enumerate() {
            if i > 0 && !self.crawl_delay.is_zero() {
                tokio::time::sleep(self.crawl_delay).await;
            }
            match self.harvest_target(source, target).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping {}: {}", target, e);
                    last_error = Some(e);
                }
            }
        }

        match (records.len(), last_error) {
            (0, Some(e)) => Err(e),
            (0, None) => Err(HarvestError::NoData("no targets given".to_string())),
            (1, _) => Ok(records.remove(0)),
            _ => merge_records(&records, &self.aggregate_config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::css::render_css;
    use crate::snapshot::FileSource;
    use crate::tokens::TokenMapper;
    use crate::types::{ComponentKind, Rgba};
    use fixtures::{landing_page, page, single_button_page};
    use tempfile::TempDir;

    #[test]
    fn test_single_button_end_to_end() {
        let config = Config::default();
        let record = Harvester::new(&config)
            .harvest(&single_button_page())
            .unwrap();

        let button = &record.components[&ComponentKind::Button];
        assert_eq!(button.profiles[0].variant.name, "primary");
        assert_eq!(record.colors.background["#0064FA"], 1);
        assert_eq!(record.colors.dominant_background.as_deref(), Some("#0064FA"));

        let tokens = TokenMapper::new(&config.tokens).map(&record).unwrap();
        let css = render_css(&tokens);
        assert!(css.contains("--semi-color-primary: #0064FA;"));

        let hover = tokens.get("color-primary-hover").unwrap();
        let base = Rgba::parse("#0064FA").unwrap().to_hsl();
        let hover = Rgba::parse(hover).unwrap().to_hsl();
        assert!(hover.l < base.l);
        assert!(css.contains("--semi-color-primary-hover: "));
    }

    #[test]
    fn test_empty_page_is_no_data() {
        let err = Harvester::new(&Config::default())
            .harvest(&page(vec![]))
            .unwrap_err();
        assert!(matches!(err, HarvestError::NoData(_)));
    }

    #[test]
    fn test_landing_page_record() {
        let record = Harvester::new(&Config::default())
            .harvest(&landing_page())
            .unwrap();

        assert_eq!(record.metadata.title.as_deref(), Some("Fixture"));
        assert_eq!(record.metadata.page_type, "landing");
        assert_eq!(record.metadata.total_elements, 18);
        assert!(!record.is_sparse());
        assert_eq!(record.spacing.scale, vec![2, 4, 6, 8, 10, 12, 14, 16, 24]);
        assert_eq!(record.borders.radius_scale["extra-small"], "4px");
        assert_eq!(record.borders.radius_scale["small"], "12px");
        assert_eq!(record.borders.radius_scale["full"], "9999px");
        assert_eq!(record.shadows.buckets["lg"].blur_px, 14.0);
        assert_eq!(record.colors.semantic.primary.as_ref().unwrap().value, "#0064FA");
    }

    #[tokio::test]
    async fn test_harvest_many_skips_failures_and_merges() {
        let temp = TempDir::new().unwrap();
        let snapshot = serde_json::to_string(&landing_page()).unwrap();
        std::fs::write(temp.path().join("a.json"), &snapshot).unwrap();
        std::fs::write(temp.path().join("b.json"), &snapshot).unwrap();

        let source = FileSource::with_base_dir(temp.path());
        let harvester = Harvester::new(&Config::default());
        let targets = vec!["a.json".to_string(), "missing.json".to_string(), "b.json".to_string()];
        let record = harvester.harvest_many(&source, &targets).await.unwrap();

        assert_eq!(record.metadata.sampled_elements, 36);
        assert_eq!(record.components[&ComponentKind::Button].profiles.len(), 10);
    }

    #[tokio::test]
    async fn test_harvest_many_all_failed() {
        let temp = TempDir::new().unwrap();
        let source = FileSource::with_base_dir(temp.path());
        let err = Harvester::new(&Config::default())
            .harvest_many(&source, &["nope.json".to_string()])
            .await
            .unwrap_err();
        assert!(err.is_no_data());
    }
}
