//! CLI route: single route table and run context. Dispatches to the query
//! service and presentation.

use crate::cli::fixture::StoreSnapshot;
use crate::cli::parse::Commands;
use crate::cli::presentation::{format_import_summary, format_versions_json, format_versions_text};
use crate::config::{ConfigLoader, StackStateConfig};
use crate::query::criteria;
use crate::query::{FieldSelection, Predicate, PropertyPredicate, StackVersionRequest, StackVersionService};
use crate::store::SledStackStore;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Runtime context for CLI execution: configuration, store and query service.
pub struct RunContext {
    config: StackStateConfig,
    store: Arc<SledStackStore>,
    service: StackVersionService,
    color: bool,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::with_config(workspace_root, config)
    }

    pub fn with_config(workspace_root: PathBuf, config: StackStateConfig) -> Result<Self> {
        let store_path = config.storage.resolve_store_path(&workspace_root);
        std::fs::create_dir_all(&store_path)
            .with_context(|| format!("Failed to create store directory {}", store_path.display()))?;
        let store = Arc::new(SledStackStore::new(&store_path)?);
        info!(store = %store_path.display(), "Opened stack state store");

        Ok(Self {
            service: StackVersionService::from_store(store.clone()),
            store,
            config,
            color: true,
        })
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn service(&self) -> &StackVersionService {
        &self.service
    }

    pub fn execute(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::Versions {
                cluster,
                ids,
                fields,
                filters,
                format,
            } => self.handle_versions(cluster, ids, fields, filters, format),
            Commands::Import { file } => {
                let snapshot = StoreSnapshot::load(file)?;
                let summary = snapshot.apply(&self.store)?;
                info!(?summary, "Imported store snapshot");
                Ok(format_import_summary(&summary))
            }
            Commands::Config => Ok(self.config.to_toml_string()?),
        }
    }

    fn handle_versions(
        &self,
        cluster: &str,
        ids: &[String],
        fields: &[String],
        filters: &[String],
        format: &str,
    ) -> Result<String> {
        if format != "text" && format != "json" {
            bail!("Invalid format: '{}'. Must be 'text' or 'json'.", format);
        }

        let criteria = if ids.is_empty() {
            vec![criteria::for_cluster(cluster)]
        } else {
            ids.iter()
                .map(|id| {
                    let mut map = criteria::for_cluster(cluster);
                    map.insert("id".to_string(), serde_json::Value::String(id.clone()));
                    map
                })
                .collect()
        };

        let predicate = filters
            .iter()
            .map(|filter| filter.parse::<PropertyPredicate>())
            .collect::<Result<Vec<_>, _>>()?;
        let predicate = match predicate.len() {
            0 => None,
            1 => predicate.into_iter().next(),
            _ => Some(PropertyPredicate::And(predicate)),
        };

        let request = StackVersionRequest::new(criteria).with_fields(FieldSelection::parse(fields)?);
        let projections = self
            .service
            .get_resources(&request, predicate.as_ref().map(|p| p as &dyn Predicate))?;

        match format {
            "json" => Ok(format_versions_json(&projections)?),
            _ => Ok(format_versions_text(&projections, self.color)),
        }
    }
}
