pub mod analyze;
pub mod sets;

use anyhow::{Context, Result};
use cardinal_core::{AnalysisConfig, Graph, parse};

/// Parse `model` and analyse it under `config`.
pub fn build_graph(model: &str, config: &AnalysisConfig) -> Result<Graph<String>> {
    let body = parse(model).with_context(|| format!("invalid content model {model:?}"))?;
    Graph::with_config(body, config).map_err(|err| {
        let hint = err.hint().unwrap_or_default();
        anyhow::anyhow!("{err} [{}] {hint}", err.code())
    })
}
