//! `cardinal analyze` — classify the particles of a content model.

use std::io::{self, Write};

use cardinal_core::{AnalysisConfig, Cardinality, CutSetStrategy};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::output::{OutputMode, render};

/// Arguments for `cardinal analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Content model, e.g. `id, name, alias*, (email | phone)+, note?`.
    #[arg(value_name = "MODEL")]
    pub model: String,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    model: String,
    strategy: CutSetStrategy,
    components: Vec<ComponentOutput>,
}

#[derive(Debug, Serialize)]
struct ComponentOutput {
    particles: Vec<String>,
    required: bool,
    collection: bool,
    cardinality: Cardinality,
}

/// Execute `cardinal analyze`.
pub fn run_analyze(
    args: &AnalyzeArgs,
    config: &AnalysisConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let graph = super::build_graph(&args.model, config)?;

    // Order components by their first particle in the model.
    let mut components: Vec<_> = graph.particle_components().collect();
    components.sort_by_key(|cc| cc.members().first().copied());

    let payload = AnalyzeOutput {
        model: args.model.clone(),
        strategy: graph.strategy(),
        components: components
            .into_iter()
            .map(|cc| ComponentOutput {
                particles: graph.labels(cc).cloned().collect(),
                required: cc.is_required(),
                collection: cc.is_collection(),
                cardinality: cc.cardinality(),
            })
            .collect(),
    };

    info!(
        components = payload.components.len(),
        positions = graph.position_count(),
        "content model analysed"
    );

    render(output, &payload, render_analyze_text)
}

/// `[a, b]!*` per component, then the cardinality in regex notation.
fn render_analyze_text(report: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    if report.components.is_empty() {
        return writeln!(w, "(no particles)");
    }
    for cc in &report.components {
        let flags = format!(
            "{}{}",
            if cc.required { "!" } else { "" },
            if cc.collection { "*" } else { "" }
        );
        writeln!(
            w,
            "{:<32} {:<2} {}",
            format!("[{}]", cc.particles.join(", ")),
            flags,
            cc.cardinality.suffix()
        )?;
    }
    Ok(())
}
