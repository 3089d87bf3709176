//! `cardinal sets` — nullability and FIRST/LAST sets of a content model.

use std::io::{self, Write};

use cardinal_core::AnalysisConfig;
use clap::Args;
use serde::Serialize;

use crate::output::{OutputMode, render};

/// Arguments for `cardinal sets`.
#[derive(Args, Debug)]
pub struct SetsArgs {
    /// Content model, e.g. `(a, b?)+ | c`.
    #[arg(value_name = "MODEL")]
    pub model: String,
}

#[derive(Debug, Serialize)]
struct SetsOutput {
    nullable: bool,
    first: Vec<String>,
    last: Vec<String>,
}

/// Execute `cardinal sets`.
pub fn run_sets(args: &SetsArgs, config: &AnalysisConfig, output: OutputMode) -> anyhow::Result<()> {
    let graph = super::build_graph(&args.model, config)?;
    let body = graph.body();

    let payload = SetsOutput {
        nullable: body.is_nullable(),
        first: graph.labels_of(body.first_set()).cloned().collect(),
        last: graph.labels_of(body.last_set()).cloned().collect(),
    };

    render(output, &payload, render_sets_text)
}

fn render_sets_text(report: &SetsOutput, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "nullable: {}", report.nullable)?;
    writeln!(w, "first:    {}", report.first.join(", "))?;
    writeln!(w, "last:     {}", report.last.join(", "))
}
