use anyhow::Result;
use bias_core::BiasResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => Err(format!("unknown format '{}' (expected json or table)", other)),
        }
    }
}

pub fn render(results: &[BiasResult], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        OutputFormat::Table => Ok(render_table(results)),
    }
}

fn render_table(results: &[BiasResult]) -> String {
    let mut out = String::new();
    for result in results {
        out.push_str(&format!(
            "{} [{}]  composite {:+.3}  {}\n",
            result.instrument.name(),
            result.profile,
            result.composite_score,
            result.label
        ));
        for entry in &result.breakdown {
            let marker = if entry.score.available { " " } else { "·" };
            out.push_str(&format!(
                "  {}{:<15} w={:.2}  {:+.2}  {}\n",
                marker,
                entry.kind.name(),
                entry.weight,
                entry.score.value,
                entry.score.rationale
            ));
        }
        out.push('\n');
    }
    out
}
