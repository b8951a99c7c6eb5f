//! Tools command - print the tool catalogue

use crate::cli::{OutputFormat, ToolsArgs};
use crate::error::BridgeResult;
use crate::tools::ToolName;
use console::style;
use serde_json::Value;

pub async fn execute(args: ToolsArgs) -> BridgeResult<()> {
    match args.format {
        OutputFormat::Json => {
            let catalogue: Vec<Value> = ToolName::ALL.iter().map(|t| t.descriptor()).collect();
            println!("{}", serde_json::to_string_pretty(&catalogue)?);
        }
        OutputFormat::Plain => {
            for tool in ToolName::ALL {
                println!("{}", tool);
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<20} {:<24} {}",
                style("TOOL").bold(),
                style("PARAMETERS").bold(),
                style("DESCRIPTION").bold()
            );
            for tool in ToolName::ALL {
                println!(
                    "{:<20} {:<24} {}",
                    tool.as_str(),
                    parameter_summary(&tool.input_schema()),
                    style(tool.description()).dim()
                );
            }
        }
    }
    Ok(())
}

/// `school_id*, limit, offset`; required parameters are starred
fn parameter_summary(schema: &Value) -> String {
    let required: Vec<&str> = schema["required"]
        .as_array()
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let names: Vec<String> = schema["properties"]
        .as_object()
        .map(|props| {
            props
                .keys()
                .map(|k| {
                    if required.contains(&k.as_str()) {
                        format!("{}*", k)
                    } else {
                        k.clone()
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_marks_required() {
        let summary = parameter_summary(&ToolName::GetLearnerMarks.input_schema());
        assert!(summary.contains("learner_id*"));
        assert!(summary.contains("term"));
        assert!(!summary.contains("term*"));
        assert_eq!(parameter_summary(&ToolName::GetSchools.input_schema()), "-");
    }
}
