use colored::Colorize;
use netcfg_audit_core::{format_rows, format_summary, DeviceResult, ReportRow, RunResult, TargetResult};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct CheckRow {
    scope: String,
    command: String,
    #[tabled(rename = "type")]
    kind: String,
    result: String,
}

impl CheckRow {
    fn from_report(row: ReportRow, color: bool) -> Self {
        let result = if color {
            colorize_result(&row.result)
        } else {
            row.result
        };
        Self {
            scope: row.scope,
            command: row.command,
            kind: row.kind,
            result,
        }
    }
}

fn colorize_result(result: &str) -> String {
    match result {
        "PASS" => result.green().to_string(),
        "FAIL" => result.red().bold().to_string(),
        "EXCLUDED" => result.yellow().to_string(),
        _ => result.to_string(),
    }
}

/// Render the check table for one device.
pub fn render_device_table(device: &DeviceResult, color: bool) -> String {
    let rows: Vec<CheckRow> = format_rows(device)
        .into_iter()
        .map(|row| CheckRow::from_report(row, color))
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::ascii());
    table.to_string()
}

/// Render every target of a run with a header per target and a summary line.
pub fn render_run(run: &RunResult, color: bool) -> String {
    let mut out = Vec::new();
    out.push("############################".to_string());
    out.push(format!("#### {}", run.source.as_str()));

    for (target, result) in &run.targets {
        out.push(String::new());
        out.push("############################".to_string());
        out.push(format!("#### {target}"));
        match result {
            TargetResult::Evaluated(device) => {
                if let Some(info) = &device.device_info {
                    out.push(format!("#### Type: {}", info.model));
                }
                out.push("############################".to_string());
                out.push(render_device_table(device, color));
            }
            TargetResult::Error { message } => {
                out.push("############################".to_string());
                let notice = format!("target could not be evaluated: {message}");
                out.push(if color {
                    notice.red().to_string()
                } else {
                    notice
                });
            }
        }
    }

    out.push(String::new());
    let summary = format_summary(run);
    out.push(if color {
        summary.cyan().to_string()
    } else {
        summary
    });
    out.join("\n")
}
