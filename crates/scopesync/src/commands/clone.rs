//! Clone command handler: one reconciliation run, rendered per-scope.
//!
//! Individual scope failures are part of the report, not errors -- the
//! command exits zero as long as the run itself completed. Only hard
//! aborts (resolution, fetch, session) propagate as `CliError`.

use owo_colors::OwoColorize;
use tabled::Tabled;

use scopesync_api::ApiClient;
use scopesync_core::{RunReport, ScopeOutcome, ScopeStatus, reconcile};

use crate::cli::{CloneArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&ScopeOutcome> for OutcomeRow {
    fn from(o: &ScopeOutcome) -> Self {
        Self {
            subnet: o.subnet.clone().unwrap_or_else(|| "-".into()),
            status: o.status.label().into(),
            detail: match &o.status {
                ScopeStatus::Failed { detail } => detail.clone(),
                _ => String::new(),
            },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApiClient,
    args: CloneArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !global.quiet {
        eprintln!(
            "Cloning DHCP scopes from '{}' to '{}'",
            args.source, args.destination
        );
    }

    let report = reconcile(client, &args.source, &args.destination).await?;

    let out = match global.output {
        OutputFormat::Table => {
            let rows: Vec<OutcomeRow> = report.outcomes.iter().map(OutcomeRow::from).collect();
            output::render_table(&rows)
        }
        OutputFormat::Json => output::render_json_pretty(&report),
        OutputFormat::JsonCompact => output::render_json_compact(&report),
        OutputFormat::Yaml => output::render_yaml(&report),
        OutputFormat::Plain => report
            .outcomes
            .iter()
            .map(|o| {
                format!(
                    "{}\t{}",
                    o.subnet.as_deref().unwrap_or("-"),
                    o.status.label()
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    output::print_output(&out, global.quiet);

    if !global.quiet && matches!(global.output, OutputFormat::Table) {
        eprintln!("{}", summary_line(&report, output::should_color(&global.color)));
    }

    Ok(())
}

fn summary_line(report: &RunReport, color: bool) -> String {
    let created = format!("{} created", report.created());
    let present = format!("{} already present", report.already_present());
    let failed = format!("{} failed", report.failed());

    if color {
        let failed = if report.is_clean() {
            failed
        } else {
            failed.red().to_string()
        };
        format!("{}, {present}, {failed}", created.green())
    } else {
        format!("{created}, {present}, {failed}")
    }
}
