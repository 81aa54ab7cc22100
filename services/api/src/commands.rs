use cabinet_clients::clients::import::DEFAULT_PREVIEW_ROWS;
use cabinet_clients::clients::{
    reconcile, Client, ClientCsvImporter, ClientImport, DerivedFields, ImportPreview,
    OutilLogiciel, OutilStatut,
};
use cabinet_clients::error::AppError;
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DeriveArgs {
    /// Client document (JSON) to evaluate
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print the derived attributes as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV export listing clients, one row per client
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Number of rows shown in the preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub(crate) preview_rows: usize,
}

pub(crate) fn run_derive(args: DeriveArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.file)?;
    let client: Client = serde_json::from_str(&raw)?;
    let reconciliation = reconcile(&client);

    if args.json {
        let payload = serde_json::json!({
            "derived": reconciliation.derived,
            "stale": reconciliation.patch.is_some(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!(
            "{}",
            render_derived(&client, &reconciliation.derived, reconciliation.patch.is_some())
        );
    }

    Ok(())
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let import = ClientCsvImporter::from_path(&args.csv, args.preview_rows)?;
    print!("{}", render_import(&import));
    Ok(())
}

fn display_name(client: &Client) -> &str {
    if client.raison_sociale.trim().is_empty() {
        &client.id.0
    } else {
        &client.raison_sociale
    }
}

pub(crate) fn render_derived(client: &Client, derived: &DerivedFields, stale: bool) -> String {
    let mut out = String::new();
    let flags = &derived.obligations;

    let _ = writeln!(out, "Client {} ({})", display_name(client), client.id.0);
    let _ = writeln!(
        out,
        "- Obligations: réforme {} | e-invoicing {} | e-reporting transaction {} | e-reporting paiement {} | PA émission {} | PA réception {}",
        flags.assujetti_reforme.label(),
        flags.e_invoicing.label(),
        flags.e_reporting_transaction.label(),
        flags.e_reporting_paiement.label(),
        flags.pa_emission.label(),
        flags.pa_reception.label()
    );
    let _ = writeln!(
        out,
        "- Niveau d'obligation: {} (score {})",
        derived.obligation_score.level.label(),
        derived.obligation_score.score
    );
    let _ = writeln!(
        out,
        "- Maturité digitale: {} (score {})",
        derived.maturity.level.label(),
        derived.maturity.score
    );
    let _ = writeln!(out, "- Cartographie: {}", derived.cartographie.label());
    let _ = writeln!(out, "- Complétion: {:.0}%", derived.completion_pct);
    render_tools(&mut out, client);
    if stale {
        let _ = writeln!(out, "- Stored derived copy is stale and would be rewritten");
    }
    out
}

fn render_tools(out: &mut String, client: &Client) {
    let _ = writeln!(out, "- Outils:");
    for outil in OutilLogiciel::ALL {
        let (answer, detail) = outil.answer(&client.questionnaire);
        let software = detail.or_else(|| client.outils.logiciel(outil));
        let _ = writeln!(
            out,
            "  - {}: {}{}",
            outil.label(),
            answer.unwrap_or("N/A"),
            software.map(|name| format!(" ({name})")).unwrap_or_default()
        );
    }
    for outil in OutilStatut::ALL {
        if outil.applies_to(&client.questionnaire) {
            let _ = writeln!(
                out,
                "  - {}: {}",
                outil.label(),
                client.outils.statut(outil).label()
            );
        }
    }
}

fn render_preview(preview: &ImportPreview) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Columns: {}", preview.headers.join(" | "));
    for mapped in &preview.mapped {
        let _ = writeln!(out, "  - {} -> {}", mapped.header, mapped.label);
    }
    if !preview.unmapped.is_empty() {
        let _ = writeln!(out, "  Ignored: {}", preview.unmapped.join(", "));
    }

    if preview.rows.is_empty() {
        let _ = writeln!(out, "No data rows to preview.");
    } else {
        let _ = writeln!(
            out,
            "Preview of the first {} of {} rows:",
            preview.rows.len(),
            preview.total_rows
        );
        for row in &preview.rows {
            let _ = writeln!(out, "  {}", row.join(" | "));
        }
    }

    if !preview.errors.is_empty() {
        let _ = writeln!(out, "Read errors:");
        for error in &preview.errors {
            let _ = writeln!(out, "  - line {}: {}", error.line, error.message);
        }
    }
    out
}

pub(crate) fn render_import(import: &ClientImport) -> String {
    let mut out = render_preview(&import.preview);

    if import.clients.is_empty() {
        let _ = writeln!(out, "\nNo client could be mapped from this file.");
        return out;
    }

    let _ = writeln!(out, "\n{} clients mapped:", import.clients.len());
    for client in &import.clients {
        let derived = reconcile(client).derived;
        let _ = writeln!(
            out,
            "  - {}: obligation {} | maturité {} | {} | {:.0}% complete",
            display_name(client),
            derived.obligation_score.level.label(),
            derived.maturity.level.label(),
            derived.cartographie.label(),
            derived.completion_pct
        );
    }
    out
}
