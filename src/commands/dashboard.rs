use tauri::State;

use crate::models::{DashboardStats, DocKind, DocStatus, Document};
use crate::services::state::AppState;

#[tauri::command]
pub async fn get_dashboard_stats(state: State<'_, AppState>) -> Result<DashboardStats, String> {
    let db = state.db().map_err(|e| e.to_string())?;
    let documents = db.get_documents().map_err(|e| e.to_string())?;
    Ok(compute_stats(&documents))
}

// Revenue counts paid invoices only, at their raw item sums; the chart
// series covers both kinds by status.
fn compute_stats(documents: &[Document]) -> DashboardStats {
    let total_revenue = documents
        .iter()
        .filter(|d| d.kind == DocKind::Invoice && d.status == DocStatus::Paid)
        .map(|d| d.items.iter().map(|item| item.line_total()).sum::<f64>())
        .sum();

    let pending_invoices = documents
        .iter()
        .filter(|d| d.kind == DocKind::Invoice && d.status == DocStatus::Sent)
        .count();

    let accepted_quotes = documents
        .iter()
        .filter(|d| d.kind == DocKind::Quote && d.status == DocStatus::Accepted)
        .count();

    let chart = [DocStatus::Paid, DocStatus::Sent, DocStatus::Draft];
    let chart_labels = vec!["Paid".to_string(), "Sent".to_string(), "Draft".to_string()];
    let chart_counts = chart
        .iter()
        .map(|status| documents.iter().filter(|d| d.status == *status).count())
        .collect();

    DashboardStats {
        total_revenue,
        pending_invoices,
        accepted_quotes,
        total_documents: documents.len(),
        chart_labels,
        chart_counts,
    }
}
