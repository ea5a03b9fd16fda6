use tauri::State;

use crate::models::{DocKind, Document, DocumentSummary};
use crate::services::state::AppState;

#[tauri::command]
pub async fn get_documents(
    kind: Option<String>,
    state: State<'_, AppState>,
) -> Result<Vec<Document>, String> {
    let db = state.db().map_err(|e| e.to_string())?;
    let documents = db.get_documents().map_err(|e| e.to_string())?;
    Ok(filter_by_kind(documents, kind.as_deref()))
}

// List rows with the derived total applied, ready for the document table.
#[tauri::command]
pub async fn get_document_summaries(
    kind: Option<String>,
    state: State<'_, AppState>,
) -> Result<Vec<DocumentSummary>, String> {
    let db = state.db().map_err(|e| e.to_string())?;
    let documents = db.get_documents().map_err(|e| e.to_string())?;
    Ok(filter_by_kind(documents, kind.as_deref())
        .iter()
        .map(summarize)
        .collect())
}

#[tauri::command]
pub async fn get_document(
    document_id: String,
    state: State<'_, AppState>,
) -> Result<Option<Document>, String> {
    let db = state.db().map_err(|e| e.to_string())?;
    db.get_document(&document_id).map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_document(
    document_id: String,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let db = state.db().map_err(|e| e.to_string())?;
    db.delete_document(&document_id).map_err(|e| e.to_string())?;
    tracing::info!("deleted document {}", document_id);
    Ok(())
}

fn filter_by_kind(documents: Vec<Document>, kind: Option<&str>) -> Vec<Document> {
    match kind.and_then(DocKind::parse) {
        Some(kind) => documents.into_iter().filter(|d| d.kind == kind).collect(),
        None => documents,
    }
}

fn summarize(document: &Document) -> DocumentSummary {
    DocumentSummary {
        id: document.id.clone(),
        kind: document.kind,
        number: document.number.clone(),
        customer_name: document
            .customer_snapshot
            .as_ref()
            .map(|c| c.name.clone()),
        date: document.date.clone(),
        status: document.status,
        total: document.compute_totals().total,
    }
}
