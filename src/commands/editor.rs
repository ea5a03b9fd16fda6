use tauri::State;

use crate::models::{DocKind, DocumentTotals, DraftView};
use crate::services::assist::AssistService;
use crate::services::draft::DocumentDraft;
use crate::services::render::{render_document, RenderMode};
use crate::services::state::AppState;
use crate::utils::encode_mailto_component;

#[tauri::command]
pub async fn open_document(
    kind: String,
    document_id: Option<String>,
    state: State<'_, AppState>,
) -> Result<DraftView, String> {
    let kind = DocKind::parse(&kind).ok_or_else(|| format!("Unknown document kind: {}", kind))?;

    let draft = {
        let db = state.db().map_err(|e| e.to_string())?;
        let settings = db.get_settings().map_err(|e| e.to_string())?;
        let existing = match &document_id {
            Some(id) => db.get_document(id).map_err(|e| e.to_string())?,
            None => None,
        };
        match existing {
            Some(document) => DocumentDraft::from_document(document),
            // A missing id opens a fresh draft instead of failing.
            None => DocumentDraft::new(kind, &settings),
        }
    };

    let view = draft.view();
    state.set_draft(draft).map_err(|e| e.to_string())?;
    Ok(view)
}

#[tauri::command]
pub async fn draft_add_item(state: State<'_, AppState>) -> Result<DraftView, String> {
    state
        .with_draft(|draft| {
            draft.add_item();
            draft.view()
        })
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn draft_update_item(
    index: usize,
    field: String,
    value: String,
    state: State<'_, AppState>,
) -> Result<DraftView, String> {
    state
        .with_draft(|draft| {
            draft.update_item(index, &field, &value);
            draft.view()
        })
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn draft_remove_item(
    index: usize,
    state: State<'_, AppState>,
) -> Result<DraftView, String> {
    state
        .with_draft(|draft| {
            draft.remove_item(index);
            draft.view()
        })
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn draft_set_field(
    field: String,
    value: String,
    state: State<'_, AppState>,
) -> Result<DraftView, String> {
    state
        .with_draft(|draft| {
            draft.set_field(&field, &value);
            draft.view()
        })
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn draft_set_customer(
    customer_id: String,
    state: State<'_, AppState>,
) -> Result<DraftView, String> {
    let customers = {
        let db = state.db().map_err(|e| e.to_string())?;
        db.get_customers().map_err(|e| e.to_string())?
    };

    state
        .with_draft(|draft| {
            draft.set_customer(&customers, &customer_id);
            draft.view()
        })
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn draft_totals(state: State<'_, AppState>) -> Result<DocumentTotals, String> {
    state.with_draft(|draft| draft.totals()).map_err(|e| e.to_string())
}

// Settings are read from the store at call time and threaded into the
// renderer explicitly.
#[tauri::command]
pub async fn render_preview(state: State<'_, AppState>) -> Result<String, String> {
    let (settings, ai_available) = {
        let db = state.db().map_err(|e| e.to_string())?;
        let settings = db.get_settings().map_err(|e| e.to_string())?;
        let key = AssistService::load_key(&db);
        (settings, AssistService::is_available(key.as_deref()))
    };

    state
        .with_draft(|draft| {
            render_document(
                draft.document(),
                &settings,
                RenderMode::Interactive,
                ai_available,
            )
        })
        .map_err(|e| e.to_string())
}

// Print-ready projection for the host to turn into paper or a PDF.
#[tauri::command]
pub async fn print_document(state: State<'_, AppState>) -> Result<String, String> {
    let settings = {
        let db = state.db().map_err(|e| e.to_string())?;
        db.get_settings().map_err(|e| e.to_string())?
    };

    state
        .with_draft(|draft| render_document(draft.document(), &settings, RenderMode::Final, false))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn save_draft(state: State<'_, AppState>) -> Result<DraftView, String> {
    let view = state.with_draft(|draft| draft.view()).map_err(|e| e.to_string())?;

    let db = state.db().map_err(|e| e.to_string())?;
    db.save_document(&view.document).map_err(|e| e.to_string())?;
    tracing::info!("saved {} {}", view.document.kind.as_str(), view.document.number);
    Ok(view)
}

#[tauri::command]
pub async fn generate_email_draft(state: State<'_, AppState>) -> Result<String, String> {
    let (document, customer, settings, key) = {
        let db = state.db().map_err(|e| e.to_string())?;
        let settings = db.get_settings().map_err(|e| e.to_string())?;
        let customers = db.get_customers().map_err(|e| e.to_string())?;
        let key = AssistService::load_key(&db);
        drop(db);

        let document = state
            .with_draft(|draft| draft.document().clone())
            .map_err(|e| e.to_string())?;
        let customer = customers
            .into_iter()
            .find(|c| c.id == document.customer_id)
            .ok_or_else(|| "Please select a customer first".to_string())?;
        (document, customer, settings, key)
    };

    Ok(AssistService::draft_email(&document, &customer, &settings, key.as_deref()).await)
}

// The response is applied by positional index. Rows removed while the
// request is in flight shift later indexes, so a stale response can land on
// the wrong item; see DESIGN.md.
#[tauri::command]
pub async fn enhance_item_description(
    index: usize,
    state: State<'_, AppState>,
) -> Result<DraftView, String> {
    let key = {
        let db = state.db().map_err(|e| e.to_string())?;
        AssistService::load_key(&db)
    };
    let text = state
        .with_draft(|draft| {
            draft
                .document()
                .items
                .get(index)
                .map(|item| item.description.clone())
        })
        .map_err(|e| e.to_string())?;

    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return state.with_draft(|draft| draft.view()).map_err(|e| e.to_string());
    };

    let enhanced = AssistService::enhance_text(&text, key.as_deref()).await;
    state
        .with_draft(|draft| {
            draft.update_item(index, "description", &enhanced);
            draft.view()
        })
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn open_mail_client(
    recipient: String,
    subject: String,
    body: String,
) -> Result<(), String> {
    let url = format!(
        "mailto:{}?subject={}&body={}",
        recipient,
        encode_mailto_component(&subject),
        encode_mailto_component(&body)
    );
    open::that(url).map_err(|e| e.to_string())
}
