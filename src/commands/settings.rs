use tauri::State;

use crate::models::AppSettings;
use crate::services::assist::{AssistService, ASSIST_KEY_SETTING};
use crate::services::crypto::CryptoService;
use crate::services::state::AppState;
use crate::utils::logo_data_url;

#[tauri::command]
pub async fn get_settings(state: State<'_, AppState>) -> Result<AppSettings, String> {
    let db = state.db().map_err(|e| e.to_string())?;
    db.get_settings().map_err(|e| e.to_string())
}

// Whole-record save on explicit request; there is no autosave and no
// versioning.
#[tauri::command]
pub async fn save_settings(
    payload: AppSettings,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let db = state.db().map_err(|e| e.to_string())?;
    db.save_settings(&payload).map_err(|e| e.to_string())?;
    tracing::info!("saved agency settings");
    Ok(())
}

// An empty key clears the credential, anything else is stored encrypted.
#[tauri::command]
pub async fn set_assist_api_key(
    api_key: String,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let db = state.db().map_err(|e| e.to_string())?;
    if api_key.trim().is_empty() {
        db.delete_setting(ASSIST_KEY_SETTING).map_err(|e| e.to_string())?;
        return Ok(());
    }

    let protected = CryptoService::protect_api_key(api_key.trim()).map_err(|e| e.to_string())?;
    db.set_setting(ASSIST_KEY_SETTING, &protected)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn assist_available(state: State<'_, AppState>) -> Result<bool, String> {
    let key = {
        let db = state.db().map_err(|e| e.to_string())?;
        AssistService::load_key(&db)
    };
    Ok(AssistService::is_available(key.as_deref()))
}

#[tauri::command]
pub async fn test_assist_key(api_key: String) -> Result<bool, String> {
    let client = reqwest::Client::new();
    let response = client
        .get("https://api.openai.com/v1/models")
        .bearer_auth(api_key)
        .send()
        .await
        .map_err(|e| format!("Connection failed: {}", e))?;

    Ok(response.status().is_success())
}

// Picks an image and returns it as a data: URL for AppSettings.logo_url.
// Oversized or unsupported files surface as an error string, never a crash.
#[tauri::command]
pub async fn pick_logo_file() -> Result<Option<String>, String> {
    let selection = rfd::FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "svg"])
        .pick_file();

    match selection {
        Some(path) => logo_data_url(&path).map(Some).map_err(|e| e.to_string()),
        None => Ok(None),
    }
}
