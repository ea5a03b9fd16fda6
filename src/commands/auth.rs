use tauri::State;

use crate::services::auth;
use crate::services::state::AppState;

#[tauri::command]
pub async fn login(
    username: String,
    password: String,
    state: State<'_, AppState>,
) -> Result<bool, String> {
    let db = state.db().map_err(|e| e.to_string())?;
    auth::login(&db, &username, &password).map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn logout(state: State<'_, AppState>) -> Result<(), String> {
    let db = state.db().map_err(|e| e.to_string())?;
    auth::logout(&db).map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn is_authenticated(state: State<'_, AppState>) -> Result<bool, String> {
    let db = state.db().map_err(|e| e.to_string())?;
    auth::is_authenticated(&db).map_err(|e| e.to_string())
}
