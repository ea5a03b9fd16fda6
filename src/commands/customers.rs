use serde::Deserialize;
use tauri::State;

use crate::models::Customer;
use crate::services::state::AppState;
use crate::utils::new_id;

#[derive(Deserialize)]
pub struct CustomerPayload {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub notes: Option<String>,
}

#[tauri::command]
pub async fn get_customers(state: State<'_, AppState>) -> Result<Vec<Customer>, String> {
    let db = state.db().map_err(|e| e.to_string())?;
    db.get_customers().map_err(|e| e.to_string())
}

// Insert when the payload carries no id, replace in place otherwise.
#[tauri::command]
pub async fn save_customer(
    payload: CustomerPayload,
    state: State<'_, AppState>,
) -> Result<Customer, String> {
    let customer = Customer {
        id: payload.id.unwrap_or_else(new_id),
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        address: payload.address,
        notes: payload.notes,
    };

    let db = state.db().map_err(|e| e.to_string())?;
    db.save_customer(&customer).map_err(|e| e.to_string())?;
    Ok(customer)
}

// Immediate and unrecoverable; confirming with the operator first is the
// frontend's job.
#[tauri::command]
pub async fn delete_customer(
    customer_id: String,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let db = state.db().map_err(|e| e.to_string())?;
    db.delete_customer(&customer_id).map_err(|e| e.to_string())?;
    tracing::info!("deleted customer {}", customer_id);
    Ok(())
}
