#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod commands;
mod db;
mod models;
mod services;
mod utils;

use anyhow::anyhow;
use tauri::Manager;

use crate::services::state::AppState;

fn main() {
    tracing_subscriber::fmt::init();

    tauri::Builder::default()
        .setup(|app| {
            let app_data_dir = app
                .path()
                .app_data_dir()
                .map_err(|e| anyhow!("App data dir: {}", e))?;
            std::fs::create_dir_all(&app_data_dir)?;

            let db = db::Database::new(app_data_dir.join("skydesk.sqlite"))?;
            db.seed_defaults()?;
            app.manage(AppState::new(db));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::auth::login,
            commands::auth::logout,
            commands::auth::is_authenticated,
            commands::customers::get_customers,
            commands::customers::save_customer,
            commands::customers::delete_customer,
            commands::documents::get_documents,
            commands::documents::get_document_summaries,
            commands::documents::get_document,
            commands::documents::delete_document,
            commands::editor::open_document,
            commands::editor::draft_add_item,
            commands::editor::draft_update_item,
            commands::editor::draft_remove_item,
            commands::editor::draft_set_field,
            commands::editor::draft_set_customer,
            commands::editor::draft_totals,
            commands::editor::render_preview,
            commands::editor::print_document,
            commands::editor::save_draft,
            commands::editor::generate_email_draft,
            commands::editor::enhance_item_description,
            commands::editor::open_mail_client,
            commands::settings::get_settings,
            commands::settings::save_settings,
            commands::settings::set_assist_api_key,
            commands::settings::assist_available,
            commands::settings::test_assist_key,
            commands::settings::pick_logo_file,
            commands::dashboard::get_dashboard_stats,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
