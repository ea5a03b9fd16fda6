use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{AppSettings, Customer, Document};
use crate::services::crypto::CryptoService;
use crate::utils::format_decimal;

pub const ASSIST_KEY_SETTING: &str = "assist_api_key";

pub const NOT_CONFIGURED_MESSAGE: &str = "AI API Key not configured.";
pub const EMPTY_DRAFT_MESSAGE: &str = "Could not generate draft.";
pub const DRAFT_FAILED_MESSAGE: &str = "Error generating email draft. Please try again.";

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

// External text-generation collaborator. Every call is single-shot with no
// retry, and every failure path degrades to a deterministic fallback string
// so the editor never blocks or surfaces an error dialog.
pub struct AssistService;

impl AssistService {
    pub fn is_available(api_key: Option<&str>) -> bool {
        api_key.map(|key| !key.trim().is_empty()).unwrap_or(false)
    }

    // Decrypted credential from the store, None when unset or unreadable.
    pub fn load_key(db: &Database) -> Option<String> {
        let stored = db.get_setting(ASSIST_KEY_SETTING).ok().flatten()?;
        CryptoService::reveal_api_key(&stored).ok()
    }

    pub async fn draft_email(
        doc: &Document,
        customer: &Customer,
        settings: &AppSettings,
        api_key: Option<&str>,
    ) -> String {
        let Some(key) = api_key.filter(|k| !k.trim().is_empty()) else {
            return NOT_CONFIGURED_MESSAGE.to_string();
        };

        let item_total: f64 = doc.items.iter().map(|item| item.line_total()).sum();
        let prompt = format!(
            "You are a travel agent assistant. Write a professional and polite email to a client.\n\
             Agency Name: {}\n\
             Customer Name: {}\n\
             Document Type: {} (Number: {})\n\
             Total Amount: {}{}\n\
             Return ONLY the body of the email.",
            settings.agency_name,
            customer.name,
            doc.kind.as_str(),
            doc.number,
            settings.currency,
            format_decimal(item_total)
        );

        match call_chat(key, "You draft client emails for a travel agency.", &prompt).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => EMPTY_DRAFT_MESSAGE.to_string(),
            Err(err) => {
                tracing::warn!("email draft generation failed: {}", err);
                DRAFT_FAILED_MESSAGE.to_string()
            }
        }
    }

    pub async fn enhance_text(text: &str, api_key: Option<&str>) -> String {
        let Some(key) = api_key.filter(|k| !k.trim().is_empty()) else {
            return text.to_string();
        };

        let prompt = format!(
            "Improve the following travel itinerary description to make it sound more exciting \
             and professional.\nOriginal text: \"{}\"",
            text
        );

        match call_chat(
            key,
            "You polish travel itinerary wording. Reply with the improved text only.",
            &prompt,
        )
        .await
        {
            Ok(enhanced) if !enhanced.is_empty() => enhanced,
            Ok(_) => text.to_string(),
            Err(err) => {
                tracing::warn!("description enhancement failed: {}", err);
                text.to_string()
            }
        }
    }
}

async fn call_chat(api_key: &str, system_prompt: &str, user_prompt: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let request = ChatRequest {
        model: "gpt-4o-mini".to_string(),
        temperature: 0.7,
        messages: vec![
            Message {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: user_prompt.to_string(),
            },
        ],
    };

    let response = client
        .post("https://api.openai.com/v1/chat/completions")
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("Assist API error {}: {}", status, body));
    }

    let body: ChatResponse = response.json().await?;
    let content = body
        .choices
        .first()
        .ok_or_else(|| anyhow!("Empty response"))?
        .message
        .content
        .trim()
        .to_string();
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocKind, DocStatus, LineItem};

    fn document() -> Document {
        Document {
            id: "d1".to_string(),
            kind: DocKind::Quote,
            number: "QT-0042".to_string(),
            date: "2026-03-10".to_string(),
            due_date: "2026-03-24".to_string(),
            travel_date: String::new(),
            destination: "Paris".to_string(),
            payment_method: "Bank Transfer".to_string(),
            customer_id: "c1".to_string(),
            customer_snapshot: None,
            items: vec![LineItem {
                id: "i1".to_string(),
                description: "Paris trip".to_string(),
                quantity: 1,
                price: 900.0,
            }],
            status: DocStatus::Draft,
            notes: String::new(),
            discount: 0.0,
            tax_rate: 0.0,
        }
    }

    fn customer() -> Customer {
        Customer {
            id: "c1".to_string(),
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-0202".to_string(),
            address: "789 Oak Ln".to_string(),
            notes: None,
        }
    }

    #[test]
    fn availability_requires_a_non_empty_key() {
        assert!(!AssistService::is_available(None));
        assert!(!AssistService::is_available(Some("")));
        assert!(!AssistService::is_available(Some("   ")));
        assert!(AssistService::is_available(Some("sk-abc")));
    }

    #[tokio::test]
    async fn enhance_without_a_key_returns_the_input_unchanged() {
        let enhanced = AssistService::enhance_text("Paris trip", None).await;
        assert_eq!(enhanced, "Paris trip");

        let enhanced = AssistService::enhance_text("Paris trip", Some(" ")).await;
        assert_eq!(enhanced, "Paris trip");
    }

    #[tokio::test]
    async fn email_draft_without_a_key_is_the_fixed_message() {
        let draft =
            AssistService::draft_email(&document(), &customer(), &AppSettings::default(), None)
                .await;
        assert_eq!(draft, NOT_CONFIGURED_MESSAGE);
    }

    #[test]
    fn missing_stored_key_loads_as_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(AssistService::load_key(&db).is_none());
    }
}
