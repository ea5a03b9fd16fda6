use crate::models::{
    AppSettings, Customer, DocKind, DocStatus, Document, DocumentTotals, DraftView, LineItem,
};
use crate::utils::{
    document_number, iso_date_in_days, new_id, normalize_date, parse_decimal_or_zero,
    parse_quantity_or_zero, today_iso,
};

// One in-memory document draft. Edits apply synchronously; nothing touches
// the store until the caller explicitly saves.
pub struct DocumentDraft {
    document: Document,
}

impl DocumentDraft {
    pub fn new(kind: DocKind, settings: &AppSettings) -> Self {
        DocumentDraft {
            document: Document {
                id: new_id(),
                kind,
                number: document_number(kind.number_prefix()),
                date: today_iso(),
                due_date: iso_date_in_days(14),
                travel_date: String::new(),
                destination: String::new(),
                payment_method: "Bank Transfer".to_string(),
                customer_id: String::new(),
                customer_snapshot: None,
                items: Vec::new(),
                status: DocStatus::Draft,
                notes: String::new(),
                discount: 0.0,
                tax_rate: settings.default_tax_rate,
            },
        }
    }

    pub fn from_document(document: Document) -> Self {
        DocumentDraft { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn add_item(&mut self) {
        self.document.items.push(LineItem {
            id: new_id(),
            description: String::new(),
            quantity: 1,
            price: 0.0,
        });
    }

    // Field dispatch is stringly on purpose: the webview sends edits as
    // (index, field, value) triples. Out-of-range indexes and unknown fields
    // are no-ops, malformed numbers coerce to zero.
    pub fn update_item(&mut self, index: usize, field: &str, value: &str) {
        let Some(item) = self.document.items.get_mut(index) else {
            return;
        };
        match field {
            "description" => item.description = value.to_string(),
            "quantity" => item.quantity = parse_quantity_or_zero(value),
            "price" => item.price = parse_decimal_or_zero(value),
            _ => {}
        }
    }

    pub fn remove_item(&mut self, index: usize) {
        if index < self.document.items.len() {
            self.document.items.remove(index);
        }
    }

    pub fn set_field(&mut self, field: &str, value: &str) {
        let doc = &mut self.document;
        match field {
            "number" => doc.number = value.to_string(),
            "date" => doc.date = normalize_date(value),
            "due_date" => doc.due_date = normalize_date(value),
            "travel_date" => doc.travel_date = normalize_date(value),
            "destination" => doc.destination = value.to_string(),
            "payment_method" => doc.payment_method = value.to_string(),
            "notes" => doc.notes = value.to_string(),
            // Any status goes for any kind; unknown strings leave it alone.
            "status" => {
                if let Some(status) = DocStatus::parse(value) {
                    doc.status = status;
                }
            }
            "discount" => doc.discount = parse_decimal_or_zero(value),
            "tax_rate" => doc.tax_rate = parse_decimal_or_zero(value),
            _ => {}
        }
    }

    // Stores the id plus a deep copy of the customer as it looks right now.
    // The snapshot is never refreshed afterwards, so saved documents keep
    // their historical billing details.
    pub fn set_customer(&mut self, customers: &[Customer], customer_id: &str) {
        self.document.customer_id = customer_id.to_string();
        self.document.customer_snapshot = customers
            .iter()
            .find(|c| c.id == customer_id)
            .cloned();
    }

    pub fn totals(&self) -> DocumentTotals {
        self.document.compute_totals()
    }

    pub fn view(&self) -> DraftView {
        DraftView {
            document: self.document.clone(),
            totals: self.totals(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AppSettings {
        AppSettings::default()
    }

    fn draft_with_items(descriptions: &[&str]) -> DocumentDraft {
        let mut draft = DocumentDraft::new(DocKind::Invoice, &settings());
        for description in descriptions {
            draft.add_item();
            let index = draft.document().items.len() - 1;
            draft.update_item(index, "description", description);
        }
        draft
    }

    #[test]
    fn new_draft_takes_defaults_from_settings() {
        let draft = DocumentDraft::new(DocKind::Quote, &settings());
        let doc = draft.document();
        assert!(doc.number.starts_with("QT-"));
        assert_eq!(doc.status, DocStatus::Draft);
        assert_eq!(doc.tax_rate, 10.0);
        assert_eq!(doc.payment_method, "Bank Transfer");
        assert!(doc.items.is_empty());
        assert!(doc.customer_snapshot.is_none());
    }

    #[test]
    fn added_items_start_with_quantity_one_and_zero_price() {
        let mut draft = DocumentDraft::new(DocKind::Invoice, &settings());
        draft.add_item();
        let item = &draft.document().items[0];
        assert!(item.description.is_empty());
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price, 0.0);
        assert!(!item.id.is_empty());
    }

    #[test]
    fn item_ids_are_distinct() {
        let mut draft = DocumentDraft::new(DocKind::Invoice, &settings());
        draft.add_item();
        draft.add_item();
        let items = &draft.document().items;
        assert_ne!(items[0].id, items[1].id);
    }

    #[test]
    fn updating_items_coerces_malformed_numbers_to_zero() {
        let mut draft = DocumentDraft::new(DocKind::Invoice, &settings());
        draft.add_item();
        draft.update_item(0, "quantity", "three");
        draft.update_item(0, "price", "oops");
        let item = &draft.document().items[0];
        assert_eq!(item.quantity, 0);
        assert_eq!(item.price, 0.0);

        draft.update_item(0, "quantity", "3");
        draft.update_item(0, "price", "19,90");
        let item = &draft.document().items[0];
        assert_eq!(item.quantity, 3);
        assert_eq!(item.price, 19.9);
    }

    #[test]
    fn out_of_range_item_edits_are_noops() {
        let mut draft = draft_with_items(&["flight"]);
        draft.update_item(5, "description", "ghost");
        draft.remove_item(5);
        assert_eq!(draft.document().items.len(), 1);
        assert_eq!(draft.document().items[0].description, "flight");
    }

    #[test]
    fn removing_the_middle_item_keeps_relative_order() {
        let mut draft = draft_with_items(&["flight", "hotel", "transfer"]);
        draft.remove_item(1);
        let descriptions: Vec<&str> = draft
            .document()
            .items
            .iter()
            .map(|i| i.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["flight", "transfer"]);
    }

    #[test]
    fn totals_track_every_mutation() {
        let mut draft = DocumentDraft::new(DocKind::Invoice, &settings());
        draft.set_field("tax_rate", "10");
        draft.set_field("discount", "20");
        draft.add_item();
        draft.update_item(0, "quantity", "2");
        draft.update_item(0, "price", "100");
        draft.add_item();
        draft.update_item(1, "quantity", "1");
        draft.update_item(1, "price", "50");

        let totals = draft.totals();
        assert_eq!(totals.subtotal, 250.0);
        assert_eq!(totals.tax_amount, 25.0);
        assert_eq!(totals.total, 255.0);

        draft.remove_item(0);
        let totals = draft.totals();
        assert_eq!(totals.subtotal, 50.0);
    }

    #[test]
    fn scalar_fields_follow_the_coercion_policy() {
        let mut draft = DocumentDraft::new(DocKind::Invoice, &settings());
        draft.set_field("discount", "not a number");
        draft.set_field("tax_rate", "-5");
        assert_eq!(draft.document().discount, 0.0);
        assert_eq!(draft.document().tax_rate, 0.0);

        draft.set_field("status", "ACCEPTED");
        assert_eq!(draft.document().status, DocStatus::Accepted);
        draft.set_field("status", "LOST");
        assert_eq!(draft.document().status, DocStatus::Accepted);

        draft.set_field("destination", "Kyoto, Japan");
        draft.set_field("nonsense_field", "ignored");
        assert_eq!(draft.document().destination, "Kyoto, Japan");
    }

    #[test]
    fn selecting_a_customer_takes_a_deep_snapshot() {
        let mut customers = vec![Customer {
            id: "c1".to_string(),
            name: "First Name".to_string(),
            email: "c1@example.com".to_string(),
            phone: "555".to_string(),
            address: "Old Address".to_string(),
            notes: None,
        }];

        let mut draft = DocumentDraft::new(DocKind::Invoice, &settings());
        draft.set_customer(&customers, "c1");
        assert_eq!(draft.document().customer_id, "c1");

        // Later edits to the live record must not reach the snapshot.
        customers[0].name = "Renamed".to_string();
        customers[0].address = "New Address".to_string();

        let snapshot = draft.document().customer_snapshot.as_ref().unwrap();
        assert_eq!(snapshot.name, "First Name");
        assert_eq!(snapshot.address, "Old Address");
    }

    #[test]
    fn selecting_an_unknown_customer_clears_the_snapshot() {
        let customers = vec![Customer {
            id: "c1".to_string(),
            name: "Someone".to_string(),
            email: "x@example.com".to_string(),
            phone: "555".to_string(),
            address: "Somewhere".to_string(),
            notes: None,
        }];

        let mut draft = DocumentDraft::new(DocKind::Invoice, &settings());
        draft.set_customer(&customers, "c1");
        assert!(draft.document().customer_snapshot.is_some());

        draft.set_customer(&customers, "missing");
        assert_eq!(draft.document().customer_id, "missing");
        assert!(draft.document().customer_snapshot.is_none());
    }
}
