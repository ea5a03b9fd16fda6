use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub description: String,
    pub quantity: u32,
    pub price: f64,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Invoice,
    Quote,
}

impl DocKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocKind::Invoice => "invoice",
            DocKind::Quote => "quote",
        }
    }

    pub fn parse(value: &str) -> Option<DocKind> {
        match value {
            "invoice" => Some(DocKind::Invoice),
            "quote" => Some(DocKind::Quote),
            _ => None,
        }
    }

    pub fn number_prefix(&self) -> &'static str {
        match self {
            DocKind::Invoice => "INV",
            DocKind::Quote => "QT",
        }
    }
}

// Any status may be set on either document kind. PAID only means something
// for invoices and ACCEPTED/REJECTED only for quotes, but the model does not
// enforce the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocStatus {
    Draft,
    Sent,
    Paid,
    Accepted,
    Rejected,
}

impl DocStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocStatus::Draft => "DRAFT",
            DocStatus::Sent => "SENT",
            DocStatus::Paid => "PAID",
            DocStatus::Accepted => "ACCEPTED",
            DocStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(value: &str) -> Option<DocStatus> {
        match value {
            "DRAFT" => Some(DocStatus::Draft),
            "SENT" => Some(DocStatus::Sent),
            "PAID" => Some(DocStatus::Paid),
            "ACCEPTED" => Some(DocStatus::Accepted),
            "REJECTED" => Some(DocStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaperSize {
    A4,
    A5,
    B4,
    B5,
    Letter,
}

impl PaperSize {
    // Closed mapping, width x height in millimeters.
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            PaperSize::A4 => (210, 297),
            PaperSize::A5 => (148, 210),
            PaperSize::B4 => (250, 353),
            PaperSize::B5 => (176, 250),
            PaperSize::Letter => (216, 279),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub kind: DocKind,
    pub number: String,
    pub date: String,
    // Due date for invoices, valid-until for quotes.
    pub due_date: String,
    pub travel_date: String,
    pub destination: String,
    pub payment_method: String,
    pub customer_id: String,
    pub customer_snapshot: Option<Customer>,
    pub items: Vec<LineItem>,
    pub status: DocStatus,
    pub notes: String,
    pub discount: f64,
    pub tax_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentTotals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

impl Document {
    // total = subtotal + tax - discount. Never persisted, recomputed on every
    // read. A discount larger than subtotal + tax yields a negative total.
    pub fn compute_totals(&self) -> DocumentTotals {
        let subtotal: f64 = self.items.iter().map(|item| item.line_total()).sum();
        let tax_amount = subtotal * self.tax_rate / 100.0;
        DocumentTotals {
            subtotal,
            tax_amount,
            total: subtotal + tax_amount - self.discount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub agency_name: String,
    pub agency_email: String,
    pub agency_phone: String,
    pub agency_address: String,
    pub logo_url: String,
    pub primary_color: String,
    pub currency: String,
    pub default_tax_rate: f64,
    pub paper_size: PaperSize,
    pub layout_template: String,
    pub terms_and_conditions: String,
    pub bank_details: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            agency_name: "SkyHigh Travel Agency".to_string(),
            agency_email: "contact@skyhightravel.com".to_string(),
            agency_phone: "+1 (555) 0123-456".to_string(),
            agency_address: "123 Cloud Avenue, Traveler City, TC 90210".to_string(),
            logo_url: String::new(),
            primary_color: "#0284c7".to_string(),
            currency: "$".to_string(),
            default_tax_rate: 10.0,
            paper_size: PaperSize::A4,
            layout_template: "modern".to_string(),
            terms_and_conditions:
                "Payment is due within 14 days. Travel insurance is highly recommended."
                    .to_string(),
            bank_details: "Bank: Global Bank \nAccount: 123456789 \nSort Code: 11-22-33"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftView {
    pub document: Document,
    pub totals: DocumentTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub kind: DocKind,
    pub number: String,
    pub customer_name: Option<String>,
    pub date: String,
    pub status: DocStatus,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub pending_invoices: usize,
    pub accepted_quotes: usize,
    pub total_documents: usize,
    pub chart_labels: Vec<String>,
    pub chart_counts: Vec<usize>,
}
