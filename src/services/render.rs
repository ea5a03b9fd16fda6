use crate::models::{AppSettings, DocKind, Document, DocumentTotals};
use crate::utils::{escape_html, format_decimal, multiline_html};

// Visual layouts share the same five content blocks and differ only in
// arrangement, typography and where the primary color lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Classic,
    Modern,
    Bold,
}

impl Template {
    // Resolved once per render; unrecognized settings values fall back to
    // the classic layout.
    pub fn resolve(value: &str) -> Template {
        match value {
            "modern" => Template::Modern,
            "bold" => Template::Bold,
            _ => Template::Classic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    // Edit affordances wired through data-action attributes.
    Interactive,
    // Static text only, for the print/PDF path.
    Final,
}

// Pure projection: same (document, settings, mode, ai_available) always
// yields the same markup, and nothing here mutates its inputs.
pub fn render_document(
    doc: &Document,
    settings: &AppSettings,
    mode: RenderMode,
    ai_available: bool,
) -> String {
    let totals = doc.compute_totals();
    match Template::resolve(&settings.layout_template) {
        Template::Classic => render_classic(doc, &totals, settings, mode, ai_available),
        Template::Modern => render_modern(doc, &totals, settings, mode, ai_available),
        Template::Bold => render_bold(doc, &totals, settings, mode, ai_available),
    }
}

fn render_classic(
    doc: &Document,
    totals: &DocumentTotals,
    settings: &AppSettings,
    mode: RenderMode,
    ai_available: bool,
) -> String {
    let mut html = page_open(settings, "classic", "'Times New Roman', serif");
    let color = escape_html(&settings.primary_color);

    // Header: logo + document identity left, agency identity right, the
    // primary color on the dividing rule.
    html.push_str(&format!(
        "<div class=\"doc-header\" style=\"border-bottom:2px solid {};\">",
        color
    ));
    html.push_str("<div class=\"doc-identity\">");
    html.push_str(&logo_img(settings));
    html.push_str(&format!(
        "<h1 class=\"doc-title\">{}</h1><p class=\"doc-number\">#{}</p>",
        kind_title(doc.kind),
        escape_html(&doc.number)
    ));
    html.push_str("</div>");
    html.push_str("<div class=\"agency-block\">");
    html.push_str(&format!(
        "<h3>{}</h3><p>{}</p><p>{}</p><p>{}</p>",
        escape_html(&settings.agency_name),
        multiline_html(&settings.agency_address),
        escape_html(&settings.agency_email),
        escape_html(&settings.agency_phone)
    ));
    html.push_str("</div></div>");

    // Parties: bill-to left, dates and travel metadata right.
    html.push_str("<div class=\"doc-parties\"><div class=\"bill-to\"><h4>Bill To</h4>");
    html.push_str(&bill_to(doc));
    html.push_str("</div><div class=\"doc-dates\">");
    html.push_str(&date_cell("Date", &doc.date));
    html.push_str(&date_cell(second_date_label(doc.kind, Template::Classic), &doc.due_date));
    if !doc.travel_date.is_empty() {
        html.push_str(&date_cell("Travel Date", &doc.travel_date));
        if !doc.destination.is_empty() {
            html.push_str(&date_cell("Destination", &doc.destination));
        }
    }
    html.push_str("</div></div>");

    html.push_str(&items_table(doc, Template::Classic, mode, ai_available));
    html.push_str(&totals_block(doc, totals, settings, false));
    html.push_str(&format!(
        "<div class=\"doc-footer\">{}</div>",
        footer_block(doc, settings)
    ));
    html.push_str("</div>");
    html
}

fn render_modern(
    doc: &Document,
    totals: &DocumentTotals,
    settings: &AppSettings,
    mode: RenderMode,
    ai_available: bool,
) -> String {
    let mut html = page_open(settings, "modern", "'Inter', sans-serif");
    let color = escape_html(&settings.primary_color);

    // Header: agency identity left, oversized ghost title in a transparent
    // shade of the primary color with the number on top of it.
    html.push_str("<div class=\"doc-header\"><div class=\"agency-block\">");
    html.push_str(&logo_img(settings));
    html.push_str(&format!(
        "<h3>{}</h3><p>{}</p>",
        escape_html(&settings.agency_name),
        escape_html(&settings.agency_email)
    ));
    html.push_str("</div><div class=\"doc-identity\">");
    html.push_str(&format!(
        "<h1 class=\"doc-title ghost\" style=\"color:{}20;\">{}</h1>\
         <p class=\"doc-number\" style=\"color:{};\">#{}</p>",
        color,
        kind_title(doc.kind),
        color,
        escape_html(&doc.number)
    ));
    html.push_str("</div></div>");

    // Parties: full-width tinted band with a two-column grid.
    html.push_str("<div class=\"doc-parties band\"><div class=\"bill-to\"><h4>Bill To</h4>");
    html.push_str(&bill_to(doc));
    html.push_str("</div><div class=\"doc-dates grid\">");
    html.push_str(&date_cell("Date Issued", &doc.date));
    html.push_str(&date_cell(second_date_label(doc.kind, Template::Modern), &doc.due_date));
    if !doc.travel_date.is_empty() {
        html.push_str(&date_cell("Travel Date", &doc.travel_date));
        html.push_str(&date_cell("Destination", &doc.destination));
    }
    html.push_str("</div></div>");

    html.push_str(&items_table(doc, Template::Modern, mode, ai_available));
    html.push_str(&totals_block(doc, totals, settings, false));
    html.push_str(&format!(
        "<div class=\"doc-footer ruled\">{}</div>",
        footer_block(doc, settings)
    ));
    html.push_str("</div>");
    html
}

fn render_bold(
    doc: &Document,
    totals: &DocumentTotals,
    settings: &AppSettings,
    mode: RenderMode,
    ai_available: bool,
) -> String {
    let mut html = page_open(settings, "bold", "'Inter', sans-serif");
    let color = escape_html(&settings.primary_color);

    // Header: full-bleed band in the primary color, white text.
    html.push_str(&format!(
        "<div class=\"doc-header banner\" style=\"background-color:{};color:#ffffff;\">",
        color
    ));
    html.push_str("<div class=\"doc-identity\">");
    html.push_str(&logo_img(settings));
    html.push_str(&format!(
        "<h1 class=\"doc-title\">{}</h1><p class=\"doc-number\">#{}</p>",
        kind_title(doc.kind),
        escape_html(&doc.number)
    ));
    html.push_str("</div><div class=\"agency-block\">");
    html.push_str(&format!(
        "<h3>{}</h3><p>{}</p><p>{}</p>",
        escape_html(&settings.agency_name),
        multiline_html(&settings.agency_address),
        escape_html(&settings.agency_email)
    ));
    html.push_str("</div></div>");

    // Parties: bill-to left, ruled label/value rows right.
    html.push_str("<div class=\"doc-parties\"><div class=\"bill-to wide\"><h4>Billed To</h4>");
    html.push_str(&bill_to(doc));
    html.push_str("</div><div class=\"doc-dates rows\">");
    html.push_str(&date_row("Date", &doc.date));
    html.push_str(&date_row(second_date_label(doc.kind, Template::Bold), &doc.due_date));
    if !doc.travel_date.is_empty() {
        html.push_str(&date_row("Traveling On", &doc.travel_date));
    }
    if !doc.destination.is_empty() {
        html.push_str(&date_row("Destination", &doc.destination));
    }
    html.push_str("</div></div>");

    html.push_str(&items_table(doc, Template::Bold, mode, ai_available));
    html.push_str(&totals_block(doc, totals, settings, true));
    html.push_str(&format!(
        "<div class=\"doc-footer band\">{}</div>",
        footer_block(doc, settings)
    ));
    html.push_str("</div>");
    html
}

// --- shared blocks ----------------------------------------------------------

fn page_open(settings: &AppSettings, template_class: &str, font_family: &str) -> String {
    let (width, height) = settings.paper_size.dimensions_mm();
    format!(
        "<div class=\"page {}\" style=\"width:{}mm;min-height:{}mm;font-family:{};\">",
        template_class, width, height, font_family
    )
}

fn kind_title(kind: DocKind) -> &'static str {
    match kind {
        DocKind::Invoice => "INVOICE",
        DocKind::Quote => "QUOTE",
    }
}

fn second_date_label(kind: DocKind, template: Template) -> &'static str {
    match (kind, template) {
        (DocKind::Invoice, Template::Classic) => "Due",
        (DocKind::Invoice, Template::Modern) => "Due Date",
        (DocKind::Invoice, Template::Bold) => "Payment Due",
        (DocKind::Quote, Template::Classic) => "Valid",
        (DocKind::Quote, _) => "Valid Until",
    }
}

fn logo_img(settings: &AppSettings) -> String {
    if settings.logo_url.is_empty() {
        return String::new();
    }
    format!(
        "<img class=\"logo\" src=\"{}\" alt=\"Logo\" />",
        escape_html(&settings.logo_url)
    )
}

fn bill_to(doc: &Document) -> String {
    match &doc.customer_snapshot {
        Some(customer) => format!(
            "<p class=\"party-name\">{}</p><p>{}</p><p>{}</p><p>{}</p>",
            escape_html(&customer.name),
            multiline_html(&customer.address),
            escape_html(&customer.email),
            escape_html(&customer.phone)
        ),
        None => "<p class=\"placeholder\">Select a client...</p>".to_string(),
    }
}

fn date_cell(label: &str, value: &str) -> String {
    format!(
        "<div class=\"date-cell\"><h4>{}</h4><p>{}</p></div>",
        escape_html(label),
        escape_html(value)
    )
}

fn date_row(label: &str, value: &str) -> String {
    format!(
        "<div class=\"date-row\"><span class=\"label\">{}</span><span class=\"value\">{}</span></div>",
        escape_html(label),
        escape_html(value)
    )
}

// One row per line item in sequence order. Interactive mode carries the edit
// inputs, the AI-enhance affordance and the remove button; final mode is
// static text for printing.
fn items_table(
    doc: &Document,
    template: Template,
    mode: RenderMode,
    ai_available: bool,
) -> String {
    let flavor = match template {
        Template::Classic => "ruled",
        Template::Modern | Template::Bold => "banded",
    };
    let interactive = mode == RenderMode::Interactive;

    let mut html = format!("<table class=\"items {}\"><thead><tr>", flavor);
    html.push_str("<th class=\"col-description\">Description</th>");
    html.push_str("<th class=\"col-qty\">Qty</th>");
    html.push_str("<th class=\"col-price\">Price</th>");
    html.push_str("<th class=\"col-total\">Total</th>");
    if interactive {
        html.push_str("<th class=\"col-actions\"></th>");
    }
    html.push_str("</tr></thead><tbody>");

    for (index, item) in doc.items.iter().enumerate() {
        html.push_str("<tr>");

        html.push_str("<td class=\"col-description\">");
        if interactive {
            html.push_str(&format!(
                "<textarea rows=\"2\" placeholder=\"Enter itinerary details...\" \
                 data-action=\"update-item\" data-index=\"{}\" data-field=\"description\">{}</textarea>",
                index,
                escape_html(&item.description)
            ));
            html.push_str(&format!(
                "<button type=\"button\" class=\"ai-enhance\" data-action=\"enhance-item\" \
                 data-index=\"{}\"{}>AI Enhance</button>",
                index,
                if ai_available { "" } else { " disabled" }
            ));
        } else {
            html.push_str(&multiline_html(&item.description));
        }
        html.push_str("</td>");

        html.push_str("<td class=\"col-qty\">");
        if interactive {
            html.push_str(&format!(
                "<input type=\"number\" value=\"{}\" data-action=\"update-item\" \
                 data-index=\"{}\" data-field=\"quantity\" />",
                item.quantity, index
            ));
        } else {
            html.push_str(&item.quantity.to_string());
        }
        html.push_str("</td>");

        html.push_str("<td class=\"col-price\">");
        if interactive {
            html.push_str(&format!(
                "<input type=\"number\" value=\"{}\" data-action=\"update-item\" \
                 data-index=\"{}\" data-field=\"price\" />",
                item.price, index
            ));
        } else {
            html.push_str(&format_decimal(item.price));
        }
        html.push_str("</td>");

        html.push_str(&format!(
            "<td class=\"col-total\">{}</td>",
            format_decimal(item.line_total())
        ));

        if interactive {
            html.push_str(&format!(
                "<td class=\"col-actions\"><button type=\"button\" class=\"remove-item\" \
                 data-action=\"remove-item\" data-index=\"{}\">Remove</button></td>",
                index
            ));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    if interactive {
        html.push_str(
            "<button type=\"button\" class=\"add-item\" data-action=\"add-item\">+ Add Line Item</button>",
        );
    }
    html
}

// Subtotal always, tax line only for a positive rate, discount line only for
// a positive discount, grand total always with the currency prefix.
fn totals_block(
    doc: &Document,
    totals: &DocumentTotals,
    settings: &AppSettings,
    accent_total: bool,
) -> String {
    let currency = escape_html(&settings.currency);
    let mut html = String::from("<div class=\"doc-totals\">");

    html.push_str(&format!(
        "<div class=\"totals-row\"><span>Subtotal</span><span>{}{}</span></div>",
        currency,
        format_decimal(totals.subtotal)
    ));
    if doc.tax_rate > 0.0 {
        html.push_str(&format!(
            "<div class=\"totals-row\"><span>Tax ({}%)</span><span>{}{}</span></div>",
            doc.tax_rate,
            currency,
            format_decimal(totals.tax_amount)
        ));
    }
    if doc.discount > 0.0 {
        html.push_str(&format!(
            "<div class=\"totals-row discount\"><span>Discount</span><span>-{}{}</span></div>",
            currency,
            format_decimal(doc.discount)
        ));
    }

    let accent = if accent_total {
        format!(" style=\"color:{};\"", escape_html(&settings.primary_color))
    } else {
        String::new()
    };
    html.push_str(&format!(
        "<div class=\"totals-row grand\"{}><span>Total</span><span>{}{}</span></div>",
        accent,
        currency,
        format_decimal(totals.total)
    ));
    html.push_str("</div>");
    html
}

// Notes/terms always; payment details only on invoices.
fn footer_block(doc: &Document, settings: &AppSettings) -> String {
    let notes = if doc.notes.is_empty() {
        &settings.terms_and_conditions
    } else {
        &doc.notes
    };

    let mut html = String::from("<div class=\"footer-grid\">");
    html.push_str(&format!(
        "<div class=\"footer-notes\"><h4>Notes / Payment Terms</h4><div>{}</div></div>",
        multiline_html(notes)
    ));
    if doc.kind == DocKind::Invoice {
        html.push_str("<div class=\"footer-payment\"><h4>Payment Details</h4>");
        html.push_str(&format!("<div>{}</div>", multiline_html(&settings.bank_details)));
        if !doc.payment_method.is_empty() {
            html.push_str(&format!(
                "<p class=\"payment-method\">Method: {}</p>",
                escape_html(&doc.payment_method)
            ));
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, DocStatus, LineItem};

    fn settings(template: &str) -> AppSettings {
        let mut settings = AppSettings::default();
        settings.layout_template = template.to_string();
        settings
    }

    fn document() -> Document {
        Document {
            id: "doc-1".to_string(),
            kind: DocKind::Invoice,
            number: "INV-7001".to_string(),
            date: "2026-04-01".to_string(),
            due_date: "2026-04-15".to_string(),
            travel_date: "2026-05-02".to_string(),
            destination: "Lisbon".to_string(),
            payment_method: "Bank Transfer".to_string(),
            customer_id: "c1".to_string(),
            customer_snapshot: Some(Customer {
                id: "c1".to_string(),
                name: "Ada Wanderer".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555-1234".to_string(),
                address: "7 Harbor View".to_string(),
                notes: None,
            }),
            items: vec![
                LineItem {
                    id: "i1".to_string(),
                    description: "Return flights".to_string(),
                    quantity: 2,
                    price: 100.0,
                },
                LineItem {
                    id: "i2".to_string(),
                    description: "Harbor hotel".to_string(),
                    quantity: 1,
                    price: 50.0,
                },
            ],
            status: DocStatus::Draft,
            notes: String::new(),
            discount: 20.0,
            tax_rate: 10.0,
        }
    }

    #[test]
    fn unknown_template_falls_back_to_classic() {
        assert_eq!(Template::resolve("classic"), Template::Classic);
        assert_eq!(Template::resolve("modern"), Template::Modern);
        assert_eq!(Template::resolve("bold"), Template::Bold);
        assert_eq!(Template::resolve("brutalist"), Template::Classic);
        assert_eq!(Template::resolve(""), Template::Classic);

        let doc = document();
        let classic = render_document(&doc, &settings("classic"), RenderMode::Final, false);
        let fallback = render_document(&doc, &settings("brutalist"), RenderMode::Final, false);
        assert_eq!(classic, fallback);
    }

    #[test]
    fn rendering_is_deterministic() {
        let doc = document();
        let cfg = settings("modern");
        let first = render_document(&doc, &cfg, RenderMode::Interactive, true);
        let second = render_document(&doc, &cfg, RenderMode::Interactive, true);
        assert_eq!(first, second);
    }

    #[test]
    fn templates_share_data_but_differ_in_markup() {
        let doc = document();
        let outputs: Vec<String> = ["classic", "modern", "bold"]
            .into_iter()
            .map(|t| render_document(&doc, &settings(t), RenderMode::Final, false))
            .collect();

        for html in &outputs {
            // Identical computed totals and item ordering across layouts.
            assert!(html.contains("$250.00"));
            assert!(html.contains("$25.00"));
            assert!(html.contains("$255.00"));
            let flights = html.find("Return flights").unwrap();
            let hotel = html.find("Harbor hotel").unwrap();
            assert!(flights < hotel);
        }

        assert_ne!(outputs[0], outputs[1]);
        assert_ne!(outputs[1], outputs[2]);
        assert_ne!(outputs[0], outputs[2]);
    }

    #[test]
    fn tax_line_requires_a_positive_rate() {
        let mut doc = document();
        let cfg = settings("classic");
        assert!(render_document(&doc, &cfg, RenderMode::Final, false).contains("Tax (10%)"));

        doc.tax_rate = 0.0;
        let html = render_document(&doc, &cfg, RenderMode::Final, false);
        assert!(!html.contains("Tax ("));
        assert!(html.contains("Subtotal"));
    }

    #[test]
    fn discount_line_requires_a_positive_discount() {
        let mut doc = document();
        let cfg = settings("classic");
        assert!(render_document(&doc, &cfg, RenderMode::Final, false).contains("Discount"));
        assert!(render_document(&doc, &cfg, RenderMode::Final, false).contains("-$20.00"));

        doc.discount = 0.0;
        let html = render_document(&doc, &cfg, RenderMode::Final, false);
        assert!(!html.contains("Discount"));
    }

    #[test]
    fn final_mode_has_no_edit_affordances() {
        let doc = document();
        let html = render_document(&doc, &settings("modern"), RenderMode::Final, true);
        assert!(!html.contains("<input"));
        assert!(!html.contains("<textarea"));
        assert!(!html.contains("<button"));
        assert!(!html.contains("data-action"));
        assert!(html.contains("Return flights"));
        assert!(html.contains("100.00"));
    }

    #[test]
    fn interactive_mode_carries_edit_controls_per_row() {
        let doc = document();
        let html = render_document(&doc, &settings("classic"), RenderMode::Interactive, true);
        assert_eq!(html.matches("<textarea").count(), 2);
        assert_eq!(html.matches("data-action=\"remove-item\"").count(), 2);
        assert_eq!(html.matches("data-action=\"enhance-item\"").count(), 2);
        assert!(html.contains("data-action=\"add-item\""));
    }

    #[test]
    fn enhance_affordance_is_disabled_without_the_collaborator() {
        let doc = document();
        let cfg = settings("classic");
        let with_ai = render_document(&doc, &cfg, RenderMode::Interactive, true);
        let without_ai = render_document(&doc, &cfg, RenderMode::Interactive, false);
        assert!(!with_ai.contains(" disabled"));
        assert_eq!(without_ai.matches(" disabled").count(), 2);
    }

    #[test]
    fn canvas_follows_the_paper_size() {
        let doc = document();
        let mut cfg = settings("classic");
        let html = render_document(&doc, &cfg, RenderMode::Final, false);
        assert!(html.contains("width:210mm;min-height:297mm"));

        cfg.paper_size = crate::models::PaperSize::Letter;
        let html = render_document(&doc, &cfg, RenderMode::Final, false);
        assert!(html.contains("width:216mm;min-height:279mm"));
    }

    #[test]
    fn payment_details_appear_on_invoices_only() {
        let mut doc = document();
        let cfg = settings("bold");
        let invoice = render_document(&doc, &cfg, RenderMode::Final, false);
        assert!(invoice.contains("Payment Details"));
        assert!(invoice.contains("Method: Bank Transfer"));

        doc.kind = DocKind::Quote;
        let quote = render_document(&doc, &cfg, RenderMode::Final, false);
        assert!(!quote.contains("Payment Details"));
        assert!(quote.contains("Valid Until"));
    }

    #[test]
    fn missing_snapshot_renders_the_placeholder() {
        let mut doc = document();
        doc.customer_snapshot = None;
        let html = render_document(&doc, &settings("modern"), RenderMode::Final, false);
        assert!(html.contains("Select a client..."));
        assert!(!html.contains("Ada Wanderer"));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut doc = document();
        doc.items[0].description = "<script>alert('x')</script>".to_string();
        let html = render_document(&doc, &settings("classic"), RenderMode::Final, false);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn notes_override_the_default_terms() {
        let mut doc = document();
        let cfg = settings("classic");
        let html = render_document(&doc, &cfg, RenderMode::Final, false);
        assert!(html.contains("Payment is due within 14 days."));

        doc.notes = "Non-refundable after departure.".to_string();
        let html = render_document(&doc, &cfg, RenderMode::Final, false);
        assert!(html.contains("Non-refundable after departure."));
        assert!(!html.contains("Payment is due within 14 days."));
    }
}
