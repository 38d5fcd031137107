use crate::models::order::OrderStatus;
use crate::notice::Notice;
use crate::render::{BoardSnapshot, Row, RowAction, Table};

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
table{border-collapse:collapse;width:100%;margin-bottom:2rem}\
th,td{border:1px solid #ccc;padding:.4rem;text-align:left}\
.urgent-row{background:#fff0f0}\
.urgent-label{color:#b00;font-weight:bold}\
.normal-label{color:#555}\
#notification{padding:.6rem;background:#e8f5e9;border:1px solid #81c784;margin-bottom:1rem}";

/// Everything the page needs besides the tables themselves.
#[derive(Debug, Clone, Default)]
pub struct PageChrome<'a> {
    pub notice: Option<&'a Notice>,
    pub ingest_busy: bool,
}

impl PageChrome<'_> {
    /// The page reloads itself while a fetch is pending or a notice is shown.
    pub fn needs_refresh(&self) -> bool {
        self.ingest_busy || self.notice.is_some()
    }
}

pub fn render_page(snapshot: &BoardSnapshot, chrome: &PageChrome<'_>) -> String {
    let mut page = String::with_capacity(8 * 1024);

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    if chrome.needs_refresh() {
        page.push_str("<meta http-equiv=\"refresh\" content=\"1\">\n");
    }
    page.push_str("<title>Dispatch Board</title>\n");
    page.push_str(&format!("<style>{STYLE}</style>\n"));
    page.push_str("</head>\n<body>\n<h1>Dispatch Board</h1>\n");

    if let Some(notice) = chrome.notice {
        page.push_str(&format!(
            "<div id=\"notification\" data-expires-at=\"{}\">{}</div>\n",
            notice.expires_at.to_rfc3339(),
            escape(&notice.message)
        ));
    }

    let (disabled, label) = if chrome.ingest_busy {
        (" disabled", "Fetching...")
    } else {
        ("", "Fetch New Orders")
    };
    page.push_str(&format!(
        "<form method=\"post\" action=\"/board/fetch\">\
<button id=\"fetch-button\" type=\"submit\"{disabled}>{label}</button></form>\n"
    ));

    for table in snapshot.tables() {
        render_table(&mut page, table);
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn table_id(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Unassigned => "unassigned",
        OrderStatus::Assigned => "assigned",
        OrderStatus::Delivered => "delivered",
    }
}

fn render_table(page: &mut String, table: &Table) {
    let id = table_id(table.status);
    let extra_headers: &[&str] = match table.status {
        OrderStatus::Unassigned => &["Assign"],
        OrderStatus::Assigned => &["Driver", "Action"],
        OrderStatus::Delivered => &["Driver", "Delivered"],
    };

    page.push_str(&format!(
        "<h2>{} (<span id=\"{id}-count\">{}</span>)</h2>\n",
        table.title, table.count
    ));
    page.push_str(&format!("<table id=\"{id}-table\">\n<thead><tr>"));
    for header in [
        "Priority",
        "Invoice",
        "Garage",
        "Area",
        "Total",
        "Items",
        "Warehouses",
    ]
    .iter()
    .chain(extra_headers)
    {
        page.push_str(&format!("<th>{header}</th>"));
    }
    page.push_str("</tr></thead>\n<tbody>\n");

    if table.rows.is_empty() {
        page.push_str(&format!(
            "<tr><td colspan=\"{}\">{}</td></tr>\n",
            7 + extra_headers.len(),
            table.empty_message
        ));
    }
    for row in &table.rows {
        render_row(page, row);
    }

    page.push_str("</tbody>\n</table>\n");
}

fn render_row(page: &mut String, row: &Row) {
    let (row_class, label_class) = if row.urgent {
        (" class=\"urgent-row\"", "urgent-label")
    } else {
        ("", "normal-label")
    };

    page.push_str(&format!("<tr{row_class}>"));
    page.push_str(&format!(
        "<td><span class=\"{label_class}\">{}</span></td>",
        row.priority
    ));
    for cell in [
        row.invoice.as_str(),
        row.garage.as_str(),
        row.area.as_str(),
        row.total.as_str(),
    ] {
        page.push_str(&format!("<td>{}</td>", escape(cell)));
    }
    page.push_str(&format!("<td>{}</td>", row.items));
    page.push_str(&format!("<td>{}</td>", escape(&row.warehouses)));

    let order_id = row.order_id;
    match &row.action {
        RowAction::Assign { drivers } => {
            page.push_str(&format!(
                "<td><form method=\"post\" action=\"/board/orders/{order_id}/assign\">\
<select name=\"driver_id\" id=\"driver-select-{order_id}\">"
            ));
            for driver in drivers {
                page.push_str(&format!(
                    "<option value=\"{}\">{}</option>",
                    driver.id,
                    escape(&driver.name)
                ));
            }
            page.push_str(
                "</select><button class=\"assign-button\" type=\"submit\">Assign</button></form></td>",
            );
        }
        RowAction::Deliver { driver } => {
            page.push_str(&format!("<td>{}</td>", escape(driver)));
            page.push_str(&format!(
                "<td><form method=\"post\" action=\"/board/orders/{order_id}/deliver\">\
<button class=\"deliver-button\" type=\"submit\">Mark Delivered</button></form></td>"
            ));
        }
        RowAction::Delivered {
            driver,
            delivered_at,
        } => {
            page.push_str(&format!("<td>{}</td>", escape(driver)));
            page.push_str(&format!("<td>{}</td>", escape(delivered_at)));
        }
    }

    page.push_str("</tr>\n");
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
