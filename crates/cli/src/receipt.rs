//! Plain-text receipt printing.

use chrono::{DateTime, TimeZone};
use nexus_pos_core::{Price, Receipt};
use rust_decimal::Decimal;

/// Receipt paper width in characters.
const WIDTH: usize = 32;

/// Render a receipt with its timestamp shown in the local time zone.
#[must_use]
pub fn render(receipt: &Receipt) -> String {
    render_in(receipt, &chrono::Local)
}

/// Render a receipt with its timestamp shown in `tz`.
#[must_use]
pub fn render_in<Tz>(receipt: &Receipt, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let issued_at: DateTime<Tz> = receipt.issued_at.with_timezone(tz);
    let rule = "-".repeat(WIDTH);
    let money = |amount: Decimal| Price::new(amount, receipt.currency).to_string();

    let mut rows = vec![
        format!("{:^WIDTH$}", receipt.store_name),
        format!("{:^WIDTH$}", "Official Receipt"),
        rule.clone(),
        format!("Date: {}", issued_at.format("%Y-%m-%d %H:%M:%S")),
        format!("Table: {}", receipt.table),
        rule.clone(),
    ];
    rows.extend(receipt.lines.iter().map(|line| {
        let label = format!("{}x {}", line.quantity, line.name);
        columns(&label, &money(line.line_total))
    }));
    rows.extend([
        rule.clone(),
        columns("Subtotal", &money(receipt.totals.subtotal)),
        columns("Tax", &money(receipt.totals.tax)),
        columns("TOTAL", &money(receipt.totals.total)),
        rule,
        format!("{:^WIDTH$}", "Thank you!"),
    ]);

    let mut out = rows.join("\n");
    out.push('\n');
    out
}

/// Left label, right-aligned amount, padded to the paper width.
fn columns(label: &str, amount: &str) -> String {
    let pad = WIDTH.saturating_sub(label.chars().count()).max(amount.chars().count() + 1);
    format!("{label}{amount:>pad$}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use nexus_pos_core::{CurrencyCode, ProductId, ReceiptLine, TAX_RATE, Totals};
    use super::*;

    fn receipt() -> Receipt {
        Receipt {
            store_name: "NEXUS POS".to_string(),
            table: 4,
            issued_at: Utc.with_ymd_and_hms(2026, 10, 17, 12, 30, 0).unwrap(),
            currency: CurrencyCode::USD,
            lines: vec![
                ReceiptLine {
                    product_id: ProductId::new(1),
                    name: "Neon Burger".to_string(),
                    unit_price: Decimal::new(1250, 2),
                    quantity: 2,
                    line_total: Decimal::new(2500, 2),
                },
                ReceiptLine {
                    product_id: ProductId::new(3),
                    name: "Quantum Cola".to_string(),
                    unit_price: Decimal::new(350, 2),
                    quantity: 1,
                    line_total: Decimal::new(350, 2),
                },
            ],
            totals: Totals::from_subtotal(Decimal::new(2850, 2), TAX_RATE),
        }
    }

    #[test]
    fn test_render_layout() {
        let text = render_in(&receipt(), &Utc);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.first().unwrap().trim(), "NEXUS POS");
        assert!(text.contains("Date: 2026-10-17 12:30:00"));
        assert!(text.contains("Table: 4"));
        assert!(lines.contains(&"2x Neon Burger            $25.00"));
        assert!(lines.contains(&"1x Quantum Cola            $3.50"));
        assert!(lines.contains(&"TOTAL                     $29.93"));
        assert_eq!(lines.last().unwrap().trim(), "Thank you!");
    }

    #[test]
    fn test_render_has_one_row_per_line_and_trailing_newline() {
        let text = render_in(&receipt(), &Utc);
        assert_eq!(text.lines().count(), 14);
        assert!(text.ends_with("Thank you!           \n"));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn test_render_rows_fit_paper_width() {
        let text = render_in(&receipt(), &Utc);
        for line in text.lines() {
            assert!(line.chars().count() <= WIDTH, "too wide: {line:?}");
        }
    }

    #[test]
    fn test_columns_keeps_a_gap_for_long_names() {
        let row = columns("3x Extra Large Galactic Mega Burger", "$99.00");
        assert!(row.ends_with(" $99.00"));
    }
}
