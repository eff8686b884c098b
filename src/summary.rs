//! Aggregation of normalized records into per-period Box A-D summary rows.

use crate::types::{NormalizedRecord, SummaryRow};

/// Box label -> static description text.
pub const BOX_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Box A", "Standard Rated Supplies (5%)"),
    ("Box B", "Zero Rated Supplies (0%)"),
    ("Box C", "Recoverable Input VAT"),
    ("Box D", "Net VAT Payable (BoxA_VAT - BoxC_VAT)"),
];

fn description(box_name: &str) -> &'static str {
    BOX_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == box_name)
        .map(|(_, desc)| *desc)
        .unwrap_or("")
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Sum (net, vat) over records whose box label contains the given letter.
/// Substring containment is deliberate: a label like "AB" is counted into
/// both A and B, matching historical summary outputs. Labels arrive already
/// uppercased from sheet processing.
fn box_totals(records: &[&NormalizedRecord], letter: char) -> (f64, f64) {
    let mut net = 0.0;
    let mut vat = 0.0;
    for rec in records {
        if rec.box_label.contains(letter) {
            net += rec.net_value;
            vat += rec.vat_value;
        }
    }
    (net, vat)
}

/// Aggregate the full record set into summary rows.
///
/// Periods are the distinct (year, month number) pairs present, in
/// chronological order. Every period emits exactly four rows (A, B, C, D);
/// Box D carries the derived net-payable figure, boxes A-C report 0.
pub fn summarize(records: &[NormalizedRecord]) -> Vec<SummaryRow> {
    let mut periods: Vec<(i32, u32, String)> = Vec::new();
    for rec in records {
        if !periods
            .iter()
            .any(|(y, m, _)| *y == rec.year && *m == rec.month_number)
        {
            periods.push((rec.year, rec.month_number, rec.month.clone()));
        }
    }
    periods.sort_by_key(|(year, month_number, _)| (*year, *month_number));

    let mut rows = Vec::with_capacity(periods.len() * 4);
    for (year, month_number, month) in periods {
        let subset: Vec<&NormalizedRecord> = records
            .iter()
            .filter(|r| r.year == year && r.month_number == month_number)
            .collect();
        let period = format!("{} {}", month, year);

        let (net_a, vat_a) = box_totals(&subset, 'A');
        let (net_b, vat_b) = box_totals(&subset, 'B');
        let (net_c, vat_c) = box_totals(&subset, 'C');
        let vat_d = vat_a - vat_c;

        for (box_name, net, vat, payable) in [
            ("Box A", net_a, vat_a, 0.0),
            ("Box B", net_b, vat_b, 0.0),
            ("Box C", net_c, vat_c, 0.0),
            ("Box D", 0.0, vat_d, vat_d),
        ] {
            rows.push(SummaryRow {
                period: period.clone(),
                fta_box: box_name.to_string(),
                description: description(box_name).to_string(),
                net_value: round2(net),
                vat_value: round2(vat),
                net_vat_payable: round2(payable),
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(month: &str, month_number: u32, year: i32, box_label: &str, net: f64, vat: f64) -> NormalizedRecord {
        NormalizedRecord {
            supply_type: String::new(),
            invoice_number: String::new(),
            date: None,
            customer_or_supplier_name: String::new(),
            net_value: net,
            vat_value: vat,
            invoice_value: net + vat,
            recoverable: String::new(),
            box_label: box_label.to_string(),
            box_letter: box_label.chars().find(|c| c.is_ascii_alphabetic()),
            month: month.to_string(),
            month_number,
            year,
            source_sheet: "test".to_string(),
        }
    }

    fn row<'a>(rows: &'a [SummaryRow], period: &str, box_name: &str) -> &'a SummaryRow {
        rows.iter()
            .find(|r| r.period == period && r.fta_box == box_name)
            .unwrap()
    }

    #[test]
    fn every_period_emits_exactly_four_rows() {
        let records = vec![
            record("Jan", 1, 2024, "A", 100.0, 5.0),
            record("Feb", 2, 2024, "C", 40.0, 2.0),
        ];
        let rows = summarize(&records);
        assert_eq!(rows.len(), 8);
        for period in ["Jan 2024", "Feb 2024"] {
            let boxes: Vec<&str> = rows
                .iter()
                .filter(|r| r.period == period)
                .map(|r| r.fta_box.as_str())
                .collect();
            assert_eq!(boxes, vec!["Box A", "Box B", "Box C", "Box D"]);
        }
        // Zero-match boxes still appear, summed to 0
        assert_eq!(row(&rows, "Jan 2024", "Box B").net_value, 0.0);
        assert_eq!(row(&rows, "Jan 2024", "Box C").vat_value, 0.0);
    }

    #[test]
    fn box_d_is_the_a_minus_c_vat_differential() {
        let records = vec![
            record("Jan", 1, 2024, "A", 500000.0, 25000.0),
            record("Jan", 1, 2024, "B", 100000.0, 5000.0),
            record("Jan", 1, 2024, "C", 200000.0, 10000.0),
        ];
        let rows = summarize(&records);
        let d = row(&rows, "Jan 2024", "Box D");
        assert_eq!(d.net_value, 0.0);
        assert_eq!(d.vat_value, 15000.0);
        assert_eq!(d.net_vat_payable, 15000.0);
        assert_eq!(row(&rows, "Jan 2024", "Box A").net_vat_payable, 0.0);
        assert_eq!(row(&rows, "Jan 2024", "Box C").net_vat_payable, 0.0);
    }

    #[test]
    fn box_label_ab_counts_in_both() {
        let records = vec![
            record("Mar", 3, 2024, "A", 100.0, 5.0),
            record("Mar", 3, 2024, "AB", 50.0, 2.5),
        ];
        let rows = summarize(&records);
        let a = row(&rows, "Mar 2024", "Box A");
        let b = row(&rows, "Mar 2024", "Box B");
        assert_eq!(a.net_value, 150.0);
        assert_eq!(a.vat_value, 7.5);
        assert_eq!(b.net_value, 50.0);
        assert_eq!(b.vat_value, 2.5);
    }

    #[test]
    fn records_without_box_labels_join_no_subset() {
        let records = vec![
            record("Jan", 1, 2024, "", 999.0, 99.0),
            record("Jan", 1, 2024, "A", 10.0, 0.5),
        ];
        let rows = summarize(&records);
        assert_eq!(row(&rows, "Jan 2024", "Box A").net_value, 10.0);
        assert_eq!(row(&rows, "Jan 2024", "Box B").net_value, 0.0);
        assert_eq!(row(&rows, "Jan 2024", "Box C").net_value, 0.0);
    }

    #[test]
    fn periods_sort_by_year_then_month() {
        let records = vec![
            record("Feb", 2, 2024, "A", 1.0, 0.0),
            record("Dec", 12, 2023, "A", 1.0, 0.0),
            record("Jan", 1, 2024, "A", 1.0, 0.0),
        ];
        let rows = summarize(&records);
        let periods: Vec<&str> = rows
            .iter()
            .step_by(4)
            .map(|r| r.period.as_str())
            .collect();
        assert_eq!(periods, vec!["Dec 2023", "Jan 2024", "Feb 2024"]);
    }

    #[test]
    fn descriptions_come_from_the_static_table() {
        let rows = summarize(&[record("Jan", 1, 2024, "A", 1.0, 0.05)]);
        assert_eq!(rows[0].description, "Standard Rated Supplies (5%)");
        assert_eq!(rows[3].description, "Net VAT Payable (BoxA_VAT - BoxC_VAT)");
    }

    #[test]
    fn outputs_round_to_two_decimals() {
        let records = vec![
            record("Jan", 1, 2024, "A", 10.004, 0.335),
            record("Jan", 1, 2024, "A", 10.004, 0.334),
        ];
        let rows = summarize(&records);
        let a = row(&rows, "Jan 2024", "Box A");
        assert_eq!(a.net_value, 20.01);
        assert_eq!(a.vat_value, 0.67);
    }
}
