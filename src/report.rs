//! Tabular output: CSV year table, man-yen formatting, milestone rows

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::projection::YearRecord;

/// Elapsed-year spacing of milestone rows
pub const MILESTONE_INTERVAL: i32 = 5;

const FIXED_COLUMNS: [&str; 27] = [
    "year",
    "elapsed",
    "head_age",
    "labor_income",
    "partner_income",
    "pension",
    "income",
    "education",
    "rearing",
    "boarding",
    "living",
    "non_mortgage_expense",
    "mortgage_payment",
    "mortgage_balance",
    "applied_rate",
    "retirement_contribution",
    "net_cash_flow",
    "buffer_transfer",
    "cash",
    "domestic",
    "foreign_cash",
    "foreign_bond",
    "foreign_stock",
    "retirement_savings",
    "total_assets",
    "net_assets",
    "child_cost",
];

/// Write the year table as CSV; one `child_N_age` column per child
pub fn write_year_table<W: Write>(writer: W, records: &[YearRecord]) -> Result<()> {
    let children = records.iter().map(|r| r.child_ages.len()).max().unwrap_or(0);
    let mut csv = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = FIXED_COLUMNS[..3].iter().map(|c| c.to_string()).collect();
    header.extend((1..=children).map(|n| format!("child_{}_age", n)));
    header.extend(FIXED_COLUMNS[3..].iter().map(|c| c.to_string()));
    csv.write_record(&header)?;

    for r in records {
        let mut row = vec![r.year.to_string(), r.elapsed.to_string(), r.head_age.to_string()];
        for n in 0..children {
            row.push(r.child_ages.get(n).map(|a| a.to_string()).unwrap_or_default());
        }
        row.extend(
            [
                r.labor_income,
                r.partner_income,
                r.pension,
                r.income,
                r.education,
                r.rearing,
                r.boarding,
                r.living,
                r.non_mortgage_expense,
                r.mortgage_payment,
                r.mortgage_balance,
            ]
            .iter()
            .map(|v| format!("{:.4}", v)),
        );
        row.push(format!("{:.6}", r.applied_rate));
        row.extend(
            [
                r.retirement_contribution,
                r.net_cash_flow,
                r.buffer_transfer,
                r.cash,
                r.domestic,
                r.foreign_cash,
                r.foreign_bond,
                r.foreign_stock,
                r.retirement_savings,
                r.total_assets,
                r.net_assets,
                r.child_cost(),
            ]
            .iter()
            .map(|v| format!("{:.4}", v)),
        );
        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(())
}

/// Write the year table to a file
pub fn write_year_table_to_path<P: AsRef<Path>>(path: P, records: &[YearRecord]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_year_table(file, records)?;
    info!("Wrote {} years to {}", records.len(), path.as_ref().display());
    Ok(())
}

/// Whole man-yen with thousands separators, e.g. `-12,345`
pub fn format_man_yen(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// A row picked out for the short table, with its axis label
#[derive(Debug, Clone)]
pub struct Milestone<'a> {
    pub label: String,
    pub record: &'a YearRecord,
}

/// Every fifth elapsed year, labelled with the head's and first child's ages
pub fn milestones(records: &[YearRecord]) -> Vec<Milestone<'_>> {
    records
        .iter()
        .filter(|r| r.elapsed % MILESTONE_INTERVAL == 0)
        .map(|record| {
            let label = match record.child_ages.first() {
                Some(child) => format!("{} (head {} / child {})", record.year, record.head_age, child),
                None => format!("{} (head {})", record.year, record.head_age),
            };
            Milestone { label, record }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, children: Vec<i32>) -> YearRecord {
        YearRecord {
            head_age: 38 + year - 2025,
            child_ages: children,
            total_assets: 1234.5,
            ..YearRecord::new(year, year - 2025)
        }
    }

    #[test]
    fn test_format_man_yen() {
        assert_eq!(format_man_yen(0.0), "0");
        assert_eq!(format_man_yen(999.4), "999");
        assert_eq!(format_man_yen(1000.0), "1,000");
        assert_eq!(format_man_yen(1234567.8), "1,234,568");
        assert_eq!(format_man_yen(-45678.0), "-45,678");
        assert_eq!(format_man_yen(-0.2), "0");
    }

    #[test]
    fn test_year_table_columns() {
        let records = vec![record(2025, vec![0, -3]), record(2026, vec![1, -2])];
        let mut buffer = Vec::new();
        write_year_table(&mut buffer, &records).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("year,elapsed,head_age,child_1_age,child_2_age,labor_income"));
        assert!(header.ends_with("net_assets,child_cost"));

        let first: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(first[0], "2025");
        assert_eq!(first[3], "0");
        assert_eq!(first[4], "-3");
        assert_eq!(first.len(), header.split(',').count());
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn test_milestones_every_fifth_year() {
        let records: Vec<_> = (2025..=2036).map(|y| record(y, vec![y - 2025])).collect();
        let picked = milestones(&records);

        let years: Vec<i32> = picked.iter().map(|m| m.record.year).collect();
        assert_eq!(years, vec![2025, 2030, 2035]);
        assert_eq!(picked[1].label, "2030 (head 43 / child 5)");
    }
}
