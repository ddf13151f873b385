// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;

use crate::models::Transaction;

pub const CSV_HEADER: [&str; 7] = ["id", "type", "category", "amount", "currency", "date", "note"];

pub fn default_export_name(date: NaiveDate) -> String {
    format!("budget_export_{}.csv", date)
}

/// Fixed export format: one row per transaction in collection order. Only
/// the note column is quoted, always, with inner quotes doubled; the writer
/// is told never to quote so the pre-quoted note passes through verbatim.
pub fn write_csv<W: Write>(out: W, transactions: &[Transaction]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(out);
    wtr.write_record(CSV_HEADER)?;
    for t in transactions {
        let note = t.note.as_deref().unwrap_or("");
        let quoted_note = format!("\"{}\"", note.replace('"', "\"\""));
        wtr.write_record([
            t.id.to_string(),
            t.kind.to_string(),
            t.category.clone(),
            t.amount.to_string(),
            t.currency.clone(),
            t.date.to_string(),
            quoted_note,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
