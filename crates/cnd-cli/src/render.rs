//! Plain-text rendering of records and history for the terminal.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use cnd_core::{CertificateRecord, ExpiryStatus};
use cnd_panel::{HistoryState, HistoryViewer, Notification, RecordListView};

const HEADER: [&str; 10] = [
    "ID",
    "TAXPAYER",
    "NAME",
    "TYPE",
    "AUTHORITY",
    "CLEARANCE",
    "ISSUED",
    "EXPIRES",
    "PROCESSING",
    "CONTROL",
];

/// Marker appended to the expiry column.
fn expiry_marker(status: ExpiryStatus) -> &'static str {
    match status {
        ExpiryStatus::Expired => " (expired)",
        ExpiryStatus::ExpiringSoon => " (expiring soon)",
        ExpiryStatus::Valid | ExpiryStatus::Unknown => "",
    }
}

/// Table cells of one record, in [`HEADER`] order.
pub fn record_cells(record: &CertificateRecord, now: DateTime<Utc>) -> Vec<String> {
    let processing = match record.status_icon().tooltip {
        Some(tip) => format!("{} ({tip})", record.processing_status.label()),
        None => record.processing_status.label().to_string(),
    };
    let mut id = record.id.to_string();
    if record.file_available {
        id.push('*');
    }
    vec![
        id,
        record.taxpayer_id.formatted(),
        record.taxpayer_name.clone(),
        record.jurisdiction.code().to_string(),
        record.issuing_authority.clone(),
        record.clearance_status.label().to_string(),
        record.issue_date.display_date(),
        format!(
            "{}{}",
            record.expiry_date.display_date(),
            expiry_marker(record.expiry_status(now))
        ),
        processing,
        record.control_code_preview(),
    ]
}

/// Write `records` as an aligned table. Ids marked `*` have a document.
pub fn write_table(
    out: &mut dyn Write,
    records: &[&CertificateRecord],
    now: DateTime<Utc>,
) -> Result<()> {
    let mut rows: Vec<Vec<String>> = vec![HEADER.iter().map(|h| h.to_string()).collect()];
    rows.extend(records.iter().map(|r| record_cells(r, now)));

    let mut widths = vec![0usize; HEADER.len()];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    for row in &rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

/// Write the current page of `view`, or a notice when nothing matches.
pub fn write_page(out: &mut dyn Write, view: &RecordListView, now: DateTime<Utc>) -> Result<()> {
    if view.filtered_len() == 0 {
        writeln!(out, "No records found")?;
        return Ok(());
    }
    write_table(out, &view.current_page_slice(), now)?;
    if view.shows_pagination() {
        writeln!(
            out,
            "{} (page {} of {})",
            view.page_summary(),
            view.page(),
            view.total_pages()
        )?;
    }
    Ok(())
}

/// Write a loaded history viewer.
pub fn write_history(out: &mut dyn Write, viewer: &HistoryViewer) -> Result<()> {
    writeln!(out, "{}", viewer.title())?;
    match viewer.state() {
        HistoryState::Loading => writeln!(out, "Loading...")?,
        HistoryState::NoHistory => writeln!(out, "No history found")?,
        HistoryState::Failed(message) => writeln!(out, "Could not load history: {message}")?,
        HistoryState::Entries(entries) => {
            for entry in entries {
                writeln!(
                    out,
                    "{}  {}  {}",
                    entry.occurred_at.display_datetime(),
                    entry.action,
                    entry.actor
                )?;
                if let Some(transition) = entry.transition() {
                    writeln!(out, "    {transition}")?;
                }
                if let Some(note) = &entry.note {
                    writeln!(out, "    {note}")?;
                }
            }
        }
    }
    Ok(())
}

/// Write notifications, one per line.
pub fn write_notifications(out: &mut dyn Write, notifications: &[Notification]) -> Result<()> {
    for notification in notifications {
        writeln!(out, "{notification}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use cnd_core::{
        ClearanceStatus, HistoryEntry, Jurisdiction, ProcessingStatus, RecordDate, RecordId,
        TaxpayerId,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn record() -> CertificateRecord {
        CertificateRecord {
            id: RecordId::from_raw("1"),
            taxpayer_id: TaxpayerId::from_raw("12345678000190"),
            taxpayer_name: "Empresa ABC Ltda".into(),
            jurisdiction: Jurisdiction::Federal,
            issuing_authority: "Receita Federal".into(),
            clearance_status: ClearanceStatus::Clear,
            issue_date: RecordDate::from_raw("2026-10-01"),
            expiry_date: RecordDate::from_raw("2026-11-01"),
            processing_status: ProcessingStatus::Error,
            processed_at: RecordDate::from_raw("2026-10-02"),
            control_code: "ABC123456789DEF".into(),
            file_available: true,
            error_detail: Some("issuer timeout".into()),
        }
    }

    #[test]
    fn cells_use_display_helpers() {
        let cells = record_cells(&record(), now());
        assert_eq!(cells[0], "1*");
        assert_eq!(cells[1], "12.345.678/0001-90");
        assert_eq!(cells[3], "FED");
        assert_eq!(cells[6], "01/10/2026");
        assert_eq!(cells[7], "01/11/2026 (expiring soon)");
        assert!(cells[8].ends_with("(issuer timeout)"));
        assert_eq!(cells[9], "ABC12345...");
    }

    #[test]
    fn expired_marker() {
        let mut r = record();
        r.expiry_date = RecordDate::from_raw("2026-01-01");
        assert_eq!(record_cells(&r, now())[7], "01/01/2026 (expired)");
    }

    #[test]
    fn table_has_header_and_one_line_per_record() {
        let r = record();
        let mut out = Vec::new();
        write_table(&mut out, &[&r, &r], now()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("Empresa ABC Ltda"));
    }

    #[test]
    fn history_before_load_shows_loading() {
        let viewer =
            HistoryViewer::new(TaxpayerId::from_raw("12345678000190"), Jurisdiction::Federal);
        let mut out = Vec::new();
        write_history(&mut out, &viewer).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Loading"));
    }

    #[tokio::test]
    async fn history_lists_transitions_and_notes() {
        let mut viewer =
            HistoryViewer::new(TaxpayerId::from_raw("12345678000190"), Jurisdiction::Federal);
        let backend = cnd_client::InMemoryBackend::new();
        backend.set_history(
            viewer.taxpayer_id(),
            Jurisdiction::Federal,
            vec![HistoryEntry {
                id: "1".into(),
                occurred_at: RecordDate::from_raw("2026-10-01T10:30:00Z"),
                action: "Processing completed".into(),
                previous_status: None,
                new_status: Some(ClearanceStatus::Clear),
                actor: "system".into(),
                note: Some("done".into()),
            }],
        );
        viewer.load(&backend, &cnd_panel::PanelConfig::default()).await;

        let mut out = Vec::new();
        write_history(&mut out, &viewer).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("History - 12.345.678/0001-90 | FED"));
        assert!(text.contains("01/10/2026 10:30  Processing completed  system"));
        assert!(text.contains("done"));
    }
}
