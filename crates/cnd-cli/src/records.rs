//! # Record Commands
//!
//! `cnd list`, `cnd delete` and `cnd download`, all driven through a loaded
//! [`RecordListView`] so that filtering, pagination and deletion behave
//! exactly as they do in the panel.
//!
//! ```bash
//! cnd list --taxpayer-id 12345678 --jurisdiction FED --jurisdiction EST
//! cnd list --clearance clear --json --export filtered.json
//! cnd delete 1 2
//! cnd download 1 --output cnd-1.pdf
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use cnd_core::RecordId;
use cnd_panel::{FilterForm, RecordListView};

use crate::render;

/// Arguments of `cnd list`.
#[derive(Args, Debug, Default, Clone)]
pub struct ListArgs {
    /// Taxpayer id, or any run of its digits.
    #[arg(long, value_name = "ID")]
    pub taxpayer_id: Option<String>,

    /// Substring of the taxpayer name (case-insensitive).
    #[arg(long, value_name = "TEXT")]
    pub name: Option<String>,

    /// Clearance status (label or service value).
    #[arg(long, value_name = "STATUS")]
    pub clearance: Option<String>,

    /// Processing status (label or service value).
    #[arg(long, value_name = "STATUS")]
    pub processing: Option<String>,

    /// Jurisdiction code or name. Repeat to accept several.
    #[arg(long = "jurisdiction", value_name = "CODE")]
    pub jurisdictions: Vec<String>,

    /// Page to show (1-based).
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Print the whole filtered list as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Also write the filtered list as JSON to this file.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

impl ListArgs {
    /// Whether any filter flag was given.
    pub fn has_filters(&self) -> bool {
        self.taxpayer_id.is_some()
            || self.name.is_some()
            || self.clearance.is_some()
            || self.processing.is_some()
            || !self.jurisdictions.is_empty()
    }

    /// The filter form these flags describe.
    pub fn form(&self) -> FilterForm {
        let mut form = FilterForm::default();
        if let Some(id) = &self.taxpayer_id {
            form.set_taxpayer_id(id);
        }
        if let Some(name) = &self.name {
            form.taxpayer_name = name.clone();
        }
        if let Some(status) = &self.clearance {
            form.clearance_status = status.clone();
        }
        if let Some(status) = &self.processing {
            form.processing_status = status.clone();
        }
        form.jurisdictions = self.jurisdictions.clone();
        form
    }
}

/// Execute `cnd list` against a loaded view.
pub fn run_list(view: &mut RecordListView, args: &ListArgs, out: &mut dyn Write) -> Result<u8> {
    if args.has_filters() {
        view.apply_filter_form(&args.form())
            .context("invalid filter")?;
    }
    view.go_to_page(args.page);

    if let Some(path) = &args.export {
        let json = view.export_filtered()?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write export {}", path.display()))?;
        tracing::info!(path = %path.display(), records = view.filtered_len(), "filtered list exported");
    }

    if args.json {
        writeln!(out, "{}", view.export_filtered()?)?;
    } else {
        render::write_page(out, view, chrono::Utc::now())?;
    }
    Ok(0)
}

/// Arguments of `cnd delete`.
#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Ids of the records to delete.
    #[arg(required = true, num_args = 1.., value_name = "ID")]
    pub ids: Vec<String>,
}

/// Execute `cnd delete`. Several ids are removed in one bulk call.
pub async fn run_delete(
    view: &mut RecordListView,
    args: &DeleteArgs,
    out: &mut dyn Write,
) -> Result<u8> {
    let ids = parse_ids(&args.ids)?;
    let before = view.records().len();
    match ids.as_slice() {
        [id] => view.delete_one(id).await?,
        many => view.delete_many(many).await?,
    }
    writeln!(
        out,
        "{} record(s) deleted, {} remaining",
        before - view.records().len(),
        view.records().len()
    )?;
    Ok(0)
}

/// Arguments of `cnd download`.
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Id of the record whose document to fetch.
    #[arg(value_name = "ID")]
    pub id: String,

    /// Destination file (default: `cnd-<id>.pdf` in the current directory).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Execute `cnd download`.
pub async fn run_download(
    view: &mut RecordListView,
    args: &DownloadArgs,
    out: &mut dyn Write,
) -> Result<u8> {
    let id = RecordId::new(args.id.as_str()).context("invalid record id")?;
    let bytes = view.download(&id).await?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("cnd-{id}.pdf")));
    std::fs::write(&path, &bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    writeln!(out, "{} bytes written to {}", bytes.len(), path.display())?;
    Ok(0)
}

pub(crate) fn parse_ids(raw: &[String]) -> Result<Vec<RecordId>> {
    if raw.is_empty() {
        bail!("no record id given");
    }
    raw.iter()
        .map(|s| RecordId::new(s.as_str()).with_context(|| format!("invalid record id {s:?}")))
        .collect()
}
