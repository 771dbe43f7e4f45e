//! # Create and Edit Commands
//!
//! `cnd create` opens a blank editor, `cnd edit <ID>` opens one on an
//! existing record. The given field flags are applied to the draft, which is
//! then validated and saved through the view. The taxpayer id can only be
//! set on creation.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use cnd_core::{ClearanceStatus, Jurisdiction, RecordId};
use cnd_panel::{RecordEditor, RecordListView};

use crate::render;

/// Editable record fields.
#[derive(Args, Debug, Default, Clone)]
pub struct RecordFields {
    /// Taxpayer (company) name.
    #[arg(long, value_name = "TEXT")]
    pub name: Option<String>,

    /// Jurisdiction code or name (FED, EST, MUN).
    #[arg(long, value_name = "CODE")]
    pub jurisdiction: Option<String>,

    /// Issuing authority.
    #[arg(long, value_name = "TEXT")]
    pub authority: Option<String>,

    /// Clearance status (label or service value).
    #[arg(long, value_name = "STATUS")]
    pub clearance: Option<String>,

    /// Issue date.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub issued: Option<String>,

    /// Expiry date.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub expires: Option<String>,

    /// Control code printed on the certificate.
    #[arg(long, value_name = "CODE")]
    pub control_code: Option<String>,
}

impl RecordFields {
    fn apply(&self, editor: &mut RecordEditor) -> Result<()> {
        if let Some(name) = &self.name {
            editor.set_taxpayer_name(name.as_str());
        }
        if let Some(raw) = &self.jurisdiction {
            let jurisdiction: Jurisdiction = raw.parse().context("invalid --jurisdiction")?;
            editor.set_jurisdiction(jurisdiction);
        }
        if let Some(authority) = &self.authority {
            editor.set_issuing_authority(authority.as_str());
        }
        if let Some(raw) = &self.clearance {
            let status: ClearanceStatus = raw.parse().context("invalid --clearance")?;
            editor.set_clearance_status(status);
        }
        if let Some(date) = &self.issued {
            editor.set_issue_date(date.as_str());
        }
        if let Some(date) = &self.expires {
            editor.set_expiry_date(date.as_str());
        }
        if let Some(code) = &self.control_code {
            editor.set_control_code(code.as_str());
        }
        Ok(())
    }
}

/// Arguments of `cnd create`.
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Taxpayer id (14 digits, punctuation optional).
    #[arg(long, value_name = "ID")]
    pub taxpayer_id: String,

    #[command(flatten)]
    pub fields: RecordFields,
}

/// Arguments of `cnd edit`.
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Id of the record to edit.
    #[arg(value_name = "ID")]
    pub id: String,

    /// Rejected: the taxpayer id of an existing record cannot change.
    #[arg(long, value_name = "ID")]
    pub taxpayer_id: Option<String>,

    #[command(flatten)]
    pub fields: RecordFields,
}

/// Execute `cnd create`.
pub async fn run_create(
    view: &mut RecordListView,
    args: &CreateArgs,
    out: &mut dyn Write,
) -> Result<u8> {
    let mut editor = view.new_record();
    editor.set_taxpayer_id(&args.taxpayer_id)?;
    args.fields.apply(&mut editor)?;
    save(view, &mut editor, out).await
}

/// Execute `cnd edit`.
pub async fn run_edit(view: &mut RecordListView, args: &EditArgs, out: &mut dyn Write) -> Result<u8> {
    let id = RecordId::new(args.id.as_str()).context("invalid record id")?;
    let mut editor = view.edit(&id)?;
    if let Some(taxpayer_id) = &args.taxpayer_id {
        editor.set_taxpayer_id(taxpayer_id)?;
    }
    args.fields.apply(&mut editor)?;
    save(view, &mut editor, out).await
}

async fn save(view: &mut RecordListView, editor: &mut RecordEditor, out: &mut dyn Write) -> Result<u8> {
    let saved = view.save_editor(editor).await?;
    render::write_table(out, &[&saved], chrono::Utc::now())?;
    Ok(0)
}
