//! # cnd-cli: Command-Line Front End of the CND Monitor
//!
//! Provides the `cnd` binary. Every subcommand loads the record list from
//! the certificate service into a [`cnd_panel::RecordListView`] and drives
//! it exactly as the panel would, so filters, bulk deletion and editing
//! follow the same rules in both front ends.
//!
//! ## Subcommands
//!
//! - `cnd list`: filtered, paginated table or JSON export.
//! - `cnd create` / `cnd edit`: record editor.
//! - `cnd delete`: single or bulk deletion.
//! - `cnd download`: fetch a certificate document.
//! - `cnd history`: audit trail of a taxpayer and jurisdiction.
//!
//! ```bash
//! cnd --api-url http://127.0.0.1:8090 list --jurisdiction FED
//! cnd -v --config cnd.yaml delete 3 4 5
//! ```

pub mod edit;
pub mod history;
pub mod records;
pub mod render;
pub mod settings;
