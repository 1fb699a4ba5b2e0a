//! # Invoice Files
//!
//! ```text
//! write_invoice(order, path)
//!    │
//!    ├── layout_invoice()   ─┐
//!    ├── render_pdf()        ├─ all in memory; an error here writes nothing
//!    │                      ─┘
//!    ├── write .<name>.<uuid>.tmp next to path (write_all + sync_all)
//!    └── rename onto path   (an error removes the temp file)
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use pahana_core::Order;
use tracing::{info, warn};

use crate::error::InvoiceResult;
use crate::layout::{layout_invoice, InvoiceLayout};
use crate::pdf::render_pdf;

/// `invoice-<order id>.pdf`
pub fn invoice_file_name(order: &Order) -> String {
    format!("invoice-{}.pdf", order.id)
}

/// Renders the invoice for `order` and writes it to `path`.
///
/// Either the complete file appears at `path` or nothing does.
pub fn write_invoice(
    order: &Order,
    path: &Path,
    layout: &InvoiceLayout,
    currency: &str,
) -> InvoiceResult<()> {
    let document = layout_invoice(order, layout, currency)?;
    let bytes = render_pdf(&document)?;
    write_atomic(path, &bytes)?;

    info!(
        order_id = %order.id,
        path = %path.display(),
        pages = document.page_count(),
        "Invoice written"
    );
    Ok(())
}

/// Convenience: writes `invoice-<order id>.pdf` into `dir` and returns the
/// path.
pub fn write_invoice_to_dir(
    order: &Order,
    dir: &Path,
    layout: &InvoiceLayout,
    currency: &str,
) -> InvoiceResult<PathBuf> {
    let path = dir.join(invoice_file_name(order));
    write_invoice(order, &path, layout, currency)?;
    Ok(path)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invoice path has no file name"))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let tmp = dir.join(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        uuid::Uuid::new_v4().simple()
    ));

    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        if let Err(err) = fs::remove_file(&tmp) {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(path = %tmp.display(), error = %err, "Could not remove temp file");
            }
        }
    }
    result
}
