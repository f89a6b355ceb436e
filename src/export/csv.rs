use crate::export::model::{RecordExport, get_headers};
use csv::Writer;
use std::path::Path;

/// Write attendance rows as CSV, fixed column order.
pub(crate) fn export_csv(records: &[RecordExport], path: &Path) -> std::io::Result<()> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record(get_headers())?;

    for r in records {
        wtr.write_record(r.to_row())?;
    }

    wtr.flush()?;
    crate::export::notify_export_success("CSV", path);
    Ok(())
}
