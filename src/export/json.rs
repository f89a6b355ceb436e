use crate::export::model::RecordExport;
use std::path::Path;

/// Write attendance rows as pretty-printed JSON.
pub(crate) fn export_json(records: &[RecordExport], path: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(records).map_err(std::io::Error::other)?;
    std::fs::write(path, json)?;
    crate::export::notify_export_success("JSON", path);
    Ok(())
}
