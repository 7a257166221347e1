//! Status document decoding.

use std::io::Read;

use crate::status::model::{StatusDocument, UpstreamStatus};

/// Decode a status document from a reader.
///
/// Fails when the input is not JSON or lacks `servers` / `servers.total`.
pub fn decode_status<R: Read>(reader: R) -> Result<UpstreamStatus, serde_json::Error> {
    let document: StatusDocument = serde_json::from_reader(reader)?;
    Ok(document.servers)
}
