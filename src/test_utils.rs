#[cfg(test)]
pub mod fixtures {
    use crate::scanner::{AttributeFlags, DirectoryEntry};
    use chrono::{Local, TimeZone};

    /// Fixed reference time for deterministic timestamps.
    pub const BASE_EPOCH: i64 = 1_700_000_000;

    /// Builds an entry modified `offset` seconds after [`BASE_EPOCH`].
    ///
    /// A trailing `/` makes it a directory.
    pub fn entry_at(name: &str, offset: i64) -> DirectoryEntry {
        let is_directory = name.ends_with('/');
        DirectoryEntry {
            name: name.to_string(),
            modified_at: Local
                .timestamp_opt(BASE_EPOCH + offset, 0)
                .single()
                .expect("valid timestamp"),
            size_bytes: if is_directory { 0 } else { 1536 },
            attributes: AttributeFlags::empty(),
            is_directory,
            symlink_target: None,
        }
    }
}
