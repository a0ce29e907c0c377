use anyhow::{Context, Result};
use bitflags::bitflags;
use chrono::{DateTime, Local};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

bitflags! {
    /// Normalized file attribute vocabulary shared by every platform.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttributeFlags: u8 {
        /// Entry cannot be written.
        const READ_ONLY = 1 << 0;
        /// Marked for backup.
        const ARCHIVE = 1 << 1;
        /// Hidden from normal listings.
        const HIDDEN = 1 << 2;
        /// Owned by the operating system.
        const SYSTEM = 1 << 3;
        /// Stored compressed.
        const COMPRESSED = 1 << 4;
        /// Stored encrypted.
        const ENCRYPTED = 1 << 5;
        /// Symbolic link or other reparse point.
        const REPARSE_POINT = 1 << 6;
        /// Sparse file.
        const SPARSE = 1 << 7;
    }
}

/// Display letter for each attribute, in column order.
const ATTRIBUTE_LETTERS: [(AttributeFlags, char); 8] = [
    (AttributeFlags::READ_ONLY, 'r'),
    (AttributeFlags::ARCHIVE, 'a'),
    (AttributeFlags::HIDDEN, 'h'),
    (AttributeFlags::SYSTEM, 's'),
    (AttributeFlags::COMPRESSED, 'c'),
    (AttributeFlags::ENCRYPTED, 'e'),
    (AttributeFlags::REPARSE_POINT, 'S'),
    (AttributeFlags::SPARSE, 'p'),
];

impl AttributeFlags {
    /// Width of [`AttributeFlags::display_string`].
    pub const DISPLAY_WIDTH: usize = ATTRIBUTE_LETTERS.len();

    /// Renders the fixed-width attribute column, `-` for unset flags.
    ///
    /// ```
    /// use scmls::scanner::AttributeFlags;
    ///
    /// let flags = AttributeFlags::READ_ONLY | AttributeFlags::HIDDEN;
    /// assert_eq!(flags.display_string(), "r-h-----");
    /// ```
    #[must_use]
    pub fn display_string(self) -> String {
        ATTRIBUTE_LETTERS
            .iter()
            .map(|&(flag, letter)| if self.contains(flag) { letter } else { '-' })
            .collect()
    }
}

/// One scanned directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Entry name; directories carry a trailing `/`.
    pub name: String,
    /// Last modification time.
    pub modified_at: DateTime<Local>,
    /// Size in bytes, 0 for directories.
    pub size_bytes: u64,
    /// Normalized attributes.
    pub attributes: AttributeFlags,
    /// Whether the entry is a directory (or a link to one).
    pub is_directory: bool,
    /// Absolute target when the entry is a symbolic link.
    pub symlink_target: Option<PathBuf>,
}

impl DirectoryEntry {
    /// Name without the directory marker, as used for metadata lookups.
    #[must_use]
    pub fn bare_name(&self) -> &str {
        self.name.strip_suffix('/').unwrap_or(&self.name)
    }

    /// Lower-cased extension without the dot, if the entry has one.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        if self.is_directory {
            return None;
        }
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Operating-system view of directory contents.
pub trait AttributeAdapter {
    /// Names of all entries in `directory`, in native enumeration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn list_directory(&self, directory: &Path) -> Result<Vec<String>>;

    /// Describes the entry at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be inspected.
    fn stat_entry(&self, path: &Path) -> Result<DirectoryEntry>;
}

/// Adapter backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeAttributes;

impl AttributeAdapter for NativeAttributes {
    fn list_directory(&self, directory: &Path) -> Result<Vec<String>> {
        let reader = fs::read_dir(directory)
            .with_context(|| format!("Failed to read directory: {}", directory.display()))?;

        let mut names = Vec::new();
        for entry in reader {
            let entry = entry
                .with_context(|| format!("Failed to read directory: {}", directory.display()))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn stat_entry(&self, path: &Path) -> Result<DirectoryEntry> {
        let link_metadata = fs::symlink_metadata(path)
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        let is_symlink = link_metadata.file_type().is_symlink();

        // a dangling link still gets listed, described by the link itself
        let metadata = if is_symlink {
            fs::metadata(path).unwrap_or_else(|_| link_metadata.clone())
        } else {
            link_metadata
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("Path has no file name: {}", path.display()))?;

        let is_directory = metadata.is_dir();
        let name = if is_directory {
            format!("{file_name}/")
        } else {
            file_name.clone()
        };

        let mut attributes = native_flags(&file_name, &metadata);
        if is_symlink {
            attributes |= AttributeFlags::REPARSE_POINT;
        }

        let symlink_target = if is_symlink {
            Some(resolve_link(path)?)
        } else {
            None
        };

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Ok(DirectoryEntry {
            name,
            modified_at: DateTime::<Local>::from(modified),
            size_bytes: if is_directory { 0 } else { metadata.len() },
            attributes,
            is_directory,
            symlink_target,
        })
    }
}

/// Reads a link target and makes it absolute relative to the link's directory.
fn resolve_link(path: &Path) -> Result<PathBuf> {
    let target =
        fs::read_link(path).with_context(|| format!("Failed to read link {}", path.display()))?;
    if target.is_absolute() {
        return Ok(target);
    }

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    std::path::absolute(base.join(&target))
        .with_context(|| format!("Failed to resolve link target {}", target.display()))
}

#[cfg(unix)]
fn native_flags(file_name: &str, metadata: &Metadata) -> AttributeFlags {
    use std::os::unix::fs::MetadataExt;

    let mut flags = AttributeFlags::empty();
    if file_name.starts_with('.') {
        flags |= AttributeFlags::HIDDEN;
    }
    if metadata.permissions().readonly() {
        flags |= AttributeFlags::READ_ONLY;
    }
    if metadata.is_file() && metadata.blocks().saturating_mul(512) < metadata.size() {
        flags |= AttributeFlags::SPARSE;
    }
    flags
}

#[cfg(windows)]
fn native_flags(_file_name: &str, metadata: &Metadata) -> AttributeFlags {
    use std::os::windows::fs::MetadataExt;

    const NATIVE: [(u32, AttributeFlags); 8] = [
        (0x0001, AttributeFlags::READ_ONLY),
        (0x0020, AttributeFlags::ARCHIVE),
        (0x0002, AttributeFlags::HIDDEN),
        (0x0004, AttributeFlags::SYSTEM),
        (0x0800, AttributeFlags::COMPRESSED),
        (0x4000, AttributeFlags::ENCRYPTED),
        (0x0400, AttributeFlags::REPARSE_POINT),
        (0x0200, AttributeFlags::SPARSE),
    ];

    let raw = metadata.file_attributes();
    NATIVE
        .iter()
        .filter(|(bit, _)| raw & bit != 0)
        .fold(AttributeFlags::empty(), |acc, (_, flag)| acc | *flag)
}

#[cfg(not(any(unix, windows)))]
fn native_flags(file_name: &str, metadata: &Metadata) -> AttributeFlags {
    let mut flags = AttributeFlags::empty();
    if file_name.starts_with('.') {
        flags |= AttributeFlags::HIDDEN;
    }
    if metadata.permissions().readonly() {
        flags |= AttributeFlags::READ_ONLY;
    }
    flags
}
