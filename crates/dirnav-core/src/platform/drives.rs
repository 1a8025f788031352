//! Drive enumeration.
//!
//! On Windows every logical drive root is a drive. On Linux every mount
//! point from `/proc/self/mounts` is a drive, classified by filesystem type.
//! Other Unix systems expose a single `/` drive.
use std::io;
use std::path::PathBuf;

/// Information about a single drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveInfo {
    /// Root path, e.g. "C:\" or "/mnt/data".
    pub root: PathBuf,
    /// Root rendered for display; used as the entry name.
    pub name: String,
    pub drive_type: DriveType,
    /// Volume label on Windows, source device on Linux.
    pub label: String,
    /// Filesystem name (e.g. "NTFS", "ext4").
    pub filesystem: String,
}

impl DriveInfo {
    pub fn new(root: PathBuf, drive_type: DriveType) -> Self {
        let name = root.to_string_lossy().into_owned();
        Self {
            root,
            name,
            drive_type,
            label: String::new(),
            filesystem: String::new(),
        }
    }
}

/// Drive type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveType {
    Fixed,
    Removable,
    Network,
    CdRom,
    Ram,
    /// Kernel pseudo filesystems (`proc`, `sysfs`, `cgroup`, ...).
    Virtual,
    Unknown,
}

impl DriveType {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Removable => "Removable",
            Self::Network => "Network",
            Self::CdRom => "CD-ROM",
            Self::Ram => "RAM disk",
            Self::Virtual => "Virtual",
            Self::Unknown => "Unknown",
        }
    }
}

/// Enumerate all drives mounted on the host.
pub fn enumerate_drives() -> io::Result<Vec<DriveInfo>> {
    imp::enumerate_drives()
}

#[cfg(windows)]
mod imp {
    use super::{DriveInfo, DriveType};
    use std::ffi::OsString;
    use std::io;
    use std::os::windows::ffi::OsStringExt;
    use std::path::PathBuf;
    use windows::Win32::Storage::FileSystem::{
        GetDriveTypeW, GetLogicalDriveStringsW, GetVolumeInformationW,
    };

    // Drive type constants from the Windows API.
    const DRIVE_REMOVABLE_VAL: u32 = 2;
    const DRIVE_FIXED_VAL: u32 = 3;
    const DRIVE_REMOTE_VAL: u32 = 4;
    const DRIVE_CDROM_VAL: u32 = 5;
    const DRIVE_RAMDISK_VAL: u32 = 6;

    pub fn enumerate_drives() -> io::Result<Vec<DriveInfo>> {
        // GetLogicalDriveStringsW returns null-separated drive root strings.
        let mut buffer = [0u16; 512];
        let len = unsafe { GetLogicalDriveStringsW(Some(&mut buffer)) };

        if len == 0 {
            return Err(io::Error::last_os_error());
        }
        if len as usize > buffer.len() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("drive string buffer too small ({len} u16 required)"),
            ));
        }

        let full = OsString::from_wide(&buffer[..len as usize]);
        let full_str = full.to_string_lossy();

        let mut drives = Vec::new();
        for root in full_str.split('\0').filter(|s| !s.is_empty()) {
            let root_wide: Vec<u16> = root.encode_utf16().chain(std::iter::once(0)).collect();
            let root_pcwstr = windows::core::PCWSTR(root_wide.as_ptr());

            let raw_type = unsafe { GetDriveTypeW(root_pcwstr) };
            let drive_type = match raw_type {
                DRIVE_FIXED_VAL => DriveType::Fixed,
                DRIVE_REMOVABLE_VAL => DriveType::Removable,
                DRIVE_REMOTE_VAL => DriveType::Network,
                DRIVE_CDROM_VAL => DriveType::CdRom,
                DRIVE_RAMDISK_VAL => DriveType::Ram,
                _ => DriveType::Unknown,
            };

            // Volume information. Empty optical drives fail here; keep them
            // listed with blank label and filesystem.
            let mut label_buf = [0u16; 256];
            let mut fs_buf = [0u16; 256];
            let has_volume_info = unsafe {
                GetVolumeInformationW(
                    root_pcwstr,
                    Some(&mut label_buf),
                    None,
                    None,
                    None,
                    Some(&mut fs_buf),
                )
                .is_ok()
            };

            let mut drive = DriveInfo::new(PathBuf::from(root), drive_type);
            if has_volume_info {
                drive.label = wide_to_string(&label_buf);
                drive.filesystem = wide_to_string(&fs_buf);
            }
            drives.push(drive);
        }

        Ok(drives)
    }

    fn wide_to_string(buf: &[u16]) -> String {
        let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
        String::from_utf16_lossy(&buf[..end])
    }
}

#[cfg(target_os = "linux")]
mod imp {
    use super::{parse_mounts, DriveInfo, DriveType};
    use std::io;
    use std::path::PathBuf;

    const MOUNTS_PATH: &str = "/proc/self/mounts";

    pub fn enumerate_drives() -> io::Result<Vec<DriveInfo>> {
        match std::fs::read(MOUNTS_PATH) {
            Ok(bytes) => {
                let drives = parse_mounts(&bytes);
                if drives.is_empty() {
                    tracing::warn!("{MOUNTS_PATH} listed no mounts, falling back to /");
                    Ok(vec![DriveInfo::new(PathBuf::from("/"), DriveType::Fixed)])
                } else {
                    Ok(drives)
                }
            }
            Err(e) => {
                tracing::warn!("Could not read {MOUNTS_PATH}: {e} -- falling back to /");
                Ok(vec![DriveInfo::new(PathBuf::from("/"), DriveType::Fixed)])
            }
        }
    }
}

#[cfg(all(unix, not(target_os = "linux")))]
mod imp {
    use super::{DriveInfo, DriveType};
    use std::io;
    use std::path::PathBuf;

    pub fn enumerate_drives() -> io::Result<Vec<DriveInfo>> {
        Ok(vec![DriveInfo::new(PathBuf::from("/"), DriveType::Fixed)])
    }
}

/// Parse the contents of a Linux mounts table (`/proc/self/mounts` format).
///
/// Each line is `device mountpoint fstype options dump pass`, with spaces,
/// tabs, newlines and backslashes in fields escaped as three-digit octal.
#[cfg(unix)]
pub fn parse_mounts(table: &[u8]) -> Vec<DriveInfo> {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let mut drives = Vec::new();
    for line in table.split(|&b| b == b'\n') {
        let mut fields = line
            .split(|&b| b == b' ' || b == b'\t')
            .filter(|f| !f.is_empty());
        let (Some(device), Some(mount_point), Some(fstype)) =
            (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };

        let root = PathBuf::from(OsString::from_vec(decode_octal_escapes(mount_point)));
        let filesystem = String::from_utf8_lossy(fstype).into_owned();

        let mut drive = DriveInfo::new(root, classify_filesystem(&filesystem));
        drive.label = String::from_utf8_lossy(&decode_octal_escapes(device)).into_owned();
        drive.filesystem = filesystem;
        drives.push(drive);
    }
    drives
}

#[cfg(unix)]
fn decode_octal_escapes(field: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(field.len());
    let mut i = 0;
    while i < field.len() {
        if field[i] == b'\\' && i + 3 < field.len() {
            let digits = &field[i + 1..i + 4];
            if digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(field[i]);
        i += 1;
    }
    out
}

/// Map a Linux filesystem type to a drive type.
#[cfg(unix)]
pub fn classify_filesystem(fstype: &str) -> DriveType {
    match fstype {
        "" => DriveType::Unknown,
        "nfs" | "nfs4" | "cifs" | "smb3" | "smbfs" | "sshfs" | "fuse.sshfs" | "9p" | "afs"
        | "ceph" | "glusterfs" | "fuse.glusterfs" => DriveType::Network,
        "iso9660" | "udf" => DriveType::CdRom,
        "tmpfs" | "ramfs" | "devtmpfs" => DriveType::Ram,
        "proc" | "sysfs" | "devpts" | "cgroup" | "cgroup2" | "securityfs" | "debugfs"
        | "tracefs" | "pstore" | "bpf" | "mqueue" | "hugetlbfs" | "configfs" | "fusectl"
        | "binfmt_misc" | "autofs" | "nsfs" | "efivarfs" | "rpc_pipefs" | "selinuxfs" => {
            DriveType::Virtual
        }
        _ => DriveType::Fixed,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::Path;

    const SAMPLE: &[u8] = b"/dev/sda1 / ext4 rw,relatime 0 0\n\
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0\n\
tmpfs /run tmpfs rw,nosuid 0 0\n\
server:/export /mnt/nfs nfs4 rw 0 0\n\
/dev/sdb1 /media/usb\\040stick vfat rw 0 0\n";

    #[test]
    fn test_parse_mounts_roots_in_order() {
        let drives = parse_mounts(SAMPLE);
        let roots: Vec<&Path> = drives.iter().map(|d| d.root.as_path()).collect();
        assert_eq!(
            roots,
            vec![
                Path::new("/"),
                Path::new("/proc"),
                Path::new("/run"),
                Path::new("/mnt/nfs"),
                Path::new("/media/usb stick"),
            ]
        );
    }

    #[test]
    fn test_parse_mounts_classifies() {
        let drives = parse_mounts(SAMPLE);
        let types: Vec<DriveType> = drives.iter().map(|d| d.drive_type).collect();
        assert_eq!(
            types,
            vec![
                DriveType::Fixed,
                DriveType::Virtual,
                DriveType::Ram,
                DriveType::Network,
                DriveType::Fixed,
            ]
        );
        assert_eq!(drives[0].label, "/dev/sda1");
        assert_eq!(drives[0].filesystem, "ext4");
        assert_eq!(drives[0].name, "/");
    }

    #[test]
    fn test_parse_mounts_skips_malformed_lines() {
        let drives = parse_mounts(b"\n  \nonly-two fields\n/dev/x /data xfs rw 0 0\n");
        assert_eq!(drives.len(), 1);
        assert_eq!(drives[0].root, PathBuf::from("/data"));
    }

    #[test]
    fn test_decode_octal_escapes() {
        assert_eq!(decode_octal_escapes(b"a\\040b"), b"a b".to_vec());
        assert_eq!(decode_octal_escapes(b"tab\\011"), b"tab\t".to_vec());
        assert_eq!(decode_octal_escapes(b"back\\134slash"), b"back\\slash".to_vec());
        // Not an escape: left untouched.
        assert_eq!(decode_octal_escapes(b"x\\9"), b"x\\9".to_vec());
    }

    #[test]
    fn test_enumerate_drives_is_not_empty() {
        let drives = enumerate_drives().unwrap();
        assert!(!drives.is_empty());
    }
}
