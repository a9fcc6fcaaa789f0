use std::env;
use std::fs;
use std::path;

use uuid::Uuid;

/// Creates a unique throwaway directory under the system temp dir. Directories
/// are left behind for post-mortem inspection; the OS cleans them up.
pub fn scratch_dir(label: &str) -> path::PathBuf {
    let dir = env::temp_dir()
        .join("penstock-tests")
        .join(format!("{label}-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    return dir;
}
