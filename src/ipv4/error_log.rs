use std::error::Error;
use std::fs;
use std::io;
use std::path::Path;

/// Renders an error followed by each of its underlying causes, one per line.
pub fn describe_error(error: &dyn Error) -> String {
    let mut text = format!("{}\n", error);
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(&format!("Caused by: {}\n", cause));
        source = cause.source();
    }
    text
}

/// Replaces the contents of the error log at `path` with `error`.
pub fn write_error_log(path: &Path, error: &dyn Error) -> io::Result<()> {
    fs::write(path, describe_error(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipv4::registry::RegistryError;
    use tempfile::TempDir;
    use thiserror::Error;

    #[derive(Error, Debug)]
    #[error("Backup failed")]
    struct Wrapper(#[source] RegistryError);

    #[test]
    fn test_describe_error_includes_causes() {
        let error = Wrapper(RegistryError::KeyNotFound(r"HKEY_LOCAL_MACHINE\X".to_string()));
        assert_eq!(
            describe_error(&error),
            "Backup failed\nCaused by: HKEY_LOCAL_MACHINE\\X does not exist\n"
        );
    }

    #[test]
    fn test_write_error_log_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("error.log");
        fs::write(&path, "previous failure\n").unwrap();

        write_error_log(&path, &RegistryError::MissingInterfaceId).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Interface identifier is missing\n"
        );
    }
}
