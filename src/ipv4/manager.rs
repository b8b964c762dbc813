use crate::ipv4::backup_file::{BackupFile, BackupFileError};
use crate::ipv4::registry::{RegistryError, RegistryStore};
use crate::ipv4::toggle::{InterfaceSwitch, restart};
use crate::ipv4::types::InterfaceDescriptor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Backup file error: {0}")]
    BackupFile(#[from] BackupFileError),
}

pub type Result<T> = std::result::Result<T, ManagerError>;

/// Backs up and restores the IPv4 settings of one interface at a time.
pub struct Ipv4Manager<R, S> {
    registry: R,
    switch: S,
}

impl<R: RegistryStore, S: InterfaceSwitch> Ipv4Manager<R, S> {
    pub fn new(registry: R, switch: S) -> Self {
        Self { registry, switch }
    }

    /// Interface properties followed by its current registry values.
    pub fn describe(&self, interface: &InterfaceDescriptor) -> Result<String> {
        let record = self.registry.load(&interface.id)?;
        let mut text = interface.format_for_display();
        text.push_str(&record.format_for_display());
        Ok(text)
    }

    pub fn backup(&self, interface: &InterfaceDescriptor, path: &Path) -> Result<()> {
        let record = self.registry.load(&interface.id)?;
        BackupFile::new(interface.properties(), record).write(path)?;
        tracing::info!(
            "Backed up IPv4 settings of \"{}\" to {}",
            interface.name,
            path.display()
        );
        Ok(())
    }

    /// Applies a backup to the interface and restarts it. A failed restart
    /// is logged but does not fail the restore.
    pub async fn restore(&self, interface: &InterfaceDescriptor, path: &Path) -> Result<()> {
        let file = BackupFile::read(path)?;
        self.registry.save(&interface.id, &file.record)?;
        tracing::info!(
            "Restored IPv4 settings of \"{}\" from {}",
            interface.name,
            path.display()
        );

        if !restart(&self.switch, &interface.name).await {
            tracing::warn!(
                "Interface \"{}\" could not be restarted; settings apply after its next restart",
                interface.name
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipv4::registry::memory::MemoryRegistry;
    use crate::ipv4::toggle::fake::{FakeSwitch, Outcome};
    use crate::ipv4::types::{ConfigRecord, InterfaceType, OperationalStatus};
    use std::fs;
    use tempfile::TempDir;

    const ID: &str = "{1F2E3D4C-5B6A-4978-8695-A4B3C2D1E0F9}";

    fn ethernet() -> InterfaceDescriptor {
        InterfaceDescriptor {
            name: "Ethernet".to_string(),
            description: "Realtek PCIe GbE Family Controller".to_string(),
            status: OperationalStatus::Up,
            id: ID.to_string(),
            interface_type: InterfaceType::Ethernet,
            physical_address: vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x01],
        }
    }

    fn live_record() -> ConfigRecord {
        ConfigRecord {
            enable_dhcp: Some(0),
            ip_address: Some(vec!["10.0.0.5".to_string()]),
            default_gateway: Some(vec!["10.0.0.1".to_string()]),
            name_server: Some("8.8.8.8".to_string()),
            subnet_mask: Some(vec!["255.255.255.0".to_string()]),
        }
    }

    fn manager(
        registry: &MemoryRegistry,
        switch: FakeSwitch,
    ) -> Ipv4Manager<MemoryRegistry, FakeSwitch> {
        Ipv4Manager::new(registry.clone(), switch)
    }

    #[tokio::test(start_paused = true)]
    async fn test_backup_then_restore_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ethernet.json");
        let registry = MemoryRegistry::with_interface(ID);
        registry.save(ID, &live_record()).unwrap();
        let manager = manager(&registry, FakeSwitch::succeeding());

        manager.backup(&ethernet(), &path).unwrap();

        registry
            .save(
                ID,
                &ConfigRecord {
                    enable_dhcp: Some(1),
                    ..ConfigRecord::default()
                },
            )
            .unwrap();

        manager.restore(&ethernet(), &path).await.unwrap();

        assert_eq!(registry.load(ID).unwrap(), live_record());
        assert_eq!(
            manager.switch.calls(),
            ["disable Ethernet", "enable Ethernet"]
        );
    }

    #[test]
    fn test_backup_writes_interface_info() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ethernet.json");
        let registry = MemoryRegistry::with_interface(ID);
        registry.save(ID, &live_record()).unwrap();

        manager(&registry, FakeSwitch::succeeding())
            .backup(&ethernet(), &path)
            .unwrap();

        let file = BackupFile::read(&path).unwrap();
        assert_eq!(file.interface_info, ethernet().properties());
        assert_eq!(file.record, live_record());
    }

    #[test]
    fn test_backup_unknown_interface_fails_without_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ethernet.json");
        let registry = MemoryRegistry::new();

        let result = manager(&registry, FakeSwitch::succeeding()).backup(&ethernet(), &path);

        assert!(matches!(
            result,
            Err(ManagerError::Registry(RegistryError::KeyNotFound(_)))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_backup_to_unwritable_path_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("ethernet.json");
        let registry = MemoryRegistry::with_interface(ID);

        let result = manager(&registry, FakeSwitch::succeeding()).backup(&ethernet(), &path);

        assert!(matches!(
            result,
            Err(ManagerError::BackupFile(BackupFileError::Io(_)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_deletes_values_absent_from_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ethernet.json");
        fs::write(
            &path,
            r#"{
                "NetworkInterfaceInfo": { "Name": "Ethernet" },
                "Ipv4RegistryEntries": { "EnableDHCP": 1, "IPAddress": [], "NameServer": null }
            }"#,
        )
        .unwrap();
        let registry = MemoryRegistry::with_interface(ID);
        registry.save(ID, &live_record()).unwrap();

        manager(&registry, FakeSwitch::succeeding())
            .restore(&ethernet(), &path)
            .await
            .unwrap();

        assert_eq!(
            registry.load(ID).unwrap(),
            ConfigRecord {
                enable_dhcp: Some(1),
                ip_address: Some(vec![]),
                ..ConfigRecord::default()
            }
        );
        assert!(registry.raw_value(ID, "NameServer").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_ignores_restart_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ethernet.json");
        let registry = MemoryRegistry::with_interface(ID);
        registry.save(ID, &live_record()).unwrap();
        let manager = manager(&registry, FakeSwitch::new(Outcome::Fail, Outcome::Succeed));
        manager.backup(&ethernet(), &path).unwrap();

        manager.restore(&ethernet(), &path).await.unwrap();

        assert_eq!(manager.switch.calls(), ["disable Ethernet"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_rejects_empty_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ethernet.json");
        fs::write(&path, "{}").unwrap();
        let registry = MemoryRegistry::with_interface(ID);
        registry.save(ID, &live_record()).unwrap();
        let manager = manager(&registry, FakeSwitch::succeeding());

        let result = manager.restore(&ethernet(), &path).await;

        assert!(matches!(
            result,
            Err(ManagerError::BackupFile(BackupFileError::Format(_)))
        ));
        assert_eq!(registry.load(ID).unwrap(), live_record());
        assert!(manager.switch.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_unknown_interface_skips_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ethernet.json");
        BackupFile::new(ethernet().properties(), live_record())
            .write(&path)
            .unwrap();
        let manager = manager(&MemoryRegistry::new(), FakeSwitch::succeeding());

        let result = manager.restore(&ethernet(), &path).await;

        assert!(matches!(
            result,
            Err(ManagerError::Registry(RegistryError::KeyNotFound(_)))
        ));
        assert!(manager.switch.calls().is_empty());
    }

    #[test]
    fn test_describe() {
        let registry = MemoryRegistry::with_interface(ID);
        registry.save(ID, &live_record()).unwrap();

        let text = manager(&registry, FakeSwitch::succeeding())
            .describe(&ethernet())
            .unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[4].contains("DE:AD:BE:EF:00:01"));
        assert!(lines[5].starts_with("DHCP"));
        assert!(lines[8].contains("8.8.8.8"));
    }

    #[test]
    fn test_describe_unknown_interface_fails() {
        let result =
            manager(&MemoryRegistry::new(), FakeSwitch::succeeding()).describe(&ethernet());
        assert!(matches!(
            result,
            Err(ManagerError::Registry(RegistryError::KeyNotFound(_)))
        ));
    }
}
