pub mod descriptor;
pub mod manifest;
pub mod schedule;

pub use descriptor::BackupDescriptor;
pub use manifest::{
    BackupManifest, BackupOptions, CollectionExport, CollectionRecord, IndexSpec, RestoreOptions,
    MANIFEST_FILE,
};
pub use schedule::{schedule_id, ScheduleEntry};
