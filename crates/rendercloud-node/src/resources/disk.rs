//! Persistent disk resource.

use rendercloud_client::{AddDiskRequest, RenderClient, UpdateDiskRequest};
use serde_json::Value;

use crate::error::Result;
use crate::node::{list, success};
use crate::params::Parameters;
use crate::resource::Resource;
use crate::schema::{FieldSpec, ResourceDescriptor, limit, op, return_all};

operations!("disk" {
    Add => "add",
    Delete => "delete",
    Get => "get",
    List => "list",
    ListSnapshots => "listSnapshots",
    RestoreSnapshot => "restoreSnapshot",
    Update => "update",
});

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        resource: Resource::Disk,
        display_name: "Disk",
        description: "Manage persistent disks and snapshots",
        default_operation: "list",
        operations: vec![
            op("add", "Add", "Add a disk to a service", "Add a disk"),
            op("delete", "Delete", "Delete a disk", "Delete a disk"),
            op("get", "Get", "Retrieve disk details", "Get a disk"),
            op("list", "List", "List disks for a service", "List disks"),
            op("listSnapshots", "List Snapshots", "List disk snapshots", "List disk snapshots"),
            op("restoreSnapshot", "Restore Snapshot", "Restore a disk from a snapshot", "Restore a disk from a snapshot"),
            op("update", "Update", "Update disk configuration", "Update a disk"),
        ],
        fields: vec![
            FieldSpec::string("serviceId", "Service ID")
                .required()
                .description("The ID of the service (srv-xxxxx format)"),
            return_all(&["list", "listSnapshots"]),
            limit(&["list", "listSnapshots"], 20),
            FieldSpec::string("diskId", "Disk ID")
                .required()
                .description("The ID of the disk (dsk-xxxxx format)")
                .show_for(&["get", "delete", "update", "listSnapshots", "restoreSnapshot"]),
            FieldSpec::string("name", "Name")
                .required()
                .description("The name of the disk")
                .show_for(&["add"]),
            FieldSpec::string("mountPath", "Mount Path")
                .required()
                .description("Mount path in the container")
                .show_for(&["add"]),
            FieldSpec::number("sizeGB", "Size (GB)")
                .required()
                .default(10)
                .description("Disk size in GB")
                .show_for(&["add"]),
            FieldSpec::collection(
                "updateFields",
                "Update Fields",
                vec![
                    FieldSpec::string("name", "Name").description("The name of the disk"),
                    FieldSpec::string("mountPath", "Mount Path").description("Mount path in the container"),
                    FieldSpec::number("sizeGB", "Size (GB)")
                        .default(10)
                        .description("Disk size in GB (can only increase)"),
                ],
            )
            .show_for(&["update"]),
            FieldSpec::string("snapshotId", "Snapshot ID")
                .required()
                .description("The ID of the snapshot to restore from")
                .show_for(&["restoreSnapshot"]),
        ],
    }
}

pub async fn execute(client: &RenderClient, operation: Operation, params: &Parameters) -> Result<Value> {
    let disks = client.disks();
    let service_id = params.string("serviceId")?;
    let disk_id = || params.string("diskId");
    match operation {
        Operation::List => Ok(list(disks.list(&service_id, params.list_mode(20)?).await?)),
        Operation::Get => Ok(disks.get(&service_id, &disk_id()?).await?),
        Operation::Add => {
            let request = AddDiskRequest {
                name: params.string("name")?,
                mount_path: params.string("mountPath")?,
                size_gb: params.u32_or("sizeGB", 10)?,
            };
            Ok(disks.add(&service_id, &request).await?)
        }
        Operation::Update => {
            let disk_id = disk_id()?;
            let fields = params.collection("updateFields");
            let request = UpdateDiskRequest {
                name: fields.optional_string("name"),
                mount_path: fields.optional_string("mountPath"),
                size_gb: fields.optional_u32("sizeGB")?,
            };
            Ok(disks.update(&service_id, &disk_id, &request).await?)
        }
        Operation::Delete => {
            let disk_id = disk_id()?;
            disks.delete(&service_id, &disk_id).await?;
            Ok(success("diskId", &disk_id))
        }
        Operation::ListSnapshots => {
            let disk_id = disk_id()?;
            let mode = params.list_mode(20)?;
            Ok(list(disks.list_snapshots(&service_id, &disk_id, mode).await?))
        }
        Operation::RestoreSnapshot => {
            let disk_id = disk_id()?;
            let snapshot_id = params.string("snapshotId")?;
            Ok(disks.restore_snapshot(&service_id, &disk_id, &snapshot_id).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_match_descriptor() {
        assert_operations_match_descriptor!();
    }
}
