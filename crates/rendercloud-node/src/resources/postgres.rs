//! PostgreSQL resource.

use rendercloud_client::api::PostgresFilters;
use rendercloud_client::{CreatePostgresRequest, RenderClient, UpdatePostgresRequest};
use serde_json::Value;

use crate::error::Result;
use crate::node::{list, success};
use crate::params::Parameters;
use crate::resource::Resource;
use crate::schema::{
    FieldSpec, ResourceDescriptor, limit, op, opt, plan_options, region_options, return_all,
};

operations!("postgres" {
    Create => "create",
    CreateExport => "createExport",
    CreateUser => "createUser",
    Delete => "delete",
    DeleteUser => "deleteUser",
    Failover => "failover",
    Get => "get",
    GetConnectionInfo => "getConnectionInfo",
    GetRecoveryStatus => "getRecoveryStatus",
    List => "list",
    ListExports => "listExports",
    ListUsers => "listUsers",
    Restart => "restart",
    Resume => "resume",
    Suspend => "suspend",
    TriggerRecovery => "triggerRecovery",
    Update => "update",
});

const LIST_OPERATIONS: &[&str] = &["list", "listExports", "listUsers"];

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        resource: Resource::Postgres,
        display_name: "Postgres",
        description: "Manage PostgreSQL database instances",
        default_operation: "list",
        operations: vec![
            op("create", "Create", "Create a new PostgreSQL instance", "Create a PostgreSQL instance"),
            op("createExport", "Create Export", "Create a database export", "Create a database export"),
            op("createUser", "Create User", "Create a PostgreSQL user", "Create a PostgreSQL user"),
            op("delete", "Delete", "Delete a PostgreSQL instance", "Delete a PostgreSQL instance"),
            op("deleteUser", "Delete User", "Delete a PostgreSQL user", "Delete a PostgreSQL user"),
            op("failover", "Failover", "Trigger manual failover (high availability)", "Trigger failover for a PostgreSQL instance"),
            op("get", "Get", "Retrieve PostgreSQL instance details", "Get a PostgreSQL instance"),
            op("getConnectionInfo", "Get Connection Info", "Get connection string and credentials", "Get connection info for a PostgreSQL instance"),
            op("getRecoveryStatus", "Get Recovery Status", "Get point-in-time recovery status", "Get recovery status for a PostgreSQL instance"),
            op("list", "List", "List PostgreSQL instances", "List PostgreSQL instances"),
            op("listExports", "List Exports", "List database exports", "List database exports"),
            op("listUsers", "List Users", "List PostgreSQL users", "List PostgreSQL users"),
            op("restart", "Restart", "Restart a PostgreSQL instance", "Restart a PostgreSQL instance"),
            op("resume", "Resume", "Resume a suspended PostgreSQL instance", "Resume a PostgreSQL instance"),
            op("suspend", "Suspend", "Suspend a PostgreSQL instance", "Suspend a PostgreSQL instance"),
            op("triggerRecovery", "Trigger Recovery", "Restore from a point in time", "Trigger recovery for a PostgreSQL instance"),
            op("update", "Update", "Update PostgreSQL configuration", "Update a PostgreSQL instance"),
        ],
        fields: vec![
            return_all(LIST_OPERATIONS),
            limit(LIST_OPERATIONS, 20),
            FieldSpec::collection(
                "filters",
                "Filters",
                vec![
                    FieldSpec::string("ownerId", "Owner ID").description("Filter by workspace owner ID"),
                    FieldSpec::string("name", "Name").description("Filter by instance name"),
                    FieldSpec::options("region", "Region", region_options())
                        .default("oregon")
                        .description("Filter by region"),
                    FieldSpec::options(
                        "status",
                        "Status",
                        vec![
                            opt("Available", "available"),
                            opt("Creating", "creating"),
                            opt("Suspended", "suspended"),
                            opt("Unavailable", "unavailable"),
                        ],
                    )
                    .description("Filter by status"),
                ],
            )
            .show_for(&["list"]),
            FieldSpec::string("postgresId", "PostgreSQL ID")
                .required()
                .description("The ID of the PostgreSQL instance (dpg-xxxxx format)")
                .show_for(&[
                    "get",
                    "update",
                    "delete",
                    "getConnectionInfo",
                    "suspend",
                    "resume",
                    "restart",
                    "failover",
                    "getRecoveryStatus",
                    "triggerRecovery",
                    "listExports",
                    "createExport",
                    "listUsers",
                    "createUser",
                    "deleteUser",
                ]),
            FieldSpec::string("name", "Name")
                .required()
                .description("The name of the PostgreSQL instance")
                .show_for(&["create"]),
            FieldSpec::string("ownerId", "Owner ID")
                .required()
                .description("The ID of the owner (user or team)")
                .show_for(&["create"]),
            FieldSpec::collection(
                "additionalOptions",
                "Additional Options",
                vec![
                    FieldSpec::string("databaseName", "Database Name").description("Internal database name"),
                    FieldSpec::string("databaseUser", "Database User").description("Primary database user"),
                    FieldSpec::boolean("highAvailabilityEnabled", "High Availability")
                        .description("Whether to enable high availability"),
                    FieldSpec::options("plan", "Plan", plan_options(true))
                        .default("starter")
                        .description("Database plan"),
                    FieldSpec::options("region", "Region", region_options())
                        .default("oregon")
                        .description("Deployment region"),
                    FieldSpec::options(
                        "version",
                        "Version",
                        vec![
                            opt("PostgreSQL 14", "14"),
                            opt("PostgreSQL 15", "15"),
                            opt("PostgreSQL 16", "16"),
                        ],
                    )
                    .default("16")
                    .description("PostgreSQL version"),
                ],
            )
            .show_for(&["create"]),
            FieldSpec::collection(
                "updateFields",
                "Update Fields",
                vec![
                    FieldSpec::boolean("highAvailabilityEnabled", "High Availability")
                        .description("Whether to enable high availability"),
                    FieldSpec::string("name", "Name").description("The name of the PostgreSQL instance"),
                    FieldSpec::options("plan", "Plan", plan_options(false)).description("Database plan"),
                ],
            )
            .show_for(&["update"]),
            FieldSpec::date_time("recoveryTargetTime", "Recovery Target Time")
                .required()
                .description("Point-in-time to recover to")
                .show_for(&["triggerRecovery"]),
            FieldSpec::string("username", "Username")
                .required()
                .description("Username for the new PostgreSQL user")
                .show_for(&["createUser"]),
            FieldSpec::string("userId", "User ID")
                .required()
                .description("The ID of the user to delete")
                .show_for(&["deleteUser"]),
        ],
    }
}

fn create_request(params: &Parameters) -> Result<CreatePostgresRequest> {
    let options = params.collection("additionalOptions");
    Ok(CreatePostgresRequest {
        name: params.string("name")?,
        owner_id: params.string("ownerId")?,
        database_name: options.optional_string("databaseName"),
        database_user: options.optional_string("databaseUser"),
        high_availability_enabled: options.optional_bool("highAvailabilityEnabled"),
        plan: options.optional_string("plan"),
        region: options.optional_string("region"),
        version: options.optional_string("version"),
    })
}

pub async fn execute(client: &RenderClient, operation: Operation, params: &Parameters) -> Result<Value> {
    let postgres = client.postgres();
    let id = || params.string("postgresId");
    match operation {
        Operation::List => {
            let f = params.collection("filters");
            let filters = PostgresFilters {
                owner_id: f.optional_string("ownerId"),
                name: f.optional_string("name"),
                region: f.optional_string("region"),
                status: f.optional_string("status"),
            };
            Ok(list(postgres.list(&filters, params.list_mode(20)?).await?))
        }
        Operation::Create => Ok(postgres.create(&create_request(params)?).await?),
        Operation::Get => Ok(postgres.get(&id()?).await?),
        Operation::Update => {
            let id = id()?;
            let fields = params.collection("updateFields");
            let request = UpdatePostgresRequest {
                name: fields.optional_string("name"),
                plan: fields.optional_string("plan"),
                high_availability_enabled: fields.optional_bool("highAvailabilityEnabled"),
            };
            Ok(postgres.update(&id, &request).await?)
        }
        Operation::Delete => {
            let id = id()?;
            postgres.delete(&id).await?;
            Ok(success("postgresId", &id))
        }
        Operation::GetConnectionInfo => Ok(postgres.connection_info(&id()?).await?),
        Operation::Suspend => Ok(postgres.suspend(&id()?).await?),
        Operation::Resume => Ok(postgres.resume(&id()?).await?),
        Operation::Restart => {
            let id = id()?;
            postgres.restart(&id).await?;
            Ok(success("postgresId", &id))
        }
        Operation::Failover => Ok(postgres.failover(&id()?).await?),
        Operation::GetRecoveryStatus => Ok(postgres.recovery_status(&id()?).await?),
        Operation::TriggerRecovery => {
            let id = id()?;
            let target = params.string("recoveryTargetTime")?;
            Ok(postgres.trigger_recovery(&id, &target).await?)
        }
        Operation::ListExports => {
            let id = id()?;
            Ok(list(postgres.list_exports(&id, params.list_mode(20)?).await?))
        }
        Operation::CreateExport => Ok(postgres.create_export(&id()?).await?),
        Operation::ListUsers => {
            let id = id()?;
            Ok(list(postgres.list_users(&id, params.list_mode(20)?).await?))
        }
        Operation::CreateUser => {
            let id = id()?;
            Ok(postgres.create_user(&id, &params.string("username")?).await?)
        }
        Operation::DeleteUser => {
            let id = id()?;
            let user_id = params.string("userId")?;
            postgres.delete_user(&id, &user_id).await?;
            Ok(success("userId", &user_id))
        }
    }
}
