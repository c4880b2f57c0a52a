//! Service resource: web services, static sites, workers and cron jobs.

use rendercloud_client::api::ServiceFilters;
use rendercloud_client::{
    AutoscalingCriteria, AutoscalingRequest, CreateServiceRequest, RenderClient, ServiceImage,
    UpdateServiceRequest,
};
use serde_json::Value;

use crate::error::Result;
use crate::node::{list, success};
use crate::params::Parameters;
use crate::resource::Resource;
use crate::schema::{
    FieldOption, FieldSpec, ResourceDescriptor, limit, op, opt, region_options, return_all,
};

operations!("service" {
    Create => "create",
    Delete => "delete",
    DeleteAutoscaling => "deleteAutoscaling",
    Get => "get",
    List => "list",
    PurgeCache => "purgeCache",
    Restart => "restart",
    Resume => "resume",
    Scale => "scale",
    Suspend => "suspend",
    Update => "update",
    UpdateAutoscaling => "updateAutoscaling",
});

fn service_type_options() -> Vec<FieldOption> {
    vec![
        opt("Background Worker", "background_worker"),
        opt("Cron Job", "cron_job"),
        opt("Private Service", "private_service"),
        opt("Static Site", "static_site"),
        opt("Web Service", "web_service"),
    ]
}

fn runtime_options(with_static: bool) -> Vec<FieldOption> {
    let mut runtimes = vec![
        opt("Docker", "docker"),
        opt("Elixir", "elixir"),
        opt("Go", "go"),
        opt("Node", "node"),
        opt("Python", "python"),
        opt("Ruby", "ruby"),
        opt("Rust", "rust"),
    ];
    if with_static {
        runtimes.push(opt("Static", "static"));
    }
    runtimes
}

fn auto_deploy_options() -> Vec<FieldOption> {
    vec![opt("Yes", "yes"), opt("No", "no")]
}

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        resource: Resource::Service,
        display_name: "Service",
        description: "Manage web services, static sites, workers, and cron jobs",
        default_operation: "list",
        operations: vec![
            op("create", "Create", "Create a new service", "Create a service"),
            op("delete", "Delete", "Delete a service", "Delete a service"),
            op("deleteAutoscaling", "Delete Autoscaling", "Remove autoscaling configuration", "Delete autoscaling for a service"),
            op("get", "Get", "Retrieve service details", "Get a service"),
            op("list", "List", "List all services", "List services"),
            op("purgeCache", "Purge Cache", "Purge the build cache", "Purge build cache for a service"),
            op("restart", "Restart", "Restart a running service", "Restart a service"),
            op("resume", "Resume", "Resume a suspended service", "Resume a service"),
            op("scale", "Scale", "Set the number of instances", "Scale a service"),
            op("suspend", "Suspend", "Suspend a running service", "Suspend a service"),
            op("update", "Update", "Update service configuration", "Update a service"),
            op("updateAutoscaling", "Update Autoscaling", "Configure autoscaling", "Update autoscaling for a service"),
        ],
        fields: vec![
            return_all(&["list"]),
            limit(&["list"], 20),
            FieldSpec::collection(
                "filters",
                "Filters",
                vec![
                    FieldSpec::string("name", "Name").description("Filter by service name"),
                    FieldSpec::string("ownerId", "Owner ID").description("Filter by workspace owner ID"),
                    FieldSpec::options("type", "Type", service_type_options())
                        .default("web_service")
                        .description("Filter by service type"),
                    FieldSpec::options("env", "Environment", runtime_options(true))
                        .default("node")
                        .description("Filter by runtime environment"),
                    FieldSpec::options("region", "Region", region_options())
                        .default("oregon")
                        .description("Filter by deployment region"),
                    FieldSpec::options(
                        "suspended",
                        "Suspended Status",
                        vec![
                            opt("All", "all"),
                            opt("Not Suspended", "not_suspended"),
                            opt("Suspended", "suspended"),
                        ],
                    )
                    .description("Filter by suspended status"),
                    FieldSpec::date_time("createdBefore", "Created Before").description("Filter by creation date (before)"),
                    FieldSpec::date_time("createdAfter", "Created After").description("Filter by creation date (after)"),
                    FieldSpec::date_time("updatedBefore", "Updated Before").description("Filter by update date (before)"),
                    FieldSpec::date_time("updatedAfter", "Updated After").description("Filter by update date (after)"),
                ],
            )
            .show_for(&["list"]),
            FieldSpec::string("serviceId", "Service ID")
                .required()
                .description("The ID of the service (srv-xxxxx format)")
                .show_for(&[
                    "get",
                    "delete",
                    "suspend",
                    "resume",
                    "restart",
                    "purgeCache",
                    "update",
                    "scale",
                    "updateAutoscaling",
                    "deleteAutoscaling",
                ]),
            FieldSpec::options("type", "Service Type", service_type_options())
                .required()
                .default("web_service")
                .description("The type of service to create")
                .show_for(&["create"]),
            FieldSpec::string("name", "Name")
                .required()
                .description("The name of the service")
                .show_for(&["create"]),
            FieldSpec::string("ownerId", "Owner ID")
                .required()
                .description("The ID of the owner (user or team)")
                .show_for(&["create"]),
            FieldSpec::options(
                "deploymentSource",
                "Deployment Source",
                vec![opt("Git Repository", "git"), opt("Docker Image", "image")],
            )
            .required()
            .description("Source for deploying the service")
            .show_for(&["create"]),
            FieldSpec::string("repo", "Repository URL")
                .required()
                .description("The Git repository URL")
                .show_for(&["create"])
                .show_if("deploymentSource", "git"),
            FieldSpec::string("branch", "Branch")
                .default("main")
                .description("The branch to deploy from")
                .show_for(&["create"])
                .show_if("deploymentSource", "git"),
            FieldSpec::string("image", "Image URL")
                .required()
                .description("The Docker image URL")
                .show_for(&["create"])
                .show_if("deploymentSource", "image"),
            FieldSpec::collection(
                "additionalOptions",
                "Additional Options",
                vec![
                    FieldSpec::options("autoDeploy", "Auto Deploy", auto_deploy_options())
                        .description("Whether to automatically deploy on push"),
                    FieldSpec::string("buildCommand", "Build Command"),
                    FieldSpec::string("dockerCommand", "Docker Command"),
                    FieldSpec::string("dockerfilePath", "Dockerfile Path"),
                    FieldSpec::string("healthCheckPath", "Health Check Path"),
                    FieldSpec::number("numInstances", "Number of Instances").default(1),
                    FieldSpec::options(
                        "plan",
                        "Plan",
                        vec![
                            opt("Starter", "starter"),
                            opt("Standard", "standard"),
                            opt("Pro", "pro"),
                            opt("Pro Plus", "pro_plus"),
                            opt("Pro Max", "pro_max"),
                            opt("Pro Ultra", "pro_ultra"),
                        ],
                    )
                    .description("Instance type/plan for the service"),
                    FieldSpec::options("region", "Region", region_options())
                        .default("oregon")
                        .description("Deployment region"),
                    FieldSpec::string("rootDir", "Root Directory"),
                    FieldSpec::options("runtime", "Runtime", runtime_options(false))
                        .default("node")
                        .description("Runtime environment"),
                    FieldSpec::string("startCommand", "Start Command"),
                ],
            )
            .show_for(&["create"]),
            FieldSpec::collection(
                "updateFields",
                "Update Fields",
                vec![
                    FieldSpec::options("autoDeploy", "Auto Deploy", auto_deploy_options())
                        .description("Whether to automatically deploy on push"),
                    FieldSpec::string("branch", "Branch"),
                    FieldSpec::string("buildCommand", "Build Command"),
                    FieldSpec::string("healthCheckPath", "Health Check Path"),
                    FieldSpec::string("image", "Image URL"),
                    FieldSpec::string("name", "Name"),
                    FieldSpec::string("startCommand", "Start Command"),
                ],
            )
            .show_for(&["update"]),
            FieldSpec::number("numInstances", "Number of Instances")
                .required()
                .default(1)
                .description("Number of instances to run")
                .show_for(&["scale"]),
            FieldSpec::boolean("autoscalingEnabled", "Autoscaling Enabled")
                .default(true)
                .show_for(&["updateAutoscaling"]),
            FieldSpec::number("minInstances", "Min Instances")
                .default(1)
                .show_for(&["updateAutoscaling"]),
            FieldSpec::number("maxInstances", "Max Instances")
                .default(3)
                .show_for(&["updateAutoscaling"]),
            FieldSpec::collection(
                "autoscalingCriteria",
                "Autoscaling Criteria",
                vec![
                    FieldSpec::number("cpu", "CPU Target (%)").default(70),
                    FieldSpec::number("memory", "Memory Target (%)").default(70),
                ],
            )
            .show_for(&["updateAutoscaling"]),
        ],
    }
}

fn filters(params: &Parameters) -> ServiceFilters {
    let f = params.collection("filters");
    ServiceFilters {
        name: f.optional_string("name"),
        owner_id: f.optional_string("ownerId"),
        service_type: f.optional_string("type"),
        env: f.optional_string("env"),
        region: f.optional_string("region"),
        suspended: f.optional_string("suspended"),
        created_before: f.optional_string("createdBefore"),
        created_after: f.optional_string("createdAfter"),
        updated_before: f.optional_string("updatedBefore"),
        updated_after: f.optional_string("updatedAfter"),
    }
}

fn create_request(params: &Parameters) -> Result<CreateServiceRequest> {
    let owner_id = params.string("ownerId")?;
    let options = params.collection("additionalOptions");

    let mut request = CreateServiceRequest {
        service_type: params.string("type")?,
        name: params.string("name")?,
        owner_id: owner_id.clone(),
        auto_deploy: options.optional_string("autoDeploy"),
        build_command: options.optional_string("buildCommand"),
        docker_command: options.optional_string("dockerCommand"),
        dockerfile_path: options.optional_string("dockerfilePath"),
        health_check_path: options.optional_string("healthCheckPath"),
        num_instances: options.optional_u32("numInstances")?,
        plan: options.optional_string("plan"),
        region: options.optional_string("region"),
        root_dir: options.optional_string("rootDir"),
        runtime: options.optional_string("runtime"),
        start_command: options.optional_string("startCommand"),
        ..Default::default()
    };

    if params.string_or("deploymentSource", "git") == "git" {
        request.repo = Some(params.string("repo")?);
        request.branch = Some(params.string_or("branch", "main"));
    } else {
        request.image = Some(ServiceImage {
            owner_id: Some(owner_id),
            image_path: params.string("image")?,
        });
    }

    Ok(request)
}

fn update_request(params: &Parameters) -> UpdateServiceRequest {
    let fields = params.collection("updateFields");
    UpdateServiceRequest {
        name: fields.optional_string("name"),
        auto_deploy: fields.optional_string("autoDeploy"),
        branch: fields.optional_string("branch"),
        build_command: fields.optional_string("buildCommand"),
        health_check_path: fields.optional_string("healthCheckPath"),
        start_command: fields.optional_string("startCommand"),
        image: fields.optional_string("image").map(|image_path| ServiceImage {
            owner_id: None,
            image_path,
        }),
    }
}

fn autoscaling_request(params: &Parameters) -> Result<AutoscalingRequest> {
    let criteria = params.collection("autoscalingCriteria");
    Ok(AutoscalingRequest {
        enabled: params.bool_or("autoscalingEnabled", true),
        min: params.u32_or("minInstances", 1)?,
        max: params.u32_or("maxInstances", 3)?,
        criteria: AutoscalingCriteria::from_targets(
            criteria.optional_u32("cpu")?,
            criteria.optional_u32("memory")?,
        ),
    })
}

pub async fn execute(client: &RenderClient, operation: Operation, params: &Parameters) -> Result<Value> {
    let services = client.services();
    match operation {
        Operation::List => {
            let mode = params.list_mode(20)?;
            Ok(list(services.list(&filters(params), mode).await?))
        }
        Operation::Get => Ok(services.get(&params.string("serviceId")?).await?),
        Operation::Create => Ok(services.create(&create_request(params)?).await?),
        Operation::Update => {
            let id = params.string("serviceId")?;
            Ok(services.update(&id, &update_request(params)).await?)
        }
        Operation::Delete => {
            let id = params.string("serviceId")?;
            services.delete(&id).await?;
            Ok(success("serviceId", &id))
        }
        Operation::Suspend => Ok(services.suspend(&params.string("serviceId")?).await?),
        Operation::Resume => Ok(services.resume(&params.string("serviceId")?).await?),
        Operation::Restart => {
            let id = params.string("serviceId")?;
            services.restart(&id).await?;
            Ok(success("serviceId", &id))
        }
        Operation::Scale => {
            let id = params.string("serviceId")?;
            Ok(services.scale(&id, params.u32("numInstances")?).await?)
        }
        Operation::UpdateAutoscaling => {
            let id = params.string("serviceId")?;
            Ok(services.update_autoscaling(&id, &autoscaling_request(params)?).await?)
        }
        Operation::DeleteAutoscaling => {
            let id = params.string("serviceId")?;
            services.delete_autoscaling(&id).await?;
            Ok(success("serviceId", &id))
        }
        Operation::PurgeCache => {
            let id = params.string("serviceId")?;
            services.purge_cache(&id).await?;
            Ok(success("serviceId", &id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operations_match_descriptor() {
        assert_operations_match_descriptor!();
    }

    #[test]
    fn test_create_request_from_git_source() {
        let params = Parameters::from_value(json!({
            "type": "web_service",
            "name": "api",
            "ownerId": "tea-1",
            "deploymentSource": "git",
            "repo": "https://github.com/acme/api",
            "additionalOptions": {"plan": "starter", "numInstances": 2, "region": ""},
        }))
        .unwrap();
        let body = serde_json::to_value(create_request(&params).unwrap()).unwrap();
        assert_eq!(body["type"], "web_service");
        assert_eq!(body["repo"], "https://github.com/acme/api");
        assert_eq!(body["branch"], "main");
        assert_eq!(body["numInstances"], 2);
        assert!(body.get("region").is_none());
        assert!(body.get("image").is_none());
    }

    #[test]
    fn test_create_request_from_image_source() {
        let params = Parameters::from_value(json!({
            "type": "private_service",
            "name": "worker",
            "ownerId": "tea-1",
            "deploymentSource": "image",
            "image": "docker.io/acme/worker:1",
        }))
        .unwrap();
        let body = serde_json::to_value(create_request(&params).unwrap()).unwrap();
        assert_eq!(
            body["image"],
            json!({"ownerId": "tea-1", "imagePath": "docker.io/acme/worker:1"})
        );
        assert!(body.get("repo").is_none());
    }

    #[test]
    fn test_autoscaling_request_only_sends_set_targets() {
        let params = Parameters::from_value(json!({
            "autoscalingEnabled": true,
            "minInstances": 2,
            "maxInstances": 5,
            "autoscalingCriteria": {"cpu": 60},
        }))
        .unwrap();
        let body = serde_json::to_value(autoscaling_request(&params).unwrap()).unwrap();
        assert_eq!(body["min"], 2);
        assert_eq!(body["max"], 5);
        assert_eq!(body["criteria"], json!({"cpu": {"enabled": true, "percentage": 60}}));
    }

    #[test]
    fn test_update_request_wraps_image() {
        let params = Parameters::from_value(json!({"updateFields": {"image": "img:2", "name": ""}})).unwrap();
        let body = serde_json::to_value(update_request(&params)).unwrap();
        assert_eq!(body, json!({"image": {"imagePath": "img:2"}}));
    }
}
