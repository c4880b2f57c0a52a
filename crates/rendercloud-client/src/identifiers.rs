//! Identifier format contracts.
//!
//! Every Render resource id carries a fixed prefix. Ids are checked before a
//! request path is built so a malformed id never reaches the network.

use std::fmt;

use crate::error::{Error, Result};

/// Identifier families with a required prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Service,
    Deploy,
    Project,
    Environment,
    Postgres,
    KeyValue,
    Disk,
    EnvGroup,
}

impl IdKind {
    /// All identifier families.
    pub const ALL: [IdKind; 8] = [
        IdKind::Service,
        IdKind::Deploy,
        IdKind::Project,
        IdKind::Environment,
        IdKind::Postgres,
        IdKind::KeyValue,
        IdKind::Disk,
        IdKind::EnvGroup,
    ];

    /// The prefix every id of this family starts with.
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Service => "srv-",
            IdKind::Deploy => "dep-",
            IdKind::Project => "prj-",
            IdKind::Environment => "env-",
            IdKind::Postgres => "dpg-",
            IdKind::KeyValue => "red-",
            IdKind::Disk => "dsk-",
            IdKind::EnvGroup => "evg-",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            IdKind::Service => "service",
            IdKind::Deploy => "deploy",
            IdKind::Project => "project",
            IdKind::Environment => "environment",
            IdKind::Postgres => "PostgreSQL",
            IdKind::KeyValue => "Key Value",
            IdKind::Disk => "disk",
            IdKind::EnvGroup => "environment group",
        }
    }

    /// Check that `value` carries this family's prefix.
    pub fn validate(&self, value: &str) -> Result<()> {
        if value.starts_with(self.prefix()) {
            Ok(())
        } else {
            Err(Error::InvalidIdentifier {
                kind: *self,
                value: value.to_string(),
            })
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn validate_service_id(id: &str) -> Result<()> {
    IdKind::Service.validate(id)
}

pub fn validate_deploy_id(id: &str) -> Result<()> {
    IdKind::Deploy.validate(id)
}

pub fn validate_project_id(id: &str) -> Result<()> {
    IdKind::Project.validate(id)
}

pub fn validate_environment_id(id: &str) -> Result<()> {
    IdKind::Environment.validate(id)
}

pub fn validate_postgres_id(id: &str) -> Result<()> {
    IdKind::Postgres.validate(id)
}

pub fn validate_key_value_id(id: &str) -> Result<()> {
    IdKind::KeyValue.validate(id)
}

pub fn validate_disk_id(id: &str) -> Result<()> {
    IdKind::Disk.validate(id)
}

pub fn validate_env_group_id(id: &str) -> Result<()> {
    IdKind::EnvGroup.validate(id)
}
