//! Per-resource operation handlers and field schemas.
//!
//! Each module exposes an `Operation` enum, a `descriptor()` used by the
//! registry, and an async `execute` that maps item parameters onto the
//! typed client.

/// Declare a resource's `Operation` enum with its host ids.
macro_rules! operations {
    ($resource:literal { $($variant:ident => $id:literal),+ $(,)? }) => {
        /// Operations on this resource.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Operation {
            $($variant),+
        }

        impl Operation {
            pub const ALL: &'static [Operation] = &[$(Operation::$variant),+];

            /// Identifier as the host spells it.
            pub fn id(&self) -> &'static str {
                match self {
                    $(Operation::$variant => $id),+
                }
            }
        }

        impl std::fmt::Display for Operation {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.id())
            }
        }

        impl std::str::FromStr for Operation {
            type Err = crate::error::NodeError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($id => Ok(Operation::$variant),)+
                    other => Err(crate::error::NodeError::unknown_operation($resource, other)),
                }
            }
        }
    };
}

/// Assert that an `Operation` enum and its descriptor agree.
#[cfg(test)]
macro_rules! assert_operations_match_descriptor {
    () => {
        let descriptor = descriptor();
        assert_eq!(descriptor.operations.len(), Operation::ALL.len());
        for op in Operation::ALL {
            assert!(
                descriptor.operation(op.id()).is_some(),
                "{} missing from descriptor",
                op
            );
            assert_eq!(op.id().parse::<Operation>().unwrap(), *op);
        }
        assert!(matches!(
            "bogus".parse::<Operation>(),
            Err(crate::error::NodeError::UnknownOperation { .. })
        ));
    };
}

pub mod custom_domain;
pub mod deploy;
pub mod disk;
pub mod environment;
pub mod environment_group;
pub mod environment_variable;
pub mod key_value;
pub mod postgres;
pub mod project;
pub mod secret_file;
pub mod service;
pub mod webhook;
