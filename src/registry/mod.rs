// TOML-Based Lint Category Registry
//
// Each category names the directories to scan, the extensions it owns, the
// subtrees to skip, and the tool (plus optional auto-fixer) to run over the
// surviving files. A default registry is embedded in the binary; a project
// can replace it with `.polylint.toml` or `--config`.
//
// The registry is built once at start-up and passed by reference; nothing
// looks categories up through global state.

mod definition;
mod error;
mod predicate;
#[allow(clippy::module_inception)]
mod registry;

pub use definition::{
    CategoryDefinition, DispatchMode, RegistryFile, ToolDefinition, VcsDefinition,
    SOURCE_ROOT_PLACEHOLDER,
};
pub use error::ConfigError;
pub use predicate::FilePredicate;
pub use registry::{Category, CategoryRegistry, LOCAL_REGISTRY_FILE};
