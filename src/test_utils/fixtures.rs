//! Model fixtures.
//!
//! [`ModelFixture::APP`] is a small but complete graph: a component with a
//! qualified provision method, a module with instance and static provides
//! methods, and an injected service with constructor, method and field
//! sites across the `env`, `sys` and `cli` domains.

use std::path::{Path, PathBuf};

use crate::model::{GraphModel, parse_model};

/// Named TOML model documents.
pub struct ModelFixture;

impl ModelFixture {
    pub const APP_COMPONENT: &'static str = "com.acme.AppComponent";

    pub const APP: &'static str = r#"
[[types]]
name = "com.acme.AppComponent"
kind = "component"
modules = ["com.acme.DbModule"]

[[types.methods]]
name = "service"
returns = "com.acme.Service"

[[types.methods]]
name = "port"
returns = "int"
annotations = [{ type = "EnvironmentVariable", qualifier = true, name = "PORT", default_value = "8080" }]

[[types]]
name = "com.acme.DbModule"
kind = "module"

[[types.methods]]
name = "dataSource"
returns = "com.acme.DataSource"
provides = true
parameters = [
    { name = "url", type = "java.lang.String", annotations = [{ type = "EnvironmentVariable", qualifier = true, name = "DATABASE_URL" }] },
    { name = "poolSize", type = "int", annotations = [{ type = "EnvironmentVariable", qualifier = true, name = "POOL_SIZE", default_value = "10" }] },
]

[[types.methods]]
name = "region"
returns = "com.acme.Region"
provides = true
static = true
parameters = [
    { name = "region", type = "java.util.Optional<java.lang.String>", annotations = [{ type = "SystemProperty", qualifier = true, name = "aws.region" }] },
]

[[types]]
name = "com.acme.DataSource"

[[types]]
name = "com.acme.Region"

[[types]]
name = "com.acme.Mode"
kind = "enum"

[[types]]
name = "com.acme.Service"

[[types.constructors]]
name = "<init>"
inject = true
parameters = [
    { name = "url", type = "java.lang.String", annotations = [
        { type = "EnvironmentVariable", qualifier = true, name = "DATABASE_URL" },
        { type = "javax.annotation.Nullable" },
    ] },
    { name = "mode", type = "com.acme.Mode", annotations = [{ type = "EnvironmentVariable", qualifier = true, name = "MODE", default_value = "FAST" }] },
    { name = "dataSource", type = "javax.inject.Provider<com.acme.DataSource>" },
]

[[types.methods]]
name = "configure"
inject = true
parameters = [
    { name = "timeout", type = "java.lang.Long", annotations = [{ type = "SystemProperty", qualifier = true, name = "app.timeout" }] },
    { name = "ports", type = "java.util.List<java.lang.Integer>", annotations = [{ type = "OptionParameter", qualifier = true, name = "ports" }] },
]

[[types.fields]]
name = "appName"
type = "java.lang.String"
inject = true
annotations = [{ type = "SystemProperty", qualifier = true, name = "app.name", default_value = "demo" }]
"#;

    /// A component whose module reference is misspelled.
    pub const BROKEN: &'static str = r#"
[[types]]
name = "com.acme.BrokenComponent"
kind = "component"
modules = ["com.acme.DbModul"]

[[types]]
name = "com.acme.DbModule"
kind = "module"
"#;

    /// [`Self::APP`] parsed on top of the builtin types.
    pub fn app_model() -> GraphModel {
        Self::model(Self::APP)
    }

    /// Parse `toml` on top of the builtin types.
    ///
    /// Panics on malformed fixtures.
    pub fn model(toml: &str) -> GraphModel {
        let file = parse_model(toml, "fixture.toml").unwrap_or_else(|e| panic!("{e}"));
        let mut model = GraphModel::with_builtins();
        for decl in file.types {
            model.insert(decl);
        }
        model
    }
}

/// Write `content` to `dir/name`, creating parent directories.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("{e}"));
    }
    std::fs::write(&path, content).unwrap_or_else(|e| panic!("{e}"));
    path
}
