//! Design Tests: Instance Factory and Accessor Bridge

use cfgmap_ir::ConfigError;
use cfgmap_loader::{BoundMapping, InterfaceDecl, LoadError, MapContext};
use pretty_assertions::assert_eq;

use crate::support::Fixture;

/// Design: one property with a default yields a one-entry defaults table
#[test]
fn design_defaults_accessor_contract() {
    let fx = Fixture::new();
    let server = fx.scope.declare_interface("com.acme.Server");
    fx.mappings.declare_interface(
        &server,
        InterfaceDecl::new(vec![
            cfgmap_ir::PropertyMetadata::new("server.port").with_default("8080"),
        ]),
    );

    let defaults = fx.loader.defaults_of(&server).unwrap();

    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults.get("server.port").map(String::as_str), Some("8080"));
}

/// Design: names are grouped by mapping, then by contributing interface
#[test]
fn design_names_accessor_groups() {
    let fx = Fixture::new();
    let tls = fx.interface("com.acme.Tls", &["server.tls.enabled"]);
    let server = fx.interface_with("com.acme.Server", &["server.host"], |decl| decl.nested(tls));

    let names = fx.loader.names_of(&server).unwrap();

    let group = &names["com.acme.Server"];
    assert_eq!(group.len(), 2);
    assert!(group["com.acme.Server"].contains("server.host"));
    assert!(group["com.acme.Tls"].contains("server.tls.enabled"));
}

/// Design: the context reaches the constructor unchanged
#[test]
fn design_mapping_object_binds_context() {
    let fx = Fixture::new();
    let server = fx.interface("com.acme.Server", &["server.host", "server.port"]);
    let ctx = MapContext::new()
        .with("server.host", "example.org")
        .with("server.port", "443");

    let bound = fx.loader.mapping_object_as::<BoundMapping>(&server, &ctx).unwrap();

    assert_eq!(bound.artifact(), "com.acme.Server$$CMImpl");
    assert_eq!(bound.get("server.host"), Some("example.org"));
    assert_eq!(bound.get("server.port"), Some("443"));
}

/// Design: a class-style mapping binds through its wrapper's implementation
#[test]
fn design_class_style_mapping_object() {
    let fx = Fixture::new();
    let props = fx.class("com.acme.Props", &["props.name"]);
    let ctx: MapContext = [("props.name", "demo")].into_iter().collect();

    let bound = fx.loader.mapping_object_as::<BoundMapping>(&props, &ctx).unwrap();

    assert_eq!(bound.get("props.name"), Some("demo"));
    assert!(bound.artifact().ends_with("I$$CMImpl"));
}

/// Design: recognized configuration failures keep their kind
#[test]
fn design_config_error_passthrough() {
    let fx = Fixture::new();
    let server = fx.interface("com.acme.Server", &["server.host"]);

    let err = fx.loader.mapping_object(&server, &MapContext::new()).unwrap_err();

    assert!(matches!(
        err,
        LoadError::Config(ConfigError::MissingValue { ref path }) if path == "server.host"
    ));
    assert!(!err.is_contract_violation());
}
