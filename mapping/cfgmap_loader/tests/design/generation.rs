//! Design Tests: Concurrency-Safe Generation
//!
//! - Concurrent resolutions of one type generate exactly once
//! - An incompatible artifact under the expected name is regenerated
//! - Class-style wrappers already in scope are accepted without a check
//! - Ahead-of-time mode serves precomputed bytes and never generates
//! - Precomputed bytes bind to the requesting scope's own types

use std::sync::Barrier;

use cfgmap_ir::{
    ArtifactRef, BindingMetadata, ClassMetadata, MappingDefaults, MappingNames, PropertyMetadata,
    SchemaKind, Scope,
};
use cfgmap_loader::{
    ArtifactManifest, DeclaredMappings, GenerationMode, Generator, LoadError, LocalScope,
    ManifestGenerator, ManifestKind, MappingLoader, PrecomputedGenerator,
};

use crate::support::{declare, Fixture};

fn race<F>(threads: usize, resolve: F) -> Vec<ArtifactRef>
where
    F: Fn() -> ArtifactRef + Sync,
{
    let barrier = Barrier::new(threads);
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    resolve()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

/// Design: N >= 50 concurrent resolutions generate exactly once
#[test]
fn design_single_generation_under_race() {
    let fx = Fixture::new();
    let server = fx.interface("com.acme.Server", &["server.host", "server.port"]);

    let artifacts = race(64, || fx.loader.artifact(&server).unwrap());

    assert_eq!(fx.generations(), 1);
    assert!(artifacts.iter().all(|a| a.ptr_eq(&artifacts[0])));
    assert_eq!(fx.scope.artifact_count(), 1);
}

/// Design: racing on a class-style type generates the wrapper and its
/// implementation once each
#[test]
fn design_single_generation_under_race_class_style() {
    let fx = Fixture::new();
    let props = fx.class("com.acme.Props", &["props.name"]);

    let artifacts = race(50, || fx.loader.artifact(&props).unwrap());

    assert_eq!(fx.generations(), 2);
    assert!(artifacts.iter().all(|a| a.ptr_eq(&artifacts[0])));
}

/// Design: racing through `ensure_defined` directly also generates once
#[test]
fn design_ensure_defined_double_checks_inside_lock() {
    let fx = Fixture::new();
    let server = fx.interface("com.acme.Server", &["server.host"]);
    let meta = fx.loader.resolve(&server).unwrap().remove(0);
    let scope = server.scope().clone();

    let artifacts = race(50, || fx.loader.ensure_defined(&scope, &meta).unwrap());

    assert_eq!(fx.generations(), 1);
    assert!(artifacts.iter().all(|a| a.ptr_eq(&artifacts[0])));
    assert_eq!(fx.loader.lock_count(), 1);
}

/// Design: a same-named artifact visible from the parent scope that does not
/// implement the type is replaced by a fresh one in the child scope
#[test]
fn design_incompatible_parent_artifact_forces_regeneration() {
    let parent = Fixture::new();
    let parent_server = parent.interface("com.acme.Server", &["server.host"]);
    let inherited = parent.loader.artifact(&parent_server).unwrap();

    let child = Fixture::in_scope(LocalScope::with_parent(parent.scope.shared()));
    let child_server = child.interface("com.acme.Server", &["server.host"]);
    assert!(child.scope.load(inherited.name()).is_some());

    let own = child.loader.artifact(&child_server).unwrap();

    assert!(!own.ptr_eq(&inherited));
    assert_eq!(own.name(), inherited.name());
    assert_eq!(own.scope(), child.scope.id());
    assert!(child.scope.is_compatible(&own, &child_server));
    assert_eq!(child.generations(), 1);
}

/// Design: an incompatible artifact defined in the type's own scope cannot be
/// replaced and is reported as a conflict
#[test]
fn design_local_incompatible_artifact_is_a_conflict() {
    let fx = Fixture::new();
    let first = fx.interface("com.acme.Server", &["server.host"]);
    let second = fx.interface("com.acme.Server", &["server.port"]);

    fx.loader.artifact(&first).unwrap();
    let err = fx.loader.artifact(&second).unwrap_err();

    assert!(matches!(
        err,
        LoadError::DefinitionConflict { ref name, .. } if name == "com.acme.Server$$CMImpl"
    ));
    assert!(err.is_contract_violation());
    assert!(fx.loader.cached(&second).is_none());
}

/// Design: a wrapper already defined under the expected name is accepted
/// as-is for class-style mappings, even one that wraps a different class
#[test]
fn design_class_style_accepts_existing_wrapper() {
    let parent = Fixture::new();
    let parent_props = parent.class("com.acme.Props", &["props.name"]);
    let parent_wrapper = parent.loader.mapping_interface_type(&parent_props).unwrap();

    let child = Fixture::in_scope(LocalScope::with_parent(parent.scope.shared()));
    let child_props = child.scope.declare("com.acme.Props", SchemaKind::Class);

    let wrapper = child.loader.mapping_interface_type(&child_props).unwrap();

    assert_eq!(wrapper, parent_wrapper);
    assert_eq!(wrapper.origin(), Some(&parent_props));
    assert_eq!(child.generations(), 0);
}

/// Design: a wrapper defined ahead of the loader is reused
#[test]
fn design_predefined_wrapper_is_reused() {
    let fx = Fixture::new();
    let props = fx.class("com.acme.Props", &["props.name"]);
    let binding = BindingMetadata::Class(ClassMetadata::of(&props).unwrap().into());
    let bytes = ManifestGenerator.generate(&binding).unwrap();
    let predefined = fx.scope.define(binding.class_name(), &bytes).unwrap();

    let wrapper = fx.loader.mapping_interface_type(&props).unwrap();

    assert_eq!(Some(&wrapper), predefined.declared_mapping());
    assert_eq!(fx.generations(), 0);
}

/// Design: ahead-of-time mode resolves from the table without generating
#[test]
fn design_precomputed_mode_serves_table() {
    let build_time = Fixture::new();
    let server = build_time.interface("com.acme.Server", &["server.host"]);
    let metadata = build_time.loader.resolve(&server).unwrap();
    let table = PrecomputedGenerator::precompute(&ManifestGenerator, &metadata).unwrap();
    assert_eq!(table.len(), 1);

    let loader = MappingLoader::builder()
        .introspector(build_time.mappings.clone())
        .precomputed(table)
        .mode(GenerationMode::Precomputed)
        .build()
        .unwrap();

    let artifact = loader.artifact(&server).unwrap();
    assert_eq!(artifact.name(), "com.acme.Server$$CMImpl");
    assert_eq!(build_time.generations(), 0);

    let other = build_time.interface("com.acme.Other", &[]);
    assert!(matches!(
        loader.artifact(&other),
        Err(LoadError::Generation { .. })
    ));
}

/// Design: a table built from one scope serves a same-named type in another
/// scope with an artifact of that scope's own type
#[test]
fn design_precomputed_mode_keeps_scope_identity() {
    let build_time = Fixture::new();
    let server_a = build_time.interface("com.acme.Server", &["server.host"]);
    let props_a = build_time.class("com.acme.Props", &["props.name"]);
    let mut metadata = build_time.loader.resolve(&server_a).unwrap();
    metadata.extend(build_time.loader.resolve(&props_a).unwrap());
    let table = PrecomputedGenerator::precompute(&ManifestGenerator, &metadata).unwrap();

    let scope_b = LocalScope::new();
    let mappings_b = DeclaredMappings::new();
    let server_b = scope_b.declare_interface("com.acme.Server");
    declare(&mappings_b, &server_b, &["server.host"], |decl| decl);
    let props_b = scope_b.declare("com.acme.Props", SchemaKind::Class);
    mappings_b.declare_class(&props_b, vec![PropertyMetadata::new("props.name")]);
    let loader = MappingLoader::builder()
        .introspector(mappings_b)
        .precomputed(table)
        .mode(GenerationMode::Precomputed)
        .build()
        .unwrap();

    let server = loader.artifact(&server_b).unwrap();
    assert_eq!(server.scope(), scope_b.id());
    assert_eq!(server.implements(), Some(server_b.id()));
    assert!(scope_b.is_compatible(&server, &server_b));
    assert!(!scope_b.is_compatible(&server, &server_a));

    let wrapper = loader.mapping_interface_type(&props_b).unwrap();
    assert_eq!(wrapper.origin(), Some(&props_b));
    assert!(wrapper.scope().ptr_eq(&scope_b.shared()));
    let props = loader.artifact(&props_b).unwrap();
    assert_eq!(props.scope(), scope_b.id());
    assert_eq!(props.implements(), Some(wrapper.id()));
    assert_eq!(build_time.generations(), 0);
}

/// Design: bytes that describe another type are rejected, not cached
#[test]
fn design_artifact_for_wrong_type_is_rejected() {
    let fx = Fixture::new();
    let server = fx.interface("com.acme.Server", &["server.host"]);
    fx.interface("com.acme.Other", &[]);
    let misdirected = ArtifactManifest {
        name: "com.acme.Server$$CMImpl".to_owned(),
        kind: ManifestKind::Implementation {
            implements: "com.acme.Other".to_owned(),
            properties: Vec::new(),
            names: MappingNames::new(),
            defaults: MappingDefaults::new(),
        },
    };
    let mut table = PrecomputedGenerator::new();
    table.insert("com.acme.Server$$CMImpl", misdirected.encode().unwrap());
    let loader = MappingLoader::builder()
        .introspector(fx.mappings.clone())
        .precomputed(table)
        .mode(GenerationMode::Precomputed)
        .build()
        .unwrap();

    let err = loader.artifact(&server).unwrap_err();

    assert!(matches!(
        err,
        LoadError::InvalidArtifact { ref name, .. } if name == "com.acme.Server$$CMImpl"
    ));
    assert!(loader.cached(&server).is_none());
}
