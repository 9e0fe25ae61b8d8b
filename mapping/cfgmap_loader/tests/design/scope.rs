//! Design Tests: Scope Isolation
//!
//! Scopes are the unit of name uniqueness. Two scopes may each hold their
//! own artifact under one name.

use std::sync::Barrier;

use cfgmap_ir::Scope;
use cfgmap_loader::{DeclaredMappings, LocalScope, MappingLoader};

use crate::support::{declare, Fixture};

/// Design: two scopes resolving types with the same name get two artifacts
#[test]
fn design_scopes_isolate_same_name() {
    let fx = Fixture::new();
    let other_scope = LocalScope::new();

    let here = fx.interface("com.acme.Server", &["server.host"]);
    let there = other_scope.declare_interface("com.acme.Server");
    declare(&fx.mappings, &there, &["server.host"], |decl| decl);

    let a = fx.loader.artifact(&here).unwrap();
    let b = fx.loader.artifact(&there).unwrap();

    assert!(!a.ptr_eq(&b));
    assert_eq!(a.name(), b.name());
    assert_eq!(a.scope(), fx.scope.id());
    assert_eq!(b.scope(), other_scope.id());
    assert_eq!(fx.generations(), 2);
    // One name, one lock, shared by both scopes
    assert_eq!(fx.loader.lock_count(), 1);
}

/// Design: concurrent resolutions through different scopes sharing a name
/// converge on one artifact per scope
#[test]
fn design_concurrent_scopes_converge_per_scope() {
    const SCOPES: usize = 4;
    const PER_SCOPE: usize = 16;

    let mappings = DeclaredMappings::new();
    let loader = MappingLoader::new(mappings.clone());
    let scopes: Vec<_> = (0..SCOPES).map(|_| LocalScope::new()).collect();
    let types: Vec<_> = scopes
        .iter()
        .map(|scope| {
            let schema = scope.declare_interface("com.acme.Shared");
            declare(&mappings, &schema, &["shared.value"], |decl| decl);
            schema
        })
        .collect();

    let barrier = Barrier::new(SCOPES * PER_SCOPE);
    let results: Vec<(usize, cfgmap_ir::ArtifactRef)> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..SCOPES * PER_SCOPE)
            .map(|i| {
                let index = i % SCOPES;
                let schema = &types[index];
                let barrier = &barrier;
                let loader = &loader;
                s.spawn(move || {
                    barrier.wait();
                    (index, loader.artifact(schema).unwrap())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (index, artifact) in &results {
        assert_eq!(artifact.scope(), scopes[*index].id());
        assert!(scopes[*index].load(artifact.name()).unwrap().ptr_eq(artifact));
    }
    for scope in &scopes {
        assert_eq!(scope.artifact_count(), 1);
    }
}
