//! Design Tests: Parallelism
//!
//! Unrelated schema types resolve independently. Each gets its own cache
//! slot and its own name lock, so a parallel sweep generates once per type.

use rayon::prelude::*;

use crate::support::Fixture;

/// Design: a rayon sweep over unrelated types generates once per type
#[test]
fn design_unrelated_keys_resolve_in_parallel() {
    const TYPES: usize = 48;
    let fx = Fixture::new();
    let types: Vec<_> = (0..TYPES)
        .map(|i| fx.interface(&format!("com.acme.gen.Mapping{i}"), &["value"]))
        .collect();

    // Every type is requested several times, from whichever worker picks it up
    let artifacts: Vec<_> = (0..TYPES * 4)
        .into_par_iter()
        .map(|i| (i % TYPES, fx.loader.artifact(&types[i % TYPES]).unwrap()))
        .collect();

    assert_eq!(fx.generations(), TYPES);
    assert_eq!(fx.loader.cached_count(), TYPES);
    assert_eq!(fx.loader.lock_count(), TYPES);
    for (index, artifact) in &artifacts {
        assert!(artifact.ptr_eq(&fx.loader.cached(&types[*index]).unwrap()));
    }
}

/// Design: a slow generation for one type does not block another type
#[test]
fn design_slow_key_does_not_block_others() {
    use std::sync::mpsc;
    use std::time::Duration;

    use cfgmap_ir::BindingMetadata;
    use cfgmap_loader::{GenerateError, Generator, ManifestGenerator, MappingLoader};

    struct Gated {
        slow: String,
        entered: std::sync::Mutex<mpsc::Sender<()>>,
        release: std::sync::Mutex<mpsc::Receiver<()>>,
    }

    impl Generator for Gated {
        fn generate(&self, metadata: &BindingMetadata) -> Result<Vec<u8>, GenerateError> {
            if metadata.class_name() == self.slow {
                self.entered.lock().unwrap().send(()).unwrap();
                let _ = self.release.lock().unwrap().recv_timeout(Duration::from_secs(10));
            }
            ManifestGenerator.generate(metadata)
        }
    }

    let fx = Fixture::new();
    let slow = fx.interface("com.acme.Slow", &[]);
    let fast = fx.interface("com.acme.Fast", &[]);
    let (entered, slow_started) = mpsc::channel();
    let (release, gate) = mpsc::channel();
    let loader = MappingLoader::builder()
        .introspector(fx.mappings.clone())
        .generator(Gated {
            slow: "com.acme.Slow$$CMImpl".to_owned(),
            entered: std::sync::Mutex::new(entered),
            release: std::sync::Mutex::new(gate),
        })
        .build()
        .unwrap();

    std::thread::scope(|s| {
        let blocked = s.spawn(|| loader.artifact(&slow).unwrap());
        slow_started.recv_timeout(Duration::from_secs(10)).unwrap();

        // The slow type holds its slot and name lock until released
        let quick = loader.artifact(&fast).unwrap();
        assert_eq!(quick.name(), "com.acme.Fast$$CMImpl");
        assert!(!blocked.is_finished());
        assert!(loader.cached(&slow).is_none());
        release.send(()).unwrap();
        assert_eq!(blocked.join().unwrap().name(), "com.acme.Slow$$CMImpl");
    });
}
