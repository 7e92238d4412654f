//! Registration through `PluginLoader`

use crate::helpers::*;
use approx::assert_abs_diff_eq;
use ugenwrap::prelude::*;
use ugenwrap::WrapperError;

fn loader(buffers: &std::sync::Arc<MemoryBufferStore>) -> (LocalHost, PluginLoader) {
    let host = test_host(buffers);
    let loader = PluginLoader::new(host.handle())
        .wrap::<Gain>("Gain")
        .and_then(|l| l.wrap::<BufScale>("BufScale"))
        .and_then(|l| l.wrap::<Offset>("Offset"))
        .unwrap();
    (host, loader)
}

#[test]
fn test_registers_each_capability() {
    let buffers = MemoryBufferStore::shared(8);
    let (host, loader) = loader(&buffers);

    let names: Vec<_> = loader.registered().iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["Gain", "BufScale", "Offset"]);

    assert!(host.has_unit("Gain"));
    assert!(!host.has_plugin_command("Gain"));

    assert!(!host.has_unit("BufScale"));
    assert!(host.has_plugin_command("BufScale"));

    assert!(host.has_unit("Offset"));
    assert!(host.has_plugin_command("Offset"));
}

#[test]
fn test_capability_lookup() {
    let buffers = MemoryBufferStore::shared(8);
    let (_host, loader) = loader(&buffers);

    assert_eq!(loader.get("Offset").unwrap().capability(), Capability::Both);
    assert!(loader.get("Missing").is_none());

    let offline: Vec<_> = loader.with_capability(Capability::NonRealTime).collect();
    assert_eq!(offline, vec!["BufScale"]);
    let streaming: Vec<_> = loader.with_capability(Capability::RealTime).collect();
    assert_eq!(streaming, vec!["Gain"]);
}

#[test]
fn test_duplicate_name_is_rejected() {
    let buffers = MemoryBufferStore::shared(8);
    let (_host, loader) = loader(&buffers);

    let err = loader.wrap::<Gain>("Gain").unwrap_err();
    assert!(matches!(
        err,
        Error::Adapter(WrapperError::AlreadyRegistered { kind: "unit", .. })
    ));
}

#[test]
fn test_invalid_name_is_rejected() {
    let buffers = MemoryBufferStore::shared(8);
    let host = test_host(&buffers);

    for name in ["", "Buf Scale", "a/b"] {
        let err = PluginLoader::new(host.handle())
            .wrap::<BufScale>(name)
            .unwrap_err();
        assert!(matches!(err, Error::Adapter(WrapperError::InvalidConfig(_))), "{name:?}");
    }
    assert!(!host.has_plugin_command(""));
}

#[test]
fn test_hybrid_client_runs_both_paths() {
    let buffers = MemoryBufferStore::shared(8);
    let (host, _loader) = loader(&buffers);

    // Offline: add 0.25 to buffer 3 in place.
    buffers.set(3, mono(&[1.0, 2.0])).unwrap();
    host.send_command("Offset", &[OscType::Int(3), OscType::Float(0.25)], None)
        .unwrap();
    assert!(host.wait_idle(IDLE_TIMEOUT));
    assert_eq!(read(&buffers, 3), Some(vec![1.25, 2.25]));

    // Streaming: the same descriptors bind from the unit's controls.
    let spec = UnitSpec::new(
        vec![
            InputSpec::audio(),
            InputSpec::control(-1.0),
            InputSpec::control(0.5),
        ],
        1,
        1,
    );
    let mut unit = host.instantiate("Offset", &spec).unwrap();
    let input = [1.0f32; 4];
    let mut out = [0.0f32; 4];
    unit.next(4, &[&input, &[-1.0f32], &[0.5f32]], &mut [&mut out]);
    for sample in out {
        assert_abs_diff_eq!(sample, 1.5);
    }
}

#[test]
fn test_descriptor_dump() {
    let json = serde_json::to_value(BufScale::descriptors()).unwrap();
    let params = json.as_array().unwrap();
    assert_eq!(params.len(), 4);

    let names: Vec<_> = params.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["source", "target", "factor", "min_frames"]);
    assert_eq!(params[0]["kind"], "buffer");
    assert_eq!(params[2]["kind"], "float");
    assert_eq!(params[3]["kind"], "long");
    assert!(params[2]["constraints"].is_array());
    assert!(params[0].get("constraints").is_none());
}
