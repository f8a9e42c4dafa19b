// Basic usage example for perftest-props
//
// Run with: cargo run --example basic_usage

use perftest_props::{PropertiesLoader, PropertiesStorage, TestProperties, keys};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Build a configuration by hand
    let mut props = TestProperties::new();
    props.set_batch_size(1000)?;
    props.set_rmat_probabilities(Some(&[0.45, 0.15, 0.15, 0.25]))?;
    props.set_rmat_include_entities(true);
    props.set_rmat_max_node_id(10_000_000);
    props.set_metrics_listener_class("uk.example.LoggingMetricsListener");

    // Rejected writes leave the previous value in place
    if let Err(e) = props.set_batch_size(0) {
        println!("rejected: {e}");
    }

    let dir = std::env::temp_dir().join("perftest-props-demo");
    let path = dir.join("ingest.properties");
    props.save(&path, &PropertiesStorage::new().with_header("ingest performance test"))?;
    println!("saved to {}", path.display());

    // Load it back, letting PERF_* env vars and a flag-style override win
    let loaded = PropertiesLoader::new()
        .file(&path)
        .with_env_prefix("PERF")
        .set(keys::BATCH_SIZE, "2000")
        .load()?;

    println!("batch size:       {}", loaded.batch_size()?);
    println!("probabilities:    {:?}", loaded.rmat_probabilities()?);
    println!("include entities: {}", loaded.rmat_include_entities());
    println!("max node id:      {}", loaded.rmat_max_node_id()?);
    println!(
        "metrics listener: {}",
        loaded.metrics_listener_class().unwrap_or("<none>")
    );

    Ok(())
}
