use nexus_gate_core_rs::{Gate, GateOption, LatchSpec, Mapping};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .try_init();

  let dir = std::env::temp_dir();
  tokio::fs::write(dir.join("file1"), "FILE1").await.unwrap();

  // fail-fast: the first error is reported with the location of its latch
  let gate = Gate::new();
  for file in ["file1", "non-existent"] {
    let latch = gate.latch_mapped(Mapping::fields().literal("name", file).arg("data", 1));
    let path = dir.join(file);
    tokio::spawn(async move { latch.resolve(tokio::fs::read_to_string(path).await) });
  }
  match gate.wait().await {
    Ok(results) => println!("{:?}", results),
    Err(e) => println!("{}", e),
  }

  // per-latch skip: errors become part of the results
  let gate = Gate::new();
  for file in ["non-existent1", "non-existent2"] {
    let latch = gate.latch_with(
      LatchSpec::new()
        .mapping(Mapping::fields().arg("err", 0).arg("data", 1))
        .skip_error_check(true),
    );
    let path = dir.join(file);
    tokio::spawn(async move { latch.resolve(tokio::fs::read_to_string(path).await) });
  }
  let results = gate.wait().await.unwrap();
  for (key, value) in results.iter() {
    if let Some(error) = value.field("err").and_then(|v| v.as_error()) {
      println!("{}: {}", key, error);
    }
  }

  // lenient gate: same, for every latch
  let gate = Gate::from_options([GateOption::with_fail_fast(false)]);
  let latch = gate.latch_mapped(Mapping::position(0));
  latch.fail("ERROR");
  println!("{:?}", gate.wait().await.unwrap()[0]);
}
