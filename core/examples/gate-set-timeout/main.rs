use nexus_gate_core_rs::{Gate, Mapping};
use std::time::Duration;

#[tokio::main]
async fn main() {
  let gate = Gate::new();
  for (v, delay) in [("a", 30), ("b", 20), ("c", 10)] {
    let latch = gate.latch_mapped(Mapping::fields().literal("val", v));
    tokio::spawn(async move {
      tokio::time::sleep(Duration::from_millis(delay)).await;
      latch.done();
    });
  }

  // Results come back in creation order: a, b, c.
  let results = gate.wait().await.unwrap();
  println!("{:?}", results.to_vec());
}
