use nexus_gate_core_rs::{Gate, Mapping};
use serde_json::json;

fn main() {
  let gate = Gate::new();
  gate.latch_mapped(Mapping::position(1)).succeed(vec![json!("first")]);
  gate.latch_mapped(Mapping::position(1)).succeed(vec![json!("second")]);

  gate.on_complete_then(|outcome, next| {
    println!("cycle 1: {:?}", outcome.map(|r| r.to_vec()));
    next.latch_mapped(Mapping::position(1)).succeed(vec![json!("third")]);
    next.on_complete(|outcome| println!("cycle 2: {:?}", outcome.map(|r| r.to_vec())));
  });
}
