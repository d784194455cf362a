use nexus_gate_core_rs::{Gate, Mapping};

#[tokio::main]
async fn main() {
  let dir = std::env::temp_dir();
  let files = ["file1", "file2"];
  for file in files {
    tokio::fs::write(dir.join(file), file.to_uppercase()).await.unwrap();
  }

  // The waiter is registered before any latch exists; the expected count keeps it pending.
  let gate = Gate::with_count(files.len());
  let waiter = tokio::spawn(gate.clone().wait());

  tokio::task::yield_now().await;
  for file in files {
    let latch = gate.latch_mapped(Mapping::fields().literal("name", file).arg("data", 1));
    let path = dir.join(file);
    tokio::spawn(async move { latch.resolve(tokio::fs::read_to_string(path).await) });
  }

  let results = waiter.await.unwrap().unwrap();
  println!("{:?}", results[0]); // { name: 'file1', data: 'FILE1' }
  println!("{:?}", results[1]); // { name: 'file2', data: 'FILE2' }
}
