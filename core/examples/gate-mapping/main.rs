use nexus_gate_core_rs::{CompletionArgs, Gate, Mapping, OperationError};
use tokio::process::Command;

#[tokio::main]
async fn main() {
  let dir = std::env::temp_dir();
  tokio::fs::write(dir.join("file1"), "FILE1").await.unwrap();
  tokio::fs::write(dir.join("file2"), "FILE2").await.unwrap();

  let gate = Gate::new();

  // single mapping: position 1 is the file contents
  let file1 = gate.latch_mapped(Mapping::position(1));
  let path = dir.join("file1");
  tokio::spawn(async move { file1.resolve(tokio::fs::read_to_string(path).await) });

  // multiple mapping: stdout and stderr of a process
  let exec = gate.latch_mapped(Mapping::fields().arg("stdout", 1).arg("stderr", 2));
  tokio::spawn(async move {
    match Command::new("sh").arg("-c").arg("ls / | wc -l").output().await {
      Ok(output) => exec.complete(
        CompletionArgs::ok(Vec::new())
          .with_value(String::from_utf8_lossy(&output.stdout).to_string())
          .with_value(String::from_utf8_lossy(&output.stderr).to_string()),
      ),
      Err(e) => exec.fail(OperationError::new(e)),
    }
  });

  // all mapping: every argument, the error slot included
  let file2 = gate.latch();
  let path = dir.join("file2");
  tokio::spawn(async move { file2.resolve(tokio::fs::read_to_string(path).await) });

  match gate.wait().await {
    Ok(results) => {
      println!("file1: {:?}", results[0]);
      println!("stdout[1]: {:?}", results[1].field("stdout"));
      println!("stderr[1]: {:?}", results[1].field("stderr"));
      println!("file2: {:?}", results[2]);
    }
    Err(e) => println!("exec error: {}", e),
  }
}
