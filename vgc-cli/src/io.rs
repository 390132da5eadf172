//! Stdin/stdout operator I/O

use async_trait::async_trait;
use std::io::Write;
use vgc_common::Result;
use vgc_engine::OperatorIo;

/// Line-based terminal prompts for attended use.
pub struct StdOperatorIo;

#[async_trait]
impl OperatorIo for StdOperatorIo {
    fn say(&self, line: &str) {
        println!("{line}");
    }

    async fn ask(&self, prompt: &str) -> Result<String> {
        let prompt = prompt.to_string();
        // Blocking reads stay off the async executor
        tokio::task::spawn_blocking(move || {
            print!("{prompt}");
            std::io::stdout().flush()?;
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            Ok(line.trim().to_string())
        })
        .await
        .map_err(|e| vgc_common::Error::Internal(format!("input task failed: {e}")))?
    }
}
