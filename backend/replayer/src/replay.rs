//! Block file format and the replay loop.

use serde::Deserialize;
use tracing::{info, warn};

use crowdfund_protocol::{CrowdfundTransaction, MemoryAccounts, ProtocolParams, TransactionProcessor};

use crate::config::Config;
use crate::errors::{ReplayerError, Result};

/// One committed block: a timestamp and its ordered transactions.
#[derive(Debug, Deserialize)]
pub struct Block {
    pub timestamp: i64,
    pub transactions: Vec<CrowdfundTransaction>,
}

#[derive(Debug, Deserialize)]
pub struct BlockFile {
    pub blocks: Vec<Block>,
}

/// Outcome counters for one replay run.
#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
}

pub fn load_blocks(path: &str) -> Result<BlockFile> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Replay every block in order against a fresh in-memory ledger.
///
/// Each block runs the batch duplicate check first, then applies its
/// transactions one by one at the block's timestamp. A rejected
/// transaction is logged and skipped unless `strict` is set.
pub fn run(
    config: &Config,
    blocks: &[Block],
) -> Result<(TransactionProcessor<MemoryAccounts>, ReplaySummary)> {
    let mut processor = TransactionProcessor::new(MemoryAccounts::new(), ProtocolParams::default());
    let mut summary = ReplaySummary::default();

    for (height, block) in blocks.iter().enumerate() {
        let batch_errors = processor.check_batch(&block.transactions);
        let conflicting: Vec<String> = batch_errors
            .iter()
            .map(|e| e.transaction_id.clone())
            .collect();
        for error in &batch_errors {
            warn!(height, id = %error.transaction_id, "batch check: {}", error.message);
        }

        for tx in &block.transactions {
            if conflicting.contains(&tx.header().id) {
                summary.rejected += 1;
                continue;
            }
            match processor.apply(block.timestamp, tx) {
                Ok(()) => {
                    summary.applied += 1;
                    info!(height, id = %tx.header().id, kind = tx.kind(), "applied");
                }
                Err(errors) => {
                    summary.rejected += 1;
                    for error in &errors {
                        warn!(height, id = %error.transaction_id, kind = tx.kind(), "{}", error.message);
                    }
                    if config.strict {
                        return Err(ReplayerError::Config(format!(
                            "transaction {} rejected in strict mode",
                            tx.header().id
                        )));
                    }
                }
            }
        }
        info!(
            height,
            timestamp = block.timestamp,
            transactions = block.transactions.len(),
            "block replayed"
        );
    }

    Ok((processor, summary))
}
