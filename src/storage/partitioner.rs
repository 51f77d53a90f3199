use super::types::{IndexWidth, MatrixContext, PartitionDescriptor, PartitionPlan};
use crate::config::{IndexWidthPolicy, PartitionConfig};
use crate::error::{PsError, Result};

/// Largest positive 32-bit index.
const NARROW_MAX: u64 = i32::MAX as u64;

/// Splits a matrix's `[0, rows) x [0, cols)` extent into bounded rectangles
/// and assigns them to shards.
pub struct RangePartitioner {
    config: PartitionConfig,
}

impl RangePartitioner {
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Picks the range arithmetic for a row of `col_count` cells.
    pub fn select_width(&self, col_count: u64) -> Result<IndexWidth> {
        let extent = col_count.saturating_mul(self.config.value_bytes);
        let exceeds_narrow = col_count > NARROW_MAX || extent > NARROW_MAX;
        match self.config.index_width {
            IndexWidthPolicy::Auto if exceeds_narrow => Ok(IndexWidth::Wide),
            IndexWidthPolicy::Auto => Ok(IndexWidth::Narrow),
            IndexWidthPolicy::Narrow if col_count > NARROW_MAX => Err(PsError::config(
                "index_width",
                format!(
                    "a single row of {} columns cannot be addressed with 32-bit indices",
                    col_count
                ),
            )),
            IndexWidthPolicy::Narrow => Ok(IndexWidth::Narrow),
            IndexWidthPolicy::Wide => Ok(IndexWidth::Wide),
        }
    }

    /// Element bound per partition once the index width is known.
    pub fn effective_limit(&self, width: IndexWidth) -> u64 {
        let configured = self.config.max_elements_per_partition;
        match width {
            IndexWidth::Narrow => configured.min(NARROW_MAX),
            // 64-bit keys double the per-cell index footprint.
            IndexWidth::Wide => (configured / 2).max(1),
        }
    }

    pub fn partitions(&self, ctx: &MatrixContext) -> Result<PartitionPlan> {
        self.config.validate()?;
        if ctx.row_count < 1 {
            return Err(PsError::config("row_count", "must be at least 1"));
        }
        if ctx.col_count < 1 {
            return Err(PsError::config("col_count", "must be at least 1"));
        }

        let width = self.select_width(ctx.col_count)?;
        let limit = self.effective_limit(width);
        let shards = u64::from(self.config.num_shards);

        // Whole rows per block while a row fits the limit; column strips of
        // a single row otherwise.
        let (rows_per_block, cols_per_block) = if ctx.col_count <= limit {
            (ctx.row_count.min((limit / ctx.col_count).max(1)), ctx.col_count)
        } else {
            (1, limit)
        };
        let mut row_splits = ctx.row_count.div_ceil(rows_per_block);
        let mut col_splits = ctx.col_count.div_ceil(cols_per_block);

        // Give every shard something to hold: rows first, then columns.
        if row_splits.saturating_mul(col_splits) < shards {
            row_splits = ctx.row_count.min(row_splits.max(shards.div_ceil(col_splits)));
        }
        if row_splits.saturating_mul(col_splits) < shards {
            col_splits = ctx.col_count.min(col_splits.max(shards.div_ceil(row_splits)));
        }

        let max_partitions = self.config.max_partitions;
        let total = row_splits
            .checked_mul(col_splits)
            .filter(|&n| n <= max_partitions)
            .ok_or_else(|| {
                PsError::config(
                    "max_partitions",
                    format!(
                        "{}x{} matrix at {} elements per partition needs more than {} partitions",
                        ctx.row_count, ctx.col_count, limit, max_partitions
                    ),
                )
            })?;

        let row_ranges = split_even(ctx.row_count, row_splits);
        let col_ranges = split_even(ctx.col_count, col_splits);

        let mut descriptors = Vec::with_capacity(total as usize);
        for &(row_start, row_end) in &row_ranges {
            for &(col_start, col_end) in &col_ranges {
                let index = descriptors.len() as u64;
                descriptors.push(PartitionDescriptor {
                    partition_id: index as u32,
                    matrix_id: ctx.matrix_id,
                    row_start,
                    row_end,
                    col_start,
                    col_end,
                    shard: shard_for(index, total, shards),
                    width,
                });
            }
        }

        tracing::debug!(
            "Planned matrix '{}' (id={}) {}x{}: {} partitions ({}x{} blocks), {:?} indices, limit {}",
            ctx.name,
            ctx.matrix_id,
            ctx.row_count,
            ctx.col_count,
            descriptors.len(),
            row_splits,
            col_splits,
            width,
            limit
        );

        Ok(PartitionPlan {
            matrix_id: ctx.matrix_id,
            row_count: ctx.row_count,
            col_count: ctx.col_count,
            width,
            effective_limit: limit,
            num_shards: self.config.num_shards,
            descriptors,
        })
    }
}

/// Plans one matrix with default width policy and value size.
pub fn compute_partitions(
    matrix_id: i32,
    row_count: u64,
    col_count: u64,
    num_shards: u32,
    max_elements_per_partition: u64,
) -> Result<Vec<PartitionDescriptor>> {
    let partitioner = RangePartitioner::new(PartitionConfig {
        num_shards,
        max_elements_per_partition,
        ..Default::default()
    });
    let ctx = MatrixContext::new(format!("matrix-{}", matrix_id), matrix_id, row_count, col_count);
    Ok(partitioner.partitions(&ctx)?.descriptors)
}

/// `parts` contiguous half-open ranges over `[0, total)` whose sizes differ
/// by at most one; the longer ranges come first.
fn split_even(total: u64, parts: u64) -> Vec<(u64, u64)> {
    let parts = parts.clamp(1, total.max(1));
    let base = total / parts;
    let remainder = total % parts;
    let mut start = 0;
    (0..parts)
        .map(|k| {
            let len = base + u64::from(k < remainder);
            let range = (start, start + len);
            start += len;
            range
        })
        .collect()
}

/// Contiguous runs of near-equal length, in shard order.
fn shard_for(index: u64, total: u64, shards: u64) -> u32 {
    ((u128::from(index) * u128::from(shards)) / u128::from(total)) as u32
}
