use ps_matrix::config::{IndexWidthPolicy, PartitionConfig};
use ps_matrix::storage::partitioner::RangePartitioner;
use ps_matrix::storage::types::MatrixContext;

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} --rows <n> --cols <n> [--matrix-id <id>] [--name <name>] [--shards <n>] \
         [--partition-size <n>] [--index-width auto|narrow|wide] [--config <file.json>] [--verbose]",
        program
    );
    eprintln!("Example: {} --rows 1 --cols 100000000", program);
    eprintln!("Example: {} --rows 1000 --cols 400000000 --shards 8", program);
    std::process::exit(1);
}

fn flag_value<'a>(args: &'a [String], i: usize, program: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Missing value for {}", args[i]);
            usage(program)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("ps-plan");

    let mut rows: Option<u64> = None;
    let mut cols: Option<u64> = None;
    let mut matrix_id: i32 = 0;
    let mut name: Option<String> = None;
    let mut shards: Option<u32> = None;
    let mut partition_size: Option<u64> = None;
    let mut index_width: Option<IndexWidthPolicy> = None;
    let mut config_path: Option<String> = None;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rows" => {
                rows = Some(flag_value(&args, i, program).parse()?);
                i += 2;
            }
            "--cols" => {
                cols = Some(flag_value(&args, i, program).parse()?);
                i += 2;
            }
            "--matrix-id" => {
                matrix_id = flag_value(&args, i, program).parse()?;
                i += 2;
            }
            "--name" => {
                name = Some(flag_value(&args, i, program).to_string());
                i += 2;
            }
            "--shards" => {
                shards = Some(flag_value(&args, i, program).parse()?);
                i += 2;
            }
            "--partition-size" => {
                partition_size = Some(flag_value(&args, i, program).parse()?);
                i += 2;
            }
            "--index-width" => {
                index_width = Some(flag_value(&args, i, program).parse()?);
                i += 2;
            }
            "--config" => {
                config_path = Some(flag_value(&args, i, program).to_string());
                i += 2;
            }
            "--verbose" => {
                verbose = true;
                i += 1;
            }
            "--help" | "-h" => usage(program),
            other => {
                eprintln!("Ignoring unknown argument {}", other);
                i += 1;
            }
        }
    }

    tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let (Some(rows), Some(cols)) = (rows, cols) else {
        eprintln!("--rows and --cols are required");
        usage(program)
    };

    // 1. Configuration: file first, flags override.
    let mut config = match &config_path {
        Some(path) => PartitionConfig::from_json_file(path)?,
        None => PartitionConfig::default(),
    };
    if let Some(shards) = shards {
        config.num_shards = shards;
    }
    if let Some(size) = partition_size {
        config.max_elements_per_partition = size;
    }
    if let Some(policy) = index_width {
        config.index_width = policy;
    }
    config.validate()?;

    let ctx = MatrixContext::new(
        name.unwrap_or_else(|| format!("matrix-{}", matrix_id)),
        matrix_id,
        rows,
        cols,
    );

    // 2. Plan:
    let partitioner = RangePartitioner::new(config);
    tracing::info!(
        "Planning '{}' ({}x{}) over {} shards, at most {} elements per partition",
        ctx.name,
        ctx.row_count,
        ctx.col_count,
        partitioner.config().num_shards,
        partitioner.config().max_elements_per_partition
    );
    let plan = partitioner.partitions(&ctx)?;

    tracing::info!(
        "{} partitions, {:?} indices, effective limit {}",
        plan.len(),
        plan.width,
        plan.effective_limit
    );
    for shard in 0..plan.num_shards {
        let (count, elements) = plan
            .for_shard(shard)
            .fold((0usize, 0u64), |(n, e), d| (n + 1, e + d.element_count()));
        tracing::info!("  - shard {}: {} partitions, {} elements", shard, count, elements);
    }

    // 3. Emit:
    println!("{}", serde_json::to_string_pretty(&plan)?);

    Ok(())
}
