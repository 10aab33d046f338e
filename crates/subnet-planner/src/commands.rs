//! Command execution and output rendering

use anyhow::{Context, Result};
use serde::Serialize;
use subnet_planner::counts::format_count;
use subnet_planner::{
    divide_with_limit, parent_of, parse_cidr, planner, pool_usage, sibling_of, IpVersion,
    PlanFile, PlanReport, PlannerConfig, PoolUsage, SizingEngine, SizingResult, SubnetInfo,
    TenantSizingSpec,
};

use crate::cli::{Commands, OutputFormat, SuggestArgs};

impl Commands {
    pub fn execute(self, config: &PlannerConfig, format: OutputFormat) -> Result<()> {
        let engine = SizingEngine::new(config.policy.clone());
        match self {
            Commands::Info { cidr } => {
                let cidr = parse_cidr(&cidr)?;
                emit(format, &SubnetInfo::from(&cidr), print_info)
            }
            Commands::Divide { cidr, prefix } => {
                let cidr = parse_cidr(&cidr)?;
                let subnets = divide_with_limit(&cidr, prefix, config.max_divide_subnets)?;
                let infos: Vec<SubnetInfo> = subnets.iter().map(SubnetInfo::from).collect();
                emit(format, &infos, |infos: &Vec<SubnetInfo>| {
                    for info in infos {
                        println!(
                            "{:<44} {} - {}  ({} addresses)",
                            info.cidr.to_string(),
                            info.first,
                            info.last,
                            format_count(&info.total)
                        );
                    }
                })
            }
            Commands::Parent { cidr } => {
                let parent = parent_of(&parse_cidr(&cidr)?)?;
                emit(format, &SubnetInfo::from(&parent), print_info)
            }
            Commands::Sibling { cidr } => {
                let sibling = sibling_of(&parse_cidr(&cidr)?)?;
                emit(format, &SubnetInfo::from(&sibling), print_info)
            }
            Commands::Suggest(args) => suggest(&engine, args, format),
            Commands::Plan { file, strategy } => {
                let mut snapshot = PlanFile::load_from(&file)
                    .with_context(|| format!("failed to load plan {}", file.display()))?;
                if let Some(strategy) = strategy {
                    snapshot.strategy = strategy.into();
                }
                let report = planner::plan_file(&snapshot, &engine);
                emit(format, &report, print_plan)
            }
            Commands::Usage {
                pool,
                children,
                blocks,
            } => {
                let usage = pool_usage(&pool, &children, &blocks)?;
                emit(format, &usage, |usage: &PoolUsage| {
                    println!("Pool:      {}", pool);
                    println!("Total:     {}", format_count(&usage.total));
                    println!("Used:      {}", format_count(&usage.used));
                    println!("Available: {}", format_count(&usage.available));
                    println!("Used %:    {:.2}", usage.percent);
                })
            }
        }
    }
}

fn suggest(engine: &SizingEngine, args: SuggestArgs, format: OutputFormat) -> Result<()> {
    let version = if args.ipv6 {
        IpVersion::V6
    } else {
        IpVersion::V4
    };
    let spec = TenantSizingSpec::new("cli", args.networks, args.hosts).with_growth(args.growth);
    let result = engine.suggest_block(&spec, version);
    emit(format, &result, |r: &SizingResult| {
        println!("Hosts per network: {}", r.required_hosts_per_network);
        println!(
            "Subnet:            /{} ({} addresses)",
            r.subnet_prefix,
            format_count(&r.subnet_ips)
        );
        println!(
            "Block:             /{} ({} addresses)",
            r.block_prefix,
            format_count(&r.usable_ips)
        );
        println!("Required hosts:    {}", format_count(&r.required_ips));
        println!("Required block:    {}", format_count(&r.required_block_ips));
    })
}

fn emit<T, F>(format: OutputFormat, value: &T, table: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Table => table(value),
    }
    Ok(())
}

fn print_info(info: &SubnetInfo) {
    println!("CIDR:    {}", info.cidr);
    if let Some(netmask) = &info.netmask {
        println!("Netmask: {}", netmask);
    }
    println!("First:   {}", info.first);
    println!("Last:    {}", info.last);
    println!("Usable:  {}", format_count(&info.usable));
    println!("Total:   {}", format_count(&info.total));
}

fn print_plan(report: &PlanReport) {
    println!("Base:      {} ({:?})", report.base, report.strategy);
    println!("Total:     {}", format_count(&report.base_ips));
    println!("Occupied:  {}", format_count(&report.occupied_ips));
    println!("Allocated: {}", format_count(&report.allocated_ips));
    println!("Available: {}", format_count(&report.available_ips));
    println!("Used %:    {:.2}", report.utilization_percent);
    if report.exceeds_base {
        println!("WARNING: tenant blocks exceed the base block");
    }
    println!();
    println!(
        "{:<16} {:>6} {:>6} {:>12} {:>12} {:>4}  POOL",
        "TENANT", "SUBNET", "BLOCK", "MAX NETS", "MAX HOSTS", "FITS"
    );
    for tenant in &report.tenants {
        println!(
            "{:<16} {:>6} {:>6} {:>12} {:>12} {:>4}  {}",
            tenant.id,
            format!("/{}", tenant.sizing.subnet_prefix),
            format!("/{}", tenant.sizing.block_prefix),
            tenant.max_networks,
            tenant.max_hosts_per_network,
            if tenant.fits { "yes" } else { "no" },
            tenant.pool.as_ref().map_or("-", |p| p.cidr.as_str()),
        );
    }
}
